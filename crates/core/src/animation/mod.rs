use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    scope::{Environment, Scope},
    timing::Tempo,
    Effect, EffectConfig, ElementId, ElementSet, Result, SequencerError,
};

/// An effect together with the elements it was emitted for.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEffect {
    pub effect: Arc<Effect>,
    pub elements: ElementSet,
}

/// One authoring session. Effects are appended through the [`Scope`] handed
/// out by [`Animation::sync`] and flattened with [`Animation::sequence`].
#[derive(Debug, Clone)]
pub struct Animation {
    name: String,
    tempo: Tempo,
    total_duration_seconds: f64,
    start_offset_seconds: f64,
    recorded: Vec<RecordedEffect>,
}

impl Animation {
    pub fn new(name: impl Into<String>, bpm: f64, total_duration_seconds: f64) -> Result<Self> {
        if !total_duration_seconds.is_finite() || total_duration_seconds < 0.0 {
            return Err(SequencerError::InvalidDuration(total_duration_seconds));
        }
        Ok(Self {
            name: name.into(),
            tempo: Tempo::new(bpm)?,
            total_duration_seconds,
            start_offset_seconds: 0.0,
            recorded: Vec::new(),
        })
    }

    /// Sets where playback of the song starts relative to the animation.
    pub fn with_start_offset(mut self, seconds: f64) -> Self {
        self.start_offset_seconds = seconds;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bpm(&self) -> f64 {
        self.tempo.bpm()
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn total_duration_seconds(&self) -> f64 {
        self.total_duration_seconds
    }

    pub fn start_offset_seconds(&self) -> f64 {
        self.start_offset_seconds
    }

    pub fn duration_ms(&self) -> f64 {
        self.total_duration_seconds * 1000.0
    }

    pub fn recorded(&self) -> &[RecordedEffect] {
        &self.recorded
    }

    /// Opens the root scope and runs `body` inside it.
    ///
    /// The root window spans the whole animation on every segment, with no
    /// repeat and no target elements. May be called more than once; each call
    /// keeps appending to the same recording.
    pub fn sync<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<()>,
    {
        let root = Environment::new(EffectConfig::window(0.0, self.duration_ms()));
        let before = self.recorded.len();
        tracing::debug!(animation = %self.name, bpm = self.tempo.bpm(), "entering sync");

        let mut scope = Scope::new(self.tempo, &mut self.recorded, root);
        let outcome = body(&mut scope);

        tracing::debug!(
            animation = %self.name,
            emitted = self.recorded.len() - before,
            ok = outcome.is_ok(),
            "leaving sync"
        );
        outcome
    }

    /// Flattens the recording into one ordered effect list per element.
    ///
    /// Effects keep their recording order and are shared, not copied, between
    /// the elements they were emitted for. Elements that were never targeted
    /// get no entry.
    pub fn sequence(&self) -> Sequence {
        let duration_ms = self.duration_ms();
        let mut elements: BTreeMap<ElementId, ElementSequence> = BTreeMap::new();

        for record in &self.recorded {
            for id in record.elements.iter() {
                elements
                    .entry(id)
                    .or_insert_with(|| ElementSequence::new(duration_ms))
                    .effects
                    .push(Arc::clone(&record.effect));
            }
        }

        tracing::debug!(
            animation = %self.name,
            elements = elements.len(),
            recorded = self.recorded.len(),
            "flattened animation"
        );
        Sequence { elements }
    }
}

/// Effects scheduled on a single element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSequence {
    pub effects: Vec<Arc<Effect>>,
    pub duration_ms: f64,
    pub num_repeats: u32,
}

impl ElementSequence {
    fn new(duration_ms: f64) -> Self {
        Self {
            effects: Vec::new(),
            duration_ms,
            num_repeats: 0,
        }
    }
}

/// Flattened animation keyed by element, in the shape the rendering service
/// consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence {
    elements: BTreeMap<ElementId, ElementSequence>,
}

impl Sequence {
    pub fn get(&self, id: ElementId) -> Option<&ElementSequence> {
        self.elements.get(&id)
    }

    /// Looks up `ring<index>`. A ring that received no effects is reported as
    /// [`SequencerError::UntargetedElement`].
    pub fn ring(&self, index: u32) -> Result<&ElementSequence> {
        let id = ElementId::new(index);
        self.elements
            .get(&id)
            .ok_or(SequencerError::UntargetedElement(id))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &ElementSequence)> {
        self.elements.iter().map(|(id, seq)| (*id, seq))
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EffectKind;

    fn color(effect: &Effect) -> (f64, f64, f64) {
        match &effect.kind {
            EffectKind::ConstColor(c) => (c.color.hue, c.color.sat, c.color.val),
            other => panic!("expected const_color, got {}", other.name()),
        }
    }

    #[test]
    fn rejects_invalid_tempo() {
        let err = Animation::new("t", 0.0, 10.0).unwrap_err();
        assert!(matches!(err, SequencerError::InvalidTempo(_)));
    }

    #[test]
    fn rejects_invalid_duration() {
        for seconds in [-5.0, f64::NAN, f64::INFINITY] {
            let err = Animation::new("t", 120.0, seconds).unwrap_err();
            assert!(matches!(err, SequencerError::InvalidDuration(_)), "{seconds}");
        }
        let empty = Animation::new("t", 120.0, 0.0).unwrap();
        assert_eq!(empty.duration_ms(), 0.0);
    }

    #[test]
    fn root_window_never_runs_backwards() {
        let mut animation = Animation::new("t", 120.0, 5.0).unwrap();
        animation
            .sync(|s| {
                s.element(1, |s| {
                    s.const_color(0.0, 1.0, 1.0);
                    Ok(())
                })
            })
            .unwrap();
        let config = &animation.recorded()[0].effect.effect_config;
        assert!(config.start_time_ms <= config.end_time_ms);
        assert_eq!(config.duration_ms(), 5000.0);
    }

    #[test]
    fn flattening_preserves_recording_order() {
        let mut animation = Animation::new("t", 120.0, 10.0).unwrap();
        animation
            .sync(|s| {
                s.element(5, |s| {
                    s.const_color(0.1, 1.0, 1.0);
                    s.const_color(0.2, 1.0, 1.0);
                    Ok(())
                })
            })
            .unwrap();

        let sequence = animation.sequence();
        let ring = sequence.ring(5).unwrap();
        assert_eq!(ring.effects.len(), 2);
        assert_eq!(color(&ring.effects[0]).0, 0.1);
        assert_eq!(color(&ring.effects[1]).0, 0.2);
    }

    #[test]
    fn shared_effects_are_not_copied_per_element() {
        let mut animation = Animation::new("t", 120.0, 10.0).unwrap();
        animation
            .sync(|s| {
                s.elements(&[1, 2], |s| {
                    s.const_color(0.3, 1.0, 1.0);
                    Ok(())
                })
            })
            .unwrap();

        let sequence = animation.sequence();
        let first = &sequence.ring(1).unwrap().effects[0];
        let second = &sequence.ring(2).unwrap().effects[0];
        assert!(Arc::ptr_eq(first, second));
        assert_eq!(animation.recorded().len(), 1);
    }

    #[test]
    fn untargeted_elements_have_no_entry() {
        let mut animation = Animation::new("t", 120.0, 4.0).unwrap();
        animation
            .sync(|s| {
                s.rainbow();
                s.element(3, |s| {
                    s.rainbow();
                    Ok(())
                })
            })
            .unwrap();

        let sequence = animation.sequence();
        assert_eq!(sequence.len(), 1);
        assert!(sequence.get(ElementId::new(1)).is_none());
        assert!(matches!(
            sequence.ring(1),
            Err(SequencerError::UntargetedElement(_))
        ));
        let ring = sequence.ring(3).unwrap();
        assert_eq!(ring.duration_ms, 4000.0);
        assert_eq!(ring.num_repeats, 0);
    }

    #[test]
    fn sequence_json_is_keyed_by_ring_name() {
        let mut animation = Animation::new("t", 60.0, 2.0).unwrap();
        animation
            .sync(|s| {
                s.elements(&[10, 2], |s| {
                    s.fade_in(Default::default());
                    Ok(())
                })
            })
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&animation.sequence().to_json(false).unwrap()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["ring10", "ring2"]);
        assert_eq!(value["ring2"]["duration_ms"], serde_json::json!(2000.0));
        assert_eq!(value["ring2"]["num_repeats"], serde_json::json!(0));
    }

    #[test]
    fn flattening_is_repeatable() {
        let mut animation = Animation::new("t", 120.0, 1.0).unwrap();
        animation
            .sync(|s| {
                s.element(1, |s| {
                    s.snake();
                    Ok(())
                })
            })
            .unwrap();
        assert_eq!(animation.sequence(), animation.sequence());
    }
}
