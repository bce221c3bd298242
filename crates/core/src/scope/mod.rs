//! Scoped authoring environment.
//!
//! A [`Scope`] is the handle every scope and emitter call goes through. Each
//! nested scope gets its own copy of the [`Environment`], patched for the
//! duration of the nested body, while the parent's copy is never touched.
//! Leaving a scope, whether the body succeeded or failed, therefore restores
//! the parent environment without any bookkeeping.

use std::sync::Arc;

use crate::{
    animation::RecordedEffect,
    timing::{CycleSpec, Tempo},
    Effect, EffectConfig, EffectKind, ElementSet, Repeat, Result, Segment,
};

/// Everything a scope propagates to the calls nested inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub config: EffectConfig,
    pub elements: ElementSet,
    /// Stagger factor for motion effects, set by [`Scope::phase`].
    pub phase: Option<f64>,
}

impl Environment {
    pub fn new(config: EffectConfig) -> Self {
        Self {
            config,
            elements: ElementSet::new(),
            phase: None,
        }
    }
}

/// Handle to the active animation plus the environment in effect at this
/// level of nesting.
#[derive(Debug)]
pub struct Scope<'a> {
    tempo: Tempo,
    recorded: &'a mut Vec<RecordedEffect>,
    env: Environment,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(tempo: Tempo, recorded: &'a mut Vec<RecordedEffect>, env: Environment) -> Self {
        Self {
            tempo,
            recorded,
            env,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Runs `body` under a copy of the current environment modified by
    /// `patch`. The current environment is unchanged afterwards.
    pub fn with_scope<P, F>(&mut self, patch: P, body: F) -> Result<()>
    where
        P: FnOnce(&mut Environment),
        F: FnOnce(&mut Scope<'_>) -> Result<()>,
    {
        let mut env = self.env.clone();
        patch(&mut env);
        let mut child = Scope {
            tempo: self.tempo,
            recorded: &mut *self.recorded,
            env,
        };
        body(&mut child)
    }

    /// Restricts nested effects to the absolute window `start..end` in beats
    /// of the animation's tempo. Any repeat inherited from an enclosing
    /// [`Scope::cycle_beats`] is dropped.
    pub fn beats<F>(&mut self, start_beat: f64, end_beat: f64, body: F) -> Result<()>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<()>,
    {
        let (start_ms, end_ms) = self.tempo.window(start_beat, end_beat)?;
        tracing::trace!(start_beat, end_beat, start_ms, end_ms, "beats");
        self.with_scope(
            |env| {
                env.config.start_time_ms = start_ms;
                env.config.end_time_ms = end_ms;
                env.config.repeat = None;
            },
            body,
        )
    }

    /// Repeats nested effects every `beats_per_cycle` beats across the current
    /// window, playing them on beats `start..end` of each cycle.
    ///
    /// Only one repeat setting exists per effect: when cycles are
    /// nested, the innermost call replaces the outer one instead of composing
    /// with it, and the cycle count is always computed over the enclosing
    /// [`Scope::beats`] window.
    pub fn cycle_beats<F>(
        &mut self,
        beats_per_cycle: f64,
        start_beat: f64,
        end_beat: f64,
        body: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<()>,
    {
        let cycle = CycleSpec::over_window(
            self.tempo,
            self.env.config.start_time_ms,
            self.env.config.end_time_ms,
            beats_per_cycle,
            start_beat,
            end_beat,
        )?;
        if self.env.config.repeat.is_some() {
            tracing::debug!(beats_per_cycle, "nested cycle replaces enclosing repeat");
        }
        self.with_scope(|env| env.config.repeat = Some(Repeat::from(cycle)), body)
    }

    /// Targets a single element, replacing the inherited set.
    pub fn element<F>(&mut self, id: u32, body: F) -> Result<()>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<()>,
    {
        self.targets(ElementSet::single(id), body)
    }

    /// Targets the listed elements, replacing the inherited set.
    pub fn elements<F>(&mut self, ids: &[u32], body: F) -> Result<()>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<()>,
    {
        self.targets(ElementSet::from(ids), body)
    }

    pub fn targets<F>(&mut self, elements: ElementSet, body: F) -> Result<()>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<()>,
    {
        self.with_scope(|env| env.elements = elements, body)
    }

    /// Narrows nested effects to a named segment of each ring.
    pub fn segment<F>(&mut self, segment: impl Into<Segment>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<()>,
    {
        let segment = segment.into();
        self.with_scope(|env| env.config.segment = segment, body)
    }

    /// Staggers motion effects across the target elements: the element at
    /// index `i` of `n` has its curves shifted by `multiplier * i / n`.
    pub fn phase<F>(&mut self, multiplier: f64, body: F) -> Result<()>
    where
        F: FnOnce(&mut Scope<'_>) -> Result<()>,
    {
        self.with_scope(|env| env.phase = Some(multiplier), body)
    }

    /// Records `kind` for the whole target set under the current
    /// configuration.
    pub fn emit(&mut self, kind: EffectKind) {
        self.record(kind, self.env.elements.clone());
    }

    /// Records a motion effect, splitting it per element when a phase is
    /// active.
    pub(crate) fn emit_motion(&mut self, kind: EffectKind) {
        let count = self.env.elements.len();
        match self.env.phase {
            Some(multiplier) if count > 1 => {
                let elements: Vec<_> = self.env.elements.iter().collect();
                for (index, id) in elements.into_iter().enumerate() {
                    let delta = multiplier * index as f64 / count as f64;
                    self.record(kind.offset(delta), ElementSet::single(id));
                }
            }
            _ => self.emit(kind),
        }
    }

    fn record(&mut self, kind: EffectKind, elements: ElementSet) {
        if elements.is_empty() {
            tracing::warn!(effect = kind.name(), "effect emitted without target elements");
        }
        let effect = Effect::new(self.env.config.clone(), kind);
        self.recorded.push(RecordedEffect {
            effect: Arc::new(effect),
            elements,
        });
    }
}
