//! JSON authoring scripts.
//!
//! A script is the data form of an authoring session: a tree of scope nodes
//! with emitter nodes as leaves, walked depth-first through the [`Scope`] API.
//!
//! ```json
//! {
//!   "name": "sandstorm", "bpm": 126, "duration_seconds": 50,
//!   "nodes": [
//!     { "type": "sync", "body": [
//!       { "type": "beats", "start": 0, "end": 32, "body": [
//!         { "type": "elements", "target": "all", "body": [
//!           { "type": "cycle_beats", "beats_per_cycle": 4, "start": 0, "end": 1,
//!             "body": [ { "type": "const_color", "hue": 0.3, "sat": 1, "val": 0.5 } ] }
//!         ] }
//!       ] }
//!     ] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    config::StageConfig,
    emit::{BlinkLevels, Ramp, Swing},
    scope::Scope,
    Animation, ElementId, ElementSet, FloatFunction, Result, SequencerError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub name: String,
    pub bpm: f64,
    pub duration_seconds: f64,
    #[serde(default)]
    pub start_offset_seconds: f64,
    pub nodes: Vec<Node>,
}

/// Elements addressed by an `elements` node: a ring number, a list of ring
/// numbers, a ring name such as `ring3`, or a group defined by the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Targets {
    One(u32),
    Many(Vec<u32>),
    Named(String),
}

impl Targets {
    pub fn resolve(&self, stage: &StageConfig) -> Result<ElementSet> {
        match self {
            Self::One(id) => Ok(ElementSet::single(*id)),
            Self::Many(ids) => Ok(ids.iter().copied().collect()),
            Self::Named(name) => match name.parse::<ElementId>() {
                Ok(id) => Ok(ElementSet::single(id)),
                Err(_) => stage.group(name),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Sync {
        #[serde(default)]
        body: Vec<Node>,
    },
    Beats {
        start: f64,
        end: f64,
        #[serde(default)]
        body: Vec<Node>,
    },
    CycleBeats {
        beats_per_cycle: f64,
        start: f64,
        end: f64,
        #[serde(default)]
        body: Vec<Node>,
    },
    Elements {
        target: Targets,
        #[serde(default)]
        body: Vec<Node>,
    },
    Segment {
        name: String,
        #[serde(default)]
        body: Vec<Node>,
    },
    Phase {
        multiplier: f64,
        #[serde(default)]
        body: Vec<Node>,
    },
    ConstColor {
        hue: f64,
        sat: f64,
        val: f64,
    },
    Rainbow,
    FadeIn {
        #[serde(default)]
        start: Option<f64>,
        #[serde(default)]
        end: Option<f64>,
    },
    FadeOut {
        #[serde(default)]
        start: Option<f64>,
        #[serde(default)]
        end: Option<f64>,
    },
    FadeInOut {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    FadeOutIn {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Blink {
        #[serde(default)]
        low: Option<f64>,
        #[serde(default)]
        high: Option<f64>,
    },
    Snake,
    SnakeInOut {
        #[serde(default)]
        start: Option<f64>,
        #[serde(default)]
        end: Option<f64>,
    },
    Brightness {
        mult_factor: FloatFunction,
    },
    Hue {
        offset_factor: FloatFunction,
    },
    Saturation {
        mult_factor: FloatFunction,
    },
    Glitter {
        intensity: FloatFunction,
        sat_mult_factor: FloatFunction,
    },
    Alternate {
        number_of_pixels: u32,
        hue_offset: FloatFunction,
        sat_mult: FloatFunction,
        brightness_mult: FloatFunction,
    },
    SegmentWindow {
        start: FloatFunction,
        end: FloatFunction,
    },
}

impl Script {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&raw)
    }

    /// Builds the animation described by this script.
    ///
    /// Only `sync` nodes may appear at the top level; anything else would run
    /// without an animation to record into.
    pub fn compile(&self, stage: &StageConfig) -> Result<Animation> {
        let mut animation = Animation::new(self.name.clone(), self.bpm, self.duration_seconds)?
            .with_start_offset(self.start_offset_seconds);

        for node in &self.nodes {
            match node {
                Node::Sync { body } => animation.sync(|s| run(s, body, stage))?,
                _ => return Err(SequencerError::NoActiveAnimation),
            }
        }

        tracing::info!(
            animation = %self.name,
            effects = animation.recorded().len(),
            "compiled script"
        );
        Ok(animation)
    }
}

fn run(scope: &mut Scope<'_>, nodes: &[Node], stage: &StageConfig) -> Result<()> {
    for node in nodes {
        run_node(scope, node, stage)?;
    }
    Ok(())
}

fn run_node(scope: &mut Scope<'_>, node: &Node, stage: &StageConfig) -> Result<()> {
    match node {
        Node::Sync { .. } => Err(SequencerError::invalid_script(
            "`sync` cannot be nested inside another scope",
        )),
        Node::Beats { start, end, body } => scope.beats(*start, *end, |s| run(s, body, stage)),
        Node::CycleBeats {
            beats_per_cycle,
            start,
            end,
            body,
        } => scope.cycle_beats(*beats_per_cycle, *start, *end, |s| run(s, body, stage)),
        Node::Elements { target, body } => {
            let elements = target.resolve(stage)?;
            scope.targets(elements, |s| run(s, body, stage))
        }
        Node::Segment { name, body } => scope.segment(name.as_str(), |s| run(s, body, stage)),
        Node::Phase { multiplier, body } => scope.phase(*multiplier, |s| run(s, body, stage)),
        leaf => {
            emit_leaf(scope, leaf);
            Ok(())
        }
    }
}

fn emit_leaf(scope: &mut Scope<'_>, node: &Node) {
    match node {
        Node::ConstColor { hue, sat, val } => scope.const_color(*hue, *sat, *val),
        Node::Rainbow => scope.rainbow(),
        Node::FadeIn { start, end } => scope.fade_in(Ramp {
            start: *start,
            end: *end,
        }),
        Node::FadeOut { start, end } => scope.fade_out(Ramp {
            start: *start,
            end: *end,
        }),
        Node::FadeInOut { min, max } => scope.fade_in_out(Swing {
            min: *min,
            max: *max,
        }),
        Node::FadeOutIn { min, max } => scope.fade_out_in(Swing {
            min: *min,
            max: *max,
        }),
        Node::Blink { low, high } => scope.blink(BlinkLevels {
            low: *low,
            high: *high,
        }),
        Node::Snake => scope.snake(),
        Node::SnakeInOut { start, end } => scope.snake_in_out(Ramp {
            start: *start,
            end: *end,
        }),
        Node::Brightness { mult_factor } => scope.brightness(mult_factor.clone()),
        Node::Hue { offset_factor } => scope.hue(offset_factor.clone()),
        Node::Saturation { mult_factor } => scope.saturation(mult_factor.clone()),
        Node::Glitter {
            intensity,
            sat_mult_factor,
        } => scope.glitter(intensity.clone(), sat_mult_factor.clone()),
        Node::Alternate {
            number_of_pixels,
            hue_offset,
            sat_mult,
            brightness_mult,
        } => scope.alternate(
            *number_of_pixels,
            hue_offset.clone(),
            sat_mult.clone(),
            brightness_mult.clone(),
        ),
        Node::SegmentWindow { start, end } => scope.segment_window(start.clone(), end.clone()),
        // Scope nodes are walked by `run_node`.
        Node::Sync { .. }
        | Node::Beats { .. }
        | Node::CycleBeats { .. }
        | Node::Elements { .. }
        | Node::Segment { .. }
        | Node::Phase { .. } => {}
    }
}
