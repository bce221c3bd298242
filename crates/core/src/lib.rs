//! Core library for the Ring Sequencer.
//!
//! Lighting for a ring installation is authored as nested scopes: time
//! windows measured in beats, repeating cycles inside those windows, and
//! filters selecting which rings and which segments of them are lit. Effects
//! emitted inside the scopes pick up whatever configuration is active at that
//! point, and the finished [`Animation`] is flattened into a [`Sequence`]: one
//! ordered effect list per ring, ready to hand to the rendering service.
//!
//! ```
//! use ring_sequencer_core::{Animation, Result};
//!
//! fn main() -> Result<()> {
//!     let mut animation = Animation::new("demo", 120.0, 10.0)?;
//!     animation.sync(|s| {
//!         s.beats(0.0, 16.0, |s| {
//!             s.elements(&[1, 2], |s| {
//!                 s.const_color(0.5, 1.0, 1.0);
//!                 s.cycle_beats(4.0, 0.0, 1.0, |s| {
//!                     s.blink(Default::default());
//!                     Ok(())
//!                 })
//!             })
//!         })
//!     })?;
//!
//!     let sequence = animation.sequence();
//!     assert_eq!(sequence.ring(1)?.effects.len(), 2);
//!     Ok(())
//! }
//! ```

pub mod animation;
pub mod config;
pub mod effect;
pub mod emit;
pub mod error;
pub mod function;
pub mod scope;
pub mod script;
pub mod target;
pub mod timing;

pub use animation::{Animation, ElementSequence, RecordedEffect, Sequence};
pub use config::{AppConfig, OutputConfig, StageConfig};
pub use effect::{Effect, EffectConfig, EffectKind, Hsv, Repeat};
pub use emit::{BlinkLevels, Ramp, Swing};
pub use error::{Result, SequencerError};
pub use function::FloatFunction;
pub use scope::{Environment, Scope};
pub use script::{Node, Script, Targets};
pub use target::{ElementId, ElementSet, Segment};
pub use timing::{beat_to_ms, Tempo};
