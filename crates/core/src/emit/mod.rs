//! Effect emitters.
//!
//! Every emitter snapshots the scope's configuration and target set and
//! records exactly one effect payload. Values are passed through as given;
//! colors and multipliers are nominally in `[0, 1]` but nothing is clamped.

use serde::{Deserialize, Serialize};

use crate::{
    effect::{
        Alternate, Brightness, ConstColor, Glitter, Hsv, Hue, Rainbow, Saturation,
        SegmentWindow, Snake,
    },
    scope::Scope,
    EffectKind, FloatFunction,
};

const SNAKE_TAIL_LENGTH: f64 = 0.5;

/// Start and end level of a linear ramp. Omitted values take the emitter's
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
}

impl Ramp {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }
}

/// Lowest and highest level of a there-and-back fade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Swing {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl Swing {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    fn bounds(&self) -> (f64, f64) {
        (self.min.unwrap_or(0.0), self.max.unwrap_or(1.0))
    }
}

/// Off and on levels of a blink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlinkLevels {
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
}

impl BlinkLevels {
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
        }
    }
}

impl Scope<'_> {
    pub fn const_color(&mut self, hue: f64, sat: f64, val: f64) {
        self.emit(EffectKind::ConstColor(ConstColor {
            color: Hsv::new(hue, sat, val),
        }));
    }

    /// Full hue wheel spread over the segment.
    pub fn rainbow(&mut self) {
        self.emit_motion(EffectKind::Rainbow(Rainbow {
            hue_start: FloatFunction::constant(0.0),
            hue_end: FloatFunction::constant(1.0),
        }));
    }

    /// Brightness ramp, `0 -> 1` by default.
    pub fn fade_in(&mut self, ramp: Ramp) {
        let start = ramp.start.unwrap_or(0.0);
        let end = ramp.end.unwrap_or(1.0);
        self.brightness(FloatFunction::linear(start, end));
    }

    /// Brightness ramp, `1 -> 0` by default.
    pub fn fade_out(&mut self, ramp: Ramp) {
        let start = ramp.start.unwrap_or(1.0);
        let end = ramp.end.unwrap_or(0.0);
        self.brightness(FloatFunction::linear(start, end));
    }

    /// Rises from `min` to `max` over the first half, then falls back.
    pub fn fade_in_out(&mut self, swing: Swing) {
        let (min, max) = swing.bounds();
        self.brightness(FloatFunction::half(
            FloatFunction::linear(min, max),
            FloatFunction::linear(max, min),
        ));
    }

    /// Falls from `max` to `min` over the first half, then rises back.
    pub fn fade_out_in(&mut self, swing: Swing) {
        let (min, max) = swing.bounds();
        self.brightness(FloatFunction::half(
            FloatFunction::linear(max, min),
            FloatFunction::linear(min, max),
        ));
    }

    pub fn blink(&mut self, levels: BlinkLevels) {
        self.brightness(FloatFunction::half(
            FloatFunction::constant(levels.low.unwrap_or(0.0)),
            FloatFunction::constant(levels.high.unwrap_or(1.0)),
        ));
    }

    /// A lit run of pixels circling the segment once per window.
    pub fn snake(&mut self) {
        self.emit_motion(EffectKind::Snake(Snake {
            head: FloatFunction::linear(0.0, 1.0),
            tail_length: FloatFunction::constant(SNAKE_TAIL_LENGTH),
            cyclic: true,
        }));
    }

    /// A snake that runs `start -> end` and back again within the window.
    pub fn snake_in_out(&mut self, ramp: Ramp) {
        let start = ramp.start.unwrap_or(0.0);
        let end = ramp.end.unwrap_or(1.0);
        self.emit_motion(EffectKind::Snake(Snake {
            head: FloatFunction::half(
                FloatFunction::linear(start, end),
                FloatFunction::linear(end, start),
            ),
            tail_length: FloatFunction::constant(SNAKE_TAIL_LENGTH),
            cyclic: false,
        }));
    }

    pub fn brightness(&mut self, mult_factor: FloatFunction) {
        self.emit(EffectKind::Brightness(Brightness { mult_factor }));
    }

    pub fn hue(&mut self, offset_factor: FloatFunction) {
        self.emit(EffectKind::Hue(Hue { offset_factor }));
    }

    pub fn saturation(&mut self, mult_factor: FloatFunction) {
        self.emit(EffectKind::Saturation(Saturation { mult_factor }));
    }

    /// Custom snake with explicit curves.
    pub fn snake_with(&mut self, head: FloatFunction, tail_length: FloatFunction, cyclic: bool) {
        self.emit_motion(EffectKind::Snake(Snake {
            head,
            tail_length,
            cyclic,
        }));
    }

    /// Masks the segment down to `start..end`.
    pub fn segment_window(&mut self, start: FloatFunction, end: FloatFunction) {
        self.emit(EffectKind::Segment(SegmentWindow { start, end }));
    }

    pub fn glitter(&mut self, intensity: FloatFunction, sat_mult_factor: FloatFunction) {
        self.emit(EffectKind::Glitter(Glitter {
            intensity,
            sat_mult_factor,
        }));
    }

    pub fn alternate(
        &mut self,
        number_of_pixels: u32,
        hue_offset: FloatFunction,
        sat_mult: FloatFunction,
        brightness_mult: FloatFunction,
    ) {
        self.emit(EffectKind::Alternate(Alternate {
            number_of_pixels,
            hue_offset,
            sat_mult,
            brightness_mult,
        }));
    }
}
