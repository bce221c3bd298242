use serde::{Deserialize, Serialize};

use crate::{timing::CycleSpec, FloatFunction, Result, Segment, SequencerError};

/// Repeat metadata of an effect: the window is cut into `count` cycles and the
/// effect plays on `start..end` (as fractions) of every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Repeat {
    #[serde(rename = "repeat_num")]
    pub count: f64,
    #[serde(rename = "repeat_start")]
    pub start_fraction: f64,
    #[serde(rename = "repeat_end")]
    pub end_fraction: f64,
}

impl From<CycleSpec> for Repeat {
    fn from(cycle: CycleSpec) -> Self {
        Self {
            count: cycle.count,
            start_fraction: cycle.start_fraction,
            end_fraction: cycle.end_fraction,
        }
    }
}

/// Time window, segment filter and optional repeat of an effect.
///
/// The three repeat fields are read back all together or not at all; a
/// partial set is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEffectConfig")]
pub struct EffectConfig {
    #[serde(rename = "start_time")]
    pub start_time_ms: f64,
    #[serde(rename = "end_time")]
    pub end_time_ms: f64,
    #[serde(rename = "segments")]
    pub segment: Segment,
    #[serde(flatten)]
    pub repeat: Option<Repeat>,
}

#[derive(Deserialize)]
struct RawEffectConfig {
    start_time: f64,
    end_time: f64,
    segments: Segment,
    repeat_num: Option<f64>,
    repeat_start: Option<f64>,
    repeat_end: Option<f64>,
}

impl TryFrom<RawEffectConfig> for EffectConfig {
    type Error = SequencerError;

    fn try_from(raw: RawEffectConfig) -> Result<Self> {
        let repeat = match (raw.repeat_num, raw.repeat_start, raw.repeat_end) {
            (None, None, None) => None,
            (Some(count), Some(start_fraction), Some(end_fraction)) => Some(Repeat {
                count,
                start_fraction,
                end_fraction,
            }),
            _ => {
                return Err(SequencerError::msg(
                    "repeat_num, repeat_start and repeat_end must be given together",
                ))
            }
        };
        Ok(Self {
            start_time_ms: raw.start_time,
            end_time_ms: raw.end_time,
            segment: raw.segments,
            repeat,
        })
    }
}

impl EffectConfig {
    /// Full-segment, non-repeating window.
    pub fn window(start_time_ms: f64, end_time_ms: f64) -> Self {
        Self {
            start_time_ms,
            end_time_ms,
            segment: Segment::default(),
            repeat: None,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.end_time_ms - self.start_time_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub hue: f64,
    pub sat: f64,
    pub val: f64,
}

impl Hsv {
    pub fn new(hue: f64, sat: f64, val: f64) -> Self {
        Self { hue, sat, val }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstColor {
    pub color: Hsv,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rainbow {
    pub hue_start: FloatFunction,
    pub hue_end: FloatFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brightness {
    pub mult_factor: FloatFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hue {
    pub offset_factor: FloatFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Saturation {
    pub mult_factor: FloatFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    pub head: FloatFunction,
    pub tail_length: FloatFunction,
    pub cyclic: bool,
}

/// Lights only the `start..end` portion of the segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentWindow {
    pub start: FloatFunction,
    pub end: FloatFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glitter {
    pub intensity: FloatFunction,
    pub sat_mult_factor: FloatFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternate {
    #[serde(rename = "numberOfPixels")]
    pub number_of_pixels: u32,
    pub hue_offset: FloatFunction,
    pub sat_mult: FloatFunction,
    pub brightness_mult: FloatFunction,
}

/// Payload of an effect. Exactly one kind per effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    ConstColor(ConstColor),
    Rainbow(Rainbow),
    Brightness(Brightness),
    Hue(Hue),
    Saturation(Saturation),
    Snake(Snake),
    Segment(SegmentWindow),
    Glitter(Glitter),
    Alternate(Alternate),
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConstColor(_) => "const_color",
            Self::Rainbow(_) => "rainbow",
            Self::Brightness(_) => "brightness",
            Self::Hue(_) => "hue",
            Self::Saturation(_) => "saturation",
            Self::Snake(_) => "snake",
            Self::Segment(_) => "segment",
            Self::Glitter(_) => "glitter",
            Self::Alternate(_) => "alternate",
        }
    }

    /// Copy with every curve shifted by `delta`. Used to stagger motion
    /// across elements; literal colors and pixel counts are left alone.
    pub fn offset(&self, delta: f64) -> Self {
        match self {
            Self::ConstColor(c) => Self::ConstColor(c.clone()),
            Self::Rainbow(r) => Self::Rainbow(Rainbow {
                hue_start: r.hue_start.offset(delta),
                hue_end: r.hue_end.offset(delta),
            }),
            Self::Brightness(b) => Self::Brightness(Brightness {
                mult_factor: b.mult_factor.offset(delta),
            }),
            Self::Hue(h) => Self::Hue(Hue {
                offset_factor: h.offset_factor.offset(delta),
            }),
            Self::Saturation(s) => Self::Saturation(Saturation {
                mult_factor: s.mult_factor.offset(delta),
            }),
            // Only the head travels; the tail length stays fixed.
            Self::Snake(s) => Self::Snake(Snake {
                head: s.head.offset(delta),
                tail_length: s.tail_length.clone(),
                cyclic: s.cyclic,
            }),
            Self::Segment(s) => Self::Segment(SegmentWindow {
                start: s.start.offset(delta),
                end: s.end.offset(delta),
            }),
            Self::Glitter(g) => Self::Glitter(Glitter {
                intensity: g.intensity.offset(delta),
                sat_mult_factor: g.sat_mult_factor.clone(),
            }),
            Self::Alternate(a) => Self::Alternate(Alternate {
                number_of_pixels: a.number_of_pixels,
                hue_offset: a.hue_offset.offset(delta),
                sat_mult: a.sat_mult.clone(),
                brightness_mult: a.brightness_mult.clone(),
            }),
        }
    }
}

/// One emitted effect: the configuration snapshot taken at emission time plus
/// its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub effect_config: EffectConfig,
    #[serde(flatten)]
    pub kind: EffectKind,
}

impl Effect {
    pub fn new(effect_config: EffectConfig, kind: EffectKind) -> Self {
        Self {
            effect_config,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn effect_serializes_with_a_single_payload_key() {
        let effect = Effect::new(
            EffectConfig::window(0.0, 500.0),
            EffectKind::ConstColor(ConstColor {
                color: Hsv::new(0.5, 1.0, 1.0),
            }),
        );
        let value = serde_json::to_value(&effect).unwrap();
        assert_eq!(
            value,
            json!({
                "effect_config": { "start_time": 0.0, "end_time": 500.0, "segments": "all" },
                "const_color": { "color": { "hue": 0.5, "sat": 1.0, "val": 1.0 } }
            })
        );
    }

    #[test]
    fn repeat_fields_are_emitted_together() {
        let mut config = EffectConfig::window(0.0, 1000.0);
        config.repeat = Some(Repeat {
            count: 4.0,
            start_fraction: 0.0,
            end_fraction: 0.5,
        });
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["repeat_num"], json!(4.0));
        assert_eq!(value["repeat_start"], json!(0.0));
        assert_eq!(value["repeat_end"], json!(0.5));
    }

    #[test]
    fn repeat_fields_are_read_all_or_nothing() {
        let full: EffectConfig = serde_json::from_value(json!({
            "start_time": 0.0, "end_time": 1000.0, "segments": "all",
            "repeat_num": 4.0, "repeat_start": 0.0, "repeat_end": 0.5
        }))
        .unwrap();
        assert_eq!(full.repeat.map(|r| r.count), Some(4.0));

        let partial = serde_json::from_value::<EffectConfig>(json!({
            "start_time": 0.0, "end_time": 1000.0, "segments": "all",
            "repeat_num": 4.0
        }));
        let err = partial.unwrap_err().to_string();
        assert!(err.contains("repeat_num"), "{err}");
    }

    #[test]
    fn alternate_uses_renderer_field_names() {
        let kind = EffectKind::Alternate(Alternate {
            number_of_pixels: 3,
            hue_offset: 0.1.into(),
            sat_mult: 1.0.into(),
            brightness_mult: 1.0.into(),
        });
        let value = serde_json::to_value(&kind).unwrap();
        assert_eq!(value["alternate"]["numberOfPixels"], json!(3));
    }

    #[test]
    fn deserializes_renderer_payloads() {
        let effect: Effect = serde_json::from_value(json!({
            "effect_config": { "start_time": 0.0, "end_time": 10.0, "segments": "arc" },
            "snake": {
                "head": { "linear": { "start": 0.0, "end": 1.0 } },
                "tail_length": { "const_value": { "value": 0.5 } },
                "cyclic": true
            }
        }))
        .unwrap();
        assert_eq!(effect.kind.name(), "snake");
        assert_eq!(effect.effect_config.segment.as_str(), "arc");
        assert!(effect.effect_config.repeat.is_none());
    }

    #[test]
    fn offset_moves_snake_head_only() {
        let kind = EffectKind::Snake(Snake {
            head: FloatFunction::linear(0.0, 1.0),
            tail_length: FloatFunction::constant(0.5),
            cyclic: true,
        });
        match kind.offset(0.25) {
            EffectKind::Snake(snake) => {
                assert_eq!(snake.head, FloatFunction::linear(0.25, 1.25));
                assert_eq!(snake.tail_length, FloatFunction::constant(0.5));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }
}
