use serde::{Deserialize, Serialize};

/// Piecewise value curve evaluated by the renderer over the local phase of an
/// effect's time window. The engine only builds these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatFunction {
    Linear {
        start: f64,
        end: f64,
    },
    #[serde(rename = "const_value")]
    Const {
        value: f64,
    },
    /// Plays `f1` over the first half of the window and `f2` over the second.
    Half {
        f1: Box<FloatFunction>,
        f2: Box<FloatFunction>,
    },
    Sin {
        min: f64,
        max: f64,
        phase: f64,
        repeats: f64,
    },
    Steps {
        num_steps: f64,
        diff_per_step: f64,
        first_step_value: f64,
    },
    Repeat {
        #[serde(rename = "numberOfTimes")]
        times: f64,
        #[serde(rename = "funcToRepeat")]
        function: Box<FloatFunction>,
    },
    /// Weighted sum of two functions.
    Comb2 {
        f1: Box<FloatFunction>,
        amount1: f64,
        f2: Box<FloatFunction>,
        amount2: f64,
    },
}

impl FloatFunction {
    pub fn linear(start: f64, end: f64) -> Self {
        Self::Linear { start, end }
    }

    pub fn constant(value: f64) -> Self {
        Self::Const { value }
    }

    pub fn half(f1: FloatFunction, f2: FloatFunction) -> Self {
        Self::Half {
            f1: Box::new(f1),
            f2: Box::new(f2),
        }
    }

    pub fn sin(min: f64, max: f64, phase: f64, repeats: f64) -> Self {
        Self::Sin {
            min,
            max,
            phase,
            repeats,
        }
    }

    pub fn steps(num_steps: f64, diff_per_step: f64, first_step_value: f64) -> Self {
        Self::Steps {
            num_steps,
            diff_per_step,
            first_step_value,
        }
    }

    pub fn repeat(times: f64, function: FloatFunction) -> Self {
        Self::Repeat {
            times,
            function: Box::new(function),
        }
    }

    pub fn comb2(f1: FloatFunction, amount1: f64, f2: FloatFunction, amount2: f64) -> Self {
        Self::Comb2 {
            f1: Box::new(f1),
            amount1,
            f2: Box::new(f2),
            amount2,
        }
    }

    /// Returns a copy whose output is shifted by `delta` everywhere.
    ///
    /// Sine waves shift their phase instead of their range, so a staggered
    /// wave keeps its amplitude. For `comb2` one operand moves (the first,
    /// or the second when the first is weighted by zero), scaled so the
    /// combined output still shifts by exactly `delta`. A `comb2` with both
    /// weights at zero is constant and stays as is.
    pub fn offset(&self, delta: f64) -> Self {
        if delta == 0.0 {
            return self.clone();
        }
        match self {
            Self::Linear { start, end } => Self::linear(start + delta, end + delta),
            Self::Const { value } => Self::constant(value + delta),
            Self::Half { f1, f2 } => Self::half(f1.offset(delta), f2.offset(delta)),
            Self::Sin {
                min,
                max,
                phase,
                repeats,
            } => Self::sin(*min, *max, phase + delta, *repeats),
            Self::Steps {
                num_steps,
                diff_per_step,
                first_step_value,
            } => Self::steps(*num_steps, *diff_per_step, first_step_value + delta),
            Self::Repeat { times, function } => Self::repeat(*times, function.offset(delta)),
            Self::Comb2 {
                f1,
                amount1,
                f2,
                amount2,
            } => {
                if *amount1 != 0.0 {
                    Self::comb2(f1.offset(delta / amount1), *amount1, (**f2).clone(), *amount2)
                } else if *amount2 != 0.0 {
                    Self::comb2((**f1).clone(), *amount1, f2.offset(delta / amount2), *amount2)
                } else {
                    self.clone()
                }
            }
        }
    }
}

impl From<f64> for FloatFunction {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}
