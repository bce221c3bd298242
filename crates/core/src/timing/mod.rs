use crate::{Result, SequencerError};

const MS_PER_MINUTE: f64 = 60_000.0;

/// Converts a beat offset into milliseconds at the given tempo.
pub fn beat_to_ms(beat: f64, bpm: f64) -> f64 {
    beat * MS_PER_MINUTE / bpm
}

/// Converts a duration in milliseconds into a (possibly fractional) number of
/// beats at the given tempo.
pub fn ms_to_beats(ms: f64, bpm: f64) -> f64 {
    ms / MS_PER_MINUTE * bpm
}

/// Validated tempo of an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    pub fn new(bpm: f64) -> Result<Self> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(SequencerError::InvalidTempo(bpm));
        }
        Ok(Self { bpm })
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn ms(&self, beat: f64) -> f64 {
        beat_to_ms(beat, self.bpm)
    }

    pub fn beats_in(&self, ms: f64) -> f64 {
        ms_to_beats(ms, self.bpm)
    }

    /// Resolves `start..end` beats into an absolute millisecond window.
    pub fn window(&self, start_beat: f64, end_beat: f64) -> Result<(f64, f64)> {
        check_beat_range(start_beat, end_beat)?;
        Ok((self.ms(start_beat), self.ms(end_beat)))
    }
}

/// Rejects reversed, negative, or non-finite beat ranges.
pub(crate) fn check_beat_range(start: f64, end: f64) -> Result<()> {
    if !start.is_finite() || !end.is_finite() || start < 0.0 || end < start {
        return Err(SequencerError::InvalidRange { start, end });
    }
    Ok(())
}

/// Repeat parameters of a cycle laid over a millisecond window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSpec {
    pub count: f64,
    pub start_fraction: f64,
    pub end_fraction: f64,
}

impl CycleSpec {
    /// Cuts the window `start_ms..end_ms` into cycles of `beats_per_cycle`
    /// beats, highlighting `start_beat..end_beat` of every cycle. The count is
    /// left fractional when the window does not hold a whole number of cycles.
    pub fn over_window(
        tempo: Tempo,
        start_ms: f64,
        end_ms: f64,
        beats_per_cycle: f64,
        start_beat: f64,
        end_beat: f64,
    ) -> Result<Self> {
        if !beats_per_cycle.is_finite() || beats_per_cycle <= 0.0 {
            return Err(SequencerError::InvalidCycleLength(beats_per_cycle));
        }
        check_beat_range(start_beat, end_beat)?;

        let total_beats = tempo.beats_in(end_ms - start_ms);
        Ok(Self {
            count: total_beats / beats_per_cycle,
            start_fraction: start_beat / beats_per_cycle,
            end_fraction: end_beat / beats_per_cycle,
        })
    }
}
