use crate::ElementId;

/// Result alias that carries the custom [`SequencerError`] type.
pub type Result<T> = std::result::Result<T, SequencerError>;

/// Common error type for the core crate.
///
/// Every variant is a synchronous construction error. Effects recorded before
/// the failure are left in place, so callers should drop the animation that
/// produced the error instead of trying to continue with it.
#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    /// A scope or emitter was used outside of an active `sync` block.
    #[error("no active animation: scopes and effects must be used inside `sync`")]
    NoActiveAnimation,
    /// A beat window whose end lies before its start, or whose bounds are not
    /// usable beat values.
    #[error("invalid beat range {start}..{end}")]
    InvalidRange { start: f64, end: f64 },
    /// A repeat cycle must span a positive number of beats.
    #[error("invalid cycle length {0}: beats per cycle must be positive")]
    InvalidCycleLength(f64),
    #[error("invalid tempo {0}: bpm must be positive")]
    InvalidTempo(f64),
    #[error("invalid duration {0}: seconds must be finite and not negative")]
    InvalidDuration(f64),
    /// Segment name that the stage does not know about.
    #[error("unknown segment `{0}`")]
    UnknownSegment(String),
    #[error("unknown element `{0}`")]
    UnknownElement(ElementId),
    /// Element that exists on the stage but received no effects.
    #[error("element `{0}` has no effects in this sequence")]
    UntargetedElement(ElementId),
    #[error("unknown element group `{0}`")]
    UnknownGroup(String),
    #[error("invalid script: {0}")]
    InvalidScript(String),
    /// Free-form message for errors that do not warrant their own variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SequencerError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn invalid_script<T: Into<String>>(msg: T) -> Self {
        Self::InvalidScript(msg.into())
    }
}

impl From<&str> for SequencerError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SequencerError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_errors_mention_both_bounds() {
        let err = SequencerError::InvalidRange {
            start: 8.0,
            end: 4.0,
        };
        let text = err.to_string();
        assert!(text.contains('8'));
        assert!(text.contains('4'));
    }

    #[test]
    fn unknown_element_uses_ring_name() {
        let err = SequencerError::UnknownElement(ElementId::new(13));
        assert!(err.to_string().contains("ring13"));
    }

    #[test]
    fn string_conversions_produce_messages() {
        let err: SequencerError = "boom".into();
        assert!(matches!(err, SequencerError::Message(ref m) if m == "boom"));
    }
}
