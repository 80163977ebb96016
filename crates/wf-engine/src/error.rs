//! Wake engine errors.

use thiserror::Error;

/// Result type for engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failure of a single engine call.
///
/// Callers treat every variant as recoverable at the call site: a sweep
/// records a zero sample, a single-shot analysis reports a degraded status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The request cannot be simulated (empty axis, mismatched layout, ...).
    #[error("Invalid request: {what}")]
    InvalidRequest { what: &'static str },

    /// Physically meaningless input such as a negative wind speed.
    #[error("Non-physical input for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    /// The engine produced an array whose rank is not 1, 2 or 3.
    #[error("Unsupported power tensor rank: {rank}")]
    UnsupportedRank { rank: usize },

    /// Turbine curve tables are malformed.
    #[error("Invalid turbine model: {what}")]
    InvalidTurbine { what: &'static str },

    /// Anything else raised by an engine implementation.
    #[error("Engine failure: {message}")]
    Backend { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EngineError::NonPhysical {
            what: "wind speed",
            value: -3.0,
        };
        assert!(err.to_string().contains("wind speed"));

        let err = EngineError::Backend {
            message: "solver diverged".into(),
        };
        assert!(err.to_string().contains("diverged"));
    }
}
