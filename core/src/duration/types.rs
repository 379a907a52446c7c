//! duration/types.rs

/// Failures of the duration grammar. All are deterministic in the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    /// Empty input string.
    #[error("invalid duration: empty string")]
    Empty,

    /// A component does not start with a digit or '.', or has neither an
    /// integer nor a fractional part.
    #[error("invalid duration: {input:?}")]
    Invalid { input: String },

    /// Unit suffix outside ns/us/µs/μs/ms/s/m/h.
    #[error("invalid duration: unknown unit {unit:?} in {input:?}")]
    UnknownUnit { unit: String, input: String },

    /// Integer scan, unit scaling, or the running total left the i64 range.
    #[error("invalid duration: {input:?} overflows")]
    Overflow { input: String },
}
