//! Error types for configuring and running stability-point simulations.

use thiserror::Error;

/// Configuration errors raised before any study is simulated.
///
/// Once a batch has been validated the simulation itself cannot fail: studies
/// that never reach the corridor are reported as data, and cancellation is
/// reported through [`BatchOutcome::Aborted`](crate::BatchOutcome::Aborted).
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The two population vectors differ in length
    #[error("length mismatch: x has {x} values, y has {y}")]
    LengthMismatch {
        /// Length of the first vector
        x: usize,
        /// Length of the second vector
        y: usize,
    },

    /// Minimum sample size is zero or exceeds the maximum
    #[error("invalid sample sizes: need 0 < min <= max, got min = {min}, max = {max}")]
    InvalidSampleSizes {
        /// Requested minimum sample size
        min: usize,
        /// Requested maximum sample size
        max: usize,
    },

    /// Maximum sample size cannot be represented as a 32-bit result
    #[error("sample_size_max = {max} does not fit a 32-bit signed integer")]
    SampleSizeTooLarge {
        /// Requested maximum sample size
        max: usize,
    },

    /// Not enough population elements to draw without replacement
    #[error("population of {population} cannot supply {required} draws without replacement")]
    PopulationTooSmall {
        /// Population length
        population: usize,
        /// Number of draws per study
        required: usize,
    },

    /// The population holds no elements at all
    #[error("population is empty")]
    EmptyPopulation,

    /// Corridor bounds are not finite, inverted, or outside [-1, 1]
    #[error("invalid corridor [{lower}, {upper}]: need -1 <= lower <= upper <= 1")]
    InvalidCorridor {
        /// Lower limit
        lower: f64,
        /// Upper limit
        upper: f64,
    },

    /// Precision used to build a corridor is negative or not finite
    #[error("invalid precision {0}: must be finite and non-negative")]
    InvalidPrecision(f64),

    /// Abort polling cadence of zero
    #[error("check interval must be positive")]
    InvalidCheckInterval,

    /// Confidence level outside [0, 1]
    #[error("invalid confidence level {0}: must lie in [0, 1]")]
    InvalidConfidenceLevel(f64),
}

/// Result type alias using the crate [`Error`]
pub type Result<T> = core::result::Result<T, Error>;
