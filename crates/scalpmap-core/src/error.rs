//! Error types for spectral estimation and topographic rendering
//!
//! All variants are local precondition violations on a pure computation and
//! are surfaced immediately; there is no recovered or partial output for a
//! malformed scientific result. `NaN` cells in a rendered field are an
//! expected output state, not an error.

use thiserror::Error;

/// Errors from band-power estimation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectralError {
    /// Frequency band lower edge exceeds the upper edge
    #[error("Invalid frequency range: {low_hz} Hz > {high_hz} Hz")]
    InvalidRange {
        /// Lower band edge in Hz
        low_hz: f64,
        /// Upper band edge in Hz
        high_hz: f64,
    },

    /// Sample block too short for the spectral method to produce a bin
    #[error("Insufficient samples: got {got}, need at least {need}")]
    InsufficientSamples {
        /// Number of samples per channel in the block
        got: usize,
        /// Minimum number of samples required
        need: usize,
    },

    /// Channels of unequal length in one block
    #[error("Ragged sample block: channel {channel} has {got} samples, expected {expected}")]
    RaggedBlock {
        /// Index of the offending channel
        channel: usize,
        /// Length of the offending channel
        got: usize,
        /// Length of the first channel
        expected: usize,
    },
}

/// Errors from topographic field rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Power-value count does not match the layout's channel count
    #[error("Layout mismatch: {values} power values for {layout} layout positions")]
    LayoutMismatch {
        /// Number of power values supplied
        values: usize,
        /// Number of positions in the layout
        layout: usize,
    },

    /// Interpolation is undefined for the given sensor geometry
    #[error("Degenerate layout: {reason}")]
    DegenerateLayout {
        /// Description of the degeneracy
        reason: String,
    },
}

/// Result type for estimation operations
pub type SpectralResult<T> = Result<T, SpectralError>;

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
