//! Core data types for the estimation and rendering pipeline
//!
//! All types are value-like and independently owned per call; the pipeline
//! retains no state between invocations.

use serde::{Deserialize, Serialize};

use crate::error::{SpectralError, SpectralResult};

/// A block of multichannel samples sharing one implicit sample rate.
///
/// All channels have equal length; ragged input is rejected at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleBlock {
    channels: Vec<Vec<f64>>,
}

impl SampleBlock {
    /// Build a block from per-channel sample rows.
    ///
    /// # Errors
    ///
    /// Returns [`SpectralError::RaggedBlock`] if the rows have unequal
    /// lengths.
    pub fn from_rows(channels: Vec<Vec<f64>>) -> SpectralResult<Self> {
        if let Some(first) = channels.first() {
            let expected = first.len();
            for (channel, row) in channels.iter().enumerate().skip(1) {
                if row.len() != expected {
                    return Err(SpectralError::RaggedBlock {
                        channel,
                        got: row.len(),
                        expected,
                    });
                }
            }
        }
        Ok(Self { channels })
    }

    /// Number of channels in the block.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel.
    #[must_use]
    pub fn samples_per_channel(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Iterate over channels in input order.
    pub fn channels(&self) -> impl Iterator<Item = &[f64]> {
        self.channels.iter().map(Vec::as_slice)
    }
}

/// A closed frequency band `[low_hz, high_hz]`, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    /// Lower band edge in Hz
    pub low_hz: f64,
    /// Upper band edge in Hz
    pub high_hz: f64,
}

impl FrequencyBand {
    /// Create a band from its edges.
    #[must_use]
    pub const fn new(low_hz: f64, high_hz: f64) -> Self {
        Self { low_hz, high_hz }
    }

    /// Whether a frequency falls inside the band (inclusive).
    #[must_use]
    pub fn contains(&self, freq_hz: f64) -> bool {
        freq_hz >= self.low_hz && freq_hz <= self.high_hz
    }

    /// Validate the band edges.
    ///
    /// # Errors
    ///
    /// Returns [`SpectralError::InvalidRange`] if the lower edge exceeds the
    /// upper edge.
    pub fn validate(&self) -> SpectralResult<()> {
        if self.low_hz > self.high_hz {
            return Err(SpectralError::InvalidRange {
                low_hz: self.low_hz,
                high_hz: self.high_hz,
            });
        }
        Ok(())
    }
}

impl Default for FrequencyBand {
    /// 0.5–30 Hz, the conventional broadband EEG range.
    fn default() -> Self {
        Self::new(0.5, 30.0)
    }
}

/// Band-limited power spectral density for one channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PsdCurve {
    /// Frequency axis in Hz, restricted to the requested band
    pub frequencies: Vec<f64>,
    /// Density values parallel to `frequencies`
    pub values: Vec<f64>,
}

impl PsdCurve {
    /// Raw sum of the density values (the band power of this slice).
    #[must_use]
    pub fn total_power(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Estimator output: one power value and one PSD curve per channel,
/// in input channel order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerEstimate {
    /// Aggregate band power per channel
    pub powers: Vec<f64>,
    /// Band-limited PSD per channel
    pub psds: Vec<PsdCurve>,
}

/// Scalar range of the finite cells of a rendered field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Smallest finite cell value
    pub min: f64,
    /// Largest finite cell value
    pub max: f64,
}

/// A dense N×N scalar field with `NaN` sentinels outside the rendered disc
/// and outside the convex hull of the sensor positions.
///
/// Row-major storage; row `j` corresponds to `yi[j]`, column `i` to `xi[i]`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScalarField {
    xi: Vec<f64>,
    yi: Vec<f64>,
    values: Vec<f64>,
}

impl ScalarField {
    pub(crate) fn new(xi: Vec<f64>, yi: Vec<f64>, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), xi.len() * yi.len());
        Self { xi, yi, values }
    }

    /// Grid resolution N (the field is N×N).
    #[must_use]
    pub fn resolution(&self) -> usize {
        self.xi.len()
    }

    /// Horizontal axis values.
    #[must_use]
    pub fn xi(&self) -> &[f64] {
        &self.xi
    }

    /// Vertical axis values.
    #[must_use]
    pub fn yi(&self) -> &[f64] {
        &self.yi
    }

    /// Spacing between adjacent grid cells.
    #[must_use]
    pub fn grid_spacing(&self) -> f64 {
        if self.xi.len() < 2 {
            0.0
        } else {
            self.xi[1] - self.xi[0]
        }
    }

    /// Cell value at (row, column). `NaN` marks masked cells.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.xi.len() + col]
    }

    /// Row-major cell values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Min/max over finite cells, or `None` if every cell is masked.
    #[must_use]
    pub fn value_range(&self) -> Option<ValueRange> {
        let mut range: Option<ValueRange> = None;
        for &v in &self.values {
            if !v.is_finite() {
                continue;
            }
            range = Some(match range {
                None => ValueRange { min: v, max: v },
                Some(r) => ValueRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
            });
        }
        range
    }
}
