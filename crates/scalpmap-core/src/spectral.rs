//! Welch band-power estimation
//!
//! Per-channel power spectral density via Welch's averaged-periodogram
//! method (Hann-windowed, mean-detrended segments at 50% overlap, one-sided
//! density scaling), followed by an inclusive band mask and a raw sum of the
//! masked bins. The sum is deliberately not a frequency-weighted integral.

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SpectralError, SpectralResult};
use crate::types::{FrequencyBand, PowerEstimate, PsdCurve, SampleBlock};

/// Minimum samples per channel for the method to produce a frequency bin.
const MIN_SAMPLES: usize = 2;

/// Welch segmentation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelchConfig {
    /// Segment length; clamped to the channel length when the block is
    /// shorter than one segment
    pub nperseg: usize,
    /// Samples of overlap between segments; `None` selects 50% overlap
    pub noverlap: Option<usize>,
}

impl Default for WelchConfig {
    fn default() -> Self {
        Self {
            nperseg: 256,
            noverlap: None,
        }
    }
}

/// Per-channel band-power estimator.
///
/// Stateless between calls; each invocation depends only on its inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectralPowerEstimator {
    sample_rate_hz: f64,
    band: FrequencyBand,
    welch: WelchConfig,
}

impl Default for SpectralPowerEstimator {
    /// 128 Hz sampling, 0.5–30 Hz band, default Welch segmentation.
    fn default() -> Self {
        Self::new(128.0)
    }
}

impl SpectralPowerEstimator {
    /// Create an estimator for the given sampling rate with the default
    /// band and segmentation.
    #[must_use]
    pub fn new(sample_rate_hz: f64) -> Self {
        Self {
            sample_rate_hz,
            band: FrequencyBand::default(),
            welch: WelchConfig::default(),
        }
    }

    /// Replace the frequency band of interest.
    #[must_use]
    pub fn with_band(mut self, band: FrequencyBand) -> Self {
        self.band = band;
        self
    }

    /// Replace the Welch segmentation parameters.
    #[must_use]
    pub fn with_welch(mut self, welch: WelchConfig) -> Self {
        self.welch = welch;
        self
    }

    /// The configured frequency band.
    #[must_use]
    pub fn band(&self) -> FrequencyBand {
        self.band
    }

    /// Estimate band power and band-limited PSD for every channel.
    ///
    /// Channels are processed independently; output order matches input
    /// channel order.
    ///
    /// # Errors
    ///
    /// [`SpectralError::InvalidRange`] if the band edges are inverted;
    /// [`SpectralError::InsufficientSamples`] if the block is too short for
    /// the spectral method.
    pub fn estimate_power(&self, block: &SampleBlock) -> SpectralResult<PowerEstimate> {
        self.band.validate()?;

        let n = block.samples_per_channel();
        if n < MIN_SAMPLES {
            return Err(SpectralError::InsufficientSamples {
                got: n,
                need: MIN_SAMPLES,
            });
        }

        let mut powers = Vec::with_capacity(block.channel_count());
        let mut psds = Vec::with_capacity(block.channel_count());
        let mut planner = FftPlanner::new();

        for samples in block.channels() {
            let (freqs, psd) = welch_psd(
                &mut planner,
                samples,
                self.sample_rate_hz,
                self.welch.nperseg,
                self.welch.noverlap,
            );

            let mut band_freqs = Vec::new();
            let mut band_psd = Vec::new();
            for (&f, &p) in freqs.iter().zip(psd.iter()) {
                if self.band.contains(f) {
                    band_freqs.push(f);
                    band_psd.push(p);
                }
            }

            powers.push(band_psd.iter().sum());
            psds.push(PsdCurve {
                frequencies: band_freqs,
                values: band_psd,
            });
        }

        debug!(
            channels = powers.len(),
            samples = n,
            low_hz = self.band.low_hz,
            high_hz = self.band.high_hz,
            "estimated band power"
        );

        Ok(PowerEstimate { powers, psds })
    }
}

/// One-sided Welch PSD of a single channel.
///
/// Returns the frequency axis (`k * fs / nperseg`) and density values. Each
/// segment is mean-detrended, Hann-windowed, and scaled by `1 / (fs * Σw²)`
/// with single-sided doubling away from DC and Nyquist; segment periodograms
/// are averaged.
fn welch_psd(
    planner: &mut FftPlanner<f64>,
    samples: &[f64],
    sample_rate_hz: f64,
    nperseg: usize,
    noverlap: Option<usize>,
) -> (Vec<f64>, Vec<f64>) {
    let nperseg = nperseg.clamp(MIN_SAMPLES, samples.len());
    let noverlap = noverlap.unwrap_or(nperseg / 2).min(nperseg - 1);
    let hop = nperseg - noverlap;

    let window = hann_window(nperseg);
    let win_norm: f64 = window.iter().map(|w| w * w).sum();

    let fft = planner.plan_fft_forward(nperseg);
    let mut buffer = vec![Complex::new(0.0, 0.0); nperseg];
    let mut scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

    let n_freqs = nperseg / 2 + 1;
    let mut accum = vec![0.0; n_freqs];
    let mut segments = 0usize;

    let mut start = 0;
    while start + nperseg <= samples.len() {
        let segment = &samples[start..start + nperseg];
        let mean = segment.iter().sum::<f64>() / nperseg as f64;

        for (dst, (&s, &w)) in buffer.iter_mut().zip(segment.iter().zip(window.iter())) {
            *dst = Complex::new((s - mean) * w, 0.0);
        }
        fft.process_with_scratch(&mut buffer, &mut scratch);

        for (k, acc) in accum.iter_mut().enumerate() {
            let mut p = buffer[k].norm_sqr() / (sample_rate_hz * win_norm);
            if k != 0 && !(nperseg % 2 == 0 && k == nperseg / 2) {
                p *= 2.0;
            }
            *acc += p;
        }

        segments += 1;
        start += hop;
    }

    let inv = 1.0 / segments as f64;
    for v in &mut accum {
        *v *= inv;
    }

    let freqs = (0..n_freqs)
        .map(|k| k as f64 * sample_rate_hz / nperseg as f64)
        .collect();
    (freqs, accum)
}

/// Hann window coefficients.
fn hann_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / (size - 1) as f64).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_block(channels: usize, samples: usize, freq_hz: f64, fs: f64) -> SampleBlock {
        let rows = (0..channels)
            .map(|_| {
                (0..samples)
                    .map(|i| (2.0 * std::f64::consts::PI * freq_hz * i as f64 / fs).sin())
                    .collect()
            })
            .collect();
        SampleBlock::from_rows(rows).unwrap()
    }

    #[test]
    fn test_power_vector_length_and_order() {
        // Channel 1 carries a 4x amplitude sinusoid; its band power must
        // land in slot 1 and dominate slot 0.
        let base: Vec<f64> = (0..512)
            .map(|i| (2.0 * std::f64::consts::PI * 10.0 * i as f64 / 128.0).sin())
            .collect();
        let loud: Vec<f64> = base.iter().map(|s| 4.0 * s).collect();
        let block = SampleBlock::from_rows(vec![base, loud]).unwrap();

        let estimate = SpectralPowerEstimator::default()
            .estimate_power(&block)
            .unwrap();
        assert_eq!(estimate.powers.len(), 2);
        assert_eq!(estimate.psds.len(), 2);
        assert!(estimate.powers[1] > estimate.powers[0] * 10.0);
    }

    #[test]
    fn test_ten_hz_peak() {
        let block = sine_block(1, 512, 10.0, 128.0);
        let estimate = SpectralPowerEstimator::default()
            .estimate_power(&block)
            .unwrap();

        let psd = &estimate.psds[0];
        let peak = psd
            .values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| psd.frequencies[i])
            .unwrap();
        assert!((peak - 10.0).abs() < 1.0);
    }

    #[test]
    fn test_band_power_monotone_in_width() {
        let block = sine_block(3, 384, 10.0, 128.0);

        let narrow = SpectralPowerEstimator::new(128.0)
            .with_band(FrequencyBand::new(8.0, 13.0))
            .estimate_power(&block)
            .unwrap();
        let wide = SpectralPowerEstimator::new(128.0)
            .with_band(FrequencyBand::new(0.5, 30.0))
            .estimate_power(&block)
            .unwrap();
        let full = SpectralPowerEstimator::new(128.0)
            .with_band(FrequencyBand::new(0.0, 1000.0))
            .estimate_power(&block)
            .unwrap();

        for ch in 0..3 {
            assert!(wide.powers[ch] >= narrow.powers[ch]);
            assert!(full.powers[ch] >= wide.powers[ch]);
        }
    }

    #[test]
    fn test_single_bin_band_equals_bin_value() {
        // fs=128, nperseg=256 gives a 0.5 Hz axis, so 10.0 Hz is an exact bin.
        let block = sine_block(1, 256, 10.0, 128.0);

        let full = SpectralPowerEstimator::new(128.0)
            .with_band(FrequencyBand::new(0.0, 64.0))
            .estimate_power(&block)
            .unwrap();
        let bin = full.psds[0]
            .frequencies
            .iter()
            .position(|&f| (f - 10.0).abs() < 1e-12)
            .unwrap();

        let single = SpectralPowerEstimator::new(128.0)
            .with_band(FrequencyBand::new(10.0, 10.0))
            .estimate_power(&block)
            .unwrap();
        assert!((single.powers[0] - full.psds[0].values[bin]).abs() < 1e-12);
    }

    #[test]
    fn test_single_bin_band_off_axis_is_zero() {
        let block = sine_block(1, 256, 10.0, 128.0);
        // 10.1 Hz falls between bins of the 0.5 Hz axis; no bin matches.
        let estimate = SpectralPowerEstimator::new(128.0)
            .with_band(FrequencyBand::new(10.1, 10.1))
            .estimate_power(&block)
            .unwrap();
        assert_eq!(estimate.powers[0], 0.0);
        assert!(estimate.psds[0].frequencies.is_empty());
    }

    #[test]
    fn test_invalid_range_rejected() {
        let block = sine_block(1, 256, 10.0, 128.0);
        let err = SpectralPowerEstimator::new(128.0)
            .with_band(FrequencyBand::new(30.0, 0.5))
            .estimate_power(&block)
            .unwrap_err();
        assert_eq!(
            err,
            SpectralError::InvalidRange {
                low_hz: 30.0,
                high_hz: 0.5
            }
        );
    }

    #[test]
    fn test_insufficient_samples_rejected() {
        let block = SampleBlock::from_rows(vec![vec![1.0]; 14]).unwrap();
        let err = SpectralPowerEstimator::default()
            .estimate_power(&block)
            .unwrap_err();
        assert!(matches!(err, SpectralError::InsufficientSamples { got: 1, .. }));
    }

    #[test]
    fn test_short_block_shrinks_segment() {
        // 100 samples < default nperseg of 256; the segment clamps to the
        // block length and a single periodogram is taken.
        let block = sine_block(2, 100, 10.0, 128.0);
        let estimate = SpectralPowerEstimator::default()
            .estimate_power(&block)
            .unwrap();
        assert_eq!(estimate.powers.len(), 2);
        assert!(estimate.powers[0] > 0.0);
    }

    #[test]
    fn test_deterministic() {
        let block = sine_block(4, 300, 12.0, 128.0);
        let estimator = SpectralPowerEstimator::default();
        let a = estimator.estimate_power(&block).unwrap();
        let b = estimator.estimate_power(&block).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_welch_segment_count() {
        // 512 samples, nperseg 256, hop 128: segments start at 0, 128, 256.
        let mut planner = FftPlanner::new();
        let x: Vec<f64> = (0..512).map(|i| (i as f64 * 0.1).sin()).collect();
        let (freqs, psd) = welch_psd(&mut planner, &x, 128.0, 256, None);
        assert_eq!(freqs.len(), 129);
        assert_eq!(psd.len(), 129);
        assert!((freqs[1] - 0.5).abs() < 1e-12);
        assert!(psd.iter().all(|&p| p >= 0.0));
    }
}
