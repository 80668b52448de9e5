//! Scalpmap CLI
//!
//! Runs the band-power topography pipeline on a simulated multichannel
//! block and logs a summary per window. Drawing and recording-file input
//! are external concerns; this driver only exercises the compute path.
//!
//! # Usage
//!
//! ```bash
//! # One window over the whole simulated block
//! scalpmap
//!
//! # Replay the block as 8 consecutive windows (animation-style refresh)
//! scalpmap --windows 8
//!
//! # Alpha band only, coarser grid
//! scalpmap --band-low 8 --band-high 13 --grid 150
//! ```

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use scalpmap_core::layout::ChannelLayout;
use scalpmap_core::spectral::SpectralPowerEstimator;
use scalpmap_core::topomap::TopographicFieldRenderer;
use scalpmap_core::types::{FrequencyBand, SampleBlock};

/// Band-power scalp topography pipeline
#[derive(Parser, Debug)]
#[command(name = "scalpmap")]
#[command(author, version, about = "EEG band-power topographic mapping", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Sampling rate of the simulated block in Hz
    #[arg(long, default_value_t = 128.0)]
    sample_rate: f64,

    /// Lower band edge in Hz
    #[arg(long, default_value_t = 0.5)]
    band_low: f64,

    /// Upper band edge in Hz
    #[arg(long, default_value_t = 30.0)]
    band_high: f64,

    /// Grid resolution of the rendered field
    #[arg(long, default_value_t = 300)]
    grid: usize,

    /// Samples per channel in the simulated block
    #[arg(long, default_value_t = 1024)]
    samples: usize,

    /// Number of consecutive windows to split the block into
    #[arg(long, default_value_t = 1)]
    windows: usize,

    /// Skip the value-range (colorbar) report
    #[arg(long)]
    no_colorbar: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("scalpmap v{}", env!("CARGO_PKG_VERSION"));

    let layout = ChannelLayout::emotiv_epoc();
    let samples = simulate_channels(layout.len(), cli.samples, cli.sample_rate);

    let estimator = SpectralPowerEstimator::new(cli.sample_rate)
        .with_band(FrequencyBand::new(cli.band_low, cli.band_high));
    let renderer = TopographicFieldRenderer::default().with_grid_resolution(cli.grid);

    let windows = cli.windows.max(1);
    let window_len = cli.samples / windows;
    anyhow::ensure!(window_len > 0, "more windows than samples");

    for window in 0..windows {
        let start = window * window_len;
        let rows: Vec<Vec<f64>> = samples
            .iter()
            .map(|ch| ch[start..start + window_len].to_vec())
            .collect();
        let block = SampleBlock::from_rows(rows)?;

        let estimate = estimator.estimate_power(&block)?;
        let frame = renderer.render_field(&estimate.powers, &layout, !cli.no_colorbar)?;

        let finite = frame
            .field
            .values()
            .iter()
            .filter(|v| v.is_finite())
            .count();
        info!(
            window,
            channels = estimate.powers.len(),
            finite_cells = finite,
            "rendered frame"
        );
        if let Some(range) = frame.value_range {
            info!(window, min = range.min, max = range.max, "field value range");
        }
        for (i, &power) in estimate.powers.iter().enumerate() {
            tracing::debug!(channel = layout.name(i), power, "channel band power");
        }
    }

    Ok(())
}

/// Simulated EEG: per-channel phase-shifted mix of alpha (10 Hz) and beta
/// (20 Hz) sinusoids with a weak slow drift.
fn simulate_channels(channels: usize, samples: usize, sample_rate_hz: f64) -> Vec<Vec<f64>> {
    (0..channels)
        .map(|ch| {
            let phase = ch as f64 * 0.5;
            (0..samples)
                .map(|i| {
                    let t = i as f64 / sample_rate_hz;
                    10.0 * (2.0 * std::f64::consts::PI * 10.0 * t + phase).sin()
                        + 5.0 * (2.0 * std::f64::consts::PI * 20.0 * t + phase * 2.0).sin()
                        + 2.0 * (0.3 * t + phase).sin()
                })
                .collect()
        })
        .collect()
}
