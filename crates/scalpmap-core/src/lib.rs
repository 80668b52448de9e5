//! Scalpmap Core - band-power estimation and scalp topography
//!
//! This crate computes per-channel band power from multichannel EEG sample
//! blocks and renders the resulting value set as a circularly masked 2-D
//! scalar field over a fixed sensor layout. It returns pure data; drawing is
//! left to an external adapter.
//!
//! # Modules
//!
//! - [`types`]: Core data types (sample blocks, PSD curves, scalar fields)
//! - [`layout`]: Sensor layouts and the built-in 14-electrode arrangement
//! - [`error`]: Error types for estimation and rendering
//! - [`spectral`]: Welch PSD estimation and band power
//! - [`interp`]: Scattered-data cubic interpolation
//! - [`topomap`]: Topographic field rendering and decoration geometry
//!
//! # Example
//!
//! ```rust
//! use scalpmap_core::layout::ChannelLayout;
//! use scalpmap_core::spectral::SpectralPowerEstimator;
//! use scalpmap_core::topomap::TopographicFieldRenderer;
//! use scalpmap_core::types::SampleBlock;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let layout = ChannelLayout::emotiv_epoc();
//!
//! // 14 channels of a 10 Hz sinusoid sampled at 128 Hz
//! let rows: Vec<Vec<f64>> = (0..layout.len())
//!     .map(|_| {
//!         (0..256)
//!             .map(|i| (2.0 * std::f64::consts::PI * 10.0 * i as f64 / 128.0).sin())
//!             .collect()
//!     })
//!     .collect();
//! let block = SampleBlock::from_rows(rows)?;
//!
//! let estimate = SpectralPowerEstimator::default().estimate_power(&block)?;
//! let frame = TopographicFieldRenderer::default()
//!     .render_field(&estimate.powers, &layout, true)?;
//!
//! assert_eq!(estimate.powers.len(), layout.len());
//! assert_eq!(frame.field.resolution(), 300);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod interp;
pub mod layout;
pub mod spectral;
pub mod topomap;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{RenderError, RenderResult, SpectralError, SpectralResult};
pub use layout::ChannelLayout;
pub use spectral::{SpectralPowerEstimator, WelchConfig};
pub use topomap::{DecorationSet, TopoFrame, TopographicFieldRenderer};
pub use types::{FrequencyBand, PowerEstimate, PsdCurve, SampleBlock, ScalarField, ValueRange};
