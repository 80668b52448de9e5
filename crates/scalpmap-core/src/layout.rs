//! Sensor layouts
//!
//! A [`ChannelLayout`] pairs each channel with a fixed 2-D scalp coordinate.
//! The built-in arrangement is the 14-electrode Emotiv EPOC montage; other
//! sensor counts and arrangements are supported by constructing a layout
//! explicitly rather than by editing renderer code.

use serde::{Deserialize, Serialize};

/// Channel names of the 14-electrode Emotiv EPOC montage, in channel order.
pub const EMOTIV_EPOC_NAMES: [&str; 14] = [
    "AF3", "F7", "F3", "FC5", "T7", "P7", "O1", "O2", "P8", "T8", "FC6", "F4", "F8", "AF4",
];

/// Scalp-plane coordinates of the Emotiv EPOC electrodes, matching
/// [`EMOTIV_EPOC_NAMES`]. The head disc is centered at (2, 2) with radius 2.
const EMOTIV_EPOC_POSITIONS: [(f64, f64); 14] = [
    (1.0, 3.9),  // AF3
    (0.1, 3.0),  // F7
    (1.5, 2.8),  // F3
    (0.5, 2.5),  // FC5
    (-0.1, 2.0), // T7
    (0.1, 1.0),  // P7
    (1.5, 0.0),  // O1
    (2.5, 0.0),  // O2
    (3.9, 1.0),  // P8
    (4.1, 2.0),  // T8
    (3.5, 2.5),  // FC6
    (2.5, 2.8),  // F4
    (3.9, 3.0),  // F8
    (3.0, 3.9),  // AF4
];

/// An ordered set of fixed 2-D sensor coordinates, one per channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelLayout {
    positions: Vec<(f64, f64)>,
    names: Vec<String>,
}

impl ChannelLayout {
    /// Create a layout from positions and matching channel names.
    ///
    /// # Panics
    ///
    /// Panics if the two lists have different lengths; pairing them is a
    /// construction-time contract, not a runtime condition.
    #[must_use]
    pub fn new(positions: Vec<(f64, f64)>, names: Vec<String>) -> Self {
        assert_eq!(
            positions.len(),
            names.len(),
            "layout positions and names must pair one-to-one"
        );
        Self { positions, names }
    }

    /// The built-in 14-electrode Emotiv EPOC arrangement.
    #[must_use]
    pub fn emotiv_epoc() -> Self {
        Self {
            positions: EMOTIV_EPOC_POSITIONS.to_vec(),
            names: EMOTIV_EPOC_NAMES.iter().map(ToString::to_string).collect(),
        }
    }

    /// Number of channels in the layout.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the layout has no channels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sensor coordinates in channel order.
    #[must_use]
    pub fn positions(&self) -> &[(f64, f64)] {
        &self.positions
    }

    /// Channel name at the given index.
    #[must_use]
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }
}
