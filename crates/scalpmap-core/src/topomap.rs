//! Topographic field rendering
//!
//! Turns a per-channel power vector into a dense, circularly masked scalar
//! field over the sensor layout, plus the fixed decoration geometry (head
//! circle, ears, nose, sensor markers) needed to draw a scalp map. The
//! renderer returns pure data; painting belongs to an external adapter.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::interp::ScatteredInterpolator;
use crate::layout::ChannelLayout;
use crate::types::{ScalarField, ValueRange};

/// Stacking order for rendered primitives, bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    /// Head outline, ears, and nose, beneath the field
    Underlay,
    /// The filled scalar field
    Field,
    /// Line contours over the field
    Contours,
    /// Sensor markers, above everything
    Markers,
}

/// A circle primitive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    /// Center coordinate
    pub center: (f64, f64),
    /// Radius
    pub radius: f64,
    /// Stacking layer
    pub layer: Layer,
}

/// An axis-aligned ellipse primitive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EllipsePrimitive {
    /// Center coordinate
    pub center: (f64, f64),
    /// Full width
    pub width: f64,
    /// Full height
    pub height: f64,
    /// Stacking layer
    pub layer: Layer,
}

/// A closed polygon primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolygonPrimitive {
    /// Vertices in draw order
    pub vertices: Vec<(f64, f64)>,
    /// Stacking layer
    pub layer: Layer,
}

/// A labelled sensor marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerPrimitive {
    /// Marker coordinate
    pub position: (f64, f64),
    /// Channel name
    pub label: String,
    /// Stacking layer
    pub layer: Layer,
}

/// The fixed geometric decorations of a scalp map.
///
/// Constant for a given layout and renderer geometry, independent of signal
/// data, and cheap to recompute every frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecorationSet {
    /// Head boundary circle
    pub head: CirclePrimitive,
    /// Left and right ear ellipses
    pub ears: [EllipsePrimitive; 2],
    /// Nose triangle above the head
    pub nose: PolygonPrimitive,
    /// One marker per sensor, in channel order
    pub markers: Vec<MarkerPrimitive>,
}

/// One rendered frame: the masked field, its decorations, and (optionally)
/// the scalar range for an external colorbar.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TopoFrame {
    /// The interpolated, masked scalar field
    pub field: ScalarField,
    /// Decoration geometry for the same frame
    pub decorations: DecorationSet,
    /// Range of the finite field cells, when a colorbar was requested
    pub value_range: Option<ValueRange>,
}

/// Renders per-channel scalars as a circularly masked topographic field.
///
/// Stateless between calls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopographicFieldRenderer {
    grid_resolution: usize,
    radius: f64,
    center: (f64, f64),
    span: (f64, f64),
}

impl Default for TopographicFieldRenderer {
    /// 300×300 grid over [-2, 6], head disc of radius 2 centered at (2, 2).
    fn default() -> Self {
        Self {
            grid_resolution: 300,
            radius: 2.0,
            center: (2.0, 2.0),
            span: (-2.0, 6.0),
        }
    }
}

impl TopographicFieldRenderer {
    /// Create a renderer with the default geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the grid resolution (minimum 2).
    #[must_use]
    pub fn with_grid_resolution(mut self, grid_resolution: usize) -> Self {
        self.grid_resolution = grid_resolution.max(2);
        self
    }

    /// Replace the head-disc geometry and bounding span.
    #[must_use]
    pub fn with_geometry(mut self, radius: f64, center: (f64, f64), span: (f64, f64)) -> Self {
        self.radius = radius;
        self.center = center;
        self.span = span;
        self
    }

    /// Render one frame from a power vector and its matching layout.
    ///
    /// Cells outside the head disc (with half a grid cell of tolerance) or
    /// outside the convex hull of the sensor positions are `NaN`.
    ///
    /// # Errors
    ///
    /// [`RenderError::LayoutMismatch`] when the value count differs from the
    /// layout's channel count; [`RenderError::DegenerateLayout`] when the
    /// sensor geometry cannot support cubic interpolation.
    pub fn render_field(
        &self,
        values: &[f64],
        layout: &ChannelLayout,
        draw_colorbar: bool,
    ) -> RenderResult<TopoFrame> {
        if values.len() != layout.len() {
            return Err(RenderError::LayoutMismatch {
                values: values.len(),
                layout: layout.len(),
            });
        }

        let interp = ScatteredInterpolator::fit(layout.positions(), values)?;

        let n = self.grid_resolution;
        let xi = linspace(self.span.0, self.span.1, n);
        let yi = linspace(self.span.0, self.span.1, n);
        let dr = xi[1] - xi[0];
        let (cx, cy) = self.center;

        let mut cells = vec![f64::NAN; n * n];
        for (j, &y) in yi.iter().enumerate() {
            for (i, &x) in xi.iter().enumerate() {
                let r = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                // Half-cell tolerance keeps the mask boundary smooth against
                // grid discretization.
                if r - dr / 2.0 > self.radius {
                    continue;
                }
                cells[j * n + i] = interp.evaluate(x, y);
            }
        }

        let field = ScalarField::new(xi, yi, cells);
        let value_range = if draw_colorbar {
            field.value_range()
        } else {
            None
        };
        let decorations = self.decorations(layout);

        debug!(
            resolution = n,
            channels = layout.len(),
            colorbar = draw_colorbar,
            "rendered topographic field"
        );

        Ok(TopoFrame {
            field,
            decorations,
            value_range,
        })
    }

    /// Decoration geometry for a layout: markers at each sensor position,
    /// head circle of the configured radius, ear ellipses at the left and
    /// right disc edges, and a nose triangle above center.
    #[must_use]
    pub fn decorations(&self, layout: &ChannelLayout) -> DecorationSet {
        let (cx, cy) = self.center;
        let r = self.radius;

        let markers = layout
            .positions()
            .iter()
            .enumerate()
            .map(|(i, &position)| MarkerPrimitive {
                position,
                label: layout.name(i).to_string(),
                layer: Layer::Markers,
            })
            .collect();

        DecorationSet {
            head: CirclePrimitive {
                center: self.center,
                radius: r,
                layer: Layer::Underlay,
            },
            ears: [
                EllipsePrimitive {
                    center: (cx - r, cy),
                    width: 0.2 * r,
                    height: 0.5 * r,
                    layer: Layer::Underlay,
                },
                EllipsePrimitive {
                    center: (cx + r, cy),
                    width: 0.2 * r,
                    height: 0.5 * r,
                    layer: Layer::Underlay,
                },
            ],
            nose: PolygonPrimitive {
                vertices: vec![
                    (cx - 0.2 * r, cy + 0.8 * r),
                    (cx, cy + 1.15 * r),
                    (cx + 0.2 * r, cy + 0.8 * r),
                ],
                layer: Layer::Underlay,
            },
            markers,
        }
    }
}

/// `n` evenly spaced values over `[start, end]`, inclusive.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_equal(a: &ScalarField, b: &ScalarField) -> bool {
        a.values().len() == b.values().len()
            && a.values()
                .iter()
                .zip(b.values().iter())
                .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
    }

    #[test]
    fn test_layout_mismatch_both_directions() {
        let layout = ChannelLayout::emotiv_epoc();
        let renderer = TopographicFieldRenderer::default();

        let err = renderer
            .render_field(&vec![1.0; 13], &layout, true)
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::LayoutMismatch {
                values: 13,
                layout: 14
            }
        );

        let err = renderer
            .render_field(&vec![1.0; 15], &layout, true)
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::LayoutMismatch {
                values: 15,
                layout: 14
            }
        );
    }

    #[test]
    fn test_field_shape_and_mask() {
        let layout = ChannelLayout::emotiv_epoc();
        let renderer = TopographicFieldRenderer::default().with_grid_resolution(120);
        let frame = renderer
            .render_field(&vec![1.0; 14], &layout, false)
            .unwrap();

        let field = &frame.field;
        assert_eq!(field.resolution(), 120);
        assert_eq!(field.values().len(), 120 * 120);

        let dr = field.grid_spacing();
        for (j, &y) in field.yi().iter().enumerate() {
            for (i, &x) in field.xi().iter().enumerate() {
                let r = ((x - 2.0).powi(2) + (y - 2.0).powi(2)).sqrt();
                if r > 2.0 + dr / 2.0 {
                    assert!(field.get(j, i).is_nan(), "cell ({j},{i}) should be masked");
                }
            }
        }
    }

    #[test]
    fn test_center_region_is_finite() {
        let layout = ChannelLayout::emotiv_epoc();
        let frame = TopographicFieldRenderer::default()
            .with_grid_resolution(100)
            .render_field(&vec![1.0; 14], &layout, false)
            .unwrap();

        let field = &frame.field;
        for (j, &y) in field.yi().iter().enumerate() {
            for (i, &x) in field.xi().iter().enumerate() {
                let r = ((x - 2.0).powi(2) + (y - 2.0).powi(2)).sqrt();
                if r < 0.5 {
                    assert!(field.get(j, i).is_finite());
                }
            }
        }
    }

    #[test]
    fn test_uniform_values_give_uniform_interior() {
        let layout = ChannelLayout::emotiv_epoc();
        let frame = TopographicFieldRenderer::default()
            .with_grid_resolution(80)
            .render_field(&vec![3.25; 14], &layout, true)
            .unwrap();

        for &v in frame.field.values() {
            if v.is_finite() {
                assert!((v - 3.25).abs() < 1e-6);
            }
        }
        let range = frame.value_range.unwrap();
        assert!(range.max - range.min < 1e-6);
    }

    #[test]
    fn test_colorbar_opt_out() {
        let layout = ChannelLayout::emotiv_epoc();
        let values: Vec<f64> = (0..14).map(f64::from).collect();
        let renderer = TopographicFieldRenderer::default().with_grid_resolution(60);

        let with_bar = renderer.render_field(&values, &layout, true).unwrap();
        let without = renderer.render_field(&values, &layout, false).unwrap();

        let range = with_bar.value_range.unwrap();
        assert!(range.min <= range.max);
        assert!(without.value_range.is_none());
    }

    #[test]
    fn test_decoration_geometry() {
        let layout = ChannelLayout::emotiv_epoc();
        let deco = TopographicFieldRenderer::default().decorations(&layout);

        assert_eq!(deco.head.center, (2.0, 2.0));
        assert!((deco.head.radius - 2.0).abs() < 1e-12);
        assert_eq!(deco.head.layer, Layer::Underlay);

        // Ears sit at the disc edges, matching the reference geometry
        assert_eq!(deco.ears[0].center, (0.0, 2.0));
        assert_eq!(deco.ears[1].center, (4.0, 2.0));
        assert!((deco.ears[0].width - 0.4).abs() < 1e-12);
        assert!((deco.ears[0].height - 1.0).abs() < 1e-12);

        // Nose apex above center
        assert!((deco.nose.vertices[1].0 - 2.0).abs() < 1e-12);
        assert!((deco.nose.vertices[1].1 - 4.3).abs() < 1e-12);
        assert_eq!(deco.nose.vertices.len(), 3);

        assert_eq!(deco.markers.len(), 14);
        assert!(deco.markers.iter().all(|m| m.layer == Layer::Markers));
        assert_eq!(deco.markers[0].label, "AF3");
        assert_eq!(deco.markers[0].position, (1.0, 3.9));
    }

    #[test]
    fn test_degenerate_layout_fails_hard() {
        let layout = ChannelLayout::new(
            vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)],
            vec!["a".into(), "b".into(), "c".into()],
        );
        let err = TopographicFieldRenderer::default()
            .render_field(&[1.0, 2.0, 3.0], &layout, false)
            .unwrap_err();
        assert!(matches!(err, RenderError::DegenerateLayout { .. }));
    }

    #[test]
    fn test_deterministic_render() {
        let layout = ChannelLayout::emotiv_epoc();
        let values: Vec<f64> = (0..14).map(|i| f64::from(i) * 0.7 + 1.0).collect();
        let renderer = TopographicFieldRenderer::default().with_grid_resolution(64);

        let a = renderer.render_field(&values, &layout, true).unwrap();
        let b = renderer.render_field(&values, &layout, true).unwrap();
        assert!(fields_equal(&a.field, &b.field));
        assert_eq!(a.value_range, b.value_range);
        assert_eq!(a.decorations, b.decorations);
    }

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(-2.0, 6.0, 300);
        assert_eq!(v.len(), 300);
        assert!((v[0] + 2.0).abs() < 1e-12);
        assert!((v[299] - 6.0).abs() < 1e-12);
    }
}
