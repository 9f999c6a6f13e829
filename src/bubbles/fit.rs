use emath::{Pos2, pos2};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

use super::pack::PackedLayout;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(Self { width, height })
        } else {
            Err(EngineError::InvalidViewport { width, height })
        }
    }

    pub fn center(self) -> Pos2 {
        pos2(self.width * 0.5, self.height * 0.5)
    }
}

/// Axis-aligned box around every circle of a layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Pos2,
    pub max: Pos2,
}

impl Bounds {
    pub fn of(layout: &PackedLayout) -> Option<Self> {
        let mut min = pos2(f32::INFINITY, f32::INFINITY);
        let mut max = pos2(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for circle in &layout.circles {
            min.x = min.x.min(circle.center.x - circle.radius);
            min.y = min.y.min(circle.center.y - circle.radius);
            max.x = max.x.max(circle.center.x + circle.radius);
            max.y = max.y.max(circle.center.y + circle.radius);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        Some(Self { min, max })
    }

    pub fn width(self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(self) -> Pos2 {
        pos2((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }
}

/// Uniformly enlarges and recenters a layout that leaves space unused.
///
/// Returns the applied scale, `1.0` when the layout was left untouched. A
/// layout is never shrunk.
pub fn fit_to_viewport(layout: &mut PackedLayout, viewport: Viewport) -> f32 {
    let Some(bounds) = Bounds::of(layout) else {
        return 1.0;
    };

    let used_width = bounds.width();
    let used_height = bounds.height();
    if used_width <= 0.0 || used_height <= 0.0 {
        return 1.0;
    }

    let scale = (viewport.width / used_width).min(viewport.height / used_height);
    if !scale.is_finite() || scale <= 1.0 {
        return 1.0;
    }

    let from = bounds.center();
    let to = viewport.center();
    for circle in &mut layout.circles {
        circle.center = to + (circle.center - from) * scale;
        circle.radius *= scale;
    }

    tracing::debug!(scale, used_width, used_height, "layout expanded to fit viewport");
    scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubbles::pack::{LayoutInput, pack_circles, settle_layout};
    use crate::config::PackConfig;

    fn packed(radii: &[f32], viewport: Viewport) -> PackedLayout {
        packed_with(radii, viewport, &PackConfig::default())
    }

    fn packed_with(radii: &[f32], viewport: Viewport, config: &PackConfig) -> PackedLayout {
        let items = radii
            .iter()
            .enumerate()
            .map(|(index, &radius)| LayoutInput {
                id: format!("b{index}"),
                radius,
            })
            .collect::<Vec<_>>();
        pack_circles(&items, viewport.width, viewport.height, config)
    }

    #[test]
    fn viewport_rejects_degenerate_sizes() {
        assert!(Viewport::new(800.0, 520.0).is_ok());
        assert!(Viewport::new(0.0, 520.0).is_err());
        assert!(Viewport::new(800.0, -1.0).is_err());
        assert!(Viewport::new(f32::NAN, 520.0).is_err());
        assert!(Viewport::new(f32::INFINITY, 520.0).is_err());
    }

    #[test]
    fn small_cluster_expands_to_fill_and_stays_inside() {
        let viewport = Viewport::new(400.0, 300.0).unwrap();
        let mut layout = packed(&[40.0, 35.0, 28.0, 24.0, 20.0], viewport);
        let before = layout.clone();

        let scale = fit_to_viewport(&mut layout, viewport);
        assert!(scale > 1.0);

        let bounds = Bounds::of(&layout).unwrap();
        assert!(bounds.min.x >= -1e-2 && bounds.min.y >= -1e-2);
        assert!(bounds.max.x <= viewport.width + 1e-2);
        assert!(bounds.max.y <= viewport.height + 1e-2);
        let filled = (bounds.width() - viewport.width)
            .abs()
            .min((bounds.height() - viewport.height).abs());
        assert!(filled < 1e-2, "neither side touches the viewport");

        for (fitted, original) in layout.circles.iter().zip(&before.circles) {
            assert!((fitted.radius - original.radius * scale).abs() < 1e-3);
        }
        let gap = PackConfig::default().gap;
        assert!(layout.min_clearance(gap).unwrap() + 0.25 >= 0.0);
    }

    #[test]
    fn single_circle_is_centered_and_grown() {
        let viewport = Viewport::new(400.0, 300.0).unwrap();
        let mut layout = packed(&[50.0], viewport);
        let scale = fit_to_viewport(&mut layout, viewport);

        assert_eq!(scale, 3.0);
        assert_eq!(layout.circles[0].center, pos2(200.0, 150.0));
        assert_eq!(layout.circles[0].radius, 150.0);
    }

    #[test]
    fn oversized_layout_is_never_shrunk() {
        let viewport = Viewport::new(100.0, 100.0).unwrap();
        let mut layout = packed(&[80.0], Viewport::new(400.0, 400.0).unwrap());
        let before = layout.clone();

        assert_eq!(fit_to_viewport(&mut layout, viewport), 1.0);
        assert_eq!(layout.circles, before.circles);
    }

    #[test]
    fn empty_and_pointlike_layouts_are_untouched() {
        let viewport = Viewport::new(400.0, 300.0).unwrap();
        let mut empty = PackedLayout::default();
        assert_eq!(fit_to_viewport(&mut empty, viewport), 1.0);

        let mut point = packed(&[0.0], viewport);
        assert_eq!(fit_to_viewport(&mut point, viewport), 1.0);
        assert_eq!(point.circles[0].radius, 0.0);
    }

    #[test]
    fn tight_gaps_survive_large_expansion() {
        for (radii, width, height) in [
            (&[28.0, 28.0, 30.0][..], 1600.0, 1200.0),
            (&[28.0, 42.0, 56.0, 70.0, 84.0][..], 1200.0, 900.0),
        ] {
            for gap in [0.0, 0.05] {
                let config = PackConfig {
                    gap,
                    ..PackConfig::default()
                };
                let viewport = Viewport::new(width, height).unwrap();
                let mut layout = packed_with(radii, viewport, &config);

                let scale = fit_to_viewport(&mut layout, viewport);
                assert!(scale > 1.0);
                assert!(settle_layout(&mut layout, width, height, &config));

                let clearance = layout.min_clearance(gap).unwrap();
                assert!(
                    clearance + 0.25 >= 0.0,
                    "gap {gap} at scale {scale}: clearance {clearance}"
                );
                let bounds = Bounds::of(&layout).unwrap();
                assert!(bounds.min.x >= -1e-2 && bounds.min.y >= -1e-2);
                assert!(bounds.max.x <= width + 1e-2 && bounds.max.y <= height + 1e-2);
            }
        }
    }
}
