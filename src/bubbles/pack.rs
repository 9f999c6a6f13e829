use std::collections::HashMap;

use emath::{Pos2, Vec2, pos2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PackConfig;

/// Float noise ignored when checking whether a pair still overlaps.
const SETTLE_SLACK: f32 = 1e-3;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutInput {
    pub id: String,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PackedCircle {
    pub id: String,
    pub center: Pos2,
    pub radius: f32,
}

/// Packed circles in input order, addressable by id.
#[derive(Clone, Debug, Default)]
pub struct PackedLayout {
    pub circles: Vec<PackedCircle>,
    index_by_id: HashMap<String, usize>,
}

impl PackedLayout {
    fn new(circles: Vec<PackedCircle>) -> Self {
        let index_by_id = circles
            .iter()
            .enumerate()
            .map(|(index, circle)| (circle.id.clone(), index))
            .collect();
        Self {
            circles,
            index_by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PackedCircle> {
        self.index_by_id
            .get(id)
            .and_then(|&index| self.circles.get(index))
    }

    pub fn position(&self, id: &str) -> Option<Pos2> {
        self.get(id).map(|circle| circle.center)
    }

    /// Smallest `distance - (r1 + r2 + gap)` over all pairs; `None` below two circles.
    pub fn min_clearance(&self, gap: f32) -> Option<f32> {
        let mut clearance: Option<f32> = None;
        for (i, a) in self.circles.iter().enumerate() {
            for b in &self.circles[i + 1..] {
                let slack = a.center.distance(b.center) - (a.radius + b.radius + gap);
                clearance = Some(clearance.map_or(slack, |current| current.min(slack)));
            }
        }
        clearance
    }
}

fn clamp_inside(position: &mut Pos2, radius: f32, width: f32, height: f32) {
    if position.x - radius < 0.0 {
        position.x = radius;
    }
    if position.x + radius > width {
        position.x = width - radius;
    }
    if position.y - radius < 0.0 {
        position.y = radius;
    }
    if position.y + radius > height {
        position.y = height - radius;
    }
}

fn spiral_seed(index: usize, center: Pos2, config: &PackConfig) -> Pos2 {
    let angle = index as f32 * config.spiral_angle_step;
    let distance = config.spiral_base_distance + index as f32 * config.spiral_distance_step;
    center + vec2(angle.cos(), angle.sin()) * distance
}

fn escape_direction(rng: &mut StdRng) -> Vec2 {
    let nudge = vec2(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5)) * 1e-3;
    if nudge.length_sq() > 0.0 {
        nudge
    } else {
        vec2(1e-3, 0.0)
    }
}

fn relax(positions: &mut [Pos2], radii: &[f32], width: f32, height: f32, config: &PackConfig) {
    let n = positions.len();
    let center = pos2(width * 0.5, height * 0.5);
    let mut rng = StdRng::seed_from_u64(config.jitter_seed);
    let iterations = config.relax_iterations(n);

    for _ in 0..iterations {
        for i in 0..n {
            for j in (i + 1)..n {
                let mut delta = positions[j] - positions[i];
                let mut distance = delta.length();
                if !distance.is_finite() || distance == 0.0 {
                    delta = escape_direction(&mut rng);
                    distance = delta.length();
                }

                let direction = delta / distance;
                let target = radii[i] + radii[j] + config.gap;
                let surplus = distance - target;

                if surplus < 0.0 {
                    let step = direction * (-surplus * 0.5);
                    positions[i] -= step;
                    positions[j] += step;
                } else if surplus > config.attraction_slack {
                    let step =
                        direction * (surplus * config.attraction_rate).min(config.attraction_max_step);
                    positions[i] += step;
                    positions[j] -= step;
                }
            }
        }

        for (position, &radius) in positions.iter_mut().zip(radii) {
            *position += (center - *position) * config.center_pull;
            clamp_inside(position, radius, width, height);
        }
    }

    tracing::debug!(items = n, iterations, "relaxation finished");
}

/// Returns true once a full pass made no corrections.
fn resolve_overlaps(
    positions: &mut [Pos2],
    radii: &[f32],
    width: f32,
    height: f32,
    config: &PackConfig,
) -> bool {
    let n = positions.len();

    for pass in 0..config.resolve_passes {
        let mut moved = false;

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = positions[j] - positions[i];
                let distance = delta.length();
                let target = radii[i] + radii[j] + config.gap;
                if distance + SETTLE_SLACK >= target - config.resolve_tolerance {
                    continue;
                }

                let direction = if distance > 0.0 {
                    delta / distance
                } else {
                    vec2(1.0, 0.0)
                };
                let step = direction * ((target - distance) * 0.5);
                positions[i] -= step;
                positions[j] += step;
                clamp_inside(&mut positions[i], radii[i], width, height);
                clamp_inside(&mut positions[j], radii[j], width, height);
                moved = true;
            }
        }

        if !moved {
            tracing::debug!(passes = pass + 1, "overlap resolution settled");
            return true;
        }
    }

    false
}

/// Re-runs overlap resolution on an already packed layout, e.g. after the
/// viewport fit has scaled it. Returns true when no pair is left overlapping.
pub fn settle_layout(
    layout: &mut PackedLayout,
    width: f32,
    height: f32,
    config: &PackConfig,
) -> bool {
    if layout.len() < 2 {
        return true;
    }

    let radii = layout
        .circles
        .iter()
        .map(|circle| circle.radius)
        .collect::<Vec<_>>();
    let mut positions = layout
        .circles
        .iter()
        .map(|circle| circle.center)
        .collect::<Vec<_>>();
    let settled = resolve_overlaps(&mut positions, &radii, width, height, config);
    for (circle, position) in layout.circles.iter_mut().zip(positions) {
        circle.center = position;
    }
    settled
}

/// Packs circles into a `width` x `height` canvas without overlap.
///
/// Seeding is a deterministic spiral around the canvas center, followed by a
/// relaxation phase (separation, mild attraction, centering, bounds clamping)
/// and an exact resolution phase that pushes any remaining overlapping pair
/// back to its full separation. Never fails; every input id gets a position.
pub fn pack_circles(
    items: &[LayoutInput],
    width: f32,
    height: f32,
    config: &PackConfig,
) -> PackedLayout {
    let n = items.len();
    if n == 0 {
        return PackedLayout::default();
    }

    let center = pos2(width * 0.5, height * 0.5);
    let radii = items
        .iter()
        .map(|item| {
            if item.radius.is_finite() {
                item.radius.max(0.0)
            } else {
                0.0
            }
        })
        .collect::<Vec<_>>();

    let mut positions = if n == 1 {
        vec![center]
    } else {
        (0..n)
            .map(|index| spiral_seed(index, center, config))
            .collect::<Vec<_>>()
    };

    if n > 1 {
        relax(&mut positions, &radii, width, height, config);
        if !resolve_overlaps(&mut positions, &radii, width, height, config) {
            tracing::warn!(
                items = n,
                passes = config.resolve_passes,
                "overlap resolution did not settle; layout may have residual overlap"
            );
        }
    }

    let circles = items
        .iter()
        .zip(positions)
        .zip(radii)
        .map(|((item, center), radius)| PackedCircle {
            id: item.id.clone(),
            center,
            radius,
        })
        .collect();

    PackedLayout::new(circles)
}
