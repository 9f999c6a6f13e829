use crate::config::RadiusConfig;

use super::fit::Viewport;

/// Largest bubble radius the viewport allows, never below the configured minimum.
pub fn max_radius(viewport: Viewport, config: &RadiusConfig) -> f32 {
    let by_viewport = (viewport.width.min(viewport.height) * config.max_fraction).floor();
    by_viewport.min(config.max_ceiling).max(config.min_radius)
}

/// Linear amount → radius mapping over the observed amount range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusScale {
    min_amount: f64,
    max_amount: f64,
    min_radius: f32,
    max_radius: f32,
}

impl RadiusScale {
    pub fn new<I>(amounts: I, viewport: Viewport, config: &RadiusConfig) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min_amount = f64::INFINITY;
        let mut max_amount = f64::NEG_INFINITY;
        for amount in amounts.into_iter().filter(|amount| amount.is_finite()) {
            min_amount = min_amount.min(amount);
            max_amount = max_amount.max(amount);
        }
        if !min_amount.is_finite() || !max_amount.is_finite() {
            min_amount = 0.0;
            max_amount = 0.0;
        }

        Self {
            min_amount,
            max_amount,
            min_radius: config.min_radius,
            max_radius: max_radius(viewport, config),
        }
    }

    pub fn range(&self) -> (f32, f32) {
        (self.min_radius, self.max_radius)
    }

    pub fn radius(&self, amount: f64) -> f32 {
        let span = self.max_amount - self.min_amount;
        if span.abs() < f64::EPSILON {
            return (self.min_radius + self.max_radius) * 0.5;
        }

        let amount = if amount.is_finite() { amount } else { 0.0 };
        let t = ((amount - self.min_amount) / span).clamp(0.0, 1.0) as f32;
        self.min_radius + (self.max_radius - self.min_radius) * t
    }
}
