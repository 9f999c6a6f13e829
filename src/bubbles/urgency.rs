use chrono::NaiveDate;
use ecolor::Color32;
use serde::Serialize;

use crate::config::UrgencyConfig;
use crate::error::Result;
use crate::subscription::{SubscriptionRecord, days_between};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Urgency {
    /// Degrees on the color wheel.
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Urgency {
    pub fn css(&self) -> String {
        format!("hsl({} {}% {}%)", self.hue, self.saturation, self.lightness)
    }

    pub fn to_color32(&self) -> Color32 {
        let [r, g, b] = hsl_to_rgb(self.hue, self.saturation / 100.0, self.lightness / 100.0);
        Color32::from_rgb(r, g, b)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedItem {
    pub record: SubscriptionRecord,
    /// Negative when overdue.
    pub days_remaining: i64,
    pub urgency: Urgency,
}

impl EnrichedItem {
    pub fn is_overdue(&self) -> bool {
        self.days_remaining < 0
    }
}

pub fn due_urgency(days_remaining: i64, lookahead: u32, config: &UrgencyConfig) -> Urgency {
    if days_remaining < 0 {
        return Urgency {
            hue: config.overdue_hue,
            saturation: config.saturation,
            lightness: config.overdue_lightness,
        };
    }

    let window = lookahead.max(1);
    let clamped = days_remaining.min(i64::from(window)) as f32;
    let closeness = 1.0 - clamped / window as f32;
    let eased = closeness * closeness * (3.0 - 2.0 * closeness);

    Urgency {
        hue: config.far_hue + (config.near_hue - config.far_hue) * eased,
        saturation: config.saturation,
        lightness: config.lightness,
    }
}

pub fn enrich(
    record: &SubscriptionRecord,
    today: NaiveDate,
    lookahead: u32,
    config: &UrgencyConfig,
) -> Result<EnrichedItem> {
    let due = record.due_date()?;
    let days_remaining = days_between(today, due);

    let mut record = record.clone();
    if !record.amount.is_finite() || record.amount < 0.0 {
        record.amount = 0.0;
    }

    Ok(EnrichedItem {
        record,
        days_remaining,
        urgency: due_urgency(days_remaining, lookahead, config),
    })
}

/// Reads the hue back out of an `hsl(H S% L%)` string.
pub fn hue_of_css(css: &str) -> Option<f32> {
    css.trim()
        .strip_prefix("hsl(")?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [u8; 3] {
    let saturation = saturation.clamp(0.0, 1.0);
    let lightness = lightness.clamp(0.0, 1.0);
    let sector = hue.rem_euclid(360.0) / 60.0;

    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let secondary = chroma * (1.0 - ((sector % 2.0) - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, secondary, 0.0),
        1 => (secondary, chroma, 0.0),
        2 => (0.0, chroma, secondary),
        3 => (0.0, secondary, chroma),
        4 => (secondary, 0.0, chroma),
        _ => (chroma, 0.0, secondary),
    };

    let offset = lightness - chroma / 2.0;
    let channel = |value: f32| ((value + offset) * 255.0).round().clamp(0.0, 255.0) as u8;
    [channel(r), channel(g), channel(b)]
}
