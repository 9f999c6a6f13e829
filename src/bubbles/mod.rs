mod fit;
mod pack;
mod radius;
mod urgency;
mod view;

use chrono::NaiveDate;
use emath::Pos2;
use serde::Serialize;

use crate::config::{EngineConfig, UrgencyConfig};
use crate::subscription::SubscriptionRecord;

pub use fit::{Bounds, Viewport, fit_to_viewport};
pub use pack::{LayoutInput, PackedCircle, PackedLayout, pack_circles, settle_layout};
pub use radius::{RadiusScale, max_radius};
pub use urgency::{EnrichedItem, Urgency, due_urgency, enrich, hue_of_css};
pub use view::{ItemFilter, SortKey, ViewOptions, select_visible};

/// Everything a renderer needs to draw one payment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bubble {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub center: Pos2,
    pub radius: f32,
    pub days_remaining: i64,
    pub color: String,
    pub rgb: [u8; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RejectedItem {
    pub id: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BubbleScene {
    pub viewport: Viewport,
    /// Expansion applied by the viewport fit, `1.0` when none.
    pub scale: f32,
    pub bubbles: Vec<Bubble>,
    pub rejected: Vec<RejectedItem>,
}

impl BubbleScene {
    pub fn get(&self, id: &str) -> Option<&Bubble> {
        self.bubbles.iter().find(|bubble| bubble.id == id)
    }
}

/// Enriches every record, setting aside the ones whose due date cannot be read.
pub fn enrich_all(
    records: &[SubscriptionRecord],
    today: NaiveDate,
    lookahead: u32,
    config: &UrgencyConfig,
) -> (Vec<EnrichedItem>, Vec<RejectedItem>) {
    let mut enriched = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        match enrich(record, today, lookahead, config) {
            Ok(item) => enriched.push(item),
            Err(error) => {
                tracing::warn!(id = %record.id, %error, "excluding subscription from layout");
                rejected.push(RejectedItem {
                    id: record.id.clone(),
                    reason: error.to_string(),
                });
            }
        }
    }

    (enriched, rejected)
}

/// Runs enrich → select → radius → pack → fit → settle from scratch.
pub fn compute_scene(
    records: &[SubscriptionRecord],
    options: &ViewOptions,
    today: NaiveDate,
    viewport: Viewport,
    config: &EngineConfig,
) -> BubbleScene {
    let (enriched, rejected) = enrich_all(records, today, config.lookahead(), &config.urgency);
    let visible = select_visible(&enriched, options);

    let scale = RadiusScale::new(
        visible.iter().map(|item| item.record.amount),
        viewport,
        &config.radius,
    );
    let inputs = visible
        .iter()
        .map(|item| LayoutInput {
            id: item.record.id.clone(),
            radius: scale.radius(item.record.amount),
        })
        .collect::<Vec<_>>();

    let mut layout = pack_circles(&inputs, viewport.width, viewport.height, &config.pack);
    let applied = fit_to_viewport(&mut layout, viewport);
    // Scaling also scales the resolution tolerance; settle again at the final size.
    if applied > 1.0
        && !settle_layout(&mut layout, viewport.width, viewport.height, &config.pack)
    {
        tracing::warn!(scale = applied, "overlap resolution did not settle after fit");
    }

    let bubbles = visible
        .into_iter()
        .zip(layout.circles)
        .map(|(item, circle)| {
            let color = item.urgency.to_color32();
            Bubble {
                id: circle.id,
                name: item.record.name,
                amount: item.record.amount,
                center: circle.center,
                radius: circle.radius,
                days_remaining: item.days_remaining,
                color: item.urgency.css(),
                rgb: [color.r(), color.g(), color.b()],
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        visible = bubbles.len(),
        rejected = rejected.len(),
        scale = applied,
        "bubble scene computed"
    );

    BubbleScene {
        viewport,
        scale: applied,
        bubbles,
        rejected,
    }
}
