use std::cmp::Ordering;

use clap::ValueEnum;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};

use super::urgency::EnrichedItem;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ItemFilter {
    #[default]
    All,
    Overdue,
    Autopay,
    Manual,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Due,
    Amount,
    Name,
    Category,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub query: String,
    pub filter: ItemFilter,
    pub sort: SortKey,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ItemFilter {
    pub fn accepts(self, item: &EnrichedItem) -> bool {
        match self {
            Self::All => true,
            Self::Overdue => item.is_overdue(),
            Self::Autopay => item.record.autopay,
            Self::Manual => !item.record.autopay,
        }
    }
}

impl SortKey {
    pub fn compare(self, a: &EnrichedItem, b: &EnrichedItem) -> Ordering {
        match self {
            Self::Due => a.days_remaining.cmp(&b.days_remaining),
            Self::Amount => b.record.amount.total_cmp(&a.record.amount),
            Self::Name => compare_text(&a.record.name, &b.record.name),
            Self::Category => compare_text(a.record.category_label(), b.record.category_label()),
        }
    }
}

/// Case-insensitive ordering, falling back to byte order so `"a"` and `"A"` stay distinct.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Applies query, filter and sort; the sort is stable so ties keep input order.
pub fn select_visible(items: &[EnrichedItem], options: &ViewOptions) -> Vec<EnrichedItem> {
    let matcher = SkimMatcherV2::default();
    let query = options.query.trim();

    let mut visible = items
        .iter()
        .filter(|item| {
            query.is_empty()
                || fuzzy_match_score(&matcher, &item.record.name, query).is_some()
                || fuzzy_match_score(&matcher, item.record.category_label(), query).is_some()
        })
        .filter(|item| options.filter.accepts(item))
        .cloned()
        .collect::<Vec<_>>();

    visible.sort_by(|a, b| options.sort.compare(a, b));
    visible
}
