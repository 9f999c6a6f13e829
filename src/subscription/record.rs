use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

use super::schedule::{DUE_DATE_FORMAT, advance_due};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    #[default]
    Monthly,
    Yearly,
    Custom,
}

impl BillingCycle {
    pub fn label(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }

    /// Unknown labels fall back to monthly.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "weekly" => Self::Weekly,
            "yearly" => Self::Yearly,
            "custom" => Self::Custom,
            _ => Self::Monthly,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub amount: f64,
    pub cycle: BillingCycle,
    /// Only meaningful for [`BillingCycle::Custom`].
    pub interval_days: u32,
    /// Raw calendar date text; parsed on demand so a bad value only affects this record.
    pub next_due: String,
    pub autopay: bool,
}

impl SubscriptionRecord {
    pub fn due_date(&self) -> Result<NaiveDate> {
        parse_calendar_date(&self.next_due).ok_or_else(|| EngineError::InvalidDate {
            id: self.id.clone(),
            value: self.next_due.clone(),
        })
    }

    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    /// Moves the due date forward by one billing cycle.
    pub fn mark_paid(&mut self) -> Result<NaiveDate> {
        let next = advance_due(self.due_date()?, self.cycle, self.interval_days);
        self.next_due = next.format(DUE_DATE_FORMAT).to_string();
        Ok(next)
    }
}

/// Accepts `YYYY-MM-DD` or a timestamp whose time of day is dropped.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|stamp| stamp.date())
}
