use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::util::coerce_amount;

use super::record::{BillingCycle, SubscriptionRecord};
use super::schedule::{DEFAULT_INTERVAL_DAYS, DUE_DATE_FORMAT};

#[derive(Clone, Debug, Default, Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    name: Value,
    #[serde(default)]
    category: Value,
    #[serde(default)]
    amount: Value,
    #[serde(default)]
    cycle: Value,
    #[serde(default, rename = "intervalDays", alias = "interval_days")]
    interval_days: Value,
    #[serde(default, rename = "nextDue", alias = "next_due")]
    next_due: Value,
    #[serde(default)]
    autopay: Value,
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn interval(value: &Value) -> u32 {
    let days = match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|days| *days >= 1.0).map(|days| days as u64)),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };

    days.and_then(|days| u32::try_from(days).ok())
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_INTERVAL_DAYS)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn normalize_record(index: usize, raw: RawRecord, today: NaiveDate) -> SubscriptionRecord {
    SubscriptionRecord {
        id: text(&raw.id).unwrap_or_else(|| format!("item-{index}")),
        name: text(&raw.name).unwrap_or_default(),
        category: text(&raw.category),
        amount: coerce_amount(&raw.amount),
        cycle: raw
            .cycle
            .as_str()
            .map(BillingCycle::from_label)
            .unwrap_or_default(),
        interval_days: interval(&raw.interval_days),
        next_due: text(&raw.next_due)
            .unwrap_or_else(|| today.format(DUE_DATE_FORMAT).to_string()),
        autopay: truthy(&raw.autopay),
    }
}

/// Parses an exported record list, either a bare array or `{ "subscriptions": [...] }`.
pub fn parse_records(raw: &str, today: NaiveDate) -> Result<Vec<SubscriptionRecord>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in subscription list")?;

    let entries = match &parsed {
        Value::Array(entries) => entries,
        Value::Object(object) => object
            .get("subscriptions")
            .or_else(|| object.get("items"))
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("subscription object has no `subscriptions` array"))?,
        _ => return Err(anyhow!("unexpected JSON type for subscription list")),
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match RawRecord::deserialize(entry) {
            Ok(raw) => records.push(normalize_record(index, raw, today)),
            Err(error) => {
                tracing::warn!(index, %error, "skipping malformed subscription entry");
            }
        }
    }

    Ok(records)
}

pub fn load_records<P: AsRef<Path>>(path: P, today: NaiveDate) -> Result<Vec<SubscriptionRecord>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read subscription list {}", path.display()))?;
    parse_records(&raw, today)
        .with_context(|| format!("failed to parse subscription list {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn normalizes_sparse_entries() {
        let records = parse_records(
            r#"[
                { "name": "Netflix", "amount": 15.99, "cycle": "monthly", "nextDue": "2025-01-06", "autopay": true },
                { "id": "vpn", "amount": "4.50", "cycle": "CUSTOM", "intervalDays": 0 },
                { "id": 7, "amount": "free", "category": "", "autopay": "yes" }
            ]"#,
            today(),
        )
        .unwrap();

        assert_eq!(records.len(), 3);

        assert_eq!(records[0].id, "item-0");
        assert_eq!(records[0].name, "Netflix");
        assert!(records[0].autopay);

        assert_eq!(records[1].id, "vpn");
        assert_eq!(records[1].amount, 4.5);
        assert_eq!(records[1].cycle, BillingCycle::Custom);
        assert_eq!(records[1].interval_days, 30);
        assert_eq!(records[1].next_due, "2025-01-01");
        assert!(!records[1].autopay);

        assert_eq!(records[2].id, "7");
        assert_eq!(records[2].amount, 0.0);
        assert_eq!(records[2].category, None);
        assert_eq!(records[2].cycle, BillingCycle::Monthly);
        assert!(records[2].autopay);
    }

    #[test]
    fn accepts_wrapped_lists_and_snake_case() {
        let records = parse_records(
            r#"{ "subscriptions": [ { "id": "gym", "interval_days": 14, "next_due": "2025-02-01" } ] }"#,
            today(),
        )
        .unwrap();

        assert_eq!(records[0].interval_days, 14);
        assert_eq!(records[0].next_due, "2025-02-01");
    }

    #[test]
    fn keeps_unparsable_dates_for_later_reporting() {
        let records =
            parse_records(r#"[ { "id": "x", "nextDue": "someday" } ]"#, today()).unwrap();
        assert_eq!(records[0].next_due, "someday");
        assert!(records[0].due_date().is_err());
    }

    #[test]
    fn skips_non_object_entries() {
        let records = parse_records(r#"[ 42, { "id": "ok" } ]"#, today()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "ok");
    }

    #[test]
    fn rejects_invalid_documents() {
        assert!(parse_records("{", today()).is_err());
        assert!(parse_records("\"text\"", today()).is_err());
        assert!(parse_records(r#"{ "other": [] }"#, today()).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = load_records(dir.path().join("missing.json"), today()).unwrap_err();
        assert!(format!("{error:#}").contains("failed to read subscription list"));
    }
}
