use chrono::{Days, Months, NaiveDate};

use super::record::{BillingCycle, SubscriptionRecord};

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_INTERVAL_DAYS: u32 = 30;
/// Average number of weeks in a calendar month.
pub const WEEKS_PER_MONTH: f64 = 4.34524;

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

fn effective_interval(interval_days: u32) -> u32 {
    if interval_days == 0 {
        DEFAULT_INTERVAL_DAYS
    } else {
        interval_days
    }
}

/// Month arithmetic clamps to the last day of shorter months.
pub fn advance_due(date: NaiveDate, cycle: BillingCycle, interval_days: u32) -> NaiveDate {
    let next = match cycle {
        BillingCycle::Weekly => date.checked_add_days(Days::new(7)),
        BillingCycle::Monthly => date.checked_add_months(Months::new(1)),
        BillingCycle::Yearly => date.checked_add_months(Months::new(12)),
        BillingCycle::Custom => {
            date.checked_add_days(Days::new(u64::from(effective_interval(interval_days))))
        }
    };
    next.unwrap_or(date)
}

pub fn monthly_equivalent(amount: f64, cycle: BillingCycle, interval_days: u32) -> f64 {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    match cycle {
        BillingCycle::Weekly => amount * WEEKS_PER_MONTH,
        BillingCycle::Monthly => amount,
        BillingCycle::Yearly => amount / 12.0,
        BillingCycle::Custom => amount * (30.0 / f64::from(effective_interval(interval_days))),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct Totals {
    pub monthly: f64,
    pub yearly: f64,
    pub count: usize,
}

pub fn totals<'a, I>(records: I) -> Totals
where
    I: IntoIterator<Item = &'a SubscriptionRecord>,
{
    let mut monthly = 0.0;
    let mut count = 0usize;
    for record in records {
        monthly += monthly_equivalent(record.amount, record.cycle, record.interval_days);
        count += 1;
    }

    Totals {
        monthly,
        yearly: monthly * 12.0,
        count,
    }
}
