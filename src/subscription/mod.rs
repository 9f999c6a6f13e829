mod parse;
mod record;
mod schedule;

pub use parse::{load_records, parse_records};
pub use record::{BillingCycle, SubscriptionRecord, parse_calendar_date};
pub use schedule::{
    DEFAULT_INTERVAL_DAYS, DUE_DATE_FORMAT, Totals, WEEKS_PER_MONTH, advance_due, days_between,
    monthly_equivalent, totals,
};
