use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use bubble_tracker::bubbles::{self, ItemFilter, SortKey, ViewOptions, Viewport};
use bubble_tracker::config::{EngineConfig, load_config};
use bubble_tracker::subscription::{
    BillingCycle, DUE_DATE_FORMAT, advance_due, load_records, parse_calendar_date, totals,
};
use bubble_tracker::util::format_currency;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON engine configuration; missing keys keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD); defaults to the local date.
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute bubble positions, radii and colors as JSON.
    Layout {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 800.0)]
        width: f32,
        #[arg(long, default_value_t = 520.0)]
        height: f32,
        #[arg(long)]
        lookahead: Option<u32>,
        #[arg(long)]
        gap: Option<f32>,
        #[arg(long, value_enum, default_value_t = ItemFilter::All)]
        filter: ItemFilter,
        #[arg(long, value_enum, default_value_t = SortKey::Due)]
        sort: SortKey,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        pretty: bool,
    },
    /// Print monthly and yearly totals.
    Totals {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "$")]
        currency: String,
        #[arg(long, value_enum, default_value_t = ItemFilter::All)]
        filter: ItemFilter,
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Print the due date that follows `date` for a billing cycle.
    Advance {
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "monthly")]
        cycle: String,
        #[arg(long, default_value_t = 30)]
        interval: u32,
    },
}

fn reference_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => parse_calendar_date(raw).ok_or_else(|| anyhow!("invalid --today date: {raw}")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    let today = reference_date(args.today.as_deref())?;

    match args.command {
        Command::Layout {
            input,
            width,
            height,
            lookahead,
            gap,
            filter,
            sort,
            query,
            pretty,
        } => {
            if let Some(lookahead) = lookahead {
                config.lookahead_days = lookahead;
            }
            if let Some(gap) = gap {
                config.pack.gap = gap;
            }

            let viewport = Viewport::new(width, height)?;
            let records = load_records(&input, today)?;
            let options = ViewOptions {
                query,
                filter,
                sort,
            };
            let scene = bubbles::compute_scene(&records, &options, today, viewport, &config);

            let json = if pretty {
                serde_json::to_string_pretty(&scene)
            } else {
                serde_json::to_string(&scene)
            }
            .context("failed to serialize bubble scene")?;
            println!("{json}");
        }
        Command::Totals {
            input,
            currency,
            filter,
            query,
        } => {
            let records = load_records(&input, today)?;
            let (enriched, rejected) =
                bubbles::enrich_all(&records, today, config.lookahead(), &config.urgency);
            let options = ViewOptions {
                query,
                filter,
                sort: SortKey::Due,
            };
            let visible = bubbles::select_visible(&enriched, &options);
            let sum = totals(visible.iter().map(|item| &item.record));

            println!("Subscriptions: {}", sum.count);
            println!("Monthly: {}", format_currency(sum.monthly, &currency));
            println!("Yearly: {}", format_currency(sum.yearly, &currency));
            if !rejected.is_empty() {
                println!("Skipped (invalid due date): {}", rejected.len());
            }
        }
        Command::Advance {
            date,
            cycle,
            interval,
        } => {
            let date =
                parse_calendar_date(&date).ok_or_else(|| anyhow!("invalid --date: {date}"))?;
            let next = advance_due(date, BillingCycle::from_label(&cycle), interval);
            println!("{}", next.format(DUE_DATE_FORMAT));
        }
    }

    Ok(())
}
