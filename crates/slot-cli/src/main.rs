//! `freeslots` CLI — list meeting slots that are free for everyone.
//!
//! ## Usage
//!
//! ```sh
//! # Print the free/busy request body for the provider
//! freeslots --people alice,bob --domain example.com -s 2024-01-08 --print-query
//!
//! # Compute free slots from a saved free/busy response
//! freeslots -s 2024-01-08 -e 2024-01-12 --utc +1 --busy freebusy.json
//!
//! # Same, reading the response from stdin and adding UTC+5 and UTC-8 columns
//! fetch-freebusy | freeslots --utc +1 --extra-utc +5,-8
//! ```

mod logging;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Parser;
use slot_engine::{Granularity, RecordedResponse, SearchConfig, UtcOffset, WorkingHours};

#[derive(Parser)]
#[command(
    name = "freeslots",
    version,
    about = "Find meeting slots that are free for everyone"
)]
struct Cli {
    /// Start date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD), defaults to the start date
    #[arg(short, long)]
    end: Option<String>,

    /// Hide slots earlier than this hour
    #[arg(long, default_value_t = 8)]
    no_earlier: u32,

    /// Hide slots at or after this hour
    #[arg(long, default_value_t = 17)]
    no_later: u32,

    /// Comma-separated list of people to check
    #[arg(short, long, default_value = "")]
    people: String,

    /// Domain appended to people given without one
    #[arg(long)]
    domain: Option<String>,

    /// Your own UTC offset in hours
    #[arg(short, long, default_value = "+1", allow_hyphen_values = true)]
    utc: String,

    /// Comma-separated extra UTC offsets to show alongside
    #[arg(long, allow_hyphen_values = true)]
    extra_utc: Option<String>,

    /// Slot width as a fraction of an hour
    #[arg(short, long, default_value_t = 0.5)]
    granularity: f64,

    /// Also show Saturdays and Sundays
    #[arg(short = 'w', long)]
    show_weekend: bool,

    /// Start of the daily search window (HH:MM)
    #[arg(long, default_value = "08:00")]
    day_start: String,

    /// End of the daily search window (HH:MM)
    #[arg(long, default_value = "21:00")]
    day_end: String,

    /// Also offer a slot starting exactly at the end of the window
    #[arg(long)]
    inclusive_end: bool,

    /// Free/busy response file (reads stdin if omitted)
    #[arg(short, long)]
    busy: Option<String>,

    /// Print the free/busy request body as JSON and exit
    #[arg(long)]
    print_query: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let config = build_config(&cli)?;
    tracing::debug!(?config, "parsed configuration");

    if cli.print_query {
        config.validate().context("Invalid configuration")?;
        let body = serde_json::to_string_pretty(&config.query())?;
        println!("{}", body);
        return Ok(());
    }

    let source = match cli.busy.as_deref() {
        Some(path) => RecordedResponse::from_path(path),
        None => RecordedResponse::Stdin,
    };

    let report = slot_engine::run(&config, &source).context("Failed to compute free slots")?;
    print!("{}", report);
    Ok(())
}

/// Turn raw arguments into a validated-type [`SearchConfig`].
fn build_config(cli: &Cli) -> Result<SearchConfig> {
    let start_date = match cli.start.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive(),
    };
    let end_date = match cli.end.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => start_date,
    };

    let viewer: UtcOffset = cli
        .utc
        .parse()
        .with_context(|| format!("Invalid --utc value: {}", cli.utc))?;
    let extra = match cli.extra_utc.as_deref() {
        Some(raw) => UtcOffset::parse_list(raw)
            .with_context(|| format!("Invalid --extra-utc value: {}", raw))?,
        None => Vec::new(),
    };

    let granularity = Granularity::from_hours(cli.granularity)
        .with_context(|| format!("Invalid --granularity value: {}", cli.granularity))?;

    let working_hours = WorkingHours::new(parse_clock(&cli.day_start)?, parse_clock(&cli.day_end)?)
        .context("Invalid --day-start/--day-end")?
        .with_inclusive_end(cli.inclusive_end);

    let people = cli
        .people
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    Ok(SearchConfig {
        start_date,
        end_date,
        working_hours,
        granularity,
        viewer,
        extra,
        no_earlier: cli.no_earlier,
        no_later: cli.no_later,
        show_weekend: cli.show_weekend,
        people,
        domain: cli.domain.clone(),
    })
}

/// Parse `YYYY-MM-DD`, also accepting unpadded parts like `2024-1-8`.
fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {}", raw))
}

/// Parse `HH:MM` or a bare hour such as `8`.
fn parse_clock(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| {
            raw.parse::<u32>()
                .ok()
                .and_then(|h| NaiveTime::from_hms_opt(h, 0, 0))
                .ok_or(())
        })
        .map_err(|_| anyhow::anyhow!("Invalid time of day (expected HH:MM): {}", raw))
}
