//! `heynom-cli`: the food diary from a terminal.
//!
//! Works against the same stores as the web app: the local JSON file, or
//! the REST backend with a bearer token. Output is plain text, or JSON with
//! `--json`.

mod output;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use diary::store::DEFAULT_DATA_FILE;
use diary::{
    Diary, DiaryError, EntryStore, LocalStore, MealType, MutationError, RestStore, RestStoreConfig, StoreError, parse,
    resolve_logged_at,
};
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Credential the dev backend accepts when no identity provider is in use.
const DEV_TOKEN: &str = "dev-token";
const PING_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing API URL; pass --api-url or set HEYNOM_API_URL")]
    MissingApiUrl,
    #[error("no entry with id {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Diary(#[from] DiaryError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check failed: HTTP {0}")]
    Unhealthy(u16),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("runtime error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Local,
    Rest,
}

#[derive(Parser, Debug)]
#[command(name = "heynom-cli", about = "HeyNom food diary CLI")]
struct Cli {
    #[arg(long, env = "HEYNOM_STORE", value_enum, default_value_t = StoreKind::Local)]
    store: StoreKind,

    #[arg(long, env = "HEYNOM_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    #[arg(long, env = "HEYNOM_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "HEYNOM_ACCESS_TOKEN", default_value = DEV_TOKEN, hide_env_values = true)]
    token: String,

    #[arg(long, env = "HEYNOM_UTC_OFFSET", value_parser = parse::utc_offset, help = "Day boundary offset, e.g. +02:00")]
    utc_offset: Option<UtcOffset>,

    #[arg(long, default_value_t = false, help = "Print JSON instead of text")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log a meal.
    Add {
        #[arg(required = true)]
        text: Vec<String>,
        #[arg(long, help = "breakfast, lunch, dinner or snack; guessed from the hour if omitted")]
        meal: Option<String>,
        #[arg(long, help = "Time today as HH:MM; now if omitted")]
        at: Option<String>,
    },
    /// Delete an entry by id.
    Delete { id: Uuid },
    /// All entries grouped by day.
    List,
    /// One day split into meals.
    Day {
        #[arg(long, help = "YYYY-MM-DD; today if omitted")]
        date: Option<String>,
    },
    /// Month grid with entry markers.
    Calendar {
        #[arg(long, help = "YYYY-MM; the selected day's month if omitted")]
        month: Option<String>,
        #[arg(long, help = "YYYY-MM-DD; today if omitted")]
        select: Option<String>,
    },
    /// Today's count and the day streak.
    Stats,
    /// Check that the REST backend is up.
    Ping,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    // Read before the runtime starts any threads.
    let offset = cli
        .utc_offset
        .unwrap_or_else(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC));

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let text = runtime.block_on(run(cli, offset, OffsetDateTime::now_utc()))?;
    println!("{text}");
    Ok(())
}

fn build_store(cli: &Cli) -> Result<Arc<dyn EntryStore>, CliError> {
    Ok(match cli.store {
        StoreKind::Local => Arc::new(LocalStore::new(cli.data_file.clone())),
        StoreKind::Rest => {
            let base_url = cli.api_url.as_deref().ok_or(CliError::MissingApiUrl)?;
            Arc::new(RestStore::new(RestStoreConfig::new(base_url, &cli.token))?)
        }
    })
}

/// Execute one command and return what to print.
async fn run(cli: Cli, offset: UtcOffset, now: OffsetDateTime) -> Result<String, CliError> {
    if matches!(cli.command, Command::Ping) {
        return run_ping(cli.api_url.as_deref()).await;
    }

    let diary = Diary::new(build_store(&cli)?, offset);
    diary.try_refresh().await?;
    let today = diary.today(now);
    let json = cli.json;

    match cli.command {
        Command::Add { text, meal, at } => {
            let local_now = now.to_offset(offset);
            let meal_type = match meal {
                Some(raw) => MealType::parse(&raw).ok_or(DiaryError::UnknownMealType(raw))?,
                None => MealType::guess_for_hour(local_now.hour()),
            };
            let logged_at = resolve_logged_at(at.as_deref(), local_now)?;
            let entry = diary.add_entry(&text.join(" "), meal_type, logged_at).await?;
            render(json, &entry, || format!("Logged {}", output::entry_line(&entry, offset)))
        }
        Command::Delete { id } => {
            if !diary.contains(id).await {
                return Err(CliError::NotFound(id));
            }
            diary.delete_entry(id).await?;
            render(json, &serde_json::json!({ "deleted": id }), || format!("Deleted {id}"))
        }
        Command::List => {
            let groups = diary.grouped().await;
            render(json, &groups, || output::timeline(&groups, today, offset))
        }
        Command::Day { date } => {
            let date = date.as_deref().map(parse::day).transpose()?.unwrap_or(today);
            let sections = diary.meal_sections(date).await;
            render(json, &sections, || output::day(date, today, &sections, offset))
        }
        Command::Calendar { month, select } => {
            let selected = select.as_deref().map(parse::day).transpose()?.unwrap_or(today);
            let (year, month) = match month.as_deref() {
                Some(raw) => parse::month(raw)?,
                None => (selected.year(), selected.month()),
            };
            let (grid, entries) = diary.month_view(year, month, Some(selected)).await?;
            let value = serde_json::json!({ "grid": grid, "selected": selected, "entries": entries });
            render(json, &value, || output::calendar(&grid, selected, &entries, offset))
        }
        Command::Stats => {
            let stats = diary.stats(now).await;
            render(json, &stats, || output::stats(stats))
        }
        Command::Ping => run_ping(cli.api_url.as_deref()).await,
    }
}

fn render<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<String, CliError> {
    if json { Ok(serde_json::to_string_pretty(value)?) } else { Ok(text()) }
}

async fn run_ping(api_url: Option<&str>) -> Result<String, CliError> {
    let base_url = api_url.ok_or(CliError::MissingApiUrl)?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(PING_TIMEOUT_SECS))
        .build()?;
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Unhealthy(status.as_u16()));
    }
    Ok("ok".to_owned())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
