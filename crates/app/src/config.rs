use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::ResponseOrdering;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/finance.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub user_id: String,
    pub user_email: String,
    /// Id token of the signed-in user, sent as a bearer credential.
    pub token: Option<String>,
    pub level: String,
    pub ordering: ResponseOrdering,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            user_id: String::new(),
            user_email: String::new(),
            token: None,
            level: "info".to_string(),
            ordering: ResponseOrdering::Arrival,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "finance", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:5000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override user id (the token is never read from CLI).
    #[arg(long)]
    user_id: Option<String>,
    /// Override user email.
    #[arg(long)]
    user_email: Option<String>,
    /// Override log level.
    #[arg(long)]
    level: Option<String>,
    /// How overlapping responses are applied: `arrival` or `latest_issued`.
    #[arg(long, value_parser = parse_ordering)]
    ordering: Option<ResponseOrdering>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Income entries.
    #[command(subcommand)]
    Income(IncomeCommand),
    /// Expense line items.
    #[command(subcommand)]
    Expenses(ExpensesCommand),
    /// Income, expenses and the resulting balance.
    Summary,
}

#[derive(Debug, Clone, Subcommand)]
pub enum IncomeCommand {
    List,
    Add {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        source: String,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ExpensesCommand {
    List,
    Add {
        #[arg(long)]
        item: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        unit_price: f64,
    },
}

fn parse_ordering(raw: &str) -> std::result::Result<ResponseOrdering, String> {
    match raw {
        "arrival" => Ok(ResponseOrdering::Arrival),
        "latest_issued" | "latest-issued" => Ok(ResponseOrdering::LatestIssued),
        other => Err(format!("unknown ordering `{other}`")),
    }
}

pub fn load() -> Result<(AppConfig, Command)> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("FINANCE"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(user_id) = args.user_id {
        settings.user_id = user_id;
    }
    if let Some(user_email) = args.user_email {
        settings.user_email = user_email;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }
    if let Some(ordering) = args.ordering {
        settings.ordering = ordering;
    }

    Ok((settings, args.command))
}
