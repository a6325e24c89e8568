//! druidq - submit Druid queries and inspect tasks
//!
//! Usage:
//!   druidq query <file.json>
//!   druidq task-status <task-id> [--wait]
//!   druidq interval <start/stop>
//!
//! Examples:
//!   druidq query queries/top_pages.json
//!   druidq task-status index_parallel_wiki_2024 --wait
//!   druidq interval 2019-04-15/2019-04-16

use clap::{Parser, Subcommand};
use druid_query::client::DruidClient;
use druid_query::config::Settings;
use druid_query::types::Interval;
use druid_query::DruidError;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "druidq")]
#[command(about = "druidq - submit Druid queries and inspect tasks")]
#[command(version)]
struct Cli {
    /// Path to a druid.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post a raw JSON query document to the broker
    Query {
        /// Path to the query .json file
        file: PathBuf,
    },

    /// Print the status of an overlord task
    TaskStatus {
        /// Task id
        id: String,

        /// Wait until the task finishes
        #[arg(short, long)]
        wait: bool,
    },

    /// Normalize an interval to its wire form
    Interval {
        /// Interval as start/stop
        interval: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "druid_query=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Interval { interval } => cmd_interval(&interval),
        Commands::Query { file } => match client(cli.config) {
            Ok(client) => cmd_query(&client, file).await,
            Err(code) => code,
        },
        Commands::TaskStatus { id, wait } => match client(cli.config) {
            Ok(client) => cmd_task_status(&client, &id, wait).await,
            Err(code) => code,
        },
    }
}

fn client(config: Option<PathBuf>) -> Result<DruidClient, ExitCode> {
    let settings = match config {
        Some(path) => Settings::from_file(&path).and_then(Settings::with_env_overrides),
        None => Settings::load(),
    };
    let settings = settings.map_err(|e| {
        eprintln!("Configuration error: {}", e);
        ExitCode::FAILURE
    })?;
    DruidClient::new(settings).map_err(|e| {
        eprintln!("Error creating client: {}", e);
        ExitCode::FAILURE
    })
}

fn cmd_interval(interval: &str) -> ExitCode {
    match Interval::parse(interval) {
        Ok(interval) => {
            println!("{}", interval);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_query(client: &DruidClient, file: PathBuf) -> ExitCode {
    let source = match fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let query: Value = match serde_json::from_str(&source) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Invalid JSON in '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match client.execute_raw_query(query).await {
        Ok(result) => print_json(&result),
        Err(e) => report(e),
    }
}

async fn cmd_task_status(client: &DruidClient, id: &str, wait: bool) -> ExitCode {
    let status = if wait {
        client.poll_task(id, None).await
    } else {
        client.task_status(id).await
    };
    match status {
        Ok(status) => match serde_json::to_value(&status) {
            Ok(value) => print_json(&value),
            Err(e) => report(e.into()),
        },
        Err(e) => report(e),
    }
}

fn print_json(value: &Value) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => report(e.into()),
    }
}

fn report(error: DruidError) -> ExitCode {
    eprintln!("Error: {}", error);
    if let Some(query) = error.query() {
        eprintln!("Request: {}", query);
    }
    ExitCode::FAILURE
}
