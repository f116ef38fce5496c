mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use monthcal_core::config::MonthcalConfig;
use monthcal_core::{CalendarApp, YearMonth};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use utils::dates::parse_day;

#[derive(Parser)]
#[command(name = "monthcal")]
#[command(about = "Browse months and keep personal events in a local calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid (defaults to the current month)
    Show {
        /// Month to show (YYYY-MM)
        #[arg(short, long)]
        month: Option<YearMonth>,

        /// Highlight a day and list its events (YYYY-MM-DD, "today", "tomorrow")
        #[arg(short, long, value_parser = parse_day)]
        select: Option<NaiveDate>,

        /// Print the grid as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactively browse months and manage events
    Browse,
    /// Add an event to a day
    Add {
        /// Day of the event (YYYY-MM-DD, "today", "tomorrow")
        #[arg(value_parser = parse_day)]
        date: NaiveDate,

        /// Event title (prompted for when missing)
        title: Option<String>,

        /// Time of day, e.g. "09:00" (omit for all-day)
        #[arg(short, long)]
        time: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Color: blue, red, green, yellow, purple, orange, pink, gray
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Change fields of an existing event
    Edit {
        #[arg(value_parser = parse_day)]
        date: NaiveDate,

        /// Event id (see `monthcal list`)
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// New time; pass "" to make the event all-day
        #[arg(short, long)]
        time: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        color: Option<String>,
    },
    /// Delete an event
    Delete {
        #[arg(value_parser = parse_day)]
        date: NaiveDate,

        id: String,
    },
    /// List the events of a day
    List {
        #[arg(value_parser = parse_day, default_value = "today")]
        date: NaiveDate,
    },
    /// List every stored event
    All,
    /// Find events by title or description
    Search { query: String },
    /// Show event statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Export all events as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge events from an exported JSON file
    Import { file: PathBuf },
    /// Delete every event
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Remove events older than the configured retention
    Clean,
    /// Show configuration paths and values
    Config,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show {
            month,
            select,
            json,
        } => commands::show::run(load_app()?, month, select, json),
        Commands::Browse => commands::browse::run(load_app()?),
        Commands::Add {
            date,
            title,
            time,
            description,
            color,
        } => commands::add::run(load_app()?, date, title, time, description, color),
        Commands::Edit {
            date,
            id,
            title,
            time,
            description,
            color,
        } => commands::edit::run(load_app()?, date, &id, title, time, description, color),
        Commands::Delete { date, id } => commands::delete::run(load_app()?, date, &id),
        Commands::List { date } => commands::list::run(&load_app()?, date),
        Commands::All => commands::list::run_all(&load_app()?),
        Commands::Search { query } => commands::search::run(&load_app()?, &query),
        Commands::Stats { json } => commands::stats::run(&load_app()?, json),
        Commands::Export { output } => commands::transfer::export(&load_app()?, output),
        Commands::Import { file } => commands::transfer::import(load_app()?, &file),
        Commands::Clear { force } => commands::clear::run(load_app()?, force),
        Commands::Clean => commands::clear::clean(load_app()?),
        Commands::Config => commands::config::run(),
    }
}

fn load_app() -> Result<CalendarApp> {
    let config = MonthcalConfig::load()?;
    tracing::debug!(storage = %config.storage_path().display(), "loaded config");
    Ok(CalendarApp::from_config(&config)?)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MONTHCAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
