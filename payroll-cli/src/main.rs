use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use payroll_core::SalesRepository;
use payroll_core::calculations::{Timeframe, calculate_commission};
use payroll_core::db::DbConfig;
use payroll_data::load_settings;
use rust_decimal::Decimal;
use tracing::debug;

use payroll_cli::report::{OutputFormat, render};
use payroll_cli::{app, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Commission and payroll calculator for sales representatives.
///
/// Reads sales, attendance and settings from the configured database and
/// prints the requested report.
#[derive(Debug, Parser)]
#[command(name = "payroll", version, about)]
struct Cli {
    /// Database backend to use.
    #[arg(long, global = true, default_value = "sqlite")]
    backend: String,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `payroll.db`) or `:memory:`.
    #[arg(long, global = true, default_value = "payroll.db")]
    db: String,

    /// TOML company settings used instead of the stored ones.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log filter, e.g. `debug` or `payroll_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Monthly payroll for one employee.
    Run {
        #[arg(long)]
        employee: String,

        #[arg(long)]
        year: i32,

        /// Calendar month, 1 for January.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// Commission eligibility of a single sale.
    Commission {
        /// Project (invoice) amount.
        #[arg(long)]
        amount: Decimal,

        /// Advance collected upfront.
        #[arg(long, default_value = "0")]
        advance: Decimal,
    },

    /// Month-by-month commission history for one employee.
    History {
        #[arg(long)]
        employee: String,
    },

    /// Revenue KPIs for one employee.
    Metrics {
        #[arg(long)]
        employee: String,

        /// weekly, monthly or yearly.
        #[arg(long, default_value = "monthly", value_parser = parse_timeframe)]
        timeframe: Timeframe,

        /// Reference date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Salary and commission totals across employees.
    Overview {
        /// Employees to include; defaults to everyone with a stored sale.
        #[arg(long = "employee")]
        employees: Vec<String>,
    },
}

fn parse_timeframe(value: &str) -> Result<Timeframe, String> {
    Timeframe::parse(value)
        .ok_or_else(|| format!("expected weekly, monthly or yearly, got '{value}'"))
}

async fn open_repository(config: &DbConfig) -> anyhow::Result<Box<dyn SalesRepository>> {
    debug!("connecting to {} backend", config.backend);
    app::build_registry()
        .create(config)
        .await
        .with_context(|| format!("Failed to open {} database {}", config.backend, config.connection_string))
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();

    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let file_settings = cli
        .settings
        .as_deref()
        .map(|path| {
            load_settings(path)
                .with_context(|| format!("Failed to load settings: {}", path.display()))
        })
        .transpose()?;
    let file_settings = file_settings.as_ref();
    let db_config = DbConfig::new(cli.backend, cli.db);

    let output = match cli.command {
        Command::Run {
            employee,
            year,
            month,
        } => {
            let repo = open_repository(&db_config).await?;
            let result = app::run_payroll(repo.as_ref(), &employee, year, month, file_settings).await?;
            render(&result, cli.format)?
        }
        Command::Commission { amount, advance } => {
            render(&calculate_commission(amount, advance), cli.format)?
        }
        Command::History { employee } => {
            let repo = open_repository(&db_config).await?;
            render(&app::commission_history(repo.as_ref(), &employee).await?, cli.format)?
        }
        Command::Metrics {
            employee,
            timeframe,
            as_of,
        } => {
            let today = as_of.unwrap_or_else(|| Local::now().date_naive());
            let repo = open_repository(&db_config).await?;
            let result = app::metrics(repo.as_ref(), &employee, timeframe, today, file_settings).await?;
            render(&result, cli.format)?
        }
        Command::Overview { employees } => {
            let repo = open_repository(&db_config).await?;
            render(&app::overview(repo.as_ref(), &employees, file_settings).await?, cli.format)?
        }
    };

    print!("{output}");
    Ok(())
}
