use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use payroll_core::SalesRepository;
use payroll_data::{AttendanceCsvLoader, SalesCsvLoader, load_settings};
use payroll_db_sqlite::SqliteRepository;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Import sales, attendance and company settings into the payroll database.
///
/// Sales CSV columns: id, employee_id, client_name, project_name,
/// invoice_amount, advance_amount, date, status.
/// Attendance CSV columns: employee_id, date, status.
#[derive(Parser, Debug)]
#[command(name = "payroll-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file of sales to import
    #[arg(long)]
    sales: Option<PathBuf>,

    /// CSV file of attendance records to import
    #[arg(long)]
    attendance: Option<PathBuf>,

    /// TOML file of company settings to store
    #[arg(long)]
    settings: Option<PathBuf>,

    /// SQLite database URL (e.g. sqlite:payroll.db)
    #[arg(short, long, default_value = "sqlite:payroll.db")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        info!("running migrations");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
    }

    if let Some(path) = &args.settings {
        let settings = load_settings(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?;
        repo.save_company_settings(&settings)
            .await
            .context("Failed to store company settings")?;
        println!("Stored company settings from {}", path.display());
    }

    if let Some(path) = &args.sales {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let sales = SalesCsvLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        info!(count = sales.len(), "parsed sales");

        let written = SalesCsvLoader::load(&repo, &sales)
            .await
            .context("Failed to load sales into database")?;
        println!("Loaded {} sales from {}", written, path.display());
    }

    if let Some(path) = &args.attendance {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = AttendanceCsvLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        info!(count = records.len(), "parsed attendance records");

        let written = AttendanceCsvLoader::load(&repo, &records)
            .await
            .context("Failed to load attendance into database")?;
        println!("Loaded {} attendance records from {}", written, path.display());
    }

    Ok(())
}
