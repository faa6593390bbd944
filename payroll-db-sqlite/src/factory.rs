use std::path::PathBuf;

use async_trait::async_trait;
use payroll_core::db::{DbConfig, RepositoryFactory};
use payroll_core::{RepositoryError, SalesRepository};
use tracing::info;

use crate::repository::SqliteRepository;

/// Environment variable overriding the seed directory.
pub const SEEDS_DIR_ENV: &str = "PAYROLL_DB_SQLITE_SEEDS_DIR";

/// Resolve the seeds directory at runtime so it works both from the build
/// tree and from a packaged install.
///
/// Resolution order:
/// 1. `PAYROLL_DB_SQLITE_SEEDS_DIR`, if set.
/// 2. `./seeds`, if it exists in the current working directory.
/// 3. `$CARGO_MANIFEST_DIR/seeds`.
fn seeds_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(SEEDS_DIR_ENV) {
        return PathBuf::from(dir);
    }
    let cwd_seeds = PathBuf::from("./seeds");
    if cwd_seeds.is_dir() {
        return cwd_seeds;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

/// [`RepositoryFactory`] for SQLite.
///
/// ```rust,no_run
/// use payroll_core::db::RepositoryRegistry;
/// use payroll_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens `config.connection_string` (a file path, `sqlite:` URL or
    /// `:memory:`), applies migrations and loads the seed files, which insert
    /// the default company settings when none are stored.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SalesRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        let seeds = seeds_dir();
        repo.run_seeds(&seeds)
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        info!(database = %config.connection_string, seeds = %seeds.display(), "opened sqlite repository");
        Ok(Box::new(repo))
    }
}
