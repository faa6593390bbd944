//! Company settings stored as TOML.
//!
//! Every key is optional; missing keys take the defaults of
//! [`CompanySettings::default`]. A `[tiered_bonus_rates]` table, when present,
//! must list all four tiers.
//!
//! ```toml
//! base_salary = 32000
//! sales_target = 10
//! project_bonus_rate = 0.06
//!
//! [tiered_bonus_rates.tier1]
//! min = 13
//! max = 15
//! amount = 2500
//! # tier2, tier3 and tier4 follow the same shape; tier4 has no max
//! ```

use std::path::{Path, PathBuf};

use payroll_core::{CompanySettings, SettingsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsFileError {
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(#[from] SettingsError),
}

/// Parses and validates settings from TOML text.
pub fn parse_settings(input: &str) -> Result<CompanySettings, SettingsFileError> {
    let settings: CompanySettings = toml::from_str(input)?;
    settings.validate()?;
    Ok(settings)
}

/// Reads, parses and validates a settings file.
pub fn load_settings(path: &Path) -> Result<CompanySettings, SettingsFileError> {
    let input = std::fs::read_to_string(path).map_err(|source| SettingsFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&input)
}
