//! Import of sales, attendance and company settings from files.

pub mod attendance_loader;
mod date;
pub mod sales_loader;
pub mod settings_file;

pub use attendance_loader::{AttendanceCsvLoader, AttendanceLoaderError};
pub use sales_loader::{SalesCsvLoader, SalesLoaderError};
pub use settings_file::{SettingsFileError, load_settings, parse_settings};
