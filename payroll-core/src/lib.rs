pub mod calculations;
pub mod db;
pub mod models;

pub use db::repository::{
    RepositoryError, SalesRepository, apply_override, company_settings, resolve_settings,
};
pub use models::*;
