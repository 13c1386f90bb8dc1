//! Extractly backend: REST API over the extraction pipeline plus an
//! embedded records browser.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod validation;

pub use app::{build_app, AppState};
pub use config::Config;
pub use error::ApiError;
