pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod service;

pub use crate::config::AppConfig;
pub use error::{ExtractError, MatchError};
pub use service::{cross_reference, generate_summary, MatchEngine, MatchOptions, ThreeWayWorkflow};
