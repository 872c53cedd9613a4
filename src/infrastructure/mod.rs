//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP client for the customer API, configuration
//! loading and log setup.

pub mod api;
pub mod config;
pub mod logging;

pub use api::*;
pub use config::*;
pub use logging::*;
