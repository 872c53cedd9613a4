//! Domain layer: customer records, the in-memory store and the rules
//! that apply API responses to it.

pub mod models;
pub mod services;
pub mod errors;

pub use models::*;
pub use services::*;
pub use errors::*;
