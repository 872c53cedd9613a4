//! Application layer managing state and user workflows.
//!
//! This module coordinates between the domain layer and presentation layer,
//! tracking form input, list selection and blocking notices.

pub mod state;

pub use state::*;
