//! custman - Terminal Customer Manager Library
//!
//! A terminal front end for registering, listing and deleting customers
//! held by a remote REST API, built in Rust.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
