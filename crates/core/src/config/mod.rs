//! Configuration loading and schema definitions
//!
//! Shared by the search library, the CLI and the telemetry setup.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
