//! Core utilities for the job board search tools
//!
//! This crate provides shared functionality used by the search library and the CLI:
//!
//! - **Error handling**: Coded errors with context and recovery suggestions
//! - **Configuration**: TOML-based matcher tuning and metro lookup table with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use jobboard_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("threshold = {}", config.schema.search.threshold);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, MetroRule, SearchConfig, WeightsConfig};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
}
