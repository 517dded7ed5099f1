//! CLI utilities for the job board search tools
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting and match highlighting
//! - Progress indicators
//! - Status messages

#![warn(missing_docs)]

pub mod output;
pub mod progress;
