//! Command implementations for the CLI
//!
//! This module contains the implementation of all CLI commands:
//! - serve: Start the pricing server
//! - check: Validate configuration and dataset
//! - suggest: Price one item offline

pub mod check;
pub mod serve;
pub mod suggest;
