//! CLI module
//!
//! Command-line access to any service that speaks the list/get conventions.
//!
//! # Commands
//!
//! - `list` - Page through a collection, one JSON line per item
//! - `get` - Fetch a single resource

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
