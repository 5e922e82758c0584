//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cloud SDK command-line client
#[derive(Parser, Debug)]
#[command(name = "cloud-sdk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service name; selects the `<NAME>_*` environment variables
    #[arg(short, long, global = true, default_value = "CLOUD_SDK")]
    pub service: String,

    /// Service configuration file (YAML), used instead of the environment
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through a collection and print its items as JSON lines
    List {
        /// Collection path, may contain `{name}` placeholders
        path: String,

        /// Field of the response holding the items
        #[arg(long)]
        items: String,

        /// Page size
        #[arg(long)]
        limit: Option<u32>,

        /// Query filter (repeatable)
        #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        filters: Vec<(String, String)>,

        /// Path parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Stop after this many pages
        #[arg(long)]
        pages: Option<usize>,
    },

    /// Fetch a single resource and pretty-print it
    Get {
        /// Resource path, may contain `{name}` placeholders
        path: String,

        /// Path parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

/// Parse a `KEY=VALUE` pair; the value may itself contain `=`
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
