//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::runtime::RuntimeConfig;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "countdown-keeper")]
#[command(about = "A countdown timer daemon with categories, bulk control and history")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// JSON file holding the persisted timers (defaults to the platform data dir)
    #[arg(short, long)]
    pub data_file: Option<PathBuf>,

    /// Keep timers in memory only
    #[arg(long, conflicts_with = "data_file")]
    pub ephemeral: bool,

    /// Categories a timer can be filed under
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "Work,Study,Exercise,Break,Personal"
    )]
    pub categories: Vec<String>,

    /// Tick period in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_millis: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Trimmed, non-empty category labels
    pub fn categories(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            tick_period: Duration::from_millis(self.tick_millis),
            ..RuntimeConfig::default()
        }
    }
}
