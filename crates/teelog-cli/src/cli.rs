//! CLI structure and command definitions.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use teelog_types::Level;

#[derive(Parser)]
#[command(name = "teelog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check and exercise tee logger configurations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a tee configuration file
    Check {
        /// Configuration file (YAML)
        config: PathBuf,
    },

    /// Write one entry through a configured tee
    Emit {
        /// Configuration file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Entry level
        #[arg(short, long, default_value = "info")]
        level: Level,

        /// Structured field as key=value (repeatable)
        #[arg(short, long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,

        /// Entry message
        message: String,
    },

    /// Print the production tee configuration
    Defaults,
}

impl Cli {
    pub fn execute(&self) -> Result<()> {
        use crate::commands::*;

        match &self.command {
            Commands::Check { config } => check::execute(config, self.verbose),
            Commands::Emit {
                config,
                level,
                fields,
                message,
            } => emit::execute(config, *level, fields, message),
            Commands::Defaults => defaults::execute(),
        }
    }
}
