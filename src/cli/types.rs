//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::publish::PublishArgs;

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "fio-enricher")]
#[command(about = "Person ingestion with age/gender/nationality enrichment", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to .fio/config.yaml + .fio/local.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API and the queue consumer until interrupted
    Serve,

    /// Append a raw message to a topic of the message log
    Publish(PublishArgs),
}
