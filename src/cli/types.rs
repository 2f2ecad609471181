//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::init::InitArgs;
use super::commands::lookup::LookupArgs;
use super::commands::review::ReviewArgs;

#[derive(Parser, Debug)]
#[command(name = "taric-official")]
#[command(about = "Official EU TARIC descriptions with a local cache", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to taric.yaml + taric.local.yaml)
    #[arg(short, long, global = true, env = "TARIC_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration and create the database
    Init(InitArgs),

    /// Look up the official description of a TARIC code
    Lookup(LookupArgs),

    /// Review stored classifier answers
    Review(ReviewArgs),
}
