use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Reconstruct tables and text blocks from page dumps.
#[derive(Debug, Parser)]
#[command(name = "ruled", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the output document JSON
    Extract {
        /// Path to the page-dump JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Path to a frame map JSON file
        #[arg(long)]
        frames: Option<PathBuf>,

        /// Output directory for data.json
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },

    /// List detected tables with their codes and dimensions
    Tables {
        /// Path to the page-dump JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Path to a frame map JSON file
        #[arg(long)]
        frames: Option<PathBuf>,
    },
}
