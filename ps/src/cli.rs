//! CLI argument parsing for planstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ps")]
#[command(author, version, about = "Saved meal plan store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all saved plans
    List,

    /// Print a saved plan's document
    Show {
        /// Plan ID to display
        #[arg(required = true)]
        id: String,
    },

    /// Delete a saved plan
    Delete {
        /// Plan ID to delete
        #[arg(required = true)]
        id: String,
    },

    /// Delete all saved plans
    Clear,
}
