//! CLI argument parsing for mealplan

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::plan::types::MealType;

#[derive(Parser, Debug)]
#[command(name = "mp")]
#[command(author, version, about = "Streaming meal-plan generation client", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a meal plan from a profile file
    Generate {
        /// Path to the profile YAML file
        #[arg(required = true)]
        profile: PathBuf,

        /// Save the finished plan to the plan store
        #[arg(long)]
        save: bool,
    },

    /// Regenerate one meal of a saved plan
    Regenerate {
        /// Saved plan ID
        #[arg(required = true)]
        plan_id: String,

        /// Target day (1-based)
        #[arg(long)]
        day: u32,

        /// Target meal slot (breakfast, lunch, dinner, snack)
        #[arg(long)]
        meal: MealType,
    },

    /// List alternative recipes for one meal of a saved plan
    Alternatives {
        /// Saved plan ID
        #[arg(required = true)]
        plan_id: String,

        /// Target day (1-based)
        #[arg(long)]
        day: u32,

        /// Target meal slot (breakfast, lunch, dinner, snack)
        #[arg(long)]
        meal: MealType,
    },

    /// Print the shopping list for a saved plan
    Shopping {
        /// Saved plan ID
        #[arg(required = true)]
        plan_id: String,
    },
}
