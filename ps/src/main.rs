use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use planstore::PlanStore;
use planstore::cli::{Cli, Command};
use planstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("planstore starting");

    let store = PlanStore::open(&config.store_path)?;

    match cli.command {
        Command::List => {
            let metas = store.list()?;
            if metas.is_empty() {
                println!("No saved plans");
            } else {
                for meta in metas {
                    println!(
                        "{}  {}  {} days  cost {}",
                        meta.id.cyan(),
                        meta.saved_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                        meta.days,
                        meta.total_cost,
                    );
                    println!("    {}", meta.summary);
                }
            }
        }
        Command::Show { id } => match store.load(&id)? {
            Some(saved) => {
                println!("{}", serde_json::to_string_pretty(&saved.plan)?);
            }
            None => {
                eprintln!("{} Plan not found: {}", "✗".red(), id);
            }
        },
        Command::Delete { id } => {
            if store.delete(&id)? {
                println!("{} Deleted plan: {}", "✓".green(), id);
            } else {
                eprintln!("{} Plan not found: {}", "✗".red(), id);
            }
        }
        Command::Clear => {
            store.clear()?;
            println!("{} Cleared all saved plans", "✓".green());
        }
    }

    Ok(())
}
