//! mealplan - streaming meal-plan generation client
//!
//! CLI entry point: generate a plan against a backend, regenerate single
//! meals, browse alternatives, and print shopping lists.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail, eyre};
use tracing::{debug, info};

use planstore::PlanStore;

use mealplan::backend::{AlternativeQuery, HttpBackend, PlanBackend};
use mealplan::cli::{Cli, Command};
use mealplan::config::Config;
use mealplan::plan::types::{Plan, UserProfile};
use mealplan::session::{GenerationSession, SessionPhase};
use mealplan::{nutrition, regen, shopping};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("mealplan starting");

    match cli.command {
        Command::Generate { profile, save } => {
            let content = std::fs::read_to_string(&profile)
                .context(format!("Failed to read profile file: {}", profile.display()))?;
            let profile: UserProfile = serde_yaml::from_str(&content).context("Failed to parse profile file")?;

            let backend = Arc::new(HttpBackend::from_config(&config)?);
            let plan = run_generation(backend, profile).await?;
            print_plan_summary(&plan);

            if save {
                let store = PlanStore::open(&config.store_path)?;
                let id = store.save(
                    &profile_summary(&plan.profile),
                    plan.days.len() as u32,
                    plan.total_cost,
                    serde_json::to_value(&plan)?,
                )?;
                println!("{} Saved plan: {}", "✓".green(), id.cyan());
            }
        }

        Command::Regenerate { plan_id, day, meal } => {
            let store = PlanStore::open(&config.store_path)?;
            let mut plan = load_plan(&store, &plan_id)?;

            let backend = HttpBackend::from_config(&config)?;
            let replaced = regen::regenerate_meal(&backend, &mut plan, day, meal).await?;
            if !replaced {
                bail!("backend did not produce a replacement for day {} {}", day, meal);
            }

            let new_meal = plan
                .find_meal(day, meal)
                .ok_or_else(|| eyre!("replaced meal missing from plan"))?;
            println!(
                "{} Day {} {} is now {} ({} kcal, cost {})",
                "✓".green(),
                day,
                meal,
                new_meal.recipe.name.cyan(),
                new_meal.recipe.nutrition.calories_kcal,
                new_meal.recipe.estimated_cost,
            );

            // Replace the stored document under a fresh id
            store.delete(&plan_id)?;
            let id = store.save(
                &profile_summary(&plan.profile),
                plan.days.len() as u32,
                plan.total_cost,
                serde_json::to_value(&plan)?,
            )?;
            println!("{} Updated plan saved: {}", "✓".green(), id.cyan());
        }

        Command::Alternatives { plan_id, day, meal } => {
            let store = PlanStore::open(&config.store_path)?;
            let plan = load_plan(&store, &plan_id)?;
            let target = plan
                .find_meal(day, meal)
                .ok_or_else(|| eyre!("no {} on day {} in plan {}", meal, day, plan_id))?;

            let backend = HttpBackend::from_config(&config)?;
            let query = AlternativeQuery::for_meal(target, &plan);
            let alternatives = backend.alternative_recipes(&query).await?;

            if alternatives.is_empty() {
                println!("No alternatives found for {}", target.recipe.name);
            } else {
                for alt in alternatives {
                    let calories = alt.calories.map(|c| format!("{} kcal", c)).unwrap_or_default();
                    let cost = alt.cost.map(|c| format!("cost {}", c)).unwrap_or_default();
                    println!("{}  {} {}", alt.name.cyan(), calories.dimmed(), cost.dimmed());
                    println!("    {}", alt.url);
                }
            }
        }

        Command::Shopping { plan_id } => {
            let store = PlanStore::open(&config.store_path)?;
            let plan = load_plan(&store, &plan_id)?;

            let mut current_category = String::new();
            for item in shopping::shopping_list(&plan) {
                if item.category != current_category {
                    println!("{}", item.category.yellow().bold());
                    current_category = item.category.clone();
                }
                println!("  {} {} {}", item.name, item.quantity, item.unit.dimmed());
            }
        }
    }

    Ok(())
}

/// Drive one generation session to a terminal state, rendering progress
async fn run_generation(backend: Arc<dyn PlanBackend>, profile: UserProfile) -> Result<Plan> {
    let mut session = GenerationSession::new(backend);
    session.start(profile).await.context("Failed to start generation")?;

    let mut last_progress = None;
    loop {
        let state = session.snapshot();

        if last_progress != Some(state.processing.total_progress) {
            last_progress = Some(state.processing.total_progress);
            let cursor = state
                .processing
                .current_meal_type
                .map(|m| m.to_string())
                .unwrap_or_default();
            println!(
                "{:>3}%  day {} meal {} {}",
                state.processing.total_progress,
                state.processing.current_day,
                state.processing.current_meal,
                cursor.dimmed(),
            );
        }

        match state.phase {
            SessionPhase::Connecting | SessionPhase::Streaming => {
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
            SessionPhase::Errored => {
                bail!("generation failed: {}", state.error().unwrap_or("unknown error"));
            }
            SessionPhase::Completed | SessionPhase::Stopped | SessionPhase::Idle => break,
        }
    }

    session.wait().await;
    debug!("generation finished");

    session.plan().ok_or_else(|| eyre!("session completed without a plan"))
}

fn print_plan_summary(plan: &Plan) {
    println!();
    println!(
        "{} {} days, total cost {} (budget {})",
        "Plan ready:".green().bold(),
        plan.days.len(),
        plan.total_cost,
        plan.total_budget,
    );
    let target = nutrition::target_calories(&plan.profile);
    println!(
        "Average daily nutrition: {} kcal (target {}) / {}g protein / {}g carbs / {}g fat",
        plan.avg_daily_nutrition.calories_kcal.round(),
        target,
        plan.avg_daily_nutrition.protein_g.round(),
        plan.avg_daily_nutrition.carbs_g.round(),
        plan.avg_daily_nutrition.fat_g.round(),
    );
    for day in &plan.days {
        println!("{}", format!("Day {}", day.day).bold());
        for meal in &day.meals {
            println!(
                "  {:<10} {} ({} kcal, cost {})",
                meal.meal_type.to_string().dimmed(),
                meal.recipe.name,
                meal.recipe.nutrition.calories_kcal,
                meal.recipe.estimated_cost,
            );
        }
        let violations = nutrition::health_violations(&day.total_nutrition, &plan.profile.health_conditions);
        for violation in violations {
            println!("  {} {}", "!".yellow(), violation.yellow());
        }
    }
}

fn profile_summary(profile: &UserProfile) -> String {
    format!(
        "{}yo {:?}, {:?}, {} days x {} meals",
        profile.age, profile.gender, profile.goal, profile.days, profile.meals_per_day
    )
}

fn load_plan(store: &PlanStore, plan_id: &str) -> Result<Plan> {
    let saved = store
        .load(plan_id)?
        .ok_or_else(|| eyre!("plan not found: {}", plan_id))?;
    serde_json::from_value(saved.plan).context("Failed to parse stored plan")
}
