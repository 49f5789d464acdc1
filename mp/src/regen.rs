//! Meal regeneration
//!
//! Builds the regeneration request out of the live plan (nutrition targets,
//! budget share, and enough context for the backend to avoid repeating
//! itself), consumes the regeneration stream to completion, and installs
//! the confirmed replacement through the plan mutator.

use futures::StreamExt;
use tracing::{debug, info};

use crate::backend::{BackendError, CompletedMealContext, PlanBackend, RegenerateProfile, RegenerateRequest};
use crate::nutrition::{DailyTargets, FALLBACK_DAILY_TARGETS};
use crate::plan::mutate;
use crate::plan::types::{BudgetPeriod, MealType, Plan};
use crate::stream::{FrameDecoder, StreamEvent};

/// How many recipe names count as "recently used"
const RECENT_RECIPE_WINDOW: usize = 10;

/// How many trailing days contribute their primary ingredients
const RECENT_INGREDIENT_DAYS: usize = 3;

/// How many leading ingredients of a meal count as primary
const PRIMARY_INGREDIENTS_PER_MEAL: usize = 2;

/// Build the regeneration request for one meal slot of the plan
pub fn build_request(plan: &Plan, target_day: u32, target_meal_type: MealType) -> RegenerateRequest {
    let profile = &plan.profile;

    // Average targets over fully generated days; a fresh plan falls back
    // to fixed defaults
    let completed_days: Vec<_> = plan
        .days
        .iter()
        .filter(|d| d.meals.len() as u32 == profile.meals_per_day)
        .collect();
    let daily_nutrition_targets = if completed_days.is_empty() {
        FALLBACK_DAILY_TARGETS
    } else {
        let n = completed_days.len() as f64;
        DailyTargets {
            calories: (completed_days.iter().map(|d| d.total_nutrition.calories_kcal).sum::<f64>() / n).round(),
            carb_g: (completed_days.iter().map(|d| d.total_nutrition.carbs_g).sum::<f64>() / n).round(),
            protein_g: (completed_days.iter().map(|d| d.total_nutrition.protein_g).sum::<f64>() / n).round(),
            fat_g: (completed_days.iter().map(|d| d.total_nutrition.fat_g).sum::<f64>() / n).round(),
        }
    };

    let per_meal_budget = match profile.budget_type {
        BudgetPeriod::Weekly => (profile.budget / profile.total_meals() as f64).round(),
        BudgetPeriod::Daily => (profile.budget / profile.meals_per_day as f64).round(),
        BudgetPeriod::PerMeal => profile.budget,
    };

    let completed_meals_context = plan
        .days
        .iter()
        .filter(|d| d.day != target_day)
        .flat_map(|d| {
            d.meals.iter().map(|m| CompletedMealContext {
                day: d.day,
                meal_type: m.meal_type,
                menu_name: m.recipe.name.clone(),
                calories: m.recipe.nutrition.calories_kcal,
                cost: m.recipe.estimated_cost,
            })
        })
        .collect();

    let all_names = plan.recipe_names();
    let recently_used_recipes = all_names[all_names.len().saturating_sub(RECENT_RECIPE_WINDOW)..].to_vec();

    let used_ingredients = plan
        .days
        .iter()
        .skip(plan.days.len().saturating_sub(RECENT_INGREDIENT_DAYS))
        .flat_map(|d| {
            d.meals.iter().flat_map(|m| {
                m.recipe
                    .ingredients
                    .iter()
                    .take(PRIMARY_INGREDIENTS_PER_MEAL)
                    .map(|i| i.name.clone())
            })
        })
        .collect();

    RegenerateRequest {
        profile: RegenerateProfile::from_profile(profile),
        target_day,
        target_meal_type,
        daily_nutrition_targets,
        per_meal_budget,
        completed_meals_context,
        recently_used_recipes,
        used_ingredients,
    }
}

/// Regenerate one meal and install the replacement into the plan
///
/// Consumes the whole regeneration stream before returning. A backend
/// `error` event becomes [`BackendError::Remote`]; the return value says
/// whether a replacement was actually applied.
pub async fn regenerate_meal(
    backend: &dyn PlanBackend,
    plan: &mut Plan,
    target_day: u32,
    target_meal_type: MealType,
) -> Result<bool, BackendError> {
    let request = build_request(plan, target_day, target_meal_type);
    info!(day = target_day, meal_type = %target_meal_type, "regenerating meal");

    let mut stream = backend.regenerate_meal(&request).await?;
    let mut decoder = FrameDecoder::new();
    let mut events = Vec::new();

    while let Some(chunk) = stream.next().await {
        events.extend(decoder.feed(&chunk?));
        if decoder.is_finished() {
            break;
        }
    }
    events.extend(decoder.finish());

    let mut replaced = false;
    for event in events {
        match event {
            StreamEvent::MealRegenerateComplete { data, .. } => {
                if let Some(patch) = data.meal {
                    replaced |= mutate::replace_meal(plan, target_day, target_meal_type, patch);
                }
            }
            StreamEvent::Error { message, .. } => {
                return Err(BackendError::Remote(
                    message.unwrap_or_else(|| "meal regeneration failed".to_string()),
                ));
            }
            other => {
                debug!(event_type = other.event_type(), "regeneration event observed");
            }
        }
    }

    Ok(replaced)
}
