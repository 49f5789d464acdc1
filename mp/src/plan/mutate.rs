//! In-place meal replacement
//!
//! A confirmed replacement (regenerated meal or chosen alternative) swaps a
//! meal wholesale. Replacement payloads routinely arrive with missing
//! recipe fields - externally sourced alternatives in particular carry no
//! macros - so every absent field falls back to the meal being replaced;
//! the plan never regresses to missing data. Aggregate totals are
//! recomputed before returning.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::AlternativeRecipe;
use crate::plan::aggregate;
use crate::plan::types::{Difficulty, Ingredient, Meal, MealType, Nutrition, Plan, Recipe};
use crate::validation::ValidationBoard;

/// Partial recipe carried by a replacement payload
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<String>>,
    pub cooking_time_min: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub estimated_cost: Option<f64>,
    pub nutrition: Option<Nutrition>,
    pub source: Option<String>,
}

/// Partial meal carried by a replacement payload
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MealPatch {
    pub meal_type: Option<MealType>,
    #[serde(default)]
    pub recipe: RecipePatch,
    pub budget_allocated: Option<f64>,
}

/// Replace one meal in place and recompute the affected totals
///
/// Missing targets are logged and left untouched; nothing propagates to
/// the caller beyond the returned bool.
pub fn replace_meal(plan: &mut Plan, target_day: u32, target_meal_type: MealType, patch: MealPatch) -> bool {
    let Some(day) = plan.days.iter_mut().find(|d| d.day == target_day) else {
        warn!(day = target_day, "replacement target day not in plan");
        return false;
    };

    let Some(meal) = day.meals.iter_mut().find(|m| m.meal_type == target_meal_type) else {
        warn!(
            day = target_day,
            meal_type = %target_meal_type,
            "replacement target meal not in day"
        );
        return false;
    };

    let current = meal.clone();
    let p = patch.recipe;

    let ingredients = match p.ingredients {
        Some(list) if !list.is_empty() => list,
        _ => current.recipe.ingredients.clone(),
    };
    let instructions = match p.instructions {
        Some(list) if !list.is_empty() => list,
        _ => current.recipe.instructions.clone(),
    };

    *meal = Meal {
        meal_type: target_meal_type,
        recipe: Recipe {
            name: p.name.unwrap_or_else(|| current.recipe.name.clone()),
            ingredients,
            instructions,
            cooking_time_min: p.cooking_time_min.unwrap_or(current.recipe.cooking_time_min),
            difficulty: p.difficulty.unwrap_or(current.recipe.difficulty),
            estimated_cost: p.estimated_cost.unwrap_or(current.recipe.estimated_cost),
            nutrition: p.nutrition.unwrap_or_else(|| current.recipe.nutrition.clone()),
            source: p.source.or_else(|| current.recipe.source.clone()),
        },
        budget_allocated: patch.budget_allocated.unwrap_or(current.budget_allocated),
        // The replacement is pre-validated by its source
        validation_status: ValidationBoard::all_passed(),
    };

    aggregate::recompute_day(day);
    plan.total_cost = aggregate::plan_total_cost(&plan.days);

    debug!(day = target_day, meal_type = %target_meal_type, "meal replaced");
    true
}

/// Install a chosen alternative recipe into the plan
///
/// Alternatives come from an external search and only carry calories among
/// the nutrition fields; the remaining macros are kept from the current
/// meal. Unrecognized difficulty text also falls back.
pub fn apply_alternative(plan: &mut Plan, target_day: u32, target_meal_type: MealType, alt: &AlternativeRecipe) -> bool {
    let Some(current) = plan.find_meal(target_day, target_meal_type) else {
        warn!(day = target_day, meal_type = %target_meal_type, "alternative target meal not in plan");
        return false;
    };

    let mut nutrition = current.recipe.nutrition.clone();
    if let Some(calories) = alt.calories {
        nutrition.calories_kcal = calories;
    }

    let ingredients = if alt.ingredients.is_empty() {
        None
    } else {
        Some(alt.ingredients.iter().map(|s| Ingredient::parse(s)).collect())
    };

    let patch = MealPatch {
        meal_type: Some(target_meal_type),
        recipe: RecipePatch {
            name: Some(alt.name.clone()),
            ingredients,
            instructions: Some(vec![format!("Original recipe: {}", alt.url)]),
            cooking_time_min: alt.cooking_time,
            difficulty: alt.difficulty.as_deref().and_then(|d| d.parse().ok()),
            estimated_cost: alt.cost,
            nutrition: Some(nutrition),
            source: Some(alt.url.clone()),
        },
        budget_allocated: alt.cost,
    };

    replace_meal(plan, target_day, target_meal_type, patch)
}
