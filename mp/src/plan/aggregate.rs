//! Aggregate total recomputation
//!
//! Day nutrition/cost and the plan cost are denormalized onto the plan
//! structure; every function here recomputes them from the meal lists so no
//! total is ever left stale after a mutation.

use crate::nutrition;
use crate::plan::types::{DayPlan, Meal, Nutrition, Plan};

/// Recompute a day's totals from its current meal list
pub fn day_totals(meals: &[Meal]) -> (Nutrition, f64) {
    let total_nutrition = nutrition::sum(meals.iter().map(|m| &m.recipe.nutrition));
    let total_cost = meals.iter().map(|m| m.recipe.estimated_cost).sum();
    (total_nutrition, total_cost)
}

/// Recompute and store a day's denormalized totals
pub fn recompute_day(day: &mut DayPlan) {
    let (total_nutrition, total_cost) = day_totals(&day.meals);
    day.total_nutrition = total_nutrition;
    day.total_cost = total_cost;
}

/// Plan cost: the sum of day costs
pub fn plan_total_cost(days: &[DayPlan]) -> f64 {
    days.iter().map(|d| d.total_cost).sum()
}

/// Average of the day nutrition totals
pub fn average_daily_nutrition(days: &[DayPlan]) -> Nutrition {
    if days.is_empty() {
        return Nutrition::default();
    }

    let mut avg = nutrition::sum(days.iter().map(|d| &d.total_nutrition));
    let n = days.len() as f64;

    avg.calories_kcal /= n;
    avg.protein_g /= n;
    avg.fat_g /= n;
    avg.carbs_g /= n;
    for field in [
        &mut avg.sodium_mg,
        &mut avg.sugar_g,
        &mut avg.saturated_fat_g,
        &mut avg.cholesterol_mg,
        &mut avg.fiber_g,
        &mut avg.potassium_mg,
    ] {
        if let Some(v) = field {
            *v /= n;
        }
    }

    avg
}

/// Recompute every denormalized total in the plan
pub fn recompute_plan(plan: &mut Plan) {
    for day in &mut plan.days {
        recompute_day(day);
    }
    plan.total_cost = plan_total_cost(&plan.days);
    plan.avg_daily_nutrition = average_daily_nutrition(&plan.days);
}
