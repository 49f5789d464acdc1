//! Shared fixtures for unit tests

use crate::plan::aggregate;
use crate::plan::types::{
    ActivityLevel, BudgetDistribution, BudgetPeriod, CookingTimeLimit, DayPlan, Difficulty, Gender, Goal, Ingredient,
    Meal, MealType, Nutrition, Plan, Recipe, SkillLevel, UserProfile,
};
use crate::validation::ValidationBoard;

pub(crate) fn test_profile() -> UserProfile {
    UserProfile {
        gender: Gender::Male,
        age: 28,
        height: 178.0,
        weight: 75.0,
        goal: Goal::WeightLoss,
        activity_level: ActivityLevel::Moderate,
        allergies: vec![],
        dietary_preferences: vec![],
        health_conditions: vec![],
        cooking_time: CookingTimeLimit::Under30Min,
        skill_level: SkillLevel::Intermediate,
        meals_per_day: 3,
        days: 7,
        budget: 70000.0,
        budget_type: BudgetPeriod::Weekly,
        budget_distribution: BudgetDistribution::Equal,
    }
}

pub(crate) fn sample_meal(meal_type: MealType, name: &str, calories: f64, cost: f64) -> Meal {
    Meal {
        meal_type,
        recipe: Recipe {
            name: name.to_string(),
            ingredients: vec![
                Ingredient::new(format!("{} base", name), 100.0, "g"),
                Ingredient::new("onion", 1.0, "piece"),
                Ingredient::new("garlic", 5.0, "g"),
            ],
            instructions: vec!["prep".to_string(), "cook".to_string()],
            cooking_time_min: 20,
            difficulty: Difficulty::Easy,
            estimated_cost: cost,
            nutrition: Nutrition {
                calories_kcal: calories,
                protein_g: 30.0,
                fat_g: 15.0,
                carbs_g: 70.0,
                sodium_mg: Some(600.0),
                ..Nutrition::default()
            },
            source: None,
        },
        budget_allocated: cost,
        validation_status: ValidationBoard::all_passed(),
    }
}

/// A two-day, two-meals-per-day plan with consistent totals
pub(crate) fn sample_plan() -> Plan {
    let mut profile = test_profile();
    profile.meals_per_day = 2;
    profile.days = 2;

    let mut plan = Plan {
        total_budget: profile.budget,
        profile,
        days: vec![
            DayPlan {
                day: 1,
                meals: vec![
                    sample_meal(MealType::Breakfast, "oatmeal bowl", 450.0, 3000.0),
                    sample_meal(MealType::Lunch, "chicken salad", 620.0, 5500.0),
                ],
                total_nutrition: Nutrition::default(),
                total_cost: 0.0,
            },
            DayPlan {
                day: 2,
                meals: vec![
                    sample_meal(MealType::Breakfast, "avocado toast", 480.0, 3500.0),
                    sample_meal(MealType::Lunch, "beef bibimbap", 700.0, 7000.0),
                ],
                total_nutrition: Nutrition::default(),
                total_cost: 0.0,
            },
        ],
        total_cost: 0.0,
        avg_daily_nutrition: Nutrition::default(),
        created_at: chrono::Utc::now(),
    };

    aggregate::recompute_plan(&mut plan);
    plan
}
