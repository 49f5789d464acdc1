//! Plan model, aggregation and mutation

pub mod aggregate;
pub mod mutate;
pub mod types;

pub use mutate::{MealPatch, RecipePatch, apply_alternative, replace_meal};
pub use types::{
    ActivityLevel, BudgetDistribution, BudgetPeriod, CookingTimeLimit, DayPlan, Difficulty, Gender, Goal, Ingredient,
    Meal, MealType, Nutrition, Plan, Recipe, SkillLevel, UserProfile,
};
