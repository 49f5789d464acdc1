//! Request and query payloads for the backend API

use serde::{Deserialize, Serialize};

use crate::nutrition::DailyTargets;
use crate::plan::types::{
    ActivityLevel, BudgetDistribution, BudgetPeriod, CookingTimeLimit, Gender, Goal, Meal, MealType, Plan, SkillLevel,
    UserProfile,
};

/// Default tolerance around the target calories when searching alternatives
pub const DEFAULT_CALORIE_TOLERANCE: f64 = 50.0;

/// Default tolerance around the target cost when searching alternatives
pub const DEFAULT_COST_TOLERANCE: f64 = 1000.0;

/// Body of the generation start request
///
/// Allergies and dietary preferences are combined into `restrictions`; the
/// backend does not see them separately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub gender: Gender,
    pub age: u32,
    pub height: f64,
    pub weight: f64,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub restrictions: Vec<String>,
    pub health_conditions: Vec<String>,
    pub cooking_time: CookingTimeLimit,
    pub skill_level: SkillLevel,
    pub meals_per_day: u32,
    pub days: u32,
    pub budget: f64,
    pub budget_type: BudgetPeriod,
    pub budget_distribution: BudgetDistribution,
}

impl GenerateRequest {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            gender: profile.gender,
            age: profile.age,
            height: profile.height,
            weight: profile.weight,
            goal: profile.goal,
            activity_level: profile.activity_level,
            restrictions: profile.restrictions(),
            health_conditions: profile.health_conditions.clone(),
            cooking_time: profile.cooking_time,
            skill_level: profile.skill_level,
            meals_per_day: profile.meals_per_day,
            days: profile.days,
            budget: profile.budget,
            budget_type: profile.budget_type,
            budget_distribution: profile.budget_distribution,
        }
    }
}

/// Profile block inside a regeneration request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegenerateProfile {
    pub goal: Goal,
    pub weight: f64,
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub restrictions: Vec<String>,
    pub health_conditions: Vec<String>,
    pub calorie_adjustment: Option<f64>,
    pub budget: f64,
    pub budget_type: BudgetPeriod,
    pub budget_distribution: BudgetDistribution,
    pub cooking_time: CookingTimeLimit,
    pub skill_level: SkillLevel,
    pub meals_per_day: u32,
    pub days: u32,
}

impl RegenerateProfile {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            goal: profile.goal,
            weight: profile.weight,
            height: profile.height,
            age: profile.age,
            gender: profile.gender,
            activity_level: profile.activity_level,
            restrictions: profile.restrictions(),
            health_conditions: profile.health_conditions.clone(),
            calorie_adjustment: None,
            budget: profile.budget,
            budget_type: profile.budget_type,
            budget_distribution: profile.budget_distribution,
            cooking_time: profile.cooking_time,
            skill_level: profile.skill_level,
            meals_per_day: profile.meals_per_day,
            days: profile.days,
        }
    }
}

/// One prior meal handed to the backend as regeneration context
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletedMealContext {
    pub day: u32,
    pub meal_type: MealType,
    pub menu_name: String,
    pub calories: f64,
    pub cost: f64,
}

/// Body of the meal regeneration request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegenerateRequest {
    pub profile: RegenerateProfile,
    pub target_day: u32,
    pub target_meal_type: MealType,
    pub daily_nutrition_targets: DailyTargets,
    pub per_meal_budget: f64,
    pub completed_meals_context: Vec<CompletedMealContext>,
    pub recently_used_recipes: Vec<String>,
    pub used_ingredients: Vec<String>,
}

/// Query for alternative recipe suggestions
#[derive(Clone, Debug, PartialEq)]
pub struct AlternativeQuery {
    pub current_menu: String,
    pub target_calories: f64,
    pub target_cost: f64,
    pub calorie_tolerance: f64,
    pub cost_tolerance: f64,
    pub target_carb_g: Option<f64>,
    pub target_protein_g: Option<f64>,
    pub target_fat_g: Option<f64>,
    pub restrictions: Vec<String>,
    /// Every recipe already in the plan, so suggestions don't duplicate it
    pub exclude_recipes: Vec<String>,
}

impl AlternativeQuery {
    /// Build the query for one meal with the default tolerances
    pub fn for_meal(meal: &Meal, plan: &Plan) -> Self {
        let nutrition = &meal.recipe.nutrition;
        Self {
            current_menu: meal.recipe.name.clone(),
            target_calories: nutrition.calories_kcal,
            target_cost: meal.recipe.estimated_cost,
            calorie_tolerance: DEFAULT_CALORIE_TOLERANCE,
            cost_tolerance: DEFAULT_COST_TOLERANCE,
            target_carb_g: Some(nutrition.carbs_g),
            target_protein_g: Some(nutrition.protein_g),
            target_fat_g: Some(nutrition.fat_g),
            restrictions: plan.profile.restrictions(),
            exclude_recipes: plan.recipe_names(),
        }
    }

    /// URL query pairs; empty lists and absent macros are omitted
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("current_menu", self.current_menu.clone()),
            ("target_calories", self.target_calories.to_string()),
            ("target_cost", self.target_cost.to_string()),
            ("calorie_tolerance", self.calorie_tolerance.to_string()),
            ("cost_tolerance", self.cost_tolerance.to_string()),
        ];

        if let Some(carb) = self.target_carb_g {
            pairs.push(("target_carb_g", carb.to_string()));
        }
        if let Some(protein) = self.target_protein_g {
            pairs.push(("target_protein_g", protein.to_string()));
        }
        if let Some(fat) = self.target_fat_g {
            pairs.push(("target_fat_g", fat.to_string()));
        }
        if !self.restrictions.is_empty() {
            pairs.push(("restrictions", self.restrictions.join(",")));
        }
        if !self.exclude_recipes.is_empty() {
            pairs.push(("exclude_recipes", self.exclude_recipes.join(",")));
        }

        pairs
    }
}

/// One alternative recipe suggestion from the backend's search
///
/// Sourced from external recipe sites, so most fields can be absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlternativeRecipe {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub content_preview: String,
    pub calories: Option<f64>,
    pub cost: Option<f64>,
    pub cooking_time: Option<u32>,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}
