//! Core meal plan model
//!
//! These types mirror the backend's wire format: a Plan is an ordered list
//! of days, each day an ordered list of meals, each meal a recipe with a
//! nutrition record. Denormalized totals (day nutrition/cost, plan cost)
//! are maintained by [`crate::plan::aggregate`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationBoard;

// === User profile ===

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    MuscleGain,
    Maintain,
    HealthManagement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookingTimeLimit {
    Under15Min,
    Under30Min,
    NoLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    Weekly,
    Daily,
    PerMeal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetDistribution {
    Equal,
    Weighted,
}

/// Input parameters for a generation session; immutable once submitted
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub gender: Gender,
    pub age: u32,
    /// Height in cm
    pub height: f64,
    /// Weight in kg
    pub weight: f64,
    pub goal: Goal,
    pub activity_level: ActivityLevel,

    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[serde(default)]
    pub health_conditions: Vec<String>,

    pub cooking_time: CookingTimeLimit,
    pub skill_level: SkillLevel,
    /// 1-4 meals per day
    pub meals_per_day: u32,
    /// 1-7 days
    pub days: u32,

    pub budget: f64,
    pub budget_type: BudgetPeriod,
    pub budget_distribution: BudgetDistribution,
}

impl UserProfile {
    /// Allergies and dietary preferences combined, as the backend expects
    pub fn restrictions(&self) -> Vec<String> {
        self.allergies
            .iter()
            .chain(self.dietary_preferences.iter())
            .cloned()
            .collect()
    }

    /// Total number of meals this profile generates
    pub fn total_meals(&self) -> u32 {
        self.days * self.meals_per_day
    }
}

// === Meal slots ===

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// The fixed slot set for a given meals-per-day count
    ///
    /// A single daily meal is lunch; two meals are breakfast and dinner.
    pub fn slots_for(meals_per_day: u32) -> &'static [MealType] {
        match meals_per_day {
            0 | 1 => &[MealType::Lunch],
            2 => &[MealType::Breakfast, MealType::Dinner],
            3 => &[MealType::Breakfast, MealType::Lunch, MealType::Dinner],
            _ => &[MealType::Breakfast, MealType::Lunch, MealType::Dinner, MealType::Snack],
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("unknown meal type: '{}'", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" | "medium" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: '{}'", other)),
        }
    }
}

// === Nutrition ===

/// Per-recipe or aggregated nutrition record: 4 required fields, 6 optional
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub calories_kcal: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium_mg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturated_fat_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol_mg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potassium_mg: Option<f64>,
}

// === Ingredients ===

/// Default unit when an ingredient comes without one (a count of items)
pub const COUNT_UNIT: &str = "piece";

static NAME_QTY_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+(\d+(?:\.\d+)?)\s*([a-zA-Z]+)$").unwrap());
static NAME_QTY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+?)\s+(\d+(?:\.\d+)?)$").unwrap());
static QTY_UNIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*([a-zA-Z]+)").unwrap());
static QTY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").unwrap());
static PARENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// Canonical ingredient shape
///
/// The wire carries ingredients either as plain strings ("chicken breast
/// 150g") or as {name, amount} pairs; both are resolved into this shape at
/// deserialization and consumed uniformly afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawIngredient")]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }

    /// Parse a free-form ingredient string like "chicken breast 150g",
    /// "egg 3" or "salt"
    pub fn parse(text: &str) -> Self {
        let cleaned = text.replace(['(', ')'], " ");
        let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

        if let Some(caps) = NAME_QTY_UNIT.captures(&cleaned) {
            return Self::new(caps[1].trim(), caps[2].parse().unwrap_or(1.0), &caps[3]);
        }
        if let Some(caps) = NAME_QTY.captures(&cleaned) {
            return Self::new(caps[1].trim(), caps[2].parse().unwrap_or(1.0), COUNT_UNIT);
        }
        Self::new(cleaned, 1.0, COUNT_UNIT)
    }

    /// Resolve a {name, amount} pair; amounts look like "150g", "3" or
    /// "6 (about 72g)" - parenthesized text is ignored
    fn from_pair(name: String, amount: &str) -> Self {
        let cleaned = PARENS.replace_all(amount, "");
        let cleaned = cleaned.trim();

        if let Some(caps) = QTY_UNIT.captures(cleaned) {
            return Self::new(name, caps[1].parse().unwrap_or(1.0), &caps[2]);
        }
        if let Some(caps) = QTY.captures(cleaned) {
            return Self::new(name, caps[1].parse().unwrap_or(1.0), COUNT_UNIT);
        }
        Self::new(name, 1.0, COUNT_UNIT)
    }
}

/// Wire shapes an ingredient may arrive in
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIngredient {
    Canonical { name: String, quantity: f64, unit: String },
    Pair { name: String, amount: String },
    Text(String),
}

impl From<RawIngredient> for Ingredient {
    fn from(raw: RawIngredient) -> Self {
        match raw {
            RawIngredient::Canonical { name, quantity, unit } => Self { name, quantity, unit },
            RawIngredient::Pair { name, amount } => Self::from_pair(name, &amount),
            RawIngredient::Text(text) => Self::parse(&text),
        }
    }
}

// === Plan structure ===

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub cooking_time_min: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub meal_type: MealType,
    pub recipe: Recipe,
    #[serde(default)]
    pub budget_allocated: f64,
    #[serde(default)]
    pub validation_status: ValidationBoard,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based day index
    pub day: u32,
    #[serde(default)]
    pub meals: Vec<Meal>,
    /// Aggregated over meals; kept consistent by the aggregator
    #[serde(default)]
    pub total_nutrition: Nutrition,
    #[serde(default)]
    pub total_cost: f64,
}

/// Root aggregate: the finished multi-day plan
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub profile: UserProfile,
    pub days: Vec<DayPlan>,
    pub total_budget: f64,
    /// Always equals the sum of day costs
    pub total_cost: f64,
    pub avg_daily_nutrition: Nutrition,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Names of every recipe currently in the plan, in day/meal order
    pub fn recipe_names(&self) -> Vec<String> {
        self.days
            .iter()
            .flat_map(|d| d.meals.iter().map(|m| m.recipe.name.clone()))
            .collect()
    }

    pub fn find_day(&self, day: u32) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.day == day)
    }

    pub fn find_meal(&self, day: u32, meal_type: MealType) -> Option<&Meal> {
        self.find_day(day)?.meals.iter().find(|m| m.meal_type == meal_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_profile;

    #[test]
    fn test_restrictions_concatenates_allergies_and_preferences() {
        let mut profile = test_profile();
        profile.allergies = vec!["peanut".to_string()];
        profile.dietary_preferences = vec!["vegetarian".to_string()];

        assert_eq!(profile.restrictions(), vec!["peanut", "vegetarian"]);
    }

    #[test]
    fn test_meal_slots_per_day() {
        assert_eq!(MealType::slots_for(1), &[MealType::Lunch]);
        assert_eq!(MealType::slots_for(2), &[MealType::Breakfast, MealType::Dinner]);
        assert_eq!(
            MealType::slots_for(3),
            &[MealType::Breakfast, MealType::Lunch, MealType::Dinner]
        );
        assert_eq!(MealType::slots_for(4).len(), 4);
    }

    #[test]
    fn test_ingredient_parse_name_quantity_unit() {
        let ing = Ingredient::parse("chicken breast 150g");
        assert_eq!(ing.name, "chicken breast");
        assert_eq!(ing.quantity, 150.0);
        assert_eq!(ing.unit, "g");
    }

    #[test]
    fn test_ingredient_parse_quantity_without_unit() {
        let ing = Ingredient::parse("egg 3");
        assert_eq!(ing.name, "egg");
        assert_eq!(ing.quantity, 3.0);
        assert_eq!(ing.unit, COUNT_UNIT);
    }

    #[test]
    fn test_ingredient_parse_bare_name() {
        let ing = Ingredient::parse("salt");
        assert_eq!(ing.name, "salt");
        assert_eq!(ing.quantity, 1.0);
        assert_eq!(ing.unit, COUNT_UNIT);
    }

    #[test]
    fn test_ingredient_deserializes_from_string() {
        let ing: Ingredient = serde_json::from_str(r#""olive oil 10ml""#).unwrap();
        assert_eq!(ing.name, "olive oil");
        assert_eq!(ing.quantity, 10.0);
        assert_eq!(ing.unit, "ml");
    }

    #[test]
    fn test_ingredient_deserializes_from_pair() {
        let ing: Ingredient = serde_json::from_str(r#"{"name": "tofu", "amount": "6 (about 72g)"}"#).unwrap();
        assert_eq!(ing.name, "tofu");
        assert_eq!(ing.quantity, 6.0);
        assert_eq!(ing.unit, COUNT_UNIT);
    }

    #[test]
    fn test_ingredient_roundtrips_through_canonical_shape() {
        let original = Ingredient::new("rice", 200.0, "g");
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Ingredient = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_meal_type_from_str() {
        assert_eq!("lunch".parse::<MealType>().unwrap(), MealType::Lunch);
        assert!("brunch".parse::<MealType>().is_err());
    }
}
