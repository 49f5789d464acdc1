//! Nutrition arithmetic
//!
//! Pure formulas: Mifflin-St Jeor energy expenditure, goal-adjusted calorie
//! and macro targets, field-wise nutrition summation, and health-condition
//! limit checks. No state, no IO.

use crate::plan::types::{ActivityLevel, Gender, Goal, Nutrition, UserProfile};

/// Daily targets used when no completed day exists yet to average over
pub const FALLBACK_DAILY_TARGETS: DailyTargets = DailyTargets {
    calories: 1800.0,
    carb_g: 225.0,
    protein_g: 135.0,
    fat_g: 40.0,
};

/// Daily calorie/macro targets for one day of meals
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DailyTargets {
    pub calories: f64,
    pub carb_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
}

/// Basal metabolic rate (Mifflin-St Jeor)
pub fn bmr(profile: &UserProfile) -> f64 {
    let base = 10.0 * profile.weight + 6.25 * profile.height - 5.0 * profile.age as f64;
    match profile.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Total daily energy expenditure
pub fn tdee(profile: &UserProfile) -> f64 {
    let multiplier = match profile.activity_level {
        ActivityLevel::Low => 1.2,
        ActivityLevel::Moderate => 1.375,
        ActivityLevel::High => 1.55,
        ActivityLevel::VeryHigh => 1.725,
    };
    (bmr(profile) * multiplier).round()
}

/// Goal-adjusted daily calorie target
pub fn target_calories(profile: &UserProfile) -> f64 {
    let tdee = tdee(profile);
    match profile.goal {
        Goal::WeightLoss => tdee - 500.0,
        Goal::MuscleGain => tdee + 500.0,
        Goal::Maintain | Goal::HealthManagement => tdee,
    }
}

/// Macro gram targets for a calorie budget
///
/// Protein and carbs count 4 kcal/g, fat 9 kcal/g.
pub fn macro_targets(calories: f64, goal: Goal) -> MacroTargets {
    let (protein_ratio, fat_ratio, carb_ratio) = match goal {
        Goal::WeightLoss => (0.35, 0.25, 0.4),
        _ => (0.3, 0.25, 0.45),
    };

    MacroTargets {
        protein_g: (calories * protein_ratio / 4.0).round(),
        fat_g: (calories * fat_ratio / 9.0).round(),
        carbs_g: (calories * carb_ratio / 4.0).round(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacroTargets {
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
}

/// Field-wise sum over nutrition records
///
/// Absent optional fields contribute 0; the sums are always present.
pub fn sum<'a>(items: impl IntoIterator<Item = &'a Nutrition>) -> Nutrition {
    let mut total = Nutrition {
        sodium_mg: Some(0.0),
        sugar_g: Some(0.0),
        saturated_fat_g: Some(0.0),
        cholesterol_mg: Some(0.0),
        fiber_g: Some(0.0),
        potassium_mg: Some(0.0),
        ..Nutrition::default()
    };

    for n in items {
        total.calories_kcal += n.calories_kcal;
        total.protein_g += n.protein_g;
        total.fat_g += n.fat_g;
        total.carbs_g += n.carbs_g;
        add_opt(&mut total.sodium_mg, n.sodium_mg);
        add_opt(&mut total.sugar_g, n.sugar_g);
        add_opt(&mut total.saturated_fat_g, n.saturated_fat_g);
        add_opt(&mut total.cholesterol_mg, n.cholesterol_mg);
        add_opt(&mut total.fiber_g, n.fiber_g);
        add_opt(&mut total.potassium_mg, n.potassium_mg);
    }

    total
}

fn add_opt(total: &mut Option<f64>, value: Option<f64>) {
    if let Some(v) = value {
        *total = Some(total.unwrap_or(0.0) + v);
    }
}

/// Check a nutrition record against health-condition limits
///
/// Returns the list of violated limits; empty means the check passed.
pub fn health_violations(nutrition: &Nutrition, health_conditions: &[String]) -> Vec<String> {
    let mut violations = Vec::new();
    let has = |name: &str| health_conditions.iter().any(|c| c == name);

    if has("diabetes")
        && let Some(sugar) = nutrition.sugar_g
        && sugar > 30.0
    {
        violations.push(format!("sugar {}g (limit 30g)", sugar));
    }

    if has("hypertension")
        && let Some(sodium) = nutrition.sodium_mg
        && sodium > 2000.0
    {
        violations.push(format!("sodium {}mg (limit 2000mg)", sodium));
    }

    if has("hyperlipidemia")
        && let Some(sat_fat) = nutrition.saturated_fat_g
        && sat_fat > 15.0
    {
        violations.push(format!("saturated fat {}g (limit 15g)", sat_fat));
    }

    violations
}
