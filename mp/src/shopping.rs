//! Shopping list derivation
//!
//! Walks every meal's canonical ingredients, normalizes units, aggregates
//! quantities by (name, unit), and groups items into fixed categories for
//! display. Deterministic; no state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::plan::types::Plan;

/// Category display order; also the sort order of the finished list
pub const CATEGORY_ORDER: [&str; 7] = [
    "meat",
    "seafood",
    "vegetables",
    "dairy",
    "grains",
    "seasonings",
    "other",
];

/// Keyword table for ingredient classification
const CATEGORY_KEYWORDS: [(&str, &[&str]); 6] = [
    ("meat", &["chicken", "beef", "pork", "bacon", "ham", "lamb", "turkey", "sausage"]),
    ("seafood", &["fish", "salmon", "tuna", "mackerel", "shrimp", "squid", "clam", "oyster", "crab", "octopus"]),
    (
        "vegetables",
        &[
            "cabbage", "lettuce", "spinach", "broccoli", "carrot", "onion", "scallion", "garlic", "pepper", "eggplant",
            "zucchini", "radish", "sprout", "mushroom", "tomato", "cucumber", "avocado",
        ],
    ),
    ("dairy", &["milk", "cheese", "yogurt", "butter", "cream", "egg"]),
    ("grains", &["rice", "barley", "oat", "flour", "bread", "noodle", "pasta", "quinoa", "tortilla"]),
    (
        "seasonings",
        &["salt", "sugar", "soy sauce", "miso", "vinegar", "sesame", "oil", "spice", "sauce", "paste", "powder"],
    ),
];

/// One aggregated line of the shopping list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
}

/// Classify an ingredient name by keyword
pub fn categorize(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return category;
        }
    }
    "other"
}

/// Collapse unit aliases so quantities aggregate across recipes
pub fn normalize_unit(unit: &str) -> String {
    match unit.to_lowercase().as_str() {
        "tbsp" | "tablespoon" | "tablespoons" => "tbsp".to_string(),
        "tsp" | "teaspoon" | "teaspoons" => "tsp".to_string(),
        "cup" | "cups" => "cup".to_string(),
        "g" | "gram" | "grams" => "g".to_string(),
        "kg" => "kg".to_string(),
        "ml" => "ml".to_string(),
        "l" | "liter" | "liters" => "l".to_string(),
        "piece" | "pieces" | "pc" => "piece".to_string(),
        "slice" | "slices" => "slice".to_string(),
        other => other.to_string(),
    }
}

/// Derive the aggregated shopping list for a whole plan
pub fn shopping_list(plan: &Plan) -> Vec<ShoppingItem> {
    let mut items: HashMap<String, ShoppingItem> = HashMap::new();

    for day in &plan.days {
        for meal in &day.meals {
            for ingredient in &meal.recipe.ingredients {
                let unit = normalize_unit(&ingredient.unit);
                let key = format!("{}|{}", ingredient.name.to_lowercase(), unit);

                items
                    .entry(key)
                    .and_modify(|item| item.quantity += ingredient.quantity)
                    .or_insert_with(|| ShoppingItem {
                        name: ingredient.name.clone(),
                        quantity: ingredient.quantity,
                        unit,
                        category: categorize(&ingredient.name).to_string(),
                    });
            }
        }
    }

    let mut list: Vec<ShoppingItem> = items.into_values().collect();
    list.sort_by(|a, b| {
        let a_rank = CATEGORY_ORDER.iter().position(|c| *c == a.category);
        let b_rank = CATEGORY_ORDER.iter().position(|c| *c == b.category);
        a_rank.cmp(&b_rank).then_with(|| a.name.cmp(&b.name))
    });
    list
}
