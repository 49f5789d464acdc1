//! Per-meal validation tracking
//!
//! The backend runs five independent checks against every in-flight meal.
//! Each check reports through `validation` events keyed by its node name;
//! this module maps nodes to slots and tracks slot status until the meal
//! completes.

use serde::{Deserialize, Serialize};

/// The five validator slots tracked per in-flight meal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    Nutrition,
    Allergy,
    Time,
    Health,
    Budget,
}

impl Validator {
    pub const ALL: [Validator; 5] = [
        Validator::Nutrition,
        Validator::Allergy,
        Validator::Time,
        Validator::Health,
        Validator::Budget,
    ];

    /// Map a backend node name to its validator slot
    ///
    /// Unmapped node names return None and are ignored by the caller.
    pub fn from_node(node: &str) -> Option<Validator> {
        match node {
            "nutrition_checker" => Some(Validator::Nutrition),
            "allergy_checker" => Some(Validator::Allergy),
            "time_checker" => Some(Validator::Time),
            "health_checker" => Some(Validator::Health),
            "budget_checker" => Some(Validator::Budget),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorStatus {
    #[default]
    Pending,
    Passed,
    Failed,
}

/// Status of all five validator slots
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationBoard {
    #[serde(default)]
    pub nutrition: ValidatorStatus,
    #[serde(default)]
    pub allergy: ValidatorStatus,
    #[serde(default)]
    pub time: ValidatorStatus,
    #[serde(default)]
    pub health: ValidatorStatus,
    #[serde(default)]
    pub budget: ValidatorStatus,
}

impl ValidationBoard {
    /// All slots passed - used when installing a pre-validated replacement
    pub fn all_passed() -> Self {
        Self {
            nutrition: ValidatorStatus::Passed,
            allergy: ValidatorStatus::Passed,
            time: ValidatorStatus::Passed,
            health: ValidatorStatus::Passed,
            budget: ValidatorStatus::Passed,
        }
    }

    pub fn get(&self, validator: Validator) -> ValidatorStatus {
        match validator {
            Validator::Nutrition => self.nutrition,
            Validator::Allergy => self.allergy,
            Validator::Time => self.time,
            Validator::Health => self.health,
            Validator::Budget => self.budget,
        }
    }

    pub fn set(&mut self, validator: Validator, status: ValidatorStatus) {
        match validator {
            Validator::Nutrition => self.nutrition = status,
            Validator::Allergy => self.allergy = status,
            Validator::Time => self.time = status,
            Validator::Health => self.health = status,
            Validator::Budget => self.budget = status,
        }
    }

    /// Reset every slot to pending (meal boundary or session start)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_all_passed(&self) -> bool {
        Validator::ALL.iter().all(|v| self.get(*v) == ValidatorStatus::Passed)
    }

    pub fn any_failed(&self) -> bool {
        Validator::ALL.iter().any(|v| self.get(*v) == ValidatorStatus::Failed)
    }

    pub fn passed_count(&self) -> usize {
        Validator::ALL
            .iter()
            .filter(|v| self.get(**v) == ValidatorStatus::Passed)
            .count()
    }
}
