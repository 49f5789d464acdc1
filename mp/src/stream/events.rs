//! Typed vocabulary for the generation event stream
//!
//! Every frame the backend sends carries a `type` tag; the payload shape
//! differs per tag. Unknown tags decode to [`StreamEvent::Unknown`] and are
//! ignored by dispatch, so protocol additions never break an older client.

use serde::{Deserialize, Serialize};

use crate::plan::mutate::MealPatch;
use crate::plan::types::{DayPlan, MealType, Nutrition};

/// Lifecycle status a backend node reports alongside an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Started,
    Completed,
    Failed,
    /// Some nodes report transient states ("running"); anything else lands here
    #[serde(other)]
    Other,
}

/// Payload of a `progress` event; every field is optional on the wire
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressData {
    pub day: Option<u32>,
    pub meal: Option<u32>,
    pub meal_type: Option<MealType>,
    pub task: Option<String>,
    /// May arrive inconsistent or negative; the session clamps the ratio
    pub completed_meals: Option<f64>,
    pub total_meals: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationData {
    pub passed: Option<bool>,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MealCompleteData {
    pub day: Option<u32>,
    pub meal_type: Option<MealType>,
    /// Name of the finished menu
    pub menu: Option<String>,
    pub calories: Option<f64>,
    pub cost: Option<f64>,
    pub completed_meals: Option<f64>,
    pub total_meals: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompleteData {
    /// The finished plan's day list; absent means a no-op completion
    pub meal_plan: Option<Vec<DayPlan>>,
    pub avg_daily_nutrition: Option<Nutrition>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegenerateCompleteData {
    /// Replacement meal; recipe fields are individually optional
    pub meal: Option<MealPatch>,
}

/// One decoded frame from the generation stream
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Progress {
        node: Option<String>,
        status: Option<NodeStatus>,
        #[serde(default)]
        data: ProgressData,
        message: Option<String>,
        timestamp: Option<String>,
    },
    Validation {
        node: Option<String>,
        status: Option<NodeStatus>,
        #[serde(default)]
        data: ValidationData,
        message: Option<String>,
        timestamp: Option<String>,
    },
    Retry {
        node: Option<String>,
        message: Option<String>,
        timestamp: Option<String>,
    },
    MealComplete {
        node: Option<String>,
        status: Option<NodeStatus>,
        #[serde(default)]
        data: MealCompleteData,
        timestamp: Option<String>,
    },
    /// Declared by the protocol; currently carries no handler
    MealRegenerateProgress {
        #[serde(default)]
        data: serde_json::Value,
        message: Option<String>,
        timestamp: Option<String>,
    },
    MealRegenerateComplete {
        #[serde(default)]
        data: RegenerateCompleteData,
        timestamp: Option<String>,
    },
    /// Observed but inert; reserved for future use
    DayComplete {
        #[serde(default)]
        data: serde_json::Value,
        message: Option<String>,
        timestamp: Option<String>,
    },
    Complete {
        #[serde(default)]
        data: CompleteData,
        message: Option<String>,
        timestamp: Option<String>,
    },
    Error {
        message: Option<String>,
        timestamp: Option<String>,
    },
    /// Declared by the protocol; currently carries no handler
    Warning {
        message: Option<String>,
        timestamp: Option<String>,
    },
    /// Any tag this client does not know
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            StreamEvent::Progress { .. } => "progress",
            StreamEvent::Validation { .. } => "validation",
            StreamEvent::Retry { .. } => "retry",
            StreamEvent::MealComplete { .. } => "meal_complete",
            StreamEvent::MealRegenerateProgress { .. } => "meal_regenerate_progress",
            StreamEvent::MealRegenerateComplete { .. } => "meal_regenerate_complete",
            StreamEvent::DayComplete { .. } => "day_complete",
            StreamEvent::Complete { .. } => "complete",
            StreamEvent::Error { .. } => "error",
            StreamEvent::Warning { .. } => "warning",
            StreamEvent::Unknown => "unknown",
        }
    }
}
