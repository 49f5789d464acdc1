//! Session-owned state: processing progress, agent activity, results
//!
//! The generation session exclusively owns this state for its lifetime;
//! the presentation layer reads cloned snapshots.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::plan::types::{MealType, Plan, UserProfile};
use crate::stream::StreamEvent;
use crate::validation::ValidationBoard;

/// Bounded event log size; the oldest entries are silently dropped
pub const EVENT_LOG_CAP: usize = 100;

/// Lifecycle of one generation attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Connecting,
    Streaming,
    Completed,
    Errored,
    Stopped,
}

/// The three logical worker roles reported through progress events
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Nutritionist,
    Chef,
    BudgetManager,
}

impl AgentRole {
    pub const ALL: [AgentRole; 3] = [AgentRole::Nutritionist, AgentRole::Chef, AgentRole::BudgetManager];

    /// Match a backend node name to a role by substring keyword
    pub fn from_node(node: &str) -> Option<AgentRole> {
        if node.contains("nutritionist") {
            Some(AgentRole::Nutritionist)
        } else if node.contains("chef") {
            Some(AgentRole::Chef)
        } else if node.contains("budget") {
            Some(AgentRole::BudgetManager)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Idle,
    Working,
    Completed,
    Error,
}

/// Live status of one worker role
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub role: AgentRole,
    pub status: AgentState,
    pub current_task: Option<String>,
}

impl AgentStatus {
    fn idle(role: AgentRole) -> Self {
        Self {
            role,
            status: AgentState::Idle,
            current_task: None,
        }
    }
}

/// A meal the backend confirmed finished during generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletedMeal {
    pub day: u32,
    pub meal_type: MealType,
    pub menu_name: String,
    pub calories: f64,
    pub cost: f64,
}

/// Aggregate processing state for the in-flight generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessingState {
    pub is_processing: bool,
    pub current_day: u32,
    pub current_meal: u32,
    pub current_meal_type: Option<MealType>,
    /// 0-100
    pub total_progress: u8,
    pub validation: ValidationBoard,
    pub retry_count: u32,
    /// Most recent first
    pub event_log: VecDeque<StreamEvent>,
    pub error: Option<String>,
}

impl ProcessingState {
    /// The quiescent form before any session has started
    pub fn idle() -> Self {
        Self {
            is_processing: false,
            current_day: 0,
            current_meal: 0,
            current_meal_type: None,
            total_progress: 0,
            validation: ValidationBoard::default(),
            retry_count: 0,
            event_log: VecDeque::new(),
            error: None,
        }
    }

    /// The initial form at the start of a generation attempt
    pub fn started(profile: &UserProfile) -> Self {
        Self {
            is_processing: true,
            current_day: 1,
            current_meal: 1,
            current_meal_type: MealType::slots_for(profile.meals_per_day).first().copied(),
            total_progress: 0,
            validation: ValidationBoard::default(),
            retry_count: 0,
            event_log: VecDeque::new(),
            error: None,
        }
    }

    /// Append to the bounded log, newest first
    pub fn push_event(&mut self, event: StreamEvent) {
        self.event_log.push_front(event);
        self.event_log.truncate(EVENT_LOG_CAP);
    }

    /// Recompute total progress from completed/total meal counts
    ///
    /// Inputs come off the wire and may be inconsistent; the result is
    /// clamped to [0, 100] and non-finite ratios are ignored.
    pub fn set_progress_ratio(&mut self, completed: f64, total: f64) {
        let pct = (100.0 * completed / total).round();
        if pct.is_finite() {
            self.total_progress = pct.clamp(0.0, 100.0) as u8;
        } else {
            debug!(completed, total, "ignoring non-finite progress ratio");
        }
    }

    /// Record a terminal error
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.is_processing = false;
    }
}

/// Everything a generation session owns
#[derive(Clone, Debug)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub processing: ProcessingState,
    pub agents: Vec<AgentStatus>,
    pub completed_meals: Vec<CompletedMeal>,
    /// Present only after a session completed with a plan payload
    pub plan: Option<Plan>,
    /// The input that started the current attempt
    pub profile: Option<UserProfile>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            processing: ProcessingState::idle(),
            agents: AgentRole::ALL.iter().map(|r| AgentStatus::idle(*r)).collect(),
            completed_meals: Vec::new(),
            plan: None,
            profile: None,
        }
    }

    /// Reset everything to the initial form for a new attempt
    pub fn reset_for(&mut self, profile: UserProfile) {
        self.processing = ProcessingState::started(&profile);
        self.agents = AgentRole::ALL.iter().map(|r| AgentStatus::idle(*r)).collect();
        self.completed_meals.clear();
        self.plan = None;
        self.profile = Some(profile);
    }

    pub fn set_agent(&mut self, role: AgentRole, status: AgentState, task: Option<String>) {
        if let Some(agent) = self.agents.iter_mut().find(|a| a.role == role) {
            agent.status = status;
            agent.current_task = task;
        }
    }

    pub fn agent(&self, role: AgentRole) -> Option<&AgentStatus> {
        self.agents.iter().find(|a| a.role == role)
    }

    pub fn has_result(&self) -> bool {
        self.plan.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.processing.error.as_deref()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
