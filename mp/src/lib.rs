//! Mealplan - streaming meal-plan generation client
//!
//! Talks to a meal-plan generation backend that streams line-framed events
//! while it assembles a multi-day plan. The client decodes the stream,
//! keeps derived state consistent (progress, per-validator status, agent
//! activity, completed meals), publishes the finished plan, and supports
//! local mutation (meal regeneration, alternative recipes) with aggregate
//! totals recomputed after every change.
//!
//! # Core Concepts
//!
//! - **Chunk-boundary tolerance**: the frame decoder buffers partial lines,
//!   so the event sequence is identical however the transport splits it
//! - **Typed events**: every frame decodes into a tagged event; unknown
//!   tags are inert rather than fatal
//! - **One owner per session**: a generation attempt exclusively owns its
//!   processing state; consumers read snapshots
//! - **Totals never go stale**: every plan mutation re-runs aggregation
//!
//! # Modules
//!
//! - [`stream`] - frame decoding and the event vocabulary
//! - [`session`] - the generation session state machine
//! - [`plan`] - plan model, aggregation and mutation
//! - [`backend`] - HTTP client for the generation API
//! - [`regen`] - meal regeneration driver
//! - [`nutrition`] - pure nutrition formulas
//! - [`shopping`] - shopping list derivation
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod backend;
pub mod cli;
pub mod config;
pub mod nutrition;
pub mod plan;
pub mod regen;
pub mod session;
pub mod shopping;
pub mod stream;
pub mod validation;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use backend::{
    AlternativeQuery, AlternativeRecipe, BackendError, ByteStream, GenerateRequest, HttpBackend, PlanBackend,
    RegenerateRequest,
};
pub use config::Config;
pub use plan::{
    DayPlan, Ingredient, Meal, MealPatch, MealType, Nutrition, Plan, Recipe, RecipePatch, UserProfile,
    apply_alternative, replace_meal,
};
pub use session::{
    AgentRole, AgentState, AgentStatus, CompletedMeal, GenerationSession, ProcessingState, SessionPhase, SessionState,
};
pub use stream::{FrameDecoder, StreamEvent};
pub use validation::{ValidationBoard, Validator, ValidatorStatus};
