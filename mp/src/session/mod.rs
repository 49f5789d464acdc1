//! GenerationSession - owns one end-to-end generation attempt
//!
//! `start` resets state, opens the stream and returns as soon as the
//! connection is established; a spawned reader task then feeds decoded
//! events through the dispatcher on its own schedule. Consumers read
//! cloned snapshots of the shared state. `stop` (also run on drop) aborts
//! the reader and releases the transport.

mod state;

pub use state::{
    AgentRole, AgentState, AgentStatus, CompletedMeal, EVENT_LOG_CAP, ProcessingState, SessionPhase, SessionState,
};

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::{BackendError, ByteStream, GenerateRequest, PlanBackend};
use crate::plan::aggregate;
use crate::plan::types::{Plan, UserProfile};
use crate::stream::{FrameDecoder, NodeStatus, StreamEvent};
use crate::validation::{Validator, ValidatorStatus};

/// Fallback session error when the backend's error event has no message
const GENERIC_FAILURE: &str = "meal plan generation failed";

/// One end-to-end generation attempt against the backend
pub struct GenerationSession {
    backend: Arc<dyn PlanBackend>,
    shared: Arc<Mutex<SessionState>>,
    reader: Option<JoinHandle<()>>,
}

impl GenerationSession {
    pub fn new(backend: Arc<dyn PlanBackend>) -> Self {
        Self {
            backend,
            shared: Arc::new(Mutex::new(SessionState::new())),
            reader: None,
        }
    }

    /// Start generating for the given profile
    ///
    /// Resets all session state, issues the request, and returns once the
    /// stream is open. Stream consumption continues in the background; a
    /// transport failure here is the only error this returns - everything
    /// later is surfaced through the session state.
    pub async fn start(&mut self, profile: UserProfile) -> Result<(), BackendError> {
        // A previous run's reader must not outlive its state
        if let Some(handle) = self.reader.take() {
            handle.abort();
        }

        {
            let mut state = self.lock();
            state.reset_for(profile.clone());
            state.phase = SessionPhase::Connecting;
        }
        info!(days = profile.days, meals_per_day = profile.meals_per_day, "starting generation");

        let request = GenerateRequest::from_profile(&profile);
        let stream = match self.backend.start_generation(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                let mut state = self.lock();
                state.processing.set_error(e.to_string());
                state.phase = SessionPhase::Errored;
                return Err(e);
            }
        };

        self.lock().phase = SessionPhase::Streaming;

        let shared = Arc::clone(&self.shared);
        self.reader = Some(tokio::spawn(consume_stream(stream, shared)));
        Ok(())
    }

    /// Cancel the in-flight read and mark the session stopped
    ///
    /// Aborting the reader drops the transport. Idempotent; callable from
    /// any state.
    pub fn stop(&mut self) {
        if let Some(handle) = self.reader.take() {
            handle.abort();
            debug!("reader task aborted");
        }
        let mut state = self.lock();
        state.processing.is_processing = false;
        state.phase = SessionPhase::Stopped;
    }

    /// Wait for the stream to finish (terminal event or EOF)
    pub async fn wait(&mut self) {
        if let Some(handle) = self.reader.take() {
            let _ = handle.await;
        }
    }

    /// Cloned snapshot of the full session state
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().phase
    }

    /// The finished plan, if the session completed with one
    pub fn plan(&self) -> Option<Plan> {
        self.lock().plan.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // A poisoned lock only means a reader panicked mid-dispatch; the
        // state itself is still usable
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for GenerationSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Reader task: decode chunks and dispatch events until the stream ends
async fn consume_stream(mut stream: ByteStream, shared: Arc<Mutex<SessionState>>) {
    let mut decoder = FrameDecoder::new();

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => {
                for event in decoder.feed(&bytes) {
                    let mut state = shared.lock().unwrap_or_else(|e| e.into_inner());
                    dispatch(&mut state, event);
                }
                if decoder.is_finished() {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "stream read failed");
                let mut state = shared.lock().unwrap_or_else(|e| e.into_inner());
                state.processing.set_error(e.to_string());
                state.phase = SessionPhase::Errored;
                return;
            }
        }
    }

    for event in decoder.finish() {
        let mut state = shared.lock().unwrap_or_else(|e| e.into_inner());
        dispatch(&mut state, event);
    }

    let mut state = shared.lock().unwrap_or_else(|e| e.into_inner());
    state.processing.is_processing = false;
    if state.phase == SessionPhase::Streaming {
        state.phase = SessionPhase::Completed;
    }
    debug!(phase = ?state.phase, "stream consumption finished");
}

/// Apply one decoded event to the session state
///
/// Every event lands in the bounded log regardless of type; unknown types
/// and unmapped nodes change nothing else.
pub(crate) fn dispatch(state: &mut SessionState, event: StreamEvent) {
    let event_type = event.event_type();
    state.processing.push_event(event.clone());

    match event {
        StreamEvent::Progress { node, status, data, .. } => {
            if let Some(role) = node.as_deref().and_then(AgentRole::from_node) {
                let agent_state = if status == Some(NodeStatus::Completed) {
                    AgentState::Completed
                } else {
                    AgentState::Working
                };
                state.set_agent(role, agent_state, data.task.clone());
            }

            if let (Some(day), Some(meal)) = (data.day, data.meal) {
                state.processing.current_day = day;
                state.processing.current_meal = meal;
                if let Some(meal_type) = data.meal_type {
                    state.processing.current_meal_type = Some(meal_type);
                }
            }

            if let (Some(completed), Some(total)) = (data.completed_meals, data.total_meals) {
                state.processing.set_progress_ratio(completed, total);
            }
        }

        StreamEvent::Validation { node, status, data, .. } => {
            let Some(validator) = node.as_deref().and_then(Validator::from_node) else {
                return;
            };
            let slot = if status == Some(NodeStatus::Completed) {
                if data.passed.unwrap_or(false) {
                    ValidatorStatus::Passed
                } else {
                    ValidatorStatus::Failed
                }
            } else {
                ValidatorStatus::Pending
            };
            state.processing.validation.set(validator, slot);
        }

        StreamEvent::Retry { message, .. } => {
            state.processing.retry_count += 1;
            if let Some(message) = message {
                debug!(%message, "backend retry");
            }
        }

        StreamEvent::MealComplete { data, .. } => {
            if let (Some(day), Some(meal_type), Some(menu)) = (data.day, data.meal_type, data.menu) {
                state.completed_meals.push(CompletedMeal {
                    day,
                    meal_type,
                    menu_name: menu,
                    calories: data.calories.unwrap_or(0.0),
                    cost: data.cost.unwrap_or(0.0),
                });
            }

            // Next meal starts clean. The meal cursor is NOT advanced here;
            // the next progress event is authoritative for it.
            state.processing.validation.reset();
            state.processing.retry_count = 0;

            if let (Some(completed), Some(total)) = (data.completed_meals, data.total_meals) {
                state.processing.set_progress_ratio(completed, total);
            }
        }

        StreamEvent::DayComplete { .. } => {
            debug!("day complete");
        }

        StreamEvent::Complete { data, .. } => {
            if let Some(days) = data.meal_plan {
                match state.profile.clone() {
                    Some(profile) => {
                        let total_cost = aggregate::plan_total_cost(&days);
                        let avg_daily_nutrition = data
                            .avg_daily_nutrition
                            .unwrap_or_else(|| aggregate::average_daily_nutrition(&days));
                        state.plan = Some(Plan {
                            total_budget: profile.budget,
                            profile,
                            days,
                            total_cost,
                            avg_daily_nutrition,
                            created_at: Utc::now(),
                        });
                        state.processing.total_progress = 100;
                        info!("plan published");
                    }
                    None => warn!("complete event without a stored profile"),
                }
            }
            state.processing.is_processing = false;
            state.phase = SessionPhase::Completed;
        }

        StreamEvent::Error { message, .. } => {
            let message = message.unwrap_or_else(|| GENERIC_FAILURE.to_string());
            warn!(%message, "backend reported failure");
            state.processing.set_error(message);
            state.phase = SessionPhase::Errored;
        }

        StreamEvent::MealRegenerateProgress { .. }
        | StreamEvent::MealRegenerateComplete { .. }
        | StreamEvent::Warning { .. }
        | StreamEvent::Unknown => {
            debug!(event_type, "event has no handler");
        }
    }
}
