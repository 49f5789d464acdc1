//! Integration tests for the generation session
//!
//! These drive a full session over scripted byte streams, including hostile
//! chunk boundaries, mid-stream failures and cancellation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;

use mealplan::backend::{
    AlternativeQuery, AlternativeRecipe, BackendError, ByteStream, GenerateRequest, PlanBackend, RegenerateRequest,
};
use mealplan::plan::types::{
    ActivityLevel, BudgetDistribution, BudgetPeriod, CookingTimeLimit, Gender, Goal, SkillLevel, UserProfile,
};
use mealplan::session::{AgentRole, AgentState, GenerationSession, SessionPhase};
use mealplan::validation::ValidationBoard;

/// Backend serving a fixed chunk script for every stream request
struct ChunkBackend {
    chunks: Vec<Result<Vec<u8>, String>>,
    /// Keep the stream open after the last chunk
    hang_after: bool,
}

impl ChunkBackend {
    fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into_iter().map(Ok).collect(),
            hang_after: false,
        }
    }

    fn stream(&self) -> ByteStream {
        let chunks: Vec<Result<Vec<u8>, BackendError>> = self
            .chunks
            .iter()
            .cloned()
            .map(|c| c.map_err(BackendError::InvalidResponse))
            .collect();
        let head = futures::stream::iter(chunks);
        if self.hang_after {
            Box::pin(head.chain(futures::stream::pending()))
        } else {
            Box::pin(head)
        }
    }
}

#[async_trait]
impl PlanBackend for ChunkBackend {
    async fn start_generation(&self, _request: &GenerateRequest) -> Result<ByteStream, BackendError> {
        Ok(self.stream())
    }

    async fn regenerate_meal(&self, _request: &RegenerateRequest) -> Result<ByteStream, BackendError> {
        Ok(self.stream())
    }

    async fn alternative_recipes(&self, _query: &AlternativeQuery) -> Result<Vec<AlternativeRecipe>, BackendError> {
        Ok(Vec::new())
    }
}

fn profile() -> UserProfile {
    UserProfile {
        gender: Gender::Female,
        age: 31,
        height: 165.0,
        weight: 58.0,
        goal: Goal::Maintain,
        activity_level: ActivityLevel::Moderate,
        allergies: vec!["peanut".to_string()],
        dietary_preferences: vec![],
        health_conditions: vec![],
        cooking_time: CookingTimeLimit::Under30Min,
        skill_level: SkillLevel::Beginner,
        meals_per_day: 2,
        days: 2,
        budget: 40000.0,
        budget_type: BudgetPeriod::Weekly,
        budget_distribution: BudgetDistribution::Equal,
    }
}

fn scenario_bytes() -> Vec<u8> {
    let frames = [
        r#"{"type":"progress","node":"nutritionist","status":"started","data":{"day":1,"meal":1,"meal_type":"breakfast"}}"#,
        r#"{"type":"validation","node":"nutrition_checker","status":"completed","data":{"passed":true}}"#,
        r#"{"type":"validation","node":"allergy_checker","status":"completed","data":{"passed":true}}"#,
        r#"{"type":"retry","message":"budget exceeded, retrying"}"#,
        r#"{"type":"meal_complete","data":{"day":1,"meal_type":"breakfast","menu":"veggie omelette","calories":420,"cost":3200,"completed_meals":1,"total_meals":4}}"#,
        r#"{"type":"progress","node":"chef","status":"working","data":{"day":1,"meal":2,"meal_type":"dinner","completed_meals":1,"total_meals":4}}"#,
        r#"{"type":"complete","data":{"meal_plan":[{"day":1,"meals":[],"total_nutrition":{"calories_kcal":1500,"protein_g":90,"fat_g":40,"carbs_g":180},"total_cost":9000},{"day":2,"meals":[],"total_nutrition":{"calories_kcal":1600,"protein_g":95,"fat_g":45,"carbs_g":190},"total_cost":11000}]}}"#,
        r#"[DONE]"#,
    ];

    let mut bytes = Vec::new();
    for frame in frames {
        bytes.extend_from_slice(format!("data: {}\n", frame).as_bytes());
    }
    bytes
}

fn split_into_chunks(bytes: &[u8], size: usize) -> Vec<Vec<u8>> {
    bytes.chunks(size).map(|c| c.to_vec()).collect()
}

async fn run_to_end(session: &mut GenerationSession) {
    tokio::time::timeout(Duration::from_secs(5), session.wait())
        .await
        .expect("session should finish within the timeout");
}

#[tokio::test]
async fn test_full_session_over_awkward_chunk_boundaries() {
    let bytes = scenario_bytes();
    let backend = Arc::new(ChunkBackend::new(split_into_chunks(&bytes, 7)));

    let mut session = GenerationSession::new(backend);
    session.start(profile()).await.expect("start should succeed");
    run_to_end(&mut session).await;

    let state = session.snapshot();
    assert_eq!(state.phase, SessionPhase::Completed);
    assert!(!state.processing.is_processing);

    // The retry was superseded by the meal boundary reset
    assert_eq!(state.processing.retry_count, 0);
    assert_eq!(state.processing.validation, ValidationBoard::default());

    // Completed meal recorded with its numbers
    assert_eq!(state.completed_meals.len(), 1);
    assert_eq!(state.completed_meals[0].menu_name, "veggie omelette");
    assert_eq!(state.completed_meals[0].cost, 3200.0);

    // The last progress event moved the cursor
    assert_eq!(state.processing.current_meal, 2);
    assert_eq!(state.agent(AgentRole::Chef).unwrap().status, AgentState::Working);

    // Plan published with summed cost and the caller's profile
    let plan = state.plan.expect("plan should be published");
    assert_eq!(plan.total_cost, 20000.0);
    assert_eq!(plan.total_budget, 40000.0);
    assert_eq!(plan.profile.age, 31);
    assert_eq!(plan.days.len(), 2);
}

#[tokio::test]
async fn test_chunking_does_not_change_observed_state() {
    let bytes = scenario_bytes();

    let mut logs = Vec::new();
    for chunk_size in [1, 3, 17, bytes.len()] {
        let backend = Arc::new(ChunkBackend::new(split_into_chunks(&bytes, chunk_size)));
        let mut session = GenerationSession::new(backend);
        session.start(profile()).await.expect("start should succeed");
        run_to_end(&mut session).await;

        let state = session.snapshot();
        assert_eq!(state.phase, SessionPhase::Completed, "chunk size {}", chunk_size);
        logs.push(state.processing.event_log.clone());
    }

    for log in &logs[1..] {
        assert_eq!(log, &logs[0]);
    }
}

#[tokio::test]
async fn test_malformed_frame_does_not_stop_the_stream() {
    let bytes = concat!(
        "data: {broken\n",
        "data: {\"type\":\"progress\",\"node\":\"chef\",\"data\":{\"day\":1,\"meal\":1}}\n",
        "data: [DONE]\n",
    )
    .as_bytes()
    .to_vec();

    let backend = Arc::new(ChunkBackend::new(vec![bytes]));
    let mut session = GenerationSession::new(backend);
    session.start(profile()).await.expect("start should succeed");
    run_to_end(&mut session).await;

    let state = session.snapshot();
    assert_eq!(state.phase, SessionPhase::Completed);
    assert_eq!(state.processing.current_day, 1);
    assert_eq!(state.processing.event_log.len(), 1);
}

#[tokio::test]
async fn test_backend_error_event_terminates_session() {
    let bytes = b"data: {\"type\":\"error\",\"message\":\"generation pipeline crashed\"}\n".to_vec();
    let backend = Arc::new(ChunkBackend::new(vec![bytes]));

    let mut session = GenerationSession::new(backend);
    session.start(profile()).await.expect("start should succeed");
    run_to_end(&mut session).await;

    let state = session.snapshot();
    assert_eq!(state.phase, SessionPhase::Errored);
    assert_eq!(state.error(), Some("generation pipeline crashed"));
    assert!(!state.processing.is_processing);
}

#[tokio::test]
async fn test_transport_failure_mid_stream_errors_session() {
    let backend = Arc::new(ChunkBackend {
        chunks: vec![
            Ok(b"data: {\"type\":\"retry\"}\n".to_vec()),
            Err("connection reset".to_string()),
        ],
        hang_after: false,
    });

    let mut session = GenerationSession::new(backend);
    session.start(profile()).await.expect("start should succeed");
    run_to_end(&mut session).await;

    let state = session.snapshot();
    assert_eq!(state.phase, SessionPhase::Errored);
    assert_eq!(state.processing.retry_count, 1);
    assert!(state.error().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn test_stop_cancels_a_hanging_stream() {
    let backend = Arc::new(ChunkBackend {
        chunks: vec![Ok(
            b"data: {\"type\":\"progress\",\"node\":\"chef\",\"data\":{\"day\":1,\"meal\":1}}\n".to_vec(),
        )],
        hang_after: true,
    });

    let mut session = GenerationSession::new(backend);
    session.start(profile()).await.expect("start should succeed");

    // Let the reader consume the first chunk, then cancel
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.stop();

    let state = session.snapshot();
    assert_eq!(state.phase, SessionPhase::Stopped);
    assert!(!state.processing.is_processing);
    assert_eq!(state.processing.current_day, 1);

    // A second stop is harmless
    session.stop();
    assert_eq!(session.phase(), SessionPhase::Stopped);
}

#[tokio::test]
async fn test_stream_end_without_terminal_event_stops_processing() {
    let bytes = b"data: {\"type\":\"progress\",\"node\":\"chef\",\"data\":{\"day\":1,\"meal\":1}}\n".to_vec();
    let backend = Arc::new(ChunkBackend::new(vec![bytes]));

    let mut session = GenerationSession::new(backend);
    session.start(profile()).await.expect("start should succeed");
    run_to_end(&mut session).await;

    let state = session.snapshot();
    assert!(!state.processing.is_processing);
    assert_eq!(state.phase, SessionPhase::Completed);
    assert!(state.plan.is_none());
}
