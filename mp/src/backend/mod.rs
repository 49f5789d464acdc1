//! Backend client for the meal-plan generation API
//!
//! [`PlanBackend`] is the seam between the client and the network: the
//! session and regeneration driver only see a byte stream, so tests can
//! script one without a server.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

mod error;
mod http;
mod requests;

pub use error::BackendError;
pub use http::HttpBackend;
pub use requests::{
    AlternativeQuery, AlternativeRecipe, CompletedMealContext, DEFAULT_CALORIE_TOLERANCE, DEFAULT_COST_TOLERANCE,
    GenerateRequest, RegenerateProfile, RegenerateRequest,
};

/// Raw streaming response body
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, BackendError>> + Send>>;

/// Client interface to the generation backend
#[async_trait]
pub trait PlanBackend: Send + Sync {
    /// Start plan generation; returns the event stream body
    async fn start_generation(&self, request: &GenerateRequest) -> Result<ByteStream, BackendError>;

    /// Regenerate one meal; returns the event stream body
    async fn regenerate_meal(&self, request: &RegenerateRequest) -> Result<ByteStream, BackendError>;

    /// Fetch alternative recipe suggestions for one meal
    async fn alternative_recipes(&self, query: &AlternativeQuery) -> Result<Vec<AlternativeRecipe>, BackendError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Scripted backend for unit tests
    ///
    /// Serves the configured chunks for every stream request, so tests
    /// control exactly where chunk boundaries fall.
    pub struct ScriptedBackend {
        chunks: Vec<Vec<u8>>,
        alternatives: Vec<AlternativeRecipe>,
        fail_connect: bool,
    }

    impl ScriptedBackend {
        pub fn new(chunks: Vec<Vec<u8>>) -> Self {
            Self {
                chunks,
                alternatives: Vec::new(),
                fail_connect: false,
            }
        }

        /// Build a backend that serves the given frames one chunk per frame
        pub fn from_frames(frames: &[&str]) -> Self {
            let chunks = frames
                .iter()
                .map(|f| format!("data: {}\n", f).into_bytes())
                .collect();
            Self::new(chunks)
        }

        pub fn with_alternatives(mut self, alternatives: Vec<AlternativeRecipe>) -> Self {
            self.alternatives = alternatives;
            self
        }

        /// Make every stream request fail at connect time
        pub fn failing() -> Self {
            Self {
                chunks: Vec::new(),
                alternatives: Vec::new(),
                fail_connect: true,
            }
        }

        fn stream(&self) -> Result<ByteStream, BackendError> {
            if self.fail_connect {
                return Err(BackendError::Api {
                    status: 503,
                    message: "scripted failure".to_string(),
                });
            }
            let chunks: Vec<Result<Vec<u8>, BackendError>> = self.chunks.iter().cloned().map(Ok).collect();
            Ok(Box::pin(futures::stream::iter(chunks)))
        }
    }

    #[async_trait]
    impl PlanBackend for ScriptedBackend {
        async fn start_generation(&self, _request: &GenerateRequest) -> Result<ByteStream, BackendError> {
            self.stream()
        }

        async fn regenerate_meal(&self, _request: &RegenerateRequest) -> Result<ByteStream, BackendError> {
            self.stream()
        }

        async fn alternative_recipes(&self, _query: &AlternativeQuery) -> Result<Vec<AlternativeRecipe>, BackendError> {
            if self.fail_connect {
                return Err(BackendError::Api {
                    status: 503,
                    message: "scripted failure".to_string(),
                });
            }
            Ok(self.alternatives.clone())
        }
    }
}
