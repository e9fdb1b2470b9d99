//! Text generation against a local model server.
//!
//! [`Generator`] is the seam the rest of the crate talks to. It has a single
//! required method, [`Generator::generate`]; the templated use cases (study
//! plan, concept explanation, quiz) are provided methods that fix the system
//! preamble and temperature for each case. [`OllamaClient`] is the production
//! implementation.

mod client;
pub mod prompts;

pub use client::*;

use thiserror::Error;

use crate::models::{Level, LearningStyle};

/// Generation failures. These are reported to the user inline rather than
/// aborting the session.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to the model server failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode model response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Parameters of a study plan request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub subject: String,
    pub level: Level,
    pub goal: String,
    pub hours_per_week: u32,
    pub session_minutes: u32,
    pub break_minutes: u32,
}

/// Something that turns prompts into text.
#[allow(async_fn_in_trait)]
pub trait Generator {
    /// Generate a completion for `prompt` under the `system` preamble.
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        temperature: f32,
    ) -> Result<String, GenerationError>;

    async fn study_plan(&self, request: &PlanRequest) -> Result<String, GenerationError> {
        self.generate(
            &prompts::study_plan(request),
            prompts::PLANNER_SYSTEM,
            prompts::PLAN_TEMPERATURE,
        )
        .await
    }

    async fn explain_concept(
        &self,
        concept: &str,
        style: LearningStyle,
        level: Level,
    ) -> Result<String, GenerationError> {
        self.generate(
            &prompts::explain_concept(concept, style, level),
            prompts::DEFAULT_SYSTEM,
            prompts::EXPLAIN_TEMPERATURE,
        )
        .await
    }

    async fn quiz(&self, topic: &str, questions: u32, level: Level) -> Result<String, GenerationError> {
        self.generate(
            &prompts::quiz(topic, questions, level),
            prompts::DEFAULT_SYSTEM,
            prompts::QUIZ_TEMPERATURE,
        )
        .await
    }
}
