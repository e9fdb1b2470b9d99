//! Query routing.
//!
//! A query is classified against the [`IntentTable`] and handed to the
//! matching handler. Handlers never fail: a generation error becomes an
//! inline message in the [`Reply`], flagged as degraded, so the interactive
//! loop keeps going when the model server misbehaves.

mod intent;

pub use intent::*;

use crate::config::Settings;
use crate::llm::{GenerationError, Generator, PlanRequest};
use crate::store::{MaterialStore, TaskStore, DEFAULT_SEARCH_LIMIT};

/// Passages retrieved when answering an explanation request.
const EXPLANATION_SEARCH_LIMIT: usize = 2;

/// Grounded explanations shorter than this are treated as not useful.
const MIN_GROUNDED_ANSWER_CHARS: usize = 100;

/// Quiz topics shorter than this fall back to the default topic.
const MIN_TOPIC_CHARS: usize = 3;

/// Words dropped from the front of a quiz topic ("quiz me on ...").
const TOPIC_FILLERS: &[&str] = &["me", "on", "about", "for", "a", "по"];

/// The assistant's answer to one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
    /// The model call behind this reply failed; `text` describes the error.
    pub degraded: bool,
}

/// Dispatches queries to the stores and the generator.
pub struct QueryRouter<'a, G> {
    settings: &'a Settings,
    tasks: &'a TaskStore,
    materials: &'a MaterialStore,
    generator: &'a G,
}

impl<'a, G: Generator> QueryRouter<'a, G> {
    pub fn new(
        settings: &'a Settings,
        tasks: &'a TaskStore,
        materials: &'a MaterialStore,
        generator: &'a G,
    ) -> Self {
        Self {
            settings,
            tasks,
            materials,
            generator,
        }
    }

    pub fn classify(&self, query: &str) -> Intent {
        self.settings.intents.classify(query)
    }

    pub async fn route(&self, query: &str) -> Reply {
        let intent = self.classify(query);
        tracing::debug!("Routing {:?} as {}", query, intent.as_str());

        let result = match intent {
            Intent::Planning => self.plan(query).await,
            Intent::Explanation => self.explain(query).await,
            Intent::TaskListing => Ok(self.tasks.format_summary()),
            Intent::Quiz => self.quiz(query).await,
            Intent::Context => self
                .materials
                .answer_with_context(query, self.generator, DEFAULT_SEARCH_LIMIT)
                .await
                .map(|answer| answer.text),
        };

        match result {
            Ok(text) => Reply {
                intent,
                text,
                degraded: false,
            },
            Err(e) => {
                tracing::warn!("Generation failed for {} query: {}", intent.as_str(), e);
                Reply {
                    intent,
                    text: format!("Error: {}", e),
                    degraded: true,
                }
            }
        }
    }

    // ============================================================
    // Handlers
    // ============================================================

    async fn plan(&self, query: &str) -> Result<String, GenerationError> {
        let subject = self.detect_subject(query);
        let study = &self.settings.study;

        let plan = self
            .generator
            .study_plan(&PlanRequest {
                subject: subject.clone(),
                level: self.settings.profile.level,
                goal: study.plan_goal.clone(),
                hours_per_week: study.hours_per_week,
                session_minutes: study.session_minutes,
                break_minutes: study.break_minutes,
            })
            .await?;

        Ok(format!("Study plan: {}\n\n{}", subject, plan))
    }

    /// Prefer an answer grounded in the materials; fall back to a generic
    /// explanation of the bare concept when that answer is missing or thin.
    async fn explain(&self, query: &str) -> Result<String, GenerationError> {
        // Without a single match the grounded path could only produce the
        // "nothing found" answer, which is discarded below anyway.
        if !self
            .materials
            .search(query, EXPLANATION_SEARCH_LIMIT)
            .is_empty()
        {
            match self
                .materials
                .answer_with_context(query, self.generator, EXPLANATION_SEARCH_LIMIT)
                .await
            {
                Ok(answer)
                    if answer.grounded
                        && answer.text.chars().count() >= MIN_GROUNDED_ANSWER_CHARS =>
                {
                    return Ok(answer.text);
                }
                Ok(_) => tracing::debug!("Grounded answer too short, explaining from scratch"),
                Err(e) => tracing::warn!("Grounded answer failed ({}), explaining from scratch", e),
            }
        }

        let concept = self.concept_of(query);
        let profile = &self.settings.profile;
        self.generator
            .explain_concept(&concept, profile.learning_style, profile.level)
            .await
    }

    async fn quiz(&self, query: &str) -> Result<String, GenerationError> {
        let topic = self.topic_of(query);
        let quiz = self
            .generator
            .quiz(
                &topic,
                self.settings.study.quiz_questions,
                self.settings.profile.level,
            )
            .await?;

        Ok(format!("Quiz: {}\n\n{}", topic, quiz))
    }

    // ============================================================
    // Query parsing
    // ============================================================

    /// First configured subject mentioned in the query, capitalized.
    pub fn detect_subject(&self, query: &str) -> String {
        let query = query.to_lowercase();
        self.settings
            .study
            .plan_subjects
            .iter()
            .find(|subject| query.contains(&subject.to_lowercase()))
            .map(|subject| capitalize(subject))
            .unwrap_or_else(|| self.settings.study.default_subject.clone())
    }

    /// The query without its explanation trigger phrases.
    pub fn concept_of(&self, query: &str) -> String {
        let concept = self
            .settings
            .intents
            .strip_triggers(Intent::Explanation, query);
        let concept = trim_punctuation(&concept);
        if concept.is_empty() {
            trim_punctuation(query).to_string()
        } else {
            concept.to_string()
        }
    }

    /// The query without quiz trigger phrases and leading filler words.
    pub fn topic_of(&self, query: &str) -> String {
        let stripped = self.settings.intents.strip_triggers(Intent::Quiz, query);
        let topic = stripped
            .split_whitespace()
            .skip_while(|word| TOPIC_FILLERS.contains(&normalize_word(word).as_str()))
            .collect::<Vec<_>>()
            .join(" ");
        let topic = trim_punctuation(&topic);

        if topic.chars().count() < MIN_TOPIC_CHARS {
            self.settings.study.default_quiz_topic.clone()
        } else {
            topic.to_string()
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn trim_punctuation(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
}
