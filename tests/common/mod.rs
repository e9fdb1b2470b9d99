//! Shared test doubles.

#![allow(dead_code)]

use std::cell::RefCell;

use study_assistant::llm::{GenerationError, Generator};

/// One recorded `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub prompt: String,
    pub system: String,
    pub temperature: f32,
}

/// Generator that records every call and answers with a canned reply.
pub struct FakeGenerator {
    reply: Option<String>,
    calls: RefCell<Vec<Call>>,
}

impl FakeGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Every call fails as if the model server returned 503.
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Generator for FakeGenerator {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        self.calls.borrow_mut().push(Call {
            prompt: prompt.to_string(),
            system: system.to_string(),
            temperature,
        });

        match self.reply {
            Some(ref reply) => Ok(reply.clone()),
            None => Err(GenerationError::Status {
                status: 503,
                body: "model not loaded".to_string(),
            }),
        }
    }
}

/// A reply long enough to count as a useful grounded explanation.
pub fn long_reply() -> String {
    "Recursion means a function solves a problem by calling itself on a smaller \
     instance of the same problem until it reaches a base case that needs no further calls."
        .to_string()
}
