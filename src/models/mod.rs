//! Domain models for the study assistant.
//!
//! # Core Concepts
//!
//! - [`Task`]: A study task with a deadline and priority. Tasks are only ever
//!   created and marked complete; they are never deleted.
//! - [`Material`]: A piece of study text with free-form metadata, used as
//!   retrieval context when answering questions.
//! - [`SearchHit`]: A material matched by a keyword search, with its score.
//! - [`Profile`]: Who the assistant is talking to and how they like to learn.

mod material;
mod profile;
mod task;

pub use material::*;
pub use profile::*;
pub use task::*;
