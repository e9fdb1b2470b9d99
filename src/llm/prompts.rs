//! Prompt templates and the sampling temperature used with each.

use super::PlanRequest;
use crate::models::{Level, LearningStyle};

pub const DEFAULT_SYSTEM: &str = "You are an AI assistant that helps students study effectively.";
pub const PLANNER_SYSTEM: &str = "You are an experienced teacher and curriculum designer.";
pub const TUTOR_SYSTEM: &str = "You are an AI tutor. Base your answers on the provided material.";

pub const PLAN_TEMPERATURE: f32 = 0.5;
pub const EXPLAIN_TEMPERATURE: f32 = 0.6;
pub const QUIZ_TEMPERATURE: f32 = 0.5;
pub const GROUNDED_TEMPERATURE: f32 = 0.3;
pub const UNGROUNDED_TEMPERATURE: f32 = 0.7;

pub fn study_plan(request: &PlanRequest) -> String {
    format!(
        "Create a detailed study plan:\n\
         - Subject: {}\n\
         - Level: {}\n\
         - Goal: {}\n\
         - Time: {} hours per week, in {}-minute sessions with {}-minute breaks\n\
         \n\
         Structure:\n\
         1. Stages (weeks/topics)\n\
         2. Topics to study\n\
         3. Resources\n\
         4. Assignments\n\
         5. Checkpoints",
        request.subject,
        request.level.as_str(),
        request.goal,
        request.hours_per_week,
        request.session_minutes,
        request.break_minutes,
    )
}

pub fn explain_concept(concept: &str, style: LearningStyle, level: Level) -> String {
    format!(
        "Explain \"{}\" for the {} level, {}.\n\
         \n\
         Include:\n\
         1. Definition\n\
         2. Two or three examples\n\
         3. Key points\n\
         4. Common mistakes",
        concept,
        level.as_str(),
        style.framing(),
    )
}

pub fn quiz(topic: &str, questions: u32, level: Level) -> String {
    format!(
        "Write {} questions on \"{}\" at the {} level.\n\
         \n\
         For each one give:\n\
         1. The question\n\
         2. Four options (A, B, C, D)\n\
         3. The correct answer\n\
         4. An explanation",
        questions,
        topic,
        level.as_str(),
    )
}

/// Ask for an answer that sticks to `context`.
pub fn grounded_answer(context: &str, question: &str) -> String {
    format!(
        "Using the context below, answer the question.\n\
         \n\
         Context:\n\
         {}\n\
         \n\
         Question: {}\n\
         \n\
         Give a precise answer based only on the context.",
        context, question,
    )
}
