use serde::{Deserialize, Serialize};

/// The learner the assistant is tailoring its answers for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub learning_style: LearningStyle,
    pub level: Level,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Student".to_string(),
            learning_style: LearningStyle::Visual,
            level: Level::Intermediate,
        }
    }
}

/// Preferred way of taking in new material.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    #[default]
    Visual,
    Auditory,
    Kinesthetic,
    Reading,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
            Self::Reading => "reading",
        }
    }

    /// How an explanation should be framed for this style.
    pub fn framing(&self) -> &'static str {
        match self {
            Self::Visual => "using visual metaphors",
            Self::Auditory => "through sound analogies",
            Self::Kinesthetic => "through hands-on examples",
            Self::Reading => "through a clear textual description",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}
