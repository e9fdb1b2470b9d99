//! Runtime configuration.
//!
//! Settings are resolved once at startup, in increasing precedence:
//! built-in defaults, the JSON config file, environment variables, then
//! command-line flags (applied by `main`). The resulting [`Settings`] value is
//! passed by reference to every component that needs it.
//!
//! Environment variables:
//! - `STUDY_ASSISTANT_OLLAMA_URL` - Ollama base URL (default: `http://localhost:11434`)
//! - `STUDY_ASSISTANT_MODEL` - model name (default: `llama3.2:3b`)
//! - `STUDY_ASSISTANT_DATA_DIR` - directory holding `materials.json` and `tasks.json`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Profile;
use crate::router::IntentTable;

const APP_NAME: &str = "study-assistant";
const CONFIG_FILE: &str = "config.json";

pub const ENV_OLLAMA_URL: &str = "STUDY_ASSISTANT_OLLAMA_URL";
pub const ENV_MODEL: &str = "STUDY_ASSISTANT_MODEL";
pub const ENV_DATA_DIR: &str = "STUDY_ASSISTANT_DATA_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ollama: OllamaSettings,
    pub storage: StorageSettings,
    pub study: StudySettings,
    pub profile: Profile,
    /// Trigger phrases per intent, checked in order.
    pub intents: IntentTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
    /// Timeout of the availability probe.
    pub probe_timeout_secs: u64,
    /// Timeout of a single generation call.
    pub generate_timeout_secs: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            probe_timeout_secs: 2,
            generate_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub materials_path: PathBuf,
    pub tasks_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self::in_dir("./data")
    }
}

impl StorageSettings {
    /// Both collections inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            materials_path: dir.join("materials.json"),
            tasks_path: dir.join("tasks.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudySettings {
    pub session_minutes: u32,
    pub break_minutes: u32,
    pub hours_per_week: u32,
    pub plan_goal: String,
    pub quiz_questions: u32,
    /// Subjects recognized in planning requests, checked in order.
    pub plan_subjects: Vec<String>,
    pub default_subject: String,
    pub default_quiz_topic: String,
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            session_minutes: 25,
            break_minutes: 5,
            hours_per_week: 10,
            plan_goal: "Master the material".to_string(),
            quiz_questions: 5,
            plan_subjects: [
                "math",
                "physics",
                "python",
                "programming",
                "математика",
                "физика",
                "программирование",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            default_subject: "General".to_string(),
            default_quiz_topic: "general knowledge".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the user's config directory when no
    /// path is given, then apply environment overrides.
    ///
    /// A missing default config file is not an error. A missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Apply `STUDY_ASSISTANT_*` overrides looked up through `var`.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_OLLAMA_URL) {
            self.ollama.base_url = url;
        }
        if let Some(model) = var(ENV_MODEL) {
            self.ollama.model = model;
        }
        if let Some(dir) = var(ENV_DATA_DIR) {
            self.storage = StorageSettings::in_dir(dir);
        }
    }
}

/// `<config_dir>/study-assistant/config.json`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Some(path)
}
