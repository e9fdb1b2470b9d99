use serde::{Deserialize, Serialize};

/// What a user query is asking for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Planning,
    Explanation,
    TaskListing,
    Quiz,
    /// Anything else: answered from the stored materials.
    Context,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Explanation => "explanation",
            Self::TaskListing => "task_listing",
            Self::Quiz => "quiz",
            Self::Context => "context",
        }
    }
}

/// One row of the intent table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentRule {
    pub intent: Intent,
    /// Phrases that select this intent when found anywhere in the query.
    pub triggers: Vec<String>,
}

/// Ordered trigger table. The first rule with a matching phrase wins; a query
/// matching no rule is [`Intent::Context`].
///
/// The table is plain data so keyword sets for other languages can be swapped
/// in from the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct IntentTable {
    rules: Vec<IntentRule>,
}

impl Default for IntentTable {
    fn default() -> Self {
        fn rule(intent: Intent, triggers: &[&str]) -> IntentRule {
            IntentRule {
                intent,
                triggers: triggers.iter().map(|t| t.to_string()).collect(),
            }
        }

        Self::new(vec![
            rule(
                Intent::Planning,
                &[
                    "study plan",
                    "make a plan",
                    "plan my",
                    "plan for",
                    "schedule",
                    "учебный план",
                    "составь план",
                    "план на",
                    "распланируй",
                ],
            ),
            rule(
                Intent::Explanation,
                &["explain", "what is", "what's", "объясни", "что такое"],
            ),
            rule(Intent::TaskListing, &["tasks", "todo", "to-do", "задачи", "дела"]),
            rule(Intent::Quiz, &["quiz", "test", "тест"]),
        ])
    }
}

impl IntentTable {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn classify(&self, query: &str) -> Intent {
        let query = query.to_lowercase();
        self.rules
            .iter()
            .find(|rule| {
                rule.triggers
                    .iter()
                    .any(|t| !t.is_empty() && query.contains(&t.to_lowercase()))
            })
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Context)
    }

    /// Remove whole-word occurrences of `intent`'s trigger phrases from
    /// `query`, keeping the remaining words in their original case.
    pub fn strip_triggers(&self, intent: Intent, query: &str) -> String {
        let phrases: Vec<Vec<String>> = self
            .rules
            .iter()
            .filter(|rule| rule.intent == intent)
            .flat_map(|rule| rule.triggers.iter())
            .map(|t| t.split_whitespace().map(normalize_word).collect::<Vec<_>>())
            .filter(|words| !words.is_empty())
            .collect();

        let words: Vec<&str> = query.split_whitespace().collect();
        let mut kept = Vec::with_capacity(words.len());
        let mut i = 0;

        'words: while i < words.len() {
            for phrase in &phrases {
                let end = i + phrase.len();
                if end <= words.len()
                    && phrase
                        .iter()
                        .zip(&words[i..end])
                        .all(|(p, w)| normalize_word(w) == *p)
                {
                    i = end;
                    continue 'words;
                }
            }
            kept.push(words[i]);
            i += 1;
        }

        kept.join(" ")
    }
}

/// Lowercase and drop surrounding punctuation, so `Explain:` matches `explain`.
pub(crate) fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}
