use std::path::{Path, PathBuf};

use super::{load_collection, save_collection, StoreError};
use crate::llm::{prompts, GenerationError, Generator};
use crate::models::*;

/// Default number of passages pulled into a prompt.
pub const DEFAULT_SEARCH_LIMIT: usize = 3;

/// Prefix of an answer produced without any matching material.
pub const NO_CONTEXT_NOTICE: &str =
    "Nothing about this was found in your materials. Answering from general knowledge.";

/// Study materials persisted to a JSON file, searchable by keyword overlap.
pub struct MaterialStore {
    path: PathBuf,
    materials: Vec<Material>,
}

/// The outcome of [`MaterialStore::answer_with_context`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextAnswer {
    pub text: String,
    /// Whether the answer was built from retrieved materials.
    pub grounded: bool,
}

impl MaterialStore {
    /// Load materials from `path`. A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let materials = load_collection(&path)?;
        tracing::debug!("Loaded {} materials from {}", materials.len(), path.display());
        Ok(Self { path, materials })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn all(&self) -> &[Material] {
        &self.materials
    }

    /// Append a document and persist the collection.
    ///
    /// On failure nothing is kept in memory either, so the store always
    /// mirrors the file.
    pub fn add(
        &mut self,
        text: impl Into<String>,
        metadata: Metadata,
    ) -> Result<Material, StoreError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(StoreError::EmptyText);
        }

        let material = Material {
            id: self.materials.len() as u64 + 1,
            text,
            metadata,
        };

        self.materials.push(material.clone());
        if let Err(e) = self.save() {
            self.materials.pop();
            return Err(e);
        }

        tracing::info!("Added material #{}", material.id);
        Ok(material)
    }

    /// Drop every material and persist the empty collection.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let previous = std::mem::take(&mut self.materials);
        if let Err(e) = self.save() {
            self.materials = previous;
            return Err(e);
        }
        tracing::info!("Cleared {} materials", previous.len());
        Ok(())
    }

    pub fn stats(&self) -> MaterialStats {
        MaterialStats {
            document_count: self.materials.len(),
            storage_path: self.path.clone(),
        }
    }

    fn save(&self) -> Result<(), StoreError> {
        save_collection(&self.path, &self.materials)
    }

    // ============================================================
    // Retrieval
    // ============================================================

    /// Rank materials by how many query tokens occur in their text.
    ///
    /// Matching is case-insensitive substring containment, so `cat` matches
    /// `category`. Zero-score documents are dropped and equal scores keep
    /// insertion order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let query = query.to_lowercase();
        let tokens: Vec<&str> = query.split_whitespace().collect();

        let mut hits: Vec<SearchHit> = self
            .materials
            .iter()
            .filter_map(|material| {
                let text = material.text.to_lowercase();
                let score = tokens.iter().filter(|token| text.contains(**token)).count();
                (score > 0).then(|| SearchHit {
                    text: material.text.clone(),
                    metadata: material.metadata.clone(),
                    score,
                })
            })
            .collect();

        // sort_by is stable, which keeps ties in insertion order
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(limit);
        hits
    }

    /// Answer `question` from the best matching materials.
    ///
    /// Without any match the question goes to the model as-is, at a higher
    /// temperature, and the reply is prefixed with [`NO_CONTEXT_NOTICE`].
    pub async fn answer_with_context<G: Generator>(
        &self,
        question: &str,
        generator: &G,
        limit: usize,
    ) -> Result<ContextAnswer, GenerationError> {
        let hits = self.search(question, limit);

        if hits.is_empty() {
            tracing::debug!("No materials matched {:?}, answering ungrounded", question);
            let text = generator
                .generate(
                    question,
                    prompts::DEFAULT_SYSTEM,
                    prompts::UNGROUNDED_TEMPERATURE,
                )
                .await?;
            return Ok(ContextAnswer {
                text: format!("{}\n\n{}", NO_CONTEXT_NOTICE, text),
                grounded: false,
            });
        }

        tracing::debug!("Answering from {} materials", hits.len());
        let context = hits
            .iter()
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let text = generator
            .generate(
                &prompts::grounded_answer(&context, question),
                prompts::TUTOR_SYSTEM,
                prompts::GROUNDED_TEMPERATURE,
            )
            .await?;

        Ok(ContextAnswer {
            text,
            grounded: true,
        })
    }
}
