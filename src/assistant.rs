//! The interactive study session.

use std::future::Future;
use std::io::{ErrorKind, Write as _};

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::config::Settings;
use crate::llm::OllamaClient;
use crate::models::*;
use crate::router::{QueryRouter, Reply};
use crate::store::{MaterialStore, StoreError, TaskStore};

/// Words that bypass the router in the interactive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reserved {
    Help,
    Stats,
    Quit,
}

impl Reserved {
    /// Match `input` case-insensitively against the reserved words.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "help" => Some(Self::Help),
            "stats" => Some(Self::Stats),
            "exit" | "quit" | "выход" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Owns the configuration, both stores, and the model client.
pub struct StudyAssistant {
    settings: Settings,
    tasks: TaskStore,
    materials: MaterialStore,
    llm: OllamaClient,
}

impl StudyAssistant {
    pub fn open(settings: Settings) -> Result<Self, StoreError> {
        let tasks = TaskStore::open(&settings.storage.tasks_path)?;
        let materials = MaterialStore::open(&settings.storage.materials_path)?;
        let llm = OllamaClient::new(&settings.ollama);
        Ok(Self {
            settings,
            tasks,
            materials,
            llm,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn materials(&self) -> &MaterialStore {
        &self.materials
    }

    pub fn llm(&self) -> &OllamaClient {
        &self.llm
    }

    pub fn router(&self) -> QueryRouter<'_, OllamaClient> {
        QueryRouter::new(&self.settings, &self.tasks, &self.materials, &self.llm)
    }

    pub async fn process_query(&self, query: &str) -> Reply {
        self.router().route(query).await
    }

    // ============================================================
    // Collection management
    // ============================================================

    pub fn add_material(&mut self, text: &str, subject: &str) -> Result<Material, StoreError> {
        self.materials.add(text, subject_metadata(subject))
    }

    pub fn add_task(&mut self, input: NewTask) -> Result<Task, StoreError> {
        self.tasks.add(input)
    }

    pub fn complete_task(&mut self, id: &str) -> Result<bool, StoreError> {
        self.tasks.complete(id)
    }

    pub fn clear_materials(&mut self) -> Result<(), StoreError> {
        self.materials.clear()
    }

    /// Add a couple of example materials and tasks to try the assistant with.
    pub fn seed(&mut self) -> Result<(), StoreError> {
        self.add_material(
            "Python is a high-level programming language with a simple syntax. \
             It is used for web development, data analysis and machine learning.",
            "programming",
        )?;
        self.add_material(
            "Recursion is a function calling itself. Every recursive function \
             needs a base case. Example: computing a factorial.",
            "programming",
        )?;
        self.add_task(NewTask::new("Solve the algebra problems", "Math", 2).with_priority(Priority::High))?;
        self.add_task(NewTask::new("Read the physics chapter", "Physics", 3))?;
        Ok(())
    }

    // ============================================================
    // Presentation
    // ============================================================

    pub fn help_text(&self) -> String {
        let study = &self.settings.study;
        format!(
            "\
Study assistant
===============

Planning:      \"Make a study plan for math\"
Learning:      \"Explain what is recursion\"
Tasks:         \"Show my tasks\"
Quizzes:       \"Quiz me on physics\"
Anything else is answered from your study materials.

Commands:
  help   show this help
  stats  show progress and knowledge base statistics
  exit   leave (also: quit)

Model: {} via {}
Suggested rhythm: {} min study, {} min break",
            self.llm.model(),
            self.llm.base_url(),
            study.session_minutes,
            study.break_minutes,
        )
    }

    pub async fn stats_text(&self) -> String {
        let tasks = self.tasks.stats();
        let materials = self.materials.stats();
        let status = if self.llm.check_availability().await {
            "connected"
        } else {
            "not connected"
        };

        format!(
            "\
Statistics
==========

Tasks:
  Total:     {}
  Completed: {}
  Overdue:   {}
  Progress:  {}%

Knowledge base:
  Documents: {}
  File:      {}

Model:
  Name:      {}
  Status:    {}",
            tasks.total,
            tasks.completed,
            tasks.overdue,
            tasks.completion_rate,
            materials.document_count,
            materials.storage_path.display(),
            self.llm.model(),
            status,
        )
    }

    pub fn setup_instructions(&self) -> String {
        format!(
            "Ollama is not reachable at {}.\n\n\
             To get started:\n\
             1. Install Ollama: https://ollama.com\n\
             2. Pull the model: ollama pull {}\n\
             3. Start the server: ollama serve",
            self.llm.base_url(),
            self.llm.model(),
        )
    }

    // ============================================================
    // Interactive loop
    // ============================================================

    /// Read queries from stdin until `exit`, end of input, or Ctrl-C.
    ///
    /// Returns without starting the loop if the model server is down.
    pub async fn run_chat(&self) -> Result<()> {
        if !self.llm.check_availability().await {
            println!("{}", self.setup_instructions());
            return Ok(());
        }

        println!("{}", self.help_text());
        println!("\nAsk away!");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            prompt("\nYou: ");

            let Some(Some(line)) = interruptible(next_query(&mut lines), ctrl_c()).await else {
                break;
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            match Reserved::parse(input) {
                Some(Reserved::Quit) => break,
                Some(Reserved::Help) => {
                    println!("{}", self.help_text());
                    continue;
                }
                Some(Reserved::Stats) => {
                    let Some(stats) = interruptible(self.stats_text(), ctrl_c()).await else {
                        break;
                    };
                    println!("{}", stats);
                    continue;
                }
                None => {}
            }

            prompt("\nAssistant: ");
            let Some(reply) = interruptible(self.process_query(input), ctrl_c()).await else {
                break;
            };
            println!("{}", reply.text);
        }

        println!("\nGoodbye!");
        Ok(())
    }
}

/// Ctrl-C, ignoring a failure to install the handler.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Run `work` to completion, or `None` if `interrupt` fires first.
async fn interruptible<T>(work: impl Future<Output = T>, interrupt: impl Future) -> Option<T> {
    tokio::select! {
        value = work => Some(value),
        _ = interrupt => None,
    }
}

/// The next input line, or `None` at end of input.
///
/// A line that is not valid UTF-8 is reported and skipped. Any other read
/// error is reported and ends the input, since retrying it would spin.
async fn next_query<R>(lines: &mut Lines<R>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Ok(line) => return line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::warn!("Skipping unreadable input line: {}", e);
                eprintln!("Error: {}", e);
            }
            Err(e) => {
                tracing::warn!("Failed to read input: {}", e);
                eprintln!("Error: {}", e);
                return None;
            }
        }
    }
}

/// Print without a newline. A broken stdout is reported, not fatal.
fn prompt(text: &str) {
    let mut stdout = std::io::stdout();
    if let Err(e) = write!(stdout, "{}", text).and_then(|_| stdout.flush()) {
        eprintln!("Error: {}", e);
    }
}
