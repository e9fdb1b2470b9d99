use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDateTime};

use super::{load_collection, save_collection, StoreError};
use crate::models::*;

/// How many overdue and high-priority tasks the summary lists.
const SUMMARY_LIMIT: usize = 3;

/// Study tasks persisted to a JSON file.
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Load tasks from `path`. A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tasks = load_collection(&path)?;
        tracing::debug!("Loaded {} tasks from {}", tasks.len(), path.display());
        Ok(Self { path, tasks })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ============================================================
    // Mutations
    // ============================================================

    pub fn add(&mut self, input: NewTask) -> Result<Task, StoreError> {
        self.add_at(input, now())
    }

    /// Add a task whose deadline is `deadline_days` after `now`.
    pub fn add_at(&mut self, input: NewTask, now: NaiveDateTime) -> Result<Task, StoreError> {
        let deadline = Duration::try_days(input.deadline_days)
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or(StoreError::DeadlineOutOfRange(input.deadline_days))?;

        let task = Task {
            id: format!("{}{}", TASK_ID_PREFIX, self.next_sequence()),
            title: input.title,
            subject: input.subject,
            deadline,
            estimated_minutes: input.estimated_minutes,
            priority: input.priority,
            completed: false,
        };

        self.tasks.push(task.clone());
        if let Err(e) = self.save() {
            self.tasks.pop();
            return Err(e);
        }

        tracing::info!("Added {} ({}) due {}", task.id, task.title, task.deadline);
        Ok(task)
    }

    /// Mark a task as done. Returns `Ok(false)` if no task has this id.
    pub fn complete(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            tracing::debug!("No task with id {}", id);
            return Ok(false);
        };

        let was_completed = self.tasks[index].completed;
        self.tasks[index].completed = true;
        if let Err(e) = self.save() {
            self.tasks[index].completed = was_completed;
            return Err(e);
        }

        tracing::info!("Completed {}", id);
        Ok(true)
    }

    fn next_sequence(&self) -> u64 {
        let highest = self.tasks.iter().filter_map(Task::sequence).max().unwrap_or(0);
        highest.max(self.tasks.len() as u64) + 1
    }

    fn save(&self) -> Result<(), StoreError> {
        save_collection(&self.path, &self.tasks)
    }

    // ============================================================
    // Queries
    // ============================================================

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn pending(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    pub fn due_today(&self) -> Vec<&Task> {
        self.due_today_at(now())
    }

    pub fn due_today_at(&self, now: NaiveDateTime) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| !t.completed && t.is_due_on(now))
            .collect()
    }

    pub fn overdue(&self) -> Vec<&Task> {
        self.overdue_at(now())
    }

    pub fn overdue_at(&self, now: NaiveDateTime) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_overdue(now)).collect()
    }

    pub fn high_priority(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| !t.completed && t.priority == Priority::High)
            .collect()
    }

    pub fn stats(&self) -> TaskStats {
        self.stats_at(now())
    }

    pub fn stats_at(&self, now: NaiveDateTime) -> TaskStats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskStats {
            total,
            completed,
            pending: total - completed,
            overdue: self.overdue_at(now).len(),
            completion_rate: completion_rate(completed, total),
        }
    }

    // ============================================================
    // Presentation
    // ============================================================

    pub fn format_summary(&self) -> String {
        self.format_summary_at(now())
    }

    /// Human-readable digest: overdue, then high priority, then today.
    pub fn format_summary_at(&self, now: NaiveDateTime) -> String {
        let mut out = String::from("Your tasks:\n\n");

        let overdue = self.overdue_at(now);
        if !overdue.is_empty() {
            out.push_str("Overdue:\n");
            for task in overdue.iter().take(SUMMARY_LIMIT) {
                let _ = writeln!(out, "- {} ({})", task.title, task.subject);
            }
            out.push('\n');
        }

        let high = self.high_priority();
        if !high.is_empty() {
            out.push_str("High priority:\n");
            for task in high.iter().take(SUMMARY_LIMIT) {
                let _ = match task.time_left(now) {
                    TimeLeft::Passed => writeln!(out, "- {} (overdue)", task.title),
                    left => writeln!(out, "- {} (due in {})", task.title, left),
                };
            }
            out.push('\n');
        }

        let today = self.due_today_at(now);
        if today.is_empty() {
            out.push_str("No tasks due today!\n");
        } else {
            out.push_str("Due today:\n");
            for task in &today {
                let _ = writeln!(out, "- {} ({} min)", task.title, task.estimated_minutes);
            }
        }

        let stats = self.stats_at(now);
        let _ = write!(
            out,
            "\nProgress: {}/{} completed",
            stats.completed, stats.total
        );
        out
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
