use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A study task with a deadline.
///
/// Deadlines are local wall-clock timestamps. They are serialized as ISO-8601
/// strings without an offset, which keeps the task file readable and editable
/// by hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Sequential identifier of the form `task_<n>`.
    pub id: String,
    pub title: String,
    pub subject: String,
    pub deadline: NaiveDateTime,
    pub estimated_minutes: u32,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// True when the deadline has passed and the task is still open.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.deadline < now
    }

    /// True when the deadline falls on the same calendar day as `now`.
    pub fn is_due_on(&self, now: NaiveDateTime) -> bool {
        self.deadline.date() == now.date()
    }

    /// Coarse time remaining until the deadline.
    pub fn time_left(&self, now: NaiveDateTime) -> TimeLeft {
        TimeLeft::between(now, self.deadline)
    }

    /// Numeric part of the identifier, if it follows the `task_<n>` pattern.
    pub fn sequence(&self) -> Option<u64> {
        self.id.strip_prefix(TASK_ID_PREFIX)?.parse().ok()
    }
}

pub const TASK_ID_PREFIX: &str = "task_";

/// Task urgency.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Remaining time until a deadline, rounded down to the largest whole unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    Days(i64),
    Hours(i64),
    Minutes(i64),
    /// The deadline is already behind us.
    Passed,
}

impl TimeLeft {
    pub fn between(now: NaiveDateTime, deadline: NaiveDateTime) -> Self {
        let delta: Duration = deadline - now;
        if delta < Duration::zero() {
            Self::Passed
        } else if delta.num_days() >= 1 {
            Self::Days(delta.num_days())
        } else if delta.num_hours() >= 1 {
            Self::Hours(delta.num_hours())
        } else {
            Self::Minutes(delta.num_minutes())
        }
    }
}

impl std::fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Days(n) => write!(f, "{} {}", n, plural(*n, "day", "days")),
            Self::Hours(n) => write!(f, "{} {}", n, plural(*n, "hour", "hours")),
            Self::Minutes(n) => write!(f, "{} {}", n, plural(*n, "minute", "minutes")),
            Self::Passed => write!(f, "overdue"),
        }
    }
}

fn plural(n: i64, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}

/// Input for creating a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub subject: String,
    /// Days from now until the deadline. Zero means "due right now".
    pub deadline_days: i64,
    #[serde(default = "default_estimated_minutes")]
    pub estimated_minutes: u32,
    #[serde(default)]
    pub priority: Priority,
}

impl NewTask {
    /// A medium-priority, hour-long task due in `deadline_days`.
    pub fn new(title: impl Into<String>, subject: impl Into<String>, deadline_days: i64) -> Self {
        Self {
            title: title.into(),
            subject: subject.into(),
            deadline_days,
            estimated_minutes: default_estimated_minutes(),
            priority: Priority::default(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_estimated_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = minutes;
        self
    }
}

fn default_estimated_minutes() -> u32 {
    60
}

/// Aggregate counters over the task collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    /// Percentage of completed tasks, rounded to one decimal. Zero when empty.
    pub completion_rate: f64,
}

/// `completed / total * 100` rounded to one decimal place, or 0 for no tasks.
pub fn completion_rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = completed as f64 / total as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn time_left_picks_largest_whole_unit() {
        let now = at(8, 0);
        assert_eq!(
            TimeLeft::between(now, now + Duration::days(2) + Duration::hours(5)),
            TimeLeft::Days(2)
        );
        assert_eq!(TimeLeft::between(now, at(11, 30)), TimeLeft::Hours(3));
        assert_eq!(TimeLeft::between(now, at(8, 45)), TimeLeft::Minutes(45));
        assert_eq!(TimeLeft::between(now, at(7, 59)), TimeLeft::Passed);
    }

    #[test]
    fn time_left_renders_units() {
        assert_eq!(TimeLeft::Days(1).to_string(), "1 day");
        assert_eq!(TimeLeft::Hours(5).to_string(), "5 hours");
        assert_eq!(TimeLeft::Minutes(0).to_string(), "0 minutes");
        assert_eq!(TimeLeft::Passed.to_string(), "overdue");
    }

    #[test]
    fn completion_rate_rounds_to_one_decimal() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(1, 3), 33.3);
        assert_eq!(completion_rate(2, 3), 66.7);
        assert_eq!(completion_rate(3, 3), 100.0);
    }

    #[test]
    fn sequence_parses_task_prefix() {
        let task = Task {
            id: "task_12".to_string(),
            title: "t".to_string(),
            subject: "s".to_string(),
            deadline: at(9, 0),
            estimated_minutes: 60,
            priority: Priority::Low,
            completed: false,
        };
        assert_eq!(task.sequence(), Some(12));
    }

    #[test]
    fn priority_round_trips_through_str() {
        for p in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(Priority::from_str(p.as_str()), Some(p));
        }
        assert_eq!(Priority::from_str("urgent"), None);
    }
}
