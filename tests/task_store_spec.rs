use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use speculate2::speculate;
use study_assistant::models::*;
use study_assistant::store::{StoreError, TaskStore};

/// A fixed Sunday noon, so date-dependent assertions are stable.
fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn ids(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|t| t.id.clone()).collect()
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("data").join("tasks.json");
        let mut store = TaskStore::open(&path).expect("Failed to open store");
    }

    describe "open" {
        it "starts empty when the file does not exist" {
            assert!(store.all().is_empty());
            assert!(!path.exists());
        }

        it "fails on a malformed file instead of discarding it" {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "[{\"id\": ").unwrap();

            let result = TaskStore::open(&path);
            assert!(matches!(result, Err(StoreError::Parse { .. })));
        }

        it "reads files with fractional-second deadlines" {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, r#"[{
                "id": "task_1",
                "title": "Solve the algebra problems",
                "subject": "Math",
                "deadline": "2024-05-01T10:30:00.123456",
                "estimated_minutes": 45,
                "priority": "high",
                "completed": false
            }]"#).unwrap();

            let store = TaskStore::open(&path).expect("Failed to open");
            let task = store.get("task_1").expect("Task missing");
            assert_eq!(task.priority, Priority::High);
            assert_eq!(task.estimated_minutes, 45);
            assert_eq!(task.deadline.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 10:30");
        }
    }

    describe "add" {
        it "sets the deadline the given number of days from now" {
            let before = Local::now().naive_local();
            let task = store.add(NewTask::new("Read chapter 4", "Physics", 3)).expect("Failed to add");
            let after = Local::now().naive_local();

            assert!(task.deadline >= before + Duration::days(3));
            assert!(task.deadline <= after + Duration::days(3));
        }

        it "makes the task immediately pending" {
            let task = store.add(NewTask::new("Read chapter 4", "Physics", 3)).expect("Failed to add");

            assert!(!task.completed);
            assert_eq!(ids(&store.pending()), vec![task.id]);
        }

        it "applies the default effort and priority" {
            let task = store.add(NewTask::new("Essay", "History", 5)).expect("Failed to add");

            assert_eq!(task.estimated_minutes, 60);
            assert_eq!(task.priority, Priority::Medium);
        }

        it "assigns sequential ids" {
            let first = store.add(NewTask::new("One", "Math", 1)).expect("Failed to add");
            let second = store.add(NewTask::new("Two", "Math", 1)).expect("Failed to add");

            assert_eq!(first.id, "task_1");
            assert_eq!(second.id, "task_2");
        }

        it "persists immediately" {
            store.add(NewTask::new("One", "Math", 1)).expect("Failed to add");

            let reopened = TaskStore::open(&path).expect("Failed to reopen");
            assert_eq!(reopened.all().len(), 1);
        }

        it "rejects a deadline too far away to represent" {
            let result = store.add(NewTask::new("Someday", "Math", 200_000_000));

            assert!(matches!(result, Err(StoreError::DeadlineOutOfRange(200_000_000))));
            assert!(store.all().is_empty());
            assert!(!path.exists());

            let task = store.add(NewTask::new("Soon", "Math", 1)).expect("Failed to add");
            assert_eq!(task.id, "task_1");
        }

        it "rejects a deadline too far in the past to represent" {
            let result = store.add_at(NewTask::new("Ancient", "History", i64::MIN), noon());

            assert!(matches!(result, Err(StoreError::DeadlineOutOfRange(i64::MIN))));
        }
    }

    describe "complete" {
        it "returns false for an unknown id" {
            store.add(NewTask::new("One", "Math", 1)).expect("Failed to add");

            assert!(!store.complete("task_99").expect("Complete failed"));
            assert_eq!(store.pending().len(), 1);
        }

        it "marks the task done and persists it" {
            let task = store.add(NewTask::new("One", "Math", 1)).expect("Failed to add");

            assert!(store.complete(&task.id).expect("Complete failed"));

            let reopened = TaskStore::open(&path).expect("Failed to reopen");
            assert!(reopened.get(&task.id).unwrap().completed);
            assert!(reopened.pending().is_empty());
        }
    }

    describe "queries" {
        it "tracks an urgent task through overdue and high priority until completed" {
            let now = Local::now().naive_local();
            let task = store
                .add_at(NewTask::new("Hand in lab report", "Chemistry", 0).with_priority(Priority::High), now)
                .expect("Failed to add");
            let later = now + Duration::seconds(1);

            assert_eq!(ids(&store.overdue_at(later)), vec![task.id.clone()]);
            assert_eq!(ids(&store.high_priority()), vec![task.id.clone()]);

            store.complete(&task.id).expect("Complete failed");

            assert!(store.overdue_at(later).is_empty());
            assert!(store.high_priority().is_empty());
        }

        it "is not overdue exactly at the deadline" {
            let task = store.add_at(NewTask::new("Now", "Math", 0), noon()).expect("Failed to add");

            assert!(store.overdue_at(noon()).is_empty());
            assert_eq!(ids(&store.due_today_at(noon())), vec![task.id]);
        }

        it "selects tasks due on the current calendar day" {
            let today = store.add_at(NewTask::new("Today", "Math", 0), noon()).expect("Failed to add");
            store.add_at(NewTask::new("Tomorrow", "Math", 1), noon()).expect("Failed to add");
            store.add_at(NewTask::new("Yesterday", "Math", -1), noon()).expect("Failed to add");

            assert_eq!(ids(&store.due_today_at(noon() + Duration::hours(3))), vec![today.id]);
        }

        it "leaves completed tasks out of due today" {
            let task = store.add_at(NewTask::new("Today", "Math", 0), noon()).expect("Failed to add");
            store.complete(&task.id).expect("Complete failed");

            assert!(store.due_today_at(noon()).is_empty());
        }
    }

    describe "stats" {
        it "reports zero completion for an empty store" {
            let stats = store.stats();

            assert_eq!(stats.total, 0);
            assert_eq!(stats.completion_rate, 0.0);
        }

        it "rounds the completion rate to one decimal" {
            let first = store.add_at(NewTask::new("One", "Math", 2), noon()).expect("Failed to add");
            store.add_at(NewTask::new("Two", "Math", 2), noon()).expect("Failed to add");
            store.add_at(NewTask::new("Three", "Math", -1), noon()).expect("Failed to add");
            store.complete(&first.id).expect("Complete failed");

            let stats = store.stats_at(noon());
            assert_eq!(stats.total, 3);
            assert_eq!(stats.completed, 1);
            assert_eq!(stats.pending, 2);
            assert_eq!(stats.overdue, 1);
            assert_eq!(stats.completion_rate, 33.3);
        }
    }

    describe "round trip" {
        it "reloads an equal collection" {
            let first = store
                .add(NewTask::new("One", "Math", 2).with_priority(Priority::High).with_estimated_minutes(90))
                .expect("Failed to add");
            store.add(NewTask::new("Two", "Physics", 4).with_priority(Priority::Low)).expect("Failed to add");
            store.complete(&first.id).expect("Complete failed");

            let reopened = TaskStore::open(&path).expect("Failed to reopen");
            assert_eq!(reopened.all(), store.all());
        }

        it "continues the id sequence after reopening" {
            store.add(NewTask::new("One", "Math", 2)).expect("Failed to add");

            let mut reopened = TaskStore::open(&path).expect("Failed to reopen");
            let task = reopened.add(NewTask::new("Two", "Math", 2)).expect("Failed to add");
            assert_eq!(task.id, "task_2");
        }
    }

    describe "format_summary" {
        it "says so when nothing is due today" {
            let summary = store.format_summary_at(noon());

            assert!(summary.contains("No tasks due today!"));
            assert!(summary.ends_with("Progress: 0/0 completed"));
        }

        it "lists at most three overdue tasks" {
            for n in 1..=4 {
                store
                    .add_at(NewTask::new(format!("Old {}", n), "History", -2), noon())
                    .expect("Failed to add");
            }

            let summary = store.format_summary_at(noon());
            assert!(summary.contains("Overdue:\n- Old 1 (History)\n- Old 2 (History)\n- Old 3 (History)\n\n"));
            assert!(!summary.contains("Old 4"));
        }

        it "shows remaining time for high priority tasks" {
            store
                .add_at(NewTask::new("Exam prep", "Math", 2).with_priority(Priority::High), noon())
                .expect("Failed to add");

            let summary = store.format_summary_at(noon() + Duration::hours(1));
            assert!(summary.contains("High priority:\n- Exam prep (due in 1 day)"));
        }

        it "orders overdue then high priority then today" {
            store.add_at(NewTask::new("Late", "History", -1), noon()).expect("Failed to add");
            store
                .add_at(NewTask::new("Urgent", "Math", 3).with_priority(Priority::High), noon())
                .expect("Failed to add");
            store
                .add_at(NewTask::new("Flashcards", "Biology", 0).with_estimated_minutes(20), noon())
                .expect("Failed to add");

            let summary = store.format_summary_at(noon());
            let overdue = summary.find("Overdue:").expect("No overdue section");
            let high = summary.find("High priority:").expect("No high priority section");
            let today = summary.find("Due today:").expect("No today section");

            assert!(overdue < high && high < today);
            assert!(summary.contains("- Flashcards (20 min)"));
            assert!(summary.ends_with("Progress: 0/3 completed"));
        }
    }
}
