use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use study_assistant::assistant::StudyAssistant;
use study_assistant::config::{Settings, StorageSettings};
use study_assistant::models::{NewTask, Priority};

#[derive(Parser)]
#[command(name = "study")]
#[command(about = "Study assistant backed by a local Ollama model")]
struct Cli {
    /// Config file (default: <config dir>/study-assistant/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding materials.json and tasks.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Ollama model name
    #[arg(long, global = true)]
    model: Option<String>,

    /// Ollama base URL
    #[arg(long, global = true)]
    ollama_url: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Chat,
    /// Answer a single query and exit
    Ask {
        /// The query, e.g. "explain recursion"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Add a study material to the knowledge base
    AddMaterial {
        text: String,
        #[arg(short, long, default_value = "general")]
        subject: String,
    },
    /// Add a task
    AddTask {
        title: String,
        #[arg(short, long)]
        subject: String,
        /// Days until the deadline
        #[arg(short, long, default_value = "7")]
        days: i64,
        /// Estimated effort in minutes
        #[arg(short, long, default_value = "60")]
        minutes: u32,
        /// low, medium or high
        #[arg(short, long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
    },
    /// Mark a task as completed
    Complete {
        /// Task id, e.g. task_3
        id: String,
    },
    /// Show the task summary
    Tasks {
        /// List every task with its id instead of the summary
        #[arg(short, long)]
        all: bool,
    },
    /// Show task, knowledge base and model statistics
    Stats,
    /// Remove every study material
    ClearMaterials,
    /// Add example materials and tasks
    Seed,
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::from_str(&s.to_lowercase())
        .ok_or_else(|| format!("unknown priority '{}', expected low, medium or high", s))
}

/// Initialize tracing on stderr so stdout carries only the conversation.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "study_assistant=debug"
    } else {
        "study_assistant=warn"
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(ref dir) = cli.data_dir {
        settings.storage = StorageSettings::in_dir(dir);
    }
    if let Some(ref model) = cli.model {
        settings.ollama.model = model.clone();
    }
    if let Some(ref url) = cli.ollama_url {
        settings.ollama.base_url = url.clone();
    }
    Ok(settings)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(&cli)?;
    tracing::debug!("Using data files {:?}", settings.storage);

    let mut assistant =
        StudyAssistant::open(settings).context("Failed to open the study collections")?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => assistant.run_chat().await?,
        Commands::Ask { query } => {
            let reply = assistant.process_query(&query.join(" ")).await;
            println!("{}", reply.text);
        }
        Commands::AddMaterial { text, subject } => {
            let material = assistant.add_material(&text, &subject)?;
            println!("Added material #{}", material.id);
        }
        Commands::AddTask {
            title,
            subject,
            days,
            minutes,
            priority,
        } => {
            let task = assistant.add_task(
                NewTask::new(title, subject, days)
                    .with_estimated_minutes(minutes)
                    .with_priority(priority),
            )?;
            println!(
                "Added {} \"{}\" due {}",
                task.id,
                task.title,
                task.deadline.format("%Y-%m-%d %H:%M")
            );
        }
        Commands::Complete { id } => {
            if assistant.complete_task(&id)? {
                println!("Completed {}", id);
            } else {
                println!("No task with id {}", id);
            }
        }
        Commands::Tasks { all } => {
            if all {
                for task in assistant.tasks().all() {
                    println!(
                        "{} [{}] {} ({}) due {}, {} priority, {} min",
                        task.id,
                        if task.completed { "x" } else { " " },
                        task.title,
                        task.subject,
                        task.deadline.format("%Y-%m-%d %H:%M"),
                        task.priority.as_str(),
                        task.estimated_minutes,
                    );
                }
            } else {
                println!("{}", assistant.tasks().format_summary());
            }
        }
        Commands::Stats => println!("{}", assistant.stats_text().await),
        Commands::ClearMaterials => {
            assistant.clear_materials()?;
            println!("Knowledge base cleared");
        }
        Commands::Seed => {
            assistant.seed()?;
            println!("Added example materials and tasks");
        }
    }

    Ok(())
}
