//! Command-line front end for the task list.
//!
//! # Responsibility
//! - Map subcommands onto `TaskStore` / `ThemeStore` operations.
//! - Validate raw text at the boundary before it reaches the store.
//! - Await pending writes before the process exits.

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use std::error::Error;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tagtodo_core::{
    init_logging, normalize_task_text, segment_text, AppConfig, EditSession, SqliteStorage, Task,
    TaskFilter, TaskId, TaskStore, TextSegment, ThemeMode, ThemeStore,
};
use tokio::runtime::{Builder, Handle};

const DATA_DIR_NAME: &str = ".tagtodo";
const HASHTAG_STYLE: &str = "\x1b[36m";
const RESET_STYLE: &str = "\x1b[0m";

#[derive(Parser, Debug)]
#[command(author, version, about = "tagtodo: a hashtag-aware task list", long_about = None)]
struct Cli {
    /// Directory holding the database and logs (default: ./.tagtodo).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a task.
    Add {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List every task.
    List,
    /// Flip a task between open and done.
    Toggle { id: String },
    /// Replace the text of a task.
    Edit {
        id: String,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Delete a task.
    Rm { id: String },
    /// Delete every completed task.
    ClearDone,
    /// Delete every task.
    ClearAll,
    /// Filter tasks by text and hashtags.
    Search {
        query: Option<String>,
        /// Required hashtag (repeatable, all must match).
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List every hashtag in use.
    Tags,
    /// Show or change the theme preference.
    Theme { mode: Option<ThemeArg> },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Dark,
    Light,
    Toggle,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let config = AppConfig::from_env(&data_dir)?;
    if let Err(err) = init_logging(&config.log) {
        eprintln!("warning: logging disabled: {err}");
    }

    let runtime = Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(execute(config, cli.command))
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    let cwd = std::env::current_dir()?;
    Ok(match flag {
        Some(path) if path.is_absolute() => path,
        Some(path) => cwd.join(path),
        None => cwd.join(DATA_DIR_NAME),
    })
}

async fn execute(config: AppConfig, command: Commands) -> Result<(), Box<dyn Error>> {
    let storage = Arc::new(SqliteStorage::open(config.db_path())?);

    if let Commands::Theme { mode } = command {
        return run_theme(storage, mode).await;
    }

    let mut store = TaskStore::new(storage, Handle::current());
    let outcome = store.load().await;
    info!("event=cli_load module=cli status=ok outcome={outcome:?}");
    if config.seed_examples {
        store.seed_examples_on_first_run();
    }

    let result = run_task_command(&mut store, command);
    let report = store.settle().await;
    if report.failed > 0 {
        error!(
            "event=cli_settle module=cli status=error failed={}",
            report.failed
        );
        eprintln!("warning: {} write(s) failed; see logs", report.failed);
    }
    result
}

fn run_task_command(
    store: &mut TaskStore<SqliteStorage>,
    command: Commands,
) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Add { text } => {
            let text = normalize_task_text(&text.join(" ")).ok_or("task text cannot be empty")?;
            let task = store.create(text);
            println!("added {}", task.id());
        }
        Commands::List => print_tasks(store.tasks()),
        Commands::Toggle { id } => {
            let id = resolve_id(store, &id)?;
            store.toggle_completed(&id);
        }
        Commands::Edit { id, text } => {
            let id = resolve_id(store, &id)?;
            let mut session = EditSession::new();
            session.begin(store, &id)?;
            session.set_draft(text.join(" "))?;
            session.save(store)?;
        }
        Commands::Rm { id } => {
            let id = resolve_id(store, &id)?;
            store.delete(&id);
        }
        Commands::ClearDone => store.clear_completed(),
        Commands::ClearAll => store.clear_all(),
        Commands::Search { query, tags } => {
            let mut filter = TaskFilter::new().with_search(query.unwrap_or_default());
            for tag in tags {
                filter = filter.with_hashtag(tag.trim_start_matches('#'));
            }
            print_tasks(&store.filter(&filter));
        }
        Commands::Tags => {
            for tag in store.all_hashtags() {
                println!("#{tag}");
            }
            return Ok(());
        }
        Commands::Theme { .. } => return Err("theme is not a task command".into()),
    }

    let summary = store.completion_summary();
    println!("{}/{} completed", summary.completed, summary.total);
    Ok(())
}

async fn run_theme(storage: Arc<SqliteStorage>, mode: Option<ThemeArg>) -> Result<(), Box<dyn Error>> {
    let mut theme = ThemeStore::new(storage, Handle::current());
    theme.load().await;
    match mode {
        Some(ThemeArg::Dark) => theme.set_mode(ThemeMode::Dark),
        Some(ThemeArg::Light) => theme.set_mode(ThemeMode::Light),
        Some(ThemeArg::Toggle) => {
            theme.toggle();
        }
        None => {}
    }
    println!("{}", theme.mode().as_str());
    let report = theme.settle().await;
    if report.failed > 0 {
        return Err("theme preference was not saved".into());
    }
    Ok(())
}

/// Exact id, or a prefix matching exactly one task.
fn resolve_id(store: &TaskStore<SqliteStorage>, raw: &str) -> Result<TaskId, Box<dyn Error>> {
    let exact = TaskId::from(raw);
    if store.contains(&exact) {
        return Ok(exact);
    }
    let mut matches = store
        .tasks()
        .iter()
        .filter(|task| task.id().as_str().starts_with(raw));
    match (matches.next(), matches.next()) {
        (Some(task), None) if !raw.is_empty() => Ok(task.id().clone()),
        (Some(_), Some(_)) => Err(format!("id prefix `{raw}` is ambiguous").into()),
        _ => Err(format!("no task with id `{raw}`").into()),
    }
}

fn print_tasks(tasks: &[Task]) {
    let styled = std::io::stdout().is_terminal();
    for task in tasks {
        let mark = if task.is_completed() { "x" } else { " " };
        println!("[{mark}] {}  {}", task.id(), render_text(task.text(), styled));
    }
}

fn render_text(text: &str, styled: bool) -> String {
    segment_text(text)
        .into_iter()
        .map(|segment| match segment {
            TextSegment::Hashtag(word) if styled => format!("{HASHTAG_STYLE}{word}{RESET_STYLE}"),
            TextSegment::Hashtag(word) | TextSegment::Plain(word) => word,
        })
        .collect::<Vec<_>>()
        .join(" ")
}
