//! Weaver CLI - agent-handoff project generator
//!
//! Interviews the user about a product idea, builds a task plan, then
//! loops Coder -> Tester -> Debugger per task, writing the collaborator's
//! code blocks into a fresh project directory. Ctrl-C aborts the run with
//! a farewell; files already written stay on disk.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use weaver_agent::AnthropicCollaborator;
use weaver_core::{ProjectState, WeaverConfig};
use weaver_orchestrator::{create_project_dir, PlanRunner};
use weaver_planning::{build_plan, run_interview, UserIo};

mod console;
use console::Console;

#[derive(Parser)]
#[command(name = "weaver")]
#[command(version, about = "Turn a one-line product idea into a generated codebase")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory receiving generated project directories
    #[arg(long)]
    projects_dir: Option<PathBuf>,

    /// Maximum iterations per task
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Model to use for the collaborator
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            println!();
            console::say("Goodbye!");
            Ok(())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = WeaverConfig::load_or_default(Path::new("."))?;
    if let Some(dir) = cli.projects_dir {
        config.projects_root = dir;
    }
    if let Some(n) = cli.max_iterations {
        config.loop_defaults.max_iterations = n;
    }
    if let Some(model) = cli.model {
        config.models.default = model;
    }

    let collaborator = AnthropicCollaborator::from_config(&config)?;
    let mut io = Console::new();

    console::say("Welcome to the Weaver project generator!");
    console::say("Please describe your project idea, and I'll help you plan and implement it.");
    let idea = io.ask("What would you like to build?")?;

    console::say("Great! Let me ask you some questions to understand your requirements better.");
    let (conversation, context) = run_interview(&collaborator, &mut io, &idea).await?;

    console::say("Creating implementation plan...");
    let project_dir = create_project_dir(&config.projects_root, &idea)?;
    let context = context.with("project_dir", project_dir.display().to_string());

    let (plan, context) = build_plan(&collaborator, &conversation, &context).await;
    console::say(&format!("Plan ready: {} tasks.", plan.tasks.len()));

    let mut state = ProjectState::new(idea, project_dir);
    state.requirements = context;
    state.plan = plan.tasks;

    console::say("Starting implementation of tasks...");
    let runner = PlanRunner::new(&collaborator, config.loop_defaults.max_iterations);
    let state = runner.execute(state, &conversation).await;

    for (i, (task, outcome)) in state.completed_steps.iter().enumerate() {
        console::say(&format!("Task {}: {} - {}", i + 1, task.description, outcome));
    }
    console::say(&format!(
        "Project implementation completed! Files are in: {}",
        state.project_dir.display()
    ));
    if !state.all_confirmed() {
        console::say("Some tasks were not confirmed by the tester; review the generated files.");
    }

    Ok(())
}
