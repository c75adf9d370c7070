//! Core type definitions for Weaver orchestration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The six behavioral roles that drive the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleId {
    Planner,
    ProjectManager,
    Coder,
    Tester,
    Debugger,
    Documentation,
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planner => write!(f, "planner"),
            Self::ProjectManager => write!(f, "project_manager"),
            Self::Coder => write!(f, "coder"),
            Self::Tester => write!(f, "tester"),
            Self::Debugger => write!(f, "debugger"),
            Self::Documentation => write!(f, "documentation"),
        }
    }
}

impl std::str::FromStr for RoleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planner" => Ok(Self::Planner),
            "project_manager" | "projectmanager" | "manager" => Ok(Self::ProjectManager),
            "coder" => Ok(Self::Coder),
            "tester" => Ok(Self::Tester),
            "debugger" => Ok(Self::Debugger),
            "documentation" | "docs" => Ok(Self::Documentation),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// One target file within a task
///
/// Content is replaced wholesale on each materialization; there is no
/// diffing anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    /// Path relative to the project directory
    pub path: String,
    /// Full file content
    #[serde(default)]
    pub content: String,
    /// Free-text guidance for the agent working on this file
    #[serde(default)]
    pub implementation_details: String,
}

impl FileSpec {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            implementation_details: String::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.implementation_details = details.into();
        self
    }
}

/// One unit of planned work
///
/// Immutable once the task runner begins executing it, except for the file
/// list, which accumulates materialized entries during iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    /// Role that starts the iteration loop (normally Coder)
    #[serde(default = "default_task_role")]
    pub role: RoleId,
    #[serde(default)]
    pub files: Vec<FileSpec>,
    #[serde(default)]
    pub implementation_details: String,
}

fn default_task_role() -> RoleId {
    RoleId::Coder
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            role: RoleId::Coder,
            files: Vec::new(),
            implementation_details: String::new(),
        }
    }

    pub fn with_file(mut self, file: FileSpec) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.implementation_details = details.into();
        self
    }
}

/// Outcome of running one task through the iteration loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum TaskOutcome {
    /// Tester reported completion with tests passing
    Completed { iterations: usize },
    /// Iteration cap reached without a completion verdict
    Exhausted { iterations: usize },
}

impl TaskOutcome {
    /// Whether the tester confirmed the implementation
    pub fn confirmed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn iterations(&self) -> usize {
        match self {
            Self::Completed { iterations } | Self::Exhausted { iterations } => *iterations,
        }
    }
}

impl std::fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed { iterations } => {
                write!(f, "completed after {} iterations", iterations)
            }
            Self::Exhausted { iterations } => {
                write!(f, "unconfirmed after {} iterations", iterations)
            }
        }
    }
}

/// A single message in a collaborator conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Immutable context value carried across agent hand-offs
///
/// Every hand-off produces a new `Context` layered over the previous one.
/// Nothing ever mutates a shared context in place, so two holders of the
/// same snapshot can never observe each other's changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    entries: BTreeMap<String, serde_json::Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|v| v.as_str())
    }

    /// Return a new context with one entry added or replaced
    pub fn with(&self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(key.into(), value.into());
        Self { entries }
    }

    /// Return a new context with `other`'s entries layered on top of this one
    pub fn layered(&self, other: &Context) -> Self {
        let mut entries = self.entries.clone();
        for (key, value) in &other.entries {
            entries.insert(key.clone(), value.clone());
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Process-wide run state, threaded through the task runner as a value
///
/// The runner takes ownership, mutates its own copy as tasks complete, and
/// returns it. It is never held as ambient global storage and never
/// persisted as structured data; only the generated files persist.
#[derive(Debug, Clone)]
pub struct ProjectState {
    /// The user's original idea
    pub idea: String,
    /// Requirements gathered during the interview
    pub requirements: Context,
    /// Tasks remaining to execute, in order
    pub plan: Vec<Task>,
    /// Index of the task currently (or next) being executed
    pub current_step: usize,
    /// Tasks that have been attempted, with their outcomes
    pub completed_steps: Vec<(Task, TaskOutcome)>,
    /// Root directory receiving generated files
    pub project_dir: PathBuf,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

impl ProjectState {
    pub fn new(idea: impl Into<String>, project_dir: PathBuf) -> Self {
        Self {
            idea: idea.into(),
            requirements: Context::new(),
            plan: Vec::new(),
            current_step: 0,
            completed_steps: Vec::new(),
            project_dir,
            started_at: Utc::now(),
        }
    }

    /// Whether every attempted task was confirmed by the tester
    pub fn all_confirmed(&self) -> bool {
        self.completed_steps
            .iter()
            .all(|(_, outcome)| outcome.confirmed())
    }
}
