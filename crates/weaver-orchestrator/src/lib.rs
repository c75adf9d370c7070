//! # weaver-orchestrator
//!
//! Task execution engine for Weaver.
//!
//! This crate provides:
//! - A pure state machine for the Coder -> Tester -> Debugger cycle
//! - The per-task iteration loop with code-block materialization
//! - The plan runner that threads `ProjectState` through a whole run
//! - Project directory creation and per-iteration prompt building
//!
//! Correctness of generated code is entirely the collaborator's claim;
//! the engine only enforces the loop's shape and its iteration cap.

mod project;
mod prompt;
mod runner;
mod state_machine;
mod task_runner;

pub use project::{create_project_dir, sanitize_project_name};
pub use prompt::build_iteration_prompt;
pub use runner::PlanRunner;
pub use state_machine::{advance, Step};
pub use task_runner::{TaskReport, TaskRunner};
