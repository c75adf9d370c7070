//! # weaver-core
//!
//! Core types for Weaver, an agent-handoff project generator.
//!
//! Weaver turns a one-line product idea into a generated codebase by
//! cycling a Coder -> Tester -> Debugger loop against an external LLM
//! collaborator. This crate holds the shared vocabulary:
//!
//! - Roles ARE static personas with a fixed hand-off graph
//! - Tasks ARE ordered plan entries with target files
//! - Context IS an immutable snapshot layered on each hand-off
//! - Run state IS a value threaded through the runner, never a global

mod config;
mod error;
mod types;

pub use config::{LoopDefaults, ModelConfig, WeaverConfig};
pub use error::{Result, WeaverError};
pub use types::*;
