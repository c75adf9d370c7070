//! # weaver-agent
//!
//! The external-collaborator boundary for Weaver orchestration.
//!
//! This crate owns everything between the task runner and the model:
//! - The static role directory (personas and their hand-off graph)
//! - The `Collaborator` trait and its Anthropic implementation
//! - The fenced code-block extractor (the reply-to-files wire format)
//! - The file materializer that writes extracted blocks to disk
//!
//! ## Key pattern
//!
//! Completion is signaled by literal markers in tester replies. They are
//! untrusted free text; `Verdict::from_text` is the single place they are
//! inspected, and the rest of the pipeline branches only on the closed
//! `Verdict` enum.

mod client;
mod extractor;
mod files;
mod roles;
mod types;

pub use client::{AnthropicCollaborator, Collaborator};
pub use extractor::{extract_code_blocks, CodeBlock};
pub use files::{materialize, read_file, validate_path, write_file};
pub use roles::{can_hand_off, role, Role, ROLES};
pub use types::{AgentReply, Verdict, COMPLETE_MARKER, FAILED_MARKER};
