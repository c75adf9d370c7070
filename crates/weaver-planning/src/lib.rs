//! # weaver-planning
//!
//! Requirements interview and plan building for Weaver.
//!
//! The interview runs the planner role through a short scripted dialogue
//! with the user; the plan builder then asks the project manager role to
//! turn the transcript into an ordered task list, falling back to a fixed
//! default plan when the reply is unusable.

mod builder;
mod interview;

pub use builder::{build_plan, default_plan, Plan, PLAN_REQUEST};
pub use interview::{run_interview, UserIo};
