//! Pure state machine for the per-task iteration loop
//!
//! No I/O, no async, no dependency on the collaborator. The active states
//! are the three working roles; advancement branches on the closed
//! `Verdict` enum produced at the collaborator boundary, never on reply
//! text. This function never panics.
//!
//! Transitions:
//! - Coder responded -> Tester, unconditionally
//! - Tester responded -> Complete / Debugger / Coder by verdict
//! - Debugger responded -> Tester, unconditionally (never Coder)

use weaver_agent::Verdict;
use weaver_core::RoleId;

/// Result of one advancement decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Hand the task to the next role
    Continue(RoleId),
    /// Tester confirmed completion; the loop is done
    Complete,
}

/// Decide the next step after `current` has responded
///
/// The verdict only matters when the tester responded; every other role
/// routes its work to the tester for judgment. Roles outside the working
/// trio (if a plan ever assigns one) behave like the coder.
pub fn advance(current: RoleId, verdict: &Verdict) -> Step {
    match current {
        RoleId::Tester => match verdict {
            Verdict::Complete => Step::Complete,
            Verdict::Failed(_) => Step::Continue(RoleId::Debugger),
            Verdict::Inconclusive => Step::Continue(RoleId::Coder),
        },
        _ => Step::Continue(RoleId::Tester),
    }
}
