//! Plan runner - drives the whole plan, one task at a time
//!
//! Owns the run's `ProjectState` for the duration of execution: the state
//! comes in as a value, gets its completed-steps list filled in, and goes
//! back out. Tasks run strictly sequentially; an exhausted task is a
//! warning, never a reason to stop the run.

use weaver_agent::Collaborator;
use weaver_core::{ChatMessage, ProjectState, Task};

use crate::task_runner::TaskRunner;

/// Executes a planned sequence of tasks against one project directory
pub struct PlanRunner<'a> {
    collaborator: &'a dyn Collaborator,
    max_iterations: usize,
}

impl<'a> PlanRunner<'a> {
    pub fn new(collaborator: &'a dyn Collaborator, max_iterations: usize) -> Self {
        Self {
            collaborator,
            max_iterations,
        }
    }

    /// Execute every task in `state.plan`, returning the updated state
    ///
    /// Each attempted task moves from the plan to `completed_steps` with
    /// its outcome and accumulated files, confirmed or not.
    pub async fn execute(
        &self,
        mut state: ProjectState,
        conversation: &[ChatMessage],
    ) -> ProjectState {
        let runner = TaskRunner::new(
            self.collaborator,
            state.project_dir.clone(),
            self.max_iterations,
        );

        let mut context = state
            .requirements
            .with("project_dir", state.project_dir.display().to_string());

        let tasks: Vec<Task> = std::mem::take(&mut state.plan);
        let total = tasks.len();

        for (index, task) in tasks.into_iter().enumerate() {
            tracing::info!("Task {}/{}: {}", index + 1, total, task.description);
            state.current_step = index;

            let report = runner.run(&task, conversation, &context).await;
            context = report.context.clone();

            if report.outcome.confirmed() {
                tracing::info!(
                    "Task {}/{} completed successfully with passing tests",
                    index + 1,
                    total
                );
            } else {
                tracing::warn!(
                    "Task {}/{} reached maximum iterations without completion",
                    index + 1,
                    total
                );
            }

            let mut attempted = task;
            attempted.files = report.files;
            state.completed_steps.push((attempted, report.outcome));
            state.current_step = index + 1;
        }

        state.requirements = context;
        state
    }
}
