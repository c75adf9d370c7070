//! Task runner - the bounded Coder -> Tester -> Debugger iteration loop
//!
//! One task at a time: read back the tracked files, prompt the active
//! role, materialize whatever code blocks come back, and advance along
//! the state machine until the tester confirms completion or the
//! iteration cap is hit. A failed collaborator call is a non-productive
//! iteration: no state advance, but it still counts against the cap so an
//! unavailable collaborator cannot stall the run forever.

use std::path::PathBuf;

use crate::prompt::build_iteration_prompt;
use crate::state_machine::{advance, Step};
use weaver_agent::{extract_code_blocks, materialize, read_file, Collaborator};
use weaver_core::{ChatMessage, Context, FileSpec, Task, TaskOutcome};

/// Declared paths with this prefix are test files
const TEST_FILE_PREFIX: &str = "test_";

/// Subdirectory of the project root receiving test files
const TESTS_SUBDIR: &str = "tests";

/// What one task's loop produced
#[derive(Debug)]
pub struct TaskReport {
    pub outcome: TaskOutcome,
    /// The task's file list with everything materialized during the loop
    pub files: Vec<FileSpec>,
    /// Context snapshot after the last productive iteration
    pub context: Context,
}

/// Runs single tasks through the iteration loop
pub struct TaskRunner<'a> {
    collaborator: &'a dyn Collaborator,
    project_dir: PathBuf,
    max_iterations: usize,
}

impl<'a> TaskRunner<'a> {
    pub fn new(
        collaborator: &'a dyn Collaborator,
        project_dir: PathBuf,
        max_iterations: usize,
    ) -> Self {
        Self {
            collaborator,
            project_dir,
            max_iterations,
        }
    }

    /// Run one task to completion or exhaustion
    ///
    /// `conversation` is the planning transcript; each iteration appends
    /// its own prompt to a copy of it. Individual file failures are
    /// logged and skipped; nothing in the loop is fatal.
    pub async fn run(
        &self,
        task: &Task,
        conversation: &[ChatMessage],
        context: &Context,
    ) -> TaskReport {
        tracing::info!("Starting task: {}", task.description);

        // Materialize the plan's initial files before the first prompt.
        let mut tracked: Vec<FileSpec> = task.files.clone();
        for spec in &tracked {
            if let Err(e) = materialize(&self.project_dir, &spec.path, &spec.content) {
                tracing::warn!("Failed to materialize initial file {}: {}", spec.path, e);
            }
        }

        let mut role = task.role;
        let mut context = context.clone();
        let mut iteration = 0usize;

        while iteration < self.max_iterations {
            iteration += 1;
            tracing::info!(
                "Iteration {} of {} with {}",
                iteration,
                self.max_iterations,
                role
            );

            // Read back current content; agents see what is on disk, not
            // what the plan said.
            let current: Vec<(String, String)> = tracked
                .iter()
                .map(|spec| {
                    let path = self.project_dir.join(&spec.path);
                    (spec.path.clone(), read_file(&path))
                })
                .collect();

            let prompt = build_iteration_prompt(task, role, &current);
            let mut messages = conversation.to_vec();
            messages.push(ChatMessage::user(prompt));

            let call_context = context
                .with("task", task.description.clone())
                .with("iteration", iteration as u64);

            let reply = match self.collaborator.run(role, &messages, &call_context).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!("Iteration {} non-productive: {}", iteration, e);
                    continue;
                }
            };

            context = reply.context.clone();

            for block in extract_code_blocks(&reply.text) {
                if block.path.starts_with(TEST_FILE_PREFIX) {
                    // Test files land under tests/ and never join the
                    // tracked set used to build the next prompt.
                    let rel = format!("{}/{}", TESTS_SUBDIR, block.path);
                    if let Err(e) = materialize(&self.project_dir, &rel, &block.content) {
                        tracing::warn!("Failed to write test file {}: {}", rel, e);
                    }
                    continue;
                }

                match materialize(&self.project_dir, &block.path, &block.content) {
                    Ok(_) => update_tracked(&mut tracked, &block.path, block.content),
                    Err(e) => tracing::warn!("Failed to write {}: {}", block.path, e),
                }
            }

            match advance(role, &reply.verdict()) {
                Step::Complete => {
                    tracing::info!("Tester confirmed completion after {} iterations", iteration);
                    return TaskReport {
                        outcome: TaskOutcome::Completed {
                            iterations: iteration,
                        },
                        files: tracked,
                        context,
                    };
                }
                Step::Continue(next) => role = next,
            }
        }

        tracing::warn!(
            "Task reached maximum iterations ({}) without completion",
            self.max_iterations
        );
        TaskReport {
            outcome: TaskOutcome::Exhausted {
                iterations: self.max_iterations,
            },
            files: tracked,
            context,
        }
    }
}

/// Replace a tracked file's content, or start tracking it
fn update_tracked(tracked: &mut Vec<FileSpec>, path: &str, content: String) {
    if let Some(spec) = tracked.iter_mut().find(|s| s.path == path) {
        spec.content = content;
    } else {
        tracked.push(FileSpec::new(path, content));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use weaver_agent::AgentReply;
    use weaver_core::{Result, RoleId, WeaverError};

    /// One scripted collaborator response
    enum Turn {
        Reply(&'static str),
        Fail,
    }

    /// Collaborator that replays a fixed script and records each call
    struct Scripted {
        turns: Mutex<VecDeque<Turn>>,
        calls: Mutex<Vec<RoleId>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(turns: Vec<Turn>) -> Self {
            Self {
                turns: Mutex::new(turns.into()),
                calls: Mutex::new(Vec::new()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<RoleId> {
            self.calls.lock().unwrap().clone()
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Collaborator for Scripted {
        async fn run(
            &self,
            role: RoleId,
            messages: &[ChatMessage],
            context: &Context,
        ) -> Result<AgentReply> {
            self.calls.lock().unwrap().push(role);
            if let Some(last) = messages.last() {
                self.prompts.lock().unwrap().push(last.content.clone());
            }
            match self.turns.lock().unwrap().pop_front() {
                Some(Turn::Reply(text)) => Ok(AgentReply {
                    role,
                    text: text.to_string(),
                    context: context.with("last_role", role.to_string()),
                }),
                Some(Turn::Fail) => Err(WeaverError::Agent("connection refused".to_string())),
                // Marker-less filler once the script runs out.
                None => Ok(AgentReply {
                    role,
                    text: "Nothing further.".to_string(),
                    context: context.clone(),
                }),
            }
        }
    }

    const CODER_REPLY: &str = "Here you go:\n```python\n# app.py\nprint('hello')\n```\n";
    const COMPLETE_REPLY: &str = "All tests pass. IMPLEMENTATION COMPLETE";

    fn simple_task() -> Task {
        Task::new("Build the app")
    }

    #[tokio::test]
    async fn test_completes_after_exactly_two_iterations() {
        let dir = TempDir::new().unwrap();
        let collaborator = Scripted::new(vec![
            Turn::Reply(CODER_REPLY),
            Turn::Reply(COMPLETE_REPLY),
        ]);
        let runner = TaskRunner::new(&collaborator, dir.path().to_path_buf(), 10);

        let report = runner.run(&simple_task(), &[], &Context::new()).await;

        assert_eq!(report.outcome, TaskOutcome::Completed { iterations: 2 });
        assert!(report.outcome.confirmed());
        assert_eq!(collaborator.calls(), vec![RoleId::Coder, RoleId::Tester]);
        assert_eq!(read_file(&dir.path().join("app.py")), "print('hello')");
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].path, "app.py");
    }

    #[tokio::test]
    async fn test_failed_verdict_routes_through_debugger_to_tester() {
        let dir = TempDir::new().unwrap();
        let collaborator = Scripted::new(vec![
            Turn::Reply(CODER_REPLY),
            Turn::Reply("test_app FAILED: wrong output"),
            Turn::Reply("```python\n# app.py\nprint('fixed')\n```\n"),
            Turn::Reply(COMPLETE_REPLY),
        ]);
        let runner = TaskRunner::new(&collaborator, dir.path().to_path_buf(), 10);

        let report = runner.run(&simple_task(), &[], &Context::new()).await;

        assert_eq!(report.outcome, TaskOutcome::Completed { iterations: 4 });
        assert_eq!(
            collaborator.calls(),
            vec![RoleId::Coder, RoleId::Tester, RoleId::Debugger, RoleId::Tester]
        );
        assert_eq!(read_file(&dir.path().join("app.py")), "print('fixed')");
    }

    #[tokio::test]
    async fn test_inconclusive_verdict_retries_from_coder() {
        let dir = TempDir::new().unwrap();
        let collaborator = Scripted::new(vec![
            Turn::Reply(CODER_REPLY),
            Turn::Reply("I wrote some tests, not sure yet."),
            Turn::Reply(CODER_REPLY),
            Turn::Reply(COMPLETE_REPLY),
        ]);
        let runner = TaskRunner::new(&collaborator, dir.path().to_path_buf(), 10);

        let report = runner.run(&simple_task(), &[], &Context::new()).await;

        assert_eq!(report.outcome, TaskOutcome::Completed { iterations: 4 });
        assert_eq!(
            collaborator.calls(),
            vec![RoleId::Coder, RoleId::Tester, RoleId::Coder, RoleId::Tester]
        );
    }

    #[tokio::test]
    async fn test_cap_exhaustion_halts_without_error() {
        let dir = TempDir::new().unwrap();
        // Empty script: every reply is marker-less filler.
        let collaborator = Scripted::new(vec![]);
        let runner = TaskRunner::new(&collaborator, dir.path().to_path_buf(), 10);

        let report = runner.run(&simple_task(), &[], &Context::new()).await;

        assert_eq!(report.outcome, TaskOutcome::Exhausted { iterations: 10 });
        assert!(!report.outcome.confirmed());
        let calls = collaborator.calls();
        assert_eq!(calls.len(), 10);
        // Coder and tester alternate the whole way down.
        assert_eq!(calls[0], RoleId::Coder);
        assert_eq!(calls[1], RoleId::Tester);
        assert_eq!(calls[8], RoleId::Coder);
        assert_eq!(calls[9], RoleId::Tester);
    }

    #[tokio::test]
    async fn test_test_files_routed_to_tests_subdir_and_untracked() {
        let dir = TempDir::new().unwrap();
        let collaborator = Scripted::new(vec![
            Turn::Reply(
                "```python\n# app.py\nprint('hi')\n```\n```python\n# test_app.py\nassert True\n```\n",
            ),
            Turn::Reply(COMPLETE_REPLY),
        ]);
        let runner = TaskRunner::new(&collaborator, dir.path().to_path_buf(), 10);

        let report = runner.run(&simple_task(), &[], &Context::new()).await;

        assert!(dir.path().join("tests/test_app.py").exists());
        assert!(!dir.path().join("test_app.py").exists());
        let paths: Vec<&str> = report.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["app.py"]);
        // The tester's prompt includes app.py but never the test file.
        let tester_prompt = &collaborator.prompts()[1];
        assert!(tester_prompt.contains("File: app.py"));
        assert!(!tester_prompt.contains("test_app.py"));
    }

    #[tokio::test]
    async fn test_transport_failure_counts_but_does_not_advance() {
        let dir = TempDir::new().unwrap();
        let collaborator = Scripted::new(vec![
            Turn::Fail,
            Turn::Reply(CODER_REPLY),
            Turn::Reply(COMPLETE_REPLY),
        ]);
        let runner = TaskRunner::new(&collaborator, dir.path().to_path_buf(), 10);

        let report = runner.run(&simple_task(), &[], &Context::new()).await;

        // The failed call burned an iteration but the coder retried.
        assert_eq!(report.outcome, TaskOutcome::Completed { iterations: 3 });
        assert_eq!(
            collaborator.calls(),
            vec![RoleId::Coder, RoleId::Coder, RoleId::Tester]
        );
    }

    #[tokio::test]
    async fn test_unavailable_collaborator_is_bounded_by_cap() {
        let dir = TempDir::new().unwrap();
        let collaborator = Scripted::new((0..20).map(|_| Turn::Fail).collect());
        let runner = TaskRunner::new(&collaborator, dir.path().to_path_buf(), 3);

        let report = runner.run(&simple_task(), &[], &Context::new()).await;

        assert_eq!(report.outcome, TaskOutcome::Exhausted { iterations: 3 });
        assert_eq!(collaborator.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_initial_files_materialized_and_fed_to_prompt() {
        let dir = TempDir::new().unwrap();
        let collaborator = Scripted::new(vec![
            Turn::Reply("```python\n# todo/models.py\nclass Task: pass\n```\n"),
            Turn::Reply(COMPLETE_REPLY),
        ]);
        let runner = TaskRunner::new(&collaborator, dir.path().to_path_buf(), 10);

        let task = simple_task().with_file(FileSpec::new(
            "todo/models.py",
            "\"\"\"Todo list data models.\"\"\"",
        ));
        let report = runner.run(&task, &[], &Context::new()).await;

        // The coder saw the seed content; the tester saw the rewrite.
        let prompts = collaborator.prompts();
        assert!(prompts[0].contains("Todo list data models"));
        assert!(prompts[1].contains("class Task: pass"));
        assert_eq!(report.files[0].content, "class Task: pass");
    }

    #[tokio::test]
    async fn test_traversal_path_from_reply_is_skipped() {
        let dir = TempDir::new().unwrap();
        let collaborator = Scripted::new(vec![
            Turn::Reply("```python\n# ../escape.py\nbad\n```\n"),
            Turn::Reply(COMPLETE_REPLY),
        ]);
        let runner = TaskRunner::new(&collaborator, dir.path().to_path_buf(), 10);

        let report = runner.run(&simple_task(), &[], &Context::new()).await;

        assert!(report.outcome.confirmed());
        assert!(report.files.is_empty());
        assert!(!dir.path().parent().unwrap().join("escape.py").exists());
    }
}
