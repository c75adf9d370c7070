//! Plan builder - turns the interview transcript into an ordered task list
//!
//! The project manager role is asked for a JSON task array over the
//! interview conversation. When its reply cannot be parsed into a usable
//! plan, the hard-coded default plan steps in. The fallback is a named
//! value so tests can assert its exact shape; it guarantees forward
//! progress, nothing more.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use weaver_core::{ChatMessage, Context, FileSpec, RoleId, Task};
use weaver_agent::Collaborator;

/// An ordered implementation plan
#[derive(Debug, Clone)]
pub struct Plan {
    pub id: Uuid,
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    fn new(tasks: Vec<Task>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tasks,
            created_at: Utc::now(),
        }
    }
}

/// Plan request sent to the project manager over the interview transcript
pub const PLAN_REQUEST: &str = "Based on our previous discussion, create a specific implementation plan with the following tasks:
1. Basic project setup (requirements.txt, main structure)
2. Core data models and storage
3. Task management functions (add, edit, delete)
4. Status management (in progress, completed)
5. Main application logic

For each task, specify:
- Required files to create
- File content and structure
- Dependencies needed
- Implementation details
- Test requirements

Respond with ONLY a JSON array of tasks. Each task object must have:
- \"description\": string describing the task
- \"files\": array of {\"path\", \"content\", \"implementation_details\"} objects
- \"implementation_details\": string with guidance for the implementer";

/// Intermediate deserialization type for the collaborator's JSON output
#[derive(Debug, Deserialize)]
struct RawTask {
    description: String,
    role: Option<String>,
    #[serde(default)]
    files: Vec<RawFile>,
    #[serde(default)]
    implementation_details: String,
}

#[derive(Debug, Deserialize)]
struct RawFile {
    path: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    implementation_details: String,
}

/// Build a plan from the interview transcript
///
/// Requests a structured plan from the project manager role. Any failure
/// here - transport, unparseable reply, empty task list - falls back to
/// [`default_plan`]; plan-shape problems are never fatal.
pub async fn build_plan(
    collaborator: &dyn Collaborator,
    conversation: &[ChatMessage],
    context: &Context,
) -> (Plan, Context) {
    let mut messages = conversation.to_vec();
    messages.push(ChatMessage::user(PLAN_REQUEST));

    match collaborator
        .run(RoleId::ProjectManager, &messages, context)
        .await
    {
        Ok(reply) => match parse_tasks(&reply.text) {
            Ok(tasks) if !tasks.is_empty() => {
                tracing::info!("Project manager supplied a {}-task plan", tasks.len());
                (Plan::new(tasks), reply.context)
            }
            _ => {
                tracing::warn!("Could not parse a usable plan from the reply, using default plan");
                (Plan::new(default_plan()), reply.context)
            }
        },
        Err(e) => {
            tracing::warn!("Plan request failed ({}), using default plan", e);
            (Plan::new(default_plan()), context.clone())
        }
    }
}

/// Parse a JSON task array out of a free-text reply
///
/// Tolerates prose around the array by slicing from the first `[` to the
/// last `]`.
fn parse_tasks(text: &str) -> Result<Vec<Task>, serde_json::Error> {
    let trimmed = text.trim();
    let json_str = match (trimmed.find('['), trimmed.rfind(']')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    };

    let raw: Vec<RawTask> = serde_json::from_str(json_str)?;

    Ok(raw
        .into_iter()
        .map(|t| Task {
            description: t.description,
            role: t
                .role
                .as_deref()
                .and_then(|r| r.parse().ok())
                .unwrap_or(RoleId::Coder),
            files: t
                .files
                .into_iter()
                .map(|f| FileSpec {
                    path: f.path,
                    content: f.content,
                    implementation_details: f.implementation_details,
                })
                .collect(),
            implementation_details: t.implementation_details,
        })
        .collect())
}

/// The fixed five-task fallback plan
///
/// Substituted verbatim when the collaborator does not supply a usable
/// plan. This is a safety net, not domain logic; its shape is pinned by
/// tests.
pub fn default_plan() -> Vec<Task> {
    vec![
        Task::new("Set up project structure and requirements")
            .with_file(
                FileSpec::new(
                    "requirements.txt",
                    "click>=8.0.0\npytest>=7.0.0\npickle-mixin>=1.0.2",
                )
                .with_details("Setup basic project dependencies"),
            )
            .with_file(FileSpec::new(
                "README.md",
                "# Todo List Application\n\nA simple command-line todo list manager.",
            )),
        Task::new("Implement core data models and storage").with_file(
            FileSpec::new("todo/models.py", "\"\"\"Todo list data models.\"\"\"").with_details(
                "Create Task class with properties: title, description, status, created_date, modified_date",
            ),
        ),
        Task::new("Create task management functions").with_file(
            FileSpec::new("todo/task_manager.py", "\"\"\"Task management functionality.\"\"\"")
                .with_details("Implement add_task, edit_task, delete_task, list_tasks functions"),
        ),
        Task::new("Implement status management system").with_file(
            FileSpec::new("todo/status.py", "\"\"\"Status management system.\"\"\"")
                .with_details("Implement status transitions and validation"),
        ),
        Task::new("Create main application logic and CLI interface")
            .with_file(
                FileSpec::new("todo/cli.py", "\"\"\"Command-line interface.\"\"\"")
                    .with_details("Implement CLI commands using Click"),
            )
            .with_file(
                FileSpec::new("todo/__init__.py", "\"\"\"Todo list application.\"\"\"")
                    .with_details("Setup package initialization"),
            ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use weaver_agent::AgentReply;
    use weaver_core::Result;

    /// Collaborator that always answers with the same text
    struct FixedReply(String);

    #[async_trait]
    impl Collaborator for FixedReply {
        async fn run(
            &self,
            role: RoleId,
            _messages: &[ChatMessage],
            context: &Context,
        ) -> Result<AgentReply> {
            Ok(AgentReply {
                role,
                text: self.0.clone(),
                context: context.with("last_role", role.to_string()),
            })
        }
    }

    /// Collaborator that always fails
    struct Unavailable;

    #[async_trait]
    impl Collaborator for Unavailable {
        async fn run(
            &self,
            _role: RoleId,
            _messages: &[ChatMessage],
            _context: &Context,
        ) -> Result<AgentReply> {
            Err(weaver_core::WeaverError::Agent("connection refused".into()))
        }
    }

    #[test]
    fn test_parse_tasks_valid_json() {
        let json = r#"[
            {"description": "Set up project", "files": [{"path": "requirements.txt", "content": "click"}]},
            {"description": "Build models", "implementation_details": "Task class"}
        ]"#;

        let tasks = parse_tasks(json).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].files[0].path, "requirements.txt");
        assert_eq!(tasks[0].role, RoleId::Coder);
        assert_eq!(tasks[1].implementation_details, "Task class");
    }

    #[test]
    fn test_parse_tasks_with_prose_wrapper() {
        let text = "Here is your plan:\n[{\"description\": \"Do the thing\"}]\nGood luck!";

        let tasks = parse_tasks(text).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "Do the thing");
    }

    #[test]
    fn test_parse_tasks_rejects_non_json() {
        assert!(parse_tasks("I think you should start with the models.").is_err());
    }

    #[test]
    fn test_default_plan_exact_shape() {
        let tasks = default_plan();
        assert_eq!(tasks.len(), 5);

        assert_eq!(tasks[0].description, "Set up project structure and requirements");
        assert_eq!(tasks[0].files.len(), 2);
        assert_eq!(tasks[0].files[0].path, "requirements.txt");
        assert!(tasks[0].files[0].content.starts_with("click>=8.0.0"));
        assert_eq!(tasks[0].files[1].path, "README.md");

        assert_eq!(tasks[1].files[0].path, "todo/models.py");
        assert_eq!(tasks[2].files[0].path, "todo/task_manager.py");
        assert_eq!(tasks[3].files[0].path, "todo/status.py");

        assert_eq!(tasks[4].files.len(), 2);
        assert_eq!(tasks[4].files[0].path, "todo/cli.py");
        assert_eq!(tasks[4].files[1].path, "todo/__init__.py");

        for task in &tasks {
            assert_eq!(task.role, RoleId::Coder);
        }
    }

    #[tokio::test]
    async fn test_build_plan_uses_collaborator_json() {
        let collaborator =
            FixedReply("[{\"description\": \"Only task\", \"files\": []}]".to_string());
        let conversation = vec![ChatMessage::user("build a todo app")];

        let (plan, _) = build_plan(&collaborator, &conversation, &Context::new()).await;
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].description, "Only task");
    }

    #[tokio::test]
    async fn test_build_plan_falls_back_on_prose() {
        let collaborator = FixedReply("Sounds great, I'll get started!".to_string());
        let conversation = vec![ChatMessage::user("build a todo app")];

        let (plan, _) = build_plan(&collaborator, &conversation, &Context::new()).await;
        assert_eq!(plan.tasks.len(), 5);
        assert_eq!(plan.tasks[0].files[0].path, "requirements.txt");
    }

    #[tokio::test]
    async fn test_build_plan_falls_back_on_empty_array() {
        let collaborator = FixedReply("[]".to_string());
        let (plan, _) = build_plan(&collaborator, &[], &Context::new()).await;
        assert_eq!(plan.tasks.len(), 5);
    }

    #[tokio::test]
    async fn test_build_plan_falls_back_on_transport_failure() {
        let (plan, context) = build_plan(&Unavailable, &[], &Context::new()).await;
        assert_eq!(plan.tasks.len(), 5);
        assert!(context.is_empty());
    }
}
