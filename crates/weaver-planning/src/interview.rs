//! Requirements interview - the scripted planning dialogue
//!
//! A deliberately simple heuristic loop: the planner role asks clarifying
//! questions, capped at two, and any affirmative keyword in the user's
//! running input short-circuits straight to plan creation. Console I/O is
//! injected so the loop can be driven from tests.

use weaver_core::{ChatMessage, Context, Result, RoleId};
use weaver_agent::Collaborator;

/// Keywords that end the question loop early, matched case-insensitively
/// anywhere in the user's latest input
const AFFIRMATIVE_KEYWORDS: [&str; 5] = ["yes", "correct", "good", "proceed", "start"];

/// Maximum clarifying questions before the plan is forced
const MAX_QUESTIONS: usize = 2;

/// Follow-up sent to the planner once the question loop ends
const DETAILED_PLAN_REQUEST: &str =
    "Based on our discussion, please create a detailed project plan with specific implementation tasks.";

/// User-facing console surface
///
/// The binary implements this over stdin/stdout; tests script it.
pub trait UserIo {
    /// Show an assistant message
    fn say(&mut self, message: &str);
    /// Show a prompt and read one line of input
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

fn is_affirmative(input: &str) -> bool {
    let lowered = input.to_lowercase();
    AFFIRMATIVE_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Run the planning dialogue and return the transcript
///
/// The returned conversation ends with the planner's detailed plan
/// message; the plan builder feeds it to the project manager next.
pub async fn run_interview(
    collaborator: &dyn Collaborator,
    io: &mut dyn UserIo,
    initial_idea: &str,
) -> Result<(Vec<ChatMessage>, Context)> {
    let mut conversation = vec![ChatMessage::user(initial_idea)];
    let mut context = Context::new()
        .with("project_status", "planning")
        .with("initial_idea", initial_idea);
    let mut latest_input = initial_idea.to_string();
    let mut question_count = 0usize;

    loop {
        let reply = collaborator
            .run(RoleId::Planner, &conversation, &context)
            .await?;
        context = reply.context.clone();

        if reply.text.contains('?') {
            question_count += 1;
        }

        if question_count >= MAX_QUESTIONS || is_affirmative(&latest_input) {
            io.say("Perfect! I'll create a detailed project plan now.");
            conversation.push(ChatMessage::assistant(reply.text));
            conversation.push(ChatMessage::user(DETAILED_PLAN_REQUEST));

            let plan_reply = collaborator
                .run(RoleId::Planner, &conversation, &context)
                .await?;
            context = plan_reply.context.clone();
            conversation.push(ChatMessage::assistant(plan_reply.text));

            return Ok((conversation, context));
        }

        io.say(&reply.text);
        conversation.push(ChatMessage::assistant(reply.text));

        let answer = io.ask("Your response:")?;
        conversation.push(ChatMessage::user(answer.clone()));
        latest_input = answer;
    }
}
