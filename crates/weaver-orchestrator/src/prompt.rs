//! Prompt builder for task iterations
//!
//! Each iteration sends the active role the task description, its
//! implementation details, and the current content of every tracked file
//! as fenced blocks, followed by role-specific output instructions. The
//! closing instructions restate the code-block convention the extractor
//! expects.

use weaver_core::{RoleId, Task};

/// Build the prompt for one iteration of the active role
///
/// `files` is the tracked (path, current content) list in insertion
/// order, read back from disk just before the call.
pub fn build_iteration_prompt(task: &Task, role: RoleId, files: &[(String, String)]) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!("Task: {}\n", task.description));
    prompt.push_str(&format!(
        "Implementation Details: {}\n\n",
        task.implementation_details
    ));

    prompt.push_str("Current files and their contents:\n");
    for (path, content) in files {
        prompt.push_str(&format!("File: {}\n```python\n{}\n```\n", path, content));
    }
    prompt.push('\n');

    prompt.push_str(role_instructions(role));
    prompt
}

fn role_instructions(role: RoleId) -> &'static str {
    match role {
        RoleId::Tester => {
            "Please create comprehensive tests for these files.\n\
Test all functionality including edge cases.\n\
Return the complete test implementation in code blocks:\n\
```python\n\
# test_filename.py\n\
<complete test implementation>\n\
```\n\
\n\
Mark as 'IMPLEMENTATION COMPLETE' only if all tests pass.\n\
If tests fail, say FAILED and explain why.\n"
        }
        RoleId::Debugger => {
            "Please fix any issues in the implementation.\n\
Return the complete fixed implementation in code blocks:\n\
```python\n\
# filename.py\n\
<complete fixed implementation>\n\
```\n"
        }
        // Coder, and any other role assigned to a task, implements.
        _ => {
            "Please implement complete, working functionality for these files.\n\
Include all necessary imports and ensure the code is ready to run.\n\
Return the complete implementation in code blocks:\n\
```python\n\
# filename.py\n\
<complete implementation>\n\
```\n"
        }
    }
}
