//! Role directory - the static registry of agent personas
//!
//! Each role carries the instruction text sent to the collaborator as
//! system priming, plus the set of roles it is permitted to hand off to.
//! The hand-off relation is directed and not symmetric; the task runner
//! itself advances along a narrower hard-coded subgraph and never depends
//! on the collaborator requesting a hand-off.

use weaver_core::RoleId;

/// A named behavioral persona driving one step of the pipeline
#[derive(Debug, Clone, Copy)]
pub struct Role {
    pub id: RoleId,
    pub name: &'static str,
    /// Instruction text passed to the collaborator as role priming
    pub instructions: &'static str,
    /// Roles this persona may hand off to
    pub handoffs: &'static [RoleId],
}

const PLANNER: Role = Role {
    id: RoleId::Planner,
    name: "Project Planner",
    instructions: "You are responsible for gathering requirements and creating a project plan.\n\
Follow these steps strictly:\n\
1. Ask at most TWO clarifying questions about specific features or requirements\n\
2. After receiving answers, create a concrete project plan\n\
3. The plan must include:\n\
   - Core features to implement\n\
   - Technology stack (Python, framework choices)\n\
   - File structure\n\
   - Specific tasks for implementation\n\
\n\
DO NOT ask more questions once you have basic feature requirements.\n\
Focus on creating an actionable plan that can be implemented.",
    handoffs: &[RoleId::ProjectManager],
};

const PROJECT_MANAGER: Role = Role {
    id: RoleId::ProjectManager,
    name: "Project Manager",
    instructions: "You are responsible for managing the project lifecycle and task distribution.\n\
Your responsibilities include:\n\
1. Receiving the complete project plan\n\
2. Converting each task into a specific coding assignment\n\
3. Distributing tasks to appropriate agents\n\
4. Tracking progress and ensuring all parts work together\n\
5. Maintaining the overall project structure\n\
\n\
When receiving a task, analyze its requirements and delegate to the most appropriate agent.",
    handoffs: &[RoleId::Coder, RoleId::Tester, RoleId::Documentation],
};

const CODER: Role = Role {
    id: RoleId::Coder,
    name: "Coder",
    instructions: "You are responsible for writing high-quality code as per the project requirements.\n\
When given a task:\n\
1. Analyze the requirements and existing code\n\
2. Implement complete, working functionality\n\
3. Include proper error handling, logging, and documentation\n\
4. Follow best practices and PEP 8 standards\n\
5. Return the complete implementation in code blocks\n\
\n\
Format your response with code blocks for each file:\n\
```python\n\
# filename.py\n\
<complete implementation>\n\
```\n\
\n\
IMPORTANT: Provide COMPLETE, WORKING code. Do not use placeholders or TODO comments.\n\
Include all necessary imports and ensure the code is ready to run.",
    handoffs: &[RoleId::Debugger, RoleId::ProjectManager, RoleId::Tester],
};

const TESTER: Role = Role {
    id: RoleId::Tester,
    name: "Tester",
    instructions: "You are responsible for comprehensive testing of the implementation.\n\
For each implementation:\n\
1. Create a complete test suite using pytest\n\
2. Test all functionality including edge cases\n\
3. Verify error handling\n\
4. Test integration between components\n\
\n\
If tests fail:\n\
- Provide detailed error information and say FAILED\n\
\n\
If tests pass:\n\
- Verify all requirements are met\n\
- Mark as 'IMPLEMENTATION COMPLETE' only when all tests pass\n\
\n\
Format your response with code blocks for test files:\n\
```python\n\
# test_filename.py\n\
<complete test implementation>\n\
```",
    handoffs: &[RoleId::Debugger, RoleId::Coder, RoleId::ProjectManager],
};

const DEBUGGER: Role = Role {
    id: RoleId::Debugger,
    name: "Debugger",
    instructions: "You are responsible for fixing issues in the implementation.\n\
When debugging:\n\
1. Analyze test failures and error messages\n\
2. Review the code for logical errors\n\
3. Fix identified issues\n\
4. Maintain existing functionality\n\
5. Return complete fixed implementation\n\
\n\
Format your response with code blocks for each fixed file:\n\
```python\n\
# filename.py\n\
<complete fixed implementation>\n\
```\n\
\n\
IMPORTANT: Provide COMPLETE fixes, not just patches.",
    handoffs: &[RoleId::Coder, RoleId::Tester],
};

const DOCUMENTATION: Role = Role {
    id: RoleId::Documentation,
    name: "Documentation",
    instructions: "You create and update documentation for the project.",
    handoffs: &[RoleId::ProjectManager],
};

/// All roles, in pipeline order
pub const ROLES: [Role; 6] = [
    PLANNER,
    PROJECT_MANAGER,
    CODER,
    TESTER,
    DEBUGGER,
    DOCUMENTATION,
];

/// Look up the static definition for a role
pub fn role(id: RoleId) -> &'static Role {
    match id {
        RoleId::Planner => &PLANNER,
        RoleId::ProjectManager => &PROJECT_MANAGER,
        RoleId::Coder => &CODER,
        RoleId::Tester => &TESTER,
        RoleId::Debugger => &DEBUGGER,
        RoleId::Documentation => &DOCUMENTATION,
    }
}

/// Whether `from` is permitted to hand off to `to`
pub fn can_hand_off(from: RoleId, to: RoleId) -> bool {
    role(from).handoffs.contains(&to)
}
