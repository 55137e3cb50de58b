//! Agent module - the bounded tool-calling loop.
//!
//! One call to [`Orchestrator::respond`] runs this sequence:
//! 1. Build the system text from the base instructions and any prior context
//! 2. Call the model with the available tools
//! 3. If the model requests tools, execute them and feed the results back
//! 4. Repeat until the model answers or the round ceiling is reached
//! 5. At the ceiling, make one last call without tools and return its text

mod orchestrator;
mod prompt;
mod rounds;
mod transcript;

pub use orchestrator::{
    Orchestrator, OrchestratorError, RespondOptions, RunOutcome, DEFAULT_MAX_ROUNDS,
};
pub use prompt::{build_system_context, BASE_INSTRUCTIONS, PRIOR_CONTEXT_HEADING};
pub use rounds::{RoundTracker, ToolInvocation};
pub use transcript::Transcript;
