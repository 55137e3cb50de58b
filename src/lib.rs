//! # tool_rounds
//!
//! A round-bounded tool-calling orchestrator for the Anthropic Messages API.
//!
//! A query goes to the model together with a set of tools. The model may ask
//! for tools; their results are fed back and the model is called again. After
//! a fixed number of tool rounds one last call is made without tools, so every
//! query ends in a single text answer after at most `max_rounds + 1` model
//! calls.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tool_rounds::{agent::{Orchestrator, RespondOptions}, config::Config, tools::ToolRegistry};
//!
//! let config = Config::from_env()?;
//! let orchestrator = Orchestrator::from_config(&config)?;
//! let registry = ToolRegistry::new(); // register tools here
//! let answer = orchestrator
//!     .respond(
//!         "Which courses cover the topic of lesson 4 of Python Basics?",
//!         RespondOptions::default().with_tools(registry.toolset()),
//!     )
//!     .await?;
//! ```

pub mod agent;
pub mod config;
pub mod llm;
pub mod tools;

pub use agent::{Orchestrator, OrchestratorError, RespondOptions};
pub use config::Config;
