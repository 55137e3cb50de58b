//! Round-bounded tool-calling loop.

use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use crate::llm::{
    AnthropicClient, ContentBlock, LlmClient, MessageRequest, MessageResponse, ModelReply,
    ToolCall, ToolChoice,
};
use crate::tools::{ToolError, ToolExecutor, Toolset};

use super::prompt::{build_system_context, BASE_INSTRUCTIONS};
use super::rounds::RoundTracker;
use super::transcript::Transcript;

/// Tool rounds allowed before the forced synthesis call.
pub const DEFAULT_MAX_ROUNDS: usize = 2;

/// Sampling is deterministic.
const TEMPERATURE: f32 = 0.0;

/// Errors that abort a run. No partial answer is returned with any of them.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Model backend call failed: {0}")]
    Backend(#[source] anyhow::Error),

    #[error("Tool '{tool}' failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },

    #[error("Model requested tool '{0}' but no tools were offered")]
    ToolsNotOffered(String),

    #[error("Model stopped for tool use but returned no tool invocations")]
    MissingToolInvocations,

    #[error("Model response contained no text")]
    EmptyResponse,
}

/// Per-call options for [`Orchestrator::respond`].
#[derive(Debug, Clone)]
pub struct RespondOptions<'a> {
    /// Summary of earlier conversation, appended to the system text.
    pub prior_context: Option<&'a str>,
    /// Tools to offer, with the executor that runs them.
    pub tools: Option<Toolset<'a>>,
    /// Tool rounds before the forced synthesis call.
    pub max_rounds: usize,
}

impl Default for RespondOptions<'_> {
    fn default() -> Self {
        Self {
            prior_context: None,
            tools: None,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl<'a> RespondOptions<'a> {
    pub fn with_prior_context(mut self, context: &'a str) -> Self {
        self.prior_context = Some(context);
        self
    }

    pub fn with_tools(mut self, tools: Toolset<'a>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}

/// Everything a run produced, for callers that want more than the answer.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub answer: String,
    pub transcript: Transcript,
    pub rounds: RoundTracker,
    /// Number of requests sent to the model backend.
    pub backend_calls: usize,
    /// Whether the answer came from the forced tool-free call.
    pub synthesized: bool,
}

/// Drives the model through at most `max_rounds` tool rounds and returns one
/// answer.
pub struct Orchestrator {
    llm: Arc<dyn LlmClient>,
    model: String,
    max_tokens: u32,
    instructions: String,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            llm,
            model: model.into(),
            max_tokens,
            instructions: BASE_INSTRUCTIONS.to_string(),
        }
    }

    /// Build an orchestrator backed by the Messages API.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let llm = Arc::new(AnthropicClient::from_config(config)?);
        let orchestrator = Self::new(llm, config.model.clone(), config.max_tokens);
        Ok(match &config.system_prompt {
            Some(prompt) => orchestrator.with_instructions(prompt.clone()),
            None => orchestrator,
        })
    }

    /// Replace the base instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer `query`, using tools for at most `options.max_rounds` rounds.
    pub async fn respond(
        &self,
        query: &str,
        options: RespondOptions<'_>,
    ) -> Result<String, OrchestratorError> {
        self.run(query, options).await.map(|outcome| outcome.answer)
    }

    /// Same as [`respond`](Self::respond), returning the whole run.
    pub async fn run(
        &self,
        query: &str,
        options: RespondOptions<'_>,
    ) -> Result<RunOutcome, OrchestratorError> {
        if query.trim().is_empty() {
            return Err(OrchestratorError::EmptyQuery);
        }

        let system = build_system_context(&self.instructions, options.prior_context);
        let tools = options.tools.filter(|t| !t.is_empty());
        let mut transcript = Transcript::new(query);
        let mut tracker = RoundTracker::new(options.max_rounds);
        let mut backend_calls = 0;

        tracing::info!(
            max_rounds = options.max_rounds,
            tools = tools.as_ref().map_or(0, |t| t.definitions.len()),
            has_prior_context = options.prior_context.is_some(),
            "Starting tool rounds"
        );

        for round in 1..=options.max_rounds {
            debug_assert!(tracker.can_start_round());
            tracing::debug!(round, "Tool round {}", round);

            let request = self.build_request(&system, &transcript, tools.as_ref());
            let response = self.send(&request, &mut backend_calls).await?;

            let (content, calls) = match response.into_reply() {
                ModelReply::Text(answer) => {
                    tracing::info!(round, backend_calls, "Model answered without tools");
                    return Ok(RunOutcome {
                        answer,
                        transcript,
                        rounds: tracker,
                        backend_calls,
                        synthesized: false,
                    });
                }
                ModelReply::Empty => return Err(OrchestratorError::EmptyResponse),
                ModelReply::ToolRequest { content, calls } => (content, calls),
            };

            if calls.is_empty() {
                tracing::warn!(round, "tool_use stop without tool invocations");
                return Err(OrchestratorError::MissingToolInvocations);
            }

            let Some(toolset) = tools.as_ref() else {
                return Err(OrchestratorError::ToolsNotOffered(calls[0].name.clone()));
            };

            let results = execute_tool_round(&calls, toolset.executor, &mut tracker).await?;
            transcript.push_tool_round(content, results);
            tracker.advance();
        }

        tracing::info!(
            rounds = tracker.current_round(),
            invocations = tracker.invocations().len(),
            "Round ceiling reached, requesting final synthesis"
        );

        let request = self.build_request(&system, &transcript, None);
        let response = self.send(&request, &mut backend_calls).await?;
        let answer = response
            .text_content()
            .ok_or(OrchestratorError::EmptyResponse)?;

        Ok(RunOutcome {
            answer,
            transcript,
            rounds: tracker,
            backend_calls,
            synthesized: true,
        })
    }

    fn build_request(
        &self,
        system: &str,
        transcript: &Transcript,
        tools: Option<&Toolset<'_>>,
    ) -> MessageRequest {
        MessageRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: TEMPERATURE,
            system: system.to_string(),
            messages: transcript.snapshot(),
            tools: tools.map(|t| t.definitions.clone()),
            tool_choice: tools.map(|_| ToolChoice::Auto),
        }
    }

    async fn send(
        &self,
        request: &MessageRequest,
        backend_calls: &mut usize,
    ) -> Result<MessageResponse, OrchestratorError> {
        *backend_calls += 1;
        let response = self
            .llm
            .create_message(request)
            .await
            .map_err(OrchestratorError::Backend)?;
        tracing::debug!(
            backend_calls = *backend_calls,
            stop_reason = %response.stop_reason,
            offered_tools = request.offers_tools(),
            "Model responded"
        );
        Ok(response)
    }
}

/// Run every requested tool in order and collect one result block per call.
///
/// A call is recorded in `tracker` only after it succeeds. The first failure
/// aborts the round.
async fn execute_tool_round(
    calls: &[ToolCall],
    executor: &dyn ToolExecutor,
    tracker: &mut RoundTracker,
) -> Result<Vec<ContentBlock>, OrchestratorError> {
    let mut results = Vec::with_capacity(calls.len());

    for call in calls {
        tracing::info!(tool = %call.name, id = %call.id, "Calling tool");

        let output = executor
            .execute(&call.name, &call.input)
            .await
            .map_err(|source| {
                tracing::warn!(tool = %call.name, error = %source, "Tool failed");
                OrchestratorError::Tool {
                    tool: call.name.clone(),
                    source,
                }
            })?;

        tracker.record(&call.name, &call.input, Some(&output));
        results.push(ContentBlock::ToolResult {
            tool_use_id: call.id.clone(),
            content: output,
        });
    }

    Ok(results)
}
