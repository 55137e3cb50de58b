//! Round bookkeeping for the tool loop.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// One executed tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInvocation {
    /// 1-based round the call ran in.
    pub round: usize,
    pub tool: String,
    pub params: Value,
    /// Length of the result text in characters.
    pub result_length: usize,
    pub recorded_at: DateTime<Utc>,
}

/// Tracks how many tool rounds have run and what was executed in them.
///
/// Pure state: `current_round` starts at 0 and never exceeds `max_rounds`.
#[derive(Debug, Clone)]
pub struct RoundTracker {
    current_round: usize,
    max_rounds: usize,
    invocations: Vec<ToolInvocation>,
}

impl RoundTracker {
    pub fn new(max_rounds: usize) -> Self {
        Self {
            current_round: 0,
            max_rounds,
            invocations: Vec::new(),
        }
    }

    /// Whether another tool round may start.
    pub fn can_start_round(&self) -> bool {
        self.current_round < self.max_rounds
    }

    /// Mark the current round as completed. Saturates at `max_rounds`.
    pub fn advance(&mut self) {
        self.current_round = (self.current_round + 1).min(self.max_rounds);
    }

    /// Record an executed tool call against the round in progress.
    pub fn record(&mut self, tool: &str, params: &Value, result: Option<&str>) {
        self.invocations.push(ToolInvocation {
            round: self.current_round + 1,
            tool: tool.to_string(),
            params: params.clone(),
            result_length: result.map_or(0, |text| text.chars().count()),
            recorded_at: Utc::now(),
        });
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn invocations(&self) -> &[ToolInvocation] {
        &self.invocations
    }
}
