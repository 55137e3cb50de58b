//! Tool contract and registry.
//!
//! The orchestrator only sees the [`ToolExecutor`] trait. [`ToolRegistry`] is
//! the stock executor: tools register under their name and are dispatched by
//! name. Individual tool implementations live with the caller.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::llm::ToolDefinition;

/// Errors raised while executing a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool '{tool}' failed: {source}")]
    Failed {
        tool: String,
        #[source]
        source: anyhow::Error,
    },
}

/// A callable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the parameter object.
    fn parameters_schema(&self) -> Value;

    /// Run the tool with the parameter object the model supplied.
    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Executes tools by name on behalf of the orchestrator.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Run `name` with `params`, returning its text result.
    async fn execute(&self, name: &str, params: &Value) -> Result<String, ToolError>;

    /// Definitions of every tool this executor can run.
    fn list_tool_definitions(&self) -> Vec<ToolDefinition>;
}

/// Tool definitions paired with the executor that runs them.
///
/// Tools are only ever offered to the model together with something able to
/// execute them.
#[derive(Clone)]
pub struct Toolset<'a> {
    pub definitions: Vec<ToolDefinition>,
    pub executor: &'a dyn ToolExecutor,
}

impl<'a> Toolset<'a> {
    pub fn new(definitions: Vec<ToolDefinition>, executor: &'a dyn ToolExecutor) -> Self {
        Self {
            definitions,
            executor,
        }
    }

    /// Offer every tool the executor knows about.
    pub fn from_executor(executor: &'a dyn ToolExecutor) -> Self {
        Self::new(executor.list_tool_definitions(), executor)
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl std::fmt::Debug for Toolset<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolset")
            .field(
                "definitions",
                &self.definitions.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Registry of tools keyed by name.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool already registered under its name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let tool: Arc<dyn Tool> = Arc::new(tool);
        if self.tools.insert(tool.name().to_string(), tool.clone()).is_some() {
            tracing::warn!(tool = tool.name(), "Replaced previously registered tool");
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Build a [`Toolset`] offering every registered tool.
    pub fn toolset(&self) -> Toolset<'_> {
        Toolset::from_executor(self)
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn execute(&self, name: &str, params: &Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        tracing::debug!(tool = name, "Executing tool");

        tool.execute(params.clone())
            .await
            .map_err(|source| ToolError::Failed {
                tool: name.to_string(),
                source,
            })
    }

    /// Sorted by name so requests are stable across runs.
    fn list_tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.parameters_schema(),
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct CourseOutline;

    #[async_trait]
    impl Tool for CourseOutline {
        fn name(&self) -> &str {
            "get_course_outline"
        }

        fn description(&self) -> &str {
            "Get a course outline"
        }

        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {"course_title": {"type": "string"}},
                "required": ["course_title"]
            })
        }

        async fn execute(&self, args: Value) -> anyhow::Result<String> {
            let title = args["course_title"]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("Missing 'course_title' argument"))?;
            Ok(format!("Course Title: {title}\nLesson 1: Introduction"))
        }
    }

    struct ContentSearch;

    #[async_trait]
    impl Tool for ContentSearch {
        fn name(&self) -> &str {
            "search_course_content"
        }

        fn description(&self) -> &str {
            "Search course content"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {"query": {"type": "string"}}})
        }

        async fn execute(&self, _args: Value) -> anyhow::Result<String> {
            Ok("no matches".to_string())
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(ContentSearch);
        registry.register(CourseOutline);
        registry
    }

    #[tokio::test]
    async fn executes_registered_tool_by_name() {
        let result = registry()
            .execute("get_course_outline", &json!({"course_title": "Python Basics"}))
            .await
            .expect("tool runs");
        assert!(result.starts_with("Course Title: Python Basics"));
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let err = registry()
            .execute("delete_everything", &json!({}))
            .await
            .expect_err("unregistered tool");
        assert!(matches!(err, ToolError::NotFound(name) if name == "delete_everything"));
    }

    #[tokio::test]
    async fn tool_failure_is_wrapped_with_tool_name() {
        let err = registry()
            .execute("get_course_outline", &json!({}))
            .await
            .expect_err("missing argument");
        match err {
            ToolError::Failed { tool, source } => {
                assert_eq!(tool, "get_course_outline");
                assert!(source.to_string().contains("course_title"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn definitions_are_sorted_and_carry_schema() {
        let definitions = registry().list_tool_definitions();
        let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["get_course_outline", "search_course_content"]);
        assert_eq!(definitions[0].input_schema["required"], json!(["course_title"]));
    }

    #[test]
    fn toolset_offers_every_registered_tool() {
        let registry = registry();
        let toolset = registry.toolset();
        assert_eq!(toolset.definitions.len(), 2);
        assert!(!toolset.is_empty());
        assert!(ToolRegistry::new().toolset().is_empty());
    }
}
