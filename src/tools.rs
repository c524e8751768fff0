//! Local tools the model can ask for by name

mod arithmetic;
mod dispatch;

pub use dispatch::dispatch;

use arithmetic::{ArithmeticTool, Operation};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write as _;
use std::sync::Arc;

/// Result from tool execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub output: String,
}

impl ToolOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: message.into(),
        }
    }
}

/// Outcome of one dispatched call, as it will be shown to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// The call as written by the model, e.g. `add(40, 12)`
    pub call: String,
    pub output: ToolOutput,
}

impl ToolResult {
    pub fn line(&self) -> String {
        if self.output.success {
            format!("{} = {}", self.call, self.output.output)
        } else {
            format!("{}: {}", self.call, self.output.output)
        }
    }
}

/// Render dispatch results as the text of a single tool turn
pub fn render_results(results: &[ToolResult]) -> String {
    if results.is_empty() {
        return "No tool call could be parsed from the response.".to_string();
    }
    results
        .iter()
        .map(ToolResult::line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tool definition, rendered into the system instruction
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Trait for tools that can be executed by the agent
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name
    fn name(&self) -> &str;

    /// Tool description for LLM
    fn description(&self) -> String;

    /// JSON schema for tool input
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn run(&self, input: Value) -> ToolOutput;
}

/// Collection of tools available to a session
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// No tools; routing always ends the turn
    pub fn empty() -> Self {
        Self::default()
    }

    /// add, subtract and multiply
    pub fn arithmetic() -> Self {
        Self {
            tools: Operation::ALL
                .iter()
                .map(|op| Arc::new(ArithmeticTool::new(*op)) as Arc<dyn Tool>)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Describe the tools and their call syntax for the system instruction.
    ///
    /// The endpoint is not given structured tool definitions; the model is
    /// asked to write calls inline, which the router then spots.
    pub fn render_instructions(&self) -> String {
        let mut text = String::from(
            "You can use these tools by writing a call inline, exactly as name(a, b) with two integers:\n",
        );
        for def in self.definitions() {
            let _ = writeln!(
                text,
                "- {}(a, b): {}. Arguments: {}",
                def.name, def.description, def.input_schema
            );
        }
        text.push_str("After a call you will receive its result and can continue.");
        text
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, input: Value) -> Option<ToolOutput> {
        for tool in &self.tools {
            if tool.name() == name {
                return Some(tool.run(input).await);
            }
        }
        None
    }
}
