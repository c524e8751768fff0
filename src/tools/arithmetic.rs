//! Arithmetic tools - add, subtract, multiply on two integers

use super::{Tool, ToolOutput};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

/// Sum of `a` and `b`, or `None` on overflow
pub fn add(a: i64, b: i64) -> Option<i64> {
    a.checked_add(b)
}

/// `a` minus `b`, or `None` on overflow
pub fn subtract(a: i64, b: i64) -> Option<i64> {
    a.checked_sub(b)
}

/// Product of `a` and `b`, or `None` on overflow
pub fn multiply(a: i64, b: i64) -> Option<i64> {
    a.checked_mul(b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Add, Operation::Subtract, Operation::Multiply];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    pub fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Operation::Add => add(a, b),
            Operation::Subtract => subtract(a, b),
            Operation::Multiply => multiply(a, b),
        }
    }

    fn description(self) -> &'static str {
        match self {
            Operation::Add => "Adds two numbers",
            Operation::Subtract => "Subtracts one number from another",
            Operation::Multiply => "Multiplies two numbers",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ArithmeticInput {
    a: i64,
    b: i64,
}

/// One arithmetic operation exposed as a tool
pub struct ArithmeticTool {
    op: Operation,
}

impl ArithmeticTool {
    pub fn new(op: Operation) -> Self {
        Self { op }
    }
}

#[async_trait]
impl Tool for ArithmeticTool {
    fn name(&self) -> &'static str {
        self.op.name()
    }

    fn description(&self) -> String {
        self.op.description().to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": {
                "a": { "type": "integer" },
                "b": { "type": "integer" }
            }
        })
    }

    async fn run(&self, input: Value) -> ToolOutput {
        let input = match serde_json::from_value::<ArithmeticInput>(input) {
            Ok(input) => input,
            Err(e) => return ToolOutput::error(format!("Invalid input: {e}")),
        };

        match self.op.apply(input.a, input.b) {
            Some(value) => ToolOutput::success(value.to_string()),
            None => ToolOutput::error(format!(
                "{}({}, {}) overflows a 64-bit integer",
                self.op.name(),
                input.a,
                input.b
            )),
        }
    }
}
