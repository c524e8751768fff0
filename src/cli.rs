use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::state_machine::state::DEFAULT_MAX_TOOL_ROUNDS;

pub const DEFAULT_REACT_INPUT: &str =
    "Add 40 + 12 and then multiply the result by 6. Also tell me a joke please.";

#[derive(Debug, Parser)]
#[command(name = "chat-agents", about = "Terminal chat agents on a hosted completion endpoint", version)]
pub struct Cli {
    /// Model id; overrides `GROQ_MODEL`
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Streamed chat; every input is sent on its own
    Chat,
    /// Streamed chat with history, saved to a log file on exit
    Memo {
        /// Transcript path; overrides `CHAT_AGENTS_LOG_PATH`
        #[arg(long = "log-path")]
        log_path: Option<PathBuf>,
    },
    /// Generate a two-line LinkedIn post for a topic
    Post {
        /// Topic; prompted for when omitted
        #[arg(long)]
        topic: Option<String>,
    },
    /// Arithmetic tool loop for a single request
    React {
        #[arg(default_value = DEFAULT_REACT_INPUT)]
        input: String,
        #[arg(long = "max-tool-rounds", default_value_t = DEFAULT_MAX_TOOL_ROUNDS)]
        max_tool_rounds: u32,
    },
}
