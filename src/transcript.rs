//! Plain-text conversation log written when a session ends

use crate::conversation::{Conversation, Role};
use crate::runtime::TurnObserver;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_PATH: &str = "Ai-Agents/Agents/logging.txt";

/// Render the log body. Only user and assistant turns are kept.
pub fn render(conversation: &Conversation) -> String {
    let mut out = String::from("Your Conversation Log:\n\n");
    for turn in conversation.turns() {
        match turn.role {
            Role::User => {
                let _ = writeln!(out, "You: {}", turn.text);
            }
            Role::Assistant => {
                let _ = write!(out, "AI: {}\n\n", turn.text);
            }
            Role::System | Role::Tool => {}
        }
    }
    out.push_str("End of Conversation");
    out
}

/// Overwrite `path` with the rendered log, creating parent directories
pub fn write(path: &Path, conversation: &Conversation) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render(conversation))
}

/// Writes the transcript on session end and reports where it went
pub struct TranscriptObserver {
    path: PathBuf,
}

impl TranscriptObserver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TurnObserver for TranscriptObserver {
    fn on_session_end(&mut self, conversation: &Conversation) -> io::Result<()> {
        write(&self.path, conversation)?;
        tracing::info!(path = %self.path.display(), turns = conversation.len(), "Transcript written");
        println!("\n✅ Conversation saved to {}", self.path.display());
        Ok(())
    }
}
