//! Console output for the demos
//!
//! Writes to any `Write` so tests can capture into a buffer. Write errors are
//! logged and otherwise ignored; a closed stdout should not abort a session.

use crate::conversation::{Role, Turn};
use crate::runtime::TurnObserver;
use std::io::Write;

/// How turns are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStyle {
    /// Streamed reply after an `AI: ` prefix
    Chat,
    /// Streamed reply under the post banner
    Post,
    /// Every appended user, assistant and tool turn, printed whole
    Steps,
}

pub struct ConsoleObserver<W: Write + Send> {
    out: W,
    style: ConsoleStyle,
}

impl ConsoleObserver<std::io::Stdout> {
    pub fn stdout(style: ConsoleStyle) -> Self {
        Self::new(std::io::stdout(), style)
    }
}

impl<W: Write + Send> ConsoleObserver<W> {
    pub fn new(out: W, style: ConsoleStyle) -> Self {
        Self { out, style }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "Console write failed");
        }
    }
}

impl<W: Write + Send> TurnObserver for ConsoleObserver<W> {
    fn on_stream_start(&mut self) {
        match self.style {
            ConsoleStyle::Chat => self.emit("\nAI: "),
            ConsoleStyle::Post => self.emit("\n✨ LinkedIn Post ✨\n\n"),
            ConsoleStyle::Steps => {}
        }
    }

    fn on_fragment(&mut self, fragment: &str) {
        if self.style != ConsoleStyle::Steps {
            self.emit(fragment);
        }
    }

    fn on_stream_end(&mut self) {
        if self.style != ConsoleStyle::Steps {
            self.emit("\n\n");
        }
    }

    fn on_turn(&mut self, turn: &Turn) {
        if self.style != ConsoleStyle::Steps {
            return;
        }
        match turn.role {
            Role::User => self.emit(&format!("\nUser: {}\n", turn.text)),
            Role::Assistant => self.emit(&format!("\nAssistant: {}\n", turn.text)),
            Role::Tool => self.emit(&format!("\nTool: {}\n", turn.text)),
            Role::System => {}
        }
    }
}
