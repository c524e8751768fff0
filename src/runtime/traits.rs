//! Trait abstractions for runtime output
//!
//! Observers see the session as it happens: streamed fragments, appended
//! turns, and the finished conversation at shutdown.

use crate::conversation::{Conversation, Turn};

pub trait TurnObserver: Send {
    /// A streamed completion is about to start
    fn on_stream_start(&mut self) {}

    /// One streamed fragment, in arrival order
    fn on_fragment(&mut self, _fragment: &str) {}

    /// The streamed completion ended (successfully or not)
    fn on_stream_end(&mut self) {}

    /// A turn was appended to the conversation
    fn on_turn(&mut self, _turn: &Turn) {}

    /// The session is ending
    fn on_session_end(&mut self, _conversation: &Conversation) -> std::io::Result<()> {
        Ok(())
    }
}
