#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod session;
pub mod state;
pub mod turn;

pub use session::ChatSession;
pub use state::ConversationState;
pub use turn::{Origin, Turn};

// Re-export colloquy-types for convenience
pub use colloquy_types::{Backend, SessionError};
