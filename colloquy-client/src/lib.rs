#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod client;
pub(crate) mod error;
pub(crate) mod streaming;

pub use client::ChatClient;

// Re-export colloquy-types for convenience
pub use colloquy_types::{Backend, ChatEvent, ClientError, EventStream};
