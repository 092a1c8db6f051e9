mod client;
pub mod http_utils;
mod types;

pub use client::{LlmClient, LlmError};
pub use types::{ChatMessage, LlmConfig};
