//! Oracle inference backend integration.
//!
//! The Oracle speaks through an OpenAI-compatible chat-completions API
//! (`DeepSeek`). This module builds the tier- and language-aware system
//! prompts and performs the single bounded inference request per prediction.

pub mod client;
pub mod prompts;
pub mod types;

pub use client::{OracleClient, OracleError};
pub use types::{ChatMessage, ChatRequest, ChatResponse};
