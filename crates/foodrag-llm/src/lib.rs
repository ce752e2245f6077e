//! foodrag-llm
//!
//! Chat-completion client for Groq's OpenAI-compatible API.

pub mod groq;
mod wire;

pub use groq::GroqClient;
