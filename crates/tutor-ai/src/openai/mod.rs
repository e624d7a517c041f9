//! OpenAI chat-completions client.
//!
//! Implements the `AiClient` trait against any endpoint that speaks the
//! `POST {base_url}/chat/completions` protocol (OpenAI, or a compatible
//! proxy). Replies are returned whole; streaming is not used.

mod api;
mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
