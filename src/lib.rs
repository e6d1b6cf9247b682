//! Command-line client for a locally hosted SGLang multimodal model server
//!
//! Builds a single OpenAI-style chat-completion request from a text prompt and
//! any number of image URLs, sends it, and renders the reply as extracted
//! text, raw body, or pretty-printed JSON.

pub mod app;
pub mod client;
pub mod error;
pub mod message;
pub mod models;
pub mod response;
pub mod setup;

pub use error::{Error, Result};
