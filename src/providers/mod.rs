//! Coaching backend clients
//!
//! The session layer only knows the [`PromptClient`] trait; [`HttpPromptClient`]
//! is the production implementation.

pub mod base;
pub mod http;

pub use base::{PromptClient, PromptResponse};
pub use http::HttpPromptClient;
