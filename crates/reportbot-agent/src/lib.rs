//! `reportbot-agent` — LLM-backed report drafting.
//!
//! Builds a prompt from the current activity summary, user notes, and
//! any stored report templates, then asks the configured provider
//! (OpenAI or Anthropic) for a draft. The provider sits behind
//! [`LlmProvider`] so the pipeline and the on-demand HTTP path share
//! one generation surface.

pub mod anthropic;
pub mod generator;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod templates;

pub use generator::{GeneratorError, ReportAgent};
pub use provider::{GenerationRequest, LlmProvider, ProviderError};
pub use templates::Template;
