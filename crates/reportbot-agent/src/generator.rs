use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use reportbot_core::config::{GeneratorConfig, ProviderKind};
use reportbot_core::types::{ActivitySummary, ReportType, Tone};
use reportbot_scheduler::{GenerationError, ReportGenerator};

use crate::anthropic::AnthropicProvider;
use crate::openai::OpenAiProvider;
use crate::prompt::build_prompt;
use crate::provider::{GenerationRequest, LlmProvider, ProviderError};
use crate::templates::{self, load_templates};

const MAX_TOKENS: u32 = 1500;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Generator configuration error: {0}")]
    Config(String),
}

/// The content-generation backend: prompt assembly plus one configured
/// LLM provider. Templates are re-read per request so newly dropped-in
/// examples take effect without a restart.
pub struct ReportAgent {
    provider: Box<dyn LlmProvider>,
    model: String,
    templates_dir: PathBuf,
}

impl ReportAgent {
    pub fn new(provider: Box<dyn LlmProvider>, model: String, templates_dir: PathBuf) -> Self {
        Self {
            provider,
            model,
            templates_dir,
        }
    }

    /// Build the agent described by config; fails when the selected
    /// provider has no credentials.
    pub fn from_config(cfg: &GeneratorConfig) -> Result<Self, GeneratorError> {
        let (provider, model): (Box<dyn LlmProvider>, String) = match cfg.provider {
            ProviderKind::Openai => {
                let openai = cfg.openai.as_ref().ok_or_else(|| {
                    GeneratorError::Config("openai selected but [generator.openai] is missing".to_string())
                })?;
                (
                    Box::new(OpenAiProvider::new(openai.api_key.clone(), None)),
                    openai.model.clone(),
                )
            }
            ProviderKind::Anthropic => {
                let anthropic = cfg.anthropic.as_ref().ok_or_else(|| {
                    GeneratorError::Config(
                        "anthropic selected but [generator.anthropic] is missing".to_string(),
                    )
                })?;
                (
                    Box::new(AnthropicProvider::new(anthropic.api_key.clone(), None)),
                    anthropic.model.clone(),
                )
            }
        };
        Ok(Self::new(provider, model, PathBuf::from(&cfg.templates_dir)))
    }

    pub async fn generate(
        &self,
        report_type: ReportType,
        summary: &ActivitySummary,
        notes: &str,
        tone: Tone,
    ) -> Result<String, GeneratorError> {
        let templates = load_templates(&self.templates_dir);
        let prompt = build_prompt(report_type, summary, notes, tone, &templates);

        let content = self
            .provider
            .complete(&GenerationRequest {
                model: self.model.clone(),
                prompt,
                max_tokens: MAX_TOKENS,
            })
            .await?;

        info!(
            provider = self.provider.name(),
            %report_type,
            templates = templates.len(),
            chars = content.len(),
            "report generated"
        );
        Ok(content)
    }

    /// Template names currently available to the prompt.
    pub fn template_names(&self) -> Vec<String> {
        load_templates(&self.templates_dir)
            .into_iter()
            .map(|t| t.name)
            .collect()
    }

    /// Remove a stored template; `Ok(false)` when the name is unknown.
    pub fn delete_template(&self, name: &str) -> std::io::Result<bool> {
        templates::delete_template(&self.templates_dir, name)
    }
}

#[async_trait]
impl ReportGenerator for ReportAgent {
    async fn generate(
        &self,
        report_type: ReportType,
        summary: &ActivitySummary,
        notes: &str,
        tone: Tone,
    ) -> Result<String, GenerationError> {
        ReportAgent::generate(self, report_type, summary, notes, tone)
            .await
            .map_err(|e| GenerationError(e.to_string()))
    }
}
