use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8008;
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Top-level config (reportbot.toml + REPORTBOT_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportbotConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Path to the schedules document (full-replace JSON file).
    #[serde(default = "default_schedules_path")]
    pub schedules_path: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            schedules_path: default_schedules_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Path to the session summary document.
    #[serde(default = "default_session_path")]
    pub session_path: String,
    /// Foreground-app sampling interval in seconds.
    #[serde(default = "default_sample_interval")]
    pub sample_interval_secs: u64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            session_path: default_session_path(),
            sample_interval_secs: default_sample_interval(),
        }
    }
}

/// Which LLM backend generates report drafts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Openai,
    Anthropic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    pub openai: Option<OpenAiConfig>,
    pub anthropic: Option<AnthropicConfig>,
    /// Directory of plain-text report templates fed to the prompt.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            openai: None,
            anthropic: None,
            templates_dir: default_templates_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    pub api_key: String,
    #[serde(default = "default_anthropic_model")]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender address; falls back to `username` when unset.
    pub from: Option<String>,
    pub recipient: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from: None,
            recipient: None,
        }
    }
}

impl ReportbotConfig {
    /// Load config from a TOML file with REPORTBOT_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.reportbot/reportbot.toml
    ///
    /// Env overrides use a double underscore as the section separator
    /// (`REPORTBOT_MAIL__SMTP_HOST`), so keys that themselves contain
    /// underscores stay addressable.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ReportbotConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("REPORTBOT_").split("__"))
            .extract()
            .map_err(|e| crate::error::ReportbotError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    format!("{}/reportbot.toml", data_dir())
}

fn data_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{home}/.reportbot")
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_schedules_path() -> String {
    format!("{}/schedules.json", data_dir())
}

fn default_session_path() -> String {
    format!("{}/activity_session.json", data_dir())
}

fn default_sample_interval() -> u64 {
    5
}

fn default_templates_dir() -> String {
    format!("{}/templates", data_dir())
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_model() -> String {
    "claude-haiku-4-5".to_string()
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let cfg = ReportbotConfig::default();
        assert_eq!(cfg.gateway.port, DEFAULT_PORT);
        assert!(cfg.scheduler.schedules_path.ends_with("schedules.json"));
        assert_eq!(cfg.activity.sample_interval_secs, 5);
        assert_eq!(cfg.generator.provider, ProviderKind::Openai);
        assert_eq!(cfg.mail.smtp_port, 587);
    }

    #[test]
    fn provider_kind_parses_lowercase() {
        let kind: ProviderKind = serde_json::from_str(r#""anthropic""#).unwrap();
        assert_eq!(kind, ProviderKind::Anthropic);
    }

    #[test]
    fn toml_sections_override_defaults() {
        let cfg: ReportbotConfig = Figment::new()
            .merge(Toml::string(
                r#"
                [gateway]
                port = 9999

                [mail]
                username = "bot@example.com"
                password = "app-password"
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(cfg.gateway.port, 9999);
        assert_eq!(cfg.mail.username.as_deref(), Some("bot@example.com"));
        // untouched sections keep their defaults
        assert_eq!(cfg.activity.sample_interval_secs, 5);
    }

    #[test]
    fn env_overrides_reach_keys_with_underscores() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REPORTBOT_MAIL__SMTP_HOST", "mail.example.com");
            jail.set_env("REPORTBOT_ACTIVITY__SAMPLE_INTERVAL_SECS", "30");
            jail.set_env("REPORTBOT_GATEWAY__PORT", "9001");

            let cfg: ReportbotConfig = Figment::new()
                .merge(Env::prefixed("REPORTBOT_").split("__"))
                .extract()?;
            assert_eq!(cfg.mail.smtp_host, "mail.example.com");
            assert_eq!(cfg.activity.sample_interval_secs, 30);
            assert_eq!(cfg.gateway.port, 9001);
            Ok(())
        });
    }
}
