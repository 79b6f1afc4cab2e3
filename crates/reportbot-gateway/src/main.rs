use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod app;
mod http;

use reportbot_activity::ActivityMonitor;
use reportbot_agent::provider::{GenerationRequest, LlmProvider, ProviderError};
use reportbot_agent::ReportAgent;
use reportbot_core::config::ReportbotConfig;
use reportbot_mailer::Mailer;
use reportbot_scheduler::{
    DeliveryError, ReportMailer, ReportPipeline, Scheduler, ScheduleStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reportbot_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: REPORTBOT_CONFIG env > ~/.reportbot/reportbot.toml
    let config_path = std::env::var("REPORTBOT_CONFIG").ok();
    let config = ReportbotConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        ReportbotConfig::default()
    });

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    // sampling starts at boot; the /activity endpoints stop and restart it
    let activity = ActivityMonitor::new(config.activity.session_path.clone());
    activity.start(config.activity.sample_interval_secs);

    let agent = Arc::new(build_agent(&config));
    let mailer = build_mailer(&config);

    let pipeline = Arc::new(ReportPipeline::new(
        Arc::new(activity.clone()),
        agent.clone(),
        mailer,
    ));

    let store = ScheduleStore::new(config.scheduler.schedules_path.clone());
    info!(path = %store.path().display(), "opening schedule document");

    let scheduler = Arc::new(Scheduler::new(store, pipeline));
    scheduler.initialize().await?;

    let state = Arc::new(app::AppState::new(
        config,
        scheduler.clone(),
        activity.clone(),
        agent,
    ));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("Reportbot gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    activity.stop();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl+C handler");
    }
}

/// Build the report agent from config, falling back to a provider that
/// rejects every request when no API key is configured. The server
/// still boots; generation endpoints and firings report the problem.
fn build_agent(config: &ReportbotConfig) -> ReportAgent {
    match ReportAgent::from_config(&config.generator) {
        Ok(agent) => agent,
        Err(e) => {
            warn!("No usable LLM provider ({e}); report generation disabled");
            ReportAgent::new(
                Box::new(NullProvider),
                String::new(),
                std::path::PathBuf::from(&config.generator.templates_dir),
            )
        }
    }
}

/// Build the SMTP mailer, falling back to a stub that fails every
/// delivery when `[mail]` is incomplete. Firings still run generation;
/// the pipeline contains the delivery failure.
fn build_mailer(config: &ReportbotConfig) -> Arc<dyn ReportMailer> {
    match Mailer::from_config(&config.mail) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            warn!("Mail delivery disabled ({e})");
            Arc::new(DisabledMailer)
        }
    }
}

/// Placeholder provider when no API key is available.
struct NullProvider;

#[async_trait::async_trait]
impl LlmProvider for NullProvider {
    fn name(&self) -> &str {
        "null"
    }
    async fn complete(&self, _req: &GenerationRequest) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable(
            "no LLM provider configured — set generator.openai.api_key in reportbot.toml".into(),
        ))
    }
}

/// Placeholder mailer when `[mail]` is incomplete.
struct DisabledMailer;

#[async_trait::async_trait]
impl ReportMailer for DisabledMailer {
    async fn send(&self, _subject: &str, _body: &str) -> Result<(), DeliveryError> {
        Err(DeliveryError(
            "mail delivery not configured — set mail.username/password/recipient".into(),
        ))
    }
}
