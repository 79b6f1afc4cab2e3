use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use thiserror::Error;
use tracing::{error, info, warn};

use reportbot_core::types::{ActivitySummary, ReportType, Tone};

use crate::types::FiringContext;

/// Generation backend failure. Firing-scoped: logged, never retried,
/// never disarms the schedule.
#[derive(Debug, Error)]
#[error("Generation failed: {0}")]
pub struct GenerationError(pub String);

/// Delivery failure. Firing-scoped, same containment as
/// [`GenerationError`].
#[derive(Debug, Error)]
#[error("Delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Supplies the current activity picture. Must not fail; when no data
/// exists, implementations return [`ActivitySummary::empty`].
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn summary(&self) -> ActivitySummary;
}

/// Produces report text from the firing parameters.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(
        &self,
        report_type: ReportType,
        summary: &ActivitySummary,
        notes: &str,
        tone: Tone,
    ) -> Result<String, GenerationError>;
}

/// Delivers a finished report.
#[async_trait]
pub trait ReportMailer: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

/// The callable invoked when a timer fires: gather context, generate,
/// deliver. Holds only read-only collaborator handles.
///
/// `run` is a containment boundary: no error or panic from a
/// collaborator may cross back into the timer task, because an
/// unhandled fault there would silently kill every future firing of
/// that timer. All three steps log their outcome keyed by schedule id
/// and the method returns `()` unconditionally.
pub struct ReportPipeline {
    activity: Arc<dyn ActivitySource>,
    generator: Arc<dyn ReportGenerator>,
    mailer: Arc<dyn ReportMailer>,
}

impl ReportPipeline {
    pub fn new(
        activity: Arc<dyn ActivitySource>,
        generator: Arc<dyn ReportGenerator>,
        mailer: Arc<dyn ReportMailer>,
    ) -> Self {
        Self {
            activity,
            generator,
            mailer,
        }
    }

    /// Execute one firing to completion.
    pub async fn run(&self, firing: FiringContext) {
        let schedule_id = firing.schedule_id.as_str();
        info!(schedule_id, report_type = %firing.report_type, "firing started");

        let summary = self.activity.summary().await;

        let content = match self
            .generator
            .generate(firing.report_type, &summary, &firing.notes, firing.tone)
            .await
        {
            Ok(content) => content,
            Err(e) => {
                // The next scheduled occurrence still fires normally.
                error!(schedule_id, error = %e, "generation failed; firing aborted");
                return;
            }
        };

        let subject = firing.report_type.subject(Local::now());
        match self.mailer.send(&subject, &content).await {
            Ok(()) => info!(schedule_id, %subject, "report delivered"),
            Err(e) => {
                warn!(schedule_id, error = %e, "delivery failed; report discarded");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    struct StubActivity;

    #[async_trait]
    impl ActivitySource for StubActivity {
        async fn summary(&self) -> ActivitySummary {
            ActivitySummary::empty()
        }
    }

    struct StubGenerator {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReportGenerator for StubGenerator {
        async fn generate(
            &self,
            _report_type: ReportType,
            _summary: &ActivitySummary,
            _notes: &str,
            _tone: Tone,
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(GenerationError("backend unavailable".to_string()))
            } else {
                Ok("generated body".to_string())
            }
        }
    }

    #[derive(Default)]
    struct StubMailer {
        fail: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ReportMailer for StubMailer {
        async fn send(&self, subject: &str, body: &str) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError("no credentials".to_string()));
            }
            self.sent
                .lock()
                .await
                .push((subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn firing() -> FiringContext {
        FiringContext {
            schedule_id: "sched-1".to_string(),
            report_type: ReportType::Daily,
            tone: Tone::Concise,
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn successful_firing_delivers_with_derived_subject() {
        let mailer = Arc::new(StubMailer::default());
        let pipeline = ReportPipeline::new(
            Arc::new(StubActivity),
            Arc::new(StubGenerator {
                fail: false,
                calls: AtomicUsize::new(0),
            }),
            mailer.clone(),
        );

        pipeline.run(firing()).await;

        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        let (subject, body) = &sent[0];
        assert!(subject.starts_with("[Reportbot] Daily Report - "));
        assert_eq!(body, "generated body");
    }

    #[tokio::test]
    async fn generation_failure_skips_delivery() {
        let mailer = Arc::new(StubMailer::default());
        let pipeline = ReportPipeline::new(
            Arc::new(StubActivity),
            Arc::new(StubGenerator {
                fail: true,
                calls: AtomicUsize::new(0),
            }),
            mailer.clone(),
        );

        pipeline.run(firing()).await;

        assert!(mailer.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_contained() {
        let generator = Arc::new(StubGenerator {
            fail: false,
            calls: AtomicUsize::new(0),
        });
        let pipeline = ReportPipeline::new(
            Arc::new(StubActivity),
            generator.clone(),
            Arc::new(StubMailer {
                fail: true,
                sent: Mutex::new(Vec::new()),
            }),
        );

        // run returns () either way; a failed delivery must not panic
        // or unwind into the caller.
        pipeline.run(firing()).await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }
}
