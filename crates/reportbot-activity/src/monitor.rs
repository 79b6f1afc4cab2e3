use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Local, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use reportbot_core::types::{ActivityEntry, ActivitySummary, AppUsage};
use reportbot_scheduler::ActivitySource;

/// Entries retained in the session document.
const MAX_ENTRIES: usize = 100;

/// Background foreground-app sampler with a persisted session summary.
///
/// `start`/`stop` control the sampling task; `summary` reads the
/// persisted document and is safe to call whether or not sampling is
/// (or ever was) running.
#[derive(Clone)]
pub struct ActivityMonitor {
    inner: Arc<Inner>,
}

struct Inner {
    session_path: PathBuf,
    running: AtomicBool,
    stop_tx: Mutex<Option<watch::Sender<bool>>>,
}

impl ActivityMonitor {
    pub fn new(session_path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                session_path: session_path.into(),
                running: AtomicBool::new(false),
                stop_tx: Mutex::new(None),
            }),
        }
    }

    /// Start the sampling loop. Returns `false` when already running.
    pub fn start(&self, interval_secs: u64) -> bool {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return false;
        }

        let (tx, rx) = watch::channel(false);
        *self.inner.stop_tx.lock().unwrap() = Some(tx);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(sample_loop(inner, interval_secs.max(1), rx));

        info!(interval_secs, "activity monitoring started");
        true
    }

    /// Signal the sampling loop to stop. No-op when not running.
    pub fn stop(&self) {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(tx) = self.inner.stop_tx.lock().unwrap().take() {
            let _ = tx.send(true);
        }
        info!("activity monitoring stopped");
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Current session summary; a zeroed structure when no session
    /// data exists or the document cannot be read.
    pub fn summary(&self) -> ActivitySummary {
        match std::fs::read_to_string(&self.inner.session_path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(error = %e, "session document corrupt; returning empty summary");
                    ActivitySummary::empty()
                }
            },
            Err(_) => ActivitySummary::empty(),
        }
    }
}

#[async_trait]
impl ActivitySource for ActivityMonitor {
    async fn summary(&self) -> ActivitySummary {
        ActivityMonitor::summary(self)
    }
}

async fn sample_loop(inner: Arc<Inner>, interval_secs: u64, mut stop_rx: watch::Receiver<bool>) {
    let mut app_timers: HashMap<String, u64> = HashMap::new();
    let mut entries: Vec<ActivityEntry> = Vec::new();
    let mut last_app = String::new();

    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
    loop {
        tokio::select! {
            _ = stop_rx.changed() => {
                if *stop_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let Some(app) = probe_active_app().await else {
                    continue;
                };
                *app_timers.entry(app.clone()).or_insert(0) += interval_secs;
                if app != last_app {
                    entries.push(ActivityEntry {
                        app_name: app.clone(),
                        window_title: None,
                        duration_seconds: interval_secs,
                        timestamp: Utc::now(),
                    });
                    last_app = app;
                }
                if let Err(e) = persist_session(&inner.session_path, &app_timers, &entries) {
                    debug!(error = %e, "failed to persist session summary");
                }
            }
        }
    }
}

fn persist_session(
    path: &std::path::Path,
    app_timers: &HashMap<String, u64>,
    entries: &[ActivityEntry],
) -> std::io::Result<()> {
    let mut top_apps: Vec<AppUsage> = app_timers
        .iter()
        .map(|(app, seconds)| AppUsage {
            app: app.clone(),
            seconds: *seconds,
        })
        .collect();
    top_apps.sort_by(|a, b| b.seconds.cmp(&a.seconds));

    let summary = ActivitySummary {
        date: Local::now().format("%Y-%m-%d").to_string(),
        total_tracked_seconds: top_apps.iter().map(|a| a.seconds).sum(),
        top_apps,
        entries: entries
            .iter()
            .rev()
            .take(MAX_ENTRIES)
            .rev()
            .cloned()
            .collect(),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let encoded = serde_json::to_string_pretty(&summary)?;
    std::fs::write(path, encoded)
}

/// Name of the frontmost application, when the platform exposes one.
#[cfg(target_os = "macos")]
async fn probe_active_app() -> Option<String> {
    const SCRIPT: &str = r#"
        tell application "System Events"
            set frontApp to first application process whose frontmost is true
            set appName to name of frontApp
        end tell
        return appName
    "#;
    let output = tokio::process::Command::new("osascript")
        .arg("-e")
        .arg(SCRIPT)
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(not(target_os = "macos"))]
async fn probe_active_app() -> Option<String> {
    // No foreground-app source off macOS; the monitor idles.
    None
}
