use std::sync::Arc;

use chrono::Local;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::pipeline::ReportPipeline;
use crate::trigger::RecurrenceRule;
use crate::types::FiringContext;

/// In-memory set of armed timers, one per active schedule.
///
/// Entries are a weak mirror of the store's `active` subset, keyed by
/// schedule id; they carry no identity of their own and are never
/// consulted to decide whether a schedule exists.
///
/// Each armed entry is a tokio task that sleeps until the rule's next
/// fire instant, spawns the execution pipeline as a detached task, and
/// loops. Detaching the firing keeps network-bound pipeline work off
/// the timer path, so a slow generation or delivery call never delays
/// this or any other schedule's timer, and disarming never aborts a
/// firing already in flight.
pub struct JobRegistry {
    pipeline: Arc<ReportPipeline>,
    jobs: DashMap<String, JoinHandle<()>>,
}

impl JobRegistry {
    pub fn new(pipeline: Arc<ReportPipeline>) -> Self {
        Self {
            pipeline,
            jobs: DashMap::new(),
        }
    }

    /// Install a timer for `id`, replacing any existing one (idempotent
    /// re-arm; used by toggle-on and startup rehydration).
    pub fn arm(&self, id: &str, rule: RecurrenceRule, firing: FiringContext) {
        let pipeline = Arc::clone(&self.pipeline);
        let schedule_id = id.to_string();
        let task = tokio::spawn(timer_loop(schedule_id, rule, firing, pipeline));

        if let Some(previous) = self.jobs.insert(id.to_string(), task) {
            previous.abort();
            debug!(schedule_id = id, "replaced existing timer");
        }
        info!(schedule_id = id, "timer armed");
    }

    /// Remove the timer for `id` if present. A no-op, not an error,
    /// when absent.
    pub fn disarm(&self, id: &str) {
        if let Some((_, task)) = self.jobs.remove(id) {
            task.abort();
            info!(schedule_id = id, "timer disarmed");
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.jobs.contains_key(id)
    }

    pub fn armed_count(&self) -> usize {
        self.jobs.len()
    }

    /// Abort every timer. In-flight firings are detached tasks and run
    /// to completion.
    pub fn disarm_all(&self) {
        let ids: Vec<String> = self.jobs.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            self.disarm(&id);
        }
    }
}

async fn timer_loop(
    schedule_id: String,
    rule: RecurrenceRule,
    firing: FiringContext,
    pipeline: Arc<ReportPipeline>,
) {
    loop {
        let now = Local::now();
        let Some(next) = rule.next_fire_after(now) else {
            warn!(schedule_id = %schedule_id, "rule produced no future instant; timer exiting");
            break;
        };

        let wait = (next - now).to_std().unwrap_or_default();
        debug!(schedule_id = %schedule_id, next = %next, "timer sleeping");
        tokio::time::sleep(wait).await;

        // Sleep can return marginally early; re-loop until the instant
        // is actually reached so a firing is never produced twice for
        // one occurrence.
        if Local::now() < next {
            continue;
        }

        let pipeline = Arc::clone(&pipeline);
        let ctx = firing.clone();
        tokio::spawn(async move {
            pipeline.run(ctx).await;
        });
    }
}
