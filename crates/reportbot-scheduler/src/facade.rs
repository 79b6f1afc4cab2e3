use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Result, SchedulerError};
use crate::pipeline::ReportPipeline;
use crate::registry::JobRegistry;
use crate::store::ScheduleStore;
use crate::trigger::RecurrenceRule;
use crate::types::{Schedule, ScheduleSpec};

/// Orchestrates store, trigger compiler, and job registry so the two
/// stay consistent across lifecycle operations and restarts.
///
/// Constructed once at process start and passed by handle to request
/// handlers; there is no global instance.
pub struct Scheduler {
    store: ScheduleStore,
    registry: JobRegistry,
    /// Serializes every load-mutate-write cycle against the schedule
    /// document. Two unserialized concurrent creates would race on the
    /// full-document replace and silently lose one write.
    op_lock: Mutex<()>,
}

impl Scheduler {
    pub fn new(store: ScheduleStore, pipeline: Arc<ReportPipeline>) -> Self {
        Self {
            store,
            registry: JobRegistry::new(pipeline),
            op_lock: Mutex::new(()),
        }
    }

    /// Rehydrate the job registry from the store: every `active`
    /// schedule gets its trigger compiled and armed. Call once per
    /// process lifetime, before any lifecycle operation.
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.op_lock.lock().await;
        let schedules = self.store.list();
        let mut armed = 0usize;
        for schedule in &schedules {
            if !schedule.active {
                continue;
            }
            match RecurrenceRule::compile(&schedule.days, &schedule.time) {
                Ok(rule) => {
                    self.registry.arm(&schedule.id, rule, schedule.firing_context());
                    armed += 1;
                }
                Err(e) => {
                    // Creation-time validation should make this
                    // unreachable; a hand-edited document can still get
                    // here, and one bad record must not block the rest.
                    warn!(schedule_id = %schedule.id, error = %e, "stored schedule does not compile; left disarmed");
                }
            }
        }
        info!(total = schedules.len(), armed, "scheduler initialized");
        Ok(())
    }

    /// Stop all timers, best-effort. In-flight firings run to
    /// completion.
    pub fn shutdown(&self) {
        self.registry.disarm_all();
        info!("scheduler shut down");
    }

    /// Validate, persist, and arm a new schedule.
    ///
    /// Validation runs before persistence, so an uncompilable spec
    /// never reaches the store.
    pub async fn create(&self, spec: ScheduleSpec) -> Result<Schedule> {
        let rule = RecurrenceRule::compile(&spec.days, &spec.time)?;

        let schedule = Schedule {
            id: Uuid::new_v4().to_string(),
            report_type: spec.report_type,
            tone: spec.tone,
            days: rule.days(),
            time: rule.time(),
            notes: spec.notes,
            active: true,
            created_at: Utc::now(),
        };

        let _guard = self.op_lock.lock().await;
        self.store.append(schedule.clone())?;
        self.registry.arm(&schedule.id, rule, schedule.firing_context());

        info!(schedule_id = %schedule.id, days = ?schedule.days, time = %schedule.time, "schedule created");
        Ok(schedule)
    }

    /// Remove a schedule. Returns whether a record existed; deleting
    /// an unknown id leaves the store untouched.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.op_lock.lock().await;
        let mut all = self.store.list();
        let before = all.len();
        all.retain(|s| s.id != id);
        if all.len() == before {
            return Ok(false);
        }
        // Disarm only after the write succeeds; on a store failure the
        // record still exists and its timer must keep running.
        self.store.replace_all(&all)?;
        self.registry.disarm(id);
        info!(schedule_id = id, "schedule deleted");
        Ok(true)
    }

    /// Flip `active`, persisting the flip before touching the timer.
    pub async fn toggle(&self, id: &str) -> Result<Schedule> {
        let _guard = self.op_lock.lock().await;
        let mut all = self.store.list();
        let Some(schedule) = all.iter_mut().find(|s| s.id == id) else {
            return Err(SchedulerError::NotFound { id: id.to_string() });
        };
        schedule.active = !schedule.active;
        let updated = schedule.clone();
        self.store.replace_all(&all)?;

        if updated.active {
            let rule = RecurrenceRule::compile(&updated.days, &updated.time)?;
            self.registry.arm(&updated.id, rule, updated.firing_context());
        } else {
            self.registry.disarm(&updated.id);
        }

        info!(schedule_id = id, active = updated.active, "schedule toggled");
        Ok(updated)
    }

    /// Store passthrough.
    pub async fn list(&self) -> Vec<Schedule> {
        let _guard = self.op_lock.lock().await;
        self.store.list()
    }

    /// Whether a timer is currently armed for `id`.
    pub fn is_armed(&self, id: &str) -> bool {
        self.registry.has(id)
    }

    pub fn armed_count(&self) -> usize {
        self.registry.armed_count()
    }
}
