use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::types::Schedule;

/// Durable schedule document: one JSON array, read fully and replaced
/// fully on every mutation. The store is the only source of truth for
/// which schedules exist; armed timers mirror its `active` subset.
///
/// Callers serialize their load-mutate-write cycles through the
/// facade's operation lock; the store itself performs no locking.
pub struct ScheduleStore {
    path: PathBuf,
}

impl ScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full document.
    ///
    /// A missing or unreadable document yields an empty list so the
    /// system boots clean on first run; corruption is logged, not
    /// propagated.
    pub fn list(&self) -> Vec<Schedule> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "schedule document unreadable; treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(schedules) => schedules,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "schedule document corrupt; treating as empty");
                Vec::new()
            }
        }
    }

    /// Append one record and rewrite the document.
    pub fn append(&self, schedule: Schedule) -> Result<()> {
        let mut all = self.list();
        all.push(schedule);
        self.replace_all(&all)
    }

    /// Replace the document with `schedules`, atomically: the new
    /// content lands in a sibling temp file first and is renamed over
    /// the document, so a failed write leaves the previous state intact.
    pub fn replace_all(&self, schedules: &[Schedule]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_string_pretty(schedules)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reportbot_core::types::{ReportType, Tone};

    fn schedule(id: &str) -> Schedule {
        Schedule {
            id: id.to_string(),
            report_type: ReportType::Daily,
            tone: Tone::Professional,
            days: vec![0, 2, 4],
            time: "09:00".to_string(),
            notes: String::new(),
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn missing_document_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScheduleStore::new(dir.path().join("schedules.json"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn corrupt_document_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedules.json");
        fs::write(&path, "{not json").unwrap();
        let store = ScheduleStore::new(&path);
        assert!(store.list().is_empty());
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScheduleStore::new(dir.path().join("schedules.json"));

        let originals: Vec<Schedule> = (0..5).map(|i| schedule(&format!("id-{i}"))).collect();
        store.replace_all(&originals).unwrap();

        let reloaded = store.list();
        assert_eq!(reloaded.len(), originals.len());
        for (a, b) in originals.iter().zip(&reloaded) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.days, b.days);
            assert_eq!(a.time, b.time);
            assert_eq!(a.active, b.active);
            assert_eq!(a.created_at, b.created_at);
        }
    }

    #[test]
    fn append_keeps_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScheduleStore::new(dir.path().join("schedules.json"));
        store.append(schedule("one")).unwrap();
        store.append(schedule("two")).unwrap();
        let ids: Vec<String> = store.list().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["one", "two"]);
    }

    #[test]
    fn replace_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScheduleStore::new(dir.path().join("nested/deeper/schedules.json"));
        store.replace_all(&[schedule("a")]).unwrap();
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScheduleStore::new(dir.path().join("schedules.json"));
        store.replace_all(&[schedule("a")]).unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
