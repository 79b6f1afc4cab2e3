use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, Local, TimeZone};

use crate::error::{Result, SchedulerError};

/// Compiled form of a `(days, time)` specification: fire at `HH:MM`
/// local time on each listed weekday, every week, indefinitely.
///
/// Compilation is the single validation point for schedule specs; a
/// rule that compiles can always be armed, so the store never holds an
/// uncompilable schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// 0 = Monday .. 6 = Sunday, non-empty.
    days: BTreeSet<u8>,
    hour: u32,
    minute: u32,
}

impl RecurrenceRule {
    /// Compile a weekday set and an `"HH:MM"` wall-clock time.
    ///
    /// Duplicated days collapse; order is irrelevant. Fails with
    /// [`SchedulerError::InvalidSpec`] on an empty day set, a day
    /// outside `0..=6`, or a time that does not parse as 24-hour
    /// `HH:MM`.
    pub fn compile(days: &[u8], time: &str) -> Result<Self> {
        if days.is_empty() {
            return Err(SchedulerError::InvalidSpec(
                "at least one day is required".to_string(),
            ));
        }
        if let Some(bad) = days.iter().find(|d| **d > 6) {
            return Err(SchedulerError::InvalidSpec(format!(
                "day out of range 0-6: {bad}"
            )));
        }
        let (hour, minute) = parse_time(time)?;

        Ok(Self {
            days: days.iter().copied().collect(),
            hour,
            minute,
        })
    }

    /// Normalized weekday list: sorted, deduplicated.
    pub fn days(&self) -> Vec<u8> {
        self.days.iter().copied().collect()
    }

    /// Normalized zero-padded fire time.
    pub fn time(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    /// Earliest instant strictly after `from` matching this rule.
    ///
    /// Walks day by day from `from`; the second week is only reachable
    /// when a DST gap removes the first week's candidate, which is why
    /// `None` is theoretical rather than expected. Occurrences before
    /// `from` are never returned, which is what makes missed firings
    /// (process down at the matching instant) skip rather than backfill.
    pub fn next_fire_after(&self, from: DateTime<Local>) -> Option<DateTime<Local>> {
        for offset in 0..=14i64 {
            let date = (from + Duration::days(offset)).date_naive();
            let weekday = date.weekday().num_days_from_monday() as u8;
            if !self.days.contains(&weekday) {
                continue;
            }
            let candidate = Local
                .with_ymd_and_hms(date.year(), date.month(), date.day(), self.hour, self.minute, 0)
                .earliest();
            match candidate {
                Some(c) if c > from => return Some(c),
                _ => continue,
            }
        }
        None
    }
}

fn parse_time(time: &str) -> Result<(u32, u32)> {
    let invalid = || SchedulerError::InvalidSpec(format!("time must be 24-hour HH:MM: {time:?}"));
    let (h, m) = time.split_once(':').ok_or_else(invalid)?;
    let hour: u32 = h.trim().parse().map_err(|_| invalid())?;
    let minute: u32 = m.trim().parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    /// Monday 2025-06-02 08:00 local. June sits clear of DST
    /// transitions in every zone the CI runs in.
    fn monday_morning() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap()
    }

    #[test]
    fn rejects_empty_days() {
        let err = RecurrenceRule::compile(&[], "09:00").unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidSpec(_)));
    }

    #[test]
    fn rejects_day_out_of_range() {
        let err = RecurrenceRule::compile(&[0, 7], "09:00").unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidSpec(_)));
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["0900", "24:00", "12:60", "ab:cd", "12", ""] {
            assert!(
                RecurrenceRule::compile(&[0], bad).is_err(),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn normalizes_days_and_time() {
        let rule = RecurrenceRule::compile(&[4, 0, 2, 0], "9:05").unwrap();
        assert_eq!(rule.days(), vec![0, 2, 4]);
        assert_eq!(rule.time(), "09:05");
    }

    #[test]
    fn fires_later_same_day() {
        let rule = RecurrenceRule::compile(&[0], "09:00").unwrap();
        let next = rule.next_fire_after(monday_morning()).unwrap();
        assert_eq!(next, Local.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());
    }

    #[test]
    fn passed_time_rolls_to_next_listed_day() {
        // Monday 08:00, rule fires Mon/Wed at 07:30: Monday's slot has
        // passed, Wednesday is next.
        let rule = RecurrenceRule::compile(&[0, 2], "07:30").unwrap();
        let next = rule.next_fire_after(monday_morning()).unwrap();
        assert_eq!(next, Local.with_ymd_and_hms(2025, 6, 4, 7, 30, 0).unwrap());
    }

    #[test]
    fn single_day_wraps_a_full_week() {
        let rule = RecurrenceRule::compile(&[0], "07:00").unwrap();
        let next = rule.next_fire_after(monday_morning()).unwrap();
        assert_eq!(next, Local.with_ymd_and_hms(2025, 6, 9, 7, 0, 0).unwrap());
    }

    #[test]
    fn exact_match_instant_is_excluded() {
        // "strictly in the future": asking at the fire instant itself
        // must return next week's occurrence, not the current one.
        let rule = RecurrenceRule::compile(&[0], "08:00").unwrap();
        let next = rule.next_fire_after(monday_morning()).unwrap();
        assert_eq!(next, Local.with_ymd_and_hms(2025, 6, 9, 8, 0, 0).unwrap());
    }

    #[test]
    fn next_fire_matches_time_for_every_weekday() {
        let from = monday_morning();
        for day in 0u8..=6 {
            let rule = RecurrenceRule::compile(&[day], "18:45").unwrap();
            let next = rule.next_fire_after(from).unwrap();
            assert!(next > from, "day {day}: not in the future");
            assert_eq!(
                next.weekday().num_days_from_monday() as u8,
                day,
                "day {day}: wrong weekday"
            );
            assert_eq!((next.hour(), next.minute(), next.second()), (18, 45, 0));
            assert!(
                next - from <= Duration::days(7),
                "day {day}: skipped an occurrence"
            );
        }
    }

    #[test]
    fn multi_day_rule_picks_earliest_candidate() {
        let from = monday_morning();
        let rule = RecurrenceRule::compile(&[0, 2, 4], "09:00").unwrap();
        let all_days = rule.days();
        let next = rule.next_fire_after(from).unwrap();
        // No listed weekday between `from` and `next` may have a
        // matching instant earlier than `next`.
        for day in all_days {
            let single = RecurrenceRule::compile(&[day], "09:00").unwrap();
            let candidate = single.next_fire_after(from).unwrap();
            assert!(candidate >= next);
        }
    }
}
