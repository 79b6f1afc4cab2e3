use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Kind of report a schedule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Daily,
    Weekly,
    SocialMedia,
}

impl ReportType {
    /// Human-readable label used in email subjects and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            ReportType::Daily => "Daily Report",
            ReportType::Weekly => "Weekly Report",
            ReportType::SocialMedia => "Social Media Post",
        }
    }

    /// Email subject for a report of this type generated on `date`.
    pub fn subject(&self, date: DateTime<Local>) -> String {
        format!("[Reportbot] {} - {}", self.label(), date.format("%B %d, %Y"))
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReportType::Daily => "daily",
            ReportType::Weekly => "weekly",
            ReportType::SocialMedia => "social_media",
        };
        write!(f, "{s}")
    }
}

/// Presentation hint forwarded to the generation backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Concise,
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Concise => "concise",
        };
        write!(f, "{s}")
    }
}

/// Cumulative foreground time for one application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUsage {
    pub app: String,
    pub seconds: u64,
}

/// One observed focus switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub app_name: String,
    pub window_title: Option<String>,
    pub duration_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Aggregated picture of the current tracking session.
///
/// `empty()` is what collaborators receive when no data has been
/// recorded yet; consumers must treat it as a valid summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub date: String,
    #[serde(default)]
    pub top_apps: Vec<AppUsage>,
    #[serde(default)]
    pub total_tracked_seconds: u64,
    #[serde(default)]
    pub entries: Vec<ActivityEntry>,
}

impl ActivitySummary {
    /// Zeroed summary dated today.
    pub fn empty() -> Self {
        Self {
            date: Local::now().format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_type_serde_tags() {
        assert_eq!(
            serde_json::to_string(&ReportType::SocialMedia).unwrap(),
            r#""social_media""#
        );
        let rt: ReportType = serde_json::from_str(r#""daily""#).unwrap();
        assert_eq!(rt, ReportType::Daily);
    }

    #[test]
    fn tone_round_trip() {
        for tone in [Tone::Professional, Tone::Casual, Tone::Concise] {
            let json = serde_json::to_string(&tone).unwrap();
            let back: Tone = serde_json::from_str(&json).unwrap();
            assert_eq!(tone, back);
        }
    }

    #[test]
    fn subject_contains_label_and_date() {
        let date = Local::now();
        let subject = ReportType::Weekly.subject(date);
        assert!(subject.starts_with("[Reportbot] Weekly Report - "));
        assert!(subject.contains(&date.format("%Y").to_string()));
    }

    #[test]
    fn empty_summary_is_zeroed() {
        let s = ActivitySummary::empty();
        assert!(s.top_apps.is_empty());
        assert_eq!(s.total_tracked_seconds, 0);
        assert!(!s.date.is_empty());
    }
}
