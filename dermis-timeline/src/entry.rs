use chrono::{DateTime, Utc};
use dermis_oracle::{AnalysisResult, Verdict};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const HEALTHY_LABEL: &str = "Healthy Skin";
pub const FALLBACK_LABEL: &str = "Analysis";

/// One analysis session: the photo, what the oracle said, and when.
///
/// Entries are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    id: String,
    timestamp: i64,
    image_data: String,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    analysis: Option<AnalysisResult>,
}

impl TimelineEntry {
    /// Creates an entry stamped with the current wall-clock time.
    pub fn new(image_data: impl Into<String>, analysis: Option<AnalysisResult>) -> Self {
        Self::captured_at(image_data, analysis, Utc::now().timestamp_millis())
    }

    /// Creates an entry with an explicit capture time in epoch milliseconds.
    pub fn captured_at(
        image_data: impl Into<String>,
        analysis: Option<AnalysisResult>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            image_data: image_data.into(),
            label: derive_label(analysis.as_ref()),
            analysis,
        }
    }

    /// Moves the capture time up to `floor` if it is earlier.
    pub(crate) fn not_before(&mut self, floor: i64) {
        self.timestamp = self.timestamp.max(floor);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn captured(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// The photo as a data URI.
    pub fn image_data(&self) -> &str {
        &self.image_data
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }
}

/// Summarizes a result for history listings.
pub fn derive_label(analysis: Option<&AnalysisResult>) -> String {
    match analysis.map(AnalysisResult::verdict) {
        Some(Verdict::Healthy) => HEALTHY_LABEL.to_string(),
        Some(Verdict::Condition(report)) => report
            .disease_name()
            .unwrap_or(FALLBACK_LABEL)
            .to_string(),
        Some(Verdict::NotSkin) | None => FALLBACK_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(name: Option<&str>) -> AnalysisResult {
        AnalysisResult {
            is_skin: true,
            is_healthy: false,
            disease_name: name.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn label_uses_disease_name() {
        assert_eq!(derive_label(Some(&condition(Some("Eczema")))), "Eczema");
    }

    #[test]
    fn label_for_healthy_skin() {
        let healthy = AnalysisResult {
            is_skin: true,
            is_healthy: true,
            disease_name: Some("Eczema".to_string()),
            ..Default::default()
        };
        assert_eq!(derive_label(Some(&healthy)), HEALTHY_LABEL);
    }

    #[test]
    fn label_never_names_a_disease_for_non_skin() {
        let not_skin = AnalysisResult {
            is_skin: false,
            disease_name: Some("Melanoma".to_string()),
            ..Default::default()
        };
        assert_eq!(derive_label(Some(&not_skin)), FALLBACK_LABEL);
    }

    #[test]
    fn label_fallbacks() {
        assert_eq!(derive_label(None), FALLBACK_LABEL);
        assert_eq!(derive_label(Some(&condition(None))), FALLBACK_LABEL);
        assert_eq!(derive_label(Some(&condition(Some(" ")))), FALLBACK_LABEL);
    }

    #[test]
    fn ids_are_unique() {
        let a = TimelineEntry::new("data:image/png;base64,AAAA", None);
        let b = TimelineEntry::new("data:image/png;base64,AAAA", None);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let entry = TimelineEntry::captured_at(
            "data:image/png;base64,AAAA",
            Some(condition(Some("Eczema"))),
            1_700_000_000_000,
        );
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
        assert_eq!(json["imageData"], "data:image/png;base64,AAAA");
        assert_eq!(json["label"], "Eczema");
        assert_eq!(json["analysis"]["diseaseName"], "Eczema");

        let back: TimelineEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn absent_analysis_is_omitted() {
        let entry = TimelineEntry::captured_at("data:image/png;base64,AAAA", None, 1);
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("analysis").is_none());

        let back: TimelineEntry = serde_json::from_value(json).unwrap();
        assert!(back.analysis().is_none());
    }

    #[test]
    fn capture_time_converts() {
        let entry = TimelineEntry::captured_at("x", None, 1_700_000_000_000);
        assert_eq!(entry.captured().unwrap().timestamp(), 1_700_000_000);
    }
}
