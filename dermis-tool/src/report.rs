//! Plain-text rendering of analyses and timeline entries.
//!
//! Everything goes through [`AnalysisResult::verdict`], so disease fields are
//! never shown for a non-skin or healthy result.

use chrono::Local;
use dermis_oracle::{AnalysisResult, ConditionReport, Verdict};
use dermis_timeline::TimelineEntry;

pub const DISCLAIMER: &str = "This tool uses AI for educational guidance and pattern identification \
only. It is not a substitute for clinical diagnosis. Always consult a certified dermatologist for \
professional medical advice.";

pub const ANALYSIS_FAILED: &str = "Analysis failed. Use a clearer photo.";

pub const NEED_TWO_PHOTOS: &str = "Capture at least two photos to track evolution.";

/// Shown in place of the narrative when a comparison fails.
pub const COMPARISON_FALLBACK: &str = "Comparison failed. Please try again with clearer photos.";

pub const NOT_SKIN_TITLE: &str = "Non-Skin Image Detected";
pub const NOT_SKIN_TEXT: &str = "The AI could not identify human skin in this photo. Please upload \
a clear image focusing on the affected skin area.";

pub const HEALTHY_TITLE: &str = "Healthy Skin";
pub const HEALTHY_TEXT: &str = "Your skin appears healthy based on visual inspection. No \
significant rashes or diseases were detected.";

pub const STANDARD_RECOVERY: &str = "Standard recovery time";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailCategory {
    Symptoms,
    Causes,
    CarePrecautions,
    HealingTracking,
}

impl DetailCategory {
    pub const ALL: [DetailCategory; 4] = [
        DetailCategory::Symptoms,
        DetailCategory::Causes,
        DetailCategory::CarePrecautions,
        DetailCategory::HealingTracking,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DetailCategory::Symptoms => "Symptoms",
            DetailCategory::Causes => "Causes",
            DetailCategory::CarePrecautions => "Care & Precautions",
            DetailCategory::HealingTracking => "Healing & Tracking",
        }
    }

    /// The findings listed under this category, in display order.
    pub fn points<'a>(self, report: &ConditionReport<'a>) -> Vec<&'a str> {
        let strs = |list: &'a [String]| list.iter().map(String::as_str);

        match self {
            DetailCategory::Symptoms => strs(report.symptoms()).collect(),
            DetailCategory::Causes => strs(report.reasons()).collect(),
            DetailCategory::CarePrecautions => strs(report.precautions())
                .chain(strs(report.prevention()))
                .collect(),
            DetailCategory::HealingTracking => {
                std::iter::once(report.healing_period().unwrap_or(STANDARD_RECOVERY))
                    .chain(strs(report.treatments()))
                    .chain(strs(report.medicines()))
                    .collect()
            }
        }
    }
}

/// Headline and summary paragraph for a result.
pub fn summary(result: &AnalysisResult) -> (&str, &str) {
    match result.verdict() {
        Verdict::NotSkin => (NOT_SKIN_TITLE, NOT_SKIN_TEXT),
        Verdict::Healthy => (HEALTHY_TITLE, HEALTHY_TEXT),
        Verdict::Condition(report) => (report.title(), report.description()),
    }
}

pub fn render_analysis(result: &AnalysisResult) -> String {
    let (title, text) = summary(result);
    let mut out = format!("{title}\n{}\n{text}\n", "=".repeat(title.chars().count()));

    if let Verdict::Condition(report) = result.verdict() {
        for category in DetailCategory::ALL {
            let points = category.points(&report);
            if points.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{}:\n", category.title()));
            for point in points {
                out.push_str(&format!("  - {point}\n"));
            }
        }
        out.push_str(&format!("\n{DISCLAIMER}\n"));
    }

    out
}

pub fn format_captured(entry: &TimelineEntry) -> String {
    match entry.captured() {
        Some(at) => at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "unknown time".to_string(),
    }
}

pub fn render_history_line(index: usize, entry: &TimelineEntry) -> String {
    format!("{index:>4}  {}  {}", format_captured(entry), entry.label())
}

pub fn render_entry(index: usize, entry: &TimelineEntry) -> String {
    let mut out = format!("#{index}  {}  {}\n\n", format_captured(entry), entry.label());

    match entry.analysis() {
        Some(result) => out.push_str(&render_analysis(result)),
        None => out.push_str("No analysis stored for this entry.\n"),
    }

    out
}
