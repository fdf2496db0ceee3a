use serde::{Deserialize, Deserializer, Serialize};

/// Shown for a condition the oracle did not name.
pub const UNKNOWN_CONDITION: &str = "Unknown Condition";

/// Shown for a condition the oracle did not describe.
pub const NO_DESCRIPTION: &str =
    "Analysis shows standard texture without critical visual abnormalities.";

/// Structured classification of a skin photo.
///
/// Field names on the wire are camelCase and match the analysis schema.
/// Every field defaults when absent, so a conforming reply may leave
/// `is_skin` and `is_healthy` implicitly false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub is_skin: bool,
    pub is_healthy: bool,
    pub disease_name: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub symptoms: Vec<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub reasons: Vec<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub precautions: Vec<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub prevention: Vec<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub treatments: Vec<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub medicines: Vec<String>,
    pub healing_period: Option<String>,
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl AnalysisResult {
    /// Reads the result in priority order: not skin, then healthy, then a
    /// condition. Disease fields are only reachable through
    /// [`Verdict::Condition`].
    pub fn verdict(&self) -> Verdict<'_> {
        if !self.is_skin {
            Verdict::NotSkin
        } else if self.is_healthy {
            Verdict::Healthy
        } else {
            Verdict::Condition(ConditionReport { result: self })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    NotSkin,
    Healthy,
    Condition(ConditionReport<'a>),
}

/// Disease findings of a result whose verdict is a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionReport<'a> {
    result: &'a AnalysisResult,
}

impl<'a> ConditionReport<'a> {
    /// The named condition, if the oracle gave a non-blank one.
    pub fn disease_name(&self) -> Option<&'a str> {
        non_blank(self.result.disease_name.as_deref())
    }

    pub fn title(&self) -> &'a str {
        self.disease_name().unwrap_or(UNKNOWN_CONDITION)
    }

    pub fn description(&self) -> &'a str {
        non_blank(self.result.description.as_deref()).unwrap_or(NO_DESCRIPTION)
    }

    pub fn healing_period(&self) -> Option<&'a str> {
        non_blank(self.result.healing_period.as_deref())
    }

    pub fn symptoms(&self) -> &'a [String] {
        &self.result.symptoms
    }

    pub fn reasons(&self) -> &'a [String] {
        &self.result.reasons
    }

    pub fn precautions(&self) -> &'a [String] {
        &self.result.precautions
    }

    pub fn prevention(&self) -> &'a [String] {
        &self.result.prevention
    }

    pub fn treatments(&self) -> &'a [String] {
        &self.result.treatments
    }

    pub fn medicines(&self) -> &'a [String] {
        &self.result.medicines
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> AnalysisResult {
        AnalysisResult {
            is_skin: true,
            is_healthy: false,
            disease_name: Some("Psoriasis".to_string()),
            description: Some("Scaly plaques.".to_string()),
            symptoms: vec!["scaling".to_string()],
            healing_period: Some("Chronic".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn not_skin_voids_findings() {
        let result = AnalysisResult {
            is_skin: false,
            is_healthy: false,
            ..populated()
        };
        assert_eq!(result.verdict(), Verdict::NotSkin);

        // Healthy flag is meaningless without skin.
        let result = AnalysisResult {
            is_skin: false,
            is_healthy: true,
            ..populated()
        };
        assert_eq!(result.verdict(), Verdict::NotSkin);
    }

    #[test]
    fn healthy_voids_findings() {
        let result = AnalysisResult {
            is_healthy: true,
            ..populated()
        };
        assert_eq!(result.verdict(), Verdict::Healthy);
    }

    #[test]
    fn condition_exposes_findings() {
        let result = populated();
        let Verdict::Condition(report) = result.verdict() else {
            panic!("Expected condition");
        };
        assert_eq!(report.title(), "Psoriasis");
        assert_eq!(report.description(), "Scaly plaques.");
        assert_eq!(report.symptoms(), ["scaling".to_string()]);
        assert_eq!(report.healing_period(), Some("Chronic"));
        assert!(report.medicines().is_empty());
    }

    #[test]
    fn blank_name_falls_back() {
        let result = AnalysisResult {
            disease_name: Some("   ".to_string()),
            description: None,
            ..populated()
        };
        let Verdict::Condition(report) = result.verdict() else {
            panic!("Expected condition");
        };
        assert_eq!(report.disease_name(), None);
        assert_eq!(report.title(), UNKNOWN_CONDITION);
        assert_eq!(report.description(), NO_DESCRIPTION);
    }

    #[test]
    fn default_is_not_skin() {
        assert_eq!(AnalysisResult::default().verdict(), Verdict::NotSkin);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(populated()).unwrap();
        assert_eq!(json["isSkin"], true);
        assert_eq!(json["diseaseName"], "Psoriasis");
        assert_eq!(json["healingPeriod"], "Chronic");
        assert!(json["medicines"].as_array().unwrap().is_empty());
    }
}
