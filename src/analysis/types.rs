use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lowest score the model is asked to give
pub const MIN_SCORE: i64 = 0;
/// Highest score the model is asked to give
pub const MAX_SCORE: i64 = 100;

/// Experience level the model attributes to the repository author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    /// Early-stage project habits
    Beginner,
    /// Solid fundamentals with gaps
    Intermediate,
    /// Professional-grade conventions
    Advanced,
}

impl Level {
    /// All levels in ascending order
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Name as it appears on the wire
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed analysis decoded from the model's structured response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Overall quality score, 0-100 expected
    #[serde(deserialize_with = "deserialize_score")]
    pub score: i64,
    /// Qualitative level
    pub level: Level,
    /// Two or three sentence summary
    pub summary: String,
    /// Key strengths, 3-4 expected
    pub strengths: Vec<String>,
    /// Areas needing improvement
    pub weaknesses: Vec<String>,
    /// Ordered improvement steps, 3-5 expected
    pub roadmap: Vec<String>,
    /// Development consistency sub-score
    #[serde(deserialize_with = "deserialize_score")]
    pub consistency_score: i64,
    /// Documentation sub-score
    #[serde(deserialize_with = "deserialize_score")]
    pub documentation_score: i64,
    /// Best practices sub-score
    #[serde(deserialize_with = "deserialize_score")]
    pub best_practices_score: i64,
}

impl AnalysisResult {
    /// Scores that fall outside 0-100, by wire field name
    ///
    /// Such values are kept as returned; callers decide what to do with them.
    pub fn out_of_range_scores(&self) -> Vec<(&'static str, i64)> {
        [
            ("score", self.score),
            ("consistencyScore", self.consistency_score),
            ("documentationScore", self.documentation_score),
            ("bestPracticesScore", self.best_practices_score),
        ]
        .into_iter()
        .filter(|(_, value)| !(MIN_SCORE..=MAX_SCORE).contains(value))
        .collect()
    }
}

// The schema declares scores as `number`, so `87.0` has to decode too.
fn deserialize_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value.abs() > i64::MAX as f64 {
        return Err(D::Error::custom(format!("score {} is not representable", value)));
    }
    Ok(value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAYLOAD: &str = r#"{
        "score": 78,
        "level": "Intermediate",
        "summary": "A tidy CLI with room to grow.",
        "strengths": ["Clear README", "Consistent layout", "Typed configuration"],
        "weaknesses": ["No CI", "Few tests"],
        "roadmap": ["Add CI", "Add integration tests", "Publish docs"],
        "consistencyScore": 70,
        "documentationScore": 85.0,
        "bestPracticesScore": 64.6
    }"#;

    #[test]
    fn test_decodes_camel_case_payload() {
        let result: AnalysisResult = serde_json::from_str(PAYLOAD).unwrap();
        assert_eq!(result.score, 78);
        assert_eq!(result.level, Level::Intermediate);
        assert_eq!(result.documentation_score, 85);
        assert_eq!(result.best_practices_score, 65);
        assert_eq!(result.roadmap.len(), 3);
        assert!(result.out_of_range_scores().is_empty());
    }

    #[test]
    fn test_out_of_range_scores_pass_through() {
        let payload = PAYLOAD.replace("\"score\": 78", "\"score\": 140");
        let result: AnalysisResult = serde_json::from_str(&payload).unwrap();
        assert_eq!(result.score, 140);
        assert_eq!(result.out_of_range_scores(), vec![("score", 140)]);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let payload = PAYLOAD.replace("Intermediate", "Expert");
        assert!(serde_json::from_str::<AnalysisResult>(&payload).is_err());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let payload = PAYLOAD.replace("\"roadmap\"", "\"road_map\"");
        assert!(serde_json::from_str::<AnalysisResult>(&payload).is_err());
    }

    #[test]
    fn test_serializes_wire_names() {
        let result: AnalysisResult = serde_json::from_str(PAYLOAD).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["bestPracticesScore"], 65);
        assert_eq!(value["level"], "Intermediate");
    }
}
