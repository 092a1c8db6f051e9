use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MEDIUM" => Ok(RiskLevel::Medium),
            "HIGH" => Ok(RiskLevel::High),
            _ => Err(format!("unknown risk level: {value}")),
        }
    }
}

/// A 0-100 score. Out-of-range values cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Option<Self> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Score::new(value).ok_or_else(|| format!("score {value} outside 0-100"))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Regulatory,
    Bias,
    Privacy,
    Transparency,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Regulatory,
        Dimension::Bias,
        Dimension::Privacy,
        Dimension::Transparency,
    ];

    /// Key used in the model's JSON response.
    pub fn key(&self) -> &'static str {
        match self {
            Dimension::Regulatory => "regulatory",
            Dimension::Bias => "bias",
            Dimension::Privacy => "privacy",
            Dimension::Transparency => "transparency",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Dimension::Regulatory => "Regulatory Risk",
            Dimension::Bias => "Bias & Fairness Risk",
            Dimension::Privacy => "Data Privacy Risk",
            Dimension::Transparency => "Transparency Risk",
        }
    }

    /// Key of the dimension-specific list in the response.
    pub fn details_key(&self) -> &'static str {
        match self {
            Dimension::Regulatory => "applicable_regulations",
            Dimension::Bias => "affected_groups",
            Dimension::Privacy => "data_concerns",
            Dimension::Transparency => "requirements",
        }
    }

    pub fn details_title(&self) -> &'static str {
        match self {
            Dimension::Regulatory => "Applicable regulations",
            Dimension::Bias => "Affected groups",
            Dimension::Privacy => "Data concerns",
            Dimension::Transparency => "Requirements",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRisk {
    pub level: RiskLevel,
    pub score: Score,
    pub summary: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRisks {
    pub regulatory: DimensionRisk,
    pub bias: DimensionRisk,
    pub privacy: DimensionRisk,
    pub transparency: DimensionRisk,
}

impl DimensionRisks {
    pub fn get(&self, dimension: Dimension) -> &DimensionRisk {
        match dimension {
            Dimension::Regulatory => &self.regulatory,
            Dimension::Bias => &self.bias,
            Dimension::Privacy => &self.privacy,
            Dimension::Transparency => &self.transparency,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &DimensionRisk)> + '_ {
        Dimension::ALL
            .into_iter()
            .map(move |dimension| (dimension, self.get(dimension)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub priority: Option<u32>,
    pub action: String,
    pub regulation: Option<String>,
    pub owner: Option<String>,
}

impl RecommendedAction {
    pub fn priority_label(&self) -> String {
        match self.priority {
            Some(priority) => format!("P{priority}"),
            None => "P-".to_string(),
        }
    }
}

/// Built by `parse_assessment`; never deserialized directly.
///
/// ```compile_fail
/// let _: protocol::RiskAssessment = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    overall_score: Score,
    risk_level: RiskLevel,
    risks: DimensionRisks,
    recommended_actions: Vec<RecommendedAction>,
    executive_summary: String,
}

impl RiskAssessment {
    pub fn new(
        overall_score: Score,
        risk_level: RiskLevel,
        risks: DimensionRisks,
        recommended_actions: Vec<RecommendedAction>,
        executive_summary: String,
    ) -> Self {
        Self {
            overall_score,
            risk_level,
            risks,
            recommended_actions,
            executive_summary,
        }
    }

    pub fn overall_score(&self) -> Score {
        self.overall_score
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn risks(&self) -> &DimensionRisks {
        &self.risks
    }

    pub fn dimension(&self, dimension: Dimension) -> &DimensionRisk {
        self.risks.get(dimension)
    }

    pub fn recommended_actions(&self) -> &[RecommendedAction] {
        &self.recommended_actions
    }

    pub fn applicable_regulations(&self) -> &[String] {
        &self.risks.regulatory.details
    }

    pub fn executive_summary(&self) -> &str {
        &self.executive_summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!("high".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert_eq!(" Medium ".parse::<RiskLevel>(), Ok(RiskLevel::Medium));
        assert!("CRITICAL".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn score_rejects_out_of_range() {
        assert_eq!(Score::new(0).map(|s| s.value()), Some(0));
        assert_eq!(Score::new(100).map(|s| s.value()), Some(100));
        assert!(Score::new(101).is_none());
        assert!(Score::new(-1).is_none());
        assert!(serde_json::from_str::<Score>("150").is_err());
    }

    #[test]
    fn level_serializes_upper_case() {
        let json = serde_json::to_string(&RiskLevel::Medium).expect("serialize");
        assert_eq!(json, "\"MEDIUM\"");
    }
}
