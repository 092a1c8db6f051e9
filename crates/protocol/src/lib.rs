use serde::Serialize;
use std::time::SystemTime;

pub mod assessment;
pub mod options;
pub mod parse;
pub mod use_case;

pub use assessment::{
    Dimension, DimensionRisk, DimensionRisks, RecommendedAction, RiskAssessment, RiskLevel, Score,
};
pub use parse::{parse_assessment, ParseError};
pub use use_case::{UseCase, UseCaseDraft, ValidationError, NOT_SPECIFIED};

/// A completed analysis: the submitted use case, the model's assessment and
/// the moment the assessment was produced.
///
/// ```compile_fail
/// let _: protocol::Evaluation = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub use_case: UseCase,
    pub assessment: RiskAssessment,
    /// RFC 3339, second precision, UTC.
    pub generated_at: String,
}

impl Evaluation {
    pub fn new(use_case: UseCase, assessment: RiskAssessment, generated_at: SystemTime) -> Self {
        Self {
            use_case,
            assessment,
            generated_at: humantime::format_rfc3339_seconds(generated_at).to_string(),
        }
    }

    /// `YYYY-MM-DD` part of the timestamp.
    pub fn generated_date(&self) -> &str {
        self.generated_at.get(..10).unwrap_or(&self.generated_at)
    }
}
