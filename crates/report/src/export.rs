use protocol::{Evaluation, RiskAssessment, UseCase};
use serde::Serialize;

use crate::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Pdf,
    Json,
}

impl ExportKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "application/pdf",
            ExportKind::Json => "application/json",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "GovLens_Report",
            ExportKind::Json => "GovLens_Data",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "pdf",
            ExportKind::Json => "json",
        }
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    use_case: &'a UseCase,
    evaluation: &'a RiskAssessment,
    generated_at: &'a str,
}

pub fn export_json(evaluation: &Evaluation) -> Result<String, ReportError> {
    let document = ExportDocument {
        use_case: &evaluation.use_case,
        evaluation: &evaluation.assessment,
        generated_at: &evaluation.generated_at,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// `GovLens_Report_<name>_<YYYYMMDD>.pdf`, safe for a Content-Disposition header.
pub fn report_file_name(kind: ExportKind, evaluation: &Evaluation) -> String {
    let name: String = evaluation
        .use_case
        .name()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let date: String = evaluation
        .generated_date()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    format!("{}_{}_{}.{}", kind.prefix(), name, date, kind.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::evaluation;
    use serde_json::Value;

    #[test]
    fn names_files_after_use_case_and_date() {
        let evaluation = evaluation();
        assert_eq!(
            report_file_name(ExportKind::Pdf, &evaluation),
            "GovLens_Report_Resume_Screener_20231114.pdf"
        );
        assert_eq!(
            report_file_name(ExportKind::Json, &evaluation),
            "GovLens_Data_Resume_Screener_20231114.json"
        );
    }

    #[test]
    fn sanitizes_header_unsafe_characters() {
        let mut evaluation = evaluation();
        let mut draft = evaluation.use_case.to_draft();
        draft.name = "Q3 \"pilot\"; v2/é".to_string();
        evaluation.use_case = draft.validate().expect("valid");
        assert_eq!(
            report_file_name(ExportKind::Pdf, &evaluation),
            "GovLens_Report_Q3__pilot___v2___20231114.pdf"
        );
    }

    #[test]
    fn export_contains_use_case_and_assessment() {
        let json = export_json(&evaluation()).expect("export");
        let value: Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["use_case"]["name"], "Resume Screener");
        assert_eq!(value["evaluation"]["overall_score"], 72);
        assert_eq!(value["evaluation"]["risk_level"], "HIGH");
        assert_eq!(value["evaluation"]["risks"]["privacy"]["score"], 70);
        assert_eq!(value["generated_at"], "2023-11-14T22:13:20Z");
    }
}
