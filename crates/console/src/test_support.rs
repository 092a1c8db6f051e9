use protocol::{parse_assessment, Evaluation, UseCase, UseCaseDraft};
use serde_json::{json, Value};
use std::time::{Duration, UNIX_EPOCH};

pub(crate) fn draft() -> UseCaseDraft {
    UseCaseDraft {
        name: "Resume Screener".to_string(),
        department: "Human Resources".to_string(),
        ai_techniques: "Natural Language Processing (NLP)".to_string(),
        stage: "Pilot / Testing".to_string(),
        markets: vec!["European Union".to_string(), "United States".to_string()],
        data_types: vec!["Personal Identifiable Information (PII)".to_string()],
        description: "Ranks incoming applications and flags candidates for recruiters."
            .to_string(),
    }
}

pub(crate) fn use_case() -> UseCase {
    draft().validate().expect("valid use case")
}

pub(crate) fn sample_response() -> String {
    json!({
        "overall_score": 72,
        "risk_level": "HIGH",
        "risks": {
            "regulatory": {
                "level": "HIGH",
                "score": 80,
                "summary": "Recruitment is a high-risk use under the EU AI Act.",
                "applicable_regulations": ["EU AI Act", "GDPR"]
            },
            "bias": {
                "level": "MEDIUM",
                "score": 65,
                "summary": "Historical hiring data may encode bias.",
                "affected_groups": ["Older applicants"]
            },
            "privacy": {
                "level": "HIGH",
                "score": 70,
                "summary": "Processes applicant PII.",
                "data_concerns": ["CV retention"]
            },
            "transparency": {
                "level": "MEDIUM",
                "score": 60,
                "summary": "Candidates must be told AI is used.",
                "requirements": ["Candidate notice"]
            }
        },
        "recommended_actions": [
            {"priority": 1, "action": "Add human review", "regulation": "EU AI Act", "owner": "HR"}
        ],
        "executive_summary": "High-risk hiring system requiring human oversight."
    })
    .to_string()
}

/// Chat completion body wrapping `content` the way the provider returns it.
pub(crate) fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ]
    })
}

pub(crate) fn evaluation() -> Evaluation {
    let assessment = parse_assessment(&sample_response()).expect("valid response");
    Evaluation::new(
        use_case(),
        assessment,
        UNIX_EPOCH + Duration::from_secs(1_700_000_000),
    )
}
