use serde_json::{Map, Value};
use thiserror::Error;

use crate::assessment::{
    Dimension, DimensionRisk, DimensionRisks, RecommendedAction, RiskAssessment, RiskLevel, Score,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),
    #[error("response is missing required field `{0}`")]
    MissingField(String),
    #[error("`{field}` must be between 0 and 100, got {value}")]
    ScoreOutOfRange { field: String, value: String },
    #[error("`{field}` must be one of HIGH, MEDIUM, LOW, got {value:?}")]
    InvalidLevel { field: String, value: String },
    #[error("`{0}` has an unexpected type or value")]
    InvalidShape(String),
}

/// Parses the model's reply into a validated assessment.
///
/// A surrounding Markdown code fence is tolerated. Anything else that does
/// not match the schema is rejected; no field is ever defaulted except the
/// optional per-dimension detail lists.
///
/// Strings are kept with surrounding whitespace trimmed, and blank entries
/// in the detail lists are dropped. Every other value is carried over as
/// the model sent it.
pub fn parse_assessment(text: &str) -> Result<RiskAssessment, ParseError> {
    let body = strip_code_fence(text);
    let value: Value =
        serde_json::from_str(body).map_err(|err| ParseError::NotJson(err.to_string()))?;
    let root = as_object(&value, "response")?;

    let overall_score = score(root, "", "overall_score")?;
    let risk_level = level(root, "", "risk_level")?;
    let risks_value = required(root, "", "risks")?;
    let risks = as_object(risks_value, "risks")?;
    let risks = DimensionRisks {
        regulatory: dimension(risks, Dimension::Regulatory)?,
        bias: dimension(risks, Dimension::Bias)?,
        privacy: dimension(risks, Dimension::Privacy)?,
        transparency: dimension(risks, Dimension::Transparency)?,
    };
    let recommended_actions = actions(root)?;
    let executive_summary = string(root, "", "executive_summary")?;

    Ok(RiskAssessment::new(
        overall_score,
        risk_level,
        risks,
        recommended_actions,
        executive_summary,
    ))
}

pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    let body = body
        .strip_prefix("json")
        .or_else(|| body.strip_prefix("JSON"))
        .unwrap_or(body);
    body.trim()
}

fn dimension(risks: &Map<String, Value>, dimension: Dimension) -> Result<DimensionRisk, ParseError> {
    let path = format!("risks.{}", dimension.key());
    let value = required(risks, "risks", dimension.key())?;
    let entry = as_object(value, &path)?;
    // Only the regulatory list is mandatory: it feeds the regulations section.
    let details = match dimension {
        Dimension::Regulatory => string_list(entry, &path, dimension.details_key(), true)?,
        _ => string_list(entry, &path, dimension.details_key(), false)?,
    };
    Ok(DimensionRisk {
        level: level(entry, &path, "level")?,
        score: score(entry, &path, "score")?,
        summary: string(entry, &path, "summary")?,
        details,
    })
}

fn actions(root: &Map<String, Value>) -> Result<Vec<RecommendedAction>, ParseError> {
    let value = required(root, "", "recommended_actions")?;
    let items = value
        .as_array()
        .ok_or_else(|| ParseError::InvalidShape("recommended_actions".to_string()))?;
    let mut actions = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let path = format!("recommended_actions[{idx}]");
        let entry = as_object(item, &path)?;
        actions.push(RecommendedAction {
            priority: priority(entry, &path)?,
            action: string(entry, &path, "action")?,
            regulation: optional_string(entry, &path, "regulation")?,
            owner: optional_string(entry, &path, "owner")?,
        });
    }
    Ok(actions)
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ParseError> {
    value
        .as_object()
        .ok_or_else(|| ParseError::InvalidShape(path.to_string()))
}

fn required<'a>(
    object: &'a Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<&'a Value, ParseError> {
    match object.get(key) {
        Some(Value::Null) | None => Err(ParseError::MissingField(join(path, key))),
        Some(value) => Ok(value),
    }
}

fn score(object: &Map<String, Value>, path: &str, key: &str) -> Result<Score, ParseError> {
    let field = join(path, key);
    let value = required(object, path, key)?;
    let Value::Number(number) = value else {
        return Err(ParseError::InvalidShape(field));
    };
    let integral = match number.as_i64() {
        Some(value) => value,
        None => match number.as_f64() {
            Some(value) if value.fract() == 0.0 && value.abs() < 1e15 => value as i64,
            _ => {
                return Err(ParseError::ScoreOutOfRange {
                    field,
                    value: number.to_string(),
                })
            }
        },
    };
    Score::new(integral).ok_or_else(|| ParseError::ScoreOutOfRange {
        field,
        value: number.to_string(),
    })
}

fn level(object: &Map<String, Value>, path: &str, key: &str) -> Result<RiskLevel, ParseError> {
    let field = join(path, key);
    let raw = required(object, path, key)?
        .as_str()
        .ok_or_else(|| ParseError::InvalidShape(field.clone()))?;
    raw.parse().map_err(|_| ParseError::InvalidLevel {
        field,
        value: raw.to_string(),
    })
}

fn string(object: &Map<String, Value>, path: &str, key: &str) -> Result<String, ParseError> {
    let field = join(path, key);
    let text = required(object, path, key)?
        .as_str()
        .ok_or_else(|| ParseError::InvalidShape(field.clone()))?
        .trim();
    if text.is_empty() {
        return Err(ParseError::MissingField(field));
    }
    Ok(text.to_string())
}

fn optional_string(
    object: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<Option<String>, ParseError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.trim().to_string())),
        Some(_) => Err(ParseError::InvalidShape(join(path, key))),
    }
}

fn string_list(
    object: &Map<String, Value>,
    path: &str,
    key: &str,
    mandatory: bool,
) -> Result<Vec<String>, ParseError> {
    let field = join(path, key);
    let value = match object.get(key) {
        None | Some(Value::Null) if mandatory => return Err(ParseError::MissingField(field)),
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(value) => value,
    };
    let items = value
        .as_array()
        .ok_or_else(|| ParseError::InvalidShape(field.clone()))?;
    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let text = item
            .as_str()
            .ok_or_else(|| ParseError::InvalidShape(format!("{field}[{idx}]")))?
            .trim();
        if !text.is_empty() {
            out.push(text.to_string());
        }
    }
    Ok(out)
}

fn priority(object: &Map<String, Value>, path: &str) -> Result<Option<u32>, ParseError> {
    let field = join(path, "priority");
    match object.get("priority") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|value| u32::try_from(value).ok())
            .filter(|value| *value > 0)
            .map(Some)
            .ok_or(ParseError::InvalidShape(field)),
        Some(Value::String(text)) => text
            .trim()
            .trim_start_matches(['P', 'p'])
            .parse::<u32>()
            .ok()
            .filter(|value| *value > 0)
            .map(Some)
            .ok_or(ParseError::InvalidShape(field)),
        Some(_) => Err(ParseError::InvalidShape(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> Value {
        json!({
            "overall_score": 72,
            "risk_level": "HIGH",
            "risks": {
                "regulatory": {
                    "level": "HIGH",
                    "score": 80,
                    "summary": "Employment decisions are high-risk under the EU AI Act.",
                    "applicable_regulations": ["EU AI Act"]
                },
                "bias": {
                    "level": "MEDIUM",
                    "score": 65,
                    "summary": "Historical hiring data may encode bias.",
                    "affected_groups": ["Women", "Older applicants"]
                },
                "privacy": {
                    "level": "HIGH",
                    "score": 70,
                    "summary": "Processes applicant PII.",
                    "data_concerns": ["Retention of CVs"]
                },
                "transparency": {
                    "level": "MEDIUM",
                    "score": 60,
                    "summary": "Candidates must be told AI is used.",
                    "requirements": ["Candidate notice"]
                }
            },
            "recommended_actions": [
                {
                    "priority": 1,
                    "action": "Add human review",
                    "regulation": "EU AI Act Art. 14",
                    "owner": "HR Operations"
                }
            ],
            "executive_summary": "High-risk hiring system requiring oversight."
        })
    }

    fn parse_value(value: &Value) -> Result<RiskAssessment, ParseError> {
        parse_assessment(&value.to_string())
    }

    #[test]
    fn reproduces_every_field() {
        let assessment = parse_value(&response()).expect("parse");
        assert_eq!(assessment.overall_score().value(), 72);
        assert_eq!(assessment.risk_level(), RiskLevel::High);
        let scores: Vec<u8> = assessment
            .risks()
            .iter()
            .map(|(_, risk)| risk.score.value())
            .collect();
        assert_eq!(scores, vec![80, 65, 70, 60]);
        assert_eq!(assessment.applicable_regulations(), ["EU AI Act"]);
        assert_eq!(
            assessment.dimension(Dimension::Bias).details,
            vec!["Women".to_string(), "Older applicants".to_string()]
        );
        assert_eq!(assessment.dimension(Dimension::Privacy).level, RiskLevel::High);
        assert_eq!(
            assessment.recommended_actions(),
            [RecommendedAction {
                priority: Some(1),
                action: "Add human review".to_string(),
                regulation: Some("EU AI Act Art. 14".to_string()),
                owner: Some("HR Operations".to_string()),
            }]
        );
        assert_eq!(
            assessment.executive_summary(),
            "High-risk hiring system requiring oversight."
        );
    }

    #[test]
    fn accepts_code_fenced_reply() {
        let text = format!("```json\n{}\n```", response());
        let assessment = parse_assessment(&text).expect("parse");
        assert_eq!(assessment.overall_score().value(), 72);
    }

    #[test]
    fn strips_plain_fence() {
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn rejects_non_json() {
        let err = parse_assessment("I think this is high risk.").expect_err("must fail");
        assert!(matches!(err, ParseError::NotJson(_)));
    }

    #[test]
    fn rejects_missing_required_keys() {
        let mut value = response();
        value.as_object_mut().expect("object").remove("risk_level");
        assert_eq!(
            parse_value(&value),
            Err(ParseError::MissingField("risk_level".to_string()))
        );

        let mut value = response();
        value["risks"]["privacy"]
            .as_object_mut()
            .expect("object")
            .remove("score");
        assert_eq!(
            parse_value(&value),
            Err(ParseError::MissingField("risks.privacy.score".to_string()))
        );

        let mut value = response();
        value["risks"]
            .as_object_mut()
            .expect("object")
            .remove("transparency");
        assert_eq!(
            parse_value(&value),
            Err(ParseError::MissingField("risks.transparency".to_string()))
        );

        let mut value = response();
        value["risks"]["regulatory"]
            .as_object_mut()
            .expect("object")
            .remove("applicable_regulations");
        assert_eq!(
            parse_value(&value),
            Err(ParseError::MissingField(
                "risks.regulatory.applicable_regulations".to_string()
            ))
        );
    }

    #[test]
    fn rejects_scores_outside_range() {
        let mut value = response();
        value["overall_score"] = json!(101);
        assert_eq!(
            parse_value(&value),
            Err(ParseError::ScoreOutOfRange {
                field: "overall_score".to_string(),
                value: "101".to_string(),
            })
        );

        let mut value = response();
        value["risks"]["bias"]["score"] = json!(-5);
        assert!(matches!(
            parse_value(&value),
            Err(ParseError::ScoreOutOfRange { field, .. }) if field == "risks.bias.score"
        ));

        let mut value = response();
        value["overall_score"] = json!(72.5);
        assert!(matches!(
            parse_value(&value),
            Err(ParseError::ScoreOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_unknown_levels_and_wrong_types() {
        let mut value = response();
        value["risks"]["bias"]["level"] = json!("SEVERE");
        assert!(matches!(
            parse_value(&value),
            Err(ParseError::InvalidLevel { field, .. }) if field == "risks.bias.level"
        ));

        let mut value = response();
        value["overall_score"] = json!("72");
        assert_eq!(
            parse_value(&value),
            Err(ParseError::InvalidShape("overall_score".to_string()))
        );

        let mut value = response();
        value["recommended_actions"][0]["action"] = json!("  ");
        assert_eq!(
            parse_value(&value),
            Err(ParseError::MissingField(
                "recommended_actions[0].action".to_string()
            ))
        );
    }

    #[test]
    fn optional_details_and_action_fields_stay_empty() {
        let mut value = response();
        value["risks"]["bias"]
            .as_object_mut()
            .expect("object")
            .remove("affected_groups");
        value["recommended_actions"] = json!([{ "action": "Document the model" }]);
        let assessment = parse_value(&value).expect("parse");
        assert!(assessment.dimension(Dimension::Bias).details.is_empty());
        let action = &assessment.recommended_actions()[0];
        assert_eq!(action.priority, None);
        assert_eq!(action.owner, None);
        assert_eq!(action.priority_label(), "P-");
    }

    #[test]
    fn accepts_lowercase_level_and_string_priority() {
        let mut value = response();
        value["risk_level"] = json!("medium");
        value["recommended_actions"][0]["priority"] = json!("P2");
        let assessment = parse_value(&value).expect("parse");
        assert_eq!(assessment.risk_level(), RiskLevel::Medium);
        assert_eq!(assessment.recommended_actions()[0].priority, Some(2));
    }

    #[test]
    fn rejects_zero_priority() {
        for priority in [json!(0), json!("P0"), json!(-1)] {
            let mut value = response();
            value["recommended_actions"][0]["priority"] = priority;
            assert_eq!(
                parse_value(&value),
                Err(ParseError::InvalidShape(
                    "recommended_actions[0].priority".to_string()
                ))
            );
        }
    }

    #[test]
    fn trims_strings_and_drops_blank_list_entries() {
        let mut value = response();
        value["executive_summary"] = json!("  Needs oversight.\n");
        value["risks"]["bias"]["affected_groups"] = json!([" Women ", "", "  "]);
        let assessment = parse_value(&value).expect("parse");
        assert_eq!(assessment.executive_summary(), "Needs oversight.");
        assert_eq!(assessment.dimension(Dimension::Bias).details, vec!["Women".to_string()]);
    }
}
