use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NOT_SPECIFIED: &str = "Not specified";

/// Raw form or API input. Every field may be missing until `validate` runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub ai_techniques: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub markets: Vec<String>,
    #[serde(default)]
    pub data_types: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// A validated use case. Only `UseCaseDraft::validate` builds one.
///
/// ```compile_fail
/// let _: protocol::UseCase = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseCase {
    name: String,
    department: String,
    ai_techniques: Option<String>,
    stage: Option<String>,
    markets: Vec<String>,
    data_types: Vec<String>,
    description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a use case name")]
    MissingName,
    #[error("Please select a department")]
    MissingDepartment,
    #[error("Please select at least one target market")]
    MissingMarkets,
    #[error("Please select at least one data type")]
    MissingDataTypes,
    #[error("Please enter a description")]
    MissingDescription,
}

impl UseCaseDraft {
    /// Checks the draft in form order and reports the first problem.
    pub fn validate(&self) -> Result<UseCase, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        let department = self.department.trim();
        if department.is_empty() {
            return Err(ValidationError::MissingDepartment);
        }
        let markets = normalize_set(&self.markets);
        if markets.is_empty() {
            return Err(ValidationError::MissingMarkets);
        }
        let data_types = normalize_set(&self.data_types);
        if data_types.is_empty() {
            return Err(ValidationError::MissingDataTypes);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        Ok(UseCase {
            name: name.to_string(),
            department: department.to_string(),
            ai_techniques: non_blank(&self.ai_techniques),
            stage: non_blank(&self.stage),
            markets,
            data_types,
            description: description.to_string(),
        })
    }
}

impl UseCase {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn ai_techniques(&self) -> Option<&str> {
        self.ai_techniques.as_deref()
    }

    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    pub fn markets(&self) -> &[String] {
        &self.markets
    }

    pub fn data_types(&self) -> &[String] {
        &self.data_types
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn ai_techniques_label(&self) -> &str {
        self.ai_techniques().unwrap_or(NOT_SPECIFIED)
    }

    pub fn stage_label(&self) -> &str {
        self.stage().unwrap_or(NOT_SPECIFIED)
    }

    pub fn to_draft(&self) -> UseCaseDraft {
        UseCaseDraft {
            name: self.name.clone(),
            department: self.department.clone(),
            ai_techniques: self.ai_techniques.clone().unwrap_or_default(),
            stage: self.stage.clone().unwrap_or_default(),
            markets: self.markets.clone(),
            data_types: self.data_types.clone(),
            description: self.description.clone(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// First-seen order, no blanks, no duplicates.
fn normalize_set(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() || out.iter().any(|seen| seen == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}
