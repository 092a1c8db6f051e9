use llm_client::ChatMessage;
use protocol::options::FRAMEWORKS;
use protocol::{Dimension, UseCase};
use std::fmt::Write;

pub(crate) const SYSTEM_MESSAGE: &str =
    "You are an AI governance expert. Return only valid JSON, no markdown formatting.";

pub(crate) fn build_messages(use_case: &UseCase) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_MESSAGE),
        ChatMessage::user(build_prompt(use_case)),
    ]
}

/// Renders the evaluation request for one use case. Optional attributes
/// that were left unset are omitted together with their label.
pub(crate) fn build_prompt(use_case: &UseCase) -> String {
    let mut prompt = String::with_capacity(2048);
    prompt.push_str(
        "You are an expert AI governance analyst. Evaluate the AI use case below \
         against regulatory frameworks and risk criteria.\n\n",
    );

    prompt.push_str("## USE CASE DETAILS\n");
    let _ = writeln!(prompt, "Name: {}", use_case.name());
    let _ = writeln!(prompt, "Department: {}", use_case.department());
    if let Some(techniques) = use_case.ai_techniques() {
        let _ = writeln!(prompt, "AI techniques: {techniques}");
    }
    if let Some(stage) = use_case.stage() {
        let _ = writeln!(prompt, "Deployment stage: {stage}");
    }
    let _ = writeln!(prompt, "Target markets: {}", use_case.markets().join(", "));
    let _ = writeln!(prompt, "Data types: {}", use_case.data_types().join(", "));
    let _ = writeln!(prompt, "Description:\n{}\n", use_case.description());

    prompt.push_str("## EVALUATE AGAINST\n");
    for (idx, dimension) in Dimension::ALL.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. {} (key \"{}\"): {}",
            idx + 1,
            dimension.title(),
            dimension.key(),
            dimension_brief(*dimension)
        );
    }

    prompt.push_str("\n## RESPONSE FORMAT\n");
    prompt.push_str(
        "Return one JSON object and nothing else: no markdown fences, no text \
         outside the object. Scores are integers from 0 to 100 where higher means \
         riskier. Every level is one of HIGH, MEDIUM, LOW. Order recommended \
         actions by priority, 1 being the most urgent.\n",
    );
    prompt.push_str(&response_schema());
    prompt
}

fn dimension_brief(dimension: Dimension) -> String {
    match dimension {
        Dimension::Regulatory => format!("obligations under {}", FRAMEWORKS.join(", ")),
        Dimension::Bias => {
            "potential for discrimination, affected groups, historical bias in the domain"
                .to_string()
        }
        Dimension::Privacy => {
            "personal data handling, consent, data retention, cross-border transfers".to_string()
        }
        Dimension::Transparency => {
            "explainability requirements, user notification, right to human review".to_string()
        }
    }
}

fn response_schema() -> String {
    let mut schema = String::from(
        "{\n  \"overall_score\": <0-100 integer>,\n  \"risk_level\": \"<HIGH|MEDIUM|LOW>\",\n  \"risks\": {\n",
    );
    for (idx, dimension) in Dimension::ALL.iter().enumerate() {
        let separator = if idx + 1 == Dimension::ALL.len() { "" } else { "," };
        let _ = write!(
            schema,
            "    \"{}\": {{\"level\": \"<HIGH|MEDIUM|LOW>\", \"score\": <0-100>, \
             \"summary\": \"<2-3 sentences>\", \"{}\": [\"<string>\"]}}{}\n",
            dimension.key(),
            dimension.details_key(),
            separator
        );
    }
    schema.push_str(
        "  },\n  \"recommended_actions\": [\n    {\"priority\": 1, \"action\": \"<specific action>\", \
         \"regulation\": \"<regulation or best practice>\", \"owner\": \"<responsible party>\"}\n  ],\n  \
         \"executive_summary\": \"<3-4 sentences for leadership>\"\n}\n",
    );
    schema
}
