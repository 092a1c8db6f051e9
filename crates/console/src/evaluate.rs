use axum::http::StatusCode;
use llm_client::{LlmClient, LlmError};
use protocol::{parse_assessment, ParseError, RiskAssessment, UseCase};
use std::time::Instant;
use thiserror::Error;

use crate::prompt::build_messages;

#[derive(Debug, Error)]
pub(crate) enum EvaluateError {
    #[error("No API key configured. Enter your Groq API key to evaluate.")]
    MissingApiKey,
    #[error("The API key contains characters that cannot be sent in a request header.")]
    InvalidApiKey,
    #[error("Error calling the model API: {0}")]
    Api(#[from] LlmError),
    #[error("Failed to parse the AI response. Please try again. ({0})")]
    Unparseable(#[from] ParseError),
}

impl EvaluateError {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            EvaluateError::MissingApiKey => "missing_api_key",
            EvaluateError::InvalidApiKey => "invalid_api_key",
            EvaluateError::Api(_) => "api_error",
            EvaluateError::Unparseable(_) => "unparseable_response",
        }
    }

    pub(crate) fn status(&self) -> StatusCode {
        match self {
            EvaluateError::MissingApiKey | EvaluateError::InvalidApiKey => StatusCode::BAD_REQUEST,
            EvaluateError::Api(_) | EvaluateError::Unparseable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

pub(crate) fn check_api_key(api_key: Option<&str>) -> Result<&str, EvaluateError> {
    let key = api_key.map(str::trim).unwrap_or_default();
    if key.is_empty() {
        return Err(EvaluateError::MissingApiKey);
    }
    if !key.bytes().all(|byte| byte.is_ascii_graphic()) {
        return Err(EvaluateError::InvalidApiKey);
    }
    Ok(key)
}

pub(crate) struct Evaluator {
    client: LlmClient,
}

impl Evaluator {
    pub(crate) fn new(client: LlmClient) -> Self {
        Self { client }
    }

    pub(crate) fn model(&self) -> &str {
        &self.client.config().model
    }

    /// Runs one analysis. The key is checked before any request is made;
    /// every failure ends the attempt.
    pub(crate) async fn evaluate(
        &self,
        use_case: &UseCase,
        api_key: Option<&str>,
    ) -> Result<RiskAssessment, EvaluateError> {
        let api_key = check_api_key(api_key)?;
        let messages = build_messages(use_case);
        let started = Instant::now();
        tracing::info!(
            use_case = %use_case.name(),
            model = %self.model(),
            prompt_len = messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "evaluation started"
        );

        let reply = self.client.complete(api_key, &messages).await.map_err(|err| {
            tracing::warn!(
                use_case = %use_case.name(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                auth_rejected = err.is_auth(),
                error = %err,
                "evaluation request failed"
            );
            err
        })?;

        let assessment = parse_assessment(&reply).map_err(|err| {
            tracing::warn!(
                use_case = %use_case.name(),
                reply_len = reply.len(),
                error = %err,
                "model reply rejected"
            );
            err
        })?;

        tracing::info!(
            use_case = %use_case.name(),
            overall_score = assessment.overall_score().value(),
            risk_level = %assessment.risk_level(),
            actions = assessment.recommended_actions().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "evaluation complete"
        );
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{completion, sample_response, use_case};
    use httpmock::prelude::*;
    use llm_client::LlmConfig;
    use protocol::RiskLevel;

    fn evaluator_for(server: &MockServer) -> Evaluator {
        let client = LlmClient::new(LlmConfig {
            base_url: server.base_url(),
            timeout_secs: 5,
            ..LlmConfig::default()
        })
        .expect("client");
        Evaluator::new(client)
    }

    #[test]
    fn rejects_missing_or_malformed_keys() {
        assert!(matches!(check_api_key(None), Err(EvaluateError::MissingApiKey)));
        assert!(matches!(check_api_key(Some("  ")), Err(EvaluateError::MissingApiKey)));
        assert!(matches!(
            check_api_key(Some("gsk abc")),
            Err(EvaluateError::InvalidApiKey)
        ));
        assert_eq!(check_api_key(Some(" gsk_abc ")).expect("key"), "gsk_abc");
    }

    #[tokio::test]
    async fn missing_key_blocks_before_any_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200);
            })
            .await;
        let err = evaluator_for(&server)
            .evaluate(&use_case(), None)
            .await
            .expect_err("must fail");
        assert!(matches!(err, EvaluateError::MissingApiKey));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        mock.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn parses_model_reply() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(completion(&sample_response()));
            })
            .await;
        let assessment = evaluator_for(&server)
            .evaluate(&use_case(), Some("gsk_test"))
            .await
            .expect("assessment");
        assert_eq!(assessment.overall_score().value(), 72);
        assert_eq!(assessment.risk_level(), RiskLevel::High);
        assert_eq!(assessment.recommended_actions().len(), 1);
    }

    #[tokio::test]
    async fn malformed_reply_is_an_analysis_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200)
                    .json_body(completion("Sorry, I cannot help with that."));
            })
            .await;
        let err = evaluator_for(&server)
            .evaluate(&use_case(), Some("gsk_test"))
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), "unparseable_response");
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn api_failure_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(503).body("overloaded");
            })
            .await;
        let err = evaluator_for(&server)
            .evaluate(&use_case(), Some("gsk_test"))
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), "api_error");
        assert!(err.to_string().contains("overloaded"));
    }
}
