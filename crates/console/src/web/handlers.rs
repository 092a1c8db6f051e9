use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use protocol::{Evaluation, UseCaseDraft};
use report::{export_json, render_pdf, report_file_name, ExportKind};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use super::form::parse_evaluate_form;
use super::pages::{error_page, form_page, results_page, FormView};
use super::{AppState, SessionHandle};

pub(super) async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = SessionHandle::from_headers(&headers);
    let (draft, session_key, has_result) = {
        let sessions = state.sessions.read().await;
        match sessions.get(&handle.id) {
            Some(session) => (
                session.draft.clone(),
                session.api_key.is_some(),
                session.evaluation.is_some(),
            ),
            None => (None, false, false),
        }
    };
    let notice = has_result.then_some("The latest evaluation is available under Results.");
    handle.respond(form_response(
        &state,
        StatusCode::OK,
        draft.as_ref(),
        None,
        notice,
        session_key,
    ))
}

pub(super) async fn evaluate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let handle = SessionHandle::from_headers(&headers);
    let form = parse_evaluate_form(&body);

    let session_key = {
        let mut sessions = state.sessions.write().await;
        let session = sessions.get_or_create(handle.id);
        session.draft = Some(form.draft.clone());
        if form.api_key.is_some() {
            session.api_key = form.api_key.clone();
        }
        session.api_key.clone()
    };

    let use_case = match form.draft.validate() {
        Ok(use_case) => use_case,
        Err(err) => {
            tracing::info!(session = %handle.id, error = %err, "evaluation form rejected");
            return handle.respond(form_response(
                &state,
                StatusCode::BAD_REQUEST,
                Some(&form.draft),
                Some(&err.to_string()),
                None,
                session_key.is_some(),
            ));
        }
    };

    let api_key = state.server_api_key.as_deref().or(session_key.as_deref());
    match state.evaluator.evaluate(&use_case, api_key).await {
        Ok(assessment) => {
            let evaluation = Evaluation::new(use_case, assessment, SystemTime::now());
            {
                let mut sessions = state.sessions.write().await;
                sessions.get_or_create(handle.id).evaluation = Some(evaluation);
                tracing::info!(
                    session = %handle.id,
                    active_sessions = sessions.len(),
                    "evaluation stored"
                );
            }
            handle.respond(Redirect::to("/results"))
        }
        Err(err) => handle.respond(form_response(
            &state,
            err.status(),
            Some(&form.draft),
            Some(&err.to_string()),
            None,
            session_key.is_some(),
        )),
    }
}

pub(super) async fn results(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = SessionHandle::from_headers(&headers);
    let evaluation = current_evaluation(&state, &handle).await;
    handle.respond(Html(results_page(evaluation.as_ref())))
}

pub(super) async fn report_pdf(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = SessionHandle::from_headers(&headers);
    let Some(evaluation) = current_evaluation(&state, &handle).await else {
        return handle.respond(no_evaluation());
    };
    match render_pdf(&evaluation) {
        Ok(bytes) => handle.respond(download(ExportKind::Pdf, &evaluation, bytes)),
        Err(err) => handle.respond(export_failed(ExportKind::Pdf, &err)),
    }
}

pub(super) async fn report_json(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = SessionHandle::from_headers(&headers);
    let Some(evaluation) = current_evaluation(&state, &handle).await else {
        return handle.respond(no_evaluation());
    };
    match export_json(&evaluation) {
        Ok(json) => handle.respond(download(ExportKind::Json, &evaluation, json.into_bytes())),
        Err(err) => handle.respond(export_failed(ExportKind::Json, &err)),
    }
}

pub(super) async fn clear(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = SessionHandle::from_headers(&headers);
    state.sessions.write().await.get_or_create(handle.id).clear();
    tracing::info!(session = %handle.id, "session cleared");
    handle.respond(Redirect::to("/"))
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiEvaluateRequest {
    use_case: UseCaseDraft,
    #[serde(default)]
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ApiError {
    error: String,
    kind: &'static str,
}

fn validation_error(error: String) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error,
            kind: "validation",
        }),
    )
}

/// Stateless variant of the form flow; no session is read or written.
pub(super) async fn api_evaluate(
    State(state): State<AppState>,
    request: Result<Json<ApiEvaluateRequest>, JsonRejection>,
) -> Result<Json<Evaluation>, (StatusCode, Json<ApiError>)> {
    let Json(request) = request.map_err(|rejection| {
        tracing::info!(
            status = %rejection.status(),
            error = %rejection.body_text(),
            "api request rejected"
        );
        validation_error(rejection.body_text())
    })?;
    let use_case = request
        .use_case
        .validate()
        .map_err(|err| validation_error(err.to_string()))?;
    let api_key = state
        .server_api_key
        .as_deref()
        .or(request.api_key.as_deref());
    let assessment = state
        .evaluator
        .evaluate(&use_case, api_key)
        .await
        .map_err(|err| {
            (
                err.status(),
                Json(ApiError {
                    error: err.to_string(),
                    kind: err.kind(),
                }),
            )
        })?;
    Ok(Json(Evaluation::new(use_case, assessment, SystemTime::now())))
}

async fn current_evaluation(state: &AppState, handle: &SessionHandle) -> Option<Evaluation> {
    let sessions = state.sessions.read().await;
    sessions
        .get(&handle.id)
        .and_then(|session| session.evaluation.clone())
}

fn form_response(
    state: &AppState,
    status: StatusCode,
    draft: Option<&UseCaseDraft>,
    error: Option<&str>,
    notice: Option<&str>,
    session_key: bool,
) -> Response {
    let view = FormView {
        draft,
        error,
        notice,
        server_key: state.server_api_key.is_some(),
        session_key,
        model: state.evaluator.model(),
    };
    (status, Html(form_page(&view))).into_response()
}

fn download(kind: ExportKind, evaluation: &Evaluation, body: Vec<u8>) -> Response {
    let file_name = report_file_name(kind, evaluation);
    (
        [
            (CONTENT_TYPE, kind.content_type().to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

fn no_evaluation() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(error_page(
            "No evaluation yet",
            "Run an evaluation before downloading a report.",
        )),
    )
        .into_response()
}

fn export_failed(kind: ExportKind, err: &report::ReportError) -> Response {
    tracing::error!(kind = ?kind, error = %err, "report export failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(error_page("Export failed", &err.to_string())),
    )
        .into_response()
}
