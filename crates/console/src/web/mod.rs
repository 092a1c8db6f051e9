mod form;
mod handlers;
mod pages;

use axum::body::Body;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::evaluate::Evaluator;
use crate::state::SessionStore;

const SESSION_COOKIE: &str = "govlens_session";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) sessions: Arc<RwLock<SessionStore>>,
    pub(crate) evaluator: Arc<Evaluator>,
    /// Key from config or environment; takes precedence over keys typed in the form.
    pub(crate) server_api_key: Option<Arc<str>>,
}

impl AppState {
    pub(crate) fn new(
        sessions: SessionStore,
        evaluator: Evaluator,
        server_api_key: Option<String>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(sessions)),
            evaluator: Arc::new(evaluator),
            server_api_key: server_api_key.map(Arc::from),
        }
    }
}

pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/evaluate", post(handlers::evaluate))
        .route("/results", get(handlers::results))
        .route("/report.pdf", get(handlers::report_pdf))
        .route("/report.json", get(handlers::report_json))
        .route("/clear", post(handlers::clear))
        .route("/api/evaluate", post(handlers::api_evaluate))
        .route("/health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(log_http_request))
}

async fn health() -> &'static str {
    "ok"
}

async fn log_http_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();
    let response = next.run(req).await;
    let status = response.status();
    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "http request"
    );
    response
}

/// Session identity taken from the request cookie, or a fresh one that the
/// response has to hand back.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionHandle {
    pub(crate) id: Uuid,
    pub(crate) is_new: bool,
}

impl SessionHandle {
    pub(crate) fn from_headers(headers: &HeaderMap) -> Self {
        match session_cookie(headers) {
            Some(id) => Self { id, is_new: false },
            None => Self {
                id: Uuid::new_v4(),
                is_new: true,
            },
        }
    }

    pub(crate) fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.is_new {
            let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_session_cookie_among_others() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={id}; x=1"))
                .expect("header"),
        );
        let handle = SessionHandle::from_headers(&headers);
        assert_eq!(handle.id, id);
        assert!(!handle.is_new);
    }

    #[test]
    fn issues_cookie_for_new_or_garbled_sessions() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("govlens_session=not-a-uuid"));
        let handle = SessionHandle::from_headers(&headers);
        assert!(handle.is_new);
        let response = handle.respond("ok");
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .expect("cookie");
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}={}", handle.id)));
        assert!(cookie.contains("HttpOnly"));
    }
}
