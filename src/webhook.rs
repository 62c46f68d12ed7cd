use std::sync::Arc;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Json;
use serde::{Deserialize, Serialize};
use crate::config::AppConfig;
use crate::domain::{HandlerError, MalformedInputError};
use crate::handlers::{handle_update, ReplySender, UpdateOutcome};
use crate::metrics;

const OK_MESSAGE: &str = "OK";
const ERROR_MESSAGE: &str = "Error processing update";
pub const INVOKE_PATH: &str = "/invoke";
pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// The envelope a function host passes to the handler.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub body: Option<String>,
}

/// `body` holds a JSON-encoded string, i.e. `"\"OK\""` rather than `"OK"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub status_code: u16,
    pub body: String,
}

impl WebhookResponse {
    pub fn ok() -> Self {
        Self::with_message(StatusCode::OK, OK_MESSAGE)
    }

    pub fn error() -> Self {
        Self::with_message(StatusCode::INTERNAL_SERVER_ERROR, ERROR_MESSAGE)
    }

    fn with_message(status: StatusCode, message: &str) -> Self {
        Self {
            status_code: status.as_u16(),
            body: serde_json::Value::from(message).to_string(),
        }
    }
}

impl From<Result<UpdateOutcome, HandlerError>> for WebhookResponse {
    fn from(result: Result<UpdateOutcome, HandlerError>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(err) => {
                log::error!("couldn't process the update ({}): {}", err.kind(), err);
                metrics::ERRORS_COUNTER.inc(&err);
                Self::error()
            }
        }
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

pub async fn process_event<S>(sender: &S, config: &AppConfig, event: &WebhookEvent) -> WebhookResponse
where
    S: ReplySender + ?Sized
{
    let result = match event.body.as_deref() {
        Some(body) => handle_update(sender, config, body).await,
        None => Err(MalformedInputError::MissingBody.into()),
    };
    result.into()
}

struct WebhookState<S> {
    sender: Arc<S>,
    config: Arc<AppConfig>,
}

impl<S> WebhookState<S> {
    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let Some(secret) = &self.config.webhook_secret else {
            return true
        };
        let authorized = headers.get(SECRET_TOKEN_HEADER)
            .is_some_and(|value| value.as_bytes() == secret.as_bytes());
        if !authorized {
            log::warn!("rejected a webhook request without a valid secret token");
        }
        authorized
    }
}

impl<S> Clone for WebhookState<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            config: self.config.clone(),
        }
    }
}

/// Serves Telegram's webhook calls at the configured path and function-host style invocations at `/invoke`.
/// Both routes require the secret token header when `webhook_secret` is configured.
pub fn router<S: ReplySender + 'static>(sender: Arc<S>, config: AppConfig) -> axum::Router {
    let webhook_path = config.webhook_path.clone();
    let state = WebhookState {
        sender,
        config: Arc::new(config),
    };
    axum::Router::new()
        .route(&webhook_path, post(update_handler::<S>))
        .route(INVOKE_PATH, post(invoke_handler::<S>))
        .with_state(state)
}

async fn update_handler<S: ReplySender + 'static>(State(state): State<WebhookState<S>>, headers: HeaderMap, body: Bytes) -> Response {
    if !state.is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response()
    }
    let result = match std::str::from_utf8(&body) {
        Ok(body) => handle_update(state.sender.as_ref(), &state.config, body).await,
        Err(e) => Err(e.into()),
    };
    WebhookResponse::from(result).into_response()
}

async fn invoke_handler<S: ReplySender + 'static>(State(state): State<WebhookState<S>>, headers: HeaderMap, body: Bytes) -> Response {
    if !state.is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response()
    }
    let response = match serde_json::from_slice::<WebhookEvent>(&body) {
        Ok(event) => process_event(state.sender.as_ref(), &state.config, &event).await,
        Err(e) => Err::<UpdateOutcome, _>(HandlerError::from(e)).into(),
    };
    Json(response).into_response()
}
