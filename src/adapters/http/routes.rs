use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::{error::AppError, state::AppState};
use crate::domain::model::Feedback;

/// Header through which the upstream authentication layer passes the caller.
pub const AUTHENTICATED_USER_HEADER: &str = "x-authenticated-user";

#[derive(Debug, Serialize)]
pub struct CgpaResponse {
    pub cgpa: f64,
}

#[derive(Debug, Serialize)]
pub struct RequiredSgpaResponse {
    pub required_sgpa: f64,
}

/// An empty body is read as `{}` so that it produces field errors rather than
/// a parse error.
fn parse_body(body: &Bytes) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_slice(body)?)
}

fn caller(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHENTICATED_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|user| !user.is_empty())
        .map(str::to_string)
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn cgpa_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CgpaResponse>, AppError> {
    let input = parse_body(&body)?;
    let result = state.calculator.cgpa(&input).map_err(AppError::enveloped)?;

    Ok(Json(CgpaResponse {
        cgpa: result.value(),
    }))
}

pub async fn required_sgpa_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RequiredSgpaResponse>, AppError> {
    let input = parse_body(&body)?;
    let result = state
        .calculator
        .required_sgpa(&input)
        .map_err(AppError::required_sgpa)?;

    Ok(Json(RequiredSgpaResponse {
        required_sgpa: result.value(),
    }))
}

pub async fn submit_feedback_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Feedback>), AppError> {
    let input = parse_body(&body)?;
    let feedback = state
        .feedback
        .submit(&input, caller(&headers))
        .await
        .map_err(AppError::bare)?;

    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn list_feedback_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Feedback>>, AppError> {
    let feedback = state.feedback.list().await.map_err(AppError::bare)?;
    Ok(Json(feedback))
}
