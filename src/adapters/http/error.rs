use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::core::validation::FUTURE_SEMESTER_CREDITS;
use crate::utils::error::{CalculationError, ErrorKind, FieldPath, GpaError, ValidationErrors};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed JSON payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Rendered as `{"error": {"message": "Validation failed", "details": ...}}`.
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// Rendered as the bare field-error mapping.
    #[error("Validation failed")]
    FieldErrors(ValidationErrors),

    #[error("{0}")]
    Calculation(#[from] CalculationError),

    #[error("Internal error: {0}")]
    Internal(GpaError),
}

impl AppError {
    /// Validation failures keep the `{"error": {...}}` envelope.
    pub fn enveloped(err: GpaError) -> Self {
        match err {
            GpaError::Validation(errors) => AppError::Validation(errors),
            other => Self::from_service(other),
        }
    }

    /// Validation failures are returned as the plain field mapping.
    pub fn bare(err: GpaError) -> Self {
        match err {
            GpaError::Validation(errors) => AppError::FieldErrors(errors),
            other => Self::from_service(other),
        }
    }

    /// Like [`AppError::bare`], except that a request whose only problem is a
    /// non-positive `future_semester_credits` gets `{"error": ...}`.
    pub fn required_sgpa(err: GpaError) -> Self {
        match err {
            GpaError::Validation(errors) if only_future_credits_range(&errors) => {
                AppError::Calculation(CalculationError::NonPositiveFutureCredits)
            }
            other => Self::bare(other),
        }
    }

    fn from_service(err: GpaError) -> Self {
        match err {
            GpaError::Validation(errors) => AppError::Validation(errors),
            GpaError::Calculation(e) => AppError::Calculation(e),
            GpaError::SerializationError(e) => AppError::MalformedPayload(e),
            other => AppError::Internal(other),
        }
    }
}

fn only_future_credits_range(errors: &ValidationErrors) -> bool {
    let future_credits = FieldPath::root().field(FUTURE_SEMESTER_CREDITS);
    match errors.errors() {
        [error] => error.kind == ErrorKind::Range && error.path == future_credits,
        _ => false,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::MalformedPayload(_) | AppError::Calculation(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": {
                        "message": "Validation failed",
                        "details": errors.details(),
                    }
                }),
            ),
            AppError::FieldErrors(errors) => (StatusCode::BAD_REQUEST, errors.details()),
            AppError::Internal(e) => {
                tracing::error!(
                    "Request failed: {} (category: {:?}, severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error." }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_error() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.add(FieldPath::root().field("x"), ErrorKind::Missing, "This field is required.");
        errors
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation(one_error()), StatusCode::BAD_REQUEST),
            (AppError::FieldErrors(one_error()), StatusCode::BAD_REQUEST),
            (
                AppError::Calculation(CalculationError::ZeroTotalCredits),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Internal(GpaError::StorageError {
                    message: "down".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_envelope_choice() {
        let err = GpaError::Validation(one_error());
        assert!(matches!(AppError::enveloped(err), AppError::Validation(_)));

        let err = GpaError::Validation(one_error());
        assert!(matches!(AppError::bare(err), AppError::FieldErrors(_)));

        let err = GpaError::Calculation(CalculationError::NonPositiveFutureCredits);
        assert!(matches!(AppError::bare(err), AppError::Calculation(_)));
    }

    #[test]
    fn test_lone_future_credits_error_is_not_a_field_mapping() {
        let mut errors = ValidationErrors::new();
        errors.add(
            FieldPath::root().field(FUTURE_SEMESTER_CREDITS),
            ErrorKind::Range,
            "Future semester credits must be greater than zero.",
        );
        assert!(matches!(
            AppError::required_sgpa(GpaError::Validation(errors.clone())),
            AppError::Calculation(CalculationError::NonPositiveFutureCredits)
        ));

        errors.add(FieldPath::root().field("x"), ErrorKind::Missing, "This field is required.");
        assert!(matches!(
            AppError::required_sgpa(GpaError::Validation(errors)),
            AppError::FieldErrors(_)
        ));
    }
}
