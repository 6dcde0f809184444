use crate::core::validation::coerce_integer;
use crate::domain::model::{Feedback, NewFeedback, DEFAULT_RATING, MAX_RATING, MIN_RATING};
use crate::domain::ports::FeedbackStore;
use crate::utils::error::{
    ErrorKind, FieldPath, GpaError, Result, ValidationErrors, NON_FIELD_ERRORS,
};
use serde_json::Value;
use std::sync::Arc;

/// Validates a `{"comment": .., "rating": ..}` body. `user` is the identity
/// supplied by the authentication layer, `None` for anonymous feedback.
pub fn validate_feedback(
    input: &Value,
    user: Option<String>,
    max_comment_length: usize,
) -> std::result::Result<NewFeedback, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let root = FieldPath::root();

    let Value::Object(object) = input else {
        errors.add(
            root.field(NON_FIELD_ERRORS),
            ErrorKind::InvalidFormat,
            "Invalid data. Expected an object.",
        );
        return Err(errors);
    };

    let comment_path = root.field("comment");
    let comment = match object.get("comment") {
        None => {
            errors.add(comment_path, ErrorKind::Missing, "This field is required.");
            None
        }
        Some(Value::String(text)) if text.trim().is_empty() => {
            errors.add(comment_path, ErrorKind::Missing, "This field may not be blank.");
            None
        }
        Some(Value::String(text)) if text.chars().count() > max_comment_length => {
            errors.add(
                comment_path,
                ErrorKind::Range,
                format!(
                    "Ensure this field has no more than {} characters.",
                    max_comment_length
                ),
            );
            None
        }
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            errors.add(comment_path, ErrorKind::InvalidFormat, "Not a valid string.");
            None
        }
    };

    let rating_path = root.field("rating");
    let rating = match object.get("rating") {
        None => Some(DEFAULT_RATING),
        Some(value) => {
            let rating = coerce_integer(value)
                .and_then(|r| u8::try_from(r).ok())
                .filter(|r| (MIN_RATING..=MAX_RATING).contains(r));
            if rating.is_none() {
                errors.add(
                    rating_path,
                    ErrorKind::Range,
                    format!("\"{}\" is not a valid choice.", display_raw(value)),
                );
            }
            rating
        }
    };

    match (comment, rating) {
        (Some(comment), Some(rating)) => Ok(NewFeedback {
            user,
            comment,
            rating,
        }),
        _ => Err(errors),
    }
}

fn display_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Clone)]
pub struct FeedbackService {
    store: Arc<dyn FeedbackStore>,
    max_comment_length: usize,
}

impl FeedbackService {
    pub fn new(store: Arc<dyn FeedbackStore>, max_comment_length: usize) -> Self {
        Self {
            store,
            max_comment_length,
        }
    }

    pub async fn submit(&self, input: &Value, user: Option<String>) -> Result<Feedback> {
        let feedback = validate_feedback(input, user, self.max_comment_length).map_err(|e| {
            tracing::warn!("Feedback rejected: {}", e);
            GpaError::from(e)
        })?;

        let stored = self.store.insert(feedback).await?;
        tracing::info!(
            id = stored.id,
            rating = stored.rating,
            anonymous = stored.user.is_none(),
            "Feedback stored"
        );
        Ok(stored)
    }

    pub async fn list(&self) -> Result<Vec<Feedback>> {
        self.store.list().await
    }
}
