use crate::domain::model::{Feedback, NewFeedback};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> String;
    fn allowed_origins(&self) -> &[String];
    fn cors_max_age(&self) -> Duration;
    fn max_comment_length(&self) -> usize;
}

/// Persistence for submitted feedback. The real backing store lives outside
/// this crate; `InMemoryFeedbackStore` is the bundled implementation.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn insert(&self, feedback: NewFeedback) -> Result<Feedback>;

    /// All stored feedback, oldest first.
    async fn list(&self) -> Result<Vec<Feedback>>;
}
