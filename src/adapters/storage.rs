use crate::domain::model::{Feedback, NewFeedback};
use crate::domain::ports::FeedbackStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Process-local feedback store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryFeedbackStore {
    entries: RwLock<Vec<Feedback>>,
    next_id: AtomicU64,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn insert(&self, feedback: NewFeedback) -> Result<Feedback> {
        let mut entries = self.entries.write().await;
        // ids start at 1
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;

        let stored = Feedback {
            id,
            user: feedback.user,
            comment: feedback.comment,
            rating: feedback.rating,
            created_at: Utc::now(),
        };
        entries.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Feedback>> {
        Ok(self.entries.read().await.clone())
    }
}
