use std::sync::Arc;

use crate::config::toml_config::ServerConfig;
use crate::core::calculator::Calculator;
use crate::core::feedback::FeedbackService;
use crate::domain::ports::{ConfigProvider, FeedbackStore};

pub struct AppState {
    pub config: ServerConfig,
    pub calculator: Calculator,
    pub feedback: FeedbackService,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn FeedbackStore>) -> Arc<Self> {
        let feedback = FeedbackService::new(store, config.max_comment_length());

        Arc::new(Self {
            config,
            calculator: Calculator::new(),
            feedback,
        })
    }
}
