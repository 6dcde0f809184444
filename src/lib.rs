pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::http::{build_router, start_server, state::AppState};
pub use adapters::storage::InMemoryFeedbackStore;
pub use config::ServerConfig;
pub use crate::core::{
    calculator::Calculator, cgpa::compute_cgpa, required_sgpa::compute_required_sgpa,
    validation::{validate_cgpa_request, validate_required_sgpa_request},
};
pub use domain::model::{CalculationResult, CgpaRequest, RequiredSgpaRequest, SemesterRecord};
pub use utils::error::{CalculationError, GpaError, Result, ValidationErrors};
