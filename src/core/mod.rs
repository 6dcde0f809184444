pub mod calculator;
pub mod cgpa;
pub mod feedback;
pub mod required_sgpa;
pub mod validation;

pub use crate::domain::model::{CalculationResult, CgpaRequest, RequiredSgpaRequest, SemesterRecord};
pub use crate::domain::ports::{ConfigProvider, FeedbackStore};
pub use crate::utils::error::Result;
