use crate::core::cgpa::compute_cgpa;
use crate::core::required_sgpa::compute_required_sgpa;
use crate::core::validation::{validate_cgpa_request, validate_required_sgpa_request};
use crate::domain::model::CalculationResult;
use crate::utils::error::{GpaError, Result};
use serde_json::Value;

/// Validate-then-compute entry point shared by the HTTP handlers and the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

impl Calculator {
    pub fn new() -> Self {
        Self
    }

    pub fn cgpa(&self, input: &Value) -> Result<CalculationResult> {
        let request = validate_cgpa_request(input).map_err(|e| {
            tracing::warn!("CGPA request rejected: {}", e);
            GpaError::from(e)
        })?;

        tracing::debug!("Validated {} semester(s)", request.semesters().len());
        let result = compute_cgpa(request.semesters())?;
        tracing::info!("CGPA calculated: {:.2}", result.value());
        Ok(result)
    }

    pub fn required_sgpa(&self, input: &Value) -> Result<CalculationResult> {
        let request = validate_required_sgpa_request(input).map_err(|e| {
            tracing::warn!("Required-SGPA request rejected: {}", e);
            GpaError::from(e)
        })?;

        tracing::debug!(
            "Validated {} completed semester(s), target CGPA {}",
            request.completed.len(),
            request.expected_cgpa
        );
        let result = compute_required_sgpa(&request)?;
        tracing::info!("Required SGPA calculated: {:.2}", result.value());
        Ok(result)
    }
}
