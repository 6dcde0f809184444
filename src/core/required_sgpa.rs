use crate::core::cgpa::weighted_sum;
use crate::domain::model::{CalculationResult, RequiredSgpaRequest};
use crate::utils::error::CalculationError;

/// SGPA needed over the future semesters for the program to end at
/// `expected_cgpa`.
///
/// The result is not clamped to the SGPA scale: a value above 10 means the
/// target is out of reach, a negative one means it is already secured.
pub fn compute_required_sgpa(
    request: &RequiredSgpaRequest,
) -> Result<CalculationResult, CalculationError> {
    let completed_credits: u64 = request
        .completed
        .iter()
        .map(|r| u64::from(r.credits()))
        .sum();
    let completed_weighted = weighted_sum(&request.completed);

    let target_weighted_total = request.expected_cgpa * request.total_program_credits as f64;
    let remaining_weighted = target_weighted_total - completed_weighted;

    if request.future_semester_credits <= 0 {
        return Err(CalculationError::NonPositiveFutureCredits);
    }

    let required = remaining_weighted / request.future_semester_credits as f64;
    if !required.is_finite() {
        tracing::warn!(required, "Required SGPA overflowed");
        return Err(CalculationError::NonFiniteResult);
    }
    tracing::debug!(
        completed_credits,
        remaining_weighted,
        future_semester_credits = request.future_semester_credits,
        required,
        "Computed required SGPA"
    );

    Ok(CalculationResult::rounded(required))
}
