use crate::domain::model::{CalculationResult, SemesterRecord};
use crate::utils::error::CalculationError;

/// Credit-weighted mean of the semesters' SGPAs, rounded to two places.
///
/// Safe to call on unvalidated input: an empty slice reports
/// [`CalculationError::ZeroTotalCredits`] instead of dividing by zero.
pub fn compute_cgpa(records: &[SemesterRecord]) -> Result<CalculationResult, CalculationError> {
    let total_credits: u64 = records.iter().map(|r| u64::from(r.credits())).sum();
    let weighted = weighted_sum(records);

    if total_credits == 0 {
        return Err(CalculationError::ZeroTotalCredits);
    }

    let cgpa = weighted / total_credits as f64;
    tracing::debug!(
        semesters = records.len(),
        total_credits,
        cgpa,
        "Computed CGPA"
    );

    Ok(CalculationResult::rounded(cgpa))
}

/// Σ sgpa·credits, added in sorted order so the float result does not depend
/// on the order the records arrived in.
pub(crate) fn weighted_sum(records: &[SemesterRecord]) -> f64 {
    let mut products: Vec<f64> = records.iter().map(SemesterRecord::weighted).collect();
    products.sort_by(f64::total_cmp);
    products.iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sgpa: f64, credits: i64) -> SemesterRecord {
        SemesterRecord::try_new(sgpa, credits).unwrap()
    }

    #[test]
    fn test_weighted_mean() {
        let records = [record(8.0, 20), record(9.0, 10)];
        assert_eq!(compute_cgpa(&records).unwrap().value(), 8.33);
    }

    #[test]
    fn test_single_record_is_its_own_sgpa() {
        for sgpa in [0.0, 4.0, 7.456, 9.999, 10.0] {
            let result = compute_cgpa(&[record(sgpa, 17)]).unwrap();
            assert_eq!(result.value(), CalculationResult::rounded(sgpa).value());
        }
    }

    #[test]
    fn test_single_record_tie_rounds_to_even() {
        assert_eq!(compute_cgpa(&[record(7.125, 20)]).unwrap().value(), 7.12);
        assert_eq!(compute_cgpa(&[record(9.875, 16)]).unwrap().value(), 9.88);
    }

    #[test]
    fn test_order_does_not_matter() {
        let records = vec![
            record(7.25, 22),
            record(9.1, 18),
            record(6.4, 24),
            record(8.75, 20),
            record(5.5, 26),
        ];
        let expected = compute_cgpa(&records).unwrap();

        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(compute_cgpa(&reversed).unwrap(), expected);

        let mut rotated = records.clone();
        rotated.rotate_left(2);
        assert_eq!(compute_cgpa(&rotated).unwrap(), expected);
    }

    #[test]
    fn test_result_within_sgpa_bounds() {
        let records = [record(6.2, 21), record(9.8, 3), record(7.0, 30)];
        let cgpa = compute_cgpa(&records).unwrap().value();
        assert!((6.2..=9.8).contains(&cgpa));
    }

    #[test]
    fn test_empty_input_is_division_error() {
        assert_eq!(compute_cgpa(&[]), Err(CalculationError::ZeroTotalCredits));
    }
}
