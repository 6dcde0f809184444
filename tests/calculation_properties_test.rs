use gpa_service::utils::error::ErrorKind;
use gpa_service::{
    compute_cgpa, compute_required_sgpa, validate_cgpa_request, validate_required_sgpa_request,
    CalculationError, CalculationResult, RequiredSgpaRequest, SemesterRecord,
};
use serde_json::json;

fn record(sgpa: f64, credits: i64) -> SemesterRecord {
    SemesterRecord::try_new(sgpa, credits).unwrap()
}

/// Deterministic spread of plausible semesters, no RNG needed.
fn sample_semesters(n: usize, seed: u64) -> Vec<SemesterRecord> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let sgpa = 4.0 + ((state >> 33) % 601) as f64 / 100.0;
            let credits = 12 + ((state >> 17) % 15) as i64;
            record(sgpa, credits)
        })
        .collect()
}

#[test]
fn test_cgpa_lies_between_min_and_max_sgpa() {
    for seed in 1..50 {
        let records = sample_semesters(8, seed);
        let min = records.iter().map(|r| r.sgpa()).fold(f64::INFINITY, f64::min);
        let max = records.iter().map(|r| r.sgpa()).fold(f64::NEG_INFINITY, f64::max);

        let cgpa = compute_cgpa(&records).unwrap().value();
        let lower = CalculationResult::rounded(min).value();
        let upper = CalculationResult::rounded(max).value();
        assert!(
            (lower..=upper).contains(&cgpa),
            "cgpa {cgpa} outside [{lower}, {upper}] for seed {seed}"
        );
    }
}

#[test]
fn test_cgpa_is_permutation_invariant() {
    for seed in 1..30 {
        let records = sample_semesters(6, seed);
        let expected = compute_cgpa(&records).unwrap();

        let mut shuffled = records.clone();
        shuffled.reverse();
        shuffled.swap(0, 3);
        assert_eq!(compute_cgpa(&shuffled).unwrap(), expected, "seed {seed}");
    }
}

#[test]
fn test_single_record_cgpa() {
    assert_eq!(compute_cgpa(&[record(7.777, 4)]).unwrap().value(), 7.78);
    assert_eq!(compute_cgpa(&[record(10.0, 1)]).unwrap().value(), 10.0);
    assert_eq!(compute_cgpa(&[record(0.0, 1)]).unwrap().value(), 0.0);
}

#[test]
fn test_documented_examples() {
    let request = validate_cgpa_request(&json!({
        "semesters": [{"sgpa": 8, "credits": 20}, {"sgpa": 9, "credits": 10}]
    }))
    .unwrap();
    assert_eq!(compute_cgpa(request.semesters()).unwrap().value(), 8.33);

    let request = validate_required_sgpa_request(&json!({
        "completed_semesters": [{"sgpa": 8, "credits": 20}],
        "total_program_credits": 40,
        "future_semester_credits": 20,
        "expected_cgpa": 8.5
    }))
    .unwrap();
    assert_eq!(compute_required_sgpa(&request).unwrap().value(), 9.0);
}

#[test]
fn test_record_boundaries() {
    for (sgpa, credits, kind) in [
        (-0.1, 10, ErrorKind::Range),
        (10.1, 10, ErrorKind::Range),
        (3.5, 31, ErrorKind::Inconsistency),
    ] {
        let err = validate_cgpa_request(&json!({"semesters": [{"sgpa": sgpa, "credits": credits}]}))
            .unwrap_err();
        assert!(err.has(kind), "{sgpa}/{credits} should fail with {kind:?}");
    }

    for (sgpa, credits) in [(0.0, 1), (10.0, 1), (3.5, 30)] {
        assert!(
            validate_cgpa_request(&json!({"semesters": [{"sgpa": sgpa, "credits": credits}]}))
                .is_ok(),
            "{sgpa}/{credits} should be accepted"
        );
    }
}

#[test]
fn test_empty_semesters_rejected_before_aggregation() {
    let err = validate_cgpa_request(&json!({"semesters": []})).unwrap_err();
    assert!(err.has(ErrorKind::EmptyInput));
}

#[test]
fn test_zero_total_credits_standalone() {
    assert_eq!(compute_cgpa(&[]), Err(CalculationError::ZeroTotalCredits));
}

#[test]
fn test_zero_future_credits_standalone() {
    let request = RequiredSgpaRequest {
        completed: sample_semesters(4, 7),
        total_program_credits: 160,
        future_semester_credits: 0,
        expected_cgpa: 8.0,
    };
    assert_eq!(
        compute_required_sgpa(&request),
        Err(CalculationError::NonPositiveFutureCredits)
    );
}
