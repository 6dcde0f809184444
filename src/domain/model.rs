use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_SGPA: f64 = 0.0;
pub const MAX_SGPA: f64 = 10.0;

/// SGPA below this with more than `HEAVY_LOAD_CREDITS` is treated as implausible.
pub const LOW_SGPA_THRESHOLD: f64 = 4.0;
pub const HEAVY_LOAD_CREDITS: u32 = 30;

/// One completed semester. Only built through validation, so
/// `0 <= sgpa <= 10` and `credits > 0` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SemesterRecord {
    sgpa: f64,
    credits: u32,
}

impl SemesterRecord {
    pub(crate) fn new_unchecked(sgpa: f64, credits: u32) -> Self {
        Self { sgpa, credits }
    }

    pub fn sgpa(&self) -> f64 {
        self.sgpa
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub(crate) fn weighted(&self) -> f64 {
        self.sgpa * f64::from(self.credits)
    }
}

/// Non-empty list of semesters to aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct CgpaRequest {
    semesters: Vec<SemesterRecord>,
}

impl CgpaRequest {
    pub(crate) fn new_unchecked(semesters: Vec<SemesterRecord>) -> Self {
        Self { semesters }
    }

    pub fn semesters(&self) -> &[SemesterRecord] {
        &self.semesters
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequiredSgpaRequest {
    pub completed: Vec<SemesterRecord>,
    pub total_program_credits: i64,
    pub future_semester_credits: i64,
    pub expected_cgpa: f64,
}

/// Output of both calculators, already rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculationResult {
    value: f64,
}

impl CalculationResult {
    /// Rounds the exact binary value to two places, ties to even, so 7.125
    /// becomes 7.12 and 0.015 (stored just below .015) becomes 0.01.
    pub fn rounded(raw: f64) -> Self {
        let value = format!("{:.2}", raw).parse::<f64>().unwrap_or(raw);
        // avoid reporting "-0.0"
        let value = if value == 0.0 { 0.0 } else { value };
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const DEFAULT_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub user: Option<String>,
    pub comment: String,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: u64,
    pub user: Option<String>,
    pub comment: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}
