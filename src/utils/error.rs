use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Key under which errors that do not belong to a single field are reported.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of an offending value inside the request body, e.g. `semesters[1].sgpa`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(name.to_string()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn key(segment: &PathSegment) -> String {
        match segment {
            PathSegment::Field(name) => name.clone(),
            PathSegment::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(NON_FIELD_ERRORS);
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Missing,
    InvalidFormat,
    Range,
    Inconsistency,
    EmptyInput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub path: FieldPath,
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(path: FieldPath, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }
}

/// Every problem found in one request, in discovery order.
#[derive(Error, Debug, Clone, Default, PartialEq)]
#[error("Validation failed with {} error(s)", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn add(&mut self, path: FieldPath, kind: ErrorKind, message: impl Into<String>) {
        self.push(FieldError::new(path, kind, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has(&self, kind: ErrorKind) -> bool {
        self.0.iter().any(|e| e.kind == kind)
    }

    /// Returns `Ok(value)` when nothing was collected.
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// Nested mapping of field name / list index to messages, e.g.
    /// `{"semesters": {"0": {"sgpa": ["SGPA must be between 0 and 10."]}}}`.
    pub fn details(&self) -> Value {
        let mut root = Map::new();
        for error in &self.0 {
            let mut keys: Vec<String> = error.path.segments().iter().map(FieldPath::key).collect();
            if keys.is_empty() {
                keys.push(NON_FIELD_ERRORS.to_string());
            }
            insert_message(&mut root, &keys, &error.message);
        }
        Value::Object(root)
    }
}

fn insert_message(map: &mut Map<String, Value>, keys: &[String], message: &str) {
    let Some((first, rest)) = keys.split_first() else {
        return;
    };

    if rest.is_empty() {
        let entry = map
            .entry(first.clone())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(messages) = entry {
            messages.push(Value::String(message.to_string()));
        }
        return;
    }

    let entry = map
        .entry(first.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(child) = entry {
        insert_message(child, rest, message);
    }
}

/// Errors raised by the calculators after validation has passed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationError {
    #[error("Total credits cannot be zero.")]
    ZeroTotalCredits,

    #[error("Future semester credits must be greater than zero.")]
    NonPositiveFutureCredits,

    #[error("Result is too large to represent.")]
    NonFiniteResult,
}

#[derive(Error, Debug)]
pub enum GpaError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Calculation failed: {0}")]
    Calculation(#[from] CalculationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {reason} (got '{value}')")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Storage,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GpaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GpaError::Validation(_) | GpaError::Calculation(_) | GpaError::CsvError(_) => {
                ErrorCategory::Input
            }
            GpaError::SerializationError(_) => ErrorCategory::Input,
            GpaError::ConfigError { .. } | GpaError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            GpaError::StorageError { .. } => ErrorCategory::Storage,
            GpaError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GpaError::Validation(errors) => {
                let lines: Vec<String> = errors
                    .errors()
                    .iter()
                    .map(|e| format!("{}: {}", e.path, e.message))
                    .collect();
                format!("Input is invalid:\n  {}", lines.join("\n  "))
            }
            GpaError::Calculation(e) => e.to_string(),
            GpaError::CsvError(e) => format!("Could not read CSV input: {}", e),
            GpaError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GpaError::Validation(_) => "Fix the listed fields and try again",
            GpaError::Calculation(CalculationError::ZeroTotalCredits) => {
                "Provide at least one semester with positive credits"
            }
            GpaError::Calculation(CalculationError::NonPositiveFutureCredits) => {
                "Pass a future semester credit count greater than zero"
            }
            GpaError::Calculation(CalculationError::NonFiniteResult) => {
                "Check the program credits and target CGPA for unrealistic values"
            }
            GpaError::CsvError(_) => "Make sure the file has a 'sgpa,credits' header row",
            GpaError::SerializationError(_) => "Check that the input is valid JSON",
            GpaError::ConfigError { .. } | GpaError::InvalidConfigValueError { .. } => {
                "Check the configuration file and GPA_* environment variables"
            }
            GpaError::StorageError { .. } => "Retry the request later",
            GpaError::IoError(_) => "Check that the path exists and is readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, GpaError>;
