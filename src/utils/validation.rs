use crate::utils::error::{GpaError, Result};
use url::Url;

/// Startup-time checks for configuration values.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> GpaError {
    GpaError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// CORS origins must be bare http(s) origins.
pub fn validate_origin(field_name: &str, origin: &str) -> Result<()> {
    if origin.is_empty() {
        return Err(invalid(field_name, origin, "Origin cannot be empty"));
    }

    let url = Url::parse(origin)
        .map_err(|e| invalid(field_name, origin, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(invalid(
                field_name,
                origin,
                format!("Unsupported URL scheme: {}", scheme),
            ))
        }
    }

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field_name,
            origin,
            "Origin must not contain a path, query or fragment",
        ));
    }

    Ok(())
}

pub fn validate_input_file(
    field_name: &str,
    path: &str,
    allowed_extensions: &[&str],
) -> Result<()> {
    validate_non_empty_string(field_name, path)?;

    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| invalid(field_name, path, "File has no extension"))?;

    if !allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    {
        return Err(invalid(
            field_name,
            path,
            format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        ));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
