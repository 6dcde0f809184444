use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GpaError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ListenConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    pub feedback: FeedbackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            max_age_seconds: 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}', expected compact or json", other)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub max_comment_length: usize,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            max_comment_length: 2000,
        }
    }
}

impl ServerConfig {
    /// Reads and parses a TOML file, substituting `${VAR}` references first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GpaError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GpaError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// File (if any), then `GPA_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => {
                tracing::info!("No configuration file given, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("GPA_HOST") {
            tracing::debug!("GPA_HOST override: {}", host);
            self.server.host = host;
        }

        if let Some(port) = lookup("GPA_PORT") {
            self.server.port = port.trim().parse().map_err(|e| GpaError::InvalidConfigValueError {
                field: "GPA_PORT".to_string(),
                value: port.clone(),
                reason: format!("{}", e),
            })?;
            tracing::debug!("GPA_PORT override: {}", self.server.port);
        }

        if let Some(format) = lookup("GPA_LOG_FORMAT") {
            self.logging.format =
                format
                    .parse()
                    .map_err(|reason| GpaError::InvalidConfigValueError {
                        field: "GPA_LOG_FORMAT".to_string(),
                        value: format.clone(),
                        reason,
                    })?;
        }

        Ok(())
    }
}

impl ConfigProvider for ServerConfig {
    fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn allowed_origins(&self) -> &[String] {
        &self.cors.allowed_origins
    }

    fn cors_max_age(&self) -> Duration {
        Duration::from_secs(self.cors.max_age_seconds)
    }

    fn max_comment_length(&self) -> usize {
        self.feedback.max_comment_length
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_positive_number("server.port", usize::from(self.server.port), 1)?;

        for origin in &self.cors.allowed_origins {
            validation::validate_origin("cors.allowed_origins", origin)?;
        }
        validation::validate_range("cors.max_age_seconds", self.cors.max_age_seconds, 0, 86_400)?;

        validation::validate_positive_number(
            "feedback.max_comment_length",
            self.feedback.max_comment_length,
            1,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[server]
port = 9100

[logging]
format = "json"
"#;

        let config = ServerConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.max_comment_length(), 2000);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GPA_TEST_FRONTEND_ORIGIN", "https://study.example.com");

        let toml_content = r#"
[cors]
allowed_origins = ["${GPA_TEST_FRONTEND_ORIGIN}"]
"#;

        let config = ServerConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.allowed_origins(), ["https://study.example.com"]);

        std::env::remove_var("GPA_TEST_FRONTEND_ORIGIN");
    }

    #[test]
    fn test_unknown_env_var_is_left_in_place() {
        let toml_content = r#"
[server]
host = "${GPA_TEST_SURELY_UNSET_VARIABLE}"
"#;
        let config = ServerConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.server.host, "${GPA_TEST_SURELY_UNSET_VARIABLE}");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [("GPA_PORT", "8088"), ("GPA_LOG_FORMAT", "JSON")]
            .into_iter()
            .collect();

        let mut config = ServerConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_bad_port_override_is_rejected() {
        let mut config = ServerConfig::default();
        let result =
            config.apply_overrides(|key| (key == "GPA_PORT").then(|| "eighty".to_string()));
        assert!(matches!(
            result,
            Err(GpaError::InvalidConfigValueError { ref field, .. }) if field == "GPA_PORT"
        ));
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[cors]
allowed_origins = ["not a url"]
"#;
        let config = ServerConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.feedback.max_comment_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = ServerConfig::from_toml_str("[server\nport = 1");
        assert!(matches!(result, Err(GpaError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8123

[feedback]
max_comment_length = 500
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ServerConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8123");
        assert_eq!(config.max_comment_length(), 500);
    }
}
