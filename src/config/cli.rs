use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "gpa-service")]
#[command(about = "CGPA and required-SGPA calculator with an HTTP API")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Path to TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the listen port from config
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the CGPA of the semesters in a CSV file
    Cgpa {
        /// CSV file with a `sgpa,credits` header
        #[arg(short, long)]
        input: String,
    },

    /// Print the SGPA needed in future semesters to reach a target CGPA
    RequiredSgpa {
        /// CSV file of completed semesters with a `sgpa,credits` header
        #[arg(short, long)]
        input: String,

        #[arg(long)]
        total_program_credits: i64,

        #[arg(long)]
        future_semester_credits: i64,

        #[arg(long)]
        expected_cgpa: f64,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Serve { .. } => Ok(()),
            Command::Cgpa { input } | Command::RequiredSgpa { input, .. } => {
                validation::validate_input_file("input", input, &["csv"])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_required_sgpa_command() {
        let config = CliConfig::try_parse_from([
            "gpa-service",
            "required-sgpa",
            "--input",
            "done.csv",
            "--total-program-credits",
            "160",
            "--future-semester-credits",
            "40",
            "--expected-cgpa",
            "8.5",
            "-v",
        ])
        .unwrap();

        assert!(config.verbose);
        assert!(config.validate().is_ok());
        match config.command {
            Command::RequiredSgpa {
                total_program_credits,
                future_semester_credits,
                expected_cgpa,
                ..
            } => {
                assert_eq!(total_program_credits, 160);
                assert_eq!(future_semester_credits, 40);
                assert_eq!(expected_cgpa, 8.5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_input_must_be_csv() {
        let config = CliConfig::try_parse_from(["gpa-service", "cgpa", "--input", "grades.xlsx"])
            .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serve_port_override() {
        let config = CliConfig::try_parse_from(["gpa-service", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(config.command, Command::Serve { port: Some(9000), .. }));
    }
}
