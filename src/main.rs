use clap::Parser;
use gpa_service::adapters::csv_input;
use gpa_service::domain::model::{CalculationResult, MAX_SGPA, MIN_SGPA};
use gpa_service::utils::error::{ErrorSeverity, Result};
use gpa_service::utils::{logger, validation::Validate};
use gpa_service::{start_server, Calculator, CliConfig, Command, ServerConfig};
use serde_json::json;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    match &cli.command {
        Command::Serve { config, port } => {
            let mut server_config = ServerConfig::load(config.as_deref())?;
            if let Some(port) = port {
                server_config.server.port = *port;
            }

            logger::init_server_logger(server_config.logging.format, cli.verbose);
            tracing::info!("Starting gpa-service v{}", env!("CARGO_PKG_VERSION"));
            if cli.verbose {
                tracing::debug!("Server config: {:?}", server_config);
            }

            server_config.validate()?;
            tracing::info!("✅ Configuration validated");

            start_server(server_config).await
        }
        Command::Cgpa { input } => {
            logger::init_cli_logger(cli.verbose);
            cli.validate()?;

            let semesters = csv_input::load_semesters(input)?;
            let result = Calculator::new().cgpa(&json!({ "semesters": semesters }))?;

            println!("CGPA: {:.2}", result.value());
            Ok(())
        }
        Command::RequiredSgpa {
            input,
            total_program_credits,
            future_semester_credits,
            expected_cgpa,
        } => {
            logger::init_cli_logger(cli.verbose);
            cli.validate()?;

            let completed = csv_input::load_semesters(input)?;
            let result = Calculator::new().required_sgpa(&json!({
                "completed_semesters": completed,
                "total_program_credits": total_program_credits,
                "future_semester_credits": future_semester_credits,
                "expected_cgpa": expected_cgpa,
            }))?;

            println!("Required SGPA: {:.2}", result.value());
            report_plausibility(result);
            Ok(())
        }
    }
}

/// The solver does not clamp its output; say what an off-scale answer means.
fn report_plausibility(result: CalculationResult) {
    if result.value() > MAX_SGPA {
        println!("⚠️  The target CGPA cannot be reached with the remaining credits.");
    } else if result.value() < MIN_SGPA {
        println!("✅ The target CGPA is already secured.");
    }
}
