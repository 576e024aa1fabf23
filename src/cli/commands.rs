use crate::llm::CredentialMode;
use crate::report::DEFAULT_SERVER_URL;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "budgen",
    about = "Spending report generator with LLM-backed financial analysis",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the expense analysis HTTP service
    Serve {
        /// Address to bind
        #[arg(long, env = "BUDGEN_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[arg(short, long, env = "BUDGEN_PORT", default_value = "8000")]
        port: u16,

        /// When to read the provider API key
        #[arg(long, value_enum, env = "BUDGEN_CREDENTIAL_MODE", default_value = "startup")]
        credential_mode: CredentialMode,
    },

    /// Build an HTML spending report from an expense sheet
    Report {
        /// Expense sheet as CSV with Categoria and Monto columns (export .xlsx sheets to CSV first)
        #[arg(short, long, default_value = "gastos.csv")]
        input: PathBuf,

        /// Tera template for the report (defaults to the built-in one)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Where to write the HTML report
        #[arg(short, long, default_value = "reporte_final.html")]
        output: PathBuf,

        /// Analysis endpoint
        #[arg(long, env = "BUDGEN_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
        server_url: String,

        /// Exit without waiting for Enter
        #[arg(long)]
        no_pause: bool,

        /// Request timeout in seconds
        #[arg(long, default_value = "300")]
        timeout: u64,
    },

    /// Verify the configured LLM provider accepts the API key
    Check,

    /// Show information about Budgen
    Info,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults() {
        let cli = Cli::try_parse_from(["budgen", "report", "--no-pause"]).unwrap();
        match cli.command {
            Commands::Report {
                input,
                template,
                output,
                no_pause,
                timeout,
                ..
            } => {
                assert_eq!(input, PathBuf::from("gastos.csv"));
                assert!(template.is_none());
                assert_eq!(output, PathBuf::from("reporte_final.html"));
                assert!(no_pause);
                assert_eq!(timeout, 300);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "budgen",
            "--log-format",
            "json",
            "serve",
            "--port",
            "9000",
            "--credential-mode",
            "per-request",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Serve {
                port,
                credential_mode,
                ..
            } => {
                assert_eq!(port, 9000);
                assert_eq!(credential_mode, CredentialMode::PerRequest);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_input_help_names_csv_format() {
        use clap::CommandFactory;

        let cli = Cli::command();
        let report = cli.find_subcommand("report").unwrap();
        let input = report
            .get_arguments()
            .find(|arg| arg.get_id() == "input")
            .unwrap();

        assert!(input.get_help().unwrap().to_string().contains("CSV"));
    }

    #[test]
    fn test_unknown_credential_mode_is_rejected() {
        assert!(Cli::try_parse_from(["budgen", "serve", "--credential-mode", "lazy"]).is_err());
    }
}
