use anyhow::Result;
use clap::Parser;
use budgen::cli::commands::{Cli, Commands};
use budgen::cli::handlers::{handle_check_command, handle_report_command, handle_serve_command};
use budgen::cli::utils::{init_logging, print_info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format)?;

    // Execute command
    match cli.command {
        Commands::Serve {
            host,
            port,
            credential_mode,
        } => handle_serve_command(host, port, credential_mode).await,

        Commands::Report {
            input,
            template,
            output,
            server_url,
            no_pause,
            timeout,
        } => handle_report_command(input, template, output, server_url, no_pause, timeout).await,

        Commands::Check => handle_check_command().await,

        Commands::Info => {
            print_info();
            Ok(())
        }
    }
}
