use super::commands::LogFormat;
use anyhow::Result;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logging(verbose: bool, log_format: LogFormat) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let fmt_layer = match log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))
}

pub fn print_info() {
    println!("Budgen v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("Authors: {}", env!("CARGO_PKG_AUTHORS"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
    println!();
    println!("Commands:");
    println!("  serve   Run the /analizar HTTP service");
    println!("  report  Turn an expense sheet into an HTML report");
    println!("  check   Test the configured LLM provider credentials");
}

/// Block until the user presses Enter, so a double-clicked console stays open.
pub fn pause_for_acknowledgment() {
    print!("\nPresiona Enter para salir.");
    io::stdout().flush().ok();
    let mut line = String::new();
    // A closed stdin just ends the wait.
    io::stdin().lock().read_line(&mut line).ok();
}
