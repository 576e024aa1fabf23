use anyhow::Result;
use crate::cli::utils::pause_for_acknowledgment;
use crate::report::{generate_report, ReportJob};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;

pub async fn handle_report_command(
    input: PathBuf,
    template: Option<PathBuf>,
    output: PathBuf,
    server_url: String,
    no_pause: bool,
    timeout: u64,
) -> Result<()> {
    let job = ReportJob {
        input,
        template,
        output,
        server_url,
        timeout: Duration::from_secs(timeout),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Analizando {} ...", job.input.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = generate_report(&job).await;
    spinner.finish_and_clear();

    let result = match outcome {
        Ok(summary) => {
            println!(
                "{} Reporte generado en {} ({} gastos)",
                "✔".green(),
                summary.output.display().to_string().bold(),
                summary.expense_count
            );
            Ok(())
        }
        Err(e) if e.is_connection() => {
            error!(error = %e, "Analysis service unreachable");
            println!(
                "{} No se pudo conectar con el servicio de análisis en {}.",
                "✘".red(),
                job.server_url
            );
            println!("  Verifica que el servidor esté en ejecución (budgen serve).");
            Err(e.into())
        }
        Err(e) => {
            error!(error = %e, "Report generation failed");
            println!("{} No se pudo generar el reporte: {}", "✘".red(), e);
            Err(e.into())
        }
    };

    if !no_pause {
        pause_for_acknowledgment();
    }

    result
}
