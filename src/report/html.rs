use super::ReportResult;
use crate::analysis::AnalysisResult;
use crate::expenses::ExpenseRecord;
use chrono::Local;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "plantilla_presupuesto.html";

/// Template bundled with the binary, used when no template path is given
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/plantilla_presupuesto.html");

/// HTML report generator backed by a single Tera template
///
/// The template receives:
/// - `datos_gastos_json`: the expenses as a JSON array, safe to embed in a `<script>`
/// - `analisis_detallado` and `estrategias_control`: provider HTML, inserted as-is
/// - `generated_at`: local timestamp of the render
pub struct HtmlReporter {
    tera: Tera,
}

impl HtmlReporter {
    pub fn new() -> ReportResult<Self> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    pub fn from_file(path: &Path) -> ReportResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_source(&source)
    }

    pub fn from_source(source: &str) -> ReportResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source)?;
        Ok(Self { tera })
    }

    pub fn render(&self, expenses: &[ExpenseRecord], analysis: &AnalysisResult) -> ReportResult<String> {
        let mut context = Context::new();
        context.insert("datos_gastos_json", &expenses_json(expenses)?);
        context.insert("analisis_detallado", &analysis.detailed_analysis);
        context.insert("estrategias_control", &analysis.control_strategies);
        context.insert(
            "generated_at",
            &Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        );

        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }

    /// Render the report and write it to `output_path`, creating parent directories.
    pub fn save_report(
        &self,
        expenses: &[ExpenseRecord],
        analysis: &AnalysisResult,
        output_path: &Path,
    ) -> ReportResult<()> {
        let html = self.render(expenses, analysis)?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, html)?;
        Ok(())
    }
}

/// Pretty JSON with `</` escaped so a category can't close the script tag.
fn expenses_json(expenses: &[ExpenseRecord]) -> ReportResult<String> {
    let json = serde_json::to_string_pretty(expenses)?;
    Ok(json.replace("</", "<\\/"))
}
