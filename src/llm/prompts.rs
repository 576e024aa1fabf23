use crate::expenses::{AnalysisRequest, ExpenseRecord};

/// Marker the provider must reproduce exactly once between the two report sections.
pub const DELIMITER: &str = "---SEPARADOR---";

/// Monthly expense analysis prompt.
/// Placeholders: `{gastos}` (formatted expense list) and `{separador}` (the delimiter line).
pub const EXPENSE_ANALYSIS_PROMPT: &str = "Eres un amigable asesor financiero peruano. \
Tu tarea es analizar la siguiente lista de gastos mensuales y generar un reporte en dos partes, \
usando formato HTML.

Los gastos a analizar son:
{gastos}

Estructura tu respuesta exactamente de la siguiente manera:

**PARTE 1: ANÁLISIS DETALLADO**
Comienza con un saludo cordial y un resumen general de los gastos del mes. Luego, describe los \
gastos más significativos en una lista `<ul>` con elementos `<li>`. Termina con una conclusión \
sobre la salud financiera general.

{separador}

**PARTE 2: ESTRATEGIAS DE CONTROL**
Basado en el análisis anterior, ofrece de 3 a 5 estrategias claras y accionables para controlar \
o reducir los gastos. Usa un tono motivador y presenta las estrategias en una lista ordenada \
`<ol>` con elementos `<li>`.

Escribe la línea separadora que divide ambas partes tal como aparece arriba, una sola vez, \
y no la repitas en ningún otro lugar de tu respuesta.";

/// Minimal prompt used by `budgen check` to verify provider connectivity.
pub const CONNECTION_CHECK_PROMPT: &str =
    "Hola, esto es solo una prueba de conexión. Responde 'OK'.";

/// Prompt text ready to be sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderPrompt {
    text: String,
}

impl ProviderPrompt {
    /// Build the analysis prompt for a request. Deterministic for a given input.
    pub fn build(request: &AnalysisRequest) -> Self {
        // The list goes in last so category text is never scanned for placeholders.
        let text = EXPENSE_ANALYSIS_PROMPT
            .replace("{separador}", DELIMITER)
            .replace("{gastos}", &format_expense_list(&request.expenses));
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// One line per record, in the order given.
pub fn format_expense_list(expenses: &[ExpenseRecord]) -> String {
    expenses
        .iter()
        .map(format_expense_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `- {category}: ${amount}`; whitespace runs in the category collapse to one space.
pub fn format_expense_line(expense: &ExpenseRecord) -> String {
    let category = expense.category.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("- {}: {}", category, format_amount(expense.amount))
}

/// Dollar amount with thousands separators and two decimals, e.g. `$1,234.50`.
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, cents)
}
