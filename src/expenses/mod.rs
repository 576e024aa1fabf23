//! Expense records and validation of the `/analizar` request body.

use crate::llm::prompts::DELIMITER;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single spending line: what it was for and how much it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(rename = "categoria")]
    pub category: String,

    #[serde(rename = "monto")]
    pub amount: f64,
}

impl ExpenseRecord {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// Ordered list of expenses sent by the report client.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisRequest {
    #[serde(rename = "gastos")]
    pub expenses: Vec<ExpenseRecord>,
}

/// Reasons a request body cannot become an [`AnalysisRequest`]
#[derive(Debug, Error, PartialEq)]
pub enum ExpenseError {
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("request body must be an object with a \"gastos\" list")]
    MissingExpenses,

    #[error("gastos[{index}]: \"categoria\" is missing or empty")]
    MissingCategory { index: usize },

    #[error("gastos[{index}]: \"categoria\" contains the reserved section marker")]
    ReservedMarker { index: usize },

    #[error("gastos[{index}]: \"monto\" is missing or not a number")]
    InvalidAmount { index: usize },
}

impl AnalysisRequest {
    pub fn new(expenses: Vec<ExpenseRecord>) -> Self {
        Self { expenses }
    }

    /// Parse and validate a raw JSON body.
    pub fn from_json(body: &[u8]) -> Result<Self, ExpenseError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ExpenseError::MalformedBody(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validate an already-decoded JSON document.
    ///
    /// Records keep the order in which they were received. Amounts given as
    /// numeric strings are coerced; anything else non-numeric is rejected.
    pub fn from_value(value: &Value) -> Result<Self, ExpenseError> {
        let items = value
            .get("gastos")
            .and_then(Value::as_array)
            .ok_or(ExpenseError::MissingExpenses)?;

        let expenses = items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_record(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { expenses })
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

fn parse_record(index: usize, item: &Value) -> Result<ExpenseRecord, ExpenseError> {
    let category = item
        .get("categoria")
        .and_then(Value::as_str)
        .filter(|c| !c.trim().is_empty())
        .ok_or(ExpenseError::MissingCategory { index })?;

    if category.contains(DELIMITER) {
        return Err(ExpenseError::ReservedMarker { index });
    }

    let amount = item
        .get("monto")
        .and_then(coerce_amount)
        .ok_or(ExpenseError::InvalidAmount { index })?;

    Ok(ExpenseRecord::new(category, amount))
}

fn coerce_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
