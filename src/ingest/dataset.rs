use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// One spreadsheet row: header name to cell value. Empty cells are absent.
pub type Row = Map<String, Value>;

/// The parsed contents of an uploaded file's first sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    /// File name the rows were read from, for display only.
    pub source_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(source_name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            source_name: source_name.into(),
            columns,
            rows,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows, or all of them when there are fewer.
    pub fn sample(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Distinct string values of a column within the first `n` rows.
    pub fn sampled_strings(&self, column: &str, n: usize) -> Vec<&str> {
        self.sample(n)
            .iter()
            .filter_map(|row| row.get(column).and_then(Value::as_str))
            .collect()
    }
}

/// Make header names usable as object keys: blank headers become
/// `__EMPTY`, `__EMPTY_1`, ... and repeated names get a `_<n>` suffix.
pub fn unique_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .map(|header| {
            let trimmed = header.as_ref().trim();
            let base = if trimmed.is_empty() { "__EMPTY" } else { trimmed }.to_string();
            let seen = counts.entry(base.clone()).or_insert(0);
            let name = if *seen == 0 {
                base
            } else {
                format!("{}_{}", base, seen)
            };
            *seen += 1;
            name
        })
        .collect()
}

/// Typed value for a text cell. Blank cells yield `None`; integers, decimals
/// and booleans are recognized, everything else stays text. Values with a
/// leading zero such as postal codes are kept as text.
pub fn infer_scalar(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let digits = trimmed.trim_start_matches('-');
    let leading_zero = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");
    if !leading_zero {
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(Value::from(n));
        }
        if trimmed.chars().any(|c| c.is_ascii_digit()) {
            if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
                return Some(Value::Number(n));
            }
        }
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return Some(Value::Bool(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(Value::Bool(false));
    }
    Some(Value::String(raw.to_string()))
}
