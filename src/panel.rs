//! Metadata panel ("Demographic Info")

use crate::dataset::Metadata;
use crate::view::Surface;
use serde::Serialize;
use serde_json::Value;

pub const NO_METADATA: &str = "No metadata found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// `key: value`
    Entry,
    /// Shown as a heading when there is nothing to list
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelLine {
    pub kind: LineKind,
    pub text: String,
}

impl PanelLine {
    pub fn entry(key: &str, value: &str) -> Self {
        Self {
            kind: LineKind::Entry,
            text: format!("{}: {}", key, value),
        }
    }

    pub fn fallback() -> Self {
        Self {
            kind: LineKind::Fallback,
            text: NO_METADATA.to_string(),
        }
    }
}

/// Lines for a metadata record, in key order, or the single fallback line.
pub fn lines(metadata: Option<&Metadata>) -> Vec<PanelLine> {
    match metadata {
        Some(md) => md
            .fields()
            .iter()
            .map(|(k, v)| PanelLine::entry(k, &display_value(v)))
            .collect(),
        None => vec![PanelLine::fallback()],
    }
}

/// Clear the panel at `target` and write the lines for `metadata`.
pub fn display<S: Surface + ?Sized>(surface: &mut S, target: &str, metadata: Option<&Metadata>) {
    surface.replace_panel(target, lines(metadata));
}

/// Stringify a value the way the page would show it: strings without
/// quotes, integral numbers without a fraction, arrays comma-joined.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if n.is_f64() {
                n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
            } else {
                n.to_string()
            }
        }
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
