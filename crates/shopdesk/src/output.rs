//! Output formatting: table, JSON, YAML, plain.
//!
//! Records are schemaless JSON, so tables are built column-by-column with
//! `tabled::builder::Builder` instead of a `Tabled` derive.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use shopdesk_core::ListPage;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

/// Cells longer than this are cut with an ellipsis.
const MAX_CELL_WIDTH: usize = 48;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Green for good news, red for bad, plain when color is off.
pub fn status_label(text: &str, ok: bool, color: bool) -> String {
    match (color, ok) {
        (false, _) => text.to_owned(),
        (true, true) => text.green().to_string(),
        (true, false) => text.red().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a page of JSON records.
///
/// - `table`: one column per field, in first-seen order across records
/// - `json` / `json-compact` / `yaml`: the records as-is
/// - `plain`: each record's `id`, one per line
pub fn render_records(format: OutputFormat, records: &[Value]) -> String {
    match format {
        OutputFormat::Table => records_table(records),
        OutputFormat::Json => render_json_pretty(records),
        OutputFormat::JsonCompact => render_json_compact(records),
        OutputFormat::Yaml => render_yaml(records),
        OutputFormat::Plain => records.iter().map(record_id).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a list page. Tables and plain show the records; structured
/// formats keep the `{data, total}` envelope.
pub fn render_page(format: OutputFormat, page: &ListPage<Value>) -> String {
    match format {
        OutputFormat::Table | OutputFormat::Plain => render_records(format, &page.data),
        OutputFormat::Json => render_json_pretty(page),
        OutputFormat::JsonCompact => render_json_compact(page),
        OutputFormat::Yaml => render_yaml(page),
    }
}

/// Render a single JSON record; tables show it as field/value pairs.
pub fn render_record(format: OutputFormat, record: &Value) -> String {
    match format {
        OutputFormat::Table => match record {
            Value::Object(map) => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, value) in map {
                    builder.push_record([key.clone(), cell(value)]);
                }
                builder.build().with(Style::rounded()).to_string()
            }
            other => cell(other),
        },
        OutputFormat::Json => render_json_pretty(record),
        OutputFormat::JsonCompact => render_json_compact(record),
        OutputFormat::Yaml => render_yaml(record),
        OutputFormat::Plain => record_id(record),
    }
}

/// Render typed rows that derive `Tabled`.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serializable item; `detail_fn` builds the table view.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn records_table(records: &[Value]) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }
    }
    if columns.is_empty() {
        return if records.is_empty() {
            "(no records)".into()
        } else {
            records.iter().map(cell).collect::<Vec<_>>().join("\n")
        };
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().copied());
    for record in records {
        builder.push_record(
            columns
                .iter()
                .map(|col| record.get(*col).map(cell).unwrap_or_default()),
        );
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Scalars print bare; nested values print as compact JSON.
fn cell(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => render_json_compact(value),
    };
    truncate(text)
}

fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text;
    }
    let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

fn record_id(record: &Value) -> String {
    match record.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(id) if !id.is_null() => id.to_string(),
        _ => render_json_compact(record),
    }
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// Compact single-line JSON.
pub(crate) fn render_json_compact<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

/// YAML output.
pub(crate) fn render_yaml<T: Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn table_columns_follow_first_seen_order() {
        let out = records_table(&[
            json!({"id": 1, "name": "Boots"}),
            json!({"id": 2, "price": 9.5}),
        ]);
        let header = out.lines().nth(1).unwrap_or_default();
        let id = header.find("id").unwrap_or(usize::MAX);
        let name = header.find("name").unwrap_or(usize::MAX);
        let price = header.find("price").unwrap_or(usize::MAX);
        assert!(id < name && name < price, "{header}");
    }

    #[test]
    fn plain_prints_ids() {
        let out = render_records(OutputFormat::Plain, &[json!({"id": 3}), json!({"id": "a-1"})]);
        assert_eq!(out, "3\na-1");
    }

    #[test]
    fn long_cells_are_cut() {
        let text = cell(&json!("x".repeat(100)));
        assert_eq!(text.chars().count(), MAX_CELL_WIDTH);
        assert!(text.ends_with('…'));
    }

    #[test]
    fn empty_page_says_so() {
        assert_eq!(render_records(OutputFormat::Table, &[]), "(no records)");
    }
}
