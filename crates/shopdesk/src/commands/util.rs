//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use shopdesk_core::{CrudFilter, DEFAULT_PAGE_SIZE, ListQuery, SortOrder};

use crate::cli::{ListArgs, PayloadArgs};
use crate::error::CliError;

/// Spinner on stderr while a request is in flight. Cleared on drop; never
/// shown when stderr isn't a terminal or `--quiet` is set.
pub struct Spinner(Option<ProgressBar>);

impl Spinner {
    pub fn start(message: &str, quiet: bool) -> Self {
        if quiet || !io::stderr().is_terminal() {
            return Self(None);
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_owned());
        pb.enable_steady_tick(Duration::from_millis(80));
        Self(Some(pb))
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(pb) = self.0.take() {
            pb.finish_and_clear();
        }
    }
}

/// Wrap a dialoguer / rpassword failure.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// The request body from `--data` or `--from-file`.
pub fn read_payload(args: &PayloadArgs) -> Result<Value, CliError> {
    match (&args.data, &args.from_file) {
        (Some(inline), _) => parse_json_arg("data", inline),
        (None, Some(path)) => read_json_file(path),
        (None, None) => Err(CliError::Validation {
            field: "data".into(),
            reason: "provide --data or --from-file".into(),
        }),
    }
}

pub fn parse_json_arg(field: &str, raw: &str) -> Result<Value, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Split `key<sep>value`; the key must be non-empty.
pub fn split_pair(field: &str, raw: &str, sep: char) -> Result<(String, String), CliError> {
    match raw.split_once(sep) {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.trim().to_owned()))
        }
        _ => Err(CliError::Validation {
            field: field.into(),
            reason: format!("expected KEY{sep}VALUE, got '{raw}'"),
        }),
    }
}

/// `price:desc` → (`price`, Desc). A bare field sorts ascending.
pub fn parse_sort(raw: &str) -> Result<(String, SortOrder), CliError> {
    let (field, order) = raw.split_once(':').unwrap_or((raw, "asc"));
    if field.is_empty() {
        return Err(CliError::Validation {
            field: "sort".into(),
            reason: format!("missing field in '{raw}'"),
        });
    }
    let order = order.parse::<SortOrder>().map_err(|_| CliError::Validation {
        field: "sort".into(),
        reason: format!("order must be 'asc' or 'desc', got '{order}'"),
    })?;
    Ok((field.to_owned(), order))
}

/// Translate list flags into a query. Without `--page` no pagination is
/// sent beyond the default size.
pub fn build_list_query(args: &ListArgs) -> Result<ListQuery, CliError> {
    let mut query = match (args.page, args.page_size) {
        (Some(page), size) => ListQuery::new().paginate(page, size.unwrap_or(DEFAULT_PAGE_SIZE)),
        (None, Some(size)) => ListQuery::new().page_size(size),
        (None, None) => ListQuery::new(),
    };
    for raw in &args.filter {
        let (field, value) = split_pair("filter", raw, '=')?;
        query = query.filter(CrudFilter::eq(field, value));
    }
    for raw in &args.sort {
        let (field, order) = parse_sort(raw)?;
        query = query.sort(field, order);
    }
    Ok(query)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn list_args(page: Option<u32>, filter: &[&str], sort: &[&str]) -> ListArgs {
        ListArgs {
            resource: "orders".into(),
            page,
            page_size: None,
            filter: filter.iter().map(|s| (*s).to_owned()).collect(),
            sort: sort.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn list_flags_become_query_params() {
        let query = build_list_query(&list_args(
            Some(3),
            &["status=PAID"],
            &["createdAt:desc", "id"],
        ))
        .unwrap();
        let params = query.to_params();
        assert!(params.contains(&("page".into(), "2".into())));
        assert!(params.contains(&("size".into(), "10".into())));
        assert!(params.contains(&("status".into(), "PAID".into())));
        assert!(params.contains(&("sort".into(), "createdAt,desc&id,asc".into())));
    }

    #[test]
    fn bad_pairs_are_rejected() {
        assert!(split_pair("filter", "novalue", '=').is_err());
        assert!(split_pair("filter", "=x", '=').is_err());
        assert_eq!(
            split_pair("header", "X-Trace: abc", ':').unwrap(),
            ("X-Trace".to_owned(), "abc".to_owned())
        );
    }

    #[test]
    fn sort_order_must_be_known() {
        assert!(parse_sort("price:sideways").is_err());
        assert!(parse_sort(":asc").is_err());
    }
}
