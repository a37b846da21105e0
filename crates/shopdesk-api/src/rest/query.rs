// List query encoding
//
// Converts 1-based UI pagination, field filters, and sorters into the
// Spring-style query string the backend expects:
// `?page=<0-based>&size=<n>&<field>=<value>&sort=<field>,<order>&...`

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};
use tracing::warn;

/// Page size used when the caller doesn't specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// 1-based pagination as the UI layer sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page, starting at 1. `None` means the first page.
    pub current: Option<u32>,
    /// Records per page. `None` means [`DEFAULT_PAGE_SIZE`].
    pub page_size: Option<u32>,
}

impl Pagination {
    pub fn new(current: u32, page_size: u32) -> Self {
        Self {
            current: Some(current),
            page_size: Some(page_size),
        }
    }

    /// Zero-based page index sent to the backend.
    pub fn page_index(&self) -> u32 {
        self.current.map_or(0, |c| c.saturating_sub(1))
    }

    /// Page size sent to the backend.
    pub fn size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Comparison operator attached to a field filter.
///
/// Only [`Eq`](Self::Eq) has a faithful encoding: the backend takes plain
/// `field=value` parameters, so every other operator is sent as equality.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    #[default]
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    In,
    Nin,
    Contains,
    Ncontains,
    StartsWith,
    EndsWith,
    Between,
    Null,
    Nnull,
}

/// How the children of a conditional filter combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
}

/// A list filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrudFilter {
    /// A comparison against a single field.
    Field {
        field: String,
        #[serde(default)]
        operator: FilterOperator,
        value: Value,
    },
    /// A group of filters. Has no field, so it can't be flattened into
    /// query parameters and is skipped during encoding.
    Conditional {
        operator: LogicalOperator,
        value: Vec<CrudFilter>,
    },
}

impl CrudFilter {
    /// An equality filter on `field`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Field {
            field: field.into(),
            operator: FilterOperator::Eq,
            value: value.into(),
        }
    }
}

/// Sort direction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Sort on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorter {
    pub field: String,
    pub order: SortOrder,
}

impl Sorter {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// Everything a list call needs besides the resource name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub filters: Vec<CrudFilter>,
    #[serde(default)]
    pub sorters: Vec<Sorter>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paginate(mut self, current: u32, page_size: u32) -> Self {
        self.pagination = Pagination::new(current, page_size);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.pagination.page_size = Some(page_size);
        self
    }

    pub fn filter(mut self, filter: CrudFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sorters.push(Sorter::new(field, order));
        self
    }

    /// Encode as query parameters.
    ///
    /// Keys are unique: a filter on `page`, `size`, or a repeated field
    /// overwrites the earlier value in place. Sorters collapse into a single
    /// `sort` value of `field,order` pairs joined by `&`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: IndexMap<String, String> = IndexMap::new();
        params.insert("page".into(), self.pagination.page_index().to_string());
        params.insert("size".into(), self.pagination.size().to_string());

        for filter in &self.filters {
            match filter {
                CrudFilter::Field {
                    field,
                    operator,
                    value,
                } => {
                    if *operator != FilterOperator::Eq {
                        warn!(%field, %operator, "filter operator not supported, sending as equality");
                    }
                    if let Some(encoded) = encode_value(value) {
                        params.insert(field.clone(), encoded);
                    }
                }
                CrudFilter::Conditional { operator, .. } => {
                    warn!(%operator, "conditional filter has no field, skipping");
                }
            }
        }

        if !self.sorters.is_empty() {
            let sort = self
                .sorters
                .iter()
                .map(|s| format!("{},{}", s.field, s.order))
                .collect::<Vec<_>>()
                .join("&");
            params.insert("sort".into(), sort);
        }

        params.into_iter().collect()
    }
}

/// Render a filter value as a query-string value. `null` is dropped.
fn encode_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(encode_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn page_is_zero_based() {
        let params = ListQuery::new().paginate(2, 10).to_params();
        assert_eq!(param(&params, "page"), Some("1"));
        assert_eq!(param(&params, "size"), Some("10"));
    }

    #[test]
    fn defaults_without_pagination() {
        let params = ListQuery::new().to_params();
        assert_eq!(param(&params, "page"), Some("0"));
        assert_eq!(param(&params, "size"), Some("10"));
    }

    #[test]
    fn page_size_alone_keeps_first_page() {
        let params = ListQuery::new().page_size(5).to_params();
        assert_eq!(param(&params, "page"), Some("0"));
        assert_eq!(param(&params, "size"), Some("5"));
    }

    #[test]
    fn page_zero_saturates() {
        let params = ListQuery::new().paginate(0, 25).to_params();
        assert_eq!(param(&params, "page"), Some("0"));
        assert_eq!(param(&params, "size"), Some("25"));
    }

    #[test]
    fn field_filters_flatten_to_equality() {
        let params = ListQuery::new()
            .filter(CrudFilter::eq("status", "PENDING"))
            .filter(CrudFilter::eq("customerId", 42))
            .filter(CrudFilter::Field {
                field: "total".into(),
                operator: FilterOperator::Gte,
                value: json!(100),
            })
            .to_params();
        assert_eq!(param(&params, "status"), Some("PENDING"));
        assert_eq!(param(&params, "customerId"), Some("42"));
        assert_eq!(param(&params, "total"), Some("100"));
    }

    #[test]
    fn null_filters_and_conditionals_are_skipped() {
        let params = ListQuery::new()
            .filter(CrudFilter::eq("category", Value::Null))
            .filter(CrudFilter::Conditional {
                operator: LogicalOperator::Or,
                value: vec![CrudFilter::eq("a", 1)],
            })
            .to_params();
        assert_eq!(params.len(), 2);
        assert!(param(&params, "category").is_none());
        assert!(param(&params, "a").is_none());
    }

    #[test]
    fn later_filter_overwrites_earlier_key() {
        let params = ListQuery::new()
            .paginate(3, 10)
            .filter(CrudFilter::eq("page", 7))
            .to_params();
        assert_eq!(param(&params, "page"), Some("7"));
        assert_eq!(params.first().unwrap().0, "page");
    }

    #[test]
    fn sorters_join_into_single_value() {
        let params = ListQuery::new()
            .sort("createdAt", SortOrder::Desc)
            .sort("title", SortOrder::Asc)
            .to_params();
        assert_eq!(param(&params, "sort"), Some("createdAt,desc&title,asc"));
        assert_eq!(params.iter().filter(|(k, _)| k == "sort").count(), 1);
    }

    #[test]
    fn array_values_are_comma_joined() {
        let params = ListQuery::new()
            .filter(CrudFilter::eq("id", json!([1, 2, 3])))
            .to_params();
        assert_eq!(param(&params, "id"), Some("1,2,3"));
    }

    #[test]
    fn sort_order_parses_case_insensitively() {
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
    }

    #[test]
    fn filter_deserializes_with_default_operator() {
        let filter: CrudFilter =
            serde_json::from_value(json!({"field": "status", "value": "PAID"})).unwrap();
        assert_eq!(filter, CrudFilter::eq("status", "PAID"));
    }
}
