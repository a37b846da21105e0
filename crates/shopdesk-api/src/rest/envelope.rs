// List response envelopes
//
// Backends answer list calls in one of three shapes. Each known shape is
// an explicit variant; anything else is rejected instead of being read
// as an empty page.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, preview};

/// A normalized page of records.
///
/// `total` is whatever the backend reported. It is not checked against
/// `data.len()`; when the envelope carries no total, it is the record count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPage<T> {
    pub data: Vec<T>,
    pub total: u64,
}

/// Which envelope a list response arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// `[ {...}, ... ]`
    Bare,
    /// Spring Data page: `{ content: [...], totalElements: n }`
    Paged,
    /// `{ data: [...], total: n }`
    Wrapped,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope {
    Bare(Vec<Value>),
    Paged {
        content: Vec<Value>,
        #[serde(default, rename = "totalElements")]
        total_elements: Option<u64>,
        #[serde(default)]
        total: Option<u64>,
    },
    Wrapped {
        data: Vec<Value>,
        #[serde(default, rename = "totalElements")]
        total_elements: Option<u64>,
        #[serde(default)]
        total: Option<u64>,
    },
}

impl ListEnvelope {
    fn into_page(self) -> (ListShape, ListPage<Value>) {
        let (shape, data, total) = match self {
            Self::Bare(data) => (ListShape::Bare, data, None),
            Self::Paged {
                content,
                total_elements,
                total,
            } => (ListShape::Paged, content, total_elements.or(total)),
            Self::Wrapped {
                data,
                total_elements,
                total,
            } => (ListShape::Wrapped, data, total_elements.or(total)),
        };
        let total = total.unwrap_or_else(|| u64::try_from(data.len()).unwrap_or(u64::MAX));
        (shape, ListPage { data, total })
    }
}

/// Decode a list response body into a page of `T`.
///
/// Shape detection runs first against untyped JSON, so a record that fails
/// to match `T` reports a deserialization error rather than an unknown shape.
pub fn decode_list<T: DeserializeOwned>(body: &str) -> Result<(ListShape, ListPage<T>), Error> {
    let raw: Value = serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })?;

    let envelope: ListEnvelope =
        serde_json::from_value(raw).map_err(|_| Error::UnrecognizedEnvelope {
            preview: preview(body),
        })?;

    let (shape, page) = envelope.into_page();
    let data = page
        .data
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| Error::Deserialization {
            message: format!("list record: {e}"),
            body: body.to_owned(),
        })?;

    Ok((
        shape,
        ListPage {
            data,
            total: page.total,
        },
    ))
}
