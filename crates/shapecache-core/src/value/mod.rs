mod compare;


use serde::{Deserialize, Serialize};

// re-exports
pub use compare::strict_order_cmp;

///
/// Value
///
/// Literal constant carried by a predicate, a partial-index filter, or a
/// hint/min/max document. Key encoding never reads literal values directly;
/// they only matter through index compatibility checks.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    ObjectId([u8; 12]),
    List(Vec<Self>),
    Document(Vec<(String, Self)>),
}

impl Value {
    /// Build a document value from `(field, value)` pairs, preserving order.
    #[must_use]
    pub fn doc<K: Into<String>>(fields: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Document(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_document(&self) -> bool {
        matches!(self, Self::Document(_))
    }

    /// True for lists with at least one element.
    #[must_use]
    pub fn is_non_empty_list(&self) -> bool {
        matches!(self, Self::List(items) if !items.is_empty())
    }

    /// Whether a string appears anywhere inside this value, including inside
    /// nested documents and lists.
    #[must_use]
    pub fn contains_text(&self) -> bool {
        match self {
            Self::Text(_) => true,
            Self::List(items) => items.iter().any(Self::contains_text),
            Self::Document(fields) => fields.iter().any(|(_, value)| value.contains_text()),
            Self::Null | Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::ObjectId(_) => {
                false
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(values: Vec<Self>) -> Self {
        Self::List(values)
    }
}
