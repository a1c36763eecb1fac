use std::cmp::Ordering;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// One field value inside a [`Record`].
///
/// Tables are open mappings with no schema, so every column value is one of
/// these three shapes. `Null` doubles as "column absent".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl Scalar {
    pub const NULL: Self = Self::Null;

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Display form used for tick/legend/chip labels.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{}", *value as i64)
                } else {
                    format!("{value}")
                }
            }
            Self::Text(value) => value.clone(),
        }
    }

    /// Total, deterministic ordering: numbers sort before text, null sorts
    /// last. Numbers compare via `total_cmp`, text lexicographically.
    #[must_use]
    pub fn cmp_total(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Greater,
            (_, Self::Null) => Ordering::Less,
            (Self::Number(lhs), Self::Number(rhs)) => lhs.total_cmp(rhs),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(lhs), Self::Text(rhs)) => lhs.cmp(rhs),
        }
    }

    /// Hashable/equatable key form used for distinct-value collection and
    /// record lookup.
    #[must_use]
    pub fn key(&self) -> ScalarKey {
        match self {
            Self::Null => ScalarKey::Null,
            Self::Number(value) => ScalarKey::Number(OrderedFloat(*value)),
            Self::Text(value) => ScalarKey::Text(value.clone()),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Equality/hash-friendly projection of a [`Scalar`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKey {
    Number(OrderedFloat<f64>),
    Text(String),
    Null,
}

/// One input row: an open column-name to scalar mapping.
///
/// `IndexMap` preserves insertion order, which "appearance" ordering policies
/// rely on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Scalar>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from `(column, value)` pairs, mostly for tests and
    /// fixtures.
    #[must_use]
    pub fn from_pairs<C, V, I>(pairs: I) -> Self
    where
        C: Into<String>,
        V: Into<Scalar>,
        I: IntoIterator<Item = (C, V)>,
    {
        let mut record = Self::new();
        for (column, value) in pairs {
            record.fields.insert(column.into(), value.into());
        }
        record
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Scalar>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Returns the value stored under `column`, or `Scalar::Null` when the
    /// column is absent from this row.
    #[must_use]
    pub fn get(&self, column: &str) -> &Scalar {
        self.fields.get(column).unwrap_or(&Scalar::NULL)
    }

    #[must_use]
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).as_number()
    }

    #[must_use]
    pub fn contains_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_ordering_is_total() {
        let mut values = vec![
            Scalar::Text("b".to_owned()),
            Scalar::Null,
            Scalar::Number(2.0),
            Scalar::Text("a".to_owned()),
            Scalar::Number(-1.0),
        ];
        values.sort_by(|lhs, rhs| lhs.cmp_total(rhs));

        assert_eq!(
            values,
            vec![
                Scalar::Number(-1.0),
                Scalar::Number(2.0),
                Scalar::Text("a".to_owned()),
                Scalar::Text("b".to_owned()),
                Scalar::Null,
            ]
        );
    }

    #[test]
    fn absent_column_reads_as_null() {
        let record = Record::from_pairs([("cat", "x")]);
        assert!(record.get("missing").is_null());
        assert!(!record.contains_column("missing"));
    }

    #[test]
    fn integral_numbers_label_without_fraction() {
        assert_eq!(Scalar::Number(12.0).label(), "12");
        assert_eq!(Scalar::Number(12.5).label(), "12.5");
        assert_eq!(Scalar::Null.label(), "");
    }
}
