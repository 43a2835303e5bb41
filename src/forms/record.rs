//! Typed field keys and the aggregate record collected by a wizard.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::FormError;

/// A closed set of field keys belonging to one form.
///
/// Forms declare their fields as an enum; step definitions and schema
/// lookups take that enum, so referencing a field the form does not own is a
/// compile error rather than a runtime lookup miss.
pub trait FormField: Copy + Ord + fmt::Debug + 'static {
    /// Every field of the form, in display order.
    const ALL: &'static [Self];

    /// Wire-level key (camelCase, matching the REST payload).
    fn key(self) -> &'static str;
}

/// Field values across every step of a wizard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord<F: FormField> {
    values: BTreeMap<F, String>,
}

impl<F: FormField> Default for FormRecord<F> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<F: FormField> FormRecord<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from `(field, value)` pairs, e.g. when editing.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (F, String)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Returns the value when it is present and non-blank.
    pub fn non_empty(&self, field: F) -> Option<&str> {
        self.get(field).filter(|value| !value.trim().is_empty())
    }

    pub fn set(&mut self, field: F, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn clear(&mut self, field: F) {
        self.values.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a field validation has already required.
    pub fn require(&self, field: F) -> Result<&str, FormError> {
        self.non_empty(field)
            .ok_or_else(|| FormError::Assembly(format!("`{}` is missing", field.key())))
    }

    pub fn optional(&self, field: F) -> Option<String> {
        self.non_empty(field).map(str::to_string)
    }

    pub fn parse<T>(&self, field: F) -> Result<T, FormError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.require(field)?;
        raw.parse()
            .map_err(|err| FormError::Assembly(format!("`{}`: {}", field.key(), err)))
    }

    pub fn parse_optional<T>(&self, field: F) -> Result<Option<T>, FormError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.non_empty(field) {
            Some(_) => self.parse(field).map(Some),
            None => Ok(None),
        }
    }
}
