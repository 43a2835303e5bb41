//! Entity predicate library: the accessors the filter/sort engine needs
//! from every listable record.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::domain::{Client, Project};
use crate::errors::FilterError;

use super::collation::TextCollator;

/// A categorical filter dimension with a declared option set.
pub trait FilterKey: Copy + Ord + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// Values a selection for this key may contain (wire slugs).
    fn options(self) -> &'static [&'static str];

    fn from_name(name: &str) -> Result<Self, FilterError> {
        let wanted = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FilterError::UnknownFilter(wanted.to_string()))
    }
}

/// A column the listing can be ordered by.
pub trait SortKey: Copy + Eq + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Result<Self, FilterError> {
        let wanted = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FilterError::UnknownSortKey(wanted.to_string()))
    }
}

/// A comparable sort key extracted from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Number(f64),
    Instant(NaiveDateTime),
    /// Already case-folded.
    Text(String),
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        SortValue::Text(value.to_lowercase())
    }

    pub fn number(value: impl Into<f64>) -> Self {
        SortValue::Number(value.into())
    }

    pub fn instant(value: DateTime<Utc>) -> Self {
        SortValue::Instant(value.naive_utc())
    }

    /// Calendar dates compare as midnight UTC.
    pub fn date(value: NaiveDate) -> Option<Self> {
        value.and_hms_opt(0, 0, 0).map(SortValue::Instant)
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Number(_) => 0,
            SortValue::Instant(_) => 1,
            SortValue::Text(_) => 2,
        }
    }

    /// Ascending comparison. Mixed kinds order numbers, then instants, then
    /// text; text follows `collator`.
    pub fn compare(&self, other: &Self, collator: &TextCollator) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Instant(a), SortValue::Instant(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => collator.compare(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Lookups that let a record's accessors resolve related names, e.g. a
/// project's client company, plus the collation used for text sort keys.
#[derive(Debug, Clone, Default)]
pub struct ListContext {
    client_names: HashMap<Uuid, String>,
    project_names: HashMap<Uuid, String>,
    collator: Arc<TextCollator>,
}

impl ListContext {
    pub fn from_records(clients: &[Client], projects: &[Project]) -> Self {
        Self {
            client_names: clients
                .iter()
                .map(|client| (client.id, client.company.clone()))
                .collect(),
            project_names: projects
                .iter()
                .map(|project| (project.id, project.name.clone()))
                .collect(),
            collator: Arc::default(),
        }
    }

    /// Sorts text by the rules of `locale` (a BCP 47 tag such as `fr-FR`).
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.collator = Arc::new(TextCollator::new(locale));
        self
    }

    pub fn collator(&self) -> &TextCollator {
        &self.collator
    }

    pub fn client_name(&self, id: Uuid) -> Option<&str> {
        self.client_names.get(&id).map(String::as_str)
    }

    pub fn project_name(&self, id: Uuid) -> Option<&str> {
        self.project_names.get(&id).map(String::as_str)
    }
}

/// Accessors used by search, filter, and sort.
pub trait Listable {
    type Filter: FilterKey;
    type Sort: SortKey;

    /// Strings matched by free-text search.
    fn search_fields<'a>(&'a self, ctx: &'a ListContext) -> Vec<&'a str>;

    /// Categorical value for `key`, drawn from `key.options()`.
    fn filter_value(&self, key: Self::Filter) -> Option<&'static str>;

    /// Sort value for `key`; `None` when the record has no value.
    fn sort_value(&self, key: Self::Sort, ctx: &ListContext) -> Option<SortValue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_values_compare_case_insensitively() {
        let collator = TextCollator::default();
        assert_eq!(
            SortValue::text("acme").compare(&SortValue::text("ACME"), &collator),
            Ordering::Equal
        );
        assert_eq!(
            SortValue::text("Beta").compare(&SortValue::text("alpha"), &collator),
            Ordering::Greater
        );
    }

    #[test]
    fn numbers_compare_numerically_not_lexically() {
        assert_eq!(
            SortValue::number(9).compare(&SortValue::number(10), &TextCollator::default()),
            Ordering::Less
        );
    }

    #[test]
    fn dates_compare_by_instant() {
        let earlier = SortValue::date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()).unwrap();
        let later = SortValue::date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap();
        assert_eq!(earlier.compare(&later, &TextCollator::default()), Ordering::Less);
    }

    #[test]
    fn context_resolves_client_names() {
        let client = Client::new("Acme", "Jo", "jo@acme.test");
        let ctx = ListContext::from_records(std::slice::from_ref(&client), &[]);
        assert_eq!(ctx.client_name(client.id), Some("Acme"));
        assert_eq!(ctx.client_name(Uuid::new_v4()), None);
    }

    #[test]
    fn locale_context_orders_accented_text() {
        let ctx = ListContext::default().with_locale("fr-FR");
        assert_eq!(ctx.collator().locale(), "fr-FR");
        assert_eq!(
            SortValue::text("Éclair Studio").compare(&SortValue::text("Zed Inc"), ctx.collator()),
            Ordering::Less
        );
    }
}
