use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::errors::FilterError;

use super::predicates::{FilterKey, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Orients an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("Unknown sort direction `{other}` (use asc or desc)")),
        }
    }
}

pub type ActiveFilters<F> = BTreeMap<F, BTreeSet<&'static str>>;

/// Search, filter, and sort criteria of one listing.
///
/// Selected filter values are always members of their key's declared option
/// set: every mutation resolves the requested value against
/// [`FilterKey::options`] and stores the canonical option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityFilterState<F: FilterKey, S: SortKey> {
    search_text: String,
    active_filters: ActiveFilters<F>,
    sort_key: S,
    sort_direction: SortDirection,
}

impl<F: FilterKey, S: SortKey> EntityFilterState<F, S> {
    pub fn new(sort_key: S, sort_direction: SortDirection) -> Self {
        Self {
            search_text: String::new(),
            active_filters: BTreeMap::new(),
            sort_key,
            sort_direction,
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn active_filters(&self) -> &ActiveFilters<F> {
        &self.active_filters
    }

    pub fn sort_key(&self) -> S {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Adds `value` to the selection for `key`.
    pub fn select(&mut self, key: F, value: &str) -> Result<(), FilterError> {
        let option = resolve_option(key, value)?;
        self.active_filters.entry(key).or_default().insert(option);
        Ok(())
    }

    pub fn deselect(&mut self, key: F, value: &str) -> Result<(), FilterError> {
        let option = resolve_option(key, value)?;
        if let Some(selected) = self.active_filters.get_mut(&key) {
            selected.remove(option);
            if selected.is_empty() {
                self.active_filters.remove(&key);
            }
        }
        Ok(())
    }

    /// Flips membership of `value` in the selection for `key`.
    pub fn toggle(&mut self, key: F, value: &str) -> Result<(), FilterError> {
        let option = resolve_option(key, value)?;
        let selected = self
            .active_filters
            .get(&key)
            .map_or(false, |set| set.contains(option));
        if selected {
            self.deselect(key, option)
        } else {
            self.select(key, option)
        }
    }

    /// Replaces the selection for `key`; nothing changes if any value is invalid.
    pub fn set_filter(&mut self, key: F, values: &[&str]) -> Result<(), FilterError> {
        let resolved = values
            .iter()
            .map(|value| resolve_option(key, value))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if resolved.is_empty() {
            self.active_filters.remove(&key);
        } else {
            self.active_filters.insert(key, resolved);
        }
        Ok(())
    }

    pub fn clear_filter(&mut self, key: F) {
        self.active_filters.remove(&key);
    }

    pub fn clear_filters(&mut self) {
        self.active_filters.clear();
    }

    pub fn set_sort(&mut self, key: S, direction: SortDirection) {
        self.sort_key = key;
        self.sort_direction = direction;
    }

    /// Column-header behaviour: same key flips direction, new key sorts ascending.
    pub fn toggle_sort(&mut self, key: S) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.set_sort(key, SortDirection::Asc);
        }
    }
}

fn resolve_option<F: FilterKey>(key: F, value: &str) -> Result<&'static str, FilterError> {
    let wanted = value.trim();
    key.options()
        .iter()
        .copied()
        .find(|option| option.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| FilterError::UnknownOption {
            filter: key.name(),
            value: wanted.to_string(),
            options: key.options().join(", "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Filter {
        Status,
    }

    impl FilterKey for Filter {
        const ALL: &'static [Self] = &[Filter::Status];

        fn name(self) -> &'static str {
            "status"
        }

        fn options(self) -> &'static [&'static str] {
            &["active", "inactive"]
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Sort {
        Name,
        Created,
    }

    impl SortKey for Sort {
        const ALL: &'static [Self] = &[Sort::Name, Sort::Created];

        fn name(self) -> &'static str {
            match self {
                Sort::Name => "name",
                Sort::Created => "created_at",
            }
        }
    }

    fn state() -> EntityFilterState<Filter, Sort> {
        EntityFilterState::new(Sort::Name, SortDirection::Asc)
    }

    #[test]
    fn select_rejects_undeclared_values() {
        let mut state = state();
        let err = state.select(Filter::Status, "archived").unwrap_err();
        assert_eq!(
            err.to_string(),
            "`archived` is not an option for filter `status` (expected one of: active, inactive)"
        );
        assert!(state.active_filters().is_empty());
    }

    #[test]
    fn select_stores_canonical_option() {
        let mut state = state();
        state.select(Filter::Status, " ACTIVE ").unwrap();
        let selected = &state.active_filters()[&Filter::Status];
        assert!(selected.contains("active"));
    }

    #[test]
    fn toggle_removes_empty_selection() {
        let mut state = state();
        state.toggle(Filter::Status, "active").unwrap();
        state.toggle(Filter::Status, "active").unwrap();
        assert!(state.active_filters().is_empty());
    }

    #[test]
    fn set_filter_is_all_or_nothing() {
        let mut state = state();
        state.set_filter(Filter::Status, &["active"]).unwrap();
        assert!(state
            .set_filter(Filter::Status, &["inactive", "bogus"])
            .is_err());
        let selected: Vec<_> = state.active_filters()[&Filter::Status].iter().copied().collect();
        assert_eq!(selected, vec!["active"]);
    }

    #[test]
    fn toggle_sort_flips_then_resets() {
        let mut state = state();
        state.toggle_sort(Sort::Name);
        assert_eq!(state.sort_direction(), SortDirection::Desc);
        state.toggle_sort(Sort::Created);
        assert_eq!(state.sort_key(), Sort::Created);
        assert_eq!(state.sort_direction(), SortDirection::Asc);
    }

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(Sort::from_name("CREATED_AT").unwrap(), Sort::Created);
        assert!(Sort::from_name("budget").is_err());
        assert_eq!(Filter::from_name("Status").unwrap(), Filter::Status);
    }
}
