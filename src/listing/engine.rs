//! Pure list derivation: search, then filters, then sort.
//!
//! Every stage takes and returns references into the caller's collection,
//! so the source records are never mutated or cloned.

use std::cmp::Ordering;

use super::collation::TextCollator;
use super::predicates::{FilterKey, ListContext, Listable, SortValue};
use super::state::{ActiveFilters, EntityFilterState, SortDirection};

/// Keeps records where any searchable field contains `text`, ignoring case.
/// Blank text keeps everything.
pub fn apply_search<'a, T: Listable>(
    collection: &[&'a T],
    text: &str,
    ctx: &ListContext,
) -> Vec<&'a T> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return collection.to_vec();
    }
    collection
        .iter()
        .copied()
        .filter(|item| {
            item.search_fields(ctx)
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Keeps records whose value is selected for every active filter key.
/// Keys with empty selections are ignored.
pub fn apply_filters<'a, T: Listable>(
    collection: &[&'a T],
    active: &ActiveFilters<T::Filter>,
) -> Vec<&'a T> {
    let constraints: Vec<_> = active
        .iter()
        .filter(|(_, selected)| !selected.is_empty())
        .collect();
    if constraints.is_empty() {
        return collection.to_vec();
    }
    collection
        .iter()
        .copied()
        .filter(|item| {
            constraints.iter().all(|(key, selected)| {
                item.filter_value(**key)
                    .map_or(false, |value| selected.contains(value))
            })
        })
        .collect()
}

/// Stable sort by `key`. Records without a value sort last in either direction.
pub fn apply_sort<'a, T: Listable>(
    collection: &[&'a T],
    key: T::Sort,
    direction: SortDirection,
    ctx: &ListContext,
) -> Vec<&'a T> {
    let mut decorated: Vec<(Option<SortValue>, &'a T)> = collection
        .iter()
        .map(|item| (item.sort_value(key, ctx), *item))
        .collect();
    let collator = ctx.collator();
    decorated.sort_by(|(left, _), (right, _)| {
        compare_keys(left.as_ref(), right.as_ref(), direction, collator)
    });
    decorated.into_iter().map(|(_, item)| item).collect()
}

/// Composes search, filters, and sort for the given criteria.
pub fn derive_view<'a, T: Listable>(
    collection: &'a [T],
    state: &EntityFilterState<T::Filter, T::Sort>,
    ctx: &ListContext,
) -> Vec<&'a T> {
    let all: Vec<&'a T> = collection.iter().collect();
    let searched = apply_search(&all, state.search_text(), ctx);
    let filtered = apply_filters(&searched, state.active_filters());
    apply_sort(&filtered, state.sort_key(), state.sort_direction(), ctx)
}

fn compare_keys(
    left: Option<&SortValue>,
    right: Option<&SortValue>,
    direction: SortDirection,
    collator: &TextCollator,
) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => direction.apply(left.compare(right, collator)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Number of records carrying each option of `key`, in declared option order.
pub fn option_counts<T: Listable>(collection: &[&T], key: T::Filter) -> Vec<(&'static str, usize)> {
    key.options()
        .iter()
        .map(|option| {
            let count = collection
                .iter()
                .filter(|item| item.filter_value(key) == Some(*option))
                .count();
            (*option, count)
        })
        .collect()
}
