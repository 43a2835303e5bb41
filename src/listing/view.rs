use tracing::{debug, info, warn};

use crate::api::DataSource;
use crate::errors::{ApiError, FilterError};

use super::engine::derive_view;
use super::predicates::{ListContext, Listable, SortValue};
use super::state::{EntityFilterState, SortDirection};

/// Where the listing's raw collection currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Proof that a load was started; only the newest ticket may complete.
#[derive(Debug)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
}

/// Controller behind one listing screen: owns the raw collection, the
/// criteria, and the derived row order.
///
/// The derived order is recomputed eagerly whenever the collection or the
/// criteria change, so reads never observe a stale view.
pub struct ListView<T: Listable> {
    items: Vec<T>,
    context: ListContext,
    initial_state: EntityFilterState<T::Filter, T::Sort>,
    state: EntityFilterState<T::Filter, T::Sort>,
    rows: Vec<usize>,
    status: LoadStatus,
    generation: u64,
    pending: Option<u64>,
    page_size: usize,
}

impl<T: Listable> ListView<T> {
    pub fn new(state: EntityFilterState<T::Filter, T::Sort>, page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            context: ListContext::default(),
            initial_state: state.clone(),
            state,
            rows: Vec::new(),
            status: LoadStatus::Idle,
            generation: 0,
            pending: None,
            page_size: page_size.max(1),
        }
    }

    pub fn state(&self) -> &EntityFilterState<T::Filter, T::Sort> {
        &self.state
    }

    pub fn context(&self) -> &ListContext {
        &self.context
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Raw record count before search and filters.
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size)
    }

    /// Rows in derived order.
    pub fn rows(&self) -> Vec<&T> {
        self.rows.iter().map(|&index| &self.items[index]).collect()
    }

    /// Zero-based page of derived rows; past the end is empty.
    pub fn page(&self, number: usize) -> Vec<&T> {
        self.rows
            .iter()
            .skip(number.saturating_mul(self.page_size))
            .take(self.page_size)
            .map(|&index| &self.items[index])
            .collect()
    }

    /// Explains an empty listing, if it is empty.
    pub fn empty_message(&self) -> Option<String> {
        if let LoadStatus::Failed(message) = &self.status {
            return Some(format!("Could not load records: {message}"));
        }
        if !self.rows.is_empty() {
            return None;
        }
        if self.items.is_empty() {
            Some("No records yet".to_string())
        } else {
            Some("No records match the current search and filters".to_string())
        }
    }

    /// Starts a load. Returns `None` while another load is still in flight.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.pending.is_some() {
            debug!(generation = self.generation, "list load already in flight");
            return None;
        }
        self.generation += 1;
        self.pending = Some(self.generation);
        self.status = LoadStatus::Loading;
        debug!(generation = self.generation, "list load started");
        Some(LoadTicket {
            generation: self.generation,
        })
    }

    /// Applies a load result. Returns `false` if the ticket was invalidated
    /// by [`ListView::reset`], in which case the result is discarded.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<Vec<T>, ApiError>) -> bool {
        if self.pending != Some(ticket.generation) {
            debug!(generation = ticket.generation, "discarding stale list load");
            return false;
        }
        self.pending = None;
        match result {
            Ok(items) => {
                info!(count = items.len(), "list loaded");
                self.items = items;
                self.status = LoadStatus::Loaded;
            }
            Err(err) => {
                warn!(error = %err, "list load failed");
                self.items.clear();
                self.status = LoadStatus::Failed(err.to_string());
            }
        }
        self.recompute();
        true
    }

    /// Fetches and applies the collection in one step.
    pub fn load_from<S: DataSource<T>>(&mut self, source: &mut S) -> bool {
        let Some(ticket) = self.begin_load() else {
            return false;
        };
        let result = source.fetch();
        self.complete_load(ticket, result)
    }

    /// Replaces the raw collection directly, cancelling any pending load.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.pending = None;
        self.items = items;
        self.status = LoadStatus::Loaded;
        self.recompute();
    }

    pub fn set_context(&mut self, context: ListContext) {
        self.context = context;
        self.recompute();
    }

    /// Back to the freshly-mounted state. Pending loads are invalidated.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.items.clear();
        self.status = LoadStatus::Idle;
        self.state = self.initial_state.clone();
        self.recompute();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.set_search(text);
        self.recompute();
    }

    pub fn toggle_filter(&mut self, key: T::Filter, value: &str) -> Result<(), FilterError> {
        self.state.toggle(key, value)?;
        self.recompute();
        Ok(())
    }

    pub fn set_filter(&mut self, key: T::Filter, values: &[&str]) -> Result<(), FilterError> {
        self.state.set_filter(key, values)?;
        self.recompute();
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.state.clear_filters();
        self.recompute();
    }

    pub fn set_sort(&mut self, key: T::Sort, direction: SortDirection) {
        self.state.set_sort(key, direction);
        self.recompute();
    }

    pub fn toggle_sort(&mut self, key: T::Sort) {
        self.state.toggle_sort(key);
        self.recompute();
    }

    fn recompute(&mut self) {
        let indexed: Vec<Indexed<'_, T>> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| Indexed { index, item })
            .collect();
        let derived = derive_view(&indexed, &self.state, &self.context);
        self.rows = derived.iter().map(|entry| entry.index).collect();
    }
}

/// Carries a record's position through the engine.
struct Indexed<'a, T> {
    index: usize,
    item: &'a T,
}

impl<T: Listable> Listable for Indexed<'_, T> {
    type Filter = T::Filter;
    type Sort = T::Sort;

    fn search_fields<'s>(&'s self, ctx: &'s ListContext) -> Vec<&'s str> {
        self.item.search_fields(ctx)
    }

    fn filter_value(&self, key: T::Filter) -> Option<&'static str> {
        self.item.filter_value(key)
    }

    fn sort_value(&self, key: T::Sort, ctx: &ListContext) -> Option<SortValue> {
        self.item.sort_value(key, ctx)
    }
}
