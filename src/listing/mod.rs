//! Search, filter, and sort over entity collections.
//!
//! [`engine`] holds the pure derivation functions; [`view::ListView`] is the
//! stateful controller a listing screen drives.

pub mod collation;
pub mod combined;
pub mod engine;
pub mod entities;
pub mod predicates;
pub mod state;
pub mod view;

pub use collation::TextCollator;
pub use combined::{combine, CombinedEntity, CombinedFilter, CombinedSort, EntityKind};
pub use engine::{apply_filters, apply_search, apply_sort, derive_view, option_counts};
pub use entities::{
    ClientFilter, ClientSort, IssueFilter, IssueSort, ProjectFilter, ProjectSort,
};
pub use predicates::{FilterKey, ListContext, Listable, SortKey, SortValue};
pub use state::{ActiveFilters, EntityFilterState, SortDirection};
pub use view::{ListView, LoadStatus, LoadTicket};
