//! Pure domain records (Client, Project, Issue) and their categorical enums.
//! No I/O, no CLI, no storage.

pub mod client;
pub mod common;
pub mod issue;
pub mod project;

pub use client::{Client, ClientDraft};
pub use common::*;
pub use issue::{Issue, IssueDraft};
pub use project::{Project, ProjectDraft};
