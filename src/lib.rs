//! Identifier-based snapshots of sectioned lists, and the minimal batch updates between them.
//!
//! A [`Snapshot`] records which sections a list view shows and which items each section holds.
//! [`SnapshotChanges`] describes how to get from one snapshot to another, and
//! [`DiffableDataSource`] applies snapshots to a [`ListView`].

mod changes;
mod data_source;
mod snapshot;
mod utils;
mod view_model;

pub use changes::*;
pub use data_source::*;
pub use snapshot::*;
pub use view_model::*;
