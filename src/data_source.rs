use std::hash::Hash;

use derive_ex::{derive_ex, Ex};
use parse_display::Display;
use tracing::debug;

use crate::{IndexPath, Snapshot, SnapshotChanges};


/// The surface a [`DiffableDataSource`] drives.
///
/// Implementations translate the instructions into whatever their toolkit uses for animated
/// batch updates. The data source never calls back into the view for anything else.
pub trait ListView<S, I> {
    fn perform_batch_updates(&mut self, changes: &SnapshotChanges<S, I>, animating: bool);
    fn reload_data(&mut self, snapshot: &Snapshot<S, I>);
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[display("invalid index path {0}")]
pub struct InvalidIndexPath(pub IndexPath);

impl std::error::Error for InvalidIndexPath {}

/// Owns the snapshot a list view currently displays.
#[derive(Debug, Ex)]
#[derive_ex(Clone, Default)]
#[default(Self::new())]
pub struct DiffableDataSource<S, I> {
    snapshot: Snapshot<S, I>,
}

impl<S, I> DiffableDataSource<S, I> {
    pub fn new() -> Self {
        Self {
            snapshot: Snapshot::new(),
        }
    }

    /// The snapshot currently displayed.
    pub fn as_snapshot(&self) -> &Snapshot<S, I> {
        &self.snapshot
    }
    pub fn number_of_sections(&self) -> usize {
        self.snapshot.number_of_sections()
    }
    pub fn section_identifier(&self, index: usize) -> Option<&S> {
        self.snapshot.section_at(index)
    }
    pub fn item_identifier(&self, path: IndexPath) -> Option<&I> {
        self.snapshot.item_at(path)
    }
}

impl<S, I> DiffableDataSource<S, I>
where
    S: Eq + Hash + Clone,
    I: Eq + Hash + Clone,
{
    /// A copy of the displayed snapshot, to be edited and applied back.
    pub fn snapshot(&self) -> Snapshot<S, I> {
        self.snapshot.clone()
    }
    pub fn number_of_items_in_section(&self, index: usize) -> usize {
        self.section_identifier(index)
            .map_or(0, |section| self.snapshot.number_of_items_in(section))
    }
    pub fn index_path(&self, item: &I) -> Option<IndexPath> {
        self.snapshot.index_path_of_item(item)
    }

    /// Displays `snapshot`, sending the view only what changed.
    ///
    /// Reload marks are consumed: the stored snapshot has none.
    pub fn apply(
        &mut self,
        mut snapshot: Snapshot<S, I>,
        view: &mut impl ListView<S, I>,
        animating: bool,
    ) -> SnapshotChanges<S, I> {
        let changes = snapshot.changes_from(&self.snapshot);
        debug!(
            changes = changes.len(),
            sections = snapshot.number_of_sections(),
            items = snapshot.number_of_items(),
            animating,
            "apply snapshot"
        );
        if !changes.is_empty() {
            view.perform_batch_updates(&changes, animating);
        }
        snapshot.clear_reload_marks();
        self.snapshot = snapshot;
        changes
    }

    /// Displays `snapshot` by reloading the whole view instead of diffing.
    pub fn apply_using_reload_data(
        &mut self,
        mut snapshot: Snapshot<S, I>,
        view: &mut impl ListView<S, I>,
    ) {
        debug!(
            sections = snapshot.number_of_sections(),
            items = snapshot.number_of_items(),
            "reload snapshot"
        );
        snapshot.clear_reload_marks();
        view.reload_data(&snapshot);
        self.snapshot = snapshot;
    }

    /// Moves the item at `source` so that it ends up at `destination`, as a user reordering rows does.
    ///
    /// A destination past the end of a section appends to that section.
    pub fn move_item(
        &mut self,
        source: IndexPath,
        destination: IndexPath,
        view: &mut impl ListView<S, I>,
    ) -> Result<SnapshotChanges<S, I>, InvalidIndexPath> {
        let item = self
            .item_identifier(source)
            .cloned()
            .ok_or(InvalidIndexPath(source))?;
        if source == destination {
            return Ok(SnapshotChanges::new());
        }
        let mut snapshot = self.snapshot();
        if let Some(anchor) = self.item_identifier(destination) {
            if source.section == destination.section && destination.item > source.item {
                snapshot.move_item_after(&item, anchor);
            } else {
                snapshot.move_item_before(&item, anchor);
            }
        } else {
            let section = self
                .section_identifier(destination.section)
                .ok_or(InvalidIndexPath(destination))?;
            snapshot.append_items([item], section);
        }
        Ok(self.apply(snapshot, view, false))
    }

    /// Deletes the item at `path`, as a swipe-to-delete does.
    pub fn delete_item(
        &mut self,
        path: IndexPath,
        view: &mut impl ListView<S, I>,
    ) -> Result<SnapshotChanges<S, I>, InvalidIndexPath> {
        let item = self
            .item_identifier(path)
            .cloned()
            .ok_or(InvalidIndexPath(path))?;
        let mut snapshot = self.snapshot();
        snapshot.delete_items([&item]);
        Ok(self.apply(snapshot, view, true))
    }
}
