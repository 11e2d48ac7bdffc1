use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

use tracing::trace;

use crate::{
    utils::{dedup_keep_first, dedup_keep_last},
    DiffableDataSource, IndexPath, InvalidIndexPath, ListView, Snapshot, SnapshotChanges,
};

#[cfg(test)]
mod tests;

/// Section metadata a list view shows around the items.
pub trait DiffableSection {
    fn title(&self) -> &str;
    fn footer(&self) -> Option<String> {
        None
    }
}

/// A cell that can be configured from an item.
pub trait Provide<I> {
    fn provide(&mut self, item: &I);
}

/// Keeps the items of each section and pushes every edit to a list view as a snapshot diff.
///
/// The section catalog is fixed at construction and decides the order sections are displayed in.
pub struct ListViewModel<S, I> {
    sections: Vec<S>,
    items: HashMap<S, Vec<I>>,
    data_source: DiffableDataSource<S, I>,
    on_select: Option<Box<dyn FnMut(&I)>>,
}

impl<S, I> ListViewModel<S, I>
where
    S: Eq + Hash + Clone,
    I: Eq + Hash + Clone,
{
    pub fn new(sections: impl IntoIterator<Item = S>) -> Self {
        let sections = dedup_keep_first(sections);
        let items = sections.iter().map(|s| (s.clone(), Vec::new())).collect();
        Self {
            sections,
            items,
            data_source: DiffableDataSource::new(),
            on_select: None,
        }
    }

    pub fn sections(&self) -> &[S] {
        &self.sections
    }
    pub fn data_source(&self) -> &DiffableDataSource<S, I> {
        &self.data_source
    }
    pub fn items(&self, section: &S) -> &[I] {
        match self.items.get(section) {
            Some(items) => items,
            None => &[],
        }
    }

    /// All items in catalog order.
    pub fn all_items(&self) -> Vec<I> {
        self.sections
            .iter()
            .flat_map(|s| self.items(s).iter().cloned())
            .collect()
    }

    /// Appends `items` to `section`. Items already shown in another section move here.
    pub fn add(
        &mut self,
        items: impl IntoIterator<Item = I>,
        section: &S,
        view: &mut impl ListView<S, I>,
    ) -> SnapshotChanges<S, I> {
        if !self.items.contains_key(section) {
            trace!("add: section is not in the catalog");
            return SnapshotChanges::new();
        }
        let added = dedup_keep_last(items);
        let moved: HashSet<&I> = added.iter().collect();
        for list in self.items.values_mut() {
            list.retain(|item| !moved.contains(item));
        }
        if let Some(list) = self.items.get_mut(section) {
            list.extend(added.iter().cloned());
        }
        self.update(view)
    }

    pub fn remove<'a>(
        &mut self,
        items: impl IntoIterator<Item = &'a I>,
        section: &S,
        view: &mut impl ListView<S, I>,
    ) -> SnapshotChanges<S, I>
    where
        I: 'a,
    {
        let Some(list) = self.items.get_mut(section) else {
            trace!("remove: section is not in the catalog");
            return SnapshotChanges::new();
        };
        let removed: HashSet<&I> = items.into_iter().collect();
        list.retain(|item| !removed.contains(item));
        self.update(view)
    }

    /// Moves an item the way a user dragging a row does, keeping the item lists in sync.
    pub fn move_item(
        &mut self,
        source: IndexPath,
        destination: IndexPath,
        view: &mut impl ListView<S, I>,
    ) -> Result<SnapshotChanges<S, I>, InvalidIndexPath> {
        let changes = self.data_source.move_item(source, destination, view)?;
        self.sync_items();
        Ok(changes)
    }
    pub fn delete_item(
        &mut self,
        path: IndexPath,
        view: &mut impl ListView<S, I>,
    ) -> Result<SnapshotChanges<S, I>, InvalidIndexPath> {
        let changes = self.data_source.delete_item(path, view)?;
        self.sync_items();
        Ok(changes)
    }

    /// Configures `cell` with the item at `path`. Returns `false` when there is no such item.
    pub fn configure_cell(&self, path: IndexPath, cell: &mut impl Provide<I>) -> bool {
        match self.data_source.item_identifier(path) {
            Some(item) => {
                cell.provide(item);
                true
            }
            None => false,
        }
    }

    pub fn header_title(&self, section: usize) -> Option<&str>
    where
        S: DiffableSection,
    {
        Some(self.data_source.section_identifier(section)?.title())
    }
    pub fn footer_title(&self, section: usize) -> Option<String>
    where
        S: DiffableSection,
    {
        self.data_source.section_identifier(section)?.footer()
    }

    pub fn on_select(&mut self, f: impl FnMut(&I) + 'static) {
        self.on_select = Some(Box::new(f));
    }

    /// Reports the item at `path` to the selection callback. Returns whether there was an item.
    pub fn select(&mut self, path: IndexPath) -> bool {
        let Some(item) = self.data_source.item_identifier(path) else {
            return false;
        };
        if let Some(f) = &mut self.on_select {
            f(item);
        }
        true
    }

    fn make_snapshot(&self) -> Snapshot<S, I> {
        let mut snapshot = Snapshot::new();
        snapshot.append_sections(self.sections.iter().cloned());
        for section in &self.sections {
            snapshot.append_items(self.items(section).iter().cloned(), section);
        }
        snapshot
    }
    fn update(&mut self, view: &mut impl ListView<S, I>) -> SnapshotChanges<S, I> {
        let snapshot = self.make_snapshot();
        self.data_source.apply(snapshot, view, true)
    }
    fn sync_items(&mut self) {
        let snapshot = self.data_source.as_snapshot();
        for (section, list) in &mut self.items {
            list.clear();
            list.extend(snapshot.item_identifiers_in(section).iter().cloned());
        }
    }
}
