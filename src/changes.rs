use std::{hash::Hash, ops::Index, slice};

use derive_ex::{derive_ex, Ex};
use parse_display::Display;

use crate::{utils::stable_mask, IndexPath, Snapshot};


/// A single batch-update instruction for a list view.
///
/// Deletes use positions in the old snapshot, inserts and reloads use positions in the new one.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum SnapshotChange<S, I> {
    #[display("delete section {section} at {index}")]
    DeleteSection { index: usize, section: S },
    #[display("insert section {section} at {index}")]
    InsertSection { index: usize, section: S },
    #[display("move section {section} from {old_index} to {new_index}")]
    MoveSection {
        old_index: usize,
        new_index: usize,
        section: S,
    },
    #[display("reload section {section} at {index}")]
    ReloadSection { index: usize, section: S },
    #[display("delete item {item} at {path}")]
    DeleteItem { path: IndexPath, item: I },
    #[display("insert item {item} at {path}")]
    InsertItem { path: IndexPath, item: I },
    #[display("move item {item} from {old_path} to {new_path}")]
    MoveItem {
        old_path: IndexPath,
        new_path: IndexPath,
        item: I,
    },
    #[display("reload item {item} at {path}")]
    ReloadItem { path: IndexPath, item: I },
}

/// The ordered batch-update instructions that turn one snapshot into another.
#[derive(Debug, PartialEq, Eq, Ex)]
#[derive_ex(Clone, Default)]
#[default(Self::new())]
pub struct SnapshotChanges<S, I> {
    changes: Vec<SnapshotChange<S, I>>,
}

impl<S, I> SnapshotChanges<S, I>
where
    S: Eq + Hash + Clone,
    I: Eq + Hash + Clone,
{
    /// Computes the changes from `old` to `new`.
    ///
    /// Items inside deleted or inserted sections are covered by the section change and are not
    /// listed individually. Moves are kept to a minimum: only the entries outside a longest run
    /// of preserved relative order are reported as moved.
    pub fn between(old: &Snapshot<S, I>, new: &Snapshot<S, I>) -> Self {
        let mut changes = Vec::new();
        let mut reloads = Vec::new();
        diff_sections(old, new, &mut changes, &mut reloads);

        let mut inserts = Vec::new();
        let mut moves = Vec::new();
        for (index, (section, items)) in old.iter_sections().enumerate().rev() {
            if !new.contains_section(section) {
                continue;
            }
            for (row, item) in items.iter().enumerate().rev() {
                let deleted = match new.section_identifier_containing(item) {
                    None => true,
                    Some(target) => target != section && !old.contains_section(target),
                };
                if deleted {
                    changes.push(SnapshotChange::DeleteItem {
                        path: IndexPath::new(index, row),
                        item: item.clone(),
                    });
                }
            }
        }
        for (index, (section, items)) in new.iter_sections().enumerate() {
            if !old.contains_section(section) {
                continue;
            }
            let mut kept = Vec::new();
            for (row, item) in items.iter().enumerate() {
                let path = IndexPath::new(index, row);
                match old.section_identifier_containing(item) {
                    Some(source) if source == section => kept.push((path, item)),
                    Some(source) if new.contains_section(source) => {
                        if let Some(old_path) = old.index_path_of_item(item) {
                            moves.push(SnapshotChange::MoveItem {
                                old_path,
                                new_path: path,
                                item: item.clone(),
                            });
                        }
                    }
                    _ => inserts.push(SnapshotChange::InsertItem {
                        path,
                        item: item.clone(),
                    }),
                }
            }
            let old_rows: Vec<usize> = kept
                .iter()
                .filter_map(|(_, item)| old.index_of_item(item))
                .collect();
            for ((path, item), stable) in kept.into_iter().zip(stable_mask(&old_rows)) {
                if !stable {
                    if let Some(old_path) = old.index_path_of_item(item) {
                        moves.push(SnapshotChange::MoveItem {
                            old_path,
                            new_path: path,
                            item: item.clone(),
                        });
                    }
                } else if new.is_item_reloaded(item) {
                    reloads.push(SnapshotChange::ReloadItem {
                        path,
                        item: item.clone(),
                    });
                }
            }
        }
        changes.extend(inserts);
        moves.sort_by_key(|change| match change {
            SnapshotChange::MoveItem { new_path, .. } => *new_path,
            _ => IndexPath::new(usize::MAX, usize::MAX),
        });
        changes.extend(moves);
        changes.extend(reloads);
        Self { changes }
    }
}

fn diff_sections<S, I>(
    old: &Snapshot<S, I>,
    new: &Snapshot<S, I>,
    changes: &mut Vec<SnapshotChange<S, I>>,
    reloads: &mut Vec<SnapshotChange<S, I>>,
) where
    S: Eq + Hash + Clone,
    I: Eq + Hash + Clone,
{
    for (index, section) in old.section_identifiers().iter().enumerate().rev() {
        if !new.contains_section(section) {
            changes.push(SnapshotChange::DeleteSection {
                index,
                section: section.clone(),
            });
        }
    }
    let mut kept = Vec::new();
    for (index, section) in new.section_identifiers().iter().enumerate() {
        match old.index_of_section(section) {
            Some(old_index) => kept.push((index, old_index, section)),
            None => changes.push(SnapshotChange::InsertSection {
                index,
                section: section.clone(),
            }),
        }
    }
    let old_indexes: Vec<usize> = kept.iter().map(|&(_, old_index, _)| old_index).collect();
    for ((new_index, old_index, section), stable) in kept.into_iter().zip(stable_mask(&old_indexes)) {
        if !stable {
            changes.push(SnapshotChange::MoveSection {
                old_index,
                new_index,
                section: section.clone(),
            });
        } else if new.is_section_reloaded(section) {
            reloads.push(SnapshotChange::ReloadSection {
                index: new_index,
                section: section.clone(),
            });
        }
    }
}

impl<S, I> SnapshotChanges<S, I> {
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
    pub fn len(&self) -> usize {
        self.changes.len()
    }
    pub fn iter(&self) -> slice::Iter<'_, SnapshotChange<S, I>> {
        self.changes.iter()
    }
    pub fn as_slice(&self) -> &[SnapshotChange<S, I>] {
        &self.changes
    }
}

impl<S, I> Index<usize> for SnapshotChanges<S, I> {
    type Output = SnapshotChange<S, I>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.changes[index]
    }
}
impl<'a, S, I> IntoIterator for &'a SnapshotChanges<S, I> {
    type Item = &'a SnapshotChange<S, I>;
    type IntoIter = slice::Iter<'a, SnapshotChange<S, I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
impl<S, I> IntoIterator for SnapshotChanges<S, I> {
    type Item = SnapshotChange<S, I>;
    type IntoIter = std::vec::IntoIter<SnapshotChange<S, I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}
