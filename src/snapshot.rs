use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Debug},
    hash::Hash,
    marker::PhantomData,
};

use derive_ex::{derive_ex, Ex};
use parse_display::Display;
use serde::{Deserialize, Serialize};
use slabmap::SlabMap;
use tracing::trace;

use crate::{utils::dedup_keep_last, SnapshotChanges};


/// Position of an item as a list view sees it: section index and row within that section.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{section}.{item}")]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

#[derive(Clone)]
struct SectionEntry<S, I> {
    id: S,
    items: Vec<I>,
    reload: bool,
}

#[derive(Clone, Copy)]
struct SectionSlot {
    key: usize,
    position: usize,
}

#[derive(Clone, Copy)]
struct ItemSlot {
    section: usize,
    row: usize,
}

/// An ordered list of sections, each holding an ordered list of items.
///
/// Section identifiers are unique within the snapshot, and item identifiers are unique across all
/// sections. Operations that name an absent identifier do nothing.
///
/// `Snapshot` is a value: cloning it yields an independent copy.
#[derive(Ex)]
#[derive_ex(Clone, Default)]
#[default(Self::new())]
pub struct Snapshot<S, I> {
    sections: SlabMap<SectionEntry<S, I>>,
    order: Vec<usize>,
    section_ids: Vec<S>,
    section_slots: HashMap<S, SectionSlot>,
    item_slots: HashMap<I, ItemSlot>,
    reloaded_items: HashSet<I>,
}

impl<S, I> Snapshot<S, I> {
    pub fn new() -> Self {
        Self {
            sections: SlabMap::new(),
            order: Vec::new(),
            section_ids: Vec::new(),
            section_slots: HashMap::new(),
            item_slots: HashMap::new(),
            reloaded_items: HashSet::new(),
        }
    }

    pub fn section_identifiers(&self) -> &[S] {
        &self.section_ids
    }
    pub fn number_of_sections(&self) -> usize {
        self.order.len()
    }
    pub fn number_of_items(&self) -> usize {
        self.item_slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
    pub fn section_at(&self, index: usize) -> Option<&S> {
        self.section_ids.get(index)
    }
    pub fn item_at(&self, path: IndexPath) -> Option<&I> {
        let key = *self.order.get(path.section)?;
        self.sections[key].items.get(path.item)
    }

    /// Iterates all items in section order, then item order.
    pub fn iter_items(&self) -> impl Iterator<Item = &I> + '_ {
        self.order
            .iter()
            .flat_map(move |&key| self.sections[key].items.iter())
    }

    /// Iterates sections paired with their items.
    pub fn iter_sections(
        &self,
    ) -> impl DoubleEndedIterator<Item = (&S, &[I])> + ExactSizeIterator + '_ {
        self.order.iter().map(move |&key| {
            let entry = &self.sections[key];
            (&entry.id, entry.items.as_slice())
        })
    }
}

impl<S, I> Snapshot<S, I>
where
    S: Eq + Hash + Clone,
    I: Eq + Hash + Clone,
{
    /// All items in section order, then item order.
    pub fn item_identifiers(&self) -> Vec<I> {
        self.iter_items().cloned().collect()
    }

    /// Items of `section`, empty when the section is absent.
    pub fn item_identifiers_in(&self, section: &S) -> &[I] {
        match self.section_slots.get(section) {
            Some(slot) => &self.sections[slot.key].items,
            None => &[],
        }
    }
    pub fn number_of_items_in(&self, section: &S) -> usize {
        self.item_identifiers_in(section).len()
    }
    pub fn contains_section(&self, section: &S) -> bool {
        self.section_slots.contains_key(section)
    }
    pub fn contains_item(&self, item: &I) -> bool {
        self.item_slots.contains_key(item)
    }
    pub fn section_identifier_containing(&self, item: &I) -> Option<&S> {
        let slot = self.item_slots.get(item)?;
        Some(&self.sections[slot.section].id)
    }

    /// Position of `item` within its own section.
    pub fn index_of_item(&self, item: &I) -> Option<usize> {
        Some(self.item_slots.get(item)?.row)
    }
    pub fn index_of_section(&self, section: &S) -> Option<usize> {
        Some(self.section_slots.get(section)?.position)
    }
    pub fn index_path_of_item(&self, item: &I) -> Option<IndexPath> {
        let slot = self.item_slots.get(item)?;
        let section = self.index_of_section(&self.sections[slot.section].id)?;
        Some(IndexPath::new(section, slot.row))
    }

    pub fn reloaded_section_identifiers(&self) -> impl Iterator<Item = &S> + '_ {
        self.order
            .iter()
            .map(move |&key| &self.sections[key])
            .filter(|entry| entry.reload)
            .map(|entry| &entry.id)
    }
    pub fn reloaded_item_identifiers(&self) -> impl Iterator<Item = &I> + '_ {
        self.iter_items()
            .filter(move |item| self.reloaded_items.contains(*item))
    }
    pub fn is_section_reloaded(&self, section: &S) -> bool {
        self.section_slots
            .get(section)
            .is_some_and(|slot| self.sections[slot.key].reload)
    }
    pub fn is_item_reloaded(&self, item: &I) -> bool {
        self.reloaded_items.contains(item)
    }

    /// Changes that turn what a list view shows for `old` into this snapshot.
    pub fn changes_from(&self, old: &Self) -> SnapshotChanges<S, I> {
        SnapshotChanges::between(old, self)
    }

    pub fn append_sections(&mut self, sections: impl IntoIterator<Item = S>) {
        let position = self.order.len();
        self.insert_sections_at(position, sections);
    }
    pub fn insert_sections_before(&mut self, sections: impl IntoIterator<Item = S>, before: &S) {
        let Some(position) = self.index_of_section(before) else {
            trace!("insert_sections_before: anchor section is absent");
            return;
        };
        self.insert_sections_at(position, sections);
    }
    pub fn insert_sections_after(&mut self, sections: impl IntoIterator<Item = S>, after: &S) {
        let Some(position) = self.index_of_section(after) else {
            trace!("insert_sections_after: anchor section is absent");
            return;
        };
        self.insert_sections_at(position + 1, sections);
    }

    /// Removes the sections and every item they hold.
    pub fn delete_sections<'a>(&mut self, sections: impl IntoIterator<Item = &'a S>)
    where
        S: 'a,
    {
        let mut positions: Vec<usize> = sections
            .into_iter()
            .filter_map(|section| self.index_of_section(section))
            .collect();
        positions.sort_unstable();
        positions.dedup();
        let Some(&first) = positions.first() else {
            return;
        };
        for &position in positions.iter().rev() {
            let key = self.order.remove(position);
            self.section_ids.remove(position);
            if let Some(entry) = self.sections.remove(key) {
                self.section_slots.remove(&entry.id);
                for item in &entry.items {
                    self.item_slots.remove(item);
                    self.reloaded_items.remove(item);
                }
            }
        }
        self.reindex_sections(first);
    }

    pub fn move_section_before(&mut self, section: &S, before: &S) {
        self.move_section(section, before, false)
    }
    pub fn move_section_after(&mut self, section: &S, after: &S) {
        self.move_section(section, after, true)
    }

    /// Marks sections for refresh without changing order or membership.
    pub fn reload_sections<'a>(&mut self, sections: impl IntoIterator<Item = &'a S>)
    where
        S: 'a,
    {
        for section in sections {
            if let Some(slot) = self.section_slots.get(section) {
                self.sections[slot.key].reload = true;
            }
        }
    }

    /// Appends items to the last section, or does nothing when there are no sections.
    pub fn append_items_to_last_section(&mut self, items: impl IntoIterator<Item = I>) {
        let Some(section) = self.section_ids.last().cloned() else {
            trace!("append_items_to_last_section: snapshot has no sections");
            return;
        };
        self.append_items(items, &section);
    }

    /// Appends items to the end of `section`.
    ///
    /// An item already present anywhere in the snapshot is moved to its new position.
    pub fn append_items(&mut self, items: impl IntoIterator<Item = I>, section: &S) {
        let Some(key) = self.section_slots.get(section).map(|slot| slot.key) else {
            trace!("append_items: target section is absent");
            return;
        };
        let items = dedup_keep_last(items);
        for item in &items {
            self.detach_item(item);
        }
        let row = self.sections[key].items.len();
        self.place_items(key, row, items);
    }
    pub fn insert_items_before(&mut self, items: impl IntoIterator<Item = I>, before: &I) {
        self.insert_items(items, before, false)
    }
    pub fn insert_items_after(&mut self, items: impl IntoIterator<Item = I>, after: &I) {
        self.insert_items(items, after, true)
    }

    pub fn delete_items<'a>(&mut self, items: impl IntoIterator<Item = &'a I>)
    where
        I: 'a,
    {
        for item in items {
            if self.detach_item(item) {
                self.reloaded_items.remove(item);
            }
        }
    }

    /// Empties every section, keeping the sections themselves.
    pub fn delete_all_items(&mut self) {
        for key in &self.order {
            self.sections[*key].items.clear();
        }
        self.item_slots.clear();
        self.reloaded_items.clear();
    }

    pub fn move_item_before(&mut self, item: &I, before: &I) {
        self.move_item(item, before, false)
    }
    pub fn move_item_after(&mut self, item: &I, after: &I) {
        self.move_item(item, after, true)
    }

    /// Marks items for refresh without changing order or membership.
    pub fn reload_items<'a>(&mut self, items: impl IntoIterator<Item = &'a I>)
    where
        I: 'a,
    {
        for item in items {
            if self.item_slots.contains_key(item) {
                self.reloaded_items.insert(item.clone());
            }
        }
    }

    pub(crate) fn clear_reload_marks(&mut self) {
        for key in &self.order {
            self.sections[*key].reload = false;
        }
        self.reloaded_items.clear();
    }

    fn insert_sections_at(&mut self, position: usize, sections: impl IntoIterator<Item = S>) {
        let mut keys = Vec::new();
        let mut ids = Vec::new();
        for id in sections {
            if self.section_slots.contains_key(&id) {
                continue;
            }
            let key = self.sections.insert(SectionEntry {
                id: id.clone(),
                items: Vec::new(),
                reload: false,
            });
            self.section_slots
                .insert(id.clone(), SectionSlot { key, position });
            keys.push(key);
            ids.push(id);
        }
        if keys.is_empty() {
            return;
        }
        self.order.splice(position..position, keys);
        self.section_ids.splice(position..position, ids);
        self.reindex_sections(position);
    }

    fn move_section(&mut self, section: &S, anchor: &S, after: bool) {
        if section == anchor {
            return;
        }
        let (Some(source), Some(target)) =
            (self.index_of_section(section), self.index_of_section(anchor))
        else {
            trace!("move_section: source or anchor section is absent");
            return;
        };
        let key = self.order.remove(source);
        let id = self.section_ids.remove(source);
        let mut position = if target > source { target - 1 } else { target };
        if after {
            position += 1;
        }
        self.order.insert(position, key);
        self.section_ids.insert(position, id);
        self.reindex_sections(source.min(position));
    }

    fn insert_items(&mut self, items: impl IntoIterator<Item = I>, anchor: &I, after: bool) {
        if !self.item_slots.contains_key(anchor) {
            trace!("insert_items: anchor item is absent");
            return;
        }
        let items: Vec<I> = dedup_keep_last(items)
            .into_iter()
            .filter(|item| item != anchor)
            .collect();
        if items.is_empty() {
            return;
        }
        for item in &items {
            self.detach_item(item);
        }
        let slot = self.item_slots[anchor];
        let row = if after { slot.row + 1 } else { slot.row };
        self.place_items(slot.section, row, items);
    }

    fn move_item(&mut self, item: &I, anchor: &I, after: bool) {
        if item == anchor || !self.item_slots.contains_key(anchor) {
            return;
        }
        if !self.detach_item(item) {
            trace!("move_item: item is absent");
            return;
        }
        let slot = self.item_slots[anchor];
        let row = if after { slot.row + 1 } else { slot.row };
        self.place_items(slot.section, row, vec![item.clone()]);
    }

    fn detach_item(&mut self, item: &I) -> bool {
        let Some(slot) = self.item_slots.remove(item) else {
            return false;
        };
        self.sections[slot.section].items.remove(slot.row);
        self.reindex_items(slot.section, slot.row);
        true
    }

    fn place_items(&mut self, section: usize, row: usize, items: Vec<I>) {
        for item in &items {
            self.item_slots.insert(item.clone(), ItemSlot { section, row });
        }
        self.sections[section].items.splice(row..row, items);
        self.reindex_items(section, row);
    }

    fn reindex_sections(&mut self, from: usize) {
        for position in from..self.section_ids.len() {
            if let Some(slot) = self.section_slots.get_mut(&self.section_ids[position]) {
                slot.position = position;
            }
        }
    }
    fn reindex_items(&mut self, section: usize, from: usize) {
        let items = &self.sections[section].items;
        for (row, item) in items.iter().enumerate().skip(from) {
            if let Some(slot) = self.item_slots.get_mut(item) {
                slot.row = row;
            }
        }
    }
}

/// Compares layout only; reload marks are ignored.
impl<S: PartialEq, I: PartialEq> PartialEq for Snapshot<S, I> {
    fn eq(&self, other: &Self) -> bool {
        self.order.len() == other.order.len() && self.iter_sections().eq(other.iter_sections())
    }
}
impl<S: Eq, I: Eq> Eq for Snapshot<S, I> {}

impl<S: Debug, I: Debug> Debug for Snapshot<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_sections()).finish()
    }
}

impl<S, I> Extend<(S, Vec<I>)> for Snapshot<S, I>
where
    S: Eq + Hash + Clone,
    I: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (S, Vec<I>)>>(&mut self, iter: T) {
        for (section, items) in iter {
            self.append_sections([section.clone()]);
            self.append_items(items, &section);
        }
    }
}
impl<S, I> FromIterator<(S, Vec<I>)> for Snapshot<S, I>
where
    S: Eq + Hash + Clone,
    I: Eq + Hash + Clone,
{
    fn from_iter<T: IntoIterator<Item = (S, Vec<I>)>>(iter: T) -> Self {
        let mut this = Self::new();
        this.extend(iter);
        this
    }
}

impl<S: Serialize, I: Serialize> Serialize for Snapshot<S, I> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        serializer.collect_seq(self.iter_sections())
    }
}
impl<'de, S, I> Deserialize<'de> for Snapshot<S, I>
where
    S: Deserialize<'de> + Eq + Hash + Clone,
    I: Deserialize<'de> + Eq + Hash + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SnapshotVisitor<S, I>(PhantomData<fn() -> (S, I)>);
        impl<'de, S, I> serde::de::Visitor<'de> for SnapshotVisitor<S, I>
        where
            S: Deserialize<'de> + Eq + Hash + Clone,
            I: Deserialize<'de> + Eq + Hash + Clone,
        {
            type Value = Snapshot<S, I>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("sequence of sections with their items")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut snapshot = Snapshot::new();
                while let Some(section) = seq.next_element::<(S, Vec<I>)>()? {
                    snapshot.extend([section]);
                }
                Ok(snapshot)
            }
        }
        deserializer.deserialize_seq(SnapshotVisitor(PhantomData))
    }
}
