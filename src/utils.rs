use std::{collections::HashSet, hash::Hash};


#[cfg(test)]
pub(crate) mod test_helpers;

pub(crate) fn is_sorted(items: &[usize]) -> bool {
    for i in 1..items.len() {
        if items[i - 1] > items[i] {
            return false;
        }
    }
    true
}

/// Marks the members of one longest strictly increasing subsequence of `values`.
///
/// Entries left unmarked are the minimum set that has to move to put `values` in order.
pub(crate) fn stable_mask(values: &[usize]) -> Vec<bool> {
    let mut mask = vec![false; values.len()];
    if is_sorted(values) {
        mask.fill(true);
        return mask;
    }
    let mut tails: Vec<usize> = Vec::new();
    let mut prev = vec![None; values.len()];
    for (i, &value) in values.iter().enumerate() {
        let pos = tails.partition_point(|&t| values[t] < value);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        mask[i] = true;
        cursor = prev[i];
    }
    mask
}

/// Removes repeated values, keeping each at its first position.
pub(crate) fn dedup_keep_first<T: Eq + Hash + Clone>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Removes repeated values, keeping each at its last position.
pub(crate) fn dedup_keep_last<T: Eq + Hash + Clone>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let items: Vec<T> = items.into_iter().collect();
    let mut seen = HashSet::with_capacity(items.len());
    let mut result: Vec<T> = items
        .into_iter()
        .rev()
        .filter(|item| seen.insert(item.clone()))
        .collect();
    result.reverse();
    result
}
