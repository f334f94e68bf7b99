use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate key {key:?} at index {index}")]
pub struct DuplicateKeyError<K: Debug> {
    pub key: K,
    pub index: usize,
}

/// Groups keep the input order of their items.
pub fn group_by<T, K, I, F>(items: I, mut key_fn: F) -> BTreeMap<K, Vec<T>>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut groups = BTreeMap::<K, Vec<T>>::new();
    for item in items {
        groups.entry(key_fn(&item)).or_default().push(item);
    }
    groups
}

pub fn count_by<T, K, I, F>(items: I, mut key_fn: F) -> BTreeMap<K, usize>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut counts = BTreeMap::<K, usize>::new();
    for item in items {
        *counts.entry(key_fn(&item)).or_default() += 1;
    }
    counts
}

pub fn lookup_table<T, K, I, F>(items: I, mut key_fn: F) -> Result<HashMap<K, T>, DuplicateKeyError<K>>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Debug,
    F: FnMut(&T) -> K,
{
    let mut table = HashMap::new();
    for (index, item) in items.into_iter().enumerate() {
        let key = key_fn(&item);
        if table.contains_key(&key) {
            return Err(DuplicateKeyError { key, index });
        }
        table.insert(key, item);
    }
    Ok(table)
}

/// Lowest-scoring item. Ties keep the earliest item; NaN scores are skipped.
pub fn min_by_score<T, I, F>(items: I, score_fn: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> f32,
{
    best_by_score(items, score_fn, |candidate, best| candidate < best)
}

/// Highest-scoring item. Ties keep the earliest item; NaN scores are skipped.
pub fn max_by_score<T, I, F>(items: I, score_fn: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> f32,
{
    best_by_score(items, score_fn, |candidate, best| candidate > best)
}

fn best_by_score<T, I, F, B>(items: I, mut score_fn: F, beats: B) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> f32,
    B: Fn(f32, f32) -> bool,
{
    let mut best: Option<(T, f32)> = None;
    for item in items {
        let score = score_fn(&item);
        if score.is_nan() {
            continue;
        }
        let replace = match &best {
            Some((_, best_score)) => beats(score, *best_score),
            None => true,
        };
        if replace {
            best = Some((item, score));
        }
    }
    best.map(|(item, _)| item)
}
