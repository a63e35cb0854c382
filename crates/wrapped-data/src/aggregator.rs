//! Grouping primitives shared by every summary view.
//!
//! All views reduce to the same shape: a list of [`Bucket`]s pairing a key
//! with the minutes summed under it. Rankings sort those buckets with a
//! stable sort so that ties keep the order the buckets were produced in
//! (first-seen order for open key sets, natural order for fixed domains).

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use wrapped_core::formatting::minutes_to_hours;
use wrapped_core::models::EnrichedEvent;

// ── Bucket ────────────────────────────────────────────────────────────────────

/// Watch time accumulated under one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket<K> {
    pub key: K,
    pub minutes: u64,
    /// `minutes / 60`, rounded to two decimals.
    pub hours: f64,
}

impl<K> Bucket<K> {
    pub fn new(key: K, minutes: u64) -> Self {
        Self {
            key,
            minutes,
            hours: minutes_to_hours(minutes),
        }
    }
}

// ── Grouping ──────────────────────────────────────────────────────────────────

/// Sum runtime per key, returning buckets in first-seen order.
///
/// Events for which `key_fn` returns `None` are skipped.
pub fn group_minutes<K, F>(data: &[EnrichedEvent], key_fn: F) -> Vec<Bucket<K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&EnrichedEvent) -> Option<K>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut sums: Vec<(K, u64)> = Vec::new();

    for event in data {
        let Some(key) = key_fn(event) else { continue };
        let minutes = u64::from(event.runtime_minutes);
        match positions.get(&key) {
            Some(&pos) => sums[pos].1 += minutes,
            None => {
                positions.insert(key.clone(), sums.len());
                sums.push((key, minutes));
            }
        }
    }

    sums.into_iter()
        .map(|(key, minutes)| Bucket::new(key, minutes))
        .collect()
}

/// Sum runtime over a fixed key domain, returning one bucket per domain key
/// in domain order. Keys absent from the data keep zero minutes; events whose
/// key is outside the domain are ignored.
pub fn distribution<K, F>(data: &[EnrichedEvent], domain: &[K], key_fn: F) -> Vec<Bucket<K>>
where
    K: PartialEq + Clone,
    F: Fn(&EnrichedEvent) -> K,
{
    let mut sums = vec![0u64; domain.len()];

    for event in data {
        let key = key_fn(event);
        if let Some(pos) = domain.iter().position(|k| *k == key) {
            sums[pos] += u64::from(event.runtime_minutes);
        }
    }

    domain
        .iter()
        .cloned()
        .zip(sums)
        .map(|(key, minutes)| Bucket::new(key, minutes))
        .collect()
}

// ── Ranking ───────────────────────────────────────────────────────────────────

/// Sort buckets by minutes, highest first. The sort is stable, so equal
/// buckets keep their incoming order.
pub fn rank<K>(mut buckets: Vec<Bucket<K>>) -> Vec<Bucket<K>> {
    buckets.sort_by(|a, b| b.minutes.cmp(&a.minutes));
    buckets
}

/// Group by `key_fn` and rank the result.
pub fn rank_by<K, F>(data: &[EnrichedEvent], key_fn: F) -> Vec<Bucket<K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&EnrichedEvent) -> Option<K>,
{
    rank(group_minutes(data, key_fn))
}

/// The first `k` entries of a ranking, or all of them if there are fewer.
pub fn top_k<K>(ranking: &[Bucket<K>], k: usize) -> &[Bucket<K>] {
    &ranking[..k.min(ranking.len())]
}

/// Key of the bucket with the most minutes; ties go to the earliest bucket.
/// `None` only when there are no buckets.
pub fn peak<K: Clone>(buckets: &[Bucket<K>]) -> Option<K> {
    buckets
        .iter()
        .fold(None::<&Bucket<K>>, |best, b| match best {
            Some(cur) if cur.minutes >= b.minutes => Some(cur),
            _ => Some(b),
        })
        .map(|b| b.key.clone())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
