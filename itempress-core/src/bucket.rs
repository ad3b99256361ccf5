//! Deterministic variant bucketer.
//!
//! Partitions a pool of same-topic questions into `k` diversity-balanced
//! groups for differentiated-variant generation. All ordering decisions are
//! derived from SHA-256 digests of `seed`-qualified keys, so a given seed
//! and pool always reproduce bit-identical buckets, with no dependence on
//! input order or map iteration order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// One question in the pool to be partitioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PoolQuestion {
    /// Question identifier, unique within the pool.
    pub id: String,
    /// Problem-type tag used for diversity balancing.
    pub problem_type: String,
}

/// Errors raised by [`bucketize`].
#[derive(Debug, Error)]
pub enum BucketError {
    /// Zero buckets were requested.
    #[error("bucket count must be at least 1")]
    InvalidBucketCount,

    /// The pool has no questions.
    #[error("question pool is empty")]
    EmptyPool,

    /// Two pool entries share an id; the partition would be ambiguous.
    #[error("duplicate question id in pool: {0}")]
    DuplicateId(String),

    /// A bucket came out empty. Unreachable while `k_actual <= pool size`;
    /// a hard error, not a warning, when it happens anyway.
    #[error("bucket {index} is empty after dealing")]
    EmptyBucket {
        /// Index of the offending bucket.
        index: usize,
    },
}

fn digest_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Partition `pool` into `min(k, pool.len())` non-empty buckets.
///
/// Questions are grouped by problem type, ordered within and across groups
/// by seeded digest, round-robin interleaved to maximize variety, then
/// dealt by position modulo the bucket count. The returned buckets are an
/// exact partition of the pool ids.
///
/// # Errors
///
/// Returns [`BucketError`] for `k == 0`, an empty pool, or duplicate ids.
pub fn bucketize(
    seed: &str,
    pool: &[PoolQuestion],
    k: usize,
) -> Result<Vec<Vec<String>>, BucketError> {
    if k == 0 {
        return Err(BucketError::InvalidBucketCount);
    }
    if pool.is_empty() {
        return Err(BucketError::EmptyPool);
    }

    let mut seen = BTreeSet::new();
    for question in pool {
        if !seen.insert(question.id.as_str()) {
            return Err(BucketError::DuplicateId(question.id.clone()));
        }
    }

    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for question in pool {
        groups
            .entry(question.problem_type.as_str())
            .or_default()
            .push(question.id.as_str());
    }

    // Stable intra-group order: digest of seed:group:id, ties lexical.
    let mut ordered_groups: Vec<(String, &str, Vec<&str>)> = groups
        .into_iter()
        .map(|(key, mut ids)| {
            ids.sort_by_cached_key(|id| (digest_hex(&format!("{seed}:{key}:{id}")), (*id).to_string()));
            (digest_hex(&format!("{seed}:{key}")), key, ids)
        })
        .collect();
    // Stable inter-group order: digest of seed:group, ties lexical.
    ordered_groups.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));

    // Round-robin interleave across problem types.
    let longest = ordered_groups.iter().map(|(_, _, ids)| ids.len()).max().unwrap_or(0);
    let mut merged = Vec::with_capacity(pool.len());
    for round in 0..longest {
        for (_, _, ids) in &ordered_groups {
            if let Some(id) = ids.get(round) {
                merged.push((*id).to_string());
            }
        }
    }

    let k_actual = k.min(pool.len());
    let mut buckets = vec![Vec::new(); k_actual];
    for (position, id) in merged.into_iter().enumerate() {
        buckets[position % k_actual].push(id);
    }

    for (index, bucket) in buckets.iter().enumerate() {
        if bucket.is_empty() {
            return Err(BucketError::EmptyBucket { index });
        }
    }

    tracing::debug!(
        pool = pool.len(),
        groups = ordered_groups.len(),
        buckets = k_actual,
        "bucketized question pool"
    );
    Ok(buckets)
}
