// src/engine/quota.rs

use std::cmp::Ordering;

/// Splits `total` into integer counts proportional to `weights`
/// (largest-remainder apportionment).
///
/// Weights are relative: each is divided by their sum first, and weights that
/// are negative or not finite count as zero. When no weight is positive every
/// category gets an equal share. Each category then gets `floor(total * share)`
/// and the units still missing go one each to the categories with the largest
/// fractional parts. Ties keep the order of `weights`, so the same input
/// always yields the same output. Counts sum to `total` when `weights` is
/// non-empty.
pub fn apportion<K: Clone>(total: usize, weights: &[(K, f64)]) -> Vec<(K, usize)> {
    if weights.is_empty() {
        return Vec::new();
    }

    let sanitized: Vec<f64> = weights
        .iter()
        .map(|(_, w)| if w.is_finite() && *w > 0.0 { *w } else { 0.0 })
        .collect();
    let sum: f64 = sanitized.iter().sum();
    let shares: Vec<f64> = if sum > 0.0 {
        sanitized.iter().map(|w| w / sum).collect()
    } else {
        vec![1.0 / weights.len() as f64; weights.len()]
    };

    let raw: Vec<f64> = shares.iter().map(|s| total as f64 * s).collect();
    let mut counts: Vec<usize> = raw.iter().map(|r| r.floor() as usize).collect();
    let fractions: Vec<f64> = raw.iter().map(|r| r - r.floor()).collect();

    // Stable sort: equal fractions stay in category order.
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| {
        fractions[b]
            .partial_cmp(&fractions[a])
            .unwrap_or(Ordering::Equal)
    });

    // Shares sum to one: at most one extra unit per category.
    let assigned: usize = counts.iter().sum();
    for step in 0..total.saturating_sub(assigned) {
        counts[order[step % order.len()]] += 1;
    }

    weights
        .iter()
        .zip(counts)
        .map(|((key, _), count)| (key.clone(), count))
        .collect()
}
