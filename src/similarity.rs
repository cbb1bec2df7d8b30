//! Fuzzy title comparison across sources.
//!
//! Similarity is the indel ratio `2 * lcs / (len_a + len_b)`, where `lcs` is
//! the longest common subsequence over Unicode scalar values. Equivalently
//! `1 - indel / (len_a + len_b)` with `indel` the insert/delete edit
//! distance. It is symmetric, in `0.0..=1.0`, and two empty strings score 1.

use crate::config::DEFAULT_ACCURACY_THRESHOLD;

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(&a, &b)) as f64 / total as f64
}

/// True when `a` and `b` are at least 90% similar.
pub fn title_is_accurate(a: &str, b: &str) -> bool {
    title_is_accurate_with(a, b, DEFAULT_ACCURACY_THRESHOLD)
}

pub fn title_is_accurate_with(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) >= threshold
}
