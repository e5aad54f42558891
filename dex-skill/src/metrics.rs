use crate::data_processing::ItemId;
use crate::summary::RankedItem;
use std::collections::HashMap;

fn inversions_by_mergesort(values: &mut [f64]) -> usize {
    let len = values.len();
    if len < 2 {
        return 0;
    }

    let (left, right) = values.split_at_mut(len / 2);
    let (mut l_idx, mut r_idx) = (0, 0);
    let mut merged = Vec::with_capacity(len);
    let mut invs = inversions_by_mergesort(left) + inversions_by_mergesort(right);
    while l_idx < left.len() && r_idx < right.len() {
        if left[l_idx] >= right[r_idx] {
            merged.push(left[l_idx]);
            l_idx += 1;
        } else {
            merged.push(right[r_idx]);
            r_idx += 1;
            invs += left.len() - l_idx;
        }
    }
    merged.extend(&left[l_idx..]);
    merged.extend(&right[r_idx..]);
    values.copy_from_slice(&merged);
    invs
}

/// Percentage of item pairs that `view` orders the same way as the hidden `truth` strengths.
/// Items missing from `truth` are skipped. Returns None with fewer than two comparable items.
pub fn pairwise_accuracy(view: &[RankedItem], truth: &HashMap<ItemId, f64>) -> Option<f64> {
    // Hidden strengths read in view order; a fully correct view is non-increasing.
    let mut strengths: Vec<f64> = view
        .iter()
        .filter_map(|item| truth.get(&item.id).copied())
        .collect();
    let n = strengths.len();
    if n < 2 {
        return None;
    }
    let invs = inversions_by_mergesort(&mut strengths) as f64;
    let pairs = (n * (n - 1) / 2) as f64;
    Some(100. * (1. - invs / pairs))
}
