//! Deterministic contiguous-block fold partitioning

use alembic_core::{Error, Result};
use std::ops::Range;

/// Index range of fold `fold` over `len` sorted items.
///
/// Every fold spans `len / fold_count` items; the remainder past the last
/// block never lands in a held-out fold.
pub fn fold_range(len: usize, fold_count: usize, fold: usize) -> Range<usize> {
    let size = len / fold_count;
    size * fold..size * (fold + 1)
}

/// Sort `names` and slice them into `fold_count` contiguous held-out blocks
pub fn partition<T: Ord + Clone>(names: &[T], fold_count: usize) -> Result<Vec<Vec<T>>> {
    if fold_count == 0 {
        return Err(Error::InvalidFoldCount(fold_count));
    }

    let mut sorted = names.to_vec();
    sorted.sort();

    Ok((0..fold_count)
        .map(|fold| sorted[fold_range(sorted.len(), fold_count, fold)].to_vec())
        .collect())
}
