//! Stock aggregates.
//!
//! Sequences are given 0-indexed and read through 1-based positions. Values are
//! dense ranks (see [`crate::Compressed`]) unless noted. Each type states the width of
//! its accumulator; overflow beyond it is the caller's concern.

use crate::compress::Compressed;
use crate::query::Query;
use crate::traits::{AddOnlyAggregate, Aggregate, DeleteOnlyAggregate, Modifiable};

fn counter_len(values: &[usize]) -> usize {
    values.iter().copied().max().map_or(1, |m| m + 1)
}

/// `Σ count(v)^2` over the window. `u64` accumulator: exact while the window holds
/// fewer than 2^32 elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SumOfSquares {
    values: Vec<usize>,
    counts: Vec<u64>,
    sum: u64,
}

impl SumOfSquares {
    pub fn new(values: &[usize]) -> Self {
        Self {
            values: values.to_vec(),
            counts: vec![0; counter_len(values)],
            sum: 0,
        }
    }
}

impl Aggregate for SumOfSquares {
    type Output = u64;

    #[inline(always)]
    fn add(&mut self, position: usize) {
        let c = &mut self.counts[self.values[position - 1]];
        self.sum += 2 * *c + 1;
        *c += 1;
    }

    #[inline(always)]
    fn remove(&mut self, position: usize) {
        let c = &mut self.counts[self.values[position - 1]];
        *c -= 1;
        self.sum -= 2 * *c + 1;
    }

    fn answer(&self, _query: &Query) -> u64 {
        self.sum
    }
}

/// Number of distinct values in the window.
///
/// Also usable over tree nodes (positions are node ids) and over an editable
/// sequence via [`Modifiable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistinctCount {
    values: Vec<usize>,
    counts: Vec<u32>,
    distinct: usize,
}

impl DistinctCount {
    pub fn new(values: &[usize]) -> Self {
        Self::with_capacity(values, 0)
    }

    /// Reserves counters for values up to `max_value`, for sequences that will be
    /// edited to values not present initially.
    pub fn with_capacity(values: &[usize], max_value: usize) -> Self {
        let len = counter_len(values).max(max_value + 1);
        Self {
            values: values.to_vec(),
            counts: vec![0; len],
            distinct: 0,
        }
    }

    pub fn values(&self) -> &[usize] {
        &self.values
    }
}

impl Aggregate for DistinctCount {
    type Output = usize;

    #[inline(always)]
    fn add(&mut self, position: usize) {
        let c = &mut self.counts[self.values[position - 1]];
        if *c == 0 {
            self.distinct += 1;
        }
        *c += 1;
    }

    #[inline(always)]
    fn remove(&mut self, position: usize) {
        let c = &mut self.counts[self.values[position - 1]];
        *c -= 1;
        if *c == 0 {
            self.distinct -= 1;
        }
    }

    fn answer(&self, _query: &Query) -> usize {
        self.distinct
    }
}

impl Modifiable for DistinctCount {
    type Value = usize;

    fn replace(&mut self, position: usize, value: usize) -> usize {
        if value >= self.counts.len() {
            self.counts.resize(value + 1, 0);
        }
        std::mem::replace(&mut self.values[position - 1], value)
    }
}

/// Binary indexed tree over value ranks, counting occurrences.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Fenwick {
    tree: Vec<u32>,
}

impl Fenwick {
    fn new(n: usize) -> Self {
        Self {
            tree: vec![0; n + 1],
        }
    }

    fn add(&mut self, mut i: usize, delta: i32) {
        debug_assert!(i >= 1);
        while i < self.tree.len() {
            self.tree[i] = self.tree[i].wrapping_add_signed(delta);
            i += i & i.wrapping_neg();
        }
    }

    /// Occurrences of ranks in `1..=i`.
    fn prefix(&self, mut i: usize) -> u32 {
        let mut sum = 0;
        while i > 0 {
            sum += self.tree[i];
            i &= i - 1;
        }
        sum
    }
}

/// Pairs `i < j` in the window with `a[i] > a[j]`. `u64` accumulator.
///
/// Values are dense non-negative integers; the Fenwick tree is as wide as the largest.
///
/// Order-sensitive: relies on the side-specific hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InversionCount {
    // Shifted by one so every value is a valid Fenwick index.
    values: Vec<usize>,
    fenwick: Fenwick,
    len: u32,
    inversions: u64,
}

impl InversionCount {
    pub fn new(values: &[usize]) -> Self {
        let values: Vec<usize> = values.iter().map(|&v| v + 1).collect();
        let width = values.iter().copied().max().unwrap_or(0);
        Self {
            values,
            fenwick: Fenwick::new(width),
            len: 0,
            inversions: 0,
        }
    }

    #[inline(always)]
    fn smaller(&self, v: usize) -> u64 {
        self.fenwick.prefix(v - 1) as u64
    }

    #[inline(always)]
    fn larger(&self, v: usize) -> u64 {
        (self.len - self.fenwick.prefix(v)) as u64
    }
}

impl Aggregate for InversionCount {
    type Output = u64;

    fn add(&mut self, position: usize) {
        self.add_right(position);
    }

    fn remove(&mut self, position: usize) {
        self.remove_right(position);
    }

    fn add_left(&mut self, position: usize) {
        let v = self.values[position - 1];
        self.inversions += self.smaller(v);
        self.fenwick.add(v, 1);
        self.len += 1;
    }

    fn add_right(&mut self, position: usize) {
        let v = self.values[position - 1];
        self.inversions += self.larger(v);
        self.fenwick.add(v, 1);
        self.len += 1;
    }

    fn remove_left(&mut self, position: usize) {
        let v = self.values[position - 1];
        self.fenwick.add(v, -1);
        self.len -= 1;
        self.inversions -= self.smaller(v);
    }

    fn remove_right(&mut self, position: usize) {
        let v = self.values[position - 1];
        self.fenwick.add(v, -1);
        self.len -= 1;
        self.inversions -= self.larger(v);
    }

    fn answer(&self, _query: &Query) -> u64 {
        self.inversions
    }
}

/// `max(v * count(v))` over the window, the "importance" of the heaviest value.
///
/// Add-only: the maximum has no decrement. `u128` accumulator, exact for any `u64`
/// value repeated up to 2^64 times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaxImportance {
    values: Vec<u64>,
    ranks: Vec<usize>,
    counts: Vec<u64>,
    best: u128,
}

impl MaxImportance {
    pub fn new(values: &[u64]) -> Self {
        let compressed = Compressed::new(values);
        let distinct = compressed.distinct();
        Self {
            values: values.to_vec(),
            ranks: compressed.into_ranks(),
            counts: vec![0; distinct + 1],
            best: 0,
        }
    }
}

impl AddOnlyAggregate for MaxImportance {
    type Output = u128;
    type Snapshot = u128;

    #[inline(always)]
    fn add(&mut self, position: usize) {
        let c = &mut self.counts[self.ranks[position - 1]];
        *c += 1;
        let importance = self.values[position - 1] as u128 * *c as u128;
        self.best = self.best.max(importance);
    }

    #[inline(always)]
    fn forget(&mut self, position: usize) {
        self.counts[self.ranks[position - 1]] -= 1;
    }

    fn snapshot(&self) -> u128 {
        self.best
    }

    fn rollback(&mut self, snapshot: u128) {
        self.best = snapshot;
    }

    fn answer(&self, _query: &Query) -> u128 {
        self.best
    }
}

/// Most frequent value in the window, reported only when its frequency reaches the
/// query's `threshold`.
///
/// Equal frequencies resolve to the smallest value. Add-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThresholdMode {
    compressed: Compressed<i64>,
    counts: Vec<u32>,
    // `(count, rank)` of the current mode; rank 0 while the window is empty.
    best: (u32, usize),
}

impl ThresholdMode {
    pub fn new(values: &[i64]) -> Self {
        let compressed = Compressed::new(values);
        let counts = vec![0; compressed.distinct() + 1];
        Self {
            compressed,
            counts,
            best: (0, 0),
        }
    }
}

impl AddOnlyAggregate for ThresholdMode {
    type Output = Option<i64>;
    type Snapshot = (u32, usize);

    fn add(&mut self, position: usize) {
        let r = self.compressed.ranks()[position - 1];
        let c = &mut self.counts[r];
        *c += 1;
        let (best_count, best_rank) = self.best;
        if *c > best_count || (*c == best_count && r < best_rank) {
            self.best = (*c, r);
        }
    }

    fn forget(&mut self, position: usize) {
        self.counts[self.compressed.ranks()[position - 1]] -= 1;
    }

    fn snapshot(&self) -> (u32, usize) {
        self.best
    }

    fn rollback(&mut self, snapshot: (u32, usize)) {
        self.best = snapshot;
    }

    fn answer(&self, query: &Query) -> Option<i64> {
        let (count, rank) = self.best;
        (count > 0 && count as usize >= query.threshold).then(|| self.compressed.value_of(rank))
    }
}

/// Smallest non-negative integer absent from the window.
///
/// Delete-only: removals can only lower the answer, so it is kept as a watermark.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mex {
    // Values above `len` cannot decide the answer and are clamped to `len + 1`.
    values: Vec<usize>,
    counts: Vec<u32>,
    mex: usize,
}

impl Mex {
    /// Aggregate over the whole of `values`.
    pub fn full(values: &[usize]) -> Self {
        let n = values.len();
        let values: Vec<usize> = values.iter().map(|&v| v.min(n + 1)).collect();
        let mut counts = vec![0; n + 2];
        for &v in &values {
            counts[v] += 1;
        }
        let mex = counts.iter().position(|&c| c == 0).unwrap_or(n + 1);
        Self {
            values,
            counts,
            mex,
        }
    }
}

impl DeleteOnlyAggregate for Mex {
    type Output = usize;
    type Snapshot = usize;

    #[inline(always)]
    fn remove(&mut self, position: usize) {
        let v = self.values[position - 1];
        let c = &mut self.counts[v];
        *c -= 1;
        if *c == 0 && v < self.mex {
            self.mex = v;
        }
    }

    #[inline(always)]
    fn restore(&mut self, position: usize) {
        self.counts[self.values[position - 1]] += 1;
    }

    fn snapshot(&self) -> usize {
        self.mex
    }

    fn rollback(&mut self, snapshot: usize) {
        self.mex = snapshot;
    }

    fn answer(&self, _query: &Query) -> usize {
        self.mex
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::Window;

    fn q(left: usize, right: usize) -> Query {
        Query::new(0, left, right)
    }

    #[test]
    fn sum_of_squares_counts() {
        let mut window = Window::new(SumOfSquares::new(&[1, 2, 1, 1, 2]));
        window.move_to(1, 5);
        assert_eq!(window.aggregate().answer(&q(1, 5)), 13);
        window.move_to(2, 3);
        assert_eq!(window.aggregate().answer(&q(2, 3)), 2);
    }

    #[test]
    fn inversions_from_both_sides() {
        let values = [3, 1, 2, 5, 4];
        let mut window = Window::starting_at(InversionCount::new(&values), 3);
        window.move_to(1, 5);
        // (3,1) (3,2) (5,4)
        assert_eq!(window.aggregate().answer(&q(1, 5)), 3);
        window.move_to(2, 4);
        assert_eq!(window.aggregate().answer(&q(2, 4)), 0);
        window.move_to(1, 2);
        assert_eq!(window.aggregate().answer(&q(1, 2)), 1);
    }

    #[test]
    fn inversions_accept_zero() {
        let values = [2, 0, 1, 0];
        let mut window = Window::new(InversionCount::new(&values));
        window.move_to(1, 4);
        // (2,0) (2,1) (2,0) (1,0)
        assert_eq!(window.aggregate().answer(&q(1, 4)), 4);
        window.move_to(2, 4);
        assert_eq!(window.aggregate().answer(&q(2, 4)), 1);
        window.move_to(2, 2);
        assert_eq!(window.aggregate().answer(&q(2, 2)), 0);
    }

    #[test]
    fn distinct_count_replace_grows_counters() {
        let mut agg = DistinctCount::new(&[1, 2]);
        assert_eq!(agg.replace(1, 9), 1);
        agg.add(1);
        agg.add(2);
        assert_eq!(agg.answer(&q(1, 2)), 2);
        assert_eq!(agg.values(), &[9, 2]);
    }

    #[test]
    fn max_importance_weighs_repeats() {
        let mut agg = MaxImportance::new(&[3, 8, 3, 3]);
        for i in 1..=4 {
            agg.add(i);
        }
        assert_eq!(agg.answer(&q(1, 4)), 9);
    }

    #[test]
    fn threshold_mode_prefers_smaller_on_ties() {
        let mut agg = ThresholdMode::new(&[7, 4, 7, 4, 9]);
        for i in 1..=5 {
            agg.add(i);
        }
        assert_eq!(agg.answer(&q(1, 5)), Some(4));
        assert_eq!(agg.answer(&q(1, 5).with_threshold(2)), Some(4));
        assert_eq!(agg.answer(&q(1, 5).with_threshold(3)), None);
    }

    #[test]
    fn mex_watermark() {
        let mut agg = Mex::full(&[0, 1, 2, 100]);
        assert_eq!(agg.answer(&q(1, 4)), 3);
        let s = agg.snapshot();
        agg.remove(2);
        assert_eq!(agg.answer(&q(1, 4)), 1);
        agg.restore(2);
        agg.rollback(s);
        assert_eq!(agg, Mex::full(&[0, 1, 2, 100]));
    }
}
