//! Window disciplines for aggregates that cannot undo a single position.
//!
//! Both walk the plan one block group at a time and repair the derived value from a
//! snapshot instead of inverting individual updates.

use std::borrow::Cow;

use crate::answers::Answers;
use crate::query::{Plan, Query};
use crate::traits::{AddOnlyAggregate, DeleteOnlyAggregate};

/// `group` with `right` ascending; plans built with [`SortOrder::EvenOdd`] have odd
/// groups descending.
///
/// [`SortOrder::EvenOdd`]: crate::SortOrder::EvenOdd
fn ascending(group: &[Query]) -> Cow<'_, [Query]> {
    if group.is_sorted_by_key(|q| q.right) {
        return Cow::Borrowed(group);
    }
    let mut sorted = group.to_vec();
    sorted.sort_by_key(|q| q.right);
    Cow::Owned(sorted)
}

/// Add-only discipline.
///
/// Per block `[lo, hi]` the right pointer starts at `hi` and only grows. A query that
/// ends inside the block is answered from scratch; every other query snapshots, grows
/// leftwards from `hi + 1`, answers, forgets the left part and rolls back.
///
/// Expects the aggregate to be empty. Groups not sorted by ascending `right` are
/// re-sorted first.
pub(crate) fn run_add_only<A>(agg: &mut A, plan: &Plan, answers: &mut Answers<A::Output>)
where
    A: AddOnlyAggregate,
{
    let blocks = plan.blocks();
    let neutral = agg.snapshot();

    for (block, group) in plan.groups() {
        let group = ascending(group);
        let (_, hi) = blocks.bounds(block);
        log::trace!("add-only block {block}: {} queries, boundary {hi}", group.len());

        // The window is `[hi + 1, winr]`.
        let mut winr = hi;
        for q in group.iter() {
            if q.right <= hi {
                // Ascending `right` puts these before any crossing query, so the
                // window is still empty.
                debug_assert_eq!(winr, hi);
                for i in q.left..=q.right {
                    agg.add_right(i);
                }
                answers.record(q.id, agg.answer(q));
                for i in q.left..=q.right {
                    agg.forget(i);
                }
                agg.rollback(neutral.clone());
                continue;
            }

            debug_assert!(winr <= q.right);
            while winr < q.right {
                winr += 1;
                agg.add_right(winr);
            }
            let snapshot = agg.snapshot();

            let mut winl = hi + 1;
            while winl > q.left {
                winl -= 1;
                agg.add_left(winl);
            }
            answers.record(q.id, agg.answer(q));

            while winl <= hi {
                agg.forget(winl);
                winl += 1;
            }
            agg.rollback(snapshot);
        }

        for i in (hi + 1)..=winr {
            agg.forget(i);
        }
        agg.rollback(neutral.clone());
    }
}

/// Delete-only discipline.
///
/// The aggregate starts as the whole sequence `[1, n]`. Per block `[lo, hi]` the
/// prefix before `lo` is removed for good and the block's queries are visited with
/// `right` descending. Each query snapshots, removes `[lo, left)`, answers, restores
/// the raw state of `[lo, left)` and rolls back. After the block the suffix removed by
/// the right pointer is restored and the block snapshot rolled back. The run ends with
/// the aggregate whole again.
pub(crate) fn run_delete_only<A>(agg: &mut A, plan: &Plan, answers: &mut Answers<A::Output>)
where
    A: DeleteOnlyAggregate,
{
    let blocks = plan.blocks();
    let n = blocks.span();
    let full = agg.snapshot();

    // The window is `[winl, n]` between blocks.
    let mut winl = 1;
    for (block, group) in plan.groups() {
        let group = ascending(group);
        let (lo, _) = blocks.bounds(block);
        log::trace!("delete-only block {block}: {} queries, boundary {lo}", group.len());

        while winl < lo {
            agg.remove(winl);
            winl += 1;
        }
        let block_snapshot = agg.snapshot();

        let mut winr = n;
        for q in group.iter().rev() {
            debug_assert!(q.right <= winr);
            while winr > q.right {
                agg.remove(winr);
                winr -= 1;
            }
            let snapshot = agg.snapshot();

            for i in lo..q.left {
                agg.remove(i);
            }
            answers.record(q.id, agg.answer(q));
            for i in lo..q.left {
                agg.restore(i);
            }
            agg.rollback(snapshot);
        }

        for i in (winr + 1)..=n {
            agg.restore(i);
        }
        agg.rollback(block_snapshot);
    }

    for i in 1..winl {
        agg.restore(i);
    }
    agg.rollback(full);
}

#[cfg(test)]
mod tests {
    use super::{run_add_only, run_delete_only};
    use crate::answers::Answers;
    use crate::config::{BlockLen, MoConfig, SortOrder};
    use crate::query::{Plan, Query};
    use crate::traits::{AddOnlyAggregate, DeleteOnlyAggregate};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Maximum over the window; exercises the add-only path with a value that has no
    /// decrement.
    #[derive(Clone, Debug, PartialEq, Eq)]
    struct RangeMax<'a> {
        values: &'a [i64],
        present: Vec<u32>,
        best: Option<i64>,
    }

    impl<'a> RangeMax<'a> {
        fn new(values: &'a [i64]) -> Self {
            Self {
                values,
                present: vec![0; values.len() + 1],
                best: None,
            }
        }
    }

    impl AddOnlyAggregate for RangeMax<'_> {
        type Output = Option<i64>;
        type Snapshot = Option<i64>;

        fn add(&mut self, position: usize) {
            self.present[position] += 1;
            let v = self.values[position - 1];
            self.best = Some(self.best.map_or(v, |b| b.max(v)));
        }

        fn forget(&mut self, position: usize) {
            self.present[position] -= 1;
        }

        fn snapshot(&self) -> Option<i64> {
            self.best
        }

        fn rollback(&mut self, snapshot: Option<i64>) {
            self.best = snapshot;
        }

        fn answer(&self, _query: &Query) -> Option<i64> {
            self.best
        }
    }

    /// Minimum over the window; the delete-only mirror of `RangeMax`.
    #[derive(Clone, Debug, PartialEq, Eq)]
    struct RangeMin<'a> {
        values: &'a [i64],
        present: Vec<bool>,
        min: i64,
    }

    impl<'a> RangeMin<'a> {
        fn full(values: &'a [i64]) -> Self {
            Self {
                values,
                present: vec![true; values.len() + 1],
                min: values.iter().copied().min().unwrap_or(i64::MAX),
            }
        }
    }

    impl DeleteOnlyAggregate for RangeMin<'_> {
        type Output = (i64, usize);
        type Snapshot = i64;

        fn remove(&mut self, position: usize) {
            assert!(self.present[position], "double remove of {position}");
            self.present[position] = false;
            // Recomputed from scratch; test sizes are tiny.
            let live = (1..=self.values.len()).filter(|&i| self.present[i]);
            self.min = live.map(|i| self.values[i - 1]).min().unwrap_or(i64::MAX);
        }

        fn restore(&mut self, position: usize) {
            assert!(!self.present[position], "double restore of {position}");
            self.present[position] = true;
        }

        fn snapshot(&self) -> i64 {
            self.min
        }

        fn rollback(&mut self, snapshot: i64) {
            self.min = snapshot;
        }

        fn answer(&self, query: &Query) -> (i64, usize) {
            let live = (1..=self.values.len()).filter(|&i| self.present[i]).count();
            assert_eq!(live, query.len(), "window does not match the query");
            (self.min, live)
        }
    }

    fn random_batch(rng: &mut StdRng, n: usize, q: usize) -> Vec<Query> {
        (0..q)
            .map(|id| {
                let l = rng.random_range(1..=n);
                let r = rng.random_range(l..=n);
                Query::new(id, l, r)
            })
            .collect()
    }

    #[test]
    fn add_only_matches_bruteforce() {
        let mut rng = StdRng::seed_from_u64(0xADD);
        for n in 1..40 {
            let values: Vec<i64> = (0..n).map(|_| rng.random_range(-50..=50)).collect();
            let queries = random_batch(&mut rng, n, 60);
            for block_len in [BlockLen::Sqrt, BlockLen::Fixed(1), BlockLen::Fixed(n)] {
                let config = MoConfig::default().with_block_len(block_len);
                let plan = Plan::new(n, &queries, &config).unwrap();
                let mut agg = RangeMax::new(&values);
                let mut answers = Answers::with_len(queries.len());
                run_add_only(&mut agg, &plan, &mut answers);

                assert_eq!(agg, RangeMax::new(&values), "state leaked after the batch");
                let got = answers.finish().unwrap();
                for q in &queries {
                    let expected = values[q.left - 1..q.right].iter().copied().max();
                    assert_eq!(got[q.id], expected, "n={n} q={q:?}");
                }
            }
        }
    }

    #[test]
    fn delete_only_matches_bruteforce() {
        let mut rng = StdRng::seed_from_u64(0xDE1);
        for n in 1..40 {
            let values: Vec<i64> = (0..n).map(|_| rng.random_range(-50..=50)).collect();
            let queries = random_batch(&mut rng, n, 60);
            for block_len in [BlockLen::Sqrt, BlockLen::Fixed(1), BlockLen::Fixed(n)] {
                let config = MoConfig::default().with_block_len(block_len);
                let plan = Plan::new(n, &queries, &config).unwrap();
                let mut agg = RangeMin::full(&values);
                let mut answers = Answers::with_len(queries.len());
                run_delete_only(&mut agg, &plan, &mut answers);

                assert_eq!(agg, RangeMin::full(&values), "prefix not restored");
                let got = answers.finish().unwrap();
                for q in &queries {
                    let expected = values[q.left - 1..q.right].iter().copied().min();
                    assert_eq!(Some(got[q.id].0), expected, "n={n} q={q:?}");
                }
            }
        }
    }

    #[test]
    fn even_odd_plans_are_answered_correctly() {
        let mut rng = StdRng::seed_from_u64(0xE0);
        for n in 1..40 {
            let values: Vec<i64> = (0..n).map(|_| rng.random_range(-50..=50)).collect();
            let queries = random_batch(&mut rng, n, 60);
            let config = MoConfig::default()
                .with_block_len(BlockLen::Fixed(3))
                .with_order(SortOrder::EvenOdd);
            let plan = Plan::new(n, &queries, &config).unwrap();

            let mut max = RangeMax::new(&values);
            let mut answers = Answers::with_len(queries.len());
            run_add_only(&mut max, &plan, &mut answers);
            let got_max = answers.finish().unwrap();

            let mut min = RangeMin::full(&values);
            let mut answers = Answers::with_len(queries.len());
            run_delete_only(&mut min, &plan, &mut answers);
            let got_min = answers.finish().unwrap();

            for q in &queries {
                let range = &values[q.left - 1..q.right];
                assert_eq!(got_max[q.id], range.iter().copied().max(), "n={n} q={q:?}");
                assert_eq!(Some(got_min[q.id].0), range.iter().copied().min(), "n={n} q={q:?}");
            }
            assert_eq!(max, RangeMax::new(&values));
            assert_eq!(min, RangeMin::full(&values));
        }
    }

    #[test]
    fn snapshot_then_rollback_is_identity() {
        let values = [3, 1, 4, 1, 5, 9, 2, 6];
        let mut agg = RangeMax::new(&values);
        for i in 2..=5 {
            agg.add(i);
        }
        let before = agg.clone();
        for _ in 0..3 {
            let s = agg.snapshot();
            agg.rollback(s);
        }
        assert_eq!(agg, before);
    }
}
