//! Mo's algorithm with point updates.
//!
//! A query stamped with time `t` sees the sequence after the first `t` updates. The
//! time pointer is a third window coordinate; each update slot holds the value that
//! moving across it will install, and the displaced value takes its place, so the same
//! step both applies and reverts.

use crate::answers::Answers;
use crate::config::MoConfig;
use crate::error::{MoError, Result};
use crate::query::{Plan, Query};
use crate::traits::Modifiable;
use crate::window::Window;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Update<V> {
    pub position: usize,
    pub value: V,
}

impl<V> Update<V> {
    pub fn new(position: usize, value: V) -> Self {
        Self { position, value }
    }
}

/// Answers `queries` against the sequence edited by `updates`, in submission order.
///
/// The aggregate must accept `add`/`remove` of any position inside the window, not
/// only its ends. On return the aggregate is empty and its sequence is back to the
/// state before the first update.
pub fn solve<A>(
    n: usize,
    queries: &[Query],
    updates: &[Update<A::Value>],
    agg: &mut A,
    config: &MoConfig,
) -> Result<Vec<A::Output>>
where
    A: Modifiable,
    A::Value: Clone,
{
    for (index, update) in updates.iter().enumerate() {
        if update.position == 0 || update.position > n {
            return Err(MoError::InvalidUpdate {
                index,
                position: update.position,
                len: n,
            });
        }
    }
    if let Some(q) = queries.iter().find(|q| q.time > updates.len()) {
        return Err(MoError::InvalidTime {
            id: q.id,
            time: q.time,
            updates: updates.len(),
        });
    }

    let plan = Plan::temporal(n, queries, config)?;
    log::debug!(
        "temporal batch: n={n}, q={}, updates={}, blocks={} of length {}",
        plan.len(),
        updates.len(),
        plan.blocks().len(),
        plan.blocks().block_len(),
    );

    let mut slots: Vec<A::Value> = updates.iter().map(|u| u.value.clone()).collect();
    let mut window = Window::new(agg);
    let mut now = 0;
    let mut answers = Answers::with_len(queries.len());
    for q in plan.queries() {
        window.move_to(q.left, q.right);
        while now < q.time {
            swap_update(&mut window, updates[now].position, &mut slots[now]);
            now += 1;
        }
        while now > q.time {
            now -= 1;
            swap_update(&mut window, updates[now].position, &mut slots[now]);
        }
        answers.record(q.id, window.aggregate().answer(q));
    }

    let (winl, _) = window.bounds();
    window.move_to(winl, winl - 1);
    while now > 0 {
        now -= 1;
        swap_update(&mut window, updates[now].position, &mut slots[now]);
    }
    answers.finish()
}

/// Installs `slot` at `position`, leaving the displaced value in `slot`.
fn swap_update<A>(window: &mut Window<&mut A>, position: usize, slot: &mut A::Value)
where
    A: Modifiable,
    A::Value: Clone,
{
    let inside = window.contains(position);
    let agg = window.aggregate_mut();
    if inside {
        agg.remove(position);
    }
    let old = agg.replace(position, slot.clone());
    *slot = old;
    if inside {
        agg.add(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DistinctCount;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    #[test]
    fn queries_see_their_own_time() {
        let values = [1, 2, 1, 3];
        let updates = [Update::new(2, 1), Update::new(4, 1)];
        let queries = vec![
            Query::new(0, 1, 4).with_time(2),
            Query::new(1, 1, 4),
            Query::new(2, 1, 4).with_time(1),
            Query::new(3, 2, 3).with_time(2),
        ];
        let mut agg = DistinctCount::new(&values);
        let got = solve(4, &queries, &updates, &mut agg, &MoConfig::temporal()).unwrap();
        assert_eq!(got, vec![1, 3, 2, 1]);
        assert_eq!(agg, DistinctCount::new(&values));
    }

    #[test]
    fn rejects_bad_updates_and_times() {
        let mut agg = DistinctCount::new(&[1, 2]);
        let err = solve(
            2,
            &[Query::new(0, 1, 2)],
            &[Update::new(3, 1)],
            &mut agg,
            &MoConfig::temporal(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            MoError::InvalidUpdate {
                index: 0,
                position: 3,
                len: 2
            }
        );

        let err = solve(
            2,
            &[Query::new(0, 1, 2).with_time(2)],
            &[Update::new(1, 1)],
            &mut agg,
            &MoConfig::temporal(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            MoError::InvalidTime {
                id: 0,
                time: 2,
                updates: 1
            }
        );
    }

    #[test]
    fn matches_replayed_bruteforce() {
        let mut rng = StdRng::seed_from_u64(0x71AE);
        for n in [1, 3, 10, 33, 80] {
            let values: Vec<usize> = (0..n).map(|_| rng.random_range(1..=8)).collect();
            let updates: Vec<_> = (0..rng.random_range(0..50))
                .map(|_| Update::new(rng.random_range(1..=n), rng.random_range(1..=12)))
                .collect();
            let queries: Vec<_> = (0..120)
                .map(|id| {
                    let l = rng.random_range(1..=n);
                    let r = rng.random_range(l..=n);
                    Query::new(id, l, r).with_time(rng.random_range(0..=updates.len()))
                })
                .collect();

            let mut agg = DistinctCount::with_capacity(&values, 12);
            let got = solve(n, &queries, &updates, &mut agg, &MoConfig::temporal()).unwrap();

            for q in &queries {
                let mut seq = values.clone();
                for u in &updates[..q.time] {
                    seq[u.position - 1] = u.value;
                }
                let expected: BTreeSet<_> = seq[q.left - 1..q.right].iter().collect();
                assert_eq!(got[q.id], expected.len(), "n={n} q={q:?}");
            }
            assert_eq!(agg.values(), values.as_slice());
        }
    }
}
