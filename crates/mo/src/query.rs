//! Offline queries and the order they are processed in.

use crate::block::Blocks;
use crate::config::{MoConfig, SortOrder};
use crate::error::{MoError, Result};

/// A closed, 1-based range query.
///
/// `id` is the query's position in the submitted batch and decides where its answer
/// lands in the output. `threshold` and `time` are only read by aggregates and engines
/// that need them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Query {
    pub left: usize,
    pub right: usize,
    pub id: usize,
    pub threshold: usize,
    pub time: usize,
}

impl Query {
    pub fn new(id: usize, left: usize, right: usize) -> Self {
        Self {
            left,
            right,
            id,
            threshold: 0,
            time: 0,
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Number of point updates applied before this query is answered.
    pub fn with_time(mut self, time: usize) -> Self {
        self.time = time;
        self
    }

    /// Builds a batch, numbering queries by position.
    pub fn batch<I>(ranges: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        ranges
            .into_iter()
            .enumerate()
            .map(|(id, (left, right))| Self::new(id, left, right))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.right + 1 - self.left
    }

    pub fn is_empty(&self) -> bool {
        self.right < self.left
    }
}

/// Rejects the batch if any range is malformed or the ids are not a permutation of
/// `0..queries.len()`.
pub fn validate(queries: &[Query], n: usize) -> Result<()> {
    let q = queries.len();
    let mut seen = vec![false; q];
    for query in queries {
        if query.left == 0 || query.left > query.right || query.right > n {
            return Err(MoError::InvalidRange {
                id: query.id,
                left: query.left,
                right: query.right,
                len: n,
            });
        }
        if query.id >= q {
            return Err(MoError::IdOutOfRange {
                id: query.id,
                len: q,
            });
        }
        if std::mem::replace(&mut seen[query.id], true) {
            return Err(MoError::DuplicateId { id: query.id });
        }
    }
    Ok(())
}

/// A validated batch in processing order, grouped by the block of `left`.
#[derive(Clone, Debug)]
pub struct Plan {
    blocks: Blocks,
    sorted: Vec<Query>,
    // `groups[g] = (block, start)`; group `g` spans `sorted[start..groups[g + 1].1]`.
    groups: Vec<(usize, usize)>,
}

impl Plan {
    /// Orders by `(block_of(left), right)`, flipping `right` in odd blocks under
    /// [`SortOrder::EvenOdd`].
    pub fn new(n: usize, queries: &[Query], config: &MoConfig) -> Result<Self> {
        validate(queries, n)?;
        let blocks = Blocks::new(n, config.block_len.resolve(n));
        let mut sorted = queries.to_vec();
        match config.order {
            SortOrder::Standard => {
                sorted.sort_by_key(|q| (blocks.block_of(q.left), q.right));
            }
            SortOrder::EvenOdd => {
                sorted.sort_by_key(|q| {
                    let b = blocks.block_of(q.left);
                    let r = if b % 2 == 0 { q.right } else { usize::MAX - q.right };
                    (b, r)
                });
            }
        }
        Ok(Self::grouped(blocks, sorted))
    }

    /// Orders by `(block_of(left), block_of(right), time)`.
    pub(crate) fn temporal(n: usize, queries: &[Query], config: &MoConfig) -> Result<Self> {
        validate(queries, n)?;
        let blocks = Blocks::new(n, config.block_len.resolve(n));
        let mut sorted = queries.to_vec();
        sorted.sort_by_key(|q| {
            let bl = blocks.block_of(q.left);
            let br = blocks.block_of(q.right);
            // Snake the time axis so consecutive right-blocks do not rewind it.
            let t = if br % 2 == 0 { q.time } else { usize::MAX - q.time };
            (bl, br, t)
        });
        Ok(Self::grouped(blocks, sorted))
    }

    fn grouped(blocks: Blocks, sorted: Vec<Query>) -> Self {
        let mut groups = Vec::new();
        for (i, q) in sorted.iter().enumerate() {
            let b = blocks.block_of(q.left);
            if groups.last().is_none_or(|&(last, _)| last != b) {
                groups.push((b, i));
            }
        }
        Self {
            blocks,
            sorted,
            groups,
        }
    }

    pub fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// All queries in processing order.
    pub fn queries(&self) -> &[Query] {
        &self.sorted
    }

    /// Non-empty block groups in processing order: `(block, queries)`.
    pub fn groups(&self) -> impl Iterator<Item = (usize, &[Query])> + '_ {
        self.groups.iter().enumerate().map(move |(g, &(block, start))| {
            let end = self
                .groups
                .get(g + 1)
                .map_or(self.sorted.len(), |&(_, next)| next);
            (block, &self.sorted[start..end])
        })
    }

    /// Total pointer travel if the queries were answered in plan order by a single
    /// window starting empty at position 1.
    pub fn movement_cost(&self) -> usize {
        let mut l = 1_usize;
        let mut r = 0_usize;
        let mut cost = 0;
        for q in &self.sorted {
            cost += l.abs_diff(q.left) + r.abs_diff(q.right);
            l = q.left;
            r = q.right;
        }
        cost
    }
}
