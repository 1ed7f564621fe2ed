//! Tree paths as ranges over an Euler tour.
//!
//! Every node is written to the tour on entry and on exit, so the tour has `2n`
//! positions. Between `first[u]` and `first[v]` (or `last[u]` and `first[v]`) the nodes
//! seen an odd number of times are exactly the `u`–`v` path, with the lowest common
//! ancestor missing when neither endpoint is an ancestor of the other.

use crate::answers::Answers;
use crate::config::MoConfig;
use crate::error::{MoError, Result, TreeDefect};
use crate::query::{Plan, Query};
use crate::traits::Aggregate;
use crate::window::Window;

const NONE: usize = usize::MAX;

/// Adjacency in compressed sparse row form, 0-based.
struct Csr {
    offsets: Vec<usize>,
    to: Vec<usize>,
}

impl Csr {
    fn new(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut degree = vec![0_usize; n];
        for &(u, v) in edges {
            degree[u] += 1;
            degree[v] += 1;
        }
        let mut offsets = vec![0_usize; n + 1];
        for i in 0..n {
            offsets[i + 1] = offsets[i] + degree[i];
        }
        let mut to = vec![0_usize; edges.len() * 2];
        let mut cursor = offsets.clone();
        for &(u, v) in edges {
            to[cursor[u]] = v;
            cursor[u] += 1;
            to[cursor[v]] = u;
            cursor[v] += 1;
        }
        Self { offsets, to }
    }
}

/// Euler tour of a rooted tree with a binary-lifting ancestor table.
///
/// Nodes and tour positions are 1-based in the public API.
#[derive(Clone, Debug)]
pub struct EulerTour {
    root: usize,
    // Node at each tour position, `tour[p - 1]`.
    tour: Vec<usize>,
    first: Vec<usize>,
    last: Vec<usize>,
    depth: Vec<usize>,
    // `up[k][v - 1]` is the `2^k`-th ancestor of `v`, the root being its own parent.
    up: Vec<Vec<usize>>,
}

/// The tour range standing for a tree path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathRange {
    pub left: usize,
    pub right: usize,
    /// Node absent from the range that still belongs to the path.
    pub lca: Option<usize>,
}

impl EulerTour {
    /// Builds the tour of the tree on nodes `1..=n` given by `edges`, rooted at `root`.
    pub fn new(n: usize, edges: &[(usize, usize)], root: usize) -> Result<Self> {
        check_node(root, n)?;
        if edges.len() != n - 1 {
            return Err(MoError::InvalidTree {
                reason: TreeDefect::EdgeCount {
                    expected: n - 1,
                    found: edges.len(),
                },
            });
        }
        let mut zero_based = Vec::with_capacity(edges.len());
        for &(u, v) in edges {
            check_node(u, n)?;
            check_node(v, n)?;
            if u == v {
                return Err(MoError::InvalidTree {
                    reason: TreeDefect::SelfLoop { node: u },
                });
            }
            zero_based.push((u - 1, v - 1));
        }
        let adj = Csr::new(n, &zero_based);

        let mut tour = Vec::with_capacity(2 * n);
        let mut first = vec![NONE; n];
        let mut last = vec![NONE; n];
        let mut depth = vec![0_usize; n];
        let mut parent = vec![NONE; n];

        // Frames are `(node, next adjacency slot to try)`.
        let r = root - 1;
        let mut stack = Vec::with_capacity(n);
        parent[r] = r;
        tour.push(root);
        first[r] = tour.len();
        stack.push((r, adj.offsets[r]));
        while let Some(frame) = stack.last_mut() {
            let (v, next) = *frame;
            if next == adj.offsets[v + 1] {
                stack.pop();
                tour.push(v + 1);
                last[v] = tour.len();
                continue;
            }
            frame.1 += 1;
            let to = adj.to[next];
            if first[to] != NONE {
                continue;
            }
            parent[to] = v;
            depth[to] = depth[v] + 1;
            tour.push(to + 1);
            first[to] = tour.len();
            stack.push((to, adj.offsets[to]));
        }

        if let Some(unreached) = first.iter().position(|&f| f == NONE) {
            return Err(MoError::InvalidTree {
                reason: TreeDefect::Disconnected {
                    unreached: unreached + 1,
                },
            });
        }
        debug_assert_eq!(tour.len(), 2 * n);

        let levels = (usize::BITS - n.leading_zeros()) as usize;
        let mut up = Vec::with_capacity(levels);
        up.push(parent.iter().map(|&p| p + 1).collect::<Vec<_>>());
        for k in 1..levels {
            let prev = &up[k - 1];
            let row = prev.iter().map(|&a| prev[a - 1]).collect();
            up.push(row);
        }

        log::debug!("euler tour: n={n}, root={root}, lifting levels={levels}");
        Ok(Self {
            root,
            tour,
            first,
            last,
            depth,
            up,
        })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Node ids by tour position; entry `p - 1` is position `p`.
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    #[inline(always)]
    pub fn node_at(&self, position: usize) -> usize {
        self.tour[position - 1]
    }

    #[inline(always)]
    pub fn first(&self, node: usize) -> usize {
        self.first[node - 1]
    }

    #[inline(always)]
    pub fn last(&self, node: usize) -> usize {
        self.last[node - 1]
    }

    #[inline(always)]
    pub fn depth(&self, node: usize) -> usize {
        self.depth[node - 1]
    }

    pub fn parent(&self, node: usize) -> Option<usize> {
        (node != self.root).then(|| self.up[0][node - 1])
    }

    /// `true` when `a` is `b` or lies above it.
    pub fn is_ancestor(&self, a: usize, b: usize) -> bool {
        self.first(a) <= self.first(b) && self.last(b) <= self.last(a)
    }

    pub fn kth_ancestor(&self, mut node: usize, k: usize) -> Option<usize> {
        if k > self.depth(node) {
            return None;
        }
        for (bit, row) in self.up.iter().enumerate() {
            if k >> bit & 1 == 1 {
                node = row[node - 1];
            }
        }
        Some(node)
    }

    /// Lowest common ancestor by lifting both nodes.
    pub fn lca(&self, mut u: usize, mut v: usize) -> usize {
        if self.depth(u) < self.depth(v) {
            std::mem::swap(&mut u, &mut v);
        }
        let diff = self.depth(u) - self.depth(v);
        for (bit, row) in self.up.iter().enumerate() {
            if diff >> bit & 1 == 1 {
                u = row[u - 1];
            }
        }
        if u == v {
            return u;
        }
        for row in self.up.iter().rev() {
            let (a, b) = (row[u - 1], row[v - 1]);
            if a != b {
                u = a;
                v = b;
            }
        }
        self.up[0][u - 1]
    }

    /// Tour range whose odd-count nodes, plus `lca` when present, form the
    /// `u`–`v` path.
    pub fn path_range(&self, mut u: usize, mut v: usize) -> PathRange {
        if self.first(u) > self.first(v) {
            std::mem::swap(&mut u, &mut v);
        }
        let lca = self.lca(u, v);
        if lca == u {
            PathRange {
                left: self.first(u),
                right: self.first(v),
                lca: None,
            }
        } else {
            PathRange {
                left: self.last(u),
                right: self.first(v),
                lca: Some(lca),
            }
        }
    }
}

#[inline]
fn check_node(node: usize, n: usize) -> Result<()> {
    if node == 0 || node > n {
        return Err(MoError::NodeOutOfRange { node, len: n });
    }
    Ok(())
}

/// A path query between two nodes, numbered like [`Query::id`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathQuery {
    pub u: usize,
    pub v: usize,
    pub id: usize,
    pub threshold: usize,
}

impl PathQuery {
    pub fn new(id: usize, u: usize, v: usize) -> Self {
        Self {
            u,
            v,
            id,
            threshold: 0,
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn batch<I>(pairs: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        pairs
            .into_iter()
            .enumerate()
            .map(|(id, (u, v))| Self::new(id, u, v))
            .collect()
    }
}

/// Turns tour positions into node toggles: a node seen an odd number of times in the
/// window is inside the aggregate.
struct Toggle<'t, A> {
    tour: &'t [usize],
    inside: Vec<bool>,
    agg: A,
}

impl<A: Aggregate> Toggle<'_, A> {
    #[inline(always)]
    fn toggle(&mut self, node: usize) {
        let inside = &mut self.inside[node - 1];
        *inside = !*inside;
        if *inside {
            self.agg.add(node);
        } else {
            self.agg.remove(node);
        }
    }
}

impl<A: Aggregate> Aggregate for Toggle<'_, A> {
    type Output = A::Output;

    #[inline(always)]
    fn add(&mut self, position: usize) {
        self.toggle(self.tour[position - 1]);
    }

    #[inline(always)]
    fn remove(&mut self, position: usize) {
        self.toggle(self.tour[position - 1]);
    }

    fn answer(&self, query: &Query) -> A::Output {
        self.agg.answer(query)
    }
}

/// Mo's algorithm over tree paths.
///
/// The aggregate sees node ids. Its `answer` receives the tour-range [`Query`]
/// (same `id` and `threshold` as the path query).
pub struct TreeMo<'t> {
    tour: &'t EulerTour,
    config: MoConfig,
}

impl<'t> TreeMo<'t> {
    pub fn new(tour: &'t EulerTour) -> Self {
        Self {
            tour,
            config: MoConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MoConfig) -> Self {
        self.config = config;
        self
    }

    /// Answers path queries in submission order.
    pub fn solve<A: Aggregate>(
        &self,
        queries: &[PathQuery],
        agg: &mut A,
    ) -> Result<Vec<A::Output>> {
        let n = self.tour.len();
        let q = queries.len();
        let mut ranges = Vec::with_capacity(q);
        let mut residual = vec![None; q];
        for pq in queries {
            check_node(pq.u, n)?;
            check_node(pq.v, n)?;
            if pq.id >= q {
                return Err(MoError::IdOutOfRange { id: pq.id, len: q });
            }
            let range = self.tour.path_range(pq.u, pq.v);
            residual[pq.id] = range.lca;
            ranges.push(Query::new(pq.id, range.left, range.right).with_threshold(pq.threshold));
        }

        let plan = Plan::new(2 * n, &ranges, &self.config)?;
        log::debug!(
            "tree batch: n={n}, q={q}, blocks={} of length {}",
            plan.blocks().len(),
            plan.blocks().block_len(),
        );

        let toggle = Toggle {
            tour: self.tour.tour(),
            inside: vec![false; n],
            agg,
        };
        let mut window = Window::new(toggle);
        let mut answers = Answers::with_len(q);
        for query in plan.queries() {
            window.move_to(query.left, query.right);
            match residual[query.id] {
                Some(lca) => {
                    let toggle = window.aggregate_mut();
                    toggle.toggle(lca);
                    answers.record(query.id, toggle.answer(query));
                    toggle.toggle(lca);
                }
                None => answers.record(query.id, window.aggregate().answer(query)),
            }
        }
        let (winl, _) = window.bounds();
        window.move_to(winl, winl - 1);
        answers.finish()
    }
}
