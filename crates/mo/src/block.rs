//! Partition of the 1-based index space `[1, n]` into contiguous blocks.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blocks {
    n: usize,
    block_len: usize,
}

impl Blocks {
    pub fn new(n: usize, block_len: usize) -> Self {
        Self {
            n,
            block_len: block_len.max(1),
        }
    }

    /// Blocks of length `max(1, floor(sqrt(n)))`.
    pub fn sqrt(n: usize) -> Self {
        Self::new(n, n.isqrt())
    }

    /// Number of indices covered.
    pub fn span(&self) -> usize {
        self.n
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// Number of blocks, `ceil(n / block_len)`.
    pub fn len(&self) -> usize {
        self.n.div_ceil(self.block_len)
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Block id (0-based) of the 1-based `index`.
    #[inline(always)]
    pub fn block_of(&self, index: usize) -> usize {
        debug_assert!(1 <= index && index <= self.n);
        (index - 1) / self.block_len
    }

    /// Inclusive `(lo, hi)` of `block`.
    #[inline(always)]
    pub fn bounds(&self, block: usize) -> (usize, usize) {
        debug_assert!(block < self.len());
        let lo = block * self.block_len + 1;
        let hi = ((block + 1) * self.block_len).min(self.n);
        (lo, hi)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.len()).map(|b| self.bounds(b))
    }
}
