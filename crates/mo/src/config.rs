//! Tuning knobs shared by every engine.

/// How the index space is cut into blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlockLen {
    /// `max(1, floor(sqrt(n)))`.
    #[default]
    Sqrt,
    /// `max(1, floor(n^(2/3)))`, the usual choice once queries carry a time axis.
    CubeRootSquared,
    /// A caller-chosen length, clamped to at least 1.
    Fixed(usize),
}

impl BlockLen {
    pub fn resolve(self, n: usize) -> usize {
        match self {
            Self::Sqrt => n.isqrt().max(1),
            Self::CubeRootSquared => {
                let c = icbrt(n);
                (c * c).max(1)
            }
            Self::Fixed(len) => len.max(1),
        }
    }
}

/// Order of `right` inside one block group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// `right` ascending in every block.
    #[default]
    Standard,
    /// `right` ascending in even blocks and descending in odd ones.
    ///
    /// Only honoured by the plain discipline; the rollback disciplines rely on a
    /// monotone right pointer and always sort ascending.
    EvenOdd,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoConfig {
    pub block_len: BlockLen,
    pub order: SortOrder,
}

impl MoConfig {
    /// Preset for batches with point updates.
    pub fn temporal() -> Self {
        Self {
            block_len: BlockLen::CubeRootSquared,
            order: SortOrder::Standard,
        }
    }

    pub fn with_block_len(mut self, block_len: BlockLen) -> Self {
        self.block_len = block_len;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }
}

/// Largest `c` with `c^3 <= n`.
fn icbrt(n: usize) -> usize {
    let mut c = (n as f64).cbrt() as usize;
    while c > 0 && c.saturating_mul(c).saturating_mul(c) > n {
        c -= 1;
    }
    while (c + 1).saturating_mul(c + 1).saturating_mul(c + 1) <= n {
        c += 1;
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_is_exact_floor() {
        let cases = [(0, 1), (1, 1), (3, 1), (4, 2), (15, 3), (16, 4), (99, 9), (100, 10)];
        for (n, expected) in cases {
            assert_eq!(BlockLen::Sqrt.resolve(n), expected, "n={n}");
        }
    }

    #[test]
    fn cube_root_squared() {
        assert_eq!(icbrt(0), 0);
        assert_eq!(icbrt(7), 1);
        assert_eq!(icbrt(8), 2);
        assert_eq!(icbrt(26), 2);
        assert_eq!(icbrt(27), 3);
        assert_eq!(icbrt(1_000_000), 100);
        assert_eq!(BlockLen::CubeRootSquared.resolve(1_000), 100);
        assert_eq!(BlockLen::CubeRootSquared.resolve(0), 1);
    }

    #[test]
    fn fixed_is_clamped() {
        assert_eq!(BlockLen::Fixed(0).resolve(10), 1);
        assert_eq!(BlockLen::Fixed(7).resolve(10), 7);
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = MoConfig::default()
            .with_block_len(BlockLen::Fixed(3))
            .with_order(SortOrder::EvenOdd);
        assert_eq!(config.block_len, BlockLen::Fixed(3));
        assert_eq!(config.order, SortOrder::EvenOdd);
        assert_eq!(MoConfig::default().block_len, BlockLen::Sqrt);
    }
}
