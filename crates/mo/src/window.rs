//! The sliding window `[winl, winr]` and its four movement primitives.

use crate::traits::Aggregate;

/// Window over 1-based positions; starts empty as `[1, 0]`.
///
/// `winl <= winr + 1` holds between any two calls.
#[derive(Clone, Debug)]
pub struct Window<A> {
    winl: usize,
    winr: usize,
    agg: A,
}

impl<A: Aggregate> Window<A> {
    pub fn new(agg: A) -> Self {
        Self::starting_at(agg, 1)
    }

    /// Empty window `[start, start - 1]`.
    pub fn starting_at(agg: A, start: usize) -> Self {
        debug_assert!(start >= 1);
        Self {
            winl: start,
            winr: start - 1,
            agg,
        }
    }

    #[inline(always)]
    pub fn extend_right(&mut self) {
        self.winr += 1;
        self.agg.add_right(self.winr);
    }

    #[inline(always)]
    pub fn extend_left(&mut self) {
        self.winl -= 1;
        self.agg.add_left(self.winl);
    }

    #[inline(always)]
    pub fn shrink_right(&mut self) {
        debug_assert!(self.winl <= self.winr);
        self.agg.remove_right(self.winr);
        self.winr -= 1;
    }

    #[inline(always)]
    pub fn shrink_left(&mut self) {
        debug_assert!(self.winl <= self.winr);
        self.agg.remove_left(self.winl);
        self.winl += 1;
    }

    /// Moves to `[left, right]`, growing before shrinking so the window never
    /// inverts.
    pub fn move_to(&mut self, left: usize, right: usize) {
        debug_assert!(left >= 1 && left <= right + 1);
        while self.winr < right {
            self.extend_right();
        }
        while self.winl > left {
            self.extend_left();
        }
        while self.winr > right {
            self.shrink_right();
        }
        while self.winl < left {
            self.shrink_left();
        }
    }

    /// Inclusive bounds `(winl, winr)`.
    pub fn bounds(&self) -> (usize, usize) {
        (self.winl, self.winr)
    }

    pub fn len(&self) -> usize {
        self.winr + 1 - self.winl
    }

    pub fn is_empty(&self) -> bool {
        self.winr < self.winl
    }

    pub fn contains(&self, position: usize) -> bool {
        self.winl <= position && position <= self.winr
    }

    pub fn aggregate(&self) -> &A {
        &self.agg
    }

    pub fn aggregate_mut(&mut self) -> &mut A {
        &mut self.agg
    }

    pub fn into_inner(self) -> A {
        self.agg
    }
}
