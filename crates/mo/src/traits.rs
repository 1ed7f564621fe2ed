//! Capability interfaces a caller plugs into the engines.
//!
//! Positions handed to callbacks are 1-based. For tree batches they are node ids.
//! Aggregates own whatever counter tables they need; the engines never look inside.

use crate::query::Query;

/// An aggregate with cheap, mutually inverse insertion and removal.
///
/// The side-specific hooks default to the symmetric ones; order-sensitive
/// aggregates (inversion count, for instance) override them.
pub trait Aggregate {
    type Output;

    fn add(&mut self, position: usize);
    fn remove(&mut self, position: usize);

    /// `position` becomes the new left end of the window.
    #[inline(always)]
    fn add_left(&mut self, position: usize) {
        self.add(position);
    }

    /// `position` becomes the new right end of the window.
    #[inline(always)]
    fn add_right(&mut self, position: usize) {
        self.add(position);
    }

    /// `position` was the left end of the window.
    #[inline(always)]
    fn remove_left(&mut self, position: usize) {
        self.remove(position);
    }

    /// `position` was the right end of the window.
    #[inline(always)]
    fn remove_right(&mut self, position: usize) {
        self.remove(position);
    }

    fn answer(&self, query: &Query) -> Self::Output;
}

impl<A: Aggregate + ?Sized> Aggregate for &mut A {
    type Output = A::Output;

    #[inline(always)]
    fn add(&mut self, position: usize) {
        (**self).add(position);
    }

    #[inline(always)]
    fn remove(&mut self, position: usize) {
        (**self).remove(position);
    }

    #[inline(always)]
    fn add_left(&mut self, position: usize) {
        (**self).add_left(position);
    }

    #[inline(always)]
    fn add_right(&mut self, position: usize) {
        (**self).add_right(position);
    }

    #[inline(always)]
    fn remove_left(&mut self, position: usize) {
        (**self).remove_left(position);
    }

    #[inline(always)]
    fn remove_right(&mut self, position: usize) {
        (**self).remove_right(position);
    }

    #[inline(always)]
    fn answer(&self, query: &Query) -> Self::Output {
        (**self).answer(query)
    }
}

/// An aggregate that can only grow; shrinking goes through a snapshot.
///
/// `forget` drops the raw bookkeeping for a position (counts) without touching the
/// derived value; `rollback` then puts the derived value back.
pub trait AddOnlyAggregate {
    type Output;
    type Snapshot: Clone;

    fn add(&mut self, position: usize);

    #[inline(always)]
    fn add_left(&mut self, position: usize) {
        self.add(position);
    }

    #[inline(always)]
    fn add_right(&mut self, position: usize) {
        self.add(position);
    }

    fn forget(&mut self, position: usize);

    fn snapshot(&self) -> Self::Snapshot;
    fn rollback(&mut self, snapshot: Self::Snapshot);

    fn answer(&self, query: &Query) -> Self::Output;
}

/// An aggregate that can only shrink; growing goes through a snapshot.
///
/// The aggregate must describe the whole sequence when handed to the engine.
/// `restore` re-inserts the raw bookkeeping for a position without repairing the
/// derived value; `rollback` then puts the derived value back.
pub trait DeleteOnlyAggregate {
    type Output;
    type Snapshot;

    fn remove(&mut self, position: usize);
    fn restore(&mut self, position: usize);

    fn snapshot(&self) -> Self::Snapshot;
    fn rollback(&mut self, snapshot: Self::Snapshot);

    fn answer(&self, query: &Query) -> Self::Output;
}

/// An aggregate over a sequence that can be edited between queries.
pub trait Modifiable: Aggregate {
    type Value;

    /// Overwrites the value at `position` and returns the previous one.
    ///
    /// Called only while `position` is outside the window.
    fn replace(&mut self, position: usize, value: Self::Value) -> Self::Value;
}
