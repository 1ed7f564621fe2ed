//! The closed set of window disciplines and the batch entry point.

use crate::answers::Answers;
use crate::config::{MoConfig, SortOrder};
use crate::error::Result;
use crate::query::{Plan, Query};
use crate::rollback::{run_add_only, run_delete_only};
use crate::traits::{AddOnlyAggregate, Aggregate, DeleteOnlyAggregate};
use crate::window::Window;

mod sealed {
    pub trait Sealed {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discipline {
    Plain,
    AddOnly,
    DeleteOnly,
}

impl Discipline {
    pub fn label(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::AddOnly => "add-only",
            Self::DeleteOnly => "delete-only",
        }
    }
}

/// A window discipline bound to one aggregate.
///
/// Implemented exactly by [`Plain`], [`AddOnly`] and [`DeleteOnly`].
pub trait Strategy: sealed::Sealed {
    type Output;

    const DISCIPLINE: Discipline;

    /// Answers every query of `plan` into `answers`.
    fn run(&mut self, plan: &Plan, answers: &mut Answers<Self::Output>);
}

/// Fully reversible window over an [`Aggregate`].
#[derive(Clone, Debug)]
pub struct Plain<A>(pub A);

/// Add-only rollback over an [`AddOnlyAggregate`].
#[derive(Clone, Debug)]
pub struct AddOnly<A>(pub A);

/// Delete-only rollback over a [`DeleteOnlyAggregate`] that starts full.
#[derive(Clone, Debug)]
pub struct DeleteOnly<A>(pub A);

impl<A> Plain<A> {
    pub fn into_inner(self) -> A {
        self.0
    }
}

impl<A> AddOnly<A> {
    pub fn into_inner(self) -> A {
        self.0
    }
}

impl<A> DeleteOnly<A> {
    pub fn into_inner(self) -> A {
        self.0
    }
}

impl<A> sealed::Sealed for Plain<A> {}
impl<A> sealed::Sealed for AddOnly<A> {}
impl<A> sealed::Sealed for DeleteOnly<A> {}

impl<A: Aggregate> Strategy for Plain<A> {
    type Output = A::Output;

    const DISCIPLINE: Discipline = Discipline::Plain;

    fn run(&mut self, plan: &Plan, answers: &mut Answers<A::Output>) {
        let mut window = Window::new(&mut self.0);
        for q in plan.queries() {
            window.move_to(q.left, q.right);
            answers.record(q.id, window.aggregate().answer(q));
        }
        // Leave the aggregate empty so it can serve another batch.
        let (winl, _) = window.bounds();
        window.move_to(winl, winl - 1);
    }
}

impl<A: AddOnlyAggregate> Strategy for AddOnly<A> {
    type Output = A::Output;

    const DISCIPLINE: Discipline = Discipline::AddOnly;

    fn run(&mut self, plan: &Plan, answers: &mut Answers<A::Output>) {
        run_add_only(&mut self.0, plan, answers);
    }
}

impl<A: DeleteOnlyAggregate> Strategy for DeleteOnly<A> {
    type Output = A::Output;

    const DISCIPLINE: Discipline = Discipline::DeleteOnly;

    fn run(&mut self, plan: &Plan, answers: &mut Answers<A::Output>) {
        run_delete_only(&mut self.0, plan, answers);
    }
}

/// Answers `queries` over a sequence of length `n`, in submission order.
///
/// The batch is validated before any aggregate callback runs. Rollback disciplines
/// ignore [`SortOrder::EvenOdd`].
pub fn solve<S: Strategy>(
    n: usize,
    queries: &[Query],
    strategy: &mut S,
    config: &MoConfig,
) -> Result<Vec<S::Output>> {
    let config = match S::DISCIPLINE {
        Discipline::Plain => *config,
        Discipline::AddOnly | Discipline::DeleteOnly => config.with_order(SortOrder::Standard),
    };
    let plan = Plan::new(n, queries, &config)?;
    log::debug!(
        "{} batch: n={n}, q={}, blocks={} of length {}",
        S::DISCIPLINE.label(),
        plan.len(),
        plan.blocks().len(),
        plan.blocks().block_len(),
    );

    let mut answers = Answers::with_len(queries.len());
    strategy.run(&plan, &mut answers);
    answers.finish()
}
