//! Offline range queries by square-root decomposition (Mo's algorithm).
//!
//! A batch of closed, 1-based range queries is reordered by block so that a single
//! window `[winl, winr]` visits all of them with `O((n + q) sqrt n)` pointer moves.
//! The aggregate maintained by the window is caller-supplied:
//!
//! - [`Plain`] for aggregates with a cheap inverse ([`Aggregate`]);
//! - [`AddOnly`] / [`DeleteOnly`] for aggregates that can only grow or only shrink,
//!   repaired by snapshot rollback;
//! - [`TreeMo`] for paths in a tree, through an [`EulerTour`];
//! - [`temporal::solve`] for sequences edited between queries.

pub mod policy;
pub mod temporal;
pub mod traits;

mod answers;
mod block;
mod compress;
mod config;
mod error;
mod query;
mod rollback;
mod strategy;
mod tree;
mod window;

pub use answers::Answers;
pub use block::Blocks;
pub use compress::Compressed;
pub use config::{BlockLen, MoConfig, SortOrder};
pub use error::{MoError, Result, TreeDefect};
pub use query::{Plan, Query, validate};
pub use strategy::{AddOnly, DeleteOnly, Discipline, Plain, Strategy, solve};
pub use temporal::Update;
pub use traits::{AddOnlyAggregate, Aggregate, DeleteOnlyAggregate, Modifiable};
pub use tree::{EulerTour, PathQuery, PathRange, TreeMo};
pub use window::Window;
