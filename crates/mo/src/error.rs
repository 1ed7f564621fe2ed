use std::fmt;

/// Reasons a batch is rejected before any aggregate callback runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoError {
    /// A query range is empty, reversed, or reaches outside `[1, len]`.
    InvalidRange {
        id: usize,
        left: usize,
        right: usize,
        len: usize,
    },
    /// A query id is not a position in the batch.
    IdOutOfRange { id: usize, len: usize },
    /// Two queries in one batch share an id.
    DuplicateId { id: usize },
    /// A node id is outside `[1, len]`.
    NodeOutOfRange { node: usize, len: usize },
    /// The edge list does not describe a tree on the given nodes.
    InvalidTree { reason: TreeDefect },
    /// A point update targets a position outside `[1, len]`.
    InvalidUpdate {
        index: usize,
        position: usize,
        len: usize,
    },
    /// A query's timestamp refers to more updates than were supplied.
    InvalidTime {
        id: usize,
        time: usize,
        updates: usize,
    },
    /// The engine finished without recording an answer for this query.
    MissingAnswer { id: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeDefect {
    EdgeCount { expected: usize, found: usize },
    SelfLoop { node: usize },
    Disconnected { unreached: usize },
}

impl fmt::Display for TreeDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeDefect::EdgeCount { expected, found } => {
                write!(f, "expected {expected} edges, found {found}")
            }
            TreeDefect::SelfLoop { node } => write!(f, "self loop at node {node}"),
            TreeDefect::Disconnected { unreached } => {
                write!(f, "node {unreached} is not reachable from the root")
            }
        }
    }
}

impl fmt::Display for MoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoError::InvalidRange {
                id,
                left,
                right,
                len,
            } => write!(
                f,
                "query #{id} has invalid range [{left}, {right}] for length {len}"
            ),
            MoError::IdOutOfRange { id, len } => {
                write!(f, "query id {id} is outside a batch of {len} queries")
            }
            MoError::DuplicateId { id } => write!(f, "query id {id} appears more than once"),
            MoError::NodeOutOfRange { node, len } => {
                write!(f, "node {node} is outside [1, {len}]")
            }
            MoError::InvalidTree { reason } => write!(f, "invalid tree: {reason}"),
            MoError::InvalidUpdate {
                index,
                position,
                len,
            } => write!(
                f,
                "update #{index} targets position {position} outside [1, {len}]"
            ),
            MoError::InvalidTime { id, time, updates } => write!(
                f,
                "query #{id} is stamped at time {time} but only {updates} updates exist"
            ),
            MoError::MissingAnswer { id } => write!(f, "no answer recorded for query #{id}"),
        }
    }
}

impl std::error::Error for MoError {}

pub type Result<T> = std::result::Result<T, MoError>;
