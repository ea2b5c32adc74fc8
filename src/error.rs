use thiserror::Error;

use crate::graph::EdgeId;
use crate::graph::VertexId;

/// Every failure a graph operation or flow algorithm can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("edge {edge:?} is undirected, flow requires directed edges")]
  UnsupportedEdgeKind { edge: EdgeId },

  #[error("edge {edge:?} has no {attribute} set")]
  MissingAttribute {
    edge: EdgeId,
    attribute: &'static str,
  },

  #[error("graph is not balanced (sum of balances is {sum})")]
  InfeasibleBalance { sum: f64 },

  #[error(
    "network does not support required flow of {required} \
     (maximum possible flow limited to {achievable})"
  )]
  InsufficientCapacity { required: f64, achievable: f64 },

  #[error("{attribute} {value} out of range (limit {limit})")]
  Range {
    attribute: &'static str,
    value: f64,
    limit: f64,
  },

  #[error("invalid {attribute} value {value}")]
  InvalidValue { attribute: &'static str, value: f64 },

  #[error("graph is not bipartite: {0}")]
  NotBipartite(String),

  #[error("vertex {0:?} not found")]
  VertexNotFound(VertexId),

  #[error("edge {0:?} not found")]
  EdgeNotFound(EdgeId),

  #[error("vertex {0:?} already exists")]
  VertexExists(VertexId),

  #[error("negative cycle found ({} edges)", edges.len())]
  NegativeCycle { edges: Vec<EdgeId> },

  #[error("invalid configuration: {0}")]
  Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
