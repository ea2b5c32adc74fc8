//! Flow networks on a small arena graph.
//!
//! - [`max_flow::EdmondsKarp`]: maximum flow and minimum cut.
//! - [`min_cost_flow::CycleCanceling`] and
//!   [`min_cost_flow::SuccessiveShortestPath`]: minimum-cost flow meeting
//!   vertex balances.
//! - [`matching::FlowMatching`]: maximum bipartite matching.
//!
//! Every algorithm borrows its input graph and hands back a modified clone.

pub mod bipartite;
pub mod config;
pub mod error;
pub mod graph;
pub mod matching;
pub mod max_flow;
pub mod min_cost_flow;
pub mod search;
pub mod shortest_path;

pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::error::Result;
pub use crate::graph::EdgeId;
pub use crate::graph::Graph;
pub use crate::graph::VertexId;
pub use crate::max_flow::common::is_balanced_flow;
pub use crate::max_flow::common::net_flow;
pub use crate::max_flow::common::weight_flow;
pub use crate::min_cost_flow::MinCostFlow;
