use std::collections::HashMap;

use tracing::debug;

use crate::config::Config;
use crate::error::Error;
use crate::error::Result;
use crate::graph::EdgeKind;
use crate::graph::Graph;
use crate::graph::VertexId;
use crate::max_flow::residual_graph::ResidualGraph;
use crate::min_cost_flow::MinCostFlow;
use crate::search::BreadthFirst;
use crate::shortest_path::MooreBellmanFord;

/// Saturates every negative-cost edge, then repeatedly ships flow from a
/// vertex with excess to a vertex with deficit along the cheapest residual
/// path.
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct SuccessiveShortestPath<'g> {
  graph: &'g Graph,
  config: Config,
}

impl<'g> SuccessiveShortestPath<'g> {
  pub fn new(graph: &'g Graph) -> Self {
    Self {
      graph,
      config: Config::default(),
    }
  }

  pub fn with_config(graph: &'g Graph, config: Config) -> Result<Self> {
    config.validate()?;
    Ok(Self { graph, config })
  }
}

/// Target balance (what the caller asked for) next to the balance the current
/// flow actually realises.
#[must_use]
struct Balances {
  target: HashMap<VertexId, f64>,
  working: HashMap<VertexId, f64>,
}

impl Balances {
  fn new(graph: &Graph) -> Self {
    Self {
      target: graph
        .iter_vertices()
        .map(|(id, vertex)| (id, vertex.balance().unwrap_or(0.0)))
        .collect(),
      working: HashMap::new(),
    }
  }

  /// Flow still to be sent out of `vertex`; negative for a deficit.
  fn excess(&self, vertex: VertexId) -> f64 {
    self.target.get(&vertex).copied().unwrap_or(0.0)
      - self.working.get(&vertex).copied().unwrap_or(0.0)
  }

  fn ship(&mut self, from: VertexId, to: VertexId, amount: f64) {
    *self.working.entry(from).or_default() += amount;
    *self.working.entry(to).or_default() -= amount;
  }

  fn required(&self) -> f64 {
    self.target.values().filter(|&&balance| balance > 0.0).sum()
  }

  fn insufficient(&self) -> Error {
    let required = self.required();
    let remaining: f64 = self
      .target
      .keys()
      .map(|&vertex| self.excess(vertex).max(0.0))
      .sum();

    Error::InsufficientCapacity {
      required,
      achievable: required - remaining,
    }
  }
}

impl MinCostFlow for SuccessiveShortestPath<'_> {
  fn graph(&self) -> &Graph {
    self.graph
  }

  fn config(&self) -> &Config {
    &self.config
  }

  fn create_graph(&self) -> Result<Graph> {
    self.check_balance()?;
    let tolerance = self.config.balance_tolerance;

    let mut result = self.graph.clone();
    let mut balances = Balances::new(&result);

    let ids: Vec<_> = result.edges().collect();
    for id in ids {
      let edge = result.edge_mut(id)?;
      let EdgeKind::Directed { from, to } = edge.kind() else {
        return Err(Error::UnsupportedEdgeKind { edge: id });
      };

      // NOTE: Negative-cost edges start saturated, so the residual graph has
      // no negative cycle to begin with.
      let flow = if edge.weight().is_some_and(|weight| weight < 0.0) {
        edge.capacity().ok_or(Error::MissingAttribute {
          edge: id,
          attribute: "capacity",
        })?
      } else {
        0.0
      };
      edge.set_flow(Some(flow))?;
      balances.ship(from, to, flow);
    }

    loop {
      let Some(source) = result
        .vertices()
        .find(|&vertex| balances.excess(vertex) > tolerance)
      else {
        return Ok(result);
      };

      let residual = ResidualGraph::new(&result)?;
      let Some(sink) = BreadthFirst::new(residual.graph(), source)?
        .vertices()?
        .into_iter()
        .find(|&vertex| balances.excess(vertex) < -tolerance)
      else {
        return Err(balances.insufficient());
      };

      let Some(path) =
        MooreBellmanFord::new(residual.graph(), source)?.path_to(sink)?
      else {
        return Err(balances.insufficient());
      };

      let amount = balances
        .excess(source)
        .min(-balances.excess(sink))
        .min(residual.bottleneck(&path)?);
      debug!(
        ?source,
        ?sink,
        amount,
        hops = path.len(),
        "shipping along cheapest path"
      );

      residual.augment(&mut result, &path, amount)?;
      balances.ship(source, sink, amount);
    }
  }
}
