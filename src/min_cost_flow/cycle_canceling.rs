use tracing::debug;

use crate::config::Config;
use crate::error::Error;
use crate::error::Result;
use crate::graph::Graph;
use crate::max_flow::common::net_flow;
use crate::max_flow::residual_graph::ResidualGraph;
use crate::max_flow::EdmondsKarp;
use crate::min_cost_flow::MinCostFlow;
use crate::shortest_path::detect_negative_cycle;

/// Starts from any flow meeting the balances (a maximum flow between a helper
/// source feeding every supply vertex and a helper sink draining every demand
/// vertex), then cancels negative-cost residual cycles until none is left.
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct CycleCanceling<'g> {
  graph: &'g Graph,
  config: Config,
}

impl<'g> CycleCanceling<'g> {
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

impl MinCostFlow for CycleCanceling<'_> {
  fn graph(&self) -> &Graph {
    self.graph
  }

  fn config(&self) -> &Config {
    &self.config
  }

  fn create_graph(&self) -> Result<Graph> {
    self.check_balance()?;

    let mut network = self.graph.clone();
    let slots = network.slot_counts();
    let balances: Vec<_> = network
      .iter_vertices()
      .filter_map(|(id, vertex)| Some((id, vertex.balance()?)))
      .collect();

    let source = network.create_vertex();
    let sink = network.create_vertex();
    let mut sum_balance = 0.0;

    for (vertex, balance) in balances {
      if balance > 0.0 {
        let id = network.create_edge_directed(source, vertex)?;
        network.edge_mut(id)?.set_capacity(Some(balance))?;
        sum_balance += balance;
      } else if balance < 0.0 {
        let id = network.create_edge_directed(vertex, sink)?;
        network.edge_mut(id)?.set_capacity(Some(-balance))?;
      }
    }

    let mut result = EdmondsKarp::new(&network, source, sink)?.create_graph()?;
    let flow_max = net_flow(&result, source)?;
    if (flow_max - sum_balance).abs() > self.config.balance_tolerance {
      return Err(Error::InsufficientCapacity {
        required: sum_balance,
        achievable: flow_max,
      });
    }

    loop {
      let residual = ResidualGraph::new(&result)?;
      let Some(cycle) = detect_negative_cycle(residual.graph()) else {
        break;
      };

      let bottleneck = residual.bottleneck(&cycle)?;
      debug!(bottleneck, edges = cycle.len(), "canceling negative cycle");
      residual.augment(&mut result, &cycle, bottleneck)?;
    }

    result.destroy_vertex(sink)?;
    result.destroy_vertex(source)?;
    result.truncate_slots(slots);

    Ok(result)
  }
}
