pub mod common;
pub mod residual_edge;
pub mod residual_graph;

use std::collections::BTreeSet;
use std::marker::PhantomData;

use tracing::debug;

use crate::error::Error;
use crate::error::Result;
use crate::graph::Graph;
use crate::graph::VertexId;
use crate::max_flow::common::approx_eq;
use crate::max_flow::common::ensure_feasibility;
use crate::max_flow::common::reset_flow;
use crate::max_flow::residual_graph::ResidualGraph;
use crate::search::BreadthFirst;

const FLOW_TOLERANCE: f64 = 0.000_000_001;

#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct MincutMaxflow {
  /// Clone of the input graph carrying a maximum flow.
  pub graph: Graph,
  /// Source side of a minimum cut: everything still reachable from the source
  /// in the final residual graph.
  pub mincut: BTreeSet<VertexId>,
  pub maxflow: f64,
  constructor_guard: PhantomData<()>,
}

/// Maximum flow by shortest (fewest hops) augmenting paths.
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct EdmondsKarp<'g> {
  graph: &'g Graph,
  source: VertexId,
  sink: VertexId,
}

impl<'g> EdmondsKarp<'g> {
  pub fn new(
    graph: &'g Graph,
    source: VertexId,
    sink: VertexId,
  ) -> Result<Self> {
    if source == sink {
      return Err(Error::InvalidArgument(format!(
        "source must not equal sink ({:?}, {:?})",
        source, sink,
      )));
    }
    for vertex in [source, sink] {
      if !graph.has_vertex(vertex) {
        return Err(Error::InvalidArgument(format!(
          "vertex {:?} does not belong to the graph",
          vertex,
        )));
      }
    }

    Ok(Self {
      graph,
      source,
      sink,
    })
  }

  /// Clone of the graph with every edge's flow set to a maximum flow.
  pub fn create_graph(&self) -> Result<Graph> {
    let mut graph = self.graph.clone();
    reset_flow(&mut graph)?;
    augment_max_flow(&mut graph, self.source, self.sink)?;

    Ok(graph)
  }

  /// Value of the maximum flow: everything leaving the source.
  pub fn flow_max(&self) -> Result<f64> {
    outflow(&self.create_graph()?, self.source)
  }

  pub fn min_cut(&self) -> Result<BTreeSet<VertexId>> {
    Ok(self.calculate_mincut_maxflow()?.mincut)
  }

  pub fn calculate_mincut_maxflow(&self) -> Result<MincutMaxflow> {
    let graph = self.create_graph()?;
    let maxflow = outflow(&graph, self.source)?;

    let residual = ResidualGraph::new(&graph)?;
    let mincut = BreadthFirst::new(residual.graph(), self.source)?
      .vertices()?
      .into_iter()
      .collect();

    let mincut_maxflow = MincutMaxflow {
      graph,
      mincut,
      maxflow,
      constructor_guard: PhantomData,
    };
    ensure_optimality(&mincut_maxflow, self.source, self.sink)?;

    Ok(mincut_maxflow)
  }
}

fn outflow(graph: &Graph, vertex: VertexId) -> Result<f64> {
  let mut flow = 0.0;
  for id in graph.edges_out(vertex)? {
    flow += graph.edge(id)?.flow().unwrap_or(0.0);
  }

  Ok(flow)
}

/// Augments `graph` (flow already initialised) along fewest-hops residual
/// paths until the sink can no longer be reached.
pub(crate) fn augment_max_flow(
  graph: &mut Graph,
  source: VertexId,
  sink: VertexId,
) -> Result<()> {
  loop {
    let residual = ResidualGraph::new(graph)?;
    let Some(path) =
      BreadthFirst::new(residual.graph(), source)?.path_to(sink)?
    else {
      return Ok(());
    };

    let bottleneck = residual.bottleneck(&path)?;
    debug!(bottleneck, hops = path.len(), "augmenting path");
    residual.augment(graph, &path, bottleneck)?;
  }
}

fn ensure_optimality(
  mincut_maxflow: &MincutMaxflow,
  source: VertexId,
  sink: VertexId,
) -> Result<()> {
  ensure_feasibility(
    &mincut_maxflow.graph,
    source,
    sink,
    mincut_maxflow.maxflow,
    FLOW_TOLERANCE,
  )?;

  assert!(
    mincut_maxflow.mincut.contains(&source),
    "Source not in min-cut ({:?}, {:?}).",
    source,
    mincut_maxflow.mincut,
  );
  assert!(
    !mincut_maxflow.mincut.contains(&sink),
    "Sink in min-cut ({:?}, {:?}).",
    sink,
    mincut_maxflow.mincut,
  );

  let mincut_flow = get_mincut_capacity(mincut_maxflow);
  assert!(
    approx_eq(mincut_maxflow.maxflow, mincut_flow, FLOW_TOLERANCE),
    "Max-flow flow ({:?}) doesn't match min-cut capacity ({:?}).",
    mincut_maxflow.maxflow,
    mincut_flow,
  );

  Ok(())
}

#[must_use]
fn get_mincut_capacity(mincut_maxflow: &MincutMaxflow) -> f64 {
  mincut_maxflow
    .graph
    .iter_edges()
    .filter(|(_, edge)| {
      let (from, to) = edge.vertices();
      mincut_maxflow.mincut.contains(&from)
        && !mincut_maxflow.mincut.contains(&to)
    })
    .map(|(_, edge)| edge.capacity().unwrap_or(0.0))
    .sum()
}
