use crate::error::Error;
use crate::error::Result;
use crate::graph::EdgeKind;
use crate::graph::Graph;
use crate::graph::VertexId;

/// Relative comparison for flow values that went through float arithmetic.
#[must_use]
pub(crate) fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
  (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1.0)
}

/// Sets the flow of every edge to zero. Flow is only defined on directed
/// edges.
pub(crate) fn reset_flow(graph: &mut Graph) -> Result<()> {
  let ids: Vec<_> = graph.edges().collect();
  for id in ids {
    let edge = graph.edge_mut(id)?;
    if !edge.is_directed() {
      return Err(Error::UnsupportedEdgeKind { edge: id });
    }
    edge.set_flow(Some(0.0))?;
  }

  Ok(())
}

/// Outgoing minus incoming flow of `vertex` (its excess as a source).
pub fn net_flow(graph: &Graph, vertex: VertexId) -> Result<f64> {
  let mut excess = 0.0;

  for &id in graph.vertex(vertex)?.edges() {
    let edge = graph.edge(id)?;
    let EdgeKind::Directed { from, .. } = edge.kind() else {
      return Err(Error::UnsupportedEdgeKind { edge: id });
    };

    let flow = edge.flow().unwrap_or(0.0);
    if from == vertex {
      excess += flow;
    } else {
      excess -= flow;
    }
  }

  Ok(excess)
}

/// `true` when every vertex sends out exactly its balance (unset balances
/// count as zero).
pub fn is_balanced_flow(graph: &Graph, tolerance: f64) -> Result<bool> {
  for (id, vertex) in graph.iter_vertices() {
    let balance = vertex.balance().unwrap_or(0.0);
    if (net_flow(graph, id)? - balance).abs() > tolerance {
      return Ok(false);
    }
  }

  Ok(true)
}

/// Total cost of the flow: sum of `weight * flow` over all edges, unset
/// attributes counting as zero.
#[must_use]
pub fn weight_flow(graph: &Graph) -> f64 {
  graph
    .iter_edges()
    .map(|(_, edge)| edge.weight().unwrap_or(0.0) * edge.flow().unwrap_or(0.0))
    .sum()
}

/// Flow conservation: every vertex other than `source` and `sink` passes on
/// exactly what it receives, and the sink receives what the source sends.
pub(crate) fn ensure_feasibility(
  graph: &Graph,
  source: VertexId,
  sink: VertexId,
  maxflow: f64,
  tolerance: f64,
) -> Result<()> {
  let source_excess = net_flow(graph, source)?;
  assert!(
    approx_eq(source_excess, maxflow, tolerance),
    "Invalid excess at source ({:?}, {:?}).",
    source_excess,
    maxflow,
  );

  let sink_excess = net_flow(graph, sink)?;
  assert!(
    approx_eq(-sink_excess, maxflow, tolerance),
    "Invalid excess at sink ({:?}, {:?}).",
    sink_excess,
    maxflow,
  );

  for vertex in graph.vertices() {
    if vertex == source || vertex == sink {
      continue;
    }

    let excess = net_flow(graph, vertex)?;
    assert!(
      approx_eq(excess, 0.0, tolerance),
      "Invalid net flow out of ({:?}, {:?}).",
      vertex,
      excess,
    );
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn make_chain() -> Graph {
    let mut graph = Graph::new();
    let vertices: Vec<_> = (0..3).map(|_| graph.create_vertex()).collect();
    for (from, to, weight, flow) in [(0, 1, 2.0, 3.0), (1, 2, -1.0, 3.0)] {
      let id = graph
        .create_edge_directed(vertices[from], vertices[to])
        .unwrap();
      graph
        .edge_mut(id)
        .unwrap()
        .set_weight(Some(weight))
        .unwrap()
        .set_flow(Some(flow))
        .unwrap();
    }

    graph
  }

  #[test]
  fn test_net_flow() {
    let graph = make_chain();

    assert_eq!(net_flow(&graph, VertexId(0)).unwrap(), 3.0);
    assert_eq!(net_flow(&graph, VertexId(1)).unwrap(), 0.0);
    assert_eq!(net_flow(&graph, VertexId(2)).unwrap(), -3.0);
    assert_eq!(weight_flow(&graph), 3.0);
  }

  #[test]
  fn test_is_balanced_flow() {
    let mut graph = make_chain();
    assert!(!is_balanced_flow(&graph, 1e-9).unwrap());

    graph.vertex_mut(VertexId(0)).unwrap().set_balance(Some(3.0)).unwrap();
    graph.vertex_mut(VertexId(2)).unwrap().set_balance(Some(-3.0)).unwrap();
    assert!(is_balanced_flow(&graph, 1e-9).unwrap());
  }

  #[test]
  fn test_reset_flow_rejects_undirected() {
    let mut graph = make_chain();
    reset_flow(&mut graph).unwrap();
    assert_eq!(weight_flow(&graph), 0.0);

    let id = graph
      .create_edge_undirected(VertexId(0), VertexId(2))
      .unwrap();
    assert_eq!(
      reset_flow(&mut graph),
      Err(Error::UnsupportedEdgeKind { edge: id })
    );
  }
}
