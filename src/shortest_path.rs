//! Moore–Bellman–Ford cheapest paths and negative cycle detection. Unset
//! weights count as zero; undirected edges are relaxed in both directions.

use std::collections::HashMap;

use crate::error::Error;
use crate::error::Result;
use crate::graph::EdgeId;
use crate::graph::EdgeKind;
use crate::graph::Graph;
use crate::graph::VertexId;
use crate::search::walk_back;
use crate::search::EdgeTo;

#[derive(Debug, Clone, Copy)]
struct Step {
  from: VertexId,
  to: VertexId,
  edge: EdgeId,
  weight: f64,
}

fn steps(graph: &Graph) -> Vec<Step> {
  graph
    .iter_edges()
    .flat_map(|(id, edge)| {
      let weight = edge.weight().unwrap_or(0.0);
      let forward = |from, to| Step {
        from,
        to,
        edge: id,
        weight,
      };

      match edge.kind() {
        EdgeKind::Directed { from, to } => vec![forward(from, to)],
        EdgeKind::Undirected { a, b } => vec![forward(a, b), forward(b, a)],
      }
    })
    .collect()
}

/// One relaxation pass over all steps. Returns the last vertex whose distance
/// improved, if any did.
fn relax(
  steps: &[Step],
  distances: &mut HashMap<VertexId, f64>,
  edge_to: &mut EdgeTo,
) -> Option<VertexId> {
  let mut relaxed = None;

  for step in steps {
    let Some(&from_distance) = distances.get(&step.from) else {
      continue;
    };

    let candidate = from_distance + step.weight;
    if distances
      .get(&step.to)
      .map_or(true, |&current| candidate < current)
    {
      distances.insert(step.to, candidate);
      edge_to.insert(step.to, (step.from, step.edge));
      relaxed = Some(step.to);
    }
  }

  relaxed
}

/// Walks predecessor links back from a vertex that was still relaxed in the
/// final pass until a vertex repeats, then returns that cycle's edges in
/// walking order.
fn extract_cycle(
  edge_to: &EdgeTo,
  relaxed: VertexId,
  vertex_count: usize,
) -> Vec<EdgeId> {
  let mut on_cycle = relaxed;
  for _ in 0..vertex_count {
    match edge_to.get(&on_cycle) {
      Some(&(previous, _)) => on_cycle = previous,
      None => return Vec::new(),
    }
  }

  let mut edges = Vec::new();
  let mut current = on_cycle;
  loop {
    let Some(&(previous, edge)) = edge_to.get(&current) else {
      return Vec::new();
    };
    edges.push(edge);
    current = previous;
    if current == on_cycle {
      break;
    }
  }
  edges.reverse();

  edges
}

/// Cheapest paths from a fixed start vertex, tolerating negative weights.
#[must_use]
pub struct MooreBellmanFord<'g> {
  graph: &'g Graph,
  start: VertexId,
}

impl<'g> MooreBellmanFord<'g> {
  pub fn new(graph: &'g Graph, start: VertexId) -> Result<Self> {
    graph.vertex(start)?;
    Ok(Self { graph, start })
  }

  fn run(&self) -> Result<(HashMap<VertexId, f64>, EdgeTo)> {
    let steps = steps(self.graph);
    let vertex_count = self.graph.vertex_count();

    let mut distances = HashMap::from([(self.start, 0.0)]);
    let mut edge_to: EdgeTo = HashMap::new();

    for _ in 1..vertex_count {
      let Some(relaxed) = relax(&steps, &mut distances, &mut edge_to) else {
        return Ok((distances, edge_to));
      };

      if edge_to.contains_key(&self.start) {
        // NOTE: The start vertex got a predecessor, i.e. a negative cycle
        // runs through it. No need to keep iterating.
        return Err(Error::NegativeCycle {
          edges: extract_cycle(&edge_to, relaxed, vertex_count),
        });
      }
    }

    match relax(&steps, &mut distances, &mut edge_to) {
      None => Ok((distances, edge_to)),
      Some(relaxed) => Err(Error::NegativeCycle {
        edges: extract_cycle(&edge_to, relaxed, vertex_count),
      }),
    }
  }

  /// Cheapest path to `destination`, `None` when unreachable.
  pub fn path_to(&self, destination: VertexId) -> Result<Option<Vec<EdgeId>>> {
    self.graph.vertex(destination)?;

    let (_, edge_to) = self.run()?;
    if destination != self.start && !edge_to.contains_key(&destination) {
      return Ok(None);
    }

    Ok(Some(walk_back(&edge_to, self.start, destination)))
  }

  /// Cost of the cheapest path to every reachable vertex.
  pub fn distances(&self) -> Result<HashMap<VertexId, f64>> {
    Ok(self.run()?.0)
  }
}

/// Finds any cycle of negative total weight, returning its edges in walking
/// order.
#[must_use]
pub fn detect_negative_cycle(graph: &Graph) -> Option<Vec<EdgeId>> {
  let steps = steps(graph);
  let vertex_count = graph.vertex_count();

  // NOTE: Starting every vertex at distance zero behaves like an extra source
  // connected to all vertices, so cycles are found in every component.
  let mut distances: HashMap<VertexId, f64> =
    graph.vertices().map(|vertex| (vertex, 0.0)).collect();
  let mut edge_to: EdgeTo = HashMap::new();

  for _ in 1..vertex_count {
    relax(&steps, &mut distances, &mut edge_to)?;
  }

  let relaxed = relax(&steps, &mut distances, &mut edge_to)?;
  let cycle = extract_cycle(&edge_to, relaxed, vertex_count);
  (!cycle.is_empty()).then_some(cycle)
}
