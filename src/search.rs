use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;

use crate::error::Result;
use crate::graph::EdgeId;
use crate::graph::Graph;
use crate::graph::VertexId;

/// For every reached vertex, the vertex it was reached from and the edge used.
pub(crate) type EdgeTo = HashMap<VertexId, (VertexId, EdgeId)>;

/// Breadth-first search from a fixed start vertex. Directed edges are walked
/// forwards only, undirected edges both ways; edges are explored in
/// ascending id order so results are deterministic.
#[must_use]
pub struct BreadthFirst<'g> {
  graph: &'g Graph,
  start: VertexId,
}

impl<'g> BreadthFirst<'g> {
  pub fn new(graph: &'g Graph, start: VertexId) -> Result<Self> {
    graph.vertex(start)?;
    Ok(Self { graph, start })
  }

  /// Every vertex reachable from the start, in visiting order (start first).
  pub fn vertices(&self) -> Result<Vec<VertexId>> {
    let (order, _) = self.explore(None)?;
    Ok(order)
  }

  /// Fewest-hops path to `destination`, or `None` when unreachable.
  pub fn path_to(&self, destination: VertexId) -> Result<Option<Vec<EdgeId>>> {
    self.graph.vertex(destination)?;

    let (_, edge_to) = self.explore(Some(destination))?;
    if destination != self.start && !edge_to.contains_key(&destination) {
      return Ok(None);
    }

    Ok(Some(walk_back(&edge_to, self.start, destination)))
  }

  fn explore(
    &self,
    destination: Option<VertexId>,
  ) -> Result<(Vec<VertexId>, EdgeTo)> {
    let mut edge_to: EdgeTo = HashMap::new();
    let mut marked: HashSet<VertexId> = HashSet::new();
    let mut order: Vec<VertexId> = Vec::new();

    let mut queue: VecDeque<VertexId> = VecDeque::new();
    queue.push_back(self.start);
    marked.insert(self.start);

    while let Some(vertex) = queue.pop_front() {
      order.push(vertex);
      if Some(vertex) == destination {
        break;
      }

      for edge in self.graph.edges_out(vertex)? {
        let Some(other) = self.graph.edge(edge)?.target_from(vertex) else {
          continue;
        };
        if !marked.insert(other) {
          continue;
        }

        edge_to.insert(other, (vertex, edge));
        queue.push_back(other);
      }
    }

    Ok((order, edge_to))
  }
}

/// Rebuilds the edge sequence `start -> .. -> destination` from predecessor
/// links. `destination` must have been reached.
pub(crate) fn walk_back(
  edge_to: &EdgeTo,
  start: VertexId,
  destination: VertexId,
) -> Vec<EdgeId> {
  let mut edges = Vec::new();
  let mut current = destination;
  while current != start {
    let (previous, edge) = edge_to[&current];
    edges.push(edge);
    current = previous;
  }
  edges.reverse();

  edges
}
