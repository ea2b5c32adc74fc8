use std::collections::HashMap;

use tracing::debug;

use crate::bipartite::groups;
use crate::error::Result;
use crate::graph::EdgeId;
use crate::graph::Graph;
use crate::max_flow::EdmondsKarp;

/// Maximum matching of a bipartite graph, reduced to a unit-capacity maximum
/// flow from a helper source (feeding the smaller group label) to a helper
/// sink (drained by the other group).
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct FlowMatching<'g> {
  graph: &'g Graph,
  group_a: i64,
}

impl<'g> FlowMatching<'g> {
  /// Fails with `Error::NotBipartite` unless the vertices carry exactly two
  /// group labels and no edge stays within a group.
  pub fn new(graph: &'g Graph) -> Result<Self> {
    let (group_a, _) = groups(graph)?;
    Ok(Self { graph, group_a })
  }

  /// The matched edges of the input graph, ascending.
  pub fn edges(&self) -> Result<Vec<EdgeId>> {
    let mut network = self.graph.clone_edgeless();
    let source = network.create_vertex();
    let sink = network.create_vertex();

    for (vertex, record) in self.graph.iter_vertices() {
      let id = if record.group() == Some(self.group_a) {
        network.create_edge_directed(source, vertex)?
      } else {
        network.create_edge_directed(vertex, sink)?
      };
      network.edge_mut(id)?.set_capacity(Some(1.0))?;
    }

    // NOTE: Original edges are oriented from group A to group B regardless
    // of their own direction.
    let mut originals: HashMap<EdgeId, EdgeId> = HashMap::new();
    for (id, edge) in self.graph.iter_edges() {
      let (x, y) = edge.vertices();
      let (a, b) = if self.graph.vertex(x)?.group() == Some(self.group_a) {
        (x, y)
      } else {
        (y, x)
      };

      let flow_edge = network.create_edge_directed(a, b)?;
      network.edge_mut(flow_edge)?.set_capacity(Some(1.0))?;
      originals.insert(flow_edge, id);
    }

    let result = EdmondsKarp::new(&network, source, sink)?.create_graph()?;

    let mut edges = Vec::new();
    for (flow_edge, original) in originals {
      if result.edge(flow_edge)?.flow().unwrap_or(0.0) > 0.0 {
        edges.push(original);
      }
    }
    edges.sort_unstable();
    debug!(matches = edges.len(), "maximum matching found");

    Ok(edges)
  }

  pub fn number_of_matches(&self) -> Result<usize> {
    Ok(self.edges()?.len())
  }

  /// Clone of the input graph keeping only the matched edges.
  pub fn create_graph(&self) -> Result<Graph> {
    self.graph.clone_edges(&self.edges()?)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use pretty_assertions::assert_eq;

  use super::*;
  use crate::error::Error;
  use crate::graph::VertexId;

  #[must_use]
  struct TestExample {
    groups: Vec<i64>,
    edges: Vec<(usize, usize)>,
    expected_matches: usize,
  }

  fn make_graph(groups: &[i64], edges: &[(usize, usize)]) -> Graph {
    let mut graph = Graph::new();
    for &group in groups {
      let vertex = graph.create_vertex();
      graph.vertex_mut(vertex).unwrap().set_group(Some(group));
    }
    for &(a, b) in edges {
      graph
        .create_edge_undirected(VertexId(a), VertexId(b))
        .unwrap();
    }

    graph
  }

  fn complete_bipartite(n: usize) -> Graph {
    let groups: Vec<i64> =
      (0..n).map(|_| 0).chain((0..n).map(|_| 1)).collect();
    let edges: Vec<(usize, usize)> = (0..n)
      .flat_map(|a| (n..2 * n).map(move |b| (a, b)))
      .collect();

    make_graph(&groups, &edges)
  }

  fn assert_is_matching(graph: &Graph, edges: &[EdgeId]) {
    let mut covered = HashSet::new();
    for &edge in edges {
      let (a, b) = graph.edge(edge).unwrap().vertices();
      assert!(covered.insert(a), "Vertex matched twice ({:?}).", a);
      assert!(covered.insert(b), "Vertex matched twice ({:?}).", b);
    }
  }

  #[test]
  fn test_matching() {
    let examples = vec![
      TestExample {
        groups: vec![0, 0, 0, 1, 1, 1],
        edges: vec![(0, 3), (0, 4), (1, 3), (2, 3)],
        expected_matches: 2,
      },
      TestExample {
        // NOTE: Greedy would match 0-3 first and block 1.
        groups: vec![0, 0, 1, 1],
        edges: vec![(0, 2), (0, 3), (1, 2)],
        expected_matches: 2,
      },
      TestExample {
        groups: vec![5, 5, 2],
        edges: vec![(0, 2), (1, 2)],
        expected_matches: 1,
      },
      TestExample {
        groups: vec![0, 1, 0, 1],
        edges: vec![],
        expected_matches: 0,
      },
    ];

    for TestExample {
      groups,
      edges,
      expected_matches,
    } in examples
    {
      let graph = make_graph(&groups, &edges);
      let matching = FlowMatching::new(&graph).unwrap();

      let matched = matching.edges().unwrap();
      assert_eq!(matched.len(), expected_matches);
      assert_eq!(matching.number_of_matches().unwrap(), expected_matches);
      assert_is_matching(&graph, &matched);
    }
  }

  #[test]
  fn test_complete_bipartite() {
    for n in 1..=5 {
      let graph = complete_bipartite(n);
      let matching = FlowMatching::new(&graph).unwrap();

      assert_eq!(matching.number_of_matches().unwrap(), n);

      let result = matching.create_graph().unwrap();
      assert_eq!(result.vertex_count(), 2 * n);
      assert_eq!(result.edge_count(), n);
      for vertex in result.vertices() {
        assert_eq!(result.vertex(vertex).unwrap().edges().len(), 1);
      }
    }
  }

  #[test]
  fn test_directed_edges_against_groups() {
    let mut graph = make_graph(&[0, 1, 0, 1], &[]);
    let first = graph.create_edge_directed(VertexId(1), VertexId(0)).unwrap();
    let second = graph.create_edge_directed(VertexId(2), VertexId(3)).unwrap();

    let matching = FlowMatching::new(&graph).unwrap();
    assert_eq!(matching.edges().unwrap(), vec![first, second]);
  }

  #[test]
  fn test_not_bipartite() {
    let examples = vec![
      make_graph(&[0, 0, 1], &[(0, 1)]),
      make_graph(&[0, 1, 2], &[(0, 1)]),
      make_graph(&[0, 0], &[]),
    ];

    for graph in examples {
      assert!(matches!(
        FlowMatching::new(&graph),
        Err(Error::NotBipartite(_))
      ));
    }

    let mut ungrouped = make_graph(&[0, 1], &[(0, 1)]);
    ungrouped.vertex_mut(VertexId(0)).unwrap().set_group(None);
    assert!(matches!(
      FlowMatching::new(&ungrouped),
      Err(Error::NotBipartite(_))
    ));
  }
}
