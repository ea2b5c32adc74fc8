mod cycle_canceling;
mod successive_shortest_path;

pub use crate::min_cost_flow::cycle_canceling::CycleCanceling;
pub use crate::min_cost_flow::successive_shortest_path::SuccessiveShortestPath;

use crate::config::Config;
use crate::error::Error;
use crate::error::Result;
use crate::graph::Graph;
use crate::max_flow::common::weight_flow;

/// A minimum-cost flow: every vertex sends out exactly its balance (positive
/// for supply, negative for demand) and the total `weight * flow` is as small
/// as possible.
pub trait MinCostFlow {
  fn graph(&self) -> &Graph;
  fn config(&self) -> &Config;

  /// Clone of the input graph carrying a minimum-cost flow. The input graph is
  /// left untouched.
  fn create_graph(&self) -> Result<Graph>;

  /// Balances have to cancel out, within the configured tolerance.
  fn check_balance(&self) -> Result<()> {
    let sum = self.graph().balance_sum();
    if sum.abs() > self.config().balance_tolerance {
      return Err(Error::InfeasibleBalance { sum });
    }

    Ok(())
  }

  /// Total cost of the flow `create_graph()` produces.
  fn weight_flow(&self) -> Result<f64> {
    Ok(weight_flow(&self.create_graph()?))
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use proptest::prelude::*;

  use super::*;
  use crate::graph::VertexId;
  use crate::max_flow::common::is_balanced_flow;

  #[must_use]
  struct TestExample {
    balances: Vec<f64>,
    edges: Vec<(usize, usize, f64, f64)>,
    expected: Result<f64>,
  }

  /// `edges` are `(from, to, capacity, weight)`.
  fn make_network(
    balances: &[f64],
    edges: &[(usize, usize, f64, f64)],
  ) -> Graph {
    let mut graph = Graph::new();
    for &balance in balances {
      let vertex = graph.create_vertex();
      if balance != 0.0 {
        graph
          .vertex_mut(vertex)
          .unwrap()
          .set_balance(Some(balance))
          .unwrap();
      }
    }
    for &(from, to, capacity, weight) in edges {
      let id = graph
        .create_edge_directed(VertexId(from), VertexId(to))
        .unwrap();
      graph
        .edge_mut(id)
        .unwrap()
        .set_capacity(Some(capacity))
        .unwrap()
        .set_weight(Some(weight))
        .unwrap();
    }

    graph
  }

  fn algorithms(graph: &Graph) -> Vec<Box<dyn MinCostFlow + '_>> {
    vec![
      Box::new(CycleCanceling::new(graph)),
      Box::new(SuccessiveShortestPath::new(graph)),
    ]
  }

  #[test]
  fn test_min_cost_flow() {
    let examples = vec![
      TestExample {
        // NOTE: The direct edge is the fewest-hops path but the most expensive
        // one.
        balances: vec![2.0, 0.0, 0.0, -2.0],
        edges: vec![
          (0, 3, 2.0, 5.0),
          (0, 1, 1.0, 1.0),
          (1, 3, 2.0, 0.0),
          (0, 2, 2.0, 1.0),
          (2, 3, 2.0, 1.0),
        ],
        expected: Ok(3.0),
      },
      TestExample {
        balances: vec![1.0, -1.0],
        edges: vec![(0, 1, 1.0, 2.0), (1, 0, 1.0, -1.0)],
        expected: Ok(2.0),
      },
      TestExample {
        balances: vec![0.0, 0.0, 0.0],
        edges: vec![(0, 1, 1.0, 2.0), (1, 2, 1.0, 3.0)],
        expected: Ok(0.0),
      },
      TestExample {
        balances: vec![3.0, 0.0, -3.0],
        edges: vec![
          (0, 1, 2.0, 1.0),
          (1, 2, 2.0, 1.0),
          (0, 2, 2.0, 4.0),
        ],
        expected: Ok(8.0),
      },
      TestExample {
        balances: vec![2.0, -1.0],
        edges: vec![(0, 1, 5.0, 1.0)],
        expected: Err(Error::InfeasibleBalance { sum: 1.0 }),
      },
      TestExample {
        balances: vec![2.0, -2.0],
        edges: vec![(0, 1, 1.0, 1.0)],
        expected: Err(Error::InsufficientCapacity {
          required: 2.0,
          achievable: 1.0,
        }),
      },
    ];

    for TestExample {
      balances,
      edges,
      expected,
    } in examples
    {
      let graph = make_network(&balances, &edges);
      let before = graph.clone();

      for algorithm in algorithms(&graph) {
        assert_eq!(algorithm.weight_flow(), expected);

        if expected.is_ok() {
          let result = algorithm.create_graph().unwrap();
          assert!(is_balanced_flow(&result, 1e-9).unwrap());
          assert_eq!(result.vertex_count(), graph.vertex_count());
          assert_eq!(result.edge_count(), graph.edge_count());
        }
      }
      assert_eq!(graph, before);
    }
  }

  #[test]
  fn test_undirected_edges_rejected() {
    let mut graph = make_network(&[1.0, -1.0], &[]);
    let id = graph
      .create_edge_undirected(VertexId(0), VertexId(1))
      .unwrap();
    graph.edge_mut(id).unwrap().set_capacity(Some(1.0)).unwrap();

    for algorithm in algorithms(&graph) {
      assert_eq!(
        algorithm.create_graph(),
        Err(Error::UnsupportedEdgeKind { edge: id })
      );
    }
  }

  #[test]
  fn test_balance_tolerance() {
    let graph = make_network(&[1.0, -0.9], &[(0, 1, 1.0, 1.0)]);
    let config = Config {
      balance_tolerance: 0.5,
    };

    let algorithm = CycleCanceling::with_config(&graph, config).unwrap();
    assert_eq!(algorithm.check_balance(), Ok(()));
    assert!(matches!(
      CycleCanceling::new(&graph).check_balance(),
      Err(Error::InfeasibleBalance { .. })
    ));

    // NOTE: A sum exactly at the tolerance still passes.
    let graph = make_network(&[1.0, -0.5], &[(0, 1, 1.0, 1.0)]);
    let algorithm = CycleCanceling::with_config(&graph, config).unwrap();
    assert_eq!(algorithm.check_balance(), Ok(()));
  }

  proptest! {
    #[test]
    fn test_algorithms_agree(
      vertex_count in 2usize..6,
      supply in 1u32..5,
      raw_edges in prop::collection::vec(
        (0usize..6, 0usize..6, 0u32..5, -2i32..6),
        1..12,
      ),
    ) {
      let edges: Vec<(usize, usize, f64, f64)> = raw_edges
        .into_iter()
        .filter(|&(from, to, _, _)| {
          from != to && from < vertex_count && to < vertex_count
        })
        .map(|(from, to, capacity, weight)| {
          (from, to, f64::from(capacity), f64::from(weight))
        })
        .collect();
      let mut balances = vec![0.0; vertex_count];
      balances[0] = f64::from(supply);
      balances[vertex_count - 1] = -f64::from(supply);
      let graph = make_network(&balances, &edges);

      let canceled = CycleCanceling::new(&graph).create_graph();
      let shortest = SuccessiveShortestPath::new(&graph).create_graph();

      match (canceled, shortest) {
        (Ok(canceled), Ok(shortest)) => {
          prop_assert!(is_balanced_flow(&canceled, 1e-9).unwrap());
          prop_assert!(is_balanced_flow(&shortest, 1e-9).unwrap());
          prop_assert!(
            (weight_flow(&canceled) - weight_flow(&shortest)).abs() < 1e-6
          );
        }
        (
          Err(Error::InsufficientCapacity { .. }),
          Err(Error::InsufficientCapacity { .. }),
        ) => {}
        (canceled, shortest) => {
          prop_assert!(false, "{:?} vs {:?}", canceled, shortest);
        }
      }
    }
  }
}
