use std::collections::HashMap;
use std::marker::PhantomData;

use tracing::trace;

use crate::error::Error;
use crate::error::Result;
use crate::graph::EdgeId;
use crate::graph::EdgeKind;
use crate::graph::Graph;
use crate::graph::VertexId;
use crate::max_flow::residual_edge::Direction;
use crate::max_flow::residual_edge::ResidualEdge;

#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResidualOptions {
  /// Also emit residual edges whose residual capacity is zero.
  pub keep_null_capacity: bool,
  /// Fold a residual edge into an existing one with the same orientation and
  /// weight instead of adding a parallel edge.
  pub merge_parallel_edges: bool,
}

/// The residual network of a flow-carrying graph: same vertices, one edge per
/// unit of slack (forward) or retractable flow (backward). Every residual
/// edge remembers the original edge(s) it stands for so flow pushed along it
/// can be folded back exactly.
#[must_use]
#[derive(Debug, Clone)]
pub struct ResidualGraph {
  graph: Graph,
  origins: HashMap<EdgeId, Vec<ResidualEdge>>,
  constructor_guard: PhantomData<()>,
}

impl ResidualGraph {
  pub fn new(graph: &Graph) -> Result<Self> {
    Self::with_options(graph, ResidualOptions::default())
  }

  pub fn with_options(graph: &Graph, options: ResidualOptions) -> Result<Self> {
    let mut residual = Self {
      graph: graph.clone_edgeless(),
      origins: HashMap::new(),
      constructor_guard: PhantomData,
    };

    for (id, edge) in graph.iter_edges() {
      let EdgeKind::Directed { from, to } = edge.kind() else {
        return Err(Error::UnsupportedEdgeKind { edge: id });
      };
      let flow = edge.flow().ok_or(Error::MissingAttribute {
        edge: id,
        attribute: "flow",
      })?;
      let capacity = edge.capacity().ok_or(Error::MissingAttribute {
        edge: id,
        attribute: "capacity",
      })?;

      if options.keep_null_capacity || flow < capacity {
        residual.add(
          from,
          to,
          edge.weight(),
          ResidualEdge::new(id, Direction::Forward, capacity - flow),
          options.merge_parallel_edges,
        )?;
      }

      if options.keep_null_capacity || flow > 0.0 {
        residual.add(
          to,
          from,
          edge.weight().map(|weight| -weight),
          ResidualEdge::new(id, Direction::Backward, flow),
          options.merge_parallel_edges,
        )?;
      }
    }

    trace!(
      vertices = residual.graph.vertex_count(),
      edges = residual.graph.edge_count(),
      "residual graph built"
    );

    Ok(residual)
  }

  fn add(
    &mut self,
    from: VertexId,
    to: VertexId,
    weight: Option<f64>,
    origin: ResidualEdge,
    merge_parallel_edges: bool,
  ) -> Result<()> {
    if merge_parallel_edges {
      if let Some(parallel) = self.find_parallel(from, to, weight)? {
        let edge = self.graph.edge_mut(parallel)?;
        let capacity = edge.capacity().unwrap_or(0.0) + origin.capacity;
        edge.set_capacity(Some(capacity))?;
        self.origins.entry(parallel).or_default().push(origin);

        return Ok(());
      }
    }

    let id = self.graph.create_edge_directed(from, to)?;
    self
      .graph
      .edge_mut(id)?
      .set_weight(weight)?
      .set_capacity(Some(origin.capacity))?
      .set_flow(Some(0.0))?;
    self.origins.insert(id, vec![origin]);

    Ok(())
  }

  fn find_parallel(
    &self,
    from: VertexId,
    to: VertexId,
    weight: Option<f64>,
  ) -> Result<Option<EdgeId>> {
    for id in self.graph.edges_out(from)? {
      let edge = self.graph.edge(id)?;
      if edge.target_from(from) == Some(to) && edge.weight() == weight {
        return Ok(Some(id));
      }
    }

    Ok(None)
  }

  pub const fn graph(&self) -> &Graph {
    &self.graph
  }

  pub fn into_graph(self) -> Graph {
    self.graph
  }

  /// The original edges a residual edge stands for.
  #[must_use]
  pub fn origins(&self, edge: EdgeId) -> &[ResidualEdge] {
    self.origins.get(&edge).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Smallest residual capacity along `edges`.
  pub fn bottleneck(&self, edges: &[EdgeId]) -> Result<f64> {
    let mut bottleneck = f64::INFINITY;

    for &id in edges {
      let remaining = self.graph.edge(id)?.capacity_remaining().ok_or(
        Error::MissingAttribute {
          edge: id,
          attribute: "capacity",
        },
      )?;
      bottleneck = bottleneck.min(remaining);
    }

    Ok(bottleneck)
  }

  /// Pushes `amount` along every residual edge of `edges` onto the original
  /// edges of `target` (the graph this residual graph was built from).
  pub fn augment(
    &self,
    target: &mut Graph,
    edges: &[EdgeId],
    amount: f64,
  ) -> Result<()> {
    for &id in edges {
      let mut remaining = amount;

      for origin in self.origins(id) {
        if remaining <= 0.0 {
          break;
        }

        let delta = remaining.min(origin.capacity);
        origin.add_residual_flow(target, delta)?;
        remaining -= delta;
      }
    }

    Ok(())
  }
}
