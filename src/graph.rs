//! Arena-backed graph: vertices and edges live in slot vectors owned by the
//! [`Graph`] and refer to each other only through [`VertexId`] and [`EdgeId`]
//! handles. Destroyed entries leave tombstones, so a handle keeps its meaning
//! for the lifetime of the graph and of every [`Graph::clone`] made from it.

mod edge;
mod vertex;

use std::fmt;

use itertools::Itertools;

pub use crate::graph::edge::Edge;
pub use crate::graph::edge::EdgeKind;
pub use crate::graph::vertex::Vertex;

use crate::error::Error;
use crate::error::Result;

/// Furthest `Graph::create_vertex_with_id` may grow the vertex arena in one
/// step.
pub const MAX_SLOT_GAP: usize = 1 << 20;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

impl fmt::Debug for VertexId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "v{}", self.0)
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

impl fmt::Debug for EdgeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "e{}", self.0)
  }
}

#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
  vertices: Vec<Option<Vertex>>,
  edges: Vec<Option<Edge>>,
}

impl Graph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a vertex in the next never-used slot.
  pub fn create_vertex(&mut self) -> VertexId {
    let id = VertexId(self.vertices.len());
    self.vertices.push(Some(Vertex::default()));
    id
  }

  /// Creates a vertex in a chosen slot. Slots past the end of the arena are
  /// left as tombstones, so `id` may lie at most `MAX_SLOT_GAP` slots beyond
  /// the current end.
  pub fn create_vertex_with_id(&mut self, id: VertexId) -> Result<VertexId> {
    if self.has_vertex(id) {
      return Err(Error::VertexExists(id));
    }

    if id.0 >= self.vertices.len() {
      let len = id
        .0
        .checked_add(1)
        .filter(|&len| len - self.vertices.len() <= MAX_SLOT_GAP)
        .ok_or_else(|| {
          Error::InvalidArgument(format!(
            "vertex id {:?} too far past the last slot ({})",
            id,
            self.vertices.len(),
          ))
        })?;
      self.vertices.resize(len, None);
    }
    self.vertices[id.0] = Some(Vertex::default());

    Ok(id)
  }

  #[must_use]
  pub fn has_vertex(&self, id: VertexId) -> bool {
    matches!(self.vertices.get(id.0), Some(Some(_)))
  }

  pub fn vertex(&self, id: VertexId) -> Result<&Vertex> {
    self
      .vertices
      .get(id.0)
      .and_then(Option::as_ref)
      .ok_or(Error::VertexNotFound(id))
  }

  pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut Vertex> {
    self
      .vertices
      .get_mut(id.0)
      .and_then(Option::as_mut)
      .ok_or(Error::VertexNotFound(id))
  }

  /// Live vertex ids, ascending.
  pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
    self
      .vertices
      .iter()
      .enumerate()
      .filter(|(_, vertex)| vertex.is_some())
      .map(|(id, _)| VertexId(id))
  }

  /// Live vertices with their records, ascending by id.
  pub fn iter_vertices(
    &self,
  ) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
    self
      .vertices
      .iter()
      .enumerate()
      .filter_map(|(id, vertex)| Some((VertexId(id), vertex.as_ref()?)))
  }

  #[must_use]
  pub fn vertex_count(&self) -> usize {
    self.vertices.iter().flatten().count()
  }

  /// Destroys a vertex together with all its incident edges.
  pub fn destroy_vertex(&mut self, id: VertexId) -> Result<()> {
    let incident = self.vertex(id)?.edges.clone();
    for edge in incident {
      self.destroy_edge(edge)?;
    }
    self.vertices[id.0] = None;

    Ok(())
  }

  pub fn create_edge_directed(
    &mut self,
    from: VertexId,
    to: VertexId,
  ) -> Result<EdgeId> {
    self.insert_edge(Edge::new(EdgeKind::Directed { from, to }))
  }

  pub fn create_edge_undirected(
    &mut self,
    a: VertexId,
    b: VertexId,
  ) -> Result<EdgeId> {
    self.insert_edge(Edge::new(EdgeKind::Undirected { a, b }))
  }

  /// Copies `edge` of `other` (attributes included) into this graph, between
  /// the vertices with the same ids.
  pub fn create_edge_clone(
    &mut self,
    other: &Self,
    edge: EdgeId,
  ) -> Result<EdgeId> {
    let original = other.edge(edge)?;
    self.insert_edge(original.with_kind(original.kind()))
  }

  /// Like [`Graph::create_edge_clone`] but with the endpoints swapped.
  pub fn create_edge_clone_inverted(
    &mut self,
    other: &Self,
    edge: EdgeId,
  ) -> Result<EdgeId> {
    let original = other.edge(edge)?;
    self.insert_edge(original.with_kind(original.kind().inverted()))
  }

  fn insert_edge(&mut self, edge: Edge) -> Result<EdgeId> {
    let (a, b) = edge.vertices();
    self.vertex(a)?;
    self.vertex(b)?;
    if a == b {
      return Err(Error::InvalidArgument(format!(
        "edge endpoints must differ ({:?}, {:?})",
        a, b,
      )));
    }

    let id = EdgeId(self.edges.len());
    self.edges.push(Some(edge));
    self.vertex_mut(a)?.edges.push(id);
    self.vertex_mut(b)?.edges.push(id);

    Ok(id)
  }

  #[must_use]
  pub fn has_edge(&self, id: EdgeId) -> bool {
    matches!(self.edges.get(id.0), Some(Some(_)))
  }

  pub fn edge(&self, id: EdgeId) -> Result<&Edge> {
    self
      .edges
      .get(id.0)
      .and_then(Option::as_ref)
      .ok_or(Error::EdgeNotFound(id))
  }

  pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge> {
    self
      .edges
      .get_mut(id.0)
      .and_then(Option::as_mut)
      .ok_or(Error::EdgeNotFound(id))
  }

  /// Live edge ids, ascending.
  pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
    self
      .edges
      .iter()
      .enumerate()
      .filter(|(_, edge)| edge.is_some())
      .map(|(id, _)| EdgeId(id))
  }

  /// Live edges with their records, ascending by id.
  pub fn iter_edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
    self
      .edges
      .iter()
      .enumerate()
      .filter_map(|(id, edge)| Some((EdgeId(id), edge.as_ref()?)))
  }

  #[must_use]
  pub fn edge_count(&self) -> usize {
    self.edges.iter().flatten().count()
  }

  pub fn destroy_edge(&mut self, id: EdgeId) -> Result<()> {
    let (a, b) = self.edge(id)?.vertices();
    for vertex in [a, b] {
      self.vertex_mut(vertex)?.edges.retain(|&edge| edge != id);
    }
    self.edges[id.0] = None;

    Ok(())
  }

  /// Edges that can be walked starting at `vertex`: outgoing directed edges
  /// and every incident undirected edge, ascending.
  pub fn edges_out(&self, vertex: VertexId) -> Result<Vec<EdgeId>> {
    Ok(
      self
        .vertex(vertex)?
        .edges
        .iter()
        .copied()
        .filter(|&id| {
          self.edges[id.0]
            .as_ref()
            .is_some_and(|edge| edge.leaves(vertex))
        })
        .collect(),
    )
  }

  /// Distinct vertices reachable from `vertex` over a single edge.
  pub fn vertices_edge_to(&self, vertex: VertexId) -> Result<Vec<VertexId>> {
    Ok(
      self
        .edges_out(vertex)?
        .into_iter()
        .filter_map(|id| self.edges[id.0].as_ref()?.target_from(vertex))
        .unique()
        .collect(),
    )
  }

  /// Same vertices, no edges.
  pub fn clone_edgeless(&self) -> Self {
    Self {
      vertices: self
        .vertices
        .iter()
        .map(|vertex| vertex.as_ref().map(Vertex::without_edges))
        .collect(),
      edges: Vec::new(),
    }
  }

  /// Same vertices, only the given edges. Edge ids are reassigned in the
  /// order given (duplicates dropped).
  pub fn clone_edges(&self, edges: &[EdgeId]) -> Result<Self> {
    let mut graph = self.clone_edgeless();
    for &edge in edges.iter().unique() {
      graph.create_edge_clone(self, edge)?;
    }

    Ok(graph)
  }

  /// The counterpart of `edge` of `original` in this graph: an edge between
  /// the vertices with the same ids, with the same orientation. The lowest
  /// id wins among parallel edges.
  pub fn edge_clone(
    &self,
    original: &Self,
    edge: EdgeId,
  ) -> Result<Option<EdgeId>> {
    let kind = original.edge(edge)?.kind();
    Ok(self.find_edge(kind))
  }

  /// The counterpart of `edge` of `original` with reversed orientation.
  pub fn edge_clone_inverted(
    &self,
    original: &Self,
    edge: EdgeId,
  ) -> Result<Option<EdgeId>> {
    let kind = original.edge(edge)?.kind().inverted();
    Ok(self.find_edge(kind))
  }

  fn find_edge(&self, kind: EdgeKind) -> Option<EdgeId> {
    let (a, _) = match kind {
      EdgeKind::Directed { from, to } => (from, to),
      EdgeKind::Undirected { a, b } => (a, b),
    };

    self.vertex(a).ok()?.edges.iter().copied().find(|id| {
      self.edges[id.0]
        .as_ref()
        .is_some_and(|edge| edge.kind().same_ends(kind))
    })
  }

  /// Sum of all vertex balances; unset balances count as zero.
  #[must_use]
  pub fn balance_sum(&self) -> f64 {
    self
      .vertices
      .iter()
      .flatten()
      .filter_map(Vertex::balance)
      .sum()
  }

  /// Lengths of the vertex and edge arenas, tombstones included.
  pub(crate) fn slot_counts(&self) -> (usize, usize) {
    (self.vertices.len(), self.edges.len())
  }

  /// Cuts both arenas back to lengths taken earlier with `slot_counts`, so
  /// helper vertices and edges appended since leave no trace. Everything cut
  /// must already be destroyed.
  pub(crate) fn truncate_slots(&mut self, (vertices, edges): (usize, usize)) {
    assert!(
      self.vertices.iter().skip(vertices).all(Option::is_none)
        && self.edges.iter().skip(edges).all(Option::is_none),
      "Live slots past truncation point ({:?}, {:?}).",
      vertices,
      edges,
    );

    self.vertices.truncate(vertices);
    self.edges.truncate(edges);
  }
}
