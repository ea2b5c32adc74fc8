use crate::error::Result;
use crate::graph::EdgeId;
use crate::graph::Graph;

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
  /// Unused capacity of the original edge, same orientation.
  Forward,
  /// Flow already on the original edge that may be pushed back.
  Backward,
}

/// Where a residual edge comes from: which original edge, in which direction,
/// and how much residual capacity it contributed.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualEdge {
  pub edge: EdgeId,
  pub direction: Direction,
  pub capacity: f64,
}

impl ResidualEdge {
  pub(crate) const fn new(
    edge: EdgeId,
    direction: Direction,
    capacity: f64,
  ) -> Self {
    Self {
      edge,
      direction,
      capacity,
    }
  }

  /// Pushes `delta` units along the residual edge, i.e. raises the original
  /// edge's flow for forward edges and lowers it for backward ones.
  pub(crate) fn add_residual_flow(
    &self,
    graph: &mut Graph,
    delta: f64,
  ) -> Result<()> {
    assert!(
      delta <= self.capacity,
      "Overflow ({:?}, {:?}).",
      self,
      delta,
    );

    let edge = graph.edge_mut(self.edge)?;
    let flow = edge.flow().unwrap_or(0.0);

    // NOTE: Clamping only absorbs rounding, `delta` never exceeds the residual
    // capacity this edge was built with.
    let new_flow = match self.direction {
      Direction::Forward => match edge.capacity() {
        Some(capacity) => (flow + delta).min(capacity),
        None => flow + delta,
      },
      Direction::Backward => (flow - delta).max(0.0),
    };
    edge.set_flow(Some(new_flow))?;

    Ok(())
  }
}
