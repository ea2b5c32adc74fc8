use crate::error::Error;
use crate::error::Result;
use crate::graph::VertexId;

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
  Directed { from: VertexId, to: VertexId },
  Undirected { a: VertexId, b: VertexId },
}

impl EdgeKind {
  pub(crate) const fn inverted(self) -> Self {
    match self {
      Self::Directed { from, to } => Self::Directed { from: to, to: from },
      Self::Undirected { a, b } => Self::Undirected { a: b, b: a },
    }
  }

  /// Same endpoints with the same orientation. Undirected kinds ignore the
  /// order of their endpoints.
  pub(crate) fn same_ends(self, other: Self) -> bool {
    match (self, other) {
      (Self::Directed { from, to }, Self::Directed { from: f, to: t }) => {
        from == f && to == t
      }
      (Self::Undirected { a, b }, Self::Undirected { a: x, b: y }) => {
        (a == x && b == y) || (a == y && b == x)
      }
      _ => false,
    }
  }
}

/// An edge record. Its three numeric attributes are independent and optional;
/// `flow <= capacity` holds whenever both are set.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
  kind: EdgeKind,
  weight: Option<f64>,
  capacity: Option<f64>,
  flow: Option<f64>,
}

impl Edge {
  pub(crate) const fn new(kind: EdgeKind) -> Self {
    Self {
      kind,
      weight: None,
      capacity: None,
      flow: None,
    }
  }

  pub(crate) const fn with_kind(&self, kind: EdgeKind) -> Self {
    Self {
      kind,
      weight: self.weight,
      capacity: self.capacity,
      flow: self.flow,
    }
  }

  pub const fn kind(&self) -> EdgeKind {
    self.kind
  }

  #[must_use]
  pub const fn is_directed(&self) -> bool {
    matches!(self.kind, EdgeKind::Directed { .. })
  }

  /// Both endpoints, `(from, to)` for directed edges.
  #[must_use]
  pub const fn vertices(&self) -> (VertexId, VertexId) {
    match self.kind {
      EdgeKind::Directed { from, to } => (from, to),
      EdgeKind::Undirected { a, b } => (a, b),
    }
  }

  /// `true` when the edge can be walked starting at `vertex`.
  #[must_use]
  pub fn leaves(&self, vertex: VertexId) -> bool {
    match self.kind {
      EdgeKind::Directed { from, .. } => from == vertex,
      EdgeKind::Undirected { a, b } => a == vertex || b == vertex,
    }
  }

  /// The vertex reached when walking the edge from `vertex`, if it can be
  /// walked from there at all.
  #[must_use]
  pub fn target_from(&self, vertex: VertexId) -> Option<VertexId> {
    match self.kind {
      EdgeKind::Directed { from, to } if from == vertex => Some(to),
      EdgeKind::Directed { .. } => None,
      EdgeKind::Undirected { a, b } if a == vertex => Some(b),
      EdgeKind::Undirected { a, b } if b == vertex => Some(a),
      EdgeKind::Undirected { .. } => None,
    }
  }

  #[must_use]
  pub const fn weight(&self) -> Option<f64> {
    self.weight
  }

  pub fn set_weight(&mut self, weight: Option<f64>) -> Result<&mut Self> {
    if let Some(value) = weight {
      if !value.is_finite() {
        return Err(Error::InvalidValue {
          attribute: "weight",
          value,
        });
      }
    }

    self.weight = weight;
    Ok(self)
  }

  #[must_use]
  pub const fn capacity(&self) -> Option<f64> {
    self.capacity
  }

  pub fn set_capacity(&mut self, capacity: Option<f64>) -> Result<&mut Self> {
    if let Some(value) = capacity {
      ensure_non_negative("capacity", value)?;

      if let Some(flow) = self.flow {
        if flow > value {
          return Err(Error::Range {
            attribute: "capacity",
            value,
            limit: flow,
          });
        }
      }
    }

    self.capacity = capacity;
    Ok(self)
  }

  #[must_use]
  pub const fn flow(&self) -> Option<f64> {
    self.flow
  }

  pub fn set_flow(&mut self, flow: Option<f64>) -> Result<&mut Self> {
    if let Some(value) = flow {
      ensure_non_negative("flow", value)?;

      if let Some(capacity) = self.capacity {
        if value > capacity {
          return Err(Error::Range {
            attribute: "flow",
            value,
            limit: capacity,
          });
        }
      }
    }

    self.flow = flow;
    Ok(self)
  }

  /// Capacity not yet used by flow. `None` for unbounded edges.
  #[must_use]
  pub fn capacity_remaining(&self) -> Option<f64> {
    self
      .capacity
      .map(|capacity| capacity - self.flow.unwrap_or(0.0))
  }
}

fn ensure_non_negative(attribute: &'static str, value: f64) -> Result<()> {
  if !value.is_finite() || value < 0.0 {
    return Err(Error::InvalidValue { attribute, value });
  }

  Ok(())
}
