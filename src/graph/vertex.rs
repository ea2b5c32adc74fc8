use crate::error::Error;
use crate::error::Result;
use crate::graph::EdgeId;

#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
  balance: Option<f64>,
  group: Option<i64>,
  // NOTE: Kept in ascending order since edge ids are only ever handed out
  // increasingly.
  pub(super) edges: Vec<EdgeId>,
}

impl Vertex {
  /// Supply (positive) or demand (negative) of this vertex.
  #[must_use]
  pub const fn balance(&self) -> Option<f64> {
    self.balance
  }

  pub fn set_balance(&mut self, balance: Option<f64>) -> Result<&mut Self> {
    if let Some(value) = balance {
      if !value.is_finite() {
        return Err(Error::InvalidValue {
          attribute: "balance",
          value,
        });
      }
    }

    self.balance = balance;
    Ok(self)
  }

  #[must_use]
  pub const fn group(&self) -> Option<i64> {
    self.group
  }

  pub fn set_group(&mut self, group: Option<i64>) -> &mut Self {
    self.group = group;
    self
  }

  /// All incident edges, in both directions.
  #[must_use]
  pub fn edges(&self) -> &[EdgeId] {
    &self.edges
  }

  pub(super) fn without_edges(&self) -> Self {
    Self {
      balance: self.balance,
      group: self.group,
      edges: Vec::new(),
    }
  }
}
