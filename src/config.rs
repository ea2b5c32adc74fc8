use serde::Deserialize;

use crate::error::Error;
use crate::error::Result;

// NOTE: Balances are plain floats, so "sums to zero" has to allow for rounding.
pub const BALANCE_TOLERANCE: f64 = 0.000_001;

/// Tunables shared by the min-cost-flow algorithms.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Largest absolute deviation still treated as zero when comparing balances
  /// and flow values.
  pub balance_tolerance: f64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      balance_tolerance: BALANCE_TOLERANCE,
    }
  }
}

impl Config {
  /// Parses a JSON object such as `{"balance_tolerance": 1e-9}`. Missing keys
  /// keep their defaults.
  pub fn from_json(json: &str) -> Result<Self> {
    let config: Self =
      serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if !self.balance_tolerance.is_finite() || self.balance_tolerance < 0.0 {
      return Err(Error::Config(format!(
        "balance_tolerance must be finite and non-negative ({:?})",
        self.balance_tolerance,
      )));
    }

    Ok(())
  }
}
