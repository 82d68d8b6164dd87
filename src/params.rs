//! Parameter metadata for pattern detectors
//!
//! This module provides metadata about detector parameters, enabling:
//! - Grid search over threshold settings
//! - Parameter documentation
//! - Automatic configuration UI generation
//!
//! # Example
//!
//! ```rust
//! use sakata::params::{ParamMeta, ParamKind, ParameterizedDetector};
//! use sakata::prelude::*;
//!
//! // Get parameter metadata for a detector
//! let params = BullishEngulfingDetector::param_meta();
//! for param in params {
//!   println!("{}: {:?} (default: {})", param.name, param.kind, param.default);
//! }
//! ```

use std::collections::HashMap;

use crate::{Factor, PatternError, Percent, Result};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Kind of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
  /// Percentage value (0.0..=100.0)
  Percent,
  /// Non-negative multiplier (e.g. wick symmetry ratio)
  Factor,
  /// Boolean toggle encoded as 0.0 / 1.0
  Flag,
}

/// Metadata for a single detector parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "size_pct")
  pub name: &'static str,
  /// Parameter kind (Percent, Factor or Flag)
  pub kind: ParamKind,
  /// Default value
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  /// Create a new ParamMeta for a Percent parameter
  pub const fn percent(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, kind: ParamKind::Percent, default, range, description }
  }

  /// Create a new ParamMeta for a Factor parameter
  pub const fn factor(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, kind: ParamKind::Factor, default, range, description }
  }

  /// Create a new ParamMeta for a Flag parameter
  pub const fn flag(name: &'static str, default: bool, description: &'static str) -> Self {
    Self {
      name,
      kind: ParamKind::Flag,
      default: if default { 1.0 } else { 0.0 },
      range: (0.0, 1.0, 1.0),
      description,
    }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    let mut v = min;
    while v <= max + f64::EPSILON {
      values.push(v);
      v += step;
    }
    values
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value < min || value > max {
      return Err(PatternError::OutOfRange { field: self.name, value, min, max });
    }
    match self.kind {
      ParamKind::Percent | ParamKind::Factor => Ok(()),
      ParamKind::Flag => {
        if value != 0.0 && value != 1.0 {
          return Err(PatternError::InvalidValue("Flag must be 0 or 1"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// PARAMETERIZED DETECTOR TRAIT
// ============================================================

/// Trait for detectors that support parameterization
///
/// Implementing this trait enables:
/// - Discovery of available parameters
/// - Creation of detectors with custom threshold values
/// - Grid search optimization
pub trait ParameterizedDetector: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates a detector with parameters from a HashMap
  ///
  /// Missing parameters use their default values.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;

  /// Returns the pattern ID string
  fn pattern_id_str() -> &'static str;
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Percent from params with default fallback
pub fn get_percent(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Percent> {
  let value = params.get(key).copied().unwrap_or(default);
  Percent::new(value)
}

/// Helper to get a Factor from params with default fallback
pub fn get_factor(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Factor> {
  let value = params.get(key).copied().unwrap_or(default);
  Factor::new(value)
}

/// Helper to get a boolean flag from params with default fallback
pub fn get_flag(params: &HashMap<&str, f64>, key: &str, default: bool) -> bool {
  params.get(key).map(|v| *v != 0.0).unwrap_or(default)
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_param_meta_percent() {
    let meta = ParamMeta::percent("test_pct", 5.0, (1.0, 20.0, 1.0), "Test percent parameter");

    assert_eq!(meta.name, "test_pct");
    assert_eq!(meta.kind, ParamKind::Percent);
    assert_eq!(meta.default, 5.0);
  }

  #[test]
  fn test_param_meta_factor() {
    let meta = ParamMeta::factor("test_factor", 2.0, (1.0, 5.0, 0.5), "Test factor parameter");

    assert_eq!(meta.name, "test_factor");
    assert_eq!(meta.kind, ParamKind::Factor);
    assert_eq!(meta.default, 2.0);
  }

  #[test]
  fn test_param_meta_flag() {
    let meta = ParamMeta::flag("test_flag", false, "Test flag parameter");

    assert_eq!(meta.kind, ParamKind::Flag);
    assert_eq!(meta.default, 0.0);
    assert_eq!(meta.range, (0.0, 1.0, 1.0));
  }

  #[test]
  fn test_generate_grid() {
    let meta = ParamMeta::percent("test", 5.0, (3.0, 7.0, 2.0), "Test");

    let grid = meta.generate_grid();
    assert_eq!(grid.len(), 3);
    assert!((grid[0] - 3.0).abs() < f64::EPSILON);
    assert!((grid[1] - 5.0).abs() < f64::EPSILON);
    assert!((grid[2] - 7.0).abs() < f64::EPSILON);
  }

  #[test]
  fn test_validate_percent() {
    let meta = ParamMeta::percent("test", 5.0, (3.0, 7.0, 1.0), "Test");

    assert!(meta.validate(5.0).is_ok());
    assert!(meta.validate(3.0).is_ok());
    assert!(meta.validate(7.0).is_ok());
    assert!(meta.validate(2.0).is_err());
    assert!(meta.validate(8.0).is_err());
  }

  #[test]
  fn test_validate_flag() {
    let meta = ParamMeta::flag("test", false, "Test");

    assert!(meta.validate(0.0).is_ok());
    assert!(meta.validate(1.0).is_ok());
    assert!(meta.validate(0.5).is_err());
  }

  #[test]
  fn test_get_percent_helper() {
    let mut params = HashMap::new();
    params.insert("key1", 8.0);

    assert!((get_percent(&params, "key1", 5.0).unwrap().get() - 8.0).abs() < f64::EPSILON);
    assert!((get_percent(&params, "key2", 5.0).unwrap().get() - 5.0).abs() < f64::EPSILON);
    assert!(get_percent(&params, "key2", 150.0).is_err());
  }

  #[test]
  fn test_get_factor_helper() {
    let mut params = HashMap::new();
    params.insert("key1", 3.0);

    assert!((get_factor(&params, "key1", 2.0).unwrap().get() - 3.0).abs() < f64::EPSILON);
    assert!((get_factor(&params, "key2", 2.0).unwrap().get() - 2.0).abs() < f64::EPSILON);
    assert!(get_factor(&params, "key1", -1.0).is_ok());
    assert!(get_factor(&params, "key2", -1.0).is_err());
  }

  #[test]
  fn test_get_flag_helper() {
    let mut params = HashMap::new();
    params.insert("key1", 1.0);

    assert!(get_flag(&params, "key1", false));
    assert!(!get_flag(&params, "key2", false));
    assert!(get_flag(&params, "key2", true));
  }
}
