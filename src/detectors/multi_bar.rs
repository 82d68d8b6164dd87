//! Multi-bar candlestick pattern detectors (lookback deeper than two bars
//! behind the pattern body).
//!
//! Patterns: Tri-Star (bull/bear, dojis at lags 0, 2 and 3) and Rising /
//! Falling Three Methods (five bars).

use std::collections::HashMap;

use super::helpers::{doji_shape, lag};
use crate::measure::Measurements;
use crate::params::{get_factor, get_percent, ParamMeta, ParameterizedDetector};
use crate::{Direction, Factor, PatternDetector, PatternId, PatternMatch, Percent, Result};

impl_with_defaults!(
  TriStarBullDetector,
  TriStarBearDetector,
  RisingThreeMethodsDetector,
  FallingThreeMethodsDetector,
);

// ============================================================
// TRI-STAR
// ============================================================

/// Bullish Tri-Star: dojis at lags 0, 2 and 3, a body gap down into the
/// middle candle and a body gap up out of it. The doji test is the shared
/// Doji predicate with this detector's own thresholds.
#[derive(Debug, Clone, Copy)]
pub struct TriStarBullDetector {
  /// Doji body size as a percent of range. Default 5.
  pub doji_size_pct: f64,
  /// Doji wick symmetry ratio. Default 2.0.
  pub doji_wick_ratio: f64,
}

impl Default for TriStarBullDetector {
  fn default() -> Self {
    Self {
      doji_size_pct: 5.0,
      doji_wick_ratio: 2.0,
    }
  }
}

impl PatternDetector for TriStarBullDetector {
  fn id(&self) -> PatternId {
    PatternId("TRISTAR_BULL")
  }

  fn min_bars(&self) -> usize {
    4
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s3 = lag(snaps, index, 3)?;
    let s2 = lag(snaps, index, 2)?;
    let s1 = lag(snaps, index, 1)?;
    let s = &snaps[index];
    let is_doji = |m: &Measurements| doji_shape(m, self.doji_size_pct, self.doji_wick_ratio);
    if !(is_doji(s) && is_doji(s2) && is_doji(s3) && s1.gap_down_body && s.gap_up_body) {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bullish,
      start_index: index - 3,
      end_index: index,
    })
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.doji_size_pct)?;
    Factor::new(self.doji_wick_ratio)?;
    Ok(())
  }
}

/// Bearish Tri-Star: mirror gap structure of the bullish variant.
#[derive(Debug, Clone, Copy)]
pub struct TriStarBearDetector {
  /// Doji body size as a percent of range. Default 5.
  pub doji_size_pct: f64,
  /// Doji wick symmetry ratio. Default 2.0.
  pub doji_wick_ratio: f64,
}

impl Default for TriStarBearDetector {
  fn default() -> Self {
    Self {
      doji_size_pct: 5.0,
      doji_wick_ratio: 2.0,
    }
  }
}

impl PatternDetector for TriStarBearDetector {
  fn id(&self) -> PatternId {
    PatternId("TRISTAR_BEAR")
  }

  fn min_bars(&self) -> usize {
    4
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s3 = lag(snaps, index, 3)?;
    let s2 = lag(snaps, index, 2)?;
    let s1 = lag(snaps, index, 1)?;
    let s = &snaps[index];
    let is_doji = |m: &Measurements| doji_shape(m, self.doji_size_pct, self.doji_wick_ratio);
    if !(is_doji(s) && is_doji(s2) && is_doji(s3) && s.gap_down_body && s1.gap_up_body) {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bearish,
      start_index: index - 3,
      end_index: index,
    })
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.doji_size_pct)?;
    Factor::new(self.doji_wick_ratio)?;
    Ok(())
  }
}

// ============================================================
// THREE METHODS
// ============================================================

/// Rising Three Methods: a tall green candle, three short red candles whose
/// bodies hold inside the first candle's range, and a tall green candle
/// closing above the first close.
#[derive(Debug, Clone, Copy, Default)]
pub struct RisingThreeMethodsDetector;

impl PatternDetector for RisingThreeMethodsDetector {
  fn id(&self) -> PatternId {
    PatternId("RISING_THREE_METHODS")
  }

  fn min_bars(&self) -> usize {
    5
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let first = lag(snaps, index, 4)?;
    let s = &snaps[index];
    if !(first.tall_body && first.up && s.tall_body && s.up && s.close > first.close) {
      return None;
    }
    for k in 1..=3 {
      let m = lag(snaps, index, k)?;
      if !(m.short_body && m.down && m.open < first.high && m.close > first.low) {
        return None;
      }
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bullish,
      start_index: index - 4,
      end_index: index,
    })
  }
}

/// Falling Three Methods: mirror of the rising variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallingThreeMethodsDetector;

impl PatternDetector for FallingThreeMethodsDetector {
  fn id(&self) -> PatternId {
    PatternId("FALLING_THREE_METHODS")
  }

  fn min_bars(&self) -> usize {
    5
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let first = lag(snaps, index, 4)?;
    let s = &snaps[index];
    if !(first.tall_body && first.down && s.tall_body && s.down && s.close < first.close) {
      return None;
    }
    for k in 1..=3 {
      let m = lag(snaps, index, k)?;
      if !(m.short_body && m.up && m.open > first.low && m.close < first.high) {
        return None;
      }
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bearish,
      start_index: index - 4,
      end_index: index,
    })
  }
}

// ============================================================
// PARAMETER METADATA
// ============================================================

static TRISTAR_PARAMS: &[ParamMeta] = &[
  ParamMeta::percent(
    "doji_size_pct",
    5.0,
    (0.1, 20.0, 0.1),
    "Doji body size as a percent of candle range",
  ),
  ParamMeta::factor(
    "doji_wick_ratio",
    2.0,
    (1.0, 5.0, 0.5),
    "Doji wick symmetry ratio",
  ),
];

impl ParameterizedDetector for TriStarBullDetector {
  fn param_meta() -> &'static [ParamMeta] {
    TRISTAR_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      doji_size_pct: get_percent(params, "doji_size_pct", 5.0)?.get(),
      doji_wick_ratio: get_factor(params, "doji_wick_ratio", 2.0)?.get(),
    })
  }

  fn pattern_id_str() -> &'static str {
    "TRISTAR_BULL"
  }
}

impl ParameterizedDetector for TriStarBearDetector {
  fn param_meta() -> &'static [ParamMeta] {
    TRISTAR_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      doji_size_pct: get_percent(params, "doji_size_pct", 5.0)?.get(),
      doji_wick_ratio: get_factor(params, "doji_wick_ratio", 2.0)?.get(),
    })
  }

  fn pattern_id_str() -> &'static str {
    "TRISTAR_BEAR"
  }
}
