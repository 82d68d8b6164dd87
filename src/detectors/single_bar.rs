//! Single-bar candlestick pattern detectors.
//!
//! Patterns: Doji, Dragonfly Doji, Gravestone Doji, Hammer, Shooting Star,
//! Spinning Top (bull/bear/neutral), Marubozu (bull/bear), Long Lower Shadow,
//! Long Upper Shadow.
//!
//! Every predicate reads the current bar's [`Measurements`] snapshot only;
//! thresholds are percent-of-range or percent-of-body comparisons with the
//! defaults documented per detector.

use std::collections::HashMap;

use super::helpers::{doji_shape, marubozu};
use crate::measure::Measurements;
use crate::params::{get_factor, get_percent, ParamMeta, ParameterizedDetector};
use crate::{Direction, Factor, PatternDetector, PatternId, PatternMatch, Percent, Result};

impl_with_defaults!(
  DojiDetector,
  DragonflyDojiDetector,
  GravestoneDojiDetector,
  HammerDetector,
  ShootingStarDetector,
  SpinningTopBullDetector,
  SpinningTopBearDetector,
  SpinningTopDetector,
  MarubozuBullDetector,
  MarubozuBearDetector,
  LongLowerShadowDetector,
  LongUpperShadowDetector,
);

// ============================================================
// DOJI FAMILY
// ============================================================

/// Doji: negligible body with roughly symmetric wicks.
#[derive(Debug, Clone, Copy)]
pub struct DojiDetector {
  /// Maximum body size as a percent of candle range. Default 5.
  pub size_pct: f64,
  /// Maximum wick size relative to the opposite wick. Default 2.0.
  pub wick_ratio: f64,
}

impl Default for DojiDetector {
  fn default() -> Self {
    Self {
      size_pct: 5.0,
      wick_ratio: 2.0,
    }
  }
}

impl PatternDetector for DojiDetector {
  fn id(&self) -> PatternId {
    PatternId("DOJI")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if !doji_shape(s, self.size_pct, self.wick_ratio) {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Neutral,
      start_index: index,
      end_index: index,
    })
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.size_pct)?;
    Factor::new(self.wick_ratio)?;
    Ok(())
  }
}

/// Dragonfly Doji: a doji body with the top wick no larger than the body.
///
/// Shares its condition with the gravestone variant; the two differ only
/// in the direction they report.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragonflyDojiDetector;

impl PatternDetector for DragonflyDojiDetector {
  fn id(&self) -> PatternId {
    PatternId("DRAGONFLY_DOJI")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if !(s.doji_body && s.top_wick <= s.body) {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bullish,
      start_index: index,
      end_index: index,
    })
  }
}

/// Gravestone Doji. Shares the Dragonfly predicate, reported bearish.
#[derive(Debug, Clone, Copy, Default)]
pub struct GravestoneDojiDetector;

impl PatternDetector for GravestoneDojiDetector {
  fn id(&self) -> PatternId {
    PatternId("GRAVESTONE_DOJI")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if !(s.doji_body && s.top_wick <= s.body) {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bearish,
      start_index: index,
      end_index: index,
    })
  }
}

// ============================================================
// HAMMER / SHOOTING STAR
// ============================================================

/// Hammer: body confined to the top of the range with a negligible top wick.
#[derive(Debug, Clone, Copy)]
pub struct HammerDetector {
  /// Body-to-range confinement ratio in percent. Default 33.
  pub ratio_pct: f64,
  /// Maximum top wick as a percent of body. Default 5.
  pub shadow_pct: f64,
}

impl Default for HammerDetector {
  fn default() -> Self {
    Self {
      ratio_pct: 33.0,
      shadow_pct: 5.0,
    }
  }
}

impl PatternDetector for HammerDetector {
  fn id(&self) -> PatternId {
    PatternId("HAMMER")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if s.body <= 0.0 {
      return None;
    }
    // Body low must sit in the top `ratio_pct` percent of the range.
    let floor = (s.low - s.high) * (self.ratio_pct / 100.0) + s.high;
    let has_shadow = s.top_wick > self.shadow_pct / 100.0 * s.body;
    if s.body_low < floor || has_shadow {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bullish,
      start_index: index,
      end_index: index,
    })
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.ratio_pct)?;
    Percent::new(self.shadow_pct)?;
    Ok(())
  }
}

/// Shooting Star: mirror of the Hammer, body confined to the bottom of the
/// range with a negligible bottom wick.
#[derive(Debug, Clone, Copy)]
pub struct ShootingStarDetector {
  /// Body-to-range confinement ratio in percent. Default 33.
  pub ratio_pct: f64,
  /// Maximum bottom wick as a percent of body. Default 5.
  pub shadow_pct: f64,
}

impl Default for ShootingStarDetector {
  fn default() -> Self {
    Self {
      ratio_pct: 33.0,
      shadow_pct: 5.0,
    }
  }
}

impl PatternDetector for ShootingStarDetector {
  fn id(&self) -> PatternId {
    PatternId("SHOOTING_STAR")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if s.body <= 0.0 {
      return None;
    }
    let ceiling = (s.high - s.low) * (self.ratio_pct / 100.0) + s.low;
    let has_shadow = s.bottom_wick > self.shadow_pct / 100.0 * s.body;
    if s.body_high > ceiling || has_shadow {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bearish,
      start_index: index,
      end_index: index,
    })
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.ratio_pct)?;
    Percent::new(self.shadow_pct)?;
    Ok(())
  }
}

// ============================================================
// SPINNING TOPS
// ============================================================

#[inline]
fn spinning_shape(s: &Measurements, wick_pct: f64) -> bool {
  s.range > 0.0
    && s.bottom_wick >= s.range / 100.0 * wick_pct
    && s.top_wick >= s.range / 100.0 * wick_pct
    && !s.doji_body
}

/// Bullish Spinning Top: long symmetric wicks around a short green body.
#[derive(Debug, Clone, Copy)]
pub struct SpinningTopBullDetector {
  /// Minimum wick size as a percent of range. Default 34.
  pub wick_pct: f64,
}

impl Default for SpinningTopBullDetector {
  fn default() -> Self {
    Self { wick_pct: 34.0 }
  }
}

impl PatternDetector for SpinningTopBullDetector {
  fn id(&self) -> PatternId {
    PatternId("SPINNING_TOP_BULL")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if !(spinning_shape(s, self.wick_pct) && s.up) {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bullish,
      start_index: index,
      end_index: index,
    })
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.wick_pct)?;
    Ok(())
  }
}

/// Bearish Spinning Top.
#[derive(Debug, Clone, Copy)]
pub struct SpinningTopBearDetector {
  /// Minimum wick size as a percent of range. Default 34.
  pub wick_pct: f64,
}

impl Default for SpinningTopBearDetector {
  fn default() -> Self {
    Self { wick_pct: 34.0 }
  }
}

impl PatternDetector for SpinningTopBearDetector {
  fn id(&self) -> PatternId {
    PatternId("SPINNING_TOP_BEAR")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if !(spinning_shape(s, self.wick_pct) && s.down) {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bearish,
      start_index: index,
      end_index: index,
    })
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.wick_pct)?;
    Ok(())
  }
}

/// Spinning Top without a direction filter.
#[derive(Debug, Clone, Copy)]
pub struct SpinningTopDetector {
  /// Minimum wick size as a percent of range. Default 34.
  pub wick_pct: f64,
}

impl Default for SpinningTopDetector {
  fn default() -> Self {
    Self { wick_pct: 34.0 }
  }
}

impl PatternDetector for SpinningTopDetector {
  fn id(&self) -> PatternId {
    PatternId("SPINNING_TOP")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if !spinning_shape(s, self.wick_pct) {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Neutral,
      start_index: index,
      end_index: index,
    })
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.wick_pct)?;
    Ok(())
  }
}

// ============================================================
// MARUBOZU
// ============================================================

/// Bullish Marubozu: tall green body with both wicks under 5% of the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarubozuBullDetector;

impl PatternDetector for MarubozuBullDetector {
  fn id(&self) -> PatternId {
    PatternId("MARUBOZU_BULL")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if !marubozu(s, true) {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bullish,
      start_index: index,
      end_index: index,
    })
  }
}

/// Bearish Marubozu: tall red body with both wicks under 5% of the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarubozuBearDetector;

impl PatternDetector for MarubozuBearDetector {
  fn id(&self) -> PatternId {
    PatternId("MARUBOZU_BEAR")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if !marubozu(s, false) {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bearish,
      start_index: index,
      end_index: index,
    })
  }
}

// ============================================================
// LONG SHADOWS
// ============================================================

/// Long Lower Shadow: bottom wick exceeding `ratio_pct` percent of the range.
#[derive(Debug, Clone, Copy)]
pub struct LongLowerShadowDetector {
  /// Minimum lower wick as a percent of range. Default 75.
  pub ratio_pct: f64,
}

impl Default for LongLowerShadowDetector {
  fn default() -> Self {
    Self { ratio_pct: 75.0 }
  }
}

impl PatternDetector for LongLowerShadowDetector {
  fn id(&self) -> PatternId {
    PatternId("LONG_LOWER_SHADOW")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if s.bottom_wick <= s.range / 100.0 * self.ratio_pct {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bullish,
      start_index: index,
      end_index: index,
    })
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.ratio_pct)?;
    Ok(())
  }
}

/// Long Upper Shadow: top wick exceeding `ratio_pct` percent of the range.
#[derive(Debug, Clone, Copy)]
pub struct LongUpperShadowDetector {
  /// Minimum upper wick as a percent of range. Default 75.
  pub ratio_pct: f64,
}

impl Default for LongUpperShadowDetector {
  fn default() -> Self {
    Self { ratio_pct: 75.0 }
  }
}

impl PatternDetector for LongUpperShadowDetector {
  fn id(&self) -> PatternId {
    PatternId("LONG_UPPER_SHADOW")
  }

  fn min_bars(&self) -> usize {
    1
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s = snaps.get(index)?;
    if s.top_wick <= s.range / 100.0 * self.ratio_pct {
      return None;
    }

    Some(PatternMatch {
      pattern_id: self.id(),
      direction: Direction::Bearish,
      start_index: index,
      end_index: index,
    })
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.ratio_pct)?;
    Ok(())
  }
}

// ============================================================
// PARAMETER METADATA
// ============================================================

static DOJI_PARAMS: &[ParamMeta] = &[
  ParamMeta::percent(
    "size_pct",
    5.0,
    (0.1, 20.0, 0.1),
    "Maximum body size as a percent of candle range",
  ),
  ParamMeta::factor(
    "wick_ratio",
    2.0,
    (1.0, 5.0, 0.5),
    "Maximum wick size relative to the opposite wick",
  ),
];

impl ParameterizedDetector for DojiDetector {
  fn param_meta() -> &'static [ParamMeta] {
    DOJI_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      size_pct: get_percent(params, "size_pct", 5.0)?.get(),
      wick_ratio: get_factor(params, "wick_ratio", 2.0)?.get(),
    })
  }

  fn pattern_id_str() -> &'static str {
    "DOJI"
  }
}

static HAMMER_PARAMS: &[ParamMeta] = &[
  ParamMeta::percent(
    "ratio_pct",
    33.0,
    (10.0, 50.0, 1.0),
    "Body confinement as a percent of candle range",
  ),
  ParamMeta::percent(
    "shadow_pct",
    5.0,
    (0.1, 20.0, 0.1),
    "Maximum opposing wick as a percent of body",
  ),
];

impl ParameterizedDetector for HammerDetector {
  fn param_meta() -> &'static [ParamMeta] {
    HAMMER_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      ratio_pct: get_percent(params, "ratio_pct", 33.0)?.get(),
      shadow_pct: get_percent(params, "shadow_pct", 5.0)?.get(),
    })
  }

  fn pattern_id_str() -> &'static str {
    "HAMMER"
  }
}

impl ParameterizedDetector for ShootingStarDetector {
  fn param_meta() -> &'static [ParamMeta] {
    HAMMER_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      ratio_pct: get_percent(params, "ratio_pct", 33.0)?.get(),
      shadow_pct: get_percent(params, "shadow_pct", 5.0)?.get(),
    })
  }

  fn pattern_id_str() -> &'static str {
    "SHOOTING_STAR"
  }
}

static SPINNING_TOP_PARAMS: &[ParamMeta] = &[ParamMeta::percent(
  "wick_pct",
  34.0,
  (1.0, 50.0, 1.0),
  "Minimum size of each wick as a percent of candle range",
)];

impl ParameterizedDetector for SpinningTopDetector {
  fn param_meta() -> &'static [ParamMeta] {
    SPINNING_TOP_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      wick_pct: get_percent(params, "wick_pct", 34.0)?.get(),
    })
  }

  fn pattern_id_str() -> &'static str {
    "SPINNING_TOP"
  }
}

static LONG_SHADOW_PARAMS: &[ParamMeta] = &[ParamMeta::percent(
  "ratio_pct",
  75.0,
  (50.0, 100.0, 1.0),
  "Minimum wick size as a percent of candle range",
)];

impl ParameterizedDetector for LongLowerShadowDetector {
  fn param_meta() -> &'static [ParamMeta] {
    LONG_SHADOW_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      ratio_pct: get_percent(params, "ratio_pct", 75.0)?.get(),
    })
  }

  fn pattern_id_str() -> &'static str {
    "LONG_LOWER_SHADOW"
  }
}

impl ParameterizedDetector for LongUpperShadowDetector {
  fn param_meta() -> &'static [ParamMeta] {
    LONG_SHADOW_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      ratio_pct: get_percent(params, "ratio_pct", 75.0)?.get(),
    })
  }

  fn pattern_id_str() -> &'static str {
    "LONG_UPPER_SHADOW"
  }
}
