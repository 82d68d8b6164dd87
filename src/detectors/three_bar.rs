//! Three-bar candlestick pattern detectors.
//!
//! Patterns: Morning Star, Evening Star, Abandoned Baby (bull/bear),
//! Upside/Downside Tasuki Gap, Three White Soldiers, Three Black Crows,
//! Double Inside Bar.

use std::collections::HashMap;

use super::helpers::{inside_bar, lag};
use crate::measure::Measurements;
use crate::params::{get_percent, ParamMeta, ParameterizedDetector};
use crate::{Direction, PatternDetector, PatternId, PatternMatch, Percent, Result};

impl_with_defaults!(
  MorningStarDetector,
  EveningStarDetector,
  AbandonedBabyBullDetector,
  AbandonedBabyBearDetector,
  UpsideTasukiGapDetector,
  DownsideTasukiGapDetector,
  ThreeWhiteSoldiersDetector,
  ThreeBlackCrowsDetector,
  DoubleInsideBarDetector,
);

#[inline]
fn three_bar_match(id: PatternId, direction: Direction, index: usize) -> PatternMatch {
  PatternMatch {
    pattern_id: id,
    direction,
    start_index: index - 2,
    end_index: index,
  }
}

// ============================================================
// MORNING / EVENING STAR
// ============================================================

/// Morning Star: tall red candle, gapped-down short indecision candle, then a
/// tall green candle recovering past the first candle's body midpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct MorningStarDetector;

impl PatternDetector for MorningStarDetector {
  fn id(&self) -> PatternId {
    PatternId("MORNING_STAR")
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s2 = lag(snaps, index, 2)?;
    let s1 = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(s2.tall_body
      && s1.short_body
      && s.tall_body
      && s2.down
      && s1.gap_down_body
      && s.up
      && s.body_high >= s2.body_mid
      && s.body_high < s2.body_high
      && s.gap_up_body)
    {
      return None;
    }

    Some(three_bar_match(self.id(), Direction::Bullish, index))
  }
}

/// Evening Star: mirror of the Morning Star.
#[derive(Debug, Clone, Copy, Default)]
pub struct EveningStarDetector;

impl PatternDetector for EveningStarDetector {
  fn id(&self) -> PatternId {
    PatternId("EVENING_STAR")
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s2 = lag(snaps, index, 2)?;
    let s1 = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(s2.tall_body
      && s1.short_body
      && s.tall_body
      && s2.up
      && s1.gap_up_body
      && s.down
      && s.body_low <= s2.body_mid
      && s.body_low > s2.body_low
      && s.gap_down_body)
    {
      return None;
    }

    Some(three_bar_match(self.id(), Direction::Bearish, index))
  }
}

// ============================================================
// ABANDONED BABY
// ============================================================

/// Bullish Abandoned Baby: red candle, doji isolated by full-range gaps on
/// both sides, then a green candle.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbandonedBabyBullDetector;

impl PatternDetector for AbandonedBabyBullDetector {
  fn id(&self) -> PatternId {
    PatternId("ABANDONED_BABY_BULL")
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s2 = lag(snaps, index, 2)?;
    let s1 = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(s2.down && s1.doji_body && s1.gap_down && s.up && s.gap_up) {
      return None;
    }

    Some(three_bar_match(self.id(), Direction::Bullish, index))
  }
}

/// Bearish Abandoned Baby: mirror of the bullish variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbandonedBabyBearDetector;

impl PatternDetector for AbandonedBabyBearDetector {
  fn id(&self) -> PatternId {
    PatternId("ABANDONED_BABY_BEAR")
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s2 = lag(snaps, index, 2)?;
    let s1 = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(s2.up && s1.doji_body && s1.gap_up && s.down && s.gap_down) {
      return None;
    }

    Some(three_bar_match(self.id(), Direction::Bearish, index))
  }
}

// ============================================================
// TASUKI GAPS
// ============================================================

/// Upside Tasuki Gap: two green candles separated by a body gap, then a red
/// candle that opens inside the second body and closes into (but not beyond)
/// the gap.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpsideTasukiGapDetector;

impl PatternDetector for UpsideTasukiGapDetector {
  fn id(&self) -> PatternId {
    PatternId("UPSIDE_TASUKI_GAP")
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s2 = lag(snaps, index, 2)?;
    let s1 = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(s2.tall_body
      && s1.short_body
      && s2.up
      && s1.gap_up_body
      && s1.up
      && s.down
      && s.body_low >= s2.body_high
      && s.body_low <= s1.body_low)
    {
      return None;
    }

    Some(three_bar_match(self.id(), Direction::Bullish, index))
  }
}

/// Downside Tasuki Gap: mirror of the upside variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownsideTasukiGapDetector;

impl PatternDetector for DownsideTasukiGapDetector {
  fn id(&self) -> PatternId {
    PatternId("DOWNSIDE_TASUKI_GAP")
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s2 = lag(snaps, index, 2)?;
    let s1 = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(s2.tall_body
      && s1.short_body
      && s2.down
      && s1.gap_down_body
      && s1.down
      && s.up
      && s.body_high <= s2.body_low
      && s.body_high >= s1.body_high)
    {
      return None;
    }

    Some(three_bar_match(self.id(), Direction::Bearish, index))
  }
}

// ============================================================
// SOLDIERS / CROWS
// ============================================================

/// Three White Soldiers: three tall green candles, each opening within the
/// prior body, with monotonically rising closes and small top wicks.
#[derive(Debug, Clone, Copy)]
pub struct ThreeWhiteSoldiersDetector {
  /// Maximum top wick as a percent of range, on every bar. Default 5.
  pub wick_pct: f64,
}

impl Default for ThreeWhiteSoldiersDetector {
  fn default() -> Self {
    Self { wick_pct: 5.0 }
  }
}

impl PatternDetector for ThreeWhiteSoldiersDetector {
  fn id(&self) -> PatternId {
    PatternId("THREE_WHITE_SOLDIERS")
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s2 = lag(snaps, index, 2)?;
    let s1 = lag(snaps, index, 1)?;
    let s = &snaps[index];
    let small_wick = |m: &Measurements| m.range * self.wick_pct / 100.0 > m.top_wick;
    if !(s.tall_body
      && s1.tall_body
      && s2.tall_body
      && s.up
      && s1.up
      && s2.up
      && s.close > s1.close
      && s1.close > s2.close
      && s.open < s1.close
      && s.open > s1.open
      && s1.open < s2.close
      && s1.open > s2.open
      && small_wick(s)
      && small_wick(s1)
      && small_wick(s2))
    {
      return None;
    }

    Some(three_bar_match(self.id(), Direction::Bullish, index))
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.wick_pct)?;
    Ok(())
  }
}

/// Three Black Crows: mirror of the soldiers with falling closes and small
/// bottom wicks.
#[derive(Debug, Clone, Copy)]
pub struct ThreeBlackCrowsDetector {
  /// Maximum bottom wick as a percent of range, on every bar. Default 5.
  pub wick_pct: f64,
}

impl Default for ThreeBlackCrowsDetector {
  fn default() -> Self {
    Self { wick_pct: 5.0 }
  }
}

impl PatternDetector for ThreeBlackCrowsDetector {
  fn id(&self) -> PatternId {
    PatternId("THREE_BLACK_CROWS")
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let s2 = lag(snaps, index, 2)?;
    let s1 = lag(snaps, index, 1)?;
    let s = &snaps[index];
    let small_wick = |m: &Measurements| m.range * self.wick_pct / 100.0 > m.bottom_wick;
    if !(s.tall_body
      && s1.tall_body
      && s2.tall_body
      && s.down
      && s1.down
      && s2.down
      && s.close < s1.close
      && s1.close < s2.close
      && s.open > s1.close
      && s.open < s1.open
      && s1.open > s2.close
      && s1.open < s2.open
      && small_wick(s)
      && small_wick(s1)
      && small_wick(s2))
    {
      return None;
    }

    Some(three_bar_match(self.id(), Direction::Bearish, index))
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.wick_pct)?;
    Ok(())
  }
}

// ============================================================
// DOUBLE INSIDE BAR
// ============================================================

/// Double Inside Bar: two consecutive inside bars. Composed from the shared
/// inside-bar predicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleInsideBarDetector;

impl PatternDetector for DoubleInsideBarDetector {
  fn id(&self) -> PatternId {
    PatternId("DOUBLE_INSIDE_BAR")
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    if index < 2 || !(inside_bar(snaps, index) && inside_bar(snaps, index - 1)) {
      return None;
    }

    Some(three_bar_match(self.id(), Direction::Neutral, index))
  }
}

// ============================================================
// PARAMETER METADATA
// ============================================================

static SOLDIERS_CROWS_PARAMS: &[ParamMeta] = &[ParamMeta::percent(
  "wick_pct",
  5.0,
  (1.0, 20.0, 1.0),
  "Maximum trailing wick as a percent of range throughout the pattern",
)];

impl ParameterizedDetector for ThreeWhiteSoldiersDetector {
  fn param_meta() -> &'static [ParamMeta] {
    SOLDIERS_CROWS_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      wick_pct: get_percent(params, "wick_pct", 5.0)?.get(),
    })
  }

  fn pattern_id_str() -> &'static str {
    "THREE_WHITE_SOLDIERS"
  }
}

impl ParameterizedDetector for ThreeBlackCrowsDetector {
  fn param_meta() -> &'static [ParamMeta] {
    SOLDIERS_CROWS_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      wick_pct: get_percent(params, "wick_pct", 5.0)?.get(),
    })
  }

  fn pattern_id_str() -> &'static str {
    "THREE_BLACK_CROWS"
  }
}
