//! Two-bar candlestick pattern detectors.
//!
//! Patterns: Bullish/Bearish Engulfing, Tweezer Bottom/Top, Harami
//! (bull/bear), Harami Cross (bull/bear), Piercing, Dark Cloud Cover,
//! On Neck (bull/bear), Kicking (bull/bear), Rising/Falling Window,
//! Inside Bar.
//!
//! All predicates resolve on the second bar of the pair; with fewer than two
//! bars of history they resolve false, never error.

use std::collections::HashMap;

use super::helpers::{self, lag, marubozu, MATCH_TOLERANCE_FACTOR};
use crate::measure::Measurements;
use crate::params::{get_flag, get_percent, ParamMeta, ParameterizedDetector};
use crate::{Direction, PatternDetector, PatternId, PatternMatch, Percent, Result};

impl_with_defaults!(
  BullishEngulfingDetector,
  BearishEngulfingDetector,
  TweezerBottomDetector,
  TweezerTopDetector,
  HaramiBullDetector,
  HaramiBearDetector,
  HaramiCrossBullDetector,
  HaramiCrossBearDetector,
  PiercingDetector,
  DarkCloudCoverDetector,
  OnNeckBullDetector,
  OnNeckBearDetector,
  KickingBullDetector,
  KickingBearDetector,
  RisingWindowDetector,
  FallingWindowDetector,
  InsideBarDetector,
);

#[inline]
fn two_bar_match(id: PatternId, direction: Direction, index: usize) -> PatternMatch {
  PatternMatch {
    pattern_id: id,
    direction,
    start_index: index - 1,
    end_index: index,
  }
}

// ============================================================
// ENGULFING
// ============================================================

/// Bullish Engulfing: a green body that swallows the prior red body.
///
/// Boundary comparisons are inclusive: a close exactly at the prior open and
/// an open exactly at the prior close both qualify.
#[derive(Debug, Clone, Copy)]
pub struct BullishEngulfingDetector {
  /// Maximum top wick as a percent of body on the resolving candle.
  /// 0 disables the filter. Default 0.
  pub max_reject_wick_pct: f64,
  /// Require the close to clear the prior high as well. Default false.
  pub must_engulf_wick: bool,
}

impl Default for BullishEngulfingDetector {
  fn default() -> Self {
    Self {
      max_reject_wick_pct: 0.0,
      must_engulf_wick: false,
    }
  }
}

impl PatternDetector for BullishEngulfingDetector {
  fn id(&self) -> PatternId {
    PatternId("BULLISH_ENGULFING")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if s.body <= 0.0 {
      return None;
    }
    let rejection_ok = self.max_reject_wick_pct == 0.0
      || s.top_wick / s.body < self.max_reject_wick_pct / 100.0;
    let engulfed = p.close <= p.open && s.close >= p.open && s.open <= p.close;
    if !(engulfed && rejection_ok && (!self.must_engulf_wick || s.close >= p.high)) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bullish, index))
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.max_reject_wick_pct)?;
    Ok(())
  }
}

/// Bearish Engulfing: a red body that swallows the prior green body.
#[derive(Debug, Clone, Copy)]
pub struct BearishEngulfingDetector {
  /// Maximum bottom wick as a percent of body on the resolving candle.
  /// 0 disables the filter. Default 0.
  pub max_reject_wick_pct: f64,
  /// Require the close to clear the prior low as well. Default false.
  pub must_engulf_wick: bool,
}

impl Default for BearishEngulfingDetector {
  fn default() -> Self {
    Self {
      max_reject_wick_pct: 0.0,
      must_engulf_wick: false,
    }
  }
}

impl PatternDetector for BearishEngulfingDetector {
  fn id(&self) -> PatternId {
    PatternId("BEARISH_ENGULFING")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if s.body <= 0.0 {
      return None;
    }
    let rejection_ok = self.max_reject_wick_pct == 0.0
      || s.bottom_wick / s.body < self.max_reject_wick_pct / 100.0;
    let engulfed = p.close >= p.open && s.close <= p.open && s.open >= p.close;
    if !(engulfed && rejection_ok && (!self.must_engulf_wick || s.close <= p.low)) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bearish, index))
  }

  fn validate_config(&self) -> Result<()> {
    Percent::new(self.max_reject_wick_pct)?;
    Ok(())
  }
}

// ============================================================
// TWEEZERS
// ============================================================

/// Tweezer Bottom: down candle then up candle with near-identical lows
/// (within 5% of the body average) after a tall prior body.
#[derive(Debug, Clone, Copy, Default)]
pub struct TweezerBottomDetector {
  /// Require the close above the prior bar's range midpoint. Default false.
  pub close_upper_half: bool,
}

impl PatternDetector for TweezerBottomDetector {
  fn id(&self) -> PatternId {
    PatternId("TWEEZER_BOTTOM")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    let not_bare_doji = !s.doji_body || (s.top_shadow && s.bottom_shadow);
    let lows_match = (s.low - p.low).abs() <= s.body_avg * MATCH_TOLERANCE_FACTOR;
    let half_ok = !self.close_upper_half || s.close > (p.high + p.low) / 2.0;
    if !(not_bare_doji && lows_match && p.down && s.up && p.tall_body && half_ok) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bullish, index))
  }
}

/// Tweezer Top: up candle then down candle with near-identical highs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TweezerTopDetector {
  /// Require the close below the prior bar's range midpoint. Default false.
  pub close_lower_half: bool,
}

impl PatternDetector for TweezerTopDetector {
  fn id(&self) -> PatternId {
    PatternId("TWEEZER_TOP")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    let not_bare_doji = !s.doji_body || (s.top_shadow && s.bottom_shadow);
    let highs_match = (s.high - p.high).abs() <= s.body_avg * MATCH_TOLERANCE_FACTOR;
    let half_ok = !self.close_lower_half || s.close < (p.high + p.low) / 2.0;
    if !(not_bare_doji && highs_match && p.up && s.down && p.tall_body && half_ok) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bearish, index))
  }
}

// ============================================================
// HARAMI
// ============================================================

/// Current bar's full range contained inside the prior bar's body.
#[inline]
fn harami_contained(s: &Measurements, p: &Measurements) -> bool {
  s.high <= p.body_high && s.low >= p.body_low
}

/// Bullish Harami: short green candle inside a tall red body.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaramiBullDetector;

impl PatternDetector for HaramiBullDetector {
  fn id(&self) -> PatternId {
    PatternId("HARAMI_BULL")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(p.tall_body && p.down && s.up && s.short_body && harami_contained(s, p)) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bullish, index))
  }
}

/// Bearish Harami: short red candle inside a tall green body.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaramiBearDetector;

impl PatternDetector for HaramiBearDetector {
  fn id(&self) -> PatternId {
    PatternId("HARAMI_BEAR")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(p.tall_body && p.up && s.down && s.short_body && harami_contained(s, p)) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bearish, index))
  }
}

/// Bullish Harami Cross: doji inside a tall red body.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaramiCrossBullDetector;

impl PatternDetector for HaramiCrossBullDetector {
  fn id(&self) -> PatternId {
    PatternId("HARAMI_CROSS_BULL")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(p.tall_body && p.down && s.doji_body && harami_contained(s, p)) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bullish, index))
  }
}

/// Bearish Harami Cross: doji inside a tall green body.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaramiCrossBearDetector;

impl PatternDetector for HaramiCrossBearDetector {
  fn id(&self) -> PatternId {
    PatternId("HARAMI_CROSS_BEAR")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(p.tall_body && p.up && s.doji_body && harami_contained(s, p)) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bearish, index))
  }
}

// ============================================================
// PIERCING / DARK CLOUD COVER
// ============================================================

/// Piercing: opens at or below the prior low, closes above the prior body
/// midpoint but below the prior open.
#[derive(Debug, Clone, Copy, Default)]
pub struct PiercingDetector;

impl PatternDetector for PiercingDetector {
  fn id(&self) -> PatternId {
    PatternId("PIERCING")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(p.down
      && p.tall_body
      && s.up
      && s.open <= p.low
      && s.close > p.body_mid
      && s.close < p.open)
    {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bullish, index))
  }
}

/// Dark Cloud Cover: opens at or above the prior high, closes below the prior
/// body midpoint but above the prior open.
#[derive(Debug, Clone, Copy, Default)]
pub struct DarkCloudCoverDetector;

impl PatternDetector for DarkCloudCoverDetector {
  fn id(&self) -> PatternId {
    PatternId("DARK_CLOUD_COVER")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(p.up
      && p.tall_body
      && s.down
      && s.open >= p.high
      && s.close < p.body_mid
      && s.close > p.open)
    {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bearish, index))
  }
}

// ============================================================
// ON NECK
// ============================================================

/// Bullish On Neck: tall green candle then a short red candle closing within
/// 5% of the body average of the prior high. Continuation signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnNeckBullDetector;

impl PatternDetector for OnNeckBullDetector {
  fn id(&self) -> PatternId {
    PatternId("ON_NECK_BULL")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(p.up
      && p.tall_body
      && s.down
      && s.open > p.close
      && s.short_body
      && s.range > 0.0
      && (s.close - p.high).abs() <= s.body_avg * MATCH_TOLERANCE_FACTOR)
    {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bullish, index))
  }
}

/// Bearish On Neck: tall red candle then a short green candle closing within
/// 5% of the body average of the prior low.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnNeckBearDetector;

impl PatternDetector for OnNeckBearDetector {
  fn id(&self) -> PatternId {
    PatternId("ON_NECK_BEAR")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(p.down
      && p.tall_body
      && s.up
      && s.open < p.close
      && s.short_body
      && s.range > 0.0
      && (s.close - p.low).abs() <= s.body_avg * MATCH_TOLERANCE_FACTOR)
    {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bearish, index))
  }
}

// ============================================================
// KICKING
// ============================================================

/// Bullish Kicking: bearish Marubozu followed by a bullish Marubozu that gaps
/// above the prior candle's full range. Composed from the shared Marubozu
/// predicate instead of re-deriving wick thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct KickingBullDetector;

impl PatternDetector for KickingBullDetector {
  fn id(&self) -> PatternId {
    PatternId("KICKING_BULL")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(marubozu(p, false) && marubozu(s, true) && s.gap_up) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bullish, index))
  }
}

/// Bearish Kicking: bullish Marubozu followed by a bearish Marubozu that gaps
/// below the prior candle's full range.
#[derive(Debug, Clone, Copy, Default)]
pub struct KickingBearDetector;

impl PatternDetector for KickingBearDetector {
  fn id(&self) -> PatternId {
    PatternId("KICKING_BEAR")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(marubozu(p, true) && marubozu(s, false) && s.gap_down) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bearish, index))
  }
}

// ============================================================
// WINDOWS
// ============================================================

/// Rising Window: a full-range gap up between two non-degenerate candles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RisingWindowDetector;

impl PatternDetector for RisingWindowDetector {
  fn id(&self) -> PatternId {
    PatternId("RISING_WINDOW")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(s.range > 0.0 && p.range > 0.0 && s.gap_up) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bullish, index))
  }
}

/// Falling Window: a full-range gap down between two non-degenerate candles.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallingWindowDetector;

impl PatternDetector for FallingWindowDetector {
  fn id(&self) -> PatternId {
    PatternId("FALLING_WINDOW")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    let p = lag(snaps, index, 1)?;
    let s = &snaps[index];
    if !(s.range > 0.0 && p.range > 0.0 && s.gap_down) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Bearish, index))
  }
}

// ============================================================
// INSIDE BAR
// ============================================================

/// Inside Bar: full range strictly contained in the prior bar's range.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsideBarDetector;

impl PatternDetector for InsideBarDetector {
  fn id(&self) -> PatternId {
    PatternId("INSIDE_BAR")
  }

  fn min_bars(&self) -> usize {
    2
  }

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
    if index < 1 || !helpers::inside_bar(snaps, index) {
      return None;
    }

    Some(two_bar_match(self.id(), Direction::Neutral, index))
  }
}

// ============================================================
// PARAMETER METADATA
// ============================================================

static ENGULFING_PARAMS: &[ParamMeta] = &[
  ParamMeta::percent(
    "max_reject_wick_pct",
    0.0,
    (0.0, 100.0, 5.0),
    "Maximum rejection wick as a percent of body; 0 disables the filter",
  ),
  ParamMeta::flag(
    "must_engulf_wick",
    false,
    "Require the close to clear the prior candle's full range",
  ),
];

impl ParameterizedDetector for BullishEngulfingDetector {
  fn param_meta() -> &'static [ParamMeta] {
    ENGULFING_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      max_reject_wick_pct: get_percent(params, "max_reject_wick_pct", 0.0)?.get(),
      must_engulf_wick: get_flag(params, "must_engulf_wick", false),
    })
  }

  fn pattern_id_str() -> &'static str {
    "BULLISH_ENGULFING"
  }
}

impl ParameterizedDetector for BearishEngulfingDetector {
  fn param_meta() -> &'static [ParamMeta] {
    ENGULFING_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      max_reject_wick_pct: get_percent(params, "max_reject_wick_pct", 0.0)?.get(),
      must_engulf_wick: get_flag(params, "must_engulf_wick", false),
    })
  }

  fn pattern_id_str() -> &'static str {
    "BEARISH_ENGULFING"
  }
}

static TWEEZER_BOTTOM_PARAMS: &[ParamMeta] = &[ParamMeta::flag(
  "close_upper_half",
  false,
  "Require the close above the prior bar's range midpoint",
)];

impl ParameterizedDetector for TweezerBottomDetector {
  fn param_meta() -> &'static [ParamMeta] {
    TWEEZER_BOTTOM_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      close_upper_half: get_flag(params, "close_upper_half", false),
    })
  }

  fn pattern_id_str() -> &'static str {
    "TWEEZER_BOTTOM"
  }
}

static TWEEZER_TOP_PARAMS: &[ParamMeta] = &[ParamMeta::flag(
  "close_lower_half",
  false,
  "Require the close below the prior bar's range midpoint",
)];

impl ParameterizedDetector for TweezerTopDetector {
  fn param_meta() -> &'static [ParamMeta] {
    TWEEZER_TOP_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      close_lower_half: get_flag(params, "close_lower_half", false),
    })
  }

  fn pattern_id_str() -> &'static str {
    "TWEEZER_TOP"
  }
}
