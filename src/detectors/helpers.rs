//! Shared predicate primitives.
//!
//! A few patterns are compositions of others: Kicking wraps Marubozu,
//! Tri-Star wraps Doji and Double Inside Bar wraps Inside Bar. Those shared
//! predicates live here as free functions over [`Measurements`] so the
//! compound detectors never re-derive measurements or duplicate thresholds.

use crate::measure::Measurements;

/// Maximum wick size, as a percent of body, for a Marubozu candle.
pub const MARUBOZU_WICK_PERCENT: f64 = 5.0;

/// Tolerance factor applied to `body_avg` for "matching" price comparisons
/// (Tweezer lows/highs, On Neck closes).
pub const MATCH_TOLERANCE_FACTOR: f64 = 0.05;

/// Doji shape test: body within `size_pct` percent of the range and the two
/// wicks within `wick_ratio` of each other. A zero-range bar has an undefined
/// body percent and never qualifies.
#[inline]
pub fn doji_shape(s: &Measurements, size_pct: f64, wick_ratio: f64) -> bool {
  let symmetric =
    s.top_wick <= s.bottom_wick * wick_ratio && s.bottom_wick <= s.top_wick * wick_ratio;
  symmetric && s.body_percent.is_some_and(|p| p <= size_pct)
}

/// Marubozu test: a tall full-bodied candle in the given direction with both
/// wicks under [`MARUBOZU_WICK_PERCENT`] of the body. Zero-body bars resolve
/// false (the wick ratio is undefined).
#[inline]
pub fn marubozu(s: &Measurements, bullish: bool) -> bool {
  if s.body <= 0.0 {
    return false;
  }
  let direction_ok = if bullish { s.up } else { s.down };
  direction_ok
    && s.tall_body
    && s.top_wick / s.body * 100.0 < MARUBOZU_WICK_PERCENT
    && s.bottom_wick / s.body * 100.0 < MARUBOZU_WICK_PERCENT
}

/// Fetch the snapshot `k` bars back from `index`, if that much history exists.
#[inline]
pub fn lag(snaps: &[Measurements], index: usize, k: usize) -> Option<&Measurements> {
  index.checked_sub(k).and_then(|i| snaps.get(i))
}

/// Inside bar test at `index`: range strictly contained in the prior bar's.
#[inline]
pub fn inside_bar(snaps: &[Measurements], index: usize) -> bool {
  let Some(prev) = index.checked_sub(1).and_then(|i| snaps.get(i)) else {
    return false;
  };
  let s = &snaps[index];
  s.high < prev.high && s.low > prev.low
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::measure::compute_measurements;
  use crate::test_support::Bar;

  #[test]
  fn marubozu_rejects_zero_body() {
    let snaps = compute_measurements(&[Bar::new(10.0, 11.0, 9.0, 10.0)]);
    assert!(!marubozu(&snaps[0], true));
    assert!(!marubozu(&snaps[0], false));
  }

  #[test]
  fn doji_shape_rejects_zero_range() {
    let snaps = compute_measurements(&[Bar::new(10.0, 10.0, 10.0, 10.0)]);
    assert!(!doji_shape(&snaps[0], 5.0, 2.0));
  }

  #[test]
  fn inside_bar_needs_history() {
    let snaps = compute_measurements(&[Bar::new(10.0, 11.0, 9.0, 10.5)]);
    assert!(!inside_bar(&snaps, 0));
  }
}
