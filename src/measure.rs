//! Measurement layer: per-bar derived quantities consumed by every detector.
//!
//! For each bar the library derives wick sizes, body extremes, gap flags and a
//! smoothed body average, then freezes them into a [`Measurements`] snapshot.
//! Detectors only ever read snapshots, so batch and streaming evaluation share
//! one code path: [`compute_measurements`] folds the same [`MeasureState`] the
//! incremental [`crate::StreamScanner`] drives bar by bar.

use crate::{Ohlc, OhlcExt};

/// EMA period for the body-size average.
pub const BODY_AVG_PERIOD: usize = 14;

/// Body-percent threshold (of candle range) below which a bar counts as a
/// doji at the measurement level.
pub const DOJI_BODY_PERCENT: f64 = 5.0;

/// Shadow threshold: a wick counts as a shadow when it exceeds 5% of the body.
pub const SHADOW_PERCENT: f64 = 5.0;

// ============================================================
// EMA ACCUMULATOR
// ============================================================

/// Exponential moving average accumulator.
///
/// Seeded with the first sample (value = sample), then
/// `value += alpha * (sample - value)` with `alpha = 2 / (period + 1)`.
/// Small, explicit and copyable so every series carries its own smoothing
/// state; there is no shared accumulator across series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmaState {
  pub value: f64,
  pub initialized: bool,
}

impl EmaState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Feed one sample and return the updated average.
  pub fn update(&mut self, sample: f64, period: usize) -> f64 {
    if self.initialized {
      let alpha = 2.0 / (period as f64 + 1.0);
      self.value += alpha * (sample - self.value);
    } else {
      self.value = sample;
      self.initialized = true;
    }
    self.value
  }
}

// ============================================================
// MEASUREMENT SNAPSHOT
// ============================================================

/// Derived measurements for a single bar.
///
/// Carries the raw OHLC alongside the derived values so a detector never has
/// to reach back into the bar series. Wick sizes use absolute differences, so
/// malformed bars (high inside the body) still yield non-negative wicks.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Measurements {
  pub open: f64,
  pub high: f64,
  pub low: f64,
  pub close: f64,

  /// `|max(close, open) - high|`
  pub top_wick: f64,
  /// `|min(close, open) - low|`
  pub bottom_wick: f64,
  /// `|close - open|`
  pub body: f64,
  /// `max(close, open)`
  pub body_high: f64,
  /// `min(close, open)`
  pub body_low: f64,
  /// `|high - low|`
  pub range: f64,
  /// EMA-14 of body size, including this bar.
  pub body_avg: f64,
  /// `body > body_avg`
  pub tall_body: bool,
  /// `body < body_avg`
  pub short_body: bool,
  /// `body / range * 100`; `None` when range is zero.
  pub body_percent: Option<f64>,
  /// Top wick exceeds 5% of the body.
  pub top_shadow: bool,
  /// Bottom wick exceeds 5% of the body.
  pub bottom_shadow: bool,
  /// Midpoint of the body: `body / 2 + body_low`.
  pub body_mid: f64,
  /// Previous bar's body high sits below this bar's body low.
  pub gap_up_body: bool,
  /// This bar's body high sits below the previous bar's body low.
  pub gap_down_body: bool,
  /// Full-range gap up: `low > high[1]`.
  pub gap_up: bool,
  /// Full-range gap down: `low[1] > high`.
  pub gap_down: bool,
  /// `body_percent <= 5`; false when body_percent is undefined.
  pub doji_body: bool,
  /// `close > open`
  pub up: bool,
  /// `close < open`
  pub down: bool,
}

// ============================================================
// INCREMENTAL BUILDER
// ============================================================

/// Carry-over from the previous bar, needed for gap flags.
#[derive(Debug, Clone, Copy)]
struct PrevBar {
  high: f64,
  low: f64,
  body_high: f64,
  body_low: f64,
}

/// Incremental measurement builder: one per series.
///
/// Holds exactly the state the snapshot formulas need across bars (the EMA
/// accumulator and the previous bar's extremes), so streaming evaluation
/// needs no unbounded history.
#[derive(Debug, Clone, Default)]
pub struct MeasureState {
  ema: EmaState,
  prev: Option<PrevBar>,
}

impl MeasureState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Consume the next bar and produce its snapshot.
  pub fn next<B: Ohlc>(&mut self, bar: &B) -> Measurements {
    let open = bar.open();
    let high = bar.high();
    let low = bar.low();
    let close = bar.close();

    let top_wick = (close.max(open) - high).abs();
    let bottom_wick = (close.min(open) - low).abs();
    let body = (close - open).abs();
    let body_high = close.max(open);
    let body_low = close.min(open);
    let range = (high - low).abs();
    let body_avg = self.ema.update(body, BODY_AVG_PERIOD);

    let body_percent = if range > 0.0 {
      Some(body / range * 100.0)
    } else {
      None
    };

    let (gap_up_body, gap_down_body, gap_up, gap_down) = match self.prev {
      Some(p) => (
        p.body_high < body_low,
        body_high < p.body_low,
        low > p.high,
        p.low > high,
      ),
      None => (false, false, false, false),
    };

    self.prev = Some(PrevBar {
      high,
      low,
      body_high,
      body_low,
    });

    Measurements {
      open,
      high,
      low,
      close,
      top_wick,
      bottom_wick,
      body,
      body_high,
      body_low,
      range,
      body_avg,
      tall_body: body > body_avg,
      short_body: body < body_avg,
      body_percent,
      top_shadow: top_wick > SHADOW_PERCENT / 100.0 * body,
      bottom_shadow: bottom_wick > SHADOW_PERCENT / 100.0 * body,
      body_mid: body / 2.0 + body_low,
      gap_up_body,
      gap_down_body,
      gap_up,
      gap_down,
      doji_body: body_percent.is_some_and(|p| p <= DOJI_BODY_PERCENT),
      up: close > open,
      down: close < open,
    }
  }
}

/// Compute measurement snapshots for an entire bar series.
pub fn compute_measurements<B: Ohlc>(bars: &[B]) -> Vec<Measurements> {
  let mut state = MeasureState::new();
  bars.iter().map(|bar| state.next(bar)).collect()
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Clone, Copy)]
  struct Bar(f64, f64, f64, f64);

  impl Ohlc for Bar {
    fn open(&self) -> f64 {
      self.0
    }

    fn high(&self) -> f64 {
      self.1
    }

    fn low(&self) -> f64 {
      self.2
    }

    fn close(&self) -> f64 {
      self.3
    }
  }

  #[test]
  fn ema_seeds_with_first_sample() {
    let mut ema = EmaState::new();
    assert_eq!(ema.update(10.0, BODY_AVG_PERIOD), 10.0);
    let second = ema.update(25.0, BODY_AVG_PERIOD);
    let expected = 10.0 + 2.0 / 15.0 * 15.0;
    assert!((second - expected).abs() < 1e-12);
  }

  #[test]
  fn basic_snapshot_values() {
    let snaps = compute_measurements(&[Bar(100.0, 110.0, 90.0, 105.0)]);
    let s = &snaps[0];
    assert_eq!(s.body, 5.0);
    assert_eq!(s.top_wick, 5.0);
    assert_eq!(s.bottom_wick, 10.0);
    assert_eq!(s.body_high, 105.0);
    assert_eq!(s.body_low, 100.0);
    assert_eq!(s.range, 20.0);
    assert_eq!(s.body_mid, 102.5);
    assert_eq!(s.body_percent, Some(25.0));
    assert!(s.up && !s.down && !s.doji_body);
    // First bar seeds the EMA, so it can never be tall.
    assert!(!s.tall_body);
  }

  #[test]
  fn zero_range_bar_has_undefined_body_percent() {
    let snaps = compute_measurements(&[Bar(50.0, 50.0, 50.0, 50.0)]);
    assert_eq!(snaps[0].body_percent, None);
    assert!(!snaps[0].doji_body);
  }

  #[test]
  fn malformed_bar_wicks_stay_non_negative() {
    // High below the body top, low above the body bottom.
    let snaps = compute_measurements(&[Bar(100.0, 104.0, 101.0, 105.0)]);
    assert!(snaps[0].top_wick >= 0.0);
    assert!(snaps[0].bottom_wick >= 0.0);
  }

  #[test]
  fn gap_flags_reference_previous_bar() {
    let snaps = compute_measurements(&[
      Bar(10.0, 11.0, 9.0, 10.5),
      Bar(12.0, 13.0, 11.5, 12.5), // low 11.5 > prev high 11.0
    ]);
    assert!(!snaps[0].gap_up && !snaps[0].gap_down);
    assert!(snaps[1].gap_up);
    assert!(snaps[1].gap_up_body);
    assert!(!snaps[1].gap_down);
  }

  #[test]
  fn batch_matches_incremental() {
    let bars = [
      Bar(10.0, 11.0, 9.0, 10.5),
      Bar(10.5, 12.0, 10.0, 11.5),
      Bar(11.5, 11.6, 10.2, 10.3),
    ];
    let batch = compute_measurements(&bars);
    let mut state = MeasureState::new();
    for (bar, expected) in bars.iter().zip(&batch) {
      assert_eq!(state.next(bar), *expected);
    }
  }
}
