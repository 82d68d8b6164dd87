//! Batch vs streaming equivalence and scan determinism.
//!
//! The streaming scanner must report exactly what a batch scan over the same
//! bars reports, at the same absolute indices, regardless of how the series
//! is chunked into pushes.

use proptest::prelude::*;
use sakata::prelude::*;

#[derive(Debug, Clone, Copy)]
struct TestBar {
  o: f64,
  h: f64,
  l: f64,
  c: f64,
}

impl TestBar {
  fn new(o: f64, h: f64, l: f64, c: f64) -> Self {
    Self { o, h, l, c }
  }
}

impl Ohlc for TestBar {
  fn open(&self) -> f64 {
    self.o
  }

  fn high(&self) -> f64 {
    self.h
  }

  fn low(&self) -> f64 {
    self.l
  }

  fn close(&self) -> f64 {
    self.c
  }
}

fn full_engine() -> PatternEngine {
  EngineBuilder::new().with_all_defaults().build().unwrap()
}

/// A mixed series: trend legs, gaps, dojis and indecision bars, enough to
/// trigger several different patterns.
fn mixed_series() -> Vec<TestBar> {
  let mut bars = Vec::new();
  // Quiet base
  for _ in 0..10 {
    bars.push(TestBar::new(100.0, 100.7, 99.3, 100.4));
  }
  // Downtrend leg
  let mut px = 100.0;
  for _ in 0..8 {
    bars.push(TestBar::new(px, px + 0.4, px - 2.2, px - 2.0));
    px -= 2.0;
  }
  // Reversal: hammer, gap up, engulfing
  bars.push(TestBar::new(px - 0.1, px + 0.1, px - 5.0, px + 0.1));
  bars.push(TestBar::new(px + 1.0, px + 3.0, px + 0.9, px + 2.8));
  bars.push(TestBar::new(px + 2.8, px + 6.0, px + 2.7, px + 5.8));
  // Uptrend leg
  let mut px = px + 5.8;
  for _ in 0..8 {
    bars.push(TestBar::new(px, px + 2.2, px - 0.4, px + 2.0));
    px += 2.0;
  }
  // Indecision cluster
  bars.push(TestBar::new(px, px + 0.5, px - 0.5, px));
  bars.push(TestBar::new(px, px + 0.4, px - 0.4, px + 0.1));
  bars.push(TestBar::new(px - 0.1, px + 0.3, px - 0.3, px));
  // Breakdown with a window
  bars.push(TestBar::new(px - 2.0, px - 1.8, px - 4.0, px - 3.8));
  bars.push(TestBar::new(px - 3.8, px - 3.6, px - 6.0, px - 5.8));
  bars
}

#[test]
fn test_scan_is_deterministic() {
  let engine = full_engine();
  let bars = mixed_series();
  let first = engine.scan(&bars).unwrap();
  let second = engine.scan(&bars).unwrap();
  assert_eq!(first, second);
}

#[test]
fn test_stream_matches_batch_on_mixed_series() {
  let engine = full_engine();
  let bars = mixed_series();
  let batch = engine.scan(&bars).unwrap();

  let mut scanner = engine.stream();
  let mut streamed = Vec::new();
  for bar in &bars {
    streamed.extend(scanner.push(bar));
  }

  assert_eq!(streamed, batch);
  assert_eq!(scanner.bars_seen(), bars.len());
}

#[test]
fn test_stream_reports_nothing_before_min_bars() {
  let engine = EngineBuilder::new()
    .add(BuiltinDetector::RisingThreeMethods(RisingThreeMethodsDetector::with_defaults()))
    .build()
    .unwrap();
  let mut scanner = engine.stream();
  let bars = mixed_series();
  for (i, bar) in bars.iter().take(4).enumerate() {
    let out = scanner.push(bar);
    assert!(out.is_empty(), "five-bar pattern reported at bar {i}");
  }
}

#[test]
fn test_stream_indices_are_absolute() {
  // A gap placed deep into the series, well past the internal window size
  let mut bars = vec![TestBar::new(100.0, 101.0, 99.0, 100.5); 40];
  bars.push(TestBar::new(102.0, 103.0, 101.5, 102.5));

  let engine = EngineBuilder::new()
    .add(BuiltinDetector::RisingWindow(RisingWindowDetector::with_defaults()))
    .build()
    .unwrap();
  let mut scanner = engine.stream();
  let mut streamed = Vec::new();
  for bar in &bars {
    streamed.extend(scanner.push(bar));
  }

  assert_eq!(streamed.len(), 1);
  assert_eq!(streamed[0].start_index, 39);
  assert_eq!(streamed[0].end_index, 40);
}

#[test]
fn test_iterator_agrees_with_scan() {
  let engine = full_engine();
  let bars = mixed_series();
  let flat = engine.scan(&bars).unwrap();

  let mut from_iter = Vec::new();
  for bar_patterns in engine.iter(&bars) {
    from_iter.extend(bar_patterns.patterns);
  }
  assert_eq!(from_iter, flat);
}

// ============================================================
// PROPERTY TESTS
// ============================================================

prop_compose! {
  /// A well-formed bar: high is the true maximum, low the true minimum.
  fn arb_bar()(
    open in 10.0f64..1000.0,
    close in 10.0f64..1000.0,
    top in 0.0f64..50.0,
    bottom in 0.0f64..50.0,
  ) -> TestBar {
    TestBar::new(open, open.max(close) + top, open.min(close) - bottom, close)
  }
}

proptest! {
  #[test]
  fn prop_scan_never_panics_and_is_deterministic(
    bars in prop::collection::vec(arb_bar(), 0..60)
  ) {
    let engine = full_engine();
    let first = engine.scan(&bars).unwrap();
    let second = engine.scan(&bars).unwrap();
    prop_assert_eq!(first, second);
  }

  #[test]
  fn prop_stream_equals_batch(bars in prop::collection::vec(arb_bar(), 0..60)) {
    let engine = full_engine();
    let batch = engine.scan(&bars).unwrap();

    let mut scanner = engine.stream();
    let mut streamed = Vec::new();
    for bar in &bars {
      streamed.extend(scanner.push(bar));
    }
    prop_assert_eq!(streamed, batch);
  }

  #[test]
  fn prop_match_indices_are_well_formed(
    bars in prop::collection::vec(arb_bar(), 1..60)
  ) {
    let engine = full_engine();
    for m in engine.scan(&bars).unwrap() {
      prop_assert!(m.start_index <= m.end_index);
      prop_assert!(m.end_index < bars.len());
    }
  }
}
