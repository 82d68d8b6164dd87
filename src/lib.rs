//! # Sakata - Japanese candlestick pattern recognition
//!
//! Detects classic candlestick patterns (Doji, Engulfing, Morning Star,
//! Three White Soldiers, ...) over OHLC series, in batch or streaming mode.
//! All detectors share a per-bar measurement layer so a bar is measured once
//! no matter how many patterns are evaluated against it.
//!
//! ## Quick Start
//!
//! ```rust
//! use sakata::prelude::*;
//!
//! // Define your OHLC data
//! struct Bar { o: f64, h: f64, l: f64, c: f64 }
//!
//! impl Ohlc for Bar {
//!   fn open(&self) -> f64 { self.o }
//!   fn high(&self) -> f64 { self.h }
//!   fn low(&self) -> f64 { self.l }
//!   fn close(&self) -> f64 { self.c }
//! }
//!
//! // Create engine with default detectors
//! let engine = EngineBuilder::new()
//!   .with_all_defaults()
//!   .build()
//!   .unwrap();
//!
//! // Scan your data
//! let bars: Vec<Bar> = vec![];
//! let patterns = engine.scan(&bars).unwrap();
//! ```

pub mod annotate;
pub mod detectors;
pub mod measure;
pub mod params;

pub mod prelude {
  pub use crate::{
    // Annotation
    annotate::{alert_template, marker, Marker, Placement},
    // Detectors
    detectors::*,
    // Measurements
    measure::{compute_measurements, MeasureState, Measurements},
    // Parameters
    params::{get_factor, get_flag, get_percent, ParamKind, ParamMeta, ParameterizedDetector},
    // Parallel
    scan_parallel,
    // Iterator
    BarPatterns,
    // Engine
    BuiltinDetector,
    Direction,
    EngineBuilder,
    Factor,
    Ohlc,
    OhlcExt,
    PatternDetector,
    PatternEngine,
    // Errors
    PatternError,
    PatternId,
    PatternIterator,
    PatternMatch,
    Percent,
    Result,
    ScanFailure,
    ScanOutcome,
    StreamScanner,
  };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors that can occur during pattern detection
#[derive(Debug, Clone, thiserror::Error)]
pub enum PatternError {
  #[error("Invalid value: {0}")]
  InvalidValue(&'static str),

  #[error("{field} = {value} out of range [{min}, {max}]")]
  OutOfRange { field: &'static str, value: f64, min: f64, max: f64 },

  #[error("Invalid config: {0}")]
  InvalidConfig(String),

  #[error("Invalid OHLC at index {index}: {reason}")]
  InvalidOhlc { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Percentage value in range 0.0..=100.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percent(f64);

impl Percent {
  /// Create a new Percent, validating the value is in [0.0, 100.0]
  pub fn new(value: f64) -> Result<Self> {
    if value.is_nan() || value.is_infinite() {
      return Err(PatternError::InvalidValue("Percent cannot be NaN or infinite"));
    }
    if !(0.0..=100.0).contains(&value) {
      return Err(PatternError::OutOfRange { field: "Percent", value, min: 0.0, max: 100.0 });
    }
    Ok(Self(value))
  }

  /// Create a Percent from a compile-time constant (library internal use)
  #[doc(hidden)]
  pub const fn new_const(value: f64) -> Self {
    Self(value)
  }

  #[inline]
  pub fn get(self) -> f64 {
    self.0
  }
}

impl serde::Serialize for Percent {
  fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
    self.0.serialize(s)
  }
}

impl<'de> serde::Deserialize<'de> for Percent {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
    let value = f64::deserialize(d)?;
    Percent::new(value).map_err(serde::de::Error::custom)
  }
}

/// Non-negative finite multiplier (e.g. a wick symmetry ratio of 2.0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Factor(f64);

impl Factor {
  /// Create a new Factor, validating the value is finite and >= 0
  pub fn new(value: f64) -> Result<Self> {
    if value.is_nan() || value.is_infinite() {
      return Err(PatternError::InvalidValue("Factor cannot be NaN or infinite"));
    }
    if value < 0.0 {
      return Err(PatternError::InvalidValue("Factor must be >= 0"));
    }
    Ok(Self(value))
  }

  #[doc(hidden)]
  pub const fn new_const(value: f64) -> Self {
    Self(value)
  }

  #[inline]
  pub fn get(self) -> f64 {
    self.0
  }
}

impl serde::Serialize for Factor {
  fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
    self.0.serialize(s)
  }
}

impl<'de> serde::Deserialize<'de> for Factor {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
    let value = f64::deserialize(d)?;
    Factor::new(value).map_err(serde::de::Error::custom)
  }
}

// ============================================================
// OHLC TRAITS
// ============================================================

/// Core OHLC data trait
pub trait Ohlc {
  fn open(&self) -> f64;
  fn high(&self) -> f64;
  fn low(&self) -> f64;
  fn close(&self) -> f64;

  fn timestamp(&self) -> Option<i64> {
    None
  }
}

/// Extension trait with computed properties for OHLC data
pub trait OhlcExt: Ohlc {
  #[inline]
  fn body(&self) -> f64 {
    (self.close() - self.open()).abs()
  }

  #[inline]
  fn range(&self) -> f64 {
    self.high() - self.low()
  }

  #[inline]
  fn body_high(&self) -> f64 {
    self.open().max(self.close())
  }

  #[inline]
  fn body_low(&self) -> f64 {
    self.open().min(self.close())
  }

  #[inline]
  fn top_wick(&self) -> f64 {
    self.high() - self.body_high()
  }

  #[inline]
  fn bottom_wick(&self) -> f64 {
    self.body_low() - self.low()
  }

  #[inline]
  fn is_up(&self) -> bool {
    self.close() > self.open()
  }

  #[inline]
  fn is_down(&self) -> bool {
    self.close() < self.open()
  }

  /// Validate OHLC data consistency
  fn validate(&self) -> Result<()> {
    if self.high() < self.low() {
      return Err(PatternError::InvalidOhlc { index: 0, reason: "high < low" });
    }
    if self.open().is_nan() || self.high().is_nan() || self.low().is_nan() || self.close().is_nan()
    {
      return Err(PatternError::InvalidOhlc { index: 0, reason: "NaN in OHLC" });
    }
    if self.open().is_infinite()
      || self.high().is_infinite()
      || self.low().is_infinite()
      || self.close().is_infinite()
    {
      return Err(PatternError::InvalidOhlc { index: 0, reason: "Infinite value in OHLC" });
    }
    Ok(())
  }
}

impl<T: Ohlc> OhlcExt for T {}

// ============================================================
// PATTERN MATCH - result of detection (Copy, no allocations)
// ============================================================

/// Unique identifier for a pattern type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternId(pub &'static str);

impl PatternId {
  /// Returns the string identifier
  #[inline]
  pub fn as_str(&self) -> &'static str {
    self.0
  }

  /// All built-in pattern ids, in detector registration order.
  pub fn all_builtin() -> &'static [PatternId] {
    static ALL: &[PatternId] = &[
      // Single bar
      PatternId("DOJI"),
      PatternId("DRAGONFLY_DOJI"),
      PatternId("GRAVESTONE_DOJI"),
      PatternId("HAMMER"),
      PatternId("SHOOTING_STAR"),
      PatternId("SPINNING_TOP_BULL"),
      PatternId("SPINNING_TOP_BEAR"),
      PatternId("SPINNING_TOP"),
      PatternId("MARUBOZU_BULL"),
      PatternId("MARUBOZU_BEAR"),
      PatternId("LONG_LOWER_SHADOW"),
      PatternId("LONG_UPPER_SHADOW"),
      // Two bar
      PatternId("BULLISH_ENGULFING"),
      PatternId("BEARISH_ENGULFING"),
      PatternId("TWEEZER_BOTTOM"),
      PatternId("TWEEZER_TOP"),
      PatternId("HARAMI_BULL"),
      PatternId("HARAMI_BEAR"),
      PatternId("HARAMI_CROSS_BULL"),
      PatternId("HARAMI_CROSS_BEAR"),
      PatternId("PIERCING"),
      PatternId("DARK_CLOUD_COVER"),
      PatternId("ON_NECK_BULL"),
      PatternId("ON_NECK_BEAR"),
      PatternId("KICKING_BULL"),
      PatternId("KICKING_BEAR"),
      PatternId("RISING_WINDOW"),
      PatternId("FALLING_WINDOW"),
      PatternId("INSIDE_BAR"),
      // Three bar
      PatternId("MORNING_STAR"),
      PatternId("EVENING_STAR"),
      PatternId("ABANDONED_BABY_BULL"),
      PatternId("ABANDONED_BABY_BEAR"),
      PatternId("UPSIDE_TASUKI_GAP"),
      PatternId("DOWNSIDE_TASUKI_GAP"),
      PatternId("THREE_WHITE_SOLDIERS"),
      PatternId("THREE_BLACK_CROWS"),
      PatternId("DOUBLE_INSIDE_BAR"),
      // Multi bar
      PatternId("TRISTAR_BULL"),
      PatternId("TRISTAR_BEAR"),
      PatternId("RISING_THREE_METHODS"),
      PatternId("FALLING_THREE_METHODS"),
    ];
    ALL
  }

  /// Returns the typical/expected direction of this pattern.
  ///
  /// Unknown (custom) ids default to `Direction::Neutral`.
  pub fn typical_direction(&self) -> Direction {
    match self.0 {
      // Bullish patterns
      "DRAGONFLY_DOJI"
      | "HAMMER"
      | "SPINNING_TOP_BULL"
      | "MARUBOZU_BULL"
      | "LONG_LOWER_SHADOW"
      | "BULLISH_ENGULFING"
      | "TWEEZER_BOTTOM"
      | "HARAMI_BULL"
      | "HARAMI_CROSS_BULL"
      | "PIERCING"
      | "ON_NECK_BULL"
      | "KICKING_BULL"
      | "RISING_WINDOW"
      | "MORNING_STAR"
      | "ABANDONED_BABY_BULL"
      | "UPSIDE_TASUKI_GAP"
      | "THREE_WHITE_SOLDIERS"
      | "TRISTAR_BULL"
      | "RISING_THREE_METHODS" => Direction::Bullish,
      // Bearish patterns
      "GRAVESTONE_DOJI"
      | "SHOOTING_STAR"
      | "SPINNING_TOP_BEAR"
      | "MARUBOZU_BEAR"
      | "LONG_UPPER_SHADOW"
      | "BEARISH_ENGULFING"
      | "TWEEZER_TOP"
      | "HARAMI_BEAR"
      | "HARAMI_CROSS_BEAR"
      | "DARK_CLOUD_COVER"
      | "ON_NECK_BEAR"
      | "KICKING_BEAR"
      | "FALLING_WINDOW"
      | "EVENING_STAR"
      | "ABANDONED_BABY_BEAR"
      | "DOWNSIDE_TASUKI_GAP"
      | "THREE_BLACK_CROWS"
      | "TRISTAR_BEAR"
      | "FALLING_THREE_METHODS" => Direction::Bearish,
      // Neutral patterns, and anything we do not know about
      _ => Direction::Neutral,
    }
  }

  /// Returns true if this pattern typically signals bullish moves
  pub fn is_typically_bullish(&self) -> bool {
    matches!(self.typical_direction(), Direction::Bullish)
  }

  /// Returns true if this pattern typically signals bearish moves
  pub fn is_typically_bearish(&self) -> bool {
    matches!(self.typical_direction(), Direction::Bearish)
  }

  /// Returns true if this pattern has no directional bias
  pub fn is_neutral(&self) -> bool {
    matches!(self.typical_direction(), Direction::Neutral)
  }
}

impl serde::Serialize for PatternId {
  fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
    self.0.serialize(s)
  }
}

/// Direction/bias of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
  Bullish,
  Neutral,
  Bearish,
}

impl Direction {
  #[inline]
  pub fn is_bullish(self) -> bool {
    matches!(self, Direction::Bullish)
  }

  #[inline]
  pub fn is_bearish(self) -> bool {
    matches!(self, Direction::Bearish)
  }
}

/// Result of pattern detection - Copy, no allocations
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PatternMatch {
  pub pattern_id: PatternId,
  pub direction: Direction,
  /// First bar of the formation
  pub start_index: usize,
  /// Bar on which the pattern completes
  pub end_index: usize,
}

// ============================================================
// PATTERN DETECTOR TRAIT
// ============================================================

use measure::{compute_measurements, MeasureState, Measurements};

/// Pattern detector trait. Object-safe: detectors consume precomputed
/// per-bar measurements, never raw bars, so a custom detector plugs into
/// the same scan path as the built-ins.
pub trait PatternDetector: Send + Sync {
  fn id(&self) -> PatternId;

  /// Number of bars the formation spans. Detection at `index` requires
  /// `index + 1 >= min_bars()`.
  fn min_bars(&self) -> usize;

  fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch>;

  fn validate_config(&self) -> Result<()> {
    Ok(())
  }
}

// ============================================================
// BUILTIN DETECTORS - generated via macro
// ============================================================

use detectors::*;

/// Macro to generate BuiltinDetector enum without boilerplate
macro_rules! define_builtin_detectors {
  (
    $(
      $variant:ident($detector:ty)
    ),* $(,)?
  ) => {
    /// All builtin detectors - fast path via enum dispatch
    #[derive(Debug, Clone)]
    pub enum BuiltinDetector {
      $($variant($detector)),*
    }

    impl BuiltinDetector {
      #[inline]
      pub fn detect(&self, snaps: &[Measurements], index: usize) -> Option<PatternMatch> {
        match self {
          $(Self::$variant(d) => PatternDetector::detect(d, snaps, index)),*
        }
      }

      #[inline]
      pub fn id(&self) -> PatternId {
        match self {
          $(Self::$variant(d) => PatternDetector::id(d)),*
        }
      }

      #[inline]
      pub fn min_bars(&self) -> usize {
        match self {
          $(Self::$variant(d) => PatternDetector::min_bars(d)),*
        }
      }

      pub fn validate_config(&self) -> Result<()> {
        match self {
          $(Self::$variant(d) => PatternDetector::validate_config(d)),*
        }
      }
    }
  };
}

// Apply macro - all 42 patterns
define_builtin_detectors! {
  // Single bar (12)
  Doji(DojiDetector),
  DragonflyDoji(DragonflyDojiDetector),
  GravestoneDoji(GravestoneDojiDetector),
  Hammer(HammerDetector),
  ShootingStar(ShootingStarDetector),
  SpinningTopBull(SpinningTopBullDetector),
  SpinningTopBear(SpinningTopBearDetector),
  SpinningTop(SpinningTopDetector),
  MarubozuBull(MarubozuBullDetector),
  MarubozuBear(MarubozuBearDetector),
  LongLowerShadow(LongLowerShadowDetector),
  LongUpperShadow(LongUpperShadowDetector),

  // Two bar (17)
  BullishEngulfing(BullishEngulfingDetector),
  BearishEngulfing(BearishEngulfingDetector),
  TweezerBottom(TweezerBottomDetector),
  TweezerTop(TweezerTopDetector),
  HaramiBull(HaramiBullDetector),
  HaramiBear(HaramiBearDetector),
  HaramiCrossBull(HaramiCrossBullDetector),
  HaramiCrossBear(HaramiCrossBearDetector),
  Piercing(PiercingDetector),
  DarkCloudCover(DarkCloudCoverDetector),
  OnNeckBull(OnNeckBullDetector),
  OnNeckBear(OnNeckBearDetector),
  KickingBull(KickingBullDetector),
  KickingBear(KickingBearDetector),
  RisingWindow(RisingWindowDetector),
  FallingWindow(FallingWindowDetector),
  InsideBar(InsideBarDetector),

  // Three bar (9)
  MorningStar(MorningStarDetector),
  EveningStar(EveningStarDetector),
  AbandonedBabyBull(AbandonedBabyBullDetector),
  AbandonedBabyBear(AbandonedBabyBearDetector),
  UpsideTasukiGap(UpsideTasukiGapDetector),
  DownsideTasukiGap(DownsideTasukiGapDetector),
  ThreeWhiteSoldiers(ThreeWhiteSoldiersDetector),
  ThreeBlackCrows(ThreeBlackCrowsDetector),
  DoubleInsideBar(DoubleInsideBarDetector),

  // Multi-bar (4)
  TriStarBull(TriStarBullDetector),
  TriStarBear(TriStarBearDetector),
  RisingThreeMethods(RisingThreeMethodsDetector),
  FallingThreeMethods(FallingThreeMethodsDetector),
}

// ============================================================
// PATTERN ENGINE
// ============================================================

/// Engine configuration
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
  pub validate_data: bool,
  pub pattern_filter: Option<Vec<PatternId>>,
}

/// Main pattern detection engine
pub struct PatternEngine {
  builtin: Vec<BuiltinDetector>,
  custom: Vec<Box<dyn PatternDetector>>,
  config: EngineConfig,
}

impl PatternEngine {
  // ===========================================
  // LOW-LEVEL: Primitives
  // ===========================================

  /// Precompute measurements for all bars.
  /// User stores and reuses the result.
  #[inline]
  pub fn measure<B: Ohlc>(&self, bars: &[B]) -> Vec<Measurements> {
    compute_measurements(bars)
  }

  // ===========================================
  // MID-LEVEL: Single-bar / Range
  // ===========================================

  /// Detect patterns at a single bar index over precomputed measurements.
  pub fn scan_at(&self, snaps: &[Measurements], index: usize) -> Vec<PatternMatch> {
    self.scan_at_internal(snaps, index)
  }

  /// Detect patterns in a range of bars over precomputed measurements.
  pub fn scan_range(
    &self,
    snaps: &[Measurements],
    range: std::ops::Range<usize>,
  ) -> Vec<PatternMatch> {
    let mut results = Vec::new();
    for i in range {
      if i < snaps.len() {
        results.extend(self.scan_at_internal(snaps, i));
      }
    }
    results
  }

  // ===========================================
  // HIGH-LEVEL: Batch processing
  // ===========================================

  /// Scan all bars and return flat list of patterns.
  pub fn scan<B: Ohlc>(&self, bars: &[B]) -> Result<Vec<PatternMatch>> {
    if self.config.validate_data {
      self.validate_bars(bars)?;
    }

    let snaps = self.measure(bars);
    Ok(self.scan_range(&snaps, 0..snaps.len()))
  }

  /// Scan and return patterns grouped by bar index.
  pub fn scan_grouped<B: Ohlc>(&self, bars: &[B]) -> Result<Vec<Vec<PatternMatch>>> {
    if self.config.validate_data {
      self.validate_bars(bars)?;
    }

    let snaps = self.measure(bars);
    Ok((0..snaps.len()).map(|i| self.scan_at_internal(&snaps, i)).collect())
  }

  /// Scan all bars, keeping only patterns that complete on a bar whose gate
  /// entry is true. The gate is the caller's trend filter: pass e.g. a
  /// "downtrend" mask to keep only bottoming signals. `gate.len()` must equal
  /// `bars.len()`.
  pub fn scan_gated<B: Ohlc>(&self, bars: &[B], gate: &[bool]) -> Result<Vec<PatternMatch>> {
    if gate.len() != bars.len() {
      return Err(PatternError::InvalidConfig(format!(
        "gate length {} does not match bar count {}",
        gate.len(),
        bars.len()
      )));
    }

    let mut patterns = self.scan(bars)?;
    patterns.retain(|m| gate[m.end_index]);
    Ok(patterns)
  }

  /// Create an iterator over bars with their patterns.
  pub fn iter<B: Ohlc>(&self, bars: &[B]) -> PatternIterator<'_> {
    PatternIterator::new(self, self.measure(bars))
  }

  /// Create an incremental scanner that accepts one bar at a time and
  /// reports the patterns completing on it.
  pub fn stream(&self) -> StreamScanner<'_> {
    StreamScanner::new(self)
  }

  // ===========================================
  // Internal helpers
  // ===========================================

  fn scan_at_internal(&self, snaps: &[Measurements], index: usize) -> Vec<PatternMatch> {
    let mut results = Vec::new();

    // Fast path: builtin detectors (enum dispatch, no vtable)
    for detector in &self.builtin {
      if index + 1 >= detector.min_bars() {
        if let Some(m) = detector.detect(snaps, index) {
          if self.should_include(&m) {
            results.push(m);
          }
        }
      }
    }

    // Slow path: custom detectors (vtable)
    for detector in &self.custom {
      if index + 1 >= detector.min_bars() {
        if let Some(m) = detector.detect(snaps, index) {
          if self.should_include(&m) {
            results.push(m);
          }
        }
      }
    }

    results
  }

  fn should_include(&self, m: &PatternMatch) -> bool {
    if let Some(ref filter) = self.config.pattern_filter {
      if !filter.contains(&m.pattern_id) {
        return false;
      }
    }
    true
  }

  fn validate_bars<B: Ohlc>(&self, bars: &[B]) -> Result<()> {
    for (i, bar) in bars.iter().enumerate() {
      bar.validate().map_err(|e| match e {
        PatternError::InvalidOhlc { reason, .. } => PatternError::InvalidOhlc { index: i, reason },
        other => other,
      })?;
    }
    Ok(())
  }

  fn validate(&self) -> Result<()> {
    for d in &self.builtin {
      d.validate_config()?;
    }
    for d in &self.custom {
      d.validate_config()?;
    }
    Ok(())
  }
}

// ============================================================
// PATTERN ITERATOR
// ============================================================

/// Patterns found at a specific bar
#[derive(Debug, Clone)]
pub struct BarPatterns {
  pub index: usize,
  pub patterns: Vec<PatternMatch>,
}

/// Iterator over bars with their patterns
pub struct PatternIterator<'a> {
  engine: &'a PatternEngine,
  snaps: Vec<Measurements>,
  current: usize,
}

impl<'a> PatternIterator<'a> {
  fn new(engine: &'a PatternEngine, snaps: Vec<Measurements>) -> Self {
    Self { engine, snaps, current: 0 }
  }
}

impl Iterator for PatternIterator<'_> {
  type Item = BarPatterns;

  fn next(&mut self) -> Option<Self::Item> {
    if self.current >= self.snaps.len() {
      return None;
    }

    let index = self.current;
    let patterns = self.engine.scan_at_internal(&self.snaps, index);

    self.current += 1;

    Some(BarPatterns { index, patterns })
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let remaining = self.snaps.len().saturating_sub(self.current);
    (remaining, Some(remaining))
  }
}

impl ExactSizeIterator for PatternIterator<'_> {}

// ============================================================
// STREAMING
// ============================================================

/// Incremental scanner: feed bars one at a time, get the patterns that
/// complete on each bar. Produces exactly the matches a batch [`PatternEngine::scan`]
/// over the same series would, in the same order, with absolute bar indices.
///
/// Memory is bounded: only the running body average and the last few
/// measurements are retained, regardless of series length.
pub struct StreamScanner<'a> {
  engine: &'a PatternEngine,
  state: MeasureState,
  window: Vec<Measurements>,
  bars_seen: usize,
}

impl<'a> StreamScanner<'a> {
  /// Deepest detector lookback is 4 bars behind the current one.
  const WINDOW: usize = 5;

  fn new(engine: &'a PatternEngine) -> Self {
    Self {
      engine,
      state: MeasureState::default(),
      window: Vec::with_capacity(Self::WINDOW),
      bars_seen: 0,
    }
  }

  /// Number of bars consumed so far.
  #[inline]
  pub fn bars_seen(&self) -> usize {
    self.bars_seen
  }

  /// Consume one bar and return the patterns completing on it, with
  /// indices relative to the start of the stream.
  pub fn push<B: Ohlc>(&mut self, bar: &B) -> Vec<PatternMatch> {
    let snap = self.state.next(bar);
    if self.window.len() == Self::WINDOW {
      self.window.remove(0);
    }
    self.window.push(snap);
    self.bars_seen += 1;

    let index = self.window.len() - 1;
    let offset = self.bars_seen - self.window.len();

    let mut matches = self.engine.scan_at_internal(&self.window, index);
    for m in &mut matches {
      m.start_index += offset;
      m.end_index += offset;
    }
    matches
  }
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating PatternEngine instances
pub struct EngineBuilder {
  builtin: Vec<BuiltinDetector>,
  custom: Vec<Box<dyn PatternDetector>>,
  config: EngineConfig,
}

impl Default for EngineBuilder {
  fn default() -> Self {
    Self::new()
  }
}

/// Generate an array of `BuiltinDetector` variants using `Default::default()` for each inner type.
macro_rules! builtin_defaults {
  ($($variant:ident),* $(,)?) => {
    [$(BuiltinDetector::$variant(Default::default())),*]
  };
}

impl EngineBuilder {
  pub fn new() -> Self {
    Self { builtin: Vec::new(), custom: Vec::new(), config: EngineConfig::default() }
  }

  /// Add all builtin patterns with default configurations
  pub fn with_all_defaults(self) -> Self {
    self
      .with_single_bar_defaults()
      .with_two_bar_defaults()
      .with_three_bar_defaults()
      .with_multi_bar_defaults()
  }

  /// Add only single-bar patterns with defaults (12)
  pub fn with_single_bar_defaults(mut self) -> Self {
    self.builtin.extend(builtin_defaults![
      Doji,
      DragonflyDoji,
      GravestoneDoji,
      Hammer,
      ShootingStar,
      SpinningTopBull,
      SpinningTopBear,
      SpinningTop,
      MarubozuBull,
      MarubozuBear,
      LongLowerShadow,
      LongUpperShadow,
    ]);
    self
  }

  /// Add two-bar patterns with defaults (17)
  pub fn with_two_bar_defaults(mut self) -> Self {
    self.builtin.extend(builtin_defaults![
      BullishEngulfing,
      BearishEngulfing,
      TweezerBottom,
      TweezerTop,
      HaramiBull,
      HaramiBear,
      HaramiCrossBull,
      HaramiCrossBear,
      Piercing,
      DarkCloudCover,
      OnNeckBull,
      OnNeckBear,
      KickingBull,
      KickingBear,
      RisingWindow,
      FallingWindow,
      InsideBar,
    ]);
    self
  }

  /// Add three-bar patterns with defaults (9)
  pub fn with_three_bar_defaults(mut self) -> Self {
    self.builtin.extend(builtin_defaults![
      MorningStar,
      EveningStar,
      AbandonedBabyBull,
      AbandonedBabyBear,
      UpsideTasukiGap,
      DownsideTasukiGap,
      ThreeWhiteSoldiers,
      ThreeBlackCrows,
      DoubleInsideBar,
    ]);
    self
  }

  /// Add multi-bar patterns with defaults (4)
  pub fn with_multi_bar_defaults(mut self) -> Self {
    self.builtin.extend(builtin_defaults![
      TriStarBull,
      TriStarBear,
      RisingThreeMethods,
      FallingThreeMethods,
    ]);
    self
  }

  /// Add a builtin detector
  #[allow(clippy::should_implement_trait)]
  pub fn add(mut self, detector: BuiltinDetector) -> Self {
    self.builtin.push(detector);
    self
  }

  /// Add with config validation
  pub fn add_checked(mut self, detector: BuiltinDetector) -> Result<Self> {
    detector.validate_config()?;
    self.builtin.push(detector);
    Ok(self)
  }

  /// Add a custom detector (slow path)
  pub fn add_custom<D: PatternDetector + 'static>(mut self, detector: D) -> Self {
    self.custom.push(Box::new(detector));
    self
  }

  /// Enable/disable data validation
  pub fn validate_data(mut self, enable: bool) -> Self {
    self.config.validate_data = enable;
    self
  }

  /// Filter to specific patterns only
  pub fn only_patterns(mut self, ids: impl IntoIterator<Item = PatternId>) -> Self {
    self.config.pattern_filter = Some(ids.into_iter().collect());
    self
  }

  /// Build the engine
  pub fn build(self) -> Result<PatternEngine> {
    let engine =
      PatternEngine { builtin: self.builtin, custom: self.custom, config: self.config };
    engine.validate()?;
    Ok(engine)
  }
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Result of scanning a single instrument
#[derive(Debug)]
pub struct ScanOutcome {
  pub symbol: String,
  pub patterns: Vec<PatternMatch>,
}

/// Error from scanning a single instrument
#[derive(Debug)]
pub struct ScanFailure {
  pub symbol: String,
  pub error: PatternError,
}

/// Parallel scanning of multiple instruments
pub fn scan_parallel<'a, B, I>(
  engine: &PatternEngine,
  instruments: I,
) -> (Vec<ScanOutcome>, Vec<ScanFailure>)
where
  B: Ohlc + Sync + 'a,
  I: IntoParallelIterator<Item = (&'a str, &'a [B])>,
{
  let results: Vec<_> = instruments
    .into_par_iter()
    .map(|(symbol, bars)| {
      engine
        .scan(bars)
        .map(|patterns| ScanOutcome { symbol: symbol.to_string(), patterns })
        .map_err(|error| ScanFailure { symbol: symbol.to_string(), error })
    })
    .collect();

  let mut successes = Vec::new();
  let mut failures = Vec::new();

  for result in results {
    match result {
      Ok(r) => successes.push(r),
      Err(e) => failures.push(e),
    }
  }

  (successes, failures)
}

// ============================================================
// TEST SUPPORT
// ============================================================


// ============================================================
// TESTS
// ============================================================
