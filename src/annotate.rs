//! Chart annotation metadata for detected patterns.
//!
//! Maps every built-in [`PatternId`] to a short marker code with a placement
//! hint and an explanatory tooltip, plus an alert message template. Rendering
//! is left to the caller; a charting frontend can place the marker code
//! above or below the bar and attach the tooltip, and an alerting frontend
//! can append the symbol name to the template.

use serde::Serialize;

use crate::PatternId;

/// Where a marker should be drawn relative to the bar it annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Placement {
  AboveBar,
  BelowBar,
}

/// Chart marker for a detected pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Marker {
  /// Short code drawn on the chart (e.g. "BE", "3WS").
  pub code: &'static str,
  /// Above the bar for bearish signals, below otherwise.
  pub placement: Placement,
  /// Longer explanation, first line is the pattern name.
  pub tooltip: &'static str,
}

const fn below(code: &'static str, tooltip: &'static str) -> Marker {
  Marker { code, placement: Placement::BelowBar, tooltip }
}

const fn above(code: &'static str, tooltip: &'static str) -> Marker {
  Marker { code, placement: Placement::AboveBar, tooltip }
}

/// Returns the chart marker for a built-in pattern, or `None` for unknown
/// (e.g. custom detector) ids.
pub fn marker(id: PatternId) -> Option<Marker> {
  let m = match id.0 {
    "DOJI" => below(
      "D",
      "Doji\nTransitional candle signifying indecision, with a small or non-existent real body \
       as the session closes at or near its open",
    ),
    "DRAGONFLY_DOJI" => below(
      "DD",
      "Dragonfly Doji\nBullish doji varietal defined by an open and a close at or near the highs \
       of the bar",
    ),
    "GRAVESTONE_DOJI" => above(
      "GD",
      "Gravestone Doji\nBearish doji varietal defined by an open and a close at or near the lows \
       of the bar",
    ),
    "HAMMER" => below(
      "H",
      "Hammer\nBullish bottoming candle comprised of a long lower wick and a small real body, \
       typically closing at or near the highs",
    ),
    "SHOOTING_STAR" => above(
      "SS",
      "Shooting Star\nBearish topping candle comprised of a long upper wick and a small real \
       body, typically closing at or near the lows",
    ),
    "SPINNING_TOP_BULL" => below(
      "STW",
      "Bullish Spinning Top\nAn up candle with a short body surrounded by long wicks of roughly \
       equal length, each longer than the body. A sign of indecision and possible reversal at a \
       swing low",
    ),
    "SPINNING_TOP_BEAR" => below(
      "STB",
      "Bearish Spinning Top\nA down candle with a short body surrounded by long wicks of roughly \
       equal length, each longer than the body. A sign of indecision and possible reversal at a \
       swing high",
    ),
    "SPINNING_TOP" => below(
      "ST",
      "Spinning Top\nA candle with a short body surrounded by long wicks of roughly equal \
       length, each longer than the body. A sign of indecision",
    ),
    "MARUBOZU_BULL" => below(
      "MW",
      "Bullish Marubozu\nA bullish candlestick with no meaningful shadow extending from either \
       end of its body",
    ),
    "MARUBOZU_BEAR" => above(
      "MB",
      "Bearish Marubozu\nA bearish candlestick with no meaningful shadow extending from either \
       end of its body",
    ),
    "LONG_LOWER_SHADOW" => below(
      "LLS",
      "Long Lower Shadow\nA long lower shadow with a short upper shadow shows sellers dominated \
       early in the session but were left underwater by the close",
    ),
    "LONG_UPPER_SHADOW" => above(
      "LUS",
      "Long Upper Shadow\nA long upper shadow with a short lower shadow shows buyers dominated \
       early in the session but were left underwater by the close",
    ),
    "BULLISH_ENGULFING" => below(
      "BE",
      "Bullish Engulfing\nAn up candle that closes higher than the previous bar's open after \
       opening lower than the previous bar's close",
    ),
    "BEARISH_ENGULFING" => above(
      "BE",
      "Bearish Engulfing\nA down candle that closes lower than the previous bar's open after \
       opening higher than the previous bar's close",
    ),
    "TWEEZER_BOTTOM" => below(
      "TB",
      "Tweezer Bottom\nAn up candle following a down candle in a downtrend with nearly identical \
       lows. The defended double bottom can signal reversal",
    ),
    "TWEEZER_TOP" => above(
      "TT",
      "Tweezer Top\nA down candle following an up candle in an uptrend with nearly identical \
       highs. The defended double top can signal reversal",
    ),
    "HARAMI_BULL" => below(
      "HW",
      "Bullish Harami\nA small-bodied green candle entirely encompassed within the body of the \
       preceding red candle",
    ),
    "HARAMI_BEAR" => above(
      "HB",
      "Bearish Harami\nA small-bodied red candle entirely encompassed within the body of the \
       preceding green candle",
    ),
    "HARAMI_CROSS_BULL" => below(
      "HC",
      "Bullish Harami Cross\nA doji entirely encompassed within the body of the preceding red \
       candle, signaling possible reversal in a downtrend",
    ),
    "HARAMI_CROSS_BEAR" => above(
      "HC",
      "Bearish Harami Cross\nA doji entirely encompassed within the body of the preceding green \
       candle, signaling possible reversal in an uptrend",
    ),
    "PIERCING" => below(
      "P",
      "Piercing\nTwo-candle bullish reversal in a downtrend: a tall red candle, then a green \
       candle that opens below the prior low and closes above the midpoint of the first body",
    ),
    "DARK_CLOUD_COVER" => above(
      "DCC",
      "Dark Cloud Cover\nTwo-candle bearish reversal in an uptrend: a tall green candle, then a \
       red candle that opens above the prior high and closes below the midpoint of the first \
       body",
    ),
    "ON_NECK_BULL" => below(
      "N",
      "On Neck (bullish)\nTwo-line continuation in an uptrend: a tall green candle followed by a \
       short red candle closing at or near the first candle's high",
    ),
    "ON_NECK_BEAR" => above(
      "N",
      "On Neck (bearish)\nTwo-line continuation in a downtrend: a tall red candle followed by a \
       short green candle closing at or near the first candle's low",
    ),
    "KICKING_BULL" => below(
      "K",
      "Kicking\nA bearish marubozu followed by a bullish marubozu that gaps above the prior \
       high",
    ),
    "KICKING_BEAR" => above(
      "K",
      "Kicking\nA bullish marubozu followed by a bearish marubozu that gaps below the prior \
       low",
    ),
    "RISING_WINDOW" => below(
      "RW",
      "Rising Window\nTwo-candle bullish continuation marked by a price gap between the first \
       candle's high and the second candle's low",
    ),
    "FALLING_WINDOW" => above(
      "FW",
      "Falling Window\nTwo-candle bearish continuation marked by a price gap between the first \
       candle's low and the second candle's high",
    ),
    "INSIDE_BAR" => below(
      "IB",
      "Inside Bar\nA bar held entirely within the high-low range of the prior bar: the high is \
       lower than the previous high and the low is higher than the previous low",
    ),
    "MORNING_STAR" => below(
      "MS",
      "Morning Star\nThree-bar bullish reversal in a downtrend: a decisive down move, a small \
       indecision candle, then a strong move in the opposite direction",
    ),
    "EVENING_STAR" => above(
      "ES",
      "Evening Star\nThree-bar bearish reversal in an uptrend: a decisive up move, a small \
       indecision candle, then a strong move in the opposite direction",
    ),
    "ABANDONED_BABY_BULL" => below(
      "AB",
      "Bullish Abandoned Baby\nA large down candle, a doji that gaps below it, then a candle \
       that opens above the doji and moves aggressively upward",
    ),
    "ABANDONED_BABY_BEAR" => above(
      "AB",
      "Bearish Abandoned Baby\nA large up candle, a doji that gaps above it, then a candle that \
       opens below the doji and moves aggressively downward",
    ),
    "UPSIDE_TASUKI_GAP" => below(
      "UTG",
      "Upside Tasuki Gap\nUptrend continuation: a long green candle, a smaller green candle \
       gapping above its body, then a red candle closing inside the gap without filling it",
    ),
    "DOWNSIDE_TASUKI_GAP" => above(
      "DTG",
      "Downside Tasuki Gap\nDowntrend continuation: a long red candle, a smaller red candle \
       gapping below its body, then a green candle closing inside the gap without filling it",
    ),
    "THREE_WHITE_SOLDIERS" => below(
      "3WS",
      "Three White Soldiers\nThree long-bodied green candles in immediate succession, each \
       opening within the prior body and closing near its high",
    ),
    "THREE_BLACK_CROWS" => above(
      "3BC",
      "Three Black Crows\nThree long-bodied red candles in immediate succession, each opening \
       within the prior body and closing at or near its low",
    ),
    "DOUBLE_INSIDE_BAR" => below(
      "DI",
      "Double Inside Bar\nTwo inside bars in a row, often seen in consolidation or flag \
       structures. Typically favors continuation",
    ),
    "TRISTAR_BULL" => below(
      "3S",
      "Tri-Star Bull\nThree dojis in immediate succession at the tail end of an extended \
       downtrend, the middle one gapping with the trend and the last opening against it",
    ),
    "TRISTAR_BEAR" => above(
      "3S",
      "Tri-Star Bear\nThree dojis in immediate succession at the tail end of an extended \
       uptrend, the middle one gapping with the trend and the last opening against it",
    ),
    "RISING_THREE_METHODS" => below(
      "RTM",
      "Rising Three Methods\nFive-candle bullish continuation: a long green candle, three short \
       red candles held inside its range, then a long green candle closing above the first \
       close",
    ),
    "FALLING_THREE_METHODS" => above(
      "FTM",
      "Falling Three Methods\nFive-candle bearish continuation: a long red candle, three short \
       green candles held inside its range, then a long red candle closing below the first \
       close",
    ),
    _ => return None,
  };
  Some(m)
}

/// Returns the alert message template for a built-in pattern. Templates end
/// with "on " so callers can append a symbol name.
pub fn alert_template(id: PatternId) -> Option<&'static str> {
  let template = match id.0 {
    "DOJI" => "Doji on ",
    "DRAGONFLY_DOJI" => "Dragonfly Doji on ",
    "GRAVESTONE_DOJI" => "Gravestone Doji on ",
    "HAMMER" => "Hammer candle on ",
    "SHOOTING_STAR" => "Shooting star on ",
    "SPINNING_TOP_BULL" => "White Spinning Top on ",
    "SPINNING_TOP_BEAR" => "Black Spinning Top on ",
    "SPINNING_TOP" => "Spinning Top on ",
    "MARUBOZU_BULL" => "Bullish Marubozu on ",
    "MARUBOZU_BEAR" => "Bearish Marubozu on ",
    "LONG_LOWER_SHADOW" => "Long Lower Shadow on ",
    "LONG_UPPER_SHADOW" => "Long Upper Shadow on ",
    "BULLISH_ENGULFING" => "Bullish Engulfing on ",
    "BEARISH_ENGULFING" => "Bearish Engulfing on ",
    "TWEEZER_BOTTOM" => "Tweezer Bottom on ",
    "TWEEZER_TOP" => "Tweezer Top on ",
    "HARAMI_BULL" => "Bullish Harami on ",
    "HARAMI_BEAR" => "Bearish Harami on ",
    "HARAMI_CROSS_BULL" => "Bullish Harami Cross on ",
    "HARAMI_CROSS_BEAR" => "Bearish Harami Cross on ",
    "PIERCING" => "Piercing on ",
    "DARK_CLOUD_COVER" => "Dark Cloud Cover on ",
    "ON_NECK_BULL" => "Bullish On Neck on ",
    "ON_NECK_BEAR" => "Bearish On Neck on ",
    "KICKING_BULL" => "Kicking Bull on ",
    "KICKING_BEAR" => "Kicking Bear on ",
    "RISING_WINDOW" => "Rising Window on ",
    "FALLING_WINDOW" => "Falling Window on ",
    "INSIDE_BAR" => "Inside Bar on ",
    "MORNING_STAR" => "Morning Star on ",
    "EVENING_STAR" => "Evening Star on ",
    "ABANDONED_BABY_BULL" => "Bullish Abandoned Baby on ",
    "ABANDONED_BABY_BEAR" => "Bearish Abandoned Baby on ",
    "UPSIDE_TASUKI_GAP" => "Upside Tasuki Gap on ",
    "DOWNSIDE_TASUKI_GAP" => "Downside Tasuki Gap on ",
    "THREE_WHITE_SOLDIERS" => "Three White Soldiers on ",
    "THREE_BLACK_CROWS" => "Three Black Crows on ",
    "DOUBLE_INSIDE_BAR" => "Double Inside Bar on ",
    "TRISTAR_BULL" => "Tri-Star Bull on ",
    "TRISTAR_BEAR" => "Tri-Star Bear on ",
    "RISING_THREE_METHODS" => "Rising Three Methods on ",
    "FALLING_THREE_METHODS" => "Falling Three Methods on ",
    _ => return None,
  };
  Some(template)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Direction, PatternId};

  #[test]
  fn test_every_builtin_has_marker_and_alert() {
    for id in PatternId::all_builtin() {
      let m = marker(*id).unwrap_or_else(|| panic!("missing marker for {}", id.0));
      assert!(!m.code.is_empty());
      assert!(m.tooltip.contains('\n'), "tooltip for {} has no name line", id.0);
      let a = alert_template(*id).unwrap_or_else(|| panic!("missing alert for {}", id.0));
      assert!(a.ends_with("on "));
    }
  }

  #[test]
  fn test_placement_follows_typical_direction() {
    for id in PatternId::all_builtin() {
      let m = marker(*id).unwrap();
      if m.placement == Placement::AboveBar {
        assert_eq!(id.typical_direction(), Direction::Bearish, "{} placed above", id.0);
      }
    }
  }

  #[test]
  fn test_unknown_pattern_has_no_metadata() {
    let custom = PatternId("MY_CUSTOM_PATTERN");
    assert!(marker(custom).is_none());
    assert!(alert_template(custom).is_none());
  }
}
