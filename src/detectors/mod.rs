//! Candlestick pattern detectors.
//!
//! Grouped by lookback depth:
//!
//! - **Single-bar (12)**: Doji family, Hammer, Shooting Star, Spinning Tops,
//!   Marubozu, Long Shadows.
//! - **Two-bar (17)**: Engulfing, Harami, Tweezers, Piercing, Dark Cloud
//!   Cover, On Neck, Kicking, Windows, Inside Bar.
//! - **Three-bar (9)**: Morning/Evening Star, Abandoned Baby, Tasuki Gaps,
//!   Soldiers/Crows, Double Inside Bar.
//! - **Multi-bar (4)**: Tri-Star (lag 3), Rising/Falling Three Methods (lag 4).

pub mod helpers;

/// Generate `with_defaults()` -> `Self::default()` for multiple detector types.
macro_rules! impl_with_defaults {
  ($($detector:ty),* $(,)?) => {
    $(impl $detector {
      pub fn with_defaults() -> Self {
        Self::default()
      }
    })*
  };
}

pub mod multi_bar;
pub mod single_bar;
pub mod three_bar;
pub mod two_bar;

// Re-export all detectors for convenience
pub use helpers::*;
pub use multi_bar::*;
pub use single_bar::*;
pub use three_bar::*;
pub use two_bar::*;
