#![forbid(unsafe_code)]

//! Touch gesture classification.
//!
//! Pure functions over start/end samples; the stateful parts (which touch
//! is active, when it began) live in the components that consume them.

use core::time::Duration;

use crate::config::SwipeConfig;

/// Direction of a carousel swipe, in track order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    /// Finger moved left: reveal the next card.
    Forward,
    /// Finger moved right: reveal the previous card.
    Backward,
}

impl SwipeDirection {
    /// Card index step for this direction.
    #[must_use]
    pub const fn step(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// Release velocity in px/ms.
///
/// A zero-length touch has infinite velocity when it moved at all and zero
/// otherwise, matching `distance / 0` in the browser.
#[must_use]
pub fn release_velocity(distance: f64, elapsed: Duration) -> f64 {
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    let distance = distance.abs();
    if elapsed_ms > 0.0 {
        distance / elapsed_ms
    } else if distance > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Classify a touch release on the carousel.
///
/// `diff_x` is `start_x - end_x` (positive when the finger moved left).
/// A release is a swipe when it travelled further than
/// [`SwipeConfig::min_distance`] within [`SwipeConfig::max_duration`], or when
/// its velocity exceeds [`SwipeConfig::min_velocity`].
#[must_use]
pub fn classify_swipe(diff_x: f64, elapsed: Duration, config: &SwipeConfig) -> Option<SwipeDirection> {
    if !diff_x.is_finite() {
        return None;
    }
    let quick_long = diff_x.abs() > config.min_distance && elapsed < config.max_duration();
    let fast = release_velocity(diff_x, elapsed) > config.min_velocity;
    if !(quick_long || fast) {
        return None;
    }
    Some(if diff_x > 0.0 {
        SwipeDirection::Forward
    } else {
        SwipeDirection::Backward
    })
}

/// Whether a touch on the open nav drawer should dismiss it: an upward
/// swipe that stays roughly vertical, or any leftward swipe past the
/// threshold.
#[must_use]
pub fn is_drawer_dismiss_swipe(start: (f64, f64), end: (f64, f64), threshold: f64) -> bool {
    let (start_x, start_y) = start;
    let (end_x, end_y) = end;
    let vertical_up = start_y - end_y;
    let horizontal = (start_x - end_x).abs();
    (vertical_up > threshold && horizontal < threshold) || (start_x - end_x > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn quick_long_swipe_is_recognized() {
        let cfg = SwipeConfig::default();
        assert_eq!(classify_swipe(60.0, ms(300), &cfg), Some(SwipeDirection::Forward));
        assert_eq!(classify_swipe(-60.0, ms(300), &cfg), Some(SwipeDirection::Backward));
    }

    #[test]
    fn slow_short_drag_is_not_a_swipe() {
        let cfg = SwipeConfig::default();
        assert_eq!(classify_swipe(20.0, ms(1000), &cfg), None);
    }

    #[test]
    fn long_but_slow_drag_is_not_a_swipe() {
        let cfg = SwipeConfig::default();
        // 200px in 600ms: too slow for the distance rule, 0.33 px/ms.
        assert_eq!(classify_swipe(200.0, ms(600), &cfg), None);
    }

    #[test]
    fn fast_flick_counts_regardless_of_distance() {
        let cfg = SwipeConfig::default();
        // 30px in 40ms = 0.75 px/ms.
        assert_eq!(classify_swipe(30.0, ms(40), &cfg), Some(SwipeDirection::Forward));
    }

    #[test]
    fn zero_elapsed_velocity() {
        assert_eq!(release_velocity(0.0, Duration::ZERO), 0.0);
        assert!(release_velocity(3.0, Duration::ZERO).is_infinite());
        assert_eq!(classify_swipe(0.0, Duration::ZERO, &SwipeConfig::default()), None);
    }

    #[test]
    fn drawer_dismiss_swipes() {
        assert!(is_drawer_dismiss_swipe((100.0, 400.0), (110.0, 300.0), 50.0));
        assert!(is_drawer_dismiss_swipe((200.0, 300.0), (120.0, 320.0), 50.0));
        assert!(!is_drawer_dismiss_swipe((100.0, 400.0), (180.0, 300.0), 50.0));
        assert!(!is_drawer_dismiss_swipe((100.0, 300.0), (100.0, 380.0), 50.0));
    }
}
