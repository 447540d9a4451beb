#![forbid(unsafe_code)]

//! `kindweb-web` wires the `kindweb-core` components into one page runtime
//! that a browser host can drive.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page (JS) pushes encoded inputs and
//!   layout changes, then drains JSON commands to apply to the DOM.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`; `kindweb-wasm` wraps it with
//! the JS API so everything here stays testable natively.

pub mod input_parser;
pub mod runtime;

use core::time::Duration;

pub use input_parser::{InputParseError, parse_encoded_input};
pub use runtime::{NavElements, PageCommand, PageElements, PageInput, PageRuntime};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Earlier values are ignored so time never
    /// runs backwards.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::from_millis(500));
        clock.set(Duration::from_millis(200));
        assert_eq!(clock.now(), Duration::from_millis(500));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(516));
    }
}
