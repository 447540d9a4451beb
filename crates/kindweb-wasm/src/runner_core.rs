#![forbid(unsafe_code)]

//! Platform-independent runner core.
//!
//! Wraps [`PageRuntime`] and converts the loosely-typed values a JS host
//! hands over (JSON strings, `f64` milliseconds) into runtime calls. Every
//! host error is absorbed here: bad payloads become `false` plus a `warn!`.

use core::time::Duration;

use kindweb_core::carousel::TrackLayout;
use kindweb_core::config::{ConfigError, SiteConfig};
use kindweb_core::store::KeyValueStore;
use kindweb_web::{PageElements, PageRuntime};
use thiserror::Error;
use tracing::{debug, warn};

const LOG_TARGET: &str = "kindweb::wasm";

/// Why the runner could not be created from the host's bootstrap payload.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to parse page elements JSON: {0}")]
    Elements(serde_json::Error),
}

pub struct RunnerCore<S> {
    runtime: PageRuntime<S>,
}

impl<S: KeyValueStore> RunnerCore<S> {
    /// Build from the config override (empty for defaults) and the element
    /// inventory collected by the host at `DOMContentLoaded`.
    pub fn from_bootstrap(
        config_json: &str,
        elements_json: &str,
        store: S,
    ) -> Result<Self, BootstrapError> {
        let config = if config_json.trim().is_empty() {
            SiteConfig::default()
        } else {
            SiteConfig::from_json(config_json)?
        };
        let elements: PageElements =
            serde_json::from_str(elements_json).map_err(BootstrapError::Elements)?;
        let runtime = PageRuntime::new(config, elements, store)?;
        debug!(target: LOG_TARGET, "runner bootstrapped");
        Ok(Self { runtime })
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        self.runtime.store()
    }

    pub fn now_ms(&self) -> f64 {
        self.runtime.now().as_nanos() as f64 / 1_000_000.0
    }

    /// Advance the clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        // Host input can be noisy (NaN/inf/negative spikes).
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        self.runtime.advance_by(millis(dt_ms));
    }

    /// Set the clock to absolute milliseconds (`performance.now()`).
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        if !ts_ms.is_finite() || ts_ms <= 0.0 {
            return;
        }
        self.runtime.advance_to(millis(ts_ms));
    }

    /// Returns `true` if the input was recognized and dispatched.
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        match self.runtime.push_encoded_input(json) {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(err) => {
                warn!(target: LOG_TARGET, error = %err, "rejected host input");
                false
            }
        }
    }

    /// Viewport resized. `layout_json` carries fresh track measurements, or
    /// is empty when the page has no carousel.
    pub fn resize(&mut self, width: f64, layout_json: &str) {
        let layout = if layout_json.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<TrackLayout>(layout_json) {
                Ok(layout) => Some(layout),
                Err(err) => {
                    warn!(target: LOG_TARGET, error = %err, "ignoring unreadable track layout");
                    None
                }
            }
        };
        self.runtime.resize(width, layout);
    }

    /// Pending commands as a JSON array (`[]` when there are none).
    pub fn take_commands_json(&mut self) -> String {
        self.runtime.take_commands_json().unwrap_or_else(|err| {
            warn!(target: LOG_TARGET, error = %err, "failed to encode commands");
            String::from("[]")
        })
    }
}

fn millis(ms: f64) -> Duration {
    // `as` saturates at u64::MAX.
    Duration::from_nanos((ms * 1_000_000.0) as u64)
}
