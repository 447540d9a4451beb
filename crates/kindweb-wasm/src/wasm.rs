#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the [`SiteRunner`].
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types
//! and backs the key-value store with `window.localStorage`.
//! Only compiled on `wasm32` targets.

use js_sys::Reflect;
use kindweb_core::store::{KeyValueStore, StoreError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::runner_core::RunnerCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

/// `window.localStorage`, resolved on every access. Private browsing and
/// sandboxed iframes can make it unavailable.
#[derive(Debug, Default)]
struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        window
            .local_storage()
            .map_err(|err| StoreError::Unavailable(format!("{err:?}")))?
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".into()))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|err| StoreError::Unavailable(format!("{err:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|err| StoreError::Unavailable(format!("{err:?}")))
    }
}

/// Page runner for the foundation site.
///
/// Host-driven: the page script forwards DOM events, advances time each
/// animation frame, and applies the JSON commands returned by
/// [`SiteRunner::drain_commands`].
#[wasm_bindgen]
pub struct SiteRunner {
    inner: RunnerCore<LocalStorageStore>,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl SiteRunner {
    /// Create a runner from a config override (`""` for defaults) and the
    /// page element inventory. Throws on an invalid payload.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, elements_json: &str) -> Result<SiteRunner, JsValue> {
        install_panic_hook();
        RunnerCore::from_bootstrap(config_json, elements_json, LocalStorageStore)
            .map(|inner| Self { inner })
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Parse a JSON-encoded DOM event and dispatch it.
    /// Returns `true` if accepted, `false` if unsupported/malformed.
    #[wasm_bindgen(js_name = pushInput)]
    pub fn push_input(&mut self, json: &str) -> bool {
        self.inner.push_encoded_input(json)
    }

    /// Advance the clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Set the clock to `performance.now()` milliseconds.
    #[wasm_bindgen(js_name = advanceTo)]
    pub fn advance_to(&mut self, ts_ms: f64) {
        self.inner.set_time_ms(ts_ms);
    }

    /// Current clock in milliseconds.
    #[wasm_bindgen(js_name = nowMs)]
    pub fn now_ms(&self) -> f64 {
        self.inner.now_ms()
    }

    /// Viewport resized; `layout_json` is the fresh track measurement or `""`.
    pub fn resize(&mut self, width: f64, layout_json: &str) {
        self.inner.resize(width, layout_json);
    }

    /// Take pending commands as a JSON array string.
    #[wasm_bindgen(js_name = drainCommands)]
    pub fn drain_commands(&mut self) -> String {
        self.inner.take_commands_json()
    }
}
