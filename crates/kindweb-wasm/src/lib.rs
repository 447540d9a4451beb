#![forbid(unsafe_code)]

//! WASM page runner for the foundation site.
//!
//! This crate provides [`SiteRunner`], a `wasm-bindgen`-exported struct that
//! wraps `kindweb_web::PageRuntime` and exposes it to the page script for
//! host-driven execution: the script forwards DOM events as JSON, advances
//! time from `requestAnimationFrame`, and applies the drained commands.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::SiteRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;

#[cfg(test)]
mod tests {
    use crate::runner_core::{BootstrapError, RunnerCore};
    use kindweb_core::store::{KeyValueStore, MemoryStore, SELECTED_CAUSE_KEY};
    use pretty_assertions::assert_eq;

    const ELEMENTS: &str = r#"{
        "carousel": {"track": true, "container": true, "prev_button": true,
                     "next_button": true, "progress_fill": true, "card_count": 4},
        "carousel_layout": {"scroll_left": 0, "scroll_width": 1272, "client_width": 648,
                            "first_card_width": 300, "gap": 24},
        "card_causes": ["education"],
        "nav": {"donate_button": false},
        "contact_form": true
    }"#;

    fn core() -> RunnerCore<MemoryStore> {
        let mut core = RunnerCore::from_bootstrap("", ELEMENTS, MemoryStore::new())
            .expect("bootstrap should succeed");
        core.take_commands_json();
        core
    }

    fn commands(core: &mut RunnerCore<MemoryStore>) -> Vec<serde_json::Value> {
        serde_json::from_str(&core.take_commands_json()).expect("commands should be a JSON array")
    }

    #[test]
    fn runner_core_bootstraps_with_default_config() {
        let mut core = RunnerCore::from_bootstrap("", ELEMENTS, MemoryStore::new())
            .expect("bootstrap should succeed");
        let initial = commands(&mut core);
        assert!(
            initial.iter().any(|c| c["target"] == "carousel"),
            "expected initial carousel state, got: {initial:?}"
        );
    }

    #[test]
    fn runner_core_accepts_partial_config_override() {
        let core = RunnerCore::from_bootstrap(
            r#"{"carousel": {"auto_advance_ms": 8000}}"#,
            ELEMENTS,
            MemoryStore::new(),
        );
        assert!(core.is_ok());
    }

    #[test]
    fn runner_core_rejects_invalid_config() {
        let err = RunnerCore::from_bootstrap(
            r#"{"carousel": {"auto_advance_ms": 0}}"#,
            ELEMENTS,
            MemoryStore::new(),
        )
        .err()
        .expect("zero period should be rejected");
        assert!(matches!(err, BootstrapError::Config(_)), "got {err}");
    }

    #[test]
    fn runner_core_rejects_malformed_elements() {
        let err = RunnerCore::from_bootstrap("", "[1, 2]", MemoryStore::new())
            .err()
            .expect("elements must be an object");
        assert!(matches!(err, BootstrapError::Elements(_)), "got {err}");
    }

    #[test]
    fn runner_core_push_encoded_input() {
        let mut core = core();
        assert!(core.push_encoded_input(r#"{"kind":"hamburger_click"}"#));
        let out = commands(&mut core);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["command"]["op"], "set_open");
    }

    #[test]
    fn runner_core_unknown_input_returns_false() {
        let mut core = core();
        assert!(!core.push_encoded_input(r#"{"kind":"accessibility","screen_reader":true}"#));
    }

    #[test]
    fn runner_core_malformed_input_returns_false() {
        let mut core = core();
        assert!(!core.push_encoded_input("not json"));
        assert!(!core.push_encoded_input(r#"{"kind":"pointer_down"}"#));
    }

    #[test]
    fn runner_core_advance_time_ignores_invalid_inputs() {
        let mut core = core();
        core.advance_time_ms(f64::NAN);
        core.advance_time_ms(f64::INFINITY);
        core.advance_time_ms(-1.0);
        assert_eq!(core.now_ms(), 0.0);
        core.advance_time_ms(16.0);
        assert_eq!(core.now_ms(), 16.0);
    }

    #[test]
    fn runner_core_set_time_handles_invalid_inputs() {
        let mut core = core();
        core.set_time_ms(250.0);
        core.set_time_ms(f64::NAN);
        core.set_time_ms(-5.0);
        assert_eq!(core.now_ms(), 250.0);
    }

    #[test]
    fn runner_core_auto_advances() {
        let mut core = core();
        core.set_time_ms(5000.0);
        let out = commands(&mut core);
        assert!(
            out.iter()
                .any(|c| c["target"] == "carousel" && c["command"]["op"] == "scroll_to"),
            "expected auto-advance scroll, got: {out:?}"
        );
    }

    #[test]
    fn runner_core_resize_tolerates_bad_layout() {
        let mut core = core();
        core.resize(1280.0, "{not json");
        core.resize(1280.0, "");
        core.resize(
            1280.0,
            r#"{"scroll_left":0,"scroll_width":1272,"client_width":1272,"first_card_width":300,"gap":24}"#,
        );
        let out = commands(&mut core);
        assert!(
            out.iter()
                .any(|c| c["target"] == "carousel" && c["command"]["op"] == "display"),
            "expected display refresh, got: {out:?}"
        );
    }

    #[test]
    fn runner_core_persists_selected_cause() {
        let mut core = core();
        assert!(core.push_encoded_input(r#"{"kind":"donate_click","cause":"animal-rescue"}"#));
        assert_eq!(
            core.store().get(SELECTED_CAUSE_KEY).as_deref(),
            Some("animal-rescue")
        );
    }
}
