//! Property-based invariant tests for the page runtime.
//!
//! 1. The input parser never panics, whatever the host sends
//! 2. Arbitrary event streams never panic and always drain to a JSON array
//! 3. The runtime clock never runs backwards
//! 4. Determinism: the same stream yields the same commands
//! 5. The selected cause is only ever a value the host supplied

use core::time::Duration;

use kindweb_core::config::SiteConfig;
use kindweb_core::store::{KeyValueStore, MemoryStore, SELECTED_CAUSE_KEY};
use kindweb_web::{PageElements, PageRuntime, parse_encoded_input};
use proptest::prelude::*;

const PAGE: &str = r#"{
    "carousel": {"track": true, "container": true, "prev_button": true, "next_button": true,
                 "progress_fill": true, "card_count": 6},
    "carousel_layout": {"scroll_left": 0, "scroll_width": 1920, "client_width": 972,
                        "first_card_width": 300, "gap": 24},
    "card_causes": ["food-nutrition", "animal-rescue", "education"],
    "nav": {"donate_button": true},
    "contact_form": true
}"#;

const CAUSES: [&str; 3] = ["food-nutrition", "animal-rescue", "education"];

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Input(String),
    Advance(u64),
}

fn input_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (-200i32..1400).prop_map(|x| format!(r#"{{"kind":"pointer_down","x":{x}}}"#)),
        (-200i32..1400).prop_map(|x| format!(r#"{{"kind":"pointer_move","x":{x}}}"#)),
        Just(r#"{"kind":"pointer_up"}"#.to_owned()),
        (0i32..1000, 0i32..800).prop_map(|(x, y)| format!(r#"{{"kind":"touch_start","x":{x},"y":{y}}}"#)),
        (0i32..1000, 0i32..800).prop_map(|(x, y)| format!(r#"{{"kind":"touch_move","x":{x},"y":{y}}}"#)),
        (0i32..1000, 0i32..800).prop_map(|(x, y)| format!(r#"{{"kind":"touch_end","x":{x},"y":{y}}}"#)),
        (-300i32..300, -300i32..300, 0u8..16)
            .prop_map(|(dx, dy, m)| format!(r#"{{"kind":"wheel","dx":{dx},"dy":{dy},"mods":{m}}}"#)),
        prop::sample::select(vec!["ArrowLeft", "ArrowRight", "Home", "End", "Escape", "x"])
            .prop_map(|k| format!(r#"{{"kind":"carousel_key","key":"{k}"}}"#)),
        (-500i32..2500).prop_map(|l| format!(r#"{{"kind":"carousel_scroll","left":{l}}}"#)),
        Just(r#"{"kind":"carousel_scroll_end"}"#.to_owned()),
        prop::sample::select(vec!["prev", "next"])
            .prop_map(|b| format!(r#"{{"kind":"carousel_button","button":"{b}"}}"#)),
        (0usize..8, any::<bool>()).prop_map(|(i, o)| {
            format!(r#"{{"kind":"card_activate","index":{i},"from_donate_overlay":{o}}}"#)
        }),
        Just(r#"{"kind":"hamburger_click"}"#.to_owned()),
        Just(r#"{"kind":"nav_donate"}"#.to_owned()),
        (300i32..1600).prop_map(|w| format!(r#"{{"kind":"resize","width":{w}}}"#)),
        Just(r#"{"kind":"form_submit","data":{}}"#.to_owned()),
        (0u64..6).prop_map(|id| format!(r#"{{"kind":"notification_close","id":{id}}}"#)),
        (0u64..6).prop_map(|id| format!(r#"{{"kind":"notification_transition_end","id":{id}}}"#)),
        (0usize..4).prop_map(|i| format!(r#"{{"kind":"stat_visible","index":{i},"text":"₹2.5 Cr+"}}"#)),
        (0i32..5000).prop_map(|y| {
            format!(r#"{{"kind":"window_scroll","page_y":{y},"scroll_height":6000,"inner_height":900}}"#)
        }),
        Just(r#"{"kind":"scroll_top_click"}"#.to_owned()),
        prop::sample::select(CAUSES.to_vec())
            .prop_map(|c| format!(r#"{{"kind":"donate_click","cause":"{c}"}}"#)),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => input_strategy().prop_map(Op::Input),
        1 => (0u64..3000).prop_map(Op::Advance),
    ]
}

fn runtime() -> PageRuntime<MemoryStore> {
    let elements: PageElements = serde_json::from_str(PAGE).expect("page elements");
    PageRuntime::new(SiteConfig::default(), elements, MemoryStore::new()).expect("valid config")
}

/// Apply `ops`, returning every drained batch.
fn run(rt: &mut PageRuntime<MemoryStore>, ops: &[Op]) -> Vec<String> {
    let mut batches = Vec::new();
    let mut now = Duration::ZERO;
    for op in ops {
        match op {
            Op::Input(json) => {
                rt.push_encoded_input(json).expect("generated inputs are well-formed");
            }
            Op::Advance(ms) => {
                now += Duration::from_millis(*ms);
                rt.advance_to(now);
            }
        }
        batches.push(rt.take_commands_json().expect("commands serialize"));
    }
    batches
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn parser_never_panics(input in ".{0,80}") {
        let _ = parse_encoded_input(&input);
    }

    #[test]
    fn parser_never_panics_on_known_kinds_with_junk(
        kind in prop::sample::select(vec![
            "wheel", "card_key", "resize", "form_blur", "stat_visible", "window_scroll",
        ]),
        junk in "[a-z0-9_:\",{}]{0,40}",
    ) {
        let _ = parse_encoded_input(&format!(r#"{{"kind":"{kind}",{junk}}}"#));
    }

    #[test]
    fn streams_drain_to_json_arrays(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let mut rt = runtime();
        for batch in run(&mut rt, &ops) {
            let value: serde_json::Value = serde_json::from_str(&batch).expect("valid JSON");
            prop_assert!(value.is_array());
        }
    }

    #[test]
    fn clock_is_monotonic(steps in prop::collection::vec(0u64..10_000, 1..30)) {
        let mut rt = runtime();
        let mut max = Duration::ZERO;
        for ms in steps {
            let at = Duration::from_millis(ms);
            rt.advance_to(at);
            max = max.max(at);
            prop_assert_eq!(rt.now(), max);
        }
    }

    #[test]
    fn streams_are_deterministic(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let first = run(&mut runtime(), &ops);
        let second = run(&mut runtime(), &ops);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn selected_cause_comes_from_the_page(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let mut rt = runtime();
        run(&mut rt, &ops);
        if let Some(cause) = rt.store().get(SELECTED_CAUSE_KEY) {
            prop_assert!(CAUSES.contains(&cause.as_str()), "unexpected cause {}", cause);
        }
    }
}
