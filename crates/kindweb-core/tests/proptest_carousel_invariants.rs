//! Property-based invariant tests for the causes carousel.
//!
//! 1. The settled offset stays inside `[0, max_scroll]` after every input
//! 2. Auto-advance never runs while every card fits
//! 3. No scroll command is issued while a previous scroll is settling
//! 4. Display state never carries NaN and progress stays within 0..=100
//! 5. Re-applying the same layout emits nothing
//! 6. Auto-advance never runs while a drag, focus or hover suspends it

use core::time::Duration;

use kindweb_core::carousel::{CarouselCommand, CarouselController, CarouselElements, TrackLayout};
use kindweb_core::config::CarouselConfig;
use kindweb_core::input::{CarouselButton, CarouselInput, Key, Modifiers};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Geometry {
    cards: usize,
    card_width: f64,
    gap: f64,
    client_width: f64,
}

impl Geometry {
    fn layout(&self, scroll_left: f64) -> TrackLayout {
        let content = self.cards as f64 * (self.card_width + self.gap) - self.gap;
        TrackLayout {
            scroll_left,
            scroll_width: content.max(self.client_width),
            client_width: self.client_width,
            first_card_width: Some(self.card_width),
            gap: Some(self.gap),
        }
    }
}

fn geometry_strategy() -> impl Strategy<Value = Geometry> {
    (1usize..10, 100u32..400, 0u32..40, 300u32..1400).prop_map(|(cards, w, gap, client)| Geometry {
        cards,
        card_width: f64::from(w),
        gap: f64::from(gap),
        client_width: f64::from(client),
    })
}

#[derive(Debug, Clone)]
enum Op {
    PointerDown(f64),
    PointerMove(f64),
    PointerUp,
    TouchStart(f64, f64),
    TouchMove(f64, f64),
    TouchEnd(f64, f64),
    Wheel(f64, f64, bool),
    Key(Key),
    Scroll(f64),
    ScrollEnd,
    Button(bool),
    Hover(bool),
    Advance(u64),
    Relayout(f64),
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::ArrowLeft),
        Just(Key::ArrowRight),
        Just(Key::Home),
        Just(Key::End),
        Just(Key::Tab),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-500.0..2000.0f64).prop_map(Op::PointerDown),
        (-500.0..2000.0f64).prop_map(Op::PointerMove),
        Just(Op::PointerUp),
        (0.0..1500.0f64, 0.0..900.0f64).prop_map(|(x, y)| Op::TouchStart(x, y)),
        (0.0..1500.0f64, 0.0..900.0f64).prop_map(|(x, y)| Op::TouchMove(x, y)),
        (0.0..1500.0f64, 0.0..900.0f64).prop_map(|(x, y)| Op::TouchEnd(x, y)),
        (-300.0..300.0f64, -300.0..300.0f64, any::<bool>())
            .prop_map(|(dx, dy, shift)| Op::Wheel(dx, dy, shift)),
        key_strategy().prop_map(Op::Key),
        (-200.0..4000.0f64).prop_map(Op::Scroll),
        Just(Op::ScrollEnd),
        any::<bool>().prop_map(Op::Button),
        any::<bool>().prop_map(Op::Hover),
        (0u64..6000).prop_map(Op::Advance),
        (-200.0..4000.0f64).prop_map(Op::Relayout),
    ]
}

fn to_input(op: &Op) -> Option<CarouselInput> {
    Some(match *op {
        Op::PointerDown(x) => CarouselInput::PointerDown { x },
        Op::PointerMove(x) => CarouselInput::PointerMove { x },
        Op::PointerUp => CarouselInput::PointerUp,
        Op::TouchStart(x, y) => CarouselInput::TouchStart { x, y },
        Op::TouchMove(x, y) => CarouselInput::TouchMove { x, y },
        Op::TouchEnd(x, y) => CarouselInput::TouchEnd { x, y },
        Op::Wheel(dx, dy, shift) => CarouselInput::Wheel {
            dx,
            dy,
            mods: if shift { Modifiers::SHIFT } else { Modifiers::empty() },
        },
        Op::Key(key) => CarouselInput::KeyDown { key },
        Op::Scroll(left) => CarouselInput::Scroll { left },
        Op::Button(next) => CarouselInput::Button(if next {
            CarouselButton::Next
        } else {
            CarouselButton::Prev
        }),
        Op::Hover(true) => CarouselInput::ContainerEnter,
        Op::Hover(false) => CarouselInput::ContainerLeave,
        Op::ScrollEnd | Op::Advance(_) | Op::Relayout(_) => return None,
    })
}

fn build(geometry: &Geometry) -> CarouselController {
    CarouselController::new(
        CarouselElements::complete(geometry.cards),
        geometry.layout(0.0),
        CarouselConfig::default(),
    )
    .expect("complete elements")
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn invariants_hold_under_arbitrary_input(
        geometry in geometry_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let mut carousel = build(&geometry);
        let mut now = Duration::ZERO;

        for op in &ops {
            let was_animating = carousel.is_animating();
            let mut may_start_scroll = false;
            match op {
                Op::Advance(ms) => {
                    now += Duration::from_millis(*ms);
                    carousel.advance_to(now);
                    may_start_scroll = true;
                }
                Op::ScrollEnd => {
                    carousel.handle(CarouselInput::ScrollEnd);
                }
                Op::Relayout(left) => carousel.update_layout(geometry.layout(*left)),
                other => {
                    if let Some(input) = to_input(other) {
                        carousel.handle(input);
                    }
                }
            }

            let metrics = carousel.metrics();
            let pos = carousel.scroll_position();
            prop_assert!(pos >= 0.0 && pos <= metrics.max_scroll, "pos {pos} max {}", metrics.max_scroll);

            if carousel.auto_advance_active() {
                prop_assert!(!metrics.all_cards_fit());
                prop_assert!(!carousel.is_dragging() && !carousel.is_touch_dragging());
                prop_assert!(!carousel.is_suspended(), "auto-advance running after {op:?}");
            }

            for cmd in carousel.drain_commands() {
                match cmd {
                    CarouselCommand::ScrollTo { left, .. } => {
                        prop_assert!(left.is_finite());
                        prop_assert!(
                            !was_animating || may_start_scroll,
                            "scroll issued mid-settle by {op:?}"
                        );
                    }
                    CarouselCommand::Display(display) => {
                        prop_assert!(display.progress_percent.is_finite());
                        prop_assert!((0.0..=100.0).contains(&display.progress_percent));
                    }
                    CarouselCommand::SetScrollLeft { left } => {
                        prop_assert!(left >= 0.0 && left <= metrics.max_scroll);
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn relayout_is_idempotent(
        geometry in geometry_strategy(),
        left in 0.0..3000.0f64,
    ) {
        let mut carousel = build(&geometry);
        carousel.update_layout(geometry.layout(left));
        carousel.drain_commands().for_each(drop);
        let before = (carousel.scroll_position(), carousel.auto_advance_active(), carousel.display());

        carousel.update_layout(geometry.layout(left));
        prop_assert_eq!(carousel.drain_commands().count(), 0);
        prop_assert_eq!(
            (carousel.scroll_position(), carousel.auto_advance_active(), carousel.display()),
            before
        );
    }

    #[test]
    fn auto_advance_runs_iff_cards_overflow(geometry in geometry_strategy()) {
        let carousel = build(&geometry);
        let metrics = carousel.metrics();
        prop_assert_eq!(carousel.auto_advance_active(), metrics.card_count > metrics.visible_cards);
    }
}
