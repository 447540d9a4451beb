#![forbid(unsafe_code)]

//! Causes carousel: a horizontally scrolling row of cards with button paging,
//! idle auto-advance, pointer/touch/wheel/keyboard scrolling, and derived
//! display state (button enablement, progress fill, edge fades).
//!
//! # Design
//!
//! The controller never touches the DOM. The host:
//! 1. reports which elements exist ([`CarouselElements`]) and the track's
//!    measurements ([`TrackLayout`]),
//! 2. pushes [`CarouselInput`] events through [`CarouselController::handle`],
//! 3. advances time with [`CarouselController::advance_to`],
//! 4. applies the [`CarouselCommand`]s from [`CarouselController::drain_commands`].
//!
//! # Invariants
//!
//! 1. `0 <= scroll_position <= max_scroll` after every settle.
//! 2. Auto-advance is running iff `card_count > visible_cards` and the
//!    carousel is not suspended: no drag in progress, not focused, not
//!    hovered. Relayouts and scroll inputs never lift a suspension.
//! 3. At most one driver moves the track: a pointer drag, a touch drag, or a
//!    programmatic scroll. Inputs from the others are ignored until it ends.
//! 4. At most one programmatic scroll is in flight. A request arriving while
//!    one is settling is dropped, not queued.
//!
//! # Failure Modes
//!
//! - Missing elements: [`CarouselController::new`] returns `None`.
//! - Unmeasurable first card: the configured fallback pitch (320) is used.
//! - `max_scroll <= 0`: progress reads 0%, or 100% when every card fits.
//! - The settle deadline only approximates the end of a smooth scroll. Hosts
//!   that see `scrollend` should forward [`CarouselInput::ScrollEnd`].

use core::time::Duration;
use std::collections::VecDeque;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::CarouselConfig;
use crate::gesture::classify_swipe;
use crate::input::{CarouselButton, CarouselInput, IgnoredReason, InputOutcome, Key, Modifiers};
use crate::links::NavTarget;
use crate::timer::{Interval, OneShot};

const LOG_TARGET: &str = "kindweb::carousel";

// ---------------------------------------------------------------------------
// Host-reported structure and layout
// ---------------------------------------------------------------------------

/// Which carousel elements the host found in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CarouselElements {
    pub track: bool,
    pub container: bool,
    pub prev_button: bool,
    pub next_button: bool,
    pub progress_fill: bool,
    pub card_count: usize,
}

impl CarouselElements {
    /// All elements present with `card_count` cards.
    #[must_use]
    pub const fn complete(card_count: usize) -> Self {
        Self {
            track: true,
            container: true,
            prev_button: true,
            next_button: true,
            progress_fill: true,
            card_count,
        }
    }

    /// Names of required elements that are absent.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.track, "track"),
            (self.container, "container"),
            (self.prev_button, "prev_button"),
            (self.next_button, "next_button"),
            (self.progress_fill, "progress_fill"),
            (self.card_count > 0, "cards"),
        ]
        .into_iter()
        .filter_map(|(present, name)| (!present).then_some(name))
        .collect()
    }
}

/// Live measurements of the track element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackLayout {
    /// Current `scrollLeft`.
    pub scroll_left: f64,
    /// Track `scrollWidth`.
    pub scroll_width: f64,
    /// Track `clientWidth`.
    pub client_width: f64,
    /// Rendered width of the first card, if it could be measured.
    pub first_card_width: Option<f64>,
    /// Computed CSS `gap` of the track, if it parsed to a number.
    pub gap: Option<f64>,
}

/// Metrics derived from a [`TrackLayout`]. Recomputed on every use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselMetrics {
    pub card_count: usize,
    /// Card pitch: first card width plus gap.
    pub card_width: f64,
    pub max_scroll: f64,
    /// Cards fully visible at once.
    pub visible_cards: usize,
}

impl CarouselMetrics {
    #[must_use]
    pub fn compute(layout: &TrackLayout, card_count: usize, config: &CarouselConfig) -> Self {
        let gap = layout
            .gap
            .filter(|g| g.is_finite() && *g > 0.0)
            .unwrap_or(config.default_gap);
        let card_width = layout
            .first_card_width
            .filter(|w| w.is_finite() && *w > 0.0)
            .map_or(config.fallback_card_width, |w| w + gap);

        let max_scroll = layout.scroll_width - layout.client_width;
        let max_scroll = if max_scroll.is_finite() {
            max_scroll.max(0.0)
        } else {
            0.0
        };

        let visible = layout.client_width / card_width;
        let visible_cards = if visible.is_finite() && visible > 0.0 {
            visible.floor() as usize
        } else {
            0
        };

        Self {
            card_count,
            card_width,
            max_scroll,
            visible_cards,
        }
    }

    /// Every card fits in the viewport; there is nothing to page through.
    #[must_use]
    pub const fn all_cards_fit(&self) -> bool {
        self.card_count <= self.visible_cards
    }

    /// Clamp an offset into `[0, max_scroll]`.
    #[must_use]
    pub fn clamp(&self, offset: f64) -> f64 {
        if offset.is_nan() {
            return 0.0;
        }
        offset.clamp(0.0, self.max_scroll)
    }
}

// ---------------------------------------------------------------------------
// Display state and commands
// ---------------------------------------------------------------------------

/// Progress fill width for `position` within `[0, max_scroll]`, in percent.
///
/// Returns 0 when there is no scroll range.
#[must_use]
pub fn progress_percent(position: f64, max_scroll: f64) -> f64 {
    if max_scroll <= 0.0 || !max_scroll.is_finite() {
        return 0.0;
    }
    (position / max_scroll * 100.0).clamp(0.0, 100.0)
}

/// Derived visual state refreshed after every settle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayState {
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub prev_opacity: f64,
    pub next_opacity: f64,
    pub progress_percent: f64,
    /// Container carries the `at-start` class.
    pub at_start: bool,
    /// Container carries the `at-end` class.
    pub at_end: bool,
}

impl DisplayState {
    fn derive(position: f64, metrics: &CarouselMetrics, config: &CarouselConfig) -> Self {
        let tol = config.edge_tolerance;
        let at_start = position <= tol;
        let at_end = position >= metrics.max_scroll - tol;
        let all_fit = metrics.all_cards_fit();
        let prev_disabled = all_fit || at_start;
        let next_disabled = all_fit || at_end;
        let opacity = |disabled: bool| if disabled { config.disabled_opacity } else { 1.0 };
        Self {
            prev_disabled,
            next_disabled,
            prev_opacity: opacity(prev_disabled),
            next_opacity: opacity(next_disabled),
            progress_percent: if all_fit {
                100.0
            } else {
                progress_percent(position, metrics.max_scroll)
            },
            at_start,
            at_end,
        }
    }
}

/// Host command emitted by the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CarouselCommand {
    /// `track.scrollTo({ left, behavior })`. `left` may lie outside the
    /// scroll range; the browser clamps it.
    ScrollTo { left: f64, smooth: bool },
    /// Direct `track.scrollLeft = left` during a drag.
    SetScrollLeft { left: f64 },
    Display(DisplayState),
    /// `grabbing` while a pointer drag is active, `grab` otherwise.
    SetGrabbing { grabbing: bool },
    /// Raise (or restore) a card's z-order.
    RaiseCard { index: usize, raised: bool },
    /// Brief press feedback on a paging button.
    PressButton { button: CarouselButton },
    /// The donate overlay of card `index` was clicked; the page records the
    /// card's cause and leaves for the donate page.
    SelectCause { index: usize },
    Navigate { target: NavTarget },
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum InputMode {
    Idle,
    PointerDrag {
        start_x: f64,
        start_offset: f64,
    },
    TouchDrag {
        start_x: f64,
        start_y: f64,
        started_at: Duration,
        start_offset: f64,
    },
}

bitflags! {
    /// Non-drag reasons to hold auto-advance.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    struct Hold: u8 {
        const FOCUS = 0b01;
        const HOVER = 0b10;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deadline {
    Settle(Duration),
    AutoAdvance(Duration),
}

/// State and input handling for one carousel instance.
#[derive(Debug, Clone)]
pub struct CarouselController {
    config: CarouselConfig,
    card_count: usize,
    layout: TrackLayout,
    /// Settled offset, always within `[0, max_scroll]`.
    scroll_position: f64,
    /// Best knowledge of the live `scrollLeft`, updated by commands we emit
    /// and by host scroll reports.
    live_offset: f64,
    is_animating: bool,
    settle: OneShot,
    auto_advance: Interval,
    mode: InputMode,
    holds: Hold,
    now: Duration,
    last_display: Option<DisplayState>,
    commands: VecDeque<CarouselCommand>,
}

impl CarouselController {
    /// Build a controller if every required element is present.
    ///
    /// Runs an initial layout pass, so the first display state and the
    /// auto-advance decision are already queued/armed on return.
    #[must_use]
    pub fn new(
        elements: CarouselElements,
        layout: TrackLayout,
        config: CarouselConfig,
    ) -> Option<Self> {
        let missing = elements.missing();
        if !missing.is_empty() {
            debug!(target: LOG_TARGET, ?missing, "carousel elements missing; controller not created");
            return None;
        }
        let auto_advance = Interval::new(config.auto_advance_period());
        let mut controller = Self {
            config,
            card_count: elements.card_count,
            layout,
            scroll_position: 0.0,
            live_offset: 0.0,
            is_animating: false,
            settle: OneShot::new(),
            auto_advance,
            mode: InputMode::Idle,
            holds: Hold::empty(),
            now: Duration::ZERO,
            last_display: None,
            commands: VecDeque::new(),
        };
        controller.push(CarouselCommand::SetGrabbing { grabbing: false });
        controller.update_layout(layout);
        debug!(
            target: LOG_TARGET,
            cards = controller.card_count,
            auto_advance = controller.auto_advance.is_active(),
            "carousel initialized"
        );
        Some(controller)
    }

    // -- read-only state ---------------------------------------------------

    #[must_use]
    pub const fn config(&self) -> &CarouselConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> CarouselMetrics {
        CarouselMetrics::compute(&self.layout, self.card_count, &self.config)
    }

    #[must_use]
    pub const fn layout(&self) -> &TrackLayout {
        &self.layout
    }

    #[must_use]
    pub const fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.is_animating
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.mode, InputMode::PointerDrag { .. })
    }

    #[must_use]
    pub const fn is_touch_dragging(&self) -> bool {
        matches!(self.mode, InputMode::TouchDrag { .. })
    }

    /// A drag, focus or hover is holding auto-advance.
    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        !matches!(self.mode, InputMode::Idle) || !self.holds.is_empty()
    }

    #[must_use]
    pub const fn auto_advance_active(&self) -> bool {
        self.auto_advance.is_active()
    }

    /// When the next auto-advance tick is due, if running.
    #[must_use]
    pub const fn next_auto_advance(&self) -> Option<Duration> {
        self.auto_advance.due()
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Last display state emitted to the host.
    #[must_use]
    pub const fn display(&self) -> Option<DisplayState> {
        self.last_display
    }

    /// Index of the card nearest to the settled offset.
    #[must_use]
    pub fn current_card(&self) -> usize {
        let card_width = self.metrics().card_width;
        (self.scroll_position / card_width).round().max(0.0) as usize
    }

    // -- commands ----------------------------------------------------------

    /// Take all pending host commands in emission order.
    pub fn drain_commands(&mut self) -> impl Iterator<Item = CarouselCommand> + '_ {
        self.commands.drain(..)
    }

    #[must_use]
    pub fn has_pending_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    fn push(&mut self, command: CarouselCommand) {
        self.commands.push_back(command);
    }

    // -- layout ------------------------------------------------------------

    /// Adopt new track measurements, e.g. after a window resize.
    ///
    /// Re-reads the live offset, refreshes display state, and re-evaluates
    /// auto-advance. Calling it twice with the same layout changes nothing.
    pub fn update_layout(&mut self, layout: TrackLayout) {
        self.layout = layout;
        let metrics = self.metrics();
        self.live_offset = metrics.clamp(layout.scroll_left);
        if self.is_animating {
            // Settle adopts the live offset; keep the old settled value until then.
            self.scroll_position = metrics.clamp(self.scroll_position);
        } else {
            self.scroll_position = self.live_offset;
        }
        self.refresh_display();
        self.start_auto_advance();
    }

    // -- time --------------------------------------------------------------

    /// Advance the controller clock to `now`, firing due deadlines in
    /// chronological order. Time never moves backwards.
    pub fn advance_to(&mut self, now: Duration) {
        let now = now.max(self.now);
        loop {
            let settle = self.settle.due().filter(|due| *due <= now);
            let tick = self.auto_advance.due().filter(|due| *due <= now);
            let next = match (settle, tick) {
                (None, None) => break,
                (Some(s), Some(t)) if t < s => Deadline::AutoAdvance(t),
                (Some(s), _) => Deadline::Settle(s),
                (None, Some(t)) => Deadline::AutoAdvance(t),
            };
            match next {
                Deadline::Settle(at) => {
                    self.now = at;
                    self.finish_scroll();
                }
                Deadline::AutoAdvance(at) => {
                    self.now = at;
                    self.auto_advance.consume();
                    self.auto_advance_tick();
                }
            }
        }
        self.now = now;
    }

    // -- programmatic scrolling --------------------------------------------

    /// Guarded scroll to `left`.
    ///
    /// Dropped (returns `false`) while another programmatic scroll is in
    /// flight. The command carries `left` unclamped; the tracked offset is
    /// clamped the way the browser clamps `scrollLeft`.
    pub fn scroll_to_position(&mut self, left: f64, smooth: bool) -> bool {
        if self.is_animating {
            trace!(target: LOG_TARGET, left, "scroll request dropped; previous scroll settling");
            return false;
        }
        self.is_animating = true;
        self.live_offset = self.metrics().clamp(left);
        self.push(CarouselCommand::ScrollTo { left, smooth });
        self.settle
            .arm(self.now.saturating_add(self.config.settle_delay(smooth)));
        true
    }

    /// Scroll so card `index` sits at the left edge. Not clamped here.
    pub fn scroll_to_card(&mut self, index: usize) -> bool {
        let left = index as f64 * self.metrics().card_width;
        self.scroll_to_position(left, true)
    }

    /// Scroll by `amount`, clamped to `[0, max_scroll]`.
    pub fn scroll_by_amount(&mut self, amount: f64) -> bool {
        let metrics = self.metrics();
        let target = metrics.clamp(self.scroll_position + amount);
        self.scroll_to_position(target, true)
    }

    /// Page forward by `page_cards` card widths.
    pub fn scroll_to_next_card(&mut self) -> bool {
        let metrics = self.metrics();
        let page = metrics.card_width * f64::from(self.config.page_cards);
        let amount = page.min(metrics.max_scroll - self.scroll_position);
        self.scroll_by_amount(amount)
    }

    /// Page backward by `page_cards` card widths.
    pub fn scroll_to_prev_card(&mut self) -> bool {
        let metrics = self.metrics();
        let page = metrics.card_width * f64::from(self.config.page_cards);
        let amount = (-page).max(-self.scroll_position);
        self.scroll_by_amount(amount)
    }

    fn finish_scroll(&mut self) {
        self.settle.cancel();
        self.is_animating = false;
        self.scroll_position = self.metrics().clamp(self.live_offset);
        trace!(target: LOG_TARGET, position = self.scroll_position, "scroll settled");
        self.refresh_display();
    }

    fn refresh_display(&mut self) {
        let display = DisplayState::derive(self.scroll_position, &self.metrics(), &self.config);
        if self.last_display != Some(display) {
            self.last_display = Some(display);
            self.push(CarouselCommand::Display(display));
        }
    }

    /// Move the track directly (drag/touch pan) and treat it as settled.
    fn pan_to(&mut self, left: f64) {
        let left = self.metrics().clamp(left);
        self.live_offset = left;
        self.scroll_position = left;
        self.push(CarouselCommand::SetScrollLeft { left });
        self.refresh_display();
    }

    // -- auto-advance ------------------------------------------------------

    fn start_auto_advance(&mut self) {
        let metrics = self.metrics();
        if metrics.all_cards_fit() {
            if self.auto_advance.stop() {
                debug!(
                    target: LOG_TARGET,
                    cards = metrics.card_count,
                    visible = metrics.visible_cards,
                    "all cards fit; auto-advance disabled"
                );
            }
            return;
        }
        if self.is_suspended() {
            return;
        }
        if self.auto_advance.start(self.now) {
            trace!(target: LOG_TARGET, due = ?self.auto_advance.due(), "auto-advance started");
        }
    }

    fn stop_auto_advance(&mut self) {
        if self.auto_advance.stop() {
            trace!(target: LOG_TARGET, "auto-advance suspended");
        }
    }

    fn reset_auto_advance(&mut self) {
        self.auto_advance.stop();
        self.start_auto_advance();
    }

    fn auto_advance_tick(&mut self) {
        let metrics = self.metrics();
        if self.scroll_position >= metrics.max_scroll - self.config.edge_tolerance {
            debug!(target: LOG_TARGET, "auto-advance wrapped to start");
            self.scroll_to_position(0.0, true);
        } else {
            self.scroll_to_next_card();
        }
    }

    // -- input dispatch ----------------------------------------------------

    /// Dispatch one host input.
    pub fn handle(&mut self, input: CarouselInput) -> InputOutcome {
        match input {
            CarouselInput::PointerDown { x } => self.pointer_down(x),
            CarouselInput::PointerMove { x } => self.pointer_move(x),
            CarouselInput::PointerUp => self.pointer_release(),
            CarouselInput::PointerLeave => {
                if self.is_dragging() {
                    self.pointer_release()
                } else {
                    InputOutcome::Ignored(IgnoredReason::NotDragging)
                }
            }
            CarouselInput::TouchStart { x, y } => self.touch_start(x, y),
            CarouselInput::TouchMove { x, y } => self.touch_move(x, y),
            CarouselInput::TouchEnd { x, .. } => self.touch_end(Some(x)),
            CarouselInput::TouchCancel => self.touch_end(None),
            CarouselInput::Wheel { dx, dy, mods } => self.wheel(dx, dy, mods),
            CarouselInput::KeyDown { key } => self.key_down(key),
            CarouselInput::Scroll { left } => self.scroll_reported(left),
            CarouselInput::ScrollEnd => {
                if self.is_animating {
                    self.finish_scroll();
                    InputOutcome::HANDLED
                } else {
                    InputOutcome::Ignored(IgnoredReason::NotAnimating)
                }
            }
            CarouselInput::Focus => self.hold(Hold::FOCUS, true),
            CarouselInput::Blur => self.hold(Hold::FOCUS, false),
            CarouselInput::ContainerEnter => self.hold(Hold::HOVER, true),
            CarouselInput::ContainerLeave => self.hold(Hold::HOVER, false),
            CarouselInput::Button(button) => self.button(button),
            CarouselInput::CardActivate {
                index,
                from_donate_overlay,
            } => self.card_activate(index, from_donate_overlay),
            CarouselInput::CardHover { index, entered } => {
                if index >= self.card_count {
                    return InputOutcome::Ignored(IgnoredReason::UnknownCard);
                }
                self.push(CarouselCommand::RaiseCard {
                    index,
                    raised: entered,
                });
                InputOutcome::HANDLED
            }
        }
    }

    fn hold(&mut self, hold: Hold, on: bool) -> InputOutcome {
        self.holds.set(hold, on);
        if on {
            self.stop_auto_advance();
        } else {
            self.start_auto_advance();
        }
        InputOutcome::HANDLED
    }

    const fn manual_input_active(&self) -> bool {
        !matches!(self.mode, InputMode::Idle)
    }

    fn pointer_down(&mut self, x: f64) -> InputOutcome {
        if self.is_touch_dragging() {
            return InputOutcome::Ignored(IgnoredReason::OtherInputActive);
        }
        self.mode = InputMode::PointerDrag {
            start_x: x,
            start_offset: self.live_offset,
        };
        self.push(CarouselCommand::SetGrabbing { grabbing: true });
        self.stop_auto_advance();
        InputOutcome::HANDLED
    }

    fn pointer_move(&mut self, x: f64) -> InputOutcome {
        let InputMode::PointerDrag {
            start_x,
            start_offset,
        } = self.mode
        else {
            return InputOutcome::Ignored(IgnoredReason::NotDragging);
        };
        if self.is_animating {
            return InputOutcome::Ignored(IgnoredReason::Animating);
        }
        let walk = (x - start_x) * self.config.drag_sensitivity;
        self.pan_to(start_offset - walk);
        InputOutcome::CAPTURED
    }

    fn pointer_release(&mut self) -> InputOutcome {
        if !self.is_dragging() {
            return InputOutcome::Ignored(IgnoredReason::NotDragging);
        }
        self.mode = InputMode::Idle;
        self.push(CarouselCommand::SetGrabbing { grabbing: false });
        self.reset_auto_advance();
        InputOutcome::HANDLED
    }

    fn touch_start(&mut self, x: f64, y: f64) -> InputOutcome {
        if self.is_dragging() {
            return InputOutcome::Ignored(IgnoredReason::OtherInputActive);
        }
        self.mode = InputMode::TouchDrag {
            start_x: x,
            start_y: y,
            started_at: self.now,
            start_offset: self.live_offset,
        };
        self.stop_auto_advance();
        InputOutcome::HANDLED
    }

    fn touch_move(&mut self, x: f64, y: f64) -> InputOutcome {
        let InputMode::TouchDrag {
            start_x,
            start_y,
            start_offset,
            ..
        } = self.mode
        else {
            return InputOutcome::Ignored(IgnoredReason::NotDragging);
        };
        let diff_x = start_x - x;
        let diff_y = (start_y - y).abs();
        if !(diff_x.abs() > diff_y && diff_x.abs() > self.config.touch_pan_threshold) {
            return InputOutcome::Ignored(IgnoredReason::NotHorizontal);
        }
        if self.is_animating {
            return InputOutcome::Ignored(IgnoredReason::Animating);
        }
        self.pan_to(start_offset + diff_x * self.config.drag_sensitivity);
        InputOutcome::CAPTURED
    }

    /// Release (or cancel, when `end_x` is `None`) a touch drag and snap.
    fn touch_end(&mut self, end_x: Option<f64>) -> InputOutcome {
        let InputMode::TouchDrag {
            start_x,
            started_at,
            ..
        } = self.mode
        else {
            return InputOutcome::Ignored(IgnoredReason::NotDragging);
        };
        self.mode = InputMode::Idle;

        let card_width = self.metrics().card_width;
        let nearest = (self.live_offset / card_width).round();
        let swipe = end_x.and_then(|end_x| {
            let elapsed = self.now.saturating_sub(started_at);
            classify_swipe(start_x - end_x, elapsed, &self.config.swipe)
        });
        let target_index = match swipe {
            Some(direction) => nearest + direction.step() as f64,
            None => nearest,
        };
        debug!(
            target: LOG_TARGET,
            ?swipe,
            target_index,
            "touch released"
        );
        self.scroll_to_position(target_index * card_width, true);
        self.reset_auto_advance();
        InputOutcome::HANDLED
    }

    fn wheel(&mut self, dx: f64, dy: f64, mods: Modifiers) -> InputOutcome {
        if self.manual_input_active() {
            return InputOutcome::Ignored(IgnoredReason::OtherInputActive);
        }
        let horizontal = dx.abs() > dy.abs();
        let shift = mods.contains(Modifiers::SHIFT);
        if !(horizontal || shift) {
            return InputOutcome::Ignored(IgnoredReason::NotHorizontal);
        }
        let delta = if shift { dy } else { dx };
        self.scroll_by_amount(delta * self.config.wheel_multiplier);
        self.reset_auto_advance();
        InputOutcome::CAPTURED
    }

    fn key_down(&mut self, key: Key) -> InputOutcome {
        if self.manual_input_active() {
            return InputOutcome::Ignored(IgnoredReason::OtherInputActive);
        }
        match key {
            Key::ArrowLeft => {
                self.scroll_to_prev_card();
            }
            Key::ArrowRight => {
                self.scroll_to_next_card();
            }
            Key::Home => {
                self.scroll_to_position(0.0, true);
            }
            Key::End => {
                let max = self.metrics().max_scroll;
                self.scroll_to_position(max, true);
            }
            _ => return InputOutcome::Ignored(IgnoredReason::UnhandledKey),
        }
        self.reset_auto_advance();
        InputOutcome::CAPTURED
    }

    fn scroll_reported(&mut self, left: f64) -> InputOutcome {
        self.live_offset = self.metrics().clamp(left);
        if self.is_animating {
            // Adopted on settle.
            return InputOutcome::HANDLED;
        }
        self.scroll_position = self.live_offset;
        self.refresh_display();
        InputOutcome::HANDLED
    }

    fn button(&mut self, button: CarouselButton) -> InputOutcome {
        if self.manual_input_active() {
            return InputOutcome::Ignored(IgnoredReason::OtherInputActive);
        }
        match button {
            CarouselButton::Prev => self.scroll_to_prev_card(),
            CarouselButton::Next => self.scroll_to_next_card(),
        };
        self.reset_auto_advance();
        self.push(CarouselCommand::PressButton { button });
        InputOutcome::HANDLED
    }

    fn card_activate(&mut self, index: usize, from_donate_overlay: bool) -> InputOutcome {
        if index >= self.card_count {
            return InputOutcome::Ignored(IgnoredReason::UnknownCard);
        }
        if from_donate_overlay {
            self.push(CarouselCommand::SelectCause { index });
            return InputOutcome::CAPTURED;
        }
        if self.manual_input_active() {
            return InputOutcome::Ignored(IgnoredReason::OtherInputActive);
        }
        let metrics = self.metrics();
        let card_left = index as f64 * metrics.card_width;
        let centered =
            card_left - self.layout.client_width / 2.0 + metrics.card_width / 2.0;
        self.scroll_to_position(metrics.clamp(centered), true);
        self.reset_auto_advance();
        self.push(CarouselCommand::Navigate {
            target: NavTarget::Causes,
        });
        InputOutcome::CAPTURED
    }
}
