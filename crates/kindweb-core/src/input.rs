#![forbid(unsafe_code)]

//! Typed input events and dispatch outcomes shared by all page components.
//!
//! DOM event payloads are loosely shaped; the host normalizes them into the
//! small tagged unions defined here (and in the component modules) so that
//! each component has exactly one dispatch function and tests can
//! synthesize events without a browser.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier keys held during an input event.
    ///
    /// Encoded as a compact `u8` bitset (`mods`) in host payloads.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Normalized DOM `KeyboardEvent.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Enter,
    Space,
    Escape,
    Tab,
    Other,
}

impl Key {
    /// Map a DOM `key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "Enter" => Self::Enter,
            " " | "Space" | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            _ => Self::Other,
        }
    }

    /// Keys that activate a focused button-like element.
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Carousel previous/next buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarouselButton {
    Prev,
    Next,
}

/// Input events consumed by [`crate::carousel::CarouselController::handle`].
///
/// Pointer `x` is the page X relative to the track's left edge. Touch
/// coordinates are screen coordinates. Wheel deltas are raw DOM deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselInput {
    PointerDown { x: f64 },
    PointerMove { x: f64 },
    PointerUp,
    /// Pointer left the track; ends a drag that is still pressed.
    PointerLeave,
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd { x: f64, y: f64 },
    TouchCancel,
    Wheel { dx: f64, dy: f64, mods: Modifiers },
    /// Key pressed while the track holds focus.
    KeyDown { key: Key },
    /// Live `scrollLeft` reported by the track's scroll listener.
    Scroll { left: f64 },
    /// Platform `scrollend` notification.
    ScrollEnd,
    Focus,
    Blur,
    /// Pointer entered the carousel container.
    ContainerEnter,
    ContainerLeave,
    Button(CarouselButton),
    /// Card clicked, or Enter/Space pressed on a focused card.
    CardActivate {
        index: usize,
        /// The click landed on the card's donate overlay button.
        from_donate_overlay: bool,
    },
    CardHover { index: usize, entered: bool },
}

/// Why a component declined an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoredReason {
    /// A programmatic scroll is still settling.
    Animating,
    NotAnimating,
    NotDragging,
    /// A pointer or touch drag already drives the track.
    OtherInputActive,
    /// Gesture is mostly vertical; the page keeps its native scroll.
    NotHorizontal,
    UnhandledKey,
    UnknownCard,
    /// Drawer is closed; the input only matters while open.
    Closed,
    /// Click landed inside the drawer or on its toggle.
    InsideDrawer,
    BelowThreshold,
    NarrowViewport,
    /// A submission is already in flight.
    Busy,
    AlreadyAnimated,
    UnknownTarget,
}

/// Outcome of one input dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The input changed state. `prevent_default` asks the host to call
    /// `event.preventDefault()`.
    Handled { prevent_default: bool },
    Ignored(IgnoredReason),
}

impl InputOutcome {
    pub const HANDLED: Self = Self::Handled {
        prevent_default: false,
    };
    pub const CAPTURED: Self = Self::Handled {
        prevent_default: true,
    };

    #[must_use]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled { .. })
    }

    #[must_use]
    pub const fn prevent_default(self) -> bool {
        matches!(
            self,
            Self::Handled {
                prevent_default: true
            }
        )
    }

    #[must_use]
    pub const fn ignored_reason(self) -> Option<IgnoredReason> {
        match self {
            Self::Ignored(reason) => Some(reason),
            Self::Handled { .. } => None,
        }
    }
}
