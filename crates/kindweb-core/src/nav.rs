#![forbid(unsafe_code)]

//! Mobile navigation drawer.
//!
//! Open/closed state for the slide-in drawer, its overlay, and the
//! hamburger toggle. The drawer closes on outside clicks, Escape, resizes to
//! a wide viewport, dismiss swipes, and after any link is followed.

use core::time::Duration;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::NavConfig;
use crate::gesture::is_drawer_dismiss_swipe;
use crate::input::{IgnoredReason, InputOutcome, Key};
use crate::links::NavTarget;
use crate::timer::OneShot;

const LOG_TARGET: &str = "kindweb::nav";

/// One drawer link, cloned from the desktop navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    #[must_use]
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }

    /// Section id for in-page anchors (`#about` → `about`).
    #[must_use]
    pub fn section_id(&self) -> Option<&str> {
        self.href.strip_prefix('#').filter(|id| !id.is_empty())
    }
}

/// Links shown when the page has no desktop navigation to clone.
#[must_use]
pub fn fallback_links() -> Vec<NavLink> {
    vec![
        NavLink::new("Home", "index.html"),
        NavLink::new("About", "#about"),
        NavLink::new("Causes", "#causes"),
        NavLink::new("Impact", "#impact"),
        NavLink::new("Contact", "#contact"),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavInput {
    HamburgerClick,
    /// Any document click while the drawer may be open.
    DocumentClick { inside_drawer: bool, on_hamburger: bool },
    KeyDown { key: Key },
    Resize { width: f64 },
    /// Touch on the drawer, screen coordinates.
    TouchStart { x: f64, y: f64 },
    TouchEnd { x: f64, y: f64 },
    LinkActivate { href: String },
    DonateActivate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NavCommand {
    /// Toggle the `active` classes on drawer, hamburger, and body, and fade
    /// the overlay.
    SetOpen { open: bool },
    ScrollToSection { id: String },
    Navigate { target: NavTarget },
}

#[derive(Debug, Clone)]
pub struct MobileNavDrawer {
    config: NavConfig,
    links: Vec<NavLink>,
    has_donate_button: bool,
    open: bool,
    touch_start: Option<(f64, f64)>,
    donate_redirect: OneShot,
    now: Duration,
    commands: VecDeque<NavCommand>,
}

impl MobileNavDrawer {
    /// Build the drawer content from the desktop links, or the fallback
    /// list when the page has none.
    #[must_use]
    pub fn new(config: NavConfig, desktop_links: Option<Vec<NavLink>>, has_donate_button: bool) -> Self {
        let links = match desktop_links {
            Some(links) => links,
            None => {
                debug!(target: LOG_TARGET, "desktop nav not found; using fallback links");
                fallback_links()
            }
        };
        debug!(target: LOG_TARGET, links = links.len(), has_donate_button, "drawer content ready");
        Self {
            config,
            links,
            has_donate_button,
            open: false,
            touch_start: None,
            donate_redirect: OneShot::new(),
            now: Duration::ZERO,
            commands: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    #[must_use]
    pub const fn redirect_pending(&self) -> bool {
        self.donate_redirect.is_armed()
    }

    pub fn drain_commands(&mut self) -> impl Iterator<Item = NavCommand> + '_ {
        self.commands.drain(..)
    }

    /// Returns whether the state changed.
    pub fn open(&mut self) -> bool {
        self.set_open(true)
    }

    pub fn close(&mut self) -> bool {
        self.set_open(false)
    }

    pub fn toggle(&mut self) -> bool {
        self.set_open(!self.open)
    }

    fn set_open(&mut self, open: bool) -> bool {
        if self.open == open {
            return false;
        }
        self.open = open;
        debug!(target: LOG_TARGET, open, "drawer toggled");
        self.commands.push_back(NavCommand::SetOpen { open });
        true
    }

    /// Fire the delayed donate redirect when due.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = now.max(self.now);
        if self.donate_redirect.fire_if_due(self.now).is_some() {
            self.commands.push_back(NavCommand::Navigate {
                target: NavTarget::Donate,
            });
        }
    }

    pub fn handle(&mut self, input: NavInput) -> InputOutcome {
        match input {
            NavInput::HamburgerClick => {
                self.toggle();
                InputOutcome::CAPTURED
            }
            NavInput::DocumentClick {
                inside_drawer,
                on_hamburger,
            } => {
                if !self.open {
                    return InputOutcome::Ignored(IgnoredReason::Closed);
                }
                if inside_drawer || on_hamburger {
                    return InputOutcome::Ignored(IgnoredReason::InsideDrawer);
                }
                self.close();
                InputOutcome::HANDLED
            }
            NavInput::KeyDown { key: Key::Escape } => {
                if self.close() {
                    InputOutcome::HANDLED
                } else {
                    InputOutcome::Ignored(IgnoredReason::Closed)
                }
            }
            NavInput::KeyDown { .. } => InputOutcome::Ignored(IgnoredReason::UnhandledKey),
            NavInput::Resize { width } => {
                if width <= self.config.wide_viewport_width {
                    return InputOutcome::Ignored(IgnoredReason::NarrowViewport);
                }
                if self.close() {
                    InputOutcome::HANDLED
                } else {
                    InputOutcome::Ignored(IgnoredReason::Closed)
                }
            }
            NavInput::TouchStart { x, y } => {
                self.touch_start = Some((x, y));
                InputOutcome::HANDLED
            }
            NavInput::TouchEnd { x, y } => {
                let start = self.touch_start.take();
                if !self.open {
                    return InputOutcome::Ignored(IgnoredReason::Closed);
                }
                let Some(start) = start else {
                    return InputOutcome::Ignored(IgnoredReason::NotDragging);
                };
                if is_drawer_dismiss_swipe(start, (x, y), self.config.swipe_threshold) {
                    self.close();
                    InputOutcome::HANDLED
                } else {
                    InputOutcome::Ignored(IgnoredReason::BelowThreshold)
                }
            }
            NavInput::LinkActivate { href } => {
                let link = NavLink::new(String::new(), href);
                let outcome = match link.section_id() {
                    Some(id) => {
                        self.commands.push_back(NavCommand::ScrollToSection { id: id.to_owned() });
                        InputOutcome::CAPTURED
                    }
                    None => InputOutcome::HANDLED,
                };
                self.close();
                outcome
            }
            NavInput::DonateActivate => {
                if !self.has_donate_button {
                    return InputOutcome::Ignored(IgnoredReason::UnknownTarget);
                }
                self.close();
                let delay = Duration::from_millis(self.config.donate_redirect_delay_ms);
                self.donate_redirect.arm(self.now.saturating_add(delay));
                InputOutcome::CAPTURED
            }
        }
    }
}
