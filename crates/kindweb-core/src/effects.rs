#![forbid(unsafe_code)]

//! Page-level scroll effects: the back-to-top button and its progress
//! ring, hero parallax, eased section scrolling, staggered image reveals,
//! and the top loading bar.

use core::time::Duration;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::ScrollEffectsConfig;
use crate::timer::OneShot;

/// Quadratic ease-in-out over `t` in `[0, 1]`.
#[must_use]
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t < 1.0 {
        0.5 * t * t
    } else {
        let t = t - 1.0;
        -0.5 * (t * (t - 2.0) - 1.0)
    }
}

/// Page progress in percent, 0 when the page does not scroll.
#[must_use]
pub fn page_progress(page_y: f64, scroll_height: f64, inner_height: f64) -> f64 {
    let range = scroll_height - inner_height;
    if range > 0.0 {
        page_y / range * 100.0
    } else {
        0.0
    }
}

/// An in-flight eased window scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScroll {
    from: f64,
    to: f64,
    started_at: Duration,
    duration: Duration,
}

impl SmoothScroll {
    #[must_use]
    pub fn new(from: f64, to: f64, started_at: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
        }
    }

    #[must_use]
    pub const fn target(&self) -> f64 {
        self.to
    }

    /// Position at `now` and whether the scroll has finished.
    #[must_use]
    pub fn sample(&self, now: Duration) -> (f64, bool) {
        let elapsed = now.saturating_sub(self.started_at);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.from + (self.to - self.from) * ease_in_out_quad(t), false)
    }
}

/// Window scroll metrics reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollSnapshot {
    pub page_y: f64,
    pub scroll_height: f64,
    pub inner_height: f64,
    /// Hero section height, when the page has a hero with an image.
    pub hero_height: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LoadingPhase {
    Loading,
    Complete,
    Faded,
    Removed,
}

/// Top-of-page loading progress bar.
#[derive(Debug, Clone)]
pub struct LoadingBar {
    progress: f64,
    cap: f64,
    phase: LoadingPhase,
    fade: OneShot,
    remove: OneShot,
}

impl LoadingBar {
    #[must_use]
    pub fn new(cap: f64) -> Self {
        Self {
            progress: 0.0,
            cap,
            phase: LoadingPhase::Loading,
            fade: OneShot::new(),
            remove: OneShot::new(),
        }
    }

    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.phase == LoadingPhase::Removed
    }

    /// Host tick with a random increment. Never reaches the cap before load.
    pub fn bump(&mut self, amount: f64) -> Option<f64> {
        if self.phase != LoadingPhase::Loading || !amount.is_finite() {
            return None;
        }
        self.progress = (self.progress + amount.max(0.0)).min(self.cap);
        Some(self.progress)
    }

    fn complete(&mut self, now: Duration, fade_after: Duration, remove_after: Duration) -> bool {
        if self.phase != LoadingPhase::Loading {
            return false;
        }
        self.phase = LoadingPhase::Complete;
        self.progress = 100.0;
        let fade_at = now.saturating_add(fade_after);
        self.fade.arm(fade_at);
        self.remove.arm(fade_at.saturating_add(remove_after));
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectsInput {
    /// Window `scroll` event.
    WindowScroll(ScrollSnapshot),
    /// Smooth-scroll to a section whose document top is `target_top`.
    ScrollToSection {
        target_top: f64,
        header_height: Option<f64>,
    },
    ScrollTopClick,
    ImageIntersect { index: usize },
    SectionIntersect { index: usize },
    LoadingTick { amount: f64 },
    PageLoaded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EffectsCommand {
    /// `window.scrollTo(0, y)`.
    ScrollWindow { y: f64 },
    SetScrollTopVisible { visible: bool },
    /// Conic-gradient fill of the back-to-top button.
    SetScrollProgress { percent: f64 },
    /// Hero image `translateY`.
    SetParallax { offset: f64 },
    RevealImage { index: usize },
    RevealSection { index: usize },
    PressScrollTop,
    SetLoadingProgress { percent: f64 },
    FadeLoadingBar,
    RemoveLoadingBar,
}

#[derive(Debug, Clone)]
pub struct PageEffects {
    config: ScrollEffectsConfig,
    last_page_y: f64,
    scroll_top_visible: bool,
    smooth: Option<SmoothScroll>,
    reveals: Vec<(Duration, usize)>,
    revealed_images: Vec<usize>,
    revealed_sections: Vec<usize>,
    loading: LoadingBar,
    now: Duration,
    commands: VecDeque<EffectsCommand>,
}

impl PageEffects {
    #[must_use]
    pub fn new(config: ScrollEffectsConfig) -> Self {
        let loading = LoadingBar::new(config.loading_cap);
        Self {
            config,
            last_page_y: 0.0,
            scroll_top_visible: false,
            smooth: None,
            reveals: Vec::new(),
            revealed_images: Vec::new(),
            revealed_sections: Vec::new(),
            loading,
            now: Duration::ZERO,
            commands: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn scroll_top_visible(&self) -> bool {
        self.scroll_top_visible
    }

    #[must_use]
    pub const fn smooth_scroll(&self) -> Option<&SmoothScroll> {
        self.smooth.as_ref()
    }

    #[must_use]
    pub const fn loading_bar(&self) -> &LoadingBar {
        &self.loading
    }

    pub fn drain_commands(&mut self) -> impl Iterator<Item = EffectsCommand> + '_ {
        self.commands.drain(..)
    }

    /// Start an eased scroll from the last known page offset to `y`.
    ///
    /// Replaces any scroll already in flight.
    pub fn smooth_scroll_to(&mut self, y: f64) {
        let to = y.max(0.0);
        let duration = Duration::from_millis(self.config.smooth_scroll_ms);
        trace!(target: "kindweb::effects", from = self.last_page_y, to, "smooth scroll started");
        self.smooth = Some(SmoothScroll::new(self.last_page_y, to, self.now, duration));
    }

    fn on_scroll(&mut self, snapshot: ScrollSnapshot) {
        self.last_page_y = snapshot.page_y;

        let visible = snapshot.page_y > self.config.scroll_top_threshold;
        if visible != self.scroll_top_visible {
            self.scroll_top_visible = visible;
            self.commands
                .push_back(EffectsCommand::SetScrollTopVisible { visible });
        }
        self.commands.push_back(EffectsCommand::SetScrollProgress {
            percent: page_progress(snapshot.page_y, snapshot.scroll_height, snapshot.inner_height),
        });
        if let Some(hero_height) = snapshot.hero_height
            && snapshot.page_y < hero_height
        {
            self.commands.push_back(EffectsCommand::SetParallax {
                offset: snapshot.page_y * self.config.parallax_rate,
            });
        }
    }

    pub fn handle(&mut self, input: EffectsInput) {
        match input {
            EffectsInput::WindowScroll(snapshot) => self.on_scroll(snapshot),
            EffectsInput::ScrollToSection {
                target_top,
                header_height,
            } => {
                let offset = header_height
                    .filter(|h| *h > 0.0)
                    .unwrap_or(self.config.header_offset);
                self.smooth_scroll_to(target_top - offset);
            }
            EffectsInput::ScrollTopClick => {
                self.commands.push_back(EffectsCommand::PressScrollTop);
                self.smooth_scroll_to(0.0);
            }
            EffectsInput::ImageIntersect { index } => {
                if self.revealed_images.contains(&index) {
                    return;
                }
                self.revealed_images.push(index);
                let delay = Duration::from_millis(self.config.reveal_stagger_ms)
                    .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
                self.reveals.push((self.now.saturating_add(delay), index));
            }
            EffectsInput::SectionIntersect { index } => {
                if !self.revealed_sections.contains(&index) {
                    self.revealed_sections.push(index);
                    self.commands.push_back(EffectsCommand::RevealSection { index });
                }
            }
            EffectsInput::LoadingTick { amount } => {
                if let Some(percent) = self.loading.bump(amount) {
                    self.commands
                        .push_back(EffectsCommand::SetLoadingProgress { percent });
                }
            }
            EffectsInput::PageLoaded => {
                let fade = Duration::from_millis(self.config.loading_fade_delay_ms);
                let remove = Duration::from_millis(self.config.loading_remove_delay_ms);
                if self.loading.complete(self.now, fade, remove) {
                    self.commands
                        .push_back(EffectsCommand::SetLoadingProgress { percent: 100.0 });
                }
            }
        }
    }

    /// Advance to `now`: sample the eased scroll and fire due reveals and
    /// loading-bar steps.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = now.max(self.now);
        let now = self.now;

        if let Some(smooth) = self.smooth {
            let (y, finished) = smooth.sample(now);
            self.last_page_y = y;
            self.commands.push_back(EffectsCommand::ScrollWindow { y });
            if finished {
                self.smooth = None;
            }
        }

        if !self.reveals.is_empty() {
            self.reveals.sort_by_key(|(at, index)| (*at, *index));
            let due = self.reveals.partition_point(|(at, _)| *at <= now);
            for (_, index) in self.reveals.drain(..due) {
                self.commands.push_back(EffectsCommand::RevealImage { index });
            }
        }

        if self.loading.fade.fire_if_due(now).is_some() {
            self.loading.phase = LoadingPhase::Faded;
            self.commands.push_back(EffectsCommand::FadeLoadingBar);
        }
        if self.loading.remove.fire_if_due(now).is_some() {
            self.loading.phase = LoadingPhase::Removed;
            self.commands.push_back(EffectsCommand::RemoveLoadingBar);
        }
    }
}
