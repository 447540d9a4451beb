#![forbid(unsafe_code)]

//! Tuning parameters for every page component.
//!
//! Each component owns a config struct whose [`Default`] carries the values
//! the site ships with. [`SiteConfig`] groups them and accepts a partial JSON
//! override from the host; omitted keys keep their defaults.

use core::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating a [`SiteConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse site config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid email pattern: {0}")]
    EmailPattern(String),
    #[error("invalid site config: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Carousel
// ---------------------------------------------------------------------------

/// Swipe classification thresholds for touch release.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Minimum horizontal travel (px) for a distance-based swipe.
    pub min_distance: f64,
    /// A distance-based swipe must complete within this many milliseconds.
    pub max_duration_ms: u64,
    /// Velocity (px/ms) above which any release counts as a swipe.
    pub min_velocity: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            min_distance: 50.0,
            max_duration_ms: 500,
            min_velocity: 0.5,
        }
    }
}

impl SwipeConfig {
    #[must_use]
    pub const fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }
}

/// Tuning knobs for the causes carousel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Card pitch used when the first card cannot be measured.
    pub fallback_card_width: f64,
    /// Inter-card gap used when the computed gap is unusable.
    pub default_gap: f64,
    /// Cards moved per button/keyboard/auto-advance page.
    pub page_cards: u32,
    /// Tolerance (px) for "at start" / "at end" decisions.
    pub edge_tolerance: f64,
    /// Settle delay after a smooth programmatic scroll.
    pub smooth_settle_ms: u64,
    /// Settle delay after an instant programmatic scroll.
    pub instant_settle_ms: u64,
    /// Auto-advance period.
    pub auto_advance_ms: u64,
    /// Drag/touch pan multiplier applied to raw pointer travel.
    pub drag_sensitivity: f64,
    /// Multiplier applied to wheel deltas.
    pub wheel_multiplier: f64,
    /// Horizontal travel (px) before a touch move is treated as a pan.
    pub touch_pan_threshold: f64,
    /// Opacity for disabled prev/next buttons.
    pub disabled_opacity: f64,
    pub swipe: SwipeConfig,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            fallback_card_width: 320.0,
            default_gap: 24.0,
            page_cards: 2,
            edge_tolerance: 5.0,
            smooth_settle_ms: 600,
            instant_settle_ms: 100,
            auto_advance_ms: 5000,
            drag_sensitivity: 1.5,
            wheel_multiplier: 2.0,
            touch_pan_threshold: 10.0,
            disabled_opacity: 0.4,
            swipe: SwipeConfig::default(),
        }
    }
}

impl CarouselConfig {
    #[must_use]
    pub const fn settle_delay(&self, smooth: bool) -> Duration {
        if smooth {
            Duration::from_millis(self.smooth_settle_ms)
        } else {
            Duration::from_millis(self.instant_settle_ms)
        }
    }

    #[must_use]
    pub const fn auto_advance_period(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }
}

// ---------------------------------------------------------------------------
// Nav drawer
// ---------------------------------------------------------------------------

/// Mobile navigation drawer tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Viewports wider than this close an open drawer on resize.
    pub wide_viewport_width: f64,
    /// Travel (px) for a dismiss swipe on the open drawer.
    pub swipe_threshold: f64,
    /// Delay between closing the drawer and leaving for the donate page.
    pub donate_redirect_delay_ms: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            wide_viewport_width: 768.0,
            swipe_threshold: 50.0,
            donate_redirect_delay_ms: 300,
        }
    }
}

// ---------------------------------------------------------------------------
// Contact form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub required_fields: Vec<String>,
    pub email_pattern: String,
    /// Simulated processing time before the success panel shows.
    pub sending_ms: u64,
    /// How long the success panel stays before the form resets.
    pub success_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            required_fields: ["name", "email", "phone", "address", "caseDescription"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            email_pattern: r"^[^\s@]+@[^\s@]+\.[^\s@]+$".to_owned(),
            sending_ms: 2000,
            success_ms: 3000,
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications, counters, scroll effects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub auto_hide_ms: u64,
    /// A hidden toast is dropped after this long even if the host never
    /// reports the end of its slide-out (reduced motion, no transition).
    pub remove_fallback_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            auto_hide_ms: 5000,
            remove_fallback_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub duration_ms: u64,
    pub steps: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            steps: 100,
        }
    }
}

impl CounterConfig {
    /// Interval between counter steps.
    #[must_use]
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.duration_ms) / self.steps.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollEffectsConfig {
    /// Page offset past which the scroll-to-top button shows.
    pub scroll_top_threshold: f64,
    /// Hero image offset per scrolled pixel.
    pub parallax_rate: f64,
    pub smooth_scroll_ms: u64,
    /// Fixed header height subtracted from section scroll targets.
    pub header_offset: f64,
    pub reveal_stagger_ms: u64,
    /// Loading bar never passes this before the load event.
    pub loading_cap: f64,
    pub loading_fade_delay_ms: u64,
    pub loading_remove_delay_ms: u64,
}

impl Default for ScrollEffectsConfig {
    fn default() -> Self {
        Self {
            scroll_top_threshold: 300.0,
            parallax_rate: -0.3,
            smooth_scroll_ms: 800,
            header_offset: 96.0,
            reveal_stagger_ms: 150,
            loading_cap: 95.0,
            loading_fade_delay_ms: 300,
            loading_remove_delay_ms: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// Site
// ---------------------------------------------------------------------------

/// All component configs for one page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub carousel: CarouselConfig,
    pub nav: NavConfig,
    pub form: FormConfig,
    pub notifications: NotificationConfig,
    pub counter: CounterConfig,
    pub effects: ScrollEffectsConfig,
}

impl SiteConfig {
    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall timers or divide by zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.carousel;
        if c.auto_advance_ms == 0 {
            return Err(ConfigError::Invalid("carousel.auto_advance_ms must be > 0".into()));
        }
        if !(c.fallback_card_width.is_finite() && c.fallback_card_width > 0.0) {
            return Err(ConfigError::Invalid(
                "carousel.fallback_card_width must be positive".into(),
            ));
        }
        if !(c.default_gap.is_finite() && c.default_gap >= 0.0) {
            return Err(ConfigError::Invalid("carousel.default_gap must be >= 0".into()));
        }
        if c.page_cards == 0 {
            return Err(ConfigError::Invalid("carousel.page_cards must be > 0".into()));
        }
        if self.counter.steps == 0 || self.counter.duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "counter.steps and counter.duration_ms must be > 0".into(),
            ));
        }
        regex_lite::Regex::new(&self.form.email_pattern)
            .map_err(|err| ConfigError::EmailPattern(err.to_string()))?;
        Ok(())
    }
}
