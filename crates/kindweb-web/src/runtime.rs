#![forbid(unsafe_code)]

//! One page's worth of components behind a single input/command interface.
//!
//! The host constructs a [`PageRuntime`] from the elements it found, then
//! per frame: pushes inputs, advances time, and drains [`PageCommand`]s.
//! Cross-component effects (form notifications, cause selection before the
//! donate redirect) are resolved here so the host only applies DOM changes.

use core::time::Duration;
use std::collections::VecDeque;

use kindweb_core::carousel::{CarouselCommand, CarouselController, CarouselElements, TrackLayout};
use kindweb_core::config::{ConfigError, SiteConfig};
use kindweb_core::counter::{CounterCommand, StatCounters};
use kindweb_core::effects::{EffectsCommand, EffectsInput, PageEffects};
use kindweb_core::form::{ContactForm, FormCommand, FormInput};
use kindweb_core::input::{CarouselInput, IgnoredReason, InputOutcome};
use kindweb_core::links::{ContactOption, NavTarget, SocialPlatform, select_cause_and_donate};
use kindweb_core::nav::{MobileNavDrawer, NavCommand, NavInput, NavLink};
use kindweb_core::notify::{NotificationCenter, NotificationId, NotifyCommand};
use kindweb_core::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::DeterministicClock;
use crate::input_parser::{InputParseError, parse_encoded_input};

const LOG_TARGET: &str = "kindweb::runtime";

/// Mobile navigation elements found by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavElements {
    /// Links cloned from the desktop nav; `None` when it was not found.
    pub desktop_links: Option<Vec<NavLink>>,
    /// A header donate button exists to clone into the drawer.
    pub donate_button: bool,
}

/// What the host found in the document at startup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageElements {
    /// Causes carousel elements; `None` when the page has no carousel.
    pub carousel: Option<CarouselElements>,
    pub carousel_layout: TrackLayout,
    /// `data-cause` of each card's donate overlay, by card index.
    pub card_causes: Vec<Option<String>>,
    /// `None` when the hamburger or the drawer is missing.
    pub nav: Option<NavElements>,
    pub contact_form: bool,
}

/// A typed host input routed to one component.
#[derive(Debug, Clone, PartialEq)]
pub enum PageInput {
    Carousel(CarouselInput),
    Nav(NavInput),
    Form(FormInput),
    Effects(EffectsInput),
    /// Window resize with fresh carousel measurements, if the page has one.
    Resize {
        width: f64,
        layout: Option<TrackLayout>,
    },
    NotificationClose { id: NotificationId },
    NotificationTransitionEnd { id: NotificationId },
    /// Stat item `index` scrolled into view showing `text`.
    StatVisible { index: usize, text: String },
    DonateClick { cause: Option<String> },
    SocialClick { platform: String },
    ContactOptionClick { option: String },
}

/// A command for the host, tagged by the component that owns the DOM it
/// touches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "target", content = "command", rename_all = "snake_case")]
pub enum PageCommand {
    Carousel(CarouselCommand),
    Nav(NavCommand),
    Form(FormCommand),
    Notify(NotifyCommand),
    Counter(CounterCommand),
    Effects(EffectsCommand),
    Navigate(NavTarget),
}

/// All page components plus the host's clock and key-value store.
#[derive(Debug)]
pub struct PageRuntime<S> {
    clock: DeterministicClock,
    store: S,
    carousel: Option<CarouselController>,
    card_causes: Vec<Option<String>>,
    nav: Option<MobileNavDrawer>,
    form: Option<ContactForm>,
    notifications: NotificationCenter,
    counters: StatCounters,
    effects: PageEffects,
    outbox: VecDeque<PageCommand>,
}

impl<S: KeyValueStore> PageRuntime<S> {
    /// Build the components the page has elements for.
    pub fn new(config: SiteConfig, elements: PageElements, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let SiteConfig {
            carousel: carousel_config,
            nav: nav_config,
            form: form_config,
            notifications,
            counter,
            effects,
        } = config;

        let carousel = elements.carousel.and_then(|found| {
            CarouselController::new(found, elements.carousel_layout, carousel_config)
        });
        let nav = elements.nav.map(|found| {
            MobileNavDrawer::new(nav_config, found.desktop_links, found.donate_button)
        });
        let form = if elements.contact_form {
            Some(ContactForm::new(form_config)?)
        } else {
            None
        };

        debug!(
            target: LOG_TARGET,
            carousel = carousel.is_some(),
            nav = nav.is_some(),
            form = form.is_some(),
            "page runtime created"
        );

        let mut runtime = Self {
            clock: DeterministicClock::new(),
            store,
            carousel,
            card_causes: elements.card_causes,
            nav,
            form,
            notifications: NotificationCenter::new(notifications),
            counters: StatCounters::new(counter),
            effects: PageEffects::new(effects),
            outbox: VecDeque::new(),
        };
        runtime.collect();
        Ok(runtime)
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn carousel(&self) -> Option<&CarouselController> {
        self.carousel.as_ref()
    }

    #[must_use]
    pub const fn nav(&self) -> Option<&MobileNavDrawer> {
        self.nav.as_ref()
    }

    #[must_use]
    pub const fn form(&self) -> Option<&ContactForm> {
        self.form.as_ref()
    }

    #[must_use]
    pub const fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    #[must_use]
    pub const fn effects(&self) -> &PageEffects {
        &self.effects
    }

    /// Dispatch one typed input.
    pub fn push_input(&mut self, input: PageInput) -> InputOutcome {
        let outcome = self.dispatch(input);
        trace!(target: LOG_TARGET, ?outcome, "input dispatched");
        self.collect();
        outcome
    }

    /// Parse and dispatch one JSON-encoded host input.
    ///
    /// Unknown input kinds yield `Ok(None)`.
    pub fn push_encoded_input(&mut self, json: &str) -> Result<Option<InputOutcome>, InputParseError> {
        Ok(parse_encoded_input(json)?.map(|input| self.push_input(input)))
    }

    /// Set the clock to `now` and fire everything due.
    pub fn advance_to(&mut self, now: Duration) {
        self.clock.set(now);
        let now = self.clock.now();
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.advance_to(now);
        }
        if let Some(nav) = self.nav.as_mut() {
            nav.advance_to(now);
        }
        if let Some(form) = self.form.as_mut() {
            form.advance_to(now);
        }
        self.counters.advance_to(now);
        self.effects.advance_to(now);
        // Before collect: form notifications shown there must see `now`.
        self.notifications.advance_to(now);
        self.collect();
    }

    /// Advance the clock by `dt`.
    pub fn advance_by(&mut self, dt: Duration) {
        self.advance_to(self.clock.now().saturating_add(dt));
    }

    /// Viewport resized: close a wide-screen drawer and relayout the carousel.
    pub fn resize(&mut self, width: f64, layout: Option<TrackLayout>) {
        self.push_input(PageInput::Resize { width, layout });
    }

    /// Take every pending command in emission order.
    pub fn take_commands(&mut self) -> Vec<PageCommand> {
        self.outbox.drain(..).collect()
    }

    /// Take every pending command as a JSON array.
    pub fn take_commands_json(&mut self) -> Result<String, serde_json::Error> {
        let commands = self.take_commands();
        serde_json::to_string(&commands)
    }

    fn dispatch(&mut self, input: PageInput) -> InputOutcome {
        const ABSENT: InputOutcome = InputOutcome::Ignored(IgnoredReason::UnknownTarget);
        match input {
            PageInput::Carousel(input) => self
                .carousel
                .as_mut()
                .map_or(ABSENT, |carousel| carousel.handle(input)),
            PageInput::Nav(input) => self.nav.as_mut().map_or(ABSENT, |nav| nav.handle(input)),
            PageInput::Form(input) => self.form.as_mut().map_or(ABSENT, |form| form.handle(input)),
            PageInput::Effects(input) => {
                self.effects.handle(input);
                InputOutcome::HANDLED
            }
            PageInput::Resize { width, layout } => {
                if let Some(nav) = self.nav.as_mut() {
                    nav.handle(NavInput::Resize { width });
                }
                if let (Some(carousel), Some(layout)) = (self.carousel.as_mut(), layout) {
                    carousel.update_layout(layout);
                }
                InputOutcome::HANDLED
            }
            PageInput::NotificationClose { id } => {
                if self.notifications.dismiss(id) {
                    InputOutcome::HANDLED
                } else {
                    ABSENT
                }
            }
            PageInput::NotificationTransitionEnd { id } => {
                if self.notifications.transition_ended(id) {
                    InputOutcome::HANDLED
                } else {
                    ABSENT
                }
            }
            PageInput::StatVisible { index, text } => self.counters.reveal(index, &text),
            PageInput::DonateClick { cause } => {
                let target = select_cause_and_donate(&mut self.store, cause.as_deref());
                self.outbox.push_back(PageCommand::Navigate(target));
                InputOutcome::CAPTURED
            }
            PageInput::SocialClick { platform } => match SocialPlatform::from_attr(&platform) {
                Some(platform) => {
                    self.outbox.push_back(PageCommand::Navigate(platform.target()));
                    InputOutcome::CAPTURED
                }
                None => ABSENT,
            },
            PageInput::ContactOptionClick { option } => match ContactOption::from_class(&option) {
                Some(option) => {
                    self.outbox.push_back(PageCommand::Navigate(option.target()));
                    InputOutcome::HANDLED
                }
                None => ABSENT,
            },
        }
    }

    /// Move component commands into the outbox, resolving the ones that
    /// involve another component or the store.
    fn collect(&mut self) {
        if let Some(carousel) = self.carousel.as_mut() {
            for command in carousel.drain_commands() {
                match command {
                    CarouselCommand::SelectCause { index } => {
                        let cause = self.card_causes.get(index).cloned().flatten();
                        let target = select_cause_and_donate(&mut self.store, cause.as_deref());
                        self.outbox.push_back(PageCommand::Navigate(target));
                    }
                    CarouselCommand::Navigate { target } => {
                        self.outbox.push_back(PageCommand::Navigate(target));
                    }
                    other => self.outbox.push_back(PageCommand::Carousel(other)),
                }
            }
        }
        if let Some(nav) = self.nav.as_mut() {
            for command in nav.drain_commands() {
                match command {
                    NavCommand::Navigate { target } => {
                        self.outbox.push_back(PageCommand::Navigate(target));
                    }
                    other => self.outbox.push_back(PageCommand::Nav(other)),
                }
            }
        }
        if let Some(form) = self.form.as_mut() {
            for command in form.drain_commands() {
                match command {
                    FormCommand::Notify { message, kind } => {
                        self.notifications.show(message, kind);
                    }
                    other => self.outbox.push_back(PageCommand::Form(other)),
                }
            }
        }
        self.outbox
            .extend(self.counters.drain_commands().map(PageCommand::Counter));
        self.outbox
            .extend(self.effects.drain_commands().map(PageCommand::Effects));
        self.outbox
            .extend(self.notifications.drain_commands().map(PageCommand::Notify));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindweb_core::store::{MemoryStore, SELECTED_CAUSE_KEY};
    use pretty_assertions::assert_eq;

    fn page() -> PageElements {
        PageElements {
            carousel: Some(CarouselElements::complete(6)),
            carousel_layout: TrackLayout {
                scroll_left: 0.0,
                scroll_width: 1920.0,
                client_width: 972.0,
                first_card_width: Some(300.0),
                gap: Some(24.0),
            },
            card_causes: vec![
                Some("food-nutrition".into()),
                Some("animal-rescue".into()),
                None,
            ],
            nav: Some(NavElements::default()),
            contact_form: true,
        }
    }

    fn runtime() -> PageRuntime<MemoryStore> {
        let mut rt = PageRuntime::new(SiteConfig::default(), page(), MemoryStore::new()).unwrap();
        rt.take_commands();
        rt
    }

    #[test]
    fn construction_emits_initial_carousel_state() {
        let mut rt = PageRuntime::new(SiteConfig::default(), page(), MemoryStore::new()).unwrap();
        let commands = rt.take_commands();
        assert!(matches!(
            commands.first(),
            Some(PageCommand::Carousel(CarouselCommand::SetGrabbing { grabbing: false }))
        ));
        assert!(rt.carousel().is_some() && rt.nav().is_some() && rt.form().is_some());
    }

    #[test]
    fn absent_components_ignore_their_inputs() {
        let mut rt =
            PageRuntime::new(SiteConfig::default(), PageElements::default(), MemoryStore::new())
                .unwrap();
        assert_eq!(
            rt.push_input(PageInput::Carousel(CarouselInput::Focus)),
            InputOutcome::Ignored(IgnoredReason::UnknownTarget)
        );
        assert_eq!(
            rt.push_input(PageInput::Nav(NavInput::HamburgerClick)),
            InputOutcome::Ignored(IgnoredReason::UnknownTarget)
        );
    }

    #[test]
    fn donate_overlay_stores_card_cause() {
        let mut rt = runtime();
        rt.push_input(PageInput::Carousel(CarouselInput::CardActivate {
            index: 1,
            from_donate_overlay: true,
        }));
        assert_eq!(
            rt.store().get(SELECTED_CAUSE_KEY).as_deref(),
            Some("animal-rescue")
        );
        assert_eq!(rt.take_commands(), vec![PageCommand::Navigate(NavTarget::Donate)]);
    }

    #[test]
    fn donate_without_cause_clears_selection() {
        let mut rt = runtime();
        rt.push_input(PageInput::DonateClick {
            cause: Some("education".into()),
        });
        rt.push_input(PageInput::Carousel(CarouselInput::CardActivate {
            index: 2,
            from_donate_overlay: true,
        }));
        assert_eq!(rt.store().get(SELECTED_CAUSE_KEY), None);
    }

    #[test]
    fn form_errors_become_notifications() {
        let mut rt = runtime();
        rt.push_input(PageInput::Form(FormInput::Submit {
            data: Default::default(),
        }));
        let commands = rt.take_commands();
        let shown = commands.iter().find_map(|cmd| match cmd {
            PageCommand::Notify(NotifyCommand::Show { message, .. }) => Some(message.as_str()),
            _ => None,
        });
        assert_eq!(shown, Some("Please fill in all required fields."));
        assert_eq!(rt.notifications().entries().len(), 1);
    }

    #[test]
    fn unknown_social_platform_is_ignored() {
        let mut rt = runtime();
        assert_eq!(
            rt.push_input(PageInput::SocialClick {
                platform: "myspace".into()
            }),
            InputOutcome::Ignored(IgnoredReason::UnknownTarget)
        );
        assert!(rt.take_commands().is_empty());
    }

    #[test]
    fn commands_serialize_with_target_and_op() {
        let mut rt = runtime();
        rt.push_input(PageInput::Nav(NavInput::HamburgerClick));
        let json = rt.take_commands_json().unwrap();
        assert_eq!(
            json,
            r#"[{"target":"nav","command":{"op":"set_open","open":true}}]"#
        );
    }
}
