#![forbid(unsafe_code)]

//! `kindweb-core` holds the interactive behavior of the foundation site as
//! plain, deterministic state machines.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page (JS) pushes DOM events and layout
//!   measurements; components answer with commands the host applies.
//! - **Deterministic time**: every component advances on an explicit
//!   monotonic `now` supplied by the host. Nothing reads a wall clock.
//! - **No DOM access**: components can be driven natively in tests with
//!   synthesized inputs.
//!
//! The causes carousel ([`carousel::CarouselController`]) is the only
//! component with non-trivial state; the rest is event wiring.

pub mod carousel;
pub mod config;
pub mod counter;
pub mod effects;
pub mod form;
pub mod gesture;
pub mod input;
pub mod links;
pub mod nav;
pub mod notify;
pub mod store;
pub mod timer;

pub use carousel::{
    CarouselCommand, CarouselController, CarouselElements, CarouselMetrics, DisplayState,
    TrackLayout,
};
pub use config::{ConfigError, SiteConfig};
pub use counter::{CounterCommand, StatCounters};
pub use effects::{EffectsCommand, EffectsInput, PageEffects, ScrollSnapshot};
pub use form::{ContactForm, FormCommand, FormError, FormInput};
pub use input::{CarouselButton, CarouselInput, IgnoredReason, InputOutcome, Key, Modifiers};
pub use links::NavTarget;
pub use nav::{MobileNavDrawer, NavCommand, NavInput, NavLink};
pub use notify::{NotificationCenter, NotificationId, NotificationKind, NotifyCommand};
pub use store::{KeyValueStore, MemoryStore, StoreError};
