#![forbid(unsafe_code)]

//! Toast notifications stacked in the top-right corner.
//!
//! Newest first. Each toast hides itself after a fixed delay or when its
//! close button is clicked. A hidden toast stays in the list until the host
//! reports that its slide-out transition finished, or until the removal
//! fallback elapses for hosts that never see `transitionend`.

use core::time::Duration;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::NotificationConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Error,
}

impl NotificationKind {
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Success => "✓",
            Self::Error => "✕",
        }
    }

    /// CSS modifier class on the toast element.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub visible: bool,
    hide_at: Option<Duration>,
    remove_at: Option<Duration>,
}

impl Notification {
    fn hide(&mut self, now: Duration, fallback: Duration) {
        self.visible = false;
        self.hide_at = None;
        self.remove_at = Some(now.saturating_add(fallback));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NotifyCommand {
    /// Prepend a toast to the container (creating the container if needed).
    Show {
        id: NotificationId,
        kind: NotificationKind,
        icon: &'static str,
        message: String,
    },
    /// Slide the toast out.
    Hide { id: NotificationId },
    Remove { id: NotificationId },
}

#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    config: NotificationConfig,
    next_id: u64,
    entries: Vec<Notification>,
    now: Duration,
    commands: VecDeque<NotifyCommand>,
}

impl NotificationCenter {
    #[must_use]
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current toasts, newest first.
    #[must_use]
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.entries.iter().filter(|n| n.visible).count()
    }

    pub fn drain_commands(&mut self) -> impl Iterator<Item = NotifyCommand> + '_ {
        self.commands.drain(..)
    }

    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        let message = message.into();
        let hide_at = self
            .now
            .saturating_add(Duration::from_millis(self.config.auto_hide_ms));
        trace!(target: "kindweb::notify", id = id.0, kind = kind.class(), %message, "notification shown");
        self.commands.push_back(NotifyCommand::Show {
            id,
            kind,
            icon: kind.icon(),
            message: message.clone(),
        });
        self.entries.insert(
            0,
            Notification {
                id,
                kind,
                message,
                visible: true,
                hide_at: Some(hide_at),
                remove_at: None,
            },
        );
        id
    }

    /// Close-button click: hide now and cancel the auto-hide.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let fallback = self.remove_fallback();
        let Some(entry) = self.entries.iter_mut().find(|n| n.id == id && n.visible) else {
            return false;
        };
        entry.hide(self.now, fallback);
        self.commands.push_back(NotifyCommand::Hide { id });
        true
    }

    /// Host finished the slide-out; drop the toast.
    pub fn transition_ended(&mut self, id: NotificationId) -> bool {
        let Some(pos) = self.entries.iter().position(|n| n.id == id && !n.visible) else {
            return false;
        };
        self.entries.remove(pos);
        self.commands.push_back(NotifyCommand::Remove { id });
        true
    }

    pub fn advance_to(&mut self, now: Duration) {
        self.now = now.max(self.now);
        let fallback = self.remove_fallback();
        // Oldest deadlines sit at the back.
        for entry in self.entries.iter_mut().rev() {
            if let Some(at) = entry.hide_at
                && at <= self.now
            {
                // Removal is measured from the deadline, not from `now`.
                entry.hide(at, fallback);
                self.commands.push_back(NotifyCommand::Hide { id: entry.id });
            }
        }
        let now = self.now;
        let commands = &mut self.commands;
        self.entries.retain(|entry| {
            let expired = entry.remove_at.is_some_and(|at| at <= now);
            if expired {
                trace!(target: "kindweb::notify", id = entry.id.0, "notification removed without transition end");
                commands.push_back(NotifyCommand::Remove { id: entry.id });
            }
            !expired
        });
    }

    fn remove_fallback(&self) -> Duration {
        Duration::from_millis(self.config.remove_fallback_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn newest_first_with_icons() {
        let mut center = NotificationCenter::new(NotificationConfig::default());
        center.show("first", NotificationKind::Info);
        let second = center.show("second", NotificationKind::Error);
        assert_eq!(center.entries()[0].id, second);
        assert_eq!(center.entries()[1].message, "first");

        let shown: Vec<_> = center
            .drain_commands()
            .filter_map(|cmd| match cmd {
                NotifyCommand::Show { icon, .. } => Some(icon),
                _ => None,
            })
            .collect();
        assert_eq!(shown, vec!["ℹ", "✕"]);
    }

    #[test]
    fn auto_hides_after_delay_then_removed_on_transition() {
        let mut center = NotificationCenter::new(NotificationConfig::default());
        let id = center.show("Message sent successfully!", NotificationKind::Success);
        center.drain_commands().for_each(drop);

        center.advance_to(Duration::from_millis(4999));
        assert_eq!(center.visible_count(), 1);
        center.advance_to(Duration::from_millis(5000));
        assert_eq!(center.visible_count(), 0);
        assert_eq!(center.drain_commands().collect::<Vec<_>>(), vec![NotifyCommand::Hide { id }]);

        assert!(center.transition_ended(id));
        assert!(center.entries().is_empty());
        assert!(!center.transition_ended(id));
    }

    #[test]
    fn dismiss_cancels_auto_hide() {
        let mut center = NotificationCenter::new(NotificationConfig::default());
        let id = center.show("x", NotificationKind::Info);
        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        center.drain_commands().for_each(drop);
        center.advance_to(Duration::from_secs(10));
        assert_eq!(
            center.drain_commands().collect::<Vec<_>>(),
            vec![NotifyCommand::Remove { id }],
            "no second hide"
        );
    }

    #[test]
    fn hidden_toast_removed_without_transition_end() {
        let mut center = NotificationCenter::new(NotificationConfig::default());
        let dismissed = center.show("closed by hand", NotificationKind::Info);
        center.advance_to(Duration::from_millis(200));
        let expired = center.show("left alone", NotificationKind::Info);
        assert!(center.dismiss(dismissed));
        center.drain_commands().for_each(drop);

        center.advance_to(Duration::from_millis(1199));
        assert_eq!(center.entries().len(), 2);
        center.advance_to(Duration::from_millis(1200));
        assert_eq!(
            center.drain_commands().collect::<Vec<_>>(),
            vec![NotifyCommand::Remove { id: dismissed }]
        );

        // Hidden at 5200, dropped at 6200 even though the host stalls.
        center.advance_to(Duration::from_secs(60));
        assert_eq!(
            center.drain_commands().collect::<Vec<_>>(),
            vec![
                NotifyCommand::Hide { id: expired },
                NotifyCommand::Remove { id: expired },
            ]
        );
        assert!(center.entries().is_empty());
        assert!(!center.transition_ended(expired));
    }

    #[test]
    fn transition_end_ignored_while_visible() {
        let mut center = NotificationCenter::new(NotificationConfig::default());
        let id = center.show("x", NotificationKind::Info);
        assert!(!center.transition_ended(id));
        assert_eq!(center.entries().len(), 1);
    }
}
