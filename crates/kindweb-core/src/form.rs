#![forbid(unsafe_code)]

//! Quick contact form: field validation styling and the simulated submit
//! cycle (sending, success panel, reset).

use core::time::Duration;
use std::collections::{BTreeMap, VecDeque};

use regex_lite::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, FormConfig};
use crate::input::{IgnoredReason, InputOutcome};
use crate::notify::NotificationKind;
use crate::timer::OneShot;

const LOG_TARGET: &str = "kindweb::form";

/// Border/shadow styling of one input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    #[default]
    Neutral,
    Focused,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FormPhase {
    #[default]
    Idle,
    /// Button disabled and showing "Sending...".
    Sending,
    /// Form hidden, success panel shown.
    Succeeded,
}

/// Why a submission was rejected. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all required fields.")]
    MissingFields(Vec<String>),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("A message is already being sent.")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    Focus {
        field: String,
    },
    Blur {
        field: String,
        value: String,
        required: bool,
        is_email: bool,
    },
    Submit {
        data: BTreeMap<String, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FormCommand {
    SetFieldStatus { field: String, status: FieldStatus },
    /// Disable the send button and swap its label.
    SetSubmitting { submitting: bool },
    /// Hide the form and show the success panel.
    ShowSuccess,
    /// Clear inputs, restore the button, show the form, neutral styling.
    Reset,
    Notify { message: String, kind: NotificationKind },
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    config: FormConfig,
    email: Regex,
    phase: FormPhase,
    phase_timer: OneShot,
    fields: BTreeMap<String, FieldStatus>,
    last_submission: Option<BTreeMap<String, String>>,
    now: Duration,
    commands: VecDeque<FormCommand>,
}

impl ContactForm {
    pub fn new(config: FormConfig) -> Result<Self, ConfigError> {
        let email = Regex::new(&config.email_pattern)
            .map_err(|err| ConfigError::EmailPattern(err.to_string()))?;
        Ok(Self {
            config,
            email,
            phase: FormPhase::Idle,
            phase_timer: OneShot::new(),
            fields: BTreeMap::new(),
            last_submission: None,
            now: Duration::ZERO,
            commands: VecDeque::new(),
        })
    }

    #[must_use]
    pub const fn phase(&self) -> FormPhase {
        self.phase
    }

    #[must_use]
    pub fn field_status(&self, field: &str) -> FieldStatus {
        self.fields.get(field).copied().unwrap_or_default()
    }

    /// Data of the most recent accepted submission.
    #[must_use]
    pub const fn last_submission(&self) -> Option<&BTreeMap<String, String>> {
        self.last_submission.as_ref()
    }

    pub fn drain_commands(&mut self) -> impl Iterator<Item = FormCommand> + '_ {
        self.commands.drain(..)
    }

    #[must_use]
    pub fn is_valid_email(&self, value: &str) -> bool {
        self.email.is_match(value)
    }

    /// Styling for a field losing focus.
    #[must_use]
    pub fn blur_status(&self, value: &str, required: bool, is_email: bool) -> FieldStatus {
        if required && value.trim().is_empty() {
            FieldStatus::Invalid
        } else if is_email && !value.is_empty() {
            if self.is_valid_email(value) {
                FieldStatus::Valid
            } else {
                FieldStatus::Invalid
            }
        } else if !value.trim().is_empty() {
            FieldStatus::Valid
        } else {
            FieldStatus::Neutral
        }
    }

    fn set_status(&mut self, field: &str, status: FieldStatus) {
        self.fields.insert(field.to_owned(), status);
        self.commands.push_back(FormCommand::SetFieldStatus {
            field: field.to_owned(),
            status,
        });
    }

    fn notify(&mut self, message: String, kind: NotificationKind) {
        self.commands.push_back(FormCommand::Notify { message, kind });
    }

    /// Validate and start sending.
    ///
    /// On rejection the field styling and an error notification are
    /// already queued.
    pub fn submit(&mut self, data: BTreeMap<String, String>) -> Result<(), FormError> {
        if self.phase != FormPhase::Idle {
            return Err(FormError::Busy);
        }

        let mut missing = Vec::new();
        for field in self.config.required_fields.clone() {
            let filled = data.get(&field).is_some_and(|v| !v.trim().is_empty());
            let status = if filled {
                FieldStatus::Valid
            } else {
                missing.push(field.clone());
                FieldStatus::Invalid
            };
            self.set_status(&field, status);
        }
        if !missing.is_empty() {
            let err = FormError::MissingFields(missing);
            self.notify(err.to_string(), NotificationKind::Error);
            return Err(err);
        }

        let email = data.get("email").map_or("", String::as_str);
        if !self.is_valid_email(email) {
            self.set_status("email", FieldStatus::Invalid);
            let err = FormError::InvalidEmail;
            self.notify(err.to_string(), NotificationKind::Error);
            return Err(err);
        }

        debug!(target: LOG_TARGET, fields = data.len(), "contact form submitted");
        self.last_submission = Some(data);
        self.phase = FormPhase::Sending;
        self.commands.push_back(FormCommand::SetSubmitting { submitting: true });
        self.phase_timer
            .arm(self.now.saturating_add(Duration::from_millis(self.config.sending_ms)));
        Ok(())
    }

    pub fn advance_to(&mut self, now: Duration) {
        self.now = now.max(self.now);
        while let Some(at) = self.phase_timer.fire_if_due(self.now) {
            match self.phase {
                FormPhase::Sending => {
                    self.phase = FormPhase::Succeeded;
                    self.commands.push_back(FormCommand::ShowSuccess);
                    self.notify("Message sent successfully!".to_owned(), NotificationKind::Success);
                    self.phase_timer
                        .arm(at.saturating_add(Duration::from_millis(self.config.success_ms)));
                }
                FormPhase::Succeeded => {
                    self.phase = FormPhase::Idle;
                    for status in self.fields.values_mut() {
                        *status = FieldStatus::Neutral;
                    }
                    self.commands.push_back(FormCommand::Reset);
                    self.commands.push_back(FormCommand::SetSubmitting { submitting: false });
                    debug!(target: LOG_TARGET, "contact form reset");
                }
                FormPhase::Idle => {}
            }
        }
    }

    pub fn handle(&mut self, input: FormInput) -> InputOutcome {
        match input {
            FormInput::Focus { field } => {
                self.set_status(&field, FieldStatus::Focused);
                InputOutcome::HANDLED
            }
            FormInput::Blur {
                field,
                value,
                required,
                is_email,
            } => {
                let status = self.blur_status(&value, required, is_email);
                self.set_status(&field, status);
                InputOutcome::HANDLED
            }
            FormInput::Submit { data } => match self.submit(data) {
                Ok(()) => InputOutcome::CAPTURED,
                Err(FormError::Busy) => InputOutcome::Ignored(IgnoredReason::Busy),
                Err(err) => {
                    debug!(target: LOG_TARGET, error = ?err, "contact form rejected");
                    InputOutcome::CAPTURED
                }
            },
        }
    }
}
