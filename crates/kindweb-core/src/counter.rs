#![forbid(unsafe_code)]

//! Impact statistics that count up from zero the first time they scroll
//! into view.
//!
//! Labels look like `₹2.5 Cr+`, `5 Lakh+` or `1200+`. The numeric part is
//! animated in fixed steps and re-rendered with Indian digit grouping and
//! the original unit suffix.

use core::time::Duration;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;
use tracing::trace;

use crate::config::CounterConfig;
use crate::input::{IgnoredReason, InputOutcome};
use crate::timer::Interval;

/// Group an integer the `en-IN` way: `12345678` → `1,23,45,678`.
#[must_use]
pub fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    let lead = head.len() % 2;
    if lead == 1 {
        out.push_str(&head[..1]);
    }
    for (i, pair) in head.as_bytes()[lead..].chunks(2).enumerate() {
        if i > 0 || lead == 1 {
            out.push(',');
        }
        out.extend(pair.iter().map(|b| char::from(*b)));
    }
    out.push(',');
    out.push_str(tail);
    out
}

/// Parsed form of a stat label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatLabel {
    pub rupee: bool,
    pub crore: bool,
    pub lakh: bool,
    pub target: f64,
}

impl StatLabel {
    /// Keep digits and dots, then read the longest numeric prefix.
    /// Returns `None` when no number is present.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let numeric: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        let prefix = match numeric.match_indices('.').nth(1) {
            Some((second_dot, _)) => &numeric[..second_dot],
            None => numeric.as_str(),
        };
        let target: f64 = prefix.parse().ok()?;
        Some(Self {
            rupee: text.contains('₹'),
            crore: text.contains("Cr"),
            lakh: text.contains("Lakh"),
            target,
        })
    }

    /// Render `value` with this label's prefix, grouping and suffix.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        let number = if self.crore || self.lakh {
            let cents = (value.max(0.0) * 100.0).round() as u64;
            let (whole, frac) = (cents / 100, cents % 100);
            if frac == 0 {
                group_indian(whole)
            } else {
                format!("{}.{frac:02}", group_indian(whole))
            }
        } else {
            group_indian(value.max(0.0).round() as u64)
        };

        let mut text = String::new();
        if self.rupee {
            text.push('₹');
        }
        text.push_str(&number);
        if self.crore {
            text.push_str(" Cr+");
        } else if self.lakh {
            text.push_str(" Lakh+");
        } else if !self.rupee {
            text.push('+');
        }
        text
    }
}

/// One running count-up.
#[derive(Debug, Clone)]
pub struct StatCounter {
    label: StatLabel,
    steps: u32,
    step: u32,
    ticker: Interval,
}

impl StatCounter {
    #[must_use]
    pub fn start(label: StatLabel, config: &CounterConfig, now: Duration) -> Self {
        let mut ticker = Interval::new(config.step_interval());
        ticker.start(now);
        Self {
            label,
            steps: config.steps.max(1),
            step: 0,
            ticker,
        }
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.step >= self.steps
    }

    /// Current displayed value.
    #[must_use]
    pub fn value(&self) -> f64 {
        if self.is_finished() {
            self.label.target
        } else {
            self.label.target * f64::from(self.step) / f64::from(self.steps)
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.label.format(self.value())
    }

    /// Apply all steps due by `now`. Returns the new text if any step ran.
    pub fn advance_to(&mut self, now: Duration) -> Option<String> {
        let mut stepped = false;
        while !self.is_finished() && self.ticker.fire_if_due(now).is_some() {
            self.step += 1;
            stepped = true;
        }
        if self.is_finished() {
            self.ticker.stop();
        }
        stepped.then(|| self.text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CounterCommand {
    /// Slide the stat item in.
    Reveal { index: usize },
    SetText { index: usize, text: String },
}

/// All stat items on the page. Each animates at most once.
#[derive(Debug, Clone, Default)]
pub struct StatCounters {
    config: CounterConfig,
    animated: BTreeSet<usize>,
    running: BTreeMap<usize, StatCounter>,
    now: Duration,
    commands: VecDeque<CounterCommand>,
}

impl StatCounters {
    #[must_use]
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn drain_commands(&mut self) -> impl Iterator<Item = CounterCommand> + '_ {
        self.commands.drain(..)
    }

    #[must_use]
    pub fn is_running(&self, index: usize) -> bool {
        self.running.contains_key(&index)
    }

    /// Stat item `index` with label `text` scrolled into view.
    pub fn reveal(&mut self, index: usize, text: &str) -> InputOutcome {
        if !self.animated.insert(index) {
            return InputOutcome::Ignored(IgnoredReason::AlreadyAnimated);
        }
        self.commands.push_back(CounterCommand::Reveal { index });
        let Some(label) = StatLabel::parse(text) else {
            trace!(target: "kindweb::counter", index, text, "stat label has no number");
            return InputOutcome::HANDLED;
        };
        self.running
            .insert(index, StatCounter::start(label, &self.config, self.now));
        InputOutcome::HANDLED
    }

    pub fn advance_to(&mut self, now: Duration) {
        self.now = now.max(self.now);
        let now = self.now;
        let commands = &mut self.commands;
        self.running.retain(|&index, counter| {
            if let Some(text) = counter.advance_to(now) {
                commands.push_back(CounterCommand::SetText { index, text });
            }
            !counter.is_finished()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indian_grouping() {
        assert_eq!(group_indian(0), "0");
        assert_eq!(group_indian(999), "999");
        assert_eq!(group_indian(1200), "1,200");
        assert_eq!(group_indian(12_000), "12,000");
        assert_eq!(group_indian(123_456), "1,23,456");
        assert_eq!(group_indian(12_345_678), "1,23,45,678");
    }

    #[test]
    fn parse_labels() {
        let crore = StatLabel::parse("₹2.5 Cr+").unwrap();
        assert!(crore.rupee && crore.crore && !crore.lakh);
        assert_eq!(crore.target, 2.5);

        let lakh = StatLabel::parse("5 Lakh+").unwrap();
        assert!(lakh.lakh && !lakh.rupee);
        assert_eq!(lakh.target, 5.0);

        assert_eq!(StatLabel::parse("1.2.3 things").unwrap().target, 1.2);
        assert_eq!(StatLabel::parse("Many"), None);
        assert_eq!(StatLabel::parse("."), None);
    }

    #[test]
    fn final_text_formats() {
        let fmt = |s: &str| {
            let label = StatLabel::parse(s).unwrap();
            label.format(label.target)
        };
        assert_eq!(fmt("₹2.5 Cr+"), "₹2.50 Cr+");
        assert_eq!(fmt("5 Lakh+"), "5 Lakh+");
        assert_eq!(fmt("1200+"), "1,200+");
        assert_eq!(fmt("₹15000"), "₹15,000");
    }

    #[test]
    fn counter_reaches_target_in_steps() {
        let config = CounterConfig::default();
        let label = StatLabel::parse("1200+").unwrap();
        let mut counter = StatCounter::start(label, &config, Duration::ZERO);

        assert_eq!(counter.advance_to(Duration::from_millis(19)), None);
        assert_eq!(counter.advance_to(Duration::from_millis(20)).as_deref(), Some("12+"));
        assert_eq!(counter.advance_to(Duration::from_millis(1000)).as_deref(), Some("600+"));
        assert_eq!(counter.advance_to(Duration::from_secs(5)).as_deref(), Some("1,200+"));
        assert!(counter.is_finished());
        assert_eq!(counter.advance_to(Duration::from_secs(6)), None);
    }

    #[test]
    fn board_animates_each_item_once() {
        let mut board = StatCounters::new(CounterConfig::default());
        assert!(board.reveal(0, "500+").is_handled());
        assert_eq!(
            board.reveal(0, "500+"),
            InputOutcome::Ignored(IgnoredReason::AlreadyAnimated)
        );
        assert!(board.reveal(1, "Countless").is_handled());
        assert!(!board.is_running(1));

        board.advance_to(Duration::from_secs(3));
        assert!(!board.is_running(0));
        let cmds: Vec<_> = board.drain_commands().collect();
        assert_eq!(
            cmds,
            vec![
                CounterCommand::Reveal { index: 0 },
                CounterCommand::Reveal { index: 1 },
                CounterCommand::SetText {
                    index: 0,
                    text: "500+".into()
                },
            ]
        );
    }
}
