//! # Uniqueness Check
//!
//! A text is submitted once and then polled until the service reports a
//! result. Polling is an explicit state machine ([`UniquenessPoll`]) driven by
//! ticks, so the backoff schedule is testable without a clock:
//!
//! ```text
//! Submitted ──wait──▶ Pending ──status──▶ Pending | Done | Failed | TimedOut
//! ```
//!
//! The delay starts at four seconds, grows by two seconds while the service
//! is still processing and by one second on an inconclusive reply, and never
//! exceeds ten seconds. Polling gives up once five minutes have been waited.
//!
//! The same service answers balance queries; see [`parse_balance_reply`].

pub mod reply;

use std::time::Duration;

use serde::Serialize;

use crate::error::{SinkError, UniquenessError};
use crate::render::DocumentSink;

pub use reply::{
    ACCOUNT_ENDPOINT, ENDPOINT, REPORT_BASE, STILL_PROCESSING, account_form, balance_line,
    group_digits, parse_balance_reply, parse_status_reply, parse_submit_reply, status_form,
    submit_form,
};

pub const MIN_TEXT_CHARS: usize = 200;
pub const INITIAL_DELAY: Duration = Duration::from_secs(4);
pub const PROCESSING_STEP: Duration = Duration::from_secs(2);
pub const INCONCLUSIVE_STEP: Duration = Duration::from_secs(1);
pub const MAX_DELAY: Duration = Duration::from_secs(10);
pub const MAX_WAIT: Duration = Duration::from_secs(300);

/// One status reply of the uniqueness service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReply {
    /// The check is still running.
    Processing,
    Rejected {
        code: i64,
        description: String,
    },
    /// The check finished; `unique` is the score as reported.
    Checked {
        unique: String,
    },
    /// Neither an error nor a result.
    Inconclusive,
}

/// A finished uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniquenessReport {
    pub uid: String,
    pub unique: String,
}

impl UniquenessReport {
    /// The reported score as a number, if it is one.
    pub fn percent(&self) -> Option<f64> {
        let raw = self.unique.trim();
        if raw.is_empty() {
            return Some(0.0);
        }
        raw.parse().ok()
    }

    /// `87.50%` for numeric scores, the raw value otherwise.
    pub fn display_unique(&self) -> String {
        match self.percent() {
            Some(p) => format!("{p:.2}%"),
            None => self.unique.clone(),
        }
    }

    pub fn report_url(&self) -> String {
        format!("{REPORT_BASE}{}", self.uid)
    }

    /// The paragraphs appended to a checked document.
    pub fn summary_lines(&self) -> [String; 2] {
        [
            format!("✅ Уникальность текста: {}", self.display_unique()),
            format!("🔗 Отчёт: {}", self.report_url()),
        ]
    }

    /// Appends an empty paragraph and the summary lines to `sink`.
    pub fn append_to<S: DocumentSink>(&self, sink: &mut S) -> Result<(), SinkError> {
        sink.append_empty_paragraph()?;
        for line in self.summary_lines() {
            sink.append_paragraph(&line)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    Submitted,
    Pending { delay: Duration, elapsed: Duration },
    Done(UniquenessReport),
    Failed { code: i64, description: String },
    TimedOut { elapsed: Duration },
}

/// Poll schedule for one submitted text.
#[derive(Debug, Clone, PartialEq)]
pub struct UniquenessPoll {
    uid: String,
    state: PollState,
}

impl UniquenessPoll {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            state: PollState::Submitted,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        !matches!(
            self.state,
            PollState::Submitted | PollState::Pending { .. }
        )
    }

    fn schedule(&self) -> Option<(Duration, Duration)> {
        match self.state {
            PollState::Submitted => Some((INITIAL_DELAY, Duration::ZERO)),
            PollState::Pending { delay, elapsed } => Some((delay, elapsed)),
            _ => None,
        }
    }

    /// How long to wait before the next status query; `None` once finished.
    pub fn next_delay(&self) -> Option<Duration> {
        self.schedule().map(|(delay, _)| delay)
    }

    /// Records that `waited` has passed since the last tick.
    pub fn record_wait(&mut self, waited: Duration) {
        if let Some((delay, elapsed)) = self.schedule() {
            self.state = PollState::Pending {
                delay,
                elapsed: elapsed + waited,
            };
        }
    }

    /// Advances the state with a status reply.
    pub fn on_status(&mut self, reply: StatusReply) {
        let Some((delay, elapsed)) = self.schedule() else {
            return;
        };

        let step = match reply {
            StatusReply::Checked { unique } => {
                self.state = PollState::Done(UniquenessReport {
                    uid: self.uid.clone(),
                    unique,
                });
                return;
            }
            StatusReply::Rejected { code, description } => {
                self.state = PollState::Failed { code, description };
                return;
            }
            StatusReply::Processing => PROCESSING_STEP,
            StatusReply::Inconclusive => INCONCLUSIVE_STEP,
        };

        self.state = if elapsed >= MAX_WAIT {
            PollState::TimedOut { elapsed }
        } else {
            PollState::Pending {
                delay: (delay + step).min(MAX_DELAY),
                elapsed,
            }
        };
    }
}

/// Remote uniqueness checker.
pub trait UniquenessService {
    /// Submits `text` and returns its uid.
    fn submit(&self, text: &str) -> Result<String, UniquenessError>;
    fn status(&self, uid: &str) -> Result<StatusReply, UniquenessError>;
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Submits `text` and polls the service until it reports a result.
pub fn check_uniqueness<U, S>(
    service: &U,
    sleeper: &S,
    text: &str,
) -> Result<UniquenessReport, UniquenessError>
where
    U: UniquenessService + ?Sized,
    S: Sleeper + ?Sized,
{
    let text = text.trim();
    let len = text.chars().count();
    if len < MIN_TEXT_CHARS {
        return Err(UniquenessError::TooShort {
            len,
            min: MIN_TEXT_CHARS,
        });
    }

    let mut poll = UniquenessPoll::new(service.submit(text)?);
    log::info!("Submitted {len} chars for uniqueness check as {}", poll.uid());

    loop {
        match poll.state() {
            PollState::Done(report) => {
                log::info!("Uniqueness of {}: {}", report.uid, report.display_unique());
                return Ok(report.clone());
            }
            PollState::Failed { code, description } => {
                return Err(UniquenessError::Rejected {
                    code: Some(*code),
                    description: description.clone(),
                });
            }
            PollState::TimedOut { elapsed } => {
                return Err(UniquenessError::TimedOut { elapsed: *elapsed });
            }
            PollState::Submitted | PollState::Pending { .. } => {}
        }

        if let Some(delay) = poll.next_delay() {
            sleeper.sleep(delay);
            poll.record_wait(delay);
        }
        let reply = service.status(poll.uid())?;
        log::debug!("Uniqueness status for {}: {reply:?}", poll.uid());
        poll.on_status(reply);
    }
}
