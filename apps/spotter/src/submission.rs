#![allow(dead_code)]

//! Lifecycle of one scoring request.
//!
//! ```text
//! Idle | Complete | Failed --start--> Analyzing --finish(Ok)--> Complete
//!                                               --finish(Err)-> Failed
//! ```
//!
//! `start` snapshots the criteria into a payload, so edits made while a
//! request is in flight only affect the next submission. Only one request can
//! be in flight: `start` refuses while `Analyzing`. There is no cancel and no
//! timeout.

use tracing::{info, warn};

use crate::criteria::{Blocked, Criteria};
use crate::files::FileSet;
use crate::payload::{build, Payload, PayloadError};
use crate::scoring_client::{ExchangeError, ResultEntry, ScoringService};

pub const ANALYZING_MESSAGE: &str = "Analyzing resumes...";
pub const COMPLETE_MESSAGE: &str = "Analysis complete!";
pub const ANALYZING_LABEL: &str = "Analyzing...";
pub const READY_LABEL: &str = "Analyze Resumes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ServerError,
    NoResponse,
    RequestSetupError,
}

impl From<&ExchangeError> for FailureKind {
    fn from(err: &ExchangeError) -> Self {
        match err {
            ExchangeError::Server { .. } => FailureKind::ServerError,
            ExchangeError::NoResponse(_) => FailureKind::NoResponse,
            ExchangeError::RequestSetup(_) => FailureKind::RequestSetupError,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Analyzing,
    Complete(Vec<ResultEntry>),
    Failed(FailureKind),
}

/// What the submit button should look like right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: &'static str,
}

/// A started submission: the snapshot to send, or the reason it could not be
/// built.
#[derive(Debug)]
pub struct Pending {
    payload: Result<Payload, PayloadError>,
}

impl Pending {
    /// Performs the exchange. A payload that could not be built never reaches
    /// the network.
    pub async fn run(
        self,
        service: &dyn ScoringService,
    ) -> Result<Vec<ResultEntry>, ExchangeError> {
        match self.payload {
            Ok(payload) => service.score(payload).await,
            Err(e) => Err(ExchangeError::RequestSetup(e.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Submission {
    state: SubmissionState,
    message: Option<String>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.state == SubmissionState::Analyzing
    }

    /// Entries of the last completed submission, empty in any other state.
    pub fn results(&self) -> &[ResultEntry] {
        match &self.state {
            SubmissionState::Complete(entries) => entries,
            _ => &[],
        }
    }

    pub fn check(&self, criteria: &Criteria, files: &FileSet) -> Result<(), Blocked> {
        if self.is_analyzing() {
            return Err(Blocked::InFlight);
        }
        criteria.validate(files)
    }

    pub fn control(&self, criteria: &Criteria, files: &FileSet) -> SubmitControl {
        SubmitControl {
            enabled: self.check(criteria, files).is_ok(),
            label: if self.is_analyzing() {
                ANALYZING_LABEL
            } else {
                READY_LABEL
            },
        }
    }

    /// Enters `Analyzing` and snapshots the payload. Refused without any state
    /// change when the submit control is disabled.
    pub fn start(&mut self, criteria: &Criteria, files: &FileSet) -> Result<Pending, Blocked> {
        self.check(criteria, files)?;

        info!(
            "Submitting {} resumes against {} skills",
            files.len(),
            criteria.skills().len()
        );
        self.state = SubmissionState::Analyzing;
        self.message = Some(ANALYZING_MESSAGE.to_string());

        Ok(Pending {
            payload: build(criteria, files),
        })
    }

    /// Records the outcome of the in-flight exchange.
    pub fn finish(&mut self, outcome: Result<Vec<ResultEntry>, ExchangeError>) {
        if !self.is_analyzing() {
            warn!("Ignoring submission outcome: no analysis in progress");
            return;
        }

        match outcome {
            Ok(entries) => {
                info!("Analysis complete: {} shortlisted", entries.len());
                self.state = SubmissionState::Complete(entries);
                self.message = Some(COMPLETE_MESSAGE.to_string());
            }
            Err(err) => {
                warn!("Analysis failed: {err}");
                self.state = SubmissionState::Failed(FailureKind::from(&err));
                self.message = Some(err.user_message());
            }
        }
    }

    /// `start`, exchange, `finish` in one call.
    pub async fn submit(
        &mut self,
        criteria: &Criteria,
        files: &FileSet,
        service: &dyn ScoringService,
    ) -> Result<(), Blocked> {
        let pending = self.start(criteria, files)?;
        let outcome = pending.run(service).await;
        self.finish(outcome);
        Ok(())
    }
}
