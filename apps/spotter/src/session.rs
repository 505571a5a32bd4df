#![allow(dead_code)]

//! One recruiter session: criteria, chosen resumes and the submission
//! lifecycle, owned together and discarded together.

use crate::criteria::{Blocked, Criteria};
use crate::files::FileSet;
use crate::scoring_client::ScoringService;
use crate::submission::{Submission, SubmitControl};

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub criteria: Criteria,
    pub files: FileSet,
    submission: Submission,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    /// Why the submit control is disabled, if it is.
    pub fn check(&self) -> Result<(), Blocked> {
        self.submission.check(&self.criteria, &self.files)
    }

    pub fn control(&self) -> SubmitControl {
        self.submission.control(&self.criteria, &self.files)
    }

    pub async fn submit(&mut self, service: &dyn ScoringService) -> Result<(), Blocked> {
        self.submission
            .submit(&self.criteria, &self.files, service)
            .await
    }
}
