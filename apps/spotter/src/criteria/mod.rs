//! Weighted hiring criteria entered by the recruiter.
//!
//! Skill weights are integer percentages. The running total never exceeds 100:
//! a weight edit that would overflow is discarded and the prior weight kept,
//! without telling the caller. Submission additionally requires the total to be
//! exactly 100.
//!
//! Skills and projects are append-only; positions handed to the UI stay valid
//! for the whole session.

pub mod entries;

use thiserror::Error;
use tracing::debug;

use crate::files::FileSet;
use entries::AppendOnly;

/// Total all skill weights must reach before a submission is allowed.
pub const FULL_WEIGHT: u32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skill {
    pub name: String,
    pub weight: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub name: String,
}

/// Raw text of a numeric form field. Parsed only when a submission is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericInput {
    raw: String,
}

impl NumericInput {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whole, non-negative value, or `None` when empty or not a number.
    pub fn value(&self) -> Option<u32> {
        self.raw.trim().parse::<u32>().ok()
    }
}

/// Why the submit control is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Blocked {
    #[error("an analysis is already in progress")]
    InFlight,

    #[error("skill weights total {total}%, they must add up to exactly 100%")]
    WeightsIncomplete { total: u32 },

    #[error("required months of experience must be a whole number")]
    InvalidExperience,

    #[error("number of resumes to shortlist must be a positive whole number")]
    InvalidShortlist,

    #[error("no resumes uploaded")]
    NoFiles,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    required_experience_months: NumericInput,
    skills: AppendOnly<Skill>,
    projects: AppendOnly<Project>,
    num_shortlist: NumericInput,
}

impl Default for Criteria {
    /// One blank skill, one blank project, empty numeric fields.
    fn default() -> Self {
        Self {
            required_experience_months: NumericInput::default(),
            skills: AppendOnly::with_first(Skill::default()),
            projects: AppendOnly::with_first(Project::default()),
            num_shortlist: NumericInput::default(),
        }
    }
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skills(&self) -> &[Skill] {
        self.skills.as_slice()
    }

    pub fn projects(&self) -> &[Project] {
        self.projects.as_slice()
    }

    pub fn required_experience_months(&self) -> &NumericInput {
        &self.required_experience_months
    }

    pub fn num_shortlist(&self) -> &NumericInput {
        &self.num_shortlist
    }

    /// Appends a blank skill with zero weight and returns its index.
    pub fn add_skill(&mut self) -> usize {
        self.skills.push(Skill::default())
    }

    pub fn update_skill_name(&mut self, index: usize, name: impl Into<String>) {
        if let Some(skill) = self.skills.get_mut(index) {
            skill.name = name.into();
        }
    }

    /// Sets a skill weight, clamped to 0..=100, unless doing so would push the
    /// total past 100. Rejected updates leave the previous weight in place.
    pub fn update_skill_weight(&mut self, index: usize, new_weight: i64) {
        let total = self.total_weight();
        let Some(skill) = self.skills.get_mut(index) else {
            return;
        };

        let new_weight = new_weight.clamp(0, i64::from(FULL_WEIGHT)) as u32;
        let without_this = total - skill.weight;
        if without_this + new_weight <= FULL_WEIGHT {
            skill.weight = new_weight;
        } else {
            debug!(
                index,
                requested = new_weight,
                kept = skill.weight,
                total,
                "Skill weight update discarded: total would exceed 100"
            );
        }
    }

    /// Appends a blank project and returns its index.
    pub fn add_project(&mut self) -> usize {
        self.projects.push(Project::default())
    }

    pub fn update_project_name(&mut self, index: usize, name: impl Into<String>) {
        if let Some(project) = self.projects.get_mut(index) {
            project.name = name.into();
        }
    }

    pub fn set_required_experience_months(&mut self, value: impl Into<String>) {
        self.required_experience_months.raw = value.into();
    }

    pub fn set_num_shortlist(&mut self, value: impl Into<String>) {
        self.num_shortlist.raw = value.into();
    }

    pub fn total_weight(&self) -> u32 {
        self.skills.iter().map(|s| s.weight).sum()
    }

    /// Returns the first reason a submission of these criteria with `files`
    /// would be refused.
    pub fn validate(&self, files: &FileSet) -> Result<(), Blocked> {
        let total = self.total_weight();
        if total != FULL_WEIGHT {
            return Err(Blocked::WeightsIncomplete { total });
        }
        if self.required_experience_months.value().is_none() {
            return Err(Blocked::InvalidExperience);
        }
        if !matches!(self.num_shortlist.value(), Some(n) if n > 0) {
            return Err(Blocked::InvalidShortlist);
        }
        if files.is_empty() {
            return Err(Blocked::NoFiles);
        }
        Ok(())
    }

    pub fn is_submittable(&self, files: &FileSet) -> bool {
        self.validate(files).is_ok()
    }
}
