#![allow(dead_code)]

//! Builds the multipart request body from criteria and resumes.
//!
//! Field names are the wire contract with the scoring service. Skill names and
//! weights are emitted from the same pass over the skill records, so the two
//! repeated fields always line up by position.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use thiserror::Error;

use crate::criteria::Criteria;
use crate::files::FileSet;

pub const REQUIRED_EXPERIENCE_MONTHS: &str = "required_experience_months";
pub const REQUIRED_SKILLS: &str = "required_skills[]";
pub const SKILL_WEIGHTS: &str = "skill_weights[]";
pub const REQUIRED_PROJECTS: &str = "required_projects[]";
pub const NUM_SHORTLIST: &str = "num_shortlist";
pub const FILES: &str = "files";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("field '{field}' is not a valid number: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    Text(String),
    File { file_name: String, bytes: Bytes },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayloadPart {
    pub name: &'static str,
    pub value: PartValue,
}

/// An owned snapshot of one submission. Edits made after it was built do not
/// reach it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    parts: Vec<PayloadPart>,
}

impl Payload {
    pub fn parts(&self) -> &[PayloadPart] {
        &self.parts
    }

    /// All text values sent under `name`, in order.
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter(|p| p.name == name)
            .filter_map(|p| match &p.value {
                PartValue::Text(text) => Some(text.as_str()),
                PartValue::File { .. } => None,
            })
            .collect()
    }

    /// Names of the attached files, in upload order.
    pub fn file_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match &p.value {
                PartValue::File { file_name, .. } => Some(file_name.as_str()),
                PartValue::Text(_) => None,
            })
            .collect()
    }

    pub fn file_count(&self) -> usize {
        self.file_names().len()
    }

    fn text(&mut self, name: &'static str, value: impl Into<String>) {
        self.parts.push(PayloadPart {
            name,
            value: PartValue::Text(value.into()),
        });
    }

    /// Converts into the multipart form sent over HTTP.
    pub fn into_form(self) -> Form {
        self.parts
            .into_iter()
            .fold(Form::new(), |form, part| match part.value {
                PartValue::Text(text) => form.text(part.name, text),
                PartValue::File { file_name, bytes } => {
                    form.part(part.name, Part::bytes(bytes.to_vec()).file_name(file_name))
                }
            })
    }
}

/// Builds the request body. Expects criteria that passed validation; numeric
/// fields that fail to parse are reported instead of guessed.
pub fn build(criteria: &Criteria, files: &FileSet) -> Result<Payload, PayloadError> {
    let experience = criteria.required_experience_months();
    let experience = experience
        .value()
        .ok_or_else(|| PayloadError::InvalidField {
            field: REQUIRED_EXPERIENCE_MONTHS,
            value: experience.raw().to_string(),
        })?;
    let shortlist = criteria.num_shortlist();
    let shortlist = shortlist.value().ok_or_else(|| PayloadError::InvalidField {
        field: NUM_SHORTLIST,
        value: shortlist.raw().to_string(),
    })?;

    let mut payload = Payload::default();
    payload.text(REQUIRED_EXPERIENCE_MONTHS, experience.to_string());
    for skill in criteria.skills() {
        payload.text(REQUIRED_SKILLS, skill.name.clone());
        payload.text(SKILL_WEIGHTS, skill.weight.to_string());
    }
    for project in criteria.projects() {
        payload.text(REQUIRED_PROJECTS, project.name.clone());
    }
    payload.text(NUM_SHORTLIST, shortlist.to_string());
    for file in files.iter() {
        payload.parts.push(PayloadPart {
            name: FILES,
            value: PartValue::File {
                file_name: file.file_name.clone(),
                bytes: file.bytes.clone(),
            },
        });
    }

    Ok(payload)
}
