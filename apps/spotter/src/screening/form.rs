//! Reads the multipart upload into criteria plus resume files.

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;
use crate::payload::{
    FILES, NUM_SHORTLIST, REQUIRED_EXPERIENCE_MONTHS, REQUIRED_PROJECTS, REQUIRED_SKILLS,
    SKILL_WEIGHTS,
};
use crate::screening::scoring::ScoringCriteria;

#[derive(Debug, Clone)]
pub struct UploadedResume {
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub struct UploadForm {
    pub criteria: ScoringCriteria,
    pub resumes: Vec<UploadedResume>,
}

/// Raw field values in arrival order, before any parsing.
#[derive(Debug, Default)]
pub struct RawForm {
    pub required_experience_months: Option<String>,
    pub required_skills: Vec<String>,
    pub skill_weights: Vec<String>,
    pub required_projects: Vec<String>,
    pub num_shortlist: Option<String>,
    pub resumes: Vec<UploadedResume>,
}

pub async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut raw = RawForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == FILES {
            let file_name = field.file_name().unwrap_or("resume").to_string();
            let bytes = field.bytes().await?;
            raw.resumes.push(UploadedResume { file_name, bytes });
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            REQUIRED_EXPERIENCE_MONTHS => raw.required_experience_months = Some(value),
            REQUIRED_SKILLS => raw.required_skills.push(value),
            SKILL_WEIGHTS => raw.skill_weights.push(value),
            REQUIRED_PROJECTS => raw.required_projects.push(value),
            NUM_SHORTLIST => raw.num_shortlist = Some(value),
            other => tracing::debug!("Ignoring unknown upload field '{other}'"),
        }
    }

    raw.parse()
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| AppError::Validation(format!("Missing field '{field}'")))
}

impl RawForm {
    pub fn parse(self) -> Result<UploadForm, AppError> {
        let required_experience_months = required(
            &self.required_experience_months,
            REQUIRED_EXPERIENCE_MONTHS,
        )?
        .parse::<i64>()
        .map_err(|_| {
            AppError::Validation(format!("'{REQUIRED_EXPERIENCE_MONTHS}' must be an integer"))
        })?;

        let num_shortlist = required(&self.num_shortlist, NUM_SHORTLIST)?
            .parse::<usize>()
            .map_err(|_| {
                AppError::Validation(format!(
                    "'{NUM_SHORTLIST}' must be a non-negative integer"
                ))
            })?;

        if self.required_skills.len() != self.skill_weights.len() {
            return Err(AppError::Validation(format!(
                "Got {} skills but {} skill weights",
                self.required_skills.len(),
                self.skill_weights.len()
            )));
        }

        let weights = self
            .skill_weights
            .iter()
            .map(|w| {
                w.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|weight| weight.is_finite())
                    .ok_or_else(|| {
                        AppError::Validation(format!("Skill weight '{w}' is not a number"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UploadForm {
            criteria: ScoringCriteria {
                required_experience_months,
                skills: self.required_skills.into_iter().zip(weights).collect(),
                projects: self.required_projects,
                num_shortlist,
            },
            resumes: self.resumes,
        })
    }
}
