//! Axum route handlers for the scoring service.

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::scoring_client::ResultEntry;
use crate::screening::extract::{extract_profile, ResumeProfile, ResumeReader};
use crate::screening::form::{read_form, UploadForm};
use crate::screening::scoring::{score_profile, shortlist};
use crate::state::AppState;

/// POST /upload
///
/// Scores every uploaded resume against the submitted criteria and returns
/// the top `num_shortlist` as `[{name, score}]`, best first.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<ResultEntry>>, AppError> {
    let form = read_form(multipart).await?;
    info!(
        "Scoring {} resumes against {} skills, shortlisting {}",
        form.resumes.len(),
        form.criteria.skills.len(),
        form.criteria.num_shortlist
    );

    let reader = state.reader.clone();
    let today = Utc::now().date_naive();
    let ranked = tokio::task::spawn_blocking(move || rank_resumes(&*reader, form, today))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Scoring task failed: {e}")))?;

    Ok(Json(ranked))
}

/// Scores each readable resume and returns the shortlist. Files the reader
/// does not handle are skipped; files it fails on are scored as empty
/// profiles under their file name.
pub fn rank_resumes(
    reader: &dyn ResumeReader,
    form: UploadForm,
    today: NaiveDate,
) -> Vec<ResultEntry> {
    let mut scored = Vec::with_capacity(form.resumes.len());

    for resume in &form.resumes {
        let profile = match reader.read_text(&resume.file_name, &resume.bytes) {
            Ok(Some(text)) => extract_profile(&text, today),
            Ok(None) => {
                debug!("Skipping unsupported file '{}'", resume.file_name);
                continue;
            }
            Err(e) => {
                warn!("{e}");
                ResumeProfile::default()
            }
        };

        let breakdown = score_profile(&profile, &form.criteria);
        debug!(
            "{}: {} months, skills {:?}, projects {:?}, total {}",
            resume.file_name,
            profile.experience_months,
            breakdown.matched_skills,
            breakdown.matched_projects,
            breakdown.total()
        );

        let name = if profile.name.is_empty() {
            resume.file_name.clone()
        } else {
            profile.name
        };
        scored.push(ResultEntry {
            name,
            score: breakdown.total(),
        });
    }

    shortlist(scored, form.criteria.num_shortlist)
}
