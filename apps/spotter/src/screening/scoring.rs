//! Candidate scoring and shortlist ranking.
//!
//! final = (extracted months − required months)
//!       + Σ weight of required skills found in the skill text
//!       + 10 × required projects found in the project text

use crate::scoring_client::ResultEntry;
use crate::screening::extract::ResumeProfile;

pub const SCORE_PER_PROJECT: f64 = 10.0;

/// Parsed upload criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringCriteria {
    pub required_experience_months: i64,
    pub skills: Vec<(String, f64)>,
    pub projects: Vec<String>,
    pub num_shortlist: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub experience: f64,
    pub skills: f64,
    pub projects: f64,
    pub matched_skills: Vec<String>,
    pub matched_projects: Vec<String>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.experience + self.skills + self.projects
    }
}

/// Substring match of a required term against the joined words. Blank terms
/// never match.
fn mentions(haystack: &str, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    !term.is_empty() && haystack.contains(&term)
}

pub fn experience_score(extracted_months: i64, required_months: i64) -> f64 {
    (extracted_months - required_months) as f64
}

pub fn skill_score(skill_words: &[String], skills: &[(String, f64)]) -> (f64, Vec<String>) {
    let text = skill_words.join(" ");
    skills
        .iter()
        .filter(|(name, _)| mentions(&text, name))
        .fold((0.0, Vec::new()), |(total, mut matched), (name, weight)| {
            matched.push(name.clone());
            (total + weight, matched)
        })
}

pub fn project_score(project_words: &[String], projects: &[String]) -> (f64, Vec<String>) {
    if project_words.is_empty() {
        return (0.0, Vec::new());
    }
    let text = project_words.join(" ");
    let matched: Vec<String> = projects
        .iter()
        .filter(|p| mentions(&text, p))
        .cloned()
        .collect();
    (matched.len() as f64 * SCORE_PER_PROJECT, matched)
}

pub fn score_profile(profile: &ResumeProfile, criteria: &ScoringCriteria) -> ScoreBreakdown {
    let (skills, matched_skills) = skill_score(&profile.skill_words, &criteria.skills);
    let (projects, matched_projects) = project_score(&profile.project_words, &criteria.projects);
    ScoreBreakdown {
        experience: experience_score(
            profile.experience_months,
            criteria.required_experience_months,
        ),
        skills,
        projects,
        matched_skills,
        matched_projects,
    }
}

/// Highest score first; ties keep upload order. Truncated to `limit`.
pub fn shortlist(mut scored: Vec<ResultEntry>, limit: usize) -> Vec<ResultEntry> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}
