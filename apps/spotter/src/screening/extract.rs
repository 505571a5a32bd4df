//! Resume reading and profile extraction.
//!
//! Text comes out of a `ResumeReader`; the default reader handles PDFs through
//! `pdf-extract` and passes plain-text resumes through. The profile is then
//! built from section headings found in that text.

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::NaiveDate;
use thiserror::Error;

use crate::screening::experience::total_experience_months;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("could not extract text from '{file_name}': {reason}")]
    Extraction { file_name: String, reason: String },
}

/// Turns an uploaded file into text. `Ok(None)` means the file type is not
/// handled and the file should be skipped.
pub trait ResumeReader: Send + Sync {
    fn read_text(&self, file_name: &str, bytes: &[u8]) -> Result<Option<String>, ReadError>;
}

/// Default reader: `.pdf` via `pdf-extract`, `.txt` as UTF-8.
pub struct PdfTextReader;

impl ResumeReader for PdfTextReader {
    fn read_text(&self, file_name: &str, bytes: &[u8]) -> Result<Option<String>, ReadError> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".pdf") {
            extract_pdf_text(bytes)
                .map(Some)
                .map_err(|reason| ReadError::Extraction {
                    file_name: file_name.to_string(),
                    reason,
                })
        } else if lower.ends_with(".txt") {
            Ok(Some(String::from_utf8_lossy(bytes).into_owned()))
        } else {
            Ok(None)
        }
    }
}

/// `pdf-extract` panics on some well-formed PDFs (missing font resources, for
/// one). A panic is reported as an extraction failure for that file only.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, String> {
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            Err(format!("extractor panicked {detail}").trim_end().to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Experience,
    Skills,
    Projects,
    Other,
}

const HEADINGS: &[(&str, Section)] = &[
    ("experience", Section::Experience),
    ("work experience", Section::Experience),
    ("professional experience", Section::Experience),
    ("employment", Section::Experience),
    ("skills", Section::Skills),
    ("technical skills", Section::Skills),
    ("projects", Section::Projects),
    ("personal projects", Section::Projects),
    ("education", Section::Other),
    ("certifications", Section::Other),
    ("summary", Section::Other),
    ("achievements", Section::Other),
    ("contact", Section::Other),
];

fn heading_of(line: &str) -> Option<Section> {
    let key = clean_words(line).join(" ");
    HEADINGS
        .iter()
        .find(|(heading, _)| *heading == key)
        .map(|(_, section)| *section)
}

/// Lowercased letter-only words; digits and punctuation are dropped.
pub fn clean_words(text: &str) -> Vec<String> {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// What the scorer knows about one candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeProfile {
    pub name: String,
    pub experience_months: i64,
    pub skill_words: Vec<String>,
    pub project_words: Vec<String>,
}

/// Builds a profile from resume text. Skills, projects and experience are read
/// from their own sections when the resume has them, from the whole text
/// otherwise.
pub fn extract_profile(text: &str, today: NaiveDate) -> ResumeProfile {
    let mut name = None;
    let mut current = Section::Other;
    let mut experience = Vec::new();
    let mut skills = Vec::new();
    let mut projects = Vec::new();
    let mut seen = (false, false, false);

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(section) = heading_of(line) {
            current = section;
            match section {
                Section::Experience => seen.0 = true,
                Section::Skills => seen.1 = true,
                Section::Projects => seen.2 = true,
                Section::Other => {}
            }
            continue;
        }
        if name.is_none() {
            name = Some(line.trim().to_string());
        }
        match current {
            Section::Experience => experience.push(line),
            Section::Skills => skills.push(line),
            Section::Projects => projects.push(line),
            Section::Other => {}
        }
    }

    let pick = |found: bool, lines: Vec<&str>| {
        if found {
            lines.join("\n")
        } else {
            text.to_string()
        }
    };

    ResumeProfile {
        name: name.unwrap_or_default(),
        experience_months: total_experience_months(&pick(seen.0, experience), today),
        skill_words: clean_words(&pick(seen.1, skills)),
        project_words: clean_words(&pick(seen.2, projects)),
    }
}
