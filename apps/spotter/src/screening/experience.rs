//! Work-experience extraction from free resume text.
//!
//! Looks for ranges such as `Jan 2020 - Present`, `03/2018 to 06/2021` or
//! `2015-2017` and sums their lengths in whole calendar months.

use chrono::{Datelike, NaiveDate};

/// End markers meaning "up to today".
const ONGOING: &[&str] = &["present", "current", "ongoing", "now", "till", "today"];

const RANGE_SEPARATORS: &[&str] = &["-", "to", "until"];

/// Whole-month difference, ignoring days. Reversed ranges count as zero.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let months = (i64::from(end.year()) - i64::from(start.year())) * 12 + i64::from(end.month())
        - i64::from(start.month());
    months.max(0)
}

/// Parses a single date token such as `Jan 2020`, `January 2020`, `03/2020` or
/// `2020`. Dates resolve to the first of the month.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {text}"), "%d %B %Y") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("1/{text}"), "%d/%m/%Y") {
        return Some(date);
    }
    if text.len() == 4 {
        if let Ok(year) = text.parse::<i32>() {
            if (1950..=2100).contains(&year) {
                return NaiveDate::from_ymd_opt(year, 1, 1);
            }
        }
    }
    None
}

fn is_ongoing(token: &str) -> bool {
    ONGOING.contains(&token.to_lowercase().as_str())
}

fn clean_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric() && c != '/')
}

fn cleaned<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    tokens
        .iter()
        .map(|&t| clean_token(t))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Date ending the token list: tries two tokens (`Jan 2020`) before one
/// (`2020`).
fn date_before(tokens: &[&str]) -> Option<NaiveDate> {
    let n = tokens.len();
    if n >= 2 {
        if let Some(date) = parse_date(&tokens[n - 2..].join(" ")) {
            return Some(date);
        }
    }
    tokens.last().and_then(|t| parse_date(t))
}

/// Date opening the token list, or today for an ongoing marker.
fn date_after(tokens: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    let first = tokens.first()?;
    if is_ongoing(first) {
        return Some(today);
    }
    if let Some(pair) = tokens.get(..2) {
        if let Some(date) = parse_date(&pair.join(" ")) {
            return Some(date);
        }
    }
    parse_date(first)
}

/// Every `(start, end)` range found on one line.
pub fn find_ranges(line: &str, today: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let normalized = line.replace(['–', '—'], "-").replace('-', " - ");
    let raw: Vec<&str> = normalized.split_whitespace().collect();

    raw.iter()
        .enumerate()
        .filter(|(_, t)| RANGE_SEPARATORS.contains(&t.to_lowercase().as_str()))
        .filter_map(|(i, _)| {
            let start = date_before(&cleaned(&raw[..i]))?;
            let end = date_after(&cleaned(&raw[i + 1..]), today)?;
            Some((start, end))
        })
        .collect()
}

/// Total months across every date range in `text`.
pub fn total_experience_months(text: &str, today: NaiveDate) -> i64 {
    text.lines()
        .flat_map(|line| find_ranges(line, today))
        .map(|(start, end)| months_between(start, end))
        .sum()
}
