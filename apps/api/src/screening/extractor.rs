//! Percentage extraction: free-text model answer → optional match score.
//!
//! Two paths:
//! 1. `extract_structured` looks for the `Percentage Match: NN%` line the
//!    scoring prompts ask for.
//! 2. `extract` is the token-scan fallback: the first whitespace token that
//!    contains `%` is stripped of non-numeric edges and parsed.
//!
//! Neither path distinguishes "no percentage given" from "percentage given
//! in an unparseable form"; both are `None`.

use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::PERCENTAGE_LABEL;

/// Which extraction path produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Structured,
    TokenScan,
}

/// Token-scan extraction. Only the first `%`-bearing token is inspected;
/// if it does not parse, the answer is `None` even when later tokens would.
pub fn extract(text: &str) -> Option<f64> {
    let token = text.split_whitespace().find(|t| t.contains('%'))?;
    parse_percentage(token)
}

/// Reads the value of a `Percentage Match:` line, tolerating markdown
/// emphasis and list numbering around the label.
pub fn extract_structured(text: &str) -> Option<f64> {
    let label = PERCENTAGE_LABEL.to_ascii_lowercase();

    text.lines().find_map(|line| {
        let cleaned = line.replace(['*', '_', '`'], "");
        let lower = cleaned.to_ascii_lowercase();
        let at = lower.find(&label)?;
        let rest = &cleaned[at + label.len()..];
        let value = rest.trim_start().strip_prefix(':')?;
        value.split_whitespace().next().and_then(parse_percentage)
    })
}

/// Structured line first, token scan second.
pub fn score_response(text: &str) -> Option<(f64, ScoreSource)> {
    if let Some(score) = extract_structured(text) {
        return Some((score, ScoreSource::Structured));
    }
    extract(text).map(|score| (score, ScoreSource::TokenScan))
}

/// Strips `%` and any non-numeric characters around the number, then parses.
/// A leading `-`, `+` or `.` belongs to the number only at the start of the
/// token or after punctuation; glued to a word (`Score-85%`) it is dropped.
fn parse_percentage(token: &str) -> Option<f64> {
    let trimmed = token.trim_end_matches(|c: char| !c.is_ascii_digit());
    let first_digit = trimmed.find(|c: char| c.is_ascii_digit())?;

    let mut lead = &trimmed[..first_digit];
    let mut numeric_lead = 0;
    if let Some(rest) = lead.strip_suffix('.') {
        lead = rest;
        numeric_lead += 1;
    }
    if let Some(rest) = lead.strip_suffix(['-', '+']) {
        lead = rest;
        numeric_lead += 1;
    }
    let attached = lead
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || matches!(c, '-' | '+' | '.'));
    let start = if attached {
        first_digit
    } else {
        first_digit - numeric_lead
    };

    trimmed[start..].parse::<f64>().ok().filter(|v| v.is_finite())
}
