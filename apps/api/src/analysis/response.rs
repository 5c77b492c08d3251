//! Validation of the analysis backend's free-form answer.
//!
//! The answer is expected to contain a JSON array of candidate objects,
//! possibly wrapped in prose or markdown fences. Every field goes through a
//! sanitizer that trims, defaults, and clamps, so a record that makes it out
//! of here always satisfies the `CandidateRecord` invariants.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::analysis::candidate::{CandidateRecord, ContactInfo, ExperienceLevel};
use crate::analysis::metrics::compute_derived_metrics;

/// How much of an unparseable array is kept for diagnostics.
pub const SNIPPET_CHARS: usize = 500;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\n?").expect("fence pattern is valid"));

/// Leading numeric prefix of a string, e.g. "7.5 years" -> "7.5".
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("number pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("No valid JSON array found in the analysis response")]
    NoJsonArrayFound,

    #[error("Invalid JSON format in the analysis response: {message}")]
    MalformedJson { message: String, snippet: String },

    #[error("The analysis returned no candidate data")]
    EmptyResultSet,

    #[error("No valid candidates could be processed from the analysis response")]
    NoValidCandidates,
}

impl ParseError {
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::NoJsonArrayFound => "no_json_array_found",
            ParseError::MalformedJson { .. } => "malformed_json",
            ParseError::EmptyResultSet => "empty_result_set",
            ParseError::NoValidCandidates => "no_valid_candidates",
        }
    }
}

/// Why a single array element was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("element {index} is {found}, not an object")]
    NotAnObject { index: usize, found: &'static str },
}

/// Parses `raw` into validated candidate records, in array order.
pub fn parse_candidates(raw: &str) -> Result<Vec<CandidateRecord>, ParseError> {
    let cleaned = CODE_FENCE.replace_all(raw.trim(), "");

    let start = cleaned.find('[').ok_or(ParseError::NoJsonArrayFound)?;
    let end = cleaned.rfind(']').ok_or(ParseError::NoJsonArrayFound)?;
    if end < start {
        return Err(ParseError::NoJsonArrayFound);
    }
    let json = &cleaned[start..=end];

    let elements: Vec<Value> = serde_json::from_str(json).map_err(|e| {
        warn!("Analysis response is not valid JSON: {e}");
        ParseError::MalformedJson {
            message: e.to_string(),
            snippet: json.chars().take(SNIPPET_CHARS).collect(),
        }
    })?;
    if elements.is_empty() {
        return Err(ParseError::EmptyResultSet);
    }

    let total = elements.len();
    let candidates: Vec<CandidateRecord> = elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| match coerce_candidate(index, element) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                warn!("Skipping candidate: {e}");
                None
            }
        })
        .collect();

    if candidates.is_empty() {
        return Err(ParseError::NoValidCandidates);
    }
    debug!("Validated {} of {total} candidate records", candidates.len());
    Ok(candidates)
}

/// Builds one record from array element `index`. Only a non-object element
/// is refused; every field of an object is coerced.
pub fn coerce_candidate(index: usize, element: &Value) -> Result<CandidateRecord, CoercionError> {
    let Value::Object(fields) = element else {
        return Err(CoercionError::NotAnObject {
            index,
            found: json_type_name(element),
        });
    };
    let field = |name: &str| fields.get(name);

    let skills = sanitize_string_list(field("skills"));
    let notable_companies = sanitize_string_list(field("notable_companies"));
    let experience_years = sanitize_number(field("experience_years"), 0.0, 50.0);
    let metrics = compute_derived_metrics(&skills, &notable_companies);

    Ok(CandidateRecord {
        id: Uuid::new_v4(),
        candidate_name: sanitize_string(field("candidate_name"), &format!("Candidate {}", index + 1)),
        contact_info: sanitize_contact_info(field("contact_info")),
        experience_level: ExperienceLevel::from_years(experience_years),
        experience_years,
        education: sanitize_string(field("education"), "Not specified"),
        certifications: sanitize_string_list(field("certifications")),
        summary: sanitize_string(field("summary"), "No summary available"),
        matched_skills: sanitize_string_list(field("matched_skills")),
        missing_skills: sanitize_string_list(field("missing_skills")),
        match_score: sanitize_number(field("match_score"), 0.0, 100.0),
        recommendation: sanitize_string(field("recommendation"), "No recommendation provided"),
        is_relevant: !matches!(field("is_relevant"), Some(Value::Bool(false))),
        issues_detected: sanitize_string_list(field("issues_detected")),
        strengths: sanitize_string_list(field("strengths")),
        weaknesses: sanitize_string_list(field("weaknesses")),
        interview_questions: sanitize_string_list(field("interview_questions")),
        salary_range: sanitize_string(field("salary_range"), "Not specified"),
        hire_probability: sanitize_number(field("hire_probability"), 0.0, 1.0),
        skill_diversity: metrics.skill_diversity,
        company_prestige: metrics.company_prestige,
        skills,
        notable_companies,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Field sanitizers
// ────────────────────────────────────────────────────────────────────────────

/// Trimmed string, or `default` when missing, blank, or not a string.
pub fn sanitize_string(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Non-blank string elements, trimmed. Anything else yields an empty list.
pub fn sanitize_string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Number clamped to `[min, max]`. Strings contribute their leading numeric
/// prefix; anything unparseable becomes `min`.
pub fn sanitize_number(value: Option<&Value>, min: f64, max: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_leading_number(s),
        _ => None,
    };
    match parsed {
        Some(n) if !n.is_nan() => n.clamp(min, max),
        _ => min,
    }
}

pub fn sanitize_contact_info(value: Option<&Value>) -> ContactInfo {
    match value {
        Some(Value::Object(contact)) => ContactInfo {
            email: sanitize_string(contact.get("email"), ""),
            phone: sanitize_string(contact.get("phone"), ""),
        },
        _ => ContactInfo::default(),
    }
}

fn parse_leading_number(s: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(s.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
