//! Packs the job description and every extracted resume into one prompt.
//!
//! Pure and deterministic: the same payload always yields the same prompt.
//! Resumes keep their input order and are never truncated.

use serde::Serialize;

use crate::analysis::prompts::{ANALYSIS_PREAMBLE, EVALUATION_FRAMEWORK};

const SEPARATOR_WIDTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeEntry {
    /// Original filename of the resource.
    pub label: String,
    pub text: String,
}

/// Everything one analysis run sends out, before formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequestPayload {
    pub job_description: String,
    pub resumes: Vec<ResumeEntry>,
}

impl AnalysisRequestPayload {
    pub fn to_prompt(&self) -> String {
        format_prompt(&self.job_description, &self.resumes)
    }
}

pub fn format_prompt(job_description: &str, resumes: &[ResumeEntry]) -> String {
    format!(
        "{ANALYSIS_PREAMBLE}\n\n## Input Data\n\n### Job Requirements:\n{}\n\n### Candidate Resumes:\n{}\n\n{EVALUATION_FRAMEWORK}",
        job_description.trim(),
        format_resume_blocks(resumes),
    )
}

/// One delimited block per resume, numbered from 1, separated by a blank line.
pub fn format_resume_blocks(resumes: &[ResumeEntry]) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    resumes
        .iter()
        .enumerate()
        .map(|(i, resume)| {
            format!(
                "{separator}\nRESUME {}: {}\nCANDIDATE PROFILE:\n{}\n{separator}",
                i + 1,
                resume.label,
                resume.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
