//! One analysis run, end to end.
//!
//! Waits for every uploaded resource to settle, packages the extracted ones,
//! makes a single backend call, and validates the answer. Resources that
//! failed intake or extraction are reported as skipped rather than
//! aborting the run.

use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::analysis::backend::AnalysisBackend;
use crate::analysis::candidate::CandidateRecord;
use crate::analysis::formatter::{AnalysisRequestPayload, ResumeEntry};
use crate::analysis::prompts::ANALYSIS_SYSTEM;
use crate::analysis::response::{parse_candidates, ParseError};
use crate::intake::resource::{LifecycleState, UploadedResource};
use crate::intake::working_set::WorkingSet;
use crate::llm_client::LlmError;

/// Score at or above which a candidate counts as a top candidate.
pub const TOP_CANDIDATE_SCORE: f64 = 80.0;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Please provide a job description before analyzing resumes.")]
    MissingJobDescription,

    #[error("Please upload and process at least one resume before analyzing.")]
    NoExtractedResumes,

    #[error("AI analysis failed: {0}")]
    Backend(#[from] LlmError),

    #[error("Failed to process AI results: {0}")]
    Response(#[from] ParseError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedResource {
    pub id: Uuid,
    pub label: String,
    pub failure_code: Option<&'static str>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub total_candidates: usize,
    pub relevant_candidates: usize,
    /// Mean match score, rounded to the nearest integer; 0 with no candidates.
    pub average_score: u32,
    pub top_candidates: usize,
}

impl AnalysisSummary {
    pub fn from_candidates(candidates: &[CandidateRecord]) -> Self {
        let total = candidates.len();
        let average_score = if total == 0 {
            0
        } else {
            let sum: f64 = candidates.iter().map(|c| c.match_score).sum();
            (sum / total as f64).round() as u32
        };
        Self {
            total_candidates: total,
            relevant_candidates: candidates.iter().filter(|c| c.is_relevant).count(),
            average_score,
            top_candidates: candidates
                .iter()
                .filter(|c| c.match_score >= TOP_CANDIDATE_SCORE)
                .count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Highest match score first; ties keep the backend's order.
    pub candidates: Vec<CandidateRecord>,
    pub summary: AnalysisSummary,
    pub skipped: Vec<SkippedResource>,
    pub processing_time_ms: u64,
}

/// Splits settled resources into the payload (extracted ones, upload order)
/// and the list of skipped ones.
pub fn build_payload(
    job_description: &str,
    resources: &[UploadedResource],
) -> (AnalysisRequestPayload, Vec<SkippedResource>) {
    let mut resumes = Vec::new();
    let mut skipped = Vec::new();

    for resource in resources {
        match (&resource.state, &resource.extracted_text) {
            (LifecycleState::Extracted, Some(text)) => resumes.push(ResumeEntry {
                label: resource.label().to_string(),
                text: text.clone(),
            }),
            _ => skipped.push(SkippedResource {
                id: resource.id,
                label: resource.label().to_string(),
                failure_code: resource.failure_code,
                reason: resource
                    .failure_reason
                    .clone()
                    .unwrap_or_else(|| "No extracted text".to_string()),
            }),
        }
    }

    let payload = AnalysisRequestPayload {
        job_description: job_description.trim().to_string(),
        resumes,
    };
    (payload, skipped)
}

pub async fn run_analysis(
    workspace: &WorkingSet,
    backend: &dyn AnalysisBackend,
    job_description: &str,
) -> Result<AnalysisReport, AnalysisError> {
    if job_description.trim().is_empty() {
        return Err(AnalysisError::MissingJobDescription);
    }
    let started = Instant::now();

    let resources = workspace.wait_until_settled().await;
    let (payload, skipped) = build_payload(job_description, &resources);
    if payload.resumes.is_empty() {
        return Err(AnalysisError::NoExtractedResumes);
    }
    info!(
        "Analyzing {} resume(s), {} skipped",
        payload.resumes.len(),
        skipped.len()
    );

    let raw = backend.analyze(&payload.to_prompt(), ANALYSIS_SYSTEM).await?;
    let mut candidates = parse_candidates(&raw)?;
    candidates.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

    let summary = AnalysisSummary::from_candidates(&candidates);
    let processing_time_ms = started.elapsed().as_millis() as u64;
    info!(
        "Analysis complete: {} candidate(s), average score {} in {processing_time_ms}ms",
        summary.total_candidates, summary.average_score
    );

    Ok(AnalysisReport {
        candidates,
        summary,
        skipped,
        processing_time_ms,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::extraction::{spawn_extraction, TextExtractor};
    use crate::intake::resource::RawFile;

    /// Records the prompt it was given and answers with a canned response.
    struct StubBackend {
        answer: Result<String, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                answer: Err(status),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AnalysisBackend for StubBackend {
        async fn analyze(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "overloaded".to_string(),
                }),
            }
        }
    }

    const ANSWER: &str = r#"```json
[
  {"candidate_name": "Jane Doe", "match_score": 72, "skills": ["Rust"]},
  {"candidate_name": "Bo Li", "match_score": 91, "is_relevant": true},
  {"candidate_name": "Cy Ng", "match_score": 40, "is_relevant": false}
]
```"#;

    fn resume(name: &str, body: &str) -> RawFile {
        RawFile::new(name, Some("text/plain".into()), format!("{body:<200}").into_bytes())
    }

    async fn upload_and_extract(workspace: &Arc<WorkingSet>, files: Vec<RawFile>) {
        let extractor = TextExtractor::default();
        for file in files {
            let id = workspace.admit(file).await.id();
            spawn_extraction(workspace.clone(), extractor.clone(), id);
        }
    }

    #[tokio::test]
    async fn test_batch_with_one_short_resume() {
        let workspace = Arc::new(WorkingSet::new());
        upload_and_extract(
            &workspace,
            vec![
                resume(
                    "jane.txt",
                    "Jane Doe. Backend engineer, eight years of Rust and Postgres at Stripe.",
                ),
                resume("short.txt", "Too short to read"),
                resume(
                    "bo.txt",
                    "Bo Li. Data engineer with Spark, Airflow and five years at Shopify.",
                ),
            ],
        )
        .await;

        let backend = StubBackend::answering(ANSWER);
        let report = run_analysis(&workspace, &backend, "Senior Rust engineer")
            .await
            .unwrap();

        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("RESUME 1: jane.txt"));
        assert!(prompts[0].contains("RESUME 2: bo.txt"));
        assert!(!prompts[0].contains("short.txt"));

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].label, "short.txt");
        assert_eq!(report.skipped[0].failure_code, Some("insufficient_text"));

        let names: Vec<&str> = report
            .candidates
            .iter()
            .map(|c| c.candidate_name.as_str())
            .collect();
        assert_eq!(names, vec!["Bo Li", "Jane Doe", "Cy Ng"]);
        assert_eq!(
            report.summary,
            AnalysisSummary {
                total_candidates: 3,
                relevant_candidates: 2,
                average_score: 68,
                top_candidates: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_blank_job_description_is_refused() {
        let workspace = WorkingSet::new();
        let backend = StubBackend::answering(ANSWER);
        let err = run_analysis(&workspace, &backend, "   ").await.unwrap_err();
        assert!(matches!(err, AnalysisError::MissingJobDescription));
        assert!(backend.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nothing_extracted_is_refused() {
        let workspace = Arc::new(WorkingSet::new());
        upload_and_extract(&workspace, vec![resume("short.txt", "Too short to read")]).await;

        let backend = StubBackend::answering(ANSWER);
        let err = run_analysis(&workspace, &backend, "Rust engineer")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoExtractedResumes));
    }

    #[tokio::test]
    async fn test_backend_failure_is_batch_level() {
        let workspace = Arc::new(WorkingSet::new());
        upload_and_extract(
            &workspace,
            vec![resume(
                "jane.txt",
                "Jane Doe. Backend engineer, eight years of Rust and Postgres at Stripe.",
            )],
        )
        .await;

        let err = run_analysis(&workspace, &StubBackend::failing(529), "Rust engineer")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Backend(LlmError::Api { status: 529, .. })));
    }

    #[tokio::test]
    async fn test_unparseable_answer_is_batch_level() {
        let workspace = Arc::new(WorkingSet::new());
        upload_and_extract(
            &workspace,
            vec![resume(
                "jane.txt",
                "Jane Doe. Backend engineer, eight years of Rust and Postgres at Stripe.",
            )],
        )
        .await;

        let backend = StubBackend::answering("I could not evaluate these resumes.");
        let err = run_analysis(&workspace, &backend, "Rust engineer")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Response(ParseError::NoJsonArrayFound)
        ));
    }

    #[test]
    fn test_summary_of_nothing() {
        assert_eq!(
            AnalysisSummary::from_candidates(&[]),
            AnalysisSummary {
                total_candidates: 0,
                relevant_candidates: 0,
                average_score: 0,
                top_candidates: 0,
            }
        );
    }
}
