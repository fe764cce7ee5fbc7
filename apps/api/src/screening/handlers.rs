//! Axum route handlers for the screening API.

use std::path::PathBuf;

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::document::DocumentSource;
use crate::errors::AppError;
use crate::screening::prompts::{instruction, Task};
use crate::screening::reporter::{
    BatchEvaluation, EvaluationRequest, MatchReporter, ReportCollector, ReportItem, ResumeInput,
    SingleEvaluation,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankDirectoryRequest {
    pub job_description: String,
    pub directory: PathBuf,
}

/// Every screening response: the evaluation data plus the ordered report items.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<T> {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: T,
    pub report: Vec<ReportItem>,
}

impl<T> ReportEnvelope<T> {
    fn new(result: T, report: ReportCollector) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            result,
            report: report.into_items(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResult {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResult {
    pub evaluation: SingleEvaluation,
}

#[derive(Debug, Serialize)]
pub struct RankResult {
    pub batch: BatchEvaluation,
}

/// Fields of a multipart screening form.
#[derive(Debug, Default)]
struct UploadForm {
    job_description: String,
    resumes: Vec<ResumeInput>,
}

impl UploadForm {
    /// First `resume` part that carries a file; blank parts are passed over.
    fn first_resume(self) -> Option<DocumentSource> {
        self.resumes.into_iter().find_map(|r| r.source)
    }
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("job_description") => {
                form.job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
            }
            Some("resume") => {
                let name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("resume-{}", form.resumes.len() + 1));
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;

                // An empty part is a file input left blank.
                let source = (!data.is_empty()).then(|| DocumentSource::Bytes {
                    name: name.clone(),
                    data,
                });
                form.resumes.push(ResumeInput { id: name, source });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn require_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn new_reporter(state: &AppState) -> MatchReporter<ReportCollector> {
    MatchReporter::new(
        state.generator.clone(),
        state.converter.clone(),
        ReportCollector::default(),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/review
///
/// Narrative evaluation of one uploaded resume against the job description.
pub async fn handle_review(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ReportEnvelope<ReviewResult>>, AppError> {
    let form = read_upload_form(multipart).await?;
    require_job_description(&form.job_description)?;

    let job_description = form.job_description.clone();
    let request = EvaluationRequest::for_task(Task::Review, &job_description, form.first_resume());

    let mut reporter = new_reporter(&state);
    let response = reporter.review(&request).await?;

    Ok(Json(ReportEnvelope::new(
        ReviewResult { response },
        reporter.into_presenter(),
    )))
}

/// POST /api/v1/resumes/match
///
/// Percentage match of one uploaded resume, with a match/mismatch chart when a score is found.
pub async fn handle_match(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ReportEnvelope<MatchResult>>, AppError> {
    let form = read_upload_form(multipart).await?;
    require_job_description(&form.job_description)?;

    let job_description = form.job_description.clone();
    let request = EvaluationRequest::for_task(Task::Match, &job_description, form.first_resume());

    let mut reporter = new_reporter(&state);
    let evaluation = reporter.evaluate_single(&request).await?;
    reporter.report_single(&evaluation);

    Ok(Json(ReportEnvelope::new(
        MatchResult { evaluation },
        reporter.into_presenter(),
    )))
}

/// POST /api/v1/resumes/rank
///
/// Ranks every PDF in a server-side directory and returns the score distribution.
pub async fn handle_rank_directory(
    State(state): State<AppState>,
    Json(request): Json<RankDirectoryRequest>,
) -> Result<Json<ReportEnvelope<RankResult>>, AppError> {
    require_job_description(&request.job_description)?;
    if request.directory.as_os_str().is_empty() {
        return Err(AppError::Validation(
            "Please enter the directory path".to_string(),
        ));
    }

    let mut reporter = new_reporter(&state);
    let batch = reporter
        .evaluate_directory(
            &request.job_description,
            &request.directory,
            &instruction(Task::Rank, &request.job_description),
        )
        .await?;

    Ok(Json(ReportEnvelope::new(
        RankResult { batch },
        reporter.into_presenter(),
    )))
}

/// POST /api/v1/resumes/rank/upload
///
/// Ranks uploaded resumes. Blank file parts are skipped and reported.
pub async fn handle_rank_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ReportEnvelope<RankResult>>, AppError> {
    let form = read_upload_form(multipart).await?;
    require_job_description(&form.job_description)?;

    let mut reporter = new_reporter(&state);
    let batch = reporter
        .evaluate_batch(
            &form.job_description,
            form.resumes,
            &instruction(Task::Rank, &form.job_description),
        )
        .await?;

    Ok(Json(ReportEnvelope::new(
        RankResult { batch },
        reporter.into_presenter(),
    )))
}

/// GET /api/v1/models
pub async fn handle_list_models(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let models = state
        .generator
        .list_models()
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    Ok(Json(json!({ "models": models })))
}
