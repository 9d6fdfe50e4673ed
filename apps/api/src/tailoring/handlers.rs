//! Axum route handlers for the Tailoring API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::ResumeDocument;
use crate::models::job::JobRow;
use crate::models::resume::ResumeUpdate;
use crate::state::AppState;
use crate::tailoring::content::{cover_letter, outreach_message};
use crate::tailoring::orchestrator::{
    confirm, job_keywords, preview, ConfirmRequest, ConfirmResult, TailoringPreview,
};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub resume_id: Uuid,
    pub job_id: Uuid,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub job_id: Uuid,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub resume_id: Uuid,
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tailor/preview
///
/// Extract → suggest → improve → diff. Nothing is persisted except the job's keyword cache.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<TailoringPreview>, AppError> {
    let document = load_document(&state, request.resume_id).await?;
    let job = load_job(&state, request.job_id).await?;

    let keywords = job_keywords(&job, state.store.as_ref(), state.llm.as_ref()).await?;
    let language = state.language(request.language.as_deref());

    let result = preview(
        &document,
        &job.content,
        language,
        Some(keywords),
        state.llm.as_ref(),
    )
    .await?;
    Ok(Json(result))
}

/// POST /api/v1/tailor/confirm
///
/// Persists the reviewed résumé as a child of the original, plus its improvement record.
pub async fn handle_confirm(
    State(state): State<AppState>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResult>, AppError> {
    let result = confirm(
        request,
        &state.config.default_language,
        state.store.as_ref(),
        state.llm.as_ref(),
    )
    .await?;
    Ok(Json(result))
}

/// POST /api/v1/resumes/:id/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<ContentResponse>, AppError> {
    let document = load_document(&state, resume_id).await?;
    let job = load_job(&state, request.job_id).await?;
    let language = state.language(request.language.as_deref());

    let content = cover_letter(&document, &job.content, language, state.llm.as_ref()).await?;
    state
        .store
        .update_resume(
            resume_id,
            ResumeUpdate {
                cover_letter: Some(content.clone()),
                ..Default::default()
            },
        )
        .await?;

    Ok(Json(ContentResponse { resume_id, content }))
}

/// POST /api/v1/resumes/:id/outreach
pub async fn handle_outreach(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<ContentResponse>, AppError> {
    let document = load_document(&state, resume_id).await?;
    let job = load_job(&state, request.job_id).await?;
    let language = state.language(request.language.as_deref());

    let content =
        outreach_message(&document, &job.content, language, state.llm.as_ref()).await?;
    state
        .store
        .update_resume(
            resume_id,
            ResumeUpdate {
                outreach_message: Some(content.clone()),
                ..Default::default()
            },
        )
        .await?;

    Ok(Json(ContentResponse { resume_id, content }))
}

async fn load_document(
    state: &AppState,
    resume_id: Uuid,
) -> Result<ResumeDocument, AppError> {
    state
        .store
        .get_resume(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?
        .document()
        .ok_or_else(|| {
            AppError::UnprocessableEntity(format!("Resume {resume_id} has not been processed"))
        })
}

async fn load_job(state: &AppState, job_id: Uuid) -> Result<JobRow, AppError> {
    state
        .store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}
