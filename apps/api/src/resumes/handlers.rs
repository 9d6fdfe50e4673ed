//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::improvement::ImprovementRow;
use crate::models::resume::{NewResume, ProcessingStatus, ResumeRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ProcessingStatus,
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailResponse {
    pub resume: ResumeRow,
    /// Present on tailored résumés that went through confirmation.
    pub improvement: Option<ImprovementRow>,
}

/// POST /api/v1/resumes
///
/// Stores a résumé and decides whether it becomes the master.
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<NewResume>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let row = state.registry.create_with_master_assignment(request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(state.store.list_resumes().await?))
}

/// GET /api/v1/resumes/master
pub async fn handle_get_master(
    State(state): State<AppState>,
) -> Result<Json<ResumeRow>, AppError> {
    state
        .registry
        .current_master()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No master resume".to_string()))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    let resume = state
        .store
        .get_resume(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let improvement = match resume.parent_id {
        Some(_) => state.store.get_improvement_by_tailored_resume(resume_id).await?,
        None => None,
    };

    Ok(Json(ResumeDetailResponse {
        resume,
        improvement,
    }))
}

/// DELETE /api/v1/resumes/:id
///
/// Cascades to tailored children, their improvement records and referencing jobs.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_resume(resume_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Resume {resume_id} not found")))
    }
}

/// POST /api/v1/resumes/:id/master
pub async fn handle_set_master(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(state.registry.set_master(resume_id).await?))
}

/// PATCH /api/v1/resumes/:id/status
///
/// Called by the processing pipeline as it moves a résumé through its lifecycle.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(
        state
            .registry
            .transition_status(resume_id, request.status)
            .await?,
    ))
}
