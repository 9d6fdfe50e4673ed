use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobRow, NewJob};
use crate::state::AppState;

/// Column width of `company_name` and `role`.
const MAX_LABEL_CHARS: usize = 255;

fn clean_label(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().chars().take(MAX_LABEL_CHARS).collect::<String>())
        .filter(|v| !v.is_empty())
}

/// POST /api/v1/jobs
/// Stores a job description. Keywords are extracted lazily on the first preview.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(mut request): Json<NewJob>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    if let Some(resume_id) = request.resume_id {
        if state.store.get_resume(resume_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
        }
    }

    request.company_name = clean_label(request.company_name);
    request.role = clean_label(request.role);

    let job = state.store.create_job(request).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    state
        .store
        .get_job(job_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_label_trims_and_truncates() {
        assert_eq!(clean_label(Some("  Acme  ".to_string())).as_deref(), Some("Acme"));
        assert_eq!(clean_label(Some("   ".to_string())), None);
        assert_eq!(clean_label(None), None);

        let long = format!(" {} ", "é".repeat(300));
        let cleaned = clean_label(Some(long)).unwrap();
        assert_eq!(cleaned.chars().count(), MAX_LABEL_CHARS);
    }
}
