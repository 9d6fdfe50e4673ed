//! Tailoring Orchestrator: composes extraction, suggestions, improvement and diffing.
//!
//! Flow: extract_keywords → generate_suggestions → improve_resume → compute_diff →
//!       (user reviews) → confirm.
//!
//! Everything up to the preview is pure composition with no persistence. Only `confirm`
//! writes, and only after the user has accepted the preview.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm_client::CompletionClient;
use crate::models::document::ResumeDocument;
use crate::models::improvement::{ImprovementItem, ImprovementRow, NewImprovement};
use crate::models::job::{JobKeywords, JobRow};
use crate::models::resume::{NewResume, ProcessingStatus, ResumeRow};
use crate::store::ResumeStore;
use crate::tailoring::content::resume_title;
use crate::tailoring::diff::{compute_diff, ResumeDiff};
use crate::tailoring::improver::improve_resume;
use crate::tailoring::keywords::extract_keywords;
use crate::tailoring::suggestions::generate_suggestions;
use crate::tailoring::TailorError;

/// Progress of one tailoring request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailoringStage {
    KeywordsExtracted,
    SuggestionsGenerated,
    ResumeImproved,
    DiffComputed,
    AwaitingConfirmation,
    Confirmed,
}

/// Everything the user reviews before confirming.
#[derive(Debug, Clone, Serialize)]
pub struct TailoringPreview {
    pub keywords: JobKeywords,
    pub suggestions: Vec<String>,
    pub improved: ResumeDocument,
    pub diff: ResumeDiff,
    pub stage: TailoringStage,
}

/// What the user accepted: the improved document and the suggestions they kept.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmRequest {
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub improved_data: ResumeDocument,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmResult {
    pub tailored: ResumeRow,
    pub improvement: ImprovementRow,
    pub stage: TailoringStage,
}

/// Runs every step up to the review point. Aborts without diffing if the improved
/// document fails validation.
///
/// `cached_keywords` skips extraction when the job was already analysed.
pub async fn preview(
    original: &ResumeDocument,
    job_description: &str,
    language: &str,
    cached_keywords: Option<JobKeywords>,
    llm: &dyn CompletionClient,
) -> Result<TailoringPreview, TailorError> {
    let keywords = match cached_keywords {
        Some(keywords) => keywords,
        None => extract_keywords(job_description, llm).await?,
    };
    log_stage(TailoringStage::KeywordsExtracted);

    let suggestions = generate_suggestions(&keywords);
    log_stage(TailoringStage::SuggestionsGenerated);

    let improved = improve_resume(original, job_description, &keywords, language, llm).await?;
    log_stage(TailoringStage::ResumeImproved);

    let diff = compute_diff(original, &improved);
    log_stage(TailoringStage::DiffComputed);
    info!(
        "Tailoring preview ready: {} changes ({} high risk)",
        diff.summary.total_changes, diff.summary.high_risk_changes
    );

    Ok(TailoringPreview {
        keywords,
        suggestions,
        improved,
        diff,
        stage: TailoringStage::AwaitingConfirmation,
    })
}

/// Keywords for a stored job, extracting and caching them on first use.
/// A failed cache write is logged and otherwise ignored.
pub async fn job_keywords(
    job: &JobRow,
    store: &dyn ResumeStore,
    llm: &dyn CompletionClient,
) -> Result<JobKeywords, TailorError> {
    if let Some(keywords) = job.keywords() {
        return Ok(keywords);
    }

    let keywords = extract_keywords(&job.content, llm).await?;
    if let Err(e) = store.set_job_keywords(job.id, &keywords).await {
        warn!("Could not cache keywords for job {}: {e}", job.id);
    }
    Ok(keywords)
}

/// Persists the accepted tailoring: a ready, confirmed, non-master child of the original,
/// then the improvement record binding original, child and job.
pub async fn confirm(
    request: ConfirmRequest,
    default_language: &str,
    store: &dyn ResumeStore,
    llm: &dyn CompletionClient,
) -> Result<ConfirmResult, TailorError> {
    let original = store
        .get_resume(request.resume_id)
        .await?
        .ok_or_else(|| TailorError::NotFound(format!("Resume {}", request.resume_id)))?;
    let job = store
        .get_job(request.job_id)
        .await?
        .ok_or_else(|| TailorError::NotFound(format!("Job {}", request.job_id)))?;

    let language = request.language.as_deref().unwrap_or(default_language);
    let title = match resume_title(
        &job.content,
        language,
        job.company_name.as_deref(),
        job.role.as_deref(),
        llm,
    )
    .await
    {
        Ok(title) => Some(title),
        Err(e) => {
            warn!("Saving tailored resume without a title: {e}");
            None
        }
    };

    let processed_data = serde_json::to_value(&request.improved_data).map_err(|e| {
        TailorError::MalformedResume(format!("could not serialize confirmed resume: {e}"))
    })?;
    let content = serde_json::to_string_pretty(&request.improved_data).map_err(|e| {
        TailorError::MalformedResume(format!("could not serialize confirmed resume: {e}"))
    })?;

    let tailored = store
        .create_resume(NewResume {
            content_type: "json".to_string(),
            is_confirmed: true,
            parent_id: Some(original.id),
            processed_data: Some(processed_data),
            processing_status: ProcessingStatus::Ready,
            title,
            ..NewResume::from_content(content)
        })
        .await?;

    let improvement = store
        .create_improvement(NewImprovement {
            original_resume_id: original.id,
            tailored_resume_id: tailored.id,
            job_id: Some(job.id),
            improvements: ImprovementItem::numbered(&request.improvements),
        })
        .await?;

    info!(
        "Confirmed tailored resume {} (parent {}, job {})",
        tailored.id, original.id, job.id
    );

    Ok(ConfirmResult {
        tailored,
        improvement,
        stage: TailoringStage::Confirmed,
    })
}

fn log_stage(stage: TailoringStage) {
    tracing::debug!("Tailoring stage: {stage:?}");
}
