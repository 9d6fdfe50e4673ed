//! Keyword Extractor: turns a raw job description into structured `JobKeywords`.

use tracing::info;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::CompletionClient;
use crate::models::job::JobKeywords;
use crate::tailoring::prompts::EXTRACT_KEYWORDS_PROMPT;
use crate::tailoring::TailorError;

/// Extracts requirements from a job description via a single structured completion.
///
/// Failures of the call and non-conforming output both surface as
/// `TailorError::Extraction`; retries are the completion client's concern.
pub async fn extract_keywords(
    job_description: &str,
    llm: &dyn CompletionClient,
) -> Result<JobKeywords, TailorError> {
    let prompt = EXTRACT_KEYWORDS_PROMPT.replace("{job_description}", job_description);

    let value = llm
        .structured_complete(&prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| TailorError::Extraction(format!("completion failed: {e}")))?;

    let keywords: JobKeywords = serde_json::from_value(value)
        .map_err(|e| TailorError::Extraction(format!("unexpected keyword shape: {e}")))?;

    info!(
        "Extracted {} required and {} preferred skills (level={:?})",
        keywords.required_skills.len(),
        keywords.preferred_skills.len(),
        keywords.experience_level
    );
    Ok(keywords)
}
