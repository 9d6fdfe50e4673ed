//! Résumé Improver: asks the model for a tailored revision and checks its shape once,
//! here, so the diff stage can assume a well-typed document.

use serde_json::Value;
use tracing::{info, warn};

use crate::llm_client::prompts::{language_name, TRUTHFULNESS_INSTRUCTION};
use crate::llm_client::CompletionClient;
use crate::models::document::ResumeDocument;
use crate::models::job::JobKeywords;
use crate::tailoring::prompts::{IMPROVE_RESUME_PROMPT, IMPROVE_RESUME_SYSTEM};
use crate::tailoring::TailorError;

/// Top-level keys whose absence marks a generation as truncated.
const REQUIRED_SECTIONS: &[&str] = &["personalInfo"];

/// Produces a revised document for `job_description`, written in `language`.
pub async fn improve_resume(
    original: &ResumeDocument,
    job_description: &str,
    keywords: &JobKeywords,
    language: &str,
    llm: &dyn CompletionClient,
) -> Result<ResumeDocument, TailorError> {
    let resume_json = serde_json::to_string_pretty(original)
        .map_err(|e| TailorError::Improvement(format!("could not serialize resume: {e}")))?;
    let keywords_json = serde_json::to_string_pretty(keywords)
        .map_err(|e| TailorError::Improvement(format!("could not serialize keywords: {e}")))?;

    let prompt = IMPROVE_RESUME_PROMPT
        .replace("{truthfulness_instruction}", TRUTHFULNESS_INSTRUCTION)
        .replace("{output_language}", language_name(language))
        .replace("{job_description}", job_description)
        .replace("{keywords_json}", &keywords_json)
        .replace("{resume_json}", &resume_json);

    let value = llm
        .structured_complete(&prompt, IMPROVE_RESUME_SYSTEM)
        .await
        .map_err(|e| TailorError::Improvement(e.to_string()))?;

    let improved = validate_improved(value)?;
    info!(
        "Improved resume: {} work entries, {} skills",
        improved.work_experience.len(),
        improved.additional.technical_skills.len()
    );
    Ok(improved)
}

/// Rejects output missing a required section, then coerces the rest into a document.
pub fn validate_improved(value: Value) -> Result<ResumeDocument, TailorError> {
    for section in REQUIRED_SECTIONS {
        let present = value
            .get(section)
            .and_then(Value::as_object)
            .is_some_and(|fields| !fields.is_empty());
        if !present {
            warn!("Improved resume is missing '{section}'; treating output as truncated");
            return Err(TailorError::MissingSection((*section).to_string()));
        }
    }

    let document = ResumeDocument::from_value(value)
        .map_err(|e| TailorError::MalformedResume(e.to_string()))?;
    if document.personal_info.is_empty() {
        warn!("Improved resume has a blank 'personalInfo'; treating output as truncated");
        return Err(TailorError::MissingSection("personalInfo".to_string()));
    }
    Ok(document)
}
