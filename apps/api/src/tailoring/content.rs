//! Free-text companions of a tailored résumé: its title, a cover letter and an
//! outreach message.

use tracing::info;

use crate::llm_client::prompts::language_name;
use crate::llm_client::CompletionClient;
use crate::models::document::ResumeDocument;
use crate::tailoring::prompts::{
    COVER_LETTER_PROMPT, COVER_LETTER_SYSTEM, GENERATE_TITLE_PROMPT, GENERATE_TITLE_SYSTEM,
    OUTREACH_MESSAGE_PROMPT, OUTREACH_MESSAGE_SYSTEM,
};
use crate::tailoring::TailorError;

const MAX_TITLE_CHARS: usize = 80;
const TITLE_MAX_TOKENS: u32 = 60;
const TITLE_TEMPERATURE: f32 = 0.3;
const COVER_LETTER_MAX_TOKENS: u32 = 2048;
const OUTREACH_MAX_TOKENS: u32 = 1024;

/// Title for a tailored résumé.
///
/// Known company/role produce `"<role> @ <company>"` without a model call; otherwise the
/// title is extracted from the job description.
pub async fn resume_title(
    job_description: &str,
    language: &str,
    company: Option<&str>,
    role: Option<&str>,
    llm: &dyn CompletionClient,
) -> Result<String, TailorError> {
    let company = company.map(str::trim).filter(|s| !s.is_empty());
    let role = role.map(str::trim).filter(|s| !s.is_empty());

    let title = match (role, company) {
        (None, None) => {
            let prompt = GENERATE_TITLE_PROMPT
                .replace("{job_description}", job_description)
                .replace("{output_language}", language_name(language));
            let raw = llm
                .text_complete(
                    &prompt,
                    GENERATE_TITLE_SYSTEM,
                    TITLE_MAX_TOKENS,
                    Some(TITLE_TEMPERATURE),
                )
                .await
                .map_err(|e| TailorError::Generation(format!("title: {e}")))?;
            strip_quotes(raw.trim()).to_string()
        }
        (role, Some(company)) => format!("{} @ {company}", role.unwrap_or("Position")),
        (Some(role), None) => role.to_string(),
    };

    Ok(truncate_chars(&title, MAX_TITLE_CHARS))
}

pub async fn cover_letter(
    document: &ResumeDocument,
    job_description: &str,
    language: &str,
    llm: &dyn CompletionClient,
) -> Result<String, TailorError> {
    let text = generate(
        COVER_LETTER_PROMPT,
        COVER_LETTER_SYSTEM,
        COVER_LETTER_MAX_TOKENS,
        document,
        job_description,
        language,
        llm,
    )
    .await?;
    info!("Generated cover letter ({} chars)", text.len());
    Ok(text)
}

pub async fn outreach_message(
    document: &ResumeDocument,
    job_description: &str,
    language: &str,
    llm: &dyn CompletionClient,
) -> Result<String, TailorError> {
    let text = generate(
        OUTREACH_MESSAGE_PROMPT,
        OUTREACH_MESSAGE_SYSTEM,
        OUTREACH_MAX_TOKENS,
        document,
        job_description,
        language,
        llm,
    )
    .await?;
    info!("Generated outreach message ({} chars)", text.len());
    Ok(text)
}

async fn generate(
    template: &str,
    system: &str,
    max_tokens: u32,
    document: &ResumeDocument,
    job_description: &str,
    language: &str,
    llm: &dyn CompletionClient,
) -> Result<String, TailorError> {
    let resume_json = serde_json::to_string_pretty(document)
        .map_err(|e| TailorError::Generation(format!("could not serialize resume: {e}")))?;
    let prompt = template
        .replace("{job_description}", job_description)
        .replace("{resume_json}", &resume_json)
        .replace("{output_language}", language_name(language));

    let text = llm
        .text_complete(&prompt, system, max_tokens, None)
        .await
        .map_err(|e| TailorError::Generation(e.to_string()))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(TailorError::Generation("model returned no text".to_string()));
    }
    Ok(text.to_string())
}

fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'').trim()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
