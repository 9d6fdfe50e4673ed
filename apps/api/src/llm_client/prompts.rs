// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a JSON extraction engine. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every prompt that rewrites candidate material.
pub const TRUTHFULNESS_INSTRUCTION: &str = "\
    CRITICAL: Rephrase and reorder only what the candidate already claims. \
    Do NOT invent employers, titles, dates, degrees, certifications or skills. \
    If the job asks for something the resume does not support, leave it out.";

/// Language codes accepted for generated content.
pub const SUPPORTED_LANGUAGES: [&str; 4] = ["en", "es", "zh", "ja"];

/// Maps a language code to the name used inside prompts. Unknown codes fall back to English.
pub fn language_name(code: &str) -> &'static str {
    match code.trim().to_ascii_lowercase().as_str() {
        "es" => "Spanish",
        "zh" => "Chinese (Simplified)",
        "ja" => "Japanese",
        _ => "English",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_name_known_codes() {
        assert_eq!(language_name("es"), "Spanish");
        assert_eq!(language_name("ZH"), "Chinese (Simplified)");
        assert_eq!(language_name(" ja "), "Japanese");
    }

    #[test]
    fn test_language_name_falls_back_to_english() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("xx"), "English");
        assert_eq!(language_name(""), "English");
    }
}
