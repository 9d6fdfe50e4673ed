//! Improvement Generator: rule-based suggestions derived from extracted requirements.
//! No LLM call; the same keywords always produce the same suggestions.

use crate::models::job::JobKeywords;

/// How many skills are named in a single suggestion before the rest are summarized.
const MAX_SKILLS_PER_SUGGESTION: usize = 5;
const MAX_RESPONSIBILITIES: usize = 3;

/// Builds human-readable suggestions, most important first.
///
/// Never empty when `required_skills` is non-empty.
pub fn generate_suggestions(keywords: &JobKeywords) -> Vec<String> {
    let mut suggestions = Vec::new();

    let required = non_blank(&keywords.required_skills);
    if !required.is_empty() {
        suggestions.push(format!(
            "Highlight hands-on experience with the required skills: {}",
            join_limited(&required)
        ));
    }

    let preferred = non_blank(&keywords.preferred_skills);
    if !preferred.is_empty() {
        suggestions.push(format!(
            "Mention any exposure to preferred skills where it is genuine: {}",
            join_limited(&preferred)
        ));
    }

    let level = keywords.experience_level.trim();
    match (level.is_empty(), keywords.years_experience) {
        (false, Some(years)) if years > 0 => suggestions.push(format!(
            "Frame your summary for a {level} role and make {years}+ years of relevant experience easy to spot"
        )),
        (false, _) => suggestions.push(format!(
            "Frame your summary and bullet verbs for a {level}-level role"
        )),
        (true, Some(years)) if years > 0 => suggestions.push(format!(
            "Make {years}+ years of relevant experience easy to spot"
        )),
        _ => {}
    }

    for responsibility in non_blank(&keywords.key_responsibilities)
        .into_iter()
        .take(MAX_RESPONSIBILITIES)
    {
        suggestions.push(format!(
            "Add a bullet showing concrete results for: {responsibility}"
        ));
    }

    let domain = keywords.domain.trim();
    if !domain.is_empty() {
        suggestions.push(format!(
            "Use {domain} terminology where it accurately describes your work"
        ));
    }

    if suggestions.is_empty() {
        suggestions.push(
            "Align your summary and most recent role with the core requirements of the job description"
                .to_string(),
        );
    }

    suggestions
}

fn non_blank(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

fn join_limited(items: &[&str]) -> String {
    let shown = items
        .iter()
        .take(MAX_SKILLS_PER_SUGGESTION)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    match items.len().saturating_sub(MAX_SKILLS_PER_SUGGESTION) {
        0 => shown,
        rest => format!("{shown} (and {rest} more)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> JobKeywords {
        JobKeywords {
            required_skills: vec![
                "Python".to_string(),
                "TypeScript".to_string(),
                "React".to_string(),
                "Next.js".to_string(),
                "AWS".to_string(),
                "Kubernetes".to_string(),
                "Docker".to_string(),
            ],
            preferred_skills: vec!["LangChain".to_string(), "GraphQL".to_string()],
            experience_level: "Senior".to_string(),
            years_experience: Some(5),
            domain: "AI/ML".to_string(),
            key_responsibilities: vec![
                "Build ML platforms".to_string(),
                "Work with distributed systems".to_string(),
                "Mentor team members".to_string(),
                "System architecture".to_string(),
            ],
        }
    }

    #[test]
    fn test_suggestions_mention_required_skills_first() {
        let suggestions = generate_suggestions(&keywords());
        assert!(suggestions[0].contains("Python"));
        assert!(suggestions[0].contains("(and 2 more)"));
        assert!(!suggestions[0].contains("Docker"));
    }

    #[test]
    fn test_suggestions_cover_every_rule() {
        let suggestions = generate_suggestions(&keywords());
        // required, preferred, level, 3 responsibilities, domain
        assert_eq!(suggestions.len(), 7);
        assert!(suggestions[2].contains("Senior") && suggestions[2].contains("5+"));
        assert!(suggestions.iter().any(|s| s.contains("Mentor team members")));
        assert!(!suggestions.iter().any(|s| s.contains("System architecture")));
        assert!(suggestions.last().unwrap().contains("AI/ML"));
    }

    #[test]
    fn test_suggestions_are_deterministic() {
        assert_eq!(generate_suggestions(&keywords()), generate_suggestions(&keywords()));
    }

    #[test]
    fn test_only_required_skills_is_non_empty() {
        let kw = JobKeywords {
            required_skills: vec!["Rust".to_string()],
            ..Default::default()
        };
        let suggestions = generate_suggestions(&kw);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].ends_with("Rust"));
    }

    #[test]
    fn test_empty_keywords_still_yield_a_suggestion() {
        let suggestions = generate_suggestions(&JobKeywords::default());
        assert_eq!(suggestions.len(), 1);
    }

    #[test]
    fn test_blank_entries_are_ignored() {
        let kw = JobKeywords {
            required_skills: vec!["  ".to_string(), "Go".to_string()],
            experience_level: "   ".to_string(),
            years_experience: Some(3),
            ..Default::default()
        };
        let suggestions = generate_suggestions(&kw);
        assert_eq!(suggestions[0], "Highlight hands-on experience with the required skills: Go");
        assert_eq!(suggestions[1], "Make 3+ years of relevant experience easy to spot");
    }
}
