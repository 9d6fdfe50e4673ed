use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::document::lenient;

/// Structured requirements extracted from a job description.
///
/// Produced once per job description and treated as immutable downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobKeywords {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub experience_level: String,
    /// Minimum years asked for; `None` when the posting does not say.
    #[serde(deserialize_with = "lenient::opt_count")]
    pub years_experience: Option<u32>,
    #[serde(deserialize_with = "lenient::string")]
    pub domain: String,
    pub key_responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub content: String,
    pub company_name: Option<String>,
    pub role: Option<String>,
    pub resume_id: Option<Uuid>,
    pub job_keywords: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    /// Cached extraction result, if one was stored and still parses.
    pub fn keywords(&self) -> Option<JobKeywords> {
        self.job_keywords
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub content: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub resume_id: Option<Uuid>,
}

impl NewJob {
    pub fn into_row(self) -> JobRow {
        let now = Utc::now();
        JobRow {
            id: Uuid::new_v4(),
            content: self.content,
            company_name: self.company_name,
            role: self.role,
            resume_id: self.resume_id,
            job_keywords: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_keywords_full_deserializes_correctly() {
        let keywords: JobKeywords = serde_json::from_value(json!({
            "required_skills": ["Python", "TypeScript"],
            "preferred_skills": ["LangChain"],
            "experience_level": "Senior",
            "years_experience": 5,
            "domain": "AI/ML",
            "key_responsibilities": ["Build ML platforms"]
        }))
        .unwrap();
        assert_eq!(keywords.required_skills.len(), 2);
        assert_eq!(keywords.years_experience, Some(5));
        assert_eq!(keywords.domain, "AI/ML");
    }

    #[test]
    fn test_job_keywords_missing_fields_default() {
        let keywords: JobKeywords =
            serde_json::from_value(json!({"required_skills": ["Rust"]})).unwrap();
        assert!(keywords.preferred_skills.is_empty());
        assert_eq!(keywords.years_experience, None);
    }

    #[test]
    fn test_job_keywords_wrong_shape_is_rejected() {
        let result: Result<JobKeywords, _> =
            serde_json::from_value(json!({"required_skills": "Rust, Go"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_job_keywords_tolerate_null_scalars() {
        let keywords: JobKeywords = serde_json::from_value(json!({
            "required_skills": ["Python"],
            "experience_level": null,
            "years_experience": null,
            "domain": null
        }))
        .unwrap();
        assert_eq!(keywords.experience_level, "");
        assert_eq!(keywords.years_experience, None);
        assert_eq!(keywords.domain, "");
    }

    #[test]
    fn test_years_experience_accepts_numeric_string() {
        let keywords: JobKeywords =
            serde_json::from_value(json!({"years_experience": " 7 "})).unwrap();
        assert_eq!(keywords.years_experience, Some(7));
    }

    #[test]
    fn test_cached_keywords_are_read_back() {
        let mut row = NewJob {
            content: "Rust engineer".to_string(),
            company_name: None,
            role: None,
            resume_id: None,
        }
        .into_row();
        assert!(row.keywords().is_none());
        row.job_keywords = Some(json!({"required_skills": ["Rust"]}));
        assert_eq!(row.keywords().unwrap().required_skills, vec!["Rust"]);
    }
}
