use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One confirmed suggestion, numbered in the order it was shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementItem {
    pub suggestion: String,
    #[serde(rename = "lineNumber")]
    pub line_number: usize,
}

impl ImprovementItem {
    /// Numbers plain suggestion strings from 1.
    pub fn numbered(suggestions: &[String]) -> Vec<ImprovementItem> {
        suggestions
            .iter()
            .enumerate()
            .map(|(i, suggestion)| ImprovementItem {
                suggestion: suggestion.clone(),
                line_number: i + 1,
            })
            .collect()
    }
}

/// Binds an original résumé, its tailored child and the job it was tailored for.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ImprovementRow {
    pub id: Uuid,
    pub original_resume_id: Uuid,
    pub tailored_resume_id: Uuid,
    pub job_id: Option<Uuid>,
    pub improvements: Json<Vec<ImprovementItem>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewImprovement {
    pub original_resume_id: Uuid,
    pub tailored_resume_id: Uuid,
    pub job_id: Option<Uuid>,
    pub improvements: Vec<ImprovementItem>,
}

impl NewImprovement {
    pub fn into_row(self) -> ImprovementRow {
        ImprovementRow {
            id: Uuid::new_v4(),
            original_resume_id: self.original_resume_id,
            tailored_resume_id: self.tailored_resume_id,
            job_id: self.job_id,
            improvements: Json(self.improvements),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_starts_at_one() {
        let items = ImprovementItem::numbered(&["First".to_string(), "Second".to_string()]);
        assert_eq!(items[0].line_number, 1);
        assert_eq!(items[1].line_number, 2);
        assert_eq!(items[1].suggestion, "Second");
    }

    #[test]
    fn test_item_serializes_line_number_in_camel_case() {
        let item = ImprovementItem {
            suggestion: "Add Kubernetes experience".to_string(),
            line_number: 1,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["lineNumber"], 1);
    }
}
