use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::document::ResumeDocument;

/// Processing lifecycle of a stored résumé.
///
/// `pending → processing → ready`, with `failed` reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Ready,
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Ready => "ready",
            ProcessingStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingStatus::Ready | ProcessingStatus::Failed)
    }

    pub fn can_transition_to(&self, next: ProcessingStatus) -> bool {
        use ProcessingStatus::*;
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Pending, Processing) | (Processing, Ready) | (Pending, Failed) | (Processing, Failed)
        )
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProcessingStatus::Pending),
            "processing" => Ok(ProcessingStatus::Processing),
            "ready" => Ok(ProcessingStatus::Ready),
            "failed" => Ok(ProcessingStatus::Failed),
            other => Err(format!("unknown processing status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub content: String,
    pub content_type: String,
    pub filename: Option<String>,
    pub is_master: bool,
    pub is_confirmed: bool,
    /// Set on tailored résumés: the original they were derived from.
    pub parent_id: Option<Uuid>,
    pub processed_data: Option<Value>,
    pub processing_status: String,
    pub cover_letter: Option<String>,
    pub outreach_message: Option<String>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    /// Unknown status strings are read as `failed` so a corrupt row never blocks recovery.
    pub fn status(&self) -> ProcessingStatus {
        self.processing_status
            .parse()
            .unwrap_or(ProcessingStatus::Failed)
    }

    /// The structured document, if the résumé has been processed.
    pub fn document(&self) -> Option<ResumeDocument> {
        self.processed_data
            .clone()
            .and_then(|value| ResumeDocument::from_value(value).ok())
    }
}

/// Fields supplied when creating a résumé. Master status is decided by the registry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewResume {
    pub content: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub is_confirmed: bool,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub processed_data: Option<Value>,
    #[serde(default = "default_status")]
    pub processing_status: ProcessingStatus,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub outreach_message: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

fn default_content_type() -> String {
    "md".to_string()
}

fn default_status() -> ProcessingStatus {
    ProcessingStatus::Pending
}

impl NewResume {
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: default_content_type(),
            filename: None,
            is_confirmed: false,
            parent_id: None,
            processed_data: None,
            processing_status: default_status(),
            cover_letter: None,
            outreach_message: None,
            title: None,
        }
    }

    pub fn into_row(self, is_master: bool) -> ResumeRow {
        let now = Utc::now();
        ResumeRow {
            id: Uuid::new_v4(),
            content: self.content,
            content_type: self.content_type,
            filename: self.filename,
            is_master,
            is_confirmed: self.is_confirmed,
            parent_id: self.parent_id,
            processed_data: self.processed_data,
            processing_status: self.processing_status.as_str().to_string(),
            cover_letter: self.cover_letter,
            outreach_message: self.outreach_message,
            title: self.title,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a résumé. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ResumeUpdate {
    pub processed_data: Option<Value>,
    pub processing_status: Option<ProcessingStatus>,
    pub cover_letter: Option<String>,
    pub outreach_message: Option<String>,
    pub title: Option<String>,
}

impl ResumeUpdate {
    pub fn apply_to(self, row: &mut ResumeRow) {
        if let Some(data) = self.processed_data {
            row.processed_data = Some(data);
        }
        if let Some(status) = self.processing_status {
            row.processing_status = status.as_str().to_string();
        }
        if let Some(letter) = self.cover_letter {
            row.cover_letter = Some(letter);
        }
        if let Some(message) = self.outreach_message {
            row.outreach_message = Some(message);
        }
        if let Some(title) = self.title {
            row.title = Some(title);
        }
        row.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_transitions_follow_lifecycle() {
        use ProcessingStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Ready));
        assert!(Pending.can_transition_to(Failed));
        assert!(Processing.can_transition_to(Failed));

        assert!(!Ready.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Ready));
        assert!(!Ready.can_transition_to(Processing));
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProcessingStatus::Ready.is_terminal());
        assert!(ProcessingStatus::Failed.is_terminal());
        assert!(!ProcessingStatus::Pending.is_terminal());
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            ProcessingStatus::Pending,
            ProcessingStatus::Processing,
            ProcessingStatus::Ready,
            ProcessingStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<ProcessingStatus>(), Ok(status));
        }
        assert!("stuck".parse::<ProcessingStatus>().is_err());
    }

    #[test]
    fn test_unknown_status_string_reads_as_failed() {
        let mut row = NewResume::from_content("# Resume").into_row(false);
        row.processing_status = "garbage".to_string();
        assert_eq!(row.status(), ProcessingStatus::Failed);
    }

    #[test]
    fn test_new_resume_defaults_when_deserialized() {
        let new: NewResume = serde_json::from_value(json!({"content": "# CV"})).unwrap();
        assert_eq!(new.content_type, "md");
        assert_eq!(new.processing_status, ProcessingStatus::Pending);
        assert!(new.parent_id.is_none());
    }

    #[test]
    fn test_update_only_touches_provided_fields() {
        let mut row = NewResume::from_content("# CV").into_row(true);
        ResumeUpdate {
            processing_status: Some(ProcessingStatus::Processing),
            ..Default::default()
        }
        .apply_to(&mut row);
        assert_eq!(row.status(), ProcessingStatus::Processing);
        assert!(row.is_master);
        assert!(row.cover_letter.is_none());
    }

    #[test]
    fn test_document_reads_processed_data() {
        let mut new = NewResume::from_content("# CV");
        new.processed_data = Some(json!({"personalInfo": {"name": "Jo"}}));
        let row = new.into_row(false);
        let doc = row.document().unwrap();
        assert_eq!(doc.personal_info.name.as_deref(), Some("Jo"));
    }
}
