//! Diff Engine: field-level, risk-scored comparison of two résumé documents.
//!
//! Pure and total: no I/O, no shared state, never fails. Each comparable field is one
//! `FieldKind` with its own rule; adding a field means adding a variant.
//!
//! Risk policy (confidence is a trust indicator, not a probability):
//! - skill / certification added → high (an unverifiable capability claim)
//! - summary or description added/modified/removed, language / award added → medium
//! - any set-valued removal, a removed bullet, a title change → low

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::document::{ResumeDocument, WorkExperience};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Title,
    Summary,
    Skill,
    Certification,
    Language,
    Award,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// One detected change between the original and the revised document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub field_path: String,
    pub field_type: FieldType,
    pub change_type: ChangeType,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total_changes: usize,
    pub skills_added: usize,
    pub skills_removed: usize,
    /// Bullets changed in place; added or removed bullets are not counted here.
    pub descriptions_modified: usize,
    pub high_risk_changes: usize,
}

impl DiffSummary {
    pub fn from_entries(entries: &[DiffEntry]) -> Self {
        let mut summary = DiffSummary {
            total_changes: entries.len(),
            ..Default::default()
        };
        for e in entries {
            match (e.field_type, e.change_type) {
                (FieldType::Skill, ChangeType::Added) => summary.skills_added += 1,
                (FieldType::Skill, ChangeType::Removed) => summary.skills_removed += 1,
                (FieldType::Description, ChangeType::Modified) => {
                    summary.descriptions_modified += 1
                }
                _ => {}
            }
            if e.confidence == Confidence::High {
                summary.high_risk_changes += 1;
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDiff {
    pub summary: DiffSummary,
    pub changes: Vec<DiffEntry>,
}

/// Set-valued fields under `additional`.
#[derive(Debug, Clone, Copy)]
enum SetField {
    Skills,
    Certifications,
    Languages,
    Awards,
}

impl SetField {
    fn values<'a>(&self, doc: &'a ResumeDocument) -> &'a [String] {
        let additional = &doc.additional;
        match self {
            SetField::Skills => &additional.technical_skills,
            SetField::Certifications => &additional.certifications_training,
            SetField::Languages => &additional.languages,
            SetField::Awards => &additional.awards,
        }
    }

    fn field_type(&self) -> FieldType {
        match self {
            SetField::Skills => FieldType::Skill,
            SetField::Certifications => FieldType::Certification,
            SetField::Languages => FieldType::Language,
            SetField::Awards => FieldType::Award,
        }
    }

    fn path(&self) -> &'static str {
        match self {
            SetField::Skills => "additional.technicalSkills",
            SetField::Certifications => "additional.certificationsTraining",
            SetField::Languages => "additional.languages",
            SetField::Awards => "additional.awards",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldKind {
    Title,
    Summary,
    Set(SetField),
    Descriptions,
}

/// Comparison order of the emitted entries.
const FIELD_KINDS: [FieldKind; 7] = [
    FieldKind::Title,
    FieldKind::Summary,
    FieldKind::Set(SetField::Skills),
    FieldKind::Set(SetField::Certifications),
    FieldKind::Set(SetField::Languages),
    FieldKind::Set(SetField::Awards),
    FieldKind::Descriptions,
];

fn confidence_for(field_type: FieldType, change_type: ChangeType) -> Confidence {
    use ChangeType::*;
    use FieldType::*;
    match (field_type, change_type) {
        (Skill | Certification, Added) => Confidence::High,
        (Language | Award, Added) => Confidence::Medium,
        (Skill | Certification | Language | Award, _) => Confidence::Low,
        (Summary, _) => Confidence::Medium,
        (Description, Removed) => Confidence::Low,
        (Description, _) => Confidence::Medium,
        (Title, _) => Confidence::Low,
    }
}

fn entry(
    field_path: String,
    field_type: FieldType,
    change_type: ChangeType,
    old_value: Option<String>,
    new_value: Option<String>,
) -> DiffEntry {
    DiffEntry {
        field_path,
        field_type,
        change_type,
        old_value,
        new_value,
        confidence: confidence_for(field_type, change_type),
    }
}

/// Compares two documents and returns the aggregate summary plus every change.
///
/// Identical documents always produce an empty result.
pub fn compute_diff(original: &ResumeDocument, revised: &ResumeDocument) -> ResumeDiff {
    if original == revised {
        return ResumeDiff::default();
    }

    let mut changes = Vec::new();
    for kind in FIELD_KINDS {
        match kind {
            FieldKind::Title => diff_title(original, revised, &mut changes),
            FieldKind::Summary => diff_summary(&original.summary, &revised.summary, &mut changes),
            FieldKind::Set(field) => diff_set(field, original, revised, &mut changes),
            FieldKind::Descriptions => diff_descriptions(
                &original.work_experience,
                &revised.work_experience,
                &mut changes,
            ),
        }
    }

    ResumeDiff {
        summary: DiffSummary::from_entries(&changes),
        changes,
    }
}

fn diff_title(original: &ResumeDocument, revised: &ResumeDocument, out: &mut Vec<DiffEntry>) {
    let old = original.personal_info.title.as_deref().unwrap_or_default();
    let new = revised.personal_info.title.as_deref().unwrap_or_default();
    if old != new {
        out.push(entry(
            "personalInfo.title".to_string(),
            FieldType::Title,
            ChangeType::Modified,
            Some(old.to_string()),
            Some(new.to_string()),
        ));
    }
}

fn diff_summary(old: &str, new: &str, out: &mut Vec<DiffEntry>) {
    let change_type = match (old.is_empty(), new.is_empty()) {
        (true, true) => return,
        (true, false) => ChangeType::Added,
        (false, true) => ChangeType::Removed,
        (false, false) if old == new => return,
        (false, false) => ChangeType::Modified,
    };
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    out.push(entry(
        "summary".to_string(),
        FieldType::Summary,
        change_type,
        non_empty(old),
        non_empty(new),
    ));
}

/// Symmetric difference; output is sorted so list order in either input is irrelevant.
fn diff_set(
    field: SetField,
    original: &ResumeDocument,
    revised: &ResumeDocument,
    out: &mut Vec<DiffEntry>,
) {
    let old: BTreeSet<&str> = field.values(original).iter().map(String::as_str).collect();
    let new: BTreeSet<&str> = field.values(revised).iter().map(String::as_str).collect();

    for added in new.difference(&old) {
        out.push(entry(
            field.path().to_string(),
            field.field_type(),
            ChangeType::Added,
            None,
            Some(added.to_string()),
        ));
    }
    for removed in old.difference(&new) {
        out.push(entry(
            field.path().to_string(),
            field.field_type(),
            ChangeType::Removed,
            Some(removed.to_string()),
            None,
        ));
    }
}

/// Alignment key for work-experience entries: the explicit id plus how many earlier
/// entries in the same list carry that id, or the list position when there is no id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EntryKey {
    Id { id: i64, occurrence: usize },
    Position(usize),
}

fn entry_keys(entries: &[WorkExperience]) -> Vec<EntryKey> {
    let mut seen: HashMap<i64, usize> = HashMap::new();
    entries
        .iter()
        .enumerate()
        .map(|(index, experience)| match experience.id {
            Some(id) => {
                let count = seen.entry(id).or_insert(0);
                let key = EntryKey::Id {
                    id,
                    occurrence: *count,
                };
                *count += 1;
                key
            }
            None => EntryKey::Position(index),
        })
        .collect()
}

fn diff_descriptions(
    original: &[WorkExperience],
    revised: &[WorkExperience],
    out: &mut Vec<DiffEntry>,
) {
    let revised_by_key: HashMap<EntryKey, &WorkExperience> =
        entry_keys(revised).into_iter().zip(revised).collect();

    for ((index, old_entry), key) in original.iter().enumerate().zip(entry_keys(original)) {
        let Some(new_entry) = revised_by_key.get(&key) else {
            continue;
        };
        let old_bullets = &old_entry.description;
        let new_bullets = &new_entry.description;

        for position in 0..old_bullets.len().max(new_bullets.len()) {
            let path = format!("workExperience[{index}].description[{position}]");
            match (old_bullets.get(position), new_bullets.get(position)) {
                (Some(old), Some(new)) if old != new => out.push(entry(
                    path,
                    FieldType::Description,
                    ChangeType::Modified,
                    Some(old.clone()),
                    Some(new.clone()),
                )),
                (Some(old), None) => out.push(entry(
                    path,
                    FieldType::Description,
                    ChangeType::Removed,
                    Some(old.clone()),
                    None,
                )),
                (None, Some(new)) => out.push(entry(
                    path,
                    FieldType::Description,
                    ChangeType::Added,
                    None,
                    Some(new.clone()),
                )),
                _ => {}
            }
        }
    }
}
