//! Structured résumé document, as produced by parsing and by the improver.
//!
//! Deserialization is deliberately forgiving: model output routinely contains nulls,
//! numbers where strings belong, or plain strings where objects belong. Non-conforming
//! list items are dropped (with a warning) instead of failing the whole document, so
//! everything downstream can work with a well-typed value.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    #[serde(deserialize_with = "lenient::object")]
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(deserialize_with = "lenient::objects")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(deserialize_with = "lenient::objects")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "lenient::object")]
    pub additional: Additional,
    #[serde(deserialize_with = "lenient::sections")]
    pub custom_sections: BTreeMap<String, CustomSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub website: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub linkedin: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub github: Option<String>,
}

impl PersonalInfo {
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.title,
            &self.email,
            &self.phone,
            &self.location,
            &self.website,
            &self.linkedin,
            &self.github,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    #[serde(deserialize_with = "lenient::opt_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub years: String,
    #[serde(deserialize_with = "lenient::strings")]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(deserialize_with = "lenient::opt_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(deserialize_with = "lenient::string")]
    pub years: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
}

/// Set-like string lists. Order and duplicates carry no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Additional {
    #[serde(deserialize_with = "lenient::strings")]
    pub technical_skills: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub certifications_training: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub awards: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSection {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub section_type: Option<String>,
    #[serde(deserialize_with = "lenient::custom_items")]
    pub items: Vec<CustomItem>,
}

/// One custom-section item. `id` is unique within its section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomItem {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
}

impl ResumeDocument {
    /// Builds a document from untyped JSON, coercing or dropping malformed parts.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Item shape before ids are made unique.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCustomItem {
    #[serde(deserialize_with = "lenient::opt_id")]
    id: Option<i64>,
    #[serde(deserialize_with = "lenient::string")]
    title: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    subtitle: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    years: Option<String>,
    #[serde(deserialize_with = "lenient::strings")]
    description: Vec<String>,
}

/// Normalizes raw custom-section items: strings become `{title}`, mappings keep their
/// fields, anything else is dropped. Missing or colliding ids get the smallest unused
/// positive integer in the section.
pub fn normalize_custom_items(raw: Vec<Value>) -> Vec<CustomItem> {
    let mut parsed: Vec<RawCustomItem> = Vec::with_capacity(raw.len());
    for item in raw {
        match item {
            Value::String(title) => parsed.push(RawCustomItem {
                title,
                ..Default::default()
            }),
            Value::Object(_) => match serde_json::from_value::<RawCustomItem>(item) {
                Ok(item) => parsed.push(item),
                Err(e) => tracing::warn!("Dropping unreadable custom section item: {e}"),
            },
            other => tracing::warn!("Dropping non-object custom section item: {other}"),
        }
    }

    let mut used: BTreeSet<i64> = BTreeSet::new();
    let mut needs_id = Vec::with_capacity(parsed.len());
    for item in &parsed {
        let keep = item.id.filter(|id| *id > 0 && used.insert(*id));
        needs_id.push(keep.is_none());
    }

    let mut next = 1_i64;
    parsed
        .into_iter()
        .zip(needs_id)
        .map(|(item, missing)| {
            let id = if missing {
                while used.contains(&next) {
                    next += 1;
                }
                used.insert(next);
                next
            } else {
                item.id.unwrap_or_default()
            };
            CustomItem {
                id,
                title: item.title,
                subtitle: item.subtitle,
                years: item.years,
                description: item.description,
            }
        })
        .collect()
}

/// Forgiving field deserializers. None of these fail on a wrong JSON type.
pub(crate) mod lenient {
    use std::collections::BTreeMap;

    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    use super::{normalize_custom_items, CustomItem, CustomSection};

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Non-negative count from an integer or numeric string; anything else is `None`.
    pub fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        let items = match Value::deserialize(d)? {
            Value::Array(items) => items,
            _ => return Ok(Vec::new()),
        };
        let total = items.len();
        let kept: Vec<String> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect();
        if kept.len() < total {
            warn!("Skipped {} non-string list item(s)", total - kept.len());
        }
        Ok(kept)
    }

    pub fn object<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        match Value::deserialize(d)? {
            value @ Value::Object(_) => serde_json::from_value(value).map_err(D::Error::custom),
            _ => Ok(T::default()),
        }
    }

    pub fn objects<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let items = match Value::deserialize(d)? {
            Value::Array(items) => items,
            _ => return Ok(Vec::new()),
        };
        Ok(items
            .into_iter()
            .filter_map(|item| {
                if !item.is_object() {
                    warn!("Skipped non-object list entry: {item}");
                    return None;
                }
                serde_json::from_value(item)
                    .map_err(|e| warn!("Skipped unreadable list entry: {e}"))
                    .ok()
            })
            .collect())
    }

    pub fn custom_items<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<CustomItem>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => normalize_custom_items(items),
            _ => Vec::new(),
        })
    }

    pub fn sections<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<BTreeMap<String, CustomSection>, D::Error> {
        let map = match Value::deserialize(d)? {
            Value::Object(map) => map,
            _ => return Ok(BTreeMap::new()),
        };
        let mut sections = BTreeMap::new();
        for (name, section) in map {
            match section {
                // A bare list is read as the section's items.
                Value::Array(items) => {
                    sections.insert(
                        name,
                        CustomSection {
                            section_type: None,
                            items: normalize_custom_items(items),
                        },
                    );
                }
                value @ Value::Object(_) => {
                    let section = serde_json::from_value(value).map_err(D::Error::custom)?;
                    sections.insert(name, section);
                }
                other => warn!("Dropping custom section '{name}' with unexpected shape: {other}"),
            }
        }
        Ok(sections)
    }
}
