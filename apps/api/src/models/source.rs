//! The loosely-typed document produced by the form editor.
//!
//! Nothing here is guaranteed present. Scalars accept strings or numbers,
//! `null` reads as absent, and list entries that are not objects of the
//! expected shape are skipped rather than failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceResumeDocument {
    #[serde(deserialize_with = "lenient_object")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(deserialize_with = "loose_string")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub experience: Vec<SourceExperience>,
    #[serde(deserialize_with = "lenient_list")]
    pub education: Vec<SourceEducation>,
    #[serde(deserialize_with = "string_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub projects: Vec<SourceProject>,
    #[serde(deserialize_with = "lenient_list")]
    pub awards: Vec<SourceAward>,
    #[serde(deserialize_with = "lenient_list")]
    pub certifications: Vec<SourceCertification>,
    #[serde(deserialize_with = "lenient_list")]
    pub languages: Vec<SourceLanguage>,
    #[serde(deserialize_with = "lenient_list")]
    pub volunteer: Vec<SourceVolunteer>,
    #[serde(deserialize_with = "lenient_list")]
    pub publications: Vec<SourcePublication>,
    #[serde(deserialize_with = "lenient_object")]
    pub social_links: Option<SocialLinks>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    #[serde(alias = "first_name", deserialize_with = "loose_string")]
    pub first_name: Option<String>,
    #[serde(alias = "last_name", deserialize_with = "loose_string")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceExperience {
    #[serde(deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub company: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub location: Option<String>,
    #[serde(alias = "start_date", deserialize_with = "loose_string")]
    pub start_date: Option<String>,
    #[serde(alias = "end_date", deserialize_with = "loose_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceEducation {
    #[serde(deserialize_with = "loose_string")]
    pub degree: Option<String>,
    #[serde(alias = "field_of_study", deserialize_with = "loose_string")]
    pub field_of_study: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub school: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub gpa: Option<String>,
    #[serde(alias = "graduation_year", deserialize_with = "loose_string")]
    pub graduation_year: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub honors: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceProject {
    #[serde(deserialize_with = "loose_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "string_list")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "loose_string")]
    pub url: Option<String>,
    #[serde(alias = "start_date", deserialize_with = "loose_string")]
    pub start_date: Option<String>,
    #[serde(alias = "end_date", deserialize_with = "loose_string")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceAward {
    #[serde(deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(alias = "awarder", deserialize_with = "loose_string")]
    pub issuer: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceCertification {
    #[serde(deserialize_with = "loose_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub issuer: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceLanguage {
    #[serde(alias = "name", deserialize_with = "loose_string")]
    pub language: Option<String>,
    #[serde(alias = "level", deserialize_with = "loose_string")]
    pub proficiency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceVolunteer {
    #[serde(deserialize_with = "loose_string")]
    pub organization: Option<String>,
    #[serde(alias = "position", deserialize_with = "loose_string")]
    pub role: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub location: Option<String>,
    #[serde(alias = "start_date", deserialize_with = "loose_string")]
    pub start_date: Option<String>,
    #[serde(alias = "end_date", deserialize_with = "loose_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourcePublication {
    #[serde(alias = "name", deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub publisher: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    #[serde(deserialize_with = "loose_string")]
    pub linkedin: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub github: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub portfolio: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub website: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field readers
// ────────────────────────────────────────────────────────────────────────────

/// Strings pass through, numbers and booleans are stringified, anything else is absent.
fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A list of objects; entries that do not deserialise are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// An object that reads as absent when it is `null` or not an object.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

/// A flat list of scalars. A single comma-separated string is split.
fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let values = match Value::deserialize(deserializer)? {
        Value::Array(values) => values,
        Value::String(s) => s.split(',').map(|p| Value::String(p.to_string())).collect(),
        _ => Vec::new(),
    };
    Ok(values
        .into_iter()
        .filter_map(scalar_to_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
