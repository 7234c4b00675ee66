use serde::{Deserialize, Deserializer, Serialize};

use crate::latex::CompilerError;

/// The resume payload accepted by the compiler.
///
/// Every field defaults when missing from the JSON so that absence of an optional
/// section is never a deserialization failure. Required fields are enforced by
/// [`ResumeData::validate`], not by serde. An explicit `null` reads the same as a
/// missing field, so `"fullName": null` fails validation rather than parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub linkedin_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub github_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub portfolio_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<ProjectEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<CertificationEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub link: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub credential_id: Option<String>,
}

/// Request body for the resume endpoints.
///
/// A missing `templateId` is reported as an unknown template and a missing `data`
/// as a validation failure, the same way an empty value would be.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub template_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: ResumeData,
}

impl ResumeData {
    /// Rejects payloads missing a required scalar. Whitespace-only counts as missing.
    pub fn validate(&self) -> Result<(), CompilerError> {
        if self.full_name.trim().is_empty() {
            return Err(CompilerError::Validation(
                "fullName is required and cannot be empty".to_string(),
            ));
        }
        if self.email.trim().is_empty() {
            return Err(CompilerError::Validation(
                "email is required and cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Deserializes `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns the value of an optional sub-field if it carries any text.
///
/// `Some("")` and whitespace-only strings are treated as absent; any other
/// value (including "0" or "0.0") is kept.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
