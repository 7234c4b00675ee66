//! Template filler — substitutes escaped scalars and pre-built section fragments
//! into a template in one left-to-right pass.
//!
//! # Placeholder grammar
//! `{{{` + `[A-Z][A-Z0-9_]*` + `}}}`. User text can never produce `{{{` because the
//! escaper turns every `{` into `\{`, so placeholders and escaped data cannot collide.
//!
//! # Single pass
//! All values are computed before the scan. Substituted text is appended to the
//! output and never scanned again, so a value that happens to look like a
//! placeholder is emitted as-is.
//!
//! Well-formed placeholders without a value resolve to `""`. A `{{{` that does not
//! open a well-formed placeholder is copied through one brace at a time.

use std::collections::HashMap;

use tracing::warn;

use crate::latex::blocks::{
    build_certifications_block, build_contact_line, build_education_block,
    build_experience_block, build_projects_block, build_skills_block,
};
use crate::latex::escape::{escape_latex, escape_line, sanitize_paragraphs};
use crate::models::resume::ResumeData;

const OPEN: &str = "{{{";
const CLOSE: &str = "}}}";

/// Placeholder name → substitution value. Values are already escaped LaTeX.
#[derive(Debug, Default)]
pub struct Substitutions {
    values: HashMap<&'static str, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, value: String) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Escapes every scalar and runs every block builder for `data`.
    pub fn from_resume(data: &ResumeData) -> Self {
        let mut subs = Self::new();

        subs.insert("FULL_NAME", escape_line(&data.full_name));
        subs.insert("EMAIL", escape_line(&data.email));
        subs.insert("PHONE", escape_line(&data.phone));
        subs.insert("LINKEDIN_URL", escape_line(&data.linkedin_url));
        subs.insert("GITHUB_URL", escape_line(&data.github_url));
        subs.insert("PORTFOLIO_URL", escape_line(&data.portfolio_url));
        subs.insert(
            "CONTACT",
            build_contact_line(
                &data.email,
                &data.phone,
                &[
                    data.linkedin_url.as_str(),
                    data.github_url.as_str(),
                    data.portfolio_url.as_str(),
                ],
            ),
        );

        let summary = escape_latex(&sanitize_paragraphs(&data.summary));
        let skills = build_skills_block(&data.skills);
        let education = build_education_block(&data.education);
        let experience = build_experience_block(&data.experience);
        let projects = build_projects_block(&data.projects);
        let certifications = build_certifications_block(&data.certifications);

        subs.insert("SUMMARY_SECTION", section("Summary", &summary));
        subs.insert("SKILLS_SECTION", section("Skills", &skills));
        subs.insert("EDUCATION_SECTION", section("Education", &education));
        subs.insert("EXPERIENCE_SECTION", section("Experience", &experience));
        subs.insert("PROJECTS_SECTION", section("Projects", &projects));
        subs.insert(
            "CERTIFICATIONS_SECTION",
            section("Certifications", &certifications),
        );

        subs.insert("SUMMARY", summary);
        subs.insert("SKILLS", skills);
        subs.insert("EDUCATION", education);
        subs.insert("EXPERIENCE", experience);
        subs.insert("PROJECTS", projects);
        subs.insert("CERTIFICATIONS", certifications);

        subs
    }
}

/// Fills `template_source` with the escaped values and fragments built from `data`.
pub fn fill_template(template_source: &str, data: &ResumeData) -> String {
    substitute(template_source, &Substitutions::from_resume(data))
}

/// The single-pass scan. Never re-reads anything it has written.
pub fn substitute(template_source: &str, subs: &Substitutions) -> String {
    let mut out = String::with_capacity(template_source.len() * 2);
    let mut rest = template_source;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        match placeholder_name(after_open) {
            Some(name) => {
                match subs.get(name) {
                    Some(value) => out.push_str(value),
                    None => warn!("Template placeholder {name} has no value; leaving it empty"),
                }
                rest = &after_open[name.len() + CLOSE.len()..];
            }
            None => {
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);

    out
}

/// Returns the placeholder identifier at the start of `s` if it is followed by `}}}`.
fn placeholder_name(s: &str) -> Option<&str> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_uppercase() => {}
        _ => return None,
    }

    let end = chars
        .find(|(_, c)| !(c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    s[end..].starts_with(CLOSE).then(|| &s[..end])
}

/// A titled section, or nothing when the body is empty.
fn section(title: &str, body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!("\\resumesection{{{title}}}\n{body}\n")
    }
}
