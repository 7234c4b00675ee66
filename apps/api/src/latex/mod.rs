//! Resume compiler: [`ResumeData`] + template id -> self-contained LaTeX source.
//!
//! Pure and synchronous. Safe to call concurrently; no shared state, no I/O.
//! PDF rendering lives in [`crate::render`] and consumes the output of [`compile_resume`].

pub mod blocks;
pub mod escape;
pub mod filler;
pub mod templates;

use thiserror::Error;
use tracing::debug;

use crate::models::resume::ResumeData;

pub use filler::fill_template;
pub use templates::{lookup_template, TemplateId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

/// Compiles a resume into LaTeX source for the given template.
///
/// Order: template lookup, then validation, then escaping and block building,
/// then the fill. An unknown template is reported before any field is touched.
pub fn compile_resume(template_id: &str, data: &ResumeData) -> Result<String, CompilerError> {
    let template = lookup_template(template_id)?;
    data.validate()?;

    let source = fill_template(template.source(), data);

    debug!(
        "Compiled resume with template {}: {} bytes, {} education, {} experience, {} projects, {} certifications",
        template,
        source.len(),
        data.education.len(),
        data.experience.len(),
        data.projects.len(),
        data.certifications.len()
    );

    Ok(source)
}
