//! Document rendering collaborator
//!
//! The contract document is produced by substituting `<<KEY>>` placeholders
//! with the composed field map. [`DocumentRenderer`] is the seam the form
//! talks to; [`TemplateRenderer`] is the plain-text implementation used here
//! and in tests. Binary formats plug in behind the same trait.

use crate::contract::TemplateId;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use thiserror::Error;

/// Placeholder syntax of the shipped templates
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<<([^<>]+)>>").unwrap_or_else(|e| panic!("invalid placeholder regex: {e}"))
});

/// Rendering failures
#[derive(Debug, Error)]
pub enum RenderError {
    /// No template registered for the requested id
    #[error("no template registered for {0:?}")]
    MissingTemplate(TemplateId),
    /// Underlying writer failure
    #[error("document output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Fills a template with the composed contract fields
pub trait DocumentRenderer {
    /// Render the document bytes for a template and field map
    fn render(
        &self,
        template: TemplateId,
        fields: &IndexMap<String, String>,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Delivers a rendered document to its destination (download, print queue)
pub trait DocumentExporter {
    /// Hand the rendered bytes off under the given file name
    fn export(&self, file_name: &str, document: &[u8]) -> Result<(), RenderError>;
}

/// Text-template renderer substituting `<<KEY>>` placeholders.
///
/// Keys absent from the field map render as the empty string, so an
/// incomplete form still yields a readable document.
#[derive(Debug, Default)]
pub struct TemplateRenderer {
    templates: HashMap<TemplateId, String>,
}

impl TemplateRenderer {
    /// Empty renderer with no templates registered
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the template for an id
    #[must_use]
    pub fn with_template(mut self, id: TemplateId, template: impl Into<String>) -> Self {
        self.templates.insert(id, template.into());
        self
    }

    /// Substitute the fields into a raw template string
    #[must_use]
    pub fn substitute(template: &str, fields: &IndexMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                fields.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned()
    }
}

impl DocumentRenderer for TemplateRenderer {
    fn render(
        &self,
        template: TemplateId,
        fields: &IndexMap<String, String>,
    ) -> Result<Vec<u8>, RenderError> {
        let body = self
            .templates
            .get(&template)
            .ok_or(RenderError::MissingTemplate(template))?;
        Ok(Self::substitute(body, fields).into_bytes())
    }
}
