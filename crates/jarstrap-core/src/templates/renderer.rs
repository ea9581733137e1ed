//! Handlebars rendering of the launcher's `CMakeLists.txt`.
//!
//! Strict mode: a `{{variable}}` missing from the data context is an error.

use handlebars::Handlebars;
use serde_json::Value;

use crate::error::{JarstrapError, Result};
use crate::templates::embedded;

/// Renders scaffolding templates with Handlebars.
pub struct TemplateRenderer {
    hbs: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Create a new renderer with strict mode enabled.
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        Self { hbs }
    }

    /// Render a template string with the given data context.
    pub fn render(&self, template: &str, data: &Value) -> Result<String> {
        self.hbs
            .render_template(template, data)
            .map_err(|e| JarstrapError::TemplateRender(e.to_string()))
    }

    /// Render the launcher's `CMakeLists.txt` for `project_name`.
    ///
    /// CMake project names may not contain whitespace, so anything other than
    /// ASCII alphanumerics, `_` and `-` becomes `_`.
    pub fn render_cmakelists(&self, project_name: &str) -> Result<String> {
        self.render(
            embedded::LAUNCHER_CMAKELISTS,
            &serde_json::json!({ "project_name": cmake_project_name(project_name) }),
        )
    }
}

fn cmake_project_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "jarstrap".into()
    } else {
        cleaned
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}
