//! Launcher source directory scaffolding.
//!
//! ```text
//! <dir>/
//! ├── main.c            # launcher template with CONFIG / ARCHIVE DATA windows
//! └── CMakeLists.txt    # builds the `jarstrap` executable
//! ```
//!
//! Build variants later add `cmake-build-*` directories next to these files.

use std::path::{Path, PathBuf};

use crate::error::{JarstrapError, Result};
use crate::templates::embedded;
use crate::templates::renderer::TemplateRenderer;

/// Template file name inside a launcher directory.
pub const TEMPLATE_FILE: &str = "main.c";

/// Write a fresh launcher template and CMake project into `dir`.
///
/// Returns the path of the written template.
pub fn scaffold_launcher(dir: &Path, project_name: &str) -> Result<PathBuf> {
    let template = dir.join(TEMPLATE_FILE);
    if template.exists() {
        return Err(JarstrapError::ProjectExists(template));
    }

    std::fs::create_dir_all(dir)?;

    let cmake = TemplateRenderer::new().render_cmakelists(project_name)?;

    std::fs::write(&template, embedded::LAUNCHER_MAIN_C)?;
    std::fs::write(dir.join("CMakeLists.txt"), cmake)?;

    tracing::info!("scaffolded launcher in {}", dir.display());
    Ok(template)
}
