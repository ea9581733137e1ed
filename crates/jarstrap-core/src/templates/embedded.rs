//! Compile-time embedded templates.
//!
//! Paths are relative to this source file
//! (`crates/jarstrap-core/src/templates/embedded.rs`).

/// Launcher source with `CONFIG` and `ARCHIVE DATA` windows.
pub const LAUNCHER_MAIN_C: &str = include_str!("../../../../templates/launcher/main.c");

/// CMake project for the launcher. Handlebars; needs `project_name`.
pub const LAUNCHER_CMAKELISTS: &str =
    include_str!("../../../../templates/launcher/CMakeLists.txt.tmpl");
