//! CMake + make toolchain for jarstrap.
//!
//! Each build variant is configured with `cmake -G "<Unix|MinGW> Makefiles"`
//! in its own `cmake-build-*` directory and compiled with `make` (or
//! `mingw32-make` on Windows). The launcher's CMake project always produces an
//! executable named `jarstrap`, which the driver renames when moving it out.
//!
//! **Prerequisites**: `cmake`, `make` / `mingw32-make`

mod command;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use jarstrap_core::error::Result;
use jarstrap_core::toolchain::{BuildToolchain, BuildVariant, PrerequisiteError, VersionWarning};

pub use command::{cmake_args, generator, parse_cmake_version};

/// Lowest CMake version the launcher's `CMakeLists.txt` accepts.
pub const MIN_CMAKE_VERSION: (u32, u32) = (3, 10);

/// Executable name produced by the launcher's CMake project.
pub const PRODUCED_BINARY: &str = if cfg!(windows) { "jarstrap.exe" } else { "jarstrap" };

/// Toolchain driving `cmake` and `make`.
pub struct CmakeToolchain;

impl Default for CmakeToolchain {
    fn default() -> Self {
        Self
    }
}

impl CmakeToolchain {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BuildToolchain for CmakeToolchain {
    fn name(&self) -> &'static str {
        "cmake"
    }

    fn check_prerequisites(&self) -> std::result::Result<(), Vec<PrerequisiteError>> {
        let mut missing = Vec::new();

        if which::which("cmake").is_err() {
            missing.push(PrerequisiteError {
                tool_name: "cmake".into(),
                install_instructions: "https://cmake.org/download/".into(),
            });
        }

        if command::find_make().is_none() {
            missing.push(PrerequisiteError {
                tool_name: command::make_tool_name().into(),
                install_instructions: command::make_install_hint().into(),
            });
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }

    fn check_versions(&self) -> Vec<VersionWarning> {
        let Ok(output) = std::process::Command::new("cmake").arg("--version").output() else {
            return vec![];
        };
        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_cmake_version(&stdout) {
            Some(found) if found < MIN_CMAKE_VERSION => vec![VersionWarning {
                tool_name: "cmake".into(),
                found_version: format!("{}.{}", found.0, found.1),
                minimum_version: format!("{}.{}", MIN_CMAKE_VERSION.0, MIN_CMAKE_VERSION.1),
            }],
            _ => vec![],
        }
    }

    async fn generate(
        &self,
        source_dir: &Path,
        build_dir: &Path,
        variant: &BuildVariant,
    ) -> Result<()> {
        command::configure(source_dir, build_dir, variant).await
    }

    async fn make(&self, build_dir: &Path) -> Result<()> {
        command::make(build_dir).await
    }

    fn produced_binary(&self, build_dir: &Path) -> PathBuf {
        build_dir.join(PRODUCED_BINARY)
    }
}
