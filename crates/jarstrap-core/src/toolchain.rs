//! Build variants and the toolchain seam used to compile patched launchers.
//!
//! The launcher is built once per [`BuildVariant`] (build type × architecture)
//! in its own `cmake-build-*` directory next to the template. The actual
//! tools are behind the [`BuildToolchain`] trait; see the `jarstrap-cmake`
//! crate for the CMake + make implementation.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;
use crate::params::LauncherParams;

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildType {
    Release,
    Debug,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Debug => "debug",
        }
    }

    /// Value for `-DCMAKE_BUILD_TYPE`.
    pub fn cmake_name(&self) -> &'static str {
        match self {
            Self::Release => "Release",
            Self::Debug => "Debug",
        }
    }
}

/// Target architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildArch {
    Amd64,
    I386,
}

/// One build configuration of the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildVariant {
    pub build_type: BuildType,
    pub arch: BuildArch,
}

impl BuildVariant {
    pub fn new(build_type: BuildType, arch: BuildArch) -> Self {
        Self { build_type, arch }
    }

    /// Build directory name, e.g. `cmake-build-release` or `cmake-build-debug32`.
    pub fn id(&self) -> String {
        let suffix = match self.arch {
            BuildArch::Amd64 => "",
            BuildArch::I386 => "32",
        };
        format!("cmake-build-{}{suffix}", self.build_type.as_str())
    }

    /// Final file name of this variant's binary for a given base name.
    pub fn binary_file_name(&self, name: &str, windows: bool) -> String {
        let mut file = name.to_string();
        if self.arch == BuildArch::I386 {
            file.push_str("32");
        }
        if self.build_type == BuildType::Debug {
            file.push_str("-debug");
        }
        if windows {
            file.push_str(".exe");
        }
        file
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// Variants to build for the given parameters.
///
/// 64-bit variants are skipped on 32-bit hosts.
pub fn plan_variants(params: &LauncherParams, host_is_64bit: bool) -> Vec<BuildVariant> {
    let mut variants = Vec::new();
    let mut push_arch = |arch| {
        variants.push(BuildVariant::new(BuildType::Release, arch));
        if params.debug {
            variants.push(BuildVariant::new(BuildType::Debug, arch));
        }
    };

    if host_is_64bit {
        push_arch(BuildArch::Amd64);
    } else {
        tracing::info!("32-bit host detected, skipping 64-bit targets");
    }
    if params.build_i386 {
        push_arch(BuildArch::I386);
    }
    variants
}

/// Information about a missing prerequisite tool.
#[derive(Debug, Clone)]
pub struct PrerequisiteError {
    pub tool_name: String,
    pub install_instructions: String,
}

/// Warning about a tool version being below the recommended minimum.
#[derive(Debug, Clone)]
pub struct VersionWarning {
    pub tool_name: String,
    pub found_version: String,
    pub minimum_version: String,
}

/// External build tooling that turns a patched template into binaries.
#[async_trait]
pub trait BuildToolchain: Send + Sync {
    /// Human-readable name, e.g. "cmake".
    fn name(&self) -> &'static str;

    /// Check that all required external tools are installed.
    fn check_prerequisites(&self) -> std::result::Result<(), Vec<PrerequisiteError>>;

    /// Check installed tool versions against recommended minimums.
    ///
    /// Tools whose version cannot be detected are skipped.
    fn check_versions(&self) -> Vec<VersionWarning> {
        vec![]
    }

    /// Generate build files for `variant` in `build_dir` from `source_dir`.
    async fn generate(&self, source_dir: &Path, build_dir: &Path, variant: &BuildVariant)
        -> Result<()>;

    /// Compile in a previously generated `build_dir`.
    async fn make(&self, build_dir: &Path) -> Result<()>;

    /// Where a successful build leaves the launcher binary.
    fn produced_binary(&self, build_dir: &Path) -> PathBuf;
}

/// Generate and compile one variant. Returns the variant's build directory.
pub async fn build_variant(
    toolchain: &dyn BuildToolchain,
    source_dir: &Path,
    variant: &BuildVariant,
) -> Result<PathBuf> {
    let build_dir = source_dir.join(variant.id());
    std::fs::create_dir_all(&build_dir)?;

    tracing::info!("generating build files for {variant}");
    toolchain.generate(source_dir, &build_dir, variant).await?;

    tracing::info!("compiling {variant}");
    toolchain.make(&build_dir).await?;

    Ok(build_dir)
}

/// Create `dir` if needed and delete the regular files inside it.
///
/// Returns the removed paths.
pub fn clean_output_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut removed = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            std::fs::remove_file(&path)?;
            removed.push(path);
        }
    }
    Ok(removed)
}

/// Move a built binary into `dest_dir` under `file_name`.
pub fn move_binary(produced: &Path, dest_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let dest = dest_dir.join(file_name);
    if std::fs::rename(produced, &dest).is_err() {
        // rename fails across filesystems
        std::fs::copy(produced, &dest)?;
        std::fs::remove_file(produced)?;
    }
    Ok(dest)
}
