use std::path::{Path, PathBuf};

use tokio::process::Command;

use jarstrap_core::error::{JarstrapError, Result};
use jarstrap_core::toolchain::{BuildArch, BuildVariant};

/// CMake generator for the host platform.
pub fn generator() -> &'static str {
    if cfg!(windows) {
        "MinGW Makefiles"
    } else {
        "Unix Makefiles"
    }
}

/// Arguments for `cmake` to configure `variant` from `source_dir`.
pub fn cmake_args(source_dir: &Path, variant: &BuildVariant) -> Vec<String> {
    let mut args = vec![
        "-G".to_string(),
        generator().to_string(),
        source_dir.display().to_string(),
        format!("-DCMAKE_BUILD_TYPE={}", variant.build_type.cmake_name()),
    ];
    if variant.arch == BuildArch::I386 {
        args.push("-DCMAKE_C_FLAGS=-m32".to_string());
    }
    args
}

/// Run `cmake` in `build_dir`.
pub async fn configure(source_dir: &Path, build_dir: &Path, variant: &BuildVariant) -> Result<()> {
    let output = Command::new("cmake")
        .args(cmake_args(source_dir, variant))
        .current_dir(build_dir)
        .output()
        .await;

    match output {
        Ok(out) if out.status.success() => {
            tracing::info!("cmake generated build files for {variant}");
            Ok(())
        }
        Ok(out) => Err(JarstrapError::Build(format!(
            "cmake failed for {variant}: {}",
            String::from_utf8_lossy(&out.stderr)
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(JarstrapError::MissingTool {
            name: "cmake".into(),
            install: "https://cmake.org/download/".into(),
        }),
        Err(e) => Err(JarstrapError::Build(e.to_string())),
    }
}

/// Locate the make tool: `make`, or `mingw32-make` on Windows.
pub fn find_make() -> Option<PathBuf> {
    if let Ok(path) = which::which("make") {
        return Some(path);
    }
    if cfg!(windows) {
        return which::which("mingw32-make").ok();
    }
    None
}

/// Run make in `build_dir`.
pub async fn make(build_dir: &Path) -> Result<()> {
    let tool = find_make().ok_or_else(|| JarstrapError::MissingTool {
        name: make_tool_name().into(),
        install: make_install_hint().into(),
    })?;

    let output = Command::new(&tool).current_dir(build_dir).output().await;

    match output {
        Ok(out) if out.status.success() => {
            tracing::info!("make succeeded in {}", build_dir.display());
            Ok(())
        }
        Ok(out) => Err(JarstrapError::Build(format!(
            "{} failed in {}: {}",
            tool.display(),
            build_dir.display(),
            String::from_utf8_lossy(&out.stderr)
        ))),
        Err(e) => Err(JarstrapError::Build(e.to_string())),
    }
}

pub fn make_tool_name() -> &'static str {
    if cfg!(windows) {
        "mingw32-make"
    } else {
        "make"
    }
}

pub fn make_install_hint() -> &'static str {
    if cfg!(windows) {
        "https://www.mingw-w64.org/"
    } else {
        "install GNU Make from your package manager"
    }
}

/// Parse `major.minor` from `cmake --version` output.
pub fn parse_cmake_version(output: &str) -> Option<(u32, u32)> {
    let version = output
        .lines()
        .next()?
        .split_whitespace()
        .find(|word| word.starts_with(|c: char| c.is_ascii_digit()))?;
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor: String = parts
        .next()?
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Some((major, minor.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jarstrap_core::toolchain::BuildType;

    #[test]
    fn test_cmake_args_release() {
        let variant = BuildVariant::new(BuildType::Release, BuildArch::Amd64);
        let args = cmake_args(Path::new("/src"), &variant);
        assert_eq!(
            args,
            vec![
                "-G".to_string(),
                generator().to_string(),
                "/src".to_string(),
                "-DCMAKE_BUILD_TYPE=Release".to_string(),
            ]
        );
    }

    #[test]
    fn test_cmake_args_debug_i386() {
        let variant = BuildVariant::new(BuildType::Debug, BuildArch::I386);
        let args = cmake_args(Path::new("/src"), &variant);
        assert!(args.contains(&"-DCMAKE_BUILD_TYPE=Debug".to_string()));
        assert_eq!(args.last().unwrap(), "-DCMAKE_C_FLAGS=-m32");
    }

    #[test]
    fn test_parse_cmake_version() {
        assert_eq!(parse_cmake_version("cmake version 3.28.3\n\nCMake suite maintained"), Some((3, 28)));
        assert_eq!(parse_cmake_version("cmake version 3.10.0-rc1"), Some((3, 10)));
        assert_eq!(parse_cmake_version("cmake version 4.0"), Some((4, 0)));
        assert_eq!(parse_cmake_version("no version"), None);
        assert_eq!(parse_cmake_version(""), None);
    }
}
