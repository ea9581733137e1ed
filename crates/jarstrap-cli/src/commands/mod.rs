//! CLI command implementations for jarstrap-build.
//!
//! Each module corresponds to a subcommand (`jarstrap-build <command>`).

pub mod build;
pub mod defaults;
pub mod init;
pub mod patch;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use jarstrap_core::archive_patch;
use jarstrap_core::config_patch;
use jarstrap_core::defaults::load_defaults;
use jarstrap_core::fsutil::PatchOptions;
use jarstrap_core::params::{LauncherParams, ParamOverrides, PARAMS_FILE};
use jarstrap_core::window::PatchReport;

use crate::output;
use crate::ParamArgs;

/// Directory holding the template; `.` for a bare file name.
pub fn template_dir(template: &Path) -> PathBuf {
    match template.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolve launcher parameters: built-in defaults, then the template's own
/// declarations, then the parameter file, then command-line flags.
pub fn resolve_params(template: &Path, args: &ParamArgs) -> Result<LauncherParams> {
    let mut params = LauncherParams::default();
    params.apply_defaults(&load_defaults(template)?);

    let file = match &args.params {
        Some(path) => Some(path.clone()),
        None => {
            let candidate = template_dir(template).join(PARAMS_FILE);
            candidate.is_file().then_some(candidate)
        }
    };
    let mut overrides = ParamOverrides::default();
    if let Some(path) = file {
        tracing::info!("loading parameters from {}", path.display());
        overrides = ParamOverrides::load(&path)?;
    }
    overrides.merge(args.overrides()).apply(&mut params);

    Ok(params)
}

/// Hex SHA-256 of a file.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Run the config pass then the archive pass on `template`.
///
/// `params` must already be validated.
pub fn patch_template(
    template: &Path,
    params: &LauncherParams,
    options: &PatchOptions,
    steps: (u32, u32),
) -> Result<(PatchReport, PatchReport)> {
    let (first, total) = steps;

    output::print_step(first, total, "Patching launcher config...");
    let config = config_patch::patch_config(template, &params.config_values(), options)?;
    if config.windows_opened == 0 {
        output::print_warning("no CONFIG START marker found; config left unchanged");
    }
    for name in config.unpatched(&params.config_values()) {
        output::print_warning(&format!("{name} was not found in the config window"));
    }

    output::print_step(first + 1, total, "Embedding Java archive...");
    let archive = archive_patch::patch_archive(template, &params.archive, options)?;
    if archive.windows_opened == 0 {
        output::print_warning("no ARCHIVE DATA START marker found; archive not embedded");
    }

    Ok((config, archive))
}

/// Print the resolved parameters.
pub fn print_params(params: &LauncherParams) {
    for (_, label, value) in params.entries() {
        output::print_key_value(label, shown(&value));
    }
}

/// Empty values are shown as `None`.
pub fn shown(value: &str) -> &str {
    if value.is_empty() {
        "None"
    } else {
        value
    }
}
