use std::path::{Path, PathBuf};

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};

use jarstrap_cmake::CmakeToolchain;
use jarstrap_core::fsutil::PatchOptions;
use jarstrap_core::params::LauncherParams;
use jarstrap_core::toolchain::{
    build_variant, clean_output_dir, move_binary, plan_variants, BuildToolchain, BuildVariant,
};

use crate::output;
use crate::ParamArgs;

/// Options for `jarstrap-build build` beyond the launcher parameters.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub interactive: bool,
    pub assume_yes: bool,
    pub out_dir: PathBuf,
    pub binary_name: Option<String>,
    pub save_params: Option<PathBuf>,
    pub backup: bool,
}

/// Patch the template and build every launcher variant.
///
/// Resolves parameters (optionally through the interactive menu), embeds the
/// config and archive into the template, compiles each planned variant with
/// CMake, and moves the finished binaries to the output directory. Fails if
/// any variant fails to build.
pub async fn run(template: &Path, args: &ParamArgs, options: &BuildOptions) -> Result<()> {
    output::print_header("jarstrap-build build");

    let mut params = super::resolve_params(template, args)?;
    if options.interactive {
        if !edit_params(&mut params)? {
            output::print_warning("Build cancelled");
            return Ok(());
        }
    } else {
        params.validate()?;
        super::print_params(&params);
    }

    if let Some(path) = &options.save_params {
        params.save(path)?;
        output::print_key_value("Parameters saved", &path.display().to_string());
    }

    let toolchain = CmakeToolchain::new();

    // Check prerequisites
    if let Err(missing) = toolchain.check_prerequisites() {
        for m in &missing {
            output::print_error(&format!(
                "Missing tool: {} ({})",
                m.tool_name, m.install_instructions
            ));
        }
        anyhow::bail!("missing prerequisites");
    }

    // Check versions
    for w in toolchain.check_versions() {
        output::print_warning(&format!(
            "{}: found v{}, minimum v{} recommended",
            w.tool_name, w.found_version, w.minimum_version
        ));
    }

    let patch_options = PatchOptions {
        keep_backup: options.backup,
    };
    super::patch_template(template, &params, &patch_options, (1, 3))?;
    output::print_key_value("Archive SHA-256", &super::sha256_file(&params.archive)?);

    let variants = plan_variants(&params, cfg!(target_pointer_width = "64"));
    if variants.is_empty() {
        anyhow::bail!("nothing to build: 32-bit builds are disabled on a 32-bit host");
    }

    output::print_step(3, 3, &format!("Building {} variant(s)...", variants.len()));
    let source_dir = std::path::absolute(super::template_dir(template))?;
    let results = build_all(&toolchain, &source_dir, &variants).await;

    println!();
    let mut built = Vec::new();
    let mut failed = 0usize;
    for (variant, result) in variants.iter().zip(results) {
        match result {
            Ok(binary) => {
                output::print_outcome(true, &variant.id());
                built.push((*variant, binary));
            }
            Err(e) => {
                output::print_outcome(false, &format!("{}: {e}", variant.id()));
                failed += 1;
            }
        }
    }

    if !built.is_empty() {
        let name = options
            .binary_name
            .clone()
            .unwrap_or_else(|| params.default_binary_name());
        if confirm_move(options)? {
            let moved = relocate(&built, &options.out_dir, &name)?;
            for path in &moved {
                output::print_key_value("Binary", &path.display().to_string());
            }
        } else {
            for (_, binary) in &built {
                output::print_key_value("Binary", &binary.display().to_string());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} variant(s) failed to build", variants.len());
    }
    output::print_success("Build complete");
    Ok(())
}

/// Build the variants one after another. Returns the produced binary per
/// variant, in order.
async fn build_all(
    toolchain: &dyn BuildToolchain,
    source_dir: &Path,
    variants: &[BuildVariant],
) -> Vec<anyhow::Result<PathBuf>> {
    let mut results = Vec::with_capacity(variants.len());
    for variant in variants {
        let spinner = output::spinner(format!("{variant} ({})", toolchain.name()));
        let result = build_variant(toolchain, source_dir, variant)
            .await
            .map(|build_dir| toolchain.produced_binary(&build_dir))
            .map_err(anyhow::Error::from)
            .and_then(|binary| {
                if binary.is_file() {
                    Ok(binary)
                } else {
                    Err(anyhow::anyhow!("{} was not produced", binary.display()))
                }
            });
        spinner.finish_and_clear();
        if let Err(e) = &result {
            tracing::warn!("{variant} failed: {e}");
        }
        results.push(result);
    }
    results
}

fn confirm_move(options: &BuildOptions) -> Result<bool> {
    if options.assume_yes {
        return Ok(true);
    }
    if !options.interactive {
        return Ok(false);
    }
    let answer = Confirm::new()
        .with_prompt(format!(
            "Move binaries to {}? Existing files there are deleted",
            options.out_dir.display()
        ))
        .default(true)
        .interact()?;
    Ok(answer)
}

/// Clear `out_dir` and move each built binary into it under its final name.
fn relocate(built: &[(BuildVariant, PathBuf)], out_dir: &Path, name: &str) -> Result<Vec<PathBuf>> {
    for old in clean_output_dir(out_dir)? {
        tracing::debug!("removed {}", old.display());
    }
    let mut moved = Vec::with_capacity(built.len());
    for (variant, binary) in built {
        let file_name = variant.binary_file_name(name, cfg!(windows));
        moved.push(move_binary(binary, out_dir, &file_name)?);
    }
    Ok(moved)
}

/// Interactive parameter menu. Returns `false` if the user quits.
///
/// Loops until the parameters validate and the user chooses to continue.
fn edit_params(params: &mut LauncherParams) -> Result<bool> {
    loop {
        let entries = params.entries();
        let mut items: Vec<String> = entries
            .iter()
            .map(|(index, label, value)| format!("{index}. {label}: {}", super::shown(value)))
            .collect();
        items.push("Continue".into());
        items.push("Quit".into());

        let selection = Select::new()
            .with_prompt("Launcher parameters (select one to change)")
            .items(&items)
            .default(entries.len())
            .interact()?;

        if selection == entries.len() + 1 {
            return Ok(false);
        }
        if selection == entries.len() {
            match params.validate() {
                Ok(()) => return Ok(true),
                Err(e) => {
                    output::print_error(&e.to_string());
                    continue;
                }
            }
        }

        let (index, label, current) = &entries[selection];
        let raw: String = Input::new()
            .with_prompt(*label)
            .with_initial_text(current.as_str())
            .allow_empty(true)
            .interact_text()?;
        if let Err(e) = params.set_indexed(*index, &raw) {
            output::print_error(&e.to_string());
        }
    }
}
