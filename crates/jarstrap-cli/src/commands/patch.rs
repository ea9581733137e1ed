use std::path::Path;

use anyhow::Result;

use jarstrap_core::fsutil::{backup_path, PatchOptions};

use crate::output;
use crate::ParamArgs;

/// Patch the template's config and archive windows without building.
pub fn run(template: &Path, args: &ParamArgs, backup: bool) -> Result<()> {
    output::print_header(&format!("jarstrap-build patch: {}", template.display()));

    output::print_step(1, 3, "Resolving launcher parameters...");
    let mut params = super::resolve_params(template, args)?;
    params.validate()?;
    super::print_params(&params);

    let options = PatchOptions {
        keep_backup: backup,
    };
    let (config, archive) = super::patch_template(template, &params, &options, (2, 3))?;

    output::print_success("Template patched");
    output::print_key_value("Template", &template.display().to_string());
    output::print_key_value(
        "Declarations",
        &format!("{} substituted", config.substituted.len()),
    );
    if let Some(bytes) = archive.payload_bytes {
        output::print_key_value("Archive bytes", &bytes.to_string());
    }
    output::print_key_value("Archive SHA-256", &super::sha256_file(&params.archive)?);
    if backup {
        output::print_key_value("Backup", &backup_path(template).display().to_string());
    }

    Ok(())
}
