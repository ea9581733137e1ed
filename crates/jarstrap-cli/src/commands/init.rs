use std::path::Path;

use anyhow::Result;

use jarstrap_cmake::CmakeToolchain;
use jarstrap_core::project;
use jarstrap_core::toolchain::BuildToolchain;

use crate::output;

/// Scaffold a launcher source directory.
///
/// Writes the launcher template and its CMake project into `dir`, then checks
/// that the build tools are installed.
pub async fn run(dir: &Path, name: Option<&str>) -> Result<()> {
    let project_name = match name {
        Some(n) => n.to_string(),
        None => dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "jarstrap".into()),
    };
    output::print_header(&format!("jarstrap-build init: {}", dir.display()));

    output::print_step(1, 2, "Writing launcher template and CMakeLists.txt");
    let template = project::scaffold_launcher(dir, &project_name)?;

    output::print_step(2, 2, "Checking prerequisites");
    let toolchain = CmakeToolchain::new();
    match toolchain.check_prerequisites() {
        Ok(()) => output::print_success("All required tools found"),
        Err(missing) => {
            for m in &missing {
                output::print_warning(&format!(
                    "Missing: {} (install: {})",
                    m.tool_name, m.install_instructions
                ));
            }
        }
    }

    output::print_success(&format!("Launcher '{project_name}' created"));
    println!();
    println!("  Next steps:");
    println!(
        "    jarstrap-build --template {} build --archive path/to/app.jar",
        template.display()
    );
    println!();

    Ok(())
}
