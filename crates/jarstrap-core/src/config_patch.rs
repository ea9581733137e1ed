//! Config window pass: rewrites the launcher's configuration constants.

use std::path::Path;

use crate::declaration::{self, ConfigValues, Declaration};
use crate::error::Result;
use crate::fsutil::{self, PatchOptions};
use crate::window::{self, Markers, PatchReport, WindowStrategy};

pub const CONFIG_MARKERS: Markers = Markers::new("CONFIG START", "CONFIG END");

/// Lines not starting with this are never considered for substitution.
const LINE_PREFIX: &str = "static const";

/// The replacement declaration for `line`, if it is a recognized declaration
/// with a supplied value.
pub fn substitute_line(line: &str, values: &ConfigValues) -> Option<Declaration> {
    if !line.starts_with(LINE_PREFIX) {
        return None;
    }
    let decl = declaration::parse(line)?;
    let value = values.get(decl.name)?;
    Some(decl.with_value(value.clone()))
}

/// Patch the config window of an in-memory template.
pub fn patch_config_text(text: &str, values: &ConfigValues) -> Result<(String, PatchReport)> {
    let (out, report) =
        window::run_to_string(text, &CONFIG_MARKERS, &mut WindowStrategy::substitute(values))?;

    if report.windows_opened == 0 {
        tracing::warn!("no '{}' marker found; template left unchanged", CONFIG_MARKERS.start);
    }
    for name in report.unpatched(values) {
        tracing::warn!("no declaration for {name} in the config window; value not applied");
    }

    Ok((out, report))
}

/// Patch the config window of the template at `path` in place.
pub fn patch_config(path: &Path, values: &ConfigValues, options: &PatchOptions) -> Result<PatchReport> {
    let text = fsutil::read_template(path)?;
    let (out, report) = patch_config_text(&text, values)?;
    fsutil::replace_atomically(path, out.as_bytes(), options)?;

    tracing::info!(
        "patched {} declaration(s) in {}",
        report.substituted.len(),
        path.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::DeclName;
    use std::fs;

    const TEMPLATE: &str = "#include <stdio.h>\n\
        // CONFIG START\n\
        static const char APP_NAME[] = \"Old\";\n\
        static const unsigned int MIN_JAVA_VERSION = 8;\n\
        // CONFIG END\n\
        int main() { return 0; }\n";

    fn values() -> ConfigValues {
        ConfigValues::new()
            .with(DeclName::AppName, "NewApp")
            .with(DeclName::MinJavaVersion, 11)
    }

    #[test]
    fn test_end_to_end_scenario() {
        let (out, report) = patch_config_text(TEMPLATE, &values()).unwrap();
        assert_eq!(
            out,
            "#include <stdio.h>\n\
             // CONFIG START\n\
             static const char APP_NAME[] = \"NewApp\";\n\
             static const unsigned int MIN_JAVA_VERSION = 11;\n\
             // CONFIG END\n\
             int main() { return 0; }\n"
        );
        assert_eq!(report.substituted, vec![DeclName::AppName, DeclName::MinJavaVersion]);
        assert!(report.unpatched(&values()).is_empty());
    }

    #[test]
    fn test_unknown_and_malformed_lines_pass_through() {
        let template = "// CONFIG START\n\
            static const char INSTALL_PROMPT[] = \"Install?\";\n\
            static const unsigned int MIN_JAVA_VERSION=8;\n\
            const unsigned int MIN_JAVA_VERSION = 8;\n\
            \x20static const unsigned int MIN_JAVA_VERSION = 8;\n\
            // CONFIG END\n";
        let (out, report) = patch_config_text(template, &values()).unwrap();
        assert_eq!(out, template);
        assert!(report.substituted.is_empty());
        assert_eq!(
            report.unpatched(&values()),
            vec![DeclName::AppName, DeclName::MinJavaVersion]
        );
    }

    #[test]
    fn test_untyped_old_values_are_still_replaced() {
        let template = "// CONFIG START\n\
            static const unsigned int MIN_JAVA_VERSION = 8u;\n\
            static const char APP_NAME[] = \"Old\" ;\n\
            // CONFIG END\n";
        let (out, report) = patch_config_text(template, &values()).unwrap();
        assert_eq!(
            out,
            "// CONFIG START\n\
             static const unsigned int MIN_JAVA_VERSION = 11;\n\
             static const char APP_NAME[] = \"NewApp\";\n\
             // CONFIG END\n"
        );
        assert_eq!(report.substituted, vec![DeclName::MinJavaVersion, DeclName::AppName]);
        assert!(report.unpatched(&values()).is_empty());
    }

    #[test]
    fn test_recognized_name_without_value_passes_through() {
        let template = "// CONFIG START\nstatic const unsigned int PREFERRED_JAVA_VERSION = 17;\n// CONFIG END\n";
        let (out, _) = patch_config_text(template, &values()).unwrap();
        assert_eq!(out, template);
    }

    #[test]
    fn test_substitute_line() {
        let decl = substitute_line("static const unsigned int MIN_JAVA_VERSION = 8;", &values())
            .unwrap();
        assert_eq!(decl.value.as_uint(), Some(11));
        assert!(substitute_line("unsigned int MIN_JAVA_VERSION = 8;", &values()).is_none());
    }

    #[test]
    fn test_patch_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.c");
        fs::write(&path, TEMPLATE).unwrap();

        let report = patch_config(&path, &values(), &PatchOptions::default()).unwrap();
        assert_eq!(report.substituted.len(), 2);

        let patched = fs::read_to_string(&path).unwrap();
        assert!(patched.contains("static const char APP_NAME[] = \"NewApp\";\n"));
        assert!(patched.contains("// CONFIG START\n"));
        assert!(patched.contains("// CONFIG END\n"));
        assert!(!fsutil::backup_path(&path).exists());
    }

    #[test]
    fn test_patch_config_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.c");
        assert!(patch_config(&path, &values(), &PatchOptions::default()).is_err());
        assert!(!path.exists());
    }
}
