//! Read-only scan of the template's current configuration values.
//!
//! Shares the declaration codec with the config pass but never writes.

use std::path::Path;

use crate::config_patch::CONFIG_MARKERS;
use crate::declaration::{self, ConfigValues};
use crate::error::Result;
use crate::fsutil;

/// Collect the recognized declarations of the first config window in `text`.
///
/// Later duplicates of the same name win.
pub fn scan_defaults(text: &str) -> ConfigValues {
    let mut values = ConfigValues::new();
    let mut in_config = false;

    for line in text.lines() {
        if !in_config {
            in_config = CONFIG_MARKERS.is_activator(line);
            continue;
        }
        if CONFIG_MARKERS.is_deactivator(line) {
            break;
        }
        if !line.starts_with("static const") {
            continue;
        }
        match declaration::parse(line) {
            Some(decl) if !decl.value.is_raw() => values.insert(decl.name, decl.value),
            _ => {}
        }
    }

    values
}

/// Scan the template at `path`.
pub fn load_defaults(path: &Path) -> Result<ConfigValues> {
    let text = fsutil::read_template(path)?;
    let values = scan_defaults(&text);
    tracing::debug!("loaded {} default(s) from {}", values.len(), path.display());
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{DeclName, DeclValue};
    use crate::templates::embedded;

    #[test]
    fn test_scan_launcher_template() {
        let values = scan_defaults(embedded::LAUNCHER_MAIN_C);
        assert_eq!(values.get(DeclName::AppName), Some(&DeclValue::from("JARStrap")));
        assert_eq!(values.get(DeclName::MinJavaVersion), Some(&DeclValue::UInt(8)));
        assert_eq!(values.get(DeclName::PreferredJavaVersion), Some(&DeclValue::UInt(17)));
        assert_eq!(values.get(DeclName::LaunchFlags), Some(&DeclValue::from("")));
    }

    #[test]
    fn test_scan_ignores_lines_outside_window() {
        let text = "static const unsigned int MIN_JAVA_VERSION = 1;\n\
                    // CONFIG START\n\
                    static const unsigned int MIN_JAVA_VERSION = 8;\n\
                    // CONFIG END\n\
                    static const unsigned int PREFERRED_JAVA_VERSION = 99;\n\
                    // CONFIG START\n\
                    static const char APP_NAME[] = \"Second\";\n\
                    // CONFIG END\n";
        let values = scan_defaults(text);
        assert_eq!(values.len(), 1);
        assert_eq!(values.get(DeclName::MinJavaVersion), Some(&DeclValue::UInt(8)));
    }

    #[test]
    fn test_scan_without_window() {
        assert!(scan_defaults("static const unsigned int MIN_JAVA_VERSION = 8;\n").is_empty());
    }

    #[test]
    fn test_scan_skips_untyped_values() {
        let text = "// CONFIG START\n\
                    static const unsigned int MIN_JAVA_VERSION = 8u;\n\
                    static const unsigned int PREFERRED_JAVA_VERSION = 21;\n\
                    // CONFIG END\n";
        let values = scan_defaults(text);
        assert_eq!(values.get(DeclName::MinJavaVersion), None);
        assert_eq!(values.get(DeclName::PreferredJavaVersion), Some(&DeclValue::UInt(21)));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let text = "// CONFIG START\n\
                    static const unsigned int MIN_JAVA_VERSION = 8;\n\
                    static const unsigned int MIN_JAVA_VERSION = 9;\n";
        let values = scan_defaults(text);
        assert_eq!(values.get(DeclName::MinJavaVersion), Some(&DeclValue::UInt(9)));
    }

    #[test]
    fn test_load_defaults_does_not_modify_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.c");
        std::fs::write(&path, embedded::LAUNCHER_MAIN_C).unwrap();

        let values = load_defaults(&path).unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), embedded::LAUNCHER_MAIN_C);
    }
}
