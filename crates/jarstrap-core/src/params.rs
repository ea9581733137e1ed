//! Launcher build parameters.
//!
//! Values start from built-in defaults, are overlaid with whatever the
//! template currently declares (see [`crate::defaults`]), then with
//! [`ParamOverrides`] from a JSON parameter file and the command line.
//! [`LauncherParams::validate`] must pass before the template is patched.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::declaration::{ConfigValues, DeclName};
use crate::error::{JarstrapError, Result};

/// Default parameter file name, looked up next to the template.
pub const PARAMS_FILE: &str = "jarstrap.params.json";

/// Lowest Java version a launcher may require.
pub const MIN_SUPPORTED_JAVA: u32 = 5;
/// Lowest Java version a launcher may offer to download.
pub const MIN_PREFERRED_JAVA: u32 = 8;

/// Characters that cannot appear in a string constant without breaking the
/// declaration grammar on the next scan.
const FORBIDDEN_CHARS: [char; 5] = ['"', '\\', ';', '\r', '\n'];

/// Partial parameters from a JSON file or the command line.
///
/// Only the fields that are set replace the current values, so a parameter
/// file can hold just the values that differ from the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamOverrides {
    pub app_name: Option<String>,
    pub archive: Option<PathBuf>,
    pub min_java_version: Option<u32>,
    pub preferred_java_version: Option<u32>,
    pub launch_flags: Option<String>,
    pub debug: Option<bool>,
    pub build_i386: Option<bool>,
}

impl ParamOverrides {
    /// Load overrides from a JSON parameter file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| JarstrapError::ConfigNotFound {
                path: path.to_path_buf(),
                source: e,
            })?;
        serde_json::from_str(&contents).map_err(|e| JarstrapError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Fields set in `other` win over fields set in `self`.
    pub fn merge(self, other: ParamOverrides) -> Self {
        Self {
            app_name: other.app_name.or(self.app_name),
            archive: other.archive.or(self.archive),
            min_java_version: other.min_java_version.or(self.min_java_version),
            preferred_java_version: other.preferred_java_version.or(self.preferred_java_version),
            launch_flags: other.launch_flags.or(self.launch_flags),
            debug: other.debug.or(self.debug),
            build_i386: other.build_i386.or(self.build_i386),
        }
    }

    pub fn apply(&self, params: &mut LauncherParams) {
        if let Some(v) = &self.app_name {
            params.app_name = v.clone();
        }
        if let Some(v) = &self.archive {
            params.archive = v.clone();
        }
        if let Some(v) = self.min_java_version {
            params.min_java_version = v;
        }
        if let Some(v) = self.preferred_java_version {
            params.preferred_java_version = v;
        }
        if let Some(v) = &self.launch_flags {
            params.launch_flags = v.clone();
        }
        if let Some(v) = self.debug {
            params.debug = v;
        }
        if let Some(v) = self.build_i386 {
            params.build_i386 = v;
        }
    }
}

/// Everything needed to patch and build one launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LauncherParams {
    /// Application name shown by the launcher; also the default binary name.
    pub app_name: String,
    /// Java archive to embed.
    pub archive: PathBuf,
    /// Lowest Java major version the launcher accepts.
    pub min_java_version: u32,
    /// Java major version offered for download when none is found.
    pub preferred_java_version: u32,
    /// Extra JVM flags passed on launch.
    pub launch_flags: String,
    /// Also build debug variants.
    pub debug: bool,
    /// Also build 32-bit variants.
    pub build_i386: bool,
}

impl Default for LauncherParams {
    fn default() -> Self {
        Self {
            app_name: "JARStrap".into(),
            archive: PathBuf::from("archive/sample.jar"),
            min_java_version: 8,
            preferred_java_version: 17,
            launch_flags: String::new(),
            debug: false,
            build_i386: default_build_i386(),
        }
    }
}

// Windows hosts build i386 variants only when they are 32-bit themselves.
fn default_build_i386() -> bool {
    if cfg!(windows) {
        cfg!(target_pointer_width = "32")
    } else {
        true
    }
}

impl LauncherParams {
    /// Save parameters as a pretty-printed JSON parameter file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            JarstrapError::Other(anyhow::Error::new(e).context("serializing parameters"))
        })?;
        std::fs::write(path, json).map_err(|e| JarstrapError::ConfigWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Overlay values scanned from a template.
    ///
    /// Values whose type does not match the field are ignored.
    pub fn apply_defaults(&mut self, values: &ConfigValues) {
        for (name, value) in values.iter() {
            match name {
                DeclName::AppName => {
                    if let Some(s) = value.as_text() {
                        self.app_name = s.to_string();
                    }
                }
                DeclName::MinJavaVersion => {
                    if let Some(n) = value.as_uint() {
                        self.min_java_version = n;
                    }
                }
                DeclName::PreferredJavaVersion => {
                    if let Some(n) = value.as_uint() {
                        self.preferred_java_version = n;
                    }
                }
                DeclName::LaunchFlags => {
                    if let Some(s) = value.as_text() {
                        self.launch_flags = s.to_string();
                    }
                }
            }
        }
    }

    /// Values for the config window.
    pub fn config_values(&self) -> ConfigValues {
        ConfigValues::new()
            .with(DeclName::AppName, self.app_name.as_str())
            .with(DeclName::MinJavaVersion, self.min_java_version)
            .with(DeclName::PreferredJavaVersion, self.preferred_java_version)
            .with(DeclName::LaunchFlags, self.launch_flags.as_str())
    }

    /// Check the parameters and make the archive path absolute.
    pub fn validate(&mut self) -> Result<()> {
        if self.preferred_java_version < self.min_java_version {
            return Err(JarstrapError::InvalidParam(format!(
                "Preferred Java Version ({}) is less than Minimum Java Version ({})",
                self.preferred_java_version, self.min_java_version
            )));
        }
        if self.min_java_version < MIN_SUPPORTED_JAVA {
            return Err(JarstrapError::InvalidParam(format!(
                "Minimum Java Version ({}) is less than {MIN_SUPPORTED_JAVA}",
                self.min_java_version
            )));
        }
        if self.preferred_java_version < MIN_PREFERRED_JAVA {
            return Err(JarstrapError::InvalidParam(format!(
                "Preferred Java Version ({}) is less than {MIN_PREFERRED_JAVA}",
                self.preferred_java_version
            )));
        }

        check_text("App Name", &self.app_name)?;
        check_text("Launch Flags", &self.launch_flags)?;
        if self.app_name.trim().is_empty() {
            return Err(JarstrapError::InvalidParam("App Name is empty".into()));
        }

        self.archive = std::path::absolute(&self.archive)?;
        if !self.archive.is_file() {
            return Err(JarstrapError::InvalidParam(format!(
                "JAR File {} is not a file",
                self.archive.display()
            )));
        }
        Ok(())
    }

    /// Set a value by its menu index (1-7) from raw user input.
    pub fn set_indexed(&mut self, index: usize, raw: &str) -> Result<()> {
        match index {
            1 => self.app_name = raw.to_string(),
            2 => self.archive = PathBuf::from(raw),
            3 => self.min_java_version = parse_version(raw)?,
            4 => self.preferred_java_version = parse_version(raw)?,
            5 => self.launch_flags = raw.to_string(),
            6 => self.debug = parse_flag(raw),
            7 => self.build_i386 = parse_flag(raw),
            _ => {
                return Err(JarstrapError::InvalidParam(format!(
                    "unknown option code {index} (must be 1-7)"
                )))
            }
        }
        Ok(())
    }

    /// Menu entries as `(index, label, current value)`.
    ///
    /// Values are in the form [`LauncherParams::set_indexed`] accepts, so
    /// feeding one back leaves the parameters unchanged.
    pub fn entries(&self) -> Vec<(usize, &'static str, String)> {
        vec![
            (1, "App Name", self.app_name.clone()),
            (2, "JAR File", self.archive.display().to_string()),
            (3, "Minimum Java Version", self.min_java_version.to_string()),
            (4, "Preferred Java Version", self.preferred_java_version.to_string()),
            (5, "Launch Flags", self.launch_flags.clone()),
            (6, "Debug", self.debug.to_string()),
            (7, "Build 32-Bit", self.build_i386.to_string()),
        ]
    }

    /// App name lowercased with spaces replaced by underscores.
    pub fn default_binary_name(&self) -> String {
        self.app_name.to_lowercase().replace(' ', "_")
    }
}

fn parse_version(raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| JarstrapError::InvalidParam(format!("'{raw}' is not a number")))
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "t" | "y")
}

fn check_text(label: &str, value: &str) -> Result<()> {
    match value.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        Some(c) => Err(JarstrapError::InvalidParam(format!(
            "{label} contains unsupported character {c:?}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::DeclValue;

    fn valid_params(dir: &Path) -> LauncherParams {
        let archive = dir.join("app.jar");
        std::fs::write(&archive, b"PK").unwrap();
        LauncherParams {
            archive,
            ..LauncherParams::default()
        }
    }

    #[test]
    fn test_defaults() {
        let params = LauncherParams::default();
        assert_eq!(params.app_name, "JARStrap");
        assert_eq!(params.min_java_version, 8);
        assert_eq!(params.preferred_java_version, 17);
        assert!(params.launch_flags.is_empty());
        assert!(!params.debug);
    }

    #[test]
    fn test_validate_ok_makes_archive_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let mut params = valid_params(dir.path());
        params.validate().unwrap();
        assert!(params.archive.is_absolute());
    }

    #[test]
    fn test_validate_version_rules() {
        let dir = tempfile::tempdir().unwrap();

        let mut params = valid_params(dir.path());
        params.min_java_version = 11;
        params.preferred_java_version = 9;
        assert!(params.validate().is_err());

        let mut params = valid_params(dir.path());
        params.min_java_version = 4;
        assert!(params.validate().is_err());

        let mut params = valid_params(dir.path());
        params.min_java_version = 5;
        params.preferred_java_version = 7;
        assert!(params.validate().is_err());

        let mut params = valid_params(dir.path());
        params.min_java_version = 5;
        params.preferred_java_version = 8;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let mut params = LauncherParams {
            archive: dir.path().join("missing.jar"),
            ..LauncherParams::default()
        };
        assert!(matches!(params.validate(), Err(JarstrapError::InvalidParam(_))));

        params.archive = dir.path().to_path_buf();
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unsafe_strings() {
        let dir = tempfile::tempdir().unwrap();
        for bad in ["My \"App\"", "a\\b", "x;y", "line\nbreak"] {
            let mut params = valid_params(dir.path());
            params.app_name = bad.into();
            assert!(params.validate().is_err(), "accepted {bad:?}");

            let mut params = valid_params(dir.path());
            params.launch_flags = bad.into();
            assert!(params.validate().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_set_indexed() {
        let mut params = LauncherParams::default();
        params.set_indexed(1, "My App").unwrap();
        params.set_indexed(3, " 11 ").unwrap();
        params.set_indexed(4, "21").unwrap();
        params.set_indexed(5, "-Xmx1G").unwrap();
        params.set_indexed(6, "Y").unwrap();
        params.set_indexed(7, "nope").unwrap();

        assert_eq!(params.app_name, "My App");
        assert_eq!(params.min_java_version, 11);
        assert_eq!(params.preferred_java_version, 21);
        assert_eq!(params.launch_flags, "-Xmx1G");
        assert!(params.debug);
        assert!(!params.build_i386);

        assert!(params.set_indexed(3, "eleven").is_err());
        assert_eq!(params.min_java_version, 11);
        assert!(params.set_indexed(8, "x").is_err());
    }

    #[test]
    fn test_entries_feed_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        for params in [
            valid_params(dir.path()),
            LauncherParams {
                launch_flags: "-Xmx1g".into(),
                debug: true,
                build_i386: false,
                ..valid_params(dir.path())
            },
        ] {
            let mut edited = params.clone();
            for (index, _, value) in params.entries() {
                edited.set_indexed(index, &value).unwrap();
            }
            assert_eq!(edited, params);
        }
        assert_eq!(LauncherParams::default().entries()[4].2, "");
    }

    #[test]
    fn test_apply_defaults() {
        let mut params = LauncherParams::default();
        let values = ConfigValues::new()
            .with(DeclName::AppName, "Scanned")
            .with(DeclName::PreferredJavaVersion, 21)
            .with(DeclName::MinJavaVersion, DeclValue::from("not a number"));
        params.apply_defaults(&values);
        assert_eq!(params.app_name, "Scanned");
        assert_eq!(params.preferred_java_version, 21);
        assert_eq!(params.min_java_version, 8);
    }

    #[test]
    fn test_config_values_cover_all_names() {
        let values = LauncherParams::default().config_values();
        assert_eq!(values.names().collect::<Vec<_>>(), DeclName::ALL.to_vec());
        assert_eq!(values.get(DeclName::MinJavaVersion), Some(&DeclValue::UInt(8)));
    }

    #[test]
    fn test_default_binary_name() {
        let params = LauncherParams {
            app_name: "My Cool App".into(),
            ..LauncherParams::default()
        };
        assert_eq!(params.default_binary_name(), "my_cool_app");
    }

    #[test]
    fn test_partial_parameter_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PARAMS_FILE);
        std::fs::write(&path, r#"{ "app_name": "FromFile", "debug": true }"#).unwrap();

        let overrides = ParamOverrides::load(&path).unwrap();
        let mut params = LauncherParams {
            preferred_java_version: 21,
            ..LauncherParams::default()
        };
        overrides.apply(&mut params);

        assert_eq!(params.app_name, "FromFile");
        assert!(params.debug);
        assert_eq!(params.preferred_java_version, 21);
    }

    #[test]
    fn test_saved_file_restores_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PARAMS_FILE);
        let saved = LauncherParams {
            app_name: "Saved".into(),
            launch_flags: "-Xss4m".into(),
            min_java_version: 11,
            preferred_java_version: 21,
            debug: true,
            build_i386: false,
            archive: PathBuf::from("dist/app.jar"),
        };
        saved.save(&path).unwrap();

        let mut params = LauncherParams::default();
        ParamOverrides::load(&path).unwrap().apply(&mut params);
        assert_eq!(params, saved);
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(PARAMS_FILE);
        let err = LauncherParams::default().save(&path).unwrap_err();
        assert!(matches!(err, JarstrapError::ConfigWrite { .. }));
        assert!(err.to_string().starts_with("failed to write parameter file"));
    }

    #[test]
    fn test_merge_prefers_later_overrides() {
        let file = ParamOverrides {
            app_name: Some("File".into()),
            min_java_version: Some(9),
            ..ParamOverrides::default()
        };
        let flags = ParamOverrides {
            app_name: Some("Flag".into()),
            ..ParamOverrides::default()
        };
        let merged = file.merge(flags);
        assert_eq!(merged.app_name.as_deref(), Some("Flag"));
        assert_eq!(merged.min_java_version, Some(9));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            ParamOverrides::load(&missing),
            Err(JarstrapError::ConfigNotFound { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            ParamOverrides::load(&broken),
            Err(JarstrapError::ConfigParse { .. })
        ));

        let unknown = dir.path().join("unknown.json");
        std::fs::write(&unknown, r#"{ "app_nmae": "typo" }"#).unwrap();
        assert!(ParamOverrides::load(&unknown).is_err());
    }
}
