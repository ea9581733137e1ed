//! Archive window pass: embeds the Java archive as a byte array literal.
//!
//! Everything between the `ARCHIVE DATA START` and `ARCHIVE DATA END` marker
//! lines is discarded and replaced by a freshly rendered `ARCHIVE_DATA[]`
//! literal. The marker lines survive.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::{JarstrapError, Result};
use crate::fsutil::{self, PatchOptions};
use crate::window::{self, Markers, PatchReport, WindowStrategy};

pub const ARCHIVE_MARKERS: Markers = Markers::new("ARCHIVE DATA START", "ARCHIVE DATA END");

/// Patch the archive window of an in-memory template with `payload`.
pub fn patch_archive_text<R: Read>(text: &str, payload: &mut R) -> Result<(String, PatchReport)> {
    let (out, report) = window::run_to_string(
        text,
        &ARCHIVE_MARKERS,
        &mut WindowStrategy::replace_wholesale(payload),
    )?;

    if report.windows_opened == 0 {
        tracing::warn!("no '{}' marker found; archive not embedded", ARCHIVE_MARKERS.start);
    }
    Ok((out, report))
}

/// Embed the archive at `archive` into the template at `template`.
///
/// The archive is opened before the template is read, so a missing archive
/// leaves the template untouched.
pub fn patch_archive(template: &Path, archive: &Path, options: &PatchOptions) -> Result<PatchReport> {
    let file = open_archive(archive)?;
    let text = fsutil::read_template(template)?;

    let mut reader = BufReader::new(file);
    let (out, report) = patch_archive_text(&text, &mut reader)?;
    fsutil::replace_atomically(template, out.as_bytes(), options)?;

    tracing::info!(
        "embedded {} byte(s) from {} into {}",
        report.payload_bytes.unwrap_or(0),
        archive.display(),
        template.display()
    );
    Ok(report)
}

fn open_archive(path: &Path) -> Result<File> {
    let not_found = |source: io::Error| JarstrapError::ArchiveNotFound {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(not_found)?;
    let meta = file.metadata().map_err(not_found)?;
    if !meta.is_file() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TEMPLATE: &str = "// CONFIG START\n\
        static const unsigned int MIN_JAVA_VERSION = 8;\n\
        // CONFIG END\n\
        \n\
        // ARCHIVE DATA START\n\
        static const unsigned char ARCHIVE_DATA[] = {\n\
        \x20       0xCA, 0xFE,\n\
        };\n\
        // ARCHIVE DATA END\n\
        int main() { return 0; }\n";

    #[test]
    fn test_archive_embedding_scenario() {
        let mut payload: &[u8] = &[0x00, 0x1F, 0xFF];
        let (out, report) = patch_archive_text(TEMPLATE, &mut payload).unwrap();
        assert_eq!(
            out,
            "// CONFIG START\n\
             static const unsigned int MIN_JAVA_VERSION = 8;\n\
             // CONFIG END\n\
             \n\
             // ARCHIVE DATA START\n\
             static const unsigned char ARCHIVE_DATA[] = {\n\
             \x20       0x00, 0x1F, 0xFF,\n\
             };\n\
             // ARCHIVE DATA END\n\
             int main() { return 0; }\n"
        );
        assert_eq!(report.payload_bytes, Some(3));
        assert_eq!(report.lines_omitted, 3);
    }

    #[test]
    fn test_empty_window_gets_literal() {
        let template = "// ARCHIVE DATA START\n// ARCHIVE DATA END\n";
        let mut payload: &[u8] = &[];
        let (out, _) = patch_archive_text(template, &mut payload).unwrap();
        assert_eq!(
            out,
            "// ARCHIVE DATA START\nstatic const unsigned char ARCHIVE_DATA[] = {\n};\n// ARCHIVE DATA END\n"
        );
    }

    #[test]
    fn test_patch_archive_file() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("main.c");
        let archive = dir.path().join("app.jar");
        fs::write(&template, TEMPLATE).unwrap();
        fs::write(&archive, [0x50u8, 0x4B, 0x03, 0x04]).unwrap();

        let report = patch_archive(&template, &archive, &PatchOptions::default()).unwrap();
        assert_eq!(report.payload_bytes, Some(4));

        let patched = fs::read_to_string(&template).unwrap();
        assert!(patched.contains("        0x50, 0x4B, 0x03, 0x04,\n};\n// ARCHIVE DATA END\n"));
        assert!(!patched.contains("0xCA"));
    }

    #[test]
    fn test_missing_archive_leaves_template_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("main.c");
        fs::write(&template, TEMPLATE).unwrap();

        let err = patch_archive(
            &template,
            &dir.path().join("missing.jar"),
            &PatchOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, JarstrapError::ArchiveNotFound { .. }));
        assert_eq!(fs::read_to_string(&template).unwrap(), TEMPLATE);
    }

    #[test]
    fn test_directory_is_not_an_archive() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("main.c");
        fs::write(&template, TEMPLATE).unwrap();

        let err = patch_archive(&template, dir.path(), &PatchOptions::default()).unwrap_err();
        assert!(matches!(err, JarstrapError::ArchiveNotFound { .. }));
    }
}
