//! Marker-delimited patch window engine.
//!
//! The engine makes a single pass over a text document. A line containing the
//! start marker opens the window and a line containing the end marker closes
//! it; there is no nesting, only an active flag. While the window is open each
//! line is handed to the [`WindowStrategy`], which may keep, replace, or omit
//! it. Marker lines are always copied through verbatim.
//!
//! Per line, in order:
//!
//! 1. active and the line is a deactivator: close the window
//! 2. still active: emit the strategy's result for the line, next line
//! 3. inactive and the line is an activator: open the window
//! 4. emit the line verbatim
//! 5. the window was just opened: run the strategy's on-activation hook
//!
//! A window left open at end of input is not an error. Lines keep their
//! original terminators (`\n`, `\r\n`, or none on a final line).

use std::io::{Read, Write};

use crate::byte_array;
use crate::config_patch;
use crate::declaration::{self, ConfigValues, DeclName};
use crate::error::{JarstrapError, Result};

/// Start and end marker substrings of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub start: &'static str,
    pub end: &'static str,
}

impl Markers {
    pub const fn new(start: &'static str, end: &'static str) -> Self {
        Self { start, end }
    }

    pub fn is_activator(&self, line: &str) -> bool {
        line.contains(self.start)
    }

    pub fn is_deactivator(&self, line: &str) -> bool {
        line.contains(self.end)
    }
}

/// What the engine does with the lines of an open window.
pub enum WindowStrategy<'a> {
    /// Rewrite recognized declarations with the supplied values; everything
    /// else passes through.
    Substitute(&'a ConfigValues),
    /// Drop the window's content and emit the payload as an array literal
    /// right after the start marker.
    ReplaceWholesale {
        payload: &'a mut dyn Read,
        consumed: bool,
    },
}

impl<'a> WindowStrategy<'a> {
    pub fn substitute(values: &'a ConfigValues) -> Self {
        Self::Substitute(values)
    }

    pub fn replace_wholesale(payload: &'a mut dyn Read) -> Self {
        Self::ReplaceWholesale {
            payload,
            consumed: false,
        }
    }

    fn transform_line(&mut self, line: &str, report: &mut PatchReport) -> LineAction {
        match self {
            Self::Substitute(values) => match config_patch::substitute_line(line, values) {
                Some(decl) => {
                    tracing::debug!("substituting {} = {}", decl.name, decl.value);
                    report.substituted.push(decl.name);
                    LineAction::Replace(declaration::render(&decl))
                }
                None => LineAction::Keep,
            },
            Self::ReplaceWholesale { .. } => LineAction::Omit,
        }
    }

    fn on_activated<W: Write>(
        &mut self,
        out: &mut W,
        report: &mut PatchReport,
        marker_unterminated: bool,
    ) -> Result<()> {
        match self {
            Self::Substitute(_) => Ok(()),
            Self::ReplaceWholesale { payload, consumed } => {
                if *consumed {
                    tracing::warn!("additional archive window found; its content is cleared");
                    return Ok(());
                }
                if marker_unterminated {
                    out.write_all(b"\n")?;
                }
                let bytes = byte_array::render(payload, out)?;
                *consumed = true;
                report.payload_bytes = Some(bytes);
                Ok(())
            }
        }
    }
}

enum LineAction {
    Keep,
    Replace(String),
    Omit,
}

/// Summary of a single patch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Number of times a start marker opened a window.
    pub windows_opened: usize,
    /// Lines inside a window replaced by the strategy.
    pub lines_replaced: usize,
    /// Lines inside a window dropped by the strategy.
    pub lines_omitted: usize,
    /// Declarations rewritten, in document order.
    pub substituted: Vec<DeclName>,
    /// Size of the embedded payload, if one was rendered.
    pub payload_bytes: Option<u64>,
    /// A window was still open at end of input.
    pub unterminated: bool,
}

impl PatchReport {
    /// Supplied names that no declaration in the document picked up.
    pub fn unpatched(&self, values: &ConfigValues) -> Vec<DeclName> {
        values
            .names()
            .filter(|name| !self.substituted.contains(name))
            .collect()
    }
}

/// Run one pass over `input`, writing the patched document to `out`.
pub fn run<W: Write>(
    input: &str,
    markers: &Markers,
    strategy: &mut WindowStrategy<'_>,
    out: &mut W,
) -> Result<PatchReport> {
    let mut report = PatchReport::default();
    let mut active = false;

    for (index, raw) in input.split_inclusive('\n').enumerate() {
        let (line, eol) = split_terminator(raw);

        if active && markers.is_deactivator(line) {
            tracing::debug!("window closed at line {}", index + 1);
            active = false;
        }

        if active {
            match strategy.transform_line(line, &mut report) {
                LineAction::Keep => out.write_all(raw.as_bytes())?,
                LineAction::Replace(new_line) => {
                    out.write_all(new_line.as_bytes())?;
                    out.write_all(eol.as_bytes())?;
                    report.lines_replaced += 1;
                }
                LineAction::Omit => report.lines_omitted += 1,
            }
            continue;
        }

        if markers.is_activator(line) {
            tracing::debug!("window opened at line {}", index + 1);
            active = true;
            report.windows_opened += 1;
        }

        out.write_all(raw.as_bytes())?;

        if active {
            strategy.on_activated(out, &mut report, eol.is_empty())?;
        }
    }

    if active {
        tracing::warn!(
            "'{}' window has no '{}' marker; patched through end of file",
            markers.start,
            markers.end
        );
        report.unterminated = true;
    }

    Ok(report)
}

/// Run one pass and collect the output as a string.
pub fn run_to_string(
    input: &str,
    markers: &Markers,
    strategy: &mut WindowStrategy<'_>,
) -> Result<(String, PatchReport)> {
    let mut out = Vec::with_capacity(input.len());
    let report = run(input, markers, strategy, &mut out)?;
    let text = String::from_utf8(out).map_err(|e| JarstrapError::Other(e.into()))?;
    Ok((text, report))
}

fn split_terminator(raw: &str) -> (&str, &str) {
    if let Some(line) = raw.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = raw.strip_suffix('\n') {
        (line, "\n")
    } else {
        (raw, "")
    }
}
