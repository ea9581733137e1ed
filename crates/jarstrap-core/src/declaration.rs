//! Codec for configuration declarations in the launcher template.
//!
//! Only one narrow shape is understood:
//!
//! ```text
//! [static const ]<kind> <name> = <value>;
//! ```
//!
//! where `<kind>` is `char` or `unsigned int`, `<name>` is a run of
//! non-whitespace characters (an `[]` array suffix is part of the name), and
//! `<value>` is everything up to the first `;`. Each separator is exactly one
//! whitespace character. Anything after the `;` is ignored.
//!
//! This is not a C parser. Lines that do not fit the shape, or that declare a
//! name outside [`DeclName`], parse to `None` and are left alone by callers.

use std::collections::BTreeMap;
use std::fmt;

/// Prefix every patchable declaration line starts with.
pub const DECLARATION_PREFIX: &str = "static const ";

/// Semantic kind of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// `char NAME[] = "..."` string constant.
    Char,
    /// `unsigned int NAME = 123` integer constant.
    UnsignedInt,
}

impl DeclKind {
    /// C spelling of the kind token.
    pub fn as_c(&self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::UnsignedInt => "unsigned int",
        }
    }

    fn strip_from(s: &str) -> Option<(Self, &str)> {
        [Self::Char, Self::UnsignedInt]
            .into_iter()
            .find_map(|kind| s.strip_prefix(kind.as_c()).map(|rest| (kind, rest)))
    }
}

/// The closed set of declarations the patcher knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclName {
    AppName,
    MinJavaVersion,
    PreferredJavaVersion,
    LaunchFlags,
}

impl DeclName {
    pub const ALL: [DeclName; 4] = [
        Self::AppName,
        Self::MinJavaVersion,
        Self::PreferredJavaVersion,
        Self::LaunchFlags,
    ];

    /// Name as written in the template, including any `[]` suffix.
    pub fn as_source(&self) -> &'static str {
        match self {
            Self::AppName => "APP_NAME[]",
            Self::MinJavaVersion => "MIN_JAVA_VERSION",
            Self::PreferredJavaVersion => "PREFERRED_JAVA_VERSION",
            Self::LaunchFlags => "LAUNCH_FLAGS[]",
        }
    }

    pub fn from_source(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.as_source() == name)
    }

    /// Kind the launcher template declares this name with.
    pub fn kind(&self) -> DeclKind {
        match self {
            Self::AppName | Self::LaunchFlags => DeclKind::Char,
            Self::MinJavaVersion | Self::PreferredJavaVersion => DeclKind::UnsignedInt,
        }
    }

    /// Human-readable label for terminal output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AppName => "App Name",
            Self::MinJavaVersion => "Minimum Java Version",
            Self::PreferredJavaVersion => "Preferred Java Version",
            Self::LaunchFlags => "Launch Flags",
        }
    }
}

impl fmt::Display for DeclName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_source())
    }
}

/// Value of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclValue {
    Text(String),
    UInt(u32),
    /// Source text that does not read as a plain literal of the line's kind,
    /// e.g. `8u` or `(8)`. Kept verbatim.
    Raw(String),
}

impl DeclValue {
    /// Interpret the text between `= ` and `;` according to `kind`.
    ///
    /// A double-quoted string becomes [`DeclValue::Text`] without its quotes
    /// and a decimal `u32` becomes [`DeclValue::UInt`]. Anything else is
    /// [`DeclValue::Raw`].
    fn parse(kind: DeclKind, raw: &str) -> Self {
        let typed = match kind {
            DeclKind::Char => raw
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .map(|s| Self::Text(s.to_string())),
            DeclKind::UnsignedInt => raw.parse().ok().map(Self::UInt),
        };
        typed.unwrap_or_else(|| Self::Raw(raw.to_string()))
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::UInt(_) | Self::Raw(_) => None,
        }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Self::UInt(n) => Some(*n),
            Self::Text(_) | Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for DeclValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Raw(s) => f.write_str(s),
            Self::UInt(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for DeclValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for DeclValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u32> for DeclValue {
    fn from(n: u32) -> Self {
        Self::UInt(n)
    }
}

/// A recognized declaration parsed from a template line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: DeclName,
    pub kind: DeclKind,
    pub value: DeclValue,
}

impl Declaration {
    /// A new record with the same name and kind carrying `value`.
    pub fn with_value(&self, value: DeclValue) -> Self {
        Self {
            name: self.name,
            kind: self.kind,
            value,
        }
    }
}

/// Parse a single declaration line (without its line terminator).
pub fn parse(line: &str) -> Option<Declaration> {
    let body = line.strip_prefix(DECLARATION_PREFIX).unwrap_or(line);

    let (kind, rest) = DeclKind::strip_from(body)?;
    let rest = strip_one_whitespace(rest)?;

    let name_len = rest.find(char::is_whitespace)?;
    if name_len == 0 {
        return None;
    }
    let (name, rest) = rest.split_at(name_len);

    let rest = strip_one_whitespace(rest)?;
    let rest = rest.strip_prefix('=')?;
    let rest = strip_one_whitespace(rest)?;

    let end = rest.find(';')?;
    if end == 0 {
        return None;
    }

    let name = DeclName::from_source(name)?;
    let value = DeclValue::parse(kind, &rest[..end]);
    Some(Declaration { name, kind, value })
}

/// Render a declaration line, without a line terminator.
///
/// The value is quoted for [`DeclKind::Char`] and written as bare decimal
/// text for [`DeclKind::UnsignedInt`]. The value is not escaped. A
/// [`DeclValue::Raw`] value is written back exactly as it was read.
pub fn render(decl: &Declaration) -> String {
    let literal = match (&decl.value, decl.kind) {
        (DeclValue::Raw(raw), _) => raw.clone(),
        (value, DeclKind::Char) => format!("\"{value}\""),
        (value, DeclKind::UnsignedInt) => value.to_string(),
    };
    format!(
        "{DECLARATION_PREFIX}{} {} = {literal};",
        decl.kind.as_c(),
        decl.name.as_source()
    )
}

fn strip_one_whitespace(s: &str) -> Option<&str> {
    let mut chars = s.chars();
    let c = chars.next()?;
    c.is_whitespace().then(|| chars.as_str())
}

/// Values to substitute into the config window, keyed by declaration name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigValues {
    values: BTreeMap<DeclName, DeclValue>,
}

impl ConfigValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: DeclName, value: impl Into<DeclValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: DeclName, value: impl Into<DeclValue>) {
        self.values.insert(name, value.into());
    }

    pub fn get(&self, name: DeclName) -> Option<&DeclValue> {
        self.values.get(&name)
    }

    pub fn names(&self) -> impl Iterator<Item = DeclName> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclName, &DeclValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
