//! Translates catalog parsing failures into actionable diagnostics.

use camino::Utf8PathBuf;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_saphyr::{Error as YamlError, Location};
use thiserror::Error;

use crate::catalog::LocaleId;

/// YAML source content for a catalog.
///
/// # Examples
/// ```rust
/// use lingua::loader::CatalogSource;
/// let source = CatalogSource::from("locale: it");
/// assert_eq!(source.as_str(), "locale: it");
/// ```
#[derive(Debug, Clone)]
pub struct CatalogSource(String);

impl CatalogSource {
    /// Wrap catalog source text.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    /// Borrow the source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for CatalogSource {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CatalogSource {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for CatalogSource {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Display name for a catalog source used in diagnostics.
///
/// # Examples
/// ```rust
/// use lingua::loader::CatalogName;
/// let name = CatalogName::new("it.yml");
/// assert_eq!(name.as_str(), "it.yml");
/// ```
#[derive(Debug, Clone)]
pub struct CatalogName(String);

impl CatalogName {
    /// Wrap a catalog display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the display name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for CatalogName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CatalogName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for CatalogName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error raised when catalog parsing fails.
///
/// The boxed diagnostic carries the source snippet, a span pointing at the
/// offending location when the parser reported one, and an optional hint.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    /// The catalog source was malformed.
    #[error("catalog parse error")]
    #[diagnostic(code(lingua::loader::parse))]
    Parse {
        /// Underlying diagnostic describing the failure.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },
}

impl ParseError {
    pub(crate) fn from_diagnostic(source: Box<dyn Diagnostic + Send + Sync + 'static>) -> Self {
        Self::Parse { source }
    }
}

/// Error raised when loading a catalog for a locale fails.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}")]
    #[diagnostic(code(lingua::loader::io))]
    Io {
        /// Path that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The catalog source failed to parse.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    /// The catalog declares a different locale than it was loaded for.
    #[error("catalog declares locale '{declared}' but was loaded for '{requested}'")]
    #[diagnostic(code(lingua::loader::locale_mismatch))]
    LocaleMismatch {
        /// Locale named inside the catalog source.
        declared: LocaleId,
        /// Locale the caller asked to install.
        requested: LocaleId,
    },
}

const YAML_HINTS: [(&str, &str); 3] = [
    (
        "did not find expected '-'",
        "Start each context and message list item with '-' and keep indentation consistent.",
    ),
    (
        "expected ':'",
        "Ensure each key is followed by ':' separating key and value.",
    ),
    (
        "unknown escape character",
        "Use valid YAML escape sequences or quote the string.",
    ),
];

fn saturating_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn location_to_index(src: &CatalogSource, loc: Location) -> usize {
    let col_idx = saturating_usize(loc.column().saturating_sub(1));
    let mut remaining = saturating_usize(loc.line().saturating_sub(1));
    let mut offset = 0usize;
    let text = src.as_ref();
    for segment in text.split_inclusive('\n') {
        if remaining == 0 {
            let line = segment.strip_suffix('\n').unwrap_or(segment);
            let within = line
                .char_indices()
                .nth(col_idx)
                .map_or(line.len(), |(byte, _)| byte);
            return offset + within;
        }
        remaining -= 1;
        offset += segment.len();
    }
    text.len()
}

fn to_span(src: &CatalogSource, loc: Location) -> SourceSpan {
    let at = location_to_index(src, loc);
    let len = usize::from(src.as_ref().as_bytes().get(at).is_some_and(|b| *b != b'\n'));
    SourceSpan::new(at.into(), len)
}

fn has_tab_indent(src: &CatalogSource, loc: Option<Location>) -> bool {
    loc.and_then(|l| {
        let idx = saturating_usize(l.line().saturating_sub(1));
        src.as_ref().lines().nth(idx)
    })
    .is_some_and(|line| {
        line.chars()
            .take_while(|c| c.is_whitespace())
            .any(|c| c == '\t')
    })
}

fn hint_for(err_str: &str, src: &CatalogSource, loc: Option<Location>) -> Option<String> {
    if has_tab_indent(src, loc) {
        return Some("Use spaces for indentation; tabs are invalid in YAML.".into());
    }
    let lower = err_str.to_lowercase();
    YAML_HINTS
        .iter()
        .find_map(|(needle, hint)| lower.contains(*needle).then(|| (*hint).to_owned()))
}

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(lingua::loader::yaml))]
struct YamlDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("parse error here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
    #[source]
    source: YamlError,
    message: String,
}

/// Convert a YAML parser error into a located, hint-carrying diagnostic.
#[must_use]
pub fn map_yaml_error(
    err: YamlError,
    src: &CatalogSource,
    name: &CatalogName,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let loc = err.location();
    let span = loc.map(|l| to_span(src, l));
    let (line, col) = loc.map_or((1, 1), |l| (l.line(), l.column()));
    let err_str = err.to_string();
    let hint = hint_for(&err_str, src, loc);
    let message = format!("YAML parse error at line {line}, column {col}: {err_str}");

    Box::new(YamlDiagnostic {
        src: NamedSource::new(name.as_str(), src.as_ref().to_owned()),
        span,
        help: hint,
        source: err,
        message,
    })
}

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(lingua::loader::structure))]
struct StructureDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
}

/// Build a diagnostic for a schema violation the YAML parser cannot see.
#[must_use]
pub fn structure_error(
    name: &CatalogName,
    message: &str,
    help: Option<String>,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    Box::new(StructureDiagnostic {
        message: format!("catalog structure error in {name}: {message}"),
        help,
    })
}
