//! Catalog loading helpers.
//!
//! Parses a serialized YAML catalog into an immutable [`Catalog`]. The
//! source format groups messages into named context blocks; each message
//! carries its source text, an optional disambiguation comment, optional
//! authoring-only location hints, and a translation payload tagged with a
//! completion state. Malformed input fails with [`ParseError`] carrying a
//! location hint; the caller's previously resident catalog is never
//! touched by a failed load.
//!
//! Duplicate (source, disambiguation) pairs within one context are a
//! loader-time anomaly: the last entry wins and a diagnostic is logged.

use camino::Utf8Path;
use semver::Version;
use serde::Deserialize;
use std::fs;
use tracing::warn;

use crate::catalog::{Catalog, Context, LocaleId, Message, MessageKey, MessageText, Translation};
use crate::plural::PluralForms;

mod diagnostics;

pub use diagnostics::{
    CatalogName, CatalogSource, LoadError, ParseError, map_yaml_error, structure_error,
};

/// Catalog format major version this loader understands.
pub const SUPPORTED_FORMAT_MAJOR: u64 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    format_version: Version,
    locale: String,
    #[serde(default)]
    contexts: Vec<RawContext>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawContext {
    name: String,
    #[serde(default)]
    messages: Vec<RawMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMessage {
    source: String,
    #[serde(default)]
    disambiguation: Option<String>,
    #[serde(default)]
    #[cfg_attr(
        not(feature = "locations"),
        expect(
            dead_code,
            reason = "location hints are parsed for schema validation but only retained with the `locations` feature"
        )
    )]
    locations: Vec<RawLocation>,
    #[serde(default)]
    translation: Option<String>,
    #[serde(default)]
    plural: Option<PluralForms>,
    #[serde(default)]
    state: Option<RawState>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[cfg_attr(
    not(feature = "locations"),
    expect(
        dead_code,
        reason = "location hints are parsed for schema validation but only retained with the `locations` feature"
    )
)]
struct RawLocation {
    file: String,
    line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawState {
    Finished,
    Unfinished,
    Obsolete,
}

impl RawState {
    const fn label(self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Unfinished => "unfinished",
            Self::Obsolete => "obsolete",
        }
    }
}

/// Parse a catalog string.
///
/// # Errors
///
/// Returns [`ParseError`] when the YAML is malformed, the schema is
/// violated, or the format version is unsupported.
///
/// # Examples
/// ```rust
/// use lingua::loader;
///
/// let yaml = r#"
/// format_version: "1.0.0"
/// locale: it
/// contexts:
///   - name: AboutDialog
///     messages:
///       - source: "About Citra"
///         translation: "Riguardo Citra"
/// "#;
/// let catalog = loader::from_str(yaml)?;
/// assert_eq!(catalog.locale().as_str(), "it");
/// # Ok::<(), lingua::loader::ParseError>(())
/// ```
pub fn from_str(yaml: &str) -> Result<Catalog, ParseError> {
    from_str_named(yaml, &CatalogName::from("catalog"))
}

/// Parse a catalog string, naming the source for diagnostics.
///
/// # Errors
///
/// Returns [`ParseError`] when the YAML is malformed, the schema is
/// violated, or the format version is unsupported.
pub fn from_str_named(yaml: &str, name: &CatalogName) -> Result<Catalog, ParseError> {
    let raw: RawCatalog = serde_saphyr::from_str(yaml).map_err(|e| {
        ParseError::from_diagnostic(map_yaml_error(e, &CatalogSource::from(yaml), name))
    })?;

    if raw.format_version.major != SUPPORTED_FORMAT_MAJOR {
        return Err(ParseError::from_diagnostic(structure_error(
            name,
            &format!(
                "unsupported format version {} (supported major: {SUPPORTED_FORMAT_MAJOR})",
                raw.format_version
            ),
            None,
        )));
    }

    let mut catalog = Catalog::new(LocaleId::new(raw.locale));
    for raw_context in &raw.contexts {
        catalog.insert_context(build_context(raw_context, name)?);
    }
    Ok(catalog)
}

/// Load a catalog from a file path.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read and
/// [`LoadError::Parse`] when its contents fail to parse.
pub fn from_path(path: impl AsRef<Utf8Path>) -> Result<Catalog, LoadError> {
    let path_ref = path.as_ref();
    let data = fs::read_to_string(path_ref).map_err(|source| LoadError::Io {
        path: path_ref.to_owned(),
        source,
    })?;
    from_str_named(&data, &CatalogName::from(path_ref.as_str())).map_err(LoadError::from)
}

fn build_context(raw: &RawContext, name: &CatalogName) -> Result<Context, ParseError> {
    let mut context = Context::new(raw.name.as_str());
    for raw_message in &raw.messages {
        let key = MessageKey::new(
            raw_message.source.as_str(),
            raw_message.disambiguation.clone(),
        );
        let message = build_message(raw_message, raw.name.as_str(), name)?;
        if context.insert(key, message).is_some() {
            warn!(
                context = raw.name.as_str(),
                source = raw_message.source.as_str(),
                disambiguation = raw_message.disambiguation.as_deref(),
                "duplicate message key; last-loaded entry wins"
            );
        }
    }
    Ok(context)
}

fn build_message(
    raw: &RawMessage,
    context: &str,
    name: &CatalogName,
) -> Result<Message, ParseError> {
    let translation = build_translation(raw, context, name)?;
    Ok(attach_locations(raw, Message::new(translation)))
}

#[cfg(feature = "locations")]
fn attach_locations(raw: &RawMessage, message: Message) -> Message {
    message.with_locations(
        raw.locations
            .iter()
            .map(|loc| crate::catalog::SourceLocation {
                file: loc.file.clone(),
                line: loc.line,
            })
            .collect(),
    )
}

#[cfg(not(feature = "locations"))]
const fn attach_locations(_raw: &RawMessage, message: Message) -> Message {
    message
}

fn build_translation(
    raw: &RawMessage,
    context: &str,
    name: &CatalogName,
) -> Result<Translation, ParseError> {
    if raw.translation.is_some() && raw.plural.is_some() {
        return Err(schema_error(
            name,
            context,
            raw.source.as_str(),
            "declares both `translation` and `plural`",
            Some("use either `translation` or `plural`, not both".to_owned()),
        ));
    }

    let state = raw.state.unwrap_or(RawState::Finished);
    if let Some(forms) = &raw.plural {
        if state != RawState::Finished {
            return Err(schema_error(
                name,
                context,
                raw.source.as_str(),
                &format!("plural variants cannot be marked `{}`", state.label()),
                Some("only finished messages may carry plural variants".to_owned()),
            ));
        }
        return Ok(Translation::Final(MessageText::Plural(forms.clone())));
    }

    match (state, raw.translation.clone()) {
        (RawState::Finished, Some(text)) => Ok(Translation::Final(MessageText::Singular(text))),
        (RawState::Finished, None) if raw.state.is_some() => Err(schema_error(
            name,
            context,
            raw.source.as_str(),
            "is marked `finished` but has no translation",
            Some("add a `translation` or drop the `state` marker".to_owned()),
        )),
        (RawState::Finished, None) => Ok(Translation::Missing),
        (RawState::Unfinished, Some(text)) => Ok(Translation::Unfinished(text)),
        (RawState::Unfinished, None) => Ok(Translation::Missing),
        (RawState::Obsolete, Some(text)) => Ok(Translation::Obsolete(text)),
        (RawState::Obsolete, None) => Ok(Translation::Missing),
    }
}

fn schema_error(
    name: &CatalogName,
    context: &str,
    source: &str,
    detail: &str,
    help: Option<String>,
) -> ParseError {
    ParseError::from_diagnostic(structure_error(
        name,
        &format!("message '{source}' in context '{context}' {detail}"),
        help,
    ))
}

#[cfg(test)]
mod tests;
