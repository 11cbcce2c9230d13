//! Immutable translation-catalog data structures.
//!
//! A [`Catalog`] holds every message for one locale, grouped into named
//! [`Context`]s. Catalogs are built once by the loader and never mutated
//! afterwards; the store shares them as `Arc<Catalog>` so any number of
//! reader threads may resolve keys without locking.
//!
//! Messages are keyed by (source text, disambiguation). Lookup on the hot
//! path uses the borrowed [`KeyRef`] so resolving a key allocates nothing.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::{Equivalent, IndexMap};

use crate::plural::PluralForms;

/// Locale identifier (for example `en-US`, `it`, `pt-BR`).
///
/// # Examples
/// ```rust
/// use lingua::catalog::LocaleId;
/// let id = LocaleId::new("it");
/// assert_eq!(id.as_str(), "it");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleId(String);

impl LocaleId {
    /// Wrap a locale tag.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying tag.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The primary language subtag, lowercased (`pt-BR` yields `pt`).
    #[must_use]
    pub fn language(&self) -> String {
        self.0
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

impl From<&str> for LocaleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LocaleId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owned message key: source text plus optional disambiguation comment.
///
/// Two messages in one context may share source text as long as their
/// disambiguation comments differ; matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageKey {
    source: String,
    disambiguation: Option<String>,
}

impl MessageKey {
    /// Build a key from the source text and optional disambiguation.
    #[must_use]
    pub fn new(source: impl Into<String>, disambiguation: Option<String>) -> Self {
        Self {
            source: source.into(),
            disambiguation,
        }
    }

    /// The untranslated source text.
    #[must_use]
    pub const fn source(&self) -> &str {
        self.source.as_str()
    }

    /// The disambiguation comment, when present.
    #[must_use]
    pub fn disambiguation(&self) -> Option<&str> {
        self.disambiguation.as_deref()
    }
}

// Hashing must agree with `KeyRef` so borrowed lookups find owned keys.
impl Hash for MessageKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_key_parts(self.source.as_str(), self.disambiguation.as_deref(), state);
    }
}

/// Borrowed lookup key for the hot path.
///
/// Implements [`Equivalent`] against [`MessageKey`] so resolution never
/// allocates owned strings just to probe a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRef<'a> {
    /// Source text to match.
    pub source: &'a str,
    /// Optional disambiguation comment to match.
    pub disambiguation: Option<&'a str>,
}

impl<'a> KeyRef<'a> {
    /// Build a borrowed key.
    #[must_use]
    pub const fn new(source: &'a str, disambiguation: Option<&'a str>) -> Self {
        Self {
            source,
            disambiguation,
        }
    }
}

impl Hash for KeyRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_key_parts(self.source, self.disambiguation, state);
    }
}

impl Equivalent<MessageKey> for KeyRef<'_> {
    fn equivalent(&self, key: &MessageKey) -> bool {
        self.source == key.source() && self.disambiguation == key.disambiguation()
    }
}

fn hash_key_parts<H: Hasher>(source: &str, disambiguation: Option<&str>, state: &mut H) {
    source.hash(state);
    match disambiguation {
        Some(text) => {
            state.write_u8(1);
            text.hash(state);
        }
        None => state.write_u8(0),
    }
}

/// Authoring-only reference to where a message appears in the UI sources.
///
/// Parsed for diagnostics tooling; the lookup path never consults it.
#[cfg(feature = "locations")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// File the message was extracted from.
    pub file: String,
    /// Line within that file.
    pub line: u32,
}

/// Translated text: a single string or a set of plural variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageText {
    /// A plain, non-pluralized translation.
    Singular(String),
    /// Plural variants keyed by grammatical-number category.
    Plural(PluralForms),
}

/// Completion-tagged translation payload.
///
/// Only `Final` entries are ever surfaced to callers; the other states
/// exist for authoring and diagnostics and trigger the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// No translation recorded.
    Missing,
    /// A draft the translator has not signed off on.
    Unfinished(String),
    /// A translation whose source string no longer exists upstream.
    Obsolete(String),
    /// A finished, usable translation.
    Final(MessageText),
}

impl Translation {
    /// The finished payload, when this entry is usable.
    #[must_use]
    pub const fn as_final(&self) -> Option<&MessageText> {
        match self {
            Self::Final(text) => Some(text),
            Self::Missing | Self::Unfinished(_) | Self::Obsolete(_) => None,
        }
    }
}

/// One message within a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    translation: Translation,
    #[cfg(feature = "locations")]
    locations: Vec<SourceLocation>,
}

impl Message {
    /// Build a message from its translation payload.
    #[must_use]
    pub const fn new(translation: Translation) -> Self {
        Self {
            translation,
            #[cfg(feature = "locations")]
            locations: Vec::new(),
        }
    }

    /// Attach authoring-only location hints.
    #[cfg(feature = "locations")]
    #[must_use]
    pub fn with_locations(mut self, locations: Vec<SourceLocation>) -> Self {
        self.locations = locations;
        self
    }

    /// The translation payload.
    #[must_use]
    pub const fn translation(&self) -> &Translation {
        &self.translation
    }

    /// Authoring-only location hints recorded for this message.
    #[cfg(feature = "locations")]
    #[must_use]
    pub fn locations(&self) -> &[SourceLocation] {
        &self.locations
    }
}

/// A named grouping of messages, typically one UI component.
#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    messages: IndexMap<MessageKey, Message>,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: IndexMap::new(),
        }
    }

    /// The context name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Insert a message, returning the previous entry when the key was
    /// already present (last-loaded entry wins).
    pub fn insert(&mut self, key: MessageKey, message: Message) -> Option<Message> {
        self.messages.insert(key, message)
    }

    /// Look up a message by borrowed key.
    #[must_use]
    pub fn get(&self, key: &KeyRef<'_>) -> Option<&Message> {
        self.messages.get(key)
    }

    /// Iterate over messages in authoring order.
    pub fn messages(&self) -> impl Iterator<Item = (&MessageKey, &Message)> {
        self.messages.iter()
    }

    /// Number of messages in this context.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the context holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// The complete set of translated messages for one locale.
///
/// Immutable once constructed; replaced wholesale on reload.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: LocaleId,
    contexts: IndexMap<String, Context>,
}

impl Catalog {
    /// Create an empty catalog for a locale.
    #[must_use]
    pub fn new(locale: LocaleId) -> Self {
        Self {
            locale,
            contexts: IndexMap::new(),
        }
    }

    /// The locale this catalog translates into.
    #[must_use]
    pub const fn locale(&self) -> &LocaleId {
        &self.locale
    }

    /// Insert a context, replacing any previous one with the same name.
    pub fn insert_context(&mut self, context: Context) {
        self.contexts.insert(context.name().to_owned(), context);
    }

    /// Look up a context by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    /// Iterate over contexts in authoring order.
    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.contexts.values()
    }

    /// Look up a translation payload by context name and borrowed key.
    #[must_use]
    pub fn translation(&self, context: &str, key: &KeyRef<'_>) -> Option<&Translation> {
        self.context(context)
            .and_then(|ctx| ctx.get(key))
            .map(Message::translation)
    }

    /// Number of contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Whether the catalog holds no contexts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Total number of messages across all contexts.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.values().map(Context::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        let mut context = Context::new("AboutDialog");
        context.insert(
            MessageKey::new("About", None),
            Message::new(Translation::Final(MessageText::Singular(
                "Riguardo".to_owned(),
            ))),
        );
        context.insert(
            MessageKey::new("About", Some("menu entry".to_owned())),
            Message::new(Translation::Final(MessageText::Singular(
                "Informazioni".to_owned(),
            ))),
        );
        let mut catalog = Catalog::new(LocaleId::new("it"));
        catalog.insert_context(context);
        catalog
    }

    #[test]
    fn borrowed_key_finds_owned_entry() {
        let catalog = sample_catalog();
        let plain = catalog.translation("AboutDialog", &KeyRef::new("About", None));
        assert_eq!(
            plain,
            Some(&Translation::Final(MessageText::Singular(
                "Riguardo".to_owned()
            )))
        );
    }

    #[test]
    fn disambiguation_separates_identical_sources() {
        let catalog = sample_catalog();
        let disambiguated =
            catalog.translation("AboutDialog", &KeyRef::new("About", Some("menu entry")));
        assert_eq!(
            disambiguated,
            Some(&Translation::Final(MessageText::Singular(
                "Informazioni".to_owned()
            )))
        );
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let catalog = sample_catalog();
        assert!(
            catalog
                .translation("AboutDialog", &KeyRef::new("about", None))
                .is_none()
        );
    }

    #[test]
    fn last_inserted_message_wins() {
        let mut context = Context::new("CheatDialog");
        let key = MessageKey::new("Add Cheat", None);
        let first = context.insert(
            key.clone(),
            Message::new(Translation::Final(MessageText::Singular("Uno".to_owned()))),
        );
        assert!(first.is_none());
        let evicted = context.insert(
            key,
            Message::new(Translation::Final(MessageText::Singular("Due".to_owned()))),
        );
        assert!(evicted.is_some());
        let kept = context.get(&KeyRef::new("Add Cheat", None));
        assert_eq!(
            kept.map(Message::translation),
            Some(&Translation::Final(MessageText::Singular("Due".to_owned())))
        );
    }
}
