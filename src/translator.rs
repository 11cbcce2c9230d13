//! The locale-switch coordinator and public translation API.
//!
//! A [`Translator`] owns the catalog store and the active-locale cell. It
//! has an explicit lifecycle: constructed at startup from a validated
//! [`FallbackConfig`], swapped on locale change, dropped at shutdown —
//! never implicit process-wide state. Switching locales is a single
//! atomic swap; in-flight lookups complete against the snapshot that was
//! active when they began.
//!
//! Lookup-path conditions never propagate as failures: [`Translator::translate`]
//! always returns a displayable string, worst case the formatted source
//! text. Configuration and load problems are surfaced precisely, because
//! they indicate operator or authoring mistakes.

use std::sync::{Arc, PoisonError, RwLock};

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, KeyRef, LocaleId, MessageText};
use crate::format::{self, FormatArgs};
use crate::loader::{self, CatalogName, LoadError};
use crate::plural::{PluralCategory, PluralRule};
use crate::resolver::{self, ResolvedMessage};
use crate::store::{CatalogStore, FallbackConfig};

/// Errors raised when switching the active locale.
#[derive(Debug, Error, Diagnostic)]
pub enum SwitchError {
    /// The target locale was never successfully loaded and no source
    /// provider could supply it.
    #[error("locale '{locale}' has not been loaded")]
    #[diagnostic(code(lingua::translator::locale_not_found))]
    NotFound {
        /// The locale that was requested.
        locale: LocaleId,
    },

    /// Loading the target locale on demand failed; the previous active
    /// locale is unchanged.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),
}

/// Supplies catalog source text for locales loaded on demand.
///
/// [`Translator::set_active_locale`] consults the provider when the
/// switch target is not resident, so hosts can lazily load catalogs from
/// disk or embedded assets.
pub trait CatalogSourceProvider: Send + Sync {
    /// Return the serialized catalog for a locale, when available.
    fn source_for(&self, locale: &LocaleId) -> Option<String>;
}

/// A single translation query.
///
/// Built incrementally so call sites stay readable:
///
/// ```rust
/// use lingua::translator::TranslationRequest;
///
/// let request = TranslationRequest::new("ChatRoom", "%1 has joined")
///     .with_arg("Mario");
/// assert_eq!(request.source(), "%1 has joined");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest<'a> {
    context: &'a str,
    source: &'a str,
    disambiguation: Option<&'a str>,
    count: Option<i64>,
    args: Vec<String>,
}

impl<'a> TranslationRequest<'a> {
    /// Create a request for a context and source text.
    #[must_use]
    pub const fn new(context: &'a str, source: &'a str) -> Self {
        Self {
            context,
            source,
            disambiguation: None,
            count: None,
            args: Vec::new(),
        }
    }

    /// Distinguish this message from others sharing the same source text.
    #[must_use]
    pub const fn with_disambiguation(mut self, disambiguation: &'a str) -> Self {
        self.disambiguation = Some(disambiguation);
        self
    }

    /// Supply the plural count; also expands `%n` in the resolved text.
    #[must_use]
    pub const fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    /// Append a positional argument (`%1` refers to the first).
    #[must_use]
    #[expect(
        clippy::needless_pass_by_value,
        reason = "Accepting owned values keeps call sites ergonomic for temporaries."
    )]
    pub fn with_arg(mut self, value: impl ToString) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// The context name queried.
    #[must_use]
    pub const fn context(&self) -> &str {
        self.context
    }

    /// The untranslated source text.
    #[must_use]
    pub const fn source(&self) -> &str {
        self.source
    }
}

/// Catalog store plus active-locale coordination.
///
/// # Examples
/// ```rust
/// use lingua::store::FallbackConfig;
/// use lingua::translator::{TranslationRequest, Translator};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FallbackConfig::builder().locale("it").build()?;
/// let translator = Translator::new(config);
/// translator.load_locale(
///     "it",
///     r#"
/// format_version: "1.0.0"
/// locale: it
/// contexts:
///   - name: AboutDialog
///     messages:
///       - source: "About Citra"
///         translation: "Riguardo Citra"
/// "#,
/// )?;
/// translator.set_active_locale("it")?;
/// assert_eq!(translator.tr("AboutDialog", "About Citra"), "Riguardo Citra");
/// # Ok(())
/// # }
/// ```
pub struct Translator {
    store: CatalogStore,
    active: RwLock<Option<LocaleId>>,
    provider: Option<Box<dyn CatalogSourceProvider>>,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("store", &self.store)
            .field("active", &self.active)
            .field("provider", &self.provider.as_ref().map(|_| "<provider>"))
            .finish()
    }
}

impl Translator {
    /// Create a translator governed by a validated fallback configuration.
    #[must_use]
    pub fn new(config: FallbackConfig) -> Self {
        Self {
            store: CatalogStore::new(config),
            active: RwLock::new(None),
            provider: None,
        }
    }

    /// Attach a provider used to load switch targets on demand.
    #[must_use]
    pub fn with_source_provider(mut self, provider: Box<dyn CatalogSourceProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// The underlying catalog store.
    #[must_use]
    pub const fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Parse and atomically install a catalog for a locale.
    ///
    /// On failure the locale's previously resident catalog is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when parsing fails or the catalog declares a
    /// different locale than requested.
    pub fn load_locale(&self, id: impl Into<LocaleId>, source: &str) -> Result<(), LoadError> {
        let requested = id.into();
        let catalog = loader::from_str_named(source, &CatalogName::new(requested.as_str()))?;
        if *catalog.locale() != requested {
            return Err(LoadError::LocaleMismatch {
                declared: catalog.locale().clone(),
                requested,
            });
        }
        let _previous = self.store.install(catalog);
        Ok(())
    }

    /// Atomically switch the active locale.
    ///
    /// Validates the target is resident, loading it through the source
    /// provider when one is attached. On failure the previous active
    /// locale is unchanged — there is no partial switch.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchError::NotFound`] for unknown targets and
    /// [`SwitchError::Load`] when on-demand loading fails.
    pub fn set_active_locale(&self, id: impl Into<LocaleId>) -> Result<(), SwitchError> {
        let locale = id.into();
        if !self.store.contains(&locale) {
            let source = self
                .provider
                .as_ref()
                .and_then(|p| p.source_for(&locale))
                .ok_or_else(|| SwitchError::NotFound {
                    locale: locale.clone(),
                })?;
            self.load_locale(locale.clone(), &source)?;
        }
        let mut guard = self.active.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(locale);
        Ok(())
    }

    /// The currently active locale, if one has been set.
    #[must_use]
    pub fn active_locale(&self) -> Option<LocaleId> {
        let guard = self.active.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Locales with resident catalogs, sorted.
    #[must_use]
    pub fn list_loaded_locales(&self) -> Vec<LocaleId> {
        self.store.list()
    }

    /// Evict the resident catalog for a locale, reclaiming memory once
    /// in-flight readers drop their snapshots. Lookups against an evicted
    /// locale fall through to the rest of the chain.
    #[must_use]
    pub fn evict_locale(&self, locale: &LocaleId) -> Option<Arc<Catalog>> {
        self.store.evict(locale)
    }

    /// Resolve and format a translation.
    ///
    /// Always returns a displayable string: when no locale in the active
    /// chain yields a `Final` entry, the formatted source text is used.
    #[must_use]
    pub fn translate(&self, request: &TranslationRequest<'_>) -> String {
        let key = KeyRef::new(request.source, request.disambiguation);
        let active = self.active_locale();
        let resolved = active.as_ref().map_or(ResolvedMessage::Source, |locale| {
            let chain = self.store.chain(locale);
            resolver::resolve(&self.store, &chain, request.context, &key)
        });

        let template = match resolved {
            ResolvedMessage::Translated {
                text: MessageText::Singular(text),
                ..
            } => text,
            ResolvedMessage::Translated {
                text: MessageText::Plural(forms),
                ..
            } => {
                let category = request.count.map_or(PluralCategory::Other, |count| {
                    self.active_plural_rule(active.as_ref()).categorize(count)
                });
                forms.select(category).to_owned()
            }
            ResolvedMessage::Source => request.source.to_owned(),
        };

        format::expand(&template, &FormatArgs::new(&request.args, request.count))
    }

    /// Shorthand for a plain context + source lookup.
    #[must_use]
    pub fn tr(&self, context: &str, source: &str) -> String {
        self.translate(&TranslationRequest::new(context, source))
    }

    /// The plural rule for the active locale: configured override first,
    /// then the built-in table, then the English-like default. A missing
    /// rule is a recovered condition, logged and never raised.
    fn active_plural_rule(&self, active: Option<&LocaleId>) -> PluralRule {
        let Some(locale) = active else {
            return PluralRule::DEFAULT;
        };
        if let Some(rule) = self.store.config().plural_rule_override(locale) {
            return rule;
        }
        PluralRule::for_locale(locale).unwrap_or_else(|| {
            debug!(
                locale = locale.as_str(),
                "no plural rule for locale; using English-like default"
            );
            PluralRule::DEFAULT
        })
    }
}
