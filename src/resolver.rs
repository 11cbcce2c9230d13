//! Key resolution against the active locale and its fallback chain.
//!
//! The resolver walks the chain in declared order and returns the first
//! `Final` translation payload it finds. `Missing`, `Unfinished`, and
//! `Obsolete` entries all trigger fallthrough identically: an unusable
//! draft must never surface to end users. When no locale in the chain
//! yields a usable payload the caller falls back to the literal source
//! text, so resolution can never produce an empty result.

use crate::catalog::{KeyRef, LocaleId, MessageText, Translation};
use crate::store::CatalogStore;

/// Outcome of resolving a lookup key across the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedMessage {
    /// A `Final` payload, tagged with the locale that supplied it.
    Translated {
        /// Locale whose catalog provided the payload.
        locale: LocaleId,
        /// The finished translation payload.
        text: MessageText,
    },
    /// No locale in the chain yielded a usable translation; the caller
    /// uses the source text verbatim.
    Source,
}

/// Resolve a key against the chain of locales, in consultation order.
///
/// Each step snapshots the resident catalog (an `Arc` clone), so an
/// in-flight resolution is unaffected by concurrent catalog installs.
#[must_use]
pub fn resolve(
    store: &CatalogStore,
    chain: &[LocaleId],
    context: &str,
    key: &KeyRef<'_>,
) -> ResolvedMessage {
    for locale in chain {
        let Some(catalog) = store.get(locale) else {
            continue;
        };
        match catalog.translation(context, key) {
            Some(Translation::Final(text)) => {
                return ResolvedMessage::Translated {
                    locale: locale.clone(),
                    text: text.clone(),
                };
            }
            Some(Translation::Missing | Translation::Unfinished(_) | Translation::Obsolete(_))
            | None => {}
        }
    }
    ResolvedMessage::Source
}
