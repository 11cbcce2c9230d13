//! Per-locale catalog storage and the fallback-locale graph.
//!
//! The fallback graph is validated once, when a [`FallbackConfig`] is
//! built: edges may only reference declared locales and must not form a
//! cycle. Lookups never re-validate. Installing a catalog is a single
//! atomic publish: readers observe either the previous or the new catalog,
//! never a partially built one.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use miette::Diagnostic;
use thiserror::Error;

use crate::catalog::{Catalog, LocaleId};
use crate::plural::PluralRule;

/// Errors raised while validating the fallback configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ConfigError {
    /// A fallback edge references a locale that was never declared.
    #[error("fallback references undeclared locale '{locale}'")]
    #[diagnostic(code(lingua::store::unknown_locale))]
    UnknownLocale {
        /// The undeclared locale.
        locale: LocaleId,
    },

    /// Following fallback edges from this locale returns to it.
    #[error("fallback chain starting at '{locale}' forms a cycle")]
    #[diagnostic(code(lingua::store::fallback_cycle))]
    FallbackCycle {
        /// The locale whose chain loops.
        locale: LocaleId,
    },

    /// A locale was given two fallback parents.
    #[error("locale '{child}' already has fallback '{existing}'")]
    #[diagnostic(code(lingua::store::duplicate_fallback))]
    DuplicateFallback {
        /// The locale declared twice.
        child: LocaleId,
        /// Its previously declared parent.
        existing: LocaleId,
    },
}

/// Builder for [`FallbackConfig`].
///
/// Declare every locale first, then the fallback edges between them and
/// any plural-rule overrides. Validation happens in [`Self::build`].
#[derive(Debug, Default)]
pub struct FallbackConfigBuilder {
    locales: Vec<LocaleId>,
    edges: Vec<(LocaleId, LocaleId)>,
    rules: HashMap<LocaleId, PluralRule>,
}

impl FallbackConfigBuilder {
    /// Declare a locale.
    #[must_use]
    pub fn locale(mut self, id: impl Into<LocaleId>) -> Self {
        self.locales.push(id.into());
        self
    }

    /// Declare a fallback edge: lookups missing in `child` consult
    /// `parent` next.
    #[must_use]
    pub fn fallback(mut self, child: impl Into<LocaleId>, parent: impl Into<LocaleId>) -> Self {
        self.edges.push((child.into(), parent.into()));
        self
    }

    /// Override the plural rule for a locale.
    #[must_use]
    pub fn plural_rule(mut self, locale: impl Into<LocaleId>, rule: PluralRule) -> Self {
        self.rules.insert(locale.into(), rule);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an edge references an undeclared
    /// locale, a locale has two parents, or the graph contains a cycle.
    pub fn build(self) -> Result<FallbackConfig, ConfigError> {
        let declared: HashSet<&LocaleId> = self.locales.iter().collect();
        let mut parents: HashMap<LocaleId, LocaleId> = HashMap::new();

        for (child, parent) in &self.edges {
            for endpoint in [child, parent] {
                if !declared.contains(endpoint) {
                    return Err(ConfigError::UnknownLocale {
                        locale: endpoint.clone(),
                    });
                }
            }
            if let Some(existing) = parents.get(child) {
                return Err(ConfigError::DuplicateFallback {
                    child: child.clone(),
                    existing: existing.clone(),
                });
            }
            parents.insert(child.clone(), parent.clone());
        }

        for start in &self.locales {
            detect_cycle(start, &parents)?;
        }

        Ok(FallbackConfig {
            parents,
            rules: self.rules,
        })
    }
}

fn detect_cycle(
    start: &LocaleId,
    parents: &HashMap<LocaleId, LocaleId>,
) -> Result<(), ConfigError> {
    let mut visited: HashSet<&LocaleId> = HashSet::new();
    let mut current = start;
    while let Some(parent) = parents.get(current) {
        if !visited.insert(current) {
            return Err(ConfigError::FallbackCycle {
                locale: start.clone(),
            });
        }
        current = parent;
    }
    Ok(())
}

/// Validated fallback-locale graph and plural-rule overrides.
///
/// Immutable once built; shared by the store and the resolver.
#[derive(Debug, Default, Clone)]
pub struct FallbackConfig {
    parents: HashMap<LocaleId, LocaleId>,
    rules: HashMap<LocaleId, PluralRule>,
}

impl FallbackConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> FallbackConfigBuilder {
        FallbackConfigBuilder::default()
    }

    /// The declared fallback parent of a locale, if any.
    #[must_use]
    pub fn parent(&self, locale: &LocaleId) -> Option<&LocaleId> {
        self.parents.get(locale)
    }

    /// The locale followed by its fallback parents, in consultation order.
    ///
    /// Guaranteed to terminate: the graph was validated acyclic.
    #[must_use]
    pub fn chain(&self, locale: &LocaleId) -> Vec<LocaleId> {
        let mut chain = vec![locale.clone()];
        let mut current = locale;
        while let Some(parent) = self.parents.get(current) {
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }

    /// The plural-rule override declared for a locale, if any.
    #[must_use]
    pub fn plural_rule_override(&self, locale: &LocaleId) -> Option<PluralRule> {
        self.rules.get(locale).copied()
    }
}

/// Maps locale id to resident [`Catalog`] and owns the fallback graph.
///
/// Catalogs are immutable and shared as `Arc`, so `get` hands out cheap
/// snapshots; `install` replaces (never mutates) the resident catalog.
#[derive(Debug, Default)]
pub struct CatalogStore {
    config: FallbackConfig,
    catalogs: RwLock<HashMap<LocaleId, Arc<Catalog>>>,
}

impl CatalogStore {
    /// Create a store governed by the given fallback configuration.
    #[must_use]
    pub fn new(config: FallbackConfig) -> Self {
        Self {
            config,
            catalogs: RwLock::new(HashMap::new()),
        }
    }

    /// The validated fallback configuration.
    #[must_use]
    pub const fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// Snapshot the resident catalog for a locale.
    #[must_use]
    pub fn get(&self, locale: &LocaleId) -> Option<Arc<Catalog>> {
        let guard = self
            .catalogs
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.get(locale).cloned()
    }

    /// Atomically publish a fully built catalog for its locale.
    ///
    /// Returns the catalog it replaced, if one was resident.
    #[must_use]
    pub fn install(&self, catalog: Catalog) -> Option<Arc<Catalog>> {
        let locale = catalog.locale().clone();
        let mut guard = self
            .catalogs
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.insert(locale, Arc::new(catalog))
    }

    /// Remove the resident catalog for a locale, reclaiming its memory
    /// once the last in-flight reader drops its snapshot.
    #[must_use]
    pub fn evict(&self, locale: &LocaleId) -> Option<Arc<Catalog>> {
        let mut guard = self
            .catalogs
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.remove(locale)
    }

    /// Whether a catalog is resident for the locale.
    #[must_use]
    pub fn contains(&self, locale: &LocaleId) -> bool {
        let guard = self
            .catalogs
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.contains_key(locale)
    }

    /// All locales with resident catalogs, sorted for deterministic output.
    #[must_use]
    pub fn list(&self) -> Vec<LocaleId> {
        let guard = self
            .catalogs
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut locales: Vec<LocaleId> = guard.keys().cloned().collect();
        locales.sort_unstable();
        locales
    }

    /// The locale followed by its fallback parents, in consultation order.
    #[must_use]
    pub fn chain(&self, locale: &LocaleId) -> Vec<LocaleId> {
        self.config.chain(locale)
    }
}
