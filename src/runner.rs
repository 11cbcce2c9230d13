//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point
//! that handles command execution: it assembles a [`Translator`] from the
//! command-line catalog and fallback declarations, resolves the active
//! locale, and dispatches to the requested subcommand.

use std::collections::BTreeSet;
use std::io::{self, Write};

use anyhow::{Context as _, Result};
use serde_json::json;
use tracing::debug;

use crate::catalog::LocaleId;
use crate::cli::{CatalogArg, Cli, Commands, FallbackArg};
use crate::loader;
use crate::store::FallbackConfig;
use crate::translator::{TranslationRequest, Translator};

/// System locale provider for the current host.
pub trait SystemLocale {
    /// Return the system locale string when available.
    fn system_locale(&self) -> Option<String>;
}

/// System locale provider backed by `sys-locale`.
#[derive(Debug, Default, Copy, Clone)]
pub struct SysLocale;

impl SystemLocale for SysLocale {
    fn system_locale(&self) -> Option<String> {
        sys_locale::get_locale()
    }
}

/// Normalize a raw locale string into a hyphenated tag.
///
/// Strips encoding suffixes (for example `.UTF-8`), removes variant
/// sections (for example `@latin`), and replaces underscores with
/// hyphens. Returns `None` for empty or non-tag input such as `C`.
///
/// # Examples
/// ```rust
/// use lingua::runner::normalize_locale_tag;
///
/// assert_eq!(normalize_locale_tag("en_US.UTF-8"), Some("en-US".to_owned()));
/// assert_eq!(normalize_locale_tag("C"), None);
/// ```
#[must_use]
pub fn normalize_locale_tag(raw: &str) -> Option<String> {
    let stripped = raw
        .trim()
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    if stripped.is_empty() || stripped == "C" || stripped == "POSIX" {
        return None;
    }
    let candidate = stripped.replace('_', "-");
    let valid = candidate
        .split('-')
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));
    valid.then_some(candidate)
}

fn build_config(catalogs: &[CatalogArg], fallbacks: &[FallbackArg]) -> Result<FallbackConfig> {
    let mut declared: BTreeSet<&str> = catalogs.iter().map(|c| c.locale.as_str()).collect();
    for edge in fallbacks {
        declared.insert(edge.child.as_str());
        declared.insert(edge.parent.as_str());
    }
    let mut builder = FallbackConfig::builder();
    for locale in declared {
        builder = builder.locale(locale);
    }
    for edge in fallbacks {
        builder = builder.fallback(edge.child.as_str(), edge.parent.as_str());
    }
    builder.build().context("invalid fallback configuration")
}

fn load_catalogs(translator: &Translator, catalogs: &[CatalogArg]) -> Result<()> {
    for entry in catalogs {
        let source = std::fs::read_to_string(entry.path.as_std_path())
            .with_context(|| format!("failed to read catalog {}", entry.path))?;
        translator
            .load_locale(entry.locale.as_str(), &source)
            .with_context(|| format!("failed to load catalog {}", entry.path))?;
    }
    Ok(())
}

/// Resolve the active locale: `--locale` first, then the system locale
/// when it matches a loaded catalog.
fn resolve_active_locale(cli: &Cli, system: &impl SystemLocale) -> Option<LocaleId> {
    if let Some(explicit) = &cli.locale {
        return Some(LocaleId::new(explicit.as_str()));
    }
    let tag = system.system_locale().and_then(|raw| {
        debug!(raw = raw.as_str(), "system locale detected");
        normalize_locale_tag(&raw)
    })?;
    let loaded = cli.catalogs.iter().any(|c| c.locale == tag);
    loaded.then(|| LocaleId::new(tag))
}

/// Execute the parsed command line.
///
/// # Errors
///
/// Returns an error when catalogs fail to load or validate, the fallback
/// configuration is invalid, or the requested locale cannot be activated.
pub fn run(cli: &Cli) -> Result<()> {
    run_with_system(cli, &SysLocale)
}

/// Execute with an explicit system-locale provider (used by tests).
///
/// # Errors
///
/// See [`run`].
pub fn run_with_system(cli: &Cli, system: &impl SystemLocale) -> Result<()> {
    match cli.command.as_ref() {
        Some(Commands::Validate { json }) => validate(cli, *json),
        Some(Commands::Query {
            context,
            source,
            disambiguation,
            count,
            args,
        }) => query(
            cli,
            system,
            context,
            source,
            disambiguation.as_deref(),
            *count,
            args,
        ),
        Some(Commands::Locales) | None => locales(cli),
    }
}

fn make_translator(cli: &Cli) -> Result<Translator> {
    let config = build_config(&cli.catalogs, &cli.fallbacks)?;
    let translator = Translator::new(config);
    load_catalogs(&translator, &cli.catalogs)?;
    Ok(translator)
}

fn query(
    cli: &Cli,
    system: &impl SystemLocale,
    context: &str,
    source: &str,
    disambiguation: Option<&str>,
    count: Option<i64>,
    args: &[String],
) -> Result<()> {
    let translator = make_translator(cli)?;
    if let Some(locale) = resolve_active_locale(cli, system) {
        translator
            .set_active_locale(locale.as_str())
            .with_context(|| format!("cannot activate locale '{locale}'"))?;
    }

    let mut request = TranslationRequest::new(context, source);
    if let Some(text) = disambiguation {
        request = request.with_disambiguation(text);
    }
    if let Some(n) = count {
        request = request.with_count(n);
    }
    for arg in args {
        request = request.with_arg(arg);
    }

    let resolved = translator.translate(&request);
    let mut out = io::stdout().lock();
    writeln!(out, "{resolved}").context("write query result")?;
    Ok(())
}

fn locales(cli: &Cli) -> Result<()> {
    let translator = make_translator(cli)?;
    let mut out = io::stdout().lock();
    for locale in translator.list_loaded_locales() {
        let chain = translator.store().chain(&locale);
        let rendered: Vec<&str> = chain.iter().map(LocaleId::as_str).collect();
        writeln!(out, "{}", rendered.join(" -> ")).context("write locale list")?;
    }
    Ok(())
}

fn validate(cli: &Cli, as_json: bool) -> Result<()> {
    build_config(&cli.catalogs, &cli.fallbacks)?;

    let mut summaries = Vec::new();
    let mut failures = 0usize;
    for entry in &cli.catalogs {
        match loader::from_path(&entry.path) {
            Ok(catalog) => summaries.push(json!({
                "locale": entry.locale,
                "path": entry.path.as_str(),
                "status": "ok",
                "contexts": catalog.len(),
                "messages": catalog.message_count(),
            })),
            Err(err) => {
                failures += 1;
                summaries.push(json!({
                    "locale": entry.locale,
                    "path": entry.path.as_str(),
                    "status": "error",
                    "error": format!("{:?}", miette::Report::new(err)),
                }));
            }
        }
    }

    let mut out = io::stdout().lock();
    if as_json {
        let report = json!({ "catalogs": summaries, "failures": failures });
        writeln!(out, "{report:#}").context("write validation report")?;
    } else {
        for summary in &summaries {
            writeln!(out, "{summary:#}").context("write validation report")?;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} catalog(s) failed to validate");
    }
    Ok(())
}
