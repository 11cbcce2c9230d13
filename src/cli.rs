//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands. The
//! binary is a thin administrative front end over the translator: it
//! loads a set of catalog files, optionally wires fallback edges between
//! their locales, and then queries, validates, or lists them.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// A catalog file bound to the locale it should be installed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogArg {
    /// Locale to install the catalog under.
    pub locale: String,
    /// Path to the catalog file.
    pub path: Utf8PathBuf,
}

/// A fallback edge between two locales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackArg {
    /// Locale whose misses consult the parent.
    pub child: String,
    /// Locale consulted next.
    pub parent: String,
}

fn split_pair(value: &str, what: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .filter(|(left, right)| !left.is_empty() && !right.is_empty())
        .map(|(left, right)| (left.to_owned(), right.to_owned()))
        .ok_or_else(|| format!("expected {what}, got '{value}'"))
}

fn parse_catalog(value: &str) -> Result<CatalogArg, String> {
    let (locale, path) = split_pair(value, "LOCALE=FILE")?;
    Ok(CatalogArg {
        locale,
        path: Utf8PathBuf::from(path),
    })
}

fn parse_fallback(value: &str) -> Result<FallbackArg, String> {
    let (child, parent) = split_pair(value, "CHILD=PARENT")?;
    if child == parent {
        return Err(format!("'{child}' cannot fall back to itself"));
    }
    Ok(FallbackArg { child, parent })
}

/// A translation-catalog lookup engine with locale fallback, plural
/// rules, and placeholder formatting.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog file to load, as LOCALE=FILE. May be repeated.
    #[arg(short = 'c', long = "catalog", value_name = "LOCALE=FILE", value_parser = parse_catalog)]
    pub catalogs: Vec<CatalogArg>,

    /// Fallback edge, as CHILD=PARENT. May be repeated.
    #[arg(long = "fallback", value_name = "CHILD=PARENT", value_parser = parse_fallback)]
    pub fallbacks: Vec<FallbackArg>,

    /// Active locale. Defaults to the system locale when it matches a
    /// loaded catalog.
    #[arg(short, long, value_name = "LOCALE")]
    pub locale: Option<String>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `locales` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse command-line arguments, providing `locales` as the default
    /// command.
    #[must_use]
    pub fn parse_with_default() -> Self {
        Self::parse().with_default_command()
    }

    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Locales);
        }
        self
    }
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Resolve one translation and print the result.
    Query {
        /// Context name (typically a UI component).
        context: String,
        /// Source text to translate.
        source: String,
        /// Disambiguation comment distinguishing identical source texts.
        #[arg(long, value_name = "TEXT")]
        disambiguation: Option<String>,
        /// Plural count; selects the plural variant and expands `%n`.
        #[arg(long, value_name = "N")]
        count: Option<i64>,
        /// Positional arguments substituted for `%1`..`%9`.
        #[arg(value_name = "ARG")]
        args: Vec<String>,
    },

    /// Parse every catalog and report diagnostics.
    Validate {
        /// Emit a machine-readable JSON summary instead of prose.
        #[arg(long)]
        json: bool,
    },

    /// List loaded locales and their fallback chains.
    Locales,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_pairs_parse() {
        let parsed = parse_catalog("it=locales/it.yml");
        assert_eq!(
            parsed,
            Ok(CatalogArg {
                locale: "it".to_owned(),
                path: Utf8PathBuf::from("locales/it.yml"),
            })
        );
    }

    #[test]
    fn malformed_catalog_pair_is_rejected() {
        assert!(parse_catalog("it.yml").is_err());
        assert!(parse_catalog("=it.yml").is_err());
        assert!(parse_catalog("it=").is_err());
    }

    #[test]
    fn self_fallback_is_rejected() {
        assert!(parse_fallback("en=en").is_err());
    }

    #[test]
    fn default_command_is_locales() {
        let cli = Cli::try_parse_from(["lingua"])
            .map(Cli::with_default_command)
            .ok();
        assert_eq!(cli.and_then(|c| c.command), Some(Commands::Locales));
    }
}
