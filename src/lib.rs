//! Lingua core library.
//!
//! A translation-catalog lookup engine: given a (context, source text,
//! optional disambiguation, optional plural count) key, it resolves the
//! correct human-readable string for an active locale, substitutes
//! positional placeholders, and falls back gracefully when a translation
//! is absent or incomplete.

pub mod catalog;
pub mod cli;
pub mod format;
pub mod loader;
pub mod plural;
pub mod resolver;
pub mod runner;
pub mod store;
pub mod translator;
