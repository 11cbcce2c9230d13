//! Plural-category selection.
//!
//! Variants are stored as an explicit enumerated category set
//! (zero/one/two/few/many/other) rather than positionally, so variant
//! counts can differ across locales without silent misalignment. A
//! [`PluralRule`] is a pure function from a count to a [`PluralCategory`];
//! the built-in table covers the common rule families and can be
//! overridden per locale at store-configuration time.

use serde::Deserialize;

use crate::catalog::LocaleId;

/// Grammatical-number category selected by a numeric count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    /// Used by locales with a dedicated zero form (for example Arabic).
    Zero,
    /// The singular form.
    One,
    /// The dual form.
    Two,
    /// The paucal form.
    Few,
    /// The greater-plural form.
    Many,
    /// The default form; every message must provide it.
    Other,
}

/// Plural variant strings keyed by category.
///
/// `other` is mandatory; [`PluralForms::select`] falls back to it whenever
/// the exact category has no variant, so selection always yields text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluralForms {
    /// Variant for [`PluralCategory::Zero`].
    #[serde(default)]
    pub zero: Option<String>,
    /// Variant for [`PluralCategory::One`].
    #[serde(default)]
    pub one: Option<String>,
    /// Variant for [`PluralCategory::Two`].
    #[serde(default)]
    pub two: Option<String>,
    /// Variant for [`PluralCategory::Few`].
    #[serde(default)]
    pub few: Option<String>,
    /// Variant for [`PluralCategory::Many`].
    #[serde(default)]
    pub many: Option<String>,
    /// Mandatory default variant.
    pub other: String,
}

impl PluralForms {
    /// Select the variant for a category, falling back to `other`.
    #[must_use]
    pub fn select(&self, category: PluralCategory) -> &str {
        let exact = match category {
            PluralCategory::Zero => self.zero.as_deref(),
            PluralCategory::One => self.one.as_deref(),
            PluralCategory::Two => self.two.as_deref(),
            PluralCategory::Few => self.few.as_deref(),
            PluralCategory::Many => self.many.as_deref(),
            PluralCategory::Other => None,
        };
        exact.unwrap_or(self.other.as_str())
    }
}

/// A locale's plural rule: a pure function count -> category.
///
/// Rule families cover the languages the built-in table knows about;
/// [`PluralRule::for_locale`] maps a locale tag to its family and the
/// store accepts per-locale overrides for anything the table misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// `one` for exactly 1, `other` otherwise (English, German, Italian).
    English,
    /// `one` for 0 and 1, `other` otherwise (French, Portuguese-BR).
    French,
    /// `other` for every count (Japanese, Chinese, Korean).
    Japanese,
    /// East-Slavic one/few/many split (Russian, Ukrainian).
    Russian,
    /// Full six-category split (Arabic).
    Arabic,
}

impl PluralRule {
    /// The rule applied when a locale declares none: English-like.
    pub const DEFAULT: Self = Self::English;

    /// Look up the built-in rule family for a locale.
    ///
    /// Returns `None` for languages the table does not cover; callers
    /// recover with [`PluralRule::DEFAULT`].
    #[must_use]
    pub fn for_locale(locale: &LocaleId) -> Option<Self> {
        match locale.language().as_str() {
            "en" | "de" | "it" | "es" | "nl" | "sv" | "da" | "no" | "el" | "fi" | "hu" | "tr" => {
                Some(Self::English)
            }
            "fr" | "pt" => Some(Self::French),
            "ja" | "zh" | "ko" | "th" | "vi" | "id" => Some(Self::Japanese),
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => Some(Self::Russian),
            "ar" => Some(Self::Arabic),
            _ => None,
        }
    }

    /// Map a count to its plural category under this rule.
    #[must_use]
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "plural rules are defined in terms of decimal remainders"
    )]
    pub const fn categorize(self, count: i64) -> PluralCategory {
        let n = count.unsigned_abs();
        match self {
            Self::English => {
                if n == 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::French => {
                if n <= 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::Japanese => PluralCategory::Other,
            Self::Russian => {
                let tens = n % 100;
                let units = n % 10;
                if units == 1 && tens != 11 {
                    PluralCategory::One
                } else if 2 <= units && units <= 4 && !(12 <= tens && tens <= 14) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            Self::Arabic => {
                let tens = n % 100;
                match n {
                    0 => PluralCategory::Zero,
                    1 => PluralCategory::One,
                    2 => PluralCategory::Two,
                    _ => {
                        if tens >= 3 && tens <= 10 {
                            PluralCategory::Few
                        } else if tens >= 11 {
                            PluralCategory::Many
                        } else {
                            PluralCategory::Other
                        }
                    }
                }
            }
        }
    }
}
