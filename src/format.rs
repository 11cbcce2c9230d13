//! Positional placeholder substitution.
//!
//! Resolved text may reference caller-supplied arguments as `%1` through
//! `%9`, the plural count as `%n`, and a literal percent sign as `%%`.
//! Fewer arguments than referenced placeholders is not fatal: unresolved
//! placeholders stay in the output verbatim and a diagnostic is logged,
//! favouring visible degradation over throwing.

use tracing::warn;

/// Arguments available to placeholder expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatArgs<'a> {
    /// Positional arguments, `%1` referring to the first.
    pub positional: &'a [String],
    /// Plural count substituted for `%n`, when the caller supplied one.
    pub count: Option<i64>,
}

impl<'a> FormatArgs<'a> {
    /// Build from positional arguments and an optional plural count.
    #[must_use]
    pub const fn new(positional: &'a [String], count: Option<i64>) -> Self {
        Self { positional, count }
    }
}

/// Expand placeholders in `template` using the supplied arguments.
///
/// Unresolvable placeholders (index beyond the argument list, or `%n`
/// without a count) are left verbatim and reported via `tracing::warn!`.
///
/// # Examples
/// ```rust
/// use lingua::format::{expand, FormatArgs};
///
/// let args = vec!["Mario".to_owned()];
/// let text = expand("%1 has joined", &FormatArgs::new(&args, None));
/// assert_eq!(text, "Mario has joined");
///
/// let pct = expand("100%% done", &FormatArgs::default());
/// assert_eq!(pct, "100% done");
/// ```
#[must_use]
pub fn expand(template: &str, args: &FormatArgs<'_>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut unresolved: Vec<String> = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            output.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                output.push('%');
            }
            Some('n') => {
                chars.next();
                match args.count {
                    Some(count) => output.push_str(&count.to_string()),
                    None => {
                        output.push_str("%n");
                        unresolved.push("%n".to_owned());
                    }
                }
            }
            Some(digit @ '1'..='9') => {
                chars.next();
                let index = digit.to_digit(10).map_or(0, |d| d.saturating_sub(1));
                let value = usize::try_from(index)
                    .ok()
                    .and_then(|i| args.positional.get(i));
                match value {
                    Some(value) => output.push_str(value),
                    None => {
                        output.push('%');
                        output.push(digit);
                        unresolved.push(format!("%{digit}"));
                    }
                }
            }
            _ => output.push('%'),
        }
    }

    if !unresolved.is_empty() {
        warn!(
            template,
            supplied = args.positional.len(),
            missing = ?unresolved,
            "placeholder arguments missing; leaving placeholders verbatim"
        );
    }
    output
}
