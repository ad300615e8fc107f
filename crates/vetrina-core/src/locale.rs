//! Locale handling and locale substitution in query templates.
//!
//! Query templates in collection configs are written against Italian
//! labels and carry designated substitution points for the request locale:
//! the `$LANG$` placeholder token, `LANG(?x) = "it"` equality comparisons,
//! and `LANGMATCHES(LANG(?x), "it")` calls. Only these three shapes are
//! rewritten; unrelated string literals that happen to equal a locale code
//! are left untouched because the patterns anchor on the function-call
//! syntax.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

/// Placeholder token substituted with the request locale code.
pub const LANG_TOKEN: &str = "$LANG$";

/// The locales the catalogue is served in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Italian,
    English,
}

impl Locale {
    /// Two-letter lowercase language code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Italian => "it",
            Self::English => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for unrecognized locale codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl fmt::Display for UnknownLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown locale: {}", self.0)
    }
}

impl std::error::Error for UnknownLocale {}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "it" => Ok(Self::Italian),
            "en" => Ok(Self::English),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

/// Rewrites the designated locale substitution points in query text.
#[derive(Debug, Clone)]
pub struct LocaleInjector {
    lang_eq: Regex,
    lang_matches: Regex,
}

impl LocaleInjector {
    pub fn new() -> Self {
        Self {
            // LANG(?x) = "it"  /  lang(?x)="en"
            lang_eq: Regex::new(r#"(?i)\b(lang\s*\(\s*\?\w+\s*\)\s*=\s*)"(?:it|en)""#)
                .expect("valid regex"),
            // LANGMATCHES(LANG(?x), "it")
            lang_matches: Regex::new(
                r#"(?i)\b(langmatches\s*\(\s*lang\s*\(\s*\?\w+\s*\)\s*,\s*)"(?:it|en)""#,
            )
            .expect("valid regex"),
        }
    }

    /// Substitute `locale` at every designated point, all occurrences.
    /// Idempotent: injecting an already-injected text is a no-op.
    pub fn inject(&self, text: &str, locale: Locale) -> String {
        let code = locale.code();
        let text = text.replace(LANG_TOKEN, code);
        let text = self
            .lang_eq
            .replace_all(&text, |caps: &regex::Captures<'_>| {
                format!("{}\"{}\"", &caps[1], code)
            });
        self.lang_matches
            .replace_all(&text, |caps: &regex::Captures<'_>| {
                format!("{}\"{}\"", &caps[1], code)
            })
            .into_owned()
    }
}

impl Default for LocaleInjector {
    fn default() -> Self {
        Self::new()
    }
}
