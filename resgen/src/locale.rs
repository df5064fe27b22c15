//! Locale identifiers of the form `language[_COUNTRY[_VARIANT]]`.
//!
//! Besides parsing and formatting, this module knows how locale suffixes are
//! attached to resource file names (`happy/Birthday_fr_FR.properties`), which
//! is how locale-specific override files are discovered.

use std::{fmt::Display, path::MAIN_SEPARATOR, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A locale such as `en`, `en_US` or `en_US_WIN`.
///
/// Case is preserved exactly as written; `en_us` and `en_US` are different
/// locales as far as this crate is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    /// Creates a locale from its components.
    ///
    /// `language` must not be empty. When `country` is given it must be two
    /// characters and the language must be two characters as well. A variant
    /// requires a country.
    pub fn new(
        language: impl Into<String>,
        country: impl Into<String>,
        variant: impl Into<String>,
    ) -> Result<Self, Error> {
        let locale = Locale {
            language: language.into(),
            country: country.into(),
            variant: variant.into(),
        };
        let valid = !locale.language.is_empty()
            && (locale.country.is_empty()
                || (locale.language.chars().count() == 2 && locale.country.chars().count() == 2))
            && (locale.variant.is_empty() || !locale.country.is_empty());
        if valid {
            Ok(locale)
        } else {
            Err(Error::InvalidLocale(locale.to_string()))
        }
    }

    /// Parses `language[_COUNTRY[_VARIANT]]`.
    ///
    /// Without an underscore the whole string is the language and its length
    /// is not checked. Otherwise language and country must both be exactly
    /// two characters. Everything after the second underscore is the variant,
    /// taken verbatim.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidLocale(s.to_string());

        let Some((language, rest)) = s.split_once('_') else {
            if s.is_empty() {
                return Err(invalid());
            }
            return Ok(Locale {
                language: s.to_string(),
                country: String::new(),
                variant: String::new(),
            });
        };
        if language.chars().count() != 2 {
            return Err(invalid());
        }

        let (country, variant) = rest.split_once('_').unwrap_or((rest, ""));
        if country.chars().count() != 2 {
            return Err(invalid());
        }

        Ok(Locale {
            language: language.to_string(),
            country: country.to_string(),
            variant: variant.to_string(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "_{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locale::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(value: Locale) -> Self {
        value.to_string()
    }
}

/// Parses a comma-separated locale list such as `en_US,fr_FR`.
///
/// Blank entries are skipped; every other entry must be a valid locale.
pub fn parse_locale_list(list: &str) -> Result<Vec<Locale>, Error> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Locale::parse)
        .collect()
}

/// Given `happy/BirthdayResource_en_US.xml` and `.xml`, returns `en_US`.
///
/// Only the file name is inspected. Returns `None` when the name has no
/// underscore or the text after the first underscore is not a locale.
pub fn derive_from_filename(path: &str, suffix: &str) -> Option<Locale> {
    let stem = path.strip_suffix(suffix).unwrap_or(path);
    let file_name = &stem[file_name_start(stem)..];
    let (_, locale) = file_name.split_once('_')?;
    Locale::parse(locale).ok()
}

/// Given `happy/BirthdayResource_fr_FR.properties` and `.properties`,
/// returns `happy/BirthdayResource`.
///
/// Underscores are tried left to right, starting after the last directory
/// separator; the first one whose remainder parses as a locale is the
/// boundary. If none qualifies the path is returned without its suffix.
pub fn strip_locale_suffix(path: &str, suffix: &str) -> String {
    let stem = path.strip_suffix(suffix).unwrap_or(path);
    let start = file_name_start(stem);
    stem[start..]
        .match_indices('_')
        .map(|(offset, _)| start + offset)
        .find(|&score| Locale::parse(&stem[score + 1..]).is_ok())
        .map(|score| stem[..score].to_string())
        .unwrap_or_else(|| stem.to_string())
}

fn file_name_start(path: &str) -> usize {
    path.rfind(['/', MAIN_SEPARATOR])
        .map(|pos| pos + 1)
        .unwrap_or(0)
}
