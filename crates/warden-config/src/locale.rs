//! Locale identifiers shared by value rendering and diagnostic catalogs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locales with bundled message catalogs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleCode {
    /// English, the fallback locale.
    #[default]
    En,
    /// German.
    De,
}

impl LocaleCode {
    /// Every supported locale, default first.
    pub const ALL: [Self; 2] = [Self::En, Self::De];

    /// Render the locale as its primary language subtag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }

    /// Resolve a BCP-47 style tag (`de-AT`, `en_US`) by its primary subtag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next().unwrap_or(tag).trim();
        Self::ALL
            .into_iter()
            .find(|locale| primary.eq_ignore_ascii_case(locale.as_str()))
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocaleCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unsupported locale '{s}'"))
    }
}
