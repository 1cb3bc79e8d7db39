//! Request primitives: validated ticker symbols and lookback periods.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::error::CascataError;

const MAX_SYMBOL_LEN: usize = 15;

/// Upper-cased, validated ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Normalize and validate a raw ticker.
    ///
    /// Surrounding whitespace is trimmed and letters are upper-cased. Accepted
    /// characters are ASCII alphanumerics plus `.`, `-`, `^` and `=`.
    ///
    /// # Errors
    /// Returns `InvalidInput` for empty, overlong, or otherwise malformed input.
    pub fn new(raw: &str) -> Result<Self, CascataError> {
        let s = raw.trim().to_ascii_uppercase();
        if s.is_empty() {
            return Err(CascataError::invalid_input("symbol is empty"));
        }
        if s.len() > MAX_SYMBOL_LEN {
            return Err(CascataError::invalid_input(format!(
                "symbol '{s}' exceeds {MAX_SYMBOL_LEN} characters"
            )));
        }
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
        {
            return Err(CascataError::invalid_input(format!(
                "symbol '{s}' contains invalid character '{bad}'"
            )));
        }
        Ok(Self(s))
    }

    /// Borrow the normalized ticker.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = CascataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> Self {
        s.0
    }
}

/// Lookback period for price history requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    /// One week.
    #[serde(rename = "1w")]
    W1,
    /// One month.
    #[serde(rename = "1mo")]
    M1,
    /// Six months.
    #[serde(rename = "6mo")]
    M6,
    /// One year. Substituted for unknown codes.
    #[default]
    #[serde(rename = "1y")]
    Y1,
    /// Three years.
    #[serde(rename = "3y")]
    Y3,
    /// Five years.
    #[serde(rename = "5y")]
    Y5,
    /// Ten years.
    #[serde(rename = "10y")]
    Y10,
    /// Everything the provider has, bounded to ten years.
    #[serde(rename = "max")]
    Max,
}

impl Period {
    /// All recognized periods in ascending length.
    pub const ALL: [Self; 8] = [
        Self::W1,
        Self::M1,
        Self::M6,
        Self::Y1,
        Self::Y3,
        Self::Y5,
        Self::Y10,
        Self::Max,
    ];

    /// Parse a period code, returning `None` for unknown codes.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code))
    }

    /// Parse a period code, substituting the default for anything unrecognized.
    #[must_use]
    pub fn parse_or_default(code: &str) -> Self {
        Self::parse(code).unwrap_or_default()
    }

    /// Canonical wire code (`1w`, `1mo`, ...).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::W1 => "1w",
            Self::M1 => "1mo",
            Self::M6 => "6mo",
            Self::Y1 => "1y",
            Self::Y3 => "3y",
            Self::Y5 => "5y",
            Self::Y10 => "10y",
            Self::Max => "max",
        }
    }

    /// Calendar days covered by the period.
    #[must_use]
    pub const fn lookback_days(self) -> u32 {
        match self {
            Self::W1 => 7,
            Self::M1 => 30,
            Self::M6 => 180,
            Self::Y1 => 365,
            Self::Y3 => 1095,
            Self::Y5 => 1825,
            Self::Y10 | Self::Max => 3650,
        }
    }

    /// Human-readable description used in prompts and reports.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::W1 => "1 Week",
            Self::M1 => "1 Month",
            Self::M6 => "6 Months",
            Self::Y1 => "1 Year",
            Self::Y3 => "3 Years",
            Self::Y5 => "5 Years",
            Self::Y10 => "10 Years",
            Self::Max => "All Time",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
