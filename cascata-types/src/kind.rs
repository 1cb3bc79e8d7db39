use core::fmt;
use serde::{Deserialize, Serialize};

/// The four independently cascaded data kinds.
///
/// Labels are stable: they appear in cache keys, log fields, and error
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Daily OHLCV price history.
    Price,
    /// Company profile and headline ratios.
    Profile,
    /// Recent news items.
    News,
    /// Financial statements and earnings.
    Fundamentals,
}

impl DataKind {
    /// All kinds, in the order `analyze` reports them.
    pub const ALL: [Self; 4] = [Self::Price, Self::Profile, Self::News, Self::Fundamentals];

    /// Stable lower-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Profile => "profile",
            Self::News => "news",
            Self::Fundamentals => "fundamentals",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
