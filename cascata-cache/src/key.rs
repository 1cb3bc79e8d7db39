use core::fmt;

use cascata_core::{DataKind, Period, Symbol};
use serde::{Deserialize, Serialize};

/// Deterministic cache key: (upper-cased symbol, period-or-kind, data kind).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Upper-cased ticker.
    pub symbol: String,
    /// Period code for price history, kind label otherwise.
    pub scope: String,
    /// Data kind tag.
    pub kind: DataKind,
}

impl CacheKey {
    /// Build a key from raw parts. The symbol is upper-cased.
    pub fn new(symbol: &str, scope: impl Into<String>, kind: DataKind) -> Self {
        Self {
            symbol: symbol.trim().to_ascii_uppercase(),
            scope: scope.into(),
            kind,
        }
    }

    /// Key for a price history request; `period` must already be substituted.
    #[must_use]
    pub fn price(symbol: &Symbol, period: Period) -> Self {
        Self::new(symbol.as_str(), period.code(), DataKind::Price)
    }

    /// Key for a period-independent kind; the scope is the kind label.
    #[must_use]
    pub fn for_kind(symbol: &Symbol, kind: DataKind) -> Self {
        Self::new(symbol.as_str(), kind.as_str(), kind)
    }

    /// File name used by the file-backed store.
    #[must_use]
    pub fn file_name(&self) -> String {
        let clean = |s: &str| -> String {
            s.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '=' | '^') {
                        c
                    } else {
                        '_'
                    }
                })
                .collect()
        };
        format!(
            "{}_{}_{}.json",
            clean(&self.symbol),
            clean(&self.scope),
            self.kind.as_str()
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.symbol, self.scope, self.kind)
    }
}
