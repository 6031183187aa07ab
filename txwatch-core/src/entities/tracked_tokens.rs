//! Tracked token table (mint address -> display symbol).

use compact_str::CompactString;
use std::collections::HashMap;

/// Immutable lookup of the SPL mints whose incoming transfers are reported.
#[derive(Debug, Clone, Default)]
pub struct TrackedTokens {
    symbols: HashMap<String, CompactString>,
}

impl TrackedTokens {
    /// Display symbol of a tracked mint.
    pub fn symbol(&self, mint: &str) -> Option<&str> {
        self.symbols.get(mint).map(CompactString::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in alphabetical order, for startup logging.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<_> = self.symbols.values().map(CompactString::as_str).collect();
        symbols.sort_unstable();
        symbols
    }
}

/// Later entries win on duplicate mints; callers that need to reject
/// duplicates must do so before collecting.
impl<M, S> FromIterator<(M, S)> for TrackedTokens
where
    M: Into<String>,
    S: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (M, S)>>(iter: T) -> Self {
        Self {
            symbols: iter
                .into_iter()
                .map(|(mint, symbol)| (mint.into(), CompactString::from(symbol.as_ref())))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let tokens: TrackedTokens = [("RAY_MINT", "RAY"), ("JUP_MINT", "JUP")]
            .into_iter()
            .collect();
        assert_eq!(tokens.symbol("RAY_MINT"), Some("RAY"));
        assert_eq!(tokens.symbol("OTHER"), None);
        assert_eq!(tokens.symbols(), ["JUP", "RAY"]);
    }
}
