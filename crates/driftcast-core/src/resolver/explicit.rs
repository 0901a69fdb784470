use std::sync::LazyLock;

use regex::Regex;

use crate::text::is_stopword;
use crate::Symbol;

const MAX_EXPLICIT_LEN: usize = 5;

/// Uppercase token the user may have typed as a ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitCandidate {
    pub symbol: Symbol,
    /// Typed with a `$` prefix.
    pub prefixed: bool,
    /// The token is the entire query.
    pub whole_query: bool,
}

impl ExplicitCandidate {
    /// Single-letter tickers count only when typed deliberately.
    pub fn is_acceptable(&self) -> bool {
        (2..=MAX_EXPLICIT_LEN).contains(&self.symbol.len()) || self.prefixed || self.whole_query
    }
}

/// One to five uppercase letters standing alone, optionally after `$`.
static EXPLICIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$?\b[A-Z]{1,5}\b").expect("static explicit ticker pattern compiles")
});

/// Explicit ticker candidates in input order.
///
/// Surrounding punctuation does not hide a ticker: `(TSLA)`, `AAPL's` and
/// `AAPL,MSFT` all yield candidates. Matches that are stopwords when
/// lowercased ("IN", "A") are skipped.
pub fn explicit_candidates(text: &str) -> Vec<ExplicitCandidate> {
    let whole = text.trim_matches(|ch: char| !ch.is_ascii_alphanumeric() && ch != '$');

    EXPLICIT_RE
        .find_iter(text)
        .filter_map(|found| {
            let token = found.as_str();
            let (prefixed, bare) = match token.strip_prefix('$') {
                Some(rest) => (true, rest),
                None => (false, token),
            };
            if is_stopword(&bare.to_ascii_lowercase()) {
                return None;
            }

            let symbol = Symbol::parse(bare).ok()?;
            Some(ExplicitCandidate {
                symbol,
                prefixed,
                whole_query: token == whole,
            })
        })
        .collect()
}

/// Single-letter symbols the user typed explicitly.
pub fn typed_single_letters(text: &str) -> Vec<Symbol> {
    explicit_candidates(text)
        .into_iter()
        .filter(|candidate| candidate.symbol.is_single_letter())
        .map(|candidate| candidate.symbol)
        .collect()
}
