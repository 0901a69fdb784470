use std::cmp::Ordering;
use std::collections::HashSet;

use crate::{SearchHit, Symbol};

/// Sort key for a search hit; lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HitRank {
    /// Negated count of query tokens that are whole words of the name.
    pub overlap: i64,
    pub misses_some_token: bool,
    pub misses_every_token: bool,
    pub not_equity: bool,
    pub not_domestic: bool,
    pub symbol_length_penalty: u8,
    pub name_length: usize,
}

impl HitRank {
    pub fn of(hit: &SearchHit, query_tokens: &HashSet<String>) -> Self {
        let name = hit.name.to_lowercase();
        let name_words = name
            .split(|ch: char| !ch.is_ascii_lowercase())
            .filter(|word| !word.is_empty())
            .collect::<HashSet<_>>();

        let overlap = query_tokens
            .iter()
            .filter(|token| name_words.contains(token.as_str()))
            .count();

        Self {
            overlap: -(overlap as i64),
            misses_some_token: !query_tokens.iter().all(|token| name.contains(token.as_str())),
            misses_every_token: !query_tokens.iter().any(|token| name.contains(token.as_str())),
            not_equity: !hit.is_equity(),
            not_domestic: !hit.is_domestic(),
            symbol_length_penalty: match hit.symbol.len() {
                2..=5 => 0,
                1 => 2,
                _ => 1,
            },
            name_length: if name.is_empty() { 999 } else { name.chars().count() },
        }
    }
}

/// Lowercase whitespace tokens of a company query.
pub fn query_tokens(query: &str) -> HashSet<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Drops non-stock instruments and orders the rest best first.
pub fn rank_hits(query: &str, hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let tokens = query_tokens(query);
    let mut ranked = hits
        .into_iter()
        .filter(SearchHit::is_stock_like)
        .map(|hit| (HitRank::of(&hit, &tokens), hit))
        .collect::<Vec<_>>();
    ranked.sort_by(|(left, _), (right, _)| left.cmp(right));
    ranked.into_iter().map(|(_, hit)| hit).collect()
}

/// First 2-5 character symbol, else a single letter the user typed.
pub fn pick_winner(ranked: &[SearchHit], typed_single_letters: &[Symbol]) -> Option<Symbol> {
    ranked
        .iter()
        .find(|hit| (2..=5).contains(&hit.symbol.len()))
        .or_else(|| {
            ranked.iter().find(|hit| {
                hit.symbol.is_single_letter() && typed_single_letters.contains(&hit.symbol)
            })
        })
        .map(|hit| hit.symbol.clone())
}

/// Suggestion candidates: short stock-like symbols, domestic first, then
/// shorter names, deduplicated by symbol.
pub fn suggestion_hits(hits: &[SearchHit], limit: usize) -> Vec<&SearchHit> {
    let mut candidates = hits
        .iter()
        .filter(|hit| hit.symbol.len() <= 5 && hit.is_stock_like())
        .collect::<Vec<_>>();

    candidates.sort_by(|left, right| {
        match (left.is_domestic(), right.is_domestic()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => left.name.chars().count().cmp(&right.name.chars().count()),
        }
    });

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|hit| seen.insert(hit.symbol.clone()))
        .take(limit)
        .collect()
}
