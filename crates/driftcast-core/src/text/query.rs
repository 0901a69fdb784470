use std::sync::LazyLock;

use regex::Regex;

use super::duration::{ARTICLE_RE, KEYWORD_RE, NUMBERED_RE, TODAY_RE, TOMORROW_RE};

/// Words that never belong to a company name.
pub const STOPWORDS: [&str; 24] = [
    "in",
    "for",
    "over",
    "the",
    "next",
    "this",
    "coming",
    "upcoming",
    "today",
    "tomorrow",
    "day",
    "days",
    "week",
    "weeks",
    "month",
    "months",
    "year",
    "years",
    "about",
    "around",
    "approximately",
    "approx",
    "a",
    "an",
];

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern compiles"));

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("static pattern compiles"));

static NON_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("static pattern compiles"));

static CORPORATE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:inc|incorporated|corp|corporation|co|company|ltd|limited|plc|nv|sa|ag)\b\.?")
        .expect("static pattern compiles")
});

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Removes timeframe phrases so they do not pollute a company-name search.
pub fn strip_duration_phrases(text: &str) -> String {
    let mut stripped = TOMORROW_RE.replace_all(text, " ").into_owned();
    for pattern in [&*TODAY_RE, &*NUMBERED_RE, &*ARTICLE_RE, &*KEYWORD_RE] {
        stripped = pattern.replace_all(&stripped, " ").into_owned();
    }
    collapse_whitespace(&stripped)
}

/// Reduces free text to a lowercase company-name query.
///
/// Drops duration phrases, digits, punctuation and stopwords. Returns
/// `None` when nothing is left.
pub fn extract_company_query(text: &str) -> Option<String> {
    let lowered = strip_duration_phrases(text)
        .to_lowercase()
        .replace('\u{2019}', "'");
    let without_numbers = NUMBER_RE.replace_all(&lowered, " ");
    let letters_only = NON_LETTER_RE.replace_all(&without_numbers, " ");

    let query = letters_only
        .split_whitespace()
        .filter(|word| !is_stopword(word))
        .collect::<Vec<_>>()
        .join(" ");

    (!query.is_empty()).then_some(query)
}

/// Normalized company query, falling back to the duration-stripped text.
pub fn company_query(text: &str) -> String {
    extract_company_query(text).unwrap_or_else(|| strip_duration_phrases(text))
}

/// Drops corporate suffixes such as "Inc." or "plc".
pub fn strip_corporate_suffixes(query: &str) -> String {
    collapse_whitespace(&CORPORATE_SUFFIX_RE.replace_all(query, ""))
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_every_duration_form() {
        assert_eq!(strip_duration_phrases("Apple in 3 days"), "Apple");
        assert_eq!(strip_duration_phrases("tesla tommorow please"), "tesla please");
        assert_eq!(strip_duration_phrases("AMD today"), "AMD");
        assert_eq!(strip_duration_phrases("amazon in a week"), "amazon");
        assert_eq!(strip_duration_phrases("nvidia over the next month"), "nvidia over");
    }

    #[test]
    fn extracts_clean_company_query() {
        assert_eq!(
            extract_company_query("Coca-Cola in about 2 weeks!").as_deref(),
            Some("coca cola")
        );
        assert_eq!(
            extract_company_query("McDonald\u{2019}s over the next month").as_deref(),
            Some("mcdonald s")
        );
        assert_eq!(extract_company_query("in 3 days"), None);
        assert_eq!(extract_company_query(""), None);
    }

    #[test]
    fn strips_corporate_suffixes() {
        assert_eq!(strip_corporate_suffixes("apple inc."), "apple");
        assert_eq!(strip_corporate_suffixes("Microsoft Corporation"), "Microsoft");
        assert_eq!(strip_corporate_suffixes("costco"), "costco");
    }
}
