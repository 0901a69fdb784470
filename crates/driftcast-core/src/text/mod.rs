//! Free-text parsing: horizons and company-name queries.

mod duration;
mod query;

pub use duration::{parse_duration, parse_duration_match, DurationMatch, MatchKind};
pub use query::{
    company_query, extract_company_query, is_stopword, strip_corporate_suffixes,
    strip_duration_phrases, STOPWORDS,
};
