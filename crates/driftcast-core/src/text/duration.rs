//! Horizon extraction from free text.
//!
//! Matchers run in priority order and the first hit wins:
//!
//! | Kind | Example | Horizon |
//! |------|---------|---------|
//! | [`MatchKind::Tomorrow`] | "tommorow" | 1 days |
//! | [`MatchKind::Today`] | "today" | 0 days |
//! | [`MatchKind::NextUnit`] | "next month" | 1 months |
//! | [`MatchKind::Numbered`] | "in about 3 weeks" | 3 weeks |
//! | [`MatchKind::Article`] | "in a year" | 1 years |
//! | [`MatchKind::Keyword`] | "the coming week" | 1 weeks |
//! | [`MatchKind::Bare`] | "days" | 1 days |

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::{Horizon, TimeUnit};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static duration pattern compiles")
}

pub(crate) static TOMORROW_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bto+m+o*r*o*w+\b"));

pub(crate) static TODAY_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\btoday\b"));

static NEXT_UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bnext\s+(week|month|year)\b"));

pub(crate) static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)\b(?:in\s+)?(?:about|around|approx(?:imate(?:ly)?)?|~)?\s*(\d+)\s*(days?|weeks?|months?|years?)\b",
    )
});

pub(crate) static ARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)\b(?:in\s+)?(?:about|around|approximately|~)?\s*(?:a|an|one)\s*(day|week|month|year)s?\b",
    )
});

pub(crate) static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:in\s+)?(?:the\s+)?(?:next|upcoming|coming|this)\s*(day|week|month|year)s?\b")
});

static BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:(\d+)\s*)?(days?|weeks?|months?|years?)\b"));

/// Which matcher produced a horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Tomorrow,
    Today,
    NextUnit,
    Numbered,
    Article,
    Keyword,
    Bare,
}

impl MatchKind {
    /// Priority order used by [`parse_duration_match`].
    pub const PRIORITY: [Self; 7] = [
        Self::Tomorrow,
        Self::Today,
        Self::NextUnit,
        Self::Numbered,
        Self::Article,
        Self::Keyword,
        Self::Bare,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tomorrow => "tomorrow",
            Self::Today => "today",
            Self::NextUnit => "next_unit",
            Self::Numbered => "numbered",
            Self::Article => "article",
            Self::Keyword => "keyword",
            Self::Bare => "bare",
        }
    }

    fn try_match(self, text: &str) -> Option<Horizon> {
        match self {
            Self::Tomorrow => TOMORROW_RE.is_match(text).then(|| Horizon::days(1)),
            Self::Today => TODAY_RE.is_match(text).then(|| Horizon::days(0)),
            Self::NextUnit => NEXT_UNIT_RE
                .captures(text)
                .and_then(|caps| unit_at(&caps, 1))
                .map(|unit| Horizon::new(1, unit)),
            Self::Numbered => NUMBERED_RE
                .captures_iter(text)
                .find_map(|caps| counted(&caps, 1, 2)),
            Self::Article => ARTICLE_RE
                .captures(text)
                .and_then(|caps| unit_at(&caps, 1))
                .map(|unit| Horizon::new(1, unit)),
            Self::Keyword => KEYWORD_RE
                .captures(text)
                .and_then(|caps| unit_at(&caps, 1))
                .map(|unit| Horizon::new(1, unit)),
            Self::Bare => BARE_RE.captures_iter(text).find_map(|caps| {
                if caps.get(1).is_some() {
                    counted(&caps, 1, 2)
                } else {
                    unit_at(&caps, 2).map(|unit| Horizon::new(1, unit))
                }
            }),
        }
    }
}

/// A recognized horizon and the matcher that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationMatch {
    pub horizon: Horizon,
    pub kind: MatchKind,
}

/// Extracts a horizon from free text, or `None` when no duration is present.
///
/// ```rust
/// use driftcast_core::{parse_duration, Horizon, TimeUnit};
///
/// assert_eq!(parse_duration("Apple in 3 days"), Some(Horizon::new(3, TimeUnit::Days)));
/// assert_eq!(parse_duration("Apple"), None);
/// ```
pub fn parse_duration(text: &str) -> Option<Horizon> {
    parse_duration_match(text).map(|found| found.horizon)
}

/// Like [`parse_duration`] but also reports which matcher fired.
pub fn parse_duration_match(text: &str) -> Option<DurationMatch> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    MatchKind::PRIORITY.into_iter().find_map(|kind| {
        kind.try_match(text)
            .map(|horizon| DurationMatch { horizon, kind })
    })
}

fn unit_at(caps: &Captures<'_>, group: usize) -> Option<TimeUnit> {
    caps.get(group)?.as_str().parse().ok()
}

/// Counts too large for `u32` disqualify the match.
fn counted(caps: &Captures<'_>, count_group: usize, unit_group: usize) -> Option<Horizon> {
    let count = caps.get(count_group)?.as_str().parse::<u32>().ok()?;
    let unit = unit_at(caps, unit_group)?;
    Some(Horizon::new(count, unit))
}
