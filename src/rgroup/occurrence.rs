//! The occurrence grammar of an R-group position.
//!
//! An occurrence is a comma-separated list of conditions on how many of a
//! position's R atoms are substituted:
//!
//! | token  | meaning                          |
//! |--------|----------------------------------|
//! | `n`    | exactly `n`                      |
//! | `n-m`  | between `n` and `m` inclusive    |
//! | `>n`   | more than `n`                    |
//! | `<n`   | fewer than `n`, `n` not zero     |
//!
//! A count is accepted when any token accepts it. Whitespace is ignored and a
//! blank occurrence means `>0`.

use std::fmt;
use std::str::FromStr;

use super::error::RGroupError;

/// Occurrence used when none is given.
pub const DEFAULT_OCCURRENCE: &str = ">0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceToken {
    Exactly(u32),
    Range(u32, u32),
    GreaterThan(u32),
    LessThan(u32),
}

impl OccurrenceToken {
    pub fn accepts(self, count: u32) -> bool {
        match self {
            OccurrenceToken::Exactly(n) => count == n,
            OccurrenceToken::Range(lo, hi) => (lo..=hi).contains(&count),
            OccurrenceToken::GreaterThan(n) => count > n,
            OccurrenceToken::LessThan(n) => count < n,
        }
    }
}

impl fmt::Display for OccurrenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccurrenceToken::Exactly(n) => write!(f, "{n}"),
            OccurrenceToken::Range(lo, hi) => write!(f, "{lo}-{hi}"),
            OccurrenceToken::GreaterThan(n) => write!(f, ">{n}"),
            OccurrenceToken::LessThan(n) => write!(f, "<{n}"),
        }
    }
}

/// A parsed occurrence.
///
/// ```
/// use crabquery::rgroup::Occurrence;
///
/// let occurrence = Occurrence::parse("1,3-4").unwrap();
/// assert_eq!(occurrence.matching_counts(5), vec![1, 3, 4]);
/// assert!(Occurrence::parse("4-2").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    tokens: Vec<OccurrenceToken>,
}

impl Occurrence {
    pub fn parse(text: &str) -> Result<Self, RGroupError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let source = if compact.is_empty() {
            DEFAULT_OCCURRENCE
        } else {
            compact.as_str()
        };
        let invalid = || RGroupError::InvalidOccurrence(text.to_string());

        let tokens = source
            .split(',')
            .map(|token| parse_token(token).ok_or_else(invalid))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens })
    }

    pub fn is_valid_syntax(text: &str) -> bool {
        Self::parse(text).is_ok()
    }

    pub fn tokens(&self) -> &[OccurrenceToken] {
        &self.tokens
    }

    pub fn accepts(&self, count: u32) -> bool {
        self.tokens.iter().any(|t| t.accepts(count))
    }

    /// Every count in `0..=max` the occurrence accepts, ascending.
    pub fn matching_counts(&self, max: u32) -> Vec<u32> {
        (0..=max).filter(|&count| self.accepts(count)).collect()
    }
}

impl Default for Occurrence {
    fn default() -> Self {
        Self {
            tokens: vec![OccurrenceToken::GreaterThan(0)],
        }
    }
}

impl FromStr for Occurrence {
    type Err = RGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

fn parse_count(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_token(token: &str) -> Option<OccurrenceToken> {
    if let Some(rest) = token.strip_prefix('>') {
        return parse_count(rest).map(OccurrenceToken::GreaterThan);
    }
    if let Some(rest) = token.strip_prefix('<') {
        return match parse_count(rest)? {
            0 => None,
            n => Some(OccurrenceToken::LessThan(n)),
        };
    }
    if let Some((lo, hi)) = token.split_once('-') {
        let (lo, hi) = (parse_count(lo)?, parse_count(hi)?);
        return (lo <= hi).then_some(OccurrenceToken::Range(lo, hi));
    }
    parse_count(token).map(OccurrenceToken::Exactly)
}
