//! Motif templates and the position-by-position matcher.
//!
//! A [`MotifPattern`] is a list of symbols, each a fixed base or a wildcard for any one of
//! `A`, `C`, `G`, `T`. Between two consecutive symbols the aligned sequence may carry any number
//! of gap markers, so a motif is found no matter how the alignment split it up. Matching is
//! case-insensitive, and ambiguous bases such as `N` in the sequence never match.
use std::fmt::{self, Display};
use std::str::FromStr;

use cpgscan_core::models::GAP;

use crate::errors::{MotifError, MotifResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Base(u8),
    Any,
}

impl Symbol {
    pub fn matches(&self, base: u8) -> bool {
        let base = base.to_ascii_uppercase();
        match self {
            Symbol::Base(expected) => base == *expected,
            Symbol::Any => matches!(base, b'A' | b'C' | b'G' | b'T'),
        }
    }

    fn as_char(&self) -> char {
        match self {
            Symbol::Base(b) => *b as char,
            Symbol::Any => 'N',
        }
    }
}

impl TryFrom<char> for Symbol {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase() {
            c @ ('A' | 'C' | 'G' | 'T') => Ok(Symbol::Base(c as u8)),
            'N' => Ok(Symbol::Any),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MotifPattern {
    symbols: Vec<Symbol>,
}

impl MotifPattern {
    pub fn new(symbols: Vec<Symbol>) -> MotifResult<Self> {
        if symbols.is_empty() {
            return Err(MotifError::InvalidPattern {
                pattern: String::new(),
                reason: "a motif needs at least one symbol".to_string(),
            });
        }
        Ok(MotifPattern { symbols })
    }

    ///
    /// The CpG site baseline: `C` followed by `G`.
    ///
    pub fn cpg() -> Self {
        MotifPattern {
            symbols: vec![Symbol::Base(b'C'), Symbol::Base(b'G')],
        }
    }

    ///
    /// The ZAP-binding motif `C n{m} G n C G` for a spacer of length `m`.
    ///
    pub fn zap(m: usize) -> Self {
        let mut symbols = Vec::with_capacity(m + 5);
        symbols.push(Symbol::Base(b'C'));
        symbols.extend(std::iter::repeat_n(Symbol::Any, m));
        symbols.push(Symbol::Base(b'G'));
        symbols.push(Symbol::Any);
        symbols.push(Symbol::Base(b'C'));
        symbols.push(Symbol::Base(b'G'));
        MotifPattern { symbols }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of symbols, not counting any gaps a match may span.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    ///
    /// Check whether the motif occurs in `sequence` starting exactly at `start`.
    ///
    /// Runs of gaps are skipped between symbols, never before the first one.
    ///
    pub fn matches_at(&self, sequence: &[u8], start: usize) -> bool {
        let mut pos = start;
        for (i, symbol) in self.symbols.iter().enumerate() {
            if i > 0 {
                while sequence.get(pos) == Some(&GAP) {
                    pos += 1;
                }
            }
            match sequence.get(pos) {
                Some(&base) if symbol.matches(base) => pos += 1,
                _ => return false,
            }
        }
        true
    }
}

///
/// Build the ZAP-binding motif family member with a spacer of `m` wildcards.
///
/// The intended range of `m` is 4-8 but it is not enforced.
///
pub fn build_motif_pattern(m: usize) -> MotifPattern {
    MotifPattern::zap(m)
}

///
/// Locate every start offset at which `pattern` matches `sequence`.
///
/// The scan moves one position at a time, so overlapping occurrences are all reported.
/// Returned offsets are strictly increasing.
///
pub fn locate(pattern: &MotifPattern, sequence: &[u8]) -> Vec<usize> {
    let Some(first) = pattern.symbols.first() else {
        return vec![];
    };

    (0..sequence.len())
        .filter(|&i| first.matches(sequence[i]) && pattern.matches_at(sequence, i))
        .collect()
}

impl FromStr for MotifPattern {
    type Err = MotifError;

    ///
    /// Parse a motif written as `[ACGTN]` symbols, each optionally followed by `{k}` to repeat
    /// it `k` times, e.g. `CN{4}GNCG`.
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| MotifError::InvalidPattern {
            pattern: s.to_string(),
            reason,
        };

        let mut symbols: Vec<Symbol> = Vec::new();
        let mut chars = s.trim().chars().peekable();

        while let Some(c) = chars.next() {
            let symbol =
                Symbol::try_from(c).map_err(|c| invalid(format!("unknown symbol `{c}`")))?;

            let mut repeat = 1;
            if chars.peek() == Some(&'{') {
                chars.next();
                let mut digits = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    digits.push(c);
                }
                if !closed {
                    return Err(invalid(format!("unclosed repeat count `{{{digits}`")));
                }
                repeat = digits
                    .parse::<usize>()
                    .map_err(|_| invalid(format!("bad repeat count `{{{digits}`")))?;
                if repeat == 0 {
                    return Err(invalid("repeat count must be at least 1".to_string()));
                }
            }

            symbols.extend(std::iter::repeat_n(symbol, repeat));
        }

        if symbols.is_empty() {
            return Err(invalid("a motif needs at least one symbol".to_string()));
        }

        Ok(MotifPattern { symbols })
    }
}

impl Display for MotifPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut i = 0;
        while i < self.symbols.len() {
            let symbol = self.symbols[i];
            let run = self.symbols[i..]
                .iter()
                .take_while(|s| **s == symbol)
                .count();

            if symbol == Symbol::Any && run > 1 {
                write!(f, "N{{{run}}}")?;
                i += run;
            } else {
                write!(f, "{}", symbol.as_char())?;
                i += 1;
            }
        }
        Ok(())
    }
}
