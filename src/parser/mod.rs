//! # Pattern parser
//! This module parses pattern strings into [Pattern] syntax trees.
//!
//! ## Syntax
//! A pattern is UTF-8 text over the following surface:
//! * Alternation `|`, grouping `(…)`, concatenation by juxtaposition.
//! * Quantifiers `*`, `+`, `?` and the bounded forms `{n}`, `{n,}`, `{,m}`,
//!   `{n,m}` (requiring `n <= m`). A trailing `?` after any quantifier is
//!   parsed as a laziness marker and preserved in the tree, but the engine
//!   matches greedily regardless.
//! * Anchors `^` and `$` with line-boundary semantics: start of input or
//!   right after a line feed, end of input or right before a line feed.
//! * The wildcard `.`, matching any character except a line feed.
//! * Character classes `[…]`, negated with a leading `^`, with ranges `a-b`
//!   (`a <= b` by codepoint). A `-` without an atom on both sides is an
//!   error. Inside a class, `^` is only special in the first position.
//! * Escapes `\d \D \w \W \s \S \t \r \n \v \f \0`, the codepoint escapes
//!   `\xHH` (exactly two uppercase hex digits) and `\uHHHH` (four hex
//!   digits, plus an optional fifth if it is `0-9A-F`), and `\` before any
//!   metacharacter for its literal.
//! * Lookarounds `(?=…)`, `(?!…)`, `(?<=…)`, `(?<!…)`.
//!
//! The fourteen metacharacters `. ? * + [ ] { } ( ) | \ ^ $` may not appear
//! unescaped outside a character class; every other character is a literal.
//!
//! ## Errors
//! The whole input must parse; anything malformed is reported as a
//! [SyntaxError] carrying the character position of the offending input and a
//! [SyntaxErrorKind] naming what went wrong. No partial tree is ever
//! returned, and matching itself never fails.
//!
//! ```
//! use revex::parser::{self, SyntaxErrorKind};
//!
//! let pattern = parser::pattern(r"(a|bc)+\d").unwrap();
//! assert_eq!(pattern.to_string(), r"(a|bc)+\d");
//!
//! let err = parser::pattern("a{3,1}").unwrap_err();
//! assert_eq!(err.kind(), SyntaxErrorKind::InvalidBounds);
//! assert_eq!(err.position(), 1);
//!
//! let err = parser::pattern("[z-a]").unwrap_err();
//! assert_eq!(err.kind(), SyntaxErrorKind::InvalidRange);
//! ```

mod pattern;

use crate::pattern::Pattern;
use nom::combinator::all_consuming;
use nom::Finish;
use thiserror::Error;

/// A compile-time pattern error: what went wrong and the character position
/// it went wrong at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct SyntaxError {
    position: usize,
    kind: SyntaxErrorKind,
}

impl SyntaxError {
    /// The character (codepoint) position in the pattern the error refers to.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> SyntaxErrorKind {
        self.kind
    }
}

/// The kinds of pattern syntax errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("unexpected character")]
    UnexpectedChar,
    #[error("unexpected end of pattern")]
    UnexpectedEnd,
    #[error("unterminated group")]
    UnterminatedGroup,
    #[error("unterminated character class")]
    UnterminatedClass,
    #[error("unterminated repetition bounds")]
    UnterminatedBounds,
    #[error("unrecognised escape")]
    InvalidEscape,
    #[error("invalid hex escape")]
    InvalidHex,
    #[error("invalid codepoint")]
    InvalidCodepoint,
    #[error("empty character class")]
    EmptyClass,
    #[error("'-' without range endpoints")]
    BareDash,
    #[error("invalid range in character class")]
    InvalidRange,
    #[error("invalid repetition bounds")]
    InvalidBounds,
    #[error("empty alternation branch")]
    EmptyBranch,
    #[error("invalid lookaround")]
    InvalidLookaround,
}

/// Parses a pattern according to the syntax above. The whole string must be
/// parsable, otherwise this function errors. Every tree returned by this
/// function upholds the structural invariants the compiler relies on: at
/// least one branch per alternation, at least one factor per branch, ordered
/// repetition bounds and ordered class ranges.
pub fn pattern(input: &str) -> Result<Pattern, SyntaxError> {
    all_consuming(pattern::full_pattern)(input)
        .finish()
        .map(|(_, pattern)| pattern)
        .map_err(|e| e.into_syntax_error(input))
}
