//!# revex
//!
//! `revex` is a regular expression engine built on plain NFA set simulation. A
//! pattern is parsed into a syntax tree and compiled twice: forward, into an
//! automaton recognizing the pattern's language, and backwards, into an
//! automaton recognizing the reversals of its matches. Scanning a text with
//! both automata yields every position where a match can end and every
//! position where one can start, and each candidate interval is confirmed by
//! replay. A scan therefore reports *all* matching substrings, not just the
//! leftmost-longest ones.
//!
//! ## Usage
//!
//! ```rust
//! use revex::regex::Regex;
//!
//! let re = Regex::new(r"\d{2,3}").unwrap();
//! assert_eq!(re.scan("1234"), vec![(0, 2), (0, 3), (1, 3), (1, 4), (2, 4)]);
//!
//! let re = Regex::new("^abc$").unwrap();
//! assert_eq!(re.scan("abc"), vec![(0, 3)]);
//! assert!(re.scan("xabc").is_empty());
//!
//! // Lookarounds are zero-width assertions backed by nested automata
//! let re = Regex::new("(?<=x)y").unwrap();
//! assert_eq!(re.scan("xy zy"), vec![(1, 2)]);
//! ```
//!
//! ## Pattern surface
//!
//! * Alternation `|`, grouping `(…)`, concatenation by juxtaposition
//! * Quantifiers `*`, `+`, `?`, `{n}`, `{n,}`, `{,m}`, `{n,m}`; the lazy
//!   markers `*?`, `+?`, `??` are parsed but matching is always greedy
//! * Anchors `^` and `$` with line-boundary semantics
//! * `.` matching any character except a line feed
//! * Character classes `[…]`, negation `[^…]`, ranges `a-b`
//! * Escapes `\d \D \w \W \s \S \t \r \n \v \f \0`, `\xHH`, `\uHHHH[H]`,
//!   and `\` before any metacharacter
//! * Lookarounds `(?=…)`, `(?!…)`, `(?<=…)`, `(?<!…)`
//!
//! Positions are character (codepoint) indices and intervals are half-open.
//! There are no capture groups, backreferences or substitution APIs.
//!
//! ## Structure
//!
//! The crate is a pipeline of four stages, each a leaf dependency of the
//! next:
//!
//! * [Parsing patterns](parser::pattern) into [syntax trees](pattern::Pattern)
//! * [Compiling trees](pattern::Pattern::to_nfa) into [automata](nfa::Nfa) by
//!   fragment composition
//! * [Evaluating automata](nfa::NfaEvaluator) with guard-filtered ε-closure
//!   set simulation
//! * [Reconciling forward and reverse scans](regex::Regex::scan) into
//!   confirmed match intervals

pub mod nfa;
pub mod parser;
pub mod pattern;
pub mod regex;

#[cfg(test)]
mod tests;
