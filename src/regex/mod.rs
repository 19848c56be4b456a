//! # The match engine
//! A [Regex] owns two automata compiled from the same pattern: a *forward*
//! NFA recognizing the pattern's language, and a *reverse* NFA compiled from
//! the [reversed](crate::pattern::Pattern::reversed) tree, recognizing the
//! reversals of the pattern's matches.
//!
//! Scanning the input with the forward automaton yields every position where
//! some match *ends*; scanning the reversed input with the reverse automaton
//! (and flipping the bitmap back) yields every position where some match
//! *starts*. Those two conditions are each necessary but not jointly
//! sufficient for a specific pair, so every candidate `(start, end)` pair is
//! confirmed by replaying the forward automaton over exactly that substring
//! before it is reported. The two scans cut the candidate pairs down from all
//! `O(n²)` intervals to the product of the populated start and end positions.
//!
//! ```
//! use revex::regex::Regex;
//!
//! let re = Regex::new("a|bc").unwrap();
//! assert_eq!(re.scan("abc"), vec![(0, 1), (1, 3)]);
//!
//! let re = Regex::new(r"a(?=b)").unwrap();
//! assert_eq!(re.scan("ab ac"), vec![(0, 1)]);
//! assert!(!re.is_match("ac"));
//! ```

use crate::nfa::Nfa;
use crate::parser::{self, SyntaxError};

/// A compiled pattern: the forward and reverse automata. Compilation happens
/// once in [Regex::new]; the compiled pair is immutable, so a `Regex` can be
/// shared between threads and every scan runs on its own evaluator state.
#[derive(Clone, Debug)]
pub struct Regex {
    forward: Nfa,
    reverse: Nfa,
}

impl Regex {
    /// Compiles `pattern` into a forward and a reverse automaton. All pattern
    /// errors surface here; matching itself never fails.
    pub fn new(pattern: &str) -> Result<Self, SyntaxError> {
        let tree = parser::pattern(pattern)?;
        let reverse = tree.clone().reversed().to_nfa();
        let forward = tree.to_nfa();
        Ok(Regex { forward, reverse })
    }

    /// Scans `input` and returns every matching substring as a half-open
    /// `(start, end)` interval of character positions, ordered by start and
    /// then by end position. All confirmed intervals are reported, not just
    /// the longest or leftmost ones; greediness would be a selection over
    /// this set.
    pub fn scan(&self, input: &str) -> Vec<(usize, usize)> {
        let chars: Vec<char> = input.chars().collect();
        if chars.is_empty() {
            let matches_empty = self.forward.evaluator(&chars).accepts()
                && self.reverse.evaluator(&chars).accepts();
            return if matches_empty { vec![(0, 0)] } else { Vec::new() };
        }

        let ends = self.forward.evaluator(&chars).scan();
        let reversed: Vec<char> = chars.iter().rev().copied().collect();
        let starts = {
            let mut bits = self.reverse.evaluator(&reversed).scan();
            bits.reverse();
            bits
        };

        let mut matches = Vec::new();
        let mut replay = self.forward.evaluator(&chars);
        for start in 0..chars.len() {
            if !starts[start] {
                continue;
            }
            for end in start..chars.len() {
                if !ends[end] {
                    continue;
                }
                if replay.process(start, end + 1, false) {
                    matches.push((start, end + 1));
                }
            }
        }
        matches
    }

    /// Checks whether `input` contains at least one match.
    pub fn is_match(&self, input: &str) -> bool {
        let chars: Vec<char> = input.chars().collect();
        if chars.is_empty() {
            return self.forward.evaluator(&chars).accepts()
                && self.reverse.evaluator(&chars).accepts();
        }
        self.forward.evaluator(&chars).scan().into_iter().any(|b| b)
    }

    /// The automaton recognizing the pattern's language.
    pub fn forward_nfa(&self) -> &Nfa {
        &self.forward
    }

    /// The automaton recognizing the reversals of the pattern's matches.
    pub fn reverse_nfa(&self) -> &Nfa {
        &self.reverse
    }
}
