//! # Pattern syntax trees
//! This module contains the abstract syntax tree a pattern string is parsed
//! into, produced by [crate::parser::pattern] and consumed once by
//! [Pattern::to_nfa] to build an [Nfa](crate::nfa::Nfa).
//!
//! A [Pattern] is a union of one or more [Branch]es (the alternation
//! operator `|`). Each branch is a concatenation of [Factor]s, optionally
//! anchored at either end with `^`/`$`. A factor is either a lookaround
//! assertion or a quantified [Atom]; atoms are literal characters, the
//! wildcard `.`, escape classes like `\d`, hex codepoint escapes, character
//! classes `[...]` and parenthesized groups.
//!
//! Two operations are available beyond compilation:
//! * [Pattern::reversed] produces the tree of the reversed language, which is
//!   what the match engine compiles its right-to-left automaton from, and
//! * [Display](std::fmt::Display) renders a tree back to pattern syntax such
//!   that re-parsing the rendering yields the same tree.
//!
//! ```
//! use revex::parser;
//!
//! let pattern = parser::pattern("ab|c").unwrap();
//! assert_eq!(pattern.to_string(), "ab|c");
//! assert_eq!(pattern.reversed().to_string(), "ba|c");
//!
//! // Reversal turns lookaheads into lookbehinds and swaps the anchors
//! let pattern = parser::pattern("^a(?=bc)").unwrap();
//! assert_eq!(pattern.reversed().to_string(), "(?<=cb)a$");
//! ```

use std::fmt;

mod compile;

/// A parsed pattern: the alternation of one or more branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub branches: Vec<Branch>,
}

/// One alternation branch: a concatenation of factors, optionally anchored to
/// a line start and/or a line end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub anchor_start: bool,
    pub anchor_end: bool,
    pub factors: Vec<Factor>,
}

/// A single factor of a concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Factor {
    /// An atom with an optional quantifier. `lazy` records a trailing `?`
    /// after the quantifier; it is preserved here but the engine matches
    /// greedily regardless.
    Quantified {
        atom: Atom,
        quantifier: Option<Quantifier>,
        lazy: bool,
    },
    /// A zero-width lookaround assertion: `(?=…)`, `(?!…)`, `(?<=…)`, `(?<!…)`.
    Look {
        behind: bool,
        negated: bool,
        pattern: Pattern,
    },
}

/// A quantifier attached to an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// `*`
    Kleene,
    /// `+`
    Plus,
    /// `?`
    Opt,
    /// `{n}`, `{n,}`, `{,m}` or `{n,m}`
    Repeat(RepeatKind),
}

/// The four forms of bounded repetition. `Between(n, m)` always has `n <= m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatKind {
    Exactly(u32),
    AtLeast(u32),
    AtMost(u32),
    Between(u32, u32),
}

/// A quantifiable atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// A parenthesized group; grouping only, nothing is captured.
    Group(Box<Pattern>),
    /// A literal character.
    Char(char),
    /// `.`, any character except a line feed.
    Wildcard,
    /// An escape class like `\d` or `\t`.
    Class(SpecialClass),
    /// `\xHH`, decoded to its codepoint.
    AsciiCp(char),
    /// `\uHHHH` with an optional fifth digit, decoded to its codepoint.
    UnicodeCp(char),
    /// `[…]` or `[^…]`.
    CharClass(CharClass),
}

/// The escape classes. Six of them denote sets of characters, the other six a
/// single control character each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialClass {
    /// `\d`
    Digit,
    /// `\D`
    NotDigit,
    /// `\w`
    Word,
    /// `\W`
    NotWord,
    /// `\s`
    Space,
    /// `\S`
    NotSpace,
    /// `\t`
    Tab,
    /// `\r`
    CarriageReturn,
    /// `\n`
    LineFeed,
    /// `\v`
    VerticalTab,
    /// `\f`
    FormFeed,
    /// `\0`
    Null,
}

impl SpecialClass {
    /// The letter following the backslash in pattern syntax.
    pub fn letter(self) -> char {
        match self {
            SpecialClass::Digit => 'd',
            SpecialClass::NotDigit => 'D',
            SpecialClass::Word => 'w',
            SpecialClass::NotWord => 'W',
            SpecialClass::Space => 's',
            SpecialClass::NotSpace => 'S',
            SpecialClass::Tab => 't',
            SpecialClass::CarriageReturn => 'r',
            SpecialClass::LineFeed => 'n',
            SpecialClass::VerticalTab => 'v',
            SpecialClass::FormFeed => 'f',
            SpecialClass::Null => '0',
        }
    }

    /// The single character this class denotes, if it denotes one.
    pub fn literal(self) -> Option<char> {
        match self {
            SpecialClass::Tab => Some('\t'),
            SpecialClass::CarriageReturn => Some('\r'),
            SpecialClass::LineFeed => Some('\n'),
            SpecialClass::VerticalTab => Some('\u{000B}'),
            SpecialClass::FormFeed => Some('\u{000C}'),
            SpecialClass::Null => Some('\0'),
            _ => None,
        }
    }
}

/// The body of a character class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    pub negated: bool,
    pub items: Vec<ClassItem>,
}

/// One item of a character class body. `Range(lo, hi)` always has `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassItem {
    Atom(ClassAtom),
    Range(char, char),
}

/// An atom inside a character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassAtom {
    Char(char),
    Wildcard,
    Class(SpecialClass),
    AsciiCp(char),
    UnicodeCp(char),
}

impl ClassAtom {
    /// The single codepoint this atom denotes, if any: a range endpoint must
    /// denote one.
    pub fn codepoint(self) -> Option<char> {
        match self {
            ClassAtom::Char(c) | ClassAtom::AsciiCp(c) | ClassAtom::UnicodeCp(c) => Some(c),
            ClassAtom::Class(class) => class.literal(),
            ClassAtom::Wildcard => None,
        }
    }
}

impl From<ClassAtom> for Atom {
    fn from(atom: ClassAtom) -> Self {
        match atom {
            ClassAtom::Char(c) => Atom::Char(c),
            ClassAtom::Wildcard => Atom::Wildcard,
            ClassAtom::Class(class) => Atom::Class(class),
            ClassAtom::AsciiCp(c) => Atom::AsciiCp(c),
            ClassAtom::UnicodeCp(c) => Atom::UnicodeCp(c),
        }
    }
}

impl Pattern {
    /// The tree of the reversed language: every concatenation is flipped,
    /// `^` and `$` swap places, and lookaheads become lookbehinds (and vice
    /// versa) with their inner patterns reversed recursively. Compiling the
    /// result yields an automaton recognizing exactly the reversals of this
    /// pattern's matches.
    pub fn reversed(self) -> Self {
        Pattern {
            branches: self.branches.into_iter().map(Branch::reversed).collect(),
        }
    }
}

impl Branch {
    fn reversed(self) -> Self {
        Branch {
            anchor_start: self.anchor_end,
            anchor_end: self.anchor_start,
            factors: self
                .factors
                .into_iter()
                .rev()
                .map(Factor::reversed)
                .collect(),
        }
    }
}

impl Factor {
    fn reversed(self) -> Self {
        match self {
            Factor::Quantified {
                atom,
                quantifier,
                lazy,
            } => Factor::Quantified {
                atom: atom.reversed(),
                quantifier,
                lazy,
            },
            Factor::Look {
                behind,
                negated,
                pattern,
            } => Factor::Look {
                behind: !behind,
                negated,
                pattern: pattern.reversed(),
            },
        }
    }
}

impl Atom {
    fn reversed(self) -> Self {
        match self {
            Atom::Group(pattern) => Atom::Group(Box::new(pattern.reversed())),
            other => other,
        }
    }
}

/// The characters that may not appear unescaped outside a character class.
pub(crate) const METACHARACTERS: &str = ".?*+[]{}()|\\^$";

/// Characters that must be escaped when rendered inside a character class.
const CLASS_SPECIALS: &str = "]\\-^.";

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out);
        f.write_str(&out)
    }
}

impl Pattern {
    fn render(&self, out: &mut String) {
        let mut first = true;
        for branch in &self.branches {
            if !first {
                out.push('|');
            }
            first = false;
            branch.render(out);
        }
    }
}

impl Branch {
    fn render(&self, out: &mut String) {
        if self.anchor_start {
            out.push('^');
        }
        for factor in &self.factors {
            factor.render(out);
        }
        if self.anchor_end {
            out.push('$');
        }
    }
}

impl Factor {
    fn render(&self, out: &mut String) {
        match self {
            Factor::Quantified {
                atom,
                quantifier,
                lazy,
            } => {
                atom.render(out);
                if let Some(quantifier) = quantifier {
                    quantifier.render(out);
                    if *lazy {
                        out.push('?');
                    }
                }
            }
            Factor::Look {
                behind,
                negated,
                pattern,
            } => {
                out.push_str("(?");
                if *behind {
                    out.push('<');
                }
                out.push(if *negated { '!' } else { '=' });
                pattern.render(out);
                out.push(')');
            }
        }
    }
}

impl Quantifier {
    fn render(&self, out: &mut String) {
        match self {
            Quantifier::Kleene => out.push('*'),
            Quantifier::Plus => out.push('+'),
            Quantifier::Opt => out.push('?'),
            Quantifier::Repeat(RepeatKind::Exactly(n)) => {
                out.push_str(&format!("{{{n}}}"));
            }
            Quantifier::Repeat(RepeatKind::AtLeast(n)) => {
                out.push_str(&format!("{{{n},}}"));
            }
            Quantifier::Repeat(RepeatKind::AtMost(m)) => {
                out.push_str(&format!("{{,{m}}}"));
            }
            Quantifier::Repeat(RepeatKind::Between(n, m)) => {
                out.push_str(&format!("{{{n},{m}}}"));
            }
        }
    }
}

impl Atom {
    fn render(&self, out: &mut String) {
        match self {
            Atom::Group(pattern) => {
                out.push('(');
                pattern.render(out);
                out.push(')');
            }
            Atom::Char(c) => {
                if METACHARACTERS.contains(*c) {
                    out.push('\\');
                }
                out.push(*c);
            }
            Atom::Wildcard => out.push('.'),
            Atom::Class(class) => {
                out.push('\\');
                out.push(class.letter());
            }
            Atom::AsciiCp(c) => {
                out.push_str(&format!("\\x{:02X}", *c as u32));
            }
            Atom::UnicodeCp(c) => {
                // Five digits, so a following literal hex digit cannot be
                // absorbed into the escape when the rendering is re-parsed.
                out.push_str(&format!("\\u{:05X}", *c as u32));
            }
            Atom::CharClass(class) => class.render(out),
        }
    }
}

impl CharClass {
    fn render(&self, out: &mut String) {
        out.push('[');
        if self.negated {
            out.push('^');
        }
        for item in &self.items {
            match item {
                ClassItem::Atom(atom) => atom.render(out),
                ClassItem::Range(lo, hi) => {
                    render_class_char(*lo, out);
                    out.push('-');
                    render_class_char(*hi, out);
                }
            }
        }
        out.push(']');
    }
}

impl ClassAtom {
    fn render(&self, out: &mut String) {
        match self {
            ClassAtom::Char(c) => render_class_char(*c, out),
            ClassAtom::Wildcard => out.push('.'),
            ClassAtom::Class(class) => {
                out.push('\\');
                out.push(class.letter());
            }
            ClassAtom::AsciiCp(c) => {
                out.push_str(&format!("\\x{:02X}", *c as u32));
            }
            ClassAtom::UnicodeCp(c) => {
                out.push_str(&format!("\\u{:05X}", *c as u32));
            }
        }
    }
}

fn render_class_char(c: char, out: &mut String) {
    if CLASS_SPECIALS.contains(c) {
        out.push('\\');
    }
    out.push(c);
}
