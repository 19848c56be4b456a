//! Lowering of a [Pattern] tree into an [Nfa]. Every node becomes a small
//! fragment accepting exactly the language of its subexpression, and the
//! fragments are combined with the algebraic operators of [crate::nfa].

use crate::nfa::{Guard, Nfa, Predicate};
use crate::pattern::{
    Atom, Branch, CharClass, ClassAtom, ClassItem, Factor, Pattern, Quantifier, RepeatKind,
    SpecialClass,
};

impl Pattern {
    /// Compiles this pattern to an NFA: the union of its branches.
    pub fn to_nfa(&self) -> Nfa {
        Nfa::union(self.branches.iter().map(Branch::to_nfa).collect())
    }
}

impl Branch {
    fn to_nfa(&self) -> Nfa {
        let mut parts = Vec::with_capacity(self.factors.len() + 2);
        if self.anchor_start {
            parts.push(Nfa::guarded(Guard::LineStart));
        }
        parts.extend(self.factors.iter().map(Factor::to_nfa));
        if self.anchor_end {
            parts.push(Nfa::guarded(Guard::LineEnd));
        }
        Nfa::concat(parts)
    }
}

impl Factor {
    fn to_nfa(&self) -> Nfa {
        match self {
            // Laziness markers are parsed but matching is always greedy
            Factor::Quantified {
                atom, quantifier, ..
            } => {
                let base = atom.to_nfa();
                match quantifier {
                    None => base,
                    Some(Quantifier::Kleene) => base.kleene(),
                    Some(Quantifier::Plus) => base.one_or_more(),
                    Some(Quantifier::Opt) => base.optional(),
                    Some(Quantifier::Repeat(kind)) => repeat(base, *kind),
                }
            }
            // A lookbehind's nested automaton is compiled from the reversed
            // subtree and runs over the reversed prefix at evaluation time
            Factor::Look {
                behind,
                negated,
                pattern,
            } => {
                let nested = if *behind {
                    pattern.clone().reversed().to_nfa()
                } else {
                    pattern.to_nfa()
                };
                Nfa::guarded(Guard::Look {
                    behind: *behind,
                    negated: *negated,
                    nfa: Box::new(nested),
                })
            }
        }
    }
}

/// Expands a bounded repetition into concatenations and unions of copies of
/// the operand fragment. `{n,m}` becomes the union over all admissible run
/// lengths, with an ε branch when the lower bound is zero.
fn repeat(base: Nfa, kind: RepeatKind) -> Nfa {
    match kind {
        RepeatKind::Exactly(0) => Nfa::empty(),
        RepeatKind::Exactly(n) => Nfa::concat(vec![base; n as usize]),
        RepeatKind::AtLeast(0) => base.kleene(),
        RepeatKind::AtLeast(n) => {
            let mut parts = vec![base.clone(); n as usize - 1];
            parts.push(base.one_or_more());
            Nfa::concat(parts)
        }
        RepeatKind::AtMost(m) => repeat(base, RepeatKind::Between(0, m)),
        RepeatKind::Between(_, 0) => Nfa::empty(),
        RepeatKind::Between(n, m) => {
            let branches = (n..=m)
                .map(|count| {
                    if count == 0 {
                        Nfa::empty()
                    } else {
                        Nfa::concat(vec![base.clone(); count as usize])
                    }
                })
                .collect();
            Nfa::union(branches)
        }
    }
}

impl Atom {
    fn to_nfa(&self) -> Nfa {
        match self {
            Atom::Group(pattern) => pattern.to_nfa(),
            Atom::Char(c) | Atom::AsciiCp(c) | Atom::UnicodeCp(c) => Nfa::literal(*c),
            Atom::Wildcard => Nfa::predicate(Predicate::Wildcard),
            Atom::Class(class) => match class.literal() {
                Some(c) => Nfa::literal(c),
                None => Nfa::predicate(class.predicate()),
            },
            Atom::CharClass(class) => Nfa::predicate(class.predicate()),
        }
    }
}

impl SpecialClass {
    fn predicate(self) -> Predicate {
        match self {
            SpecialClass::Digit => Predicate::Digit,
            SpecialClass::NotDigit => Predicate::NotDigit,
            SpecialClass::Word => Predicate::Word,
            SpecialClass::NotWord => Predicate::NotWord,
            SpecialClass::Space => Predicate::Space,
            SpecialClass::NotSpace => Predicate::NotSpace,
            other => Predicate::Literal(other.literal().expect("single-character escape class")),
        }
    }
}

impl CharClass {
    fn predicate(&self) -> Predicate {
        Predicate::Class {
            negated: self.negated,
            items: self.items.iter().map(ClassItem::predicate).collect(),
        }
    }
}

impl ClassItem {
    fn predicate(&self) -> Predicate {
        match self {
            ClassItem::Range(lo, hi) => Predicate::Range(*lo, *hi),
            ClassItem::Atom(ClassAtom::Char(c))
            | ClassItem::Atom(ClassAtom::AsciiCp(c))
            | ClassItem::Atom(ClassAtom::UnicodeCp(c)) => Predicate::Literal(*c),
            ClassItem::Atom(ClassAtom::Wildcard) => Predicate::Wildcard,
            ClassItem::Atom(ClassAtom::Class(class)) => class.predicate(),
        }
    }
}
