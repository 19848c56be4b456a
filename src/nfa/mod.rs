//! # Nondeterministic Finite Automaton with predicate transitions and guards
//! The NFA module contains the [Nfa] struct, the automaton that patterns compile to.
//! An automaton is built by composing small fragments with the algebraic operators
//! [union](Nfa::union), [concat](Nfa::concat), [one_or_more](Nfa::one_or_more),
//! [kleene](Nfa::kleene) and [optional](Nfa::optional), starting from the atomic
//! fragments [empty](Nfa::empty), [literal](Nfa::literal), [predicate](Nfa::predicate)
//! and [guarded](Nfa::guarded).
//!
//! Every fragment has the same shape: state [Nfa::START] is the single entry and
//! state [Nfa::ACCEPT] the single exit. An operator absorbs the states of its
//! operands into a fresh arena (renaming them by offsetting their indices) and wires
//! the new start and accept states to the absorbed copies with ε-transitions, so the
//! operands themselves are never modified.
//!
//! Three kinds of edges exist:
//! * plain transitions, labelled by a single character (or ε),
//! * predicate transitions, labelled by a [Predicate] that is asked whether it
//!   matches the character being consumed (character classes, wildcards, escape
//!   classes), and
//! * guards, which are not edges at all but entry conditions: a state carrying a
//!   [Guard] can only be entered while the guard holds for the current position
//!   (anchors and lookarounds).
//!
//! The automaton itself is immutable once built. All mutable evaluation state lives
//! in a [NfaEvaluator](eval::NfaEvaluator), created per run with [Nfa::evaluator],
//! so a compiled automaton can be shared freely between threads.
//!
//! ## Example
//! ```
//! use revex::nfa::Nfa;
//!
//! // a(b|c), built by hand
//! let nfa = Nfa::concat(vec![
//!     Nfa::literal('a'),
//!     Nfa::union(vec![Nfa::literal('b'), Nfa::literal('c')]),
//! ]);
//!
//! let input: Vec<char> = "ac".chars().collect();
//! let mut eval = nfa.evaluator(&input);
//! assert!(eval.process(0, input.len(), false));
//!
//! let input: Vec<char> = "ad".chars().collect();
//! let mut eval = nfa.evaluator(&input);
//! assert!(!eval.process(0, input.len(), false));
//! ```

pub use eval::NfaEvaluator;

pub mod eval;

/// A nondeterministic finite automaton fragment. States live in a dense arena
/// indexed by `usize`; the entry state is always [Nfa::START] and the single
/// accepting state is always [Nfa::ACCEPT].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa {
    states: Vec<NfaState>,
}

/// A state in a NFA: its ε-transitions, labelled transitions, predicate
/// transitions and entry guards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NfaState {
    pub(crate) epsilon_transitions: Vec<usize>,
    pub(crate) transitions: Vec<(char, usize)>,
    pub(crate) predicates: Vec<(Predicate, usize)>,
    pub(crate) guards: Vec<Guard>,
}

impl NfaState {
    /// Shifts every transition target by `offset`. Guards hold no state indices.
    fn offset(&mut self, offset: usize) {
        for target in &mut self.epsilon_transitions {
            *target += offset;
        }
        for (_, target) in &mut self.transitions {
            *target += offset;
        }
        for (_, target) in &mut self.predicates {
            *target += offset;
        }
    }
}

/// A pure test on a single character, used to label transitions that are not
/// plain character transitions: character classes, ranges, the wildcard and the
/// escape classes. [Predicate::Class] combines a set of member predicates and
/// optionally negates the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    Literal(char),
    Wildcard,
    Digit,
    NotDigit,
    Word,
    NotWord,
    Space,
    NotSpace,
    Range(char, char),
    Class { negated: bool, items: Vec<Predicate> },
}

impl Predicate {
    /// Checks whether this predicate matches the given character.
    pub fn matches(&self, ch: char) -> bool {
        match self {
            Predicate::Literal(c) => ch == *c,
            Predicate::Wildcard => ch != '\n',
            Predicate::Digit => ch.is_numeric(),
            Predicate::NotDigit => !ch.is_numeric(),
            Predicate::Word => ch.is_alphanumeric(),
            Predicate::NotWord => !ch.is_alphanumeric(),
            Predicate::Space => ch.is_whitespace(),
            Predicate::NotSpace => !ch.is_whitespace(),
            Predicate::Range(lo, hi) => (*lo..=*hi).contains(&ch),
            Predicate::Class { negated, items } => {
                items.iter().any(|item| item.matches(ch)) != *negated
            }
        }
    }
}

/// A zero-width entry condition on a state, evaluated against the run's current
/// position rather than against a character. Anchors test the surrounding
/// characters directly; lookarounds run a nested automaton over the text ahead
/// of (or, reversed, behind) the current position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Guard {
    /// `^`: at the start of the input or right after a line feed.
    LineStart,
    /// `$`: at the end of the input or right before a line feed.
    LineEnd,
    /// A lookaround assertion with its nested, separately compiled automaton.
    Look {
        behind: bool,
        negated: bool,
        nfa: Box<Nfa>,
    },
}

impl Nfa {
    /// The entry state of every fragment.
    pub const START: usize = 0;
    /// The single accepting state of every fragment.
    pub const ACCEPT: usize = 1;

    fn new() -> Self {
        Nfa {
            states: vec![NfaState::default(), NfaState::default()],
        }
    }

    /// The fragment accepting exactly the empty string.
    pub fn empty() -> Self {
        let mut nfa = Nfa::new();
        nfa.add_transition(Nfa::START, None, Nfa::ACCEPT);
        nfa
    }

    /// The fragment accepting exactly the one-character string `ch`.
    pub fn literal(ch: char) -> Self {
        let mut nfa = Nfa::new();
        nfa.add_transition(Nfa::START, Some(ch), Nfa::ACCEPT);
        nfa
    }

    /// The fragment accepting every one-character string matched by `predicate`.
    pub fn predicate(predicate: Predicate) -> Self {
        let mut nfa = Nfa::new();
        nfa.add_predicate(Nfa::START, predicate, Nfa::ACCEPT);
        nfa
    }

    /// A zero-width fragment that accepts the empty string, but may only be
    /// entered while `guard` holds.
    pub fn guarded(guard: Guard) -> Self {
        let mut nfa = Nfa::new();
        nfa.add_guard(Nfa::START, guard);
        nfa.add_transition(Nfa::START, None, Nfa::ACCEPT);
        nfa
    }

    /// Combines fragments into one accepting the union of their languages:
    /// the new start state gets an ε-transition to each operand's start, and
    /// each operand's accept state an ε-transition to the new accept state.
    pub fn union(parts: Vec<Nfa>) -> Self {
        let mut nfa = Nfa::new();
        for part in parts {
            let (start, accept) = nfa.absorb(part);
            nfa.add_transition(Nfa::START, None, start);
            nfa.add_transition(accept, None, Nfa::ACCEPT);
        }
        nfa
    }

    /// Combines fragments into one accepting the concatenation of their
    /// languages, chaining each operand's accept state to the next operand's
    /// start state with an ε-transition.
    pub fn concat(parts: Vec<Nfa>) -> Self {
        let mut nfa = Nfa::new();
        let mut tail = Nfa::START;
        for part in parts {
            let (start, accept) = nfa.absorb(part);
            nfa.add_transition(tail, None, start);
            tail = accept;
        }
        nfa.add_transition(tail, None, Nfa::ACCEPT);
        nfa
    }

    /// One or more repetitions: the operand is absorbed once and its accept
    /// state gets a back ε-edge to its own start state.
    pub fn one_or_more(self) -> Self {
        let mut nfa = Nfa::new();
        let (start, accept) = nfa.absorb(self);
        nfa.add_transition(Nfa::START, None, start);
        nfa.add_transition(accept, None, Nfa::ACCEPT);
        nfa.add_transition(accept, None, start);
        nfa
    }

    /// Zero or more repetitions: [one_or_more](Nfa::one_or_more) plus an
    /// ε-transition accepting the empty string.
    pub fn kleene(self) -> Self {
        let mut nfa = self.one_or_more();
        nfa.add_transition(Nfa::START, None, Nfa::ACCEPT);
        nfa
    }

    /// Zero or one repetition, as the union with the empty fragment.
    pub fn optional(self) -> Self {
        Nfa::union(vec![self, Nfa::empty()])
    }

    /// Moves the states of `other` into this arena, renaming them by offsetting
    /// their indices past the existing states. Returns the new indices of
    /// `other`'s start and accept states.
    fn absorb(&mut self, other: Nfa) -> (usize, usize) {
        let offset = self.states.len();
        for mut state in other.states {
            state.offset(offset);
            self.states.push(state);
        }
        (offset + Nfa::START, offset + Nfa::ACCEPT)
    }

    /// Adds a transition from `from` to `to` on `on`, where `None` is ε.
    pub(crate) fn add_transition(&mut self, from: usize, on: Option<char>, to: usize) {
        match on {
            None => self.states[from].epsilon_transitions.push(to),
            Some(ch) => self.states[from].transitions.push((ch, to)),
        }
    }

    /// Adds a predicate transition from `from` to `to`.
    pub(crate) fn add_predicate(&mut self, from: usize, predicate: Predicate, to: usize) {
        self.states[from].predicates.push((predicate, to));
    }

    /// Requires `guard` to hold whenever `state` is entered.
    pub(crate) fn add_guard(&mut self, state: usize, guard: Guard) {
        self.states[state].guards.push(guard);
    }

    pub(crate) fn state(&self, idx: usize) -> &NfaState {
        &self.states[idx]
    }

    /// The number of states in the arena.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Creates an evaluator over `input`, seeded with the ε-closure of the
    /// start state at position 0.
    pub fn evaluator<'a>(&'a self, input: &'a [char]) -> NfaEvaluator<'a> {
        NfaEvaluator::new(self, input)
    }
}
