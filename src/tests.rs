use crate::nfa::Nfa;
use crate::parser::{self, SyntaxErrorKind};
use crate::pattern::{
    Atom, Branch, CharClass, ClassAtom, ClassItem, Factor, Pattern, Quantifier, RepeatKind,
    SpecialClass,
};
use crate::regex::Regex;
use ::regex::Regex as LibRegex;
use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng as _;
use std::collections::HashSet;

fn intervals(pattern: &str, input: &str) -> Vec<(usize, usize)> {
    Regex::new(pattern).unwrap().scan(input)
}

fn error_kind(pattern: &str) -> SyntaxErrorKind {
    parser::pattern(pattern).unwrap_err().kind()
}

#[test]
fn alternation_reports_both_branches() {
    assert_eq!(intervals("a|bc", "abc"), vec![(0, 1), (1, 3)]);
}

#[test]
fn class_repetition_reports_every_confirmed_interval() {
    let expected = vec![
        (1, 2),
        (1, 3),
        (1, 4),
        (1, 5),
        (2, 3),
        (2, 4),
        (2, 5),
        (3, 4),
        (3, 5),
        (4, 5),
    ];
    assert_eq!(intervals("[a-c]+", "xaabcz"), expected);
}

#[test]
fn bounded_repetition_respects_both_bounds() {
    assert_eq!(intervals(r"\d{2,3}", "1"), vec![]);
    assert_eq!(intervals(r"\d{2,3}", "12"), vec![(0, 2)]);
    assert_eq!(
        intervals(r"\d{2,3}", "1234"),
        vec![(0, 2), (0, 3), (1, 3), (1, 4), (2, 4)]
    );
}

#[test]
fn anchors_pin_the_match_to_the_line() {
    assert_eq!(intervals("^abc$", "abc"), vec![(0, 3)]);
    assert_eq!(intervals("^abc$", "xabc"), vec![]);
    assert_eq!(intervals("^abc$", "abc\nabc"), vec![(0, 3), (4, 7)]);
    assert_eq!(intervals("^b", "a\nb"), vec![(2, 3)]);
    assert_eq!(intervals("a$", "a\nb"), vec![(0, 1)]);
}

#[test]
fn lookahead_is_zero_width() {
    assert_eq!(intervals("a(?=b)", "abc"), vec![(0, 1)]);
    assert_eq!(intervals("a(?=b)", "acc"), vec![]);
}

#[test]
fn lookbehind_is_zero_width() {
    assert_eq!(intervals("(?<=x)y", "xy"), vec![(1, 2)]);
    assert_eq!(intervals("(?<=x)y", "zy"), vec![]);
}

#[test]
fn unicode_escape_matches_its_codepoint() {
    assert_eq!(
        intervals("\\u0041+", "AAA"),
        vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
    );
    // The optional fifth hex digit is consumed when present
    assert_eq!(intervals("\\u00411", "A1"), vec![]);
    assert_eq!(intervals("\\u00411", "\u{411}"), vec![(0, 1)]);
}

#[test]
fn negative_lookarounds_invert_the_nested_automaton() {
    assert_eq!(intervals("a(?!b)", "ab"), vec![]);
    assert_eq!(intervals("a(?!b)", "ac"), vec![(0, 1)]);
    assert_eq!(intervals("(?<!x)y", "xy"), vec![]);
    assert_eq!(intervals("(?<!x)y", "zy"), vec![(1, 2)]);
    // At position 0 there is nothing behind, so the negative assertion holds
    assert_eq!(intervals("(?<!x)y", "y"), vec![(0, 1)]);
}

#[test]
fn multi_character_lookarounds_use_the_reversed_subtree() {
    assert_eq!(intervals("(?<=ab)c", "abc"), vec![(2, 3)]);
    assert_eq!(intervals("(?<=ab)c", "bac"), vec![]);
    assert_eq!(intervals("a(?=bc)", "abcd"), vec![(0, 1)]);
    assert_eq!(intervals("a(?=bc)", "abd"), vec![]);
}

#[test]
fn empty_input_matches_only_nullable_patterns() {
    assert_eq!(intervals("a*", ""), vec![(0, 0)]);
    assert_eq!(intervals("a?", ""), vec![(0, 0)]);
    assert_eq!(intervals("a", ""), vec![]);
}

#[test]
fn wildcard_stops_at_line_feeds() {
    assert_eq!(intervals(".", "a\nb"), vec![(0, 1), (2, 3)]);
}

#[test]
fn grouped_repetition() {
    assert_eq!(intervals("(ab)+", "abab"), vec![(0, 2), (0, 4), (2, 4)]);
}

#[test]
fn escapes_denote_literals() {
    assert_eq!(intervals(r"\x41", "A"), vec![(0, 1)]);
    assert_eq!(intervals("\\t", "a\tb"), vec![(1, 2)]);
    assert_eq!(intervals(r"\.", "a.b"), vec![(1, 2)]);
    assert_eq!(intervals(r"\\", r"a\b"), vec![(1, 2)]);
}

#[test]
fn character_classes() {
    assert_eq!(intervals("[^a-c]", "ad"), vec![(1, 2)]);
    assert_eq!(intervals("[a-c]", "ad"), vec![(0, 1)]);
    // A wildcard inside a class behaves like the wildcard atom
    assert_eq!(intervals("[.]", "x"), vec![(0, 1)]);
    assert_eq!(intervals("[.]", "\n"), vec![]);
    // '^' is only special in the first position
    assert_eq!(intervals("[a^]", "^"), vec![(0, 1)]);
}

#[test]
fn repetition_bound_forms() {
    assert_eq!(intervals("a{2}", "aaa"), vec![(0, 2), (1, 3)]);
    assert_eq!(intervals("a{,2}", "aaa"), vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
    assert_eq!(intervals("ba{0}", "ba"), vec![(0, 1)]);
    assert_eq!(
        intervals("a{1,}", "aaa"),
        vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
    );
}

#[test]
fn lazy_markers_are_parsed_but_matching_stays_greedy() {
    assert_eq!(intervals("a+?", "aaa"), intervals("a+", "aaa"));
    assert_eq!(intervals("a*?b", "ab"), intervals("a*b", "ab"));
    let tree = parser::pattern("a+?").unwrap();
    assert!(matches!(
        tree.branches[0].factors[0],
        Factor::Quantified { lazy: true, .. }
    ));
}

#[test]
fn optional_accepts_the_empty_string_and_the_operand() {
    assert_eq!(intervals("colou?r", "color colour"), vec![(0, 5), (6, 12)]);
}

#[test]
fn concat_grouping_is_immaterial() {
    for input in ["abc", "xabcx", "ababc", ""] {
        assert_eq!(intervals("(ab)c", input), intervals("a(bc)", input));
    }
}

#[test]
fn union_order_is_immaterial() {
    for input in ["abcd", "cdab", "xx", "abab"] {
        assert_eq!(intervals("ab|cd", input), intervals("cd|ab", input));
    }
}

#[test]
fn replay_is_deterministic() {
    let re = Regex::new("[ab]+").unwrap();
    let chars: Vec<char> = "abba".chars().collect();
    let mut eval = re.forward_nfa().evaluator(&chars);
    let first = eval.process(1, 3, false);
    let second = eval.process(1, 3, false);
    assert!(first);
    assert_eq!(first, second);
}

#[test]
fn evaluator_starts_with_a_nonempty_closure() {
    let re = Regex::new("a|b*").unwrap();
    let eval = re.forward_nfa().evaluator(&[]);
    assert!(!eval.current_states().is_empty());
}

#[test]
fn hand_built_fragments_evaluate() {
    // a(b|c)* by hand
    let nfa = Nfa::concat(vec![
        Nfa::literal('a'),
        Nfa::union(vec![Nfa::literal('b'), Nfa::literal('c')]).kleene(),
    ]);
    for (input, expected) in [("a", true), ("abcb", true), ("bc", false), ("", false)] {
        let chars: Vec<char> = input.chars().collect();
        let mut eval = nfa.evaluator(&chars);
        assert_eq!(eval.process(0, chars.len(), false), expected, "{input:?}");
    }
}

#[test]
fn fragment_composition_renames_apart() {
    let a = Nfa::literal('a');
    assert_eq!(a.state_count(), 2);
    let concat = Nfa::concat(vec![Nfa::literal('a'), Nfa::literal('b')]);
    // fresh start/accept plus two absorbed two-state fragments
    assert_eq!(concat.state_count(), 6);
    let union = Nfa::union(vec![Nfa::literal('a'), Nfa::literal('b')]);
    assert_eq!(union.state_count(), 6);
}

#[test]
fn reversal_flips_concatenation_and_lookarounds() {
    assert_eq!(
        parser::pattern("ab").unwrap().reversed(),
        parser::pattern("ba").unwrap()
    );
    assert_eq!(
        parser::pattern("^a(?=bc)").unwrap().reversed(),
        parser::pattern("(?<=cb)a$").unwrap()
    );
    assert_eq!(
        parser::pattern("a|bc").unwrap().reversed(),
        parser::pattern("a|cb").unwrap()
    );
}

#[test]
fn syntax_error_positions_point_at_the_offender() {
    let err = parser::pattern("a{3,1}").unwrap_err();
    assert_eq!(err.kind(), SyntaxErrorKind::InvalidBounds);
    assert_eq!(err.position(), 1);

    let err = parser::pattern("ab|").unwrap_err();
    assert_eq!(err.kind(), SyntaxErrorKind::EmptyBranch);
    assert_eq!(err.position(), 3);

    let err = parser::pattern(r"ab\q").unwrap_err();
    assert_eq!(err.kind(), SyntaxErrorKind::InvalidEscape);
    assert_eq!(err.position(), 3);

    assert_eq!(
        parser::pattern("a{3,1}").unwrap_err().to_string(),
        "invalid repetition bounds at position 1"
    );
}

#[test]
fn malformed_patterns_are_rejected() {
    assert_eq!(error_kind(""), SyntaxErrorKind::UnexpectedEnd);
    assert_eq!(error_kind("*a"), SyntaxErrorKind::UnexpectedChar);
    assert_eq!(error_kind("a)b"), SyntaxErrorKind::UnexpectedChar);
    assert_eq!(error_kind("a|"), SyntaxErrorKind::EmptyBranch);
    assert_eq!(error_kind("|a"), SyntaxErrorKind::EmptyBranch);
    assert_eq!(error_kind("a||b"), SyntaxErrorKind::EmptyBranch);
    assert_eq!(error_kind("()"), SyntaxErrorKind::EmptyBranch);
    assert_eq!(error_kind("(a"), SyntaxErrorKind::UnterminatedGroup);
    assert_eq!(error_kind("(?=a"), SyntaxErrorKind::UnterminatedGroup);
    assert_eq!(error_kind("(?*)"), SyntaxErrorKind::InvalidLookaround);
    assert_eq!(error_kind("[ab"), SyntaxErrorKind::UnterminatedClass);
    assert_eq!(error_kind("[a-"), SyntaxErrorKind::UnterminatedClass);
    assert_eq!(error_kind("[]"), SyntaxErrorKind::EmptyClass);
    assert_eq!(error_kind("[^]"), SyntaxErrorKind::EmptyClass);
    assert_eq!(error_kind("[a-]"), SyntaxErrorKind::BareDash);
    assert_eq!(error_kind("[-a]"), SyntaxErrorKind::BareDash);
    assert_eq!(error_kind("[a--b]"), SyntaxErrorKind::BareDash);
    assert_eq!(error_kind("[b-a]"), SyntaxErrorKind::InvalidRange);
    assert_eq!(error_kind(r"[\d-z]"), SyntaxErrorKind::InvalidRange);
    assert_eq!(error_kind(r"\q"), SyntaxErrorKind::InvalidEscape);
    assert_eq!(error_kind(r"\xfA"), SyntaxErrorKind::InvalidHex);
    assert_eq!(error_kind(r"\x4"), SyntaxErrorKind::InvalidHex);
    assert_eq!(error_kind(r"\u123"), SyntaxErrorKind::InvalidHex);
    assert_eq!(error_kind(r"\uD800"), SyntaxErrorKind::InvalidCodepoint);
    assert_eq!(error_kind("a{}"), SyntaxErrorKind::InvalidBounds);
    assert_eq!(error_kind("a{,}"), SyntaxErrorKind::InvalidBounds);
    assert_eq!(error_kind("a{x}"), SyntaxErrorKind::InvalidBounds);
    assert_eq!(error_kind("a{3,1}"), SyntaxErrorKind::InvalidBounds);
    assert_eq!(error_kind("a{2"), SyntaxErrorKind::UnterminatedBounds);
    assert_eq!(error_kind("\\"), SyntaxErrorKind::UnexpectedEnd);
}

#[test]
fn is_match_agrees_with_scan_on_random_haystacks() {
    let mut rng = thread_rng();
    let re = Regex::new("[ab]+c|d").unwrap();
    let alphabet = ['a', 'b', 'c', 'd', 'e'];
    for _ in 0..200 {
        let len = rng.gen_range(0..12);
        let haystack: String = (0..len)
            .map(|_| *alphabet.choose(&mut rng).unwrap())
            .collect();
        assert_eq!(
            re.is_match(&haystack),
            !re.scan(&haystack).is_empty(),
            "haystack: {haystack:?}"
        );
    }
}

proptest! {
    /// For patterns both engines support, the set of confirmed intervals must
    /// equal the set of substrings the anchored oracle accepts.
    #[test]
    fn scan_agrees_with_oracle(pattern in oracle_pattern(), input in "[a-d0-3]{0,10}") {
        let re = Regex::new(&pattern).unwrap();
        let oracle = LibRegex::new(&format!("^(?:{pattern})$")).unwrap();
        let found: HashSet<(usize, usize)> = re.scan(&input).into_iter().collect();
        let mut expected: HashSet<(usize, usize)> = HashSet::new();
        if input.is_empty() {
            if oracle.is_match("") {
                expected.insert((0, 0));
            }
        } else {
            for i in 0..input.len() {
                for j in (i + 1)..=input.len() {
                    if oracle.is_match(&input[i..j]) {
                        expected.insert((i, j));
                    }
                }
            }
        }
        prop_assert_eq!(found, expected);
    }

    /// The reverse automaton's scan of the reversed input, flipped back, marks
    /// exactly the positions where confirmed matches start.
    #[test]
    fn reverse_scan_finds_exactly_the_match_starts(
        pattern in oracle_pattern(),
        input in "[a-d0-3]{1,10}"
    ) {
        let re = Regex::new(&pattern).unwrap();
        let match_starts: HashSet<usize> =
            re.scan(&input).into_iter().map(|(start, _)| start).collect();
        let chars: Vec<char> = input.chars().collect();
        let reversed: Vec<char> = chars.iter().rev().copied().collect();
        let mut bits = re.reverse_nfa().evaluator(&reversed).scan();
        bits.reverse();
        let scanned: HashSet<usize> = bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect();
        prop_assert_eq!(scanned, match_starts);
    }

    /// The scan bitmap has exactly one entry per input character.
    #[test]
    fn scan_is_length_preserving(pattern in oracle_pattern(), input in "[a-d0-3]{0,10}") {
        let re = Regex::new(&pattern).unwrap();
        let chars: Vec<char> = input.chars().collect();
        let bits = re.forward_nfa().evaluator(&chars).scan();
        prop_assert_eq!(bits.len(), chars.len());
    }

    /// Rendering a tree and re-parsing the rendering yields the same tree.
    #[test]
    fn rendering_reparses_to_the_same_tree(tree in pattern_tree()) {
        let rendered = tree.to_string();
        let reparsed = parser::pattern(&rendered);
        prop_assert_eq!(reparsed, Ok(tree), "rendered: {:?}", rendered);
    }

    /// Everything the operand matches, the optional operand matches too.
    #[test]
    fn optional_matches_a_superset(pattern in oracle_pattern(), input in "[a-d0-3]{0,10}") {
        let plain: HashSet<(usize, usize)> =
            Regex::new(&pattern).unwrap().scan(&input).into_iter().collect();
        let optional: HashSet<(usize, usize)> = Regex::new(&format!("({pattern})?"))
            .unwrap()
            .scan(&input)
            .into_iter()
            .collect();
        prop_assert!(plain.is_subset(&optional));
    }
}

fn oracle_pattern() -> impl Strategy<Value = String> {
    let atom = prop_oneof![
        5 => prop::char::range('a', 'd').prop_map(|c| c.to_string()),
        1 => Just("[a-c]".to_string()),
        1 => Just("[^ab]".to_string()),
        1 => Just(r"\d".to_string()),
        1 => Just(".".to_string()),
    ];
    atom.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            3 => prop::collection::vec(inner.clone(), 1..4).prop_map(|parts| parts.concat()),
            2 => prop::collection::vec(inner.clone(), 1..3)
                .prop_map(|parts| format!("({})", parts.join("|"))),
            1 => inner.clone().prop_map(|p| format!("({p})*")),
            1 => inner.clone().prop_map(|p| format!("({p})+")),
            1 => inner.clone().prop_map(|p| format!("({p})?")),
            1 => (inner, 0u32..3, 0u32..3).prop_map(|(p, n, d)| format!("({p}){{{n},{}}}", n + d)),
        ]
    })
}

fn special_class() -> impl Strategy<Value = SpecialClass> {
    prop::sample::select(vec![
        SpecialClass::Digit,
        SpecialClass::NotDigit,
        SpecialClass::Word,
        SpecialClass::NotWord,
        SpecialClass::Space,
        SpecialClass::NotSpace,
        SpecialClass::Tab,
        SpecialClass::CarriageReturn,
        SpecialClass::LineFeed,
        SpecialClass::VerticalTab,
        SpecialClass::FormFeed,
        SpecialClass::Null,
    ])
}

fn class_atom() -> impl Strategy<Value = ClassAtom> {
    prop_oneof![
        4 => prop::char::range('a', 'z').prop_map(ClassAtom::Char),
        1 => Just(ClassAtom::Wildcard),
        2 => special_class().prop_map(ClassAtom::Class),
        1 => prop::char::range('\0', '\u{FF}').prop_map(ClassAtom::AsciiCp),
        1 => prop::char::range('\u{100}', '\u{D7FF}').prop_map(ClassAtom::UnicodeCp),
    ]
}

fn class_item() -> impl Strategy<Value = ClassItem> {
    prop_oneof![
        3 => class_atom().prop_map(ClassItem::Atom),
        1 => (prop::char::range('a', 'z'), prop::char::range('a', 'z')).prop_map(|(a, b)| {
            if a <= b {
                ClassItem::Range(a, b)
            } else {
                ClassItem::Range(b, a)
            }
        }),
    ]
}

fn simple_atom() -> impl Strategy<Value = Atom> {
    prop_oneof![
        4 => prop::char::range('a', 'z').prop_map(Atom::Char),
        1 => Just(Atom::Wildcard),
        1 => special_class().prop_map(Atom::Class),
        1 => prop::char::range('\0', '\u{FF}').prop_map(Atom::AsciiCp),
        1 => prop::char::range('\u{100}', '\u{D7FF}').prop_map(Atom::UnicodeCp),
        2 => (any::<bool>(), prop::collection::vec(class_item(), 1..4))
            .prop_map(|(negated, items)| Atom::CharClass(CharClass { negated, items })),
    ]
}

fn quantifier() -> impl Strategy<Value = Quantifier> {
    prop_oneof![
        Just(Quantifier::Kleene),
        Just(Quantifier::Plus),
        Just(Quantifier::Opt),
        (0u32..4).prop_map(|n| Quantifier::Repeat(RepeatKind::Exactly(n))),
        (0u32..4).prop_map(|n| Quantifier::Repeat(RepeatKind::AtLeast(n))),
        (0u32..4).prop_map(|m| Quantifier::Repeat(RepeatKind::AtMost(m))),
        (0u32..4, 0u32..3)
            .prop_map(|(n, d)| Quantifier::Repeat(RepeatKind::Between(n, n + d))),
    ]
}

fn quantified(atom: impl Strategy<Value = Atom>) -> impl Strategy<Value = Factor> {
    (atom, prop::option::of(quantifier()), any::<bool>()).prop_map(|(atom, quantifier, lazy)| {
        Factor::Quantified {
            atom,
            lazy: lazy && quantifier.is_some(),
            quantifier,
        }
    })
}

fn branch(factor: impl Strategy<Value = Factor>) -> impl Strategy<Value = Branch> {
    (any::<bool>(), any::<bool>(), prop::collection::vec(factor, 1..4)).prop_map(
        |(anchor_start, anchor_end, factors)| Branch {
            anchor_start,
            anchor_end,
            factors,
        },
    )
}

fn pattern_of(factor: impl Strategy<Value = Factor>) -> impl Strategy<Value = Pattern> {
    prop::collection::vec(branch(factor), 1..3).prop_map(|branches| Pattern { branches })
}

fn pattern_tree() -> impl Strategy<Value = Pattern> {
    let leaf = pattern_of(quantified(simple_atom()));
    leaf.prop_recursive(3, 24, 3, |inner| {
        let atom = prop_oneof![
            4 => simple_atom(),
            1 => inner.clone().prop_map(|p| Atom::Group(Box::new(p))),
        ];
        let factor = prop_oneof![
            6 => quantified(atom),
            1 => (any::<bool>(), any::<bool>(), inner).prop_map(|(behind, negated, pattern)| {
                Factor::Look {
                    behind,
                    negated,
                    pattern,
                }
            }),
        ];
        pattern_of(factor)
    })
}
