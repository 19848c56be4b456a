use crate::parser::{SyntaxError, SyntaxErrorKind};
use crate::pattern::{
    Atom, Branch, CharClass, ClassAtom, ClassItem, Factor, Pattern, Quantifier, RepeatKind,
    SpecialClass, METACHARACTERS,
};
use nom::branch::alt;
use nom::bytes::complete::{tag, take};
use nom::character::complete;
use nom::character::complete::{digit1, one_of};
use nom::combinator::{map, opt, value, verify};
use nom::error::{ErrorKind, ParseError};
use nom::multi::many1;
use nom::sequence::preceded;
use nom::{Err, IResult};

/// The parser-internal error: the remaining input at the point of failure plus
/// what went wrong there. Committed failures (after `\`, `[`, `{`, `(?` and
/// similar points of no return) are raised as [nom::Err::Failure] so that the
/// reported position is the offending character rather than wherever an outer
/// alternative gave up.
#[derive(Debug, PartialEq)]
pub(crate) struct PatternError<'a> {
    input: &'a str,
    kind: SyntaxErrorKind,
}

impl<'a> PatternError<'a> {
    pub(crate) fn into_syntax_error(self, full: &str) -> SyntaxError {
        let consumed = full.len() - self.input.len();
        SyntaxError {
            position: full[..consumed].chars().count(),
            kind: self.kind,
        }
    }
}

impl<'a> ParseError<&'a str> for PatternError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        let kind = if input.is_empty() {
            SyntaxErrorKind::UnexpectedEnd
        } else {
            SyntaxErrorKind::UnexpectedChar
        };
        PatternError { input, kind }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, T> = IResult<&'a str, T, PatternError<'a>>;

fn fail<T>(input: &str, kind: SyntaxErrorKind) -> PResult<'_, T> {
    Err(Err::Failure(PatternError { input, kind }))
}

pub(crate) fn full_pattern(input: &str) -> PResult<'_, Pattern> {
    union(input)
}

fn union(input: &str) -> PResult<'_, Pattern> {
    let (mut rest, first) = match branch(input) {
        Ok(ok) => ok,
        Err(Err::Failure(e)) => return Err(Err::Failure(e)),
        Err(e) => {
            if input.starts_with('|') {
                return fail(input, SyntaxErrorKind::EmptyBranch);
            }
            return Err(e);
        }
    };
    let mut branches = vec![first];
    while let Ok((after_bar, _)) = complete::char::<_, PatternError>('|')(rest) {
        let (after_branch, next) = match branch(after_bar) {
            Ok(ok) => ok,
            Err(Err::Failure(e)) => return Err(Err::Failure(e)),
            Err(_) => return fail(after_bar, SyntaxErrorKind::EmptyBranch),
        };
        branches.push(next);
        rest = after_branch;
    }
    Ok((rest, Pattern { branches }))
}

fn branch(input: &str) -> PResult<'_, Branch> {
    let (rest, start) = opt(complete::char('^'))(input)?;
    let (rest, factors) = many1(factor)(rest)?;
    let (rest, end) = opt(complete::char('$'))(rest)?;
    Ok((
        rest,
        Branch {
            anchor_start: start.is_some(),
            anchor_end: end.is_some(),
            factors,
        },
    ))
}

fn factor(input: &str) -> PResult<'_, Factor> {
    alt((lookaround, quantified))(input)
}

fn lookaround(input: &str) -> PResult<'_, Factor> {
    let (rest, _) = tag("(?")(input)?;
    let direction: PResult<'_, (bool, bool)> = alt((
        value((false, false), complete::char('=')),
        value((false, true), complete::char('!')),
        value((true, false), tag("<=")),
        value((true, true), tag("<!")),
    ))(rest);
    let (rest, (behind, negated)) = match direction {
        Ok(ok) => ok,
        Err(_) => return fail(rest, SyntaxErrorKind::InvalidLookaround),
    };
    let (rest, pattern) = match union(rest) {
        Ok(ok) => ok,
        Err(Err::Failure(e)) => return Err(Err::Failure(e)),
        Err(_) => return fail(rest, SyntaxErrorKind::EmptyBranch),
    };
    match complete::char::<_, PatternError>(')')(rest) {
        Ok((rest, _)) => Ok((
            rest,
            Factor::Look {
                behind,
                negated,
                pattern,
            },
        )),
        Err(_) => fail(rest, SyntaxErrorKind::UnterminatedGroup),
    }
}

fn quantified(input: &str) -> PResult<'_, Factor> {
    let (rest, atom) = atom(input)?;
    let (rest, quantifier) = opt(quantifier)(rest)?;
    let (rest, lazy) = if quantifier.is_some() {
        map(opt(complete::char('?')), |lazy| lazy.is_some())(rest)?
    } else {
        (rest, false)
    };
    Ok((
        rest,
        Factor::Quantified {
            atom,
            quantifier,
            lazy,
        },
    ))
}

fn quantifier(input: &str) -> PResult<'_, Quantifier> {
    alt((
        value(Quantifier::Kleene, complete::char('*')),
        value(Quantifier::Plus, complete::char('+')),
        value(Quantifier::Opt, complete::char('?')),
        repeat_bounds,
    ))(input)
}

fn repeat_bounds(input: &str) -> PResult<'_, Quantifier> {
    let (rest, _) = complete::char('{')(input)?;
    let (rest, lower) = opt(number)(rest)?;
    let (rest, comma) = opt(complete::char(','))(rest)?;
    let (rest, upper) = if comma.is_some() {
        opt(number)(rest)?
    } else {
        (rest, None)
    };
    let kind = match (lower, comma.is_some(), upper) {
        (Some(n), false, _) => RepeatKind::Exactly(n),
        (Some(n), true, None) => RepeatKind::AtLeast(n),
        (None, true, Some(m)) => RepeatKind::AtMost(m),
        (Some(n), true, Some(m)) if n <= m => RepeatKind::Between(n, m),
        _ => return fail(input, SyntaxErrorKind::InvalidBounds),
    };
    match complete::char::<_, PatternError>('}')(rest) {
        Ok((rest, _)) => Ok((rest, Quantifier::Repeat(kind))),
        Err(_) => fail(rest, SyntaxErrorKind::UnterminatedBounds),
    }
}

fn number(input: &str) -> PResult<'_, u32> {
    let (rest, digits) = digit1(input)?;
    match digits.parse::<u32>() {
        Ok(n) => Ok((rest, n)),
        Err(_) => fail(input, SyntaxErrorKind::InvalidBounds),
    }
}

fn atom(input: &str) -> PResult<'_, Atom> {
    alt((group, char_class, extended_char))(input)
}

fn group(input: &str) -> PResult<'_, Atom> {
    let (rest, _) = complete::char('(')(input)?;
    let (rest, pattern) = match union(rest) {
        Ok(ok) => ok,
        Err(Err::Failure(e)) => return Err(Err::Failure(e)),
        Err(_) => return fail(rest, SyntaxErrorKind::EmptyBranch),
    };
    match complete::char::<_, PatternError>(')')(rest) {
        Ok((rest, _)) => Ok((rest, Atom::Group(Box::new(pattern)))),
        Err(_) => fail(rest, SyntaxErrorKind::UnterminatedGroup),
    }
}

fn extended_char(input: &str) -> PResult<'_, Atom> {
    alt((escape, wildcard, raw_char))(input)
}

fn wildcard(input: &str) -> PResult<'_, Atom> {
    value(Atom::Wildcard, complete::char('.'))(input)
}

fn raw_char(input: &str) -> PResult<'_, Atom> {
    map(
        verify(any_char, |c: &char| !METACHARACTERS.contains(*c)),
        Atom::Char,
    )(input)
}

fn escape(input: &str) -> PResult<'_, Atom> {
    map(preceded(complete::char('\\'), escape_body), Atom::from)(input)
}

/// The body of an escape, shared between the top level and character classes.
fn escape_body(input: &str) -> PResult<'_, ClassAtom> {
    if input.is_empty() {
        return fail(input, SyntaxErrorKind::UnexpectedEnd);
    }
    alt((
        map(one_of("dDwWsStrnvf0"), |letter| {
            ClassAtom::Class(special_class(letter))
        }),
        ascii_cp,
        unicode_cp,
        map(one_of(".?*+[]{}()|\\^$-"), ClassAtom::Char),
        |i| fail(i, SyntaxErrorKind::InvalidEscape),
    ))(input)
}

fn special_class(letter: char) -> SpecialClass {
    match letter {
        'd' => SpecialClass::Digit,
        'D' => SpecialClass::NotDigit,
        'w' => SpecialClass::Word,
        'W' => SpecialClass::NotWord,
        's' => SpecialClass::Space,
        'S' => SpecialClass::NotSpace,
        't' => SpecialClass::Tab,
        'r' => SpecialClass::CarriageReturn,
        'n' => SpecialClass::LineFeed,
        'v' => SpecialClass::VerticalTab,
        'f' => SpecialClass::FormFeed,
        '0' => SpecialClass::Null,
        _ => unreachable!("one_of should only yield escape class letters"),
    }
}

fn ascii_cp(input: &str) -> PResult<'_, ClassAtom> {
    let (after_x, _) = complete::char('x')(input)?;
    let hex: PResult<'_, &str> = verify(take(2usize), all_upper_hex)(after_x);
    let (rest, digits) = match hex {
        Ok(ok) => ok,
        Err(_) => return fail(after_x, SyntaxErrorKind::InvalidHex),
    };
    let value = u32::from_str_radix(digits, 16).expect("verified hex digits");
    Ok((rest, ClassAtom::AsciiCp(value as u8 as char)))
}

fn unicode_cp(input: &str) -> PResult<'_, ClassAtom> {
    let (after_u, _) = complete::char('u')(input)?;
    let hex: PResult<'_, &str> = verify(take(4usize), all_upper_hex)(after_u);
    let (rest, digits) = match hex {
        Ok(ok) => ok,
        Err(_) => return fail(after_u, SyntaxErrorKind::InvalidHex),
    };
    let mut value = u32::from_str_radix(digits, 16).expect("verified hex digits");
    let (rest, fifth) = opt(one_of("0123456789ABCDEF"))(rest)?;
    if let Some(digit) = fifth {
        value = value * 16 + digit.to_digit(16).expect("verified hex digit");
    }
    match char::from_u32(value) {
        Some(c) => Ok((rest, ClassAtom::UnicodeCp(c))),
        None => fail(input, SyntaxErrorKind::InvalidCodepoint),
    }
}

fn all_upper_hex(digits: &str) -> bool {
    !digits.is_empty() && digits.chars().all(is_upper_hex)
}

fn is_upper_hex(c: char) -> bool {
    c.is_ascii_digit() || ('A'..='F').contains(&c)
}

fn char_class(input: &str) -> PResult<'_, Atom> {
    let (rest, _) = complete::char('[')(input)?;
    let (mut rest, negated) = map(opt(complete::char('^')), |neg| neg.is_some())(rest)?;
    let mut items = Vec::new();
    loop {
        match rest.chars().next() {
            None => return fail(rest, SyntaxErrorKind::UnterminatedClass),
            Some(']') => {
                rest = &rest[1..];
                break;
            }
            Some('-') => {
                let dash = rest;
                rest = &rest[1..];
                let lo = match items.pop() {
                    Some(ClassItem::Atom(atom)) => match atom.codepoint() {
                        Some(c) => c,
                        None => return fail(dash, SyntaxErrorKind::InvalidRange),
                    },
                    _ => return fail(dash, SyntaxErrorKind::BareDash),
                };
                if rest.is_empty() {
                    return fail(rest, SyntaxErrorKind::UnterminatedClass);
                }
                if rest.starts_with(']') || rest.starts_with('-') {
                    return fail(dash, SyntaxErrorKind::BareDash);
                }
                let (after, hi_atom) = class_atom(rest)?;
                rest = after;
                let hi = match hi_atom.codepoint() {
                    Some(c) => c,
                    None => return fail(dash, SyntaxErrorKind::InvalidRange),
                };
                if lo > hi {
                    return fail(dash, SyntaxErrorKind::InvalidRange);
                }
                items.push(ClassItem::Range(lo, hi));
            }
            Some(_) => {
                let (after, atom) = class_atom(rest)?;
                rest = after;
                items.push(ClassItem::Atom(atom));
            }
        }
    }
    if items.is_empty() {
        return fail(input, SyntaxErrorKind::EmptyClass);
    }
    Ok((rest, Atom::CharClass(CharClass { negated, items })))
}

fn class_atom(input: &str) -> PResult<'_, ClassAtom> {
    alt((
        class_escape,
        value(ClassAtom::Wildcard, complete::char('.')),
        map(
            verify(any_char, |c: &char| {
                *c != ']' && *c != '-' && *c != '\\'
            }),
            ClassAtom::Char,
        ),
    ))(input)
}

fn class_escape(input: &str) -> PResult<'_, ClassAtom> {
    preceded(complete::char('\\'), escape_body)(input)
}

fn any_char(input: &str) -> PResult<'_, char> {
    map(take(1usize), first_char)(input)
}

// Helper to take a &str of one char and return it as a char, panicking in
// debug mode upon multiple chars
fn first_char(s: &str) -> char {
    let mut chars = s.chars();
    let c = chars.next().expect("take(1) yields one character");
    #[cfg(debug_assertions)]
    assert_eq!(chars.next(), None, "take(1) should take only 1 character");
    c
}
