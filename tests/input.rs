use assert_matches::assert_matches;

use rebound::{Grammar, Input, Outcome, Pos, Value};

#[test]
fn positions_are_ordered() {
    let input = "héllo";
    let start = input.start();
    assert_eq!(start.offset(), 0);
    assert!(!input.at_end(start));

    let (h, after_h) = input.next(start).unwrap();
    assert_eq!(h, 'h');
    let (e, after_e) = input.next(after_h).unwrap();
    assert_eq!(e, 'é');
    // Multi-byte characters advance by their encoded width.
    assert_eq!(after_e.offset(), 3);
    assert!(start < after_h && after_h < after_e);

    let end = Pos::new(input.len());
    assert!(input.at_end(end));
    assert!(input.next(end).is_none());
}

#[test]
fn str_input_unicode_literal() {
    let mut g = Grammar::builder();
    let root = g.literal("héllo");
    let grammar = g.build(root).unwrap();

    let m = grammar.parse("héllo").first().unwrap().into_match().unwrap();
    assert_eq!(m.value, Value::from("héllo"));
    assert_eq!(m.end.offset(), "héllo".len());
}

#[test]
fn byte_slice_input() {
    let mut g = Grammar::builder();
    let magic = g.tokens([0x7f, b'E', b'L', b'F']);
    let grammar = g.build(magic).unwrap();

    let input = [0x7f, b'E', b'L', b'F'];
    let m = grammar
        .parse(&input[..])
        .first()
        .unwrap()
        .into_match()
        .unwrap();
    assert_eq!(m.value, Value::Tokens(vec![0x7f, b'E', b'L', b'F']));
    assert_eq!(m.end.offset(), 4);

    let wrong = [0x7f, b'E', b'L', b'Q'];
    assert_matches!(
        grammar.parse(&wrong[..]).first().unwrap(),
        Outcome::Mismatch(_)
    );
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Num(i64),
    Plus,
}

#[test]
fn token_slice_input() {
    let mut g = Grammar::builder();
    let num = g.tokens([Tok::Num(1)]);
    let plus = g.tokens([Tok::Plus]);
    let root = g.sequence([num, plus, num]);
    let grammar = g.build(root).unwrap();

    let input = [Tok::Num(1), Tok::Plus, Tok::Num(1)];
    let m = grammar
        .parse(&input[..])
        .first()
        .unwrap()
        .into_match()
        .unwrap();
    assert_eq!(m.end.offset(), 3);

    let short = [Tok::Num(1), Tok::Plus];
    assert_matches!(
        grammar.parse(&short[..]).first().unwrap(),
        Outcome::Mismatch(_)
    );
}

/// A source that hides spaces from the grammar: positions remain byte
/// offsets into the underlying text, but `next` skips over spaces.
struct SkipSpaces<'a>(&'a str);

impl Input for SkipSpaces<'_> {
    type Token = char;

    fn start(&self) -> Pos {
        Pos::new(0)
    }

    fn at_end(&self, pos: Pos) -> bool {
        self.0[pos.offset()..].chars().all(|c| c == ' ')
    }

    fn next(&self, pos: Pos) -> Option<(char, Pos)> {
        let mut offset = pos.offset();
        for c in self.0[offset..].chars() {
            offset += c.len_utf8();
            if c != ' ' {
                return Some((c, Pos::new(offset)));
            }
        }
        None
    }
}

#[test]
fn custom_input_source() {
    let mut g = Grammar::builder();
    let root = g.literal("ab");
    let grammar = g.build(root).unwrap();

    let input = SkipSpaces("a  b ");
    let m = grammar.parse(&input).first().unwrap().into_match().unwrap();
    assert_eq!(m.value, Value::from("ab"));
    assert_eq!(m.end.offset(), 4);
}
