use assert_matches::assert_matches;

use rebound::{Grammar, Greed, Match, Outcome, Value};

fn collect(parses: rebound::Parses<'_, str>) -> Vec<(Value<char>, usize)> {
    parses
        .map(|m| m.unwrap())
        .map(|m| (m.value, m.end.offset()))
        .collect()
}

fn strings<const N: usize>(items: [&str; N]) -> Value<char> {
    Value::List(items.iter().map(|s| Value::from(*s)).collect())
}

#[test]
fn literal_match() {
    let mut g = Grammar::builder();
    let root = g.literal("hello");
    let grammar = g.build(root).unwrap();

    let m = grammar.parse("hello").first().unwrap().into_match().unwrap();
    assert_eq!(m.value, Value::from("hello"));
    assert_eq!(m.end.offset(), 5);
}

#[test]
fn literal_mismatch() {
    let mut g = Grammar::builder();
    let root = g.literal("hello");
    let grammar = g.build(root).unwrap();

    assert_matches!(grammar.parse("help!").first().unwrap(), Outcome::Mismatch(_));
}

#[test]
fn literal_empty() {
    let mut g = Grammar::builder();
    let root = g.literal("");
    let grammar = g.build(root).unwrap();

    let m = grammar.parse("").first().unwrap().into_match().unwrap();
    assert_eq!(m.value, Value::from(""));
    assert_eq!(m.end.offset(), 0);
}

#[test]
fn sequence_of_literals() {
    let mut g = Grammar::builder();
    let hello = g.literal("hello");
    let world = g.literal("world");
    let root = g.sequence([hello, world]);
    let grammar = g.build(root).unwrap();

    let m = grammar
        .parse("helloworld")
        .first()
        .unwrap()
        .into_match()
        .unwrap();
    assert_eq!(m.value, strings(["hello", "world"]));
    assert_eq!(m.end.offset(), 10);

    // A sequence of literals is unambiguous: exactly one parse.
    let all = collect(grammar.parse("helloworld").iter());
    assert_eq!(all.len(), 1);
}

#[test]
fn sequence_empty() {
    let mut g = Grammar::builder();
    let root = g.sequence([]);
    let grammar = g.build(root).unwrap();

    let m = grammar.parse("").first().unwrap().into_match().unwrap();
    assert_eq!(m.value, strings([]));

    // Leftover input is a mismatch unless full input is waived.
    assert_matches!(grammar.parse("x").first().unwrap(), Outcome::Mismatch(_));
    let m = grammar
        .parse("x")
        .require_full_input(false)
        .first()
        .unwrap()
        .into_match()
        .unwrap();
    assert_eq!(m.end.offset(), 0);
}

#[test]
fn sequence_backtracks_into_choice() {
    let mut g = Grammar::builder();
    let ab = g.literal("ab");
    let a = g.literal("a");
    let first = g.choice([ab, a]);
    let b = g.literal("b");
    let root = g.sequence([first, b]);
    let grammar = g.build(root).unwrap();

    // The greedy first alternative consumes "ab" and starves the second
    // element; the ladder re-enters the choice and takes "a".
    let m = grammar.parse("ab").first().unwrap().into_match().unwrap();
    assert_eq!(m.value, strings(["a", "b"]));
    assert_eq!(m.end.offset(), 2);
}

#[test]
fn choice_ordered_under_full_input() {
    let mut g = Grammar::builder();
    let foo = g.literal("foo");
    let foobar = g.literal("foobar");
    let root = g.choice([foo, foobar]);
    let grammar = g.build(root).unwrap();

    // Ordered choice commits the single-parse mode to "foo", which leaves
    // input behind.
    assert_matches!(grammar.parse("foobar").first().unwrap(), Outcome::Mismatch(_));

    // Enumeration backtracks into the second alternative.
    let all = collect(grammar.parse("foobar").iter());
    assert_eq!(all, [(Value::from("foobar"), 6)]);
}

#[test]
fn choice_declared_order() {
    let mut g = Grammar::builder();
    let foo = g.literal("foo");
    let foobar = g.literal("foobar");
    let root = g.choice([foo, foobar]);
    let grammar = g.build(root).unwrap();

    let all = collect(grammar.parse("foobar").require_full_input(false).iter());
    assert_eq!(all, [(Value::from("foo"), 3), (Value::from("foobar"), 6)]);
}

#[test]
fn choice_empty() {
    let mut g = Grammar::builder();
    let root = g.choice([]);
    let grammar = g.build(root).unwrap();

    assert_matches!(grammar.parse("").first().unwrap(), Outcome::Mismatch(_));
}

#[test]
fn repeat_greedy_long_first() {
    let mut g = Grammar::builder();
    let a = g.literal("a");
    let root = g.repeat(a, 0, Some(3), Greed::Greedy);
    let grammar = g.build(root).unwrap();

    let all = collect(grammar.parse("aaaa").require_full_input(false).iter());
    assert_eq!(
        all,
        [
            (strings(["a", "a", "a"]), 3),
            (strings(["a", "a"]), 2),
            (strings(["a"]), 1),
            (strings([]), 0),
        ],
    );
}

#[test]
fn repeat_lazy_short_first() {
    let mut g = Grammar::builder();
    let a = g.literal("a");
    let root = g.repeat(a, 0, Some(3), Greed::Lazy);
    let grammar = g.build(root).unwrap();

    let all = collect(grammar.parse("aaaa").require_full_input(false).iter());
    assert_eq!(
        all,
        [
            (strings([]), 0),
            (strings(["a"]), 1),
            (strings(["a", "a"]), 2),
            (strings(["a", "a", "a"]), 3),
        ],
    );
}

#[test]
fn repeat_minimum_enforced() {
    let mut g = Grammar::builder();
    let a = g.literal("a");
    let root = g.repeat(a, 2, Some(3), Greed::Greedy);
    let grammar = g.build(root).unwrap();

    assert_matches!(grammar.parse("a").first().unwrap(), Outcome::Mismatch(_));

    let m = grammar.parse("aa").first().unwrap().into_match().unwrap();
    assert_eq!(m.value, strings(["a", "a"]));
}

#[test]
fn repeat_unbounded() {
    let mut g = Grammar::builder();
    let a = g.literal("a");
    let root = g.repeat(a, 0, None, Greed::Greedy);
    let grammar = g.build(root).unwrap();

    let all = collect(grammar.parse("aaa").require_full_input(false).iter());
    let ends: Vec<usize> = all.iter().map(|(_, end)| *end).collect();
    assert_eq!(ends, [3, 2, 1, 0]);
}

#[test]
fn repeat_zero_width_child_terminates() {
    // An unbounded greedy repeat over a nullable child must not diverge:
    // a repetition that consumes nothing is not repeated.
    let mut g = Grammar::builder();
    let a = g.literal("a");
    let opt = g.optional(a);
    let root = g.repeat(opt, 0, None, Greed::Greedy);
    let grammar = g.build(root).unwrap();

    let m = grammar
        .parse("aa")
        .first()
        .unwrap()
        .into_match()
        .unwrap();
    assert_eq!(m.end.offset(), 2);
}

#[test]
fn optional_present_and_absent() {
    let mut g = Grammar::builder();
    let a = g.literal("a");
    let root = g.optional(a);
    let grammar = g.build(root).unwrap();

    let m = grammar.parse("a").first().unwrap().into_match().unwrap();
    assert_eq!(m.value, strings(["a"]));

    let m = grammar.parse("").first().unwrap().into_match().unwrap();
    assert_eq!(m.value, strings([]));

    let all = collect(grammar.parse("a").require_full_input(false).iter());
    assert_eq!(all, [(strings(["a"]), 1), (strings([]), 0)]);
}

#[test]
fn transform_applies() {
    let mut g = Grammar::builder();
    let digits = g.literal("42");
    let root = g.map(digits, |v| match v {
        Value::String(s) => s.parse::<i64>().map(Value::Integer).map_err(|e| e.to_string()),
        other => Err(format!("expected a string, got {}", other.human())),
    });
    let grammar = g.build(root).unwrap();

    let m = grammar.parse("42").first().unwrap().into_match().unwrap();
    assert_eq!(m.value, Value::Integer(42));
}

#[test]
fn transform_failure_is_fatal() {
    let mut g = Grammar::builder();
    let a = g.literal("a");
    let root = g.map(a, |_| Err(String::from("boom")));
    let grammar = g.build(root).unwrap();

    let err = grammar.parse("a").first().unwrap_err();
    assert!(!err.is_cancelled());
    let msg = err.to_string();
    assert!(msg.contains("transform error"), "{msg}");
    assert!(msg.contains("boom"), "{msg}");
}

#[test]
fn mismatch_reports_deepest_position() {
    let mut g = Grammar::builder();
    let a = g.literal("a");
    let b = g.literal("b");
    let root = g.sequence([a, b]);
    let grammar = g.build(root).unwrap();

    match grammar.parse("ax").first().unwrap() {
        Outcome::Mismatch(mismatch) => assert_eq!(mismatch.deepest.offset(), 1),
        outcome => panic!("expected mismatch, got {outcome:?}"),
    }
}

#[test]
fn enumeration_is_exhaustive_and_ordered() {
    // Segmentations of "aaa" by {"aa", "a"}: greedy repetition prefers
    // the longest chunk first, then backtracks chunk by chunk.
    let mut g = Grammar::builder();
    let aa = g.literal("aa");
    let a = g.literal("a");
    let chunk = g.choice([aa, a]);
    let root = g.repeat(chunk, 0, None, Greed::Greedy);
    let grammar = g.build(root).unwrap();

    let all = collect(grammar.parse("aaa").iter());
    assert_eq!(
        all,
        [
            (strings(["aa", "a"]), 3),
            (strings(["a", "aa"]), 3),
            (strings(["a", "a", "a"]), 3),
        ],
    );
}

#[test]
fn position_monotonic_within_matches() {
    let mut g = Grammar::builder();
    let a = g.literal("a");
    let opt = g.optional(a);
    let b = g.literal("b");
    let root = g.sequence([opt, b]);
    let grammar = g.build(root).unwrap();

    for input in ["ab", "b"] {
        for m in grammar.parse(input).require_full_input(false).iter() {
            let Match { end, .. } = m.unwrap();
            assert!(end.offset() <= input.len());
            assert!(end >= rebound::Pos::new(0));
        }
    }
}
