//! The matcher catalogue: per-variant transition functions.
//!
//! Each matcher variant defines three transitions. None of them invoke
//! other matchers directly; all delegation happens by returning an
//! [`Exec`] message, which the policy turns into a frame push. The
//! transitions are dispatched on the (variant, state) pair:
//!
//! - [`execute`] advances a matcher at a position, either from scratch
//!   ([`State::Clean`]) or from a continuation, which asks for the next
//!   alternative parse.
//! - [`succeed`] resumes a matcher whose delegated child produced a parse.
//! - [`fail`] resumes a matcher whose delegated child ran out of parses.
//!
//! The enumeration orders realized here are part of the observable
//! contract: sequences backtrack right-to-left, choices run in declared
//! order and exhaust an alternative's own parses before moving on, greedy
//! repetitions enumerate long-first and lazy ones short-first.

use crate::error::Error;
use crate::grammar::Grammar;
use crate::input::{Input, Pos, Token};
use crate::types::matcher::{Greed, Matcher, MatcherId};
use crate::types::message::{Exec, Frame, Message, Win};
use crate::types::state::{Item, Phase, RepState, State};
use crate::value::Value;
use crate::Result;

/// Advance `id` from `state` at `pos`.
pub(crate) fn execute<I>(
    g: &Grammar<I::Token>,
    input: &I,
    id: MatcherId,
    state: State<I::Token>,
    pos: Pos,
) -> Result<Message<I::Token>>
where
    I: Input + ?Sized,
{
    match (g.matcher(id), state) {
        (Matcher::Literal { tokens, value }, State::Clean) => {
            let mut p = pos;
            for want in tokens {
                match input.next(p) {
                    Some((tok, q)) if tok == *want => p = q,
                    _ => return Ok(Message::Failure),
                }
            }
            Ok(Message::success(State::Done, p, value.clone()))
        }
        // A literal has exactly one parse.
        (Matcher::Literal { .. }, State::Done) => Ok(Message::Failure),

        (Matcher::Sequence { children }, State::Clean) => {
            if children.is_empty() {
                return Ok(Message::success(
                    State::Seq(Vec::new()),
                    pos,
                    Value::List(Vec::new()),
                ));
            }
            Ok(delegate(id, State::Seq(Vec::new()), children[0], State::Clean, pos))
        }
        // Resumption: ask the last completed child for its next parse.
        (Matcher::Sequence { children }, State::Seq(items)) => Ok(seq_ladder(id, children, items)),

        (Matcher::Choice { alternatives }, State::Clean) => match alternatives.first() {
            Some(&alt) => Ok(delegate(id, State::Trying(0), alt, State::Clean, pos)),
            None => Ok(Message::Failure),
        },
        // Resumption: the current alternative's own parses come first.
        (Matcher::Choice { alternatives }, State::Tried(i, child_state)) => {
            Ok(delegate(id, State::Trying(i), alternatives[i], *child_state, pos))
        }

        (Matcher::Repeat { child, min, max, greed }, State::Clean) => {
            let grow = match greed {
                Greed::Greedy => *max != Some(0),
                Greed::Lazy => *min > 0,
            };
            let rep = RepState::new(pos, Phase::Grow);
            if grow {
                Ok(delegate(id, State::Rep(rep), *child, State::Clean, pos))
            } else {
                let value = rep.values();
                Ok(Message::success(State::Rep(rep), pos, value))
            }
        }
        (Matcher::Repeat { child, max, greed, .. }, State::Rep(mut rep)) => match greed {
            // Short-first: try to add a repetition before giving any back.
            Greed::Lazy if max.map_or(true, |mx| rep.items.len() < mx) => {
                rep.phase = Phase::Grow;
                let at = rep.end;
                Ok(delegate(id, State::Rep(rep), *child, State::Clean, at))
            }
            _ => Ok(rep_shrink(id, *child, rep)),
        },

        (Matcher::Transform { child, .. }, State::Clean) => {
            Ok(delegate(id, State::Wrap, *child, State::Clean, pos))
        }
        (Matcher::Transform { child, .. }, State::Wrapped(cs)) => {
            Ok(delegate(id, State::Wrap, *child, *cs, pos))
        }

        (Matcher::Attempt { child }, State::Clean) => {
            Ok(delegate(id, State::Wrap, *child, State::Clean, pos))
        }
        (Matcher::Attempt { child }, State::Wrapped(cs)) => {
            Ok(delegate(id, State::Wrap, *child, *cs, pos))
        }

        (Matcher::Reference { name }, State::Clean) => {
            let target = g.resolve(name)?;
            Ok(delegate(id, State::Wrap, target, State::Clean, pos))
        }
        (Matcher::Reference { name }, State::Wrapped(cs)) => {
            let target = g.resolve(name)?;
            Ok(delegate(id, State::Wrap, target, *cs, pos))
        }

        _ => panic!("matcher executed with a foreign state"),
    }
}

/// Resume `id` after the child it delegated to produced a parse. `entry`
/// is the position at which that child was entered.
pub(crate) fn succeed<T: Token>(
    g: &Grammar<T>,
    id: MatcherId,
    state: State<T>,
    entry: Pos,
    win: Win<T>,
) -> Result<Message<T>> {
    match (g.matcher(id), state) {
        (Matcher::Sequence { children }, State::Seq(mut items)) => {
            items.push(Item {
                state: win.state,
                entry,
                value: win.value,
            });
            if items.len() == children.len() {
                let value = Value::List(items.iter().map(|it| it.value.clone()).collect());
                Ok(Message::success(State::Seq(items), win.pos, value))
            } else {
                let child = children[items.len()];
                Ok(delegate(id, State::Seq(items), child, State::Clean, win.pos))
            }
        }

        (Matcher::Choice { .. }, State::Trying(i)) => Ok(Message::success(
            State::Tried(i, Box::new(win.state)),
            win.pos,
            win.value,
        )),

        (Matcher::Repeat { child, min, max, greed }, State::Rep(mut rep)) => {
            if rep.phase == Phase::Grow && win.pos == entry {
                // A repetition that consumes nothing is not repeated;
                // treat it as the end of growth.
                return Ok(rep_grow_failed(id, *child, rep, *min, *greed));
            }
            rep.items.push(Item {
                state: win.state,
                entry,
                value: win.value,
            });
            rep.end = win.pos;
            let full = max.map_or(false, |mx| rep.items.len() >= mx);
            match greed {
                Greed::Greedy if !full => {
                    rep.phase = Phase::Grow;
                    let at = rep.end;
                    Ok(delegate(id, State::Rep(rep), *child, State::Clean, at))
                }
                Greed::Lazy if rep.items.len() < *min => {
                    rep.phase = Phase::Grow;
                    let at = rep.end;
                    Ok(delegate(id, State::Rep(rep), *child, State::Clean, at))
                }
                _ => {
                    let value = rep.values();
                    let pos = rep.end;
                    Ok(Message::success(State::Rep(rep), pos, value))
                }
            }
        }

        (Matcher::Transform { f, .. }, State::Wrap) => {
            let value = (**f)(win.value).map_err(Error::transform)?;
            Ok(Message::success(
                State::Wrapped(Box::new(win.state)),
                win.pos,
                value,
            ))
        }

        (Matcher::Reference { .. } | Matcher::Attempt { .. }, State::Wrap) => Ok(
            Message::success(State::Wrapped(Box::new(win.state)), win.pos, win.value),
        ),

        _ => panic!("matcher received a child success it never asked for"),
    }
}

/// Resume `id` after the child it delegated to ran out of parses. `entry`
/// is the position at which that child was entered.
pub(crate) fn fail<T: Token>(
    g: &Grammar<T>,
    id: MatcherId,
    state: State<T>,
    entry: Pos,
) -> Result<Message<T>> {
    match (g.matcher(id), state) {
        (Matcher::Sequence { children }, State::Seq(items)) => Ok(seq_ladder(id, children, items)),

        (Matcher::Choice { alternatives }, State::Trying(i)) => {
            let next = i + 1;
            match alternatives.get(next) {
                Some(&alt) => Ok(delegate(id, State::Trying(next), alt, State::Clean, entry)),
                None => Ok(Message::Failure),
            }
        }

        (Matcher::Repeat { child, min, greed, .. }, State::Rep(rep)) => match rep.phase {
            Phase::Grow => Ok(rep_grow_failed(id, *child, rep, *min, *greed)),
            Phase::Shrink => {
                // The re-entered repetition had no further parse of its
                // own; the shorter list (it was popped on re-entry) is the
                // next result for a greedy repeat.
                if *greed == Greed::Greedy && rep.items.len() >= *min {
                    let value = rep.values();
                    let pos = rep.end;
                    Ok(Message::success(State::Rep(rep), pos, value))
                } else {
                    Ok(rep_shrink(id, *child, rep))
                }
            }
        },

        (
            Matcher::Transform { .. } | Matcher::Reference { .. } | Matcher::Attempt { .. },
            State::Wrap,
        ) => Ok(Message::Failure),

        _ => panic!("matcher received a child failure it never asked for"),
    }
}

/// Build the message delegating `child` on behalf of `parent`.
fn delegate<T>(
    parent: MatcherId,
    parent_state: State<T>,
    child: MatcherId,
    child_state: State<T>,
    pos: Pos,
) -> Message<T> {
    Message::Execute(Exec {
        parent: Frame::Parent {
            matcher: parent,
            state: parent_state,
            entry: pos,
        },
        child,
        state: child_state,
        pos,
    })
}

/// The sequence backtracking ladder: pop the most recent completed child
/// and ask it for its next parse; an empty ladder is a failure.
fn seq_ladder<T>(id: MatcherId, children: &[MatcherId], mut items: Vec<Item<T>>) -> Message<T> {
    match items.pop() {
        Some(it) => {
            let child = children[items.len()];
            delegate(id, State::Seq(items), child, it.state, it.entry)
        }
        None => Message::Failure,
    }
}

/// Give back the most recent repetition: pop it and re-enter its child
/// for the child's own next parse.
fn rep_shrink<T>(id: MatcherId, child: MatcherId, mut rep: RepState<T>) -> Message<T> {
    match rep.items.pop() {
        Some(it) => {
            rep.end = it.entry;
            rep.phase = Phase::Shrink;
            delegate(id, State::Rep(rep), child, it.state, it.entry)
        }
        None => Message::Failure,
    }
}

/// The growth phase could not add a repetition: a greedy repeat that has
/// reached its minimum emits what it has, anything else starts giving
/// repetitions back.
fn rep_grow_failed<T: Token>(
    id: MatcherId,
    child: MatcherId,
    rep: RepState<T>,
    min: usize,
    greed: Greed,
) -> Message<T> {
    match greed {
        Greed::Greedy if rep.items.len() >= min => {
            let value = rep.values();
            let pos = rep.end;
            Message::success(State::Rep(rep), pos, value)
        }
        _ => rep_shrink(id, child, rep),
    }
}
