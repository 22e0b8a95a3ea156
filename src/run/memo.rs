//! The memoizing policy.
//!
//! The memo table maps (matcher identity, state shape, position) to the
//! outcome already discovered for that exact derivation point. A key is
//! marked busy when first entered; re-entering a busy key, which is what
//! a left-recursive grammar does, is conservatively treated as a
//! failure, so such grammars terminate instead of diverging. A completed
//! key replays its recorded success or failure without running the
//! matcher again, which preserves the outcome sequence of the plain
//! backtracking policy exactly.
//!
//! Keying on the state *shape* (structure and positions, semantic values
//! elided) is sound because a matcher's outcome is a pure function of
//! (matcher, position, input): two states with equal shapes at the same
//! matcher and position denote the same derivation point.

use fnv::FnvHashMap;

use crate::input::{Input, Pos};
use crate::run::core::Machine;
use crate::run::policy::Dispatch;
use crate::run::step;
use crate::types::matcher::MatcherId;
use crate::types::message::{Exec, Frame, Message, Step, Win};
use crate::types::state::{Shape, State};
use crate::value::Value;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    matcher: MatcherId,
    pos: Pos,
    shape: Shape,
}

enum Slot<T> {
    /// Entered but not yet resolved.
    Busy,
    /// Resolved: the recorded success, or `None` for a failure.
    Known(Option<Cached<T>>),
}

struct Cached<T> {
    state: State<T>,
    pos: Pos,
    value: Value<T>,
}

pub(crate) struct Memo<T> {
    table: FnvHashMap<MemoKey, Slot<T>>,
    /// One entry per frame: the key the frame's child execution will
    /// resolve, if that execution actually ran (cache replays carry
    /// `None`).
    pending: Vec<Option<MemoKey>>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            table: FnvHashMap::default(),
            pending: Vec::new(),
        }
    }

    fn pop_pending(&mut self) -> Option<MemoKey> {
        match self.pending.pop() {
            Some(key) => key,
            None => panic!("pending key stack underflow"),
        }
    }
}

impl<I: Input + ?Sized> Dispatch<I> for Memo<I::Token> {
    fn on_execute(
        &mut self,
        m: &mut Machine<'_, I>,
        exec: Exec<I::Token>,
    ) -> Result<Step<I::Token>> {
        let Exec {
            parent,
            child,
            state,
            pos,
        } = exec;
        let key = MemoKey {
            matcher: child,
            pos,
            shape: Shape::of(&state),
        };
        match self.table.get(&key) {
            Some(Slot::Known(outcome)) => {
                let msg = match outcome {
                    Some(c) => Message::success(c.state.clone(), c.pos, c.value.clone()),
                    None => Message::Failure,
                };
                m.push(parent, pos);
                self.pending.push(None);
                Ok(Step::Next(msg))
            }
            Some(Slot::Busy) => {
                // Re-entry on an in-flight key: the conservative
                // left-recursion rule.
                m.push(parent, pos);
                self.pending.push(None);
                Ok(Step::Next(Message::Failure))
            }
            None => {
                self.table.insert(key.clone(), Slot::Busy);
                m.push(parent, pos);
                self.pending.push(Some(key));
                step::execute(m.grammar, m.input, child, state, pos).map(Step::Next)
            }
        }
    }

    fn on_success(&mut self, m: &mut Machine<'_, I>, win: Win<I::Token>) -> Result<Step<I::Token>> {
        m.touch(win.pos);
        if let Some(key) = self.pop_pending() {
            self.table.insert(
                key,
                Slot::Known(Some(Cached {
                    state: win.state.clone(),
                    pos: win.pos,
                    value: win.value.clone(),
                })),
            );
        }
        match m.pop() {
            Frame::Root => Ok(Step::Accept {
                state: win.state,
                pos: win.pos,
                value: win.value,
            }),
            Frame::Parent {
                matcher,
                state,
                entry,
            } => step::succeed(m.grammar, matcher, state, entry, win).map(Step::Next),
        }
    }

    fn on_failure(&mut self, m: &mut Machine<'_, I>) -> Result<Step<I::Token>> {
        if let Some(key) = self.pop_pending() {
            self.table.insert(key, Slot::Known(None));
        }
        match m.pop() {
            Frame::Root => Ok(Step::Reject),
            Frame::Parent {
                matcher,
                state,
                entry,
            } => step::fail(m.grammar, matcher, state, entry).map(Step::Next),
        }
    }
}
