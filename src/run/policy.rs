//! Execution policies: the strategy layer that interprets messages.
//!
//! A policy implements exactly three operations, one per message variant.
//! The trampoline hands it each message together with the machine; the
//! policy does the frame bookkeeping, invokes the matcher transition, and
//! returns the next step. Swapping the policy changes how parsing is
//! scheduled without touching any matcher.

use crate::input::Input;
use crate::run::core::Machine;
use crate::run::step;
use crate::types::matcher::Matcher;
use crate::types::message::{Exec, Frame, Message, Step, Win};
use crate::Result;

/// A pluggable interpreter for messages.
///
/// Object-safe so the parse surface can select an implementation at
/// runtime.
pub(crate) trait Dispatch<I: Input + ?Sized> {
    /// Push the parent frame and advance the child matcher.
    fn on_execute(&mut self, m: &mut Machine<'_, I>, exec: Exec<I::Token>)
        -> Result<Step<I::Token>>;

    /// Pop the waiting parent and hand it the child's parse.
    fn on_success(&mut self, m: &mut Machine<'_, I>, win: Win<I::Token>)
        -> Result<Step<I::Token>>;

    /// Pop the waiting parent and tell it the child is exhausted.
    fn on_failure(&mut self, m: &mut Machine<'_, I>) -> Result<Step<I::Token>>;
}

/// Plain depth-first backtracking: the message protocol, verbatim.
pub(crate) struct Backtrack;

impl<I: Input + ?Sized> Dispatch<I> for Backtrack {
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
        m.push(parent, pos);
        step::execute(m.grammar, m.input, child, state, pos).map(Step::Next)
    }

    fn on_success(&mut self, m: &mut Machine<'_, I>, win: Win<I::Token>) -> Result<Step<I::Token>> {
        m.touch(win.pos);
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

/// Restricted backtracking in the Parsec mould.
///
/// The policy keeps one `consumed` flag meaning "input has been consumed
/// since the nearest enclosing choice alternative began", with a snapshot
/// saved per frame. A failure arriving at a choice while `consumed` is set
/// is not caught: the remaining alternatives are skipped and the failure
/// propagates. A failure leaving an [`Matcher::Attempt`] subtree has its
/// consumption erased, which locally restores full backtracking.
pub(crate) struct Restrict {
    consumed: bool,
    saved: Vec<bool>,
}

impl Restrict {
    pub fn new() -> Self {
        Self {
            consumed: false,
            saved: Vec::new(),
        }
    }

    fn pop_saved(&mut self) -> bool {
        match self.saved.pop() {
            Some(saved) => saved,
            None => panic!("snapshot stack underflow"),
        }
    }

    /// Entering an attempt (or any other) subtree snapshots the flag.
    fn begin(&mut self, reset: bool) {
        self.saved.push(self.consumed);
        if reset {
            self.consumed = false;
        }
    }

    /// A failure leaving an attempt subtree is treated as if the subtree
    /// consumed nothing.
    fn end_attempt(&mut self, saved: bool) {
        self.consumed = saved;
    }
}

impl<I: Input + ?Sized> Dispatch<I> for Restrict {
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
        // A fresh choice alternative starts uncommitted.
        let reset = match &parent {
            Frame::Parent { matcher, .. } => {
                matches!(m.grammar.matcher(*matcher), Matcher::Choice { .. })
            }
            Frame::Root => false,
        };
        self.begin(reset);
        m.push(parent, pos);
        step::execute(m.grammar, m.input, child, state, pos).map(Step::Next)
    }

    fn on_success(&mut self, m: &mut Machine<'_, I>, win: Win<I::Token>) -> Result<Step<I::Token>> {
        m.touch(win.pos);
        let saved = self.pop_saved();
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
            } => {
                if win.pos > entry {
                    self.consumed = true;
                }
                // Restore consumption recorded before this frame was
                // pushed, so an empty success inside a choice does not
                // leak the alternative-local reset outward.
                self.consumed |= saved;
                step::succeed(m.grammar, matcher, state, entry, win).map(Step::Next)
            }
        }
    }

    fn on_failure(&mut self, m: &mut Machine<'_, I>) -> Result<Step<I::Token>> {
        let saved = self.pop_saved();
        match m.pop() {
            Frame::Root => Ok(Step::Reject),
            Frame::Parent {
                matcher,
                state,
                entry,
            } => match m.grammar.matcher(matcher) {
                Matcher::Choice { .. } if self.consumed => {
                    // Committed: the remaining alternatives are not tried.
                    Ok(Step::Next(Message::Failure))
                }
                Matcher::Attempt { .. } => {
                    self.end_attempt(saved);
                    step::fail(m.grammar, matcher, state, entry).map(Step::Next)
                }
                _ => {
                    // Restore the pre-frame snapshot here too: a nested
                    // choice resets the flag per alternative, and without
                    // this an exhausted inner choice would leak that reset
                    // past its parent and uncommit an outer choice.
                    self.consumed = saved;
                    step::fail(m.grammar, matcher, state, entry).map(Step::Next)
                }
            },
        }
    }
}
