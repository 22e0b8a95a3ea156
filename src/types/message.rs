//! Defines the [`Message`] protocol between matchers and the trampoline.
//!
//! Matchers never call each other; every transition returns a message and
//! the engine's frame stack does the rest. An [`Exec`] asks the engine to
//! advance a child matcher, a [`Win`] reports a parse with a continuation
//! for later resumption, and `Failure` reports that a matcher is out of
//! alternatives.

use crate::input::Pos;
use crate::types::matcher::MatcherId;
use crate::types::state::State;
use crate::value::Value;

/// One step's worth of communication.
#[derive(Debug, Clone)]
pub(crate) enum Message<T> {
    /// Advance `child` from `state` starting at `pos`, on behalf of
    /// `parent`.
    Execute(Exec<T>),

    /// The dispatched matcher produced a parse.
    Success(Win<T>),

    /// The dispatched matcher has no (further) parse.
    Failure,
}

/// The payload of [`Message::Execute`].
#[derive(Debug, Clone)]
pub(crate) struct Exec<T> {
    /// The frame to push before dispatching the child; it receives the
    /// child's success or failure.
    pub parent: Frame<T>,
    /// The matcher to advance.
    pub child: MatcherId,
    /// [`State::Clean`] for a first entry, or a previously returned
    /// continuation to ask for the next alternative.
    pub state: State<T>,
    /// The position at which the child (re-)enters the input.
    pub pos: Pos,
}

/// The payload of [`Message::Success`].
#[derive(Debug, Clone)]
pub(crate) struct Win<T> {
    /// The continuation state; executing the matcher again with it yields
    /// the next alternative parse.
    pub state: State<T>,
    /// The position after the match. Never earlier than the entry
    /// position.
    pub pos: Pos,
    /// The semantic value of the match.
    pub value: Value<T>,
}

/// An entry on the trampoline's call stack: a parent suspended while a
/// child runs.
#[derive(Debug, Clone)]
pub(crate) enum Frame<T> {
    /// The sentinel below the root matcher; popping it ends the parse.
    Root,

    /// A matcher waiting on a child it delegated to. `entry` is the
    /// position at which that child was entered.
    Parent {
        matcher: MatcherId,
        state: State<T>,
        entry: Pos,
    },
}

/// The outcome of dispatching one message.
pub(crate) enum Step<T> {
    /// Keep going with this message.
    Next(Message<T>),

    /// A success left the root sentinel: one parse is complete. `state`
    /// resumes the root matcher for the next alternative.
    Accept {
        state: State<T>,
        pos: Pos,
        value: Value<T>,
    },

    /// A failure left the root sentinel: no (further) parse exists.
    Reject,
}

impl<T> Message<T> {
    /// Shorthand for a success message.
    pub fn success(state: State<T>, pos: Pos, value: Value<T>) -> Self {
        Self::Success(Win { state, pos, value })
    }
}
