//! The trampoline: a frame stack and a loop that advances the parse one
//! message at a time.
//!
//! The machine is matcher-agnostic. It never inspects matcher variants,
//! only messages; the single invariant it owns is stack discipline (every
//! executed child is balanced by exactly one success or failure pop).
//! Everything else lives in the policy and the matcher transitions.

use crate::error::Error;
use crate::grammar::Grammar;
use crate::input::{Input, Pos};
use crate::run::policy::Dispatch;
use crate::run::Cancel;
use crate::types::message::{Frame, Message, Step};
use crate::types::state::State;
use crate::value::Value;
use crate::Result;

/// The trampoline's mutable state for one parse.
pub(crate) struct Machine<'g, I: Input + ?Sized> {
    pub grammar: &'g Grammar<I::Token>,
    pub input: &'g I,
    /// Parents suspended while a child runs, in LIFO order.
    frames: Vec<Frame<I::Token>>,
    /// High-water mark of input positions reached, for mismatch reports.
    deepest: Pos,
}

impl<'g, I: Input + ?Sized> Machine<'g, I> {
    pub fn new(grammar: &'g Grammar<I::Token>, input: &'g I) -> Self {
        Self {
            grammar,
            input,
            frames: Vec::new(),
            deepest: input.start(),
        }
    }

    /// Push a suspended parent; `pos` is where its child enters the input.
    pub fn push(&mut self, frame: Frame<I::Token>, pos: Pos) {
        self.touch(pos);
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Frame<I::Token> {
        match self.frames.pop() {
            Some(frame) => frame,
            None => panic!("frame stack underflow"),
        }
    }

    pub fn touch(&mut self, pos: Pos) {
        if pos > self.deepest {
            self.deepest = pos;
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn deepest(&self) -> Pos {
        self.deepest
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

/// How one trampoline run ended.
pub(crate) enum Verdict<T> {
    /// A parse completed. `state` resumes the root matcher for the next
    /// alternative.
    Match {
        state: State<T>,
        pos: Pos,
        value: Value<T>,
    },
    /// The grammar has no (further) parse of the input.
    Mismatch,
}

/// Drive the machine from `msg` until a success or failure leaves the
/// root sentinel.
///
/// A grammar or transform error aborts immediately: the frame stack is
/// discarded without resuming any of the suspended parents.
pub(crate) fn run<I>(
    m: &mut Machine<'_, I>,
    dispatch: &mut dyn Dispatch<I>,
    mut msg: Message<I::Token>,
    cancel: Option<&Cancel>,
) -> Result<Verdict<I::Token>>
where
    I: Input + ?Sized,
{
    loop {
        if cancel.map_or(false, Cancel::is_cancelled) {
            m.clear();
            return Err(Error::cancelled());
        }
        let step = match msg {
            Message::Execute(exec) => dispatch.on_execute(m, exec),
            Message::Success(win) => dispatch.on_success(m, win),
            Message::Failure => dispatch.on_failure(m),
        };
        match step {
            Ok(Step::Next(next)) => msg = next,
            Ok(Step::Accept { state, pos, value }) => {
                debug_assert_eq!(m.depth(), 0);
                return Ok(Verdict::Match { state, pos, value });
            }
            Ok(Step::Reject) => {
                debug_assert_eq!(m.depth(), 0);
                return Ok(Verdict::Mismatch);
            }
            Err(err) => {
                m.clear();
                return Err(err);
            }
        }
    }
}
