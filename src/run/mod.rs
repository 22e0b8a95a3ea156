//! The parse surface: configure a parse, run it, and enumerate results.

pub(crate) mod core;
pub(crate) mod memo;
pub(crate) mod policy;
pub(crate) mod step;
mod trace;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use crate::run::trace::{Event, EventKind, LogObserver, Observer};

use crate::grammar::Grammar;
use crate::input::{Input, Pos};
use crate::run::core::{Machine, Verdict};
use crate::run::memo::Memo;
use crate::run::policy::{Backtrack, Dispatch, Restrict};
use crate::run::trace::Trace;
use crate::types::message::{Exec, Frame, Message};
use crate::types::state::State;
use crate::value::Value;
use crate::Result;

/// Selects the execution policy for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Plain depth-first backtracking.
    Backtrack,

    /// Backtracking with memoization: each (matcher, state, position)
    /// outcome is computed once. Also the policy to use for
    /// left-recursive grammars, which it resolves conservatively (a rule
    /// re-entered at the same derivation point fails) instead of
    /// diverging.
    Memoize,

    /// Restricted backtracking: once an alternative of a choice has
    /// consumed input, its failure skips the remaining alternatives.
    /// Wrapping a matcher in [`attempt`][crate::GrammarBuilder::attempt]
    /// locally restores full backtracking.
    Restrict,
}

impl Default for Policy {
    fn default() -> Self {
        Self::Backtrack
    }
}

/// A handle for abandoning a parse from outside.
///
/// Clone it, hand one clone to [`Parse::cancel`], and call
/// [`cancel`][Cancel::cancel] on the other (from a timer, another thread,
/// a signal handler) to make the parse stop at its next step with a
/// cancellation error.
#[derive(Debug, Clone, Default)]
pub struct Cancel(Arc<AtomicBool>);

impl Cancel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the parse be abandoned.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A successful parse: the value produced and the position after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<T> {
    pub value: Value<T>,
    pub end: Pos,
}

/// A failed parse, annotated with the deepest input position reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub deepest: Pos,
}

/// The verdict of a single parse.
///
/// Note that a mismatch is normal program flow, not an error; see
/// [`Error`][crate::Error] for the conditions that are.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Match(Match<T>),
    Mismatch(Mismatch),
}

impl<T> Outcome<T> {
    /// Returns `true` if the parse succeeded.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }

    /// Returns the match, if the parse succeeded.
    pub fn into_match(self) -> Option<Match<T>> {
        match self {
            Self::Match(m) => Some(m),
            Self::Mismatch(_) => None,
        }
    }
}

/// A configured parse of one input by one grammar.
///
/// This struct is created by [`Grammar::parse`]; configure it with the
/// builder methods, then run it with [`first`][Parse::first] or
/// [`iter`][Parse::iter].
#[must_use = "must call `.first()` or `.iter()` on the parse"]
pub struct Parse<'g, I: Input + ?Sized> {
    grammar: &'g Grammar<I::Token>,
    input: &'g I,
    policy: Policy,
    require_full: bool,
    cancel: Option<Cancel>,
    observer: Option<Box<dyn Observer + 'g>>,
}

impl<'g, I: Input + ?Sized> Parse<'g, I> {
    pub(crate) fn new(grammar: &'g Grammar<I::Token>, input: &'g I) -> Self {
        Self {
            grammar,
            input,
            policy: Policy::default(),
            require_full: true,
            cancel: None,
            observer: None,
        }
    }

    /// Set the execution policy. Defaults to [`Policy::Backtrack`].
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Shorthand for selecting [`Policy::Memoize`] (or, with `false`,
    /// [`Policy::Backtrack`]).
    pub fn memoize(self, yes: bool) -> Self {
        self.policy(if yes { Policy::Memoize } else { Policy::Backtrack })
    }

    /// Whether a parse must consume the entire input to count.
    ///
    /// Defaults to `true`. With it set, [`first`][Parse::first] reports a
    /// mismatch when the first parse leaves input behind, and
    /// [`iter`][Parse::iter] silently skips partial parses.
    pub fn require_full_input(mut self, yes: bool) -> Self {
        self.require_full = yes;
        self
    }

    /// Install a cancellation handle, checked before every step.
    pub fn cancel(mut self, cancel: Cancel) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Install a diagnostic observer, invoked before every dispatch.
    pub fn observe(mut self, observer: impl Observer + 'g) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Run the parse and return its first outcome.
    pub fn first(self) -> Result<Outcome<I::Token>> {
        let Self {
            grammar,
            input,
            policy,
            require_full,
            cancel,
            observer,
        } = self;
        let mut machine = Machine::new(grammar, input);
        let mut dispatch = make_dispatch(policy, observer);
        let msg = bootstrap(grammar, input, State::Clean);
        match core::run(&mut machine, dispatch.as_mut(), msg, cancel.as_ref())? {
            Verdict::Match { pos, value, .. } => {
                if require_full && !input.at_end(pos) {
                    Ok(Outcome::Mismatch(Mismatch {
                        deepest: machine.deepest(),
                    }))
                } else {
                    Ok(Outcome::Match(Match { value, end: pos }))
                }
            }
            Verdict::Mismatch => Ok(Outcome::Mismatch(Mismatch {
                deepest: machine.deepest(),
            })),
        }
    }

    /// Enumerate every parse of the input, lazily.
    ///
    /// Each call to [`next`][Iterator::next] resumes the engine until the
    /// next parse completes, so the work is bounded by how far the caller
    /// iterates. The sequence is finite exactly when the grammar is
    /// finitely ambiguous on the input. A grammar error or a cancellation
    /// yields one `Err` and ends the sequence.
    pub fn iter(self) -> Parses<'g, I> {
        let Self {
            grammar,
            input,
            policy,
            require_full,
            cancel,
            observer,
        } = self;
        Parses {
            machine: Machine::new(grammar, input),
            dispatch: make_dispatch(policy, observer),
            next_msg: Some(bootstrap(grammar, input, State::Clean)),
            require_full,
            cancel,
        }
    }
}

fn make_dispatch<'g, I: Input + ?Sized + 'g>(
    policy: Policy,
    observer: Option<Box<dyn Observer + 'g>>,
) -> Box<dyn Dispatch<I> + 'g> {
    let base: Box<dyn Dispatch<I> + 'g> = match policy {
        Policy::Backtrack => Box::new(Backtrack),
        Policy::Memoize => Box::new(Memo::new()),
        Policy::Restrict => Box::new(Restrict::new()),
    };
    match observer {
        Some(observer) => Box::new(Trace { base, observer }),
        None => base,
    }
}

/// The message that starts (or resumes) a run: execute the root matcher
/// on behalf of the root sentinel.
fn bootstrap<T, I>(grammar: &Grammar<T>, input: &I, state: State<T>) -> Message<T>
where
    I: Input<Token = T> + ?Sized,
    T: crate::input::Token,
{
    Message::Execute(Exec {
        parent: Frame::Root,
        child: grammar.root(),
        state,
        pos: input.start(),
    })
}

/// A lazy iterator over every parse of an input.
///
/// Created by [`Parse::iter`]. Yields one [`Match`] per successful parse,
/// in the enumeration order fixed by the matcher semantics.
pub struct Parses<'g, I: Input + ?Sized> {
    machine: Machine<'g, I>,
    dispatch: Box<dyn Dispatch<I> + 'g>,
    next_msg: Option<Message<I::Token>>,
    require_full: bool,
    cancel: Option<Cancel>,
}

impl<'g, I: Input + ?Sized> Iterator for Parses<'g, I> {
    type Item = Result<Match<I::Token>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let msg = self.next_msg.take()?;
            match core::run(
                &mut self.machine,
                self.dispatch.as_mut(),
                msg,
                self.cancel.as_ref(),
            ) {
                Ok(Verdict::Match { state, pos, value }) => {
                    let grammar = self.machine.grammar;
                    let input = self.machine.input;
                    self.next_msg = Some(bootstrap(grammar, input, state));
                    if self.require_full && !input.at_end(pos) {
                        continue;
                    }
                    return Some(Ok(Match { value, end: pos }));
                }
                Ok(Verdict::Mismatch) => return None,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
