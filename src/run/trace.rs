//! Diagnostic hooks: observers invoked on every dispatch.

use crate::input::{Input, Pos};
use crate::run::core::Machine;
use crate::run::policy::Dispatch;
use crate::types::matcher::MatcherId;
use crate::types::message::{Exec, Step, Win};
use crate::Result;

/// The kind of message a dispatch is about to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Execute,
    Success,
    Failure,
}

/// A snapshot of one dispatch, handed to observers.
#[derive(Debug, Clone)]
pub struct Event {
    /// The message variant being dispatched.
    pub kind: EventKind,
    /// The matcher about to be advanced. `None` for success and failure
    /// events, which concern whichever frame is on top of the stack.
    pub matcher: Option<MatcherId>,
    /// The trampoline stack depth at the time of the event.
    pub depth: usize,
    /// The input position carried by the message, if any.
    pub pos: Option<Pos>,
}

/// Invoked before every dispatch when installed via
/// [`Parse::observe`][crate::Parse::observe].
///
/// Observers see events, never messages, and so cannot interfere with the
/// parse. Any `FnMut(&Event)` closure is an observer.
pub trait Observer {
    fn on_step(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> Observer for F {
    fn on_step(&mut self, event: &Event) {
        self(event)
    }
}

/// An observer that forwards every event to [`log::trace!`] under the
/// `rebound` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_step(&mut self, event: &Event) {
        match event.matcher {
            Some(matcher) => log::trace!(
                target: "rebound",
                "{:?} {:?} depth={} pos={:?}",
                event.kind,
                matcher,
                event.depth,
                event.pos,
            ),
            None => log::trace!(
                target: "rebound",
                "{:?} depth={} pos={:?}",
                event.kind,
                event.depth,
                event.pos,
            ),
        }
    }
}

/// A policy wrapper that reports every dispatch to an observer before
/// delegating to the base policy.
pub(crate) struct Trace<'a, I: Input + ?Sized> {
    pub base: Box<dyn Dispatch<I> + 'a>,
    pub observer: Box<dyn Observer + 'a>,
}

impl<'a, I: Input + ?Sized> Dispatch<I> for Trace<'a, I> {
    fn on_execute(
        &mut self,
        m: &mut Machine<'_, I>,
        exec: Exec<I::Token>,
    ) -> Result<Step<I::Token>> {
        self.observer.on_step(&Event {
            kind: EventKind::Execute,
            matcher: Some(exec.child),
            depth: m.depth(),
            pos: Some(exec.pos),
        });
        self.base.on_execute(m, exec)
    }

    fn on_success(&mut self, m: &mut Machine<'_, I>, win: Win<I::Token>) -> Result<Step<I::Token>> {
        self.observer.on_step(&Event {
            kind: EventKind::Success,
            matcher: None,
            depth: m.depth(),
            pos: Some(win.pos),
        });
        self.base.on_success(m, win)
    }

    fn on_failure(&mut self, m: &mut Machine<'_, I>) -> Result<Step<I::Token>> {
        self.observer.on_step(&Event {
            kind: EventKind::Failure,
            matcher: None,
            depth: m.depth(),
            pos: None,
        });
        self.base.on_failure(m)
    }
}
