//! Defines a [`State`], the matcher-local progress record.
//!
//! States are immutable values: advancing a matcher consumes its state and
//! produces a new one. A matcher entered with [`State::Clean`] is starting
//! from scratch; entered with any other state it is being asked for its
//! next alternative parse. The [`Shape`] of a state is its structural
//! fingerprint, used as part of a memo key.

use crate::input::Pos;
use crate::value::Value;

/// A matcher-local progress record.
#[derive(Debug, Clone)]
pub(crate) enum State<T> {
    /// First entry; every matcher starts here.
    Clean,

    /// A terminal matcher that has produced its only parse.
    Done,

    /// Sequence progress: one item per completed child, in order.
    Seq(Vec<Item<T>>),

    /// Choice waiting on the alternative at this index.
    Trying(usize),

    /// Choice continuation: the alternative that produced the last parse
    /// and its own continuation.
    Tried(usize, Box<State<T>>),

    /// Repetition progress.
    Rep(RepState<T>),

    /// A single-child wrapper waiting on its child.
    Wrap,

    /// A single-child wrapper's continuation, holding the child's.
    Wrapped(Box<State<T>>),
}

/// A completed child parse, as remembered by sequence and repetition
/// ladders: enough to resume the child for its next alternative and to
/// rebuild the accumulated result.
#[derive(Debug, Clone)]
pub(crate) struct Item<T> {
    /// The child's continuation state.
    pub state: State<T>,
    /// The position at which the child was entered.
    pub entry: Pos,
    /// The value the child produced.
    pub value: Value<T>,
}

/// Progress of a repetition.
#[derive(Debug, Clone)]
pub(crate) struct RepState<T> {
    /// One entry per completed repetition.
    pub items: Vec<Item<T>>,
    /// The position after the last completed repetition; equal to the
    /// repetition's entry position when `items` is empty.
    pub end: Pos,
    /// What the in-flight child attempt is doing. Meaningful only while a
    /// frame is waiting on a child.
    pub phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// The child was entered clean, to add a repetition.
    Grow,
    /// A completed repetition was popped and its child re-entered for its
    /// next alternative.
    Shrink,
}

impl<T> RepState<T> {
    pub fn new(end: Pos, phase: Phase) -> Self {
        Self {
            items: Vec::new(),
            end,
            phase,
        }
    }

    /// The accumulated result list.
    pub fn values(&self) -> Value<T>
    where
        T: Clone,
    {
        Value::List(self.items.iter().map(|it| it.value.clone()).collect())
    }
}

/// The structural fingerprint of a [`State`]: variant tags, indices and
/// positions, with semantic values elided.
///
/// Two states with the same shape at the same matcher and position denote
/// the same derivation point, because a matcher's outcome is a pure
/// function of (matcher, position, input) and continuations are reached by
/// value-independent chains of such outcomes. This is what makes shapes
/// usable as memo keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Shape {
    Clean,
    Done,
    Seq(Vec<(Shape, Pos)>),
    Trying(usize),
    Tried(usize, Box<Shape>),
    Rep(Vec<(Shape, Pos)>, Pos),
    Wrap,
    Wrapped(Box<Shape>),
}

impl Shape {
    pub fn of<T>(state: &State<T>) -> Self {
        match state {
            State::Clean => Self::Clean,
            State::Done => Self::Done,
            State::Seq(items) => Self::Seq(items.iter().map(Self::of_item).collect()),
            State::Trying(i) => Self::Trying(*i),
            State::Tried(i, child) => Self::Tried(*i, Box::new(Self::of(child))),
            State::Rep(rep) => Self::Rep(
                rep.items.iter().map(Self::of_item).collect(),
                rep.end,
            ),
            State::Wrap => Self::Wrap,
            State::Wrapped(child) => Self::Wrapped(Box::new(Self::of(child))),
        }
    }

    fn of_item<T>(item: &Item<T>) -> (Shape, Pos) {
        (Self::of(&item.state), item.entry)
    }
}
