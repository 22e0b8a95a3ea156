//! Defines a [`Matcher`], one node of the grammar DAG.
//!
//! Matchers are stored in an arena inside the grammar and referred to by
//! [`MatcherId`]. Ids are handed out by the builder in construction order,
//! so a matcher can only refer to matchers built before it; the DAG is
//! therefore acyclic by construction, except through [`Matcher::Reference`]
//! nodes which are resolved by name at dispatch time.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Identifies a matcher within one grammar.
///
/// Ids are returned by the [`GrammarBuilder`][crate::GrammarBuilder]
/// constructor methods and are only meaningful for the grammar that
/// produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatcherId(pub(crate) usize);

impl fmt::Debug for MatcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a repetition enumerates its parses longest first or shortest
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greed {
    /// Consume as many repetitions as possible, giving them back one at a
    /// time on resumption.
    Greedy,
    /// Start with as few repetitions as allowed, growing on resumption.
    Lazy,
}

/// A transform function supplied by the grammar author.
///
/// Must be pure; a returned error aborts the whole parse.
pub(crate) type TransformFn<T> =
    Arc<dyn Fn(Value<T>) -> Result<Value<T>, String> + Send + Sync>;

/// An immutable node of the grammar DAG.
pub(crate) enum Matcher<T> {
    /// Consumes exactly the given tokens or fails. `value` is the
    /// precomputed result, fixed at construction time.
    Literal { tokens: Vec<T>, value: Value<T> },

    /// Matches the children left to right.
    Sequence { children: Vec<MatcherId> },

    /// Tries the alternatives in declared order.
    Choice { alternatives: Vec<MatcherId> },

    /// Matches the child between `min` and `max` times. `max` of `None`
    /// means unbounded.
    Repeat {
        child: MatcherId,
        min: usize,
        max: Option<usize>,
        greed: Greed,
    },

    /// Delegates to the child and applies `f` to its result.
    Transform { child: MatcherId, f: TransformFn<T> },

    /// A late-bound matcher, resolved against the grammar's binding table.
    Reference { name: Box<str> },

    /// Delegates to the child unchanged. Under the restricted policy a
    /// failure leaving this subtree is treated as if it had consumed no
    /// input.
    Attempt { child: MatcherId },
}

impl<T: fmt::Debug> fmt::Debug for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { tokens, .. } => f.debug_tuple("Literal").field(tokens).finish(),
            Self::Sequence { children } => f.debug_tuple("Sequence").field(children).finish(),
            Self::Choice { alternatives } => f.debug_tuple("Choice").field(alternatives).finish(),
            Self::Repeat {
                child,
                min,
                max,
                greed,
            } => f
                .debug_struct("Repeat")
                .field("child", child)
                .field("min", min)
                .field("max", max)
                .field("greed", greed)
                .finish(),
            Self::Transform { child, .. } => f.debug_tuple("Transform").field(child).finish(),
            Self::Reference { name } => f.debug_tuple("Reference").field(name).finish(),
            Self::Attempt { child } => f.debug_tuple("Attempt").field(child).finish(),
        }
    }
}
