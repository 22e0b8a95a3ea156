//! A trampolined parser-combinator engine with pluggable execution
//! policies.
//!
//! # Overview
//!
//! A grammar is a directed acyclic graph of *matchers* (literal,
//! sequence, ordered choice, repetition, transform, late-bound
//! reference) built once with a [`GrammarBuilder`] and frozen into a
//! [`Grammar`].
//! Parsing never recurses through the host stack: matchers communicate by
//! returning messages, and a trampoline drives them with an explicit
//! stack of frames. That split buys three things:
//!
//! - Deeply nested grammars cost heap, not host stack.
//! - How parsing is *scheduled* is a pluggable [`Policy`]: plain
//!   backtracking, memoizing (which also tames left recursion), or
//!   restricted backtracking in the Parsec mould.
//! - Every step exposes the matcher, its state and the input position, so
//!   tracing is an [`Observer`] away instead of a rewrite.
//!
//! Parses are enumerable: a successful parse carries a continuation, and
//! [`Parse::iter`] lazily yields every parse of the input in a
//! deterministic order (declared order for choices, longest-first for
//! greedy repetitions, shortest-first for lazy ones).
//!
//! # Getting started
//!
//! Build a grammar, then parse:
//!
//! ```
//! let mut g = rebound::Grammar::builder();
//! let hello = g.literal("hello");
//! let world = g.literal("world");
//! let root = g.sequence([hello, world]);
//! let grammar = g.build(root)?;
//!
//! let outcome = grammar.parse("helloworld").first()?;
//! let m = outcome.into_match().unwrap();
//! assert_eq!(m.end.offset(), 10);
//! assert_eq!(
//!     m.value,
//!     rebound::Value::List(vec!["hello".into(), "world".into()]),
//! );
//! # Ok::<(), rebound::Error>(())
//! ```
//!
//! An input that does not match is not an error, it is an
//! [`Outcome::Mismatch`] carrying the deepest position the parse reached;
//! [`Error`] is reserved for defective grammars, failing transform
//! functions, and cancellation.
//!
//! # Enumerating parses
//!
//! ```
//! use rebound::Greed;
//!
//! let mut g = rebound::Grammar::builder();
//! let a = g.literal("a");
//! let root = g.repeat(a, 0, Some(3), Greed::Greedy);
//! let grammar = g.build(root)?;
//!
//! let ends: Vec<usize> = grammar
//!     .parse("aaaa")
//!     .require_full_input(false)
//!     .iter()
//!     .map(|m| Ok(m?.end.offset()))
//!     .collect::<rebound::Result<_>>()?;
//! assert_eq!(ends, [3, 2, 1, 0]);
//! # Ok::<(), rebound::Error>(())
//! ```
//!
//! # Recursive grammars
//!
//! Recursion goes through named references, bound with
//! [`define`][GrammarBuilder::define] and frozen at
//! [`build`][GrammarBuilder::build] time:
//!
//! ```
//! let mut g = rebound::Grammar::builder();
//! let a = g.literal("a");
//! let s = g.reference("S");
//! let more = g.sequence([a, s]);
//! let rule = g.choice([more, a]);
//! g.define("S", rule);
//! let grammar = g.build(rule)?;
//!
//! assert!(grammar.parse("aaa").first()?.is_match());
//! # Ok::<(), rebound::Error>(())
//! ```
//!
//! Left-recursive rules diverge under the default policy; run them with
//! [`Policy::Memoize`], which resolves a rule re-entered at the same
//! position conservatively instead of looping.
//!
//! # Transforming results
//!
//! ```
//! use rebound::Value;
//!
//! let mut g = rebound::Grammar::builder();
//! let digits = g.literal("42");
//! let number = g.map(digits, |v| match v {
//!     Value::String(s) => s.parse::<i64>().map(Value::Integer).map_err(|e| e.to_string()),
//!     other => Err(format!("expected a string, got {}", other.human())),
//! });
//! let grammar = g.build(number)?;
//!
//! let m = grammar.parse("42").first()?.into_match().unwrap();
//! assert_eq!(m.value, Value::Integer(42));
//! # Ok::<(), rebound::Error>(())
//! ```
//!
//! # Features
//!
//! - **serde** — Enables serialization of [`Value`] and [`Pos`] and pulls
//!   in the [`serde`] crate as a dependency.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod grammar;
mod input;
mod run;
mod types;
mod value;

pub use crate::error::Error;
pub use crate::grammar::{Grammar, GrammarBuilder};
pub use crate::input::{Input, Pos, Token};
pub use crate::run::{
    Cancel, Event, EventKind, LogObserver, Match, Mismatch, Observer, Outcome, Parse, Parses,
    Policy,
};
pub use crate::types::matcher::{Greed, MatcherId};
pub use crate::value::Value;

/// A type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;
