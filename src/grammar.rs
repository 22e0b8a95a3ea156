//! Grammar construction: the builder surface and the frozen [`Grammar`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::input::{Input, Token};
use crate::run::Parse;
use crate::types::matcher::{Greed, Matcher, MatcherId};
use crate::value::Value;
use crate::Result;

/// Builds the matcher DAG for a [`Grammar`].
///
/// Every constructor returns a [`MatcherId`]; later constructors take the
/// ids of earlier ones as children, so the DAG is acyclic by
/// construction. Recursion goes through
/// [`reference`][GrammarBuilder::reference] and
/// [`define`][GrammarBuilder::define] instead: a reference is resolved
/// by name against the binding table,
/// which [`build`][GrammarBuilder::build] freezes.
///
/// # Examples
///
/// ```
/// use rebound::Grammar;
///
/// let mut g = Grammar::builder();
/// let hello = g.literal("hello");
/// let world = g.literal("world");
/// let root = g.sequence([hello, world]);
/// let grammar = g.build(root)?;
/// # let _ = grammar;
/// # Ok::<(), rebound::Error>(())
/// ```
pub struct GrammarBuilder<T> {
    matchers: Vec<Matcher<T>>,
    rules: BTreeMap<Box<str>, MatcherId>,
}

impl<T: Token> Default for GrammarBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Token> GrammarBuilder<T> {
    /// Construct a new builder.
    pub fn new() -> Self {
        Self {
            matchers: Vec::new(),
            rules: BTreeMap::new(),
        }
    }

    /// A matcher that consumes exactly the given tokens.
    ///
    /// Its result is [`Value::Tokens`]. For grammars over characters,
    /// [`literal`][GrammarBuilder::literal] is usually more convenient.
    pub fn tokens<It>(&mut self, tokens: It) -> MatcherId
    where
        It: IntoIterator<Item = T>,
    {
        let tokens: Vec<T> = tokens.into_iter().collect();
        let value = Value::Tokens(tokens.clone());
        self.push(Matcher::Literal { tokens, value })
    }

    /// A matcher that matches the children left to right and produces the
    /// list of their results.
    pub fn sequence<It>(&mut self, children: It) -> MatcherId
    where
        It: IntoIterator<Item = MatcherId>,
    {
        let children = children.into_iter().collect();
        self.push(Matcher::Sequence { children })
    }

    /// A matcher that tries the alternatives in declared order and
    /// forwards the result of the one that matched.
    ///
    /// Ordered-choice semantics: every parse of an earlier alternative is
    /// enumerated before any parse of a later one.
    pub fn choice<It>(&mut self, alternatives: It) -> MatcherId
    where
        It: IntoIterator<Item = MatcherId>,
    {
        let alternatives = alternatives.into_iter().collect();
        self.push(Matcher::Choice { alternatives })
    }

    /// A matcher that matches `child` between `min` and `max` times
    /// (`None` for unbounded) and produces the list of its results.
    ///
    /// [`Greed::Greedy`] enumerates repetition counts longest first,
    /// [`Greed::Lazy`] shortest first. A repetition that consumes no
    /// input is never repeated.
    pub fn repeat(
        &mut self,
        child: MatcherId,
        min: usize,
        max: Option<usize>,
        greed: Greed,
    ) -> MatcherId {
        self.push(Matcher::Repeat {
            child,
            min,
            max,
            greed,
        })
    }

    /// A matcher that matches `child` zero or one times; shorthand for
    /// `repeat(child, 0, Some(1), Greed::Greedy)`.
    pub fn optional(&mut self, child: MatcherId) -> MatcherId {
        self.repeat(child, 0, Some(1), Greed::Greedy)
    }

    /// A matcher that delegates to `child` and applies `f` to its result.
    ///
    /// `f` must be pure. An `Err` from it aborts the whole parse with a
    /// transform error.
    pub fn map<F>(&mut self, child: MatcherId, f: F) -> MatcherId
    where
        F: Fn(Value<T>) -> std::result::Result<Value<T>, String> + Send + Sync + 'static,
    {
        self.push(Matcher::Transform {
            child,
            f: Arc::new(f),
        })
    }

    /// A matcher that delegates to `child` unchanged.
    ///
    /// Only meaningful under [`Policy::Restrict`][crate::Policy::Restrict],
    /// where a failure inside it is treated as if it had consumed no
    /// input; under other policies it is transparent.
    pub fn attempt(&mut self, child: MatcherId) -> MatcherId {
        self.push(Matcher::Attempt { child })
    }

    /// A late-bound matcher resolved by name, for recursive grammars.
    ///
    /// The name must be bound with [`define`][GrammarBuilder::define]
    /// before [`build`][GrammarBuilder::build] is called; it does not
    /// have to be bound yet when the reference is created.
    pub fn reference(&mut self, name: &str) -> MatcherId {
        self.push(Matcher::Reference { name: name.into() })
    }

    /// Bind `name` to `matcher` in the grammar's rule table. Rebinding a
    /// name replaces the previous binding.
    pub fn define(&mut self, name: &str, matcher: MatcherId) {
        self.rules.insert(name.into(), matcher);
    }

    /// Freeze the builder into a [`Grammar`] rooted at `root`.
    ///
    /// Validates the structure: every reference must be bound and every
    /// repetition's minimum must not exceed its maximum.
    pub fn build(self, root: MatcherId) -> Result<Grammar<T>> {
        let Self { matchers, rules } = self;
        if root.0 >= matchers.len() {
            return Err(Error::grammar("root matcher does not belong to this grammar"));
        }
        for matcher in &matchers {
            match matcher {
                Matcher::Reference { name } => {
                    if !rules.contains_key(name.as_ref()) {
                        return Err(Error::grammar("unresolved reference").with_rule(name));
                    }
                }
                Matcher::Repeat {
                    min,
                    max: Some(max),
                    ..
                } if min > max => {
                    return Err(Error::grammar(format!(
                        "repeat minimum {min} exceeds maximum {max}"
                    )));
                }
                _ => {}
            }
        }
        Ok(Grammar {
            matchers,
            rules,
            root,
        })
    }

    fn push(&mut self, matcher: Matcher<T>) -> MatcherId {
        let id = MatcherId(self.matchers.len());
        self.matchers.push(matcher);
        id
    }
}

impl GrammarBuilder<char> {
    /// A matcher that consumes exactly the characters of `s` and produces
    /// [`Value::String`] of them.
    pub fn literal(&mut self, s: &str) -> MatcherId {
        let tokens: Vec<char> = s.chars().collect();
        let value = Value::String(String::from(s));
        self.push(Matcher::Literal { tokens, value })
    }
}

/// A frozen grammar: an immutable DAG of matchers and a rule table.
///
/// Grammars are immutable and freely shareable; one grammar can serve any
/// number of parses, including concurrently (each parse carries its own
/// state).
pub struct Grammar<T> {
    matchers: Vec<Matcher<T>>,
    rules: BTreeMap<Box<str>, MatcherId>,
    root: MatcherId,
}

impl<T: Token> Grammar<T> {
    /// Construct a new builder.
    pub fn builder() -> GrammarBuilder<T> {
        GrammarBuilder::new()
    }

    /// Begin a parse of `input`.
    ///
    /// Returns a [`Parse`] to configure and run.
    pub fn parse<'g, I>(&'g self, input: &'g I) -> Parse<'g, I>
    where
        I: Input<Token = T> + ?Sized,
    {
        Parse::new(self, input)
    }

    pub(crate) fn matcher(&self, id: MatcherId) -> &Matcher<T> {
        &self.matchers[id.0]
    }

    pub(crate) fn resolve(&self, name: &str) -> Result<MatcherId> {
        match self.rules.get(name) {
            Some(&id) => Ok(id),
            None => Err(Error::grammar("unresolved reference").with_rule(name)),
        }
    }

    pub(crate) fn root(&self) -> MatcherId {
        self.root
    }
}

impl<T: fmt::Debug> fmt::Debug for Grammar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("matchers", &self.matchers)
            .field("rules", &self.rules)
            .field("root", &self.root)
            .finish()
    }
}
