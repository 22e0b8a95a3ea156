//! Defines the [`Input`] abstraction over the sequence being parsed.
//!
//! An input hands out opaque [`Pos`] handles identifying points *between*
//! tokens. The engine only ever asks three things of an input: where it
//! starts, whether a position is at the end, and what token follows a
//! position. Inputs are read-only for the duration of a parse.

use std::fmt;

/// An opaque handle into an input, identifying a point between two tokens.
///
/// Positions are totally ordered and comparable for equality. How the
/// underlying offset is measured is up to the input implementation: for
/// [`str`] it is a byte offset, for slices it is an element index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos(usize);

impl Pos {
    /// Construct a position from a raw offset.
    ///
    /// Only [`Input`] implementations should need this.
    #[inline]
    pub fn new(offset: usize) -> Self {
        Self(offset)
    }

    /// Returns the raw offset of this position.
    #[inline]
    pub fn offset(self) -> usize {
        self.0
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl serde::Serialize for Pos {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0 as u64)
    }
}

/// Implemented for anything usable as a single token of input.
///
/// This is a blanket trait; any cloneable, comparable, debuggable type is a
/// token.
pub trait Token: Clone + PartialEq + fmt::Debug {}

impl<T: Clone + PartialEq + fmt::Debug> Token for T {}

/// A read-only source of tokens.
pub trait Input {
    /// The token type this input yields.
    type Token: Token;

    /// The position before the first token.
    fn start(&self) -> Pos;

    /// Returns `true` if `pos` is past the last token.
    fn at_end(&self, pos: Pos) -> bool;

    /// Returns the token following `pos` and the position after it, or
    /// `None` at the end of the input.
    fn next(&self, pos: Pos) -> Option<(Self::Token, Pos)>;
}

impl Input for str {
    type Token = char;

    #[inline]
    fn start(&self) -> Pos {
        Pos(0)
    }

    #[inline]
    fn at_end(&self, pos: Pos) -> bool {
        pos.0 >= self.len()
    }

    #[inline]
    fn next(&self, pos: Pos) -> Option<(char, Pos)> {
        let c = self.get(pos.0..)?.chars().next()?;
        Some((c, Pos(pos.0 + c.len_utf8())))
    }
}

impl<T: Token> Input for [T] {
    type Token = T;

    #[inline]
    fn start(&self) -> Pos {
        Pos(0)
    }

    #[inline]
    fn at_end(&self, pos: Pos) -> bool {
        pos.0 >= self.len()
    }

    #[inline]
    fn next(&self, pos: Pos) -> Option<(T, Pos)> {
        let t = self.get(pos.0)?.clone();
        Some((t, Pos(pos.0 + 1)))
    }
}
