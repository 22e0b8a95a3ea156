/// An error that can occur during grammar construction or parsing.
///
/// Note that an input that simply does not match the grammar is *not* an
/// error; it is reported as [`Outcome::Mismatch`][crate::Outcome::Mismatch].
/// An `Error` means the parse could not run to a verdict at all.
pub struct Error {
    /// The type of error.
    kind: ErrorKind,

    /// Optional rule name, when the error can be pinned to a named rule.
    rule: Option<String>,

    /// Optional additional reason for this kind of error.
    reason: Option<String>,
}

#[derive(Debug)]
enum ErrorKind {
    /// The grammar itself is defective.
    ///
    /// This can happen for a variety of reasons: an unresolved reference, a
    /// repetition whose minimum exceeds its maximum, and similar structural
    /// problems. The reason field on the parent `Error` carries the exact
    /// failure.
    Grammar,

    /// A transform function returned an error.
    ///
    /// Transform functions are supplied by the grammar author; when one of
    /// them fails the parse is abandoned and its message is carried here.
    Transform,

    /// The parse was abandoned via the cancellation flag.
    Cancelled,
}

impl Error {
    /// Constructs a new grammar error.
    pub(crate) fn grammar(reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Grammar,
            rule: None,
            reason: Some(reason.into()),
        }
    }

    /// Constructs a new transform error.
    pub(crate) fn transform(reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transform,
            rule: None,
            reason: Some(reason.into()),
        }
    }

    /// Constructs a cancellation marker.
    pub(crate) fn cancelled() -> Self {
        Self {
            kind: ErrorKind::Cancelled,
            rule: None,
            reason: None,
        }
    }

    /// Attaches a rule name to the error, if it is not already set.
    pub(crate) fn with_rule(mut self, name: &str) -> Self {
        self.rule.get_or_insert_with(|| name.into());
        self
    }

    /// Returns `true` if this error was caused by the cancellation flag.
    ///
    /// Cancellation is not a defect; callers enumerating parses typically
    /// want to distinguish it from a genuine grammar error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }
}

impl std::error::Error for Error {}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("rule", &self.rule)
            .field("reason", &self.reason)
            .finish()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match &self.kind {
            ErrorKind::Grammar => "grammar error",
            ErrorKind::Transform => "transform error",
            ErrorKind::Cancelled => "parse cancelled",
        };
        match (&self.rule, &self.reason) {
            (Some(rule), Some(reason)) => write!(f, "{msg} in rule `{rule}`: {reason}"),
            (None, Some(reason)) => write!(f, "{msg}: {reason}"),
            _ => write!(f, "{msg}"),
        }
    }
}
