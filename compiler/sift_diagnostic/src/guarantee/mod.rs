//! Proof that at least one error diagnostic was recorded.

use std::fmt;

/// Zero-sized witness that an error was emitted.
///
/// Only obtainable through [`DiagnosticQueue`](crate::DiagnosticQueue) or
/// [`ErrorGuaranteed::from_error_count`], so a function returning
/// `Err(ErrorGuaranteed)` cannot fail silently.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// `Some` iff `count` is nonzero.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(Self::new)
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("error(s) emitted")
    }
}

impl std::error::Error for ErrorGuaranteed {}
