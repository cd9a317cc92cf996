//! Regular-expression pattern values.

use std::fmt;
use std::sync::Arc;

use regex::bytes::{Regex, RegexBuilder};

use super::ContainerError;

struct PatternInner {
    text: Arc<str>,
    exact: Regex,
    anywhere: Regex,
}

/// A compiled pattern usable for exact and substring matching.
#[derive(Clone)]
pub struct PatternVal(Arc<PatternInner>);

impl PatternVal {
    pub fn new(text: &str) -> Result<Self, ContainerError> {
        let exact = compile(&format!("^(?:{text})$"))?;
        let anywhere = compile(&format!("(?:{text})"))?;
        Ok(PatternVal(Arc::new(PatternInner {
            text: Arc::from(text),
            exact,
            anywhere,
        })))
    }

    pub fn text(&self) -> &str {
        &self.0.text
    }

    /// The whole input must match.
    pub fn match_exactly(&self, input: &[u8]) -> bool {
        self.0.exact.is_match(input)
    }

    /// Some substring of the input must match.
    pub fn match_anywhere(&self, input: &[u8]) -> bool {
        self.0.anywhere.is_match(input)
    }

    /// `p & q`: matches a `p` match immediately followed by a `q` match.
    pub fn conjunction(&self, other: &PatternVal) -> Result<Self, ContainerError> {
        PatternVal::new(&format!("(?:{})(?:{})", self.text(), other.text()))
    }

    /// `p | q`: matches either.
    pub fn disjunction(&self, other: &PatternVal) -> Result<Self, ContainerError> {
        PatternVal::new(&format!("(?:{})|(?:{})", self.text(), other.text()))
    }
}

fn compile(source: &str) -> Result<Regex, ContainerError> {
    RegexBuilder::new(source)
        .unicode(false)
        .build()
        .map_err(|e| ContainerError::Pattern(e.to_string()))
}

impl fmt::Display for PatternVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.text())
    }
}
