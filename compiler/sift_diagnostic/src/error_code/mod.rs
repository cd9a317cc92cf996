//! Error codes for engine diagnostics.
//!
//! The first digit names the phase that raised the code.

use std::fmt;

/// Error codes for all engine diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E2xxx: Construction-time typing and coercion errors
/// - E6xxx: Runtime evaluation errors
/// - W2xxx: Construction-time warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Construction errors (E2xxx)
    /// Type clash between operands or with an assignment target
    E2001,
    /// Arithmetic operand required or mixed with non-arithmetic
    E2002,
    /// Integral operand required
    E2003,
    /// Boolean operand required
    E2004,
    /// Illegal comparison
    E2005,
    /// Expression is not a modifiable lvalue
    E2006,
    /// Illegal coercion
    E2007,
    /// Record field error (unknown, orphaned, missing non-optional)
    E2008,
    /// Indexing mismatch
    E2009,
    /// Inconsistent element types in a constructor
    E2010,
    /// Bad function call (not a function, argument mismatch, no yield)
    E2011,
    /// Bad event invocation
    E2012,
    /// Unsupported cast
    E2013,
    /// Operator not applicable to the operand type
    E2014,
    /// Bad schedule expression
    E2015,

    // Runtime errors (E6xxx)
    /// Division by zero
    E6001,
    /// Modulo by zero
    E6002,
    /// Vector operands of different sizes
    E6003,
    /// Count underflow
    E6004,
    /// Unexpected runtime type
    E6010,
    /// Invalid cast or coercion of a concrete value
    E6011,
    /// Record field value missing
    E6020,
    /// No such index
    E6021,
    /// Illegal index assignment
    E6022,
    /// Value used but not set
    E6030,
    /// Call depth limit exceeded
    E6031,
    /// Evaluation budget exhausted
    E6032,
    /// Other runtime error
    E6099,

    // Warnings (W2xxx)
    /// Lossy assignment between arithmetic types
    W2001,
    /// Deprecated construct
    W2002,
}

impl ErrorCode {
    /// All codes, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E2013,
        ErrorCode::E2014,
        ErrorCode::E2015,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E6004,
        ErrorCode::E6010,
        ErrorCode::E6011,
        ErrorCode::E6020,
        ErrorCode::E6021,
        ErrorCode::E6022,
        ErrorCode::E6030,
        ErrorCode::E6031,
        ErrorCode::E6032,
        ErrorCode::E6099,
        ErrorCode::W2001,
        ErrorCode::W2002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6010 => "E6010",
            ErrorCode::E6011 => "E6011",
            ErrorCode::E6020 => "E6020",
            ErrorCode::E6021 => "E6021",
            ErrorCode::E6022 => "E6022",
            ErrorCode::E6030 => "E6030",
            ErrorCode::E6031 => "E6031",
            ErrorCode::E6032 => "E6032",
            ErrorCode::E6099 => "E6099",
            ErrorCode::W2001 => "W2001",
            ErrorCode::W2002 => "W2002",
        }
    }

    /// Check if this is a construction-time (typing) error.
    pub fn is_construction_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is a runtime evaluation error.
    pub fn is_eval_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }

    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
