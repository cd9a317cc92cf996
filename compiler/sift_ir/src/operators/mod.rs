//! Expression kinds and operators.
//!
//! [`ExprTag`] order is significant: operand canonicalization compares tags
//! to decide which operand of a commutative operator goes first.

use std::fmt;

/// Discriminant of every expression kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub enum ExprTag {
    Name,
    Const,
    Clone,
    Incr,
    Decr,
    Not,
    Complement,
    Positive,
    Negate,
    Add,
    Sub,
    AddTo,
    RemoveFrom,
    Times,
    Divide,
    Mod,
    And,
    Or,
    Xor,
    AndAnd,
    OrOr,
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
    Cond,
    Ref,
    Assign,
    Index,
    Field,
    HasField,
    RecordConstructor,
    TableConstructor,
    SetConstructor,
    VectorConstructor,
    FieldAssign,
    In,
    List,
    Call,
    Lambda,
    Event,
    Schedule,
    ArithCoerce,
    RecordCoerce,
    TableCoerce,
    VectorCoerce,
    Size,
    Flatten,
    Cast,
    Is,
    IndexSliceAssign,
    Default,
}

impl ExprTag {
    /// Short operator-like name used when describing a node.
    pub const fn name(self) -> &'static str {
        match self {
            ExprTag::Name => "name",
            ExprTag::Const => "const",
            ExprTag::Clone => "copy",
            ExprTag::Incr => "++",
            ExprTag::Decr => "--",
            ExprTag::Not => "!",
            ExprTag::Complement => "~",
            ExprTag::Positive | ExprTag::Add => "+",
            ExprTag::Negate | ExprTag::Sub => "-",
            ExprTag::AddTo => "+=",
            ExprTag::RemoveFrom => "-=",
            ExprTag::Times => "*",
            ExprTag::Divide => "/",
            ExprTag::Mod => "%",
            ExprTag::And => "&",
            ExprTag::Or => "|",
            ExprTag::Xor => "^",
            ExprTag::AndAnd => "&&",
            ExprTag::OrOr => "||",
            ExprTag::Lt => "<",
            ExprTag::Le => "<=",
            ExprTag::Eq => "==",
            ExprTag::Ne => "!=",
            ExprTag::Ge => ">=",
            ExprTag::Gt => ">",
            ExprTag::Cond => "?:",
            ExprTag::Ref => "ref",
            ExprTag::Assign => "=",
            ExprTag::Index => "[]",
            ExprTag::Field => "$",
            ExprTag::HasField => "?$",
            ExprTag::RecordConstructor => "[=]",
            ExprTag::TableConstructor => "table()",
            ExprTag::SetConstructor => "set()",
            ExprTag::VectorConstructor => "vector()",
            ExprTag::FieldAssign => "$=",
            ExprTag::In => "in",
            ExprTag::List => "<<>>",
            ExprTag::Call => "()",
            ExprTag::Lambda => "function()",
            ExprTag::Event => "event",
            ExprTag::Schedule => "schedule",
            ExprTag::ArithCoerce => "coerce",
            ExprTag::RecordCoerce => "record_coerce",
            ExprTag::TableCoerce => "table_coerce",
            ExprTag::VectorCoerce => "vector_coerce",
            ExprTag::Size => "sizeof",
            ExprTag::Flatten => "flatten",
            ExprTag::Cast => "cast",
            ExprTag::Is => "is",
            ExprTag::IndexSliceAssign => "[:]=",
            ExprTag::Default => "&default",
        }
    }

    /// Tags whose evaluation never maps element-wise over a vector operand.
    pub const fn is_vector_opaque(self) -> bool {
        matches!(self, ExprTag::Is | ExprTag::Cast)
    }
}

impl fmt::Display for ExprTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unary operators with a value fold.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Negate,
    Positive,
    Complement,
    Not,
    Clone,
    Size,
}

impl UnaryOp {
    pub const fn tag(self) -> ExprTag {
        match self {
            UnaryOp::Negate => ExprTag::Negate,
            UnaryOp::Positive => ExprTag::Positive,
            UnaryOp::Complement => ExprTag::Complement,
            UnaryOp::Not => ExprTag::Not,
            UnaryOp::Clone => ExprTag::Clone,
            UnaryOp::Size => ExprTag::Size,
        }
    }
}

/// Binary operators with a value fold.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    AddTo,
    RemoveFrom,
    Times,
    Divide,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    AndAnd,
    OrOr,
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
    In,
}

impl BinaryOp {
    pub const fn tag(self) -> ExprTag {
        match self {
            BinaryOp::Add => ExprTag::Add,
            BinaryOp::Sub => ExprTag::Sub,
            BinaryOp::AddTo => ExprTag::AddTo,
            BinaryOp::RemoveFrom => ExprTag::RemoveFrom,
            BinaryOp::Times => ExprTag::Times,
            BinaryOp::Divide => ExprTag::Divide,
            BinaryOp::Mod => ExprTag::Mod,
            BinaryOp::BitAnd => ExprTag::And,
            BinaryOp::BitOr => ExprTag::Or,
            BinaryOp::BitXor => ExprTag::Xor,
            BinaryOp::AndAnd => ExprTag::AndAnd,
            BinaryOp::OrOr => ExprTag::OrOr,
            BinaryOp::Lt => ExprTag::Lt,
            BinaryOp::Le => ExprTag::Le,
            BinaryOp::Eq => ExprTag::Eq,
            BinaryOp::Ne => ExprTag::Ne,
            BinaryOp::Ge => ExprTag::Ge,
            BinaryOp::Gt => ExprTag::Gt,
            BinaryOp::In => ExprTag::In,
        }
    }

    /// Source-level spelling.
    pub const fn as_symbol(self) -> &'static str {
        self.tag().name()
    }

    /// Operators whose fold yields `bool` regardless of operand type.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Ge
                | BinaryOp::Gt
        )
    }

    /// Compound assignment forms (`+=`, `-=`).
    pub const fn is_compound_assign(self) -> bool {
        matches!(self, BinaryOp::AddTo | BinaryOp::RemoveFrom)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

#[cfg(test)]
mod tests;
