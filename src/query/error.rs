use thiserror::Error;

use super::ExprType;

/// Errors produced when constructing an [`Expr`](super::Expr).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A value was supplied to a kind that takes none.
    #[error("{0} does not take a value")]
    UnexpectedValue(ExprType),
    /// A value kind was built without its operand.
    #[error("{0} requires a value")]
    MissingValue(ExprType),
    /// The operand does not fit the kind's value domain.
    #[error("value {value} is out of range for {kind}")]
    ValueOutOfRange { kind: ExprType, value: i32 },
    /// A logical or recursive kind was requested from a leaf factory.
    #[error("{0} cannot be built as a leaf")]
    NotALeaf(ExprType),
    /// A leaf kind was requested from the logical factory.
    #[error("{0} is not a logical operator")]
    NotLogical(ExprType),
    /// Wrong number of children for a logical operator.
    #[error("{kind} takes {expected} operand(s), {given} supplied")]
    Arity {
        kind: ExprType,
        expected: usize,
        given: usize,
    },
    /// A recursive predicate was built from a query graph with no atoms.
    #[error("recursive query has no atoms")]
    EmptyRecursiveQuery,
}
