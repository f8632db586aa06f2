//! Normalising combinators over [`Expr`].
//!
//! `and` and `or` absorb their identity-like operands and append leaves to an
//! existing chain of the same operator instead of nesting. The two are
//! deliberately asymmetric: `and` only absorbs `True`, while `or` treats
//! `True`, `False` and `Undefined` alike as "nothing accumulated yet" and
//! returns the other side. Accumulation loops start from `True` for `and`
//! and from `False` or `Undefined` for `or`.

use super::Expr;

impl Expr {
    /// Conjunction of `self` and `other`.
    ///
    /// ```
    /// use crabquery::query::Expr;
    ///
    /// let expr = Expr::True
    ///     .and(Expr::Element(7))
    ///     .and(Expr::Degree(2))
    ///     .and(Expr::IsInRing);
    /// assert_eq!(expr.children().len(), 3);
    /// ```
    pub fn and(self, other: Expr) -> Expr {
        match (self, other) {
            (Expr::True, other) => other,
            (this, Expr::True) => this,
            (Expr::And(mut parts), Expr::And(more)) => {
                parts.extend(more);
                Expr::And(parts)
            }
            (Expr::And(mut parts), leaf) if !leaf.is_logical() => {
                parts.push(leaf);
                Expr::And(parts)
            }
            (this @ Expr::Or(_), leaf) if !leaf.is_logical() => Expr::And(vec![leaf, this]),
            (this, other) => Expr::And(vec![this, other]),
        }
    }

    /// Disjunction of `self` and `other`.
    pub fn or(self, other: Expr) -> Expr {
        match (self, other) {
            (Expr::True | Expr::False | Expr::Undefined, other) => other,
            (this, Expr::True | Expr::False | Expr::Undefined) => this,
            (Expr::Or(mut parts), Expr::Or(more)) => {
                parts.extend(more);
                Expr::Or(parts)
            }
            (Expr::Or(mut parts), leaf) if !leaf.is_logical() => {
                parts.push(leaf);
                Expr::Or(parts)
            }
            (this @ Expr::And(_), leaf) if !leaf.is_logical() => Expr::Or(vec![leaf, this]),
            (this, other) => Expr::Or(vec![this, other]),
        }
    }

    /// Logical complement.
    ///
    /// Complementary leaves swap directly and double negation unwraps; any
    /// other expression is wrapped in `Not`.
    pub fn negate(self) -> Expr {
        match self {
            Expr::True => Expr::False,
            Expr::False => Expr::True,
            Expr::IsAromatic => Expr::IsAliphatic,
            Expr::IsAliphatic => Expr::IsAromatic,
            Expr::IsInRing => Expr::IsInChain,
            Expr::IsInChain => Expr::IsInRing,
            Expr::HasIsotope => Expr::HasUnspecifiedIsotope,
            Expr::HasUnspecifiedIsotope => Expr::HasIsotope,
            Expr::Not(inner) => *inner,
            other => Expr::not(other),
        }
    }
}
