use crate::bond::BondOrder;
use crate::mol::Mol;

use super::eval::{AtomRef, BondRef, StereoHint};
use super::Expr;

/// A query graph: atoms and bonds carry predicates instead of properties.
pub type QueryMol = Mol<QueryAtom, QueryBond>;

/// A query graph node.
///
/// `expr` decides matching. `symbol` and `is_aromatic` are hints copied from
/// the source atom for consumers that inspect properties rather than
/// evaluate predicates; they are never consulted by [`matches`](Self::matches).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAtom {
    pub expr: Expr,
    pub symbol: Option<&'static str>,
    pub is_aromatic: Option<bool>,
}

impl QueryAtom {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            symbol: None,
            is_aromatic: None,
        }
    }

    pub fn matches(&self, target: AtomRef<'_>) -> bool {
        self.expr.matches_atom(target, StereoHint::Unresolved)
    }

    pub fn matches_with_stereo(&self, target: AtomRef<'_>, stereo: StereoHint) -> bool {
        self.expr.matches_atom(target, stereo)
    }
}

impl From<Expr> for QueryAtom {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}

/// A query graph edge. Hints as for [`QueryAtom`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBond {
    pub expr: Expr,
    pub order: Option<BondOrder>,
    pub is_aromatic: Option<bool>,
}

impl QueryBond {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            order: None,
            is_aromatic: None,
        }
    }

    pub fn matches(&self, target: BondRef<'_>) -> bool {
        self.expr.matches_bond(target, StereoHint::Unresolved)
    }

    pub fn matches_with_stereo(&self, target: BondRef<'_>, stereo: StereoHint) -> bool {
        self.expr.matches_bond(target, stereo)
    }
}

impl From<Expr> for QueryBond {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}
