use std::borrow::Cow;

use tracing::debug;

use crate::mol::AtomId;

use super::atom::QueryMol;
use super::Expr;

/// A query atom that asserts nothing but "hydrogen".
fn is_plain_hydrogen(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Element(1) | Expr::AliphaticElement(1) | Expr::AromaticElement(1)
    )
}

/// A bond query that a single bond to a hydrogen satisfies unconditionally.
fn is_single_bond(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::True
            | Expr::Order(1)
            | Expr::AliphaticOrder(1)
            | Expr::SingleOrAromatic
            | Expr::SingleOrDouble
    )
}

/// Folds terminal plain-hydrogen query atoms into their neighbor.
///
/// A hydrogen qualifies when its predicate is exactly an element test for
/// hydrogen, it has a single neighbor, and the bond predicate is a plain
/// single bond. For a neighbor that loses `h` hydrogens the predicate gains
/// `NOT(TOTAL_H_COUNT=k)` for every `k` below `h`, i.e. "at least `h`
/// hydrogens". Removed hydrogens that were stereo carriers become implicit
/// hydrogen carriers on their neighbor.
///
/// Returns the input unchanged, borrowed, when nothing qualifies; applying
/// the pass to its own output is therefore a no-op.
pub fn suppress_query_hydrogens(query: &QueryMol) -> Cow<'_, QueryMol> {
    let n = query.atom_count();
    let mut removable = vec![false; n];
    let mut removed_h = vec![0u8; n];

    for idx in query.atoms() {
        if !is_plain_hydrogen(&query.atom(idx).expr) {
            continue;
        }
        let mut bonded = query.bonded(idx);
        let (Some((edge, owner)), None) = (bonded.next(), bonded.next()) else {
            continue;
        };
        if !is_single_bond(&query.bond(edge).expr) {
            continue;
        }
        // H-H: keep both
        if is_plain_hydrogen(&query.atom(owner).expr) && query.degree(owner) == 1 {
            continue;
        }
        removable[idx.index()] = true;
        removed_h[owner.index()] = removed_h[owner.index()].saturating_add(1);
    }

    let total: usize = removed_h.iter().map(|&h| h as usize).sum();
    if total == 0 {
        return Cow::Borrowed(query);
    }

    let (mut result, index_map) =
        query.without_atoms(&removable, |owner, _| Some(AtomId::VirtualH(owner, 0)));

    for old in query.atoms() {
        let h = removed_h[old.index()];
        if h == 0 {
            continue;
        }
        let Some(new) = index_map[old.index()] else {
            continue;
        };
        let at_least = (0..h).fold(Expr::True, |acc, k| acc.and(Expr::TotalHCount(k).negate()));
        let atom = result.atom_mut(new);
        atom.expr = std::mem::replace(&mut atom.expr, Expr::True).and(at_least);
    }

    debug!(
        removed = total,
        remaining = result.atom_count(),
        "suppressed query hydrogens"
    );
    Cow::Owned(result)
}
