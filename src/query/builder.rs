use tracing::debug;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::element;
use crate::mol::Mol;
use crate::topology::RingCache;

use super::atom::{QueryAtom, QueryBond, QueryMol};
use super::features::{QueryFeature, QueryFeatures};
use super::Expr;

/// Builds a query graph asserting the requested properties of every atom and
/// bond of `mol`.
///
/// Each atom becomes an AND of, in this order: isotope (only for atoms with
/// an explicit mass number), element and/or aromaticity, degree, total
/// degree, ring membership, implicit hydrogen count, ring bond count, formal
/// charge and tetrahedral stereo. Each bond asserts aromaticity or order,
/// ring membership and double-bond stereo. Properties not requested are left
/// unconstrained; an atom with nothing requested matches any atom.
///
/// Stereo elements of `mol` are copied to the query when
/// [`QueryFeature::Stereochemistry`] is requested. Query atoms keep the
/// indices of their source atoms.
pub fn build_query(mol: &Mol<Atom, Bond>, features: &QueryFeatures) -> QueryMol {
    let rings = RingCache::global().summary(mol);
    let wants = |f: QueryFeature| features.contains(f);
    let mut query = QueryMol::new();

    for idx in mol.atoms() {
        let atom = mol.atom(idx);
        let mut expr = Expr::True;

        if wants(QueryFeature::Isotope) && atom.isotope != 0 {
            expr = expr.and(Expr::Isotope(atom.isotope));
        }
        expr = expr.and(identity(atom, features));
        if wants(QueryFeature::Degree) {
            expr = expr.and(Expr::Degree(count(mol.degree(idx))));
        }
        if wants(QueryFeature::TotalDegree) {
            expr = expr.and(Expr::TotalDegree(
                count(mol.degree(idx)).saturating_add(atom.hydrogen_count),
            ));
        }
        if wants(QueryFeature::RingMembership) {
            expr = expr.and(if rings.is_ring_atom(idx) {
                Expr::IsInRing
            } else {
                Expr::IsInChain
            });
        }
        if wants(QueryFeature::ImplicitHCount) {
            expr = expr.and(Expr::ImplicitHCount(atom.hydrogen_count));
        }
        if wants(QueryFeature::RingBondCount) {
            expr = expr.and(Expr::RingBondCount(count(rings.ring_bond_count(mol, idx))));
        }
        if wants(QueryFeature::FormalCharge) {
            expr = expr.and(Expr::FormalCharge(atom.formal_charge));
        }
        if wants(QueryFeature::Stereochemistry) {
            if let Some(stereo) = mol.tetrahedral_stereo_for(idx) {
                expr = expr.and(Expr::Stereochemistry(stereo.config()));
            }
        }

        let mut query_atom = QueryAtom::new(expr);
        if wants(QueryFeature::Element) {
            query_atom.symbol = element::symbol(atom.atomic_num);
        }
        if wants(QueryFeature::Aromaticity) {
            query_atom.is_aromatic = Some(atom.is_aromatic);
        }
        query.add_atom(query_atom);
    }

    for edge in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        let bond = mol.bond(edge);
        let mut expr = Expr::True;

        if bond.is_aromatic && wants(QueryFeature::Aromaticity) {
            expr = expr.and(Expr::IsAromatic);
        } else if wants(QueryFeature::BondOrder) {
            let order = bond.order.numeric();
            expr = expr.and(if bond.is_aromatic {
                Expr::Order(order)
            } else {
                Expr::AliphaticOrder(order)
            });
        }
        if wants(QueryFeature::RingMembership) {
            expr = expr.and(if rings.is_ring_bond(edge) {
                Expr::IsInRing
            } else {
                Expr::IsInChain
            });
        }
        if wants(QueryFeature::Stereochemistry) {
            if let Some(stereo) = mol.double_bond_stereo_for(a, b) {
                expr = expr.and(Expr::Stereochemistry(stereo.config()));
            }
        }

        let mut query_bond = QueryBond::new(expr);
        if wants(QueryFeature::BondOrder) {
            query_bond.order = Some(bond.order);
        }
        if wants(QueryFeature::Aromaticity) {
            query_bond.is_aromatic = Some(bond.is_aromatic);
        }
        query.add_bond(a, b, query_bond);
    }

    if wants(QueryFeature::Stereochemistry) {
        for stereo in mol.tetrahedral_stereo() {
            query.add_tetrahedral_stereo(*stereo);
        }
        for stereo in mol.double_bond_stereo() {
            query.add_double_bond_stereo(*stereo);
        }
    }

    debug!(
        atoms = query.atom_count(),
        bonds = query.bond_count(),
        features = ?features.iter().collect::<Vec<_>>(),
        "built query graph"
    );
    query
}

/// Clamps a neighbor count into a predicate operand.
fn count(n: usize) -> u8 {
    u8::try_from(n).unwrap_or(u8::MAX)
}

fn identity(atom: &Atom, features: &QueryFeatures) -> Expr {
    let element = features.contains(QueryFeature::Element);
    let aromaticity = features.contains(QueryFeature::Aromaticity);
    match (element, aromaticity) {
        (true, true) if atom.is_aromatic => Expr::AromaticElement(atom.atomic_num),
        (true, true) => Expr::AliphaticElement(atom.atomic_num),
        (true, false) => Expr::Element(atom.atomic_num),
        (false, true) if atom.is_aromatic => Expr::IsAromatic,
        (false, true) => Expr::IsAliphatic,
        (false, false) => Expr::True,
    }
}
