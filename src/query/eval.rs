use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::element;
use crate::hybridization::perceive_hybridization;
use crate::mol::Mol;
use crate::topology::{self, RingCache, RingSummary};

use super::Expr;

/// Stereo configuration a matcher supplies alongside the candidate.
///
/// While a mapping is still being extended the configuration of the target
/// is not known yet; [`StereoHint::Unresolved`] makes every stereo
/// predicate, and every negated stereo predicate, pass. Once the mapping is
/// complete the matcher re-checks with the real configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StereoHint {
    #[default]
    Unresolved,
    Config(u8),
}

impl StereoHint {
    /// The tetrahedral configuration recorded on `atom`, or `Config(0)` when
    /// it has none.
    pub fn for_atom(mol: &Mol<Atom, Bond>, atom: NodeIndex) -> Self {
        StereoHint::Config(mol.tetrahedral_stereo_for(atom).map_or(0, |s| s.config()))
    }

    /// The double-bond configuration recorded on `bond`, or `Config(0)` when
    /// it has none.
    pub fn for_bond(mol: &Mol<Atom, Bond>, bond: EdgeIndex) -> Self {
        let config = mol
            .bond_endpoints(bond)
            .and_then(|(a, b)| mol.double_bond_stereo_for(a, b))
            .map_or(0, |s| s.config());
        StereoHint::Config(config)
    }

    fn admits(self, config: u8) -> bool {
        match self {
            StereoHint::Unresolved => true,
            StereoHint::Config(c) => c == config,
        }
    }
}

/// An atom of a concrete molecule, as seen by the evaluator.
#[derive(Debug, Clone, Copy)]
pub struct AtomRef<'a> {
    pub mol: &'a Mol<Atom, Bond>,
    pub idx: NodeIndex,
}

impl<'a> AtomRef<'a> {
    pub fn new(mol: &'a Mol<Atom, Bond>, idx: NodeIndex) -> Self {
        Self { mol, idx }
    }

    pub fn atom(&self) -> &'a Atom {
        self.mol.atom(self.idx)
    }

    fn rings(&self) -> std::sync::Arc<RingSummary> {
        RingCache::global().summary(self.mol)
    }

    fn neighbor_atoms(&self) -> impl Iterator<Item = &'a Atom> + 'a {
        let mol = self.mol;
        mol.neighbors(self.idx).map(move |nb| mol.atom(nb))
    }

    fn bond_orders(&self) -> impl Iterator<Item = BondOrder> + 'a {
        let mol = self.mol;
        mol.bonds_of(self.idx).map(move |e| mol.bond(e).order)
    }

    fn degree(&self) -> usize {
        self.mol.degree(self.idx)
    }

    fn explicit_h_count(&self) -> usize {
        self.neighbor_atoms().filter(|a| a.atomic_num == 1).count()
    }

    fn hetero_neighbor_count(&self) -> usize {
        self.neighbor_atoms().filter(|a| is_hetero(a)).count()
    }

    fn aliphatic_hetero_neighbor_count(&self) -> usize {
        self.neighbor_atoms()
            .filter(|a| is_hetero(a) && !a.is_aromatic)
            .count()
    }

    fn double_bond_count(&self) -> usize {
        self.bond_orders().filter(|&o| o == BondOrder::Double).count()
    }
}

/// A bond of a concrete molecule, as seen by the evaluator.
#[derive(Debug, Clone, Copy)]
pub struct BondRef<'a> {
    pub mol: &'a Mol<Atom, Bond>,
    pub idx: EdgeIndex,
}

impl<'a> BondRef<'a> {
    pub fn new(mol: &'a Mol<Atom, Bond>, idx: EdgeIndex) -> Self {
        Self { mol, idx }
    }

    pub fn bond(&self) -> &'a Bond {
        self.mol.bond(self.idx)
    }
}

fn is_hetero(atom: &Atom) -> bool {
    atom.atomic_num != 6 && atom.atomic_num != 1
}

fn eq(count: usize, value: u8) -> bool {
    count == value as usize
}

impl Expr {
    /// Evaluates this expression against an atom.
    ///
    /// Bond-only kinds never match an atom.
    pub fn matches_atom(&self, target: AtomRef<'_>, stereo: StereoHint) -> bool {
        let atom = target.atom();
        match self {
            Expr::True => true,
            Expr::False | Expr::Undefined => false,
            Expr::IsAromatic => atom.is_aromatic,
            Expr::IsAliphatic => !atom.is_aromatic,
            Expr::IsInRing => target.rings().is_ring_atom(target.idx),
            Expr::IsInChain => !target.rings().is_ring_atom(target.idx),
            Expr::IsHetero => is_hetero(atom),
            Expr::HasImplicitHydrogen => atom.hydrogen_count > 0,
            Expr::HasIsotope => atom.isotope != 0,
            Expr::HasUnspecifiedIsotope => atom.isotope == 0,
            Expr::Unsaturated => target.double_bond_count() > 0,
            Expr::HasHeteroSubstituent => target.hetero_neighbor_count() > 0,
            Expr::HasAliphaticHeteroSubstituent => target.aliphatic_hetero_neighbor_count() > 0,
            Expr::Element(z) => atom.atomic_num == *z,
            Expr::AliphaticElement(z) => !atom.is_aromatic && atom.atomic_num == *z,
            Expr::AromaticElement(z) => atom.is_aromatic && atom.atomic_num == *z,
            Expr::ImplicitHCount(h) => atom.hydrogen_count == *h,
            Expr::TotalHCount(h) => {
                atom.hydrogen_count <= *h
                    && eq(atom.hydrogen_count as usize + target.explicit_h_count(), *h)
            }
            Expr::Degree(d) => eq(target.degree(), *d),
            Expr::TotalDegree(x) => eq(target.degree() + atom.hydrogen_count as usize, *x),
            Expr::HeavyDegree(d) => eq(target.degree() - target.explicit_h_count(), *d),
            Expr::Valence(v) => valence_equals(target, *v),
            Expr::Isotope(mass) => atom.isotope == *mass,
            Expr::FormalCharge(q) => atom.formal_charge == *q,
            Expr::RingBondCount(x) => {
                eq(target.rings().ring_bond_count(target.mol, target.idx), *x)
            }
            Expr::RingCount(n) => target.rings().ring_count(target.idx) == u32::from(*n),
            Expr::RingSmallest(n) => {
                target.rings().is_ring_atom(target.idx)
                    && topology::is_in_smallest_ring_of_size(target.mol, target.idx, *n as usize)
            }
            Expr::RingSize(n) => {
                target.rings().is_ring_atom(target.idx)
                    && topology::is_in_ring_of_size(target.mol, target.idx, *n as usize)
            }
            Expr::HeteroSubstituentCount(n) => eq(target.hetero_neighbor_count(), *n),
            Expr::AliphaticHeteroSubstituentCount(n) => {
                eq(target.aliphatic_hetero_neighbor_count(), *n)
            }
            Expr::Insaturation(n) => eq(target.double_bond_count(), *n),
            Expr::PeriodicGroup(g) => element::periodic_group(atom.atomic_num) == Some(*g),
            Expr::HybridisationNumber(n) => {
                if atom.is_pseudo() {
                    return false;
                }
                let hyb = atom
                    .hybridization
                    .unwrap_or_else(|| perceive_hybridization(target.mol, target.idx));
                hyb.number() == Some(*n)
            }
            Expr::ReactionRole(role) => atom.reaction_role.map(|r| r.ordinal()) == Some(*role),
            Expr::Stereochemistry(config) => stereo.admits(*config),
            Expr::AliphaticOrder(_)
            | Expr::Order(_)
            | Expr::SingleOrAromatic
            | Expr::DoubleOrAromatic
            | Expr::SingleOrDouble => false,
            Expr::And(parts) => {
                debug_assert!(parts.len() >= 2, "AND needs at least two operands");
                parts.iter().all(|e| e.matches_atom(target, stereo))
            }
            Expr::Or(parts) => {
                debug_assert!(parts.len() >= 2, "OR needs at least two operands");
                parts.iter().any(|e| e.matches_atom(target, stereo))
            }
            Expr::Not(inner) => {
                unresolved_stereo(inner, stereo) || !inner.matches_atom(target, stereo)
            }
            Expr::Recursive(query) => query.matches_root(target.mol, target.idx),
        }
    }

    /// Evaluates this expression against a bond.
    ///
    /// Atom-only kinds never match a bond.
    pub fn matches_bond(&self, target: BondRef<'_>, stereo: StereoHint) -> bool {
        let bond = target.bond();
        let order = bond.order.numeric();
        match self {
            Expr::True => true,
            Expr::False | Expr::Undefined => false,
            Expr::IsAromatic => bond.is_aromatic,
            Expr::IsAliphatic => !bond.is_aromatic,
            Expr::IsInRing => RingCache::global().summary(target.mol).is_ring_bond(target.idx),
            Expr::IsInChain => !RingCache::global().summary(target.mol).is_ring_bond(target.idx),
            Expr::AliphaticOrder(n) => !bond.is_aromatic && order == *n,
            Expr::Order(n) => order == *n,
            Expr::SingleOrAromatic => bond.is_aromatic || bond.order == BondOrder::Single,
            Expr::DoubleOrAromatic => bond.is_aromatic || bond.order == BondOrder::Double,
            Expr::SingleOrDouble => {
                !bond.is_aromatic && matches!(bond.order, BondOrder::Single | BondOrder::Double)
            }
            Expr::Stereochemistry(config) => stereo.admits(*config),
            Expr::And(parts) => {
                debug_assert!(parts.len() >= 2, "AND needs at least two operands");
                parts.iter().all(|e| e.matches_bond(target, stereo))
            }
            Expr::Or(parts) => {
                debug_assert!(parts.len() >= 2, "OR needs at least two operands");
                parts.iter().any(|e| e.matches_bond(target, stereo))
            }
            Expr::Not(inner) => {
                unresolved_stereo(inner, stereo) || !inner.matches_bond(target, stereo)
            }
            _ => false,
        }
    }
}

/// NOT over a stereo predicate stays permissive while stereo is unresolved.
fn unresolved_stereo(inner: &Expr, stereo: StereoHint) -> bool {
    stereo == StereoHint::Unresolved && matches!(inner, Expr::Stereochemistry(_))
}

/// Implicit hydrogens plus bond orders equal `target`, bailing out as soon
/// as the running total overshoots.
fn valence_equals(atom: AtomRef<'_>, target: u8) -> bool {
    let mut total = u32::from(atom.atom().hydrogen_count);
    if total > u32::from(target) {
        return false;
    }
    for order in atom.bond_orders() {
        total += u32::from(order.numeric());
        if total > u32::from(target) {
            return false;
        }
    }
    total == u32::from(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::ReactionRole;
    use crate::fixtures;
    use crate::hybridization::Hybridization;
    use crate::mol::CONFIG_CLOCKWISE;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn atom_matches(expr: &Expr, mol: &Mol<Atom, Bond>, i: usize) -> bool {
        expr.matches_atom(AtomRef::new(mol, n(i)), StereoHint::Unresolved)
    }

    fn bond_matches(expr: &Expr, mol: &Mol<Atom, Bond>, a: usize, b: usize) -> bool {
        let edge = mol.bond_between(n(a), n(b)).unwrap();
        expr.matches_bond(BondRef::new(mol, edge), StereoHint::Unresolved)
    }

    #[test]
    fn aromaticity_and_elements() {
        let mol = fixtures::toluene();
        assert!(atom_matches(&Expr::IsAromatic, &mol, 1));
        assert!(atom_matches(&Expr::IsAliphatic, &mol, 0));
        assert!(atom_matches(&Expr::Element(6), &mol, 0));
        assert!(atom_matches(&Expr::Element(6), &mol, 1));
        assert!(atom_matches(&Expr::AliphaticElement(6), &mol, 0));
        assert!(!atom_matches(&Expr::AliphaticElement(6), &mol, 1));
        assert!(atom_matches(&Expr::AromaticElement(6), &mol, 1));
        assert!(!atom_matches(&Expr::AromaticElement(6), &mol, 0));
    }

    #[test]
    fn ring_and_chain() {
        let mol = fixtures::toluene();
        assert!(atom_matches(&Expr::IsInChain, &mol, 0));
        assert!(atom_matches(&Expr::IsInRing, &mol, 3));
        assert!(bond_matches(&Expr::IsInChain, &mol, 0, 1));
        assert!(bond_matches(&Expr::IsInRing, &mol, 1, 2));
    }

    #[test]
    fn hetero_tests_exclude_carbon_and_hydrogen() {
        let mol = fixtures::ethanol();
        assert!(!atom_matches(&Expr::IsHetero, &mol, 0));
        assert!(atom_matches(&Expr::IsHetero, &mol, 2));
        let mol = fixtures::methane_explicit_h();
        assert!(!atom_matches(&Expr::IsHetero, &mol, 1));
    }

    #[test]
    fn hydrogen_counts() {
        let mol = fixtures::methane_explicit_h();
        assert!(atom_matches(&Expr::TotalHCount(4), &mol, 0));
        assert!(atom_matches(&Expr::ImplicitHCount(0), &mol, 0));
        assert!(!atom_matches(&Expr::HasImplicitHydrogen, &mol, 0));
        assert!(atom_matches(&Expr::HeavyDegree(0), &mol, 0));
        assert!(atom_matches(&Expr::Degree(4), &mol, 0));

        let mol = fixtures::ethanol();
        assert!(atom_matches(&Expr::TotalHCount(3), &mol, 0));
        assert!(!atom_matches(&Expr::TotalHCount(2), &mol, 0));
        assert!(atom_matches(&Expr::HasImplicitHydrogen, &mol, 2));
    }

    #[test]
    fn degree_family() {
        let mol = fixtures::acetic_acid();
        assert!(atom_matches(&Expr::Degree(3), &mol, 1));
        assert!(atom_matches(&Expr::TotalDegree(4), &mol, 0));
        assert!(atom_matches(&Expr::TotalDegree(2), &mol, 3));
        assert!(atom_matches(&Expr::HeavyDegree(3), &mol, 1));
    }

    #[test]
    fn valence_sums_orders_and_hydrogens() {
        let mol = fixtures::acetic_acid();
        assert!(atom_matches(&Expr::Valence(4), &mol, 1));
        assert!(!atom_matches(&Expr::Valence(3), &mol, 1));
        assert!(atom_matches(&Expr::Valence(2), &mol, 2));
        assert!(atom_matches(&Expr::Valence(2), &mol, 3));
        // implicit hydrogens alone overshoot
        assert!(!atom_matches(&Expr::Valence(2), &mol, 0));
    }

    #[test]
    fn isotope_and_charge() {
        let mut mol = fixtures::ethanol();
        mol.atom_mut(n(0)).isotope = 13;
        mol.atom_mut(n(2)).formal_charge = -1;
        assert!(atom_matches(&Expr::HasIsotope, &mol, 0));
        assert!(atom_matches(&Expr::Isotope(13), &mol, 0));
        assert!(atom_matches(&Expr::HasUnspecifiedIsotope, &mol, 1));
        assert!(atom_matches(&Expr::FormalCharge(-1), &mol, 2));
        assert!(atom_matches(&Expr::FormalCharge(0), &mol, 1));
    }

    #[test]
    fn ring_counts() {
        let mol = fixtures::naphthalene();
        assert!(atom_matches(&Expr::RingCount(2), &mol, 4));
        assert!(atom_matches(&Expr::RingCount(1), &mol, 0));
        assert!(atom_matches(&Expr::RingBondCount(3), &mol, 9));
        assert!(atom_matches(&Expr::RingBondCount(2), &mol, 1));

        let mol = fixtures::toluene();
        assert!(atom_matches(&Expr::RingCount(0), &mol, 0));
        assert!(atom_matches(&Expr::RingBondCount(0), &mol, 0));
    }

    #[test]
    fn ring_size_predicates_guard_chain_atoms() {
        let mol = fixtures::toluene();
        assert!(atom_matches(&Expr::RingSize(6), &mol, 2));
        assert!(atom_matches(&Expr::RingSmallest(6), &mol, 2));
        assert!(!atom_matches(&Expr::RingSmallest(8), &mol, 0));
        assert!(!atom_matches(&Expr::RingSize(6), &mol, 0));
    }

    #[test]
    fn ring_size_predicates_diverge_on_bridged_systems() {
        let mol = fixtures::norbornane();
        assert!(atom_matches(&Expr::RingSize(6), &mol, 1));
        assert!(!atom_matches(&Expr::RingSmallest(6), &mol, 1));
    }

    #[test]
    fn substituent_counts() {
        let mol = fixtures::acetic_acid();
        assert!(atom_matches(&Expr::HeteroSubstituentCount(2), &mol, 1));
        assert!(atom_matches(&Expr::HasHeteroSubstituent, &mol, 1));
        assert!(atom_matches(&Expr::AliphaticHeteroSubstituentCount(2), &mol, 1));
        assert!(!atom_matches(&Expr::HasHeteroSubstituent, &mol, 0));

        let mol = fixtures::pyridine();
        assert!(atom_matches(&Expr::HeteroSubstituentCount(1), &mol, 1));
        assert!(!atom_matches(&Expr::HasAliphaticHeteroSubstituent, &mol, 1));
    }

    #[test]
    fn unsaturation() {
        let mol = fixtures::acetic_acid();
        assert!(atom_matches(&Expr::Unsaturated, &mol, 1));
        assert!(atom_matches(&Expr::Insaturation(1), &mol, 2));
        assert!(!atom_matches(&Expr::Unsaturated, &mol, 0));
        assert!(atom_matches(&Expr::Insaturation(0), &mol, 3));
        let mol = fixtures::acetonitrile();
        assert!(!atom_matches(&Expr::Unsaturated, &mol, 1));
    }

    #[test]
    fn hybridisation_uses_stored_or_perceived() {
        let mut mol = fixtures::acetonitrile();
        assert!(atom_matches(&Expr::HybridisationNumber(1), &mol, 1));
        assert!(atom_matches(&Expr::HybridisationNumber(3), &mol, 0));
        mol.atom_mut(n(0)).hybridization = Some(Hybridization::SP3D2);
        assert!(atom_matches(&Expr::HybridisationNumber(5), &mol, 0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "AND needs at least two operands")]
    fn single_operand_conjunction_is_rejected() {
        let mol = fixtures::ethanol();
        atom_matches(&Expr::And(vec![Expr::Element(6)]), &mol, 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "OR needs at least two operands")]
    fn empty_disjunction_is_rejected() {
        let mol = fixtures::ethanol();
        let bond = mol.bond_between(n(0), n(1)).unwrap();
        Expr::Or(vec![]).matches_bond(BondRef::new(&mol, bond), StereoHint::Unresolved);
    }

    #[test]
    fn hybridisation_counts_lone_pairs() {
        let mol = fixtures::acetic_acid();
        assert!(atom_matches(&Expr::HybridisationNumber(2), &mol, 2));
        assert!(!atom_matches(&Expr::HybridisationNumber(1), &mol, 2));
        let mol = fixtures::fluoromethane();
        assert!(atom_matches(&Expr::HybridisationNumber(3), &mol, 1));
    }

    #[test]
    fn periodic_group_and_reaction_role() {
        let mut mol = fixtures::ethanol();
        assert!(atom_matches(&Expr::PeriodicGroup(14), &mol, 0));
        assert!(atom_matches(&Expr::PeriodicGroup(16), &mol, 2));
        assert!(!atom_matches(&Expr::ReactionRole(1), &mol, 0));
        mol.atom_mut(n(0)).reaction_role = Some(ReactionRole::Product);
        assert!(atom_matches(&Expr::ReactionRole(3), &mol, 0));
    }

    #[test]
    fn stereo_sentinel() {
        let mol = fixtures::chiral_halomethane();
        let target = AtomRef::new(&mol, n(0));
        let cw = Expr::Stereochemistry(CONFIG_CLOCKWISE);
        let not_cw = Expr::not(cw.clone());

        assert!(cw.matches_atom(target, StereoHint::Unresolved));
        assert!(not_cw.matches_atom(target, StereoHint::Unresolved));

        let actual = StereoHint::for_atom(&mol, n(0));
        assert_eq!(actual, StereoHint::Config(CONFIG_CLOCKWISE));
        assert!(cw.matches_atom(target, actual));
        assert!(!not_cw.matches_atom(target, actual));
        assert!(!cw.matches_atom(target, StereoHint::Config(1)));
        assert!(not_cw.matches_atom(target, StereoHint::Config(1)));
    }

    #[test]
    fn not_of_compound_stereo_inverts() {
        let mol = fixtures::chiral_halomethane();
        let target = AtomRef::new(&mol, n(0));
        let expr = Expr::not(Expr::And(vec![Expr::Element(6), Expr::Stereochemistry(2)]));
        assert!(!expr.matches_atom(target, StereoHint::Unresolved));
    }

    #[test]
    fn bond_orders() {
        let mol = fixtures::toluene();
        assert!(bond_matches(&Expr::IsAromatic, &mol, 1, 2));
        assert!(bond_matches(&Expr::IsAliphatic, &mol, 0, 1));
        assert!(bond_matches(&Expr::AliphaticOrder(1), &mol, 0, 1));
        assert!(!bond_matches(&Expr::AliphaticOrder(2), &mol, 1, 2));
        assert!(bond_matches(&Expr::Order(2), &mol, 1, 2));
        assert!(bond_matches(&Expr::SingleOrAromatic, &mol, 1, 2));
        assert!(bond_matches(&Expr::SingleOrAromatic, &mol, 0, 1));
        assert!(bond_matches(&Expr::DoubleOrAromatic, &mol, 2, 3));
        assert!(!bond_matches(&Expr::DoubleOrAromatic, &mol, 0, 1));
        assert!(bond_matches(&Expr::SingleOrDouble, &mol, 0, 1));
        assert!(!bond_matches(&Expr::SingleOrDouble, &mol, 1, 2));

        let mol = fixtures::acetonitrile();
        assert!(bond_matches(&Expr::AliphaticOrder(3), &mol, 1, 2));
        assert!(!bond_matches(&Expr::SingleOrDouble, &mol, 1, 2));
    }

    #[test]
    fn bond_stereo() {
        let mol = fixtures::trans_butene();
        let edge = mol.bond_between(n(1), n(2)).unwrap();
        let target = BondRef::new(&mol, edge);
        let hint = StereoHint::for_bond(&mol, edge);
        assert_eq!(hint, StereoHint::Config(1));
        assert!(Expr::Stereochemistry(1).matches_bond(target, hint));
        assert!(!Expr::Stereochemistry(2).matches_bond(target, hint));
        assert!(Expr::not(Expr::Stereochemistry(1)).matches_bond(target, StereoHint::Unresolved));
    }

    #[test]
    fn kinds_on_the_wrong_element_never_match() {
        let mol = fixtures::ethanol();
        assert!(!atom_matches(&Expr::Order(1), &mol, 0));
        assert!(!atom_matches(&Expr::SingleOrAromatic, &mol, 0));
        assert!(!bond_matches(&Expr::Element(6), &mol, 0, 1));
        assert!(!bond_matches(&Expr::Degree(1), &mol, 0, 1));
    }

    #[test]
    fn undefined_never_matches() {
        let mol = fixtures::ethanol();
        assert!(!atom_matches(&Expr::Undefined, &mol, 0));
        assert!(!bond_matches(&Expr::Undefined, &mol, 0, 1));
        assert!(atom_matches(&Expr::not(Expr::Undefined), &mol, 0));
    }

    #[test]
    fn logical_nodes() {
        let mol = fixtures::ethanol();
        let oh = Expr::Element(8).and(Expr::TotalHCount(1));
        assert!(atom_matches(&oh, &mol, 2));
        assert!(!atom_matches(&oh, &mol, 1));
        let c_or_n = Expr::Element(7).or(Expr::Element(6));
        assert!(atom_matches(&c_or_n, &mol, 1));
        assert!(!atom_matches(&c_or_n, &mol, 2));
        assert!(atom_matches(&Expr::not(c_or_n), &mol, 2));
    }
}
