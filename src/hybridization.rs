use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::element::outer_shell_electrons;
use crate::mol::Mol;

/// Hybridization state of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hybridization {
    S,
    SP,
    SP2,
    SP3,
    SP3D,
    SP3D2,
    SP3D3,
    SP3D4,
    SP3D5,
}

impl Hybridization {
    /// The hybridisation number compared by
    /// [`Expr::HybridisationNumber`](crate::query::Expr::HybridisationNumber):
    /// 1 = sp, 2 = sp2, 3 = sp3, 4..8 = sp3d..sp3d5. `S` has no number.
    pub fn number(self) -> Option<u8> {
        match self {
            Hybridization::S => None,
            Hybridization::SP => Some(1),
            Hybridization::SP2 => Some(2),
            Hybridization::SP3 => Some(3),
            Hybridization::SP3D => Some(4),
            Hybridization::SP3D2 => Some(5),
            Hybridization::SP3D3 => Some(6),
            Hybridization::SP3D4 => Some(7),
            Hybridization::SP3D5 => Some(8),
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Hybridization::SP),
            2 => Some(Hybridization::SP2),
            3 => Some(Hybridization::SP3),
            4 => Some(Hybridization::SP3D),
            5 => Some(Hybridization::SP3D2),
            6 => Some(Hybridization::SP3D3),
            7 => Some(Hybridization::SP3D4),
            8 => Some(Hybridization::SP3D5),
            _ => None,
        }
    }
}

fn total_degree(mol: &Mol<Atom, Bond>, idx: NodeIndex) -> i16 {
    let degree = i16::try_from(mol.degree(idx)).unwrap_or(i16::MAX);
    degree.saturating_add(i16::from(mol.atom(idx).hydrogen_count))
}

fn total_valence(mol: &Mol<Atom, Bond>, idx: NodeIndex) -> i16 {
    mol.bonds_of(idx)
        .map(|e| i16::from(mol.bond(e).order.numeric()))
        .fold(i16::from(mol.atom(idx).hydrogen_count), i16::saturating_add)
}

/// Sigma bonds plus lone pairs, with unpaired electrons counted as one
/// orbital each.
fn num_bonds_plus_lone_pairs(mol: &Mol<Atom, Bond>, idx: NodeIndex) -> i16 {
    let atom = mol.atom(idx);
    let degree = total_degree(mol, idx);
    if atom.atomic_num <= 1 || atom.atomic_num >= 89 {
        return degree;
    }

    let nouter = i16::from(outer_shell_electrons(atom.atomic_num));
    let valence = total_valence(mol, idx);
    let charge = i16::from(atom.formal_charge);
    let free_electrons = nouter.saturating_sub(valence).saturating_sub(charge).max(0);

    if valence.saturating_add(nouter).saturating_sub(charge) < 8 {
        let radicals = free_electrons % 2;
        degree.saturating_add((free_electrons - radicals) / 2 + radicals)
    } else {
        degree.saturating_add(free_electrons / 2)
    }
}

/// Whether the atom touches a pi system: it is aromatic, carries a multiple
/// bond, or is bonded to an atom that does.
fn touches_pi_system(mol: &Mol<Atom, Bond>, idx: NodeIndex) -> bool {
    let unsaturated = |i: NodeIndex| {
        mol.atom(i).is_aromatic
            || mol
                .bonds_of(i)
                .any(|e| mol.bond(e).is_aromatic || mol.bond(e).order.numeric() > 1)
    };
    unsaturated(idx) || mol.neighbors(idx).any(unsaturated)
}

/// Perceives the hybridization of an atom from its steric number: sigma
/// bonds (explicit and implicit hydrogens included) plus lone pairs.
///
/// A four-orbital atom with at most three neighbors next to a pi system
/// donates its lone pair and is typed sp2 (amide N, furan O, pyrrole N).
pub fn perceive_hybridization(mol: &Mol<Atom, Bond>, idx: NodeIndex) -> Hybridization {
    match num_bonds_plus_lone_pairs(mol, idx) {
        i16::MIN..=1 => Hybridization::S,
        2 => Hybridization::SP,
        3 => Hybridization::SP2,
        4 => {
            if total_degree(mol, idx) > 3 || !touches_pi_system(mol, idx) {
                Hybridization::SP3
            } else {
                Hybridization::SP2
            }
        }
        5 => Hybridization::SP3D,
        6 => Hybridization::SP3D2,
        7 => Hybridization::SP3D3,
        8 => Hybridization::SP3D4,
        _ => Hybridization::SP3D5,
    }
}

/// Stores the perceived hybridization on every non-pseudo atom.
pub fn assign_hybridization(mol: &mut Mol<Atom, Bond>) {
    let indices: Vec<NodeIndex> = mol.atoms().collect();
    for idx in indices {
        if mol.atom(idx).is_pseudo() {
            continue;
        }
        let hyb = perceive_hybridization(mol, idx);
        mol.atom_mut(idx).hybridization = Some(hyb);
    }
}
