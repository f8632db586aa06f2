#![allow(dead_code)]

use crabquery::{Atom, Bond, BondOrder, Mol};

pub type Molecule = Mol<Atom, Bond>;

pub fn carbon(h: u8) -> Atom {
    Atom::new(6).with_hydrogens(h)
}

pub fn single_atom(atomic_num: u8, h: u8) -> Molecule {
    let mut mol = Molecule::new();
    mol.add_atom(Atom::new(atomic_num).with_hydrogens(h));
    mol
}

pub fn benzene() -> Molecule {
    let mut mol = Molecule::new();
    let atoms: Vec<_> = (0..6)
        .map(|_| mol.add_atom(carbon(1).aromatic()))
        .collect();
    for i in 0..6 {
        let order = if i % 2 == 0 {
            BondOrder::Double
        } else {
            BondOrder::Single
        };
        mol.add_bond(atoms[i], atoms[(i + 1) % 6], Bond::aromatic(order));
    }
    mol
}

/// Phenol: aromatic ring 0..=5, hydroxyl oxygen 6 on atom 0.
pub fn phenol() -> Molecule {
    let mut mol = benzene();
    let c0 = petgraph::graph::NodeIndex::new(0);
    mol.atom_mut(c0).hydrogen_count = 0;
    let o = mol.add_atom(Atom::new(8).with_hydrogens(1));
    mol.add_bond(c0, o, Bond::single());
    mol
}

/// Bicyclo[2.2.1]heptane. Bridgeheads are atoms 0 and 3; atom 6 is the
/// one-carbon bridge.
pub fn norbornane() -> Molecule {
    let mut mol = Molecule::new();
    let h = [1, 2, 2, 1, 2, 2, 2];
    let atoms: Vec<_> = h.iter().map(|&h| mol.add_atom(carbon(h))).collect();
    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 6), (6, 3)] {
        mol.add_bond(atoms[a], atoms[b], Bond::single());
    }
    mol
}

/// Cyclohexanol with the ring at 0..=5 and the oxygen at 6.
pub fn cyclohexanol() -> Molecule {
    let mut mol = Molecule::new();
    let h = [1, 2, 2, 2, 2, 2];
    let ring: Vec<_> = h.iter().map(|&h| mol.add_atom(carbon(h))).collect();
    for i in 0..6 {
        mol.add_bond(ring[i], ring[(i + 1) % 6], Bond::single());
    }
    let o = mol.add_atom(Atom::new(8).with_hydrogens(1));
    mol.add_bond(ring[0], o, Bond::single());
    mol
}

/// A scaffold atom list followed by pseudo atoms, each pseudo atom bonded to
/// the scaffold atom given in `r_anchors`.
pub fn scaffold_with_r_atoms(
    atoms: &[Atom],
    bonds: &[(usize, usize)],
    r_anchors: &[usize],
) -> Molecule {
    let mut mol = Molecule::new();
    let nodes: Vec<_> = atoms.iter().map(|a| mol.add_atom(a.clone())).collect();
    for &(a, b) in bonds {
        mol.add_bond(nodes[a], nodes[b], Bond::single());
    }
    for &anchor in r_anchors {
        let r = mol.add_atom(Atom::pseudo());
        mol.add_bond(nodes[anchor], r, Bond::single());
    }
    mol
}

pub fn atomic_nums(mol: &Molecule) -> Vec<u8> {
    mol.atoms().map(|i| mol.atom(i).atomic_num).collect()
}
