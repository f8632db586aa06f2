//! Hand-built molecules shared by unit tests.

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::mol::{AtomId, Conformation, DoubleBondStereo, Mol, TetrahedralStereo, Winding};

pub(crate) type Molecule = Mol<Atom, Bond>;

fn carbon(h: u8) -> Atom {
    Atom::new(6).with_hydrogens(h)
}

fn aromatic_carbon(h: u8) -> Atom {
    Atom::new(6).with_hydrogens(h).aromatic()
}

fn kekule(i: usize) -> Bond {
    if i % 2 == 0 {
        Bond::aromatic(BondOrder::Double)
    } else {
        Bond::aromatic(BondOrder::Single)
    }
}

/// Linear saturated carbon chain.
pub(crate) fn chain(len: usize) -> Molecule {
    let mut mol = Molecule::new();
    for i in 0..len {
        let h = if len == 1 {
            4
        } else if i == 0 || i == len - 1 {
            3
        } else {
            2
        };
        mol.add_atom(carbon(h));
    }
    for i in 1..len {
        mol.add_bond(NodeIndex::new(i - 1), NodeIndex::new(i), Bond::single());
    }
    mol
}

/// Saturated carbocycle of `size` atoms.
pub(crate) fn ring(size: usize) -> Molecule {
    let mut mol = Molecule::new();
    let atoms: Vec<_> = (0..size).map(|_| mol.add_atom(carbon(2))).collect();
    for i in 0..size {
        mol.add_bond(atoms[i], atoms[(i + 1) % size], Bond::single());
    }
    mol
}

pub(crate) fn cyclohexane() -> Molecule {
    ring(6)
}

pub(crate) fn benzene() -> Molecule {
    let mut mol = Molecule::new();
    let atoms: Vec<_> = (0..6).map(|_| mol.add_atom(aromatic_carbon(1))).collect();
    for i in 0..6 {
        mol.add_bond(atoms[i], atoms[(i + 1) % 6], kekule(i));
    }
    mol
}

/// Pyridine, nitrogen at index 0.
pub(crate) fn pyridine() -> Molecule {
    let mut mol = Molecule::new();
    let n = mol.add_atom(Atom::new(7).aromatic());
    let mut atoms = vec![n];
    atoms.extend((0..5).map(|_| mol.add_atom(aromatic_carbon(1))));
    for i in 0..6 {
        mol.add_bond(atoms[i], atoms[(i + 1) % 6], kekule(i));
    }
    mol
}

/// Toluene: methyl carbon at 0, ring atoms 1..=6.
pub(crate) fn toluene() -> Molecule {
    let mut mol = Molecule::new();
    let methyl = mol.add_atom(carbon(3));
    let ipso = mol.add_atom(aromatic_carbon(0));
    let mut ring = vec![ipso];
    ring.extend((0..5).map(|_| mol.add_atom(aromatic_carbon(1))));
    for i in 0..6 {
        mol.add_bond(ring[i], ring[(i + 1) % 6], kekule(i));
    }
    mol.add_bond(methyl, ipso, Bond::single());
    mol
}

/// Naphthalene: perimeter 0..=9, fusion bond between 4 and 9.
pub(crate) fn naphthalene() -> Molecule {
    let mut mol = Molecule::new();
    let atoms: Vec<_> = (0..10)
        .map(|i| {
            let h = if i == 4 || i == 9 { 0 } else { 1 };
            mol.add_atom(aromatic_carbon(h))
        })
        .collect();
    for i in 0..10 {
        mol.add_bond(atoms[i], atoms[(i + 1) % 10], kekule(i));
    }
    mol.add_bond(atoms[4], atoms[9], Bond::aromatic(BondOrder::Single));
    mol
}

/// Norbornane: bridgeheads 0 and 3, bridges 1-2, 4-5 and 6.
pub(crate) fn norbornane() -> Molecule {
    let mut mol = Molecule::new();
    let atoms: Vec<_> = (0..7)
        .map(|i| mol.add_atom(carbon(if i == 0 || i == 3 { 1 } else { 2 })))
        .collect();
    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 6), (6, 3)] {
        mol.add_bond(atoms[a], atoms[b], Bond::single());
    }
    mol
}

/// Spiro[3.5]nonane: spiro atom 0, six-ring 0..=5, four-ring 0,6,7,8.
pub(crate) fn spiro_nonane() -> Molecule {
    let mut mol = Molecule::new();
    let atoms: Vec<_> = (0..9)
        .map(|i| mol.add_atom(carbon(if i == 0 { 0 } else { 2 })))
        .collect();
    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 6), (6, 7), (7, 8), (8, 0)] {
        mol.add_bond(atoms[a], atoms[b], Bond::single());
    }
    mol
}

/// Ethanol: C0, C1, O2.
pub(crate) fn ethanol() -> Molecule {
    let mut mol = Molecule::new();
    let c0 = mol.add_atom(carbon(3));
    let c1 = mol.add_atom(carbon(2));
    let o = mol.add_atom(Atom::new(8).with_hydrogens(1));
    mol.add_bond(c0, c1, Bond::single());
    mol.add_bond(c1, o, Bond::single());
    mol
}

/// Acetonitrile: C0, C1 (sp), N2.
pub(crate) fn acetonitrile() -> Molecule {
    let mut mol = Molecule::new();
    let c0 = mol.add_atom(carbon(3));
    let c1 = mol.add_atom(carbon(0));
    let n = mol.add_atom(Atom::new(7));
    mol.add_bond(c0, c1, Bond::single());
    mol.add_bond(c1, n, Bond::triple());
    mol
}

/// Acetic acid: C0, carbonyl C1, O2 (=O), O3 (hydroxyl).
pub(crate) fn acetic_acid() -> Molecule {
    let mut mol = Molecule::new();
    let c0 = mol.add_atom(carbon(3));
    let c1 = mol.add_atom(carbon(0));
    let o2 = mol.add_atom(Atom::new(8));
    let o3 = mol.add_atom(Atom::new(8).with_hydrogens(1));
    mol.add_bond(c0, c1, Bond::single());
    mol.add_bond(c1, o2, Bond::double());
    mol.add_bond(c1, o3, Bond::single());
    mol
}

/// Methane with all four hydrogens explicit: C0, H1..=H4.
pub(crate) fn methane_explicit_h() -> Molecule {
    let mut mol = Molecule::new();
    let c = mol.add_atom(carbon(0));
    for _ in 0..4 {
        let h = mol.add_atom(Atom::new(1));
        mol.add_bond(c, h, Bond::single());
    }
    mol
}

/// Bromochlorofluoromethane with a clockwise center: C0, F1, Cl2, Br3 and
/// one implicit hydrogen.
pub(crate) fn chiral_halomethane() -> Molecule {
    let mut mol = Molecule::new();
    let c = mol.add_atom(carbon(1));
    let f = mol.add_atom(Atom::new(9));
    let cl = mol.add_atom(Atom::new(17));
    let br = mol.add_atom(Atom::new(35));
    for x in [f, cl, br] {
        mol.add_bond(c, x, Bond::single());
    }
    mol.add_tetrahedral_stereo(TetrahedralStereo {
        center: c,
        carriers: [
            AtomId::VirtualH(c, 0),
            AtomId::Node(f),
            AtomId::Node(cl),
            AtomId::Node(br),
        ],
        winding: Winding::Clockwise,
    });
    mol
}

/// Fluoromethane: C0, F1.
pub(crate) fn fluoromethane() -> Molecule {
    let mut mol = Molecule::new();
    let c = mol.add_atom(carbon(3));
    let f = mol.add_atom(Atom::new(9));
    mol.add_bond(c, f, Bond::single());
    mol
}

/// trans-2-Butene: C0-C1=C2-C3.
pub(crate) fn trans_butene() -> Molecule {
    let mut mol = Molecule::new();
    let c0 = mol.add_atom(carbon(3));
    let c1 = mol.add_atom(carbon(1));
    let c2 = mol.add_atom(carbon(1));
    let c3 = mol.add_atom(carbon(3));
    mol.add_bond(c0, c1, Bond::single());
    mol.add_bond(c1, c2, Bond::double());
    mol.add_bond(c2, c3, Bond::single());
    mol.add_double_bond_stereo(DoubleBondStereo {
        bond: (c1, c2),
        refs: [AtomId::Node(c0), AtomId::Node(c3)],
        conformation: Conformation::Opposite,
    });
    mol
}
