use std::sync::atomic::{AtomicU64, Ordering};

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// Tetrahedral configuration value for an anticlockwise winding.
pub const CONFIG_ANTICLOCKWISE: u8 = 1;
/// Tetrahedral configuration value for a clockwise winding.
pub const CONFIG_CLOCKWISE: u8 = 2;
/// Double-bond configuration value for reference atoms on opposite sides.
pub const CONFIG_OPPOSITE: u8 = 1;
/// Double-bond configuration value for reference atoms on the same side.
pub const CONFIG_TOGETHER: u8 = 2;

/// Process-unique identity of a [`Mol`].
///
/// Identity, not value equality: two structurally equal molecules have
/// different ids, and a clone receives a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MolId(u64);

static NEXT_MOL_ID: AtomicU64 = AtomicU64::new(1);

impl MolId {
    fn next() -> Self {
        MolId(NEXT_MOL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A stereo carrier: either a graph atom or an implicit hydrogen on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomId {
    Node(NodeIndex),
    VirtualH(NodeIndex, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winding {
    Anticlockwise,
    Clockwise,
}

/// Tetrahedral stereo: looking from the first carrier, the remaining three
/// are arranged with the given winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TetrahedralStereo {
    pub center: NodeIndex,
    pub carriers: [AtomId; 4],
    pub winding: Winding,
}

impl TetrahedralStereo {
    pub fn config(&self) -> u8 {
        match self.winding {
            Winding::Anticlockwise => CONFIG_ANTICLOCKWISE,
            Winding::Clockwise => CONFIG_CLOCKWISE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conformation {
    Opposite,
    Together,
}

/// Double-bond stereo. `bond` is stored with the lower index first and
/// `refs[i]` is the reference neighbor of `bond.i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoubleBondStereo {
    pub bond: (NodeIndex, NodeIndex),
    pub refs: [AtomId; 2],
    pub conformation: Conformation,
}

impl DoubleBondStereo {
    pub fn config(&self) -> u8 {
        match self.conformation {
            Conformation::Opposite => CONFIG_OPPOSITE,
            Conformation::Together => CONFIG_TOGETHER,
        }
    }
}

/// A molecular graph: a petgraph arena of atoms `A` and bonds `B` with
/// stereo elements on the side.
///
/// Every `Mol` has a [`MolId`]; the ring cache in
/// [`topology`](crate::topology) is keyed on it and forgets the entry when
/// the molecule is dropped. Mutating a molecule after ring data has been
/// cached for it is a precondition violation.
pub struct Mol<A, B> {
    id: MolId,
    graph: UnGraph<A, B>,
    tetrahedral_stereo: Vec<TetrahedralStereo>,
    double_bond_stereo: Vec<DoubleBondStereo>,
}

impl<A, B> Mol<A, B> {
    pub fn new() -> Self {
        Self {
            id: MolId::next(),
            graph: UnGraph::default(),
            tetrahedral_stereo: Vec::new(),
            double_bond_stereo: Vec::new(),
        }
    }

    pub fn id(&self) -> MolId {
        self.id
    }

    pub fn graph(&self) -> &UnGraph<A, B> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &A {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut A {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut B {
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: A) -> NodeIndex {
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> EdgeIndex {
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).count()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    /// Incident bonds of `idx` paired with the atom on the other end.
    pub fn bonded(&self, idx: NodeIndex) -> impl Iterator<Item = (EdgeIndex, NodeIndex)> + '_ {
        self.graph.edges(idx).map(move |e| {
            let other = if e.source() == idx { e.target() } else { e.source() };
            (e.id(), other)
        })
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    pub fn tetrahedral_stereo(&self) -> &[TetrahedralStereo] {
        &self.tetrahedral_stereo
    }

    pub fn tetrahedral_stereo_for(&self, center: NodeIndex) -> Option<&TetrahedralStereo> {
        self.tetrahedral_stereo.iter().find(|s| s.center == center)
    }

    pub fn add_tetrahedral_stereo(&mut self, stereo: TetrahedralStereo) {
        self.tetrahedral_stereo.push(stereo);
    }

    pub fn double_bond_stereo(&self) -> &[DoubleBondStereo] {
        &self.double_bond_stereo
    }

    pub fn double_bond_stereo_for(&self, a: NodeIndex, b: NodeIndex) -> Option<&DoubleBondStereo> {
        let key = ordered(a, b);
        self.double_bond_stereo.iter().find(|s| s.bond == key)
    }

    pub fn add_double_bond_stereo(&mut self, stereo: DoubleBondStereo) {
        let (a, b) = stereo.bond;
        let stereo = if a.index() <= b.index() {
            stereo
        } else {
            DoubleBondStereo {
                bond: (b, a),
                refs: [stereo.refs[1], stereo.refs[0]],
                conformation: stereo.conformation,
            }
        };
        self.double_bond_stereo.push(stereo);
    }

    /// Copies the atoms, bonds and stereo of `other` into `self`, returning
    /// the index each of `other`'s atoms received.
    pub fn append(&mut self, other: &Mol<A, B>) -> Vec<NodeIndex>
    where
        A: Clone,
        B: Clone,
    {
        let index_map: Vec<NodeIndex> = other
            .atoms()
            .map(|idx| self.add_atom(other.atom(idx).clone()))
            .collect();

        for edge in other.bonds() {
            if let Some((a, b)) = other.bond_endpoints(edge) {
                self.add_bond(
                    index_map[a.index()],
                    index_map[b.index()],
                    other.bond(edge).clone(),
                );
            }
        }

        let remap = |aid: AtomId| match aid {
            AtomId::Node(idx) => AtomId::Node(index_map[idx.index()]),
            AtomId::VirtualH(parent, n) => AtomId::VirtualH(index_map[parent.index()], n),
        };
        for s in &other.tetrahedral_stereo {
            self.tetrahedral_stereo.push(TetrahedralStereo {
                center: index_map[s.center.index()],
                carriers: s.carriers.map(remap),
                winding: s.winding,
            });
        }
        for s in &other.double_bond_stereo {
            self.add_double_bond_stereo(DoubleBondStereo {
                bond: (index_map[s.bond.0.index()], index_map[s.bond.1.index()]),
                refs: s.refs.map(remap),
                conformation: s.conformation,
            });
        }

        index_map
    }

    /// Builds a copy of this molecule without the atoms flagged in
    /// `removed` (indexed by atom index) and without their bonds.
    ///
    /// Stereo elements whose center or double bond survives are kept. A
    /// carrier that was removed is passed to `substitute` together with the
    /// atom it was attached to (both in this molecule's index space); the
    /// returned carrier, also in this molecule's index space, is remapped into
    /// the result. Elements with a carrier that cannot be resolved are
    /// dropped.
    ///
    /// Returns the new molecule and the old-to-new atom index map.
    pub fn without_atoms<F>(
        &self,
        removed: &[bool],
        mut substitute: F,
    ) -> (Mol<A, B>, Vec<Option<NodeIndex>>)
    where
        A: Clone,
        B: Clone,
        F: FnMut(NodeIndex, NodeIndex) -> Option<AtomId>,
    {
        let is_removed = |idx: NodeIndex| removed.get(idx.index()).copied().unwrap_or(false);

        let mut result = Mol::new();
        let mut index_map: Vec<Option<NodeIndex>> = vec![None; self.atom_count()];
        for idx in self.atoms() {
            if !is_removed(idx) {
                index_map[idx.index()] = Some(result.add_atom(self.atom(idx).clone()));
            }
        }

        for edge in self.bonds() {
            let Some((a, b)) = self.bond_endpoints(edge) else {
                continue;
            };
            if let (Some(new_a), Some(new_b)) = (index_map[a.index()], index_map[b.index()]) {
                result.add_bond(new_a, new_b, self.bond(edge).clone());
            }
        }

        let map_kept = |aid: AtomId| -> Option<AtomId> {
            match aid {
                AtomId::Node(idx) => index_map[idx.index()].map(AtomId::Node),
                AtomId::VirtualH(parent, n) => {
                    index_map[parent.index()].map(|p| AtomId::VirtualH(p, n))
                }
            }
        };
        let mut resolve = |owner: NodeIndex, aid: AtomId| -> Option<AtomId> {
            match aid {
                AtomId::Node(idx) if is_removed(idx) => map_kept(substitute(owner, idx)?),
                other => map_kept(other),
            }
        };

        for s in &self.tetrahedral_stereo {
            let Some(center) = index_map[s.center.index()] else {
                continue;
            };
            let carriers = [
                resolve(s.center, s.carriers[0]),
                resolve(s.center, s.carriers[1]),
                resolve(s.center, s.carriers[2]),
                resolve(s.center, s.carriers[3]),
            ];
            if let [Some(c0), Some(c1), Some(c2), Some(c3)] = carriers {
                result.tetrahedral_stereo.push(TetrahedralStereo {
                    center,
                    carriers: [c0, c1, c2, c3],
                    winding: s.winding,
                });
            }
        }

        for s in &self.double_bond_stereo {
            let (Some(a), Some(b)) = (index_map[s.bond.0.index()], index_map[s.bond.1.index()])
            else {
                continue;
            };
            let refs = (resolve(s.bond.0, s.refs[0]), resolve(s.bond.1, s.refs[1]));
            if let (Some(r0), Some(r1)) = refs {
                result.add_double_bond_stereo(DoubleBondStereo {
                    bond: (a, b),
                    refs: [r0, r1],
                    conformation: s.conformation,
                });
            }
        }

        (result, index_map)
    }
}

fn ordered(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a.index() <= b.index() {
        (a, b)
    } else {
        (b, a)
    }
}

impl<A: Clone, B: Clone> Clone for Mol<A, B> {
    fn clone(&self) -> Self {
        Self {
            id: MolId::next(),
            graph: self.graph.clone(),
            tetrahedral_stereo: self.tetrahedral_stereo.clone(),
            double_bond_stereo: self.double_bond_stereo.clone(),
        }
    }
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, B> Drop for Mol<A, B> {
    fn drop(&mut self) {
        crate::topology::RingCache::evict_global(self.id);
    }
}

impl<A: PartialEq, B: PartialEq> PartialEq for Mol<A, B> {
    fn eq(&self, other: &Self) -> bool {
        if self.atom_count() != other.atom_count() || self.bond_count() != other.bond_count() {
            return false;
        }
        let atoms_equal = self.atoms().all(|idx| self.atom(idx) == other.atom(idx));
        let bonds_equal = self.bonds().all(|idx| {
            self.bond(idx) == other.bond(idx)
                && self.bond_endpoints(idx) == other.bond_endpoints(idx)
        });
        atoms_equal
            && bonds_equal
            && self.tetrahedral_stereo == other.tetrahedral_stereo
            && self.double_bond_stereo == other.double_bond_stereo
    }
}

impl<A: std::fmt::Debug, B: std::fmt::Debug> std::fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mol")
            .field("id", &self.id)
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .field("tetrahedral_stereo", &self.tetrahedral_stereo)
            .field("double_bond_stereo", &self.double_bond_stereo)
            .finish()
    }
}
