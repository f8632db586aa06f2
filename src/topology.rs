//! Ring perception helpers used by the query evaluator.
//!
//! Ring-membership counts come from a minimum cycle basis and are cached per
//! molecule in a [`RingCache`]. Ring-size tests are computed directly on the
//! graph each time.
//!
//! Two ring-size tests exist and they answer different questions:
//!
//! - [`is_in_ring_of_size`] is exact: it succeeds if any simple cycle of
//!   exactly `n` atoms passes through the atom.
//! - [`is_in_smallest_ring_of_size`] is a BFS estimate of the smallest cycle
//!   through the atom, compared against `n`. On bridged and fused systems the
//!   estimate can differ from the exact answer. In norbornane, a two-carbon
//!   bridge atom lies on a six-membered cycle while its smallest ring has five
//!   atoms. The estimate is kept as-is.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::trace;

use crate::mol::{Mol, MolId};
use crate::rings::RingInfo;

/// Ring data derived once per molecule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingSummary {
    atom_rings: Vec<u32>,
    ring_bonds: Vec<bool>,
}

impl RingSummary {
    pub fn compute<A, B>(mol: &Mol<A, B>) -> Self {
        let info = RingInfo::sssr(mol);
        Self {
            atom_rings: info.atom_ring_counts(mol.atom_count()),
            ring_bonds: info.ring_bond_flags(mol),
        }
    }

    /// Number of minimum-cycle-basis rings containing `atom`.
    pub fn ring_count(&self, atom: NodeIndex) -> u32 {
        self.atom_rings.get(atom.index()).copied().unwrap_or(0)
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.ring_count(atom) > 0
    }

    pub fn is_ring_bond(&self, bond: EdgeIndex) -> bool {
        self.ring_bonds.get(bond.index()).copied().unwrap_or(false)
    }

    /// Number of ring bonds incident to `atom`.
    pub fn ring_bond_count<A, B>(&self, mol: &Mol<A, B>, atom: NodeIndex) -> usize {
        mol.bonds_of(atom).filter(|&e| self.is_ring_bond(e)).count()
    }
}

static GLOBAL: OnceLock<RingCache> = OnceLock::new();

/// Concurrent per-molecule memo of [`RingSummary`] values.
///
/// Keyed by [`MolId`], i.e. by graph identity and not by structure. Two
/// threads racing on the same molecule may both compute the summary; the
/// first insert wins and both observe equal data. A molecule must not be
/// mutated once its summary has been cached.
#[derive(Debug, Default)]
pub struct RingCache {
    entries: DashMap<MolId, Arc<RingSummary>>,
    computations: AtomicUsize,
}

impl RingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used during expression evaluation.
    pub fn global() -> &'static RingCache {
        GLOBAL.get_or_init(RingCache::new)
    }

    pub(crate) fn evict_global(id: MolId) {
        if let Some(cache) = GLOBAL.get() {
            cache.evict(id);
        }
    }

    pub fn summary<A, B>(&self, mol: &Mol<A, B>) -> Arc<RingSummary> {
        if let Some(entry) = self.entries.get(&mol.id()) {
            return Arc::clone(entry.value());
        }
        let computed = Arc::new(RingSummary::compute(mol));
        self.computations.fetch_add(1, Ordering::Relaxed);
        trace!(mol = ?mol.id(), atoms = mol.atom_count(), "ring summary computed");
        let entry = self.entries.entry(mol.id()).or_insert(computed);
        Arc::clone(entry.value())
    }

    pub fn ring_count<A, B>(&self, mol: &Mol<A, B>, atom: NodeIndex) -> u32 {
        self.summary(mol).ring_count(atom)
    }

    pub fn evict(&self, id: MolId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn contains(&self, id: MolId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many summaries this cache has computed so far.
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }
}

/// Number of minimum-cycle-basis rings containing `atom`, via the global
/// cache.
pub fn ring_count<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> u32 {
    RingCache::global().ring_count(mol, atom)
}

pub fn is_ring_atom<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> bool {
    RingCache::global().summary(mol).is_ring_atom(atom)
}

pub fn is_ring_bond<A, B>(mol: &Mol<A, B>, bond: EdgeIndex) -> bool {
    RingCache::global().summary(mol).is_ring_bond(bond)
}

/// Whether `atom` lies on a simple cycle of exactly `size` atoms.
pub fn is_in_ring_of_size<A, B>(mol: &Mol<A, B>, atom: NodeIndex, size: usize) -> bool {
    if size < 3 {
        return false;
    }
    let mut visited = vec![false; mol.atom_count()];
    ring_dfs(mol, atom, None, atom, size, 1, &mut visited)
}

fn ring_dfs<A, B>(
    mol: &Mol<A, B>,
    current: NodeIndex,
    prev: Option<EdgeIndex>,
    origin: NodeIndex,
    size: usize,
    depth: usize,
    visited: &mut [bool],
) -> bool {
    visited[current.index()] = true;
    for (edge, nbr) in mol.bonded(current) {
        if Some(edge) == prev {
            continue;
        }
        if nbr == origin {
            if depth == size {
                return true;
            }
        } else if depth < size
            && !visited[nbr.index()]
            && ring_dfs(mol, nbr, Some(edge), origin, size, depth + 1, visited)
        {
            return true;
        }
    }
    visited[current.index()] = false;
    false
}

/// Whether the smallest cycle through `atom`, as estimated by a BFS from it,
/// has `size` atoms.
///
/// The BFS only detects cycles where two frontiers collide, and for an atom
/// outside any ring it can report the size of a ring further away plus the
/// tail. Callers should check ring membership first.
pub fn is_in_smallest_ring_of_size<A, B>(mol: &Mol<A, B>, atom: NodeIndex, size: usize) -> bool {
    let n = mol.atom_count();
    let unreached = n + 1;
    let mut dist_to = vec![unreached; n];
    dist_to[atom.index()] = 0;

    let mut queue = std::collections::VecDeque::new();
    queue.push_back(atom);
    let mut smallest = unreached;

    while let Some(current) = queue.pop_front() {
        let dist = dist_to[current.index()] + 1;
        for nbr in mol.neighbors(current) {
            let seen = dist_to[nbr.index()];
            if dist < seen {
                dist_to[nbr.index()] = dist;
                queue.push_back(nbr);
            } else if dist != seen + 2 {
                smallest = smallest.min(dist + seen);
            }
        }
        if 2 * dist > size + 1 {
            break;
        }
    }

    smallest == size
}
