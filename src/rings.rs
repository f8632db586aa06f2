use std::collections::VecDeque;

use petgraph::algo::connected_components;
use petgraph::graph::NodeIndex;

use crate::mol::Mol;

/// Smallest set of smallest rings, found as a minimum cycle basis over
/// Horton candidate cycles.
///
/// Rings are stored normalized: rotated so the lowest atom index comes first
/// and oriented so the second atom is the smaller of the two neighbors.
#[derive(Debug, Clone)]
pub struct RingInfo {
    rings: Vec<Vec<NodeIndex>>,
}

impl RingInfo {
    pub fn sssr<A, B>(mol: &Mol<A, B>) -> Self {
        let num_expected = Self::expected_ring_count(mol);
        if num_expected == 0 {
            return Self { rings: vec![] };
        }

        let candidates = horton_candidates(mol);
        let rings = select_independent_rings(&candidates, num_expected, mol);

        Self { rings }
    }

    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn rings(&self) -> &[Vec<NodeIndex>] {
        &self.rings
    }

    /// Number of basis rings each atom belongs to, indexed by atom index.
    pub fn atom_ring_counts(&self, atom_count: usize) -> Vec<u32> {
        let mut counts = vec![0u32; atom_count];
        for ring in &self.rings {
            for atom in ring {
                counts[atom.index()] += 1;
            }
        }
        counts
    }

    /// Whether each bond lies on some basis ring, indexed by bond index.
    pub fn ring_bond_flags<A, B>(&self, mol: &Mol<A, B>) -> Vec<bool> {
        let mut flags = vec![false; mol.bond_count()];
        for ring in &self.rings {
            for (a, b) in ring_edges(ring) {
                if let Some(edge) = mol.bond_between(a, b) {
                    flags[edge.index()] = true;
                }
            }
        }
        flags
    }

    pub fn smallest_ring_size(&self, atom: NodeIndex) -> Option<usize> {
        self.rings
            .iter()
            .filter(|ring| ring.contains(&atom))
            .map(|ring| ring.len())
            .min()
    }

    /// Cyclomatic number: bonds minus atoms plus connected components.
    pub fn expected_ring_count<A, B>(mol: &Mol<A, B>) -> usize {
        let v = mol.atom_count();
        let e = mol.bond_count();
        let c = connected_components(mol.graph());
        (e + c).saturating_sub(v)
    }
}

fn ring_edges(ring: &[NodeIndex]) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
    let len = ring.len();
    (0..len).map(move |i| (ring[i], ring[(i + 1) % len]))
}

/// Single-source BFS shortest-path trees for every atom.
struct ShortestPaths {
    dist: Vec<Vec<u32>>,
    pred: Vec<Vec<Option<NodeIndex>>>,
}

impl ShortestPaths {
    fn compute<A, B>(mol: &Mol<A, B>) -> Self {
        let n = mol.atom_count();
        let mut dist = vec![vec![u32::MAX; n]; n];
        let mut pred = vec![vec![None; n]; n];
        let mut queue = VecDeque::new();

        for src in mol.atoms() {
            let row = &mut dist[src.index()];
            let pred_row = &mut pred[src.index()];
            row[src.index()] = 0;
            queue.clear();
            queue.push_back(src);
            while let Some(cur) = queue.pop_front() {
                let d = row[cur.index()];
                for nb in mol.neighbors(cur) {
                    if row[nb.index()] == u32::MAX {
                        row[nb.index()] = d + 1;
                        pred_row[nb.index()] = Some(cur);
                        queue.push_back(nb);
                    }
                }
            }
        }

        Self { dist, pred }
    }

    fn distance(&self, src: NodeIndex, dst: NodeIndex) -> Option<u32> {
        let d = self.dist[src.index()][dst.index()];
        (d != u32::MAX).then_some(d)
    }

    fn path(&self, src: NodeIndex, dst: NodeIndex) -> Vec<NodeIndex> {
        let mut path = vec![dst];
        let mut cur = dst;
        while cur != src {
            match self.pred[src.index()][cur.index()] {
                Some(p) => {
                    path.push(p);
                    cur = p;
                }
                None => return vec![],
            }
        }
        path.reverse();
        path
    }
}

fn horton_candidates<A, B>(mol: &Mol<A, B>) -> Vec<Vec<NodeIndex>> {
    let paths = ShortestPaths::compute(mol);
    let mut candidates: Vec<Vec<NodeIndex>> = Vec::new();

    for edge in mol.bonds() {
        let Some((u, v)) = mol.bond_endpoints(edge) else {
            continue;
        };
        for w in mol.atoms() {
            let (Some(du), Some(dv)) = (paths.distance(w, u), paths.distance(w, v)) else {
                continue;
            };
            if du + dv + 1 < 3 {
                continue;
            }
            let path_u = paths.path(w, u);
            let path_v = paths.path(w, v);
            if paths_share_internal_node(&path_u, &path_v) {
                continue;
            }
            let mut ring = path_u;
            ring.extend(path_v[1..].iter().rev());
            candidates.push(ring);
        }
    }

    candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    candidates.dedup();
    candidates
}

fn paths_share_internal_node(path_u: &[NodeIndex], path_v: &[NodeIndex]) -> bool {
    if path_u.len() < 2 || path_v.len() < 2 {
        return false;
    }
    path_u[1..].iter().any(|node| path_v[1..].contains(node))
}

fn ring_to_edge_bitvector<A, B>(ring: &[NodeIndex], mol: &Mol<A, B>) -> Vec<u64> {
    let mut bv = vec![0u64; mol.bond_count().div_ceil(64)];
    for (a, b) in ring_edges(ring) {
        if let Some(edge) = mol.bond_between(a, b) {
            let idx = edge.index();
            bv[idx / 64] |= 1u64 << (idx % 64);
        }
    }
    bv
}

fn select_independent_rings<A, B>(
    candidates: &[Vec<NodeIndex>],
    num_needed: usize,
    mol: &Mol<A, B>,
) -> Vec<Vec<NodeIndex>> {
    let mut result = Vec::with_capacity(num_needed);
    let mut basis: Vec<Vec<u64>> = Vec::with_capacity(num_needed);

    for ring in candidates {
        if result.len() >= num_needed {
            break;
        }
        let bv = ring_to_edge_bitvector(ring, mol);
        if bv.iter().all(|&w| w == 0) {
            continue;
        }
        if try_add_to_basis(&mut basis, bv) {
            result.push(normalize_ring(ring));
        }
    }

    result.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    result
}

/// Gaussian elimination over GF(2): reduces `candidate` against the basis and
/// keeps it if anything independent remains.
fn try_add_to_basis(basis: &mut Vec<Vec<u64>>, candidate: Vec<u64>) -> bool {
    let mut v = candidate;
    for row in basis.iter() {
        if let Some(p) = leading_bit(row) {
            if v[p / 64] & (1u64 << (p % 64)) != 0 {
                for (vw, rw) in v.iter_mut().zip(row) {
                    *vw ^= *rw;
                }
            }
        }
    }
    if v.iter().all(|&w| w == 0) {
        return false;
    }
    basis.push(v);
    true
}

fn leading_bit(bv: &[u64]) -> Option<usize> {
    bv.iter()
        .enumerate()
        .find(|(_, word)| **word != 0)
        .map(|(i, &word)| i * 64 + word.trailing_zeros() as usize)
}

fn normalize_ring(ring: &[NodeIndex]) -> Vec<NodeIndex> {
    let Some(min_pos) = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, idx)| idx)
        .map(|(i, _)| i)
    else {
        return vec![];
    };

    let len = ring.len();
    let mut normalized: Vec<NodeIndex> = (0..len).map(|i| ring[(min_pos + i) % len]).collect();
    if len > 2 && normalized[1] > normalized[len - 1] {
        normalized[1..].reverse();
    }
    normalized
}
