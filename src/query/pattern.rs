use std::collections::VecDeque;
use std::sync::OnceLock;

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;

use super::error::ExprError;
use super::eval::{AtomRef, BondRef, StereoHint};
use super::QueryMol;

/// A query graph compiled for rooted matching.
///
/// The first query atom is the root. The remaining atoms are visited
/// breadth-first so that, within each connected component, every atom after
/// the first has an already-mapped neighbor whose image bounds the candidate
/// set.
#[derive(Debug, Clone)]
pub struct Pattern {
    query: QueryMol,
    order: Vec<NodeIndex>,
    anchors: Vec<Option<NodeIndex>>,
}

impl Pattern {
    pub fn compile(query: QueryMol) -> Self {
        let n = query.atom_count();
        let mut order = Vec::with_capacity(n);
        let mut anchors = Vec::with_capacity(n);
        let mut seen = vec![false; n];
        let mut queue = VecDeque::new();

        for start in query.atoms() {
            if seen[start.index()] {
                continue;
            }
            seen[start.index()] = true;
            queue.push_back((start, None));
            while let Some((atom, anchor)) = queue.pop_front() {
                order.push(atom);
                anchors.push(anchor);
                for nb in query.neighbors(atom) {
                    if !seen[nb.index()] {
                        seen[nb.index()] = true;
                        queue.push_back((nb, Some(atom)));
                    }
                }
            }
        }

        Self {
            query,
            order,
            anchors,
        }
    }

    pub fn query(&self) -> &QueryMol {
        &self.query
    }

    /// Whether the query maps onto `target` with its first atom on `root`.
    ///
    /// Stereo predicates are evaluated unresolved.
    pub fn matches_root(&self, target: &Mol<Atom, Bond>, root: NodeIndex) -> bool {
        if self.order.is_empty() || root.index() >= target.atom_count() {
            return false;
        }
        let mut search = Search {
            pattern: self,
            target,
            query_map: vec![None; self.query.atom_count()],
            target_used: vec![false; target.atom_count()],
        };
        search.try_map(0, root)
    }
}

struct Search<'a> {
    pattern: &'a Pattern,
    target: &'a Mol<Atom, Bond>,
    query_map: Vec<Option<NodeIndex>>,
    target_used: Vec<bool>,
}

impl Search<'_> {
    fn try_map(&mut self, depth: usize, target_node: NodeIndex) -> bool {
        let query_node = self.pattern.order[depth];
        if !self.is_feasible(query_node, target_node) {
            return false;
        }
        self.query_map[query_node.index()] = Some(target_node);
        self.target_used[target_node.index()] = true;

        if self.extend(depth + 1) {
            return true;
        }

        self.query_map[query_node.index()] = None;
        self.target_used[target_node.index()] = false;
        false
    }

    fn extend(&mut self, depth: usize) -> bool {
        if depth == self.pattern.order.len() {
            return true;
        }
        let candidates: Vec<NodeIndex> = match self.pattern.anchors[depth] {
            Some(anchor) => match self.query_map[anchor.index()] {
                Some(image) => self.target.neighbors(image).collect(),
                None => return false,
            },
            None => self.target.atoms().collect(),
        };
        candidates
            .into_iter()
            .any(|candidate| self.try_map(depth, candidate))
    }

    fn is_feasible(&self, query_node: NodeIndex, target_node: NodeIndex) -> bool {
        if self.target_used[target_node.index()] {
            return false;
        }
        let query = &self.pattern.query;
        let target_atom = AtomRef::new(self.target, target_node);
        if !query
            .atom(query_node)
            .matches_with_stereo(target_atom, StereoHint::Unresolved)
        {
            return false;
        }

        for (q_bond, q_neighbor) in query.bonded(query_node) {
            let Some(t_mapped) = self.query_map[q_neighbor.index()] else {
                continue;
            };
            let Some(t_bond) = self.target.bond_between(target_node, t_mapped) else {
                return false;
            };
            if !query
                .bond(q_bond)
                .matches_with_stereo(BondRef::new(self.target, t_bond), StereoHint::Unresolved)
            {
                return false;
            }
        }

        true
    }
}

/// The operand of a recursive predicate: a query graph plus its lazily
/// compiled matcher.
///
/// Compilation happens on first evaluation and is published once; concurrent
/// first evaluations may race to compile but all observe the same winner.
pub struct RecursiveQuery {
    query: QueryMol,
    compiled: OnceLock<Pattern>,
}

impl RecursiveQuery {
    pub fn new(query: QueryMol) -> Result<Self, ExprError> {
        if query.atom_count() == 0 {
            return Err(ExprError::EmptyRecursiveQuery);
        }
        Ok(Self {
            query,
            compiled: OnceLock::new(),
        })
    }

    pub fn query(&self) -> &QueryMol {
        &self.query
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    pub fn pattern(&self) -> &Pattern {
        self.compiled
            .get_or_init(|| Pattern::compile(self.query.clone()))
    }

    pub fn matches_root(&self, target: &Mol<Atom, Bond>, root: NodeIndex) -> bool {
        self.pattern().matches_root(target, root)
    }
}

impl Clone for RecursiveQuery {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            compiled: OnceLock::new(),
        }
    }
}

impl PartialEq for RecursiveQuery {
    fn eq(&self, other: &Self) -> bool {
        self.query == other.query
    }
}

impl std::fmt::Debug for RecursiveQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecursiveQuery")
            .field("query", &self.query)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::query::{Expr, QueryAtom, QueryBond};

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    /// Hydroxyl oxygen bonded to a carbon: [O;H1]-C.
    fn hydroxyl_query() -> QueryMol {
        let mut q = QueryMol::new();
        let o = q.add_atom(QueryAtom::new(Expr::Element(8).and(Expr::TotalHCount(1))));
        let c = q.add_atom(QueryAtom::new(Expr::Element(6)));
        q.add_bond(o, c, QueryBond::new(Expr::AliphaticOrder(1)));
        q
    }

    /// Carbon with a carbonyl oxygen and a hydroxyl: C(=O)O.
    fn carboxyl_query() -> QueryMol {
        let mut q = QueryMol::new();
        let c = q.add_atom(QueryAtom::new(Expr::Element(6)));
        let o1 = q.add_atom(QueryAtom::new(Expr::Element(8)));
        let o2 = q.add_atom(QueryAtom::new(Expr::Element(8).and(Expr::TotalHCount(1))));
        q.add_bond(c, o1, QueryBond::new(Expr::AliphaticOrder(2)));
        q.add_bond(c, o2, QueryBond::new(Expr::AliphaticOrder(1)));
        q
    }

    fn assert_anchored_order(pattern: &Pattern) {
        assert_eq!(pattern.order.len(), pattern.query.atom_count());
        assert_eq!(pattern.order[0], n(0));
        assert_eq!(pattern.anchors[0], None);
        for (i, (&atom, anchor)) in pattern
            .order
            .iter()
            .zip(&pattern.anchors)
            .enumerate()
            .skip(1)
        {
            let anchor = anchor.expect("connected query atom has an anchor");
            assert!(pattern.order[..i].contains(&anchor), "anchor of {atom:?} placed later");
            assert!(pattern.query.bond_between(atom, anchor).is_some());
        }
    }

    #[test]
    fn order_is_breadth_first_from_root() {
        let pattern = Pattern::compile(carboxyl_query());
        assert_anchored_order(&pattern);
        assert_eq!(pattern.anchors[1..], [Some(n(0)), Some(n(0))]);

        let mut chain = QueryMol::new();
        let atoms: Vec<_> = (0..4)
            .map(|_| chain.add_atom(QueryAtom::new(Expr::Element(6))))
            .collect();
        for w in atoms.windows(2) {
            chain.add_bond(w[0], w[1], QueryBond::new(Expr::True));
        }
        let pattern = Pattern::compile(chain);
        assert_anchored_order(&pattern);
        assert_eq!(pattern.order, vec![n(0), n(1), n(2), n(3)]);
    }

    #[test]
    fn rooted_match_only_at_anchor() {
        let pattern = Pattern::compile(hydroxyl_query());
        let ethanol = fixtures::ethanol();
        assert!(pattern.matches_root(&ethanol, n(2)));
        assert!(!pattern.matches_root(&ethanol, n(1)));
        assert!(!pattern.matches_root(&ethanol, n(0)));
    }

    #[test]
    fn branching_query() {
        let pattern = Pattern::compile(carboxyl_query());
        let acid = fixtures::acetic_acid();
        assert!(pattern.matches_root(&acid, n(1)));
        assert!(!pattern.matches_root(&acid, n(0)));
        assert!(!pattern.matches_root(&fixtures::ethanol(), n(1)));
    }

    #[test]
    fn ring_closure_bonds_are_checked() {
        let mut q = QueryMol::new();
        let atoms: Vec<_> = (0..3)
            .map(|_| q.add_atom(QueryAtom::new(Expr::Element(6))))
            .collect();
        for i in 0..3 {
            q.add_bond(atoms[i], atoms[(i + 1) % 3], QueryBond::new(Expr::True));
        }
        let pattern = Pattern::compile(q);
        assert!(pattern.matches_root(&fixtures::ring(3), n(0)));
        assert!(!pattern.matches_root(&fixtures::cyclohexane(), n(0)));
        assert!(!pattern.matches_root(&fixtures::chain(3), n(1)));
    }

    #[test]
    fn disconnected_component_searches_whole_target() {
        let mut q = QueryMol::new();
        q.add_atom(QueryAtom::new(Expr::Element(8)));
        q.add_atom(QueryAtom::new(Expr::Element(6).and(Expr::TotalHCount(3))));
        let pattern = Pattern::compile(q);
        assert!(pattern.matches_root(&fixtures::ethanol(), n(2)));
    }

    #[test]
    fn root_out_of_range() {
        let pattern = Pattern::compile(hydroxyl_query());
        assert!(!pattern.matches_root(&fixtures::ethanol(), n(10)));
    }

    #[test]
    fn recursive_query_compiles_once() {
        let rq = RecursiveQuery::new(hydroxyl_query()).unwrap();
        assert!(!rq.is_compiled());
        let first = rq.pattern() as *const Pattern;
        assert!(rq.is_compiled());
        let second = rq.pattern() as *const Pattern;
        assert_eq!(first, second);
    }

    #[test]
    fn concurrent_first_use_publishes_one_pattern() {
        let rq = RecursiveQuery::new(hydroxyl_query()).unwrap();
        let ethanol = fixtures::ethanol();
        let addrs: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        assert!(rq.matches_root(&ethanol, n(2)));
                        rq.pattern() as *const Pattern as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn empty_query_rejected() {
        assert_eq!(
            RecursiveQuery::new(QueryMol::new()).err(),
            Some(ExprError::EmptyRecursiveQuery)
        );
    }

    #[test]
    fn recursive_expression_in_evaluator() {
        let expr = Expr::recursive(hydroxyl_query()).unwrap();
        let ethanol = fixtures::ethanol();
        let hint = StereoHint::Unresolved;
        assert!(expr.matches_atom(AtomRef::new(&ethanol, n(2)), hint));
        assert!(!expr.matches_atom(AtomRef::new(&ethanol, n(0)), hint));
        assert!(!expr.matches_atom(AtomRef::new(&fixtures::acetonitrile(), n(2)), hint));
    }

    #[test]
    fn nested_recursion() {
        // carbon bearing a hydroxyl, expressed as C with a recursive neighbor
        let inner = Expr::recursive(hydroxyl_query()).unwrap();
        let mut q = QueryMol::new();
        let c = q.add_atom(QueryAtom::new(Expr::Element(6)));
        let o = q.add_atom(QueryAtom::new(inner));
        q.add_bond(c, o, QueryBond::new(Expr::True));
        let expr = Expr::recursive(q).unwrap();

        let ethanol = fixtures::ethanol();
        let hint = StereoHint::Unresolved;
        assert!(expr.matches_atom(AtomRef::new(&ethanol, n(1)), hint));
        assert!(!expr.matches_atom(AtomRef::new(&ethanol, n(0)), hint));
    }
}
