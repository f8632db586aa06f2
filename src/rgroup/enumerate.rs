//! Expansion of an [`RGroupQuery`] into concrete molecules.
//!
//! Positions are visited in ascending number. For a position with `m` R atoms
//! every occurrence count in `0..=m` its grammar accepts is tried, then every
//! choice of which R atoms are substituted, then every candidate for each
//! substituted atom. The product over positions is walked lazily. No limit is
//! imposed on the number of configurations; callers bound it with
//! [`Iterator::take`] or a deadline checked between items.

use std::collections::HashMap;
use std::iter::FusedIterator;

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::{AtomId, Mol};

use super::error::RGroupError;
use super::list::RGroupList;
use super::query::RGroupQuery;

/// Per R atom of a position, the candidate placed there or `None`.
type Assignment = Vec<Option<usize>>;

struct PositionPlan<'a> {
    list: &'a RGroupList,
    sites: Vec<NodeIndex>,
    assignments: Vec<Assignment>,
}

impl PositionPlan<'_> {
    fn is_empty_at(&self, choice: usize) -> bool {
        self.assignments[choice].iter().all(Option::is_none)
    }
}

/// Every way to mark `count` of `sites` slots as substituted, earlier slots
/// varying slowest and unsubstituted before substituted.
fn distributions(sites: usize, count: usize) -> Vec<Vec<bool>> {
    fn fill(slots: &mut Vec<bool>, sites: usize, remaining: usize, out: &mut Vec<Vec<bool>>) {
        let placed = slots.len();
        if placed == sites {
            if remaining == 0 {
                out.push(slots.clone());
            }
            return;
        }
        if sites - placed > remaining {
            slots.push(false);
            fill(slots, sites, remaining, out);
            slots.pop();
        }
        if remaining > 0 {
            slots.push(true);
            fill(slots, sites, remaining - 1, out);
            slots.pop();
        }
    }

    let mut out = Vec::new();
    if count <= sites {
        fill(&mut Vec::with_capacity(sites), sites, count, &mut out);
    }
    out
}

/// Cartesian product of `candidates` choices over the substituted slots.
fn with_candidates(distribution: &[bool], candidates: usize) -> Vec<Assignment> {
    let mut result: Vec<Assignment> = vec![Vec::with_capacity(distribution.len())];
    for &substituted in distribution {
        if substituted {
            result = result
                .into_iter()
                .flat_map(|prefix| {
                    (0..candidates).map(move |c| {
                        let mut next = prefix.clone();
                        next.push(Some(c));
                        next
                    })
                })
                .collect();
        } else {
            for prefix in &mut result {
                prefix.push(None);
            }
        }
    }
    result
}

/// Lazy iterator over the configurations of an [`RGroupQuery`].
///
/// Created by [`RGroupQuery::configurations`].
pub struct Configurations<'a> {
    query: &'a RGroupQuery,
    plans: Vec<PositionPlan<'a>>,
    cursor: Option<Vec<usize>>,
}

impl<'a> Configurations<'a> {
    fn new(query: &'a RGroupQuery) -> Result<Self, RGroupError> {
        if let Some(position) = query.undefined_position() {
            return Err(RGroupError::SubstituentsUndefined { position });
        }

        let mut plans = Vec::new();
        for list in query.lists() {
            let position = list.position();
            let sites = query.rgroup_query_atoms(Some(position));
            let max = sites.len() as u32;
            let counts = list.match_occurrence(max);
            if counts.is_empty() {
                return Err(RGroupError::NoValidOccurrence { position, max });
            }
            debug!(position, sites = sites.len(), ?counts, "valid occurrence counts");

            let candidates = list.rgroups().len();
            let assignments = counts
                .iter()
                .flat_map(|&count| distributions(sites.len(), count as usize))
                .flat_map(|distribution| with_candidates(&distribution, candidates))
                .collect();
            plans.push(PositionPlan {
                list,
                sites,
                assignments,
            });
        }

        let cursor = plans
            .iter()
            .all(|plan| !plan.assignments.is_empty())
            .then(|| vec![0; plans.len()]);
        Ok(Self {
            query,
            plans,
            cursor,
        })
    }

    fn advance(&mut self) {
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        for (slot, plan) in cursor.iter_mut().zip(&self.plans).rev() {
            *slot += 1;
            if *slot < plan.assignments.len() {
                return;
            }
            *slot = 0;
        }
        self.cursor = None;
    }

    /// An empty position may not be required by a substituted one.
    fn requirements_met(&self, choice: &[usize]) -> bool {
        let empty: Vec<bool> = self
            .plans
            .iter()
            .zip(choice)
            .map(|(plan, &c)| plan.is_empty_at(c))
            .collect();
        self.plans
            .iter()
            .zip(&empty)
            .filter(|(_, &is_empty)| is_empty)
            .all(|(vacant, _)| {
                let position = vacant.list.position();
                self.plans
                    .iter()
                    .zip(&empty)
                    .all(|(plan, &is_empty)| {
                        is_empty || plan.list.required_position() != Some(position)
                    })
            })
    }

    fn materialise(&self, choice: &[usize]) -> Mol<Atom, Bond> {
        let scaffold = self.query.scaffold();
        let mut product = scaffold.clone();
        // (R atom, scaffold neighbor) -> fragment atom now bonded to the neighbor
        let mut replaced: HashMap<(NodeIndex, NodeIndex), NodeIndex> = HashMap::new();

        for (plan, &c) in self.plans.iter().zip(choice) {
            for (&site, slot) in plan.sites.iter().zip(&plan.assignments[c]) {
                let Some(candidate) = *slot else {
                    let rest_h = plan.list.rest_h();
                    for neighbor in scaffold.neighbors(site) {
                        product.atom_mut(neighbor).rest_h = Some(rest_h);
                    }
                    continue;
                };

                let rgroup = &plan.list.rgroups()[candidate];
                let offsets = product.append(rgroup.fragment());
                for (order, bond) in self.query.attachment_bonds(site) {
                    let Some(attachment) = rgroup.attachment(order) else {
                        continue;
                    };
                    let Some((a, b)) = scaffold.bond_endpoints(bond) else {
                        continue;
                    };
                    let neighbor = if a == site { b } else { a };
                    let atom = offsets[attachment.index()];
                    product.add_bond(neighbor, atom, scaffold.bond(bond).clone());
                    replaced.insert((site, neighbor), atom);
                }
            }
        }

        let mut removed = vec![false; product.atom_count()];
        for atom in self.query.root_atoms().keys() {
            removed[atom.index()] = true;
        }
        let (result, _) = product.without_atoms(&removed, |owner, r_atom| {
            replaced.get(&(r_atom, owner)).copied().map(AtomId::Node)
        });
        result
    }
}

impl Iterator for Configurations<'_> {
    type Item = Mol<Atom, Bond>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let choice = self.cursor.clone()?;
            self.advance();
            if self.requirements_met(&choice) {
                return Some(self.materialise(&choice));
            }
            debug!(?choice, "skipping configuration with an empty required position");
        }
    }
}

impl FusedIterator for Configurations<'_> {}

impl RGroupQuery {
    /// Lazily enumerates every configuration.
    ///
    /// Fails before producing anything when an R atom's position has no
    /// candidates or a position's occurrence admits no count.
    pub fn configurations(&self) -> Result<Configurations<'_>, RGroupError> {
        Configurations::new(self)
    }

    /// Every configuration, collected.
    pub fn all_configurations(&self) -> Result<Vec<Mol<Atom, Bond>>, RGroupError> {
        let all: Vec<_> = self.configurations()?.collect();
        debug!(count = all.len(), "enumerated configurations");
        Ok(all)
    }
}
