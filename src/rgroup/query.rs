use std::collections::BTreeMap;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;

use super::error::RGroupError;
use super::list::{validate_position, RGroupList};

/// A scaffold with R-group positions and the candidates for each.
///
/// R atoms are pseudo atoms of the scaffold registered with
/// [`set_root_atom`](Self::set_root_atom). Each may carry ordered attachment
/// bonds; when a candidate is substituted in, the bond registered with order
/// `k` is moved from the R atom to the candidate's `k`-th attachment atom.
#[derive(Debug, Clone)]
pub struct RGroupQuery {
    scaffold: Mol<Atom, Bond>,
    root_atoms: BTreeMap<NodeIndex, u8>,
    attachment_points: BTreeMap<NodeIndex, BTreeMap<u8, EdgeIndex>>,
    lists: BTreeMap<u8, RGroupList>,
}

impl RGroupQuery {
    pub fn new(scaffold: Mol<Atom, Bond>) -> Self {
        Self {
            scaffold,
            root_atoms: BTreeMap::new(),
            attachment_points: BTreeMap::new(),
            lists: BTreeMap::new(),
        }
    }

    pub fn scaffold(&self) -> &Mol<Atom, Bond> {
        &self.scaffold
    }

    /// Marks the pseudo atom `atom` as an R atom of `position`.
    pub fn set_root_atom(&mut self, atom: NodeIndex, position: u32) -> Result<(), RGroupError> {
        if atom.index() >= self.scaffold.atom_count() {
            return Err(RGroupError::AtomOutOfRange(atom.index()));
        }
        if !self.scaffold.atom(atom).is_pseudo() {
            return Err(RGroupError::NotPseudoAtom(atom.index()));
        }
        let position = validate_position(position)?;
        self.root_atoms.insert(atom, position);
        Ok(())
    }

    /// Registers `bond` as the attachment bond of R atom `atom` with the
    /// given order (1 for the first attachment, 2 for the second).
    pub fn set_attachment_point(
        &mut self,
        atom: NodeIndex,
        order: u8,
        bond: EdgeIndex,
    ) -> Result<(), RGroupError> {
        let detached = || RGroupError::DetachedAttachment {
            atom: atom.index(),
            bond: bond.index(),
        };
        let (a, b) = self.scaffold.bond_endpoints(bond).ok_or_else(detached)?;
        if a != atom && b != atom {
            return Err(detached());
        }
        self.attachment_points
            .entry(atom)
            .or_default()
            .insert(order, bond);
        Ok(())
    }

    /// Adds or replaces the definition of a position.
    pub fn add_list(&mut self, list: RGroupList) -> Option<RGroupList> {
        self.lists.insert(list.position(), list)
    }

    pub fn list(&self, position: u8) -> Option<&RGroupList> {
        self.lists.get(&position)
    }

    pub fn list_mut(&mut self, position: u8) -> Option<&mut RGroupList> {
        self.lists.get_mut(&position)
    }

    pub fn lists(&self) -> impl Iterator<Item = &RGroupList> {
        self.lists.values()
    }

    pub fn root_atoms(&self) -> &BTreeMap<NodeIndex, u8> {
        &self.root_atoms
    }

    /// Attachment bonds of an R atom keyed by order.
    pub fn attachment_points(&self, atom: NodeIndex) -> Option<&BTreeMap<u8, EdgeIndex>> {
        self.attachment_points.get(&atom)
    }

    /// The bonds a substituent takes over from `atom`, with their orders.
    ///
    /// Registered attachment points win. An R atom without any uses all of
    /// its scaffold bonds, numbered from 1 in bond index order.
    pub fn attachment_bonds(&self, atom: NodeIndex) -> Vec<(u8, EdgeIndex)> {
        if let Some(points) = self.attachment_points.get(&atom) {
            return points.iter().map(|(&order, &bond)| (order, bond)).collect();
        }
        let mut bonds: Vec<EdgeIndex> = self.scaffold.bonds_of(atom).collect();
        bonds.sort();
        (1..=u8::MAX).zip(bonds).collect()
    }

    /// R atoms of `position`, or of every position for `None`, in ascending
    /// index order.
    pub fn rgroup_query_atoms(&self, position: Option<u8>) -> Vec<NodeIndex> {
        self.root_atoms
            .iter()
            .filter(|(_, &p)| position.map_or(true, |want| p == want))
            .map(|(&atom, _)| atom)
            .collect()
    }

    /// Number of candidate fragments over all positions.
    pub fn total_rgroup_count(&self) -> usize {
        self.lists.values().map(|list| list.rgroups().len()).sum()
    }

    /// Whether every position named by an R atom has at least one candidate.
    pub fn are_substituents_defined(&self) -> bool {
        self.undefined_position().is_none()
    }

    pub(super) fn undefined_position(&self) -> Option<u8> {
        self.root_atoms.values().copied().find(|position| {
            self.lists
                .get(position)
                .map_or(true, |list| list.rgroups().is_empty())
        })
    }

    /// Whether every defined position is used by at least one R atom.
    pub fn are_root_atoms_defined(&self) -> bool {
        self.lists
            .keys()
            .all(|position| self.root_atoms.values().any(|p| p == position))
    }
}
