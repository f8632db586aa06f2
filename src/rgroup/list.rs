use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;

use super::error::RGroupError;
use super::occurrence::Occurrence;

/// Highest R-group number.
pub const MAX_POSITION: u8 = 32;

/// Checks that `position` is a usable R-group number and narrows it.
pub fn validate_position(position: u32) -> Result<u8, RGroupError> {
    match u8::try_from(position) {
        Ok(p) if (1..=MAX_POSITION).contains(&p) => Ok(p),
        _ => Err(RGroupError::PositionOutOfRange(position)),
    }
}

/// One candidate substituent for a position.
///
/// The attachment atoms say which fragment atoms take over the scaffold
/// bonds of the R atom: the first attachment receives the bond registered
/// with order 1, the second the bond with order 2.
#[derive(Debug, Clone, PartialEq)]
pub struct RGroup {
    fragment: Mol<Atom, Bond>,
    first_attachment: Option<NodeIndex>,
    second_attachment: Option<NodeIndex>,
}

impl RGroup {
    /// A fragment attached through its first atom.
    pub fn new(fragment: Mol<Atom, Bond>) -> Self {
        let first_attachment = fragment.atoms().next();
        Self {
            fragment,
            first_attachment,
            second_attachment: None,
        }
    }

    pub fn with_attachments(
        fragment: Mol<Atom, Bond>,
        first: Option<NodeIndex>,
        second: Option<NodeIndex>,
    ) -> Result<Self, RGroupError> {
        let atom_count = fragment.atom_count();
        for atom in [first, second].into_iter().flatten() {
            if atom.index() >= atom_count {
                return Err(RGroupError::AttachmentOutOfRange {
                    atom: atom.index(),
                    atom_count,
                });
            }
        }
        Ok(Self {
            fragment,
            first_attachment: first,
            second_attachment: second,
        })
    }

    pub fn fragment(&self) -> &Mol<Atom, Bond> {
        &self.fragment
    }

    pub fn first_attachment(&self) -> Option<NodeIndex> {
        self.first_attachment
    }

    pub fn second_attachment(&self) -> Option<NodeIndex> {
        self.second_attachment
    }

    /// The fragment atom for the scaffold bond registered with `order`.
    pub fn attachment(&self, order: u8) -> Option<NodeIndex> {
        match order {
            1 => self.first_attachment,
            2 => self.second_attachment,
            _ => None,
        }
    }
}

/// The definition of one R-group position: its candidates and the rules for
/// how many of its R atoms are substituted.
///
/// ```
/// use crabquery::rgroup::RGroupList;
///
/// let mut list = RGroupList::new(1).unwrap();
/// list.set_occurrence(">2").unwrap();
/// assert_eq!(list.match_occurrence(5), vec![3, 4, 5]);
/// assert!(RGroupList::new(33).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RGroupList {
    position: u8,
    rest_h: bool,
    occurrence: Occurrence,
    required_position: Option<u8>,
    rgroups: Vec<RGroup>,
}

impl RGroupList {
    pub fn new(position: u32) -> Result<Self, RGroupError> {
        Ok(Self {
            position: validate_position(position)?,
            rest_h: false,
            occurrence: Occurrence::default(),
            required_position: None,
            rgroups: Vec::new(),
        })
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    /// Whether atoms left bare by an unsubstituted R atom may only carry
    /// hydrogen at the open valence.
    pub fn rest_h(&self) -> bool {
        self.rest_h
    }

    pub fn set_rest_h(&mut self, rest_h: bool) {
        self.rest_h = rest_h;
    }

    pub fn occurrence(&self) -> &Occurrence {
        &self.occurrence
    }

    pub fn set_occurrence(&mut self, text: &str) -> Result<(), RGroupError> {
        self.occurrence = Occurrence::parse(text)?;
        Ok(())
    }

    /// A position that must be substituted whenever this one is. A
    /// configuration leaving the required position empty while this one
    /// carries a substituent is never produced.
    pub fn required_position(&self) -> Option<u8> {
        self.required_position
    }

    pub fn set_required_position(&mut self, required: Option<u32>) -> Result<(), RGroupError> {
        let required = required.map(validate_position).transpose()?;
        if required == Some(self.position) {
            return Err(RGroupError::SelfRequirement(self.position));
        }
        self.required_position = required;
        Ok(())
    }

    pub fn rgroups(&self) -> &[RGroup] {
        &self.rgroups
    }

    pub fn add_rgroup(&mut self, rgroup: RGroup) {
        self.rgroups.push(rgroup);
    }

    pub fn match_occurrence(&self, max: u32) -> Vec<u32> {
        self.occurrence.matching_counts(max)
    }
}
