//! R-group queries: a scaffold with variable positions, the candidate
//! substituents for each position, and their expansion into concrete
//! molecules.
//!
//! ```
//! use crabquery::rgroup::{RGroup, RGroupList, RGroupQuery};
//! use crabquery::{Atom, Bond, Mol};
//! use petgraph::graph::NodeIndex;
//!
//! // CH3-R1
//! let mut scaffold = Mol::new();
//! let c = scaffold.add_atom(Atom::new(6).with_hydrogens(3));
//! let r = scaffold.add_atom(Atom::pseudo());
//! scaffold.add_bond(c, r, Bond::single());
//!
//! let mut query = RGroupQuery::new(scaffold);
//! query.set_root_atom(r, 1).unwrap();
//!
//! let mut r1 = RGroupList::new(1).unwrap();
//! for atomic_num in [9, 17] {
//!     let mut fragment = Mol::new();
//!     fragment.add_atom(Atom::new(atomic_num));
//!     r1.add_rgroup(RGroup::new(fragment));
//! }
//! query.add_list(r1);
//!
//! let products = query.all_configurations().unwrap();
//! assert_eq!(products.len(), 2);
//! assert_eq!(products[1].atom(NodeIndex::new(1)).atomic_num, 17);
//! ```

mod enumerate;
mod error;
mod list;
mod occurrence;
mod query;

pub use enumerate::Configurations;
pub use error::RGroupError;
pub use list::{validate_position, RGroup, RGroupList, MAX_POSITION};
pub use occurrence::{Occurrence, OccurrenceToken, DEFAULT_OCCURRENCE};
pub use query::RGroupQuery;
