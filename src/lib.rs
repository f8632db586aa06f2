pub mod atom;
pub mod bond;
pub mod element;
pub mod hybridization;
pub mod mol;
pub mod query;
pub mod rgroup;
pub mod rings;
pub mod topology;

pub use atom::{Atom, ReactionRole};
pub use bond::{Bond, BondOrder};
pub use hybridization::{assign_hybridization, perceive_hybridization, Hybridization};
pub use mol::{AtomId, Conformation, DoubleBondStereo, Mol, MolId, TetrahedralStereo, Winding};
pub use query::{
    build_query, suppress_query_hydrogens, Expr, ExprType, QueryFeature, QueryFeatures, QueryMol,
};
pub use rgroup::{RGroup, RGroupError, RGroupList, RGroupQuery};
pub use rings::RingInfo;
pub use topology::{RingCache, RingSummary};

#[cfg(test)]
pub(crate) mod fixtures;
