//! Predicate expressions over atoms and bonds, and query graphs built from
//! them.
//!
//! An [`Expr`] is a tree of predicates evaluated against one atom or bond of
//! a concrete molecule. [`QueryAtom`] and [`QueryBond`] wrap an expression as
//! the payload of a [`QueryMol`]. [`build_query`] derives a query graph from a
//! molecule, asserting the properties selected by a [`QueryFeatures`] set.

mod atom;
mod builder;
mod combine;
mod error;
mod eval;
mod expr;
mod features;
mod hydrogens;
mod pattern;

pub use atom::{QueryAtom, QueryBond, QueryMol};
pub use builder::build_query;
pub use error::ExprError;
pub use eval::{AtomRef, BondRef, StereoHint};
pub use expr::{Expr, ExprType};
pub use features::{QueryFeature, QueryFeatures};
pub use hydrogens::suppress_query_hydrogens;
pub use pattern::{Pattern, RecursiveQuery};
