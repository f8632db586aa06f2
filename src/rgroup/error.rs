use thiserror::Error;

/// Errors produced while defining or enumerating an R-group query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RGroupError {
    /// R-group numbers run from 1 to 32.
    #[error("R-group position {0} is outside 1..=32")]
    PositionOutOfRange(u32),
    /// The occurrence text does not follow the grammar.
    #[error("invalid occurrence {0:?}")]
    InvalidOccurrence(String),
    /// Only pseudo atoms can stand for an R-group.
    #[error("atom {0} is not a pseudo atom")]
    NotPseudoAtom(usize),
    /// An attachment bond must touch the R atom it is registered for.
    #[error("bond {bond} is not attached to R atom {atom}")]
    DetachedAttachment { atom: usize, bond: usize },
    /// A list cannot name its own position as required.
    #[error("R{0} cannot require itself")]
    SelfRequirement(u8),
    /// A scaffold R atom refers to a position without candidates.
    #[error("no substituents defined for R{position}")]
    SubstituentsUndefined { position: u8 },
    /// No occurrence count in `0..=max` satisfies the position's grammar.
    #[error("no valid occurrence for R{position} over {max} site(s)")]
    NoValidOccurrence { position: u8, max: u32 },
    /// An attachment atom index lies outside its fragment.
    #[error("attachment atom {atom} is outside a fragment of {atom_count} atoms")]
    AttachmentOutOfRange { atom: usize, atom_count: usize },
    /// An atom index lies outside the scaffold.
    #[error("atom {0} is not in the scaffold")]
    AtomOutOfRange(usize),
}
