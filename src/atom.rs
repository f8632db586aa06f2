use crate::hybridization::Hybridization;

/// Role an atom plays in a reaction.
///
/// The discriminant is the integer compared by
/// [`Expr::ReactionRole`](crate::query::Expr::ReactionRole).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReactionRole {
    Reactant = 1,
    Agent = 2,
    Product = 3,
}

impl ReactionRole {
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Default atom type for a molecular graph node.
///
/// `Atom` stores intrinsic atomic properties plus the few perceived values the
/// query engine reads (hybridization, reaction role). Ring membership is not
/// stored here: it is derived from the graph on demand and cached per
/// molecule, see [`topology`](crate::topology).
///
/// An atomic number of `0` marks a pseudo atom, such as an R-group
/// placeholder on a scaffold.
///
/// # Examples
///
/// ```
/// use crabquery::Atom;
///
/// let carbon = Atom {
///     atomic_num: 6,
///     hydrogen_count: 3,
///     ..Atom::default()
/// };
/// assert_eq!(carbon.atomic_num, 6);
/// assert!(!carbon.is_pseudo());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, 7 = N, …). `0` for pseudo atoms.
    pub atomic_num: u8,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Mass number. `0` means unspecified (natural abundance).
    pub isotope: u16,
    /// Number of implicit (suppressed) hydrogens on this atom.
    pub hydrogen_count: u8,
    /// Whether this atom is in an aromatic system.
    pub is_aromatic: bool,
    /// Perceived hybridization, if an atom typer has run.
    pub hybridization: Option<Hybridization>,
    /// Reaction role, when the atom belongs to a reaction component.
    pub reaction_role: Option<ReactionRole>,
    /// Whether the remaining open valence may be filled with hydrogen.
    ///
    /// Set by R-group enumeration on atoms that were bonded to an
    /// unsubstituted R-group position.
    pub rest_h: Option<bool>,
}

impl Atom {
    pub fn new(atomic_num: u8) -> Self {
        Self {
            atomic_num,
            ..Self::default()
        }
    }

    /// A pseudo atom (atomic number 0), e.g. an `R#` placeholder.
    pub fn pseudo() -> Self {
        Self::default()
    }

    pub fn is_pseudo(&self) -> bool {
        self.atomic_num == 0
    }

    pub fn with_hydrogens(mut self, count: u8) -> Self {
        self.hydrogen_count = count;
        self
    }

    pub fn aromatic(mut self) -> Self {
        self.is_aromatic = true;
        self
    }
}
