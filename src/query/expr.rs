use std::fmt;

use super::error::ExprError;
use super::pattern::RecursiveQuery;
use super::QueryMol;

/// Tag of every predicate kind, without operands or children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExprType {
    True,
    False,
    /// Placeholder for "nothing asserted yet". Never matches.
    Undefined,
    IsAromatic,
    IsAliphatic,
    IsInRing,
    IsInChain,
    IsHetero,
    HasImplicitHydrogen,
    HasIsotope,
    HasUnspecifiedIsotope,
    Unsaturated,
    HasHeteroSubstituent,
    HasAliphaticHeteroSubstituent,
    Element,
    AliphaticElement,
    AromaticElement,
    ImplicitHCount,
    TotalHCount,
    Degree,
    TotalDegree,
    HeavyDegree,
    Valence,
    Isotope,
    FormalCharge,
    RingBondCount,
    RingCount,
    RingSmallest,
    RingSize,
    HeteroSubstituentCount,
    AliphaticHeteroSubstituentCount,
    Insaturation,
    PeriodicGroup,
    HybridisationNumber,
    ReactionRole,
    Stereochemistry,
    AliphaticOrder,
    Order,
    SingleOrAromatic,
    DoubleOrAromatic,
    SingleOrDouble,
    And,
    Or,
    Not,
    Recursive,
}

impl ExprType {
    pub fn is_logical(self) -> bool {
        matches!(self, ExprType::And | ExprType::Or | ExprType::Not)
    }

    /// Whether expressions of this kind carry an integer operand.
    pub fn has_value(self) -> bool {
        use ExprType::*;
        matches!(
            self,
            Element
                | AliphaticElement
                | AromaticElement
                | ImplicitHCount
                | TotalHCount
                | Degree
                | TotalDegree
                | HeavyDegree
                | Valence
                | Isotope
                | FormalCharge
                | RingBondCount
                | RingCount
                | RingSmallest
                | RingSize
                | HeteroSubstituentCount
                | AliphaticHeteroSubstituentCount
                | Insaturation
                | PeriodicGroup
                | HybridisationNumber
                | ReactionRole
                | Stereochemistry
                | AliphaticOrder
                | Order
        )
    }

    /// Kinds that only make sense on a bond. They never match an atom.
    pub fn is_bond_kind(self) -> bool {
        matches!(
            self,
            ExprType::AliphaticOrder
                | ExprType::Order
                | ExprType::SingleOrAromatic
                | ExprType::DoubleOrAromatic
                | ExprType::SingleOrDouble
        )
    }

    /// Kinds that are meaningful on both atoms and bonds.
    pub fn is_shared_kind(self) -> bool {
        matches!(
            self,
            ExprType::True
                | ExprType::False
                | ExprType::Undefined
                | ExprType::IsAromatic
                | ExprType::IsAliphatic
                | ExprType::IsInRing
                | ExprType::IsInChain
                | ExprType::Stereochemistry
        ) || self.is_logical()
    }

    pub fn name(self) -> &'static str {
        use ExprType::*;
        match self {
            True => "TRUE",
            False => "FALSE",
            Undefined => "NONE",
            IsAromatic => "IS_AROMATIC",
            IsAliphatic => "IS_ALIPHATIC",
            IsInRing => "IS_IN_RING",
            IsInChain => "IS_IN_CHAIN",
            IsHetero => "IS_HETERO",
            HasImplicitHydrogen => "HAS_IMPLICIT_HYDROGEN",
            HasIsotope => "HAS_ISOTOPE",
            HasUnspecifiedIsotope => "HAS_UNSPEC_ISOTOPE",
            Unsaturated => "UNSATURATED",
            HasHeteroSubstituent => "HAS_HETERO_SUBSTITUENT",
            HasAliphaticHeteroSubstituent => "HAS_ALIPHATIC_HETERO_SUBSTITUENT",
            Element => "ELEMENT",
            AliphaticElement => "ALIPHATIC_ELEMENT",
            AromaticElement => "AROMATIC_ELEMENT",
            ImplicitHCount => "IMPL_H_COUNT",
            TotalHCount => "TOTAL_H_COUNT",
            Degree => "DEGREE",
            TotalDegree => "TOTAL_DEGREE",
            HeavyDegree => "HEAVY_DEGREE",
            Valence => "VALENCE",
            Isotope => "ISOTOPE",
            FormalCharge => "FORMAL_CHARGE",
            RingBondCount => "RING_BOND_COUNT",
            RingCount => "RING_COUNT",
            RingSmallest => "RING_SMALLEST",
            RingSize => "RING_SIZE",
            HeteroSubstituentCount => "HETERO_SUBSTITUENT_COUNT",
            AliphaticHeteroSubstituentCount => "ALIPHATIC_HETERO_SUBSTITUENT_COUNT",
            Insaturation => "INSATURATION",
            PeriodicGroup => "PERIODIC_GROUP",
            HybridisationNumber => "HYBRIDISATION_NUMBER",
            ReactionRole => "REACTION_ROLE",
            Stereochemistry => "STEREOCHEMISTRY",
            AliphaticOrder => "ALIPHATIC_ORDER",
            Order => "ORDER",
            SingleOrAromatic => "SINGLE_OR_AROMATIC",
            DoubleOrAromatic => "DOUBLE_OR_AROMATIC",
            SingleOrDouble => "SINGLE_OR_DOUBLE",
            And => "AND",
            Or => "OR",
            Not => "NOT",
            Recursive => "RECURSIVE",
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A predicate over a single atom or bond.
///
/// Leaves test one property of the candidate; `And`/`Or` hold at least two
/// operands, `Not` exactly one. Operand domains follow the property: element
/// numbers and counts are `u8`, mass numbers `u16`, charges `i8`.
///
/// Expressions are plain values. The combinators [`and`](Expr::and),
/// [`or`](Expr::or) and [`negate`](Expr::negate) consume their inputs and
/// return a normalised result.
///
/// # Examples
///
/// ```
/// use crabquery::query::Expr;
///
/// let carbonyl_carbon = Expr::True
///     .and(Expr::AliphaticElement(6))
///     .and(Expr::Degree(3))
///     .and(Expr::Unsaturated);
/// assert_eq!(
///     carbonyl_carbon.to_string(),
///     "AND(ALIPHATIC_ELEMENT=6,DEGREE=3,UNSATURATED)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    True,
    False,
    Undefined,
    IsAromatic,
    IsAliphatic,
    IsInRing,
    IsInChain,
    /// Neither carbon nor hydrogen.
    IsHetero,
    HasImplicitHydrogen,
    HasIsotope,
    HasUnspecifiedIsotope,
    /// Has at least one double bond.
    Unsaturated,
    HasHeteroSubstituent,
    HasAliphaticHeteroSubstituent,
    Element(u8),
    AliphaticElement(u8),
    AromaticElement(u8),
    ImplicitHCount(u8),
    /// Implicit plus explicit hydrogen neighbors.
    TotalHCount(u8),
    Degree(u8),
    /// Degree plus implicit hydrogens.
    TotalDegree(u8),
    /// Degree not counting explicit hydrogen neighbors.
    HeavyDegree(u8),
    /// Implicit hydrogens plus the sum of bond orders.
    Valence(u8),
    Isotope(u16),
    FormalCharge(i8),
    RingBondCount(u8),
    /// Number of minimum-cycle-basis rings containing the atom.
    RingCount(u8),
    /// The atom's smallest ring, estimated by BFS, has this many atoms.
    RingSmallest(u8),
    /// The atom lies on some simple ring of exactly this many atoms.
    RingSize(u8),
    HeteroSubstituentCount(u8),
    AliphaticHeteroSubstituentCount(u8),
    /// Number of double bonds.
    Insaturation(u8),
    PeriodicGroup(u8),
    HybridisationNumber(u8),
    ReactionRole(u8),
    Stereochemistry(u8),
    /// Non-aromatic bond of this numeric order.
    AliphaticOrder(u8),
    /// Bond of this numeric order, aromatic or not.
    Order(u8),
    SingleOrAromatic,
    DoubleOrAromatic,
    SingleOrDouble,
    /// Conjunction of at least two operands. [`Expr::and`] and
    /// [`Expr::logical`] keep that invariant; a hand-built `And` must too.
    And(Vec<Expr>),
    /// Disjunction of at least two operands, kept the same way as `And`.
    Or(Vec<Expr>),
    Not(Box<Expr>),
    /// The atom anchors a match of a nested query graph at its first atom.
    Recursive(Box<RecursiveQuery>),
}

fn narrow<T: TryFrom<i32>>(kind: ExprType, value: i32) -> Result<T, ExprError> {
    T::try_from(value).map_err(|_| ExprError::ValueOutOfRange { kind, value })
}

impl Expr {
    /// Builds an operand-free leaf.
    pub fn primitive(kind: ExprType) -> Result<Expr, ExprError> {
        use ExprType as T;
        if kind.is_logical() || kind == T::Recursive {
            return Err(ExprError::NotALeaf(kind));
        }
        if kind.has_value() {
            return Err(ExprError::MissingValue(kind));
        }
        Ok(match kind {
            T::True => Expr::True,
            T::False => Expr::False,
            T::Undefined => Expr::Undefined,
            T::IsAromatic => Expr::IsAromatic,
            T::IsAliphatic => Expr::IsAliphatic,
            T::IsInRing => Expr::IsInRing,
            T::IsInChain => Expr::IsInChain,
            T::IsHetero => Expr::IsHetero,
            T::HasImplicitHydrogen => Expr::HasImplicitHydrogen,
            T::HasIsotope => Expr::HasIsotope,
            T::HasUnspecifiedIsotope => Expr::HasUnspecifiedIsotope,
            T::Unsaturated => Expr::Unsaturated,
            T::HasHeteroSubstituent => Expr::HasHeteroSubstituent,
            T::HasAliphaticHeteroSubstituent => Expr::HasAliphaticHeteroSubstituent,
            T::SingleOrAromatic => Expr::SingleOrAromatic,
            T::DoubleOrAromatic => Expr::DoubleOrAromatic,
            T::SingleOrDouble => Expr::SingleOrDouble,
            _ => return Err(ExprError::MissingValue(kind)),
        })
    }

    /// Builds a leaf carrying an integer operand.
    pub fn value(kind: ExprType, value: i32) -> Result<Expr, ExprError> {
        use ExprType as T;
        if kind.is_logical() || kind == T::Recursive {
            return Err(ExprError::NotALeaf(kind));
        }
        if !kind.has_value() {
            return Err(ExprError::UnexpectedValue(kind));
        }
        let small = || narrow::<u8>(kind, value);
        Ok(match kind {
            T::Element | T::AliphaticElement | T::AromaticElement => {
                let z = small()?;
                if z > 118 {
                    return Err(ExprError::ValueOutOfRange { kind, value });
                }
                match kind {
                    T::Element => Expr::Element(z),
                    T::AliphaticElement => Expr::AliphaticElement(z),
                    _ => Expr::AromaticElement(z),
                }
            }
            T::ImplicitHCount => Expr::ImplicitHCount(small()?),
            T::TotalHCount => Expr::TotalHCount(small()?),
            T::Degree => Expr::Degree(small()?),
            T::TotalDegree => Expr::TotalDegree(small()?),
            T::HeavyDegree => Expr::HeavyDegree(small()?),
            T::Valence => Expr::Valence(small()?),
            T::Isotope => Expr::Isotope(narrow(kind, value)?),
            T::FormalCharge => Expr::FormalCharge(narrow(kind, value)?),
            T::RingBondCount => Expr::RingBondCount(small()?),
            T::RingCount => Expr::RingCount(small()?),
            T::RingSmallest => Expr::RingSmallest(small()?),
            T::RingSize => Expr::RingSize(small()?),
            T::HeteroSubstituentCount => Expr::HeteroSubstituentCount(small()?),
            T::AliphaticHeteroSubstituentCount => Expr::AliphaticHeteroSubstituentCount(small()?),
            T::Insaturation => Expr::Insaturation(small()?),
            T::PeriodicGroup => Expr::PeriodicGroup(small()?),
            T::HybridisationNumber => Expr::HybridisationNumber(small()?),
            T::ReactionRole => Expr::ReactionRole(small()?),
            T::Stereochemistry => Expr::Stereochemistry(small()?),
            T::AliphaticOrder => Expr::AliphaticOrder(small()?),
            T::Order => Expr::Order(small()?),
            _ => return Err(ExprError::UnexpectedValue(kind)),
        })
    }

    /// Builds a logical node from explicit children.
    ///
    /// `And` and `Or` need both children; `Not` needs `left` only.
    pub fn logical(
        kind: ExprType,
        left: Option<Expr>,
        right: Option<Expr>,
    ) -> Result<Expr, ExprError> {
        let given = left.is_some() as usize + right.is_some() as usize;
        match (kind, left, right) {
            (ExprType::And, Some(l), Some(r)) => Ok(Expr::And(vec![l, r])),
            (ExprType::Or, Some(l), Some(r)) => Ok(Expr::Or(vec![l, r])),
            (ExprType::Not, Some(l), None) => Ok(Expr::not(l)),
            (ExprType::And | ExprType::Or, _, _) => Err(ExprError::Arity {
                kind,
                expected: 2,
                given,
            }),
            (ExprType::Not, _, _) => Err(ExprError::Arity {
                kind,
                expected: 1,
                given,
            }),
            _ => Err(ExprError::NotLogical(kind)),
        }
    }

    /// Wraps `inner` in a NOT node without simplification.
    pub fn not(inner: Expr) -> Expr {
        Expr::Not(Box::new(inner))
    }

    /// A recursive predicate anchored on the first atom of `query`.
    pub fn recursive(query: QueryMol) -> Result<Expr, ExprError> {
        Ok(Expr::Recursive(Box::new(RecursiveQuery::new(query)?)))
    }

    pub fn kind(&self) -> ExprType {
        use ExprType as T;
        match self {
            Expr::True => T::True,
            Expr::False => T::False,
            Expr::Undefined => T::Undefined,
            Expr::IsAromatic => T::IsAromatic,
            Expr::IsAliphatic => T::IsAliphatic,
            Expr::IsInRing => T::IsInRing,
            Expr::IsInChain => T::IsInChain,
            Expr::IsHetero => T::IsHetero,
            Expr::HasImplicitHydrogen => T::HasImplicitHydrogen,
            Expr::HasIsotope => T::HasIsotope,
            Expr::HasUnspecifiedIsotope => T::HasUnspecifiedIsotope,
            Expr::Unsaturated => T::Unsaturated,
            Expr::HasHeteroSubstituent => T::HasHeteroSubstituent,
            Expr::HasAliphaticHeteroSubstituent => T::HasAliphaticHeteroSubstituent,
            Expr::Element(_) => T::Element,
            Expr::AliphaticElement(_) => T::AliphaticElement,
            Expr::AromaticElement(_) => T::AromaticElement,
            Expr::ImplicitHCount(_) => T::ImplicitHCount,
            Expr::TotalHCount(_) => T::TotalHCount,
            Expr::Degree(_) => T::Degree,
            Expr::TotalDegree(_) => T::TotalDegree,
            Expr::HeavyDegree(_) => T::HeavyDegree,
            Expr::Valence(_) => T::Valence,
            Expr::Isotope(_) => T::Isotope,
            Expr::FormalCharge(_) => T::FormalCharge,
            Expr::RingBondCount(_) => T::RingBondCount,
            Expr::RingCount(_) => T::RingCount,
            Expr::RingSmallest(_) => T::RingSmallest,
            Expr::RingSize(_) => T::RingSize,
            Expr::HeteroSubstituentCount(_) => T::HeteroSubstituentCount,
            Expr::AliphaticHeteroSubstituentCount(_) => T::AliphaticHeteroSubstituentCount,
            Expr::Insaturation(_) => T::Insaturation,
            Expr::PeriodicGroup(_) => T::PeriodicGroup,
            Expr::HybridisationNumber(_) => T::HybridisationNumber,
            Expr::ReactionRole(_) => T::ReactionRole,
            Expr::Stereochemistry(_) => T::Stereochemistry,
            Expr::AliphaticOrder(_) => T::AliphaticOrder,
            Expr::Order(_) => T::Order,
            Expr::SingleOrAromatic => T::SingleOrAromatic,
            Expr::DoubleOrAromatic => T::DoubleOrAromatic,
            Expr::SingleOrDouble => T::SingleOrDouble,
            Expr::And(_) => T::And,
            Expr::Or(_) => T::Or,
            Expr::Not(_) => T::Not,
            Expr::Recursive(_) => T::Recursive,
        }
    }

    /// The integer operand, for value kinds.
    pub fn value_of(&self) -> Option<i32> {
        match *self {
            Expr::Element(v)
            | Expr::AliphaticElement(v)
            | Expr::AromaticElement(v)
            | Expr::ImplicitHCount(v)
            | Expr::TotalHCount(v)
            | Expr::Degree(v)
            | Expr::TotalDegree(v)
            | Expr::HeavyDegree(v)
            | Expr::Valence(v)
            | Expr::RingBondCount(v)
            | Expr::RingCount(v)
            | Expr::RingSmallest(v)
            | Expr::RingSize(v)
            | Expr::HeteroSubstituentCount(v)
            | Expr::AliphaticHeteroSubstituentCount(v)
            | Expr::Insaturation(v)
            | Expr::PeriodicGroup(v)
            | Expr::HybridisationNumber(v)
            | Expr::ReactionRole(v)
            | Expr::Stereochemistry(v)
            | Expr::AliphaticOrder(v)
            | Expr::Order(v) => Some(i32::from(v)),
            Expr::Isotope(v) => Some(i32::from(v)),
            Expr::FormalCharge(v) => Some(i32::from(v)),
            _ => None,
        }
    }

    pub fn is_logical(&self) -> bool {
        self.kind().is_logical()
    }

    /// Direct children of a logical node; empty for leaves.
    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::And(parts) | Expr::Or(parts) => parts,
            Expr::Not(inner) => std::slice::from_ref(inner.as_ref()),
            _ => &[],
        }
    }

    /// Depth of the tree; leaves have depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Expr::depth).max().unwrap_or(0)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::And(parts) | Expr::Or(parts) => {
                write!(f, "{}(", self.kind())?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{part}")?;
                }
                f.write_str(")")
            }
            Expr::Not(inner) => write!(f, "NOT({inner})"),
            Expr::Recursive(query) => write!(f, "RECURSIVE({} atoms)", query.query().atom_count()),
            leaf => match leaf.value_of() {
                Some(v) => write!(f, "{}={v}", leaf.kind()),
                None => write!(f, "{}", leaf.kind()),
            },
        }
    }
}
