#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
}

impl BondOrder {
    pub fn numeric(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }

    pub fn from_numeric(order: u8) -> Option<Self> {
        match order {
            1 => Some(BondOrder::Single),
            2 => Some(BondOrder::Double),
            3 => Some(BondOrder::Triple),
            _ => None,
        }
    }
}

/// A bond with a concrete Kekulé order.
///
/// Aromatic bonds keep their Kekulé order and additionally carry
/// `is_aromatic`; query predicates decide which of the two they look at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bond {
    pub order: BondOrder,
    pub is_aromatic: bool,
}

impl Bond {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn double() -> Self {
        Self {
            order: BondOrder::Double,
            is_aromatic: false,
        }
    }

    pub fn triple() -> Self {
        Self {
            order: BondOrder::Triple,
            is_aromatic: false,
        }
    }

    /// An aromatic bond with the given Kekulé order.
    pub fn aromatic(order: BondOrder) -> Self {
        Self {
            order,
            is_aromatic: true,
        }
    }
}
