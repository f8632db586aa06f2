/// A property [`build_query`](super::build_query) can assert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFeature {
    Element,
    Aromaticity,
    Isotope,
    Degree,
    TotalDegree,
    RingMembership,
    ImplicitHCount,
    RingBondCount,
    FormalCharge,
    Stereochemistry,
    BondOrder,
}

impl QueryFeature {
    pub const ALL: [QueryFeature; 11] = [
        QueryFeature::Element,
        QueryFeature::Aromaticity,
        QueryFeature::Isotope,
        QueryFeature::Degree,
        QueryFeature::TotalDegree,
        QueryFeature::RingMembership,
        QueryFeature::ImplicitHCount,
        QueryFeature::RingBondCount,
        QueryFeature::FormalCharge,
        QueryFeature::Stereochemistry,
        QueryFeature::BondOrder,
    ];

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// A set of [`QueryFeature`]s.
///
/// ```
/// use crabquery::query::{QueryFeature, QueryFeatures};
///
/// let features = QueryFeatures::empty()
///     .with(QueryFeature::Element)
///     .with(QueryFeature::Aromaticity);
/// assert!(features.contains(QueryFeature::Element));
/// assert!(!features.contains(QueryFeature::Degree));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QueryFeatures(u16);

impl QueryFeatures {
    pub const fn empty() -> Self {
        QueryFeatures(0)
    }

    pub fn all() -> Self {
        QueryFeature::ALL.into_iter().collect()
    }

    /// Element, aromaticity, bond order and ring membership: the usual
    /// "same skeleton" query.
    pub fn skeleton() -> Self {
        [
            QueryFeature::Element,
            QueryFeature::Aromaticity,
            QueryFeature::BondOrder,
            QueryFeature::RingMembership,
        ]
        .into_iter()
        .collect()
    }

    pub fn with(self, feature: QueryFeature) -> Self {
        QueryFeatures(self.0 | feature.bit())
    }

    pub fn without(self, feature: QueryFeature) -> Self {
        QueryFeatures(self.0 & !feature.bit())
    }

    pub fn contains(self, feature: QueryFeature) -> bool {
        self.0 & feature.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = QueryFeature> {
        QueryFeature::ALL.into_iter().filter(move |&f| self.contains(f))
    }
}

impl FromIterator<QueryFeature> for QueryFeatures {
    fn from_iter<I: IntoIterator<Item = QueryFeature>>(iter: I) -> Self {
        iter.into_iter().fold(QueryFeatures::empty(), QueryFeatures::with)
    }
}
