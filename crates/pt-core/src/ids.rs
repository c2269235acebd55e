use core::fmt;
use core::num::NonZeroU32;

use crate::error::{PtError, PtResult};

/// Boundary facet identifier as enumerated by the mesh.
///
/// Mesh generators number boundary facets from 1, so the raw value is
/// stored as `NonZeroU32` and `Option<FacetId>` stays the size of a `u32`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FacetId(NonZeroU32);

impl FacetId {
    /// Create a facet id from its mesh number. Zero is rejected.
    pub fn new(raw: u32) -> PtResult<Self> {
        NonZeroU32::new(raw)
            .map(Self)
            .ok_or(PtError::InvalidFacetId { value: raw })
    }

    /// The mesh number of this facet.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for FacetId {
    type Error = PtError;

    fn try_from(raw: u32) -> PtResult<Self> {
        Self::new(raw)
    }
}

impl fmt::Debug for FacetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FacetId({})", self.get())
    }
}

impl fmt::Display for FacetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// One facet or a collection of facets that an operation applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FacetTarget {
    One(FacetId),
    Many(Vec<FacetId>),
}

impl FacetTarget {
    /// Build a target from raw mesh numbers.
    pub fn from_raw(raw: &[u32]) -> PtResult<Self> {
        let ids = raw
            .iter()
            .map(|&r| FacetId::new(r))
            .collect::<PtResult<Vec<_>>>()?;
        Ok(match ids.as_slice() {
            [single] => FacetTarget::One(*single),
            _ => FacetTarget::Many(ids),
        })
    }

    /// Facets in the order they were supplied.
    pub fn ids(&self) -> &[FacetId] {
        match self {
            FacetTarget::One(id) => core::slice::from_ref(id),
            FacetTarget::Many(ids) => ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }
}

impl From<FacetId> for FacetTarget {
    fn from(id: FacetId) -> Self {
        FacetTarget::One(id)
    }
}

impl From<Vec<FacetId>> for FacetTarget {
    fn from(ids: Vec<FacetId>) -> Self {
        FacetTarget::Many(ids)
    }
}

impl From<&[FacetId]> for FacetTarget {
    fn from(ids: &[FacetId]) -> Self {
        FacetTarget::Many(ids.to_vec())
    }
}

impl<const N: usize> From<[FacetId; N]> for FacetTarget {
    fn from(ids: [FacetId; N]) -> Self {
        FacetTarget::Many(ids.to_vec())
    }
}
