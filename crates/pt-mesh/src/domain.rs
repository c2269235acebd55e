//! The labelled problem domain.

use core::fmt;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use pt_core::{FacetId, FacetTarget};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::file::load_mesh;
use crate::mesh::Mesh;

/// Boundary role of a facet. A facet has at most one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetCategory {
    Inlet,
    Outlet,
    Wall,
    FreeSlip,
}

impl FacetCategory {
    pub const ALL: [FacetCategory; 4] = [
        FacetCategory::Inlet,
        FacetCategory::Outlet,
        FacetCategory::Wall,
        FacetCategory::FreeSlip,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FacetCategory::Inlet => "inlet",
            FacetCategory::Outlet => "outlet",
            FacetCategory::Wall => "wall",
            FacetCategory::FreeSlip => "free-slip",
        }
    }
}

impl fmt::Display for FacetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the mesh of a domain came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainSource {
    File(PathBuf),
    InMemory,
}

/// A mesh together with its facet labels and boundary categories.
///
/// Labelling happens through `&mut self`; once the domain is moved into a
/// problem it is no longer reachable mutably.
#[derive(Debug)]
pub struct Domain {
    mesh: Box<dyn Mesh>,
    source: DomainSource,
    facet_labels: BTreeMap<FacetId, String>,
    categories: BTreeMap<FacetCategory, BTreeSet<FacetId>>,
}

impl Domain {
    /// Domain over a mesh read from a descriptor file.
    pub fn from_file(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let mesh = load_mesh(path)?;
        tracing::debug!(path = %path.display(), "loaded mesh descriptor");
        Ok(Self::with_source(
            Box::new(mesh),
            DomainSource::File(path.to_path_buf()),
        ))
    }

    /// Domain over an in-memory mesh.
    pub fn from_mesh(mesh: impl Mesh + 'static) -> Self {
        Self::with_source(Box::new(mesh), DomainSource::InMemory)
    }

    fn with_source(mesh: Box<dyn Mesh>, source: DomainSource) -> Self {
        Self {
            mesh,
            source,
            facet_labels: BTreeMap::new(),
            categories: FacetCategory::ALL
                .into_iter()
                .map(|c| (c, BTreeSet::new()))
                .collect(),
        }
    }

    /// Label one or more facets and file them under `categories`.
    ///
    /// The call is all-or-nothing: if any facet is unknown or would end up in
    /// two categories, nothing is changed. Relabelling a facet replaces its
    /// label; repeating its category is a no-op.
    pub fn label_facet(
        &mut self,
        target: impl Into<FacetTarget>,
        label: impl Into<String>,
        categories: &[FacetCategory],
    ) -> DomainResult<()> {
        let target = target.into();
        let label = label.into();
        if target.is_empty() {
            return Err(DomainError::EmptyTarget { label });
        }

        let mut requested: Vec<FacetCategory> = categories.to_vec();
        requested.sort();
        requested.dedup();

        for &facet in target.ids() {
            if !self.mesh.has_facet(facet) {
                return Err(DomainError::UnknownFacet { facet });
            }
            if requested.len() > 1 {
                return Err(DomainError::MultipleCategories {
                    facet,
                    categories: requested,
                });
            }
            if let (Some(existing), Some(&wanted)) = (self.category_of(facet), requested.first())
                && existing != wanted
            {
                return Err(DomainError::CategoryConflict {
                    facet,
                    existing,
                    requested: wanted,
                });
            }
        }

        for &facet in target.ids() {
            self.facet_labels.insert(facet, label.clone());
            for &category in &requested {
                self.categories.entry(category).or_default().insert(facet);
            }
        }
        tracing::debug!(label = %label, facets = ?target.ids(), ?requested, "labelled facets");
        Ok(())
    }

    pub fn mesh(&self) -> &dyn Mesh {
        self.mesh.as_ref()
    }

    pub fn source(&self) -> &DomainSource {
        &self.source
    }

    /// Geometric dimension of the mesh.
    pub fn dimension(&self) -> usize {
        self.mesh.geometric_dimension()
    }

    pub fn label(&self, facet: FacetId) -> Option<&str> {
        self.facet_labels.get(&facet).map(String::as_str)
    }

    pub fn facet_labels(&self) -> &BTreeMap<FacetId, String> {
        &self.facet_labels
    }

    pub fn facets_in(&self, category: FacetCategory) -> impl Iterator<Item = FacetId> + '_ {
        self.categories
            .get(&category)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn category_of(&self, facet: FacetId) -> Option<FacetCategory> {
        self.categories
            .iter()
            .find(|(_, set)| set.contains(&facet))
            .map(|(c, _)| *c)
    }

    pub fn has_facet(&self, facet: FacetId) -> bool {
        self.mesh.has_facet(facet)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hmin, hmax) = self.mesh.cell_size_range();
        writeln!(f, "Dimension: {}.", self.dimension())?;
        writeln!(f, "Number of mesh elements: {}.", self.mesh.num_cells())?;
        write!(f, "Mesh element size: {hmin:.4e} - {hmax:.4e}.")?;
        for (facet, label) in &self.facet_labels {
            let role = self
                .category_of(*facet)
                .map(FacetCategory::as_str)
                .unwrap_or("unclassified");
            write!(f, "\n  facet {facet}: {label} ({role})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured::StructuredMesh;

    fn id(raw: u32) -> FacetId {
        FacetId::new(raw).unwrap()
    }

    fn channel() -> Domain {
        Domain::from_mesh(StructuredMesh::rectangle(8, 2, 4.0, 1.0).unwrap())
    }

    #[test]
    fn label_single_and_list() {
        let mut d = channel();
        d.label_facet(id(1), "Inflow", &[FacetCategory::Inlet]).unwrap();
        d.label_facet(vec![id(3), id(4)], "Walls", &[FacetCategory::Wall])
            .unwrap();

        assert_eq!(d.label(id(1)), Some("Inflow"));
        assert_eq!(d.label(id(4)), Some("Walls"));
        assert_eq!(d.facets_in(FacetCategory::Wall).collect::<Vec<_>>(), vec![id(3), id(4)]);
        assert_eq!(d.category_of(id(1)), Some(FacetCategory::Inlet));
        assert_eq!(d.category_of(id(2)), None);
    }

    #[test]
    fn conflicting_flags_in_one_call_are_rejected() {
        let mut d = channel();
        let err = d
            .label_facet(id(1), "Both", &[FacetCategory::Inlet, FacetCategory::Outlet])
            .unwrap_err();
        match err {
            DomainError::MultipleCategories { facet, categories } => {
                assert_eq!(facet, id(1));
                assert_eq!(categories, vec![FacetCategory::Inlet, FacetCategory::Outlet]);
            }
            other => panic!("expected MultipleCategories, got {other:?}"),
        }
        assert!(d.label(id(1)).is_none());
        assert_eq!(d.category_of(id(1)), None);
    }

    #[test]
    fn conflict_with_earlier_call_leaves_domain_untouched() {
        let mut d = channel();
        d.label_facet(id(3), "Wall", &[FacetCategory::Wall]).unwrap();
        let err = d
            .label_facet(vec![id(2), id(3)], "Slip", &[FacetCategory::FreeSlip])
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::CategoryConflict {
                existing: FacetCategory::Wall,
                requested: FacetCategory::FreeSlip,
                ..
            }
        ));
        assert!(d.label(id(2)).is_none());
        assert_eq!(d.label(id(3)), Some("Wall"));
    }

    #[test]
    fn relabel_same_category_is_idempotent() {
        let mut d = channel();
        d.label_facet(id(2), "Outlet", &[FacetCategory::Outlet]).unwrap();
        d.label_facet(id(2), "Exit", &[FacetCategory::Outlet]).unwrap();
        assert_eq!(d.label(id(2)), Some("Exit"));
        assert_eq!(d.facets_in(FacetCategory::Outlet).count(), 1);
    }

    #[test]
    fn unknown_and_empty_targets_fail() {
        let mut d = channel();
        assert!(matches!(
            d.label_facet(id(5), "Top", &[]).unwrap_err(),
            DomainError::UnknownFacet { .. }
        ));
        assert!(matches!(
            d.label_facet(Vec::<FacetId>::new(), "Nothing", &[]).unwrap_err(),
            DomainError::EmptyTarget { .. }
        ));
    }

    #[test]
    fn display_mentions_element_count() {
        let mut d = channel();
        d.label_facet(id(1), "Inflow", &[FacetCategory::Inlet]).unwrap();
        let text = d.to_string();
        assert!(text.contains("Number of mesh elements: 16."));
        assert!(text.contains("facet 1: Inflow (inlet)"));
    }
}
