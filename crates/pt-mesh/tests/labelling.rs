//! Property tests for facet labelling.

use proptest::prelude::*;
use pt_core::FacetId;
use pt_mesh::{Domain, FacetCategory, Mesh, StructuredMesh};

fn category() -> impl Strategy<Value = FacetCategory> {
    prop::sample::select(FacetCategory::ALL.to_vec())
}

proptest! {
    #[test]
    fn each_labelled_facet_has_one_label_and_exactly_its_category(
        assignments in prop::collection::vec((1u32..=6, category()), 1..12)
    ) {
        let mut domain = Domain::from_mesh(StructuredMesh::cuboid(2, 2, 2, 1.0, 1.0, 1.0).unwrap());
        let mut expected = std::collections::BTreeMap::new();

        for (raw, cat) in &assignments {
            let facet = FacetId::new(*raw).unwrap();
            let label = format!("facet-{raw}");
            let result = domain.label_facet(facet, label, &[*cat]);
            match expected.get(&facet) {
                Some(previous) if previous != cat => prop_assert!(result.is_err()),
                _ => {
                    prop_assert!(result.is_ok());
                    expected.insert(facet, *cat);
                }
            }
        }

        prop_assert_eq!(domain.facet_labels().len(), expected.len());
        for (facet, cat) in &expected {
            prop_assert_eq!(domain.category_of(*facet), Some(*cat));
            let memberships = FacetCategory::ALL
                .iter()
                .filter(|c| domain.facets_in(**c).any(|f| f == *facet))
                .count();
            prop_assert_eq!(memberships, 1);
        }
    }
}

#[test]
fn domain_from_file_records_source() {
    let path = std::env::temp_dir().join("pt_mesh_domain_from_file.json");
    std::fs::write(
        &path,
        r#"{"type": "box", "nx": 2, "ny": 2, "nz": 1, "lx": 1.0, "ly": 1.0, "lz": 0.5}"#,
    )
    .unwrap();

    let domain = Domain::from_file(&path).unwrap();
    assert_eq!(domain.dimension(), 3);
    assert_eq!(domain.source(), &pt_mesh::DomainSource::File(path.clone()));
    assert_eq!(domain.mesh().num_cells(), 4);
}
