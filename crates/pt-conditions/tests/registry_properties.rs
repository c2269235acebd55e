//! Property tests for condition registration.

use proptest::prelude::*;
use pt_conditions::{BoundaryConditions, Expression};
use pt_core::{FacetId, FieldKind};

proptest! {
    #[test]
    fn velocity_list_yields_one_entry_per_facet(
        raw in prop::collection::vec(1u32..50, 1..20),
        ux in -10.0f64..10.0,
        time_dependent in any::<bool>(),
    ) {
        let facets: Vec<FacetId> = raw.iter().map(|&r| FacetId::new(r).unwrap()).collect();
        let mut bcs = BoundaryConditions::new();
        bcs.add_velocity_condition([ux, 0.0], facets.clone(), time_dependent).unwrap();

        let list = bcs.conditions(FieldKind::Velocity);
        prop_assert_eq!(list.len(), facets.len());
        for (bc, facet) in list.iter().zip(&facets) {
            prop_assert_eq!(bc.facet, *facet);
            prop_assert_eq!(&bc.expression, &Expression::constant([ux, 0.0]));
            prop_assert_eq!(bc.time_dependent, time_dependent);
            prop_assert_eq!(bc.field, FieldKind::Velocity);
        }
    }

    #[test]
    fn pressure_expression_is_shared_across_expanded_entries(
        raw in prop::collection::vec(1u32..50, 1..20),
    ) {
        let facets: Vec<FacetId> = raw.iter().map(|&r| FacetId::new(r).unwrap()).collect();
        let ramp = Expression::function(1, |_x, t, out| out[0] = t);
        let mut bcs = BoundaryConditions::new();
        bcs.add_pressure_condition(ramp.clone(), facets.clone(), true).unwrap();

        let list = bcs.conditions(FieldKind::Pressure);
        prop_assert_eq!(list.len(), facets.len());
        prop_assert!(list.iter().all(|bc| bc.expression == ramp && bc.time_dependent));
    }

    #[test]
    fn resolved_has_one_entry_per_distinct_facet(
        raw in prop::collection::vec(1u32..10, 1..30),
    ) {
        let mut bcs = BoundaryConditions::new();
        for (i, r) in raw.iter().enumerate() {
            bcs.add_pressure_condition(i as f64, FacetId::new(*r).unwrap(), false).unwrap();
        }
        let distinct: std::collections::BTreeSet<_> = raw.iter().collect();
        let resolved = bcs.resolved(FieldKind::Pressure);
        prop_assert_eq!(resolved.len(), distinct.len());

        for bc in resolved {
            let last = raw.iter().rposition(|r| *r == bc.facet.get()).unwrap();
            prop_assert_eq!(&bc.expression, &Expression::constant(last as f64));
        }
    }
}
