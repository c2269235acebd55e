//! Strong (Dirichlet) boundary condition registry.

use std::collections::{BTreeMap, BTreeSet};

use pt_core::{FacetId, FacetTarget, FieldKind, FieldMap};

use crate::error::{ConditionError, ConditionResult};
use crate::expression::{ConditionValue, Expression};

/// One condition on one facet.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryCondition {
    pub field: FieldKind,
    pub expression: Expression,
    pub facet: FacetId,
    /// Re-evaluate at every pass instead of once.
    pub time_dependent: bool,
}

/// Conditions registered per field, in registration order.
///
/// Several conditions may target the same facet. When they are applied the
/// most recently registered one wins; see [`BoundaryConditions::resolved`].
#[derive(Clone, Debug, Default)]
pub struct BoundaryConditions {
    entries: FieldMap<Vec<BoundaryCondition>>,
}

impl BoundaryConditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prescribe velocity on one or more facets.
    pub fn add_velocity_condition(
        &mut self,
        value: impl Into<ConditionValue>,
        target: impl Into<FacetTarget>,
        time_dependent: bool,
    ) -> ConditionResult<()> {
        self.add(FieldKind::Velocity, value.into(), target.into(), time_dependent)
    }

    /// Prescribe pressure on one or more facets.
    pub fn add_pressure_condition(
        &mut self,
        value: impl Into<ConditionValue>,
        target: impl Into<FacetTarget>,
        time_dependent: bool,
    ) -> ConditionResult<()> {
        self.add(FieldKind::Pressure, value.into(), target.into(), time_dependent)
    }

    fn add(
        &mut self,
        field: FieldKind,
        value: ConditionValue,
        target: FacetTarget,
        time_dependent: bool,
    ) -> ConditionResult<()> {
        if target.is_empty() {
            return Err(ConditionError::EmptyTarget { field });
        }
        let expression = value.into_expression(field)?;
        let list = &mut self.entries[field];
        list.extend(target.ids().iter().map(|&facet| BoundaryCondition {
            field,
            expression: expression.clone(),
            facet,
            time_dependent,
        }));
        Ok(())
    }

    /// Every registered condition for `field`, in registration order.
    pub fn conditions(&self, field: FieldKind) -> &[BoundaryCondition] {
        &self.entries[field]
    }

    /// The condition in force on each facet for `field`, ordered by facet.
    ///
    /// Later registrations replace earlier ones on the same facet.
    pub fn resolved(&self, field: FieldKind) -> Vec<&BoundaryCondition> {
        let mut last: BTreeMap<FacetId, &BoundaryCondition> = BTreeMap::new();
        for bc in &self.entries[field] {
            last.insert(bc.facet, bc);
        }
        last.into_values().collect()
    }

    /// All facets that carry at least one condition.
    pub fn facets(&self) -> BTreeSet<FacetId> {
        self.entries
            .iter()
            .flat_map(|(_, list)| list.iter().map(|bc| bc.facet))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundaryCondition> {
        self.entries.iter().flat_map(|(_, list)| list.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, list)| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
