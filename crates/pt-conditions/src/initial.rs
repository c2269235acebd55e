//! Initial condition set: one velocity and one pressure value per problem.

use std::sync::OnceLock;

use pt_core::{FieldKind, FieldMap};

use crate::error::{ConditionError, ConditionResult};
use crate::expression::{ConditionValue, Expression};

#[derive(Clone, Debug, Default)]
pub struct InitialConditions {
    velocity: Option<Expression>,
    pressure: Option<Expression>,
    resolved: OnceLock<FieldMap<Expression>>,
}

impl InitialConditions {
    /// An empty set; both values must be provided before `resolve`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero velocity and zero pressure for a domain of dimension `dim`.
    pub fn with_domain_defaults(dim: usize) -> Self {
        Self {
            velocity: Some(Expression::zero(FieldKind::Velocity.value_size(dim))),
            pressure: Some(Expression::zero(1)),
            resolved: OnceLock::new(),
        }
    }

    pub fn set_velocity_ic(&mut self, value: impl Into<ConditionValue>) -> ConditionResult<()> {
        self.velocity = Some(value.into().into_expression(FieldKind::Velocity)?);
        self.resolved = OnceLock::new();
        Ok(())
    }

    pub fn set_pressure_ic(&mut self, value: impl Into<ConditionValue>) -> ConditionResult<()> {
        self.pressure = Some(value.into().into_expression(FieldKind::Pressure)?);
        self.resolved = OnceLock::new();
        Ok(())
    }

    pub fn get(&self, field: FieldKind) -> Option<&Expression> {
        match field {
            FieldKind::Velocity => self.velocity.as_ref(),
            FieldKind::Pressure => self.pressure.as_ref(),
        }
    }

    /// Canonical mapping from field kind to initial value.
    ///
    /// Computed on first call and reused afterwards until a value is set again.
    pub fn resolve(&self) -> ConditionResult<&FieldMap<Expression>> {
        if let Some(map) = self.resolved.get() {
            return Ok(map);
        }
        let map = FieldMap::try_from_fn(|kind| {
            self.get(kind)
                .cloned()
                .ok_or(ConditionError::Unresolved { missing: kind })
        })?;
        Ok(self.resolved.get_or_init(|| map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_requires_both_values() {
        let mut ics = InitialConditions::new();
        assert_eq!(
            ics.resolve().unwrap_err(),
            ConditionError::Unresolved {
                missing: FieldKind::Velocity
            }
        );
        ics.set_velocity_ic([0.0, 0.0]).unwrap();
        assert_eq!(
            ics.resolve().unwrap_err(),
            ConditionError::Unresolved {
                missing: FieldKind::Pressure
            }
        );
        ics.set_pressure_ic(0.0).unwrap();
        assert!(ics.resolve().is_ok());
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut ics = InitialConditions::new();
        ics.set_velocity_ic([1.0, 2.0]).unwrap();
        ics.set_pressure_ic(3.0).unwrap();
        let first = ics.resolve().unwrap().clone();
        let second = ics.resolve().unwrap();
        assert_eq!(&first, second);
        assert_eq!(first[FieldKind::Pressure], Expression::constant(3.0));
    }

    #[test]
    fn setting_again_refreshes_resolution() {
        let mut ics = InitialConditions::with_domain_defaults(2);
        assert_eq!(
            ics.resolve().unwrap()[FieldKind::Velocity],
            Expression::constant([0.0, 0.0])
        );
        ics.set_velocity_ic([5.0, 0.0]).unwrap();
        assert_eq!(
            ics.resolve().unwrap()[FieldKind::Velocity],
            Expression::constant([5.0, 0.0])
        );
    }

    #[test]
    fn domain_defaults_match_dimension() {
        let ics = InitialConditions::with_domain_defaults(3);
        let map = ics.resolve().unwrap();
        assert_eq!(map[FieldKind::Velocity].value_size(), 3);
        assert_eq!(map[FieldKind::Pressure].value_size(), 1);
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut ics = InitialConditions::new();
        assert!(ics.set_pressure_ic([0.0, 0.0]).is_err());
        assert!(ics.get(FieldKind::Pressure).is_none());
    }
}
