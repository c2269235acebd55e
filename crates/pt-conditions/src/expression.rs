//! Values and expressions attached to conditions.

use core::fmt;
use std::sync::Arc;

use pt_core::FieldKind;

use crate::error::{ConditionError, ConditionResult};

/// A numeric literal: one scalar or one vector.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Value {
    pub fn components(&self) -> &[f64] {
        match self {
            Value::Scalar(v) => core::slice::from_ref(v),
            Value::Vector(v) => v,
        }
    }

    pub fn value_size(&self) -> usize {
        self.components().len()
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Vector(_) => "vector",
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Vector(v)
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(v: [f64; N]) -> Self {
        Value::Vector(v.to_vec())
    }
}

/// Point-wise evaluator: `(x, t, out)` writes the value at position `x` and
/// pseudo-time `t` into `out`.
pub type PointFn = dyn Fn(&[f64], f64, &mut [f64]) + Send + Sync;

/// A constant or a function of position and pseudo-time.
#[derive(Clone)]
pub enum Expression {
    Constant(Value),
    Function { value_size: usize, f: Arc<PointFn> },
}

impl Expression {
    pub fn constant(value: impl Into<Value>) -> Self {
        Expression::Constant(value.into())
    }

    pub fn function(
        value_size: usize,
        f: impl Fn(&[f64], f64, &mut [f64]) + Send + Sync + 'static,
    ) -> Self {
        Expression::Function {
            value_size,
            f: Arc::new(f),
        }
    }

    /// Zero of the given size: a scalar for 1, a vector otherwise.
    pub fn zero(value_size: usize) -> Self {
        match value_size {
            1 => Expression::Constant(Value::Scalar(0.0)),
            n => Expression::Constant(Value::Vector(vec![0.0; n])),
        }
    }

    pub fn value_size(&self) -> usize {
        match self {
            Expression::Constant(v) => v.value_size(),
            Expression::Function { value_size, .. } => *value_size,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Expression::Constant(_))
    }

    /// Evaluate at one point. `out` must hold `value_size()` entries.
    pub fn eval(&self, x: &[f64], t: f64, out: &mut [f64]) {
        match self {
            Expression::Constant(v) => out.copy_from_slice(v.components()),
            Expression::Function { f, .. } => f(x, t, out),
        }
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Expression::Function { value_size, .. } => f
                .debug_struct("Function")
                .field("value_size", value_size)
                .finish_non_exhaustive(),
        }
    }
}

/// Constants compare by value, functions by identity.
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expression::Constant(a), Expression::Constant(b)) => a == b,
            (Expression::Function { f: a, .. }, Expression::Function { f: b, .. }) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

/// Anything a registry accepts as a condition value.
#[derive(Clone, Debug, PartialEq)]
pub enum ConditionValue {
    Literal(Value),
    Expression(Expression),
}

impl ConditionValue {
    /// Check the input against the field it is meant for and wrap literals
    /// into constant expressions.
    pub(crate) fn into_expression(self, field: FieldKind) -> ConditionResult<Expression> {
        match self {
            ConditionValue::Literal(value) => {
                let expected = match field {
                    FieldKind::Velocity => "vector",
                    FieldKind::Pressure => "scalar",
                };
                let kind_ok = matches!(
                    (&value, field),
                    (Value::Vector(v), FieldKind::Velocity) if !v.is_empty()
                ) || matches!((&value, field), (Value::Scalar(_), FieldKind::Pressure));
                if !kind_ok {
                    let found = match &value {
                        Value::Vector(v) if v.is_empty() => "empty vector".to_string(),
                        other => other.kind_name().to_string(),
                    };
                    return Err(ConditionError::InvalidValueKind {
                        field,
                        expected,
                        found,
                    });
                }
                if let Some(&bad) = value.components().iter().find(|v| !v.is_finite()) {
                    return Err(ConditionError::NonFinite { field, value: bad });
                }
                Ok(Expression::Constant(value))
            }
            ConditionValue::Expression(expr) => {
                let size = expr.value_size();
                let size_ok = match field {
                    FieldKind::Velocity => size >= 2,
                    FieldKind::Pressure => size == 1,
                };
                if !size_ok {
                    return Err(ConditionError::InvalidValueKind {
                        field,
                        expected: match field {
                            FieldKind::Velocity => "vector-valued expression",
                            FieldKind::Pressure => "scalar-valued expression",
                        },
                        found: format!("expression of size {size}"),
                    });
                }
                if let Expression::Constant(value) = &expr
                    && let Some(&bad) = value.components().iter().find(|v| !v.is_finite())
                {
                    return Err(ConditionError::NonFinite { field, value: bad });
                }
                Ok(expr)
            }
        }
    }
}

impl From<f64> for ConditionValue {
    fn from(v: f64) -> Self {
        ConditionValue::Literal(Value::Scalar(v))
    }
}

impl From<Vec<f64>> for ConditionValue {
    fn from(v: Vec<f64>) -> Self {
        ConditionValue::Literal(Value::Vector(v))
    }
}

impl<const N: usize> From<[f64; N]> for ConditionValue {
    fn from(v: [f64; N]) -> Self {
        ConditionValue::Literal(Value::Vector(v.to_vec()))
    }
}

impl From<Value> for ConditionValue {
    fn from(v: Value) -> Self {
        ConditionValue::Literal(v)
    }
}

impl From<Expression> for ConditionValue {
    fn from(e: Expression) -> Self {
        ConditionValue::Expression(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_are_wrapped_into_constants() {
        let e = ConditionValue::from([1.0, 0.0])
            .into_expression(FieldKind::Velocity)
            .unwrap();
        assert_eq!(e, Expression::constant([1.0, 0.0]));
        assert_eq!(e.value_size(), 2);
    }

    #[test]
    fn scalar_velocity_is_a_type_error() {
        let err = ConditionValue::from(1.0)
            .into_expression(FieldKind::Velocity)
            .unwrap_err();
        assert!(matches!(
            err,
            ConditionError::InvalidValueKind { expected: "vector", .. }
        ));
    }

    #[test]
    fn vector_pressure_is_a_type_error() {
        let err = ConditionValue::from(vec![0.0, 0.0])
            .into_expression(FieldKind::Pressure)
            .unwrap_err();
        assert!(err.to_string().contains("must be a scalar"));
    }

    #[test]
    fn non_finite_literal_is_rejected() {
        let err = ConditionValue::from(f64::NAN)
            .into_expression(FieldKind::Pressure)
            .unwrap_err();
        assert!(matches!(err, ConditionError::NonFinite { .. }));
    }

    #[test]
    fn function_expressions_evaluate_and_check_size() {
        let parabola = Expression::function(2, |x, _t, out| {
            out[0] = 4.0 * x[1] * (1.0 - x[1]);
            out[1] = 0.0;
        });
        let mut out = [0.0; 2];
        parabola.eval(&[0.0, 0.5], 0.0, &mut out);
        assert_eq!(out, [1.0, 0.0]);

        assert!(
            ConditionValue::from(parabola.clone())
                .into_expression(FieldKind::Pressure)
                .is_err()
        );
        let same = ConditionValue::from(parabola.clone())
            .into_expression(FieldKind::Velocity)
            .unwrap();
        assert_eq!(same, parabola);
    }

    #[test]
    fn zero_matches_size() {
        assert_eq!(Expression::zero(1), Expression::constant(0.0));
        assert_eq!(Expression::zero(3), Expression::constant([0.0, 0.0, 0.0]));
    }
}
