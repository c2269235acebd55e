use crate::PtError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PtError::NonFinite { what, value: v })
    }
}

/// Ensure a parameter is finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, PtError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(PtError::InvalidArg { what })
    }
}

/// Ensure every entry of a slice is finite.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), PtError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(PtError::NonFinite { what, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "dt").is_err());
        assert!(ensure_positive(-1.0, "dt").is_err());
        assert_eq!(ensure_positive(0.5, "dt").unwrap(), 0.5);
    }

    #[test]
    fn ensure_all_finite_reports_first_bad_value() {
        let err = ensure_all_finite(&[1.0, Real::INFINITY, Real::NAN], "force").unwrap_err();
        assert!(matches!(err, PtError::NonFinite { value, .. } if value.is_infinite()));
    }
}
