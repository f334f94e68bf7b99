use std::fmt::{Debug, Display};

use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    #[error("assertion failed: {message}")]
    Failed { message: String },
    #[error("assertion failed at {label}: expected {expected}, got {actual}")]
    NotEqual {
        label: String,
        expected: String,
        actual: String,
    },
    #[error("assertion failed at {label}: value is missing")]
    Missing { label: String },
    #[error("assertion failed at {label}: {value} is outside [{min}, {max}]")]
    OutOfRange {
        label: String,
        value: String,
        min: String,
        max: String,
    },
}

pub type AssertionResult<T = ()> = Result<T, AssertionError>;

pub fn ensure(condition: bool, message: impl Into<String>) -> AssertionResult {
    if condition {
        Ok(())
    } else {
        Err(AssertionError::Failed {
            message: message.into(),
        })
    }
}

pub fn ensure_eq<T: PartialEq + Debug>(label: &str, expected: T, actual: T) -> AssertionResult {
    if expected == actual {
        return Ok(());
    }
    Err(AssertionError::NotEqual {
        label: label.to_string(),
        expected: format!("{expected:?}"),
        actual: format!("{actual:?}"),
    })
}

pub fn ensure_some<T>(label: &str, value: Option<T>) -> AssertionResult<T> {
    value.ok_or_else(|| AssertionError::Missing {
        label: label.to_string(),
    })
}

/// Inclusive on both ends. NaN is always out of range.
pub fn ensure_in_range<T: PartialOrd + Display>(
    label: &str,
    value: T,
    min: T,
    max: T,
) -> AssertionResult<T> {
    if value >= min && value <= max {
        return Ok(value);
    }
    Err(AssertionError::OutOfRange {
        label: label.to_string(),
        value: value.to_string(),
        min: min.to_string(),
        max: max.to_string(),
    })
}

pub fn ensure_finite_vec3(label: &str, value: Vec3) -> AssertionResult<Vec3> {
    ensure(value.is_finite(), format!("{label} must be finite, got {value}"))?;
    Ok(value)
}
