//! Scalar preconditions, run before any enumeration starts.

use crate::column::{Column, ElementType};
use crate::failure::{ClosureFailure, FailureKind};
use serde_json::Value;

/// Check that the scale bounds are finite and ordered and, if given, that
/// `mean` lies within them. A NaN `mean` is missing.
pub fn check_scale(
    scale_min: f64,
    scale_max: f64,
    mean: Option<f64>,
) -> Result<(), ClosureFailure> {
    for (name, bound) in [("scale_min", scale_min), ("scale_max", scale_max)] {
        if !bound.is_finite() {
            return Err(ClosureFailure::new(
                FailureKind::InvalidScaleRange,
                "`scale_min` and `scale_max` must be finite numbers.",
            )
            .with_detail(format!("`{name}` is {bound}."))
            .with_field("argument", name));
        }
    }

    if scale_min > scale_max {
        return Err(ClosureFailure::new(
            FailureKind::InvalidScaleRange,
            "`scale_min` must be less than or equal to `scale_max`.",
        )
        .with_detail(format!(
            "`scale_min` is {scale_min}, but `scale_max` is {scale_max}."
        ))
        .with_field("scaleMin", scale_min)
        .with_field("scaleMax", scale_max));
    }

    let Some(mean) = mean else {
        return Ok(());
    };

    if mean.is_nan() {
        return Err(ClosureFailure::new(
            FailureKind::UnexpectedMissing,
            "`mean` can't be missing.",
        )
        .with_detail("It is NaN.")
        .with_field("argument", "mean"));
    }

    if mean < scale_min {
        return Err(ClosureFailure::new(
            FailureKind::MeanBelowScaleMin,
            "`mean` must be greater than or equal to `scale_min`.",
        )
        .with_detail(format!("`mean` is {mean}, but `scale_min` is {scale_min}."))
        .with_field("mean", mean)
        .with_field("scaleMin", scale_min));
    }

    if mean > scale_max {
        return Err(ClosureFailure::new(
            FailureKind::MeanAboveScaleMax,
            "`mean` must be less than or equal to `scale_max`.",
        )
        .with_detail(format!("`mean` is {mean}, but `scale_max` is {scale_max}."))
        .with_field("mean", mean)
        .with_field("scaleMax", scale_max));
    }

    Ok(())
}

/// Check that `x` is a single, non-missing value of one of `allowed` types.
///
/// `name` is the argument name as the caller knows it; every message refers
/// to it. Type is checked first, then length, then missingness.
pub fn check_value(x: &Column, allowed: &[ElementType], name: &str) -> Result<(), ClosureFailure> {
    let actual = x.element_type();
    if !allowed.contains(&actual) {
        let wanted = allowed
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(ClosureFailure::new(
            FailureKind::WrongType,
            format!("`{name}` must be of type {wanted}."),
        )
        .with_detail(format!("It is of type {actual}."))
        .with_field("argument", name)
        .with_field("type", actual.label())
        .with_field(
            "allowed",
            Value::Array(allowed.iter().map(|t| Value::from(t.label())).collect()),
        ));
    }

    if x.len() != 1 {
        return Err(ClosureFailure::new(
            FailureKind::WrongLength,
            format!("`{name}` must have length 1."),
        )
        .with_detail(format!("It has length {}.", x.len()))
        .with_field("argument", name)
        .with_field("length", x.len()));
    }

    if x.is_missing_at(0) {
        return Err(ClosureFailure::new(
            FailureKind::UnexpectedMissing,
            format!("`{name}` can't be missing."),
        )
        .with_field("argument", name));
    }

    Ok(())
}
