//! Field checks for partial-update bodies, where only fields that are set
//! are validated.

use std::borrow::Cow;

use validator::{ValidateEmail, ValidationError};

/// Character count of `value` within `[min, max]`. `None` passes.
pub fn length(value: Option<&str>, min: u64, max: u64, message: &'static str) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };
    let count = value.chars().count() as u64;
    if count < min || count > max {
        let mut error = ValidationError::new("length").with_message(Cow::Borrowed(message));
        error.add_param(Cow::Borrowed("min"), &min);
        error.add_param(Cow::Borrowed("max"), &max);
        return Err(error);
    }
    Ok(())
}

pub fn email(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(value) if !value.validate_email() => {
            Err(ValidationError::new("email").with_message(Cow::Borrowed("Invalid email format")))
        }
        _ => Ok(()),
    }
}

/// Inclusive range check for numbers. `None` passes.
pub fn range(value: Option<f64>, min: f64, max: f64, message: &'static str) -> Result<(), ValidationError> {
    match value {
        Some(value) if !(min..=max).contains(&value) => {
            let mut error = ValidationError::new("range").with_message(Cow::Borrowed(message));
            error.add_param(Cow::Borrowed("min"), &min);
            error.add_param(Cow::Borrowed("max"), &max);
            Err(error)
        }
        _ => Ok(()),
    }
}
