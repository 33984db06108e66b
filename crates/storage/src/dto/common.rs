use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

use crate::models::is_valid_report_type;

pub fn validate_report_type(report_type: &str) -> Result<(), ValidationError> {
    if is_valid_report_type(report_type) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_report_type");
        error.message = Some(Cow::Borrowed(
            "report type must be 1-64 lowercase letters, digits, '-' or '_'",
        ));
        Err(error)
    }
}

pub fn validate_model(model: &str) -> Result<(), ValidationError> {
    match model.parse::<crate::models::ModelName>() {
        Ok(_) => Ok(()),
        Err(e) => {
            let mut error = ValidationError::new("unknown_model");
            error.message = Some(Cow::Owned(e.to_string()));
            Err(error)
        }
    }
}

/// Builds a single-field error set for checks that run outside `#[derive(Validate)]`.
pub fn field_error(
    field: &'static str,
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> ValidationErrors {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());

    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}
