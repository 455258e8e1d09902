//! Business logic services, one per resource.

pub mod comment_service;
pub mod post_service;
pub mod setting_service;
pub mod tag_service;
pub mod tool_category_service;
pub mod tool_service;
pub mod user_service;

use validator::ValidationErrors;

/// Flattens validator output into one human-readable message, field by field.
pub(crate) fn validation_messages(validation_errors: ValidationErrors) -> String {
    validation_errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error.message.as_ref().unwrap_or(&"Invalid value".into())
                )
            })
        })
        .collect::<Vec<String>>()
        .join(", ")
}
