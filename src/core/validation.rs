//! Input validation for product writes.
//!
//! Errors are collected per field so clients get every problem at once,
//! keyed by the request field name.

use crate::models::ImageUpload;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Image extensions accepted on upload
pub const ACCEPTED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "png", "jpeg", "gif", "svg"];

/// Field name -> list of messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field, empty if the field is valid.
    #[must_use]
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Converts into a `Result`, failing when any error was recorded.
    ///
    /// # Errors
    /// Returns `self` when it holds at least one message.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().flatten().map(String::as_str).collect();
        write!(f, "{}", messages.join(" "))
    }
}

/// Whether an image is mandatory for the operation being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRule {
    Required,
    Optional,
}

/// Validates the writable product fields.
///
/// `name` and `description` must contain something other than whitespace.
/// When an image is present its extension must be one of
/// [`ACCEPTED_IMAGE_EXTENSIONS`].
///
/// # Errors
/// Returns every field error found.
pub fn validate_product_input(
    name: &str,
    description: &str,
    image: Option<&ImageUpload>,
    image_rule: ImageRule,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if name.trim().is_empty() {
        errors.add("name", "The name field is required.");
    }
    if description.trim().is_empty() {
        errors.add("description", "The description field is required.");
    }
    match image {
        Some(upload) if !is_accepted_extension(&upload.extension) => {
            errors.add(
                "image",
                format!(
                    "The image field must be a file of type: {}.",
                    ACCEPTED_IMAGE_EXTENSIONS.join(", ")
                ),
            );
        }
        None if image_rule == ImageRule::Required => {
            errors.add("image", "The image field is required.");
        }
        _ => {}
    }

    errors.into_result()
}

fn is_accepted_extension(extension: &str) -> bool {
    ACCEPTED_IMAGE_EXTENSIONS
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn upload(ext: &str) -> ImageUpload {
        ImageUpload {
            bytes: vec![0xFF],
            extension: ext.to_string(),
        }
    }

    #[test]
    fn test_valid_input_passes() {
        for ext in ACCEPTED_IMAGE_EXTENSIONS {
            let image = upload(ext);
            let result = validate_product_input("Mug", "A mug", Some(&image), ImageRule::Required);
            assert!(result.is_ok());
        }
        let shouting = upload("PNG");
        let result = validate_product_input("Mug", "A mug", Some(&shouting), ImageRule::Required);
        assert!(result.is_ok());
    }

    #[test]
    fn test_blank_fields_are_reported_together() {
        let errors = validate_product_input("  ", "", None, ImageRule::Required).unwrap_err();
        assert_eq!(errors.field("name"), ["The name field is required."]);
        assert_eq!(errors.field("description"), ["The description field is required."]);
        assert_eq!(errors.field("image"), ["The image field is required."]);
    }

    #[test]
    fn test_missing_image_allowed_when_optional() {
        assert!(validate_product_input("Mug", "A mug", None, ImageRule::Optional).is_ok());
    }

    #[test]
    fn test_rejected_extension() {
        let image = upload("exe");
        let errors =
            validate_product_input("Mug", "A mug", Some(&image), ImageRule::Optional).unwrap_err();
        assert_eq!(
            errors.field("image"),
            ["The image field must be a file of type: jpg, png, jpeg, gif, svg."]
        );
        assert!(errors.field("name").is_empty());
    }

    #[test]
    fn test_serializes_as_field_map() {
        let errors = validate_product_input("", "ok", None, ImageRule::Optional).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"name": ["The name field is required."]}));
    }
}
