use crate::error::{DocentError, DocentResult};
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> DocentResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(DocentError::validation("model", error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match &error.code {
                std::borrow::Cow::Borrowed("url") => {
                    format!("Invalid URL for field '{}'", field)
                }
                std::borrow::Cow::Borrowed("length") => {
                    format!("Length validation failed for field '{}'", field)
                }
                std::borrow::Cow::Borrowed("range") => {
                    format!("Value out of range for field '{}'", field)
                }
                _ => format!("Validation failed for field '{}': {}", field, error.code),
            };
            messages.push(message);
        }
    }

    messages.join(", ")
}

/// Blocking message for the required fields a draft is still missing.
pub fn missing_fields_error(fields: &[&str]) -> DocentError {
    DocentError::validation(
        "required_fields",
        format!("Missing required fields: {}", fields.join(", ")),
    )
}

pub fn validate_file_type(file_name: &str, allowed_types: &[&str]) -> DocentResult<()> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !allowed_types.contains(&extension.to_lowercase().as_str()) {
        return Err(DocentError::validation(
            "file_type",
            format!(
                "File type '{}' not allowed. Allowed types: {}",
                extension,
                allowed_types.join(", ")
            ),
        ));
    }

    Ok(())
}

pub fn validate_file_size(file_size: usize, max_size: usize) -> DocentResult<()> {
    if file_size > max_size {
        return Err(DocentError::validation(
            "file_size",
            format!(
                "File size {} bytes exceeds maximum allowed size {} bytes",
                file_size, max_size
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_type() {
        let allowed_types = &["pdf", "ipynb"];
        assert!(validate_file_type("paper.pdf", allowed_types).is_ok());
        assert!(validate_file_type("demo.IPYNB", allowed_types).is_ok());
        assert!(validate_file_type("notes.txt", allowed_types).is_err());
        assert!(validate_file_type("no-extension", allowed_types).is_err());
    }

    #[test]
    fn test_validate_file_size() {
        assert!(validate_file_size(1024, 2048).is_ok());
        assert!(validate_file_size(4096, 2048).is_err());
    }

    #[test]
    fn test_missing_fields_message_lists_all() {
        let error = missing_fields_error(&["title", "year"]);
        assert!(error.to_string().contains("title, year"));
    }
}
