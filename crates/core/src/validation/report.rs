//! Validation outcome and error list helpers.

use serde::{Deserialize, Serialize};

use super::sanitize::sanitize;

/// A single broken rule: the message shown to the user and the field it
/// belongs to (used by the UI to highlight the input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
    pub field: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
        }
    }
}

/// Outcome of one check pass.
///
/// Errors are kept in the order rules were evaluated. `passed()` is derived
/// from the error list and cannot disagree with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Append an error. The result no longer passes.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append every message (without its field) to `into` and return it.
    ///
    /// Lets a handler fold validator errors into a page-level error list.
    pub fn stack_error_messages(&self, mut into: Vec<String>) -> Vec<String> {
        into.extend(self.errors.iter().map(|e| e.message.clone()));
        into
    }

    /// Render the errors as an HTML list.
    ///
    /// Each item carries a `data-field` attribute naming the offending input
    /// so client code can mark it.
    pub fn render_html(&self) -> String {
        let mut html = String::from(r#"<ul class="bg-danger">"#);
        for error in &self.errors {
            html.push_str(&format!(
                r#"<li class="text-danger" data-field="{}">{}</li>"#,
                sanitize(&error.field),
                sanitize(&error.message)
            ));
        }
        html.push_str("</ul>");
        html
    }
}

impl Extend<ValidationError> for ValidationResult {
    fn extend<I: IntoIterator<Item = ValidationError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_passes() {
        let result = ValidationResult::new();
        assert!(result.passed());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn add_error_flips_passed() {
        let mut result = ValidationResult::new();
        result.add_error(ValidationError::new("Username is required", "username"));
        assert!(!result.passed());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].field, "username");
    }

    #[test]
    fn stack_appends_after_existing_messages() {
        let mut result = ValidationResult::new();
        result.add_error(ValidationError::new("Name is required", "name"));
        result.add_error(ValidationError::new("Short Name is required", "short_name"));

        let page_errors = vec!["Group type not found".to_string()];
        let stacked = result.stack_error_messages(page_errors);
        assert_eq!(
            stacked,
            [
                "Group type not found",
                "Name is required",
                "Short Name is required"
            ]
        );
    }

    #[test]
    fn render_html_lists_messages_with_field_markers() {
        let mut result = ValidationResult::new();
        result.add_error(ValidationError::new("Email is required", "email"));
        assert_eq!(
            result.render_html(),
            r#"<ul class="bg-danger"><li class="text-danger" data-field="email">Email is required</li></ul>"#
        );
    }

    #[test]
    fn render_html_escapes_messages() {
        let mut result = ValidationResult::new();
        result.add_error(ValidationError::new("<b>Tom & Jerry</b> already exists.", "name"));
        assert_eq!(
            result.render_html(),
            r#"<ul class="bg-danger"><li class="text-danger" data-field="name">&lt;b&gt;Tom &amp; Jerry&lt;/b&gt; already exists.</li></ul>"#
        );
    }
}
