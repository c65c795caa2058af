pub mod admin_groups;
pub mod admin_users;
pub mod registration;
pub mod validate_rules;

use roster_core::validation::sanitize::clean;
use roster_core::validation::FormInput;

/// Read `field` from a submitted form the way the validator sees it:
/// trimmed and HTML-escaped. Missing fields read as empty.
pub(crate) fn cleaned<F: FormInput + ?Sized>(form: &F, field: &str) -> String {
    form.field(field).map(|v| clean(&v)).unwrap_or_default()
}

/// Like [`cleaned`], but an empty value reads as `None`.
pub(crate) fn cleaned_opt<F: FormInput + ?Sized>(form: &F, field: &str) -> Option<String> {
    Some(cleaned(form, field)).filter(|v| !v.is_empty())
}
