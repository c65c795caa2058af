//! Human-readable rule summaries for form hint text.

use super::rules::{RuleSet, RuleSpec};

/// Separator placed between fragments.
pub const FRAGMENT_SEPARATOR: &str = " - ";

/// Describe the rules for `fields` (all fields when empty).
///
/// Fragments follow a fixed order per field: min, max, required/optional,
/// uniqueness, numeric, email, regex, matches. Unknown field names contribute
/// nothing.
pub fn describe(fields: &[&str], rules: &RuleSet) -> String {
    let mut fragments = Vec::new();
    if fields.is_empty() {
        for (_, spec) in rules.iter() {
            push_fragments(spec, rules, &mut fragments);
        }
    } else {
        for field in fields {
            if let Some(spec) = rules.get(field) {
                push_fragments(spec, rules, &mut fragments);
            }
        }
    }
    fragments.join(FRAGMENT_SEPARATOR)
}

fn push_fragments(spec: &RuleSpec, rules: &RuleSet, out: &mut Vec<String>) {
    if let Some(min) = spec.min {
        let plural = if min > 1 { "s" } else { "" };
        out.push(format!("Min {min} character{plural}"));
    }
    if let Some(max) = spec.max {
        out.push(format!("Max {max} characters"));
    }
    match spec.required {
        Some(true) => out.push("Required".to_string()),
        Some(false) => out.push("Optional".to_string()),
        None => {}
    }
    if spec.unique.is_some() {
        out.push("Must be Unique in the database".to_string());
    }
    if spec.is_numeric {
        out.push("Must be a Numeric value".to_string());
    }
    if spec.valid_email {
        out.push("Must be formatted as a Valid email".to_string());
    }
    if spec.regex.is_some() {
        if let Some(hint) = &spec.regex_display {
            out.push(hint.clone());
        }
    }
    if let Some(other) = &spec.matches {
        let label = rules.get(other).map_or(other.as_str(), |s| s.display.as_str());
        out.push(format!("Must match {label}"));
    }
}
