//! Check executor: runs a resolved rule set against a submitted record.

use regex::Regex;
use validator::ValidateEmail;

use super::catalog::{resolve_rules, RuleCatalog};
use super::describe::describe;
use super::error::RuleError;
use super::input::FormInput;
use super::report::{ValidationError, ValidationResult};
use super::rules::{RuleDecl, RuleSet, RuleSpec, UniqueRule};
use super::sanitize::{clean, sanitize};
use super::store::RecordStore;
use crate::types::DbId;

/// Validates form records against a rule set.
///
/// Holds the rules resolved at construction (possibly none) and the record
/// store used for uniqueness lookups. Each [`check`](Self::check) returns a
/// fresh [`ValidationResult`]; nothing carries over between calls.
#[derive(Debug)]
pub struct FieldValidator<'s, S> {
    store: &'s S,
    rules: RuleSet,
}

impl<'s, S: RecordStore> FieldValidator<'s, S> {
    /// A validator with no default rules; use [`check_with`](Self::check_with).
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            rules: RuleSet::new(),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Resolve `decls` against `catalog` and use them as default rules.
    pub async fn from_catalog<C: RuleCatalog>(
        store: &'s S,
        catalog: &C,
        decls: &[RuleDecl],
    ) -> Result<Self, RuleError> {
        let rules = resolve_rules(catalog, decls)
            .await
            .map_err(RuleError::Store)?;
        Ok(Self::new(store).with_rules(rules))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Check `record` against the rules given at construction.
    pub async fn check<R>(&self, record: &R) -> Result<ValidationResult, RuleError>
    where
        R: FormInput + Sync + ?Sized,
    {
        self.check_with(record, &self.rules).await
    }

    /// Check `record` against `rules`.
    ///
    /// Broken rules end up in the returned result. `Err` means the rule set
    /// itself is unusable or the record store failed.
    pub async fn check_with<R>(
        &self,
        record: &R,
        rules: &RuleSet,
    ) -> Result<ValidationResult, RuleError>
    where
        R: FormInput + Sync + ?Sized,
    {
        let plans = plan(rules)?;
        let mut result = ValidationResult::new();

        for plan in &plans {
            let spec = plan.spec;
            let value = read(record, &plan.field);

            if value.is_empty() {
                if spec.is_required() {
                    result.add_error(ValidationError::new(
                        format!("{} is required", spec.display),
                        plan.field.as_str(),
                    ));
                }
                continue;
            }

            let length = value.chars().count();
            if let Some(min) = spec.min {
                if length < min {
                    result.add_error(ValidationError::new(
                        format!("{} must be a minimum of {min} characters.", spec.display),
                        plan.field.as_str(),
                    ));
                }
            }
            if let Some(max) = spec.max {
                if length > max {
                    result.add_error(ValidationError::new(
                        format!("{} must be a maximum of {max} characters.", spec.display),
                        plan.field.as_str(),
                    ));
                }
            }

            if let Some((other, other_label)) = &plan.matches {
                if read(record, other) != value {
                    result.add_error(ValidationError::new(
                        format!("{other_label} and {} must match.", spec.display),
                        plan.field.as_str(),
                    ));
                }
            }

            if let Some(target) = &plan.unique {
                if self.is_duplicate(target, &plan.field, &value).await? {
                    result.add_error(ValidationError::new(
                        format!(
                            "{0} already exists. Please choose another {0}.",
                            spec.display
                        ),
                        plan.field.as_str(),
                    ));
                }
            }

            if let Some(pattern) = &plan.regex {
                if !pattern.is_match(&value) {
                    let hint = spec.regex_display.as_deref().unwrap_or(pattern.as_str());
                    result.add_error(ValidationError::new(
                        format!("{} must match '{hint}'. Please try again.", spec.display),
                        plan.field.as_str(),
                    ));
                }
            }

            if spec.is_numeric && !is_numeric(&value) {
                result.add_error(ValidationError::new(
                    format!(
                        "{} has to be a number. Please use a numeric value.",
                        spec.display
                    ),
                    plan.field.as_str(),
                ));
            }

            if spec.valid_email && !value.validate_email() {
                result.add_error(ValidationError::new(
                    format!("{} must be a valid email address.", spec.display),
                    plan.field.as_str(),
                ));
            }
        }

        tracing::debug!(
            fields = plans.len(),
            errors = result.errors().len(),
            "Validation check complete"
        );
        Ok(result)
    }

    /// Hint text for `fields` (all when empty) of the construction rules.
    pub fn describe(&self, fields: &[&str]) -> String {
        describe(fields, &self.rules)
    }

    /// Hint text for `fields` (all when empty) of `rules`.
    pub fn describe_with(&self, fields: &[&str], rules: &RuleSet) -> String {
        describe(fields, rules)
    }

    async fn is_duplicate(
        &self,
        target: &UniqueTarget,
        column: &str,
        value: &str,
    ) -> Result<bool, RuleError> {
        let count = match target.exclude_id {
            None => self.store.count_matching(&target.table, column, value).await,
            Some(id) => {
                self.store
                    .count_matching_excluding(&target.table, id, column, value)
                    .await
            }
        }
        .map_err(RuleError::Store)?;
        Ok(count > 0)
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Where a uniqueness lookup goes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UniqueTarget {
    table: String,
    exclude_id: Option<DbId>,
}

/// A field's rule with everything that can fail up front already resolved.
struct FieldPlan<'r> {
    field: String,
    spec: &'r RuleSpec,
    /// Sanitized name and display label of the field this one must equal.
    matches: Option<(String, String)>,
    unique: Option<UniqueTarget>,
    regex: Option<Regex>,
}

/// Validate the rule set itself before touching any record value.
fn plan(rules: &RuleSet) -> Result<Vec<FieldPlan<'_>>, RuleError> {
    rules
        .iter()
        .map(|(field, spec)| {
            plan_field(field, spec, rules).inspect_err(|err| {
                tracing::warn!(field, error = %err, "Unusable validation rule");
            })
        })
        .collect()
}

fn plan_field<'r>(
    field: &str,
    spec: &'r RuleSpec,
    rules: &'r RuleSet,
) -> Result<FieldPlan<'r>, RuleError> {
    let matches = match &spec.matches {
        None => None,
        Some(other) => {
            let other_spec = rules.get(other).ok_or_else(|| {
                RuleError::configuration(field, format!("matches unknown field '{other}'"))
            })?;
            Some((sanitize(other), other_spec.display.clone()))
        }
    };

    let unique = spec
        .unique
        .as_ref()
        .map(|rule| unique_target(field, rule, spec.update_id))
        .transpose()?;

    let regex = spec
        .regex
        .as_deref()
        .map(|pattern| {
            compile_pattern(pattern).map_err(|e| {
                RuleError::configuration(field, format!("invalid pattern '{pattern}': {e}"))
            })
        })
        .transpose()?;

    Ok(FieldPlan {
        field: sanitize(field),
        spec,
        matches,
        unique,
        regex,
    })
}

/// Split the optional compact `"table,id"` form.
fn split_table(table: &str) -> (&str, Option<&str>) {
    match table.split_once(',') {
        Some((name, id)) => (name.trim(), Some(id.trim())),
        None => (table.trim(), None),
    }
}

fn unique_target(
    field: &str,
    rule: &UniqueRule,
    update_id: Option<DbId>,
) -> Result<UniqueTarget, RuleError> {
    match rule {
        UniqueRule::Any { table } | UniqueRule::Add { table } => Ok(UniqueTarget {
            table: split_table(table).0.to_string(),
            exclude_id: None,
        }),
        UniqueRule::Update { table } => {
            let (name, compact_id) = split_table(table);
            let exclude_id = match (update_id, compact_id) {
                (Some(id), _) => id,
                (None, Some(raw)) => raw.parse::<DbId>().map_err(|_| {
                    RuleError::configuration(field, format!("invalid update id '{raw}'"))
                })?,
                (None, None) => {
                    return Err(RuleError::configuration(
                        field,
                        "unique_update needs an update id",
                    ))
                }
            };
            Ok(UniqueTarget {
                table: name.to_string(),
                exclude_id: Some(exclude_id),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Value predicates
// ---------------------------------------------------------------------------

/// Trimmed, sanitized value of `field`; missing fields read as empty.
fn read<R: FormInput + ?Sized>(record: &R, field: &str) -> String {
    record.field(field).map(|raw| clean(&raw)).unwrap_or_default()
}

/// Decimal or exponent notation, optionally signed. `inf`/`nan` spellings
/// are rejected.
fn is_numeric(value: &str) -> bool {
    value.bytes().any(|b| b.is_ascii_digit())
        && value.parse::<f64>().is_ok_and(|n| n.is_finite())
}

/// Compile a rule pattern. Accepts bare patterns and PCRE-style delimited
/// ones (`/^[a-z]+$/i`), translating trailing `i m s x U` flags.
fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&strip_delimiters(pattern))
}

const DELIMITERS: &[char] = &['/', '#', '~', '!', '@', '%', '|', '+'];

fn strip_delimiters(pattern: &str) -> String {
    let Some(delim) = pattern.chars().next().filter(|c| DELIMITERS.contains(c)) else {
        return pattern.to_string();
    };
    let Some(end) = pattern.rfind(delim).filter(|&end| end > 0) else {
        return pattern.to_string();
    };
    let flags = &pattern[end + 1..];
    if !flags.chars().all(|c| "imsxuUD".contains(c)) {
        return pattern.to_string();
    }

    let body = &pattern[delim.len_utf8()..end];
    let inline: String = flags.chars().filter(|c| "imsxU".contains(*c)).collect();
    if inline.is_empty() {
        body.to_string()
    } else {
        format!("(?{inline}){body}")
    }
}
