//! Rule declarations for the forms served by the API.
//!
//! Each form names catalog rules and overlays the per-form differences:
//! tighter bounds, labels, or update semantics for the record being edited.

use roster_core::types::DbId;
use roster_core::validation::{RuleDecl, RuleOverlay, UniqueAction};

/// Fields an admin may edit on a user, in the order they are processed.
pub const ADMIN_USER_FIELDS: [&str; 4] = ["username", "fname", "lname", "email"];

/// Self-service registration.
pub fn join_rules() -> Vec<RuleDecl> {
    vec![
        RuleDecl::overlay(
            "username",
            RuleOverlay::new()
                .display("Username")
                .required(true)
                .min(5)
                .max(35)
                .unique("users"),
        ),
        RuleDecl::overlay(
            "fname",
            RuleOverlay::new()
                .display("First Name")
                .required(true)
                .min(2)
                .max(35),
        ),
        RuleDecl::overlay(
            "lname",
            RuleOverlay::new()
                .display("Last Name")
                .required(true)
                .min(2)
                .max(35),
        ),
        RuleDecl::overlay(
            "email",
            RuleOverlay::new()
                .display("Email")
                .required(true)
                .email()
                .unique("users"),
        ),
        RuleDecl::overlay(
            "company",
            RuleOverlay::new()
                .display("Company Name")
                .required(false)
                .max(75),
        ),
        RuleDecl::overlay(
            "password",
            RuleOverlay::new()
                .display("Password")
                .required(true)
                .min(6)
                .max(25),
        ),
        RuleDecl::overlay(
            "confirm",
            RuleOverlay::new()
                .display("Confirm Password")
                .required(true)
                .matches("password"),
        ),
    ]
}

/// Rule for one field of the admin user editor, or `None` if the field is
/// not editable there.
///
/// Uniqueness uses the compact `"users,<id>"` form so the edited user does
/// not collide with itself.
pub fn admin_user_rule(field: &str, user_id: DbId) -> Option<RuleDecl> {
    let overlay = match field {
        "username" => RuleOverlay::new()
            .display("Username")
            .required(true)
            .min(1)
            .max(25)
            .unique(format!("users,{user_id}"))
            .action(UniqueAction::Update),
        "fname" => RuleOverlay::new()
            .display("First Name")
            .required(true)
            .min(1)
            .max(25),
        "lname" => RuleOverlay::new()
            .display("Last Name")
            .required(true)
            .min(1)
            .max(25),
        "email" => RuleOverlay::new()
            .display("Email")
            .required(true)
            .min(3)
            .max(75)
            .email()
            .unique(format!("users,{user_id}"))
            .action(UniqueAction::Update),
        _ => return None,
    };
    Some(RuleDecl::overlay(field, overlay))
}

/// New group: both catalog rules served under the column names.
pub fn new_group_rules() -> Vec<RuleDecl> {
    vec![
        RuleDecl::overlay("groupname", RuleOverlay::new().alias("name")),
        RuleDecl::overlay("groupshortname", RuleOverlay::new().alias("short_name")),
    ]
}

/// Group editor: both catalog rules are served under the column names and
/// exclude the group being edited from duplicate lookups.
pub fn group_rules(group_id: DbId) -> Vec<RuleDecl> {
    vec![
        RuleDecl::overlay(
            "groupname",
            RuleOverlay::new()
                .alias("name")
                .action(UniqueAction::Update)
                .update_id(group_id),
        ),
        RuleDecl::overlay(
            "groupshortname",
            RuleOverlay::new()
                .alias("short_name")
                .action(UniqueAction::Update)
                .update_id(group_id),
        ),
    ]
}
