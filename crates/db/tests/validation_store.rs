//! The validation engine wired to PostgreSQL: catalog lookups, duplicate
//! counts, and full checks over seeded rules.

use assert_matches::assert_matches;
use roster_core::validation::{
    FieldValidator, RecordStore, RuleCatalog, RuleDecl, RuleError, RuleOverlay, RuleSet,
    UniqueAction,
};
use roster_db::models::group::CreateGroup;
use roster_db::models::user::CreateUser;
use roster_db::repositories::{GroupRepo, UserRepo};
use roster_db::{PgRecordStore, PgRuleCatalog};
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, username: &str, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            fname: "Test".to_string(),
            lname: "User".to_string(),
            company: None,
            password_hash: "$argon2id$placeholder".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_group(pool: &PgPool, name: &str, short_name: &str) -> i64 {
    GroupRepo::create(
        pool,
        &CreateGroup {
            name: name.to_string(),
            short_name: short_name.to_string(),
            grouptype_id: None,
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "./migrations")]
async fn test_catalog_lookup(pool: PgPool) {
    let catalog = PgRuleCatalog::new(pool);

    let entry = catalog.lookup("username").await.unwrap().unwrap();
    assert_eq!(entry.display.as_deref(), Some("Username"));
    assert_eq!(entry.min, Some(5));
    assert_eq!(entry.max, Some(35));
    assert_eq!(entry.unique_in_table.as_deref(), Some("users"));

    assert!(catalog.lookup("no_such_rule").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_record_store_counts(pool: PgPool) {
    let alice = seed_user(&pool, "alice", "alice@example.com").await;
    seed_user(&pool, "bob", "bob@example.com").await;
    let store = PgRecordStore::new(pool);

    assert_eq!(store.count_matching("users", "username", "alice").await.unwrap(), 1);
    assert_eq!(store.count_matching("users", "username", "Alice").await.unwrap(), 0);
    assert_eq!(
        store
            .count_matching_excluding("users", alice, "username", "alice")
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        store
            .count_matching_excluding("users", alice, "username", "bob")
            .await
            .unwrap(),
        1
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_record_store_rejects_bad_identifiers(pool: PgPool) {
    let store = PgRecordStore::new(pool);
    let err = store
        .count_matching("users; DROP TABLE users", "username", "x")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid SQL identifier"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_record_store_unknown_table_is_an_error(pool: PgPool) {
    let store = PgRecordStore::new(pool);
    assert!(store.count_matching("nowhere", "name", "x").await.is_err());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_registration_rules_against_seeded_catalog(pool: PgPool) {
    seed_user(&pool, "alice", "alice@example.com").await;
    let store = PgRecordStore::new(pool.clone());
    let catalog = PgRuleCatalog::new(pool);

    let decls = [
        RuleDecl::from("username"),
        RuleDecl::from("email"),
        RuleDecl::from("password"),
        RuleDecl::overlay(
            "confirm",
            RuleOverlay::new()
                .display("Confirm Password")
                .required(true)
                .matches("password"),
        ),
    ];
    let validator = FieldValidator::from_catalog(&store, &catalog, &decls)
        .await
        .unwrap();

    let taken = [
        ("username", "alice"),
        ("email", "new@example.com"),
        ("password", "secret1"),
        ("confirm", "secret1"),
    ];
    let result = validator.check(&taken).await.unwrap();
    assert!(!result.passed());
    let messages: Vec<&str> = result.errors().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        ["Username already exists. Please choose another Username."]
    );

    let fresh = [
        ("username", "carol"),
        ("email", "carol@example.com"),
        ("password", "secret1"),
        ("confirm", "secret1"),
    ];
    assert!(validator.check(&fresh).await.unwrap().passed());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_group_update_allows_own_name(pool: PgPool) {
    let ops = seed_group(&pool, "Operations", "ops").await;
    seed_group(&pool, "Finance", "fin").await;
    let store = PgRecordStore::new(pool.clone());
    let catalog = PgRuleCatalog::new(pool);

    let decls = [
        RuleDecl::overlay(
            "groupname",
            RuleOverlay::new()
                .alias("name")
                .action(UniqueAction::Update)
                .update_id(ops),
        ),
        RuleDecl::overlay(
            "groupshortname",
            RuleOverlay::new()
                .alias("short_name")
                .action(UniqueAction::Update)
                .update_id(ops),
        ),
    ];
    let validator = FieldValidator::from_catalog(&store, &catalog, &decls)
        .await
        .unwrap();

    let unchanged = [("name", "Operations"), ("short_name", "ops")];
    assert!(validator.check(&unchanged).await.unwrap().passed());

    let clash = [("name", "Operations"), ("short_name", "fin")];
    let result = validator.check(&clash).await.unwrap();
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].field, "short_name");
    assert_eq!(
        result.errors()[0].message,
        "Group Short Name already exists. Please choose another Group Short Name."
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_store_failure_aborts_check(pool: PgPool) {
    let store = PgRecordStore::new(pool);
    let validator = FieldValidator::new(&store).with_rules(
        RuleSet::inline([RuleDecl::overlay(
            "name",
            RuleOverlay::new().unique("missing_table"),
        )]),
    );
    let err = validator.check(&[("name", "x")]).await.unwrap_err();
    assert_matches!(err, RuleError::Store(_));
}
