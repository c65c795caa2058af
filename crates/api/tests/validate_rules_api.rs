//! Integration tests for the rule catalog CRUD endpoints and their effect
//! on form checks.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

async fn rule_id(app: axum::Router, name: &str) -> i64 {
    let json = body_json(get(app, "/api/v1/validation/rules").await).await;
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == name)
        .and_then(|r| r["id"].as_i64())
        .unwrap_or_else(|| panic!("rule {name} should be seeded"))
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rule_crud_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = post_json(
        app.clone(),
        "/api/v1/validation/rules",
        json!({ "name": "zipcode", "display": "Zip Code", "max": 10, "is_numeric": true }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let fetched = get(app.clone(), &format!("/api/v1/validation/rules/{id}")).await;
    assert_eq!(body_json(fetched).await["data"]["display"], "Zip Code");

    let updated = put_json(
        app.clone(),
        &format!("/api/v1/validation/rules/{id}"),
        json!({ "min": 5 }),
    )
    .await;
    let json = body_json(updated).await;
    assert_eq!(json["data"]["min"], 5);
    assert_eq!(json["data"]["max"], 10);

    let deleted = delete(app.clone(), &format!("/api/v1/validation/rules/{id}")).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = delete(app, &format!("/api/v1/validation/rules/{id}")).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_rule_name_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/validation/rules",
        json!({ "name": "username" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_rule_name_is_a_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/validation/rules", json!({ "name": "  " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rule_update_reaches_cached_forms(pool: PgPool) {
    let app = common::build_test_app(pool);

    // Prime the catalog cache with the group rules.
    let first = post_json(
        app.clone(),
        "/api/v1/admin/groups",
        json!({ "name": "Operations", "short_name": "ops" }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let id = rule_id(app.clone(), "groupshortname").await;
    let updated = put_json(
        app.clone(),
        &format!("/api/v1/validation/rules/{id}"),
        json!({ "max": 3 }),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);

    let response = post_json(
        app,
        "/api/v1/admin/groups",
        json!({ "name": "Finance", "short_name": "fina" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["errors"][0]["message"],
        "Group Short Name must be a maximum of 3 characters."
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn broken_catalog_regex_is_a_configuration_error(pool: PgPool) {
    let app = common::build_test_app(pool);

    let id = rule_id(app.clone(), "username").await;
    put_json(
        app.clone(),
        &format!("/api/v1/validation/rules/{id}"),
        json!({ "regex": "/[/" }),
    )
    .await;

    let response = post_json(
        app,
        "/api/v1/users/register",
        json!({
            "username": "alice",
            "fname": "Ada",
            "lname": "Lovelace",
            "email": "alice@example.com",
            "password": "secret1",
            "confirm": "secret1",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "RULE_CONFIGURATION");
}
