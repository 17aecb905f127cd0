mod common;

use axum::http::StatusCode;
use common::{ADMIN_TOKEN, USER_TOKEN};
use serde_json::{Value, json};

#[tokio::test]
async fn test_list_requires_token() {
    let app = common::create_test_app().await;

    let response = app.server.get("/api/sweets").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_unknown_token_is_rejected() {
    let app = common::create_test_app().await;

    let response = app
        .server
        .get("/api/sweets")
        .authorization_bearer("not-a-real-token")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_sweets_ordered_by_name() {
    let app = common::create_test_app().await;
    common::create_test_sweet(&app.store, "Rasgulla", "Milk-based", 180.0, 45).await;
    common::create_test_sweet(&app.store, "Barfi", "Milk-based", 300.0, 35).await;

    let response = app
        .server
        .get("/api/sweets")
        .authorization_bearer(USER_TOKEN)
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Barfi", "Rasgulla"]);
}

#[tokio::test]
async fn test_get_sweet_not_found() {
    let app = common::create_test_app().await;

    let response = app
        .server
        .get("/api/sweets/404")
        .authorization_bearer(USER_TOKEN)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["id"], 404);
}

#[tokio::test]
async fn test_admin_creates_sweet() {
    let app = common::create_test_app().await;

    let response = app
        .server
        .post("/api/sweets")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({
            "name": "Kaju Katli",
            "category": "Dry Fruit",
            "price": 450.0,
            "quantity": 25
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<Value>();
    assert_eq!(json["name"], "Kaju Katli");
    assert_eq!(json["quantity"], 25);
    assert_eq!(json["version"], 0);

    let id = json["id"].as_i64().unwrap();
    assert_eq!(common::current_quantity(&app.store, id).await, 25);
}

#[tokio::test]
async fn test_user_cannot_create_sweet() {
    let app = common::create_test_app().await;

    let response = app
        .server
        .post("/api/sweets")
        .authorization_bearer(USER_TOKEN)
        .json(&json!({
            "name": "Jalebi",
            "category": "Fried",
            "price": 150.0,
            "quantity": 60
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"]["code"], "forbidden");
}

#[tokio::test]
async fn test_create_validation_error() {
    let app = common::create_test_app().await;

    let response = app
        .server
        .post("/api/sweets")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({
            "name": "",
            "category": "Fried",
            "price": 0.0,
            "quantity": -1
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");

    let fields: Vec<&str> = json["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"price"));
    assert!(fields.contains(&"quantity"));
}

#[tokio::test]
async fn test_search_by_name_and_category() {
    let app = common::create_test_app().await;
    common::create_test_sweet(&app.store, "Gulab Jamun", "Milk-based", 200.0, 50).await;
    common::create_test_sweet(&app.store, "Jalebi", "Fried", 150.0, 60).await;
    common::create_test_sweet(&app.store, "Kaju Katli", "Dry Fruit", 450.0, 25).await;

    let response = app
        .server
        .get("/api/sweets/search")
        .add_query_param("name", "JAMUN")
        .add_query_param("category", "All")
        .authorization_bearer(USER_TOKEN)
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Gulab Jamun");

    let response = app
        .server
        .get("/api/sweets/search")
        .add_query_param("category", "Fried")
        .authorization_bearer(USER_TOKEN)
        .await;

    let json = response.json::<Value>();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Jalebi");
}

#[tokio::test]
async fn test_search_by_price_range() {
    let app = common::create_test_app().await;
    common::create_test_sweet(&app.store, "Jalebi", "Fried", 150.0, 60).await;
    common::create_test_sweet(&app.store, "Barfi", "Milk-based", 300.0, 35).await;
    common::create_test_sweet(&app.store, "Kaju Katli", "Dry Fruit", 450.0, 25).await;

    let response = app
        .server
        .get("/api/sweets/search")
        .add_query_param("min_price", "200")
        .add_query_param("max_price", "400")
        .authorization_bearer(USER_TOKEN)
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Barfi");
}

#[tokio::test]
async fn test_search_inverted_price_range() {
    let app = common::create_test_app().await;

    let response = app
        .server
        .get("/api/sweets/search")
        .add_query_param("min_price", "500")
        .add_query_param("max_price", "100")
        .authorization_bearer(USER_TOKEN)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "validation_error"
    );
}

#[tokio::test]
async fn test_admin_updates_sweet() {
    let app = common::create_test_app().await;
    let sweet = common::create_test_sweet(&app.store, "Ladoo", "Traditional", 250.0, 40).await;

    let response = app
        .server
        .put(&format!("/api/sweets/{}", sweet.id))
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "price": 275.0 }))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["price"], 275.0);
    assert_eq!(json["name"], "Ladoo");
    assert_eq!(json["quantity"], 40);
    assert_eq!(json["version"], 1);
}

#[tokio::test]
async fn test_update_missing_sweet() {
    let app = common::create_test_app().await;

    let response = app
        .server
        .put("/api/sweets/77")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "name": "Peda" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_cannot_update_or_delete() {
    let app = common::create_test_app().await;
    let sweet = common::create_test_sweet(&app.store, "Peda", "Milk-based", 220.0, 55).await;
    let path = format!("/api/sweets/{}", sweet.id);

    app.server
        .put(&path)
        .authorization_bearer(USER_TOKEN)
        .json(&json!({ "price": 1.0 }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .delete(&path)
        .authorization_bearer(USER_TOKEN)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .get(&path)
        .authorization_bearer(USER_TOKEN)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_admin_deletes_sweet() {
    let app = common::create_test_app().await;
    let sweet = common::create_test_sweet(&app.store, "Mysore Pak", "Ghee-based", 280.0, 30).await;
    let path = format!("/api/sweets/{}", sweet.id);

    let response = app
        .server
        .delete(&path)
        .authorization_bearer(ADMIN_TOKEN)
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Sweet deleted successfully"
    );

    app.server
        .get(&path)
        .authorization_bearer(ADMIN_TOKEN)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .delete(&path)
        .authorization_bearer(ADMIN_TOKEN)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
