#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use sweet_shop::application::services::{
    AuthService, InventoryService, RetryPolicy, SweetService, hash_token,
};
use sweet_shop::domain::entities::{NewSweet, Sweet};
use sweet_shop::domain::repositories::{
    Role, StockStore, SweetRepository, TokenRepository,
};
use sweet_shop::infrastructure::memory::{InMemorySweetStore, InMemoryTokenRepository};
use sweet_shop::routes::api_router;
use sweet_shop::state::AppState;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const ADMIN_TOKEN: &str = "admin-test-token";
pub const USER_TOKEN: &str = "user-test-token";

/// In-memory application behind an `axum-test` server.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemorySweetStore>,
}

pub async fn create_test_state() -> (AppState, Arc<InMemorySweetStore>) {
    let store = Arc::new(InMemorySweetStore::new());
    let tokens = Arc::new(InMemoryTokenRepository::new());

    tokens
        .create_token("admin", &hash_token(SIGNING_SECRET, ADMIN_TOKEN), Role::Admin)
        .await
        .unwrap();
    tokens
        .create_token("storefront", &hash_token(SIGNING_SECRET, USER_TOKEN), Role::User)
        .await
        .unwrap();

    let sweet_repo: Arc<dyn SweetRepository> = store.clone();
    let stock_store: Arc<dyn StockStore> = store.clone();
    let token_repo: Arc<dyn TokenRepository> = tokens;

    let state = AppState::new(
        Arc::new(SweetService::new(sweet_repo)),
        Arc::new(InventoryService::with_policy(
            stock_store,
            RetryPolicy::default(),
        )),
        Arc::new(AuthService::new(token_repo, SIGNING_SECRET.to_string())),
    );

    (state, store)
}

pub async fn create_test_app() -> TestApp {
    let (state, store) = create_test_state().await;
    let server = TestServer::new(api_router(state)).unwrap();

    TestApp { server, store }
}

pub async fn create_test_sweet(
    store: &InMemorySweetStore,
    name: &str,
    category: &str,
    price: f64,
    quantity: i64,
) -> Sweet {
    store
        .create(NewSweet {
            name: name.to_string(),
            category: category.to_string(),
            price,
            quantity,
        })
        .await
        .unwrap()
}

pub async fn current_quantity(store: &InMemorySweetStore, id: i64) -> i64 {
    store.find_by_id(id).await.unwrap().unwrap().quantity
}
