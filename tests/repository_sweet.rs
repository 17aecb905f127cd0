use sqlx::PgPool;
use std::sync::Arc;
use sweet_shop::AppError;
use sweet_shop::application::services::InventoryService;
use sweet_shop::domain::entities::{NewSweet, SweetFilter, SweetPatch};
use sweet_shop::domain::inventory::InventoryError;
use sweet_shop::domain::repositories::{StockStore, SweetRepository, WriteOutcome};
use sweet_shop::infrastructure::persistence::{PgStockStore, PgSweetRepository};

fn new_sweet(name: &str, category: &str, price: f64, quantity: i64) -> NewSweet {
    NewSweet {
        name: name.to_string(),
        category: category.to_string(),
        price,
        quantity,
    }
}

#[sqlx::test]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgSweetRepository::new(Arc::new(pool));

    let created = repo
        .create(new_sweet("Gulab Jamun", "Milk-based", 200.0, 50))
        .await
        .unwrap();

    assert_eq!(created.version, 0);

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Gulab Jamun");
    assert_eq!(found.quantity, 50);

    assert!(repo.find_by_id(created.id + 1000).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_negative_quantity_violates_check(pool: PgPool) {
    let repo = PgSweetRepository::new(Arc::new(pool));

    let err = repo
        .create(new_sweet("Broken", "Fried", 10.0, -1))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation { .. }));
}

#[sqlx::test]
async fn test_search_filters(pool: PgPool) {
    let repo = PgSweetRepository::new(Arc::new(pool));

    repo.create(new_sweet("Gulab Jamun", "Milk-based", 200.0, 50))
        .await
        .unwrap();
    repo.create(new_sweet("Jalebi", "Fried", 150.0, 60))
        .await
        .unwrap();
    repo.create(new_sweet("Kaju Katli", "Dry Fruit", 450.0, 25))
        .await
        .unwrap();

    let by_name = repo
        .search(SweetFilter {
            name: Some("jamun".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Gulab Jamun");

    let by_price = repo
        .search(SweetFilter {
            min_price: Some(100.0),
            max_price: Some(250.0),
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<_> = by_price.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Gulab Jamun", "Jalebi"]);

    let wildcard = repo
        .search(SweetFilter {
            name: Some("%".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(wildcard.is_empty());
}

#[sqlx::test]
async fn test_update_and_delete(pool: PgPool) {
    let repo = PgSweetRepository::new(Arc::new(pool));

    let sweet = repo
        .create(new_sweet("Peda", "Milk-based", 220.0, 55))
        .await
        .unwrap();

    let updated = repo
        .update(
            sweet.id,
            SweetPatch {
                price: Some(240.0),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.price, 240.0);
    assert_eq!(updated.quantity, 55);
    assert_eq!(updated.version, 1);

    assert!(repo.delete(sweet.id).await.unwrap());
    assert!(!repo.delete(sweet.id).await.unwrap());
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[sqlx::test]
async fn test_replace_catalog(pool: PgPool) {
    let repo = PgSweetRepository::new(Arc::new(pool));

    repo.create(new_sweet("Stale", "Fried", 10.0, 1))
        .await
        .unwrap();

    let seeded = repo
        .replace_catalog(vec![
            new_sweet("Gulab Jamun", "Milk-based", 200.0, 50),
            new_sweet("Jalebi", "Fried", 150.0, 60),
        ])
        .await
        .unwrap();

    assert_eq!(seeded.len(), 2);
    let names: Vec<_> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Gulab Jamun", "Jalebi"]);
}

#[sqlx::test]
async fn test_replace_catalog_rolls_back_on_failure(pool: PgPool) {
    let repo = PgSweetRepository::new(Arc::new(pool));

    repo.create(new_sweet("Kaju Katli", "Dry Fruit", 450.0, 25))
        .await
        .unwrap();

    let err = repo
        .replace_catalog(vec![
            new_sweet("Peda", "Milk-based", 220.0, 55),
            new_sweet("Broken", "Fried", 10.0, -1),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let remaining = repo.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Kaju Katli");
}

#[sqlx::test]
async fn test_conditional_write(pool: PgPool) {
    let pool = Arc::new(pool);
    let repo = PgSweetRepository::new(pool.clone());
    let store = PgStockStore::new(pool);

    let sweet = repo
        .create(new_sweet("Ladoo", "Traditional", 250.0, 10))
        .await
        .unwrap();

    let level = store.read_quantity(sweet.id).await.unwrap().unwrap();
    assert_eq!(level.quantity, 10);
    assert_eq!(level.version, 0);

    match store
        .write_quantity_if_version(sweet.id, 7, 0)
        .await
        .unwrap()
    {
        WriteOutcome::Committed(updated) => {
            assert_eq!(updated.quantity, 7);
            assert_eq!(updated.version, 1);
        }
        other => panic!("expected commit, got {other:?}"),
    }

    assert_eq!(
        store
            .write_quantity_if_version(sweet.id, 5, 0)
            .await
            .unwrap(),
        WriteOutcome::VersionConflict
    );
    assert_eq!(
        store
            .write_quantity_if_version(sweet.id + 1000, 5, 0)
            .await
            .unwrap(),
        WriteOutcome::NotFound
    );
}

#[sqlx::test]
async fn test_concurrent_purchases_against_postgres(pool: PgPool) {
    let pool = Arc::new(pool);
    let repo = PgSweetRepository::new(pool.clone());
    let sweet = repo
        .create(new_sweet("Kaju Katli", "Dry Fruit", 450.0, 1))
        .await
        .unwrap();

    let stock: Arc<dyn StockStore> = Arc::new(PgStockStore::new(pool));
    let inventory = Arc::new(InventoryService::new(stock));

    let (a, b) = tokio::join!(
        inventory.purchase(sweet.id, Some(1)),
        inventory.purchase(sweet.id, Some(1))
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| matches!(r, Err(InventoryError::InsufficientStock { .. })))
            .count(),
        1
    );
    assert_eq!(
        repo.find_by_id(sweet.id).await.unwrap().unwrap().quantity,
        0
    );
}
