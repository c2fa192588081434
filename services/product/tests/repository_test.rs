//! PostgresProductRepository 集成测试
//!
//! 需要 DATABASE_URL 指向可写的 PostgreSQL 实例：
//! `cargo test -p product-service --test repository_test -- --ignored`

use std::time::{SystemTime, UNIX_EPOCH};

use adapter_postgres::ensure_table;
use futures::StreamExt;
use product_service::domain::entities::{ProductDraft, ProductId};
use product_service::domain::repositories::ProductRepository;
use product_service::infrastructure::persistence::{PRODUCTS_TABLE, PostgresProductRepository};
use sqlx::PgPool;

async fn setup() -> (PgPool, PostgresProductRepository) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.unwrap();
    // 并发建表可能撞上 pg_type 唯一约束，重试一次即可
    if ensure_table(&pool, &PRODUCTS_TABLE).await.is_err() {
        ensure_table(&pool, &PRODUCTS_TABLE).await.unwrap();
    }
    (pool.clone(), PostgresProductRepository::new(pool))
}

/// 每次运行使用不同的名称，避免唯一约束冲突
fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_insert_and_find() {
    let (_pool, repo) = setup().await;

    let draft = ProductDraft::new(unique_name("lamp"), "A desk lamp", "Home", 3);
    let id = repo.insert(&draft).await.unwrap();
    let found = repo.find_by_id(id).await.unwrap().unwrap();

    assert_eq!(found.id, id);
    assert_eq!(found.draft(), draft);

    repo.delete(id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_missing_returns_none() {
    let (_pool, repo) = setup().await;

    assert!(repo.find_by_id(ProductId(-1)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_name_fails() {
    let (_pool, repo) = setup().await;

    let draft = ProductDraft::new(unique_name("dup"), "", "Gadget", 1);
    let id = repo.insert(&draft).await.unwrap();
    assert!(repo.insert(&draft).await.is_err());

    repo.delete(id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_and_delete_report_affected_rows() {
    let (_pool, repo) = setup().await;

    let id = repo
        .insert(&ProductDraft::new(unique_name("old"), "", "Books", 1))
        .await
        .unwrap();
    let replacement = ProductDraft::new(unique_name("new"), "edited", "Books", 100);

    assert_eq!(repo.update(id, &replacement).await.unwrap(), 1);
    assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().draft(), replacement);

    assert_eq!(repo.delete(id).await.unwrap(), 1);
    assert_eq!(repo.delete(id).await.unwrap(), 0);
    assert_eq!(repo.update(id, &replacement).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_null_columns_read_as_defaults() {
    let (pool, repo) = setup().await;

    let id: i32 = sqlx::query_scalar(
        "INSERT INTO products (category) VALUES ($1) RETURNING id",
    )
    .bind("Foods")
    .fetch_one(&pool)
    .await
    .unwrap();

    let found = repo.find_by_id(ProductId(id)).await.unwrap().unwrap();
    assert_eq!(found.name, "");
    assert_eq!(found.description, "");
    assert_eq!(found.amount, 0);
    assert_eq!(found.category, "Foods");

    repo.delete(ProductId(id)).await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_stream_is_ordered_by_name() {
    let (_pool, repo) = setup().await;

    let suffix = unique_name("");
    let mut ids = Vec::new();
    for prefix in ["c", "a", "b"] {
        let draft = ProductDraft::new(format!("{}{}", prefix, suffix), "", "Gadget", 1);
        ids.push(repo.insert(&draft).await.unwrap());
    }

    let names: Vec<String> = repo
        .stream_by_name()
        .map(|item| item.unwrap().name)
        .filter(|name| futures::future::ready(name.ends_with(&suffix)))
        .collect()
        .await;

    assert_eq!(
        names,
        vec![
            format!("a{}", suffix),
            format!("b{}", suffix),
            format!("c{}", suffix),
        ]
    );

    for id in ids {
        repo.delete(id).await.unwrap();
    }
}
