//! Catalog fixtures for tests. Shop, buyer and product management is out of scope for the engine
//! proper, so tests write those rows directly.
use sqlx::SqlitePool;

use crate::db_types::{Buyer, Product, Shop};

pub async fn seed_shop(pool: &SqlitePool, name: &str, email: Option<&str>) -> Shop {
    sqlx::query_as("INSERT INTO shops (name, email) VALUES ($1, $2) RETURNING id, name, email, phone")
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("Error seeding shop")
}

pub async fn seed_buyer(pool: &SqlitePool, name: &str, email: Option<&str>) -> Buyer {
    sqlx::query_as("INSERT INTO buyers (name, email) VALUES ($1, $2) RETURNING id, name, email, phone")
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("Error seeding buyer")
}

pub async fn seed_product(
    pool: &SqlitePool,
    shop_id: i64,
    name: &str,
    category: &str,
    rating: Option<f64>,
) -> Product {
    sqlx::query_as(
        "INSERT INTO products (shop_id, name, category, rating) VALUES ($1, $2, $3, $4) \
         RETURNING id, shop_id, name, category, rating",
    )
    .bind(shop_id)
    .bind(name)
    .bind(category)
    .bind(rating)
    .fetch_one(pool)
    .await
    .expect("Error seeding product")
}
