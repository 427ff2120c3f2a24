//! Contact projections of the buyer and shop accounts. Account management itself lives in a
//! separate service; the marketplace only reads these rows to address views and notifications.
use sqlx::SqliteConnection;

use crate::db_types::{Buyer, Shop};

pub async fn fetch_shop(id: i64, conn: &mut SqliteConnection) -> Result<Option<Shop>, sqlx::Error> {
    let shop = sqlx::query_as("SELECT id, name, email, phone FROM shops WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(shop)
}

pub async fn fetch_buyer(id: i64, conn: &mut SqliteConnection) -> Result<Option<Buyer>, sqlx::Error> {
    let buyer = sqlx::query_as("SELECT id, name, email, phone FROM buyers WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(buyer)
}
