use sqlx::SqliteConnection;

/// The distinct shops offering at least one product in the given category. Matching is exact; an
/// empty result is valid and simply means the fan-out reaches nobody.
pub async fn sellers_for_category(category: &str, conn: &mut SqliteConnection) -> Result<Vec<i64>, sqlx::Error> {
    let shop_ids: Vec<i64> =
        sqlx::query_scalar("SELECT DISTINCT shop_id FROM products WHERE category = $1 ORDER BY shop_id")
            .bind(category)
            .fetch_all(conn)
            .await?;
    Ok(shop_ids)
}

/// The arithmetic mean over the shop's product ratings, counting unrated products as zero.
/// `None` when the shop has no products at all.
pub async fn average_rating_for_shop(shop_id: i64, conn: &mut SqliteConnection) -> Result<Option<f64>, sqlx::Error> {
    let rating: Option<f64> =
        sqlx::query_scalar("SELECT AVG(COALESCE(rating, 0.0)) FROM products WHERE shop_id = $1")
            .bind(shop_id)
            .fetch_one(conn)
            .await?;
    Ok(rating)
}
