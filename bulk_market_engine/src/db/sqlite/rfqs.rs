use log::{debug, trace};
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{OfferTerms, Rfq, RfqStatus},
    traits::MarketplaceError,
};

/// Inserts an RFQ slot for the (bulk order, shop) pair, returning `false` in the second parameter
/// if the pair already has one. This is what makes fan-out retries safe: the UNIQUE constraint on
/// the pair can never be violated through this path.
pub async fn idempotent_insert(
    bulk_order_id: i64,
    shop_id: i64,
    buyer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<(Rfq, bool), MarketplaceError> {
    let inserted = match fetch_rfq_for_pair(bulk_order_id, shop_id, &mut *conn).await? {
        Some(rfq) => (rfq, false),
        None => {
            let rfq = insert_rfq(bulk_order_id, shop_id, buyer_id, conn).await?;
            debug!("📇️ RFQ #{} created for bulk order #{bulk_order_id} and shop #{shop_id}", rfq.id);
            (rfq, true)
        },
    };
    Ok(inserted)
}

/// Inserts a fresh `Pending` slot with empty offer fields. The buyer id is copied from the bulk
/// order at this point and is never refreshed afterwards.
async fn insert_rfq(
    bulk_order_id: i64,
    shop_id: i64,
    buyer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Rfq, MarketplaceError> {
    let rfq = sqlx::query_as(
        r#"
            INSERT INTO rfqs (bulk_order_id, shop_id, buyer_id)
            VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(bulk_order_id)
    .bind(shop_id)
    .bind(buyer_id)
    .fetch_one(conn)
    .await?;
    Ok(rfq)
}

pub async fn fetch_rfq(id: i64, conn: &mut SqliteConnection) -> Result<Option<Rfq>, sqlx::Error> {
    let rfq = sqlx::query_as("SELECT * FROM rfqs WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(rfq)
}

pub async fn fetch_rfq_for_pair(
    bulk_order_id: i64,
    shop_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Rfq>, sqlx::Error> {
    let rfq = sqlx::query_as("SELECT * FROM rfqs WHERE bulk_order_id = $1 AND shop_id = $2")
        .bind(bulk_order_id)
        .bind(shop_id)
        .fetch_optional(conn)
        .await?;
    Ok(rfq)
}

/// All slots targeting the given shop, newest first. Pass `status` to restrict to one status.
pub async fn fetch_rfqs_for_shop(
    shop_id: i64,
    status: Option<RfqStatus>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Rfq>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM rfqs WHERE shop_id = ");
    builder.push_bind(shop_id);
    if let Some(status) = status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }
    builder.push(" ORDER BY created_at DESC, id DESC");
    trace!("📇️ Executing query: {}", builder.sql());
    let rfqs = builder.build_query_as::<Rfq>().fetch_all(conn).await?;
    Ok(rfqs)
}

/// The slots of one bulk order. With `with_offer_only`, slots that never received a quote are
/// filtered out.
pub async fn fetch_rfqs_for_bulk_order(
    bulk_order_id: i64,
    with_offer_only: bool,
    conn: &mut SqliteConnection,
) -> Result<Vec<Rfq>, sqlx::Error> {
    let query = if with_offer_only {
        "SELECT * FROM rfqs WHERE bulk_order_id = $1 AND price IS NOT NULL ORDER BY created_at ASC, id ASC"
    } else {
        "SELECT * FROM rfqs WHERE bulk_order_id = $1 ORDER BY created_at ASC, id ASC"
    };
    let rfqs = sqlx::query_as(query).bind(bulk_order_id).fetch_all(conn).await?;
    Ok(rfqs)
}

/// Writes the offer fields onto a slot. When `new_status` is given the status is changed in the
/// same statement; otherwise it is left as-is.
pub(crate) async fn write_offer(
    id: i64,
    terms: &OfferTerms,
    new_status: Option<RfqStatus>,
    conn: &mut SqliteConnection,
) -> Result<Option<Rfq>, MarketplaceError> {
    let mut builder = QueryBuilder::new("UPDATE rfqs SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    set_clause.push("price = ");
    set_clause.push_bind_unseparated(terms.price);
    set_clause.push("price_per_unit = ");
    set_clause.push_bind_unseparated(terms.price_per_unit);
    set_clause.push("delivery_time = ");
    set_clause.push_bind_unseparated(terms.delivery_time.clone());
    set_clause.push("terms = ");
    set_clause.push_bind_unseparated(terms.terms.clone());
    set_clause.push("warranty = ");
    set_clause.push_bind_unseparated(terms.warranty.clone());
    set_clause.push("available_quantity = ");
    set_clause.push_bind_unseparated(terms.available_quantity);
    set_clause.push("expiration_date = ");
    set_clause.push_bind_unseparated(terms.expiration_date);
    set_clause.push("packaging_details = ");
    set_clause.push_bind_unseparated(terms.packaging_details.clone());
    if let Some(status) = new_status {
        set_clause.push("status = ");
        set_clause.push_bind_unseparated(status);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("📇️ Executing query: {}", builder.sql());
    let result = builder.build().fetch_optional(conn).await?.map(|row: SqliteRow| Rfq::from_row(&row)).transpose()?;
    Ok(result)
}

/// Claims the win for this slot. The update only succeeds while no slot of the same bulk order,
/// this one included, holds `Accepted`; under concurrent acceptance attempts exactly one caller
/// gets the row back and every other caller gets `None`.
pub(crate) async fn try_mark_accepted(id: i64, conn: &mut SqliteConnection) -> Result<Option<Rfq>, MarketplaceError> {
    let result = sqlx::query_as(
        r#"
        UPDATE rfqs
        SET status = 'Accepted', updated_at = CURRENT_TIMESTAMP
        WHERE id = $1
          AND NOT EXISTS (
            SELECT 1 FROM rfqs AS sibling
            WHERE sibling.bulk_order_id = rfqs.bulk_order_id AND sibling.status = 'Accepted'
          )
        RETURNING *;
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(result)
}

/// Declines every other slot of the bulk order. Returns the number of declined siblings.
pub(crate) async fn decline_siblings(
    bulk_order_id: i64,
    winner_id: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, MarketplaceError> {
    let result = sqlx::query(
        "UPDATE rfqs SET status = 'Declined', updated_at = CURRENT_TIMESTAMP WHERE bulk_order_id = $1 AND id <> $2",
    )
    .bind(bulk_order_id)
    .bind(winner_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn has_accepted_rfq(bulk_order_id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM rfqs WHERE bulk_order_id = $1 AND status = 'Accepted')")
            .bind(bulk_order_id)
            .fetch_one(conn)
            .await?;
    Ok(exists)
}

pub(crate) async fn delete_rfq(id: i64, conn: &mut SqliteConnection) -> Result<u64, MarketplaceError> {
    let result = sqlx::query("DELETE FROM rfqs WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected())
}

pub(crate) async fn delete_rfqs_for_bulk_order(
    bulk_order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, MarketplaceError> {
    let result = sqlx::query("DELETE FROM rfqs WHERE bulk_order_id = $1").bind(bulk_order_id).execute(conn).await?;
    Ok(result.rows_affected())
}
