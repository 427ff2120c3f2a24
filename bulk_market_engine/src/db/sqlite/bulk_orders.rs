use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{BulkOrder, BulkOrderStatus, NewBulkOrder},
    traits::MarketplaceError,
};

/// Inserts a new bulk order using the given connection. This is not atomic on its own. You can
/// embed this call inside a transaction if you need atomicity, and pass `&mut *tx` as the
/// connection argument.
///
/// The order is stored with `Pending` status; the fulfillment fields (payment, delivery stamps,
/// accepted offer) all start out empty.
pub async fn insert_bulk_order(
    order: NewBulkOrder,
    conn: &mut SqliteConnection,
) -> Result<BulkOrder, MarketplaceError> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO bulk_orders (
                buyer_id,
                product_name,
                description,
                quantity,
                category,
                reference_image,
                budget,
                delivery_deadline,
                shipping_address,
                packaging_requirements,
                supplier_location_preference
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *;
        "#,
    )
    .bind(order.buyer_id)
    .bind(order.product_name)
    .bind(order.description)
    .bind(order.quantity)
    .bind(order.category)
    .bind(order.reference_image)
    .bind(order.budget)
    .bind(order.delivery_deadline)
    .bind(order.shipping_address)
    .bind(order.packaging_requirements)
    .bind(order.supplier_location_preference)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

pub async fn fetch_bulk_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<BulkOrder>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM bulk_orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

/// All bulk orders placed by the given buyer, newest first.
pub async fn fetch_bulk_orders_for_buyer(
    buyer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<BulkOrder>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM bulk_orders WHERE buyer_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(buyer_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// The buyer's orders that are past acceptance, newest first.
pub async fn fetch_in_flight_orders_for_buyer(
    buyer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<BulkOrder>, sqlx::Error> {
    let orders = sqlx::query_as(
        r#"
        SELECT * FROM bulk_orders
        WHERE buyer_id = $1 AND status IN ('Processing', 'Shipping', 'Delivered')
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(buyer_id)
    .fetch_all(conn)
    .await?;
    Ok(orders)
}

/// Sets the fulfillment status of an order. `Delivered` also stamps the delivery timestamp in the
/// same statement, so the stamp and the status can never disagree.
pub(crate) async fn update_status(
    id: i64,
    status: BulkOrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<BulkOrder>, MarketplaceError> {
    let query = if status == BulkOrderStatus::Delivered {
        "UPDATE bulk_orders SET status = $1, delivered_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP \
         WHERE id = $2 RETURNING *"
    } else {
        "UPDATE bulk_orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *"
    };
    let result = sqlx::query_as(query).bind(status).bind(id).fetch_optional(conn).await?;
    trace!("📦️ Result of update_status for order #{id}: {result:?}");
    Ok(result)
}

/// Locks the order onto its winning RFQ: status moves to `Processing`, the payment reference and
/// timestamp are recorded, and `accepted_offer` points at the winner.
pub(crate) async fn record_payment(
    id: i64,
    rfq_id: i64,
    payment_info: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<BulkOrder>, MarketplaceError> {
    let result = sqlx::query_as(
        r#"
        UPDATE bulk_orders
        SET status = 'Processing',
            payment_info = $1,
            paid_at = CURRENT_TIMESTAMP,
            accepted_offer = $2,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $3
        RETURNING *;
        "#,
    )
    .bind(payment_info)
    .bind(rfq_id)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(result)
}

pub(crate) async fn delete_bulk_order(id: i64, conn: &mut SqliteConnection) -> Result<u64, MarketplaceError> {
    let result = sqlx::query("DELETE FROM bulk_orders WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected())
}
