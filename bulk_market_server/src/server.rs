use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use bulk_market_engine::{
    events::{EventHandlers, EventProducers},
    MarketQueryApi,
    NegotiationApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    mailer::MailTransport,
    notifications,
    routes::{
        health,
        AcceptedOrdersRoute,
        ConfirmPaymentRoute,
        CreateBulkOrderRoute,
        DeleteBulkOrderRoute,
        DeleteOfferRoute,
        OfferDetailsRoute,
        OffersForOrderRoute,
        ShopOrdersRoute,
        SubmitOfferRoute,
        UpdateOfferRoute,
        UpdateOrderStatusRoute,
        UserOrdersRoute,
        UserProcessingOrdersRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let mailer = MailTransport::from_config(&config.mail);
    let hooks = notifications::configure_hooks(mailer);
    let handlers = EventHandlers::new(config.event_buffer_size, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let negotiation_api = NegotiationApi::new(db.clone(), producers.clone());
        let query_api = MarketQueryApi::new(db.clone());
        let bulk_order_scope = web::scope("/bulk-order")
            .service(CreateBulkOrderRoute::<SqliteDatabase>::new())
            .service(ShopOrdersRoute::<SqliteDatabase>::new())
            .service(SubmitOfferRoute::<SqliteDatabase>::new())
            .service(UserOrdersRoute::<SqliteDatabase>::new())
            .service(OffersForOrderRoute::<SqliteDatabase>::new())
            .service(OfferDetailsRoute::<SqliteDatabase>::new())
            .service(ConfirmPaymentRoute::<SqliteDatabase>::new())
            .service(UserProcessingOrdersRoute::<SqliteDatabase>::new())
            .service(AcceptedOrdersRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(DeleteBulkOrderRoute::<SqliteDatabase>::new())
            .service(UpdateOfferRoute::<SqliteDatabase>::new())
            .service(DeleteOfferRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bmx::access_log"))
            .app_data(web::Data::new(negotiation_api))
            .app_data(web::Data::new(query_api))
            .service(health)
            .service(bulk_order_scope)
    })
    .bind((host.as_str(), port))
    .map_err(|e| {
        error!("💻️ Could not bind to {host}:{port}. {e}");
        ServerError::InitializeError(e.to_string())
    })?
    .run();
    Ok(srv)
}
