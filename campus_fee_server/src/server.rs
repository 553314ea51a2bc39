use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use campus_fee_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    traits::{LogNotifier, NotificationSink},
    PaymentFlowApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    integrations::razorpay::RazorpayGateway,
    middleware::{RateLimitMiddlewareFactory, SlidingWindow},
    routes::{all_payments, create_order, health, my_payments, verify_payment},
};

pub const EVENT_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = RazorpayGateway::new(config.razorpay.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, notification_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Attach the notification sink to the payment-completed hook. The sink runs out-of-band; if it fails, the
/// payment stays completed and we log the failure.
fn notification_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_payment_completed(|event| {
        Box::pin(async move {
            let payment = event.payment;
            let message = format!(
                "Payment of {} received for your {} fee. Transaction reference: {}.",
                payment.amount,
                payment.fee_type,
                payment.gateway_payment_id.as_deref().unwrap_or("n/a"),
            );
            let notifier = LogNotifier;
            if let Err(e) = notifier.notify(&payment.student_id, &message).await {
                warn!("📨️ Could not notify {} about their completed payment. {e}", payment.student_id);
            }
        })
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: RazorpayGateway,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let limiter = Arc::new(SlidingWindow::new(config.rate_limit.clone()));
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let api = PaymentFlowApi::new(db.clone(), gateway.clone(), config.callback_secret(), producers.clone());
        let issuer = TokenIssuer::new(&config.auth);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("cfs::access_log"))
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(issuer));
        let api_scope = web::scope("/api")
            .wrap(RateLimitMiddlewareFactory::new(Arc::clone(&limiter)))
            .service(
                web::resource("/payments/order")
                    .route(web::post().to(create_order::<SqliteDatabase, RazorpayGateway>)),
            )
            .service(
                web::resource("/payments/verify")
                    .route(web::post().to(verify_payment::<SqliteDatabase, RazorpayGateway>)),
            )
            .service(
                web::resource("/payments/history")
                    .route(web::get().to(my_payments::<SqliteDatabase, RazorpayGateway>)),
            )
            .service(
                web::resource("/payments/all")
                    .route(web::get().to(all_payments::<SqliteDatabase, RazorpayGateway>)),
            );
        app.service(health).service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    info!("🚀️ Server instance created");
    Ok(srv)
}
