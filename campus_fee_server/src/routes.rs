//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers are generic over the payment store and the gateway so that endpoint tests can substitute mocks;
//! the server registers them with the concrete `SqliteDatabase` + `RazorpayGateway` pair. Since actix cannot
//! infer generics in route macros, the handlers are registered with explicit turbofish in
//! [`crate::server::create_server_instance`].

use std::str::FromStr;

use actix_web::{get, web, HttpResponse, Responder};
use campus_fee_engine::{
    cfe_api::payment_objects::{PaymentConfirmation, VerifyRequest},
    db_types::{FeeType, PaymentStatus},
    traits::{OrderGateway, PaymentQueryFilter, PaymentStore},
    PaymentFlowApi,
    PaymentFlowError,
};
use cfs_common::Rupees;
use log::*;

use crate::{
    auth::JwtClaims,
    data_objects::{CreateOrderRequest, PaymentHistoryResponse, PaymentListQuery, VerifyPaymentRequest},
    errors::ServerError,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// --------------------------------------------  Create order  --------------------------------------------------
/// Route handler for creating a payment order.
///
/// The fee type arrives as a plain string and is mapped onto the closed [`FeeType`] enum right here, at the
/// boundary — the engine never sees an unrecognised fee type or a non-numeric amount. The authenticated
/// student from the access token is the owner of the new record; there is no way to create an order on
/// someone else's behalf.
pub async fn create_order<B, G>(
    claims: JwtClaims,
    api: web::Data<PaymentFlowApi<B, G>>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentStore + 'static,
    G: OrderGateway + 'static,
{
    trace!("💻️ Received create order request from {}", claims.sub);
    let fee_type = FeeType::from_str(&body.fee_type)
        .map_err(|e| ServerError::PaymentFlow(PaymentFlowError::InvalidFeeType(e.0)))?;
    let amount = Rupees::from(body.amount);
    let handle = api.create_order(&claims.sub, fee_type, amount).await?;
    info!("💻️ Order {} issued for {} ({fee_type})", handle.order_id, claims.sub);
    Ok(HttpResponse::Created().json(handle))
}

// -------------------------------------------  Verify payment  -------------------------------------------------
/// Route handler for verifying a gateway payment callback.
///
/// The client relays the `{order id, payment id, signature}` triple it received from the checkout widget,
/// together with the record id from the order handle. The verification engine recomputes the signature with
/// the server-held secret and finalizes the record. Re-submitting the same callback is safe: the terminal
/// record comes back unchanged.
pub async fn verify_payment<B, G>(
    claims: JwtClaims,
    api: web::Data<PaymentFlowApi<B, G>>,
    body: web::Json<VerifyPaymentRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentStore + 'static,
    G: OrderGateway + 'static,
{
    trace!("💻️ Received verify payment request from {}", claims.sub);
    let body = body.into_inner();
    let record_id =
        body.record_id.ok_or(ServerError::PaymentFlow(PaymentFlowError::MissingFields("record_id")))?;
    let claim = VerifyRequest {
        gateway_order_id: body.gateway_order_id,
        gateway_payment_id: body.gateway_payment_id,
        gateway_signature: body.gateway_signature,
        record_id,
    };
    let record = api.verify_payment(&claim, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(PaymentConfirmation::from(&record)))
}

// ----------------------------------------------  History  ----------------------------------------------------
/// The calling student's own payment history, newest first, with per-fee-type completed totals.
pub async fn my_payments<B, G>(
    claims: JwtClaims,
    api: web::Data<PaymentFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentStore + 'static,
    G: OrderGateway + 'static,
{
    trace!("💻️ Received payment history request from {}", claims.sub);
    let (payments, stats) = api.history_for_student(&claims.sub).await?;
    let count = payments.len();
    Ok(HttpResponse::Ok().json(PaymentHistoryResponse { payments, stats, count }))
}

// --------------------------------------------  All payments  --------------------------------------------------
/// Staff-facing listing over all payment records, with optional `status`, `fee_type` and `student_id` filters.
pub async fn all_payments<B, G>(
    claims: JwtClaims,
    api: web::Data<PaymentFlowApi<B, G>>,
    query: web::Query<PaymentListQuery>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentStore + 'static,
    G: OrderGateway + 'static,
{
    if !claims.is_admin() {
        debug!("💻️ {} tried to list all payments without the admin role", claims.sub);
        return Err(ServerError::InsufficientPermissions("Only staff can list all payments.".to_string()));
    }
    let query = query.into_inner();
    let mut filter = PaymentQueryFilter::default();
    if let Some(status) = query.status {
        let status = PaymentStatus::from_str(&status).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
        filter = filter.with_status(status);
    }
    if let Some(fee_type) = query.fee_type {
        let fee_type = FeeType::from_str(&fee_type)
            .map_err(|e| ServerError::PaymentFlow(PaymentFlowError::InvalidFeeType(e.0)))?;
        filter = filter.with_fee_type(fee_type);
    }
    if let Some(student_id) = query.student_id {
        filter = filter.with_student_id(student_id);
    }
    let records = api.search_payments(filter).await?;
    Ok(HttpResponse::Ok().json(records))
}
