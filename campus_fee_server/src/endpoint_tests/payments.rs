use actix_web::{http::StatusCode, web, web::ServiceConfig};
use campus_fee_engine::{
    db_types::{FeeType, OrderId, PaymentRecord, PaymentStatus, Role},
    events::EventProducers,
    fee_catalog,
    helpers::sign_callback,
    traits::{GatewayError, GatewayOrderResponse},
    PaymentFlowApi,
};
use cfs_common::{Rupees, Secret};
use chrono::{TimeZone, Utc};
use serde_json::json;

use super::{
    helpers::{get_request, issue_token, post_request},
    mocks::{MockGateway, MockPaymentStoreBackend},
};
use crate::routes::{all_payments, create_order, my_payments, verify_payment};

const CALLBACK_SECRET: &str = "endpoint-callback-secret";
const STUDENT: &str = "22B81A0501";

fn register(cfg: &mut ServiceConfig, store: MockPaymentStoreBackend, gateway: MockGateway) {
    let api = PaymentFlowApi::new(store, gateway, Secret::new(CALLBACK_SECRET.to_string()), EventProducers::default());
    cfg.app_data(web::Data::new(api))
        .service(
            web::resource("/payments/order")
                .route(web::post().to(create_order::<MockPaymentStoreBackend, MockGateway>)),
        )
        .service(
            web::resource("/payments/verify")
                .route(web::post().to(verify_payment::<MockPaymentStoreBackend, MockGateway>)),
        )
        .service(
            web::resource("/payments/history")
                .route(web::get().to(my_payments::<MockPaymentStoreBackend, MockGateway>)),
        )
        .service(
            web::resource("/payments/all").route(web::get().to(all_payments::<MockPaymentStoreBackend, MockGateway>)),
        );
}

fn sample_record(id: i64, student_id: &str, status: PaymentStatus) -> PaymentRecord {
    let ts = Utc.with_ymd_and_hms(2025, 6, 1, 10, 30, 0).unwrap();
    PaymentRecord {
        id,
        student_id: student_id.to_string(),
        fee_type: FeeType::Tuition,
        amount: Rupees::from(20_000),
        order_id: OrderId::from(format!("order_mock{id:04}")),
        gateway_payment_id: None,
        gateway_signature: None,
        status,
        created_at: ts,
        updated_at: ts,
    }
}

#[actix_web::test]
async fn create_order_requires_a_token() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_request("", "/payments/order", json!({"fee_type": "tuition", "amount": 20000}), |cfg| {
            register(cfg, MockPaymentStoreBackend::new(), MockGateway::new())
        })
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No access token was provided"), "unexpected body: {body}");
}

#[actix_web::test]
async fn create_order_happy_path() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(STUDENT, Role::Student);
    let (status, body) = post_request(
        &token,
        "/payments/order",
        json!({"fee_type": "tuition", "amount": 20000}),
        |cfg| {
            let mut store = MockPaymentStoreBackend::new();
            store.expect_sum_completed().returning(|_, _| Ok(Rupees::from(0)));
            store.expect_insert_payment_record().returning(|record| {
                let mut stored = sample_record(1, &record.student_id, PaymentStatus::Pending);
                stored.fee_type = record.fee_type;
                stored.amount = record.amount;
                stored.order_id = record.order_id;
                Ok(stored)
            });
            let mut gateway = MockGateway::new();
            gateway.expect_create_order().returning(|req| {
                Ok(GatewayOrderResponse {
                    order_id: OrderId::from("order_mock0001".to_string()),
                    amount: req.amount,
                    currency: req.currency,
                })
            });
            register(cfg, store, gateway);
        },
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    let handle: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(handle["order_id"], "order_mock0001");
    assert_eq!(handle["amount"], 2_000_000); // paise
    assert_eq!(handle["currency"], "INR");
    assert_eq!(handle["record_id"], 1);
    assert_eq!(handle["fee_type"], "tuition");
}

#[actix_web::test]
async fn unknown_fee_types_are_rejected_at_the_boundary() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(STUDENT, Role::Student);
    // no store or gateway expectations: the request must die before the core is reached
    let (status, body) =
        post_request(&token, "/payments/order", json!({"fee_type": "parking", "amount": 100}), |cfg| {
            register(cfg, MockPaymentStoreBackend::new(), MockGateway::new())
        })
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid fee type"), "unexpected body: {body}");
}

#[actix_web::test]
async fn settled_fees_are_reported_as_a_conflict() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(STUDENT, Role::Student);
    let (status, body) = post_request(
        &token,
        "/payments/order",
        json!({"fee_type": "tuition", "amount": 1000}),
        |cfg| {
            let mut store = MockPaymentStoreBackend::new();
            store.expect_sum_completed().returning(|_, _| Ok(fee_catalog::ceiling_for(FeeType::Tuition)));
            register(cfg, store, MockGateway::new());
        },
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("already settled"), "unexpected body: {body}");
}

#[actix_web::test]
async fn gateway_outages_map_to_bad_gateway() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(STUDENT, Role::Student);
    let (status, body) = post_request(
        &token,
        "/payments/order",
        json!({"fee_type": "bus", "amount": 1000}),
        |cfg| {
            let mut store = MockPaymentStoreBackend::new();
            store.expect_sum_completed().returning(|_, _| Ok(Rupees::from(0)));
            let mut gateway = MockGateway::new();
            gateway
                .expect_create_order()
                .returning(|_| Err(GatewayError::Unavailable("connection refused".to_string())));
            register(cfg, store, gateway);
        },
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("could not be reached"), "unexpected body: {body}");
}

#[actix_web::test]
async fn verify_payment_completes_a_pending_record() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(STUDENT, Role::Student);
    let order_id = OrderId::from("order_mock0007".to_string());
    let signature = sign_callback(CALLBACK_SECRET, &order_id, "pay_777");
    let (status, body) = post_request(
        &token,
        "/payments/verify",
        json!({
            "gateway_order_id": "order_mock0007",
            "gateway_payment_id": "pay_777",
            "gateway_signature": signature,
            "record_id": 7
        }),
        |cfg| {
            let mut store = MockPaymentStoreBackend::new();
            store.expect_fetch_payment_record().returning(|id| {
                let mut record = sample_record(id, STUDENT, PaymentStatus::Pending);
                record.order_id = OrderId::from("order_mock0007".to_string());
                Ok(Some(record))
            });
            store.expect_finalize_payment_record().returning(|id, outcome| {
                let mut record = sample_record(id, STUDENT, outcome.status());
                record.order_id = OrderId::from("order_mock0007".to_string());
                if let campus_fee_engine::db_types::VerificationOutcome::Completed {
                    gateway_payment_id,
                    gateway_signature,
                } = outcome
                {
                    record.gateway_payment_id = Some(gateway_payment_id);
                    record.gateway_signature = Some(gateway_signature);
                }
                Ok(Some(record))
            });
            register(cfg, store, MockGateway::new());
        },
    )
    .await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
    let confirmation: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(confirmation["record_id"], 7);
    assert_eq!(confirmation["status"], "completed");
    assert_eq!(confirmation["transaction_id"], "pay_777");
}

#[actix_web::test]
async fn verify_payment_is_self_service_only() {
    let _ = env_logger::try_init().ok();
    let token = issue_token("22B81A9999", Role::Student);
    let (status, body) = post_request(
        &token,
        "/payments/verify",
        json!({
            "gateway_order_id": "order_mock0001",
            "gateway_payment_id": "pay_1",
            "gateway_signature": "00",
            "record_id": 1
        }),
        |cfg| {
            let mut store = MockPaymentStoreBackend::new();
            store
                .expect_fetch_payment_record()
                .returning(|id| Ok(Some(sample_record(id, STUDENT, PaymentStatus::Pending))));
            register(cfg, store, MockGateway::new());
        },
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Not authorized"), "unexpected body: {body}");
}

#[actix_web::test]
async fn verify_payment_requires_the_record_id() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(STUDENT, Role::Student);
    let (status, body) = post_request(
        &token,
        "/payments/verify",
        json!({
            "gateway_order_id": "order_mock0001",
            "gateway_payment_id": "pay_1",
            "gateway_signature": "00"
        }),
        |cfg| register(cfg, MockPaymentStoreBackend::new(), MockGateway::new()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("record_id"), "unexpected body: {body}");
}

#[actix_web::test]
async fn history_returns_records_and_stats() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(STUDENT, Role::Student);
    let (status, body) = get_request(&token, "/payments/history", |cfg| {
        let mut store = MockPaymentStoreBackend::new();
        store.expect_fetch_records_for_student().returning(|student_id| {
            Ok(vec![
                sample_record(2, student_id, PaymentStatus::Completed),
                sample_record(1, student_id, PaymentStatus::Failed),
            ])
        });
        register(cfg, store, MockGateway::new());
    })
    .await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
    let history: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(history["count"], 2);
    assert_eq!(history["stats"][0]["fee_type"], "tuition");
    assert_eq!(history["stats"][0]["total_paid"], 20_000);
    assert_eq!(history["stats"][0]["payment_count"], 1);
}

#[actix_web::test]
async fn listing_all_payments_requires_the_admin_role() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(STUDENT, Role::Student);
    let (status, body) = get_request(&token, "/payments/all", |cfg| {
        register(cfg, MockPaymentStoreBackend::new(), MockGateway::new())
    })
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Insufficient Permissions"), "unexpected body: {body}");
}

#[actix_web::test]
async fn admins_can_filter_the_payment_listing() {
    let _ = env_logger::try_init().ok();
    let token = issue_token("ADMIN001", Role::Admin);
    let (status, body) = get_request(&token, "/payments/all?status=Completed&fee_type=tuition", |cfg| {
        let mut store = MockPaymentStoreBackend::new();
        store.expect_search_payment_records().returning(|query| {
            assert_eq!(query.status, Some(PaymentStatus::Completed));
            assert_eq!(query.fee_type, Some(FeeType::Tuition));
            Ok(vec![sample_record(3, STUDENT, PaymentStatus::Completed)])
        });
        register(cfg, store, MockGateway::new());
    })
    .await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
    let records: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["student_id"], STUDENT);
}
