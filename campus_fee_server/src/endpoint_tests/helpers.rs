use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use campus_fee_engine::db_types::Role;
use cfs_common::Secret;
use log::debug;

use crate::{auth::TokenIssuer, config::AuthConfig};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("endpoint-test-secret-endpoint-test-secret".to_string()) }
}

pub fn issue_token(sub: &str, role: Role) -> String {
    let issuer = TokenIssuer::new(&get_auth_config());
    issuer.issue_token(sub, "Test User", role, None).expect("Failed to sign token")
}

pub async fn get_request(
    auth_header: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    let mut req = TestRequest::get().uri(path);
    if !auth_header.is_empty() {
        req = req.insert_header(("Authorization", format!("Bearer {auth_header}")));
    }
    run_request(req, configure).await
}

pub async fn post_request(
    auth_header: &str,
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    let mut req = TestRequest::post().uri(path).set_json(body);
    if !auth_header.is_empty() {
        req = req.insert_header(("Authorization", format!("Bearer {auth_header}")));
    }
    run_request(req, configure).await
}

async fn run_request(req: TestRequest, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let issuer = TokenIssuer::new(&get_auth_config());
    let app = App::new().app_data(web::Data::new(issuer)).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
