//! JWT bearer-token authentication.
//!
//! Students and staff authenticate with a short-lived HS256 access token carried in the `Authorization: Bearer`
//! header. The claims carry the caller's registration number (the `sub` field — the same identifier payment
//! records are keyed on) and their role. Handlers receive the validated claims through the [`FromRequest`]
//! extractor, so an unauthenticated request never reaches a handler body.

use std::future::{ready, Ready};
use std::time::Duration;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use campus_fee_engine::db_types::Role;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::{AuthError, ServerError}};

const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The registration number of the caller. Payment records are keyed on this value.
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub exp: i64,
}

impl JwtClaims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self { encoding: EncodingKey::from_secret(secret), decoding: DecodingKey::from_secret(secret) }
    }

    /// Issue a new access token. This method DOES NOT verify that the caller is who they claim to be; the
    /// login flow must do that before calling `issue_token`.
    pub fn issue_token(
        &self,
        sub: &str,
        name: &str,
        role: Role,
        ttl: Option<Duration>,
    ) -> Result<String, AuthError> {
        let ttl = ttl.unwrap_or(DEFAULT_TOKEN_TTL);
        let exp = Utc::now().timestamp() + ttl.as_secs() as i64;
        let claims = JwtClaims { sub: sub.to_string(), name: name.to_string(), role, exp };
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| AuthError::ValidationError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.decoding, &Validation::default())
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        Ok(data.claims)
    }
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_claims(req))
    }
}

fn extract_claims(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| ServerError::InitializeError("TokenIssuer is not configured".to_string()))?;
    let header = req.headers().get("Authorization").ok_or(AuthError::MissingToken)?;
    let header = header
        .to_str()
        .map_err(|e| AuthError::PoorlyFormattedToken(format!("Header is not valid UTF-8. {e}")))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected a Bearer token.".to_string()))?;
    let claims = issuer.validate_token(token.trim())?;
    debug!("💻️ Access token validated for {}", claims.sub);
    Ok(claims)
}

#[cfg(test)]
mod test {
    use cfs_common::Secret;

    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig { jwt_secret: Secret::new("a".repeat(48)) })
    }

    #[test]
    fn issue_and_validate_round_trip() {
        let issuer = issuer();
        let token = issuer.issue_token("22B81A0501", "Asha", Role::Student, None).unwrap();
        let claims = issuer.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "22B81A0501");
        assert_eq!(claims.role, Role::Student);
        assert!(!claims.is_admin());
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let token = issuer().issue_token("22B81A0501", "Asha", Role::Student, None).unwrap();
        let other = TokenIssuer::new(&AuthConfig { jwt_secret: Secret::new("b".repeat(48)) });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected(){
        let issuer = issuer();
        let token = issuer.issue_token("22B81A0501", "Asha", Role::Student, Some(Duration::ZERO)).unwrap();
        // jsonwebtoken applies a default 60s leeway; jump well past it
        let mut validation = Validation::default();
        validation.leeway = 0;
        let err = decode::<JwtClaims>(&token, &issuer.decoding, &validation);
        assert!(err.is_err());
    }
}
