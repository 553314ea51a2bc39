use std::{env, time::Duration};

use cfs_common::{helpers::parse_boolean_flag, Secret};
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use razorpay_tools::RazorpayConfig;

use crate::errors::ServerError;

const DEFAULT_CFS_HOST: &str = "127.0.0.1";
const DEFAULT_CFS_PORT: u16 = 8460;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: usize = 30;
const DEFAULT_RATE_LIMIT_MAX_CLIENTS: usize = 10_000;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// Gateway credentials and endpoint. The key secret doubles as the HMAC key for callback verification,
    /// which is why it never leaves the server side.
    pub razorpay: RazorpayConfig,
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CFS_HOST.to_string(),
            port: DEFAULT_CFS_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            razorpay: RazorpayConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CFS_HOST").ok().unwrap_or_else(|| DEFAULT_CFS_HOST.into());
        let port = env::var("CFS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for CFS_PORT. {e} Using the default, {DEFAULT_CFS_PORT}, instead."
                    );
                    DEFAULT_CFS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_CFS_PORT);
        let database_url = env::var("CFS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ CFS_DATABASE_URL is not set. Please set it to the URL for the fee payments database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to \
                 the default configuration."
            );
            AuthConfig::default()
        });
        let razorpay = RazorpayConfig::new_from_env_or_default();
        let rate_limit = RateLimitConfig::from_env_or_default();
        Self { host, port, database_url, auth, razorpay, rate_limit }
    }

    /// The shared secret for verifying gateway callbacks. Razorpay signs the callback with the API key secret.
    pub fn callback_secret(&self) -> Secret<String> {
        self.razorpay.key_secret.clone()
    }
}

//-------------------------------------------------  AuthConfig  ------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The secret key used to sign and verify JWT access tokens (HS256).
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. DO NOT \
             operate on production like this, since every access token dies with this process. Set CFS_JWT_SECRET \
             instead. 🚨️🚨️🚨️"
        );
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("CFS_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [CFS_JWT_SECRET]")))?;
        if secret.len() < 32 {
            return Err(ServerError::ConfigurationError(
                "CFS_JWT_SECRET must be at least 32 characters long.".to_string(),
            ));
        }
        Ok(Self { jwt_secret: Secret::new(secret) })
    }
}

//----------------------------------------------  RateLimitConfig  ----------------------------------------------------
/// Bounds for the sliding-window limiter on the payment endpoints: a fixed request budget per client per
/// window, and a hard cap on the number of clients tracked at once.
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// If false, the limiter lets everything through. Useful for load tests against a staging box.
    pub enabled: bool,
    pub window: Duration,
    pub max_requests: usize,
    pub max_clients: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            max_clients: DEFAULT_RATE_LIMIT_MAX_CLIENTS,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env_or_default() -> Self {
        let enabled = parse_boolean_flag(env::var("CFS_RATE_LIMIT_ENABLED").ok(), true);
        let window = env::var("CFS_RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().map_err(|e| warn!("🪛️ Invalid CFS_RATE_LIMIT_WINDOW_SECS. {e}")).ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS));
        let max_requests = env::var("CFS_RATE_LIMIT_MAX_REQUESTS")
            .ok()
            .and_then(|s| s.parse::<usize>().map_err(|e| warn!("🪛️ Invalid CFS_RATE_LIMIT_MAX_REQUESTS. {e}")).ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_MAX_REQUESTS);
        let max_clients = env::var("CFS_RATE_LIMIT_MAX_CLIENTS")
            .ok()
            .and_then(|s| s.parse::<usize>().map_err(|e| warn!("🪛️ Invalid CFS_RATE_LIMIT_MAX_CLIENTS. {e}")).ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_MAX_CLIENTS);
        if !enabled {
            warn!("🚨️ The rate limiter is disabled. If this is not what you want, unset CFS_RATE_LIMIT_ENABLED.");
        }
        Self { enabled, window, max_requests, max_clients }
    }
}
