//! Rate-limit middleware for Actix Web.
//!
//! A fixed-capacity sliding-window counter keyed by client identity. Each client gets a bounded request budget
//! per window, and the limiter itself is bounded: it tracks at most `max_clients` keys at once, pruning idle
//! clients before refusing to admit new ones. There is no unbounded process-wide map hiding in here.
//!
//! The client key is the `Authorization` header when present (one budget per token), falling back to the peer
//! address for unauthenticated callers.

use std::{
    collections::{HashMap, VecDeque},
    future::{ready, Ready},
    rc::Rc,
    sync::{Arc, Mutex},
    time::Instant,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};

use crate::{config::RateLimitConfig, errors::ServerError};

//--------------------------------------    SlidingWindow     --------------------------------------------------------
pub struct SlidingWindow {
    config: RateLimitConfig,
    clients: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindow {
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config, clients: Mutex::new(HashMap::new()) }
    }

    /// Record a hit for `key` and report whether it is within budget. A client at capacity stays at capacity
    /// until its oldest hit ages out of the window.
    pub fn check(&self, key: &str) -> bool {
        if !self.config.enabled {
            return true;
        }
        let now = Instant::now();
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());
        if !clients.contains_key(key) && clients.len() >= self.config.max_clients {
            // prune idle clients before refusing to track a new one
            let window = self.config.window;
            clients.retain(|_, hits| {
                while hits.front().map(|t| now.duration_since(*t) > window).unwrap_or(false) {
                    hits.pop_front();
                }
                !hits.is_empty()
            });
            if clients.len() >= self.config.max_clients {
                warn!("⏱️ Rate limiter is tracking {} clients and cannot admit more.", clients.len());
                return false;
            }
        }
        let hits = clients.entry(key.to_string()).or_default();
        while hits.front().map(|t| now.duration_since(*t) > self.config.window).unwrap_or(false) {
            hits.pop_front();
        }
        if hits.len() >= self.config.max_requests {
            return false;
        }
        hits.push_back(now);
        true
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

//--------------------------------------      Middleware      --------------------------------------------------------
pub struct RateLimitMiddlewareFactory {
    limiter: Arc<SlidingWindow>,
}

impl RateLimitMiddlewareFactory {
    /// The limiter is shared: hand the same `Arc` to every worker so the budget is process-wide.
    pub fn new(limiter: Arc<SlidingWindow>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = RateLimitMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService { limiter: Arc::clone(&self.limiter), service: Rc::new(service) }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    limiter: Arc<SlidingWindow>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = Arc::clone(&self.limiter);
        Box::pin(async move {
            let key = client_key(&req);
            if limiter.check(&key) {
                trace!("⏱️ Rate limit check for request ✅️");
                service.call(req).await
            } else {
                warn!("⏱️ Rate limit exceeded. Denying request.");
                Err(ServerError::TooManyRequests.into())
            }
        })
    }
}

fn client_key(req: &ServiceRequest) -> String {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .or_else(|| req.connection_info().peer_addr().map(|s| s.to_string()))
        .unwrap_or_else(|| "anonymous".to_string())
}
