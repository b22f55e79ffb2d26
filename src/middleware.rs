//! Middleware applied to every provider API request.

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use log::{debug, warn};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next, Result};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Throttles provider API calls and logs their outcome.
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<DirectLimiter>,
}

impl RateLimitMiddleware {
    /// Create a middleware allowing at most `max_rps` requests per second.
    pub fn new(max_rps: f64) -> Self {
        let per_second = NonZeroU32::new(max_rps.ceil() as u32).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
        }
    }
}

#[async_trait]
impl Middleware for RateLimitMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut http::Extensions,
        next: Next<'_>,
    ) -> Result<reqwest::Response> {
        self.limiter.until_ready().await;

        let method = req.method().clone();
        let url = req.url().clone();
        let start = Instant::now();

        let result = next.run(req, extensions).await;
        match &result {
            Ok(response) => debug!(
                "{} {} -> {} in {:?}",
                method,
                url,
                response.status(),
                start.elapsed()
            ),
            Err(e) => warn!("{} {} failed after {:?}: {}", method, url, start.elapsed(), e),
        }

        result
    }
}

/// Wrap the caller's shared HTTP client with the provider middleware stack.
pub fn provider_client(client: reqwest::Client, max_rps: f64) -> ClientWithMiddleware {
    ClientBuilder::new(client)
        .with(RateLimitMiddleware::new(max_rps))
        .build()
}
