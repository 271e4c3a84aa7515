use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

/// Header carrying the caller identity used for throttling.
pub const REQUESTER_HEADER: &str = "x-requester-id";
const ANONYMOUS_REQUESTER: &str = "anonymous";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Per-requester cooldown between accepted analyses.
///
/// One instance is shared by every handler; the map is only held for a
/// check-then-update, so different requesters never wait on each other for
/// longer than that.
#[derive(Debug, Clone)]
pub struct RequesterThrottle {
    cooldown: Duration,
    last_accepted: Arc<Mutex<HashMap<String, Instant>>>,
}

impl RequesterThrottle {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Accepts and records `requester`, or returns the remaining wait.
    ///
    /// # Errors
    ///
    /// Returns the time left in the cooldown when the previous accepted
    /// request from `requester` was too recent. Rejections are not recorded.
    pub async fn check(&self, requester: &str) -> Result<(), Duration> {
        self.check_at(requester, Instant::now()).await
    }

    async fn check_at(&self, requester: &str, now: Instant) -> Result<(), Duration> {
        let mut last_accepted = self.last_accepted.lock().await;
        // expired entries would be accepted anyway
        last_accepted.retain(|_, at| now.saturating_duration_since(*at) < self.cooldown);
        if let Some(previous) = last_accepted.get(requester) {
            let elapsed = now.saturating_duration_since(*previous);
            if elapsed < self.cooldown {
                return Err(self.cooldown - elapsed);
            }
        }
        last_accepted.insert(requester.to_string(), now);
        Ok(())
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware applying [`RequesterThrottle`] keyed by [`REQUESTER_HEADER`].
pub async fn throttle_requesters(
    State(throttle): State<RequesterThrottle>,
    req: Request,
    next: Next,
) -> Response {
    let requester = requester_id(req.headers());

    match throttle.check(&requester).await {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            let wait_secs = wait.as_secs_f64().ceil().max(1.0);
            tracing::info!(requester = %requester, wait_secs, "requester throttled");

            let request_id = req
                .extensions()
                .get::<RequestId>()
                .map_or_else(String::new, |id| id.0.clone());
            let mut res = ApiError::new(
                request_id,
                "rate_limited",
                format!("please wait {wait_secs:.0} seconds before the next analysis"),
            )
            .into_response();
            if let Ok(val) = HeaderValue::from_str(&format!("{wait_secs:.0}")) {
                res.headers_mut().insert(RETRY_AFTER, val);
            }
            res
        }
    }
}

fn requester_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUESTER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(ANONYMOUS_REQUESTER)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requester_id_falls_back_to_anonymous() {
        let mut headers = HeaderMap::new();
        assert_eq!(requester_id(&headers), "anonymous");

        headers.insert(REQUESTER_HEADER, HeaderValue::from_static("  "));
        assert_eq!(requester_id(&headers), "anonymous");

        headers.insert(REQUESTER_HEADER, HeaderValue::from_static("user-42"));
        assert_eq!(requester_id(&headers), "user-42");
    }

    #[tokio::test]
    async fn throttle_rejects_within_cooldown_and_reports_remaining() {
        let throttle = RequesterThrottle::new(Duration::from_secs(60));
        let start = Instant::now();

        assert_eq!(throttle.check_at("alice", start).await, Ok(()));
        let wait = throttle
            .check_at("alice", start + Duration::from_secs(20))
            .await
            .unwrap_err();
        assert_eq!(wait, Duration::from_secs(40));

        // a rejected attempt does not restart the window
        assert_eq!(
            throttle
                .check_at("alice", start + Duration::from_secs(60))
                .await,
            Ok(())
        );
    }

    #[tokio::test]
    async fn throttle_keys_are_independent() {
        let throttle = RequesterThrottle::new(Duration::from_secs(60));
        let start = Instant::now();

        assert_eq!(throttle.check_at("alice", start).await, Ok(()));
        assert_eq!(throttle.check_at("bob", start).await, Ok(()));
    }

    #[tokio::test]
    async fn expired_requesters_are_evicted() {
        let throttle = RequesterThrottle::new(Duration::from_secs(60));
        let start = Instant::now();

        for i in 0..1_000 {
            assert_eq!(throttle.check_at(&format!("user-{i}"), start).await, Ok(()));
        }
        assert_eq!(throttle.last_accepted.lock().await.len(), 1_000);

        let later = start + Duration::from_secs(3_600);
        assert_eq!(throttle.check_at("carol", later).await, Ok(()));
        assert_eq!(throttle.last_accepted.lock().await.len(), 1);

        // live entries survive the sweep
        assert!(throttle
            .check_at("carol", later + Duration::from_secs(10))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn zero_cooldown_never_throttles() {
        let throttle = RequesterThrottle::new(Duration::ZERO);
        let start = Instant::now();
        assert_eq!(throttle.check_at("alice", start).await, Ok(()));
        assert_eq!(throttle.check_at("alice", start).await, Ok(()));
    }
}
