use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Window {
    opened: Instant,
    admitted: u32,
}

/// Fixed one-second window shared by every caller of the wrapped routes.
/// Keeps quiz generation from exhausting the provider quota.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    per_window: u32,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    pub fn new(rps: u32) -> Self {
        let window = Window {
            opened: Instant::now(),
            admitted: 0,
        };
        Self {
            per_window: rps.max(1),
            window: Arc::new(Mutex::new(window)),
        }
    }

    /// Admits one request arriving at `now` if the current window has room.
    pub fn allow_at(&self, now: Instant) -> bool {
        let mut window = self.window.lock().expect("rate limiter mutex poisoned");
        if now.saturating_duration_since(window.opened) >= WINDOW {
            *window = Window {
                opened: now,
                admitted: 0,
            };
        }
        let admit = window.admitted < self.per_window;
        if admit {
            window.admitted += 1;
        }
        admit
    }
}

pub async fn rps_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.allow_at(Instant::now()) {
        tracing::warn!(path = %req.uri().path(), "generation rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "1")],
            Json(json!({
                "error": "rate_limit_exceeded",
                "message": "Too many generation requests, try again shortly",
            })),
        )
            .into_response();
    }
    next.run(req).await
}
