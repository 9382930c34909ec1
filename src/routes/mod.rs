pub mod document;
pub mod health;
pub mod quiz;
pub mod session;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::middleware::rate_limit::{rps_middleware, RateLimiter};
use crate::AppState;

/// Every route of the service. Only generation is rate limited since it is
/// the only path that spends provider quota.
pub fn router(state: AppState, generate_rps: u32) -> Router {
    let generate_api = Router::new()
        .route(
            "/api/sessions/:id/quizzes/:variant/generate",
            post(quiz::generate_quiz),
        )
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(generate_rps),
            rps_middleware,
        ));

    let session_api = Router::new()
        .route("/health", get(health::health))
        .route("/api/sessions", post(session::create_session))
        .route(
            "/api/sessions/:id",
            get(session::get_session).delete(session::delete_session),
        )
        .route("/api/sessions/:id/document", post(document::upload_document))
        .route("/api/sessions/:id/quizzes/:variant", get(quiz::get_quiz))
        .route(
            "/api/sessions/:id/quizzes/:variant/answers/:index",
            put(quiz::record_answer),
        )
        .route(
            "/api/sessions/:id/quizzes/:variant/questions/:index/reveal",
            get(quiz::reveal_answer),
        )
        .route(
            "/api/sessions/:id/quizzes/:variant/submit",
            post(quiz::submit_quiz),
        );

    Router::new()
        .merge(session_api)
        .merge(generate_api)
        .with_state(state)
}
