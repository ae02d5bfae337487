use crate::app_context::AppContext;
use crate::cli::Args;
use crate::storage::sessions::HashMapSessionsStorage;
use crate::{health, sessions};
use axum::{
    routing::{any, get, post},
    Router,
};

pub fn new(args: &Args, app_context: AppContext<HashMapSessionsStorage>) -> Router {
    let cors_policy = crate::http::cors_layer(args);
    tracing::info!("Initialized HTTP configuration.");

    let health_routes = Router::new().route("/check", get(health::handlers::healthcheck));
    let sessions_routes = Router::new()
        .route("/", post(sessions::handlers::session::create))
        .route(
            "/:session-id",
            get(sessions::handlers::session::view).delete(sessions::handlers::session::destroy),
        )
        .route(
            "/:session-id/summary",
            get(sessions::handlers::session::summary),
        )
        .route(
            "/:session-id/click",
            post(sessions::handlers::player_actions::click),
        )
        .route(
            "/:session-id/submit-guess",
            post(sessions::handlers::player_actions::submit_guess),
        )
        .route(
            "/:session-id/new-round",
            post(sessions::handlers::player_actions::new_round),
        )
        .route(
            "/:session-id/restart",
            post(sessions::handlers::player_actions::restart),
        )
        .route("/:session-id/ws", any(sessions::handlers::ws::ws));

    Router::new()
        .nest("/health", health_routes)
        .nest("/sessions", sessions_routes)
        .with_state(app_context)
        .layer(cors_policy)
        .layer(axum::middleware::from_fn(crate::http::middleware::tracing))
}
