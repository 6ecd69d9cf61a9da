//! # Candle Service
//!
//! A small HTTP backend tracking persons and a global count of virtual
//! candles lit for them. Visitors get an anonymous `userId` cookie, can list
//! and create persons, and can light a candle for a person, which appends
//! their id to that person's `users` array and bumps the global counter.
//!
//! State lives in two MongoDB collections, `persons` and `counter` (see
//! [`database`]). The `counter` document must be seeded before deployment.
//!
//! Two historical variants of this service differed only in how persons are
//! addressed; here a single `ID_STRATEGY` setting picks between them (see
//! [`config::IdStrategy`]).

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, put},
    Router,
};
use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

use config::IdStrategy;
use routes::{
    counter_handler, create_person_handler, light_candle_by_client_id_handler,
    light_candle_handler, persons_handler, user_handler, welcome_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    dotenvy::dotenv().ok();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let app = build_router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    info!("Closing MongoDB session...");
    state.shutdown().await;

    println!("Server shutting down...");
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .client_origin
                .parse::<HeaderValue>()
                .expect("Invalid CLIENT_ORIGIN!"),
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE]);

    let light_candle_route = match state.config.id_strategy {
        IdStrategy::Client => put(light_candle_by_client_id_handler),
        IdStrategy::Generated => put(light_candle_handler),
    };

    Router::new()
        .route("/", get(welcome_handler))
        .route("/user", get(user_handler))
        .route("/persons", get(persons_handler).post(create_person_handler))
        .route("/counterLitCandles", get(counter_handler))
        .route("/persons/{person}", light_candle_route)
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use mongodb::Client;

    // The driver connects lazily, so a throwaway client is fine here.
    async fn test_state(id_strategy: IdStrategy) -> Arc<AppState> {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let db = client.database("candles_test");

        Arc::new(AppState {
            config: Config {
                port: 3080,
                mongodb_uri: "mongodb://localhost:27017".to_string(),
                database: "candles_test".to_string(),
                client_origin: "http://localhost:3000".to_string(),
                id_strategy,
            },
            persons: db.collection(database::PERSONS_COLLECTION),
            counter: db.collection(database::COUNTER_COLLECTION),
            client,
        })
    }

    #[tokio::test]
    async fn router_builds_for_both_strategies() {
        for id_strategy in [IdStrategy::Client, IdStrategy::Generated] {
            let state = test_state(id_strategy).await;
            let _router = build_router(state);
        }
    }
}
