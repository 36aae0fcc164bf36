// ABOUTME: Binary entry point for the player-stats API server.
// ABOUTME: Wires tracing, the key store, the rate limiter, and the scrape client into an axum app.

mod handlers;
mod keys;
mod ratelimit;
mod shared;

use std::sync::Arc;

use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keys::{ApiKey, InMemoryKeyStore, KeyStore, Permission, PostgresKeyStore};
use ratelimit::RateLimiter;
use shared::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playerstats_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting player stats API");

    let key_store: Arc<dyn KeyStore + Send + Sync> = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .expect("failed to connect to database");
            let store = PostgresKeyStore::new(pool);
            store
                .migrate()
                .await
                .expect("failed to prepare api_keys table");
            info!("Using PostgreSQL key store");
            Arc::new(store)
        }
        Err(_) => {
            warn!("DATABASE_URL not set, API keys will not survive restarts");
            let store = InMemoryKeyStore::new();
            // Without persistence there is no existing admin credential to
            // call the creation endpoint with, so one is seeded at startup.
            let (admin_key, generated) = match std::env::var("ADMIN_API_KEY") {
                Ok(key) => (key, false),
                Err(_) => (keys::generate_key(), true),
            };
            store
                .insert(&ApiKey {
                    key: admin_key.clone(),
                    user: "admin".to_string(),
                    permission: Permission::Admin,
                    created_at: Utc::now(),
                })
                .await
                .expect("failed to seed admin key");
            if generated {
                // The generated key is unrecoverable otherwise, so it is
                // printed once. Operator-supplied keys stay out of the logs.
                info!(key = %admin_key, "Seeded generated bootstrap admin key");
            } else {
                info!("Seeded bootstrap admin key from ADMIN_API_KEY");
            }
            Arc::new(store)
        }
    };

    let state = AppState::new(
        key_store,
        Arc::new(RateLimiter::default_policy()),
        Arc::new(playerstats_scrape::Client::builder().build()),
    );

    let app = handlers::router(state).layer(TraceLayer::new_for_http());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    info!("Server running on http://{}", addr);
    axum::serve(listener, app).await.expect("server error");
}
