use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use band_server::config::Config;
use band_server::middleware::JwtVerifier;
use band_server::repository::{
    PgActivityRepository, PgImplementRepository, PgInstrumentRepository, PgMemberRepository,
};
use band_server::routes::create_routes;
use band_server::services::{ActivityService, LogNotifier, MailRelayNotifier, Notifier};
use band_server::state::AppState;

const DEFAULT_LOG_FILTER: &str = "band_server=info,tower_http=info";

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let notifier: Arc<dyn Notifier> = match &config.notify_url {
        Some(url) => {
            tracing::info!(relay = %url, "Notifications go through the mail relay");
            Arc::new(
                MailRelayNotifier::new(url.as_str(), config.mail_from.as_str())
                    .expect("Failed to build mail relay client"),
            )
        }
        None => {
            tracing::warn!("NOTIFY_URL is not set, notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let members = Arc::new(PgMemberRepository::new(pool.clone()));
    let state = AppState {
        activities: ActivityService::new(
            Arc::new(PgActivityRepository::new(pool.clone())),
            members.clone(),
            notifier,
        ),
        members,
        instruments: Arc::new(PgInstrumentRepository::new(pool.clone())),
        implements: Arc::new(PgImplementRepository::new(pool)),
        jwt: Arc::new(JwtVerifier::new(&config.jwt_secret)),
    };

    let app = create_routes(state, &config);

    tracing::info!("Server running at http://{}", config.server_addr);

    let listener = TcpListener::bind(config.server_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
