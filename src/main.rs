use {
    incubator_watch::{
        AppState,
        adapters::http,
        config::Config,
        infra::postgres::{notifier::PgNotifier, source::PgSource},
        services::dashboard::Dashboard,
    },
    sqlx::postgres::PgPoolOptions,
    std::{sync::Arc, time::Duration},
    tokio::signal,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("invalid configuration");
    if config.database_url.is_none() {
        tracing::warn!("DATABASE_URL not set, every surface will render empty");
    }

    // Lazy: an unreachable database degrades to empty views instead of
    // refusing to start.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(3))
        .connect_lazy(config.database_url())
        .expect("malformed DATABASE_URL");

    let source = Arc::new(PgSource::new(pool.clone()));
    let notifier = PgNotifier::new(pool);
    let request_timeout = config.fetch_timeout * 2;
    let bind_addr = config.bind_addr.clone();

    let (dashboard, subscriptions) = Dashboard::start(source, &notifier, config).await;
    let state = AppState {
        dashboard: Arc::new(dashboard),
    };

    let app = http::router(state, request_timeout);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    subscriptions.close().await;
    tracing::info!("live subscriptions closed");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
