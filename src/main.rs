use rokadan::{AppState, build_router, database, load_config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rokadan=debug,tower_http=debug,info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config()?;
    if config.jwt.uses_default_secret() {
        tracing::warn!(
            "ROKADAN__JWT__SECRET no está configurado; usando el secreto de desarrollo"
        );
    }

    let pool = database::connect(&config.database).await?;
    tracing::info!("conexión a PostgreSQL exitosa");

    sqlx::migrate!().run(&pool).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("servidor escuchando en http://{addr}");

    let app = build_router(AppState::new(pool, config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    tracing::info!("señal de apagado recibida");
}
