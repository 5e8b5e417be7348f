use reqwest::{Client, redirect::Policy};
use rokadan::{AppState, Config, build_router, database, services::jwt};
use secrecy::ExposeSecret;

/// HTTP test application wrapper
///
/// Spawns the real router on a random port so each test drives the API over
/// HTTP, like the deployed service. The pool is created lazily and never
/// connects: these tests only cover routes that are answered before any
/// database work (validation failures, auth gates, health, 404s).
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    /// HTTP client for making requests
    pub client: Client,
    /// Application config the server was started with
    pub config: Config,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::default();

        let pool = database::connect_lazy(&config.database).expect("failed to build lazy pool");
        let app = build_router(AppState::new(pool, config.clone()));

        // Port 0 tells the OS to assign an available port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server time to start
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to create HTTP client");

        Self {
            address,
            client,
            config,
        }
    }

    /// Full URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Mints a token signed with the server's secret.
    pub fn token(&self, id: i32, email: &str, es_admin: bool) -> String {
        jwt::generate_token(
            id,
            email,
            es_admin,
            self.config.jwt.secret.expose_secret(),
            1,
        )
        .expect("failed to mint test token")
    }

    /// A token signed with the right secret but already expired.
    pub fn token_expirado(&self, id: i32, email: &str) -> String {
        jwt::generate_token(
            id,
            email,
            false,
            self.config.jwt.secret.expose_secret(),
            -2,
        )
        .expect("failed to mint test token")
    }
}
