use std::sync::Arc;

use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use voicedash_backend::api::{AuthApi, ConversationsApi, HealthApi, UsageApi, UsersApi};
use voicedash_backend::config::{init_logging, DatabaseConnections, SecretManager, Settings};
use voicedash_backend::providers::LogMailer;
use voicedash_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let settings = Settings::from_env().expect("Failed to load settings");
    let secrets = SecretManager::init().expect("Failed to load secrets");

    let connections = DatabaseConnections::connect(&settings)
        .await
        .expect("Failed to connect to databases");
    connections
        .migrate()
        .await
        .expect("Failed to run migrations");

    let app_data = Arc::new(AppData::init(
        settings,
        &secrets,
        connections,
        Arc::new(LogMailer),
    ));
    app_data
        .bootstrap_admin()
        .await
        .expect("Failed to bootstrap admin account");

    let apis = (
        HealthApi,
        AuthApi::new(
            app_data.auth_service.clone(),
            app_data.token_provider.clone(),
        ),
        UsersApi::new(
            app_data.directory_service.clone(),
            app_data.token_provider.clone(),
        ),
        UsageApi::new(
            app_data.usage_service.clone(),
            app_data.token_provider.clone(),
        ),
        ConversationsApi::new(
            app_data.conversation_service.clone(),
            app_data.token_provider.clone(),
        ),
    );

    let bind_addr = format!("{}:{}", app_data.settings.host, app_data.settings.port);
    let api_service = OpenApiService::new(apis, "VoiceDash API", env!("CARGO_PKG_VERSION"))
        .server(format!("http://{}/api", bind_addr));
    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!("Starting server on http://{}", bind_addr);

    Server::new(TcpListener::bind(bind_addr)).run(app).await
}
