use actix_web::{web, HttpServer};
use env_logger::Env;
use log::{error, info};
use sloka_api::app::build_app;
use sloka_api::config::AppConfig;
use sloka_api::state::AppState;
use sloka_api::store::{Store, StoreSettings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // A long-running server cannot do anything useful without its store.
    let store = Store::new(StoreSettings::from(&config));
    if let Err(e) = store.connect().await {
        error!("Failed to connect to database: {}", e);
        std::process::exit(1);
    }

    let host = config.host.clone();
    let port = config.port;
    info!(
        "Server running at http://{}:{} ({:?} mode)",
        host, port, config.mode
    );

    let state = web::Data::new(AppState::new(config, store.clone()));

    // `run` resolves once SIGINT/SIGTERM has stopped the workers.
    HttpServer::new(move || build_app(state.clone()))
        .bind((host.as_str(), port))?
        .shutdown_timeout(10)
        .run()
        .await?;

    info!("Server stopped, closing database connection");
    if let Err(e) = store.close().await {
        error!("Error while closing database connection: {}", e);
    }
    Ok(())
}
