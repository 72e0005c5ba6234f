use std::env;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::{Config, Environment, File};
use dotenvy::dotenv;
use env_logger::Env;

use pushkind_directory::client::{DirectoryClient, LocalFallback};
use pushkind_directory::db::{establish_connection_pool, run_migrations};
use pushkind_directory::models::config::ServerConfig;
use pushkind_directory::repository::DieselRepository;
use pushkind_directory::routes::configure;
use pushkind_directory::sample::{SampleDirectory, seed_store};

/// Reads `config/default.yaml`, then `config/{APP_ENV}.yaml` when present,
/// then `APP_*` variables (`APP_CONTENT_API__BASE_URL` for nested keys).
fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let server_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    let sample = match SampleDirectory::load() {
        Ok(sample) => sample,
        Err(e) => {
            log::error!("Failed to build sample directory: {e}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);
    if server_config.seed_sample_data {
        if let Err(e) = seed_store(&repo, &sample) {
            log::error!("Failed to seed sample data: {e}");
            std::process::exit(1);
        }
    }

    let fallback = LocalFallback::new(sample, server_config.default_page_size);
    let client = match DirectoryClient::from_config(&server_config.content_api, fallback) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build content client: {e}");
            std::process::exit(1);
        }
    };

    let bind_address = (server_config.bind_address.clone(), server_config.port);
    log::info!(
        "Starting server on {}:{}",
        server_config.bind_address,
        server_config.port
    );

    let repo = web::Data::new(repo);
    let client = web::Data::new(client);
    let server_config = web::Data::new(server_config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(repo.clone())
            .app_data(client.clone())
            .app_data(server_config.clone())
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
