use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use trek_api::{
    config::{AppConfig, StoreBackend},
    db::{self, DocumentStore, MemoryDocumentStore, MongoDocumentStore},
    routes,
    state::AppState,
};

fn io_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = AppConfig::from_env().map_err(io_error)?;

    let store: Arc<dyn DocumentStore> = match &config.store {
        StoreBackend::Mongo { uri, database } => {
            let client = db::mongo::create_mongo_client(uri)
                .await
                .map_err(io_error)?;
            log::info!("Using MongoDB database {}", database);
            Arc::new(MongoDocumentStore::new(client, database))
        }
        StoreBackend::Memory => {
            log::warn!("Using the in-memory document store; data is lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let state = web::Data::new(
        AppState::new(store, config.resolution.clone())
            .with_admin_emails(config.admin_emails.clone()),
    );
    let jwt_secret = config.jwt_secret.clone();

    log::info!("Attempting to bind to {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .expose_headers(vec![actix_web::http::header::LOCATION])
                    .max_age(3600),
            )
            .app_data(state.clone())
            .configure(|cfg| routes::configure(cfg, &jwt_secret))
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await
}
