mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod seed;
mod services;
mod store;
#[cfg(test)]
mod testing;

use std::{io, sync::Arc};

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

use config::Settings;
use services::{auth::AuthService, catalog::CatalogService};
use store::mongo::{MongoMovieStore, MongoUserStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let database = config::init_database(&settings)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let movies = Arc::new(MongoMovieStore::new(&database));
    let users = Arc::new(MongoUserStore::new(&database));
    if let Err(e) = movies.ensure_indexes().await {
        log::error!("Failed to create movie indexes: {}", e);
    }
    if let Err(e) = users.ensure_indexes().await {
        log::error!("Failed to create user indexes: {}", e);
    }

    let auth = web::Data::new(AuthService::new(
        users.clone(),
        &settings.jwt_secret,
        settings.bcrypt_cost,
    ));
    let catalog = web::Data::new(CatalogService::new(movies.clone()));

    if let Some(admin) = &settings.admin {
        if let Err(e) = auth
            .ensure_admin(&admin.name, &admin.email, &admin.password)
            .await
        {
            log::error!("Admin creation error: {}", e);
        }
    }

    if settings.seed_movies {
        if let Err(e) = seed::seed_movies(movies.as_ref()).await {
            log::error!("Movie seeding stopped: {}", e);
        }
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(settings.rate_limit_per_second)
        .burst_size(settings.rate_limit_burst)
        .finish()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "rate limit settings must be greater than zero",
            )
        })?;

    let frontend_url = settings.frontend_url.clone();
    log::info!("Server running on {}:{}", settings.host, settings.port);

    HttpServer::new(move || {
        let cors = match &frontend_url {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        }
        .allow_any_method()
        .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(Governor::new(&governor_conf))
            .app_data(auth.clone())
            .app_data(catalog.clone())
            .configure(handlers::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
