use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    web, HttpRequest,
};

use crate::error::{invalid_body, ApiError};

pub mod auth;
pub mod health;
pub mod movies;

/// Mounts every route under `/api`. Shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(
            web::scope("/api")
                .service(health::health)
                .service(
                    web::scope("/auth")
                        .service(auth::login)
                        .service(auth::register)
                        .service(auth::me),
                )
                .service(
                    // Fixed paths must be registered ahead of `/{id}`.
                    web::scope("/movies")
                        .service(movies::search_movies)
                        .service(movies::sorted_movies)
                        .service(movies::list_movies)
                        .service(movies::create_movie)
                        .service(movies::get_movie)
                        .service(movies::update_movie)
                        .service(movies::delete_movie),
                ),
        );
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::Deserialize(e) => invalid_body("request body", &e).into(),
        other => ApiError::Validation(other.to_string()).into(),
    }
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = match err {
        QueryPayloadError::Deserialize(e) => e.to_string(),
        other => other.to_string(),
    };
    ApiError::BadRequest(format!("Invalid query parameters: {}", detail)).into()
}
