use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;

use crate::{
    error::{invalid_body, ApiResult},
    middleware::AdminUser,
    models::{
        movie::MovieInput,
        pagination::{PageQuery, SearchQuery, SortedQuery},
    },
    services::catalog::CatalogService,
};

#[get("")]
pub async fn list_movies(
    catalog: web::Data<CatalogService>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let page = catalog.list(query.page_request()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/search")]
pub async fn search_movies(
    catalog: web::Data<CatalogService>,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    let page = catalog
        .search(query.q.as_deref(), query.page_request())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/sorted")]
pub async fn sorted_movies(
    catalog: web::Data<CatalogService>,
    query: web::Query<SortedQuery>,
) -> ApiResult<HttpResponse> {
    let page = catalog
        .sorted(query.by.as_deref(), query.page_request())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/{id}")]
pub async fn get_movie(
    catalog: web::Data<CatalogService>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let movie = catalog.get(&id).await?;
    Ok(HttpResponse::Ok().json(movie))
}

/// Parsed inside the handler so the role check always settles first.
fn movie_payload(body: &web::Bytes) -> ApiResult<MovieInput> {
    serde_json::from_slice(body).map_err(|e| invalid_body("movie payload", &e))
}

#[post("")]
pub async fn create_movie(
    AdminUser(admin): AdminUser,
    catalog: web::Data<CatalogService>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    // Parse body
    let input = movie_payload(&body)?;

    let movie = catalog.create(input).await?;
    log::info!("{} added movie {} ({})", admin.email, movie.title, movie.id);
    Ok(HttpResponse::Created().json(movie))
}

#[put("/{id}")]
pub async fn update_movie(
    AdminUser(admin): AdminUser,
    catalog: web::Data<CatalogService>,
    id: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    // Parse body
    let input = movie_payload(&body)?;

    let movie = catalog.update(&id, input).await?;
    log::info!("{} updated movie {}", admin.email, movie.id);
    Ok(HttpResponse::Ok().json(movie))
}

#[delete("/{id}")]
pub async fn delete_movie(
    AdminUser(admin): AdminUser,
    catalog: web::Data<CatalogService>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    catalog.delete(&id).await?;
    log::info!("{} deleted movie {}", admin.email, id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Movie deleted successfully" })))
}
