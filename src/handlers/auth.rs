use actix_web::{get, post, web, HttpResponse};

use crate::{
    error::ApiResult,
    middleware::AuthenticatedUser,
    models::user::{CreateUserDto, LoginDto},
    services::auth::AuthService,
};

#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    user_data: web::Json<CreateUserDto>,
) -> ApiResult<HttpResponse> {
    let session = auth.register(&user_data).await?;
    Ok(HttpResponse::Created().json(session))
}

#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginDto>,
) -> ApiResult<HttpResponse> {
    let session = auth.login(&login_data).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[get("/me")]
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(user)
}
