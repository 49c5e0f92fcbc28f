use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::{
    error::ApiError,
    models::user::{UserProfile, UserRole},
    services::auth::AuthService,
};

/// Any caller holding a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserProfile);

/// A caller whose current role is `admin`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserProfile);

pub fn bearer_token(req: &HttpRequest) -> Result<String, ApiError> {
    let auth_str = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_header| auth_header.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("No valid authorization header found".into()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })
}

fn resolve(
    req: &HttpRequest,
    required: UserRole,
) -> LocalBoxFuture<'static, Result<UserProfile, ApiError>> {
    // Extract token
    let token = bearer_token(req);
    let auth = req.app_data::<web::Data<AuthService>>().cloned();

    Box::pin(async move {
        let auth =
            auth.ok_or_else(|| ApiError::Internal("auth service is not registered".into()))?;
        auth.authorize(&token?, required).await
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = resolve(req, UserRole::User);
        Box::pin(async move { user.await.map(AuthenticatedUser) })
    }
}

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = resolve(req, UserRole::Admin);
        Box::pin(async move { user.await.map(AdminUser) })
    }
}
