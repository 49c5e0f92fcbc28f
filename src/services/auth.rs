use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::{ApiError, ApiResult},
    models::user::{
        normalize_email, AuthResponse, CreateUserDto, LoginDto, User, UserProfile, UserRole,
    },
    store::UserStore,
};

pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Hex id of the user the token was issued to.
    pub sub: String,
    pub iat: i64,
    pub exp: usize,
}

/// Credential checks and bearer-token issuance over a [`UserStore`].
pub struct AuthService {
    users: Arc<dyn UserStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: &str, hash_cost: u32) -> Self {
        AuthService {
            users,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            hash_cost,
        }
    }

    pub async fn login(&self, credentials: &LoginDto) -> ApiResult<AuthResponse> {
        // Validate input
        credentials.validate()?;

        // Find user
        let email = normalize_email(&credentials.email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        // Check password
        if !verify(&credentials.password, &user.password).unwrap_or(false) {
            log::info!("Rejected login for {}", email);
            return Err(invalid_credentials());
        }

        self.session_for(&user)
    }

    pub async fn register(&self, data: &CreateUserDto) -> ApiResult<AuthResponse> {
        // Validate input
        data.validate()?;

        // Check if user exists
        let email = normalize_email(&data.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::BadRequest("Email already exists".into()));
        }

        let user = self
            .create_user(data.name.trim(), &email, &data.password, UserRole::User)
            .await?;
        log::info!("Registered user {}", user.email);

        self.session_for(&user)
    }

    /// Resolves a bearer token to the user it was issued for. The user is
    /// re-read from the store so role changes apply to live tokens.
    pub async fn identify(&self, token: &str) -> ApiResult<UserProfile> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".into()))?
            .claims;

        // Load user
        let user_id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".into()))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("User no longer exists".into()))?;

        Ok(UserProfile::from(&user))
    }

    pub async fn authorize(&self, token: &str, required: UserRole) -> ApiResult<UserProfile> {
        let user = self.identify(token).await?;
        if user.role.grants(required) {
            Ok(user)
        } else {
            Err(ApiError::Forbidden(format!(
                "{} access required",
                capitalize(required.as_str())
            )))
        }
    }

    /// Creates an admin unless one already exists. Returns whether a user was created.
    pub async fn ensure_admin(&self, name: &str, email: &str, password: &str) -> ApiResult<bool> {
        if self.users.find_by_role(UserRole::Admin).await?.is_some() {
            log::info!("Admin user already exists");
            return Ok(false);
        }

        let email = normalize_email(email);
        let admin = self
            .create_user(name, &email, password, UserRole::Admin)
            .await?;
        log::info!("Created admin user {}", admin.email);
        Ok(true)
    }

    pub fn issue_token(&self, user_id: ObjectId) -> ApiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_hex(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {}", e)))
    }

    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> ApiResult<User> {
        // Hash password
        let hashed_password = hash(password, self.hash_cost)
            .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))?;

        let now = DateTime::now();
        let user = User {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
            password: hashed_password,
            role,
            created_at: now,
            updated_at: now,
        };

        Ok(self.users.insert(user).await?)
    }

    fn session_for(&self, user: &User) -> ApiResult<AuthResponse> {
        let user_id = user
            .id
            .ok_or_else(|| ApiError::Internal("stored user has no id".into()))?;

        Ok(AuthResponse {
            token: self.issue_token(user_id)?,
            user: UserProfile::from(user),
        })
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".into())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
