//! Shared fixtures for unit and HTTP tests.

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;

use crate::{
    models::{
        movie::MovieInput,
        user::{CreateUserDto, LoginDto, User, UserProfile, UserRole},
    },
    services::{auth::AuthService, catalog::CatalogService},
    store::{memory::MemoryStore, StoreResult, UserStore},
};

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const USER_EMAIL: &str = "viewer@example.com";
pub const USER_PASSWORD: &str = "viewer123";

/// Low bcrypt cost keeps hashing out of the test runtime.
const TEST_HASH_COST: u32 = 4;

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub auth: web::Data<AuthService>,
    pub catalog: web::Data<CatalogService>,
    pub admin: UserProfile,
}

impl TestContext {
    /// Fresh in-memory store with one seeded admin.
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_users(store.clone(), store).await
    }

    /// Like [`TestContext::new`], but every user lookup suspends once before
    /// answering, the way a networked store does.
    pub async fn with_yielding_users() -> Self {
        let store = Arc::new(MemoryStore::new());
        let users = Arc::new(YieldingUsers(store.clone()));
        Self::with_users(store, users).await
    }

    async fn with_users(store: Arc<MemoryStore>, users: Arc<dyn UserStore>) -> Self {
        let auth = web::Data::new(AuthService::new(users, TEST_SECRET, TEST_HASH_COST));
        let catalog = web::Data::new(CatalogService::new(store.clone()));

        auth.ensure_admin("Admin User", ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("admin seeding");
        let admin = auth
            .login(&LoginDto {
                email: ADMIN_EMAIL.into(),
                password: ADMIN_PASSWORD.into(),
            })
            .await
            .expect("admin login")
            .user;

        TestContext {
            store,
            auth,
            catalog,
            admin,
        }
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Registers the plain viewer account on first use.
    pub async fn user_token(&self) -> String {
        let data = CreateUserDto {
            name: "Viewer".into(),
            email: USER_EMAIL.into(),
            password: USER_PASSWORD.into(),
        };
        match self.auth.register(&data).await {
            Ok(session) => session.token,
            Err(_) => self.login(USER_EMAIL, USER_PASSWORD).await,
        }
    }

    async fn login(&self, email: &str, password: &str) -> String {
        self.auth
            .login(&LoginDto {
                email: email.into(),
                password: password.into(),
            })
            .await
            .expect("login")
            .token
    }
}

/// Delegates to the memory store after yielding to the executor.
pub struct YieldingUsers(Arc<MemoryStore>);

#[async_trait]
impl UserStore for YieldingUsers {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        tokio::task::yield_now().await;
        self.0.find_by_email(email).await
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        tokio::task::yield_now().await;
        UserStore::find_by_id(self.0.as_ref(), id).await
    }

    async fn find_by_role(&self, role: UserRole) -> StoreResult<Option<User>> {
        tokio::task::yield_now().await;
        self.0.find_by_role(role).await
    }

    async fn insert(&self, user: User) -> StoreResult<User> {
        tokio::task::yield_now().await;
        UserStore::insert(self.0.as_ref(), user).await
    }
}

pub fn movie_input(title: &str) -> MovieInput {
    MovieInput {
        title: title.to_string(),
        description: format!("{} is a film.", title),
        rating: 8.0,
        release_date: NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"),
        duration: 120,
        genre: vec!["Drama".into()],
        poster_url: None,
    }
}
