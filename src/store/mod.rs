//! Storage seams for the catalog and credential collections.
//!
//! Services only see these traits; `mongo` backs them in production and
//! `memory` stands in during tests.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{
    movie::{Movie, SortField},
    user::{User, UserRole},
};

#[cfg(test)]
pub mod memory;
pub mod mongo;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Which movies a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieFilter {
    All,
    /// Case-insensitive substring of title or description.
    Text(String),
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    /// One page of matching movies ordered by `sort`, ties broken by insertion order.
    async fn find_page(
        &self,
        filter: &MovieFilter,
        sort: SortField,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Movie>>;

    async fn count(&self, filter: &MovieFilter) -> StoreResult<u64>;

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Movie>>;

    /// Stores a new movie and returns it with its assigned id.
    async fn insert(&self, movie: Movie) -> StoreResult<Movie>;

    /// Returns `None` when no movie has this id.
    async fn replace(&self, id: ObjectId, movie: Movie) -> StoreResult<Option<Movie>>;

    /// Returns whether a movie was removed.
    async fn delete(&self, id: ObjectId) -> StoreResult<bool>;

    /// Inserts the movie, or overwrites the one that already has its title.
    async fn upsert_by_title(&self, movie: Movie) -> StoreResult<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<User>>;

    async fn find_by_role(&self, role: UserRole) -> StoreResult<Option<User>>;

    async fn insert(&self, user: User) -> StoreResult<User>;
}
