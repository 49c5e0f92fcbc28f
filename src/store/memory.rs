use std::cmp::Ordering;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{MovieFilter, MovieStore, StoreResult, UserStore};
use crate::models::{
    movie::{Movie, SortField},
    user::{User, UserRole},
};

/// Vec-backed store mirroring the Mongo query semantics.
#[derive(Default)]
pub struct MemoryStore {
    movies: RwLock<Vec<Movie>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes a stored user's role in place. Returns whether the user exists.
    pub async fn set_role(&self, id: ObjectId, role: UserRole) -> bool {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|user| user.id == Some(id)) {
            Some(user) => {
                user.role = role;
                true
            }
            None => false,
        }
    }

    pub async fn remove_user(&self, id: ObjectId) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|user| user.id != Some(id));
        users.len() != before
    }
}

fn matches(filter: &MovieFilter, movie: &Movie) -> bool {
    match filter {
        MovieFilter::All => true,
        MovieFilter::Text(query) => {
            let needle = query.to_lowercase();
            movie.title.to_lowercase().contains(&needle)
                || movie.description.to_lowercase().contains(&needle)
        }
    }
}

fn compare(sort: SortField, a: &Movie, b: &Movie) -> Ordering {
    match sort {
        SortField::Title => a.title.cmp(&b.title),
        SortField::Rating => b.rating.total_cmp(&a.rating),
        SortField::ReleaseDate => a.release_date.cmp(&b.release_date),
        SortField::Duration => a.duration.cmp(&b.duration),
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn find_page(
        &self,
        filter: &MovieFilter,
        sort: SortField,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Movie>> {
        let movies = self.movies.read().await;
        let mut matching: Vec<Movie> = movies
            .iter()
            .filter(|movie| matches(filter, movie))
            .cloned()
            .collect();
        // Stable, so equal keys stay in insertion order.
        matching.sort_by(|a, b| compare(sort, a, b));

        Ok(matching
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: &MovieFilter) -> StoreResult<u64> {
        let movies = self.movies.read().await;
        Ok(movies.iter().filter(|movie| matches(filter, movie)).count() as u64)
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|movie| movie.id == Some(id)).cloned())
    }

    async fn insert(&self, mut movie: Movie) -> StoreResult<Movie> {
        movie.id = Some(ObjectId::new());
        self.movies.write().await.push(movie.clone());
        Ok(movie)
    }

    async fn replace(&self, id: ObjectId, mut movie: Movie) -> StoreResult<Option<Movie>> {
        let mut movies = self.movies.write().await;
        match movies.iter_mut().find(|existing| existing.id == Some(id)) {
            Some(slot) => {
                movie.id = Some(id);
                *slot = movie.clone();
                Ok(Some(movie))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: ObjectId) -> StoreResult<bool> {
        let mut movies = self.movies.write().await;
        let before = movies.len();
        movies.retain(|movie| movie.id != Some(id));
        Ok(movies.len() != before)
    }

    async fn upsert_by_title(&self, mut movie: Movie) -> StoreResult<()> {
        let mut movies = self.movies.write().await;
        match movies.iter_mut().find(|existing| existing.title == movie.title) {
            Some(slot) => {
                movie.id = slot.id;
                *slot = movie;
            }
            None => {
                movie.id = Some(ObjectId::new());
                movies.push(movie);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.id == Some(id)).cloned())
    }

    async fn find_by_role(&self, role: UserRole) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.role == role).cloned())
    }

    async fn insert(&self, mut user: User) -> StoreResult<User> {
        user.id = Some(ObjectId::new());
        self.users.write().await.push(user.clone());
        Ok(user)
    }
}
