use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{FindOneAndReplaceOptions, FindOptions, IndexOptions, ReplaceOptions, ReturnDocument},
    Collection, Database, IndexModel,
};

use super::{MovieFilter, MovieStore, StoreResult, UserStore};
use crate::models::{
    movie::{Movie, SortField},
    user::{User, UserRole},
};

pub struct MongoMovieStore {
    movies: Collection<Movie>,
}

impl MongoMovieStore {
    pub fn new(db: &Database) -> Self {
        MongoMovieStore {
            movies: db.collection::<Movie>("movies"),
        }
    }

    pub async fn ensure_indexes(&self) -> mongodb::error::Result<()> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "rating": -1 }).build(),
            IndexModel::builder().keys(doc! { "releaseDate": -1 }).build(),
            IndexModel::builder().keys(doc! { "title": 1 }).build(),
        ];
        self.movies.create_indexes(indexes, None).await?;
        Ok(())
    }
}

fn filter_document(filter: &MovieFilter) -> Document {
    match filter {
        MovieFilter::All => Document::new(),
        MovieFilter::Text(query) => {
            // Literal substring, not a user-supplied pattern.
            let pattern = regex::escape(query);
            doc! {
                "$or": [
                    { "title": { "$regex": pattern.as_str(), "$options": "i" } },
                    { "description": { "$regex": pattern.as_str(), "$options": "i" } },
                ]
            }
        }
    }
}

fn sort_document(sort: SortField) -> Document {
    let mut order = Document::new();
    order.insert(sort.field_name(), if sort.descending() { -1 } else { 1 });
    order.insert("_id", 1);
    order
}

#[async_trait]
impl MovieStore for MongoMovieStore {
    async fn find_page(
        &self,
        filter: &MovieFilter,
        sort: SortField,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Movie>> {
        let options = FindOptions::builder()
            .sort(sort_document(sort))
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self.movies.find(filter_document(filter), options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, filter: &MovieFilter) -> StoreResult<u64> {
        Ok(self
            .movies
            .count_documents(filter_document(filter), None)
            .await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Movie>> {
        Ok(self.movies.find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert(&self, mut movie: Movie) -> StoreResult<Movie> {
        movie.id = None;
        let result = self.movies.insert_one(&movie, None).await?;
        movie.id = result.inserted_id.as_object_id();
        Ok(movie)
    }

    async fn replace(&self, id: ObjectId, mut movie: Movie) -> StoreResult<Option<Movie>> {
        movie.id = Some(id);
        let options = FindOneAndReplaceOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .movies
            .find_one_and_replace(doc! { "_id": id }, &movie, options)
            .await?)
    }

    async fn delete(&self, id: ObjectId) -> StoreResult<bool> {
        let result = self.movies.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn upsert_by_title(&self, mut movie: Movie) -> StoreResult<()> {
        movie.id = None;
        let options = ReplaceOptions::builder().upsert(true).build();
        self.movies
            .replace_one(doc! { "title": movie.title.as_str() }, &movie, options)
            .await?;
        Ok(())
    }
}

pub struct MongoUserStore {
    users: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        MongoUserStore {
            users: db.collection::<User>("users"),
        }
    }

    pub async fn ensure_indexes(&self) -> mongodb::error::Result<()> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users.create_index(unique_email, None).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }, None).await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_role(&self, role: UserRole) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .find_one(doc! { "role": role.as_str() }, None)
            .await?)
    }

    async fn insert(&self, mut user: User) -> StoreResult<User> {
        user.id = None;
        let result = self.users.insert_one(&user, None).await?;
        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }
}
