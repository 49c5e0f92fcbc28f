use std::sync::Arc;

use mongodb::bson::{oid::ObjectId, DateTime};
use validator::Validate;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        movie::{Movie, MovieInput, MovieResponse, SortField},
        pagination::{MoviePage, PageRequest, Pagination},
    },
    store::{MovieFilter, MovieStore},
};

pub struct CatalogService {
    movies: Arc<dyn MovieStore>,
}

impl CatalogService {
    pub fn new(movies: Arc<dyn MovieStore>) -> Self {
        CatalogService { movies }
    }

    /// Default browse view: best rated first.
    pub async fn list(&self, page: PageRequest) -> ApiResult<MoviePage> {
        self.query(MovieFilter::All, SortField::Rating, page).await
    }

    pub async fn sorted(&self, by: Option<&str>, page: PageRequest) -> ApiResult<MoviePage> {
        self.query(MovieFilter::All, SortField::parse_or_default(by), page)
            .await
    }

    pub async fn search(&self, query: Option<&str>, page: PageRequest) -> ApiResult<MoviePage> {
        let query = query
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Search query is required".into()))?;

        self.query(MovieFilter::Text(query.to_string()), SortField::Rating, page)
            .await
    }

    pub async fn get(&self, id: &str) -> ApiResult<MovieResponse> {
        let id = parse_movie_id(id)?;
        self.movies
            .find_by_id(id)
            .await?
            .map(MovieResponse::from)
            .ok_or_else(movie_not_found)
    }

    pub async fn create(&self, input: MovieInput) -> ApiResult<MovieResponse> {
        // Validate input
        let input = input.normalized();
        input.validate()?;

        // Save movie
        let movie = self
            .movies
            .insert(Movie::from_input(input, DateTime::now()))
            .await?;
        Ok(MovieResponse::from(movie))
    }

    /// The payload is validated before the id is looked up, so an absent id
    /// with an invalid body reports the validation error.
    pub async fn update(&self, id: &str, input: MovieInput) -> ApiResult<MovieResponse> {
        let id = parse_movie_id(id)?;

        // Validate input
        let input = input.normalized();
        input.validate()?;

        // Find existing movie
        let existing = self
            .movies
            .find_by_id(id)
            .await?
            .ok_or_else(movie_not_found)?;

        // Last write wins; a delete between the read and the replace surfaces as 404.
        self.movies
            .replace(id, existing.replace_fields(input, DateTime::now()))
            .await?
            .map(MovieResponse::from)
            .ok_or_else(movie_not_found)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let id = parse_movie_id(id)?;
        if self.movies.delete(id).await? {
            Ok(())
        } else {
            Err(movie_not_found())
        }
    }

    async fn query(
        &self,
        filter: MovieFilter,
        sort: SortField,
        page: PageRequest,
    ) -> ApiResult<MoviePage> {
        let total_items = self.movies.count(&filter).await?;
        let movies = self
            .movies
            .find_page(&filter, sort, page.skip(), page.limit)
            .await?;

        Ok(MoviePage {
            movies: movies.into_iter().map(MovieResponse::from).collect(),
            pagination: Pagination::new(page, total_items),
        })
    }
}

/// Malformed ids cannot name a stored movie, so they are reported as missing.
fn parse_movie_id(id: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| movie_not_found())
}

fn movie_not_found() -> ApiError {
    ApiError::NotFound("Movie not found".into())
}
