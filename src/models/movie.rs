use chrono::{NaiveDate, NaiveTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub rating: f64,
    pub release_date: DateTime,
    pub duration: i32,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub poster_url: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Movie {
    pub fn from_input(input: MovieInput, now: DateTime) -> Self {
        Movie {
            id: None,
            title: input.title,
            description: input.description,
            rating: input.rating,
            release_date: date_to_bson(input.release_date),
            duration: input.duration,
            genre: input.genre,
            poster_url: input.poster_url.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field, keeping identity and `created_at`.
    pub fn replace_fields(self, input: MovieInput, now: DateTime) -> Self {
        Movie {
            id: self.id,
            created_at: self.created_at,
            ..Movie::from_input(input, now)
        }
    }
}

/// Write payload for create and update.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10"))]
    pub rating: f64,
    #[serde(deserialize_with = "deserialize_release_date")]
    pub release_date: NaiveDate,
    #[validate(range(min = 1, message = "Duration must be greater than 0"))]
    pub duration: i32,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl MovieInput {
    /// Trims text fields and reduces `genre` to distinct, non-blank tags in
    /// their original order.
    pub fn normalized(self) -> Self {
        let MovieInput {
            title,
            description,
            rating,
            release_date,
            duration,
            genre: tags,
            poster_url,
        } = self;

        let mut genre: Vec<String> = Vec::with_capacity(tags.len());
        for tag in &tags {
            let tag = tag.trim();
            if !tag.is_empty() && !genre.iter().any(|g| g == tag) {
                genre.push(tag.to_string());
            }
        }

        MovieInput {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            rating,
            release_date,
            duration,
            genre,
            poster_url: poster_url.map(|url| url.trim().to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub rating: f64,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub genre: Vec<String>,
    pub poster_url: String,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        MovieResponse {
            id: movie.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: movie.title,
            description: movie.description,
            rating: movie.rating,
            release_date: bson_to_utc(movie.release_date).date_naive(),
            duration: movie.duration,
            genre: movie.genre,
            poster_url: movie.poster_url,
            created_at: bson_to_utc(movie.created_at),
            updated_at: bson_to_utc(movie.updated_at),
        }
    }
}

/// Fields the catalog can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Rating,
    ReleaseDate,
    Duration,
}

impl SortField {
    /// Unknown or missing values fall back to `Rating`.
    pub fn parse_or_default(by: Option<&str>) -> Self {
        match by {
            Some("title") => SortField::Title,
            Some("releaseDate") => SortField::ReleaseDate,
            Some("duration") => SortField::Duration,
            _ => SortField::Rating,
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Rating => "rating",
            SortField::ReleaseDate => "releaseDate",
            SortField::Duration => "duration",
        }
    }

    /// Best ratings first; every other field in natural order.
    pub fn descending(&self) -> bool {
        matches!(self, SortField::Rating)
    }
}

pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

fn deserialize_release_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_release_date(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid release date `{}`", raw)))
}

pub fn date_to_bson(date: NaiveDate) -> DateTime {
    DateTime::from_millis(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}

fn bson_to_utc(dt: DateTime) -> chrono::DateTime<Utc> {
    chrono::DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}
