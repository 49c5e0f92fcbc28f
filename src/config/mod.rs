use mongodb::{bson::doc, Client, Database};
use std::env;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: Option<String>,
    pub bcrypt_cost: u32,
    pub seed_movies: bool,
    pub admin: Option<AdminSeed>,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let admin = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: var("ADMIN_NAME").unwrap_or_else(|| "Admin User".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Settings {
            mongodb_uri: var("MONGODB_URI")
                .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            database_name: var("DATABASE_NAME").unwrap_or_else(|| "movie-app".to_string()),
            jwt_secret,
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or("PORT", var("PORT"), 5000)?,
            frontend_url: var("FRONTEND_URL"),
            bcrypt_cost: parse_or("BCRYPT_COST", var("BCRYPT_COST"), bcrypt::DEFAULT_COST)?,
            seed_movies: parse_flag("SEED_MOVIES", var("SEED_MOVIES"), true)?,
            admin,
            rate_limit_per_second: parse_or(
                "RATE_LIMIT_PER_SECOND",
                var("RATE_LIMIT_PER_SECOND"),
                1,
            )?,
            rate_limit_burst: parse_or("RATE_LIMIT_BURST", var("RATE_LIMIT_BURST"), 60)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_flag(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let normalized = raw.as_deref().map(|v| v.trim().to_ascii_lowercase());
    match normalized {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::Invalid {
            key,
            value: raw.unwrap_or_default(),
        }),
    }
}

pub async fn init_database(settings: &Settings) -> mongodb::error::Result<Database> {
    log::info!("Connecting to MongoDB database: {}", settings.database_name);

    let client = Client::with_uri_str(&settings.mongodb_uri).await?;
    let db = client.database(&settings.database_name);

    // The driver connects lazily; ping so a bad URI fails at startup.
    match db.run_command(doc! { "ping": 1 }, None).await {
        Ok(_) => log::info!("Successfully connected to MongoDB"),
        Err(e) => {
            log::error!("Failed to reach MongoDB: {}", e);
            return Err(e);
        }
    }

    Ok(db)
}
