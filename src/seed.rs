use chrono::NaiveDate;
use mongodb::bson::DateTime;

use crate::{
    models::movie::{Movie, MovieInput},
    store::{MovieFilter, MovieStore, StoreResult},
};

struct SeedMovie {
    title: &'static str,
    description: &'static str,
    rating: f64,
    released: (i32, u32, u32),
    duration: i32,
    genre: &'static [&'static str],
    poster_url: &'static str,
}

impl SeedMovie {
    fn to_movie(&self, now: DateTime) -> Movie {
        let (year, month, day) = self.released;
        let input = MovieInput {
            title: self.title.to_string(),
            description: self.description.to_string(),
            rating: self.rating,
            release_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
            duration: self.duration,
            genre: self.genre.iter().map(|g| g.to_string()).collect(),
            poster_url: Some(self.poster_url.to_string()),
        };
        Movie::from_input(input, now)
    }
}

const CATALOG: &[SeedMovie] = &[
    SeedMovie {
        title: "The Shawshank Redemption",
        description: "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.",
        rating: 9.3,
        released: (1994, 9, 23),
        duration: 142,
        genre: &["Drama"],
        poster_url: "https://m.media-amazon.com/images/M/MV5BMDFkYTc0MGEtZmNhMC00ZDIzLWFmNTEtODM1ZmRlYWMwMWFmXkEyXkFqcGdeQXVyMTMxODk2OTU@._V1_.jpg",
    },
    SeedMovie {
        title: "The Godfather",
        description: "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.",
        rating: 9.2,
        released: (1972, 3, 24),
        duration: 175,
        genre: &["Crime", "Drama"],
        poster_url: "https://m.media-amazon.com/images/M/MV5BM2MyNjYxNmUtYTAwNi00MTYxLWJmNWYtYzZlODY3ZTk3OTFlXkEyXkFqcGdeQXVyNzkwMjQ5NzM@._V1_.jpg",
    },
    SeedMovie {
        title: "The Godfather: Part II",
        description: "The early life and career of Vito Corleone in 1920s New York City is portrayed, while his son, Michael, expands and tightens his grip on the family crime syndicate.",
        rating: 9.0,
        released: (1974, 12, 20),
        duration: 202,
        genre: &["Crime", "Drama"],
        poster_url: "https://m.media-amazon.com/images/M/MV5BMWMwMGQzZTItY2JlNC00OWZiLWIyMDctNDk2ZDQ2YjRjMWQ0XkEyXkFqcGdeQXVyNzkwMjQ5NzM@._V1_.jpg",
    },
    SeedMovie {
        title: "The Dark Knight",
        description: "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham, Batman must accept one of the greatest psychological and physical tests.",
        rating: 9.0,
        released: (2008, 7, 18),
        duration: 152,
        genre: &["Action", "Crime", "Drama"],
        poster_url: "https://m.media-amazon.com/images/M/MV5BMTMxNTMwODM0NF5BMl5BanBnXkFtZTcwODAyMTk2Mw@@._V1_.jpg",
    },
    SeedMovie {
        title: "12 Angry Men",
        description: "A jury holdout attempts to prevent a miscarriage of justice by forcing his colleagues to reconsider the evidence.",
        rating: 9.0,
        released: (1957, 4, 10),
        duration: 96,
        genre: &["Crime", "Drama"],
        poster_url: "https://m.media-amazon.com/images/M/MV5BMWU4N2FjNzYtNTVkNC00NzQ0LTg0MjAtYTJlMjFhNGUxZDFmXkEyXkFqcGdeQXVyNjc1NTYyMjg@._V1_.jpg",
    },
    SeedMovie {
        title: "Schindler's List",
        description: "In German-occupied Poland during World War II, industrialist Oskar Schindler gradually becomes concerned for his Jewish workforce after witnessing their persecution.",
        rating: 8.9,
        released: (1993, 12, 15),
        duration: 195,
        genre: &["Biography", "Drama", "History"],
        poster_url: "https://m.media-amazon.com/images/M/MV5BNDE4OTMxMTctNmRhYy00NWE2LTg3YzItYTk3M2UwOTU5Njg4XkEyXkFqcGdeQXVyNjU0OTQ0OTY@._V1_.jpg",
    },
    SeedMovie {
        title: "Pulp Fiction",
        description: "The lives of two mob hitmen, a boxer, a gangster and his wife, and a pair of diner bandits intertwine in four tales of violence and redemption.",
        rating: 8.9,
        released: (1994, 10, 14),
        duration: 154,
        genre: &["Crime", "Drama"],
        poster_url: "https://m.media-amazon.com/images/M/MV5BNGNhMDIzZTUtNTBlZi00MTRlLWFjM2ItYzViMjE3YzI5MjljXkEyXkFqcGdeQXVyNzkwMjQ5NzM@._V1_.jpg",
    },
    SeedMovie {
        title: "The Lord of the Rings: The Return of the King",
        description: "Gandalf and Aragorn lead the World of Men against Sauron's army to draw his gaze from Frodo and Sam as they approach Mount Doom with the One Ring.",
        rating: 8.9,
        released: (2003, 12, 17),
        duration: 201,
        genre: &["Action", "Adventure", "Drama"],
        poster_url: "https://m.media-amazon.com/images/M/MV5BNzA5ZDNlZWMtM2NhNS00NDJjLTk4NDItYTRmY2EwMWZlMTY3XkEyXkFqcGdeQXVyNzkwMjQ5NzM@._V1_.jpg",
    },
    SeedMovie {
        title: "The Good, the Bad and the Ugly",
        description: "A bounty hunting scam joins two men in an uneasy alliance against a third in a race to find a fortune in gold buried in a remote cemetery.",
        rating: 8.8,
        released: (1966, 12, 23),
        duration: 161,
        genre: &["Western"],
        poster_url: "https://m.media-amazon.com/images/M/MV5BOTQ5NDI3MTI4MF5BMl5BanBnXkFtZTgwNDQ4ODE5MDE@._V1_.jpg",
    },
    SeedMovie {
        title: "Fight Club",
        description: "An insomniac office worker and a devil-may-care soapmaker form an underground fight club that evolves into something much, much more.",
        rating: 8.8,
        released: (1999, 10, 15),
        duration: 139,
        genre: &["Drama"],
        poster_url: "https://m.media-amazon.com/images/M/MV5BMjJmYTNkNmItYjYyZC00MGUxLWE3MjYtZGMzZWI1ZjhlOWJmXkEyXkFqcGdeQXVyNzkwMjQ5NzM@._V1_.jpg",
    },
];

/// Fills an empty catalog with the starter titles, upserting by title in
/// order. The first failed write aborts the rest. Returns how many titles
/// were written.
pub async fn seed_movies(store: &dyn MovieStore) -> StoreResult<usize> {
    let existing = store.count(&MovieFilter::All).await?;
    if existing > 0 {
        log::info!("Database already contains {} movies", existing);
        return Ok(0);
    }

    log::info!("Seeding {} movies", CATALOG.len());
    let now = DateTime::now();
    for seed in CATALOG {
        store.upsert_by_title(seed.to_movie(now)).await?;
        log::info!("Added movie: {}", seed.title);
    }
    log::info!("All movies have been processed");

    Ok(CATALOG.len())
}
