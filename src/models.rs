//! Data structures and types for MovieTUI
//!
//! Contains all shared models used across the application organized by domain:
//! - **Catalog**: TMDB movie summaries, pages and discover filters
//! - **Detail**: full movie records, genres and trailers
//! - **Results**: partial-success batches for per-item lookups

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Catalog Models (TMDB lists)
// =============================================================================

/// Movie as returned by list endpoints (discover, search, trending)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f32>,
}

impl MovieSummary {
    /// Release year parsed from the release date
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }
}

impl fmt::Display for MovieSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{}", self.title, year_str)
    }
}

/// One page of a paginated list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub results: Vec<MovieSummary>,
    pub page: u32,
    pub total_pages: u32,
}

impl MoviePage {
    /// Whether the service reports more pages after this one
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Query mode; each keeps independent pagination state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Filter-driven listing without free-text query
    Discover,
    /// Free-text title search
    Search,
    /// Trending this week
    Trending,
}

impl QueryMode {
    pub const ALL: [QueryMode; 3] = [QueryMode::Discover, QueryMode::Search, QueryMode::Trending];
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Discover => write!(f, "discover"),
            QueryMode::Search => write!(f, "search"),
            QueryMode::Trending => write!(f, "trending"),
        }
    }
}

/// Filters applied to the discover listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoverFilters {
    /// TMDB genre id
    pub genre: Option<u32>,
    /// Primary release year
    pub year: Option<u16>,
    /// Minimum vote average (0-10)
    pub min_rating: Option<f32>,
}

impl DiscoverFilters {
    pub fn is_empty(&self) -> bool {
        self.genre.is_none() && self.year.is_none() && self.min_rating.is_none()
    }
}

// =============================================================================
// Detail Models
// =============================================================================

/// Genre from the TMDB taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Detailed movie information from TMDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f32>,
    pub overview: String,
    pub runtime: Option<u32>,
    pub genres: Vec<Genre>,
}

impl MovieDetail {
    /// Project back onto the list representation
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            release_date: self.release_date.clone(),
            vote_average: self.vote_average,
        }
    }

    /// Comma separated genre names in TMDB order
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Public TMDB page for this movie
    pub fn tmdb_url(&self) -> String {
        format!("https://www.themoviedb.org/movie/{}", self.id)
    }
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release = self.release_date.as_deref().unwrap_or("unknown");
        write!(f, "{} ({})", self.title, release)?;
        if let Some(runtime) = self.runtime {
            write!(f, " - {}h {}m", runtime / 60, runtime % 60)?;
        }
        if let Some(rating) = self.vote_average {
            write!(f, " - ⭐ {:.1}", rating)?;
        }
        Ok(())
    }
}

/// Video entry attached to a movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Trailer {
    /// Only YouTube-hosted entries of type "Trailer" are shown
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && self.kind == "Trailer"
    }

    pub fn youtube_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

/// First qualifying trailer in response order
pub fn select_trailer(videos: &[Trailer]) -> Option<&Trailer> {
    videos.iter().find(|v| v.is_youtube_trailer())
}

// =============================================================================
// Partial Results
// =============================================================================

/// A lookup that failed inside a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedLookup {
    pub id: u64,
    pub reason: String,
}

/// Batch outcome where individual failures do not fail the whole batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialResults<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<FailedLookup>,
}

impl<T> Default for PartialResults<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> PartialResults<T> {
    pub fn is_degraded(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trailer(site: &str, kind: &str, key: &str) -> Trailer {
        Trailer {
            key: key.into(),
            name: format!("{} {}", site, kind),
            site: site.into(),
            kind: kind.into(),
        }
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2022-03-04"), Some(2022));
        assert_eq!(extract_year("1999"), Some(1999));
        assert_eq!(extract_year(""), None);
        assert_eq!(extract_year("abc"), None);
    }

    #[test]
    fn test_select_trailer_skips_other_sites() {
        let videos = vec![
            trailer("Vimeo", "Trailer", "vim"),
            trailer("YouTube", "Trailer", "abc"),
        ];
        assert_eq!(select_trailer(&videos).map(|t| t.key.as_str()), Some("abc"));
    }

    #[test]
    fn test_select_trailer_first_match_wins() {
        let videos = vec![
            trailer("YouTube", "Teaser", "tease"),
            trailer("YouTube", "Trailer", "first"),
            trailer("YouTube", "Trailer", "second"),
        ];
        assert_eq!(select_trailer(&videos).map(|t| t.key.as_str()), Some("first"));
    }

    #[test]
    fn test_select_trailer_none() {
        let videos = vec![trailer("YouTube", "Featurette", "x")];
        assert!(select_trailer(&videos).is_none());
        assert!(select_trailer(&[]).is_none());
    }

    #[test]
    fn test_trailer_deserializes_type_field() {
        let json = r#"{"key":"abc","name":"Official","site":"YouTube","type":"Trailer"}"#;
        let t: Trailer = serde_json::from_str(json).unwrap();
        assert!(t.is_youtube_trailer());
        assert_eq!(t.youtube_url(), "https://www.youtube.com/watch?v=abc");
    }

    #[test]
    fn test_movie_page_has_more() {
        let page = MoviePage {
            results: vec![],
            page: 1,
            total_pages: 5,
        };
        assert!(page.has_more());

        let last = MoviePage {
            results: vec![],
            page: 5,
            total_pages: 5,
        };
        assert!(!last.has_more());
    }

    #[test]
    fn test_detail_summary_and_genres() {
        let detail = MovieDetail {
            id: 42,
            title: "Dune".into(),
            poster_path: None,
            release_date: Some("2021-09-15".into()),
            vote_average: Some(7.8),
            overview: "Spice".into(),
            runtime: Some(155),
            genres: vec![
                Genre { id: 878, name: "Science Fiction".into() },
                Genre { id: 12, name: "Adventure".into() },
            ],
        };

        assert_eq!(detail.genre_names(), "Science Fiction, Adventure");
        assert_eq!(detail.summary().id, 42);
        assert_eq!(detail.summary().year(), Some(2021));
        assert_eq!(detail.tmdb_url(), "https://www.themoviedb.org/movie/42");
        assert_eq!(detail.to_string(), "Dune (2021-09-15) - 2h 35m - ⭐ 7.8");
    }

    #[test]
    fn test_summary_display() {
        let movie = MovieSummary {
            id: 1,
            title: "Alien".into(),
            poster_path: None,
            release_date: Some("1979-05-25".into()),
            vote_average: None,
        };
        assert_eq!(movie.to_string(), "Alien (1979)");
    }
}
