//! TMDB (The Movie Database) API client
//!
//! Discover, search, trending, details, videos and the genre taxonomy.
//! API docs: https://developer.themoviedb.org/docs

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{DiscoverFilters, Genre, MovieDetail, MoviePage, MovieSummary, Trailer};

/// Default public API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Invalid API key (401)")]
    Unauthorized,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TmdbError>;

/// TMDB API client
///
/// Every request carries the API key as the `api_key` query parameter.
/// There is no retry and no caching.
#[derive(Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_options(api_key, base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom base URL and request timeout
    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for an endpoint, appending the API key
    fn url(&self, endpoint: &str) -> String {
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}api_key={}",
            self.base_url,
            endpoint,
            sep,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Make a GET request and decode the JSON body
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        tracing::debug!(endpoint, "TMDB request");

        let response = self
            .client
            .get(self.url(endpoint))
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| TmdbError::InvalidResponse(format!("JSON parse error: {}", e)))
            }
            StatusCode::NOT_FOUND => Err(TmdbError::NotFound),
            StatusCode::UNAUTHORIZED => Err(TmdbError::Unauthorized),
            status => {
                tracing::warn!(endpoint, status = status.as_u16(), "TMDB request rejected");
                Err(TmdbError::ServerError(status.as_u16()))
            }
        }
    }

    /// Filter-driven listing
    pub async fn discover(&self, page: u32, filters: &DiscoverFilters) -> Result<MoviePage> {
        let mut endpoint = format!("/discover/movie?page={}", page);
        if let Some(genre) = filters.genre {
            endpoint.push_str(&format!("&with_genres={}", genre));
        }
        if let Some(year) = filters.year {
            endpoint.push_str(&format!("&primary_release_year={}", year));
        }
        if let Some(rating) = filters.min_rating {
            endpoint.push_str(&format!("&vote_average.gte={}", rating));
        }

        let response: PageResponse = self.get(&endpoint).await?;
        Ok(response.into_page())
    }

    /// Title search
    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage> {
        let endpoint = format!(
            "/search/movie?query={}&page={}",
            urlencoding::encode(query),
            page
        );

        let response: PageResponse = self.get(&endpoint).await?;
        Ok(response.into_page())
    }

    /// Movies trending this week
    pub async fn trending(&self, page: u32) -> Result<MoviePage> {
        let endpoint = format!("/trending/movie/week?page={}", page);
        let response: PageResponse = self.get(&endpoint).await?;
        Ok(response.into_page())
    }

    /// Get movie details by ID
    pub async fn movie_detail(&self, id: u64) -> Result<MovieDetail> {
        let response: MovieResponse = self.get(&format!("/movie/{}", id)).await?;
        Ok(response.into_detail())
    }

    /// All videos attached to a movie, in response order
    pub async fn movie_videos(&self, id: u64) -> Result<Vec<Trailer>> {
        let response: VideosResponse = self.get(&format!("/movie/{}/videos", id)).await?;
        Ok(response.results)
    }

    /// Genre taxonomy for movies
    pub async fn genres(&self) -> Result<Vec<Genre>> {
        let response: GenresResponse = self.get("/genre/movie/list").await?;
        Ok(response.genres)
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    results: Vec<MovieRaw>,
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default)]
    total_pages: u32,
}

fn first_page() -> u32 {
    1
}

impl PageResponse {
    fn into_page(self) -> MoviePage {
        MoviePage {
            results: self.results.into_iter().map(MovieRaw::into_summary).collect(),
            page: self.page,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieRaw {
    id: u64,
    title: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f32>,
}

impl MovieRaw {
    fn into_summary(self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.unwrap_or_default(),
            poster_path: self.poster_path,
            release_date: non_empty(self.release_date),
            vote_average: self.vote_average,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    id: u64,
    title: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f32>,
    overview: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<Genre>,
}

impl MovieResponse {
    fn into_detail(self) -> MovieDetail {
        MovieDetail {
            id: self.id,
            title: self.title.unwrap_or_default(),
            poster_path: self.poster_path,
            release_date: non_empty(self.release_date),
            vote_average: self.vote_average,
            overview: self.overview.unwrap_or_default(),
            runtime: self.runtime,
            genres: self.genres,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    results: Vec<Trailer>,
}

#[derive(Debug, Deserialize)]
struct GenresResponse {
    #[serde(default)]
    genres: Vec<Genre>,
}

/// TMDB sends "" for unknown dates
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_appends_api_key() {
        let client = TmdbClient::with_base_url("k3y", "http://localhost/3/");
        assert_eq!(client.url("/genre/movie/list"), "http://localhost/3/genre/movie/list?api_key=k3y");
        assert_eq!(
            client.url("/trending/movie/week?page=2"),
            "http://localhost/3/trending/movie/week?page=2&api_key=k3y"
        );
    }

    #[test]
    fn test_empty_release_date_is_none() {
        let raw = MovieRaw {
            id: 1,
            title: Some("Untitled".into()),
            poster_path: None,
            release_date: Some("".into()),
            vote_average: None,
        };
        assert_eq!(raw.into_summary().release_date, None);
    }

    #[test]
    fn test_page_response_defaults() {
        let page: PageResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        let page = page.into_page();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_more());
    }
}
