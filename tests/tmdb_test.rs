//! TMDB API client tests
//!
//! Tests listings, metadata retrieval, and error handling.

use mockito::{Matcher, Server};
use movietui::api::{TmdbClient, TmdbError};
use movietui::models::{select_trailer, DiscoverFilters};

const PAGE_BODY: &str = r#"{
    "page": 1,
    "results": [
        {
            "id": 348,
            "title": "Alien",
            "release_date": "1979-05-25",
            "poster_path": "/vfrQk5IPloGg1v9Rzbh2Eg3VGyM.jpg",
            "vote_average": 8.1
        },
        {
            "id": 679,
            "title": "Aliens",
            "release_date": "",
            "poster_path": null,
            "vote_average": 7.9
        }
    ],
    "total_results": 40,
    "total_pages": 2
}"#;

fn key_param() -> Matcher {
    Matcher::UrlEncoded("api_key".into(), "test_key".into())
}

// =============================================================================
// Listing Tests
// =============================================================================

#[tokio::test]
async fn test_search_parses_results() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "alien covenant".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            key_param(),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PAGE_BODY)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client.search("alien covenant", 1).await.unwrap();

    mock.assert_async().await;

    assert_eq!(page.results.len(), 2);
    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 2);
    assert!(page.has_more());

    assert_eq!(page.results[0].id, 348);
    assert_eq!(page.results[0].title, "Alien");
    assert_eq!(page.results[0].year(), Some(1979));
    assert_eq!(page.results[0].vote_average, Some(8.1));

    // Empty dates are treated as unknown
    assert_eq!(page.results[1].release_date, None);
    assert_eq!(page.results[1].year(), None);
}

#[tokio::test]
async fn test_discover_sends_filters() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "3".into()),
            Matcher::UrlEncoded("with_genres".into(), "878".into()),
            Matcher::UrlEncoded("primary_release_year".into(), "1979".into()),
            Matcher::UrlEncoded("vote_average.gte".into(), "7.5".into()),
            key_param(),
        ]))
        .with_status(200)
        .with_body(PAGE_BODY)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let filters = DiscoverFilters {
        genre: Some(878),
        year: Some(1979),
        min_rating: Some(7.5),
    };
    let page = client.discover(3, &filters).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.results.len(), 2);
}

#[tokio::test]
async fn test_discover_without_filters_sends_only_page() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Regex("^page=1&api_key=test_key$".into()))
        .with_status(200)
        .with_body(r#"{"page": 1, "results": [], "total_pages": 0}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client.discover(1, &DiscoverFilters::default()).await.unwrap();

    mock.assert_async().await;
    assert!(page.results.is_empty());
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_trending_weekly() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/trending/movie/week")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            key_param(),
        ]))
        .with_status(200)
        .with_body(
            r#"{
            "page": 2,
            "results": [{"id": 550, "title": "Fight Club", "release_date": "1999-10-15", "vote_average": 8.4}],
            "total_pages": 2
        }"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client.trending(2).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.page, 2);
    assert!(!page.has_more());
    assert_eq!(page.results[0].title, "Fight Club");
}

// =============================================================================
// Detail Tests
// =============================================================================

#[tokio::test]
async fn test_movie_detail() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/348")
        .match_query(key_param())
        .with_status(200)
        .with_body(
            r#"{
            "id": 348,
            "title": "Alien",
            "release_date": "1979-05-25",
            "vote_average": 8.1,
            "overview": "During its return to the earth...",
            "runtime": 117,
            "genres": [{"id": 27, "name": "Horror"}, {"id": 878, "name": "Science Fiction"}],
            "imdb_id": "tt0078748"
        }"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let detail = client.movie_detail(348).await.unwrap();

    mock.assert_async().await;
    assert_eq!(detail.title, "Alien");
    assert_eq!(detail.runtime, Some(117));
    assert_eq!(detail.genre_names(), "Horror, Science Fiction");
    assert_eq!(detail.tmdb_url(), "https://www.themoviedb.org/movie/348");
    assert_eq!(detail.summary().year(), Some(1979));
}

#[tokio::test]
async fn test_movie_detail_missing_fields() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/movie/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id": 1}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let detail = client.movie_detail(1).await.unwrap();

    assert_eq!(detail.title, "");
    assert_eq!(detail.overview, "");
    assert!(detail.genres.is_empty());
    assert_eq!(detail.runtime, None);
}

#[tokio::test]
async fn test_movie_videos_and_trailer_selection() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/348/videos")
        .match_query(key_param())
        .with_status(200)
        .with_body(
            r#"{
            "id": 348,
            "results": [
                {"key": "vimeo1", "name": "Trailer", "site": "Vimeo", "type": "Trailer"},
                {"key": "teaser1", "name": "Teaser", "site": "YouTube", "type": "Teaser"},
                {"key": "LjLamj-b0I8", "name": "Official Trailer", "site": "YouTube", "type": "Trailer"},
                {"key": "second", "name": "Trailer 2", "site": "YouTube", "type": "Trailer"}
            ]
        }"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let videos = client.movie_videos(348).await.unwrap();

    mock.assert_async().await;
    assert_eq!(videos.len(), 4);

    let trailer = select_trailer(&videos).unwrap();
    assert_eq!(trailer.key, "LjLamj-b0I8");
    assert_eq!(trailer.youtube_url(), "https://www.youtube.com/watch?v=LjLamj-b0I8");
}

#[tokio::test]
async fn test_genres() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/genre/movie/list")
        .match_query(key_param())
        .with_status(200)
        .with_body(r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 35, "name": "Comedy"}]}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let genres = client.genres().await.unwrap();

    mock.assert_async().await;
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[1].name, "Comedy");
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_not_found() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/movie/999999999")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"status_code": 34, "status_message": "The resource you requested could not be found."}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let result = client.movie_detail(999999999).await;

    assert!(matches!(result, Err(TmdbError::NotFound)));
}

#[tokio::test]
async fn test_unauthorized() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/trending/movie/week")
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("bad_key", server.url());
    let result = client.trending(1).await;

    assert!(matches!(result, Err(TmdbError::Unauthorized)));
}

#[tokio::test]
async fn test_server_error() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let result = client.search("alien", 1).await;

    assert!(matches!(result, Err(TmdbError::ServerError(503))));
}

#[tokio::test]
async fn test_invalid_json() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/genre/movie/list")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let result = client.genres().await;

    assert!(matches!(result, Err(TmdbError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_connection_refused() {
    // Nothing listens on port 1
    let client = TmdbClient::with_base_url("test_key", "http://127.0.0.1:1");
    let result = client.trending(1).await;

    assert!(matches!(result, Err(TmdbError::RequestFailed(_))));
}
