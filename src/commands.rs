//! CLI command implementations
//!
//! Each command takes the loaded [`Config`] and an [`Output`], and returns
//! the exit code. Listings go through the same [`CatalogStore`] request
//! building the TUI uses, so a blank search falls back to discover here too.

use serde::Serialize;

use crate::api::{TmdbClient, TmdbError};
use crate::cli::{
    DiscoverCmd, ExitCode, FavoritesAction, FavoritesCmd, InfoCmd, Output, SearchCmd, ThemeArg,
    ThemeCmd, TrendingCmd,
};
use crate::config::Config;
use crate::controller::fetch_page;
use crate::models::{
    select_trailer, DiscoverFilters, Genre, MovieDetail, MoviePage, MovieSummary, PartialResults,
    QueryMode,
};
use crate::storage::{FileStore, SharedStore};
use crate::store::favorites::resolve_all;
use crate::store::{CatalogStore, FavoritesStore, LastSearched, ThemeStore};

// =============================================================================
// Output payloads
// =============================================================================

/// One listing page
#[derive(Debug, Serialize)]
pub struct PageOutput {
    pub mode: QueryMode,
    pub page: u32,
    pub total_pages: u32,
    pub has_more: bool,
    pub results: Vec<MovieSummary>,
}

impl PageOutput {
    fn new(mode: QueryMode, page: MoviePage) -> Self {
        Self {
            mode,
            has_more: page.has_more(),
            page: page.page,
            total_pages: page.total_pages,
            results: page.results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InfoOutput {
    #[serde(flatten)]
    pub detail: MovieDetail,
    pub trailer_url: Option<String>,
    pub tmdb_url: String,
}

#[derive(Debug, Serialize)]
pub struct FavoriteIds {
    pub ids: Vec<u64>,
    pub changed: bool,
}

#[derive(Debug, Serialize)]
pub struct ThemeOutput {
    pub theme: &'static str,
}

// =============================================================================
// Shared helpers
// =============================================================================

fn client(config: &Config, output: &Output) -> Result<TmdbClient, ExitCode> {
    config
        .client()
        .map_err(|e| output.error(e.to_string(), ExitCode::Error))
}

fn open_storage(config: &Config, output: &Output) -> Result<SharedStore, ExitCode> {
    let path = config.storage_path();
    match FileStore::open(&path) {
        Ok(store) => Ok(std::sync::Arc::new(store)),
        Err(e) => Err(output.error(
            format!("Cannot open storage {}: {}", path.display(), e),
            ExitCode::Error,
        )),
    }
}

fn api_error(output: &Output, context: &str, err: &TmdbError) -> ExitCode {
    output.error(format!("{}: {}", context, err), ExitCode::from(err))
}

fn finish(output: &Output, printed: anyhow::Result<()>) -> ExitCode {
    match printed {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to write output: {}", e), ExitCode::Error),
    }
}

fn format_movie_row(movie: &MovieSummary) -> String {
    let year = movie.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    let rating = movie
        .vote_average
        .map(|r| format!("  ★ {:.1}", r))
        .unwrap_or_default();
    format!("{:>8}  {}{}{}", movie.id, movie.title, year, rating)
}

fn format_page(page: &PageOutput) -> String {
    if page.results.is_empty() {
        return "No movies found.".to_string();
    }
    let mut lines: Vec<String> = page.results.iter().map(format_movie_row).collect();
    lines.push(format!(
        "\n{} page {}/{}{}",
        page.mode,
        page.page,
        page.total_pages,
        if page.has_more { " (more available)" } else { "" }
    ));
    lines.join("\n")
}

async fn run_listing(
    client: &TmdbClient,
    catalog: &CatalogStore,
    mode: QueryMode,
    page: u32,
    output: &Output,
) -> Result<PageOutput, ExitCode> {
    let request = catalog.request(mode);
    tracing::debug!(%mode, page, "Fetching listing");
    fetch_page(client, &request, page)
        .await
        .map(|result| PageOutput::new(mode, result))
        .map_err(|e| api_error(output, "Failed to fetch movies", &e))
}

// =============================================================================
// Listings
// =============================================================================

pub async fn discover_cmd(cmd: DiscoverCmd, config: &Config, output: &Output) -> ExitCode {
    if let Some(rating) = cmd.min_rating {
        if !(0.0..=10.0).contains(&rating) {
            return output.error(
                format!("Invalid rating: {} (expected 0-10)", rating),
                ExitCode::InvalidArgs,
            );
        }
    }

    let client = match client(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let mut catalog = CatalogStore::new();
    catalog.set_filters(DiscoverFilters {
        genre: cmd.genre,
        year: cmd.year,
        min_rating: cmd.min_rating,
    });

    output.info("Discovering movies...");
    match run_listing(&client, &catalog, QueryMode::Discover, cmd.page, output).await {
        Ok(page) => finish(output, output.print(page, format_page)),
        Err(code) => code,
    }
}

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match client(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let mut catalog = CatalogStore::new();
    let mode = catalog.submit_query(&cmd.query);
    if mode == QueryMode::Search {
        output.info(format!("Searching for \"{}\"...", catalog.query()));
    } else {
        output.info("Empty query, showing discover results...");
    }

    let page = match run_listing(&client, &catalog, mode, cmd.page, output).await {
        Ok(page) => page,
        Err(code) => return code,
    };

    if mode == QueryMode::Search && cmd.page == 1 {
        if let Some(first) = page.results.first() {
            match open_storage(config, output) {
                Ok(storage) => LastSearched::load(storage).record(first),
                Err(_) => tracing::warn!("Last searched movie not recorded"),
            }
        }
    }

    finish(output, output.print(page, format_page))
}

pub async fn trending_cmd(cmd: TrendingCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match client(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info("Fetching trending movies...");
    let catalog = CatalogStore::new();
    match run_listing(&client, &catalog, QueryMode::Trending, cmd.page, output).await {
        Ok(page) => finish(output, output.print(page, format_page)),
        Err(code) => code,
    }
}

// =============================================================================
// Detail
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match client(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info(format!("Fetching details for {}...", cmd.id));
    let (detail, videos) = tokio::join!(client.movie_detail(cmd.id), client.movie_videos(cmd.id));

    let detail = match detail {
        Ok(d) => d,
        Err(e) => return api_error(output, "Failed to load details", &e),
    };
    let trailer_url = match videos {
        Ok(videos) => select_trailer(&videos).map(|t| t.youtube_url()),
        Err(e) => {
            tracing::warn!(movie_id = cmd.id, error = %e, "Trailer lookup failed");
            None
        }
    };

    let info = InfoOutput {
        tmdb_url: detail.tmdb_url(),
        trailer_url,
        detail,
    };
    finish(
        output,
        output.print(info, |info| {
            let mut lines = vec![info.detail.to_string()];
            if !info.detail.genres.is_empty() {
                lines.push(info.detail.genre_names());
            }
            if !info.detail.overview.is_empty() {
                lines.push(String::new());
                lines.push(info.detail.overview.clone());
            }
            lines.push(String::new());
            if let Some(url) = &info.trailer_url {
                lines.push(format!("Trailer: {}", url));
            }
            lines.push(format!("TMDB:    {}", info.tmdb_url));
            lines.join("\n")
        }),
    )
}

pub async fn genres_cmd(config: &Config, output: &Output) -> ExitCode {
    let client = match client(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match client.genres().await {
        Ok(genres) => finish(
            output,
            output.print(genres, |genres: &Vec<Genre>| {
                genres
                    .iter()
                    .map(|g| format!("{:>6}  {}", g.id, g.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            }),
        ),
        Err(e) => api_error(output, "Failed to load genres", &e),
    }
}

// =============================================================================
// Local state
// =============================================================================

pub async fn favorites_cmd(cmd: FavoritesCmd, config: &Config, output: &Output) -> ExitCode {
    let storage = match open_storage(config, output) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let mut favorites = FavoritesStore::load(storage);

    let changed = match cmd.action {
        FavoritesAction::List => return list_favorites(&favorites, config, output).await,
        FavoritesAction::Add { id } => favorites.add(id),
        FavoritesAction::Remove { id } => favorites.remove(id),
        FavoritesAction::Clear => {
            let had_any = !favorites.is_empty();
            favorites.clear();
            had_any
        }
    };

    let ids = FavoriteIds {
        ids: favorites.ids().to_vec(),
        changed,
    };
    finish(
        output,
        output.print(ids, |ids| {
            let status = if ids.changed { "Updated" } else { "Unchanged" };
            format!("{}: {} favorite(s)", status, ids.ids.len())
        }),
    )
}

async fn list_favorites(favorites: &FavoritesStore, config: &Config, output: &Output) -> ExitCode {
    let results = if favorites.is_empty() {
        PartialResults::default()
    } else {
        let client = match client(config, output) {
            Ok(c) => c,
            Err(code) => return code,
        };
        output.info(format!("Resolving {} favorite(s)...", favorites.len()));
        resolve_all(&client, favorites.ids()).await
    };

    finish(
        output,
        output.print(results, |results: &PartialResults<MovieDetail>| {
            if results.succeeded.is_empty() && results.failed.is_empty() {
                return "No favorites yet.".to_string();
            }
            let mut lines: Vec<String> = results
                .succeeded
                .iter()
                .map(|d| format_movie_row(&d.summary()))
                .collect();
            for failed in &results.failed {
                lines.push(format!("{:>8}  ⚠ could not be loaded: {}", failed.id, failed.reason));
            }
            lines.join("\n")
        }),
    )
}

pub async fn theme_cmd(cmd: ThemeCmd, config: &Config, output: &Output) -> ExitCode {
    let storage = match open_storage(config, output) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let mut theme = ThemeStore::load(storage);

    match cmd.mode {
        Some(ThemeArg::Dark) => theme.set(true),
        Some(ThemeArg::Light) => theme.set(false),
        Some(ThemeArg::Toggle) => {
            theme.toggle();
        }
        None => {}
    }

    let current = ThemeOutput {
        theme: if theme.dark_mode() { "dark" } else { "light" },
    };
    finish(output, output.print(current, |t| t.theme.to_string()))
}
