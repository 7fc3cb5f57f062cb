//! Async side of the app
//!
//! Key handling never awaits. It queues [`Intent`]s; the [`Controller`]
//! turns each one into tokio tasks that call TMDB and report back with a
//! [`Completion`] over an unbounded channel. The event loop drains that
//! channel and applies completions on the UI thread.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::tmdb::{self, TmdbClient};
use crate::models::{Genre, MovieDetail, MoviePage, PartialResults, Trailer};
use crate::store::favorites::resolve_all;
use crate::store::{FetchTicket, PageRequest, ResolveTicket};

/// Work requested by key handling
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Genre taxonomy for the filter bar
    LoadGenres,
    FetchPage {
        ticket: FetchTicket,
        request: PageRequest,
    },
    /// Detail record and trailer list for an activation
    OpenDetail { activation: u64, movie_id: u64 },
    ResolveFavorites(ResolveTicket),
}

/// Result of an [`Intent`], delivered to the UI thread
#[derive(Debug, Clone)]
pub enum Completion {
    Genres(Result<Vec<Genre>, String>),
    Page {
        ticket: FetchTicket,
        result: Result<MoviePage, String>,
    },
    Detail {
        activation: u64,
        result: Result<MovieDetail, String>,
    },
    Trailers {
        activation: u64,
        result: Result<Vec<Trailer>, String>,
    },
    Favorites {
        ticket: ResolveTicket,
        results: PartialResults<MovieDetail>,
    },
}

/// Run one page request against the service
pub async fn fetch_page(
    client: &TmdbClient,
    request: &PageRequest,
    page: u32,
) -> tmdb::Result<MoviePage> {
    match request {
        PageRequest::Discover(filters) => client.discover(page, filters).await,
        PageRequest::Search(query) => client.search(query, page).await,
        PageRequest::Trending => client.trending(page).await,
    }
}

#[derive(Debug, Clone)]
pub struct Controller {
    client: Arc<TmdbClient>,
    tx: UnboundedSender<Completion>,
}

impl Controller {
    /// Create a controller and the receiving end of its completion channel
    pub fn new(client: TmdbClient) -> (Self, UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            client: Arc::new(client),
            tx,
        };
        (controller, rx)
    }

    /// Spawn the task(s) for `intent`. Must be called inside a tokio runtime.
    pub fn dispatch(&self, intent: Intent) {
        match intent {
            Intent::LoadGenres => {
                self.spawn(|client| async move {
                    Completion::Genres(client.genres().await.map_err(|e| e.to_string()))
                });
            }

            Intent::FetchPage { ticket, request } => {
                self.spawn(move |client| async move {
                    let result = fetch_page(&client, &request, ticket.page)
                        .await
                        .map_err(|e| e.to_string());
                    Completion::Page { ticket, result }
                });
            }

            Intent::OpenDetail {
                activation,
                movie_id,
            } => {
                self.spawn(move |client| async move {
                    let result = client.movie_detail(movie_id).await.map_err(|e| e.to_string());
                    Completion::Detail { activation, result }
                });
                self.spawn(move |client| async move {
                    let result = client.movie_videos(movie_id).await.map_err(|e| e.to_string());
                    Completion::Trailers { activation, result }
                });
            }

            Intent::ResolveFavorites(ticket) => {
                self.spawn(move |client| async move {
                    let results = resolve_all(&client, &ticket.ids).await;
                    Completion::Favorites { ticket, results }
                });
            }
        }
    }

    fn spawn<F, Fut>(&self, job: F)
    where
        F: FnOnce(Arc<TmdbClient>) -> Fut,
        Fut: std::future::Future<Output = Completion> + Send + 'static,
    {
        let tx = self.tx.clone();
        let fut = job(self.client.clone());
        tokio::spawn(async move {
            let completion = fut.await;
            if tx.send(completion).is_err() {
                tracing::debug!("Completion dropped, event loop is gone");
            }
        });
    }
}
