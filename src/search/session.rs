//! Paginated search session.
//!
//! A session owns one [`SearchUiState`] for the lifetime of a search screen.
//! All mutation goes through a single [`watch::Sender`], and the check for an
//! in-flight load happens in the same atomic update that enters a loading
//! phase, so at most one fetch per session is ever outstanding.

use crate::error::Failure;
use crate::favorites::FavoritesStore;
use crate::models::RecipeSummary;
use crate::remote::RecipeGateway;
use crate::search::filters::{SearchFilters, SearchMode, SearchRequest};
use crate::search::state::{SearchPhase, SearchUiState};
use crate::{Error, Result};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Initial,
    More,
}

/// State shared with the favorites subscription task
struct Shared {
    state: watch::Sender<SearchUiState>,
    closed: AtomicBool,
}

impl Shared {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Enter a loading phase if the current phase allows it.
    /// Returns the offset to fetch at, or `None` if the request is ignored.
    fn begin(&self, kind: FetchKind, from: &[SearchPhase]) -> Option<usize> {
        if self.is_closed() {
            return None;
        }

        let mut offset = None;
        self.state.send_if_modified(|state| {
            if !from.contains(&state.phase) {
                return false;
            }
            match kind {
                FetchKind::Initial => {
                    state.items.clear();
                    state.cursor.offset = 0;
                    state.can_load_more = false;
                    state.phase = SearchPhase::LoadingInitial;
                }
                FetchKind::More => {
                    if !state.can_load_more {
                        return false;
                    }
                    state.phase = SearchPhase::LoadingMore;
                }
            }
            state.last_error = None;
            state.is_empty = false;
            offset = Some(state.cursor.offset);
            true
        });
        offset
    }

    fn complete(&self, kind: FetchKind, offset: usize, outcome: Result<Vec<RecipeSummary>>) {
        if self.is_closed() {
            debug!("Discarding search response for closed session");
            return;
        }

        match outcome {
            Ok(page) => {
                let received = page.len();
                self.state.send_modify(|state| {
                    match kind {
                        FetchKind::Initial => {
                            state.items.clear();
                            state.append_unique(page);
                        }
                        FetchKind::More => state.append_unique(page),
                    }
                    state.cursor.offset = offset + received;
                    state.can_load_more = received == state.cursor.page_size;
                    state.is_empty = kind == FetchKind::Initial && state.items.is_empty();
                    state.last_error = None;
                    state.phase = SearchPhase::Ready;
                });
                debug!(
                    "Search page at offset {} returned {} recipes",
                    offset, received
                );
            }
            Err(err) => {
                warn!(
                    "Search page at offset {} failed: {}",
                    offset,
                    err.log_safe()
                );
                let failure = Failure::from(&err);
                self.state.send_modify(|state| {
                    state.phase = match kind {
                        FetchKind::Initial => SearchPhase::ErrorInitial,
                        FetchKind::More => SearchPhase::ErrorMore,
                    };
                    state.is_empty = kind == FetchKind::Initial && state.items.is_empty();
                    state.last_error = Some(failure);
                });
            }
        }
    }

    fn apply_favorites(&self, emission: Result<Vec<RecipeSummary>>) {
        match emission {
            Ok(items) => {
                debug!("Favorites emitted {} recipes", items.len());
                self.state.send_modify(|state| {
                    state.is_empty = items.is_empty();
                    state.items = items;
                    state.can_load_more = false;
                    state.last_error = None;
                    state.phase = SearchPhase::Ready;
                });
            }
            Err(err) => {
                warn!("Favorites query failed: {}", err.log_safe());
                let failure = Failure::from(&err);
                self.state.send_modify(|state| {
                    state.can_load_more = false;
                    state.is_empty = state.items.is_empty();
                    state.last_error = Some(failure);
                    state.phase = SearchPhase::ErrorInitial;
                });
            }
        }
    }
}

/// One search screen's worth of paginated results
pub struct SearchSession {
    request: SearchRequest,
    gateway: Arc<dyn RecipeGateway>,
    favorites: Arc<dyn FavoritesStore>,
    shared: Arc<Shared>,
    subscription: Mutex<Option<JoinHandle<()>>>,
}

impl SearchSession {
    /// Create an idle session; nothing is fetched until [`load_initial`](Self::load_initial)
    pub fn new(
        request: SearchRequest,
        page_size: usize,
        gateway: Arc<dyn RecipeGateway>,
        favorites: Arc<dyn FavoritesStore>,
    ) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidFilter(
                "Page size must be non-zero".to_string(),
            ));
        }

        let (state, _) = watch::channel(SearchUiState::new(page_size));

        Ok(Self {
            request,
            gateway,
            favorites,
            shared: Arc::new(Shared {
                state,
                closed: AtomicBool::new(false),
            }),
            subscription: Mutex::new(None),
        })
    }

    /// Validate the filters, create the session and issue the first fetch.
    ///
    /// Invalid filters fail with [`Error::InvalidFilter`] before any network
    /// call is made.
    pub async fn start(
        mode: SearchMode,
        filters: SearchFilters,
        page_size: usize,
        gateway: Arc<dyn RecipeGateway>,
        favorites: Arc<dyn FavoritesStore>,
    ) -> Result<Self> {
        let request = SearchRequest::new(mode, filters)?;
        let session = Self::new(request, page_size, gateway, favorites)?;
        info!(
            "Starting {} search session (page size {})",
            mode, page_size
        );
        session.load_initial().await;
        Ok(session)
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    pub fn mode(&self) -> SearchMode {
        self.request.mode()
    }

    /// Current state snapshot
    pub fn state(&self) -> SearchUiState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that yields the current state and every change after it
    pub fn subscribe(&self) -> watch::Receiver<SearchUiState> {
        self.shared.state.subscribe()
    }

    /// Issue the first fetch (or subscribe to favorites).
    /// Ignored unless the session is idle.
    pub async fn load_initial(&self) -> SearchUiState {
        self.run(FetchKind::Initial, &[SearchPhase::Idle]).await
    }

    /// Fetch the next page. Ignored unless the session is ready and more
    /// results may exist, which also makes repeated calls during a load safe.
    pub async fn request_next_page(&self) -> SearchUiState {
        self.run(FetchKind::More, &[SearchPhase::Ready]).await
    }

    /// Re-issue the fetch that failed.
    ///
    /// A failed initial fetch restarts from offset zero; a failed page keeps
    /// the accumulated results and retries at the same offset.
    pub async fn retry(&self) -> SearchUiState {
        match self.state().phase {
            SearchPhase::ErrorInitial => {
                self.run(FetchKind::Initial, &[SearchPhase::ErrorInitial])
                    .await
            }
            SearchPhase::ErrorMore => self.run(FetchKind::More, &[SearchPhase::ErrorMore]).await,
            phase => {
                debug!("Retry ignored in phase {:?}", phase);
                self.state()
            }
        }
    }

    async fn run(&self, kind: FetchKind, from: &[SearchPhase]) -> SearchUiState {
        let Some(offset) = self.shared.begin(kind, from) else {
            debug!("{:?} fetch ignored", kind);
            return self.state();
        };

        if matches!(self.request, SearchRequest::Favorites) {
            self.subscribe_favorites();
            return self.state();
        }

        let page_size = self.shared.state.borrow().cursor.page_size;
        debug!(
            "Fetching {} page at offset {} (size {})",
            self.mode(),
            offset,
            page_size
        );

        let outcome = self
            .request
            .fetch_page(self.gateway.as_ref(), offset, page_size)
            .await;
        self.shared.complete(kind, offset, outcome);
        self.state()
    }

    fn subscribe_favorites(&self) {
        let mut stream = self.favorites.favorites();
        let shared = Arc::clone(&self.shared);

        let handle = tokio::spawn(async move {
            while let Some(emission) = stream.next().await {
                if shared.is_closed() {
                    break;
                }
                shared.apply_favorites(emission);
            }
            debug!("Favorites subscription ended");
        });

        if let Some(previous) = self.lock_subscription().replace(handle) {
            previous.abort();
        }
    }

    fn lock_subscription(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// End the session: stop the favorites subscription and drop the effect
    /// of any fetch still in flight
    pub fn close(&self) {
        if self.shared.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.lock_subscription().take() {
            handle.abort();
        }
        debug!("Search session closed");
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.close();
    }
}
