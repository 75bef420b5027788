//! Recipe detail view: remote details with a fallback to the stored favorite,
//! and a live favorite flag.

use crate::error::Failure;
use crate::favorites::FavoritesStore;
use crate::models::RecipeDetailed;
use crate::remote::{mapper, RecipeGateway};
use crate::{Error, Result};
use futures::StreamExt;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Where the displayed recipe came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetailSource {
    Remote,
    Favorite,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailState {
    pub recipe: Option<RecipeDetailed>,
    pub source: Option<DetailSource>,
    pub is_loading: bool,
    pub is_favorite: bool,
    pub last_error: Option<Failure>,
}

impl DetailState {
    fn empty() -> Self {
        Self {
            recipe: None,
            source: None,
            is_loading: false,
            is_favorite: false,
            last_error: None,
        }
    }
}

pub struct DetailSession {
    id: i64,
    gateway: Arc<dyn RecipeGateway>,
    favorites: Arc<dyn FavoritesStore>,
    state: Arc<watch::Sender<DetailState>>,
    subscription: Mutex<Option<JoinHandle<()>>>,
}

impl DetailSession {
    pub fn new(
        id: i64,
        gateway: Arc<dyn RecipeGateway>,
        favorites: Arc<dyn FavoritesStore>,
    ) -> Self {
        let (state, _) = watch::channel(DetailState::empty());
        Self {
            id,
            gateway,
            favorites,
            state: Arc::new(state),
            subscription: Mutex::new(None),
        }
    }

    /// Start tracking the favorite flag and load the recipe
    pub async fn open(
        id: i64,
        gateway: Arc<dyn RecipeGateway>,
        favorites: Arc<dyn FavoritesStore>,
    ) -> Self {
        let session = Self::new(id, gateway, favorites);
        session.watch_favorite();
        session.load().await;
        session
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Fetch details from the API. If that fails and the recipe is a stored
    /// favorite, show the stored copy instead; the failure is kept either way.
    pub async fn load(&self) -> DetailState {
        let started = self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            state.is_loading = true;
            state.last_error = None;
            true
        });
        if !started {
            return self.state();
        }

        match self.gateway.recipe_information(self.id).await {
            Ok(info) => {
                let recipe = mapper::detail_from_information(info);
                debug!("Loaded recipe {} from API", recipe.id);
                self.state.send_modify(|state| {
                    state.recipe = Some(recipe);
                    state.source = Some(DetailSource::Remote);
                    state.is_loading = false;
                });
            }
            Err(err) => {
                warn!("Failed to load recipe {}: {}", self.id, err.log_safe());
                let failure = Failure::from(&err);
                let stored = self.stored_copy().await;
                self.state.send_modify(|state| {
                    if let Some(recipe) = stored {
                        info!("Showing stored favorite for recipe {}", recipe.id);
                        state.recipe = Some(recipe);
                        state.source = Some(DetailSource::Favorite);
                    }
                    state.is_loading = false;
                    state.last_error = Some(failure);
                });
            }
        }

        self.state()
    }

    async fn stored_copy(&self) -> Option<RecipeDetailed> {
        match self.favorites.favorite_detail(self.id).next().await {
            Some(Ok(recipe)) => recipe,
            Some(Err(err)) => {
                warn!(
                    "Failed to read stored favorite {}: {}",
                    self.id,
                    err.log_safe()
                );
                None
            }
            None => None,
        }
    }

    /// Keep `is_favorite` in step with the store
    pub fn watch_favorite(&self) {
        let mut stream = self.favorites.favorite_detail(self.id);
        let state = Arc::clone(&self.state);
        let id = self.id;

        let handle = tokio::spawn(async move {
            while let Some(emission) = stream.next().await {
                match emission {
                    Ok(stored) => {
                        let is_favorite = stored.is_some();
                        state.send_if_modified(|s| {
                            let changed = s.is_favorite != is_favorite;
                            s.is_favorite = is_favorite;
                            changed
                        });
                    }
                    Err(err) => warn!("Favorite watch for {} failed: {}", id, err.log_safe()),
                }
            }
        });

        if let Some(previous) = self.lock_subscription().replace(handle) {
            previous.abort();
        }
    }

    /// Add the displayed recipe to favorites, or remove it if already there.
    /// Returns whether the recipe is a favorite afterwards.
    pub async fn toggle_favorite(&self) -> Result<bool> {
        if self.favorites.is_favorite(self.id).await? {
            self.favorites.remove_favorite(self.id).await?;
            self.state.send_modify(|s| s.is_favorite = false);
            return Ok(false);
        }

        let recipe = self
            .state
            .borrow()
            .recipe
            .clone()
            .ok_or_else(|| Error::NotFound(format!("Recipe {} is not loaded", self.id)))?;
        self.favorites.add_favorite(&recipe).await?;
        self.state.send_modify(|s| s.is_favorite = true);
        Ok(true)
    }

    fn lock_subscription(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn close(&self) {
        if let Some(handle) = self.lock_subscription().take() {
            handle.abort();
        }
    }
}

impl Drop for DetailSession {
    fn drop(&mut self) {
        self.close();
    }
}
