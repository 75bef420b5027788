//! Local favorites with live subscriptions.
//!
//! Every committed write bumps a change counter held in a
//! [`tokio::sync::watch`] channel. Subscribers get the current snapshot on
//! subscription and re-query after each bump, so they only ever observe
//! committed state.

use crate::db::{self, DbPool};
use crate::models::{RecipeDetailed, RecipeSummary};
use crate::Result;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::watch;
use tracing::{debug, info};

/// Live stream of store snapshots
pub type LiveStream<T> = BoxStream<'static, Result<T>>;

/// Persistence for favorited recipes
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// All favorites: the current snapshot, then one emission per change
    fn favorites(&self) -> LiveStream<Vec<RecipeSummary>>;

    /// One favorite's details, `None` while it is not favorited
    fn favorite_detail(&self, id: i64) -> LiveStream<Option<RecipeDetailed>>;

    async fn is_favorite(&self, id: i64) -> Result<bool>;

    /// Store a favorite atomically, replacing any previous copy
    async fn add_favorite(&self, recipe: &RecipeDetailed) -> Result<()>;

    /// Remove a favorite atomically; removing an unknown id is not an error
    async fn remove_favorite(&self, id: i64) -> Result<()>;
}

/// SQLite-backed favorites store
#[derive(Clone)]
pub struct SqliteFavoritesStore {
    pool: DbPool,
    changes: std::sync::Arc<watch::Sender<u64>>,
}

impl SqliteFavoritesStore {
    pub fn new(pool: DbPool) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            pool,
            changes: std::sync::Arc::new(changes),
        }
    }

    fn notify_changed(&self) {
        self.changes.send_modify(|version| *version += 1);
    }

    /// Build a stream that runs `query` now and after every committed change
    fn live<T, F, Fut>(&self, query: F) -> LiveStream<T>
    where
        T: Send + 'static,
        F: Fn(DbPool) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<T>> + Send + 'static,
    {
        let mut rx = self.changes.subscribe();
        rx.mark_changed();
        let pool = self.pool.clone();

        stream::unfold((rx, pool, query), |(mut rx, pool, query)| async move {
            // Ends the stream once the store is dropped
            rx.changed().await.ok()?;
            let snapshot = query(pool.clone()).await;
            Some((snapshot, (rx, pool, query)))
        })
        .boxed()
    }
}

#[async_trait]
impl FavoritesStore for SqliteFavoritesStore {
    fn favorites(&self) -> LiveStream<Vec<RecipeSummary>> {
        self.live(|pool| async move {
            let mut tx = pool.begin().await?;
            let favorites = db::favorites::list_favorites(&mut tx).await?;
            tx.commit().await?;
            Ok(favorites)
        })
    }

    fn favorite_detail(&self, id: i64) -> LiveStream<Option<RecipeDetailed>> {
        // One transaction so the recipe and its rows come from the same snapshot
        self.live(move |pool| async move {
            let mut tx = pool.begin().await?;
            let favorite = db::favorites::get_favorite(&mut tx, id).await?;
            tx.commit().await?;
            Ok(favorite)
        })
    }

    async fn is_favorite(&self, id: i64) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        db::favorites::is_favorite(&mut conn, id).await
    }

    async fn add_favorite(&self, recipe: &RecipeDetailed) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        db::favorites::upsert_favorite(&mut tx, recipe).await?;
        tx.commit().await?;

        info!("Added favorite {} ({})", recipe.id, recipe.title);
        self.notify_changed();
        Ok(())
    }

    async fn remove_favorite(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let removed = db::favorites::delete_favorite(&mut tx, id).await?;
        tx.commit().await?;

        if removed {
            info!("Removed favorite {}", id);
            self.notify_changed();
        } else {
            debug!("Favorite {} was not stored, nothing removed", id);
        }
        Ok(())
    }
}
