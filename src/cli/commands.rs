use crate::config::Settings;
use crate::db;
use crate::detail::{DetailSession, DetailSource};
use crate::favorites::{FavoritesStore, SqliteFavoritesStore};
use crate::models::{RankingMode, RecipeDetailed, RecipeSummary};
use crate::remote::{mapper, RecipeGateway, SpoonacularClient, UnconfiguredGateway};
use crate::search::{
    should_load_more, SearchFilters, SearchMode, SearchParams, SearchRequest, SearchSession,
    SearchUiState,
};
use crate::{Error, Result};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{info, warn};

/// Open the favorites database, creating and migrating it if needed
pub async fn open_store(settings: &Settings) -> Result<SqliteFavoritesStore> {
    let pool = db::init_pool_with_config(&settings.database).await?;
    db::run_migrations(&pool).await?;
    Ok(SqliteFavoritesStore::new(pool))
}

fn gateway(settings: &Settings) -> Result<Arc<dyn RecipeGateway>> {
    Ok(Arc::new(SpoonacularClient::new(&settings.api)?))
}

/// Gateway for commands that still work offline: without an API key every
/// remote call fails instead of the command refusing to start
fn gateway_or_offline(settings: &Settings) -> Result<Arc<dyn RecipeGateway>> {
    if settings.api.api_key.trim().is_empty() {
        warn!("SPOONACULAR_API_KEY is not set, using local favorites only");
        return Ok(Arc::new(UnconfiguredGateway));
    }
    gateway(settings)
}

/// Favorites never reach the network, so they need no API key
fn gateway_for(settings: &Settings, request: &SearchRequest) -> Result<Arc<dyn RecipeGateway>> {
    match request {
        SearchRequest::Favorites => Ok(Arc::new(UnconfiguredGateway)),
        _ => gateway(settings),
    }
}

/// Complex search
pub async fn search(settings: &Settings, filters: SearchFilters, pages: usize) -> Result<()> {
    let request = SearchRequest::new(SearchMode::ComplexSearch, filters)?;
    run_request(settings, request, pages).await
}

/// Ingredient search
pub async fn search_by_ingredients(
    settings: &Settings,
    ingredients: Vec<String>,
    ranking: u8,
    pages: usize,
) -> Result<()> {
    let ranking = RankingMode::from_code(ranking)
        .ok_or_else(|| Error::InvalidFilter(format!("Unknown ranking '{ranking}'")))?;
    let filters = SearchFilters {
        ingredients,
        ranking: Some(ranking),
        ..Default::default()
    };
    let request = SearchRequest::new(SearchMode::ByIngredients, filters)?;
    run_request(settings, request, pages).await
}

/// Search described by a results route query string
pub async fn open_route(settings: &Settings, route: &str, pages: usize) -> Result<()> {
    let params = SearchParams::from_query(route)?;
    info!("Opening results route: {}", params.to_query());
    run_request(settings, params.into_request()?, pages).await
}

async fn run_request(settings: &Settings, request: SearchRequest, pages: usize) -> Result<()> {
    let gateway = gateway_for(settings, &request)?;
    let store: Arc<dyn FavoritesStore> = Arc::new(open_store(settings).await?);
    let session = SearchSession::new(request, settings.search.page_size, gateway, store)?;

    let state = if session.mode() == SearchMode::FavoritesStream {
        session.load_initial().await;
        let mut rx = session.subscribe();
        let state = rx
            .wait_for(|s| !s.is_loading())
            .await
            .map_err(|e| Error::Internal(format!("Favorites subscription closed: {e}")))?
            .clone();
        state
    } else {
        session.load_initial().await;
        scroll_pages(&session, pages).await
    };

    session.close();
    print_results(&state)
}

/// Load pages the way a scrolling list would: request the next page only
/// when the last row is visible and the session says more may exist.
///
/// Stops early once a page adds nothing new, which is what ingredient search
/// returns when asked for a later page.
pub async fn scroll_pages(session: &SearchSession, pages: usize) -> SearchUiState {
    let mut loaded = 1;
    let mut state = session.state();

    while loaded < pages {
        let last_visible = state.items.len().checked_sub(1);
        if !should_load_more(&state, last_visible) {
            break;
        }

        let listed = state.items.len();
        state = session.request_next_page().await;
        loaded += 1;

        if state.last_error.is_none() && state.items.len() == listed {
            info!("Page {} added no new recipes, stopping", loaded);
            println!("No further results for this search");
            break;
        }
    }

    state
}

fn print_results(state: &SearchUiState) -> Result<()> {
    if let Some(failure) = &state.last_error {
        println!("\x1b[31m\u{2717}\x1b[0m Search failed: {}", failure);
        if state.items.is_empty() {
            return Err(Error::Internal(failure.to_string()));
        }
    }

    if state.is_empty {
        println!("No recipes found");
        return Ok(());
    }

    print_summaries(&state.items);

    if state.can_load_more {
        println!("\nMore results available (use --pages to load more)");
    }
    println!("\nTo view a recipe: cookhelp recipe <ID>");
    Ok(())
}

fn print_summaries(recipes: &[RecipeSummary]) {
    println!("\n{:<10} {:<60}", "ID", "Title");
    println!("{}", "-".repeat(70));

    for recipe in recipes {
        println!("{:<10} {:<60}", recipe.id, truncate(&recipe.title, 58));
    }
    println!("\n{} recipes", recipes.len());
}

/// Show one recipe, optionally toggling its favorite flag
pub async fn show_recipe(settings: &Settings, id: i64, toggle_favorite: bool) -> Result<()> {
    let store: Arc<dyn FavoritesStore> = Arc::new(open_store(settings).await?);
    let session = DetailSession::open(id, gateway_or_offline(settings)?, store).await;
    let state = session.state();

    let Some(recipe) = &state.recipe else {
        let reason = state
            .last_error
            .map(|f| f.to_string())
            .unwrap_or_else(|| format!("Recipe {id} not found"));
        return Err(Error::NotFound(reason));
    };

    if state.source == Some(DetailSource::Favorite) {
        warn!("Showing stored copy of recipe {}", id);
        println!("(offline: showing your saved copy)\n");
    }
    print_recipe(recipe);

    if toggle_favorite {
        if session.toggle_favorite().await? {
            println!("\n\x1b[32m\u{2713}\x1b[0m Added to favorites");
        } else {
            println!("\n\x1b[32m\u{2713}\x1b[0m Removed from favorites");
        }
    } else if state.is_favorite {
        println!("\n\u{2605} In your favorites");
    }

    session.close();
    Ok(())
}

fn print_recipe(recipe: &RecipeDetailed) {
    println!("{} (#{})", recipe.title, recipe.id);
    if let Some(image) = &recipe.image_url {
        println!("  Image: {image}");
    }
    println!(
        "  Ready in: {} min  Servings: {}",
        recipe.ready_in_minutes, recipe.servings
    );
    if !recipe.cuisines.is_empty() {
        println!("  Cuisines: {}", recipe.cuisines.join(", "));
    }

    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        let amount = ingredient
            .amount
            .map(|a| format!("{a} "))
            .unwrap_or_default();
        let unit = ingredient
            .unit
            .as_deref()
            .map(|u| format!("{u} "))
            .unwrap_or_default();
        println!("  - {amount}{unit}{}", ingredient.name);
    }

    if let Some(instructions) = &recipe.instructions {
        println!("\nInstructions:\n{instructions}");
    }
}

pub async fn list_favorites(settings: &Settings) -> Result<()> {
    let store = open_store(settings).await?;
    let favorites = store
        .favorites()
        .next()
        .await
        .ok_or_else(|| Error::Internal("Favorites query ended".to_string()))??;

    if favorites.is_empty() {
        println!("No favorites yet");
        return Ok(());
    }
    print_summaries(&favorites);
    Ok(())
}

pub async fn add_favorite(settings: &Settings, id: i64) -> Result<()> {
    let store = open_store(settings).await?;
    let info = gateway(settings)?.recipe_information(id).await?;
    let recipe = mapper::detail_from_information(info);

    store.add_favorite(&recipe).await?;
    println!("\x1b[32m\u{2713}\x1b[0m Saved favorite: {}", recipe.title);
    Ok(())
}

pub async fn remove_favorite(settings: &Settings, id: i64) -> Result<()> {
    let store = open_store(settings).await?;
    if !store.is_favorite(id).await? {
        println!("Recipe {id} is not a favorite");
        return Ok(());
    }

    store.remove_favorite(id).await?;
    println!("\x1b[32m\u{2713}\x1b[0m Removed favorite {id}");
    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
