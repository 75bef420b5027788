use cookhelp::config::ApiConfig;
use cookhelp::db;
use cookhelp::favorites::{FavoritesStore, SqliteFavoritesStore};
use cookhelp::models::{IngredientDetailed, RecipeDetailed};
use cookhelp::remote::SpoonacularClient;
use cookhelp::search::{SearchFilters, SearchMode, SearchSession, SearchUiState};
use std::sync::Arc;
use std::time::Duration;

fn recipe(id: i64, title: &str, ingredients: &[&str]) -> RecipeDetailed {
    RecipeDetailed {
        id,
        title: title.to_string(),
        image_url: None,
        ingredients: ingredients
            .iter()
            .enumerate()
            .map(|(i, name)| IngredientDetailed {
                id: 1000 + i as i64,
                name: name.to_string(),
                amount: Some(1.0),
                unit: Some("cup".to_string()),
            })
            .collect(),
        instructions: Some("Combine and serve.".to_string()),
        ready_in_minutes: 15,
        servings: 2,
        cuisines: vec!["Mediterranean".to_string()],
    }
}

async fn wait_for(
    session: &SearchSession,
    predicate: impl FnMut(&SearchUiState) -> bool,
) -> SearchUiState {
    let mut rx = session.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("Timed out waiting for session state")
        .expect("Session state channel closed")
        .clone();
    state
}

fn ids(state: &SearchUiState) -> Vec<i64> {
    state.items.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn test_favorites_session_follows_store() {
    let pool = db::init_memory_pool()
        .await
        .expect("Failed to create in-memory database");
    let store = Arc::new(SqliteFavoritesStore::new(pool));

    // The gateway is never called in favorites mode
    let client = SpoonacularClient::new(&ApiConfig {
        base_url: "http://127.0.0.1:9/recipes/".to_string(),
        api_key: "unused".to_string(),
        ..ApiConfig::default()
    })
    .expect("Failed to create client");

    store
        .add_favorite(&recipe(1, "Hummus", &["chickpeas", "tahini"]))
        .await
        .expect("Failed to add favorite");
    store
        .add_favorite(&recipe(2, "Tabbouleh", &["bulgur", "parsley"]))
        .await
        .expect("Failed to add favorite");

    let session = SearchSession::start(
        SearchMode::FavoritesStream,
        SearchFilters::default(),
        20,
        Arc::new(client),
        store.clone(),
    )
    .await
    .expect("Failed to start session");

    let state = wait_for(&session, |s| s.items.len() == 2).await;
    let mut listed = ids(&state);
    listed.sort();
    assert_eq!(listed, vec![1, 2]);
    assert!(!state.can_load_more);
    assert!(!state.is_empty);

    store.remove_favorite(2).await.expect("Failed to remove favorite");
    let state = wait_for(&session, |s| s.items.len() == 1).await;
    assert_eq!(ids(&state), vec![1]);
    assert!(!state.can_load_more);

    store.remove_favorite(1).await.expect("Failed to remove favorite");
    let state = wait_for(&session, |s| s.items.is_empty()).await;
    assert!(state.is_empty);

    // Paging has no meaning for favorites
    let before = session.state();
    assert_eq!(session.request_next_page().await, before);
}

#[tokio::test]
async fn test_removing_favorite_cleans_unused_ingredients() {
    let pool = db::init_memory_pool()
        .await
        .expect("Failed to create in-memory database");
    let store = SqliteFavoritesStore::new(pool.clone());

    store
        .add_favorite(&recipe(10, "Pancakes", &["flour", "milk"]))
        .await
        .expect("Failed to add favorite");
    store
        .add_favorite(&recipe(11, "Crepes", &["flour"]))
        .await
        .expect("Failed to add favorite");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    assert_eq!(
        db::ingredients::count_ingredients(&mut conn).await.unwrap(),
        2
    );
    drop(conn);

    store.remove_favorite(10).await.expect("Failed to remove favorite");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    assert_eq!(
        db::ingredients::count_ingredients(&mut conn).await.unwrap(),
        1
    );
    assert!(db::favorites::get_favorite(&mut conn, 11)
        .await
        .unwrap()
        .is_some());
}
