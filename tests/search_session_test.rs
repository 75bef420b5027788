use cookhelp::config::ApiConfig;
use cookhelp::db;
use cookhelp::error::ErrorKind;
use cookhelp::favorites::SqliteFavoritesStore;
use cookhelp::models::RankingMode;
use cookhelp::remote::SpoonacularClient;
use cookhelp::search::{SearchFilters, SearchMode, SearchPhase, SearchSession};
use cookhelp::Error;
use mockito::Matcher;
use std::sync::Arc;

fn complex_page(ids: std::ops::Range<i64>, offset: usize) -> String {
    let results: Vec<String> = ids
        .map(|id| format!(r#"{{"id":{id},"title":"Recipe {id}","image":"{id}-312x231.jpg"}}"#))
        .collect();
    format!(
        r#"{{"results":[{}],"offset":{offset},"number":20,"totalResults":27}}"#,
        results.join(",")
    )
}

async fn setup(server: &mockito::Server) -> (Arc<SpoonacularClient>, Arc<SqliteFavoritesStore>) {
    let config = ApiConfig {
        base_url: format!("{}/recipes/", server.url()),
        api_key: "integration-key".to_string(),
        ..ApiConfig::default()
    };
    let client = SpoonacularClient::new(&config).expect("Failed to create client");
    let pool = db::init_memory_pool()
        .await
        .expect("Failed to create in-memory database");

    (Arc::new(client), Arc::new(SqliteFavoritesStore::new(pool)))
}

#[tokio::test]
async fn test_complex_search_pages_until_exhausted() {
    let mut server = mockito::Server::new_async().await;

    let first = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apiKey".into(), "integration-key".into()),
            Matcher::UrlEncoded("cuisine".into(), "Italian".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
            Matcher::UrlEncoded("number".into(), "20".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(complex_page(0..20, 0))
        .expect(1)
        .create_async()
        .await;

    let second = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cuisine".into(), "Italian".into()),
            Matcher::UrlEncoded("offset".into(), "20".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(complex_page(20..27, 20))
        .expect(1)
        .create_async()
        .await;

    let (client, store) = setup(&server).await;
    let session = SearchSession::start(
        SearchMode::ComplexSearch,
        SearchFilters {
            cuisine: Some("Italian".to_string()),
            ..Default::default()
        },
        20,
        client,
        store,
    )
    .await
    .expect("Failed to start session");

    let state = session.state();
    assert_eq!(state.items.len(), 20);
    assert!(state.can_load_more);
    assert_eq!(
        state.items[0].image_url.as_deref(),
        Some("https://img.spoonacular.com/recipes/0-312x231.jpg")
    );

    let state = session.request_next_page().await;
    assert_eq!(state.items.len(), 27);
    assert_eq!(state.cursor.offset, 27);
    assert!(!state.can_load_more);

    // Exhausted: no third request
    session.request_next_page().await;

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_api_error_on_first_page_then_retry() {
    let mut server = mockito::Server::new_async().await;

    let quota = server
        .mock("GET", "/recipes/findByIngredients")
        .match_query(Matcher::Any)
        .with_status(402)
        .with_body(r#"{"status":"failure","code":402}"#)
        .expect(1)
        .create_async()
        .await;

    let (client, store) = setup(&server).await;
    let session = SearchSession::start(
        SearchMode::ByIngredients,
        SearchFilters {
            ingredients: vec!["apple".to_string(), "flour".to_string()],
            ranking: Some(RankingMode::MaximizeUsed),
            ..Default::default()
        },
        10,
        client,
        store,
    )
    .await
    .expect("Failed to start session");

    let state = session.state();
    assert_eq!(state.phase, SearchPhase::ErrorInitial);
    assert!(state.is_empty);
    let failure = state.last_error.expect("failure should be recorded");
    assert_eq!(failure.kind, ErrorKind::Api);
    assert!(!failure.reason.contains("integration-key"));
    quota.assert_async().await;
    quota.remove_async().await;

    let found = server
        .mock("GET", "/recipes/findByIngredients")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("ingredients".into(), "apple,flour".into()),
            Matcher::UrlEncoded("ranking".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"id":641803,"title":"Easy Apple Cake","image":"https://img.spoonacular.com/recipes/641803-312x231.jpg","usedIngredientCount":2,"missedIngredientCount":1,"missedIngredients":[{"id":1123,"name":"eggs","amount":2.0,"unit":""}]}]"#,
        )
        .create_async()
        .await;

    let state = session.retry().await;
    assert_eq!(state.phase, SearchPhase::Ready);
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].title, "Easy Apple Cake");
    assert!(!state.can_load_more);
    found.assert_async().await;
}

#[tokio::test]
async fn test_invalid_filters_make_no_request() {
    let mut server = mockito::Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (client, store) = setup(&server).await;
    let result = SearchSession::start(
        SearchMode::ByIngredients,
        SearchFilters::default(),
        20,
        client,
        store,
    )
    .await;

    assert!(matches!(result, Err(Error::InvalidFilter(_))));
    any.assert_async().await;
}
