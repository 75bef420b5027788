use crate::config::ApiConfig;
use crate::remote::models::{ComplexSearchResponse, FindByIngredientsItem, RecipeInformation};
use crate::remote::{ComplexSearch, IngredientSearch, RecipeGateway};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tracing::{debug, error};
use url::Url;

/// Spoonacular API client
#[derive(Clone)]
pub struct SpoonacularClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl SpoonacularClient {
    /// Create a new client with the configured timeouts
    pub fn new(config: &ApiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("SPOONACULAR_API_KEY is not set".to_string()));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .read_timeout(config.read_timeout())
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(&config.base_url)?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Make a GET request relative to the base URL
    async fn get<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        debug!("Spoonacular request: GET {} {:?}", url, params);

        let response = self
            .client
            .get(url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            error!("Spoonacular API error: {} - {}", status, error_body);

            return Err(match status {
                StatusCode::NOT_FOUND => Error::NotFound(format!("Resource {path} not found")),
                StatusCode::UNAUTHORIZED => Error::Api("API credentials rejected".to_string()),
                StatusCode::PAYMENT_REQUIRED => Error::Api("Daily API quota exhausted".to_string()),
                _ => Error::Api(format!("HTTP {status}")),
            });
        }

        response.json::<T>().await.map_err(Error::from)
    }
}

fn push_if_present(params: &mut Vec<(&'static str, String)>, name: &'static str, value: &Option<String>) {
    if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        params.push((name, value.to_string()));
    }
}

#[async_trait]
impl RecipeGateway for SpoonacularClient {
    async fn search_by_ingredients(
        &self,
        search: &IngredientSearch,
    ) -> Result<Vec<FindByIngredientsItem>> {
        debug!(
            "Searching by ingredients: {:?} (ranking {}, offset {} not sent)",
            search.ingredients,
            search.ranking.code(),
            search.offset
        );

        let params = [
            ("ingredients", search.ingredients.join(",")),
            ("number", search.number.to_string()),
            ("ranking", search.ranking.code().to_string()),
        ];

        self.get("findByIngredients", &params).await
    }

    async fn search_complex(&self, search: &ComplexSearch) -> Result<ComplexSearchResponse> {
        let mut params = Vec::new();
        push_if_present(&mut params, "query", &search.query);
        if !search.ingredients.is_empty() {
            params.push(("includeIngredients", search.ingredients.join(",")));
        }
        push_if_present(&mut params, "cuisine", &search.cuisine);
        push_if_present(&mut params, "diet", &search.diet);
        params.push(("offset", search.offset.to_string()));
        params.push(("number", search.number.to_string()));

        self.get("complexSearch", &params).await
    }

    async fn recipe_information(&self, id: i64) -> Result<RecipeInformation> {
        self.get(&format!("{id}/information"), &[]).await
    }
}
