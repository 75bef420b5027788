pub mod client;
pub mod mapper;
pub mod models;

pub use client::SpoonacularClient;

use crate::models::RankingMode;
use crate::Result;
use async_trait::async_trait;
use models::{ComplexSearchResponse, FindByIngredientsItem, RecipeInformation};

/// Parameters for `findByIngredients`
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientSearch {
    pub ingredients: Vec<String>,
    pub ranking: RankingMode,
    pub number: usize,
    /// Accepted for symmetry with complex search; the upstream endpoint has no
    /// offset parameter, so results always start from the top
    pub offset: usize,
}

/// Parameters for `complexSearch`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexSearch {
    pub query: Option<String>,
    pub ingredients: Vec<String>,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub offset: usize,
    pub number: usize,
}

/// Read-only access to the remote recipe API
#[async_trait]
pub trait RecipeGateway: Send + Sync {
    async fn search_by_ingredients(
        &self,
        search: &IngredientSearch,
    ) -> Result<Vec<FindByIngredientsItem>>;

    async fn search_complex(&self, search: &ComplexSearch) -> Result<ComplexSearchResponse>;

    async fn recipe_information(&self, id: i64) -> Result<RecipeInformation>;
}

/// Gateway used when no API key is configured; every call fails with a
/// configuration error so local-only features keep working
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGateway;

impl UnconfiguredGateway {
    fn error() -> crate::Error {
        crate::Error::Config("SPOONACULAR_API_KEY is not set".to_string())
    }
}

#[async_trait]
impl RecipeGateway for UnconfiguredGateway {
    async fn search_by_ingredients(
        &self,
        _search: &IngredientSearch,
    ) -> Result<Vec<FindByIngredientsItem>> {
        Err(Self::error())
    }

    async fn search_complex(&self, _search: &ComplexSearch) -> Result<ComplexSearchResponse> {
        Err(Self::error())
    }

    async fn recipe_information(&self, _id: i64) -> Result<RecipeInformation> {
        Err(Self::error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_unconfigured_gateway_reports_missing_key() {
        let err = UnconfiguredGateway.recipe_information(1).await.unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
