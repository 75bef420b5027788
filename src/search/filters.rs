use crate::models::{RankingMode, RecipeSummary};
use crate::remote::{mapper, ComplexSearch, IngredientSearch, RecipeGateway};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Filters chosen by the user before a search starts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub ingredients: Vec<String>,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    /// Only meaningful for ingredient search
    pub ranking: Option<RankingMode>,
}

/// Where a session's results come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    ComplexSearch,
    ByIngredients,
    FavoritesStream,
}

impl SearchMode {
    /// Name used in route parameters
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::ComplexSearch => "complex",
            SearchMode::ByIngredients => "byIngredients",
            SearchMode::FavoritesStream => "favorites",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "complex" | "API_COMPLEX_SEARCH" => Ok(SearchMode::ComplexSearch),
            "byIngredients" | "API_BY_INGREDIENTS_SEARCH" => Ok(SearchMode::ByIngredients),
            "favorites" | "LOCAL_FAVORITES" => Ok(SearchMode::FavoritesStream),
            other => Err(Error::InvalidFilter(format!("Unknown search mode '{other}'"))),
        }
    }
}

/// Filters for complex search; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplexCriteria {
    pub query: Option<String>,
    pub ingredients: Vec<String>,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
}

/// A validated search, one arm per mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    Complex(ComplexCriteria),
    ByIngredients {
        ingredients: Vec<String>,
        ranking: RankingMode,
    },
    Favorites,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

impl SearchRequest {
    /// Validate filters for a mode.
    ///
    /// Ingredient search needs at least one ingredient and a ranking mode;
    /// nothing is sent to the network when this fails.
    pub fn new(mode: SearchMode, filters: SearchFilters) -> Result<Self> {
        match mode {
            SearchMode::ComplexSearch => Ok(SearchRequest::Complex(ComplexCriteria {
                query: clean(filters.query),
                ingredients: clean_list(filters.ingredients),
                cuisine: clean(filters.cuisine),
                diet: clean(filters.diet),
            })),
            SearchMode::ByIngredients => {
                let ingredients = clean_list(filters.ingredients);
                if ingredients.is_empty() {
                    return Err(Error::InvalidFilter(
                        "Ingredient search needs at least one ingredient".to_string(),
                    ));
                }
                let ranking = filters.ranking.ok_or_else(|| {
                    Error::InvalidFilter("Ingredient search needs a ranking mode".to_string())
                })?;
                Ok(SearchRequest::ByIngredients {
                    ingredients,
                    ranking,
                })
            }
            SearchMode::FavoritesStream => Ok(SearchRequest::Favorites),
        }
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            SearchRequest::Complex(_) => SearchMode::ComplexSearch,
            SearchRequest::ByIngredients { .. } => SearchMode::ByIngredients,
            SearchRequest::Favorites => SearchMode::FavoritesStream,
        }
    }

    /// Fetch one page from the remote API, mapped to summaries.
    /// The favorites arm has no pages and yields nothing.
    pub async fn fetch_page(
        &self,
        gateway: &dyn RecipeGateway,
        offset: usize,
        page_size: usize,
    ) -> Result<Vec<RecipeSummary>> {
        match self {
            SearchRequest::Complex(criteria) => {
                let response = gateway
                    .search_complex(&ComplexSearch {
                        query: criteria.query.clone(),
                        ingredients: criteria.ingredients.clone(),
                        cuisine: criteria.cuisine.clone(),
                        diet: criteria.diet.clone(),
                        offset,
                        number: page_size,
                    })
                    .await?;
                Ok(response
                    .results
                    .into_iter()
                    .map(mapper::summary_from_complex)
                    .collect())
            }
            SearchRequest::ByIngredients {
                ingredients,
                ranking,
            } => {
                let items = gateway
                    .search_by_ingredients(&IngredientSearch {
                        ingredients: ingredients.clone(),
                        ranking: *ranking,
                        number: page_size,
                        offset,
                    })
                    .await?;
                Ok(items
                    .into_iter()
                    .map(mapper::summary_from_ingredient_match)
                    .collect())
            }
            SearchRequest::Favorites => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_search_requires_ingredients() {
        let filters = SearchFilters {
            ingredients: vec!["  ".to_string()],
            ranking: Some(RankingMode::MaximizeUsed),
            ..Default::default()
        };
        assert!(matches!(
            SearchRequest::new(SearchMode::ByIngredients, filters),
            Err(Error::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_ingredient_search_requires_ranking() {
        let filters = SearchFilters {
            ingredients: vec!["apple".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            SearchRequest::new(SearchMode::ByIngredients, filters),
            Err(Error::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_complex_search_cleans_filters() {
        let filters = SearchFilters {
            query: Some("  ".to_string()),
            ingredients: vec![" tomato ".to_string(), "".to_string()],
            cuisine: Some("Italian".to_string()),
            diet: None,
            ranking: Some(RankingMode::MinimizeMissing),
        };

        let request = SearchRequest::new(SearchMode::ComplexSearch, filters).unwrap();
        assert_eq!(
            request,
            SearchRequest::Complex(ComplexCriteria {
                query: None,
                ingredients: vec!["tomato".to_string()],
                cuisine: Some("Italian".to_string()),
                diet: None,
            })
        );
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(
            "API_BY_INGREDIENTS_SEARCH".parse::<SearchMode>().unwrap(),
            SearchMode::ByIngredients
        );
        assert_eq!(
            "favorites".parse::<SearchMode>().unwrap(),
            SearchMode::FavoritesStream
        );
        assert!("random".parse::<SearchMode>().is_err());
    }
}
