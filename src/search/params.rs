//! Search parameters as carried in a results route,
//! e.g. `type=byIngredients&ingredients=apple,flour&cuisine=null&ranking=1`.
//!
//! Absent values are written as the literal `null`; on the way in, `null` and
//! blank strings both mean absent.

use crate::models::RankingMode;
use crate::search::filters::{SearchFilters, SearchMode, SearchRequest};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

const NULL: &str = "null";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub mode: SearchMode,
    pub ingredients: Vec<String>,
    pub cuisine: Option<String>,
    pub ranking: Option<RankingMode>,
}

fn present(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value == NULL {
        None
    } else {
        Some(value)
    }
}

/// Split a comma-separated ingredient list, dropping blanks
pub fn parse_ingredients(value: &str) -> Vec<String> {
    present(value)
        .map(|csv| {
            csv.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_ranking(value: &str) -> Result<Option<RankingMode>> {
    let Some(value) = present(value) else {
        return Ok(None);
    };
    value
        .parse::<u8>()
        .ok()
        .and_then(RankingMode::from_code)
        .map(Some)
        .ok_or_else(|| Error::InvalidFilter(format!("Unknown ranking '{value}'")))
}

impl SearchParams {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            ingredients: Vec::new(),
            cuisine: None,
            ranking: None,
        }
    }

    /// Parse a route query string. Unknown keys are ignored; `type` is required.
    pub fn from_query(query: &str) -> Result<Self> {
        let mut mode = None;
        let mut params = Self::new(SearchMode::ComplexSearch);

        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "type" => mode = present(&value).map(str::parse::<SearchMode>).transpose()?,
                "ingredients" => params.ingredients = parse_ingredients(&value),
                "cuisine" => params.cuisine = present(&value).map(String::from),
                "ranking" => params.ranking = parse_ranking(&value)?,
                _ => {}
            }
        }

        params.mode =
            mode.ok_or_else(|| Error::InvalidFilter("Missing search type".to_string()))?;
        Ok(params)
    }

    /// Render as a route query string
    pub fn to_query(&self) -> String {
        let ingredients = if self.ingredients.is_empty() {
            NULL.to_string()
        } else {
            urlencoding::encode(&self.ingredients.join(",")).into_owned()
        };
        let cuisine = self
            .cuisine
            .as_deref()
            .map(|c| urlencoding::encode(c).into_owned())
            .unwrap_or_else(|| NULL.to_string());
        let ranking = self
            .ranking
            .map(|r| r.code().to_string())
            .unwrap_or_else(|| NULL.to_string());

        format!(
            "type={}&ingredients={}&cuisine={}&ranking={}",
            self.mode, ingredients, cuisine, ranking
        )
    }

    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            query: None,
            ingredients: self.ingredients.clone(),
            cuisine: self.cuisine.clone(),
            diet: None,
            ranking: self.ranking,
        }
    }

    /// Validate into a request for a search session
    pub fn into_request(self) -> Result<SearchRequest> {
        let filters = self.filters();
        SearchRequest::new(self.mode, filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_means_absent() {
        let params =
            SearchParams::from_query("type=complex&ingredients=null&cuisine=null&ranking=null")
                .unwrap();
        assert_eq!(params, SearchParams::new(SearchMode::ComplexSearch));
    }

    #[test]
    fn test_parses_ingredient_route() {
        let params = SearchParams::from_query(
            "?type=byIngredients&ingredients=apple,%20brown%20sugar,,flour&cuisine=&ranking=2",
        )
        .unwrap();

        assert_eq!(params.mode, SearchMode::ByIngredients);
        assert_eq!(params.ingredients, vec!["apple", "brown sugar", "flour"]);
        assert_eq!(params.cuisine, None);
        assert_eq!(params.ranking, Some(RankingMode::MinimizeMissing));
    }

    #[test]
    fn test_plus_decodes_as_space() {
        let params = SearchParams::from_query(
            "type=complex&cuisine=Middle+Eastern&ingredients=olive+oil%2Cbasil",
        )
        .unwrap();
        assert_eq!(params.cuisine.as_deref(), Some("Middle Eastern"));
        assert_eq!(params.ingredients, vec!["olive oil", "basil"]);

        let params = SearchParams::from_query("type=complex&cuisine=Middle%20Eastern").unwrap();
        assert_eq!(params.cuisine.as_deref(), Some("Middle Eastern"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(SearchParams::from_query("ingredients=apple").is_err());
        assert!(SearchParams::from_query("type=sideways").is_err());
        assert!(SearchParams::from_query("type=byIngredients&ranking=7").is_err());
        assert!(SearchParams::from_query("type=byIngredients&ranking=max").is_err());
    }

    #[test]
    fn test_query_string_survives_reparse() {
        let params = SearchParams {
            mode: SearchMode::ComplexSearch,
            ingredients: vec!["olive oil".to_string(), "basil".to_string()],
            cuisine: Some("Middle Eastern".to_string()),
            ranking: None,
        };

        let query = params.to_query();
        assert_eq!(
            query,
            "type=complex&ingredients=olive%20oil%2Cbasil&cuisine=Middle%20Eastern&ranking=null"
        );
        assert_eq!(SearchParams::from_query(&query).unwrap(), params);
    }

    #[test]
    fn test_into_request_validates() {
        let params = SearchParams::from_query("type=byIngredients&ingredients=null&ranking=1")
            .unwrap();
        assert!(matches!(
            params.into_request(),
            Err(Error::InvalidFilter(_))
        ));

        let params = SearchParams::from_query("type=LOCAL_FAVORITES").unwrap();
        assert_eq!(params.into_request().unwrap(), SearchRequest::Favorites);
    }
}
