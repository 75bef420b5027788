use crate::models::RankingMode;
use crate::search::filters::SearchMode;
use crate::search::params::SearchParams;
use tracing::debug;

/// Cuisines accepted by the `cuisine` filter of complex search
pub const AVAILABLE_CUISINES: &[&str] = &[
    "African",
    "Asian",
    "American",
    "British",
    "Cajun",
    "Caribbean",
    "Chinese",
    "Eastern European",
    "European",
    "French",
    "German",
    "Greek",
    "Indian",
    "Irish",
    "Italian",
    "Japanese",
    "Jewish",
    "Korean",
    "Latin American",
    "Mediterranean",
    "Mexican",
    "Middle Eastern",
    "Nordic",
    "Southern",
    "Spanish",
    "Thai",
    "Vietnamese",
];

/// Filter input collected before a search is submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub input: String,
    ingredients: Vec<String>,
    cuisine: Option<String>,
    ranking: RankingMode,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            input: String::new(),
            ingredients: Vec::new(),
            cuisine: None,
            ranking: RankingMode::MaximizeUsed,
        }
    }
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn cuisine(&self) -> Option<&str> {
        self.cuisine.as_deref()
    }

    pub fn ranking(&self) -> RankingMode {
        self.ranking
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Add the current input as an ingredient and clear the input.
    /// Blank input and ingredients already listed (ignoring case) are skipped.
    /// Returns whether an ingredient was added.
    pub fn add_ingredient(&mut self) -> bool {
        let candidate = self.input.trim().to_string();
        self.input.clear();

        if candidate.is_empty() {
            return false;
        }
        if self
            .ingredients
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(&candidate))
        {
            debug!("Ingredient '{}' already listed", candidate);
            return false;
        }

        self.ingredients.push(candidate);
        true
    }

    pub fn remove_ingredient(&mut self, name: &str) -> bool {
        let before = self.ingredients.len();
        self.ingredients
            .retain(|existing| !existing.eq_ignore_ascii_case(name.trim()));
        self.ingredients.len() != before
    }

    pub fn clear_ingredients(&mut self) {
        self.ingredients.clear();
    }

    /// Select a cuisine from [`AVAILABLE_CUISINES`] (matched ignoring case),
    /// or `None` for any cuisine. Returns false for an unsupported cuisine.
    pub fn select_cuisine(&mut self, cuisine: Option<&str>) -> bool {
        match cuisine {
            None => {
                self.cuisine = None;
                true
            }
            Some(name) => {
                let Some(known) = AVAILABLE_CUISINES
                    .iter()
                    .find(|known| known.eq_ignore_ascii_case(name.trim()))
                else {
                    return false;
                };
                self.cuisine = Some((*known).to_string());
                true
            }
        }
    }

    pub fn select_ranking(&mut self, ranking: RankingMode) {
        self.ranking = ranking;
    }

    /// Complex search needs an ingredient or a cuisine; ingredient search
    /// needs an ingredient; favorites need nothing.
    pub fn can_submit(&self, mode: SearchMode) -> bool {
        match mode {
            SearchMode::ComplexSearch => !self.ingredients.is_empty() || self.cuisine.is_some(),
            SearchMode::ByIngredients => !self.ingredients.is_empty(),
            SearchMode::FavoritesStream => true,
        }
    }

    /// Route parameters for the results screen.
    /// Cuisine only applies to complex search and ranking only to ingredient search.
    pub fn to_params(&self, mode: SearchMode) -> SearchParams {
        let mut params = SearchParams::new(mode);
        match mode {
            SearchMode::ComplexSearch => {
                params.ingredients = self.ingredients.clone();
                params.cuisine = self.cuisine.clone();
            }
            SearchMode::ByIngredients => {
                params.ingredients = self.ingredients.clone();
                params.ranking = Some(self.ranking);
            }
            SearchMode::FavoritesStream => {}
        }
        params
    }
}
