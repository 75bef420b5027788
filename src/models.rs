use serde::{Deserialize, Serialize};

/// Recipe as shown in result lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub image_url: Option<String>,
}

/// Full recipe, as fetched from the API or stored as a favorite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetailed {
    pub id: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub ingredients: Vec<IngredientDetailed>,
    pub instructions: Option<String>,
    pub ready_in_minutes: i64,
    pub servings: i64,
    pub cuisines: Vec<String>,
}

/// Ingredient with the amount used by one recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientDetailed {
    pub id: i64,
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

impl RecipeDetailed {
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            title: self.title.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Ordering for ingredient-based search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingMode {
    /// Prefer recipes that use as many of the given ingredients as possible
    MaximizeUsed,
    /// Prefer recipes with as few missing ingredients as possible
    MinimizeMissing,
}

impl RankingMode {
    /// Code sent as the `ranking` query parameter
    pub fn code(self) -> u8 {
        match self {
            RankingMode::MaximizeUsed => 1,
            RankingMode::MinimizeMissing => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(RankingMode::MaximizeUsed),
            2 => Some(RankingMode::MinimizeMissing),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_codes() {
        assert_eq!(RankingMode::MaximizeUsed.code(), 1);
        assert_eq!(RankingMode::from_code(2), Some(RankingMode::MinimizeMissing));
        assert_eq!(RankingMode::from_code(3), None);
    }
}
