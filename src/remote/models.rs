use serde::Deserialize;

/// Item returned by `findByIngredients`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindByIngredientsItem {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    #[serde(default)]
    pub used_ingredient_count: u32,
    #[serde(default)]
    pub missed_ingredient_count: u32,
    #[serde(default)]
    pub missed_ingredients: Vec<IngredientInfo>,
}

/// Ingredient reference inside a `findByIngredients` item
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientInfo {
    pub id: i64,
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

/// Response of `complexSearch`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexSearchResponse {
    pub results: Vec<ComplexSearchItem>,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub number: usize,
    #[serde(default)]
    pub total_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComplexSearchItem {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
}

/// Response of `{id}/information`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInformation {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
    pub instructions: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: i64,
    #[serde(default)]
    pub servings: i64,
    #[serde(default)]
    pub cuisines: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtendedIngredient {
    pub id: i64,
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}
