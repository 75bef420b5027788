use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FavoriteRecipe {
    pub id: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub instructions: Option<String>,
    pub ready_in_minutes: i64,
    pub servings: i64,
    pub favorited_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FavoriteSummary {
    pub id: i64,
    pub title: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IngredientWithAmount {
    pub id: i64,
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}
