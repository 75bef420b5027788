use crate::db::ingredients;
use crate::db::models::{FavoriteRecipe, FavoriteSummary};
use crate::error::Result;
use crate::models::{IngredientDetailed, RecipeDetailed, RecipeSummary};
use chrono::Utc;
use sqlx::SqliteConnection;

/// Write a favorite with its ingredients and cuisines.
/// Callers run this inside a transaction so the favorite appears as one unit.
pub async fn upsert_favorite(conn: &mut SqliteConnection, recipe: &RecipeDetailed) -> Result<()> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO recipes (id, title, image_url, instructions, ready_in_minutes, servings, favorited_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            image_url = excluded.image_url,
            instructions = excluded.instructions,
            ready_in_minutes = excluded.ready_in_minutes,
            servings = excluded.servings
        "#,
    )
    .bind(recipe.id)
    .bind(&recipe.title)
    .bind(&recipe.image_url)
    .bind(&recipe.instructions)
    .bind(recipe.ready_in_minutes)
    .bind(recipe.servings)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    ingredients::set_recipe_ingredients(conn, recipe.id, &recipe.ingredients).await?;
    set_recipe_cuisines(conn, recipe.id, &recipe.cuisines).await?;

    Ok(())
}

async fn set_recipe_cuisines(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    cuisines: &[String],
) -> Result<()> {
    sqlx::query("DELETE FROM recipe_cuisines WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    for (position, cuisine) in cuisines.iter().enumerate() {
        sqlx::query("INSERT INTO recipe_cuisines (recipe_id, position, cuisine) VALUES (?, ?, ?)")
            .bind(recipe_id)
            .bind(position as i64)
            .bind(cuisine)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Delete a favorite and everything hanging off it.
/// Returns whether a favorite was removed.
pub async fn delete_favorite(conn: &mut SqliteConnection, recipe_id: i64) -> Result<bool> {
    ingredients::clear_recipe_ingredients(conn, recipe_id).await?;

    sqlx::query("DELETE FROM recipe_cuisines WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    ingredients::delete_unused_ingredients(conn).await?;

    Ok(result.rows_affected() > 0)
}

/// List favorites, most recently added first
pub async fn list_favorites(conn: &mut SqliteConnection) -> Result<Vec<RecipeSummary>> {
    let rows = sqlx::query_as::<_, FavoriteSummary>(
        "SELECT id, title, image_url FROM recipes ORDER BY favorited_at DESC, id DESC",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| RecipeSummary {
            id: row.id,
            title: row.title,
            image_url: row.image_url,
        })
        .collect())
}

pub async fn is_favorite(conn: &mut SqliteConnection, recipe_id: i64) -> Result<bool> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count.0 > 0)
}

/// Get a favorite with all details, or `None` if it is not favorited
pub async fn get_favorite(
    conn: &mut SqliteConnection,
    recipe_id: i64,
) -> Result<Option<RecipeDetailed>> {
    let Some(recipe) =
        sqlx::query_as::<_, FavoriteRecipe>("SELECT * FROM recipes WHERE id = ?")
            .bind(recipe_id)
            .fetch_optional(&mut *conn)
            .await?
    else {
        return Ok(None);
    };

    let ingredients = ingredients::get_recipe_ingredients(conn, recipe_id)
        .await?
        .into_iter()
        .map(|ing| IngredientDetailed {
            id: ing.id,
            name: ing.name,
            amount: ing.amount,
            unit: ing.unit,
        })
        .collect();

    let cuisines: Vec<String> = sqlx::query_scalar(
        "SELECT cuisine FROM recipe_cuisines WHERE recipe_id = ? ORDER BY position",
    )
    .bind(recipe_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(RecipeDetailed {
        id: recipe.id,
        title: recipe.title,
        image_url: recipe.image_url,
        ingredients,
        instructions: recipe.instructions,
        ready_in_minutes: recipe.ready_in_minutes,
        servings: recipe.servings,
        cuisines,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_pool;

    fn recipe(id: i64, title: &str) -> RecipeDetailed {
        RecipeDetailed {
            id,
            title: title.to_string(),
            image_url: Some(format!("https://img.spoonacular.com/recipes/{id}-556x370.jpg")),
            ingredients: vec![
                IngredientDetailed {
                    id: 11215,
                    name: "garlic".to_string(),
                    amount: Some(2.0),
                    unit: Some("cloves".to_string()),
                },
                IngredientDetailed {
                    id: 4053,
                    name: "olive oil".to_string(),
                    amount: Some(3.0),
                    unit: Some("tbsp".to_string()),
                },
            ],
            instructions: Some("Cook it.".to_string()),
            ready_in_minutes: 25,
            servings: 2,
            cuisines: vec!["Italian".to_string(), "Mediterranean".to_string()],
        }
    }

    #[tokio::test]
    async fn test_favorite_crud() {
        let pool = init_memory_pool().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let pasta = recipe(716429, "Pasta with Garlic");
        upsert_favorite(&mut conn, &pasta).await.unwrap();

        assert!(is_favorite(&mut conn, pasta.id).await.unwrap());
        let stored = get_favorite(&mut conn, pasta.id).await.unwrap().unwrap();
        assert_eq!(stored, pasta);

        let listed = list_favorites(&mut conn).await.unwrap();
        assert_eq!(listed, vec![pasta.summary()]);

        assert!(delete_favorite(&mut conn, pasta.id).await.unwrap());
        assert!(get_favorite(&mut conn, pasta.id).await.unwrap().is_none());
        assert!(!delete_favorite(&mut conn, pasta.id).await.unwrap());
        assert_eq!(ingredients::count_ingredients(&mut conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upsert_replaces_children() {
        let pool = init_memory_pool().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let mut pasta = recipe(1, "Pasta");
        upsert_favorite(&mut conn, &pasta).await.unwrap();

        pasta.ingredients.truncate(1);
        pasta.cuisines = vec!["Italian".to_string()];
        pasta.title = "Garlic Pasta".to_string();
        upsert_favorite(&mut conn, &pasta).await.unwrap();

        let stored = get_favorite(&mut conn, 1).await.unwrap().unwrap();
        assert_eq!(stored.title, "Garlic Pasta");
        assert_eq!(stored.ingredients.len(), 1);
        assert_eq!(stored.cuisines, vec!["Italian".to_string()]);
        assert_eq!(list_favorites(&mut conn).await.unwrap().len(), 1);
    }
}
