use crate::db::models::IngredientWithAmount;
use crate::error::Result;
use crate::models::IngredientDetailed;
use sqlx::SqliteConnection;

/// Normalize ingredient name (lowercase, trim)
pub fn normalize_ingredient(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Insert an ingredient master record if it is not known yet.
/// An existing record keeps its name; recipes carry their own spelling.
pub async fn upsert_ingredient(conn: &mut SqliteConnection, id: i64, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO ingredients (id, name) VALUES (?, ?) ON CONFLICT(id) DO NOTHING")
        .bind(id)
        .bind(normalize_ingredient(name))
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Remove all ingredients from a recipe
pub async fn clear_recipe_ingredients(conn: &mut SqliteConnection, recipe_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Set recipe ingredients (replaces existing ingredients, keeps list order)
pub async fn set_recipe_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredients: &[IngredientDetailed],
) -> Result<()> {
    clear_recipe_ingredients(conn, recipe_id).await?;

    for (position, ing) in ingredients.iter().enumerate() {
        upsert_ingredient(conn, ing.id, &ing.name).await?;

        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, position, ingredient_id, name, amount, unit)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(recipe_id)
        .bind(position as i64)
        .bind(ing.id)
        .bind(&ing.name)
        .bind(ing.amount)
        .bind(&ing.unit)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Get ingredients for a recipe in their stored order
pub async fn get_recipe_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
) -> Result<Vec<IngredientWithAmount>> {
    let ingredients = sqlx::query_as::<_, IngredientWithAmount>(
        r#"
        SELECT ri.ingredient_id AS id, ri.name, ri.amount, ri.unit
        FROM recipe_ingredients ri
        WHERE ri.recipe_id = ?
        ORDER BY ri.position
        "#,
    )
    .bind(recipe_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ingredients)
}

/// Delete ingredients that aren't associated with any recipes
pub async fn delete_unused_ingredients(conn: &mut SqliteConnection) -> Result<i64> {
    let result = sqlx::query(
        r#"
        DELETE FROM ingredients
        WHERE id NOT IN (SELECT DISTINCT ingredient_id FROM recipe_ingredients)
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() as i64)
}

/// Count ingredient master records
pub async fn count_ingredients(conn: &mut SqliteConnection) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredients")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count.0)
}
