//! Conversion from Spoonacular wire records into the normalized recipe shapes
//! used by sessions and the favorites store.

use crate::models::{IngredientDetailed, RecipeDetailed, RecipeSummary};
use crate::remote::models::{
    ComplexSearchItem, ExtendedIngredient, FindByIngredientsItem, RecipeInformation,
};

/// Host serving recipe images referenced by bare file name
pub const IMAGE_BASE_URL: &str = "https://img.spoonacular.com/recipes/";

/// Resolve an image reference against the image host.
/// Absolute URLs are returned as-is, blank values become `None`.
pub fn resolve_image_url(image: Option<&str>) -> Option<String> {
    let image = image.map(str::trim).filter(|s| !s.is_empty())?;

    if url::Url::parse(image).is_ok() {
        return Some(image.to_string());
    }

    url::Url::parse(IMAGE_BASE_URL)
        .and_then(|base| base.join(image))
        .map(|resolved| resolved.to_string())
        .ok()
}

pub fn summary_from_complex(item: ComplexSearchItem) -> RecipeSummary {
    RecipeSummary {
        id: item.id,
        title: item.title.trim().to_string(),
        image_url: resolve_image_url(item.image.as_deref()),
    }
}

pub fn summary_from_ingredient_match(item: FindByIngredientsItem) -> RecipeSummary {
    RecipeSummary {
        id: item.id,
        title: item.title.trim().to_string(),
        image_url: resolve_image_url(item.image.as_deref()),
    }
}

fn ingredient_from_extended(ingredient: ExtendedIngredient) -> IngredientDetailed {
    IngredientDetailed {
        id: ingredient.id,
        name: ingredient.name.trim().to_string(),
        amount: ingredient.amount,
        unit: ingredient.unit.filter(|u| !u.trim().is_empty()),
    }
}

pub fn detail_from_information(info: RecipeInformation) -> RecipeDetailed {
    RecipeDetailed {
        id: info.id,
        title: info.title.trim().to_string(),
        image_url: resolve_image_url(info.image.as_deref()),
        ingredients: info
            .extended_ingredients
            .into_iter()
            .map(ingredient_from_extended)
            .collect(),
        instructions: info.instructions.filter(|s| !s.trim().is_empty()),
        ready_in_minutes: info.ready_in_minutes,
        servings: info.servings,
        cuisines: info.cuisines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_image_url() {
        assert_eq!(
            resolve_image_url(Some("https://example.com/a.jpg")),
            Some("https://example.com/a.jpg".to_string())
        );
        assert_eq!(
            resolve_image_url(Some("pasta-556x370.jpg")),
            Some("https://img.spoonacular.com/recipes/pasta-556x370.jpg".to_string())
        );
        assert_eq!(resolve_image_url(Some("  ")), None);
        assert_eq!(resolve_image_url(None), None);
    }

    #[test]
    fn test_ingredient_match_drops_missing_counts() {
        let item = FindByIngredientsItem {
            id: 42,
            title: " Apple Pie ".to_string(),
            image: None,
            used_ingredient_count: 2,
            missed_ingredient_count: 3,
            missed_ingredients: Vec::new(),
        };

        let summary = summary_from_ingredient_match(item);
        assert_eq!(summary.id, 42);
        assert_eq!(summary.title, "Apple Pie");
        assert_eq!(summary.image_url, None);
    }

    #[test]
    fn test_detail_keeps_ingredient_order() {
        let info = RecipeInformation {
            id: 7,
            title: "Omelette".to_string(),
            image: Some("7-556x370.jpg".to_string()),
            extended_ingredients: vec![
                ExtendedIngredient {
                    id: 1123,
                    name: "egg".to_string(),
                    amount: Some(3.0),
                    unit: Some("".to_string()),
                },
                ExtendedIngredient {
                    id: 1001,
                    name: "butter".to_string(),
                    amount: Some(1.0),
                    unit: Some("tbsp".to_string()),
                },
            ],
            instructions: Some("".to_string()),
            ready_in_minutes: 10,
            servings: 1,
            cuisines: vec!["French".to_string()],
        };

        let detail = detail_from_information(info);
        assert_eq!(detail.ingredients[0].name, "egg");
        assert_eq!(detail.ingredients[0].unit, None);
        assert_eq!(detail.ingredients[1].unit.as_deref(), Some("tbsp"));
        assert_eq!(detail.instructions, None);
        assert_eq!(
            detail.image_url.as_deref(),
            Some("https://img.spoonacular.com/recipes/7-556x370.jpg")
        );
    }
}
