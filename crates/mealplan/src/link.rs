use crate::group::NormalizedMeal;

/// Path of a recipe page on the Mealie web UI, relative to the instance URL.
pub const RECIPE_PATH: &str = "/g/home/r/";

/// Link to the recipe page for a meal.
///
/// The identifier is the first non-blank of `recipe.slug`, `recipe.id` and
/// `recipe_id`. `None` without a base URL or identifier.
pub fn recipe_url(meal: &NormalizedMeal, base_url: Option<&str>) -> Option<String> {
    let base_url = base_url
        .map(|url| url.trim().trim_end_matches('/'))
        .filter(|url| !url.is_empty())?;

    let recipe = meal.recipe.as_ref();
    let identifier = [
        recipe.and_then(|r| r.slug.as_deref()),
        recipe.and_then(|r| r.id.as_deref()),
        meal.recipe_id.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|id| !id.is_empty())?;

    Some(format!(
        "{base_url}{RECIPE_PATH}{}",
        urlencoding::encode(identifier)
    ))
}
