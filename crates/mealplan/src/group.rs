use std::collections::HashMap;

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::date::{compare_days, day_key, normalize_date, parse_day};
use crate::payload::{RawMeal, RecipeRef};

pub const DEFAULT_MEAL_TYPE: &str = "meal";
pub const NO_RECIPE: &str = "No recipe";

/// A meal entry with its display fields resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMeal {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub meal_type: String,
    pub title: Option<String>,
    pub text: Option<String>,
    pub recipe: Option<RecipeRef>,
    pub recipe_id: Option<String>,
    pub recipe_name: String,
}

impl From<&RawMeal> for NormalizedMeal {
    fn from(meal: &RawMeal) -> Self {
        let meal_type = non_blank(&meal.entry_type)
            .or_else(|| non_blank(&meal.kind))
            .unwrap_or(DEFAULT_MEAL_TYPE)
            .to_owned();

        let recipe_name = meal
            .recipe
            .as_ref()
            .and_then(|recipe| non_blank(&recipe.name))
            .or_else(|| non_blank(&meal.title))
            .unwrap_or(NO_RECIPE)
            .to_owned();

        Self {
            id: meal.id.clone(),
            meal_type,
            title: meal.title.clone(),
            text: meal.text.clone(),
            recipe: meal.recipe.clone(),
            recipe_id: meal.recipe_id.clone(),
            recipe_name,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// One calendar day and the meals planned on it, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub meals: Vec<NormalizedMeal>,
}

impl CalendarDay {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            meals: Vec::new(),
        }
    }

    pub fn empty(day: NaiveDate) -> Self {
        Self::new(day_key(day))
    }

    /// The calendar day this entry denotes, if its date is readable.
    pub fn day<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        parse_day(&self.date, tz)
    }
}

/// Bucket flat meal records into calendar days, ordered by date.
///
/// Records without a date are dropped. Days whose key could not be parsed keep
/// the raw value and sort after all readable days.
pub fn group_by_day<Tz: TimeZone>(meals: &[RawMeal], tz: &Tz) -> Vec<CalendarDay> {
    let mut days: Vec<CalendarDay> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for meal in meals {
        let Some(raw_date) = meal.date() else {
            tracing::debug!(id = ?meal.id, "skipping meal without a date");
            continue;
        };

        let key = normalize_date(raw_date, tz);
        let slot = *index.entry(key).or_insert_with_key(|key| {
            days.push(CalendarDay::new(key.clone()));
            days.len() - 1
        });

        days[slot].meals.push(NormalizedMeal::from(meal));
    }

    days.sort_by(|a, b| compare_days(&a.date, &b.date, tz));
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn meal(value: serde_json::Value) -> RawMeal {
        RawMeal::from_value(&value).unwrap()
    }

    #[test]
    fn test_meal_type_defaults() {
        let normalized = NormalizedMeal::from(&meal(json!({"date": "2025-06-01"})));
        assert_eq!(normalized.meal_type, "meal");

        let normalized = NormalizedMeal::from(&meal(json!({"type": "lunch"})));
        assert_eq!(normalized.meal_type, "lunch");

        let normalized =
            NormalizedMeal::from(&meal(json!({"entryType": "dinner", "type": "lunch"})));
        assert_eq!(normalized.meal_type, "dinner");
    }

    #[test]
    fn test_recipe_name_precedence() {
        let with_recipe = meal(json!({"title": "Leftovers", "recipe": {"name": "Soup"}}));
        assert_eq!(NormalizedMeal::from(&with_recipe).recipe_name, "Soup");

        let title_only = meal(json!({"title": "Leftovers", "recipe": {"slug": "x"}}));
        assert_eq!(NormalizedMeal::from(&title_only).recipe_name, "Leftovers");

        let blank = meal(json!({"title": "", "text": "eat out"}));
        assert_eq!(NormalizedMeal::from(&blank).recipe_name, "No recipe");
    }

    #[test]
    fn test_group_by_day_orders_by_calendar_date() {
        let meals = vec![
            meal(json!({"date": "2025-1-10", "title": "B"})),
            meal(json!({"date": "2025-1-9", "title": "A"})),
            meal(json!({"date": "not a date", "title": "C"})),
            meal(json!({"date": "2025-01-10T12:00:00", "title": "D"})),
        ];

        let days = group_by_day(&meals, &Utc);
        let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-09", "2025-01-10", "not a date"]);

        let titles: Vec<&str> = days[1].meals.iter().map(|m| m.recipe_name.as_str()).collect();
        assert_eq!(titles, vec!["B", "D"]);
    }

    #[test]
    fn test_group_by_day_skips_missing_dates() {
        let meals = vec![
            meal(json!({"title": "No date"})),
            meal(json!({"date": null, "title": "Null date"})),
            meal(json!({"date": "2025-06-02", "title": "Kept"})),
        ];

        let days = group_by_day(&meals, &Utc);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].meals.len(), 1);
        assert_eq!(days[0].meals[0].recipe_name, "Kept");
    }

    #[test]
    fn test_calendar_day_serializes_camel_case() {
        let mut day = CalendarDay::new("2025-06-02");
        day.meals.push(NormalizedMeal::from(&meal(
            json!({"entryType": "dinner", "recipeId": "r1", "recipe": {"name": "Soup"}}),
        )));

        let value = serde_json::to_value(&day).unwrap();
        assert_eq!(value["date"], "2025-06-02");
        assert_eq!(value["meals"][0]["type"], "dinner");
        assert_eq!(value["meals"][0]["recipeId"], "r1");
        assert_eq!(value["meals"][0]["recipeName"], "Soup");
    }
}
