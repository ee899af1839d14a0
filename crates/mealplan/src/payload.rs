use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::AsRefStr;

/// Recipe reference nested inside a meal plan entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
}

/// Flat meal plan entry as returned by the upstream API.
///
/// Every field is optional and tolerant of unexpected JSON types: a field with
/// the wrong type reads as absent instead of rejecting the whole entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeal {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub entry_type: Option<String>,
    #[serde(default, rename = "entry_type", deserialize_with = "lenient_string")]
    pub(crate) entry_type_snake: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_recipe")]
    pub recipe: Option<RecipeRef>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recipe_id: Option<String>,
    #[serde(default, rename = "recipe_id", deserialize_with = "lenient_string")]
    pub(crate) recipe_id_snake: Option<String>,
}

impl RawMeal {
    /// Read a meal from an arbitrary JSON value. Non-object values yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            tracing::debug!(kind = json_kind(value), "skipping non-object meal entry");
            return None;
        }

        match RawMeal::deserialize(value) {
            Ok(meal) => Some(meal.merge_spellings()),
            Err(error) => {
                tracing::debug!(%error, "skipping unreadable meal entry");
                None
            }
        }
    }

    /// Fold snake_case keys into their camelCase fields. camelCase wins when both
    /// are readable.
    fn merge_spellings(mut self) -> Self {
        self.entry_type = self.entry_type.or(self.entry_type_snake.take());
        self.recipe_id = self.recipe_id.or(self.recipe_id_snake.take());
        self
    }

    /// The date field, if present and not blank.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref().filter(|date| !date.trim().is_empty())
    }
}

/// Range and link metadata carried by the paginated payload shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadMeta {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total: Option<u64>,
    pub base_url: Option<String>,
}

impl PayloadMeta {
    fn from_object(object: &serde_json::Map<String, Value>) -> Self {
        let base_url = object
            .get("_metadata")
            .and_then(|metadata| metadata.get("mealie_url"))
            .and_then(Value::as_str)
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim_end_matches('/').to_owned());

        Self {
            start_date: object.get("start_date").and_then(string_value),
            end_date: object.get("end_date").and_then(string_value),
            total: object.get("total").and_then(Value::as_u64),
            base_url,
        }
    }
}

/// The three payload shapes the meal plan API is known to return.
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RawPayload {
    /// `{items: [...], total?, start_date?, end_date?, _metadata?}`
    Paginated {
        items: Vec<RawMeal>,
        meta: PayloadMeta,
    },
    /// `[...]`
    Flat(Vec<RawMeal>),
    /// `{date, meals: [...]}`, already grouped into one day.
    SingleDay {
        date: Option<String>,
        meals: Vec<RawMeal>,
        meta: PayloadMeta,
    },
    Unrecognized,
}

impl RawPayload {
    /// Classify a raw JSON payload. Checked in order: an object with an `items`
    /// array, a bare array, then an object carrying both `date` and `meals`.
    pub fn detect(value: &Value) -> Self {
        if let Some(object) = value.as_object() {
            if let Some(items) = object.get("items").and_then(Value::as_array) {
                return RawPayload::Paginated {
                    items: read_meals(items),
                    meta: PayloadMeta::from_object(object),
                };
            }
        }

        if let Some(items) = value.as_array() {
            return RawPayload::Flat(read_meals(items));
        }

        if let Some(object) = value.as_object() {
            if let (Some(date), Some(meals)) = (object.get("date"), object.get("meals")) {
                return RawPayload::SingleDay {
                    date: string_value(date),
                    meals: meals.as_array().map(|m| read_meals(m)).unwrap_or_default(),
                    meta: PayloadMeta::from_object(object),
                };
            }
        }

        tracing::debug!(kind = json_kind(value), "unrecognized meal plan payload");
        RawPayload::Unrecognized
    }

    /// Flat meal records for the shapes that carry them.
    pub fn meals(&self) -> &[RawMeal] {
        match self {
            RawPayload::Paginated { items, .. } => items,
            RawPayload::Flat(items) => items,
            RawPayload::SingleDay { meals, .. } => meals,
            RawPayload::Unrecognized => &[],
        }
    }

    pub fn meta(&self) -> Option<&PayloadMeta> {
        match self {
            RawPayload::Paginated { meta, .. } | RawPayload::SingleDay { meta, .. } => Some(meta),
            RawPayload::Flat(_) | RawPayload::Unrecognized => None,
        }
    }
}

fn read_meals(values: &[Value]) -> Vec<RawMeal> {
    values.iter().filter_map(RawMeal::from_value).collect()
}

fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_value(&value))
}

fn lenient_recipe<'de, D>(deserializer: D) -> Result<Option<RecipeRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }

    Ok(RecipeRef::deserialize(value).ok())
}
