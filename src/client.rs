use std::time::Duration;

use chrono::{Days, NaiveDate};
use mealweek_mealplan::{DEFAULT_DAYS_AHEAD, RawPayload, day_key};
use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::config::MealieConfig;
use crate::error::MealieError;

/// Meal plan endpoints, newest Mealie releases first.
const HOUSEHOLD_MEALPLANS: &str = "/api/households/mealplans";
const LEGACY_ENDPOINTS: &[&str] = &["/api/meal-plans", "/api/mealplan"];
const CURRENT_USER: &str = "/api/users/self";

/// One meal plan request to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub path: &'static str,
    pub params: Vec<(&'static str, String)>,
}

/// Result of a successful connection check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    pub username: String,
    pub items: usize,
}

#[derive(Debug, Deserialize)]
struct CurrentUser {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Clone)]
pub struct MealieClient {
    base_url: String,
    group_id: Option<String>,
    http: Client,
}

impl MealieClient {
    pub fn new(config: &MealieConfig) -> Result<Self, MealieError> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://"))
            || url::Url::parse(&base_url).is_err()
        {
            return Err(MealieError::InvalidUrl(base_url));
        }

        let token = config.api_token.trim();
        if token.is_empty() {
            return Err(MealieError::MissingToken);
        }

        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| MealieError::InvalidToken)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            group_id: config.group_id.clone().filter(|id| !id.trim().is_empty()),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests to try, in order, for a date range.
    ///
    /// With a group configured, the household endpoint is retried without it before
    /// falling back to the legacy endpoints.
    pub fn attempts(&self, start: NaiveDate, end: NaiveDate) -> Vec<Attempt> {
        let range = vec![("start_date", day_key(start)), ("end_date", day_key(end))];
        let mut scoped = range.clone();
        if let Some(group_id) = &self.group_id {
            scoped.push(("group_id", group_id.clone()));
        }

        let mut attempts = vec![Attempt {
            path: HOUSEHOLD_MEALPLANS,
            params: scoped.clone(),
        }];
        if self.group_id.is_some() {
            attempts.push(Attempt {
                path: HOUSEHOLD_MEALPLANS,
                params: range,
            });
        }
        attempts.extend(LEGACY_ENDPOINTS.iter().map(|&path| Attempt {
            path,
            params: scoped.clone(),
        }));

        attempts
    }

    /// Fetch the raw meal plan payload for `start..=end`.
    ///
    /// The payload is annotated with the instance URL under `_metadata.mealie_url`.
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_meal_plan(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Value, MealieError> {
        let attempts = self.attempts(start, end);

        for attempt in &attempts {
            tracing::debug!(endpoint = attempt.path, params = ?attempt.params, "requesting meal plan");

            let response = self
                .http
                .get(format!("{}{}", self.base_url, attempt.path))
                .query(&attempt.params)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                tracing::debug!(endpoint = attempt.path, "endpoint returned 404, trying next");
                continue;
            }

            let body = response.text().await?;
            if !status.is_success() {
                tracing::warn!(endpoint = attempt.path, %status, "meal plan request failed");
                return Err(MealieError::from_status(status, &body));
            }

            let payload: Value = serde_json::from_str(&body)?;
            tracing::info!(
                endpoint = attempt.path,
                items = RawPayload::detect(&payload).meals().len(),
                "fetched meal plan"
            );

            return Ok(annotate_payload(payload, &self.base_url));
        }

        let mut tried: Vec<String> = attempts.iter().map(|a| a.path.to_string()).collect();
        tried.dedup();
        Err(MealieError::EndpointNotFound(tried))
    }

    /// Verify the token against the current user, then fetch one week of meals.
    pub async fn check_connection(&self, today: NaiveDate) -> Result<ConnectionReport, MealieError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, CURRENT_USER))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(MealieError::from_status(status, &body));
        }

        let user: CurrentUser = serde_json::from_str(&body)?;
        let username = user.username.unwrap_or_else(|| "unknown".to_string());
        tracing::info!(%username, "authentication successful");

        let end = today
            .checked_add_days(Days::new(DEFAULT_DAYS_AHEAD.into()))
            .unwrap_or(today);
        let payload = self.fetch_meal_plan(today, end).await?;

        Ok(ConnectionReport {
            username,
            items: RawPayload::detect(&payload).meals().len(),
        })
    }
}

/// Attach the instance URL to a payload so links can be derived from it.
///
/// Objects gain `_metadata.mealie_url`; a bare array is wrapped as `{items, _metadata}`.
pub fn annotate_payload(payload: Value, base_url: &str) -> Value {
    let base_url = base_url.trim_end_matches('/');

    match payload {
        Value::Object(mut object) => {
            let metadata = object
                .entry("_metadata")
                .or_insert_with(|| Value::Object(Map::new()));
            if !metadata.is_object() {
                *metadata = Value::Object(Map::new());
            }
            if let Some(metadata) = metadata.as_object_mut() {
                metadata.insert("mealie_url".to_string(), Value::from(base_url));
            }
            Value::Object(object)
        }
        Value::Array(items) => json!({
            "items": items,
            "_metadata": {"mealie_url": base_url},
        }),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, token: &str, group_id: Option<&str>) -> MealieConfig {
        MealieConfig {
            url: url.to_string(),
            api_token: token.to_string(),
            group_id: group_id.map(str::to_string),
            timeout_secs: 5,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_validates_url_and_token() {
        assert!(matches!(
            MealieClient::new(&config("mealie.local", "t", None)),
            Err(MealieError::InvalidUrl(_))
        ));
        assert!(matches!(
            MealieClient::new(&config("http://mealie.local", "  ", None)),
            Err(MealieError::MissingToken)
        ));
        assert!(matches!(
            MealieClient::new(&config("http://mealie.local", "bad\ntoken", None)),
            Err(MealieError::InvalidToken)
        ));

        let client = MealieClient::new(&config("http://mealie.local:9000/", "t", None)).unwrap();
        assert_eq!(client.base_url(), "http://mealie.local:9000");
    }

    #[test]
    fn test_attempts_without_group() {
        let client = MealieClient::new(&config("http://mealie.local", "t", None)).unwrap();
        let attempts = client.attempts(ymd(2025, 6, 1), ymd(2025, 6, 8));

        let paths: Vec<&str> = attempts.iter().map(|a| a.path).collect();
        assert_eq!(
            paths,
            vec!["/api/households/mealplans", "/api/meal-plans", "/api/mealplan"]
        );
        assert_eq!(
            attempts[0].params,
            vec![
                ("start_date", "2025-06-01".to_string()),
                ("end_date", "2025-06-08".to_string())
            ]
        );
    }

    #[test]
    fn test_attempts_with_group_retry_without_it() {
        let client = MealieClient::new(&config("http://mealie.local", "t", Some("g1"))).unwrap();
        let attempts = client.attempts(ymd(2025, 6, 1), ymd(2025, 6, 8));

        assert_eq!(attempts.len(), 4);
        assert!(attempts[0].params.contains(&("group_id", "g1".to_string())));
        assert_eq!(attempts[1].path, "/api/households/mealplans");
        assert!(attempts[1].params.iter().all(|(key, _)| *key != "group_id"));
        assert!(attempts[2].params.contains(&("group_id", "g1".to_string())));
    }

    #[test]
    fn test_annotate_object_payload() {
        let payload = json!({"items": [], "_metadata": {"page": 1}});
        let annotated = annotate_payload(payload, "http://mealie.local/");

        assert_eq!(annotated["_metadata"]["mealie_url"], "http://mealie.local");
        assert_eq!(annotated["_metadata"]["page"], 1);
    }

    #[test]
    fn test_annotate_wraps_array() {
        let annotated = annotate_payload(json!([{"date": "2025-06-01"}]), "http://mealie.local");

        assert_eq!(annotated["items"][0]["date"], "2025-06-01");
        assert_eq!(annotated["_metadata"]["mealie_url"], "http://mealie.local");
    }

    #[test]
    fn test_annotate_replaces_bad_metadata() {
        let annotated = annotate_payload(json!({"_metadata": "x"}), "http://mealie.local");
        assert_eq!(annotated["_metadata"]["mealie_url"], "http://mealie.local");
    }
}
