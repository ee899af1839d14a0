//! Raw payload through to the rendered week

use chrono::{NaiveDate, Utc};
use mealweek::client::annotate_payload;
use mealweek::config::{CardSize, DisplayConfig};
use mealweek::render::render_week;
use mealweek_mealplan::MealPlanner;
use serde_json::json;

fn planner() -> MealPlanner<Utc> {
    MealPlanner::new(Utc, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()).with_days_ahead(3)
}

#[test]
fn test_annotated_payload_links_to_instance() {
    let payload = annotate_payload(
        json!([
            {"date": "2025-06-02", "entryType": "dinner", "recipe": {"name": "Soup", "slug": "soup"}}
        ]),
        "http://mealie.local:9000/",
    );

    let planner = planner();
    let plan = planner.plan(&payload);
    assert_eq!(plan.base_url.as_deref(), Some("http://mealie.local:9000"));

    let week = planner.week_view(&plan, Some("http://ignored.local"));
    let output = render_week(&week, &DisplayConfig::default()).unwrap();

    assert!(output.contains("Dinner: Soup <http://mealie.local:9000/g/home/r/soup>"));
}

#[test]
fn test_empty_payload_renders_fallback_window() {
    let planner = planner();
    let plan = planner.plan(&json!({"items": []}));
    let week = planner.week_view(&plan, None);

    assert_eq!(week.label, "Jun 1 - Jun 4, 2025");

    let display = DisplayConfig {
        card_size: CardSize::Small,
        ..DisplayConfig::default()
    };
    let output = render_week(&week, &display).unwrap();
    assert!(output.contains("No upcoming meals planned."));
}
