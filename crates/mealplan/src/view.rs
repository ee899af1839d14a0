use chrono::TimeZone;
use serde::Serialize;

use crate::group::{CalendarDay, NormalizedMeal};
use crate::link::recipe_url;
use crate::planner::{MealPlan, MealPlanner};
use crate::range::DisplayWindow;

/// A meal as the week view shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealView {
    pub meal_type: String,
    pub name: String,
    pub note: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub date: String,
    pub weekday: String,
    pub is_today: bool,
    pub meals: Vec<MealView>,
}

/// Render-ready week: window label plus one entry per produced day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub label: String,
    pub window: DisplayWindow,
    pub days: Vec<DayView>,
}

impl WeekView {
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|day| day.meals.is_empty())
    }
}

impl<Tz: TimeZone> MealPlanner<Tz> {
    /// Build the week view for a computed plan.
    ///
    /// Links use the instance URL from the payload metadata, then `base_url`.
    pub fn week_view(&self, plan: &MealPlan, base_url: Option<&str>) -> WeekView {
        let base_url = plan.base_url.as_deref().or(base_url);
        let window = plan
            .window
            .or_else(|| self.produced_window(&plan.days))
            .unwrap_or_else(|| self.fallback_window());

        let days = plan
            .days
            .iter()
            .map(|day| self.day_view(day, base_url))
            .collect();

        WeekView {
            label: window.label(),
            window,
            days,
        }
    }

    fn produced_window(&self, days: &[CalendarDay]) -> Option<DisplayWindow> {
        let first = days.first()?.day(self.timezone())?;
        let last = days.last()?.day(self.timezone())?;
        DisplayWindow::new(first, last)
    }

    fn day_view(&self, day: &CalendarDay, base_url: Option<&str>) -> DayView {
        let date = day.day(self.timezone());

        DayView {
            date: day.date.clone(),
            weekday: date
                .map(|d| d.format("%A").to_string())
                .unwrap_or_default(),
            is_today: date == Some(self.today()),
            meals: day
                .meals
                .iter()
                .map(|meal| meal_view(meal, base_url))
                .collect(),
        }
    }
}

fn meal_view(meal: &NormalizedMeal, base_url: Option<&str>) -> MealView {
    MealView {
        meal_type: capitalize(&meal.meal_type),
        name: meal.recipe_name.clone(),
        note: meal.text.clone().filter(|text| !text.trim().is_empty()),
        url: recipe_url(meal, base_url),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
