use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde_json::Value;

use crate::calendar::{fill_calendar, retain_upcoming};
use crate::date::{normalize_date, parse_day};
use crate::group::{CalendarDay, NormalizedMeal, group_by_day};
use crate::payload::{RawMeal, RawPayload};
use crate::range::{DEFAULT_DAYS_AHEAD, DisplayWindow, resolve_window};

/// Result of one pipeline run over a raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealPlan {
    pub window: Option<DisplayWindow>,
    pub days: Vec<CalendarDay>,
    /// Mealie instance URL carried in the payload metadata.
    pub base_url: Option<String>,
}

/// Turns raw meal plan payloads into ordered calendar days.
///
/// "Today" and the timezone are fixed at construction, so every run on the same
/// planner sees the same reference day.
#[derive(Debug, Clone)]
pub struct MealPlanner<Tz: TimeZone> {
    tz: Tz,
    today: NaiveDate,
    days_ahead: u32,
}

impl MealPlanner<Local> {
    /// Planner for the system timezone, with today read from the wall clock once.
    pub fn local() -> Self {
        Self::at(Local::now())
    }
}

impl<Tz: TimeZone> MealPlanner<Tz> {
    pub fn new(tz: Tz, today: NaiveDate) -> Self {
        Self {
            tz,
            today,
            days_ahead: DEFAULT_DAYS_AHEAD,
        }
    }

    /// Planner whose today is the calendar day of `now` in its own timezone.
    pub fn at(now: DateTime<Tz>) -> Self {
        Self::new(now.timezone(), now.date_naive())
    }

    pub fn with_days_ahead(mut self, days_ahead: u32) -> Self {
        self.days_ahead = days_ahead;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn days_ahead(&self) -> u32 {
        self.days_ahead
    }

    /// Window used when neither the payload nor its records yield one.
    pub fn fallback_window(&self) -> DisplayWindow {
        DisplayWindow::fallback(self.today, self.days_ahead)
    }

    /// Run the full pipeline over a raw payload.
    pub fn plan(&self, payload: &Value) -> MealPlan {
        let payload = RawPayload::detect(payload);
        let base_url = payload.meta().and_then(|meta| meta.base_url.clone());

        let (window, days) = match &payload {
            RawPayload::SingleDay { date, meals, .. } => self.single_day(date.as_deref(), meals),
            RawPayload::Paginated { items, meta } => {
                let window = resolve_window(Some(meta), items, &self.tz);
                (window, self.fill(window.as_ref(), items))
            }
            RawPayload::Flat(items) => {
                let window = resolve_window(None, items, &self.tz);
                (window, self.fill(window.as_ref(), items))
            }
            RawPayload::Unrecognized => (None, Vec::new()),
        };

        let days = retain_upcoming(days, self.today, &self.tz);
        let shape: &str = payload.as_ref();
        tracing::debug!(
            shape,
            meals = payload.meals().len(),
            days = days.len(),
            today = %self.today,
            "meal plan normalized"
        );

        MealPlan {
            window,
            days,
            base_url,
        }
    }

    /// The calendar days for a raw payload.
    pub fn calendar(&self, payload: &Value) -> Vec<CalendarDay> {
        self.plan(payload).days
    }

    fn fill(
        &self,
        window: Option<&DisplayWindow>,
        items: &[RawMeal],
    ) -> Vec<CalendarDay> {
        let groups = group_by_day(items, &self.tz);
        fill_calendar(window, groups, self.today, &self.tz)
    }

    fn single_day(
        &self,
        date: Option<&str>,
        meals: &[RawMeal],
    ) -> (Option<DisplayWindow>, Vec<CalendarDay>) {
        let Some(date) = date.filter(|date| !date.trim().is_empty()) else {
            tracing::debug!("single day payload without a date");
            return (None, Vec::new());
        };

        let day = CalendarDay {
            date: normalize_date(date, &self.tz),
            meals: meals.iter().map(NormalizedMeal::from).collect(),
        };
        let window = parse_day(date, &self.tz).and_then(|d| DisplayWindow::new(d, d));

        (window, vec![day])
    }
}
