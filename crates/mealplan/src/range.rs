use chrono::{Datelike, Days, NaiveDate, TimeZone};
use serde::Serialize;

use crate::date::parse_day;
use crate::payload::{PayloadMeta, RawMeal};

/// Number of days past today shown when no window can be derived.
pub const DEFAULT_DAYS_AHEAD: u32 = 7;

/// Inclusive range of calendar days to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DisplayWindow {
    /// `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Today through `days_ahead` days forward.
    pub fn fallback(today: NaiveDate, days_ahead: u32) -> Self {
        Self {
            start: default_start(today),
            end: default_end(today, days_ahead),
        }
    }

    /// Days of the window on or after `today`.
    pub fn days_from(&self, today: NaiveDate) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start
            .max(today)
            .iter_days()
            .take_while(move |day| *day <= end)
    }

    /// Human label such as `Jun 1 - Jun 7, 2025`.
    pub fn label(&self) -> String {
        if self.start == self.end {
            return self.start.format("%a, %b %-d, %Y").to_string();
        }

        if self.start.year() == self.end.year() {
            format!(
                "{} - {}",
                self.start.format("%b %-d"),
                self.end.format("%b %-d, %Y")
            )
        } else {
            format!(
                "{} - {}",
                self.start.format("%b %-d, %Y"),
                self.end.format("%b %-d, %Y")
            )
        }
    }
}

/// Window start used when nothing better is known.
pub fn default_start(today: NaiveDate) -> NaiveDate {
    today
}

/// Window end used when nothing better is known.
pub fn default_end(today: NaiveDate, days_ahead: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(days_ahead.into()))
        .unwrap_or(NaiveDate::MAX)
}

/// Determine the display window for a payload.
///
/// Explicit `start_date`/`end_date` metadata wins. Otherwise the window spans the
/// earliest and latest readable record dates. `None` when neither is available.
pub fn resolve_window<Tz: TimeZone>(
    meta: Option<&PayloadMeta>,
    meals: &[RawMeal],
    tz: &Tz,
) -> Option<DisplayWindow> {
    if let Some(window) = meta.and_then(|meta| window_from_meta(meta, tz)) {
        return Some(window);
    }

    let mut days = meals
        .iter()
        .filter_map(RawMeal::date)
        .filter_map(|date| parse_day(date, tz));
    let first = days.next()?;
    let (start, end) = days.fold((first, first), |(start, end), day| {
        (start.min(day), end.max(day))
    });

    Some(DisplayWindow { start, end })
}

fn window_from_meta<Tz: TimeZone>(meta: &PayloadMeta, tz: &Tz) -> Option<DisplayWindow> {
    let start = parse_day(meta.start_date.as_deref()?, tz)?;
    let end = parse_day(meta.end_date.as_deref()?, tz)?;

    let window = DisplayWindow::new(start, end);
    if window.is_none() {
        tracing::debug!(%start, %end, "ignoring inverted metadata range");
    }
    window
}
