use std::collections::HashMap;

use chrono::{Days, NaiveDate, TimeZone};

use crate::date::day_key;
use crate::group::CalendarDay;
use crate::range::DisplayWindow;

/// Days past today the filler will synthesize. Later window days are cut off.
pub const MAX_FILL_DAYS: u64 = 366;

/// True when the day is readable and not before `today`.
pub fn is_upcoming<Tz: TimeZone>(day: &CalendarDay, today: NaiveDate, tz: &Tz) -> bool {
    day.day(tz).is_some_and(|day| day >= today)
}

/// Drop every day before `today`, along with days whose date cannot be read.
pub fn retain_upcoming<Tz: TimeZone>(
    mut days: Vec<CalendarDay>,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<CalendarDay> {
    days.retain(|day| is_upcoming(day, today, tz));
    days
}

/// Lay grouped days out over the display window, one entry per calendar day.
///
/// Days in the window without meals are synthesized empty. Without a window the
/// grouped days are only filtered, no gaps are filled.
pub fn fill_calendar<Tz: TimeZone>(
    window: Option<&DisplayWindow>,
    groups: Vec<CalendarDay>,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<CalendarDay> {
    let Some(window) = window else {
        return retain_upcoming(groups, today, tz);
    };

    let mut by_day: HashMap<NaiveDate, CalendarDay> = HashMap::with_capacity(groups.len());
    for group in groups {
        let Some(day) = group.day(tz) else {
            continue;
        };

        match by_day.get_mut(&day) {
            Some(existing) => existing.meals.extend(group.meals),
            None => {
                by_day.insert(day, group);
            }
        }
    }

    let horizon = today
        .checked_add_days(Days::new(MAX_FILL_DAYS))
        .unwrap_or(NaiveDate::MAX);
    if window.end > horizon {
        tracing::warn!(
            end = %window.end,
            %horizon,
            "display window ends past the fill horizon, truncating"
        );
    }

    let days = window
        .days_from(today)
        .take_while(|day| *day <= horizon)
        .map(|day| {
            by_day
                .remove(&day)
                .map(|group| CalendarDay {
                    date: day_key(day),
                    meals: group.meals,
                })
                .unwrap_or_else(|| CalendarDay::empty(day))
        })
        .collect();

    retain_upcoming(days, today, tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day_with_meal(date: &str, name: &str) -> CalendarDay {
        let mut day = CalendarDay::new(date);
        day.meals.push(crate::group::NormalizedMeal::from(
            &crate::payload::RawMeal {
                date: Some(date.to_owned()),
                title: Some(name.to_owned()),
                ..Default::default()
            },
        ));
        day
    }

    fn dates(days: &[CalendarDay]) -> Vec<&str> {
        days.iter().map(|d| d.date.as_str()).collect()
    }

    #[test]
    fn test_fill_synthesizes_missing_days() {
        let window = DisplayWindow::new(ymd(2025, 6, 1), ymd(2025, 6, 4)).unwrap();
        let groups = vec![day_with_meal("2025-06-03", "Tacos")];

        let days = fill_calendar(Some(&window), groups, ymd(2025, 6, 1), &Utc);

        assert_eq!(
            dates(&days),
            vec!["2025-06-01", "2025-06-02", "2025-06-03", "2025-06-04"]
        );
        assert!(days[0].meals.is_empty());
        assert_eq!(days[2].meals[0].recipe_name, "Tacos");
    }

    #[test]
    fn test_fill_excludes_past_days() {
        let window = DisplayWindow::new(ymd(2025, 6, 1), ymd(2025, 6, 4)).unwrap();
        let groups = vec![
            day_with_meal("2025-06-01", "Old"),
            day_with_meal("2025-06-04", "New"),
        ];

        let days = fill_calendar(Some(&window), groups, ymd(2025, 6, 3), &Utc);

        assert_eq!(dates(&days), vec!["2025-06-03", "2025-06-04"]);
        assert_eq!(days[1].meals[0].recipe_name, "New");
    }

    #[test]
    fn test_fill_stops_at_horizon() {
        let window = DisplayWindow::new(ymd(2025, 6, 2), ymd(2999, 1, 1)).unwrap();
        let groups = vec![
            day_with_meal("2025-06-02", "Soup"),
            day_with_meal("2999-01-01", "Typo"),
        ];

        let days = fill_calendar(Some(&window), groups, ymd(2025, 6, 1), &Utc);

        assert_eq!(days.len(), MAX_FILL_DAYS as usize);
        assert_eq!(days[0].date, "2025-06-02");
        assert_eq!(days[0].meals[0].recipe_name, "Soup");
        assert_eq!(days.last().map(|d| d.date.as_str()), Some("2026-06-02"));
        assert!(days.iter().all(|d| d.meals.iter().all(|m| m.recipe_name != "Typo")));
    }

    #[test]
    fn test_fill_drops_groups_outside_window() {
        let window = DisplayWindow::new(ymd(2025, 6, 1), ymd(2025, 6, 2)).unwrap();
        let groups = vec![day_with_meal("2025-06-09", "Later")];

        let days = fill_calendar(Some(&window), groups, ymd(2025, 6, 1), &Utc);
        assert_eq!(dates(&days), vec!["2025-06-01", "2025-06-02"]);
        assert!(days.iter().all(|d| d.meals.is_empty()));
    }

    #[test]
    fn test_fill_matches_by_calendar_date() {
        let window = DisplayWindow::new(ymd(2025, 6, 1), ymd(2025, 6, 1)).unwrap();
        let groups = vec![day_with_meal("2025-6-1", "Drifted")];

        let days = fill_calendar(Some(&window), groups, ymd(2025, 6, 1), &Utc);
        assert_eq!(dates(&days), vec!["2025-06-01"]);
        assert_eq!(days[0].meals[0].recipe_name, "Drifted");
    }

    #[test]
    fn test_fill_without_window_only_filters() {
        let groups = vec![
            day_with_meal("2025-05-30", "Past"),
            day_with_meal("2025-06-02", "Soon"),
            day_with_meal("2025-06-05", "Later"),
            day_with_meal("unknown", "Lost"),
        ];

        let days = fill_calendar(None, groups, ymd(2025, 6, 1), &Utc);
        assert_eq!(dates(&days), vec!["2025-06-02", "2025-06-05"]);
    }

    #[test]
    fn test_retain_upcoming_is_idempotent() {
        let today = ymd(2025, 6, 2);
        let days = vec![
            day_with_meal("2025-06-01", "a"),
            day_with_meal("2025-06-02", "b"),
            CalendarDay::new(""),
            day_with_meal("2025-06-03", "c"),
        ];

        let once = retain_upcoming(days, today, &Utc);
        let twice = retain_upcoming(once.clone(), today, &Utc);
        assert_eq!(once, twice);
        assert_eq!(dates(&once), vec!["2025-06-02", "2025-06-03"]);
    }
}
