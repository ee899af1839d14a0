use askama::Template;
use mealweek_mealplan::WeekView;

use crate::config::{CardSize, DisplayConfig};

/// Clears the terminal and homes the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Template)]
#[template(path = "week.txt")]
pub struct WeekTemplate<'a> {
    pub week: &'a WeekView,
    pub show_links: bool,
    pub show_notes: bool,
}

impl<'a> WeekTemplate<'a> {
    /// Small cards show names only, medium adds links, large adds notes.
    pub fn new(week: &'a WeekView, card_size: CardSize) -> Self {
        Self {
            week,
            show_links: card_size != CardSize::Small,
            show_notes: card_size == CardSize::Large,
        }
    }
}

pub fn render_week(week: &WeekView, display: &DisplayConfig) -> askama::Result<String> {
    let body = WeekTemplate::new(week, display.card_size).render()?;

    if display.fullscreen {
        return Ok(format!("{CLEAR_SCREEN}{body}"));
    }

    Ok(body)
}
