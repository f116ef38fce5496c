//! TUI rendering traits for monthcal types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to monthcal-core types using owo_colors.

use monthcal_core::{Event, EventColor, GridCell, MonthGrid};
use owo_colors::{AnsiColors, OwoColorize, Style};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

fn ansi(color: EventColor) -> AnsiColors {
    match color {
        EventColor::Blue => AnsiColors::Blue,
        EventColor::Red => AnsiColors::Red,
        EventColor::Green => AnsiColors::Green,
        EventColor::Yellow => AnsiColors::Yellow,
        EventColor::Purple => AnsiColors::Magenta,
        EventColor::Orange => AnsiColors::BrightRed,
        EventColor::Pink => AnsiColors::BrightMagenta,
        EventColor::Gray => AnsiColors::BrightBlack,
    }
}

impl Render for EventColor {
    fn render(&self) -> String {
        "●".color(ansi(*self)).to_string()
    }
}

impl Render for Event {
    /// One line: time, colored dot, title, description, id.
    fn render(&self) -> String {
        let time = match &self.time {
            Some(t) => format!("{:>7}", t),
            None => "all-day".to_string(),
        };

        let mut line = format!("  {} {} {}", time, self.color.render(), self.title);
        if !self.description.is_empty() {
            line.push_str(&format!(" {}", format!("- {}", self.description).dimmed()));
        }
        line.push_str(&format!(" {}", format!("[{}]", self.id).dimmed()));
        line
    }
}

/// Width of one day column: day number, three markers, overflow sign, gap.
const CELL_WIDTH: usize = 7;

impl Render for GridCell {
    fn render(&self) -> String {
        let mut style = Style::new();
        if self.is_other_month {
            style = style.dimmed();
        }
        if self.is_today {
            style = style.bold().underline();
        }
        if self.is_selected {
            style = style.reversed();
        }

        let day = format!("{:>2}", chrono::Datelike::day(&self.date));
        let mut cell = day.style(style).to_string();

        for color in &self.preview_colors {
            cell.push_str(&"•".color(ansi(*color)).to_string());
        }
        for _ in self.preview_colors.len()..3 {
            cell.push(' ');
        }

        if self.overflow() > 0 {
            cell.push_str(&"+".dimmed().to_string());
        } else {
            cell.push(' ');
        }
        cell.push(' ');
        cell
    }
}

impl Render for MonthGrid {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        let width = CELL_WIDTH * 7;
        lines.push(format!("{:^width$}", self.month.label()).bold().to_string());

        let header: String = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
            .iter()
            .map(|d| format!("{:<CELL_WIDTH$}", d))
            .collect();
        lines.push(header.dimmed().to_string());

        for week in self.weeks() {
            lines.push(week.iter().map(Render::render).collect());
        }

        lines.join("\n")
    }
}

/// Events of one day under a date heading.
pub fn render_day(date: chrono::NaiveDate, events: &[Event]) -> String {
    let mut lines = vec![date.format("%A, %B %-d, %Y").to_string().bold().to_string()];

    if events.is_empty() {
        lines.push(format!("  {}", "No events".dimmed()));
    } else {
        lines.extend(events.iter().map(Render::render));
    }

    lines.join("\n")
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn cell(count: usize, colors: Vec<EventColor>) -> GridCell {
        GridCell {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            is_other_month: false,
            is_today: false,
            is_selected: false,
            event_count: count,
            preview_colors: colors,
        }
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut in_escape = false;
        for c in s.chars() {
            match (in_escape, c) {
                (false, '\x1b') => in_escape = true,
                (true, 'm') => in_escape = false,
                (false, c) => out.push(c),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn cells_have_fixed_width() {
        let empty = strip_ansi(&cell(0, vec![]).render());
        let busy = strip_ansi(&cell(5, vec![EventColor::Red; 3]).render());

        assert_eq!(empty.chars().count(), CELL_WIDTH);
        assert_eq!(busy.chars().count(), CELL_WIDTH);
        assert_eq!(busy, " 5•••+ ");
    }

    #[test]
    fn event_line_shows_time_or_all_day() {
        let mut event = Event {
            id: "1".into(),
            title: "Standup".into(),
            description: String::new(),
            time: Some("09:00".into()),
            color: EventColor::Blue,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            created_at: Utc::now(),
            updated_at: None,
        };
        assert!(strip_ansi(&event.render()).contains("  09:00 ● Standup [1]"));

        event.time = None;
        assert!(strip_ansi(&event.render()).contains("all-day ● Standup"));
    }

    #[test]
    fn pluralizes() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 2), "events");
    }
}
