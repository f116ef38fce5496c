use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use dialoguer::Input;
use monthcal_core::{Action, CalendarApp, EventDraft, YearMonth};
use owo_colors::OwoColorize;

use super::add::prompt_optional;
use crate::render::{Render, render_day};

const HELP: &str = "\
  h / <       previous month
  l / >       next month
  t           today
  5           select day 5 of the shown month
  2024-03-05  select a date
  a [title]   add an event to the selected day
  d <id>      delete an event of the selected day
  q           quit";

/// One line of input in the browse loop.
#[derive(Debug, PartialEq)]
enum Command {
    Key(Action),
    Select(NaiveDate),
    Add(Option<String>),
    Delete(String),
    Help,
    Unknown,
}

fn parse_command(input: &str, month: YearMonth) -> Command {
    let input = input.trim();

    if let Some(action) = Action::from_key(input) {
        return Command::Key(action);
    }

    if let Ok(day) = input.parse::<u32>() {
        return match month.first_day().with_day(day) {
            Some(date) => Command::Select(date),
            None => Command::Unknown,
        };
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Command::Select(date);
    }

    let (verb, rest) = match input.split_once(' ') {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (input, ""),
    };

    match (verb, rest) {
        ("a", "") => Command::Add(None),
        ("a", title) => Command::Add(Some(title.to_string())),
        ("d", id) if !id.is_empty() => Command::Delete(id.to_string()),
        ("?" | "help", _) => Command::Help,
        _ => Command::Unknown,
    }
}

pub fn run(mut app: CalendarApp) -> Result<()> {
    let dirty = Rc::new(Cell::new(true));
    let flag = dirty.clone();
    app.subscribe(move |_| flag.set(true));

    println!("{}", "Type ? for help, q to quit".dimmed());

    loop {
        if dirty.replace(false) {
            println!();
            println!("{}", app.grid().render());
            if let Some(date) = app.view().selected_date() {
                println!();
                println!("{}", render_day(date, app.store().events_for_date(date)));
            }
            println!();
        }

        let input: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()?;

        let result = match parse_command(&input, app.view().current_month()) {
            Command::Key(action) => {
                if !app.dispatch(action) {
                    break;
                }
                Ok(())
            }
            Command::Select(date) => {
                app.select(date);
                Ok(())
            }
            Command::Add(title) => add(&mut app, title),
            Command::Delete(id) => delete(&mut app, &id),
            Command::Help => {
                println!("{}", HELP);
                Ok(())
            }
            Command::Unknown => {
                if !input.trim().is_empty() {
                    eprintln!("  {}", format!("Unknown command: {}", input.trim()).red());
                }
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("  {}", e.to_string().red());
        }
    }

    Ok(())
}

fn add(app: &mut CalendarApp, title: Option<String>) -> Result<()> {
    let title = match title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    let mut draft = EventDraft::new(title);
    if let Some(time) = prompt_optional("  Time? (all-day)")? {
        draft = draft.time(time);
    }
    if let Some(color) = prompt_optional("  Color? (default)")? {
        draft = draft.color(color);
    }

    let event = app.add_event(draft)?;
    println!("{}", format!("  Created: {}", event.title).green());
    Ok(())
}

fn delete(app: &mut CalendarApp, id: &str) -> Result<()> {
    let Some(date) = app.view().selected_date() else {
        anyhow::bail!("Select a day first");
    };

    let event = app.delete_event(date, id)?;
    println!("{}", format!("  Deleted: {}", event.title).red());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(parse_command("h", march()), Command::Key(Action::PreviousMonth));
        assert_eq!(parse_command(">", march()), Command::Key(Action::NextMonth));
        assert_eq!(parse_command("q", march()), Command::Key(Action::Dismiss));
    }

    #[test]
    fn day_numbers_select_in_shown_month() {
        assert_eq!(parse_command("5", march()), Command::Select(date(5)));
        assert_eq!(parse_command("31", march()), Command::Select(date(31)));
        assert_eq!(parse_command("32", march()), Command::Unknown);
        assert_eq!(
            parse_command("2024-04-01", march()),
            Command::Select(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
        );
    }

    #[test]
    fn add_and_delete() {
        assert_eq!(parse_command("a", march()), Command::Add(None));
        assert_eq!(
            parse_command("a  Team lunch ", march()),
            Command::Add(Some("Team lunch".into()))
        );
        assert_eq!(parse_command("d 1710", march()), Command::Delete("1710".into()));
        assert_eq!(parse_command("d", march()), Command::Unknown);
    }
}
