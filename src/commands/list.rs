use anyhow::Result;
use chrono::NaiveDate;
use monthcal_core::CalendarApp;
use owo_colors::OwoColorize;

use crate::render::{pluralize, render_day};

pub fn run(app: &CalendarApp, date: NaiveDate) -> Result<()> {
    println!("{}", render_day(date, app.store().events_for_date(date)));
    Ok(())
}

pub fn run_all(app: &CalendarApp) -> Result<()> {
    let store = app.store();

    if store.is_empty() {
        println!("{}", "No events".dimmed());
        return Ok(());
    }

    let days: Vec<String> = store
        .all_events()
        .map(|(date, events)| render_day(date, events))
        .collect();
    println!("{}", days.join("\n\n"));

    let count = store.len();
    println!();
    println!(
        "{}",
        format!("{} {}", count, pluralize("event", count)).dimmed()
    );

    Ok(())
}
