use anyhow::Result;
use chrono::NaiveDate;
use monthcal_core::CalendarApp;
use owo_colors::OwoColorize;

pub fn run(mut app: CalendarApp, date: NaiveDate, id: &str) -> Result<()> {
    let event = app.delete_event(date, id)?;

    println!("{}", format!("  Deleted: {}", event.title).red());

    Ok(())
}
