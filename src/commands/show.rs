use anyhow::Result;
use chrono::NaiveDate;
use monthcal_core::{CalendarApp, YearMonth};

use crate::render::{Render, render_day};

pub fn run(
    mut app: CalendarApp,
    month: Option<YearMonth>,
    select: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    if let Some(month) = month {
        app.set_month(month);
    }
    // Selecting a day outside the requested month moves the view to it.
    if let Some(date) = select {
        app.select(date);
    }

    let grid = app.grid();

    if json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        return Ok(());
    }

    println!("{}", grid.render());

    if let Some(date) = app.view().selected_date() {
        println!();
        println!("{}", render_day(date, app.store().events_for_date(date)));
    }

    Ok(())
}
