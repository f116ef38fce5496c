use anyhow::{Result, bail};
use chrono::NaiveDate;
use monthcal_core::{CalendarApp, EventPatch};
use owo_colors::OwoColorize;

pub fn run(
    mut app: CalendarApp,
    date: NaiveDate,
    id: &str,
    title: Option<String>,
    time: Option<String>,
    description: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let patch = EventPatch {
        title,
        description,
        time,
        color,
    };

    if patch.is_empty() {
        bail!("Nothing to change. Pass at least one of --title, --time, --description, --color");
    }

    let event = app.update_event(date, id, &patch)?;

    println!("{}", format!("  Updated: {}", event.title).green());

    Ok(())
}
