use anyhow::Result;
use dialoguer::Confirm;
use monthcal_core::CalendarApp;
use owo_colors::OwoColorize;

use crate::render::pluralize;

pub fn run(mut app: CalendarApp, force: bool) -> Result<()> {
    let total = app.store().len();

    if total == 0 {
        println!("{}", "Nothing to clear".dimmed());
        return Ok(());
    }

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete all {} {}?",
                total,
                pluralize("event", total)
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    app.clear_all()?;

    println!("\nCleared {} {}", total, pluralize("event", total));

    Ok(())
}

/// Drop events older than the configured retention.
pub fn clean(mut app: CalendarApp) -> Result<()> {
    let removed = app.purge_expired()?;

    if removed == 0 {
        println!("{}", "Nothing to clean".dimmed());
    } else {
        println!("Removed {} old {}", removed, pluralize("event", removed));
    }

    Ok(())
}
