use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::Input;
use monthcal_core::{CalendarApp, EventDraft};
use owo_colors::OwoColorize;

pub fn run(
    mut app: CalendarApp,
    date: NaiveDate,
    title: Option<String>,
    time: Option<String>,
    description: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let interactive = title.is_none();

    let title = match title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    let time = match time {
        Some(t) => Some(t),
        None if interactive => prompt_optional("  Time? (all-day)")?,
        None => None,
    };

    let description = match description {
        Some(d) => Some(d),
        None if interactive => prompt_optional("  Description? (skip)")?,
        None => None,
    };

    let mut draft = EventDraft::new(title);
    if let Some(time) = time {
        draft = draft.time(time);
    }
    if let Some(description) = description {
        draft = draft.description(description);
    }
    if let Some(color) = color {
        draft = draft.color(color);
    }

    app.select(date);
    let event = app.add_event(draft)?;

    if interactive {
        println!();
    }
    println!(
        "{}",
        format!("  Created: {} on {}", event.title, event.date).green()
    );
    println!("  {}", format!("id {}", event.id).dimmed());

    Ok(())
}

/// Prompt that may be left empty.
pub(crate) fn prompt_optional(prompt: &str) -> Result<Option<String>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(String::new())
        .show_default(false)
        .interact_text()?;

    Ok(if input.trim().is_empty() {
        None
    } else {
        Some(input)
    })
}
