use anyhow::Result;
use monthcal_core::CalendarApp;
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};

pub fn run(app: &CalendarApp, query: &str) -> Result<()> {
    let results = app.store().search(query);

    if results.is_empty() {
        println!("{}", format!("No events matching \"{}\"", query).dimmed());
        return Ok(());
    }

    let mut current = None;
    for event in &results {
        if current != Some(event.date) {
            current = Some(event.date);
            println!("{}", event.date.to_string().bold());
        }
        println!("{}", event.render());
    }

    println!();
    println!(
        "{}",
        format!("{} {}", results.len(), pluralize("result", results.len())).dimmed()
    );

    Ok(())
}
