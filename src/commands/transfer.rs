use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use monthcal_core::CalendarApp;
use owo_colors::OwoColorize;

use crate::render::pluralize;

pub fn export(app: &CalendarApp, output: Option<PathBuf>) -> Result<()> {
    let json = app.store().export()?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let count = app.store().len();
            println!(
                "{}",
                format!(
                    "  Exported {} {} to {}",
                    count,
                    pluralize("event", count),
                    path.display()
                )
                .green()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

pub fn import(mut app: CalendarApp, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let summary = app.import(&json)?;

    println!(
        "{}",
        format!(
            "  Imported {} {} on {} {}",
            summary.events,
            pluralize("event", summary.events),
            summary.days,
            pluralize("day", summary.days)
        )
        .green()
    );
    if summary.replaced_days > 0 {
        println!(
            "  {}",
            format!(
                "{} existing {} replaced",
                summary.replaced_days,
                pluralize("day", summary.replaced_days)
            )
            .dimmed()
        );
    }

    Ok(())
}
