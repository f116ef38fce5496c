use anyhow::Result;
use monthcal_core::CalendarApp;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(app: &CalendarApp, json: bool) -> Result<()> {
    let stats = app.store().statistics();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Statistics".bold());
    println!("  Events:        {}", stats.total_events);
    println!("  Days:          {}", stats.total_days);
    println!("  Per day:       {:.1}", stats.average_events_per_day);
    println!(
        "  Most used:     {} {}",
        stats.most_used_color.render(),
        stats.most_used_color
    );

    if !stats.color_distribution.is_empty() {
        println!();
        println!("{}", "Colors".bold());
        for (color, count) in &stats.color_distribution {
            println!("  {} {:<8} {}", color.render(), color.to_string(), count);
        }
    }

    Ok(())
}
