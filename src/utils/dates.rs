//! Day arguments accepted on the command line.

use chrono::{Duration, Local, NaiveDate};

/// Parse YYYY-MM-DD, or "today" / "tomorrow" / "yesterday".
pub fn parse_day(input: &str) -> Result<NaiveDate, String> {
    parse_day_relative(input, Local::now().date_naive())
}

fn parse_day_relative(input: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    match input.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => Ok(today + Duration::days(1)),
        "yesterday" => Ok(today - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date '{}'. Expected YYYY-MM-DD", input)),
    }
}
