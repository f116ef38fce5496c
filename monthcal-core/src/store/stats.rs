//! Aggregate statistics over the store.

use serde::Serialize;
use std::collections::BTreeMap;

use super::EventMap;
use crate::event::EventColor;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_events: usize,
    pub total_days: usize,
    /// 0.0 for an empty store.
    pub average_events_per_day: f64,
    pub color_distribution: BTreeMap<EventColor, usize>,
    /// Highest count wins; ties go to the color listed first in the palette.
    pub most_used_color: EventColor,
}

impl Statistics {
    pub(super) fn from_events(events: &EventMap) -> Self {
        let mut total_events = 0;
        let mut color_distribution = BTreeMap::new();

        for event in events.values().flatten() {
            total_events += 1;
            *color_distribution.entry(event.color).or_insert(0) += 1;
        }

        let total_days = events.len();
        let average_events_per_day = if total_days > 0 {
            total_events as f64 / total_days as f64
        } else {
            0.0
        };

        let most_used_color = EventColor::ALL
            .into_iter()
            .fold((EventColor::default(), 0), |best, color| {
                let count = color_distribution.get(&color).copied().unwrap_or(0);
                if count > best.1 { (color, count) } else { best }
            })
            .0;

        Statistics {
            total_events,
            total_days,
            average_events_per_day,
            color_distribution,
            most_used_color,
        }
    }
}
