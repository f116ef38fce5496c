//! Export, import and decoding of the serialized mapping.
//!
//! The serialized form is a JSON object of ISO date → array of events, the
//! same shape that is kept in storage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{EventMap, EventStore};
use crate::error::{CalendarError, CalendarResult, StorageError, ValidationError};
use crate::event::{Event, validate_title};

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Days present in the imported data.
    pub days: usize,
    pub events: usize,
    /// Existing days whose events were replaced by the imported ones.
    pub replaced_days: usize,
}

impl EventStore {
    /// The whole mapping as pretty-printed JSON.
    pub fn export(&self) -> CalendarResult<String> {
        serde_json::to_string_pretty(&self.events)
            .map_err(|e| StorageError::Serialization(e.to_string()).into())
    }

    /// Merge exported data into the store.
    ///
    /// Every event is re-validated first; one bad record rejects the whole
    /// payload. Imported days are added to the existing ones, and an
    /// imported day replaces an existing day with the same date.
    pub fn import(&mut self, json: &str) -> CalendarResult<ImportSummary> {
        let incoming = decode_strict(json)?;

        let summary = ImportSummary {
            days: incoming.len(),
            events: incoming.values().map(Vec::len).sum(),
            replaced_days: incoming
                .keys()
                .filter(|date| self.events.contains_key(*date))
                .count(),
        };

        self.commit(|events| {
            events.extend(incoming);
            Ok(())
        })?;

        // Imported ids may be ahead of the clock.
        self.last_id = self
            .events
            .values()
            .flatten()
            .filter_map(|e| e.id.parse::<i64>().ok())
            .fold(self.last_id, i64::max);

        tracing::info!(
            days = summary.days,
            events = summary.events,
            replaced = summary.replaced_days,
            "imported events"
        );
        Ok(summary)
    }
}

/// Decode stored data, skipping whatever does not fit the canonical shape.
/// A bad day or a bad record is dropped on its own; the rest is kept.
pub(super) fn decode_lenient(json: &str) -> EventMap {
    let raw: BTreeMap<String, serde_json::Value> = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "stored events are corrupt, starting empty");
            return EventMap::new();
        }
    };

    let mut events = EventMap::new();
    for (key, bucket) in raw {
        let Some(date) = parse_date_key(&key) else {
            tracing::warn!(key = %key, "skipping events under a non-ISO date key");
            continue;
        };
        let Some(records) = bucket.as_array() else {
            tracing::warn!(%date, "skipping a day whose events are not a list");
            continue;
        };
        let bucket: Vec<Event> = records
            .iter()
            .filter_map(|record| match Event::deserialize(record) {
                Ok(mut event) => {
                    event.date = date;
                    Some(event)
                }
                Err(e) => {
                    tracing::warn!(%date, error = %e, "skipping unreadable event");
                    None
                }
            })
            .collect();
        if !bucket.is_empty() {
            events.insert(date, bucket);
        }
    }
    events
}

/// Decode imported data, rejecting anything invalid.
fn decode_strict(json: &str) -> CalendarResult<EventMap> {
    let raw: BTreeMap<String, Vec<Event>> =
        serde_json::from_str(json).map_err(|e| CalendarError::Import(e.to_string()))?;

    let mut events = EventMap::new();
    for (key, bucket) in raw {
        let date = parse_date_key(&key).ok_or_else(|| {
            CalendarError::Import(format!("'{}' is not a YYYY-MM-DD date", key))
        })?;

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(bucket.len());
        for mut event in bucket {
            if !seen.insert(event.id.clone()) {
                return Err(ValidationError::DuplicateId { date, id: event.id }.into());
            }
            event.title = validate_title(&event.title)?;
            event.date = date;
            normalized.push(event);
        }

        if !normalized.is_empty() {
            events.insert(date, normalized);
        }
    }
    Ok(events)
}

/// Only the canonical `YYYY-MM-DD` form is accepted.
fn parse_date_key(key: &str) -> Option<NaiveDate> {
    if key.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}
