//! Event storage and CRUD.
//!
//! `EventStore` keeps every event in memory, bucketed by date, and writes
//! the whole mapping through to a `KeyValueStore` after each mutation.
//! Mutations are applied to a copy first; the copy replaces the live
//! mapping only once it has been persisted, so a failed write leaves the
//! store exactly as it was.

mod stats;
mod transfer;

pub use stats::Statistics;
pub use transfer::ImportSummary;

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::clock::{Clock, SystemClock};
use crate::constants::DEFAULT_STORAGE_KEY;
use crate::error::{CalendarError, CalendarResult, StorageError};
use crate::event::{Event, EventColor, EventDraft, EventPatch};
use crate::month::YearMonth;
use crate::storage::KeyValueStore;

/// Date-key → events of that day, in display order.
pub type EventMap = BTreeMap<NaiveDate, Vec<Event>>;

pub struct EventStore {
    storage: Box<dyn KeyValueStore>,
    key: String,
    events: EventMap,
    default_color: EventColor,
    clock: Rc<dyn Clock>,
    last_id: i64,
}

impl EventStore {
    /// Load the mapping stored under the default key.
    pub fn load(storage: Box<dyn KeyValueStore>) -> Self {
        Self::load_from(storage, DEFAULT_STORAGE_KEY)
    }

    /// Load the mapping stored under `key`. Missing or unreadable data
    /// yields an empty store.
    pub fn load_from(storage: Box<dyn KeyValueStore>, key: &str) -> Self {
        let mut store = EventStore {
            storage,
            key: key.to_string(),
            events: EventMap::new(),
            default_color: EventColor::default(),
            clock: Rc::new(SystemClock),
            last_id: 0,
        };
        store.reload();
        store
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_default_color(mut self, color: EventColor) -> Self {
        self.default_color = color;
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn default_color(&self) -> EventColor {
        self.default_color
    }

    /// Re-read the mapping from storage, discarding in-memory state.
    pub fn reload(&mut self) {
        self.events = match self.storage.get(&self.key) {
            Ok(Some(json)) => transfer::decode_lenient(&json),
            Ok(None) => EventMap::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not read events, starting empty");
                EventMap::new()
            }
        };
        self.last_id = self
            .events
            .values()
            .flatten()
            .filter_map(|e| e.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        tracing::debug!(days = self.events.len(), events = self.len(), "loaded events");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn events_for_date(&self, date: NaiveDate) -> &[Event] {
        self.events.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn event(&self, date: NaiveDate, id: &str) -> Option<&Event> {
        self.events_for_date(date).iter().find(|e| e.id == id)
    }

    /// Look up an event by id alone, scanning every day.
    pub fn find_by_id(&self, id: &str) -> Option<&Event> {
        self.events.values().flatten().find(|e| e.id == id)
    }

    pub fn has_events(&self, date: NaiveDate) -> bool {
        self.events.contains_key(&date)
    }

    pub fn event_count(&self, date: NaiveDate) -> usize {
        self.events_for_date(date).len()
    }

    /// Buckets falling inside `month`, in date order.
    pub fn events_for_month(&self, month: YearMonth) -> impl Iterator<Item = (NaiveDate, &[Event])> {
        self.events
            .range(month.first_day()..=month.last_day())
            .map(|(date, events)| (*date, events.as_slice()))
    }

    /// Every bucket, in date order.
    pub fn all_events(&self) -> impl Iterator<Item = (NaiveDate, &[Event])> {
        self.events
            .iter()
            .map(|(date, events)| (*date, events.as_slice()))
    }

    /// Total number of events.
    pub fn len(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events whose title or description contains `query`, ignoring case,
    /// ordered by date.
    pub fn search(&self, query: &str) -> Vec<Event> {
        let needle = query.trim().to_lowercase();
        self.events
            .values()
            .flatten()
            .filter(|e| e.matches(&needle))
            .cloned()
            .collect()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_events(&self.events)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn create(&mut self, date: NaiveDate, draft: EventDraft) -> CalendarResult<Event> {
        let now = self.clock.now();
        let event = draft.into_event(self.next_id(), date, self.default_color, now)?;

        let stored = event.clone();
        self.commit(|events| {
            events.entry(date).or_default().push(event);
            Ok(())
        })?;

        tracing::debug!(%date, id = %stored.id, "created event");
        Ok(stored)
    }

    pub fn update(&mut self, date: NaiveDate, id: &str, patch: &EventPatch) -> CalendarResult<Event> {
        let now = self.clock.now();
        let default_color = self.default_color;

        let updated = self.commit(|events| {
            let slot = events
                .get_mut(&date)
                .and_then(|bucket| bucket.iter_mut().find(|e| e.id == id))
                .ok_or_else(|| not_found(date, id))?;

            let updated = patch.apply_to(slot, default_color, now)?;
            *slot = updated.clone();
            Ok(updated)
        })?;

        tracing::debug!(%date, id, "updated event");
        Ok(updated)
    }

    /// Remove an event, dropping its day when it was the last one.
    pub fn delete(&mut self, date: NaiveDate, id: &str) -> CalendarResult<Event> {
        let removed = self.commit(|events| {
            let bucket = events.get_mut(&date).ok_or_else(|| not_found(date, id))?;
            let index = bucket
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| not_found(date, id))?;

            let removed = bucket.remove(index);
            if bucket.is_empty() {
                events.remove(&date);
            }
            Ok(removed)
        })?;

        tracing::debug!(%date, id, "deleted event");
        Ok(removed)
    }

    pub fn clear_all(&mut self) -> CalendarResult<()> {
        self.commit(|events| {
            events.clear();
            Ok(())
        })?;
        tracing::debug!("cleared all events");
        Ok(())
    }

    /// Drop every day before `cutoff`. Returns the number of events removed.
    pub fn purge_before(&mut self, cutoff: NaiveDate) -> CalendarResult<usize> {
        let stale: usize = self.events.range(..cutoff).map(|(_, v)| v.len()).sum();
        if stale == 0 {
            return Ok(0);
        }

        self.commit(|events| {
            *events = events.split_off(&cutoff);
            Ok(())
        })?;

        tracing::info!(%cutoff, removed = stale, "purged old events");
        Ok(stale)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Millisecond timestamp, bumped past the last issued id. Once the
    /// counter is exhausted by a loaded id, the clock alone decides.
    fn next_id(&mut self) -> String {
        let millis = self.clock.now().timestamp_millis();
        self.last_id = match self.last_id.checked_add(1) {
            Some(bumped) => millis.max(bumped),
            None => millis,
        };
        self.last_id.to_string()
    }

    /// Apply `f` to a copy of the mapping, persist the copy, then swap it in.
    fn commit<T>(&mut self, f: impl FnOnce(&mut EventMap) -> CalendarResult<T>) -> CalendarResult<T> {
        let mut next = self.events.clone();
        let out = f(&mut next)?;

        self.persist(&next)?;
        self.events = next;
        Ok(out)
    }

    fn persist(&mut self, events: &EventMap) -> CalendarResult<()> {
        let json = serde_json::to_string(events)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.storage.set(&self.key, &json).map_err(|e| {
            tracing::warn!(key = %self.key, error = %e, "could not persist events");
            CalendarError::from(e)
        })
    }
}

fn not_found(date: NaiveDate, id: &str) -> CalendarError {
    CalendarError::NotFound {
        date,
        id: id.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ValidationError;
    use crate::storage::MemoryStorage;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn test_store() -> EventStore {
        EventStore::load(Box::new(MemoryStorage::new()))
            .with_clock(Rc::new(FixedClock::on(date(2024, 3, 1))))
    }

    /// Accepts reads, refuses every write.
    pub(crate) struct ReadOnlyStorage(pub Option<String>);

    impl KeyValueStore for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.0.clone())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage is disabled".into()))
        }
    }

    #[test]
    fn standup_scenario() {
        let mut store = test_store();
        let day = date(2024, 3, 5);

        let created = store
            .create(day, EventDraft::new("Standup").time("09:00").color("blue"))
            .unwrap();

        let events = store.events_for_date(day);
        assert_eq!(events, std::slice::from_ref(&created));
        assert_eq!(events[0].title, "Standup");
        assert_eq!(events[0].time.as_deref(), Some("09:00"));
        assert_eq!(events[0].color, EventColor::Blue);
        assert_eq!(events[0].date, day);

        let stats = store.statistics();
        assert_eq!(stats.total_events, 1);
        assert_eq!(stats.total_days, 1);
    }

    #[test]
    fn create_appends_in_insertion_order() {
        let mut store = test_store();
        let day = date(2024, 3, 5);

        for title in ["First", "Second", "Third"] {
            store.create(day, EventDraft::new(title)).unwrap();
        }

        let titles: Vec<_> = store.events_for_date(day).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["First", "Second", "Third"]);
    }

    #[test]
    fn ids_are_unique_under_rapid_creation() {
        let mut store = test_store();
        let day = date(2024, 3, 5);

        let a = store.create(day, EventDraft::new("A")).unwrap();
        let b = store.create(day, EventDraft::new("B")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn blank_title_leaves_bucket_unchanged() {
        let mut store = test_store();
        let day = date(2024, 3, 5);
        store.create(day, EventDraft::new("Keep")).unwrap();

        let err = store.create(day, EventDraft::new("   ")).unwrap_err();
        assert!(matches!(err, CalendarError::Validation(ValidationError::EmptyTitle)));
        assert_eq!(store.event_count(day), 1);
    }

    #[test]
    fn oversized_title_rejected_not_truncated() {
        let mut store = test_store();
        let err = store
            .create(date(2024, 3, 5), EventDraft::new("x".repeat(51)))
            .unwrap_err();
        assert!(matches!(
            err,
            CalendarError::Validation(ValidationError::TitleTooLong { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn deleting_last_event_removes_bucket() {
        let mut store = test_store();
        let day = date(2024, 3, 5);
        let a = store.create(day, EventDraft::new("A")).unwrap();
        let b = store.create(day, EventDraft::new("B")).unwrap();

        store.delete(day, &a.id).unwrap();
        assert!(store.has_events(day));

        let removed = store.delete(day, &b.id).unwrap();
        assert_eq!(removed.title, "B");
        assert!(!store.has_events(day));
        assert_eq!(store.all_events().count(), 0);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let mut store = test_store();
        let day = date(2024, 3, 5);
        store.create(day, EventDraft::new("A")).unwrap();

        assert!(matches!(
            store.delete(day, "nope"),
            Err(CalendarError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete(date(2024, 3, 6), "nope"),
            Err(CalendarError::NotFound { .. })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_missing_is_not_found_and_store_unchanged() {
        let mut store = test_store();
        let day = date(2024, 3, 5);
        let event = store.create(day, EventDraft::new("A")).unwrap();

        let patch = EventPatch {
            title: Some("B".into()),
            ..Default::default()
        };
        // Right id, wrong day.
        assert!(matches!(
            store.update(date(2024, 3, 6), &event.id, &patch),
            Err(CalendarError::NotFound { .. })
        ));
        assert_eq!(store.events_for_date(day), std::slice::from_ref(&event));
    }

    #[test]
    fn update_merges_patch() {
        let mut store = test_store();
        let day = date(2024, 3, 5);
        let event = store
            .create(day, EventDraft::new("Review").description("Q1 numbers").color("red"))
            .unwrap();

        let patch = EventPatch {
            time: Some("14:30".into()),
            color: Some("purple".into()),
            ..Default::default()
        };
        let updated = store.update(day, &event.id, &patch).unwrap();

        assert_eq!(updated.title, "Review");
        assert_eq!(updated.description, "Q1 numbers");
        assert_eq!(updated.time.as_deref(), Some("14:30"));
        assert_eq!(updated.color, EventColor::Purple);
        assert!(updated.updated_at.is_some());
        assert_eq!(store.event(day, &event.id), Some(&updated));
    }

    #[test]
    fn update_validates_title() {
        let mut store = test_store();
        let day = date(2024, 3, 5);
        let event = store.create(day, EventDraft::new("Review")).unwrap();

        let patch = EventPatch {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(store.update(day, &event.id, &patch).is_err());
        assert_eq!(store.event(day, &event.id).unwrap().title, "Review");
    }

    #[test]
    fn search_is_case_insensitive_and_date_ordered() {
        let mut store = test_store();
        store
            .create(date(2024, 4, 1), EventDraft::new("Team sync"))
            .unwrap();
        store
            .create(date(2024, 3, 1), EventDraft::new("Lunch").description("with the TEAM"))
            .unwrap();
        store
            .create(date(2024, 3, 2), EventDraft::new("Dentist"))
            .unwrap();

        let results = store.search("team");
        let titles: Vec<_> = results.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Lunch", "Team sync"]);

        assert!(store.search("zzz").is_empty());
        assert_eq!(store.search("  ").len(), 3);
    }

    #[test]
    fn month_and_id_lookups() {
        let mut store = test_store();
        let march = store.create(date(2024, 3, 31), EventDraft::new("End of March")).unwrap();
        store.create(date(2024, 4, 1), EventDraft::new("April fools")).unwrap();

        let month: Vec<_> = store
            .events_for_month(YearMonth::new(2024, 3).unwrap())
            .map(|(d, events)| (d, events.len()))
            .collect();
        assert_eq!(month, [(date(2024, 3, 31), 1)]);

        assert_eq!(store.find_by_id(&march.id).map(|e| e.date), Some(date(2024, 3, 31)));
        assert!(store.find_by_id("missing").is_none());
    }

    #[test]
    fn mutations_persist_and_reload() {
        let mut store = test_store();
        let day = date(2024, 3, 5);
        let event = store.create(day, EventDraft::new("Persisted")).unwrap();

        store.reload();
        assert_eq!(store.events_for_date(day), std::slice::from_ref(&event));

        store.clear_all().unwrap();
        store.reload();
        assert!(store.is_empty());
    }

    #[test]
    fn failed_write_keeps_memory_intact() {
        let seeded = r#"{"2024-03-05":[{"id":"1","title":"Existing","color":"red","date":"2024-03-05","createdAt":"2024-03-01T12:00:00Z"}]}"#;
        let mut store = EventStore::load(Box::new(ReadOnlyStorage(Some(seeded.into()))));
        let day = date(2024, 3, 5);
        assert_eq!(store.len(), 1);

        let err = store.create(day, EventDraft::new("New")).unwrap_err();
        assert!(matches!(err, CalendarError::Storage(_)));
        assert!(matches!(store.delete(day, "1"), Err(CalendarError::Storage(_))));
        assert!(matches!(store.clear_all(), Err(CalendarError::Storage(_))));

        assert_eq!(store.len(), 1);
        assert_eq!(store.events_for_date(day)[0].title, "Existing");
    }

    #[test]
    fn quota_exceeded_is_reported() {
        let storage = MemoryStorage::new().with_quota(16);
        let mut store = EventStore::load(Box::new(storage));

        let err = store.create(date(2024, 3, 5), EventDraft::new("Too big")).unwrap_err();
        assert!(matches!(
            err,
            CalendarError::Storage(StorageError::QuotaExceeded { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_storage_loads_empty() {
        let storage = MemoryStorage::new().with_entry(DEFAULT_STORAGE_KEY, "{not json");
        let store = EventStore::load(Box::new(storage));
        assert!(store.is_empty());
    }

    #[test]
    fn ids_continue_after_reload() {
        let seeded = r#"{"2024-03-05":[{"id":"99999999999999","title":"Future id","date":"2024-03-05"}]}"#;
        let storage = MemoryStorage::new().with_entry(DEFAULT_STORAGE_KEY, seeded);
        let mut store = EventStore::load(Box::new(storage))
            .with_clock(Rc::new(FixedClock::on(date(2024, 3, 1))));

        let event = store.create(date(2024, 3, 5), EventDraft::new("Next")).unwrap();
        assert_eq!(event.id, "100000000000000");
    }

    #[test]
    fn ids_fall_back_to_clock_after_largest_loaded_id() {
        let seeded = r#"{"2024-03-05":[{"id":"9223372036854775807","title":"Max","date":"2024-03-05"}]}"#;
        let storage = MemoryStorage::new().with_entry(DEFAULT_STORAGE_KEY, seeded);
        let clock = FixedClock::on(date(2024, 3, 1));
        let millis = clock.now().timestamp_millis();
        let mut store = EventStore::load(Box::new(storage)).with_clock(Rc::new(clock));

        let first = store.create(date(2024, 3, 5), EventDraft::new("After max")).unwrap();
        let second = store.create(date(2024, 3, 5), EventDraft::new("And again")).unwrap();

        assert_eq!(first.id, millis.to_string());
        assert_eq!(second.id, (millis + 1).to_string());
        assert_eq!(store.event_count(date(2024, 3, 5)), 3);
    }

    #[test]
    fn purge_before_drops_only_older_days() {
        let mut store = test_store();
        store.create(date(2023, 2, 28), EventDraft::new("Old")).unwrap();
        store.create(date(2023, 2, 28), EventDraft::new("Old too")).unwrap();
        store.create(date(2023, 3, 1), EventDraft::new("Boundary")).unwrap();

        assert_eq!(store.purge_before(date(2023, 3, 1)).unwrap(), 2);
        assert_eq!(store.len(), 1);
        assert!(store.has_events(date(2023, 3, 1)));
        assert_eq!(store.purge_before(date(2023, 3, 1)).unwrap(), 0);
    }

    #[test]
    fn default_color_is_configurable() {
        let mut store = test_store().with_default_color(EventColor::Green);
        let event = store.create(date(2024, 3, 5), EventDraft::new("Walk")).unwrap();
        assert_eq!(event.color, EventColor::Green);
    }
}
