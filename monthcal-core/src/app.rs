//! Top-level application object.
//!
//! `CalendarApp` owns the one `EventStore` and the one `CalendarView` of a
//! session and is the only place that mutates them. Presentation code
//! subscribes to `Change` notifications and re-renders from `grid()`.

use chrono::NaiveDate;
use std::rc::Rc;
use std::time::Instant;

use crate::click::{ClickDebouncer, ClickOutcome};
use crate::clock::{Clock, SystemClock};
use crate::config::MonthcalConfig;
use crate::error::{CalendarError, CalendarResult};
use crate::event::{Event, EventDraft, EventPatch};
use crate::month::YearMonth;
use crate::store::{EventStore, ImportSummary};
use crate::view::{CalendarView, MonthGrid};

/// What changed after a successful operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Month(YearMonth),
    Selection(Option<NaiveDate>),
    /// Events of one day changed.
    Events(NaiveDate),
    /// Events of any number of days changed.
    AllEvents,
}

/// Navigation commands bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PreviousMonth,
    NextMonth,
    Today,
    Dismiss,
}

impl Action {
    /// Map a key name to an action.
    pub fn from_key(key: &str) -> Option<Action> {
        match key {
            "ArrowLeft" | "Left" | "h" | "<" => Some(Action::PreviousMonth),
            "ArrowRight" | "Right" | "l" | ">" => Some(Action::NextMonth),
            "Home" | " " | "Space" | "t" => Some(Action::Today),
            "Escape" | "Esc" | "q" => Some(Action::Dismiss),
            _ => None,
        }
    }
}

/// What a resolved click on a day asks the presentation layer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayIntent {
    /// Single click: the day is selected; show its events.
    Select(NaiveDate),
    /// Double click: the day is selected; open the add-event form.
    Add(NaiveDate),
}

type Listener = Box<dyn FnMut(&Change)>;

pub struct CalendarApp {
    store: EventStore,
    view: CalendarView,
    clicks: ClickDebouncer<NaiveDate>,
    config: Option<MonthcalConfig>,
    listeners: Vec<Listener>,
}

impl CalendarApp {
    pub fn new(store: EventStore, view: CalendarView) -> Self {
        CalendarApp {
            store,
            view,
            clicks: ClickDebouncer::default(),
            config: None,
            listeners: Vec::new(),
        }
    }

    /// Build the app from configuration, backed by file storage.
    pub fn from_config(config: &MonthcalConfig) -> CalendarResult<Self> {
        Self::from_config_with_clock(config, Rc::new(SystemClock))
    }

    pub fn from_config_with_clock(config: &MonthcalConfig, clock: Rc<dyn Clock>) -> CalendarResult<Self> {
        let store = EventStore::load_from(Box::new(config.storage()), &config.storage_key)
            .with_default_color(config.default_color()?)
            .with_clock(clock.clone());
        let view = CalendarView::new(clock);

        let mut app = Self::new(store, view);
        app.clicks = ClickDebouncer::new(config.double_click_window()?);
        app.config = Some(config.clone());
        Ok(app)
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    pub fn grid(&self) -> MonthGrid {
        self.view.build_grid(&self.store)
    }

    /// Register a callback run after every successful state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&Change) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, change: Change) {
        for listener in &mut self.listeners {
            listener(&change);
        }
    }

    // =========================================================================
    // View
    // =========================================================================

    pub fn set_month(&mut self, month: YearMonth) {
        self.view.set_month(month);
        self.notify(Change::Month(month));
    }

    pub fn navigate(&mut self, delta: i32) {
        self.view.shift_month(delta);
        self.notify(Change::Month(self.view.current_month()));
    }

    pub fn go_to_today(&mut self) {
        self.view.go_to_today();
        self.notify(Change::Month(self.view.current_month()));
        self.notify(Change::Selection(self.view.selected_date()));
    }

    /// Select a day, showing its month if it lies outside the current one.
    pub fn select(&mut self, date: NaiveDate) {
        self.view.select(date);
        if !self.view.current_month().contains(date) {
            self.set_month(YearMonth::of(date));
        }
        self.notify(Change::Selection(Some(date)));
    }

    pub fn clear_selection(&mut self) {
        self.view.clear_selection();
        self.notify(Change::Selection(None));
    }

    /// Run a key-bound action. Returns false for `Dismiss`, which the
    /// presentation layer handles.
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::PreviousMonth => self.navigate(-1),
            Action::NextMonth => self.navigate(1),
            Action::Today => self.go_to_today(),
            Action::Dismiss => return false,
        }
        true
    }

    /// Feed a click on a day. A double click resolves immediately; single
    /// clicks resolve through `poll_clicks`, or right away when a click on
    /// another day flushes them.
    pub fn click_day(&mut self, date: NaiveDate, at: Instant) -> Option<DayIntent> {
        match self.clicks.click(date, at) {
            ClickOutcome::Double(date) => {
                self.select(date);
                Some(DayIntent::Add(date))
            }
            ClickOutcome::Scheduled { fired: Some(earlier) } => {
                self.select(earlier);
                Some(DayIntent::Select(earlier))
            }
            ClickOutcome::Scheduled { fired: None } => None,
        }
    }

    pub fn poll_clicks(&mut self, now: Instant) -> Option<DayIntent> {
        let date = self.clicks.poll(now)?;
        self.select(date);
        Some(DayIntent::Select(date))
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Add an event on the selected day.
    pub fn add_event(&mut self, draft: EventDraft) -> CalendarResult<Event> {
        let date = self.view.selected_date().ok_or(CalendarError::NoDateSelected)?;
        self.add_event_on(date, draft)
    }

    pub fn add_event_on(&mut self, date: NaiveDate, draft: EventDraft) -> CalendarResult<Event> {
        let event = self.store.create(date, draft)?;
        self.notify(Change::Events(date));
        Ok(event)
    }

    pub fn update_event(&mut self, date: NaiveDate, id: &str, patch: &EventPatch) -> CalendarResult<Event> {
        let event = self.store.update(date, id, patch)?;
        self.notify(Change::Events(date));
        Ok(event)
    }

    pub fn delete_event(&mut self, date: NaiveDate, id: &str) -> CalendarResult<Event> {
        let event = self.store.delete(date, id)?;
        self.notify(Change::Events(date));
        Ok(event)
    }

    pub fn clear_all(&mut self) -> CalendarResult<()> {
        self.store.clear_all()?;
        self.notify(Change::AllEvents);
        Ok(())
    }

    pub fn import(&mut self, json: &str) -> CalendarResult<ImportSummary> {
        let summary = self.store.import(json)?;
        self.notify(Change::AllEvents);
        Ok(summary)
    }

    /// Apply the configured retention policy. Without one, nothing is
    /// removed.
    pub fn purge_expired(&mut self) -> CalendarResult<usize> {
        let Some(config) = &self.config else {
            return Ok(0);
        };
        let Some(cutoff) = config.retention_cutoff(self.view.today())? else {
            return Ok(0);
        };

        let removed = self.store.purge_before(cutoff)?;
        if removed > 0 {
            self.notify(Change::AllEvents);
        }
        Ok(removed)
    }
}
