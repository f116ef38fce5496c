//! Month view state and grid construction.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::rc::Rc;

use crate::clock::{Clock, SystemClock};
use crate::constants::{GRID_DAYS, PREVIEW_COLORS};
use crate::event::EventColor;
use crate::month::YearMonth;
use crate::store::EventStore;

/// One day slot of the month grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub date: NaiveDate,
    pub is_other_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub event_count: usize,
    /// Colors of the first events of the day, in display order.
    pub preview_colors: Vec<EventColor>,
}

impl GridCell {
    /// Events not represented by a preview color.
    pub fn overflow(&self) -> usize {
        self.event_count.saturating_sub(self.preview_colors.len())
    }
}

/// Six weeks of cells, Sunday first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub cells: Vec<GridCell>,
}

impl MonthGrid {
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(7)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.date == date)
    }
}

/// Which month is displayed and which day is selected.
pub struct CalendarView {
    current_month: YearMonth,
    selected_date: Option<NaiveDate>,
    clock: Rc<dyn Clock>,
}

impl Default for CalendarView {
    fn default() -> Self {
        Self::new(Rc::new(SystemClock))
    }
}

impl CalendarView {
    /// Start on the current month with nothing selected.
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        CalendarView {
            current_month: YearMonth::of(clock.today()),
            selected_date: None,
            clock,
        }
    }

    pub fn current_month(&self) -> YearMonth {
        self.current_month
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn set_month(&mut self, month: YearMonth) {
        self.current_month = month;
    }

    pub fn shift_month(&mut self, delta: i32) {
        self.current_month = self.current_month.shift(delta);
    }

    /// Show the current month and select today.
    pub fn go_to_today(&mut self) {
        let today = self.clock.today();
        self.current_month = YearMonth::of(today);
        self.selected_date = Some(today);
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
    }

    pub fn clear_selection(&mut self) {
        self.selected_date = None;
    }

    /// Build the 42-cell grid starting on the Sunday on or before the first
    /// of the month, annotated with events from `store`.
    pub fn build_grid(&self, store: &EventStore) -> MonthGrid {
        let first = self.current_month.first_day();
        // Clamped at the start of chrono's range.
        let start = first
            .checked_sub_days(Days::new(u64::from(first.weekday().num_days_from_sunday())))
            .unwrap_or(NaiveDate::MIN);
        let today = self.clock.today();

        let cells = start
            .iter_days()
            .take(GRID_DAYS)
            .map(|date| {
                let events = store.events_for_date(date);
                GridCell {
                    date,
                    is_other_month: !self.current_month.contains(date),
                    is_today: date == today,
                    is_selected: self.selected_date == Some(date),
                    event_count: events.len(),
                    preview_colors: events.iter().take(PREVIEW_COLORS).map(|e| e.color).collect(),
                }
            })
            .collect();

        MonthGrid {
            month: self.current_month,
            cells,
        }
    }
}
