//! Core types for monthcal.
//!
//! This crate holds everything below the presentation layer:
//! - `EventStore`: date-bucketed events with write-through persistence
//! - `CalendarView`: displayed month, selection and the 42-cell month grid
//! - `CalendarApp`: the single owner of both, with change notifications
//! - `storage`: the key-value backends the store persists to

pub mod app;
pub mod click;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod month;
pub mod storage;
pub mod store;
pub mod view;

pub use app::{Action, CalendarApp, Change, DayIntent};
pub use error::{CalendarError, CalendarResult};
pub use event::{Event, EventColor, EventDraft, EventPatch};
pub use month::YearMonth;
pub use store::EventStore;
pub use view::{CalendarView, GridCell, MonthGrid};
