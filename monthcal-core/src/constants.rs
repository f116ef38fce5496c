//! Shared constants.

/// Storage key holding the whole serialized event mapping.
pub const DEFAULT_STORAGE_KEY: &str = "calendar-events";

/// Maximum title length, in characters.
pub const MAX_TITLE_LENGTH: usize = 50;

/// Days in a rendered month grid (six weeks).
pub const GRID_DAYS: usize = 42;

/// Event colors previewed per grid cell.
pub const PREVIEW_COLORS: usize = 3;

/// Window within which a second click counts as a double click.
pub const DOUBLE_CLICK_WINDOW_MS: u64 = 300;

/// Default byte limit of the persistent store (matches browser local storage).
pub const DEFAULT_STORAGE_QUOTA: usize = 5 * 1024 * 1024;
