//! Event types.
//!
//! An `Event` is always stored in the bucket of its `date`. Drafts and
//! patches are the caller-facing inputs; both pass through the same title
//! validation before anything is written.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_TITLE_LENGTH;
use crate::error::ValidationError;

/// A personal calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free-form "HH:MM". None means all-day.
    #[serde(
        default,
        deserialize_with = "non_empty_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<String>,
    #[serde(default)]
    pub color: EventColor,
    /// Overwritten with the bucket key whenever a mapping is decoded.
    #[serde(default = "unix_epoch", deserialize_with = "date_prefix")]
    pub date: NaiveDate,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn is_all_day(&self) -> bool {
        self.time.is_none()
    }

    /// Case-insensitive substring match over title and description.
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Input for creating an event.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub time: Option<String>,
    /// Palette name or hex code; unknown values fall back to the default color.
    pub color: Option<String>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>) -> Self {
        EventDraft {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Validate and turn the draft into a stored event.
    pub(crate) fn into_event(
        self,
        id: String,
        date: NaiveDate,
        default_color: EventColor,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        let title = validate_title(&self.title)?;

        Ok(Event {
            id,
            title,
            description: self
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            time: self.time.and_then(|t| normalize_time(&t)),
            color: self
                .color
                .map(|c| EventColor::from_tag_or(&c, default_color))
                .unwrap_or(default_color),
            date,
            created_at: now,
            updated_at: None,
        })
    }
}

/// Partial update of an event. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `Some("")` clears the time, making the event all-day.
    pub time: Option<String>,
    pub color: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.time.is_none()
            && self.color.is_none()
    }

    /// Merge the patch over `event`, validating the resulting title.
    pub(crate) fn apply_to(
        &self,
        event: &Event,
        default_color: EventColor,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        let title = match &self.title {
            Some(t) => validate_title(t)?,
            None => validate_title(&event.title)?,
        };

        let mut updated = event.clone();
        updated.title = title;
        if let Some(description) = &self.description {
            updated.description = description.trim().to_string();
        }
        if let Some(time) = &self.time {
            updated.time = normalize_time(time);
        }
        if let Some(color) = &self.color {
            updated.color = EventColor::from_tag_or(color, default_color);
        }
        updated.updated_at = Some(now);
        Ok(updated)
    }
}

/// Trim a title and check it against the length bound.
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let len = trimmed.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong {
            len,
            max: MAX_TITLE_LENGTH,
        });
    }

    Ok(trimmed.to_string())
}

fn normalize_time(time: &str) -> Option<String> {
    let trimmed = time.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// =============================================================================
// Color palette
// =============================================================================

/// Fixed palette of event colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum EventColor {
    #[default]
    Blue,
    Red,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    Gray,
}

impl EventColor {
    pub const ALL: [EventColor; 8] = [
        EventColor::Blue,
        EventColor::Red,
        EventColor::Green,
        EventColor::Yellow,
        EventColor::Purple,
        EventColor::Orange,
        EventColor::Pink,
        EventColor::Gray,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventColor::Blue => "blue",
            EventColor::Red => "red",
            EventColor::Green => "green",
            EventColor::Yellow => "yellow",
            EventColor::Purple => "purple",
            EventColor::Orange => "orange",
            EventColor::Pink => "pink",
            EventColor::Gray => "gray",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            EventColor::Blue => "#2563eb",
            EventColor::Red => "#dc2626",
            EventColor::Green => "#16a34a",
            EventColor::Yellow => "#ca8a04",
            EventColor::Purple => "#9333ea",
            EventColor::Orange => "#ea580c",
            EventColor::Pink => "#db2777",
            EventColor::Gray => "#6b7280",
        }
    }

    /// Parse a palette name or hex code, falling back to `fallback`.
    pub fn from_tag_or(tag: &str, fallback: EventColor) -> EventColor {
        tag.parse().unwrap_or(fallback)
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        EventColor::ALL
            .into_iter()
            .find(|c| c.name() == tag || c.hex() == tag || (tag == "grey" && *c == EventColor::Gray))
            .ok_or_else(|| {
                format!(
                    "Unknown color '{}'. Available: {}",
                    s,
                    EventColor::ALL.map(EventColor::name).join(", ")
                )
            })
    }
}

impl Serialize for EventColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for EventColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag
            .map(|t| EventColor::from_tag_or(&t, EventColor::default()))
            .unwrap_or_default())
    }
}

// =============================================================================
// Lenient field decoding
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

/// Older exports store ids as JSON numbers.
fn id_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Accepts "2024-03-06" as well as browser timestamps such as
/// "2024-03-06T05:00:00.000Z". Anything else decodes to the epoch.
fn date_prefix<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| s.get(..10))
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .unwrap_or_else(unix_epoch))
}

fn non_empty_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| normalize_time(&v)))
}
