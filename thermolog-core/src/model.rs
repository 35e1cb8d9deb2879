//! Domain data structures for locations, thermometers, and readings.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identifier for a location known to thermolog.
pub struct LocationId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identifier for a thermometer.
pub struct ThermometerId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identifier for a single stored reading.
pub struct ReadingId(pub i64);

impl fmt::Display for LocationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl fmt::Display for ThermometerId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Entity kinds that can be referenced by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A [`Location`].
    Location,
    /// A [`Thermometer`].
    Thermometer,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Location => "Location",
            EntityKind::Thermometer => "Thermometer",
        };
        write!(formatter, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A named physical place that owns thermometers.
pub struct Location {
    /// Unique identifier assigned by the store.
    pub id: LocationId,
    /// Unique display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A named sensor installed at exactly one location.
pub struct Thermometer {
    /// Unique identifier assigned by the store.
    pub id: ThermometerId,
    /// Display name, not necessarily unique.
    pub name: String,
    /// Owning location.
    pub location_id: LocationId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A single timestamped measurement. Readings are never mutated once stored.
pub struct Reading {
    /// Unique identifier assigned by the store.
    pub id: ReadingId,
    /// Thermometer that produced the value.
    pub thermometer_id: ThermometerId,
    /// Measured temperature.
    pub value: f64,
    /// Instant the reading was recorded.
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
/// Summary over a set of readings.
///
/// Every field is `None` when the set is empty, so "no data" never collides
/// with a real average of `0.0`.
pub struct Stats {
    /// Smallest value.
    pub min: Option<f64>,
    /// Largest value.
    pub max: Option<f64>,
    /// Arithmetic mean.
    pub avg: Option<f64>,
    /// Number of readings.
    pub count: Option<u64>,
}

impl Stats {
    /// Stats for an empty reading set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min: None,
            max: None,
            avg: None,
            count: None,
        }
    }

    /// Whether these stats were computed over zero readings.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Stats scoped to one thermometer.
pub struct ThermometerStats {
    /// Thermometer the stats were computed for.
    pub thermometer_id: ThermometerId,
    /// The summary itself.
    #[serde(flatten)]
    pub stats: Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Stats over every thermometer owned by a location.
pub struct LocationStats {
    /// Location the stats were computed for.
    pub location_id: LocationId,
    /// The summary itself.
    #[serde(flatten)]
    pub stats: Stats,
}
