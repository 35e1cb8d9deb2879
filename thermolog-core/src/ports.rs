//! Traits describing store capabilities and the errors they surface.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{
    EntityKind, Location, LocationId, Reading, Stats, Thermometer, ThermometerId,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors that can occur while talking to a store backend.
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// A foreign key pointed at a row that does not exist.
    #[error("{kind} {id} does not exist")]
    MissingReference {
        /// Kind of the referenced row.
        kind: EntityKind,
        /// Raw id that was referenced.
        id: i64,
    },
    /// Internal backend failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Source of reading timestamps.
///
/// Stores call [`Clock::now`] while holding their write lock, so timestamps
/// never go backwards in insertion order.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock [`Clock`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A fixed instant is a clock that never advances.
impl Clock for DateTime<Utc> {
    fn now(&self) -> DateTime<Utc> {
        *self
    }
}

/// A location to create together with the names of its thermometers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSeed {
    /// Location name.
    pub name: String,
    /// Names of the thermometers to create inside the location.
    pub thermometers: Vec<String>,
}

#[async_trait]
/// Store access for locations.
pub trait LocationPort: Send + Sync {
    /// Look up a location by id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn find_location(&self, id: LocationId) -> Result<Option<Location>, StoreError>;

    /// Insert a new location and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the name is already taken.
    async fn insert_location(&self, name: &str) -> Result<Location, StoreError>;

    /// Insert several locations and their thermometers as one unit.
    ///
    /// Either every row is written or none is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when any name is already taken or repeats
    /// within `seeds`.
    async fn insert_locations_with_thermometers(
        &self,
        seeds: &[LocationSeed],
    ) -> Result<Vec<Location>, StoreError>;

    /// All locations in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn list_locations(&self) -> Result<Vec<Location>, StoreError>;
}

#[async_trait]
/// Store access for thermometers.
pub trait ThermometerPort: Send + Sync {
    /// Look up a thermometer by id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn find_thermometer(&self, id: ThermometerId)
    -> Result<Option<Thermometer>, StoreError>;

    /// Insert a thermometer owned by `location_id`.
    ///
    /// The location check and the insert happen atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingReference`] when the location does not exist.
    async fn insert_thermometer(
        &self,
        name: &str,
        location_id: LocationId,
    ) -> Result<Thermometer, StoreError>;

    /// Every thermometer in the system.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn list_thermometers(&self) -> Result<Vec<Thermometer>, StoreError>;

    /// Thermometers owned by one location.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn list_thermometers_by_location(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<Thermometer>, StoreError>;
}

#[async_trait]
/// Store access for readings and the queries computed over them.
pub trait ReadingPort: Send + Sync {
    /// Append a reading stamped with `clock`.
    ///
    /// The thermometer check, the timestamp and the insert happen atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingReference`] when the thermometer does not exist.
    async fn insert_reading(
        &self,
        thermometer_id: ThermometerId,
        value: f64,
        clock: &dyn Clock,
    ) -> Result<Reading, StoreError>;

    /// One reading per thermometer that has any, the one with the greatest timestamp.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn latest_per_thermometer(&self) -> Result<Vec<Reading>, StoreError>;

    /// At most `limit` readings of one thermometer, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn top_n_by_thermometer_desc(
        &self,
        thermometer_id: ThermometerId,
        limit: NonZeroUsize,
    ) -> Result<Vec<Reading>, StoreError>;

    /// Stats over all readings of one thermometer.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn thermometer_stats(&self, thermometer_id: ThermometerId) -> Result<Stats, StoreError>;

    /// Stats over the union of readings of several thermometers.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    async fn thermometers_stats(
        &self,
        thermometer_ids: &[ThermometerId],
    ) -> Result<Stats, StoreError>;
}
