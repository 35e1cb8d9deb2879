//! High-level service facade over the store ports.

use std::num::NonZeroUsize;

use tracing::{debug, info, warn};

use crate::model::{
    EntityKind, Location, LocationId, LocationStats, Reading, Stats, Thermometer, ThermometerId,
    ThermometerStats,
};
use crate::ports::{LocationSeed, StoreError, SystemClock};
use crate::store::StorePorts;

/// Locations created by [`ThermologService::init_demo_data`].
pub const DEMO_LOCATIONS: [&str; 3] = ["Living Room", "Kitchen", "Basement"];

/// Thermometers created per demo location.
pub const DEMO_THERMOMETERS_PER_LOCATION: u32 = 3;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
/// Errors surfaced to callers of [`ThermologService`].
pub enum ServiceError {
    /// A referenced location or thermometer does not exist.
    #[error("{kind} not found")]
    NotFound {
        /// Kind of the missing entity.
        kind: EntityKind,
        /// Raw id that was looked up.
        id: i64,
    },
    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Malformed input rejected at the boundary.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The store failed for a reason unrelated to the request.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingReference { kind, id } => ServiceError::NotFound { kind, id },
            StoreError::Conflict(message) => ServiceError::Conflict(message),
            StoreError::Internal(_) => ServiceError::Store(err),
        }
    }
}

/// Public entry point for recording readings and querying them.
#[derive(Clone)]
pub struct ThermologService {
    ports: StorePorts,
}

impl ThermologService {
    /// Create a new service bound to the provided store.
    #[must_use]
    pub fn new(ports: StorePorts) -> Self {
        Self { ports }
    }

    /// List every location.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the store fails.
    pub async fn list_locations(&self) -> Result<Vec<Location>, ServiceError> {
        info!("Fetching all locations");
        Ok(self.ports.locations.list_locations().await?)
    }

    /// Fetch one location.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no location has this id.
    pub async fn get_location(&self, id: LocationId) -> Result<Location, ServiceError> {
        info!(location_id = %id, "Fetching location");
        self.require_location(id).await
    }

    /// Create a location.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Conflict`] if the name is already taken.
    pub async fn create_location(&self, name: &str) -> Result<Location, ServiceError> {
        info!(name, "Creating location");
        let location = self.ports.locations.insert_location(name).await?;
        debug!(location_id = %location.id, "Location created");
        Ok(location)
    }

    /// List thermometers, optionally restricted to one location.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if `location_id` is given but unknown.
    pub async fn list_thermometers(
        &self,
        location_id: Option<LocationId>,
    ) -> Result<Vec<Thermometer>, ServiceError> {
        let Some(location_id) = location_id else {
            info!("Fetching all thermometers");
            return Ok(self.ports.thermometers.list_thermometers().await?);
        };

        info!(location_id = %location_id, "Fetching thermometers for location");
        self.require_location(location_id).await?;
        Ok(self
            .ports
            .thermometers
            .list_thermometers_by_location(location_id)
            .await?)
    }

    /// Fetch one thermometer.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no thermometer has this id.
    pub async fn get_thermometer(&self, id: ThermometerId) -> Result<Thermometer, ServiceError> {
        info!(thermometer_id = %id, "Fetching thermometer");
        self.require_thermometer(id).await
    }

    /// Create a thermometer owned by an existing location.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the location does not exist. Nothing
    /// is written in that case.
    pub async fn create_thermometer(
        &self,
        name: &str,
        location_id: LocationId,
    ) -> Result<Thermometer, ServiceError> {
        info!(name, location_id = %location_id, "Creating thermometer");
        self.require_location(location_id).await?;
        let thermometer = self
            .ports
            .thermometers
            .insert_thermometer(name, location_id)
            .await?;
        debug!(thermometer_id = %thermometer.id, "Thermometer created");
        Ok(thermometer)
    }

    /// Record a reading stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the thermometer does not exist. Nothing
    /// is written in that case.
    pub async fn add_reading(
        &self,
        thermometer_id: ThermometerId,
        value: f64,
    ) -> Result<Reading, ServiceError> {
        info!(thermometer_id = %thermometer_id, value, "Adding temperature reading");
        self.require_thermometer(thermometer_id).await?;
        Ok(self
            .ports
            .readings
            .insert_reading(thermometer_id, value, &SystemClock)
            .await?)
    }

    /// Latest reading of every thermometer that has at least one.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the store fails.
    pub async fn latest_readings(&self) -> Result<Vec<Reading>, ServiceError> {
        info!("Fetching latest temperature readings for all thermometers");
        Ok(self.ports.readings.latest_per_thermometer().await?)
    }

    /// Up to `limit` readings of one thermometer, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the thermometer does not exist.
    pub async fn recent_readings(
        &self,
        thermometer_id: ThermometerId,
        limit: NonZeroUsize,
    ) -> Result<Vec<Reading>, ServiceError> {
        info!(thermometer_id = %thermometer_id, limit = limit.get(), "Fetching recent readings");
        self.require_thermometer(thermometer_id).await?;
        Ok(self
            .ports
            .readings
            .top_n_by_thermometer_desc(thermometer_id, limit)
            .await?)
    }

    /// Stats over all readings of one thermometer.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the thermometer does not exist.
    pub async fn thermometer_stats(
        &self,
        thermometer_id: ThermometerId,
    ) -> Result<ThermometerStats, ServiceError> {
        info!(thermometer_id = %thermometer_id, "Fetching stats for thermometer");
        self.require_thermometer(thermometer_id).await?;
        let stats = self.ports.readings.thermometer_stats(thermometer_id).await?;
        Ok(ThermometerStats {
            thermometer_id,
            stats,
        })
    }

    /// Stats over every reading of every thermometer owned by a location.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the location does not exist.
    pub async fn location_stats(
        &self,
        location_id: LocationId,
    ) -> Result<LocationStats, ServiceError> {
        info!(location_id = %location_id, "Fetching stats for location");
        self.require_location(location_id).await?;

        let thermometer_ids: Vec<ThermometerId> = self
            .ports
            .thermometers
            .list_thermometers_by_location(location_id)
            .await?
            .into_iter()
            .map(|thermometer| thermometer.id)
            .collect();

        if thermometer_ids.is_empty() {
            info!(location_id = %location_id, "No thermometers found for location");
            return Ok(LocationStats {
                location_id,
                stats: Stats::empty(),
            });
        }

        let stats = self
            .ports
            .readings
            .thermometers_stats(&thermometer_ids)
            .await?;
        Ok(LocationStats { location_id, stats })
    }

    /// Seed the demo locations, each with a few thermometers.
    ///
    /// All rows are written in one store call; nothing is written on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Conflict`] if a demo location already exists.
    pub async fn init_demo_data(&self) -> Result<Vec<Location>, ServiceError> {
        info!("Initializing demo data");
        let seeds: Vec<LocationSeed> = DEMO_LOCATIONS
            .iter()
            .map(|&location_name| LocationSeed {
                name: location_name.to_owned(),
                thermometers: (1..=DEMO_THERMOMETERS_PER_LOCATION)
                    .map(|number| format!("{location_name} Thermometer {number}"))
                    .collect(),
            })
            .collect();

        let created = self
            .ports
            .locations
            .insert_locations_with_thermometers(&seeds)
            .await?;

        info!(locations = created.len(), "Demo data initialization complete");
        Ok(created)
    }

    async fn require_location(&self, id: LocationId) -> Result<Location, ServiceError> {
        self.ports.locations.find_location(id).await?.ok_or_else(|| {
            warn!(location_id = %id, "Location not found");
            ServiceError::NotFound {
                kind: EntityKind::Location,
                id: id.0,
            }
        })
    }

    async fn require_thermometer(&self, id: ThermometerId) -> Result<Thermometer, ServiceError> {
        self.ports.thermometers.find_thermometer(id).await?.ok_or_else(|| {
            warn!(thermometer_id = %id, "Thermometer not found");
            ServiceError::NotFound {
                kind: EntityKind::Thermometer,
                id: id.0,
            }
        })
    }
}
