//! Store backend that keeps every table in process memory.
//!
//! Rows live in flat tables keyed by id and reference each other only through
//! foreign-key ids. All tables sit behind one lock, so each port call is a
//! single atomic unit and foreign-key checks cannot race with the insert they
//! guard. Batch inserts validate every row before writing the first one.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use thermolog_core::{
    aggregate,
    model::{
        EntityKind, Location, LocationId, Reading, ReadingId, Stats, Thermometer, ThermometerId,
    },
    ports::{Clock, LocationPort, LocationSeed, ReadingPort, StoreError, ThermometerPort},
    store::StorePorts,
};

#[derive(Debug, Default)]
struct Tables {
    locations: BTreeMap<LocationId, Location>,
    thermometers: BTreeMap<ThermometerId, Thermometer>,
    readings: BTreeMap<ReadingId, Reading>,
    last_location_id: i64,
    last_thermometer_id: i64,
    last_reading_id: i64,
}

impl Tables {
    fn location_name_taken(&self, name: &str) -> bool {
        self.locations.values().any(|location| location.name == name)
    }

    fn add_location(&mut self, name: &str) -> Location {
        self.last_location_id += 1;
        let location = Location {
            id: LocationId(self.last_location_id),
            name: name.to_owned(),
        };
        self.locations.insert(location.id, location.clone());
        debug!(location_id = %location.id, "Inserted location row");
        location
    }

    fn add_thermometer(&mut self, name: &str, location_id: LocationId) -> Thermometer {
        self.last_thermometer_id += 1;
        let thermometer = Thermometer {
            id: ThermometerId(self.last_thermometer_id),
            name: name.to_owned(),
            location_id,
        };
        self.thermometers.insert(thermometer.id, thermometer.clone());
        debug!(thermometer_id = %thermometer.id, "Inserted thermometer row");
        thermometer
    }

    fn readings_of<'a>(
        &'a self,
        thermometer_ids: &'a [ThermometerId],
    ) -> impl Iterator<Item = &'a Reading> + 'a {
        self.readings
            .values()
            .filter(move |reading| thermometer_ids.contains(&reading.thermometer_id))
    }
}

/// In-memory implementation of every store port.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationPort for MemoryStore {
    async fn find_location(&self, id: LocationId) -> Result<Option<Location>, StoreError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn insert_location(&self, name: &str) -> Result<Location, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.location_name_taken(name) {
            return Err(name_conflict(name));
        }

        Ok(tables.add_location(name))
    }

    async fn insert_locations_with_thermometers(
        &self,
        seeds: &[LocationSeed],
    ) -> Result<Vec<Location>, StoreError> {
        let mut tables = self.tables.write().await;

        let mut batch_names = BTreeSet::new();
        for seed in seeds {
            let name = seed.name.as_str();
            if tables.location_name_taken(name) || !batch_names.insert(name) {
                return Err(name_conflict(name));
            }
        }

        let mut created = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let location = tables.add_location(&seed.name);
            for thermometer in &seed.thermometers {
                tables.add_thermometer(thermometer, location.id);
            }
            created.push(location);
        }

        Ok(created)
    }

    async fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        Ok(self.tables.read().await.locations.values().cloned().collect())
    }
}

#[async_trait]
impl ThermometerPort for MemoryStore {
    async fn find_thermometer(
        &self,
        id: ThermometerId,
    ) -> Result<Option<Thermometer>, StoreError> {
        Ok(self.tables.read().await.thermometers.get(&id).cloned())
    }

    async fn insert_thermometer(
        &self,
        name: &str,
        location_id: LocationId,
    ) -> Result<Thermometer, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.locations.contains_key(&location_id) {
            return Err(StoreError::MissingReference {
                kind: EntityKind::Location,
                id: location_id.0,
            });
        }

        Ok(tables.add_thermometer(name, location_id))
    }

    async fn list_thermometers(&self) -> Result<Vec<Thermometer>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .thermometers
            .values()
            .cloned()
            .collect())
    }

    async fn list_thermometers_by_location(
        &self,
        location_id: LocationId,
    ) -> Result<Vec<Thermometer>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .thermometers
            .values()
            .filter(|thermometer| thermometer.location_id == location_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReadingPort for MemoryStore {
    async fn insert_reading(
        &self,
        thermometer_id: ThermometerId,
        value: f64,
        clock: &dyn Clock,
    ) -> Result<Reading, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.thermometers.contains_key(&thermometer_id) {
            return Err(StoreError::MissingReference {
                kind: EntityKind::Thermometer,
                id: thermometer_id.0,
            });
        }

        tables.last_reading_id += 1;
        let reading = Reading {
            id: ReadingId(tables.last_reading_id),
            thermometer_id,
            value,
            timestamp: clock.now(),
        };
        tables.readings.insert(reading.id, reading.clone());
        debug!(thermometer_id = %thermometer_id, "Inserted reading row");

        Ok(reading)
    }

    async fn latest_per_thermometer(&self) -> Result<Vec<Reading>, StoreError> {
        let tables = self.tables.read().await;
        Ok(aggregate::latest_per_thermometer(tables.readings.values()))
    }

    async fn top_n_by_thermometer_desc(
        &self,
        thermometer_id: ThermometerId,
        limit: NonZeroUsize,
    ) -> Result<Vec<Reading>, StoreError> {
        let tables = self.tables.read().await;
        Ok(aggregate::recent_window(
            tables.readings.values(),
            thermometer_id,
            limit.get(),
        ))
    }

    async fn thermometer_stats(&self, thermometer_id: ThermometerId) -> Result<Stats, StoreError> {
        let tables = self.tables.read().await;
        Ok(aggregate::summarize(tables.readings_of(&[thermometer_id])))
    }

    async fn thermometers_stats(
        &self,
        thermometer_ids: &[ThermometerId],
    ) -> Result<Stats, StoreError> {
        let tables = self.tables.read().await;
        Ok(aggregate::summarize(tables.readings_of(thermometer_ids)))
    }
}

fn name_conflict(name: &str) -> StoreError {
    StoreError::Conflict(format!("location name '{name}' already exists"))
}

/// Build the port bundle backed by a fresh in-memory store.
#[must_use]
pub fn ports() -> StorePorts {
    StorePorts::from_backend(Arc::new(MemoryStore::new()))
}
