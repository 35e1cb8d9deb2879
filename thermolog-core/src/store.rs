//! Bundle of store ports backing a service.

use std::sync::Arc;

use crate::ports::{LocationPort, ReadingPort, ThermometerPort};

/// Collection of ports implementing one store backend.
///
/// A backend that needs atomic foreign-key checks hands out all three ports
/// over the same shared state.
#[derive(Clone)]
pub struct StorePorts {
    /// Implementation for location rows.
    pub locations: Arc<dyn LocationPort>,
    /// Implementation for thermometer rows.
    pub thermometers: Arc<dyn ThermometerPort>,
    /// Implementation for reading rows and reading queries.
    pub readings: Arc<dyn ReadingPort>,
}

impl StorePorts {
    /// Bundle a single backend that implements every port.
    #[must_use]
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: LocationPort + ThermometerPort + ReadingPort + 'static,
    {
        let locations: Arc<dyn LocationPort> = Arc::<B>::clone(&backend);
        let thermometers: Arc<dyn ThermometerPort> = Arc::<B>::clone(&backend);
        Self {
            locations,
            thermometers,
            readings: backend,
        }
    }
}
