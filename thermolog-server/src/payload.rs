use serde::Deserialize;
use thermolog_core::{LocationId, ServiceError, ThermometerId};

/// Recent-readings window used when `?limit=` is omitted.
pub(crate) const DEFAULT_READINGS_LIMIT: usize = 10;

// Missing fields are reported by `validate`, not by deserialization.

#[derive(Debug, Deserialize)]
pub(crate) struct NewLocation {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewThermometer {
    name: Option<String>,
    location_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewReading {
    thermometer_id: Option<i64>,
    value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ThermometerFilter {
    pub location_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReadingsWindow {
    pub limit: Option<usize>,
}

impl NewLocation {
    pub(crate) fn validate(self) -> Result<String, ServiceError> {
        required_name(self.name)
    }
}

impl NewThermometer {
    pub(crate) fn validate(self) -> Result<(String, LocationId), ServiceError> {
        let name = required_name(self.name)?;
        let location_id = self
            .location_id
            .ok_or_else(|| missing("locationId"))?;
        Ok((name, LocationId(location_id)))
    }
}

impl NewReading {
    pub(crate) fn validate(self) -> Result<(ThermometerId, f64), ServiceError> {
        let thermometer_id = self
            .thermometer_id
            .ok_or_else(|| missing("thermometerId"))?;
        let value = self.value.ok_or_else(|| missing("value"))?;
        Ok((ThermometerId(thermometer_id), value))
    }
}

fn required_name(name: Option<String>) -> Result<String, ServiceError> {
    let name = name.ok_or_else(|| missing("name"))?;
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation("name must not be blank".to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn missing(field: &str) -> ServiceError {
    ServiceError::Validation(format!("missing required field `{field}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_needs_both_fields() {
        let no_value = NewReading {
            thermometer_id: Some(1),
            value: None,
        };
        let no_thermometer = NewReading {
            thermometer_id: None,
            value: Some(20.0),
        };

        assert_eq!(
            no_value.validate().unwrap_err(),
            ServiceError::Validation("missing required field `value`".to_owned())
        );
        assert!(matches!(
            no_thermometer.validate(),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn reading_with_fields_validates() {
        let payload = NewReading {
            thermometer_id: Some(3),
            value: Some(-4.25),
        };

        assert_eq!(payload.validate(), Ok((ThermometerId(3), -4.25)));
    }

    #[test]
    fn names_are_trimmed_and_required() {
        let padded = NewLocation {
            name: Some("  Garage ".to_owned()),
        };
        let blank = NewThermometer {
            name: Some("   ".to_owned()),
            location_id: Some(1),
        };

        assert_eq!(padded.validate(), Ok("Garage".to_owned()));
        assert!(blank.validate().is_err());
    }

    #[test]
    fn thermometer_needs_location() {
        let payload = NewThermometer {
            name: Some("TH1".to_owned()),
            location_id: None,
        };

        assert_eq!(
            payload.validate(),
            Err(ServiceError::Validation(
                "missing required field `locationId`".to_owned()
            ))
        );
    }
}
